pub mod download;
pub mod search;

pub use download::*;
pub use search::*;
