pub mod error;
pub mod types;

pub use error::RoadWatchError;
pub use types::*;
