pub mod error;
pub mod types;

pub use error::RunnerError;
pub use types::*;
