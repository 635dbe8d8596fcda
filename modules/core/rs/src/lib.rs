pub use error::RleError;

pub mod error;
pub mod num;
