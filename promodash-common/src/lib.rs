// File: promodash-common/src/lib.rs
pub mod error;
pub mod models;
pub mod traits;
pub mod validation;

pub use error::Error;
pub use validation::FieldErrors;
