//! Stateless structural validation of inbound transaction batches: quorum,
//! hash, and ordering checks, accumulated into a single error rather than
//! short-circuited on the first failure.

mod config;
mod error;
mod validator;

pub use config::ValidationConfig;
pub use error::BatchValidationError;
pub use validator::{validate_batch, IncomingBatch};
