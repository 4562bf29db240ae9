//! Persisted experiment results

mod json_writer;

pub use json_writer::{JsonResultWriter, ResultWriteError};
