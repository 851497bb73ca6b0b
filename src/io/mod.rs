//! File I/O for building models.
//!
//! The native building-model format is handled outside this crate; models are
//! persisted here as JSON.

pub mod json;

pub use json::{read_model, write_model};
