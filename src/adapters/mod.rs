//! Adapters layer: Concrete implementations of ports.
//!
//! - `svm`: exported SVM evaluated in plain Rust
//! - `sanitize`: PII filtering for logs

pub mod sanitize;
pub mod svm;
