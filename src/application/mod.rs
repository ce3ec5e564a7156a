//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement
//! the core use case of the application.

mod classification;

pub use classification::ClassificationService;
