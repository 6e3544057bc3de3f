//! # ModKit - shared building blocks for catalog modules
//!
//! - **Contracts**: the phases a module takes part in (DB migration → REST wiring).
//! - **Problem details**: RFC 9457 error bodies shared by every REST handler.
//! - **HTTP plumbing**: request-id propagation and request tracing spans.

// Core module contracts and traits
pub mod contracts;
pub use contracts::{DbModule, RestfulModule};

pub mod api;
pub use api::problem::{FieldViolation, Problem, ProblemResponse};

// HTTP utilities
pub mod http;
pub use http::request_id::XRequestId;
