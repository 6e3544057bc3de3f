//! HTTP utilities shared by the ingress host and module handlers.

pub mod request_id;
