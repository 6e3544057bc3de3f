//! API-boundary types shared by module REST layers.

pub mod problem;

pub use problem::{FieldViolation, Problem, ProblemResponse, APPLICATION_PROBLEM_JSON};
