pub mod error;
pub mod normalize;
pub mod object_id;
pub mod repo;
pub mod service;
