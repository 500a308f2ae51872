pub mod error;
pub mod mappings;
pub mod repo;
