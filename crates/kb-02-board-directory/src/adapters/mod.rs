//! Repository adapters.

pub mod json_file_repository;
pub mod memory_repository;

pub use json_file_repository::JsonFileRepository;
pub use memory_repository::InMemoryRepository;
