//! Application layer: the lock-holding service around the coordinator.

pub mod service;

pub use service::DirectoryService;
