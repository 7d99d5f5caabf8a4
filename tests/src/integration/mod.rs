//! Integration scenarios.

pub mod cascades;
pub mod concurrency;
pub mod keys;
pub mod persistence;
pub mod scenarios;
