//! Ports module for the board directory
//!
//! Defines inbound (API) and outbound (SPI) port traits.

pub mod inbound;
pub mod outbound;

pub use inbound::DirectoryApi;
pub use outbound::DirectoryRepository;
