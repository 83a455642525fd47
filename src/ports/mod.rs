//! Ports (trait boundaries) for external dependencies.
//!
//! These traits are owned by the engine and implemented by adapters.

pub mod repository;

pub use repository::TableRepository;
