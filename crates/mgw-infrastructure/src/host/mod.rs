//! Host application adapters
//!
//! The gateway binary ships with [`InMemoryHost`], a process-local
//! implementation of every repository port. Embedders replace it with their
//! own [`mgw_domain::ports::HostServices`].

pub mod memory;

pub use memory::InMemoryHost;
