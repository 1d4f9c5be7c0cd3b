//! Tool Registry and Dispatch
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`registry`] | Compiled-in tool manifest: descriptions, schemas, mutation flags |
//! | [`methods`] | Closed sets of meta and domain method names |
//! | [`adapters`] | Param-object to host-repository call adapters |
//! | [`router`] | Method dispatch with failure normalization |

pub mod adapters;
pub mod methods;
pub mod registry;
pub mod router;

pub use methods::{DomainMethod, MetaMethod, Method};
pub use registry::{ToolEntry, ToolRegistry};
pub use router::ToolRouter;
