//! Tool registry - the authority's canonical tool configuration
//!
//! Holds every available coding assistant and the id of the active one.

mod builtins;
mod loader;
mod store;
mod types;

pub use builtins::{BUILTIN_COUNT, DEFAULT_TOOL, builtin_descriptors, default_descriptor};
pub use store::ToolRegistry;
pub use types::{ToolConfig, ToolDescriptor, ToolFeature};
