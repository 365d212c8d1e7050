//! Structure map search for the devkit tooling.
//!
//! This crate loads the developer-authored structure map (`STRUCTURE.json`)
//! and locates source modules by feature intent.
//!
//! # Architecture
//!
//! - [`StructureIndex`] - the loaded map, read-only after load
//! - [`ModuleSearchEngine`] - three-tier keyword search and feature listing
//! - [`report`] - text rendering used by the `find-module` command
//!
//! ```text
//! STRUCTURE.json --load--> StructureIndex --search(keyword)--> Vec<MatchGroup>
//!                                         --list_features()--> FeatureListing
//! ```

pub mod error;
pub mod index;
pub mod report;
pub mod schema;
pub mod search;

pub use error::{Error, Result};
pub use index::{STRUCTURE_FILE, StructureIndex};
pub use schema::{IpcChannels, ModuleDescriptor, ModuleReference, OrderedMap, StructureMap};
pub use search::{FeatureEntry, FeatureListing, MatchGroup, MatchType, ModuleHit, ModuleSearchEngine};
