//! In-memory view over a loaded structure map

use std::fs;
use std::path::{Path, PathBuf};

use crate::schema::{ModuleDescriptor, ModuleReference, OrderedMap, StructureMap};
use crate::{Error, Result};

/// Default file name of the structure map in a project root.
pub const STRUCTURE_FILE: &str = "STRUCTURE.json";

/// A structure map together with the path it was loaded from.
///
/// Loaded once per invocation and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct StructureIndex {
    source: PathBuf,
    map: StructureMap,
}

impl StructureIndex {
    /// Read and parse the structure map at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = ?path, "Loading structure map");

        let content = fs::read_to_string(path).map_err(|e| Error::load(path, e))?;
        Self::from_json(path, &content)
    }

    /// Parse a structure map from JSON text. `source` is only used in messages.
    pub fn from_json(source: impl Into<PathBuf>, content: &str) -> Result<Self> {
        let source = source.into();
        let map: StructureMap =
            serde_json::from_str(content).map_err(|e| Error::ConfigParse {
                path: source.clone(),
                message: e.to_string(),
            })?;

        tracing::debug!(
            modules = map.modules.len(),
            features = map.intent_index.as_ref().map_or(0, OrderedMap::len),
            "Structure map loaded"
        );

        Ok(Self { source, map })
    }

    pub fn from_map(source: impl Into<PathBuf>, map: StructureMap) -> Self {
        Self {
            source: source.into(),
            map,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn map(&self) -> &StructureMap {
        &self.map
    }

    pub fn modules(&self) -> &OrderedMap<ModuleDescriptor> {
        &self.map.modules
    }

    /// The intent index, or `NoIndex` when the map was generated without one.
    pub fn intent_index(&self) -> Result<&OrderedMap<Vec<ModuleReference>>> {
        self.map.intent_index.as_ref().ok_or_else(|| Error::NoIndex {
            path: self.source.clone(),
        })
    }

    pub fn module(&self, key: &str) -> Option<&ModuleDescriptor> {
        self.map.modules.get(key)
    }

    /// Resolve a reference to its module: by key when recorded, else by file.
    pub fn resolve(&self, reference: &ModuleReference) -> Option<&ModuleDescriptor> {
        match &reference.module {
            Some(key) => self.module(key),
            None => self
                .map
                .modules
                .values()
                .find(|module| module.file == reference.file),
        }
    }

    /// De-duplicated listen/emit channels across `references`, first-seen order.
    pub fn channels_for<'a>(
        &self,
        references: impl IntoIterator<Item = &'a ModuleReference>,
    ) -> Vec<String> {
        let mut channels: Vec<String> = Vec::new();
        for module in references.into_iter().filter_map(|r| self.resolve(r)) {
            for channel in module.channels() {
                if !channels.iter().any(|c| c == channel) {
                    channels.push(channel.to_string());
                }
            }
        }
        channels
    }
}
