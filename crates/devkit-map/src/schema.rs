//! Structure map schema - loaded from STRUCTURE.json
//!
//! The structure map is produced by an external index generator and
//! describes every source module plus a feature-to-module intent index.
//!
//! # Example JSON
//!
//! ```json
//! {
//!   "modules": {
//!     "renderer/aiToolSelector": {
//!       "file": "src/renderer/aiToolSelector.js",
//!       "description": "AI tool selector dropdown",
//!       "exports": ["init", "getCurrentTool"],
//!       "ipc": { "listens": ["AI_TOOL_CHANGED"], "emits": ["SET_AI_TOOL"] }
//!     }
//!   },
//!   "intentIndex": {
//!     "ai-tool": [
//!       { "module": "renderer/aiToolSelector", "file": "src/renderer/aiToolSelector.js" }
//!     ]
//!   }
//! }
//! ```

use std::fmt;
use std::marker::PhantomData;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Complete structure map document
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureMap {
    /// Module key to module metadata, in document order
    #[serde(default, deserialize_with = "null_as_default")]
    pub modules: OrderedMap<ModuleDescriptor>,
    /// Feature name to the modules implementing it.
    /// Absent when the generator was run without intent indexing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent_index: Option<OrderedMap<Vec<ModuleReference>>>,
}

/// Metadata about a single source module
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ModuleDescriptor {
    /// Path of the module relative to the project root.
    /// Empty when the generator left it out.
    #[serde(default, deserialize_with = "null_as_default")]
    pub file: String,
    /// Optional one-line summary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Exported symbol names
    #[serde(default, deserialize_with = "null_as_default")]
    pub exports: Vec<String>,
    /// IPC channels the module participates in
    #[serde(default, deserialize_with = "null_as_default")]
    pub ipc: IpcChannels,
}

impl ModuleDescriptor {
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            description: None,
            exports: Vec::new(),
            ipc: IpcChannels::default(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_exports(mut self, exports: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.exports = exports.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_ipc(mut self, ipc: IpcChannels) -> Self {
        self.ipc = ipc;
        self
    }

    /// Listen channels followed by emit channels.
    pub fn channels(&self) -> impl Iterator<Item = &str> {
        self.ipc
            .listens
            .iter()
            .chain(self.ipc.emits.iter())
            .map(String::as_str)
    }
}

/// IPC listen/emit channel names of a module
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct IpcChannels {
    #[serde(default, deserialize_with = "null_as_default")]
    pub listens: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub emits: Vec<String>,
}

impl IpcChannels {
    pub fn new(
        listens: impl IntoIterator<Item = impl Into<String>>,
        emits: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            listens: listens.into_iter().map(Into::into).collect(),
            emits: emits.into_iter().map(Into::into).collect(),
        }
    }
}

/// Display-oriented module entry referenced from the intent index.
///
/// Also used for search hits, where `module` is always set.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ModuleReference {
    /// Key into `StructureMap::modules`, when the generator recorded it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ModuleReference {
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            module: None,
            file: file.into(),
            description: None,
        }
    }

    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Treat an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// String-keyed map that keeps document order.
///
/// A repeated key replaces the earlier value but keeps its position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedMap<T> {
    entries: Vec<(String, T)>,
}

impl<T> OrderedMap<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: T) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for OrderedMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>, T> FromIterator<(K, T)> for OrderedMap<T> {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl<T: Serialize> Serialize for OrderedMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for OrderedMap<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for EntriesVisitor<T> {
            type Value = OrderedMap<T>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut map = OrderedMap::new();
                while let Some((key, value)) = access.next_entry::<String, T>()? {
                    map.insert(key, value);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(EntriesVisitor(PhantomData))
    }
}
