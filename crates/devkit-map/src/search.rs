//! Three-tier module search over the intent index
//!
//! Tiers are tried in order and the first tier that produces any hit wins:
//!
//! 1. **Exact** - keyword equals a feature key (case-insensitive)
//! 2. **Partial** - keyword and feature key contain one another
//! 3. **Deep** - keyword occurs in a module's key, description, exports,
//!    or IPC channel names; all hits are collapsed into one group

use serde::Serialize;

use crate::Result;
use crate::index::StructureIndex;
use crate::schema::ModuleReference;

/// A module listed in a match group.
pub type ModuleHit = ModuleReference;

/// Which tier produced a match group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Exact,
    Partial,
    Deep,
}

/// Modules grouped under one matched feature or free-text query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchGroup {
    pub feature: String,
    pub match_type: MatchType,
    pub modules: Vec<ModuleHit>,
    /// Union of IPC channels of the matched modules. Display only.
    pub channels: Vec<String>,
}

/// One intent-index feature with the files it references
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureEntry {
    pub feature: String,
    pub files: Vec<String>,
}

/// Every intent-index feature plus aggregate counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureListing {
    pub features: Vec<FeatureEntry>,
    pub feature_count: usize,
    /// Sum of reference list lengths; duplicates across features count separately
    pub module_count: usize,
}

/// Search engine over a loaded [`StructureIndex`].
///
/// Holds no state of its own, so it can be shared and queried freely.
#[derive(Debug, Clone, Copy)]
pub struct ModuleSearchEngine<'a> {
    index: &'a StructureIndex,
}

impl<'a> ModuleSearchEngine<'a> {
    pub fn new(index: &'a StructureIndex) -> Self {
        Self { index }
    }

    /// Search for modules matching `keyword`.
    ///
    /// Returns an empty list when no tier matches. Fails with `NoIndex` when
    /// the map has no intent index.
    pub fn search(&self, keyword: &str) -> Result<Vec<MatchGroup>> {
        let intent_index = self.index.intent_index()?;
        let needle = keyword.to_lowercase();

        let exact: Vec<MatchGroup> = intent_index
            .iter()
            .filter(|(feature, _)| feature.to_lowercase() == needle)
            .map(|(feature, modules)| self.group(feature, MatchType::Exact, modules.clone()))
            .collect();
        if !exact.is_empty() {
            tracing::debug!(keyword, groups = exact.len(), "Exact match");
            return Ok(exact);
        }

        let partial: Vec<MatchGroup> = intent_index
            .iter()
            .filter(|(feature, _)| {
                let feature = feature.to_lowercase();
                feature.contains(&needle) || needle.contains(&feature)
            })
            .map(|(feature, modules)| self.group(feature, MatchType::Partial, modules.clone()))
            .collect();
        if !partial.is_empty() {
            tracing::debug!(keyword, groups = partial.len(), "Partial match");
            return Ok(partial);
        }

        let hits = self.deep_hits(&needle);
        if hits.is_empty() {
            tracing::debug!(keyword, "No match in any tier");
            return Ok(Vec::new());
        }

        tracing::debug!(keyword, modules = hits.len(), "Deep match");
        Ok(vec![self.group(
            &format!("search: \"{}\"", keyword),
            MatchType::Deep,
            hits,
        )])
    }

    /// List every feature in the intent index with its files.
    pub fn list_features(&self) -> Result<FeatureListing> {
        let intent_index = self.index.intent_index()?;

        let features: Vec<FeatureEntry> = intent_index
            .iter()
            .map(|(feature, modules)| FeatureEntry {
                feature: feature.to_string(),
                files: modules.iter().map(|m| m.file.clone()).collect(),
            })
            .collect();
        let module_count = intent_index.values().map(Vec::len).sum();

        Ok(FeatureListing {
            feature_count: features.len(),
            module_count,
            features,
        })
    }

    fn deep_hits(&self, needle: &str) -> Vec<ModuleHit> {
        self.index
            .modules()
            .iter()
            .filter(|(key, module)| {
                // One space-joined haystack, so a keyword may span adjacent fields
                let haystack = std::iter::once(*key)
                    .chain(std::iter::once(module.description.as_deref().unwrap_or("")))
                    .chain(module.exports.iter().map(String::as_str))
                    .chain(module.channels())
                    .collect::<Vec<_>>()
                    .join(" ");
                haystack.to_lowercase().contains(needle)
            })
            .map(|(key, module)| ModuleHit {
                module: Some(key.to_string()),
                file: module.file.clone(),
                description: module.description.clone().filter(|d| !d.is_empty()),
            })
            .collect()
    }

    fn group(&self, feature: &str, match_type: MatchType, modules: Vec<ModuleHit>) -> MatchGroup {
        let channels = self.index.channels_for(&modules);
        MatchGroup {
            feature: feature.to_string(),
            match_type,
            modules,
            channels,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{IpcChannels, ModuleDescriptor, OrderedMap, StructureMap};
    use pretty_assertions::assert_eq;

    fn index_with(features: &[(&str, &[&str])]) -> StructureIndex {
        let mut map = StructureMap::default();
        let mut intent: OrderedMap<Vec<ModuleReference>> = OrderedMap::new();
        for (feature, files) in features {
            intent.insert(
                *feature,
                files.iter().map(|f| ModuleReference::new(*f)).collect(),
            );
        }
        map.intent_index = Some(intent);
        StructureIndex::from_map("STRUCTURE.json", map)
    }

    #[test]
    fn test_exact_wins_over_partial() {
        let index = index_with(&[("github", &["a.js"]), ("git-hub-panel", &["b.js"])]);
        let groups = ModuleSearchEngine::new(&index).search("github").unwrap();

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].feature, "github");
        assert_eq!(groups[0].match_type, MatchType::Exact);
        assert_eq!(groups[0].modules, vec![ModuleReference::new("a.js")]);
    }

    #[test]
    fn test_exact_is_case_insensitive() {
        let index = index_with(&[("GitHub", &["a.js"])]);
        let groups = ModuleSearchEngine::new(&index).search("gitHUB").unwrap();
        assert_eq!(groups[0].match_type, MatchType::Exact);
        assert_eq!(groups[0].feature, "GitHub");
    }

    #[test]
    fn test_partial_both_directions() {
        let index = index_with(&[("terminal", &["t.js"]), ("git", &["g.js"]), ("tasks", &["k.js"])]);
        let engine = ModuleSearchEngine::new(&index);

        let groups = engine.search("term").unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].feature, "terminal");
        assert_eq!(groups[0].match_type, MatchType::Partial);

        let groups = engine.search("github").unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].feature, "git");
        assert_eq!(groups[0].match_type, MatchType::Partial);
    }

    #[test]
    fn test_deep_collects_all_hits() {
        let mut map = StructureMap::default();
        map.modules.insert(
            "main/window",
            ModuleDescriptor::new("src/main/window.js").with_description("Creates the window"),
        );
        map.modules.insert(
            "renderer/panel",
            ModuleDescriptor::new("src/renderer/panel.js")
                .with_ipc(IpcChannels::new(["WINDOW_RESIZED"], Vec::<String>::new())),
        );
        map.modules
            .insert("renderer/other", ModuleDescriptor::new("src/renderer/other.js"));
        map.intent_index = Some(OrderedMap::new());
        let index = StructureIndex::from_map("STRUCTURE.json", map);

        let groups = ModuleSearchEngine::new(&index).search("Window").unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].match_type, MatchType::Deep);
        assert_eq!(groups[0].feature, "search: \"Window\"");
        let files: Vec<_> = groups[0].modules.iter().map(|m| m.file.as_str()).collect();
        assert_eq!(files, vec!["src/main/window.js", "src/renderer/panel.js"]);
        assert_eq!(groups[0].channels, vec!["WINDOW_RESIZED".to_string()]);
    }

    #[test]
    fn test_deep_matches_across_adjacent_fields() {
        let mut map = StructureMap::default();
        map.modules.insert(
            "renderer/aiToolSelector",
            ModuleDescriptor::new("src/renderer/aiToolSelector.js")
                .with_exports(["init", "getCurrentTool"])
                .with_ipc(IpcChannels::new(["AI_TOOL_CHANGED"], ["SET_AI_TOOL"])),
        );
        map.modules.insert("renderer/other", ModuleDescriptor::new("src/renderer/other.js"));
        map.intent_index = Some(OrderedMap::new());
        let index = StructureIndex::from_map("STRUCTURE.json", map);
        let engine = ModuleSearchEngine::new(&index);

        // Two exports
        let groups = engine.search("init getCurrentTool").unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].match_type, MatchType::Deep);
        assert_eq!(
            groups[0].modules[0].module.as_deref(),
            Some("renderer/aiToolSelector")
        );

        // Last export into first listen channel
        let groups = engine.search("getcurrenttool ai_tool_changed").unwrap();
        assert_eq!(groups[0].modules.len(), 1);

        // A missing description still leaves one separator between key and exports
        let groups = engine.search("aiToolSelector  init").unwrap();
        assert_eq!(groups[0].modules.len(), 1);
    }

    #[test]
    fn test_no_match_is_empty() {
        let index = index_with(&[("terminal", &["t.js"])]);
        assert!(ModuleSearchEngine::new(&index).search("zzz").unwrap().is_empty());
    }

    #[test]
    fn test_list_features_counts_duplicates() {
        let index = index_with(&[("a", &["x.js", "y.js"]), ("b", &["x.js"])]);
        let listing = ModuleSearchEngine::new(&index).list_features().unwrap();
        assert_eq!(listing.feature_count, 2);
        assert_eq!(listing.module_count, 3);
        assert_eq!(listing.features[0].files, vec!["x.js", "y.js"]);
    }
}
