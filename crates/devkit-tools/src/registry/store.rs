//! Tool registry storage

use std::collections::BTreeMap;

use super::{ToolConfig, ToolDescriptor};
use crate::{Error, Result};

/// Available tools plus the currently active one.
///
/// Owned by the authority process. The active id always names a
/// registered tool.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: BTreeMap<String, ToolDescriptor>,
    active: String,
}

impl ToolRegistry {
    /// Create a registry holding `default`, which becomes active.
    pub fn new(default: ToolDescriptor) -> Self {
        let active = default.id.clone();
        let mut tools = BTreeMap::new();
        tools.insert(active.clone(), default);
        Self { tools, active }
    }

    /// Create a registry pre-populated with all built-in tools.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new(super::builtins::default_descriptor());
        for tool in super::builtins::builtin_descriptors() {
            registry.register(tool);
        }
        registry
    }

    /// Build a registry from `tools`. The active tool is `default` when
    /// given, otherwise the first tool.
    pub fn from_tools(
        tools: impl IntoIterator<Item = ToolDescriptor>,
        default: Option<&str>,
    ) -> Result<Self> {
        let mut tools = tools.into_iter();
        let mut registry = Self::new(tools.next().ok_or(Error::EmptyRegistry)?);
        for tool in tools {
            registry.register(tool);
        }
        if let Some(id) = default {
            if registry.activate(id).is_none() {
                return Err(Error::UnknownDefault(id.to_string()));
            }
        }
        Ok(registry)
    }

    /// Register a tool, replacing any tool with the same id.
    pub fn register(&mut self, tool: ToolDescriptor) {
        self.tools.insert(tool.id.clone(), tool);
    }

    pub fn get(&self, id: &str) -> Option<&ToolDescriptor> {
        self.tools.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.tools.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// List all registered tool ids (sorted).
    pub fn list(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ToolDescriptor> {
        self.tools.values()
    }

    pub fn active(&self) -> &ToolDescriptor {
        &self.tools[&self.active]
    }

    /// Make `id` the active tool. Returns `None` and leaves the
    /// registry untouched when `id` is not registered.
    pub fn activate(&mut self, id: &str) -> Option<&ToolDescriptor> {
        let tool = self.tools.get(id)?;
        self.active = tool.id.clone();
        Some(tool)
    }

    /// Snapshot for `GET_AI_TOOL_CONFIG`.
    pub fn to_config(&self) -> ToolConfig {
        ToolConfig {
            active_tool: self.active().clone(),
            available_tools: self.tools.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{BUILTIN_COUNT, DEFAULT_TOOL, default_descriptor};

    fn tool(id: &str) -> ToolDescriptor {
        ToolDescriptor::new(id, id.to_uppercase(), id)
    }

    #[test]
    fn test_new_activates_default() {
        let registry = ToolRegistry::new(tool("aider"));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.active().id, "aider");
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = ToolRegistry::new(tool("a"));
        registry.register(tool("b"));

        assert!(registry.contains("b"));
        assert!(registry.get("b").is_some());
        assert!(!registry.contains("unknown"));
        assert_eq!(registry.active().id, "a");
    }

    #[test]
    fn test_list_sorted() {
        let mut registry = ToolRegistry::new(tool("zed"));
        registry.register(tool("aider"));
        registry.register(tool("claude"));
        assert_eq!(registry.list(), vec!["aider", "claude", "zed"]);
    }

    #[test]
    fn test_activate_unknown_leaves_active() {
        let mut registry = ToolRegistry::new(tool("a"));
        registry.register(tool("b"));

        assert!(registry.activate("nope").is_none());
        assert_eq!(registry.active().id, "a");
        assert_eq!(registry.activate("b").map(|t| t.id.as_str()), Some("b"));
        assert_eq!(registry.active().id, "b");
    }

    #[test]
    fn test_from_tools() {
        let registry = ToolRegistry::from_tools([tool("a"), tool("b")], Some("b")).unwrap();
        assert_eq!(registry.active().id, "b");

        assert!(matches!(
            ToolRegistry::from_tools(Vec::new(), None),
            Err(Error::EmptyRegistry)
        ));
        assert!(matches!(
            ToolRegistry::from_tools([tool("a")], Some("x")),
            Err(Error::UnknownDefault(_))
        ));
    }

    #[test]
    fn test_with_builtins() {
        let registry = ToolRegistry::with_builtins();
        assert_eq!(registry.len(), BUILTIN_COUNT);
        assert!(registry.contains("claude"));
        assert!(registry.contains("codex"));
        assert_eq!(registry.active().id, DEFAULT_TOOL);
        assert_eq!(registry.active(), &default_descriptor());
    }

    #[test]
    fn test_to_config() {
        let registry = ToolRegistry::with_builtins();
        let config = registry.to_config();
        assert_eq!(config.active_tool.id, "claude");
        assert_eq!(config.available_tools.len(), BUILTIN_COUNT);
    }
}
