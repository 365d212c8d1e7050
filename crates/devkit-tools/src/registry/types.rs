//! Core types for the tool registry

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Description of an external command-line coding assistant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    /// Machine identifier (e.g., "claude", "codex")
    pub id: String,
    /// Display name (e.g., "Claude Code")
    pub name: String,
    /// Command that starts the tool
    pub command: String,
    /// Action name to in-tool command (e.g., "init" -> "/init")
    #[serde(default)]
    pub commands: BTreeMap<String, String>,
    /// Whether the tool can load plugins
    #[serde(default, alias = "supports_plugins")]
    pub supports_plugins: bool,
}

impl ToolDescriptor {
    pub fn new(id: impl Into<String>, name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            command: command.into(),
            commands: BTreeMap::new(),
            supports_plugins: false,
        }
    }

    /// Add an action command (builder pattern).
    pub fn with_command(mut self, action: impl Into<String>, command: impl Into<String>) -> Self {
        self.commands.insert(action.into(), command.into());
        self
    }

    /// Set plugin support (builder pattern).
    pub fn with_plugins(mut self, supported: bool) -> Self {
        self.supports_plugins = supported;
        self
    }

    /// Command for `action`. Empty commands count as absent.
    pub fn command_for(&self, action: &str) -> Option<&str> {
        self.commands
            .get(action)
            .map(String::as_str)
            .filter(|c| !c.is_empty())
    }

    pub fn supports(&self, feature: ToolFeature) -> bool {
        match feature {
            ToolFeature::Plugins => self.supports_plugins,
            ToolFeature::Init | ToolFeature::Commit => self.command_for(feature.as_str()).is_some(),
        }
    }

    /// Short label for selector options ("Claude Code" -> "Claude").
    pub fn short_name(&self) -> String {
        self.name.replacen(" Code", "", 1).replacen(" CLI", "", 1)
    }
}

/// Features a UI can gate on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolFeature {
    Plugins,
    Init,
    Commit,
}

impl ToolFeature {
    /// Parse a feature key; unrecognized keys yield `None`.
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "plugins" => Some(Self::Plugins),
            "init" => Some(Self::Init),
            "commit" => Some(Self::Commit),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plugins => "plugins",
            Self::Init => "init",
            Self::Commit => "commit",
        }
    }
}

/// Snapshot of the active tool and every available tool.
///
/// Payload of `GET_AI_TOOL_CONFIG`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolConfig {
    pub active_tool: ToolDescriptor,
    pub available_tools: BTreeMap<String, ToolDescriptor>,
}
