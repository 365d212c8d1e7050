//! Cached copy of the active tool held by a mirror

use crate::registry::{ToolDescriptor, ToolFeature};

/// Start command used before the first sync completes.
pub const FALLBACK_START_COMMAND: &str = "claude";

/// The mirror's last confirmed tool.
///
/// Only written on initial sync and when an `AI_TOOL_CHANGED` broadcast is
/// applied. Every query here reads the cache and never reaches the authority.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolCache {
    current: Option<ToolDescriptor>,
}

impl ToolCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn replace(&mut self, tool: ToolDescriptor) {
        self.current = Some(tool);
    }

    pub fn current_tool(&self) -> Option<&ToolDescriptor> {
        self.current.as_ref()
    }

    pub fn current_id(&self) -> Option<&str> {
        self.current.as_ref().map(|t| t.id.as_str())
    }

    pub fn start_command(&self) -> &str {
        self.current
            .as_ref()
            .map(|t| t.command.as_str())
            .unwrap_or(FALLBACK_START_COMMAND)
    }

    /// In-tool command for `action`, if the current tool defines one.
    pub fn command(&self, action: &str) -> Option<&str> {
        self.current.as_ref()?.command_for(action)
    }

    /// Feature gate over the closed set `plugins`, `init`, `commit`.
    ///
    /// Unrecognized keys and an empty cache both report `false`.
    pub fn supports_feature(&self, feature: &str) -> bool {
        match (ToolFeature::parse(feature), &self.current) {
            (Some(feature), Some(tool)) => tool.supports(feature),
            _ => false,
        }
    }
}
