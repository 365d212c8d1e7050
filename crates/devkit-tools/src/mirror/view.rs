//! Selector view-state derived from the cached tool

use serde::Serialize;

use crate::registry::{ToolConfig, ToolDescriptor};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectorOption {
    pub id: String,
    pub label: String,
}

impl From<&ToolDescriptor> for SelectorOption {
    fn from(tool: &ToolDescriptor) -> Self {
        Self {
            id: tool.id.clone(),
            label: tool.short_name(),
        }
    }
}

/// What a UI process shows for tool selection.
///
/// `selected` is the value the selector control displays, which may run
/// ahead of the cache while a switch is pending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectorView {
    pub options: Vec<SelectorOption>,
    pub selected: Option<String>,
    pub pending: Option<String>,
    pub start_label: Option<String>,
    pub plugins_enabled: bool,
}

impl SelectorView {
    pub fn from_config(config: &ToolConfig) -> Self {
        let mut view = Self {
            options: config.available_tools.values().map(SelectorOption::from).collect(),
            ..Self::default()
        };
        view.show(&config.active_tool);
        view
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Refresh everything that depends on the confirmed tool.
    pub(crate) fn show(&mut self, tool: &ToolDescriptor) {
        self.selected = Some(tool.id.clone());
        self.start_label = Some(format!("Start {}", tool.name));
        self.plugins_enabled = tool.supports_plugins;
        if self.pending.as_deref() == Some(tool.id.as_str()) {
            self.pending = None;
        }
    }

    pub(crate) fn assume(&mut self, tool_id: &str) {
        self.selected = Some(tool_id.to_string());
        self.pending = Some(tool_id.to_string());
    }

    pub(crate) fn clear_pending(&mut self, tool_id: &str) {
        if self.pending.as_deref() == Some(tool_id) {
            self.pending = None;
        }
    }
}
