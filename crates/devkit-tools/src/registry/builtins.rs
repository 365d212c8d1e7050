//! Built-in tool descriptors

use super::ToolDescriptor;

/// Number of built-in tools.
pub const BUILTIN_COUNT: usize = 2;

/// Id of the tool that is active when nothing else is configured.
pub const DEFAULT_TOOL: &str = "claude";

/// The built-in tool named by [`DEFAULT_TOOL`].
pub fn default_descriptor() -> ToolDescriptor {
    ToolDescriptor::new(DEFAULT_TOOL, "Claude Code", "claude")
        .with_command("init", "/init")
        .with_command("commit", "/commit")
        .with_command("review", "/review")
        .with_plugins(true)
}

/// Returns all built-in tool descriptors. The first one is the default.
pub fn builtin_descriptors() -> Vec<ToolDescriptor> {
    vec![
        default_descriptor(),
        ToolDescriptor::new("codex", "Codex CLI", "codex").with_command("init", "/init"),
    ]
}
