//! Loader for tool registries defined in TOML
//!
//! # Example TOML
//!
//! ```toml
//! default = "codex"
//!
//! [[tools]]
//! id = "claude"
//! name = "Claude Code"
//! command = "claude"
//! supports_plugins = true
//!
//! [tools.commands]
//! init = "/init"
//! commit = "/commit"
//!
//! [[tools]]
//! id = "codex"
//! name = "Codex CLI"
//! command = "codex"
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::{ToolDescriptor, ToolRegistry};
use crate::{Error, Result};

#[derive(Debug, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    default: Option<String>,
    #[serde(default)]
    tools: Vec<ToolDescriptor>,
}

impl ToolRegistry {
    /// Load a registry from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(path, &content)
    }

    /// Parse a registry from TOML text. `path` is only used in messages.
    pub fn from_toml(path: &Path, content: &str) -> Result<Self> {
        let invalid = |message: String| Error::InvalidConfig {
            path: path.to_path_buf(),
            message,
        };

        let file: RegistryFile = toml::from_str(content).map_err(|e| invalid(e.to_string()))?;
        let registry = Self::from_tools(file.tools, file.default.as_deref())
            .map_err(|e| invalid(e.to_string()))?;

        tracing::debug!(
            path = ?path,
            tools = registry.len(),
            active = %registry.active().id,
            "Loaded tool registry"
        );
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const REGISTRY: &str = r#"
default = "codex"

[[tools]]
id = "claude"
name = "Claude Code"
command = "claude"
supports_plugins = true

[tools.commands]
init = "/init"

[[tools]]
id = "codex"
name = "Codex CLI"
command = "codex"
"#;

    #[test]
    fn test_from_toml() {
        let registry = ToolRegistry::from_toml(&PathBuf::from("tools.toml"), REGISTRY).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.active().id, "codex");

        let claude = registry.get("claude").unwrap();
        assert!(claude.supports_plugins);
        assert_eq!(claude.command_for("init"), Some("/init"));
    }

    #[test]
    fn test_camel_case_alias_accepted() {
        let content = "[[tools]]\nid = \"a\"\nname = \"A\"\ncommand = \"a\"\nsupportsPlugins = true\n";
        let registry = ToolRegistry::from_toml(&PathBuf::from("tools.toml"), content).unwrap();
        assert!(registry.active().supports_plugins);
    }

    #[test]
    fn test_empty_file_is_invalid() {
        let err = ToolRegistry::from_toml(&PathBuf::from("tools.toml"), "").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
    }

    #[test]
    fn test_unknown_default_is_invalid() {
        let content = format!("default = \"aider\"\n{}", REGISTRY.replace("default = \"codex\"", ""));
        let err = ToolRegistry::from_toml(&PathBuf::from("tools.toml"), &content).unwrap_err();
        assert!(err.to_string().contains("aider"));
    }
}
