//! Mission-based integration tests
//!
//! Each test walks one end-to-end scenario across the structure map search
//! and the tool selection crates, using a throwaway project directory.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use devkit_map::{MatchType, ModuleSearchEngine, STRUCTURE_FILE, StructureIndex};
use devkit_tools::{
    Authority, AuthorityServer, Channel, Mirror, RemoteAuthority, SwitchOutcome, SyncSettings,
    ToolRegistry,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

// =============================================================================
// Test Infrastructure
// =============================================================================

/// Throwaway project directory with an optional structure map and tool registry
pub struct TestProject {
    temp_dir: TempDir,
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

impl TestProject {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn with_structure(self, json: &str) -> Self {
        fs::write(self.structure_path(), json).unwrap();
        self
    }

    pub fn with_tools(self, toml: &str) -> Self {
        fs::write(self.tools_path(), toml).unwrap();
        self
    }

    pub fn structure_path(&self) -> PathBuf {
        self.root().join(STRUCTURE_FILE)
    }

    pub fn tools_path(&self) -> PathBuf {
        self.root().join("tools.toml")
    }

    pub fn authority(&self) -> Authority {
        let registry = ToolRegistry::load(self.tools_path()).unwrap();
        Authority::new(registry, SyncSettings::default())
    }
}

const STRUCTURE: &str = r#"{
  "modules": {
    "main/aiTools": {
      "file": "src/main/aiTools.js",
      "description": "Owns the active AI tool",
      "exports": ["getActiveTool", "setActiveTool"],
      "ipc": {
        "listens": ["GET_AI_TOOL_CONFIG", "SET_AI_TOOL"],
        "emits": ["AI_TOOL_CHANGED"]
      }
    },
    "renderer/aiToolSelector": {
      "file": "src/renderer/aiToolSelector.js",
      "description": "Selector dropdown for the AI tool",
      "exports": ["getStartCommand", "supportsFeature"],
      "ipc": {
        "listens": ["AI_TOOL_CHANGED"],
        "emits": ["GET_AI_TOOL_CONFIG", "SET_AI_TOOL"]
      }
    },
    "renderer/terminal": {
      "file": "src/renderer/terminal.js",
      "description": "xterm.js terminal tabs"
    }
  },
  "intentIndex": {
    "ai-tool": [
      { "module": "main/aiTools", "file": "src/main/aiTools.js", "description": "Owns the active AI tool" },
      { "module": "renderer/aiToolSelector", "file": "src/renderer/aiToolSelector.js" }
    ],
    "terminal": [
      { "module": "renderer/terminal", "file": "src/renderer/terminal.js" }
    ]
  }
}"#;

const TOOLS: &str = r#"
default = "claude"

[[tools]]
id = "claude"
name = "Claude Code"
command = "claude"
supportsPlugins = true

[tools.commands]
init = "/init"
commit = "/commit"

[[tools]]
id = "codex"
name = "Codex CLI"
command = "codex"

[tools.commands]
init = "/init"

[[tools]]
id = "aider"
name = "Aider"
command = "aider --no-auto-commits"
"#;

// =============================================================================
// Mission 1: Locating Modules
// =============================================================================

mod m1_locate {
    use super::*;
    use pretty_assertions::assert_eq;

    /// M1.1: Exact search finds both sides of tool selection
    #[test]
    fn m1_1_exact_search_finds_selector_modules() {
        let project = TestProject::new().with_structure(STRUCTURE);
        let index = StructureIndex::load(project.structure_path()).unwrap();
        let engine = ModuleSearchEngine::new(&index);

        let groups = engine.search("AI-Tool").unwrap();

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].match_type, MatchType::Exact);
        let files: Vec<_> = groups[0].modules.iter().map(|m| m.file.as_str()).collect();
        assert_eq!(files, vec!["src/main/aiTools.js", "src/renderer/aiToolSelector.js"]);

        // The channels documented in the map are the ones the authority speaks
        let documented: BTreeSet<_> = groups[0].channels.iter().map(String::as_str).collect();
        let spoken: BTreeSet<_> = [Channel::GetAiToolConfig, Channel::SetAiTool, Channel::AiToolChanged]
            .iter()
            .map(Channel::as_str)
            .collect();
        assert_eq!(documented, spoken);
    }

    /// M1.2: Free-text search reaches export names
    #[test]
    fn m1_2_deep_search_reaches_exports() {
        let project = TestProject::new().with_structure(STRUCTURE);
        let index = StructureIndex::load(project.structure_path()).unwrap();

        let groups = ModuleSearchEngine::new(&index).search("startcommand").unwrap();

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].match_type, MatchType::Deep);
        assert_eq!(groups[0].modules[0].module.as_deref(), Some("renderer/aiToolSelector"));
    }
}

// =============================================================================
// Mission 2: Tool Switching
// =============================================================================

mod m2_switch {
    use super::*;
    use pretty_assertions::assert_eq;

    /// M2.1: An accepted switch reaches every mirror
    #[tokio::test]
    async fn m2_1_switch_propagates_to_all_mirrors() {
        let project = TestProject::new().with_tools(TOOLS);
        let handle = project.authority().spawn();

        let mut sidebar = Mirror::connect(handle.clone(), SyncSettings::default()).await.unwrap();
        let mut terminal = Mirror::connect(handle.clone(), SyncSettings::default()).await.unwrap();
        assert_eq!(sidebar.view().options.len(), 3);
        assert!(terminal.supports_feature("commit"));

        assert_eq!(sidebar.request_switch("aider").await.unwrap(), SwitchOutcome::Accepted);
        terminal.next_change().await.unwrap();

        for mirror in [&sidebar, &terminal] {
            assert_eq!(mirror.start_command(), "aider --no-auto-commits");
            assert_eq!(mirror.command("init"), None);
            assert!(!mirror.supports_feature("init"));
            assert!(!mirror.supports_feature("plugins"));
            assert_eq!(mirror.view().start_label.as_deref(), Some("Start Aider"));
        }

        // A late joiner syncs straight to the current tool
        let late = Mirror::connect(handle, SyncSettings::default()).await.unwrap();
        assert_eq!(late.current_tool().unwrap().id, "aider");
    }

    /// M2.2: A rejected switch changes nothing anywhere
    #[tokio::test]
    async fn m2_2_rejected_switch_leaves_everyone_in_place() {
        let project = TestProject::new().with_tools(TOOLS);
        let handle = project.authority().spawn();

        let mut sidebar = Mirror::connect(handle.clone(), SyncSettings::default()).await.unwrap();
        let mut terminal = Mirror::connect(handle, SyncSettings::default()).await.unwrap();

        assert_eq!(sidebar.request_switch("cursor").await.unwrap(), SwitchOutcome::Rejected);

        assert_eq!(sidebar.view().selected.as_deref(), Some("claude"));
        assert_eq!(sidebar.current_tool().unwrap().id, "claude");
        assert_eq!(terminal.pump(), 0);
        assert_eq!(terminal.current_tool().unwrap().id, "claude");
    }

    /// M2.3: UI processes on separate connections follow one authority
    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn m2_3_switch_reaches_mirrors_in_other_processes() {
        let project = TestProject::new().with_tools(TOOLS);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = AuthorityServer::new(project.authority());
        tokio::spawn(async move { server.listen(listener).await });

        let connect = || async {
            let link = RemoteAuthority::connect(addr, SyncSettings::default()).await.unwrap();
            Mirror::connect(link, SyncSettings::default()).await.unwrap()
        };
        let mut sidebar = connect().await;
        let mut terminal = connect().await;
        let mut status_bar = connect().await;

        assert_eq!(sidebar.request_switch("aider").await.unwrap(), SwitchOutcome::Accepted);

        for mirror in [&mut terminal, &mut status_bar] {
            assert_eq!(mirror.next_change().await.unwrap().id, "aider");
            assert_eq!(mirror.start_command(), "aider --no-auto-commits");
            assert_eq!(mirror.view().start_label.as_deref(), Some("Start Aider"));
        }

        assert_eq!(terminal.request_switch("cursor").await.unwrap(), SwitchOutcome::Rejected);
        assert_eq!(terminal.view().selected.as_deref(), Some("aider"));
    }
}
