//! Command implementations
//!
//! Both commands load the map once, run a single query, and write the
//! report to `out`.

use std::io::Write;
use std::path::Path;

use devkit_map::{ModuleSearchEngine, StructureIndex, report};

use crate::error::Result;

/// Suggested when a search finds nothing.
pub const LIST_HINT: &str = "find-module --list";

pub const USAGE: &str = "Usage: find-module <keyword>\n       find-module --list\n";

/// `find-module <keyword>`
pub fn run_search(map: &Path, keyword: &str, json: bool, out: &mut impl Write) -> Result<()> {
    let index = StructureIndex::load(map)?;
    let groups = ModuleSearchEngine::new(&index).search(keyword)?;
    tracing::debug!(keyword, groups = groups.len(), "Search finished");

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&groups)?)?;
    } else {
        write!(out, "{}", report::render_matches(&groups, keyword, LIST_HINT))?;
    }
    Ok(())
}

/// `find-module --list`
pub fn run_list(map: &Path, json: bool, out: &mut impl Write) -> Result<()> {
    let index = StructureIndex::load(map)?;
    let listing = ModuleSearchEngine::new(&index).list_features()?;

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&listing)?)?;
    } else {
        write!(out, "{}", report::render_listing(&listing))?;
    }
    Ok(())
}
