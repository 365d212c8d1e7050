//! Plain-text rendering of search results and feature listings

use std::fmt::Write;

use crate::search::{FeatureListing, MatchGroup};

/// Column width the file path is padded to in result lines.
pub const FILE_COLUMN: usize = 42;
/// Column width the feature name is padded to in the listing.
pub const FEATURE_COLUMN: usize = 20;

/// Render match groups the way `find-module <keyword>` prints them.
///
/// `list_hint` is the command suggested when nothing matched.
pub fn render_matches(groups: &[MatchGroup], keyword: &str, list_hint: &str) -> String {
    let mut out = String::new();

    if groups.is_empty() {
        let _ = writeln!(out, "No modules found for \"{}\"", keyword);
        let _ = writeln!(out, "Try: {}", list_hint);
        return out;
    }

    for group in groups {
        let _ = writeln!(out, "Feature: {}", group.feature);
        for module in &group.modules {
            let description = match module.description.as_deref() {
                Some(d) if !d.is_empty() => format!(" — {}", d),
                _ => String::new(),
            };
            let _ = writeln!(
                out,
                "  {:<width$}{}",
                module.file,
                description,
                width = FILE_COLUMN
            );
        }
        if !group.channels.is_empty() {
            let _ = writeln!(out, "  IPC: {}", group.channels.join(", "));
        }
        out.push('\n');
    }

    out
}

/// Render the feature listing the way `find-module --list` prints it.
pub fn render_listing(listing: &FeatureListing) -> String {
    let mut out = String::from("Available features:\n\n");

    for entry in &listing.features {
        let _ = writeln!(
            out,
            "  {:<width$} → {}",
            entry.feature,
            entry.files.join(", "),
            width = FEATURE_COLUMN
        );
    }

    let _ = writeln!(
        out,
        "\nTotal: {} features, {} modules",
        listing.feature_count, listing.module_count
    );
    out
}
