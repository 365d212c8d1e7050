//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::Parser;
use devkit_map::STRUCTURE_FILE;

/// Find source modules by feature keyword using the structure map's intent index
#[derive(Parser, Debug)]
#[command(name = "find-module")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Keyword to search for; several words are joined with spaces.
    /// Words may start with `-`; options must come before the first word.
    #[arg(allow_hyphen_values = true)]
    pub keyword: Vec<String>,

    /// List every feature in the intent index
    #[arg(short, long)]
    pub list: bool,

    /// Output as JSON for scripting
    #[arg(long)]
    pub json: bool,

    /// Structure map to read
    #[arg(long, env = "FIND_MODULE_MAP", default_value = STRUCTURE_FILE)]
    pub map: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// The keyword as typed, or `None` when no words were given.
    pub fn joined_keyword(&self) -> Option<String> {
        if self.keyword.is_empty() {
            None
        } else {
            Some(self.keyword.join(" "))
        }
    }
}
