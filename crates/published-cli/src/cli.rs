use std::path::PathBuf;

use clap::Parser;
use published_core::config::{split_tags, AccessLevel, CliOverrides};

#[derive(Parser, Debug)]
#[command(
    name = "published",
    version,
    about = "Extract the whitelist of published Java API from @Published markers"
)]
pub struct Cli {
    /// Configuration file (replaces published.toml in the project root)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Project root; relative paths are resolved against it
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Java source root (repeatable)
    #[arg(short, long = "source")]
    pub sources: Vec<PathBuf>,

    /// Read the documentation graph from a JSON snapshot instead of sources
    #[arg(long)]
    pub graph: Option<PathBuf>,

    /// Accepted scope tags, comma separated (repeatable)
    #[arg(short, long = "tag")]
    pub tags: Vec<String>,

    /// Whitelist output file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Marker annotation name
    #[arg(long)]
    pub marker: Option<String>,

    /// Minimum declared access: public, protected, package or private
    #[arg(long, value_parser = parse_access)]
    pub access: Option<AccessLevel>,

    /// Write the loaded graph as JSON to this file and exit
    #[arg(long)]
    pub dump_graph: Option<PathBuf>,
}

impl Cli {
    pub fn overrides(&self) -> CliOverrides {
        let tags = if self.tags.is_empty() {
            None
        } else {
            Some(self.tags.iter().flat_map(|t| split_tags(t)).collect())
        };
        CliOverrides {
            tags,
            output: self.output.clone(),
            marker: self.marker.clone(),
            access: self.access,
            source_roots: self.sources.clone(),
            snapshot: self.graph.clone(),
        }
    }
}

fn parse_access(value: &str) -> Result<AccessLevel, String> {
    AccessLevel::parse(value)
        .ok_or_else(|| format!("unknown access level '{value}' (public, protected, package, private)"))
}
