//! Building a `DocGraph`: from Java sources or from a JSON snapshot.

pub mod assemble;
pub mod discovery;
pub mod java;
pub mod javadoc;
pub mod resolve;

use std::path::{Path, PathBuf};
use std::time::Instant;

use published_core::config::{AccessLevel, SourceConfig};
use published_core::errors::LoadError;

pub use assemble::GraphAssembler;
pub use discovery::find_java_sources;
pub use java::{CompilationUnit, JavaSourceParser};

use crate::model::DocGraph;

/// A loaded graph and how many source files fed it (0 for snapshots).
#[derive(Debug)]
pub struct LoadedGraph {
    pub graph: DocGraph,
    pub sources: usize,
}

/// Loads Java sources under a set of roots.
#[derive(Debug, Clone)]
pub struct SourceLoader {
    roots: Vec<PathBuf>,
    exclude: Vec<String>,
    access: AccessLevel,
}

impl SourceLoader {
    pub fn new(roots: Vec<PathBuf>, exclude: Vec<String>, access: AccessLevel) -> Self {
        Self {
            roots,
            exclude,
            access,
        }
    }

    /// Relative roots are taken from `project_root`.
    pub fn from_config(project_root: &Path, config: &SourceConfig) -> Self {
        let roots = config
            .effective_roots()
            .into_iter()
            .map(|r| if r.is_absolute() { r } else { project_root.join(r) })
            .collect();
        Self::new(roots, config.exclude.clone(), config.effective_access())
    }

    pub fn load(&self) -> Result<LoadedGraph, LoadError> {
        let start = Instant::now();
        let files = find_java_sources(&self.roots, &self.exclude)?;
        if files.is_empty() {
            return Err(LoadError::NoSources);
        }

        let mut parser = JavaSourceParser::new()?;
        let mut units = Vec::with_capacity(files.len());
        for path in &files {
            let source = std::fs::read_to_string(path).map_err(|e| LoadError::Io {
                path: path.clone(),
                message: e.to_string(),
            })?;
            units.push(parser.parse(path, &source)?);
        }

        let graph = GraphAssembler::new(self.access).assemble(&units)?;
        tracing::info!(
            files = files.len(),
            types = graph.type_count(),
            access = self.access.as_str(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "java sources loaded"
        );
        Ok(LoadedGraph {
            graph,
            sources: files.len(),
        })
    }
}

/// Build a graph from in-memory `(path, source)` pairs.
pub fn load_sources<P: AsRef<Path>>(
    sources: &[(P, &str)],
    access: AccessLevel,
) -> Result<DocGraph, LoadError> {
    let mut parser = JavaSourceParser::new()?;
    let mut units = Vec::with_capacity(sources.len());
    for (path, source) in sources {
        units.push(parser.parse(path.as_ref(), source)?);
    }
    Ok(GraphAssembler::new(access).assemble(&units)?)
}

/// Read a graph snapshot written by `DocGraph::to_json`.
pub fn load_snapshot(path: &Path) -> Result<LoadedGraph, LoadError> {
    let json = std::fs::read_to_string(path).map_err(|e| LoadError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let graph = DocGraph::from_json(&json).map_err(|e| LoadError::Snapshot {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    tracing::info!(path = %path.display(), elements = graph.len(), "graph snapshot loaded");
    Ok(LoadedGraph { graph, sources: 0 })
}
