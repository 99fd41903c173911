//! Single-shot whitelist run: load → filter → emit → write.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use published_core::config::PublishedConfig;
use published_core::errors::{EmitError, PipelineError};

use crate::emitter::{Whitelist, WhitelistEmitter};
use crate::loader::{load_snapshot, LoadedGraph, SourceLoader};
use crate::policy::InclusionPolicy;
use crate::view::FilteringView;

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    /// Source files parsed (0 when a snapshot was used).
    pub sources: usize,
    /// Types in the raw graph.
    pub types: usize,
    /// Lines written to the whitelist.
    pub entries: usize,
    pub output: PathBuf,
}

/// Drives one whitelist run from a resolved configuration.
#[derive(Debug, Clone)]
pub struct WhitelistPipeline {
    config: PublishedConfig,
    project_root: PathBuf,
}

impl WhitelistPipeline {
    pub fn new(config: PublishedConfig, project_root: impl Into<PathBuf>) -> Self {
        Self {
            config,
            project_root: project_root.into(),
        }
    }

    pub fn config(&self) -> &PublishedConfig {
        &self.config
    }

    /// Load the graph, compute the whitelist and write it.
    ///
    /// The output file is replaced once, after the whole whitelist is in
    /// memory; any failure leaves the previous file untouched.
    pub fn run(&self) -> Result<PipelineReport, PipelineError> {
        let start = Instant::now();
        let output = self.resolve(self.config.output.require_path()?);

        let loaded = self.load()?;
        let whitelist = self.whitelist(&loaded)?;
        let rendered = whitelist.render(self.config.output.effective_line_ending());
        write_atomically(&output, &rendered)?;

        let report = PipelineReport {
            sources: loaded.sources,
            types: loaded.graph.type_count(),
            entries: whitelist.len(),
            output,
        };
        tracing::info!(
            sources = report.sources,
            types = report.types,
            entries = report.entries,
            output = %report.output.display(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "whitelist written"
        );
        Ok(report)
    }

    /// Compute the whitelist without writing anything.
    pub fn compute(&self) -> Result<Whitelist, PipelineError> {
        let loaded = self.load()?;
        self.whitelist(&loaded)
    }

    /// Write the raw graph as a JSON snapshot. Returns the element count.
    pub fn dump_graph(&self, path: &Path) -> Result<usize, PipelineError> {
        let path = self.resolve(path);
        let loaded = self.load()?;
        let json = loaded
            .graph
            .to_json()
            .map_err(|e| EmitError::Serialize(e.to_string()))?;
        write_atomically(&path, &json)?;
        tracing::info!(path = %path.display(), elements = loaded.graph.len(), "graph snapshot written");
        Ok(loaded.graph.len())
    }

    fn load(&self) -> Result<LoadedGraph, PipelineError> {
        let loaded = match &self.config.sources.snapshot {
            Some(snapshot) => load_snapshot(&self.resolve(snapshot))?,
            None => SourceLoader::from_config(&self.project_root, &self.config.sources).load()?,
        };
        Ok(loaded)
    }

    fn whitelist(&self, loaded: &LoadedGraph) -> Result<Whitelist, PipelineError> {
        let policy = InclusionPolicy::from_config(&self.config.policy);
        tracing::debug!(
            marker = policy.marker(),
            tags = policy.accepted_tags().len(),
            "inclusion policy ready"
        );
        let view = FilteringView::new(&policy);
        let root = view.wrap_root(loaded.graph.root()?);
        let whitelist = WhitelistEmitter::new(&policy).collect(&root)?;
        Ok(whitelist)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_root.join(path)
        }
    }
}

/// Write to a temporary file beside `path`, then rename it over `path`.
fn write_atomically(path: &Path, contents: &str) -> Result<(), EmitError> {
    let write_error = |message: String| EmitError::Write {
        path: path.to_path_buf(),
        message,
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = tempfile::NamedTempFile::new_in(dir).map_err(|e| write_error(e.to_string()))?;
    file.write_all(contents.as_bytes())
        .and_then(|()| file.as_file().sync_all())
        .map_err(|e| write_error(e.to_string()))?;
    file.persist(path).map_err(|e| write_error(e.error.to_string()))?;
    Ok(())
}
