mod cli;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use published_analysis::WhitelistPipeline;
use published_core::config::PublishedConfig;
use published_core::errors::{PipelineError, PublishedErrorCode};
use tracing::{debug, info};

use crate::cli::Cli;

fn main() -> ExitCode {
    published_core::tracing::init_tracing();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<PipelineError>() {
                Some(pipeline) => eprintln!("{}", pipeline.coded_string()),
                None => eprintln!("{e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let overrides = cli.overrides();
    let config = PublishedConfig::load(&cli.root, cli.config.as_deref(), Some(&overrides))
        .map_err(PipelineError::from)?;
    debug!(
        version = published_core::constants::VERSION,
        root = %cli.root.display(),
        marker = config.policy.effective_marker(),
        tags = ?config.policy.tags,
        roots = ?config.sources.effective_roots(),
        snapshot = ?config.sources.snapshot,
        access = config.sources.effective_access().as_str(),
        output = ?config.output.path,
        "resolved options"
    );

    let pipeline = WhitelistPipeline::new(config, &cli.root);
    if let Some(path) = &cli.dump_graph {
        let elements = pipeline.dump_graph(path)?;
        info!(elements, path = %path.display(), "graph dumped");
        return Ok(());
    }

    let report = pipeline.run()?;
    info!(
        entries = report.entries,
        types = report.types,
        output = %report.output.display(),
        "done"
    );
    Ok(())
}
