use anyhow::Context;
use clap::Parser;
use log::info;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use workflow::config::{AnalysisMethod, WorkflowConfig};
use workflow::runner::Runner;

mod generator;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Synthetic FK array-analysis driver")]
struct Args {
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// Beamformer to run when no workflow file is given
    #[arg(long, value_enum, default_value_t = AnalysisMethod::Bbfk)]
    method: AnalysisMethod,
    /// Normalise each frequency bin by its grid maximum
    #[arg(long, default_value_t = false)]
    prewhiten: bool,
    /// Use libm sine/cosine instead of the interpolated table
    #[arg(long, default_value_t = false)]
    exact_trig: bool,
    /// Append the estimate as a JSON line to this file
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let workflow_config = if let Some(path) = args.workflow {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::from_args(args.method, args.prewhiten, args.exact_trig)
    };
    info!(
        "running {} over {} stations",
        workflow_config.method.label(),
        workflow_config.stations.len()
    );

    let runner = Runner::new(workflow_config);
    let result = runner.execute()?;
    let est = &result.estimate;
    let metrics = runner.metrics();

    println!(
        "{} -> peak ({}, {}) of {}x{} [source ({}, {})], relpow {:.4e}, slowness {:.3} s/km, baz {:.1} deg, cells {}",
        est.method,
        est.ix,
        est.iy,
        result.grid.0,
        result.grid.1,
        result.source_cell.0,
        result.source_cell.1,
        est.relpow,
        est.slowness,
        est.backazimuth_deg,
        metrics.cells_scanned
    );

    if let Some(report_path) = args.report {
        if let Some(parent) = report_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&report_path)
            .with_context(|| format!("opening report {}", report_path.display()))?;
        file.write_all(est.to_json_line()?.as_bytes())?;
    }

    Ok(())
}
