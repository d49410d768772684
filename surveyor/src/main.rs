use anyhow::Context;
use clap::Parser;
use generator::survey::{build_survey_points, GeneratorConfig};
use ingest::store::PointStore;
use map_bridge::bridge::MapBridge;
use radcore::model::MeasurementPoint;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod export;
mod generator;
mod ingest;
mod map_bridge;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Survey driver for the radiation hazard-mapping core")]
struct Args {
    /// Ingest a CSV file (lat, lon, value, unit, time) into the store
    #[arg(long)]
    csv: Option<PathBuf>,
    /// Append-only measurement store
    #[arg(long, default_value = "radiation_store.csv")]
    store: PathBuf,
    /// Analyze a synthetic survey of N points instead of the store
    #[arg(long)]
    synthetic: Option<usize>,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    #[arg(long, default_value_t = 150)]
    grid_resolution: usize,
    /// Write the full survey report as JSON
    #[arg(long)]
    report_json: Option<PathBuf>,
    /// Write the classified-point table as CSV for the reporting collaborator
    #[arg(long)]
    export_table: Option<PathBuf>,
    /// Keep the map bridge alive for the rendering collaborator
    #[arg(long, default_value_t = false)]
    serve: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let workflow_config = if let Some(path) = args.workflow {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::from_args(args.grid_resolution)
    };
    let runner = Runner::new(workflow_config);
    let store = PointStore::new(&args.store);

    let points: Vec<MeasurementPoint> = if let Some(count) = args.synthetic {
        let config = GeneratorConfig {
            count,
            seed: args.seed,
            ..Default::default()
        };
        build_survey_points(&config)
    } else {
        let mut points = store.load().context("loading point store")?;
        if let Some(csv_path) = &args.csv {
            let file = fs::File::open(csv_path)
                .with_context(|| format!("opening {}", csv_path.display()))?;
            let batch = ingest::csv::read_measurements(file)
                .with_context(|| format!("ingesting {}", csv_path.display()))?;
            for rejection in &batch.rejected {
                log::warn!(
                    "{} line {}: {}",
                    csv_path.display(),
                    rejection.line,
                    rejection.reason
                );
            }
            store
                .append(&batch.points)
                .context("appending to point store")?;
            points.extend(batch.points);
        }
        points
    };

    let outcome = runner.execute(points)?;
    let bridge = MapBridge::new();

    match &outcome.analysis {
        Some(analysis) => {
            println!(
                "Survey run -> {} classified points, {} contour lines, {} rejected",
                analysis.report.classified.len(),
                analysis.report.contours.lines.len(),
                outcome.rejected.len()
            );
            for note in &analysis.report.notes {
                println!("  note: {}", note);
            }
            bridge.publish(&outcome);

            if let Some(path) = &args.report_json {
                let payload = serde_json::to_string_pretty(&analysis.report)
                    .context("serializing survey report")?;
                if let Some(parent) = path.parent() {
                    if !parent.as_os_str().is_empty() {
                        fs::create_dir_all(parent)?;
                    }
                }
                fs::write(path, payload)
                    .with_context(|| format!("writing report {}", path.display()))?;
            }
            if let Some(path) = &args.export_table {
                export::table::write_table_csv(&analysis.report, path)?;
            }
        }
        None => {
            println!(
                "No measurements accepted; nothing to analyze ({} rejected).",
                outcome.rejected.len()
            );
            bridge.publish(&outcome);
        }
    }

    if args.serve {
        bridge.spawn_http(Arc::new(runner));
        bridge.publish_status("HTTP bridge running (Ctrl+C to stop)...");
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for signal handling")?;
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
    }

    Ok(())
}
