//! Shoplens - Online Shopping Behavior Analysis
//!
//! CLI entry point: loads the source, applies the selection and prints the
//! dashboard KPIs, optionally writing a JSON report and a filtered CSV export.

use anyhow::{Context, Result};
use clap::Parser;
use shoplens::{Args, Dashboard, FilterSpec, Report};
use std::fs;
use tracing::{debug, info};

fn init_logging(level: &str, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level, args.quiet);

    let config = args
        .dashboard_config()
        .context("Failed to load configuration")?;
    debug!("Configuration: {:?}", config);

    let dashboard = Dashboard::open(&args.input, config)
        .with_context(|| format!("Failed to load {}", args.input.display()))?;

    let base = match &args.selection {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read selection {}", path.display()))?;
            serde_json::from_str::<FilterSpec>(&text)
                .with_context(|| format!("Invalid selection {}", path.display()))?
        }
        None => dashboard.default_selection(),
    };
    let spec = args
        .filter_spec(base, dashboard.table().sales_bounds())
        .context("Invalid filter selection")?;

    let view = dashboard.view(&spec).context("Invalid filter selection")?;
    let report = Report::from_view(dashboard.source(), dashboard.table().len(), &view);

    if let Some(path) = &args.report {
        fs::write(path, report.to_json()?)
            .with_context(|| format!("Failed to write report {}", path.display()))?;
        info!("Report saved: {}", path.display());
    }

    if let Some(dir) = &args.export_dir {
        let path = dashboard
            .export(&view, dir)
            .context("Failed to export filtered records")?;
        info!("Filtered records saved: {}", path.display());
    }

    if args.json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report.summary());
    }

    Ok(())
}
