//! Pricelens - Retail Product CSV Analysis & Static Chart Dashboard
//!
//! One run is one dashboard interaction: load, filter, summarise, render.

use anyhow::{Context, Result};
use clap::Parser;
use pricelens::bootstrap;
use pricelens::charts::{ChartData, StaticChartRenderer};
use pricelens::config::{Cli, DashboardConfig};
use pricelens::data::DatasetStore;
use pricelens::report::{self, DashboardReport};
use pricelens::stats::{apply_filters, Aggregator};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = DashboardConfig::resolve(&cli).context("Failed to resolve configuration")?;

    bootstrap::setup_logging(&config.log_level);
    tracing::info!("Pricelens v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Data: {}, Profile: {:?}",
        config.data_path.display(),
        config.profile
    );

    let dataset = DatasetStore::global()
        .get_or_load(&config.data_path, &config.cleaning)
        .context("Cannot start without product data")?;

    let params = config
        .filter_params(&dataset)
        .context("Invalid filter parameters")?;
    let view = apply_filters(&dataset, &params)?;
    let summary = Aggregator::summarize(&dataset, &view);

    if cli.json {
        let report = DashboardReport {
            source: dataset.source(),
            price_range: &params.price_range,
            cleaning: dataset.report(),
            summary: &summary,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!(
            "{}",
            report::format_summary(&summary, &params.price_range, dataset.report())
        );
    }

    if cli.no_charts {
        return Ok(());
    }

    let data = ChartData::build(&view, &summary, config.charts.histogram_bins);
    let written = StaticChartRenderer::new(config.charts.clone())
        .render_all(&data)
        .context("Failed to render charts")?;
    for path in &written {
        tracing::info!("Wrote {}", path.display());
    }

    if cli.open {
        open::that(&config.charts.output_dir).with_context(|| {
            format!(
                "Failed to open chart directory {}",
                config.charts.output_dir.display()
            )
        })?;
    }

    Ok(())
}
