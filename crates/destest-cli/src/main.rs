use clap::Parser;
use destest_cli::{pipeline, Cli, DestestConfig};
use destest_viz::Renderer;
use std::io::{self, Write};
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

fn main() {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .with_writer(io::stderr)
        .finish();
    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("setting default subscriber failed: {err}");
    }

    if let Err(err) = run(&cli) {
        error!("destest failed: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let mut config = DestestConfig::load(cli.config.as_deref())?;
    if let Some(dir) = &cli.plot_dir {
        config.paths.plot_dir = Some(dir.clone());
    }
    let renderer = pipeline::select_renderer(&config, cli.no_plot);
    match &renderer {
        Renderer::Svg { out_dir } => info!("Charts go to {}", out_dir.display()),
        Renderer::Summary => info!("No chart directory configured; printing summary"),
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let report = pipeline::run(&config, &renderer, &mut out)?;
    out.flush()?;
    info!(
        apartments = report.annual.len(),
        min = report.extremes.min.value(),
        max = report.extremes.max.value(),
        "run complete"
    );
    Ok(())
}
