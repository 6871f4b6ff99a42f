mod cli;
mod commands;

use anyhow::{Context, Result};
use cli::{Cli, Commands, ExploreArgs, RenderArgs, ReportArgs};
use commands::{explore, render, report};
use embankmap::{SurveyConfig, SurveyData};
use log::LevelFilter;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    // RUST_LOG, when set, takes precedence over -v.
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level);
    builder.parse_default_env();
    builder.init();
}

pub fn run() -> Result<()> {
    use clap::Parser;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => SurveyConfig::from_json_file(path)?,
        None => SurveyConfig::default(),
    };
    let data_dir = cli.data_dir.clone().unwrap_or(".".into());
    let data = SurveyData::load(&data_dir, &config.datasets)
        .with_context(|| format!("failed to load survey data from {}", data_dir.display()))?;

    match &cli.command {
        Some(Commands::Report(args)) => report::run(&data, args),
        Some(Commands::Render(args)) => render::run(&data, &config, args),
        Some(Commands::Explore(args)) => explore::run(&data, &config, args),
        Some(Commands::All) | None => {
            report::run(&data, &ReportArgs { json: false })?;
            render::run(&data, &config, &RenderArgs { output: None, width: None })?;
            explore::run(&data, &config, &ExploreArgs { output: None })
        }
    }
}

fn main() -> Result<()> { run() }
