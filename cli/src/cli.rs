use std::path::PathBuf;

/// Flood embankment survey statistics and maps
#[derive(clap::Parser, Debug)]
#[command(name = "embankmap", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Directory holding the survey dataset folders, defaults to "."
    #[arg(long, value_hint = clap::ValueHint::DirPath, global = true)]
    pub data_dir: Option<PathBuf>,

    /// JSON configuration file (paths, outputs, map settings)
    #[arg(long, value_hint = clap::ValueHint::FilePath, global = true)]
    pub config: Option<PathBuf>,

    /// Runs everything when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Print the survey summary statistics
    Report(ReportArgs),

    /// Write the static PNG map
    Render(RenderArgs),

    /// Write the interactive HTML map
    Explore(ExploreArgs),

    /// Report, static map and interactive map
    All,
}

#[derive(clap::Args, Debug)]
pub struct ReportArgs {
    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args, Debug)]
pub struct RenderArgs {
    /// Output PNG file, defaults to the configured path
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Image width in pixels
    #[arg(long)]
    pub width: Option<u32>,
}

#[derive(clap::Args, Debug)]
pub struct ExploreArgs {
    /// Output HTML file, defaults to the configured path
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}
