use anyhow::{Context, Result};
use embankmap::{SurveyConfig, SurveyData, render_interactive_map};
use log::info;

pub fn run(data: &SurveyData, config: &SurveyConfig, args: &crate::cli::ExploreArgs) -> Result<()> {
    let out_path = args.output.clone().unwrap_or_else(|| config.interactive.output.clone());

    info!("[explore] writing interactive map to {}", out_path.display());
    render_interactive_map(data, &config.source_crs, &config.interactive, &out_path)
        .with_context(|| format!("[explore] failed to write {}", out_path.display()))?;

    Ok(())
}
