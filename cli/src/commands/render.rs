use anyhow::{Context, Result};
use embankmap::{SurveyConfig, SurveyData, render_static_map};
use log::info;

pub fn run(data: &SurveyData, config: &SurveyConfig, args: &crate::cli::RenderArgs) -> Result<()> {
    let mut settings = config.static_map.clone();
    if let Some(width) = args.width {
        anyhow::ensure!(width > 0, "[render] image width must be positive");
        settings.width_px = width;
    }
    let out_path = args.output.clone().unwrap_or_else(|| settings.output.clone());

    info!("[render] writing static map to {}", out_path.display());
    render_static_map(data, &settings, &out_path)
        .with_context(|| format!("[render] failed to write {}", out_path.display()))?;

    Ok(())
}
