use anyhow::{Context, Result};
use embankmap::{SurveyData, SurveyReport};

pub fn run(data: &SurveyData, args: &crate::cli::ReportArgs) -> Result<()> {
    let report = SurveyReport::compute(data).context("[report] failed to compute survey statistics")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }

    Ok(())
}
