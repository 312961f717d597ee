use log::{error, info, warn};
use std::env;
use std::fs;
use std::path::PathBuf;
use trusty_survey::config::Config;
use trusty_survey::voting::summary;
use trusty_survey::Survey;

fn run() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = Config::from_env()?;

    // A path on the command line wins over SURVEY_FILE
    let path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .or(config.survey_file.clone())
        .ok_or("Expected a survey file as argument or in SURVEY_FILE")?;

    info!("Loading survey from {}", path.display());
    let contents = fs::read_to_string(&path)?;
    let mut survey: Survey = serde_json::from_str(&contents)?;

    if let Some((start_bound, iterate_step)) = config.weighting() {
        survey.set_start_bound_and_iterate_step(start_bound, iterate_step);
    }

    match summary::summarize(&survey, &config.average_format)? {
        Some(summary) => println!("{}", summary.render()),
        None => warn!("Summary display is turned off for this survey"),
    }

    Ok(())
}

fn main() {
    // Initialize logging
    dotenvy::dotenv().ok();
    env_logger::init();

    if let Err(e) = run() {
        error!("{}", e);
        std::process::exit(1);
    }
}
