use crate::error::SurveyError;
use crate::format::DEFAULT_AVERAGE_PATTERN;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub survey_file: Option<PathBuf>,
    pub average_format: String,
    pub start_bound: Option<i32>,
    pub iterate_step: Option<i32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            survey_file: None,
            average_format: DEFAULT_AVERAGE_PATTERN.to_string(),
            start_bound: None,
            iterate_step: None,
        }
    }
}

impl Config {
    /// Reads `SURVEY_*` variables from the process environment.
    pub fn from_env() -> Result<Self, SurveyError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, SurveyError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            survey_file: lookup("SURVEY_FILE").map(PathBuf::from),
            average_format: lookup("SURVEY_AVERAGE_FORMAT").unwrap_or(defaults.average_format),
            start_bound: parse_int(&lookup, "SURVEY_START_BOUND")?,
            iterate_step: parse_int(&lookup, "SURVEY_ITERATE_STEP")?,
        })
    }

    /// Weighting override, if either part is configured. The missing part
    /// falls back to the ballot default of 1.
    pub fn weighting(&self) -> Option<(i32, i32)> {
        match (self.start_bound, self.iterate_step) {
            (None, None) => None,
            (start, step) => Some((
                start.unwrap_or(crate::models::DEFAULT_START_BOUND),
                step.unwrap_or(crate::models::DEFAULT_ITERATE_STEP),
            )),
        }
    }
}

fn parse_int<F>(lookup: &F, key: &str) -> Result<Option<i32>, SurveyError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = lookup(key) else {
        return Ok(None);
    };
    match value.trim().parse::<i32>() {
        Ok(parsed) => Ok(Some(parsed)),
        Err(_) => Err(SurveyError::InvalidConfig {
            key: key.to_string(),
            value,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, SurveyError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.average_format, "0.##");
        assert_eq!(config.weighting(), None);
    }

    #[test]
    fn reads_all_keys() {
        let config = config(&[
            ("SURVEY_FILE", "offsite.json"),
            ("SURVEY_AVERAGE_FORMAT", "0.0"),
            ("SURVEY_START_BOUND", " 5 "),
            ("SURVEY_ITERATE_STEP", "-1"),
        ])
        .unwrap();

        assert_eq!(config.survey_file, Some(PathBuf::from("offsite.json")));
        assert_eq!(config.average_format, "0.0");
        assert_eq!(config.weighting(), Some((5, -1)));
    }

    #[test]
    fn partial_weighting_falls_back_to_defaults() {
        let config = config(&[("SURVEY_ITERATE_STEP", "2")]).unwrap();
        assert_eq!(config.weighting(), Some((1, 2)));
    }

    #[test]
    fn invalid_number_is_rejected() {
        let err = config(&[("SURVEY_START_BOUND", "one")]).unwrap_err();
        assert_eq!(
            err,
            SurveyError::InvalidConfig {
                key: "SURVEY_START_BOUND".to_string(),
                value: "one".to_string(),
            }
        );
    }
}
