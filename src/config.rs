use crate::core::questionnaire::Questionnaire;
use crate::core::score::Question;
use crate::presets;
use anyhow::{Context, Result, bail};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CONFIG_FILE_NAME: &str = "readycheck.toml";

static QUESTION_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.-]+$").expect("valid question id regex"));

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub source: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub questionnaires: Vec<QuestionnaireConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            questionnaires: presets::all_presets()
                .iter()
                .map(|preset| QuestionnaireConfig {
                    name: preset.name().to_string(),
                    title: preset.title().to_string(),
                    questions: preset.questions(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub default_set: String,
    pub min_score: f64,
    pub story_points_from: f64,
    pub json: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_set: "grooming".to_string(),
            min_score: 0.0,
            story_points_from: 75.0,
            json: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionnaireConfig {
    pub name: String,
    #[serde(default)]
    pub title: String,
    pub questions: Vec<Question>,
}

impl QuestionnaireConfig {
    pub fn build(&self) -> Result<Questionnaire> {
        for question in &self.questions {
            if let Some(id) = &question.id {
                if !QUESTION_ID_RE.is_match(id) {
                    bail!(
                        "questionnaire '{}': invalid question id '{}' (use letters, digits, '.', '_' or '-')",
                        self.name,
                        id
                    );
                }
            }
        }

        let title = if self.title.is_empty() {
            self.name.clone()
        } else {
            self.title.clone()
        };
        Questionnaire::new(self.name.clone(), title, self.questions.clone())
            .with_context(|| format!("invalid questionnaire '{}'", self.name))
    }
}

impl Config {
    /// Config sets first, then built-in presets not shadowed by name.
    pub fn available_sets(&self) -> Vec<String> {
        let mut names: Vec<String> = self.questionnaires.iter().map(|q| q.name.clone()).collect();
        for preset in presets::all_presets() {
            if !names.iter().any(|name| name.eq_ignore_ascii_case(preset.name())) {
                names.push(preset.name().to_string());
            }
        }
        names
    }

    pub fn questionnaire(&self, name: Option<&str>) -> Result<Questionnaire> {
        let name = name.unwrap_or(&self.general.default_set);

        if let Some(set) = self
            .questionnaires
            .iter()
            .find(|set| set.name.eq_ignore_ascii_case(name))
        {
            return set.build();
        }

        if let Some(preset) = presets::find_preset(name) {
            return preset
                .questionnaire()
                .with_context(|| format!("invalid built-in questionnaire '{}'", name));
        }

        bail!(
            "unknown questionnaire '{}' (available: {})",
            name,
            self.available_sets().join(", ")
        )
    }

    fn validate(&self) -> Result<()> {
        if !self.general.min_score.is_finite() || !(0.0..=100.0).contains(&self.general.min_score)
        {
            bail!(
                "general.min_score must be between 0 and 100, got {}",
                self.general.min_score
            );
        }
        if !self.general.story_points_from.is_finite()
            || !(0.0..=100.0).contains(&self.general.story_points_from)
        {
            bail!(
                "general.story_points_from must be between 0 and 100, got {}",
                self.general.story_points_from
            );
        }

        let mut seen = Vec::new();
        for set in &self.questionnaires {
            let lowered = set.name.to_ascii_lowercase();
            if seen.contains(&lowered) {
                bail!("questionnaire '{}' is defined more than once", set.name);
            }
            seen.push(lowered);
            set.build()?;
        }

        Ok(())
    }
}

pub fn load_config(cli_config_path: Option<&Path>, cwd: &Path) -> Result<LoadedConfig> {
    if let Some(path) = cli_config_path {
        if !path.exists() {
            bail!(
                "config file not found at {} (passed with --config)",
                path.display()
            );
        }

        return Ok(LoadedConfig {
            config: read_config(path)?,
            source: Some(path.to_path_buf()),
        });
    }

    let local_path = cwd.join(CONFIG_FILE_NAME);
    if local_path.exists() {
        return Ok(LoadedConfig {
            config: read_config(&local_path)?,
            source: Some(local_path),
        });
    }

    debug!("no {} found, using built-in defaults", CONFIG_FILE_NAME);
    Ok(LoadedConfig {
        config: Config::default(),
        source: None,
    })
}

pub fn write_default_config(path: &Path) -> Result<()> {
    if path.exists() {
        bail!(
            "refusing to overwrite existing config file: {}",
            path.display()
        );
    }

    let content = default_config_toml()?;
    fs::write(path, content).with_context(|| format!("failed writing {}", path.display()))?;
    Ok(())
}

pub fn default_config_toml() -> Result<String> {
    toml::to_string_pretty(&Config::default()).context("failed to serialize default config")
}

fn read_config(path: &Path) -> Result<Config> {
    debug!(path = %path.display(), "reading config");
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed reading config file {}", path.display()))?;
    let config = toml::from_str::<Config>(&content)
        .with_context(|| format!("failed parsing config file {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("invalid config file {}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let content = default_config_toml().unwrap();
        let parsed: Config = toml::from_str(&content).unwrap();
        parsed.validate().unwrap();
        assert_eq!(parsed.general.default_set, "grooming");
        assert_eq!(parsed.questionnaires.len(), presets::all_presets().len());
        assert_eq!(parsed.questionnaire(None).unwrap().len(), 10);
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let parsed: Config = toml::from_str("[general]\nmin_score = 60.0\n").unwrap();
        assert_eq!(parsed.general.min_score, 60.0);
        assert_eq!(parsed.general.story_points_from, 75.0);
        assert_eq!(parsed.questionnaire(Some("devops")).unwrap().len(), 24);
    }

    #[test]
    fn config_sets_shadow_presets() {
        let parsed: Config = toml::from_str(
            r#"
[[questionnaires]]
name = "grooming"
title = "Slim grooming"

[[questionnaires.questions]]
id = "AC"
text = "Acceptance criteria defined?"
weight = 2.0
category = "requirements"
"#,
        )
        .unwrap();
        parsed.validate().unwrap();

        let questionnaire = parsed.questionnaire(None).unwrap();
        assert_eq!(questionnaire.title(), "Slim grooming");
        assert_eq!(questionnaire.len(), 1);
        assert_eq!(parsed.available_sets(), ["grooming", "devops"]);
    }

    #[test]
    fn rejects_invalid_sets() {
        let zero_weight: Config = toml::from_str(
            r#"
[[questionnaires]]
name = "broken"
[[questionnaires.questions]]
text = "Anything?"
weight = 0.0
category = "x"
"#,
        )
        .unwrap();
        assert!(zero_weight.validate().is_err());

        let bad_id: Config = toml::from_str(
            r#"
[[questionnaires]]
name = "broken"
[[questionnaires.questions]]
id = "has space"
text = "Anything?"
weight = 1.0
category = "x"
"#,
        )
        .unwrap();
        assert!(bad_id.validate().is_err());

        let bad_gate: Config = toml::from_str("[general]\nmin_score = 120.0\n").unwrap();
        assert!(bad_gate.validate().is_err());
    }

    #[test]
    fn unknown_set_lists_available_names() {
        let err = Config::default().questionnaire(Some("nope")).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("unknown questionnaire 'nope'"));
        assert!(message.contains("grooming"));
    }

    #[test]
    fn load_prefers_explicit_then_local_then_defaults() {
        let dir = tempfile::TempDir::new().unwrap();

        let loaded = load_config(None, dir.path()).unwrap();
        assert!(loaded.source.is_none());

        let missing = dir.path().join("missing.toml");
        assert!(load_config(Some(&missing), dir.path()).is_err());

        let local = dir.path().join(CONFIG_FILE_NAME);
        write_default_config(&local).unwrap();
        assert!(write_default_config(&local).is_err());

        let loaded = load_config(None, dir.path()).unwrap();
        assert_eq!(loaded.source.as_deref(), Some(local.as_path()));
    }
}
