//! Configuration loading and typed config structures for the Crucible
//! subsystem.
//!
//! The canonical configuration lives in a YAML file supplied by the
//! trainer deployment. This module defines strongly-typed structs that
//! mirror the YAML structure, and provides a loader that reads and
//! validates the file. Every field is fixed at construction time; nothing
//! here is mutated at runtime.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crucible_rating::RatingConfig;
use crucible_shaping::{BonusWeights, ShaperConfig};
use crucible_types::{Competitor, ResourceKind};

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The parsed configuration fails a range or consistency check.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level subsystem configuration.
///
/// Mirrors the YAML structure. All fields have defaults matching a
/// plain training run: shaping enabled with every bonus at 0, team mode
/// off, standard horizons, no evaluation roster.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// Reward-shaping settings (bonus weights, enable toggle).
    #[serde(default)]
    pub reward: RewardConfig,

    /// Team reward pooling settings.
    #[serde(default)]
    pub team: TeamConfig,

    /// Episode horizon and termination settings.
    #[serde(default)]
    pub episode: EpisodeConfig,

    /// Skill-rating settings and the evaluation roster.
    #[serde(default)]
    pub rating: SkillRatingConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a range or consistency check fails.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a range or consistency check fails.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every range and consistency constraint.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first violated
    /// constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Resource names must parse; checked here so a typo fails at load
        // time rather than silently weighing nothing.
        for name in self.reward.bonus_weights.keys() {
            parse_resource(name)?;
        }

        if !(0.0..=1.0).contains(&self.team.team_spirit) {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "team.team_spirit must be within [0, 1], got {}",
                    self.team.team_spirit
                ),
            });
        }

        if self.episode.train_horizon == 0 {
            return Err(ConfigError::Invalid {
                reason: "episode.train_horizon must be at least 1".to_owned(),
            });
        }
        if self.episode.evaluation_horizon == 0 {
            return Err(ConfigError::Invalid {
                reason: "episode.evaluation_horizon must be at least 1".to_owned(),
            });
        }
        parse_mode(&self.episode.mode)?;

        self.rating
            .model
            .validate()
            .map_err(|source| ConfigError::Invalid {
                reason: source.to_string(),
            })?;

        Ok(())
    }

    /// The shaper configuration expressed in domain types.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for an unknown resource name.
    pub fn shaper_config(&self) -> Result<ShaperConfig, ConfigError> {
        let mut weights = BonusWeights::disabled();
        for (name, weight) in &self.reward.bonus_weights {
            weights = weights.with_weight(parse_resource(name)?, *weight);
        }
        Ok(ShaperConfig {
            custom_reward_enabled: self.reward.custom_reward_enabled,
            bonus_weights: weights,
        })
    }

    /// The evaluation roster expressed in domain types.
    pub fn roster(&self) -> Vec<Competitor> {
        self.rating
            .roster
            .iter()
            .map(|entry| Competitor {
                id: entry.name.as_str().into(),
                scripted: entry.scripted,
            })
            .collect()
    }
}

/// Reward-shaping settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RewardConfig {
    /// When false, raw environment rewards pass through unshaped.
    #[serde(default = "default_true")]
    pub custom_reward_enabled: bool,

    /// Bonus weight per resource name (snake_case, e.g. `melee_exp`).
    /// Resources never listed weigh 0.
    #[serde(default)]
    pub bonus_weights: BTreeMap<String, f64>,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            custom_reward_enabled: true,
            bonus_weights: BTreeMap::new(),
        }
    }
}

/// Team reward pooling settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TeamConfig {
    /// Whether team (cooperative) mode is enabled.
    #[serde(default)]
    pub cooperative: bool,

    /// Interpolation weight between individual (0) and team-pooled (1)
    /// rewards.
    #[serde(default)]
    pub team_spirit: f64,
}

impl Default for TeamConfig {
    fn default() -> Self {
        Self {
            cooperative: false,
            team_spirit: 0.0,
        }
    }
}

/// Episode horizon and termination settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EpisodeConfig {
    /// Episode horizon in ticks during training.
    #[serde(default = "default_train_horizon")]
    pub train_horizon: u64,

    /// Episode horizon in ticks during evaluation.
    #[serde(default = "default_evaluation_horizon")]
    pub evaluation_horizon: u64,

    /// Population floor: the episode ends once the live agent count drops
    /// to this value or below. 0 means extinction only.
    #[serde(default)]
    pub early_stop_agent_count: u32,

    /// Run mode: `train`, `evaluation`, or `render`.
    #[serde(default = "default_mode")]
    pub mode: String,
}

impl Default for EpisodeConfig {
    fn default() -> Self {
        Self {
            train_horizon: default_train_horizon(),
            evaluation_horizon: default_evaluation_horizon(),
            early_stop_agent_count: 0,
            mode: default_mode(),
        }
    }
}

/// Skill-rating settings and the evaluation roster.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SkillRatingConfig {
    /// Rating model parameters (priors, beta, tau, scripted overrides).
    #[serde(flatten)]
    pub model: RatingConfig,

    /// The evaluation roster: every competitor identity that will appear
    /// in rank metrics, with scripted baselines flagged.
    #[serde(default)]
    pub roster: Vec<RosterEntry>,
}

impl SkillRatingConfig {
    /// The rating model parameters expressed in domain types.
    pub fn to_rating_config(&self) -> RatingConfig {
        self.model.clone()
    }
}

/// One competitor entry in the evaluation roster.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RosterEntry {
    /// The competitor's display name (also the metric key suffix).
    pub name: String,

    /// Whether this competitor is a scripted fixed-strength baseline.
    #[serde(default)]
    pub scripted: bool,
}

/// Parse a snake_case resource name into a typed [`ResourceKind`].
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] if the name does not match a known
/// resource.
pub fn parse_resource(name: &str) -> Result<ResourceKind, ConfigError> {
    match name {
        "gold" => Ok(ResourceKind::Gold),
        "health" => Ok(ResourceKind::Health),
        "food" => Ok(ResourceKind::Food),
        "water" => Ok(ResourceKind::Water),
        "melee_exp" => Ok(ResourceKind::MeleeExp),
        "range_exp" => Ok(ResourceKind::RangeExp),
        "mage_exp" => Ok(ResourceKind::MageExp),
        "fishing_exp" => Ok(ResourceKind::FishingExp),
        "herbalism_exp" => Ok(ResourceKind::HerbalismExp),
        "prospecting_exp" => Ok(ResourceKind::ProspectingExp),
        "carving_exp" => Ok(ResourceKind::CarvingExp),
        "alchemy_exp" => Ok(ResourceKind::AlchemyExp),
        other => Err(ConfigError::Invalid {
            reason: format!("unknown resource: {other}"),
        }),
    }
}

/// Parse a run-mode name into a typed [`crucible_types::RunMode`].
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] if the name does not match a known
/// mode.
pub fn parse_mode(name: &str) -> Result<crucible_types::RunMode, ConfigError> {
    match name.to_lowercase().as_str() {
        "train" | "training" => Ok(crucible_types::RunMode::Train),
        "evaluation" | "evaluate" | "eval" => Ok(crucible_types::RunMode::Evaluation),
        "render" => Ok(crucible_types::RunMode::Render),
        other => Err(ConfigError::Invalid {
            reason: format!("unknown run mode: {other}"),
        }),
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

const fn default_true() -> bool {
    true
}

const fn default_train_horizon() -> u64 {
    1024
}

const fn default_evaluation_horizon() -> u64 {
    2048
}

fn default_mode() -> String {
    "train".to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.reward.custom_reward_enabled);
        assert!(!config.team.cooperative);
        assert_eq!(config.episode.train_horizon, 1024);
        assert_eq!(config.episode.evaluation_horizon, 2048);
        assert!(config.rating.roster.is_empty());
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
reward:
  custom_reward_enabled: true
  bonus_weights:
    gold: 1.0
    health: 0.05
    fishing_exp: 0.25

team:
  cooperative: true
  team_spirit: 0.5

episode:
  train_horizon: 100
  evaluation_horizon: 250
  early_stop_agent_count: 2
  mode: "evaluation"

rating:
  prior_mean: 1000.0
  prior_stddev: 66.7
  beta: 33.3
  tau: 0.67
  scripted_mean: 1500.0
  scripted_stddev: 1.0
  roster:
    - name: "policy_0"
    - name: "Forage"
      scripted: true
"#;

        let config = SimulationConfig::parse(yaml).unwrap();
        assert!(config.team.cooperative);
        assert!((config.team.team_spirit - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.episode.train_horizon, 100);
        assert_eq!(config.episode.mode, "evaluation");
        assert_eq!(config.rating.roster.len(), 2);
        assert!(config.rating.roster.get(1).unwrap().scripted);

        let shaper = config.shaper_config().unwrap();
        assert!((shaper.bonus_weights.weight(ResourceKind::Gold) - 1.0).abs() < f64::EPSILON);
        assert!(
            (shaper.bonus_weights.weight(ResourceKind::FishingExp) - 0.25).abs() < f64::EPSILON
        );
        assert!(shaper.bonus_weights.weight(ResourceKind::Water).abs() < f64::EPSILON);
    }

    #[test]
    fn parse_minimal_yaml() {
        let yaml = "episode:\n  train_horizon: 7\n";
        let config = SimulationConfig::parse(yaml).unwrap();

        // Horizon is overridden
        assert_eq!(config.episode.train_horizon, 7);
        // Everything else uses defaults
        assert_eq!(config.episode.evaluation_horizon, 2048);
        assert!(config.reward.bonus_weights.is_empty());
    }

    #[test]
    fn parse_empty_mapping_uses_defaults() {
        let config = SimulationConfig::parse("{}");
        assert!(config.is_ok());
    }

    #[test]
    fn unknown_resource_is_rejected() {
        let yaml = "reward:\n  bonus_weights:\n    mana: 1.0\n";
        let result = SimulationConfig::parse(yaml);
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn out_of_range_team_spirit_is_rejected() {
        let yaml = "team:\n  cooperative: true\n  team_spirit: 1.5\n";
        let result = SimulationConfig::parse(yaml);
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn zero_horizon_is_rejected() {
        let yaml = "episode:\n  train_horizon: 0\n";
        let result = SimulationConfig::parse(yaml);
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let yaml = "episode:\n  mode: \"replay\"\n";
        let result = SimulationConfig::parse(yaml);
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn mode_aliases_parse() {
        assert_eq!(
            parse_mode("eval").unwrap(),
            crucible_types::RunMode::Evaluation
        );
        assert_eq!(
            parse_mode("Training").unwrap(),
            crucible_types::RunMode::Train
        );
        assert_eq!(parse_mode("render").unwrap(), crucible_types::RunMode::Render);
    }

    #[test]
    fn every_resource_name_parses() {
        let names = [
            "gold",
            "health",
            "food",
            "water",
            "melee_exp",
            "range_exp",
            "mage_exp",
            "fishing_exp",
            "herbalism_exp",
            "prospecting_exp",
            "carving_exp",
            "alchemy_exp",
        ];
        for name in names {
            assert!(parse_resource(name).is_ok(), "{name}");
        }
        assert_eq!(names.len(), ResourceKind::ALL.len());
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("crucible-config.yaml");
        if path.exists() {
            let config = SimulationConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }

    #[test]
    fn roster_maps_to_competitors() {
        let yaml = r#"
rating:
  roster:
    - name: "learner"
    - name: "Combat"
      scripted: true
"#;
        let config = SimulationConfig::parse(yaml).unwrap();
        let roster = config.roster();
        assert_eq!(roster.len(), 2);
        assert!(!roster.first().unwrap().scripted);
        assert!(roster.get(1).unwrap().scripted);
        assert_eq!(roster.get(1).unwrap().id.as_str(), "Combat");
    }
}
