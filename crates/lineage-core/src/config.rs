//! Configuration loading and typed config structures for the Lineage
//! simulation.
//!
//! The canonical configuration lives in `lineage-config.yaml` at the
//! workspace root. Every section and field has a default, so an empty file
//! is a valid configuration. The lifecycle and economy sections
//! deserialize straight into the `lineage-family` tunables.

use std::path::{Path, PathBuf};

use lineage_family::{EconomyConfig, LifecycleConfig};
use lineage_types::Language;
use serde::Deserialize;

/// Errors that can occur when loading configuration or content.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read a file from disk.
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

    /// A value is out of range.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// What is wrong.
        reason: String,
    },

    /// A content catalog failed validation.
    #[error("invalid catalog: {source}")]
    Catalog {
        /// The validation failure.
        #[from]
        source: lineage_types::CatalogError,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration. Mirrors `lineage-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// New-game settings.
    #[serde(default)]
    pub world: WorldConfig,

    /// Calendar stepping.
    #[serde(default)]
    pub time: TimeConfig,

    /// Event draw and cascade limits.
    #[serde(default)]
    pub events: EventsConfig,

    /// Wages, robots, tuition, loans, bankruptcy.
    #[serde(default)]
    pub economy: EconomyConfig,

    /// Birth, partners, ageing, careers, death.
    #[serde(default)]
    pub lifecycle: LifecycleConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Headless run length.
    #[serde(default)]
    pub run: RunConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file.
    ///
    /// `LINEAGE_SEED`, when set to an integer, overrides `world.seed`.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, apply environment overrides,
    /// and validate.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.world.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.time.days_per_tick == 0 {
            return Err(ConfigError::Invalid {
                reason: "time.days_per_tick must be at least 1".to_owned(),
            });
        }
        if !(0.0..=1.0).contains(&self.events.event_chance) {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "events.event_chance must be in [0, 1], got {}",
                    self.events.event_chance
                ),
            });
        }
        if self.economy.loan_term_months <= 0 {
            return Err(ConfigError::Invalid {
                reason: "economy.loan_term_months must be positive".to_owned(),
            });
        }
        self.validate_lifecycle()
    }

    fn validate_lifecycle(&self) -> Result<(), ConfigError> {
        let life = &self.lifecycle;
        for (name, value) in [
            ("lifecycle.frailty_daily_hazard", life.frailty_daily_hazard),
            ("lifecycle.npc_major_chance", life.npc_major_chance),
            ("lifecycle.balding_chance", life.balding_chance),
            ("lifecycle.glasses_chance", life.glasses_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid {
                    reason: format!("{name} must be in [0, 1], got {value}"),
                });
            }
        }
        for (name, value) in [
            ("lifecycle.birth_multiplier_min", life.birth_multiplier_min),
            ("lifecycle.birth_multiplier_max", life.birth_multiplier_max),
            ("lifecycle.old_age_rate", life.old_age_rate),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid {
                    reason: format!("{name} must be finite and non-negative, got {value}"),
                });
            }
        }
        if life.birth_multiplier_min > life.birth_multiplier_max {
            return Err(ConfigError::Invalid {
                reason: "lifecycle.birth_multiplier_min must not exceed birth_multiplier_max"
                    .to_owned(),
            });
        }
        if life.initial_health_min > life.initial_health_max {
            return Err(ConfigError::Invalid {
                reason: "lifecycle.initial_health_min must not exceed initial_health_max"
                    .to_owned(),
            });
        }
        Ok(())
    }
}

/// New-game settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Human-readable name of the run.
    #[serde(default = "default_world_name")]
    pub name: String,

    /// Random seed; one seed replays a whole run.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Year the founder is born.
    #[serde(default = "default_start_year")]
    pub start_year: i32,

    /// Language of generated names.
    #[serde(default)]
    pub language: Language,

    /// Family fund at the start.
    #[serde(default = "default_starting_fund")]
    pub starting_fund: i64,
}

impl WorldConfig {
    /// Apply `LINEAGE_SEED` if it parses as an integer.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("LINEAGE_SEED") {
            if let Ok(seed) = val.trim().parse() {
                self.seed = seed;
            }
        }
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            seed: default_seed(),
            start_year: default_start_year(),
            language: Language::default(),
            starting_fund: default_starting_fund(),
        }
    }
}

/// Calendar stepping.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TimeConfig {
    /// Days one tick advances.
    #[serde(default = "default_days_per_tick")]
    pub days_per_tick: u32,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            days_per_tick: default_days_per_tick(),
        }
    }
}

/// Event draw parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EventsConfig {
    /// Chance per tick that a living, unblocked character draws an event.
    #[serde(default = "default_event_chance")]
    pub event_chance: f64,

    /// Most follow-up events resolved in one tick.
    #[serde(default = "default_max_cascade")]
    pub max_cascade_per_tick: u32,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            event_chance: default_event_chance(),
            max_cascade_per_tick: default_max_cascade(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default `tracing` filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Who answers events and pending choices in a headless run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChoicePolicy {
    /// Always the first option.
    First,
    /// A uniform pick with the simulation RNG.
    #[default]
    Random,
}

/// Headless run settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RunConfig {
    /// Years to simulate.
    #[serde(default = "default_years")]
    pub years: u32,

    /// Choice policy.
    #[serde(default)]
    pub choices: ChoicePolicy,

    /// YAML catalog to load instead of the built-in content.
    #[serde(default)]
    pub catalog: Option<PathBuf>,

    /// Where to write the final state as JSON, if anywhere.
    #[serde(default)]
    pub snapshot: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            years: default_years(),
            choices: ChoicePolicy::default(),
            catalog: None,
            snapshot: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

fn default_world_name() -> String {
    "lineage".to_owned()
}

const fn default_seed() -> u64 {
    42
}

const fn default_start_year() -> i32 {
    1960
}

const fn default_starting_fund() -> i64 {
    20_000
}

const fn default_days_per_tick() -> u32 {
    30
}

const fn default_event_chance() -> f64 {
    0.3
}

const fn default_max_cascade() -> u32 {
    5
}

fn default_log_level() -> String {
    "info".to_owned()
}

const fn default_years() -> u32 {
    100
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_gives_defaults() {
        let config = SimulationConfig::parse("{}").unwrap();
        let mut expected = SimulationConfig::default();
        expected.world.seed = config.world.seed;
        assert_eq!(config, expected);
        assert_eq!(config.time.days_per_tick, 30);
        assert_eq!(config.lifecycle.max_children, 6);
    }

    #[test]
    fn sections_override_defaults() {
        let yaml = r"
world:
  name: test run
  start_year: 1980
  language: vi
  starting_fund: 5000
time:
  days_per_tick: 10
events:
  event_chance: 0.5
economy:
  bankruptcy_threshold: -1000
lifecycle:
  mourning_years: 3
run:
  years: 12
  choices: first
";
        let config = SimulationConfig::parse(yaml).unwrap();
        assert_eq!(config.world.name, "test run");
        assert_eq!(config.world.start_year, 1980);
        assert_eq!(config.world.language, Language::Vi);
        assert_eq!(config.world.starting_fund, 5_000);
        assert_eq!(config.time.days_per_tick, 10);
        assert_eq!(config.economy.bankruptcy_threshold, -1_000);
        assert_eq!(config.economy.salary_base, 2_000);
        assert_eq!(config.lifecycle.mourning_years, 3);
        assert_eq!(config.lifecycle.adult_age, 18);
        assert_eq!(config.run.years, 12);
        assert_eq!(config.run.choices, ChoicePolicy::First);
        assert_eq!(config.run.catalog, None);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            SimulationConfig::parse("time:\n  days_per_tick: 0\n"),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            SimulationConfig::parse("events:\n  event_chance: 1.5\n"),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            SimulationConfig::parse("world: [unclosed"),
            Err(ConfigError::Yaml { .. })
        ));
    }

    #[test]
    fn lifecycle_values_are_checked() {
        for yaml in [
            "lifecycle:\n  birth_multiplier_max: .inf\n",
            "lifecycle:\n  birth_multiplier_min: .nan\n",
            "lifecycle:\n  birth_multiplier_min: 2.0\n  birth_multiplier_max: 1.0\n",
            "lifecycle:\n  frailty_daily_hazard: .inf\n",
            "lifecycle:\n  npc_major_chance: 1.5\n",
            "lifecycle:\n  glasses_chance: .nan\n",
            "lifecycle:\n  old_age_rate: -0.1\n",
            "lifecycle:\n  initial_health_min: 90\n  initial_health_max: 40\n",
        ] {
            assert!(
                matches!(SimulationConfig::parse(yaml), Err(ConfigError::Invalid { .. })),
                "{yaml}"
            );
        }
        let equal = "lifecycle:\n  birth_multiplier_min: 1.0\n  birth_multiplier_max: 1.0\n";
        assert!(SimulationConfig::parse(equal).is_ok());
    }

    #[test]
    fn shipped_config_parses() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../lineage-config.yaml");
        let config = SimulationConfig::from_file(&path).unwrap();
        assert!(config.time.days_per_tick >= 1);
        assert!(config.run.years > 0);
    }
}
