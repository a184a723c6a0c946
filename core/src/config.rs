use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

use crate::game::{NewGame, PlayerDefinition};
use crate::time::CalendarDate;

const EMBEDDED_CONFIG: &str = include_str!("../../config/game.yaml");
const EMBEDDED_ROSTER: &str = include_str!("../../config/roster.json");

/// Starting values and tuning for a new game, read from `config/game.yaml`.
///
/// Every field has a default, so a partial file only overrides what it names.
/// `save_path` left empty disables checkpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub start_date: CalendarDate,
    pub starting_treasury: i64,
    pub starting_reputation: i32,
    pub office_level: u8,
    pub base_tick_ms: u64,
    pub event_daily_probability: f64,
    pub event_expiry_days: u64,
    pub save_interval_days: u64,
    pub save_path: Option<PathBuf>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            start_date: CalendarDate::from_start(),
            starting_treasury: 50_000,
            starting_reputation: 10,
            office_level: 1,
            base_tick_ms: crate::game::BASE_TICK_MS,
            event_daily_probability: 0.08,
            event_expiry_days: 14,
            save_interval_days: 7,
            save_path: None,
        }
    }
}

impl SimulationConfig {
    /// The configuration compiled into the crate.
    pub fn embedded() -> Result<Self> {
        Self::from_yaml_str(EMBEDDED_CONFIG).context("failed to parse the built-in game config")
    }

    /// Reads and validates a YAML file. Fields the file leaves out keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("cannot read config file {}", path.display()))?;
        Self::from_yaml_str(&raw)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            (0.0..=1.0).contains(&self.event_daily_probability),
            "event_daily_probability must be within 0..=1, got {}",
            self.event_daily_probability
        );
        ensure!(self.base_tick_ms > 0, "base_tick_ms must be positive");
        ensure!(
            self.save_interval_days > 0,
            "save_interval_days must be at least 1"
        );
        ensure!(
            (1..=5).contains(&self.office_level),
            "office_level must be within 1..=5, got {}",
            self.office_level
        );
        Ok(())
    }

    pub fn base_tick(&self) -> Duration {
        Duration::from_millis(self.base_tick_ms)
    }

    /// Starting values for a fresh store built from this configuration.
    pub fn new_game(&self, roster: Vec<PlayerDefinition>) -> NewGame {
        NewGame {
            start_date: self.start_date,
            treasury: self.starting_treasury,
            reputation: self.starting_reputation,
            office_level: self.office_level,
            roster,
        }
    }
}

pub fn embedded_roster() -> Result<Vec<PlayerDefinition>> {
    parse_roster(EMBEDDED_ROSTER).context("failed to parse the built-in roster")
}

/// Reads a JSON array of player definitions. Every entry needs a name and a potential
/// of at most 100.
pub fn load_roster(path: &Path) -> Result<Vec<PlayerDefinition>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("cannot read roster file {}", path.display()))?;
    parse_roster(&raw).with_context(|| format!("invalid roster file {}", path.display()))
}

fn parse_roster(raw: &str) -> Result<Vec<PlayerDefinition>> {
    let roster: Vec<PlayerDefinition> = serde_json::from_str(raw)?;
    for definition in &roster {
        ensure!(
            !definition.name.trim().is_empty(),
            "roster entries need a name"
        );
        ensure!(
            definition.potential <= 100,
            "{} has potential {} above 100",
            definition.name,
            definition.potential
        );
    }
    Ok(roster)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Position;

    #[test]
    fn embedded_files_parse() {
        let config = SimulationConfig::embedded().unwrap();
        assert_eq!(config.start_date, CalendarDate::new(2024, 7, 1).unwrap());
        assert_eq!(config.save_interval_days, 7);
        assert_eq!(config.base_tick(), Duration::from_millis(1_000));
        assert!(!embedded_roster().unwrap().is_empty());
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config = SimulationConfig::from_yaml_str("starting_treasury: 1234\n").unwrap();
        assert_eq!(config.starting_treasury, 1_234);
        assert_eq!(config.event_daily_probability, 0.08);
        assert_eq!(config.office_level, 1);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        assert!(SimulationConfig::from_yaml_str("event_daily_probability: 1.5\n").is_err());
        assert!(SimulationConfig::from_yaml_str("office_level: 9\n").is_err());
        assert!(SimulationConfig::from_yaml_str("save_interval_days: 0\n").is_err());
    }

    #[test]
    fn roster_file_is_loaded_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.json");
        fs::write(
            &path,
            r#"[{"name":"Rui","position":"full_back","age":19,"potential":70,"market_value":400000}]"#,
        )
        .unwrap();
        let roster = load_roster(&path).unwrap();
        assert_eq!(
            roster,
            vec![PlayerDefinition {
                name: "Rui".to_string(),
                position: Position::FullBack,
                age: 19,
                potential: 70,
                market_value: 400_000,
            }]
        );
        assert!(load_roster(&dir.path().join("missing.json")).is_err());
    }
}
