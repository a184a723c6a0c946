use anyhow::{Result, ensure};
use rand::{SeedableRng, rngs::StdRng};

use super::controller::{ControllerSettings, TimeController};
use super::office::office_level;
use super::player::PlayerDefinition;
use super::state::GameState;
use super::store::GameStore;
use crate::collaborators::{
    JsonFileStore, NoopPersistence, NullTimer, Payroll, Persistence, StaffPayroll, TickTimer,
};
use crate::config::SimulationConfig;

/// Assembles a [`TimeController`] from configuration, a roster and optional
/// collaborators. Without overrides it uses entropy for the RNG, pays staff through
/// [`StaffPayroll`], saves to `save_path` when one is configured, and never ticks
/// on its own.
pub struct GameBuilder {
    config: SimulationConfig,
    roster: Vec<PlayerDefinition>,
    rng: StdRng,
    saved_state: Option<GameState>,
    persistence: Option<Box<dyn Persistence>>,
    payroll: Box<dyn Payroll>,
    timer: Box<dyn TickTimer>,
}

impl GameBuilder {
    pub fn new(config: SimulationConfig, roster: Vec<PlayerDefinition>) -> Self {
        Self {
            config,
            roster,
            rng: StdRng::from_entropy(),
            saved_state: None,
            persistence: None,
            payroll: Box::new(StaffPayroll),
            timer: Box::new(NullTimer),
        }
    }

    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn with_seed(self, seed: u64) -> Self {
        self.with_rng(StdRng::seed_from_u64(seed))
    }

    /// Continues from a checkpoint instead of the configured starting values.
    pub fn with_saved_state(mut self, state: GameState) -> Self {
        self.saved_state = Some(state);
        self
    }

    pub fn with_persistence(mut self, persistence: impl Persistence + 'static) -> Self {
        self.persistence = Some(Box::new(persistence));
        self
    }

    pub fn with_payroll(mut self, payroll: impl Payroll + 'static) -> Self {
        self.payroll = Box::new(payroll);
        self
    }

    pub fn with_timer(mut self, timer: impl TickTimer + 'static) -> Self {
        self.timer = Box::new(timer);
        self
    }

    pub fn build(self) -> Result<TimeController> {
        self.config.validate()?;
        let GameBuilder {
            config,
            roster,
            rng,
            saved_state,
            persistence,
            payroll,
            timer,
        } = self;

        let store = match saved_state {
            Some(state) => GameStore::from_state(state),
            None => {
                validate_roster(&config, &roster)?;
                GameStore::new(config.new_game(roster))
            }
        };
        let persistence: Box<dyn Persistence> = match (persistence, &config.save_path) {
            (Some(persistence), _) => persistence,
            (None, Some(path)) => Box::new(JsonFileStore::new(path.clone())),
            (None, None) => Box::new(NoopPersistence),
        };
        let settings = ControllerSettings {
            base_tick: config.base_tick(),
            event_daily_probability: config.event_daily_probability,
            event_expiry_days: config.event_expiry_days,
            save_interval_days: config.save_interval_days,
        };
        Ok(TimeController::new(
            store, rng, settings, persistence, payroll, timer,
        ))
    }
}

fn validate_roster(config: &SimulationConfig, roster: &[PlayerDefinition]) -> Result<()> {
    let office = office_level(config.office_level);
    ensure!(
        roster.len() <= office.max_players,
        "the {} holds at most {} players but the roster has {}",
        office.name,
        office.max_players,
        roster.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::embedded_roster;
    use crate::game::player::Position;

    fn definition(idx: usize) -> PlayerDefinition {
        PlayerDefinition {
            name: format!("Player {idx}"),
            position: Position::FullBack,
            age: 24,
            potential: 70,
            market_value: 500_000,
        }
    }

    #[test]
    fn builds_from_embedded_defaults() {
        let controller = GameBuilder::new(SimulationConfig::default(), embedded_roster().unwrap())
            .with_seed(3)
            .build()
            .unwrap();
        let state = controller.state();
        assert_eq!(state.treasury(), 50_000);
        assert_eq!(state.players().len(), embedded_roster().unwrap().len());
        assert_eq!(state.treasury_ledger().len(), 1);
    }

    #[test]
    fn oversized_roster_is_rejected() {
        let roster = (0..6).map(definition).collect();
        let result = GameBuilder::new(SimulationConfig::default(), roster).build();
        assert!(result.is_err());
    }

    #[test]
    fn saved_state_wins_over_config() {
        let first = GameBuilder::new(SimulationConfig::default(), vec![definition(1)])
            .with_seed(1)
            .build()
            .unwrap();
        let saved = first.state().clone();
        let config = SimulationConfig {
            starting_treasury: 1,
            ..SimulationConfig::default()
        };
        let resumed = GameBuilder::new(config, Vec::new())
            .with_saved_state(saved.clone())
            .build()
            .unwrap();
        assert_eq!(resumed.state(), &saved);
    }
}
