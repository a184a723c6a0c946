use std::time::Duration;

use rand::rngs::StdRng;
use tracing::{debug, info};

use super::office_event::Effects;
use super::player::PlayerDefinition;
use super::state::GameState;
use super::store::{ActionOutcome, GameAction, GameStore, NewGame, StateAccess};
use super::systems::events::EventSchedule;
use super::systems::tasks::{self, DayReport, TickContext};
use super::time::{ClockState, GameSpeed, SimulationClock};
use crate::collaborators::{Payroll, Persistence, TickTimer};
use crate::error::CoreError;
use crate::scheduler::DAYS_PER_WEEK;
use crate::Scheduler;

/// Re-entrancy guard for day advances. A second advance, or a speed change, while
/// a day is `Advancing` is rejected with `CoreError::AdvanceInProgress`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvancePhase {
    Idle,
    Advancing,
}

/// Tuning the controller needs beyond the initial game state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerSettings {
    pub base_tick: Duration,
    pub event_daily_probability: f64,
    pub event_expiry_days: u64,
    pub save_interval_days: u64,
}

/// Owns the clock and the store, and is the only writer of game state.
pub struct TimeController {
    clock: SimulationClock,
    store: GameStore,
    rng: StdRng,
    phase: AdvancePhase,
    settings: ControllerSettings,
    events: EventSchedule,
    persistence: Box<dyn Persistence>,
    payroll: Box<dyn Payroll>,
    timer: Box<dyn TickTimer>,
}

impl TimeController {
    pub(crate) fn new(
        store: GameStore,
        rng: StdRng,
        settings: ControllerSettings,
        persistence: Box<dyn Persistence>,
        payroll: Box<dyn Payroll>,
        timer: Box<dyn TickTimer>,
    ) -> Self {
        let mut clock = SimulationClock::new(
            store.state().date(),
            Scheduler::with_core_tasks(settings.save_interval_days),
        );
        clock.set_speed(store.state().speed());
        if store.state().is_paused() {
            clock.set_state(ClockState::Paused);
        }
        Self {
            clock,
            store,
            rng,
            phase: AdvancePhase::Idle,
            events: EventSchedule::new(settings.event_daily_probability),
            settings,
            persistence,
            payroll,
            timer,
        }
    }

    pub fn state(&self) -> &GameState {
        self.store.state()
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn phase(&self) -> AdvancePhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    /// `base_tick / speed`, the wall-clock time between autonomous days.
    pub fn tick_interval(&self) -> Duration {
        self.clock.speed().tick_interval(self.settings.base_tick)
    }

    /// Arms the autonomous timer when the clock is running. Hosts call this once
    /// after construction.
    pub fn start(&mut self) {
        if self.clock.is_running() {
            self.restart_timer();
        }
    }

    /// Stops the timer. A day already in flight still finishes.
    pub fn pause(&mut self) -> Result<(), CoreError> {
        self.timer.stop();
        self.clock.set_state(ClockState::Paused);
        self.store.dispatch(GameAction::SetPaused(true))?;
        info!(date = %self.clock.calendar_date(), "paused");
        Ok(())
    }

    pub fn resume(&mut self) -> Result<(), CoreError> {
        self.clock.set_state(ClockState::Running);
        self.store.dispatch(GameAction::SetPaused(false))?;
        self.restart_timer();
        info!(date = %self.clock.calendar_date(), "resumed");
        Ok(())
    }

    pub fn toggle_pause(&mut self, paused: bool) -> Result<(), CoreError> {
        if paused {
            self.pause()
        } else {
            self.resume()
        }
    }

    /// Changes the pace of autonomous ticks. A running timer is stopped before it is
    /// started again at the new interval.
    pub fn set_speed(&mut self, speed: u8) -> Result<GameSpeed, CoreError> {
        if self.phase == AdvancePhase::Advancing {
            return Err(CoreError::AdvanceInProgress);
        }
        let speed = GameSpeed::try_from(speed)?;
        self.clock.set_speed(speed);
        self.store.dispatch(GameAction::SetGameSpeed(speed))?;
        if self.clock.is_running() {
            self.restart_timer();
        }
        debug!(speed = speed.multiplier(), interval = ?self.tick_interval(), "speed changed");
        Ok(speed)
    }

    /// Timer callback. Ignored while paused.
    pub fn on_timer_tick(&mut self) -> Result<Option<DayReport>, CoreError> {
        if !self.clock.is_running() {
            return Ok(None);
        }
        self.advance_one_day().map(Some)
    }

    /// Runs one full day: the date moves forward, injuries heal, then the tasks due
    /// today run in order (settlement on the 1st, fixtures on Friday and Saturday,
    /// the event roll, expiry pruning, the periodic save).
    ///
    /// Collaborator failures end up in [`DayReport::warnings`]; only a calendar
    /// overflow or an overlapping call makes this return an error.
    pub fn advance_one_day(&mut self) -> Result<DayReport, CoreError> {
        if self.phase == AdvancePhase::Advancing {
            return Err(CoreError::AdvanceInProgress);
        }
        self.phase = AdvancePhase::Advancing;
        let result = self.run_day();
        self.phase = AdvancePhase::Idle;
        result
    }

    /// Seven sequential days. Not atomic: on failure the days already completed stay
    /// applied and the error says how many there were.
    pub fn advance_one_week(&mut self) -> Result<Vec<DayReport>, CoreError> {
        let mut reports = Vec::with_capacity(DAYS_PER_WEEK as usize);
        for day in 0..DAYS_PER_WEEK {
            if day > 0 {
                self.timer.yield_between_days();
            }
            match self.advance_one_day() {
                Ok(report) => reports.push(report),
                Err(err) => {
                    return Err(CoreError::WeekInterrupted {
                        completed_days: reports.len(),
                        source: Box::new(err),
                    });
                }
            }
        }
        Ok(reports)
    }

    /// Resolves an office event and returns the bundle that was applied, including
    /// the office's reputation bonus.
    pub fn resolve_event_option(
        &mut self,
        event_id: u64,
        option_id: &str,
    ) -> Result<Effects, CoreError> {
        match self.store.dispatch(GameAction::HandleEvent {
            event_id,
            option_id: option_id.to_string(),
        })? {
            ActionOutcome::EventResolved(effects) => Ok(effects),
            _ => Ok(Effects::default()),
        }
    }

    pub fn acknowledge_event(&mut self, game_event_id: u64) -> Result<(), CoreError> {
        self.store
            .dispatch(GameAction::AcknowledgeGameEvent(game_event_id))?;
        Ok(())
    }

    pub fn upgrade_office(&mut self) -> Result<u8, CoreError> {
        match self.store.dispatch(GameAction::UpgradeOffice)? {
            ActionOutcome::OfficeUpgraded(level) => Ok(level),
            _ => Ok(self.state().office_level()),
        }
    }

    /// Adds a client to the roster and returns their id. Fails with
    /// `CapacityError::RosterFull` once the office is full.
    pub fn sign_player(&mut self, definition: PlayerDefinition) -> Result<u32, CoreError> {
        match self.store.dispatch(GameAction::SignPlayer(definition))? {
            ActionOutcome::PlayerSigned(id) => {
                info!(player_id = id, "player signed");
                Ok(id)
            }
            _ => Ok(0),
        }
    }

    /// Throws the current game away and restarts the clock at the new start date.
    pub fn new_game(&mut self, setup: NewGame) -> Result<(), CoreError> {
        if self.phase == AdvancePhase::Advancing {
            return Err(CoreError::AdvanceInProgress);
        }
        self.timer.stop();
        self.store = GameStore::new(setup);
        self.clock = SimulationClock::new(
            self.store.state().date(),
            Scheduler::with_core_tasks(self.settings.save_interval_days),
        );
        info!(date = %self.clock.calendar_date(), "new game started");
        self.start();
        Ok(())
    }

    fn restart_timer(&mut self) {
        self.timer.stop();
        let interval = self.tick_interval();
        self.timer.start(interval);
    }

    fn run_day(&mut self) -> Result<DayReport, CoreError> {
        let tick = self.clock.advance()?;
        self.store.dispatch(GameAction::UpdateGameDate(tick.date))?;
        let mut report = DayReport::new(tick.date, tick.ready_tasks.clone());

        let mut ctx = TickContext {
            store: &mut self.store,
            rng: &mut self.rng,
            events: &self.events,
            event_expiry_days: self.settings.event_expiry_days,
            payroll: self.payroll.as_ref(),
            persistence: self.persistence.as_mut(),
        };
        tasks::recover_injuries(&mut ctx, &mut report)?;
        for kind in tick.ready_tasks {
            tasks::execute(kind, &mut ctx, &mut report)?;
        }
        debug!(
            date = %report.date,
            matches = report.matches_played,
            events = report.new_game_events.len(),
            "day advanced"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{NoopPersistence, NullTimer, StaffPayroll};
    use crate::time::CalendarDate;
    use rand::SeedableRng;

    fn controller(start: CalendarDate) -> TimeController {
        TimeController::new(
            GameStore::new(NewGame {
                start_date: start,
                treasury: 100_000,
                reputation: 10,
                office_level: 1,
                roster: Vec::new(),
            }),
            StdRng::seed_from_u64(4),
            ControllerSettings {
                base_tick: Duration::from_millis(1_000),
                event_daily_probability: 0.0,
                event_expiry_days: 14,
                save_interval_days: 7,
            },
            Box::new(NoopPersistence),
            Box::new(StaffPayroll),
            Box::new(NullTimer),
        )
    }

    #[test]
    fn overlapping_advance_is_rejected() {
        let mut controller = controller(CalendarDate::new(2024, 3, 3).unwrap());
        controller.phase = AdvancePhase::Advancing;
        assert!(matches!(
            controller.advance_one_day(),
            Err(CoreError::AdvanceInProgress)
        ));
        assert!(matches!(
            controller.set_speed(2),
            Err(CoreError::AdvanceInProgress)
        ));
        assert_eq!(controller.state().date(), CalendarDate::new(2024, 3, 3).unwrap());

        controller.phase = AdvancePhase::Idle;
        controller.advance_one_day().unwrap();
        assert_eq!(controller.phase(), AdvancePhase::Idle);
    }

    #[test]
    fn paused_clock_ignores_timer_but_not_manual_advance() {
        let mut controller = controller(CalendarDate::new(2024, 3, 3).unwrap());
        controller.pause().unwrap();
        assert!(controller.state().is_paused());
        assert!(controller.on_timer_tick().unwrap().is_none());
        controller.advance_one_day().unwrap();
        assert_eq!(controller.state().date(), CalendarDate::new(2024, 3, 4).unwrap());
    }

    #[test]
    fn calendar_end_interrupts_the_week() {
        let last = CalendarDate::from_naive(chrono::NaiveDate::MAX);
        let mut controller = controller(last);
        let err = controller.advance_one_week().unwrap_err();
        assert!(matches!(
            err,
            CoreError::WeekInterrupted {
                completed_days: 0,
                ..
            }
        ));
    }

    #[test]
    fn invalid_speed_is_a_validation_error() {
        let mut controller = controller(CalendarDate::new(2024, 3, 3).unwrap());
        assert!(matches!(
            controller.set_speed(7),
            Err(CoreError::Validation(_))
        ));
        assert_eq!(controller.clock().speed(), GameSpeed::Normal);
    }
}
