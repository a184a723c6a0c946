use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, ValidationError};
use crate::{CalendarDate, GameClock, Scheduler, TaskKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum GameSpeed {
    #[default]
    Normal = 1,
    Fast = 2,
    Faster = 3,
    Fastest = 4,
}

impl GameSpeed {
    pub fn multiplier(&self) -> u8 {
        *self as u8
    }

    /// Wall-clock interval between autonomous ticks at this speed.
    pub fn tick_interval(&self, base_tick: Duration) -> Duration {
        base_tick / self.multiplier() as u32
    }
}

impl TryFrom<u8> for GameSpeed {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(GameSpeed::Normal),
            2 => Ok(GameSpeed::Fast),
            3 => Ok(GameSpeed::Faster),
            4 => Ok(GameSpeed::Fastest),
            other => Err(ValidationError::InvalidSpeed(other)),
        }
    }
}

impl From<GameSpeed> for u8 {
    fn from(speed: GameSpeed) -> Self {
        speed.multiplier()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockState {
    Running,
    Paused,
}

/// Game calendar plus the running state and speed the timer is driven by. The
/// scheduler it carries decides which tasks each advanced day triggers.
pub struct SimulationClock {
    clock: GameClock,
    calendar: CalendarDate,
    speed: GameSpeed,
    state: ClockState,
    scheduler: Scheduler,
}

pub(crate) struct TickOutcome {
    pub date: CalendarDate,
    pub ready_tasks: Vec<TaskKind>,
}

impl SimulationClock {
    pub fn new(start: CalendarDate, scheduler: Scheduler) -> Self {
        Self {
            clock: GameClock::new(),
            calendar: start,
            speed: GameSpeed::default(),
            state: ClockState::Running,
            scheduler,
        }
    }

    pub fn calendar_date(&self) -> CalendarDate {
        self.calendar
    }

    pub fn elapsed_days(&self) -> u64 {
        self.clock.elapsed_days()
    }

    pub fn speed(&self) -> GameSpeed {
        self.speed
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == ClockState::Running
    }

    pub fn days_until_save(&self) -> Option<u64> {
        self.scheduler.days_until_next_interval(&self.clock)
    }

    pub(crate) fn set_speed(&mut self, speed: GameSpeed) {
        self.speed = speed;
    }

    pub(crate) fn set_state(&mut self, state: ClockState) {
        self.state = state;
    }

    /// Moves the calendar forward by exactly one day and collects the tasks due on it.
    pub(crate) fn advance(&mut self) -> Result<TickOutcome, CoreError> {
        let next = self
            .calendar
            .next_day()
            .ok_or(CoreError::CalendarOverflow(self.calendar.naive()))?;
        self.calendar = next;
        self.clock.advance_day();
        let ready_tasks = self.scheduler.next_ready_tasks(&self.clock, &self.calendar);
        Ok(TickOutcome {
            date: next,
            ready_tasks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_rejects_out_of_range_values() {
        assert_eq!(GameSpeed::try_from(3), Ok(GameSpeed::Faster));
        assert_eq!(GameSpeed::try_from(0), Err(ValidationError::InvalidSpeed(0)));
        assert_eq!(GameSpeed::try_from(5), Err(ValidationError::InvalidSpeed(5)));
    }

    #[test]
    fn tick_interval_divides_base_tick() {
        let base = Duration::from_millis(1_000);
        assert_eq!(GameSpeed::Normal.tick_interval(base), base);
        assert_eq!(GameSpeed::Fast.tick_interval(base), Duration::from_millis(500));
        assert_eq!(GameSpeed::Fastest.tick_interval(base), Duration::from_millis(250));
    }

    #[test]
    fn advance_moves_one_day_and_reports_month_start() {
        let start = CalendarDate::new(2024, 1, 31).unwrap();
        let mut clock = SimulationClock::new(start, Scheduler::with_core_tasks(7));
        let tick = clock.advance().unwrap();
        assert_eq!(tick.date, CalendarDate::new(2024, 2, 1).unwrap());
        assert!(tick.ready_tasks.contains(&TaskKind::MonthlySettlement));
        assert_eq!(clock.elapsed_days(), 1);
    }
}
