use crate::time::{CalendarDate, GameClock};

pub const DAYS_PER_WEEK: u64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    MonthlySettlement,
    WeekendMatches,
    EventCheck,
    ExpiryPrune,
    SaveCheckpoint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleSpec {
    /// Every N elapsed days, counted from the start of the clock.
    EveryDays(u64),
    Daily,
    MonthStart,
    /// Fridays and Saturdays.
    MatchDays,
}

impl ScheduleSpec {
    fn is_due(&self, elapsed_days: u64, date: &CalendarDate, next_due: u64) -> bool {
        match self {
            ScheduleSpec::EveryDays(_) => elapsed_days >= next_due,
            ScheduleSpec::Daily => true,
            ScheduleSpec::MonthStart => date.is_first_of_month(),
            ScheduleSpec::MatchDays => date.is_match_day(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledTask {
    pub kind: TaskKind,
    pub schedule_spec: ScheduleSpec,
    next_due_day: u64,
}

impl ScheduledTask {
    pub fn new(kind: TaskKind, schedule_spec: ScheduleSpec) -> Self {
        let next_due_day = match schedule_spec {
            ScheduleSpec::EveryDays(days) => days.max(1),
            _ => 0,
        };
        Self {
            kind,
            schedule_spec,
            next_due_day,
        }
    }

    fn reschedule(&mut self, elapsed_days: u64) {
        if let ScheduleSpec::EveryDays(days) = self.schedule_spec {
            self.next_due_day = elapsed_days + days.max(1);
        }
    }
}

/// Day-granular task table. Ready tasks come back in registration order, which is
/// the order a tick runs them in.
#[derive(Default, Debug, Clone)]
pub struct Scheduler {
    tasks: Vec<ScheduledTask>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// The standard tick pipeline: settlement, weekend fixtures, event check,
    /// expiry pruning, then the periodic save.
    pub fn with_core_tasks(save_interval_days: u64) -> Self {
        let mut scheduler = Self::new();
        scheduler.schedule(ScheduledTask::new(
            TaskKind::MonthlySettlement,
            ScheduleSpec::MonthStart,
        ));
        scheduler.schedule(ScheduledTask::new(
            TaskKind::WeekendMatches,
            ScheduleSpec::MatchDays,
        ));
        scheduler.schedule(ScheduledTask::new(TaskKind::EventCheck, ScheduleSpec::Daily));
        scheduler.schedule(ScheduledTask::new(TaskKind::ExpiryPrune, ScheduleSpec::Daily));
        scheduler.schedule(ScheduledTask::new(
            TaskKind::SaveCheckpoint,
            ScheduleSpec::EveryDays(save_interval_days),
        ));
        scheduler
    }

    pub fn schedule(&mut self, task: ScheduledTask) {
        self.tasks.push(task);
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn next_ready_tasks(&mut self, clock: &GameClock, date: &CalendarDate) -> Vec<TaskKind> {
        let elapsed = clock.elapsed_days();
        let mut ready = Vec::new();
        for task in self.tasks.iter_mut() {
            if task.schedule_spec.is_due(elapsed, date, task.next_due_day) {
                task.reschedule(elapsed);
                ready.push(task.kind);
            }
        }
        ready
    }

    /// Days until the next interval-based task fires, if any is registered.
    pub fn days_until_next_interval(&self, clock: &GameClock) -> Option<u64> {
        self.tasks
            .iter()
            .filter(|task| matches!(task.schedule_spec, ScheduleSpec::EveryDays(_)))
            .map(|task| task.next_due_day.saturating_sub(clock.elapsed_days()))
            .min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_start_and_match_days_follow_the_calendar() {
        let mut scheduler = Scheduler::with_core_tasks(DAYS_PER_WEEK);
        let mut clock = GameClock::new();
        clock.advance_day();
        // 2024-03-01 is a Friday and the first of the month.
        let date = CalendarDate::new(2024, 3, 1).unwrap();
        let ready = scheduler.next_ready_tasks(&clock, &date);
        assert_eq!(
            ready,
            vec![
                TaskKind::MonthlySettlement,
                TaskKind::WeekendMatches,
                TaskKind::EventCheck,
                TaskKind::ExpiryPrune,
            ]
        );
    }

    #[test]
    fn interval_task_fires_every_n_days() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(ScheduledTask::new(
            TaskKind::SaveCheckpoint,
            ScheduleSpec::EveryDays(7),
        ));
        let mut clock = GameClock::new();
        let mut date = CalendarDate::new(2024, 1, 1).unwrap();
        let mut fired_on = Vec::new();
        for _ in 0..21 {
            clock.advance_day();
            date = date.next_day().unwrap();
            if !scheduler.next_ready_tasks(&clock, &date).is_empty() {
                fired_on.push(clock.elapsed_days());
            }
        }
        assert_eq!(fired_on, vec![7, 14, 21]);
        assert_eq!(scheduler.days_until_next_interval(&clock), Some(7));
    }
}
