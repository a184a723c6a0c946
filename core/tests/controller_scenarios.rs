use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use agency_core::collaborators::{JsonFileStore, Persistence, TickTimer};
use agency_core::config::SimulationConfig;
use agency_core::{
    CalendarDate, CollaboratorError, CoreError, GameBuilder, GameEventKind, GameSpeed, GameState,
    PlayerDefinition, Position, StateWarning, TimeController, ValidationError,
};

#[derive(Debug, Clone, Copy, PartialEq)]
enum TimerCall {
    Start(Duration),
    Stop,
    Yield,
}

#[derive(Clone, Default)]
struct RecordingTimer {
    calls: Rc<RefCell<Vec<TimerCall>>>,
}

impl RecordingTimer {
    fn live_intervals(&self) -> i32 {
        self.calls.borrow().iter().fold(0, |live, call| match call {
            TimerCall::Start(_) => live + 1,
            TimerCall::Stop => 0,
            TimerCall::Yield => live,
        })
    }
}

impl TickTimer for RecordingTimer {
    fn start(&mut self, interval: Duration) {
        self.calls.borrow_mut().push(TimerCall::Start(interval));
    }

    fn stop(&mut self) {
        self.calls.borrow_mut().push(TimerCall::Stop);
    }

    fn yield_between_days(&mut self) {
        self.calls.borrow_mut().push(TimerCall::Yield);
    }
}

#[derive(Clone, Default)]
struct CountingStore {
    saves: Rc<RefCell<Vec<CalendarDate>>>,
    fail: bool,
}

impl Persistence for CountingStore {
    fn save_game(&mut self, state: &GameState) -> Result<(), CollaboratorError> {
        if self.fail {
            return Err(CollaboratorError::Unavailable("disk full".to_string()));
        }
        self.saves.borrow_mut().push(state.date());
        Ok(())
    }
}

fn roster() -> Vec<PlayerDefinition> {
    vec![
        PlayerDefinition {
            name: "Tiago Mendes".to_string(),
            position: Position::Striker,
            age: 20,
            potential: 84,
            market_value: 2_500_000,
        },
        PlayerDefinition {
            name: "Samuel Okoro".to_string(),
            position: Position::CentralMidfielder,
            age: 27,
            potential: 74,
            market_value: 1_200_000,
        },
    ]
}

fn config(start: CalendarDate) -> SimulationConfig {
    SimulationConfig {
        start_date: start,
        starting_treasury: 80_000,
        event_daily_probability: 0.0,
        ..SimulationConfig::default()
    }
}

fn date(y: i32, m: u32, d: u32) -> CalendarDate {
    CalendarDate::new(y, m, d).unwrap()
}

fn controller(start: CalendarDate) -> TimeController {
    GameBuilder::new(config(start), roster())
        .with_seed(2024)
        .build()
        .unwrap()
}

#[test]
fn month_boundary_produces_one_report() {
    let mut controller = controller(date(2024, 1, 31));
    let report = controller.advance_one_day().unwrap();

    assert_eq!(report.date, date(2024, 2, 1));
    let state = controller.state();
    assert_eq!(state.date(), date(2024, 2, 1));
    assert_eq!(state.monthly_reports().len(), 1);
    assert_eq!(state.monthly_reports()[0].date, date(2024, 2, 1));
    assert_eq!(report.monthly_report.as_ref(), state.monthly_reports().last());
}

#[test]
fn one_report_per_crossed_month() {
    let mut controller = controller(date(2024, 1, 15));
    for _ in 0..100 {
        controller.advance_one_day().unwrap();
    }
    // Feb 1, Mar 1 and Apr 1 fall inside the window.
    let state = controller.state();
    let dates: Vec<_> = state.monthly_reports().iter().map(|r| r.date).collect();
    assert_eq!(dates, vec![date(2024, 2, 1), date(2024, 3, 1), date(2024, 4, 1)]);
    for report in state.monthly_reports() {
        assert_eq!(report.balance, report.total_income - report.total_expenses);
    }
    assert_eq!(state.ledger_total(), state.treasury());
    let settlements = state
        .game_events()
        .iter()
        .filter(|event| event.kind == GameEventKind::Settlement)
        .count();
    assert_eq!(settlements, 3);
}

#[test]
fn set_speed_quarters_interval_and_restarts_timer_once() {
    let timer = RecordingTimer::default();
    let mut controller = GameBuilder::new(config(date(2024, 7, 1)), roster())
        .with_seed(1)
        .with_timer(timer.clone())
        .build()
        .unwrap();
    controller.start();
    assert_eq!(controller.tick_interval(), Duration::from_millis(1_000));

    assert_eq!(controller.set_speed(2).unwrap(), GameSpeed::Fast);
    assert_eq!(controller.tick_interval(), Duration::from_millis(500));
    controller.set_speed(4).unwrap();
    assert_eq!(controller.tick_interval(), Duration::from_millis(250));

    let calls = timer.calls.borrow().clone();
    assert_eq!(calls.last(), Some(&TimerCall::Start(Duration::from_millis(250))));
    assert_eq!(
        calls.iter().rev().nth(1),
        Some(&TimerCall::Stop),
        "the old interval is stopped before the new one starts"
    );
    assert_eq!(timer.live_intervals(), 1);
    assert_eq!(controller.state().speed(), GameSpeed::Fastest);
}

#[test]
fn speed_change_while_paused_leaves_timer_stopped() {
    let timer = RecordingTimer::default();
    let mut controller = GameBuilder::new(config(date(2024, 7, 1)), roster())
        .with_timer(timer.clone())
        .build()
        .unwrap();
    controller.start();
    controller.pause().unwrap();
    controller.set_speed(3).unwrap();
    assert_eq!(timer.live_intervals(), 0);

    controller.resume().unwrap();
    assert_eq!(timer.live_intervals(), 1);
    assert_eq!(
        timer.calls.borrow().last(),
        Some(&TimerCall::Start(Duration::from_millis(1_000) / 3))
    );
}

#[test]
fn week_advance_yields_between_days() {
    let timer = RecordingTimer::default();
    let mut controller = GameBuilder::new(config(date(2024, 3, 4)), roster())
        .with_seed(9)
        .with_timer(timer.clone())
        .build()
        .unwrap();
    let reports = controller.advance_one_week().unwrap();

    assert_eq!(reports.len(), 7);
    assert_eq!(controller.state().date(), date(2024, 3, 11));
    let yields = timer
        .calls
        .borrow()
        .iter()
        .filter(|call| **call == TimerCall::Yield)
        .count();
    assert_eq!(yields, 6);
    // Friday and Saturday fixtures only.
    for report in &reports {
        if report.matches_played > 0 {
            assert!(report.date.is_match_day());
        }
    }
}

#[test]
fn saves_every_seventh_day_and_survives_failures() {
    let store = CountingStore::default();
    let mut controller = GameBuilder::new(config(date(2024, 5, 1)), roster())
        .with_persistence(store.clone())
        .build()
        .unwrap();
    for _ in 0..21 {
        controller.advance_one_day().unwrap();
    }
    assert_eq!(
        *store.saves.borrow(),
        vec![date(2024, 5, 8), date(2024, 5, 15), date(2024, 5, 22)]
    );

    let mut failing = GameBuilder::new(config(date(2024, 5, 1)), roster())
        .with_persistence(CountingStore {
            fail: true,
            ..CountingStore::default()
        })
        .build()
        .unwrap();
    let reports: Vec<_> = (0..7)
        .map(|_| failing.advance_one_day().unwrap())
        .collect();
    let last = reports.last().unwrap();
    assert!(!last.saved);
    assert!(matches!(
        last.warnings.as_slice(),
        [StateWarning::PersistenceFailed(_)]
    ));
}

#[test]
fn json_checkpoint_resumes_the_game() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("agency.json");
    let mut controller = GameBuilder::new(config(date(2024, 5, 1)), roster())
        .with_seed(77)
        .with_persistence(JsonFileStore::new(&path))
        .build()
        .unwrap();
    controller.advance_one_week().unwrap();

    let saved = JsonFileStore::new(&path).load_game().unwrap().unwrap();
    assert_eq!(saved.date(), controller.state().date());
    assert_eq!(saved.treasury(), controller.state().treasury());
    assert_eq!(saved.game_events().len(), controller.state().game_events().len());
    let resumed = GameBuilder::new(SimulationConfig::default(), Vec::new())
        .with_saved_state(saved)
        .build()
        .unwrap();
    assert_eq!(resumed.state().date(), date(2024, 5, 8));
    assert_eq!(resumed.state().players().len(), 2);
}

#[test]
fn events_resolve_once_and_commands_validate() {
    let mut controller = GameBuilder::new(
        SimulationConfig {
            event_daily_probability: 1.0,
            ..config(date(2024, 6, 10))
        },
        roster(),
    )
    .with_seed(5)
    .build()
    .unwrap();
    let report = controller.advance_one_day().unwrap();
    let event_id = report.new_office_events[0];
    let option_id = controller.state().office_event(event_id).unwrap().options[1]
        .id
        .clone();

    controller.resolve_event_option(event_id, &option_id).unwrap();
    assert!(matches!(
        controller.resolve_event_option(event_id, &option_id),
        Err(CoreError::Validation(ValidationError::AlreadyHandled(id))) if id == event_id
    ));
    assert!(matches!(
        controller.resolve_event_option(event_id + 100, "accept"),
        Err(CoreError::Validation(ValidationError::UnknownEvent(_)))
    ));
    assert!(matches!(
        controller.set_speed(0),
        Err(CoreError::Validation(ValidationError::InvalidSpeed(0)))
    ));
    assert!(matches!(
        controller.acknowledge_event(999),
        Err(CoreError::Validation(ValidationError::UnknownGameEvent(999)))
    ));
}

#[test]
fn new_game_resets_clock_and_state() {
    let mut controller = controller(date(2024, 1, 31));
    controller.advance_one_week().unwrap();
    controller
        .new_game(config(date(2025, 7, 1)).new_game(Vec::new()))
        .unwrap();
    let state = controller.state();
    assert_eq!(state.date(), date(2025, 7, 1));
    assert!(state.monthly_reports().is_empty());
    assert!(state.players().is_empty());
    assert_eq!(controller.clock().elapsed_days(), 0);
}
