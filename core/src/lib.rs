pub mod collaborators;
pub mod config;
pub mod error;
mod game;
pub mod outcome;
mod scheduler;
mod time;

pub use error::{CapacityError, CollaboratorError, CoreError, StateWarning, ValidationError};
pub use game::{
    Activation, ActionOutcome, AdvancePhase, ClockState, ControllerSettings, DayReport, Effects,
    EventOption, ExpenseItem, ExpenseKind, GameAction, GameBuilder, GameEvent, GameEventDraft,
    GameEventKind, GameEventPayload, GameSpeed, GameState, GameStore, IncomeItem, IncomeKind,
    Injury, InjurySeverity, MatchResult, MonthlyReport, NewGame, OFFICE_LADDER, OfficeEvent,
    OfficeEventKind, OfficeLevel, Player, PlayerDefinition, PlayerStats, Position,
    RelationshipDelta, SimulationClock, Sponsor, SponsorTier, StaffMember, StaffRole, StaffSkill,
    StateAccess, TimeController, TreasuryEntry, next_office_level, office_level, systems,
};
pub use scheduler::{DAYS_PER_WEEK, ScheduleSpec, ScheduledTask, Scheduler, TaskKind};
pub use time::{CalendarDate, GameClock};
