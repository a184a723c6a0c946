mod bootstrap;
mod constants;
pub(crate) use constants::*;
mod controller;
mod office;
mod office_event;
mod player;
mod records;
mod state;
mod store;
pub mod systems;
mod time;

pub use bootstrap::GameBuilder;
pub use controller::{AdvancePhase, ControllerSettings, TimeController};
pub use office::{OFFICE_LADDER, OfficeLevel, next_office_level, office_level};
pub use office_event::{
    Activation, Effects, EventOption, OfficeEvent, OfficeEventKind, RelationshipDelta, Sponsor,
    SponsorTier, StaffMember, StaffRole, StaffSkill,
};
pub use player::{
    Injury, InjurySeverity, MatchResult, Player, PlayerDefinition, PlayerStats, Position,
};
pub use records::{
    ExpenseItem, ExpenseKind, GameEvent, GameEventDraft, GameEventKind, GameEventPayload,
    IncomeItem, IncomeKind, MonthlyReport, TreasuryEntry,
};
pub use state::GameState;
pub use store::{ActionOutcome, GameAction, GameStore, NewGame, StateAccess};
pub use systems::tasks::DayReport;
pub use time::{ClockState, GameSpeed, SimulationClock};
