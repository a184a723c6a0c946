use thiserror::Error;

/// Rejections the caller can react to synchronously.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("event {event_id} has no option {option_id}")]
    UnknownOption { event_id: u64, option_id: String },

    #[error("event {0} has already been handled")]
    AlreadyHandled(u64),

    #[error("event {0} has expired")]
    Expired(u64),

    #[error("no office event with id {0}")]
    UnknownEvent(u64),

    #[error("no game event with id {0}")]
    UnknownGameEvent(u64),

    #[error("no player with id {0}")]
    UnknownPlayer(u32),

    #[error("cannot pick from an empty candidate list")]
    EmptyInput,

    #[error("game speed must be between 1 and 4, got {0}")]
    InvalidSpeed(u8),

    #[error("the office is already at the top level")]
    MaxOfficeLevel,

    #[error(
        "upgrading to level {level} needs {required_treasury} in treasury and \
         {required_reputation} reputation"
    )]
    UpgradeLocked {
        level: u8,
        required_treasury: i64,
        required_reputation: i32,
    },
}

/// The office level caps how many clients and staff the agency can hold.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CapacityError {
    #[error("roster is full ({limit} players)")]
    RosterFull { limit: usize },

    #[error("staff is full ({limit} members)")]
    StaffFull { limit: usize },
}

/// Failures raised by persistence or payroll backends.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("collaborator unavailable: {0}")]
    Unavailable(String),
}

/// Every error the core returns. Validation and capacity errors leave the state
/// untouched; collaborator failures never appear here because a tick turns them
/// into [`StateWarning`]s.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Capacity(#[from] CapacityError),

    /// A day advance or speed change arrived while a day was still running.
    #[error("a day advance is already in progress")]
    AdvanceInProgress,

    #[error("the calendar cannot advance past {0}")]
    CalendarOverflow(chrono::NaiveDate),

    /// Days completed before the failure stay applied.
    #[error("week advance stopped after {completed_days} day(s): {source}")]
    WeekInterrupted {
        completed_days: usize,
        #[source]
        source: Box<CoreError>,
    },
}

/// Non-fatal conditions surfaced alongside a tick's results.
#[derive(Debug, Clone, PartialEq)]
pub enum StateWarning {
    NegativeTreasury { projected: i64 },
    PersistenceFailed(String),
    PayrollFailed(String),
}

impl std::fmt::Display for StateWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StateWarning::NegativeTreasury { projected } => {
                write!(f, "treasury is projected negative after settlement: {projected}")
            }
            StateWarning::PersistenceFailed(reason) => write!(f, "save failed: {reason}"),
            StateWarning::PayrollFailed(reason) => {
                write!(f, "payroll unavailable, salaries counted as 0: {reason}")
            }
        }
    }
}
