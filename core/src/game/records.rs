use serde::{Deserialize, Serialize};

use super::player::{InjurySeverity, MatchResult};
use crate::time::CalendarDate;

/// Category of an activity-log entry. Serialized as `MATCH_RESULT`, `INJURY` and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameEventKind {
    MatchResult,
    Injury,
    Settlement,
    OfficeUpgrade,
    TreasuryWarning,
}

/// Structured data behind a log entry's description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEventPayload {
    Match {
        player_id: u32,
        result: MatchResult,
    },
    Injury {
        player_id: u32,
        severity: InjurySeverity,
        days: u32,
        returns_on: CalendarDate,
    },
    Settlement {
        balance: i64,
        treasury_after: i64,
    },
    OfficeUpgrade {
        level: u8,
        cost: i64,
    },
    TreasuryWarning {
        projected: i64,
    },
}

/// Entry in the append-only activity log. Only `handled` ever changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    pub id: u64,
    pub kind: GameEventKind,
    pub date: CalendarDate,
    pub description: String,
    pub handled: bool,
    pub payload: GameEventPayload,
}

/// A game event before the store assigns its id.
#[derive(Debug, Clone, PartialEq)]
pub struct GameEventDraft {
    pub kind: GameEventKind,
    pub date: CalendarDate,
    pub description: String,
    pub payload: GameEventPayload,
}

impl GameEventDraft {
    pub fn into_event(self, id: u64) -> GameEvent {
        GameEvent {
            id,
            kind: self.kind,
            date: self.date,
            description: self.description,
            handled: false,
            payload: self.payload,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IncomeKind {
    Commission,
    Sponsorship,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpenseKind {
    Rent,
    Utilities,
    Maintenance,
    Salaries,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeItem {
    pub kind: IncomeKind,
    pub label: String,
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseItem {
    pub kind: ExpenseKind,
    pub amount: i64,
}

/// One month's settlement. `balance` is always `total_income - total_expenses`,
/// and it is the single delta the treasury receives for the month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyReport {
    pub date: CalendarDate,
    pub office_level: u8,
    pub income: Vec<IncomeItem>,
    pub expenses: Vec<ExpenseItem>,
    pub total_income: i64,
    pub total_expenses: i64,
    pub balance: i64,
}

impl MonthlyReport {
    /// Totals and balance are always derived from the itemised lines.
    pub fn new(
        date: CalendarDate,
        office_level: u8,
        income: Vec<IncomeItem>,
        expenses: Vec<ExpenseItem>,
    ) -> Self {
        let total_income = income.iter().map(|item| item.amount).sum();
        let total_expenses = expenses.iter().map(|item| item.amount).sum();
        Self {
            date,
            office_level,
            income,
            expenses,
            total_income,
            total_expenses,
            balance: total_income - total_expenses,
        }
    }

    pub fn expense(&self, kind: ExpenseKind) -> i64 {
        self.expenses
            .iter()
            .filter(|item| item.kind == kind)
            .map(|item| item.amount)
            .sum()
    }

    pub fn income(&self, kind: IncomeKind) -> i64 {
        self.income
            .iter()
            .filter(|item| item.kind == kind)
            .map(|item| item.amount)
            .sum()
    }
}

/// One line of the treasury ledger. The first entry of a game is the opening balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreasuryEntry {
    pub date: CalendarDate,
    pub delta: i64,
    pub reason: String,
}
