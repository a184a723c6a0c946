use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::office::{OfficeLevel, office_level};
use super::office_event::{OfficeEvent, Sponsor, StaffMember};
use super::player::Player;
use super::records::{GameEvent, MonthlyReport, TreasuryEntry};
use super::time::GameSpeed;
use crate::time::CalendarDate;

/// Everything the UI reads. Only [`GameStore`](super::store::GameStore) mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub(super) date: CalendarDate,
    pub(super) speed: GameSpeed,
    pub(super) paused: bool,
    pub(super) treasury: i64,
    pub(super) treasury_ledger: Vec<TreasuryEntry>,
    pub(super) reputation: i32,
    pub(super) experience: i32,
    pub(super) office_level: u8,
    pub(super) relationships: BTreeMap<String, i32>,
    pub(super) players: Vec<Player>,
    pub(super) staff: Vec<StaffMember>,
    pub(super) sponsors: Vec<Sponsor>,
    pub(super) game_events: Vec<GameEvent>,
    pub(super) office_events: Vec<OfficeEvent>,
    pub(super) monthly_reports: Vec<MonthlyReport>,
    pub(super) next_player_id: u32,
    pub(super) next_game_event_id: u64,
    pub(super) next_office_event_id: u64,
}

impl GameState {
    pub fn date(&self) -> CalendarDate {
        self.date
    }

    pub fn speed(&self) -> GameSpeed {
        self.speed
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn treasury(&self) -> i64 {
        self.treasury
    }

    pub fn treasury_ledger(&self) -> &[TreasuryEntry] {
        &self.treasury_ledger
    }

    pub fn reputation(&self) -> i32 {
        self.reputation
    }

    pub fn experience(&self) -> i32 {
        self.experience
    }

    pub fn office_level(&self) -> u8 {
        self.office_level
    }

    pub fn office(&self) -> &'static OfficeLevel {
        office_level(self.office_level)
    }

    pub fn relationships(&self) -> &BTreeMap<String, i32> {
        &self.relationships
    }

    pub fn relationship(&self, entity_id: &str) -> i32 {
        self.relationships.get(entity_id).copied().unwrap_or(0)
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: u32) -> Option<&Player> {
        self.players.iter().find(|player| player.id == id)
    }

    pub fn staff(&self) -> &[StaffMember] {
        &self.staff
    }

    pub fn sponsors(&self) -> &[Sponsor] {
        &self.sponsors
    }

    pub fn game_events(&self) -> &[GameEvent] {
        &self.game_events
    }

    pub fn unhandled_game_events(&self) -> impl Iterator<Item = &GameEvent> {
        self.game_events.iter().filter(|event| !event.handled)
    }

    pub fn office_events(&self) -> &[OfficeEvent] {
        &self.office_events
    }

    pub fn office_event(&self, id: u64) -> Option<&OfficeEvent> {
        self.office_events.iter().find(|event| event.id == id)
    }

    /// Events that can still be resolved today.
    pub fn open_office_events(&self) -> impl Iterator<Item = &OfficeEvent> {
        let today = self.date;
        self.office_events
            .iter()
            .filter(move |event| event.is_open(&today))
    }

    pub fn monthly_reports(&self) -> &[MonthlyReport] {
        &self.monthly_reports
    }

    pub fn next_office_event_id(&self) -> u64 {
        self.next_office_event_id
    }

    /// Sum of the ledger; equals `treasury()` whenever the ledger is the only writer.
    pub fn ledger_total(&self) -> i64 {
        self.treasury_ledger.iter().map(|entry| entry.delta).sum()
    }
}
