use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use super::office::{clamp_office_level, next_office_level};
use super::office_event::{Activation, Effects, OfficeEvent};
use super::player::{Player, PlayerDefinition};
use super::records::{GameEventDraft, GameEventKind, GameEventPayload, MonthlyReport, TreasuryEntry};
use super::state::GameState;
use super::systems::events::resolve_option;
use super::time::GameSpeed;
use super::{MAX_RELATIONSHIP, MAX_REPUTATION, MIN_RELATIONSHIP, MIN_REPUTATION};
use crate::error::{CapacityError, CoreError, ValidationError};
use crate::time::CalendarDate;

/// Commands accepted by the store. Each one is a complete, auditable mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum GameAction {
    UpdateGameDate(CalendarDate),
    SetGameSpeed(GameSpeed),
    SetPaused(bool),
    /// Ledgered change to the treasury. Saturates at the `i64` bounds.
    UpdateTreasury { delta: i64, reason: String },
    AddMonthlyReport(MonthlyReport),
    AddGameEvent(GameEventDraft),
    /// Stores an office event under a fresh id; the id it carries is ignored.
    AddEvent(OfficeEvent),
    /// Resolves an office event and applies the chosen option's effects.
    HandleEvent { event_id: u64, option_id: String },
    AcknowledgeGameEvent(u64),
    UpdatePlayer(Player),
    SignPlayer(PlayerDefinition),
    UpgradeOffice,
    PruneExpiredEvents,
    /// Counts every sponsor contract down one month and drops the finished ones.
    RenewSponsors,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    Applied,
    GameEventAdded(u64),
    OfficeEventAdded(u64),
    EventResolved(Effects),
    PlayerSigned(u32),
    OfficeUpgraded(u8),
    Pruned(usize),
    SponsorsLapsed(usize),
}

/// Read-snapshot plus dispatch: the only way subsystems touch game state.
pub trait StateAccess {
    fn snapshot(&self) -> &GameState;
    fn dispatch(&mut self, action: GameAction) -> Result<ActionOutcome, CoreError>;
}

/// Starting values for a fresh game.
#[derive(Debug, Clone)]
pub struct NewGame {
    pub start_date: CalendarDate,
    pub treasury: i64,
    pub reputation: i32,
    pub office_level: u8,
    pub roster: Vec<PlayerDefinition>,
}

#[derive(Debug, Clone)]
pub struct GameStore {
    state: GameState,
}

impl GameStore {
    /// Starts a fresh game. Players get ids from 1 in roster order, and the starting
    /// treasury becomes the first ledger entry.
    pub fn new(setup: NewGame) -> Self {
        let NewGame {
            start_date,
            treasury,
            reputation,
            office_level,
            roster,
        } = setup;
        let players: Vec<Player> = roster
            .into_iter()
            .enumerate()
            .map(|(idx, definition)| Player::from_definition(idx as u32 + 1, definition))
            .collect();
        let next_player_id = players.len() as u32 + 1;
        let state = GameState {
            date: start_date,
            speed: GameSpeed::default(),
            paused: false,
            treasury,
            treasury_ledger: vec![TreasuryEntry {
                date: start_date,
                delta: treasury,
                reason: "opening balance".to_string(),
            }],
            reputation: reputation.clamp(MIN_REPUTATION, MAX_REPUTATION),
            experience: 0,
            office_level: clamp_office_level(office_level),
            relationships: BTreeMap::new(),
            players,
            staff: Vec::new(),
            sponsors: Vec::new(),
            game_events: Vec::new(),
            office_events: Vec::new(),
            monthly_reports: Vec::new(),
            next_player_id,
            next_game_event_id: 1,
            next_office_event_id: 1,
        };
        Self { state }
    }

    /// Wraps a saved checkpoint as is.
    pub fn from_state(state: GameState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn into_state(self) -> GameState {
        self.state
    }

    /// Applies a treasury change, saturating at the `i64` bounds. The ledger records
    /// the delta that actually landed so it always sums to the balance.
    fn add_treasury(&mut self, delta: i64, reason: String) {
        let before = self.state.treasury;
        self.state.treasury = before.saturating_add(delta);
        let applied = self.state.treasury - before;
        if applied != delta {
            warn!(delta, applied, %reason, "treasury change saturated");
        }
        self.state.treasury_ledger.push(TreasuryEntry {
            date: self.state.date,
            delta: applied,
            reason,
        });
    }

    fn add_game_event(&mut self, draft: GameEventDraft) -> u64 {
        let id = self.state.next_game_event_id;
        self.state.next_game_event_id += 1;
        self.state.game_events.push(draft.into_event(id));
        id
    }

    fn handle_event(&mut self, event_id: u64, option_id: &str) -> Result<Effects, CoreError> {
        let today = self.state.date;
        let staff_limit = self.state.office().max_staff;
        let staff_count = self.state.staff.len();
        let event = self
            .state
            .office_events
            .iter_mut()
            .find(|event| event.id == event_id)
            .ok_or(ValidationError::UnknownEvent(event_id))?;

        // Capacity is checked before the event flips to handled so a full office can
        // still pick the other option later.
        if !event.is_handled() && !event.is_expired(&today) {
            if let Ok(option) = event.option(option_id) {
                if matches!(option.effects.activation, Some(Activation::Staff(_)))
                    && staff_count >= staff_limit
                {
                    return Err(CapacityError::StaffFull { limit: staff_limit }.into());
                }
            }
        }

        let effects = resolve_option(event, option_id, &today)?;
        let effects = self.with_office_bonus(effects);
        let label = format!("event {event_id}: {option_id}");
        self.apply_effects(&effects, label);
        info!(event_id, option_id, "office event resolved");
        Ok(effects)
    }

    /// Folds the office's reputation bonus into a bundle, so the bundle handed back
    /// to the caller is exactly the one applied.
    fn with_office_bonus(&self, mut effects: Effects) -> Effects {
        if let Some(delta) = effects.reputation.filter(|delta| *delta > 0) {
            let bonus = self.state.office().reputation_bonus_pct / 100.0;
            effects.reputation = Some((delta as f64 * (1.0 + bonus)).round() as i32);
        }
        effects
    }

    fn apply_effects(&mut self, effects: &Effects, label: String) {
        if let Some(delta) = effects.treasury {
            if delta != 0 {
                self.add_treasury(delta, label);
            }
        }
        if let Some(delta) = effects.reputation {
            self.state.reputation = self
                .state
                .reputation
                .saturating_add(delta)
                .clamp(MIN_REPUTATION, MAX_REPUTATION);
        }
        if let Some(delta) = effects.experience {
            self.state.experience = self.state.experience.saturating_add(delta).max(0);
        }
        for change in &effects.relationships {
            let entry = self
                .state
                .relationships
                .entry(change.entity_id.clone())
                .or_insert(0);
            *entry = entry
                .saturating_add(change.delta)
                .clamp(MIN_RELATIONSHIP, MAX_RELATIONSHIP);
        }
        match &effects.activation {
            Some(Activation::Sponsor(sponsor)) => self.state.sponsors.push(sponsor.clone()),
            Some(Activation::Staff(member)) => self.state.staff.push(member.clone()),
            None => {}
        }
    }

    fn upgrade_office(&mut self) -> Result<u8, CoreError> {
        let next = next_office_level(self.state.office_level)
            .ok_or(ValidationError::MaxOfficeLevel)?;
        if self.state.treasury < next.upgrade_cost
            || self.state.reputation < next.required_reputation
        {
            return Err(ValidationError::UpgradeLocked {
                level: next.level,
                required_treasury: next.upgrade_cost,
                required_reputation: next.required_reputation,
            }
            .into());
        }
        self.add_treasury(-next.upgrade_cost, format!("office upgrade to {}", next.name));
        self.state.office_level = next.level;
        let date = self.state.date;
        self.add_game_event(GameEventDraft {
            kind: GameEventKind::OfficeUpgrade,
            date,
            description: format!("The agency moved into the {}.", next.name),
            payload: GameEventPayload::OfficeUpgrade {
                level: next.level,
                cost: next.upgrade_cost,
            },
        });
        info!(level = next.level, cost = next.upgrade_cost, "office upgraded");
        Ok(next.level)
    }

    fn sign_player(&mut self, definition: PlayerDefinition) -> Result<u32, CoreError> {
        let limit = self.state.office().max_players;
        if self.state.players.len() >= limit {
            return Err(CapacityError::RosterFull { limit }.into());
        }
        let id = self.state.next_player_id;
        self.state.next_player_id += 1;
        self.state.players.push(Player::from_definition(id, definition));
        Ok(id)
    }

    fn prune_expired(&mut self) -> usize {
        let today = self.state.date;
        let before = self.state.office_events.len();
        self.state
            .office_events
            .retain(|event| event.is_handled() || !event.is_expired(&today));
        before - self.state.office_events.len()
    }

    fn renew_sponsors(&mut self) -> usize {
        for sponsor in self.state.sponsors.iter_mut() {
            sponsor.months_remaining = sponsor.months_remaining.saturating_sub(1);
        }
        let before = self.state.sponsors.len();
        self.state
            .sponsors
            .retain(|sponsor| sponsor.months_remaining > 0);
        before - self.state.sponsors.len()
    }
}

impl StateAccess for GameStore {
    fn snapshot(&self) -> &GameState {
        &self.state
    }

    fn dispatch(&mut self, action: GameAction) -> Result<ActionOutcome, CoreError> {
        match action {
            GameAction::UpdateGameDate(date) => {
                self.state.date = date;
                Ok(ActionOutcome::Applied)
            }
            GameAction::SetGameSpeed(speed) => {
                self.state.speed = speed;
                Ok(ActionOutcome::Applied)
            }
            GameAction::SetPaused(paused) => {
                self.state.paused = paused;
                Ok(ActionOutcome::Applied)
            }
            GameAction::UpdateTreasury { delta, reason } => {
                self.add_treasury(delta, reason);
                Ok(ActionOutcome::Applied)
            }
            GameAction::AddMonthlyReport(report) => {
                self.state.monthly_reports.push(report);
                Ok(ActionOutcome::Applied)
            }
            GameAction::AddGameEvent(draft) => {
                Ok(ActionOutcome::GameEventAdded(self.add_game_event(draft)))
            }
            GameAction::AddEvent(mut event) => {
                event.id = self.state.next_office_event_id;
                self.state.next_office_event_id += 1;
                let id = event.id;
                debug!(event_id = id, kind = ?event.kind, "office event added");
                self.state.office_events.push(event);
                Ok(ActionOutcome::OfficeEventAdded(id))
            }
            GameAction::HandleEvent {
                event_id,
                option_id,
            } => Ok(ActionOutcome::EventResolved(
                self.handle_event(event_id, &option_id)?,
            )),
            GameAction::AcknowledgeGameEvent(id) => {
                let event = self
                    .state
                    .game_events
                    .iter_mut()
                    .find(|event| event.id == id)
                    .ok_or(ValidationError::UnknownGameEvent(id))?;
                event.handled = true;
                Ok(ActionOutcome::Applied)
            }
            GameAction::UpdatePlayer(player) => {
                let slot = self
                    .state
                    .players
                    .iter_mut()
                    .find(|existing| existing.id == player.id)
                    .ok_or(ValidationError::UnknownPlayer(player.id))?;
                *slot = player;
                Ok(ActionOutcome::Applied)
            }
            GameAction::SignPlayer(definition) => {
                Ok(ActionOutcome::PlayerSigned(self.sign_player(definition)?))
            }
            GameAction::UpgradeOffice => Ok(ActionOutcome::OfficeUpgraded(self.upgrade_office()?)),
            GameAction::PruneExpiredEvents => Ok(ActionOutcome::Pruned(self.prune_expired())),
            GameAction::RenewSponsors => Ok(ActionOutcome::SponsorsLapsed(self.renew_sponsors())),
        }
    }
}
