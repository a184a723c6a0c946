use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::time::CalendarDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OfficeEventKind {
    SponsorOffer,
    MediaCoverage,
    StaffIssue,
    SpecialOpportunity,
}

impl OfficeEventKind {
    pub const ALL: [OfficeEventKind; 4] = [
        OfficeEventKind::SponsorOffer,
        OfficeEventKind::MediaCoverage,
        OfficeEventKind::StaffIssue,
        OfficeEventKind::SpecialOpportunity,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SponsorTier {
    Main,
    Secondary,
    Minor,
}

impl SponsorTier {
    pub const ALL: [SponsorTier; 3] = [SponsorTier::Main, SponsorTier::Secondary, SponsorTier::Minor];

    /// Monthly payment band before the office-level multiplier.
    pub fn payment_range(&self) -> std::ops::Range<u32> {
        match self {
            SponsorTier::Main => 20_000..50_000,
            SponsorTier::Secondary => 8_000..20_000,
            SponsorTier::Minor => 2_000..8_000,
        }
    }

    pub fn reputation_bonus(&self) -> i32 {
        match self {
            SponsorTier::Main => 8,
            SponsorTier::Secondary => 4,
            SponsorTier::Minor => 1,
        }
    }

    pub fn contract_months(&self) -> u32 {
        match self {
            SponsorTier::Main => 12,
            SponsorTier::Secondary => 6,
            SponsorTier::Minor => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sponsor {
    pub id: String,
    pub name: String,
    pub tier: SponsorTier,
    pub monthly_payment: i64,
    pub months_remaining: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StaffRole {
    Scout,
    Negotiator,
    Physio,
    Analyst,
}

impl StaffRole {
    pub const ALL: [StaffRole; 4] = [
        StaffRole::Scout,
        StaffRole::Negotiator,
        StaffRole::Physio,
        StaffRole::Analyst,
    ];

    pub fn skill_names(&self) -> &'static [&'static str] {
        match self {
            StaffRole::Scout => &["talent_spotting", "network", "judgement"],
            StaffRole::Negotiator => &["bargaining", "contracts", "persuasion"],
            StaffRole::Physio => &["rehabilitation", "prevention"],
            StaffRole::Analyst => &["data", "tactics", "reporting"],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StaffRole::Scout => "scout",
            StaffRole::Negotiator => "negotiator",
            StaffRole::Physio => "physio",
            StaffRole::Analyst => "analyst",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffSkill {
    pub name: String,
    pub level: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: String,
    pub name: String,
    pub role: StaffRole,
    pub skills: Vec<StaffSkill>,
    pub monthly_salary: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipDelta {
    pub entity_id: String,
    pub delta: i32,
}

/// A sponsor contract or a staff hire that starts when the option is chosen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Activation {
    Sponsor(Sponsor),
    Staff(StaffMember),
}

/// Everything an option can change. Consumers apply each field explicitly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Effects {
    pub treasury: Option<i64>,
    pub reputation: Option<i32>,
    pub experience: Option<i32>,
    #[serde(default)]
    pub relationships: Vec<RelationshipDelta>,
    pub activation: Option<Activation>,
}

impl Effects {
    pub fn is_empty(&self) -> bool {
        self.treasury.is_none()
            && self.reputation.is_none()
            && self.experience.is_none()
            && self.relationships.is_empty()
            && self.activation.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventOption {
    pub id: String,
    pub label: String,
    pub effects: Effects,
}

/// A decision waiting on the agency. It is resolved at most once, through one of its
/// options, and cannot be resolved after `expires_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfficeEvent {
    pub id: u64,
    pub kind: OfficeEventKind,
    pub title: String,
    pub description: String,
    pub date: CalendarDate,
    pub options: Vec<EventOption>,
    handled: bool,
    pub expires_at: Option<CalendarDate>,
}

impl OfficeEvent {
    pub fn new(
        id: u64,
        kind: OfficeEventKind,
        title: String,
        description: String,
        date: CalendarDate,
        options: Vec<EventOption>,
        expires_at: Option<CalendarDate>,
    ) -> Self {
        Self {
            id,
            kind,
            title,
            description,
            date,
            options,
            handled: false,
            expires_at,
        }
    }

    pub fn is_handled(&self) -> bool {
        self.handled
    }

    pub fn is_expired(&self, today: &CalendarDate) -> bool {
        self.expires_at.map(|expiry| *today > expiry).unwrap_or(false)
    }

    pub fn is_open(&self, today: &CalendarDate) -> bool {
        !self.handled && !self.is_expired(today)
    }

    pub fn option(&self, option_id: &str) -> Result<&EventOption, ValidationError> {
        if self.handled {
            return Err(ValidationError::AlreadyHandled(self.id));
        }
        self.options
            .iter()
            .find(|option| option.id == option_id)
            .ok_or_else(|| ValidationError::UnknownOption {
                event_id: self.id,
                option_id: option_id.to_string(),
            })
    }

    /// Marks the event handled and hands back the chosen option's effects.
    pub fn resolve(
        &mut self,
        option_id: &str,
        today: &CalendarDate,
    ) -> Result<Effects, ValidationError> {
        if self.handled {
            return Err(ValidationError::AlreadyHandled(self.id));
        }
        if self.is_expired(today) {
            return Err(ValidationError::Expired(self.id));
        }
        let effects = self.option(option_id)?.effects.clone();
        self.handled = true;
        Ok(effects)
    }
}
