use rand::Rng;
use tracing::debug;

use crate::error::ValidationError;
use crate::game::office_event::{
    Activation, Effects, EventOption, OfficeEvent, OfficeEventKind, RelationshipDelta, Sponsor,
    SponsorTier, StaffMember, StaffRole, StaffSkill,
};
use crate::outcome::{bernoulli, uniform_int, uniform_pick};
use crate::time::CalendarDate;

const BRANDS: &[&str] = &[
    "Stride Athletics",
    "Northwind Energy",
    "Kestrel Bank",
    "Volta Mobile",
    "Harbor Logistics",
    "Citrus Cola",
];
const OUTLETS: &[&str] = &[
    "The Touchline",
    "Morning Kickoff",
    "Goal Daily",
    "Stadium Radio",
];
const FIRST_NAMES: &[&str] = &["Ana", "Tomas", "Lena", "Marco", "Ines", "Jonas", "Sofia", "Rui"];
const LAST_NAMES: &[&str] = &["Costa", "Berg", "Moreau", "Silva", "Novak", "Hale", "Duarte"];
const OPPORTUNITIES: &[(&str, &str)] = &[
    (
        "Youth tournament invitation",
        "Organisers want the agency to sponsor a scouting booth at a youth tournament.",
    ),
    (
        "Coaching seminar",
        "A licensing body offers places on an intensive agent and coaching seminar.",
    ),
    (
        "Charity match",
        "A local club asks the agency to co-host a charity match.",
    ),
];

/// One trigger rate, consulted once per advanced day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventSchedule {
    daily_probability: f64,
}

impl EventSchedule {
    /// Clamps into [0, 1]; a non-finite rate disables random events.
    pub fn new(daily_probability: f64) -> Self {
        let daily_probability = if daily_probability.is_finite() {
            daily_probability.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self { daily_probability }
    }

    pub fn daily_probability(&self) -> f64 {
        self.daily_probability
    }

    pub fn should_trigger<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        bernoulli(rng, self.daily_probability)
    }
}

/// Draws one of the four event families. `id` seeds the ids of any sponsor or
/// staff member the event offers; the store keeps event ids unique.
pub fn generate_random_event<R: Rng + ?Sized>(
    rng: &mut R,
    id: u64,
    office_level: u8,
    date: CalendarDate,
    expiry_days: u64,
) -> OfficeEvent {
    let scale = 1.0 + (office_level.max(1) - 1) as f64 * 0.5;
    let kind = OfficeEventKind::ALL[rng.gen_range(0..OfficeEventKind::ALL.len())];
    let (title, description, options) = match kind {
        OfficeEventKind::SponsorOffer => sponsor_offer(rng, id, scale),
        OfficeEventKind::MediaCoverage => media_coverage(rng, scale),
        OfficeEventKind::StaffIssue => staff_issue(rng, id, scale),
        OfficeEventKind::SpecialOpportunity => special_opportunity(rng, scale),
    };
    debug!(event_id = id, ?kind, %title, "office event generated");
    OfficeEvent::new(
        id,
        kind,
        title,
        description,
        date,
        options,
        date.plus_days(expiry_days),
    )
}

pub fn resolve_option(
    event: &mut OfficeEvent,
    option_id: &str,
    today: &CalendarDate,
) -> Result<Effects, ValidationError> {
    event.resolve(option_id, today)
}

type EventContent = (String, String, Vec<EventOption>);

fn sponsor_offer<R: Rng + ?Sized>(rng: &mut R, id: u64, scale: f64) -> EventContent {
    let tier = pick_copied(rng, &SponsorTier::ALL, SponsorTier::Minor);
    let name = pick_copied(rng, BRANDS, "Local Business").to_string();
    let payment = round_to_hundred(uniform_int(rng, tier.payment_range()) as f64 * scale);
    let sponsor_id = format!("sponsor-{id}");
    let sponsor = Sponsor {
        id: sponsor_id.clone(),
        name: name.clone(),
        tier,
        monthly_payment: payment,
        months_remaining: tier.contract_months(),
    };
    let tier_label = match tier {
        SponsorTier::Main => "Main",
        SponsorTier::Secondary => "Secondary",
        SponsorTier::Minor => "Minor",
    };
    (
        format!("{tier_label} sponsorship offer from {name}"),
        format!(
            "{name} offers {payment} per month for {} months.",
            tier.contract_months()
        ),
        vec![
            EventOption {
                id: "accept".to_string(),
                label: "Sign the deal".to_string(),
                effects: Effects {
                    reputation: Some(tier.reputation_bonus()),
                    relationships: vec![relationship(&sponsor_id, 10)],
                    activation: Some(Activation::Sponsor(sponsor)),
                    ..Effects::default()
                },
            },
            EventOption {
                id: "decline".to_string(),
                label: "Turn it down".to_string(),
                effects: Effects {
                    relationships: vec![relationship(&sponsor_id, -5)],
                    ..Effects::default()
                },
            },
        ],
    )
}

fn media_coverage<R: Rng + ?Sized>(rng: &mut R, scale: f64) -> EventContent {
    let outlet = pick_copied(rng, OUTLETS, "A local paper");
    let outlet_id = format!("media-{}", slug(outlet));
    let swing = uniform_int(rng, 3..7) as i32;
    if bernoulli(rng, 0.6) {
        (
            format!("{outlet} wants a feature"),
            format!("{outlet} is preparing a piece on rising agencies and asks for an interview."),
            vec![
                EventOption {
                    id: "interview".to_string(),
                    label: "Give the interview".to_string(),
                    effects: Effects {
                        reputation: Some(swing),
                        experience: Some(5),
                        relationships: vec![relationship(&outlet_id, 5)],
                        ..Effects::default()
                    },
                },
                EventOption {
                    id: "decline".to_string(),
                    label: "Decline politely".to_string(),
                    effects: Effects {
                        reputation: Some(-1),
                        ..Effects::default()
                    },
                },
            ],
        )
    } else {
        let pr_cost = round_to_hundred(2_000.0 * scale);
        (
            format!("{outlet} runs a critical story"),
            format!("{outlet} questions the agency's handling of a recent transfer."),
            vec![
                EventOption {
                    id: "respond".to_string(),
                    label: "Hire PR to respond".to_string(),
                    effects: Effects {
                        treasury: Some(-pr_cost),
                        reputation: Some(1),
                        relationships: vec![relationship(&outlet_id, 2)],
                        ..Effects::default()
                    },
                },
                EventOption {
                    id: "ignore".to_string(),
                    label: "Ignore it".to_string(),
                    effects: Effects {
                        reputation: Some(-swing),
                        relationships: vec![relationship(&outlet_id, -5)],
                        ..Effects::default()
                    },
                },
            ],
        )
    }
}

fn staff_issue<R: Rng + ?Sized>(rng: &mut R, id: u64, scale: f64) -> EventContent {
    let role = pick_copied(rng, &StaffRole::ALL, StaffRole::Scout);
    let name = format!(
        "{} {}",
        pick_copied(rng, FIRST_NAMES, "Alex"),
        pick_copied(rng, LAST_NAMES, "Smith")
    );
    let skills = role
        .skill_names()
        .iter()
        .map(|skill| StaffSkill {
            name: skill.to_string(),
            level: uniform_int(rng, 40..91) as u8,
        })
        .collect();
    let salary = round_to_hundred(uniform_int(rng, 2_000..6_000) as f64 * scale);
    let staff_id = format!("staff-{id}");
    let member = StaffMember {
        id: staff_id.clone(),
        name: name.clone(),
        role,
        skills,
        monthly_salary: salary,
    };
    (
        format!("{name} wants to join as {}", role.label()),
        format!(
            "An experienced {} is available for {salary} per month, with a one-off signing fee.",
            role.label()
        ),
        vec![
            EventOption {
                id: "hire".to_string(),
                label: "Hire".to_string(),
                effects: Effects {
                    treasury: Some(-salary),
                    relationships: vec![relationship(&staff_id, 10)],
                    activation: Some(Activation::Staff(member)),
                    ..Effects::default()
                },
            },
            EventOption {
                id: "pass".to_string(),
                label: "Pass for now".to_string(),
                effects: Effects {
                    experience: Some(2),
                    ..Effects::default()
                },
            },
        ],
    )
}

fn special_opportunity<R: Rng + ?Sized>(rng: &mut R, scale: f64) -> EventContent {
    let (title, description) =
        pick_copied(rng, OPPORTUNITIES, ("Opportunity", "Something came up."));
    let cost = round_to_hundred(uniform_int(rng, 5_000..20_000) as f64 * scale);
    let reputation = uniform_int(rng, 2..6) as i32;
    let experience = uniform_int(rng, 10..25) as i32;
    (
        title.to_string(),
        format!("{description} It would cost {cost}."),
        vec![
            EventOption {
                id: "invest".to_string(),
                label: "Take the opportunity".to_string(),
                effects: Effects {
                    treasury: Some(-cost),
                    reputation: Some(reputation),
                    experience: Some(experience),
                    ..Effects::default()
                },
            },
            EventOption {
                id: "skip".to_string(),
                label: "Let it pass".to_string(),
                effects: Effects::default(),
            },
        ],
    )
}

fn pick_copied<R: Rng + ?Sized, T: Copy>(rng: &mut R, candidates: &[T], fallback: T) -> T {
    uniform_pick(rng, candidates).copied().unwrap_or(fallback)
}

fn relationship(entity_id: &str, delta: i32) -> RelationshipDelta {
    RelationshipDelta {
        entity_id: entity_id.to_string(),
        delta,
    }
}

fn round_to_hundred(amount: f64) -> i64 {
    ((amount / 100.0).round() * 100.0) as i64
}

fn slug(name: &str) -> String {
    name.to_ascii_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}
