use serde::{Deserialize, Serialize};

use super::{MAX_MARKET_VALUE, MIN_MARKET_VALUE};
use crate::time::CalendarDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    Goalkeeper,
    CentreBack,
    FullBack,
    DefensiveMidfielder,
    CentralMidfielder,
    AttackingMidfielder,
    Winger,
    Striker,
}

impl Position {
    pub fn label(&self) -> &'static str {
        match self {
            Position::Goalkeeper => "GK",
            Position::CentreBack => "CB",
            Position::FullBack => "FB",
            Position::DefensiveMidfielder => "DM",
            Position::CentralMidfielder => "CM",
            Position::AttackingMidfielder => "AM",
            Position::Winger => "W",
            Position::Striker => "ST",
        }
    }

    /// Expected goals per full 90 minutes at an average rating.
    pub fn goal_rate(&self) -> f64 {
        match self {
            Position::Striker => 0.30,
            Position::AttackingMidfielder | Position::Winger => 0.15,
            Position::CentralMidfielder | Position::DefensiveMidfielder => 0.05,
            Position::CentreBack | Position::FullBack | Position::Goalkeeper => 0.01,
        }
    }

    pub fn assist_rate(&self) -> f64 {
        match self {
            Position::Striker => 0.15,
            Position::AttackingMidfielder | Position::Winger => 0.20,
            Position::CentralMidfielder | Position::DefensiveMidfielder => 0.10,
            Position::CentreBack | Position::FullBack => 0.05,
            Position::Goalkeeper => 0.01,
        }
    }
}

/// Roster entry as it appears in `roster.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerDefinition {
    pub name: String,
    pub position: Position,
    pub age: u8,
    pub potential: u8,
    pub market_value: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InjurySeverity {
    Minor,
    Medium,
    Severe,
}

impl InjurySeverity {
    pub const ALL: [InjurySeverity; 3] = [
        InjurySeverity::Minor,
        InjurySeverity::Medium,
        InjurySeverity::Severe,
    ];

    /// Half-open range of days out.
    pub fn day_range(&self) -> std::ops::Range<u32> {
        match self {
            InjurySeverity::Minor => 3..10,
            InjurySeverity::Medium => 7..21,
            InjurySeverity::Severe => 21..81,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            InjurySeverity::Minor => "minor",
            InjurySeverity::Medium => "medium",
            InjurySeverity::Severe => "severe",
        }
    }
}

/// An injury is active until `returns_on`; the player is fit again on that date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Injury {
    pub severity: InjurySeverity,
    pub days: u32,
    pub returns_on: CalendarDate,
}

/// Season totals. `average_rating` is `total_rating / appearances`, or 0 before the
/// first appearance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub goals: u32,
    pub assists: u32,
    pub appearances: u32,
    pub minutes_played: u32,
    pub total_rating: f64,
    pub average_rating: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub date: CalendarDate,
    pub opponent: String,
    pub team_goals: u32,
    pub opponent_goals: u32,
    pub minutes_played: u32,
    pub goals: u32,
    pub assists: u32,
    pub rating: f64,
}

impl MatchResult {
    pub fn scoreline(&self) -> String {
        format!("{}-{}", self.team_goals, self.opponent_goals)
    }
}

/// A client of the agency. Market value and stats are private so they can only move
/// through the clamping and averaging methods below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: u32,
    pub name: String,
    pub position: Position,
    pub age: u8,
    pub potential: u8,
    market_value: i64,
    pub injury: Option<Injury>,
    stats: PlayerStats,
    pub last_match: Option<MatchResult>,
}

impl Player {
    /// Potential is capped at 100 and the market value clamped into range.
    pub fn from_definition(id: u32, definition: PlayerDefinition) -> Self {
        Self {
            id,
            name: definition.name,
            position: definition.position,
            age: definition.age,
            potential: definition.potential.min(100),
            market_value: clamp_market_value(definition.market_value),
            injury: None,
            stats: PlayerStats::default(),
            last_match: None,
        }
    }

    pub fn market_value(&self) -> i64 {
        self.market_value
    }

    pub fn stats(&self) -> &PlayerStats {
        &self.stats
    }

    pub fn is_injured_on(&self, date: &CalendarDate) -> bool {
        self.injury
            .map(|injury| injury.returns_on > *date)
            .unwrap_or(false)
    }

    /// Clears an injury whose return date has arrived. Returns true when the player
    /// came back.
    pub fn recover_if_due(&mut self, date: &CalendarDate) -> bool {
        match self.injury {
            Some(injury) if injury.returns_on <= *date => {
                self.injury = None;
                true
            }
            _ => false,
        }
    }

    pub fn apply_value_delta(&mut self, delta: i64) -> i64 {
        let previous = self.market_value;
        self.market_value = clamp_market_value(previous.saturating_add(delta));
        self.market_value - previous
    }

    /// Folds one match into the cumulative stats and keeps the average in step with
    /// the totals.
    pub fn record_match(&mut self, result: MatchResult) {
        let stats = &mut self.stats;
        stats.goals += result.goals;
        stats.assists += result.assists;
        stats.appearances += 1;
        stats.minutes_played += result.minutes_played;
        stats.total_rating += result.rating;
        stats.average_rating = stats.total_rating / stats.appearances as f64;
        self.last_match = Some(result);
    }
}

pub fn clamp_market_value(value: i64) -> i64 {
    value.clamp(MIN_MARKET_VALUE, MAX_MARKET_VALUE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn striker() -> Player {
        Player::from_definition(
            1,
            PlayerDefinition {
                name: "Test Nine".to_string(),
                position: Position::Striker,
                age: 24,
                potential: 80,
                market_value: 1_000_000,
            },
        )
    }

    fn result(rating: f64, goals: u32) -> MatchResult {
        MatchResult {
            date: CalendarDate::new(2024, 3, 1).unwrap(),
            opponent: "Rivals".to_string(),
            team_goals: goals + 1,
            opponent_goals: 0,
            minutes_played: 90,
            goals,
            assists: 0,
            rating,
        }
    }

    #[test]
    fn record_match_keeps_average_consistent() {
        let mut player = striker();
        player.record_match(result(7.0, 1));
        player.record_match(result(6.0, 0));
        let stats = player.stats();
        assert_eq!(stats.appearances, 2);
        assert_eq!(stats.goals, 1);
        assert_eq!(stats.minutes_played, 180);
        assert!((stats.average_rating - 6.5).abs() < 1e-9);
        assert_eq!(player.last_match.as_ref().unwrap().rating, 6.0);
    }

    #[test]
    fn value_is_clamped_on_construction_and_updates() {
        let mut player = Player::from_definition(
            2,
            PlayerDefinition {
                name: "Cheap".to_string(),
                position: Position::FullBack,
                age: 30,
                potential: 60,
                market_value: 5,
            },
        );
        assert_eq!(player.market_value(), MIN_MARKET_VALUE);
        player.apply_value_delta(-10_000_000);
        assert_eq!(player.market_value(), MIN_MARKET_VALUE);
        player.apply_value_delta(i64::MAX);
        assert_eq!(player.market_value(), MAX_MARKET_VALUE);
    }

    #[test]
    fn injury_clears_on_return_date() {
        let mut player = striker();
        let today = CalendarDate::new(2024, 3, 1).unwrap();
        player.injury = Some(Injury {
            severity: InjurySeverity::Minor,
            days: 3,
            returns_on: today.plus_days(3).unwrap(),
        });
        assert!(player.is_injured_on(&today));
        assert!(!player.recover_if_due(&today));
        let back = today.plus_days(3).unwrap();
        assert!(!player.is_injured_on(&back));
        assert!(player.recover_if_due(&back));
        assert!(player.injury.is_none());
    }
}
