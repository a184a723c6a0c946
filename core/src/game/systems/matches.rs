use rand::Rng;
use tracing::debug;

use crate::game::player::{Injury, InjurySeverity, MatchResult, Player};
use crate::game::records::{GameEventDraft, GameEventKind, GameEventPayload};
use crate::game::{
    BASE_RATING, FULL_MATCH_MINUTES, FULL_MATCH_PROBABILITY, INJURY_PROBABILITY, MAX_RATING,
    MIN_RATING, PLAY_PROBABILITY, VALUE_PER_ASSIST, VALUE_PER_GOAL, VALUE_PER_RATING_POINT,
};
use crate::outcome::{bernoulli, poisson_sample, uniform_int, uniform_pick, uniform_range};
use crate::time::CalendarDate;

const TEAM_GOAL_MEAN: f64 = 1.4;
const OPPONENT_GOAL_MEAN: f64 = 1.2;
const MAX_TEAM_GOALS: u32 = 9;

const OPPONENTS: &[&str] = &[
    "Porto Alegre FC",
    "Sporting Riverside",
    "Athletic Northbridge",
    "Real Costa Verde",
    "Dynamo Eastfield",
    "Union Saint-Clair",
    "Inter Valmonte",
    "Rovers United",
];

#[derive(Debug, Default)]
pub struct WeekendOutcome {
    pub updated_players: Vec<Player>,
    pub events: Vec<GameEventDraft>,
}

/// Plays one round of fixtures for the roster. Players who do not feature are left
/// out of `updated_players`.
pub fn simulate_weekend<R: Rng + ?Sized>(
    rng: &mut R,
    roster: &[Player],
    date: CalendarDate,
) -> WeekendOutcome {
    let mut outcome = WeekendOutcome::default();

    for player in roster {
        if player.is_injured_on(&date) || !bernoulli(rng, PLAY_PROBABILITY) {
            continue;
        }
        let result = simulate_match(rng, player, date);
        let mut updated = player.clone();
        let value_delta = market_value_delta(result.goals, result.assists, result.rating, player.age);
        let applied = updated.apply_value_delta(value_delta);
        debug!(
            player = %player.name,
            rating = result.rating,
            goals = result.goals,
            value_delta = applied,
            "match simulated"
        );
        outcome.events.push(match_event(&updated, &result));
        updated.record_match(result);
        outcome.updated_players.push(updated);
    }

    for player in outcome.updated_players.iter_mut() {
        if !bernoulli(rng, INJURY_PROBABILITY) {
            continue;
        }
        if let Some(injury) = draw_injury(rng, date) {
            player.injury = Some(injury);
            outcome.events.push(injury_event(player, injury, date));
        }
    }

    outcome
}

fn simulate_match<R: Rng + ?Sized>(rng: &mut R, player: &Player, date: CalendarDate) -> MatchResult {
    let minutes_played = if bernoulli(rng, FULL_MATCH_PROBABILITY) {
        FULL_MATCH_MINUTES
    } else {
        uniform_int(rng, 0..FULL_MATCH_MINUTES)
    };
    let rating = match_rating(player.potential, uniform_range(rng, -1.0..1.0));
    let goals = poisson_sample(
        rng,
        expected_count(player.position.goal_rate(), minutes_played, rating),
    );
    let assists = poisson_sample(
        rng,
        expected_count(player.position.assist_rate(), minutes_played, rating),
    );
    let opponent = uniform_pick(rng, OPPONENTS)
        .map(|name| name.to_string())
        .unwrap_or_default();
    let team_goals = team_score(poisson_sample(rng, TEAM_GOAL_MEAN), goals, assists);
    let opponent_goals = poisson_sample(rng, OPPONENT_GOAL_MEAN);

    MatchResult {
        date,
        opponent,
        team_goals,
        opponent_goals,
        minutes_played,
        goals,
        assists,
        rating,
    }
}

/// Rating for one match, rounded to a tenth and kept inside the 4–10 scale.
pub fn match_rating(potential: u8, noise: f64) -> f64 {
    let raw = BASE_RATING + (potential as f64 - 70.0) / 100.0 + noise;
    (raw.clamp(MIN_RATING, MAX_RATING) * 10.0).round() / 10.0
}

/// Final team tally. Every goal the player scored or assisted is a team goal, but
/// assists only lift the score up to `MAX_TEAM_GOALS`; the player's own goals always count.
pub fn team_score(drawn: u32, goals: u32, assists: u32) -> u32 {
    let involvement = goals.saturating_add(assists).min(MAX_TEAM_GOALS).max(goals);
    drawn.max(involvement)
}

pub fn expected_count(base_rate: f64, minutes_played: u32, rating: f64) -> f64 {
    let time_share = minutes_played as f64 / FULL_MATCH_MINUTES as f64;
    let form = 1.0 + (rating - 6.0) / 4.0;
    (base_rate * time_share * form).max(0.0)
}

pub fn market_value_delta(goals: u32, assists: u32, rating: f64, age: u8) -> i64 {
    let base = goals as f64 * VALUE_PER_GOAL
        + assists as f64 * VALUE_PER_ASSIST
        + (rating - BASE_RATING) * VALUE_PER_RATING_POINT;
    let age_factor = if age < 23 {
        1.5
    } else if age > 30 {
        0.5
    } else {
        1.0
    };
    (base * age_factor).round() as i64
}

fn draw_injury<R: Rng + ?Sized>(rng: &mut R, date: CalendarDate) -> Option<Injury> {
    let severity = *uniform_pick(rng, &InjurySeverity::ALL).ok()?;
    let days = uniform_int(rng, severity.day_range());
    let returns_on = date.plus_days(days as u64)?;
    Some(Injury {
        severity,
        days,
        returns_on,
    })
}

fn match_event(player: &Player, result: &MatchResult) -> GameEventDraft {
    let mut description = format!(
        "{} played {}' in a {} result against {} (rating {:.1})",
        player.name,
        result.minutes_played,
        result.scoreline(),
        result.opponent,
        result.rating
    );
    match (result.goals, result.assists) {
        (0, 0) => description.push('.'),
        (goals, 0) => description.push_str(&format!(" and scored {goals}.")),
        (0, assists) => description.push_str(&format!(" and set up {assists}.")),
        (goals, assists) => {
            description.push_str(&format!(" with {goals} goal(s) and {assists} assist(s)."))
        }
    }
    GameEventDraft {
        kind: GameEventKind::MatchResult,
        date: result.date,
        description,
        payload: GameEventPayload::Match {
            player_id: player.id,
            result: result.clone(),
        },
    }
}

fn injury_event(player: &Player, injury: Injury, date: CalendarDate) -> GameEventDraft {
    GameEventDraft {
        kind: GameEventKind::Injury,
        date,
        description: format!(
            "{} picked up a {} injury and will miss {} days (back on {}).",
            player.name,
            injury.severity.label(),
            injury.days,
            injury.returns_on
        ),
        payload: GameEventPayload::Injury {
            player_id: player.id,
            severity: injury.severity,
            days: injury.days,
            returns_on: injury.returns_on,
        },
    }
}
