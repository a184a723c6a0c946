pub(crate) const BASE_TICK_MS: u64 = 1_000;
pub(crate) const MIN_MARKET_VALUE: i64 = 100_000;
pub(crate) const MAX_MARKET_VALUE: i64 = 50_000_000;
pub(crate) const MIN_REPUTATION: i32 = 0;
pub(crate) const MAX_REPUTATION: i32 = 100;
pub(crate) const MIN_RELATIONSHIP: i32 = -100;
pub(crate) const MAX_RELATIONSHIP: i32 = 100;

pub(crate) const BASE_RENT: f64 = 5_000.0;
pub(crate) const RENT_GROWTH: f64 = 1.5;
pub(crate) const UTILITIES_BASE: f64 = 1_000.0;
pub(crate) const UTILITIES_GROWTH: f64 = 1.2;
pub(crate) const MONTHLY_COMMISSION_RATE: f64 = 0.002;

pub(crate) const PLAY_PROBABILITY: f64 = 0.8;
pub(crate) const FULL_MATCH_PROBABILITY: f64 = 0.7;
pub(crate) const FULL_MATCH_MINUTES: u32 = 90;
pub(crate) const INJURY_PROBABILITY: f64 = 0.05;
pub(crate) const BASE_RATING: f64 = 6.5;
pub(crate) const MIN_RATING: f64 = 4.0;
pub(crate) const MAX_RATING: f64 = 10.0;

pub(crate) const VALUE_PER_GOAL: f64 = 50_000.0;
pub(crate) const VALUE_PER_ASSIST: f64 = 30_000.0;
pub(crate) const VALUE_PER_RATING_POINT: f64 = 100_000.0;
