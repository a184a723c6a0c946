use serde::Serialize;

/// One rung of the office ladder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OfficeLevel {
    pub level: u8,
    pub name: &'static str,
    pub max_players: usize,
    pub max_staff: usize,
    pub commission_bonus_pct: f64,
    pub reputation_bonus_pct: f64,
    pub monthly_maintenance: i64,
    pub upgrade_cost: i64,
    pub required_reputation: i32,
}

pub const OFFICE_LADDER: [OfficeLevel; 5] = [
    OfficeLevel {
        level: 1,
        name: "Home Office",
        max_players: 5,
        max_staff: 1,
        commission_bonus_pct: 0.0,
        reputation_bonus_pct: 0.0,
        monthly_maintenance: 500,
        upgrade_cost: 0,
        required_reputation: 0,
    },
    OfficeLevel {
        level: 2,
        name: "Small Office",
        max_players: 10,
        max_staff: 3,
        commission_bonus_pct: 5.0,
        reputation_bonus_pct: 5.0,
        monthly_maintenance: 1_500,
        upgrade_cost: 50_000,
        required_reputation: 20,
    },
    OfficeLevel {
        level: 3,
        name: "Business Center",
        max_players: 20,
        max_staff: 6,
        commission_bonus_pct: 10.0,
        reputation_bonus_pct: 10.0,
        monthly_maintenance: 4_000,
        upgrade_cost: 150_000,
        required_reputation: 40,
    },
    OfficeLevel {
        level: 4,
        name: "Agency Floor",
        max_players: 35,
        max_staff: 10,
        commission_bonus_pct: 15.0,
        reputation_bonus_pct: 15.0,
        monthly_maintenance: 9_000,
        upgrade_cost: 400_000,
        required_reputation: 60,
    },
    OfficeLevel {
        level: 5,
        name: "Headquarters",
        max_players: 50,
        max_staff: 15,
        commission_bonus_pct: 25.0,
        reputation_bonus_pct: 25.0,
        monthly_maintenance: 20_000,
        upgrade_cost: 1_000_000,
        required_reputation: 80,
    },
];

/// Looks up a ladder row; out-of-range levels snap to the nearest rung.
pub fn office_level(level: u8) -> &'static OfficeLevel {
    let idx = (level.max(1) as usize - 1).min(OFFICE_LADDER.len() - 1);
    &OFFICE_LADDER[idx]
}

/// The rung above `level`, or `None` at the top of the ladder.
pub fn next_office_level(level: u8) -> Option<&'static OfficeLevel> {
    OFFICE_LADDER.get(level as usize)
}

pub fn clamp_office_level(level: u8) -> u8 {
    level.clamp(1, OFFICE_LADDER.len() as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ladder_is_ordered_and_gated() {
        for pair in OFFICE_LADDER.windows(2) {
            assert_eq!(pair[1].level, pair[0].level + 1);
            assert!(pair[1].max_players > pair[0].max_players);
            assert!(pair[1].upgrade_cost > pair[0].upgrade_cost);
            assert!(pair[1].required_reputation > pair[0].required_reputation);
        }
    }

    #[test]
    fn lookup_snaps_to_ladder() {
        assert_eq!(office_level(0).level, 1);
        assert_eq!(office_level(3).name, "Business Center");
        assert_eq!(office_level(9).level, 5);
        assert_eq!(next_office_level(1).map(|o| o.level), Some(2));
        assert!(next_office_level(5).is_none());
    }
}
