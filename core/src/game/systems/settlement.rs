use tracing::info;

use crate::game::office::OfficeLevel;
use crate::game::office_event::Sponsor;
use crate::game::player::Player;
use crate::game::records::{ExpenseItem, ExpenseKind, IncomeItem, IncomeKind, MonthlyReport};
use crate::game::{BASE_RENT, MONTHLY_COMMISSION_RATE, RENT_GROWTH, UTILITIES_BASE, UTILITIES_GROWTH};
use crate::time::CalendarDate;

/// Rent grows by half again with every office level.
pub fn monthly_rent(level: u8) -> i64 {
    (BASE_RENT * RENT_GROWTH.powi(level.max(1) as i32 - 1)).round() as i64
}

pub fn monthly_utilities(level: u8) -> i64 {
    (UTILITIES_BASE * UTILITIES_GROWTH.powi(level.max(1) as i32 - 1)).round() as i64
}

/// Agency cut of the roster's market value for one month, boosted by the office.
pub fn player_commission(player: &Player, office: &OfficeLevel) -> i64 {
    let bonus = 1.0 + office.commission_bonus_pct / 100.0;
    (player.market_value() as f64 * MONTHLY_COMMISSION_RATE * bonus).round() as i64
}

/// Builds the report for the month that closes on `date`.
///
/// * `office` sets rent, utilities, maintenance and the commission bonus.
/// * `players` are the clients whose market value earns commission.
/// * `sponsors` are the contracts active before this settlement counts them down.
/// * `salaries` is the payroll total, already summed by the payroll collaborator.
///
/// The report is pure data; applying its balance to the treasury is up to the caller.
pub fn settle_month(
    office: &OfficeLevel,
    date: CalendarDate,
    players: &[Player],
    sponsors: &[Sponsor],
    salaries: i64,
) -> MonthlyReport {
    let mut income = Vec::new();
    let commissions: i64 = players
        .iter()
        .map(|player| player_commission(player, office))
        .sum();
    if commissions > 0 {
        income.push(IncomeItem {
            kind: IncomeKind::Commission,
            label: format!("commissions ({} players)", players.len()),
            amount: commissions,
        });
    }
    for sponsor in sponsors {
        income.push(IncomeItem {
            kind: IncomeKind::Sponsorship,
            label: sponsor.name.clone(),
            amount: sponsor.monthly_payment,
        });
    }

    let mut expenses = vec![
        ExpenseItem {
            kind: ExpenseKind::Rent,
            amount: monthly_rent(office.level),
        },
        ExpenseItem {
            kind: ExpenseKind::Utilities,
            amount: monthly_utilities(office.level),
        },
        ExpenseItem {
            kind: ExpenseKind::Maintenance,
            amount: office.monthly_maintenance,
        },
    ];
    if salaries > 0 {
        expenses.push(ExpenseItem {
            kind: ExpenseKind::Salaries,
            amount: salaries,
        });
    }

    let report = MonthlyReport::new(date, office.level, income, expenses);
    info!(
        date = %date,
        income = report.total_income,
        expenses = report.total_expenses,
        balance = report.balance,
        "month settled"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::office::{OFFICE_LADDER, office_level};
    use crate::game::office_event::SponsorTier;
    use crate::game::player::{PlayerDefinition, Position};

    fn player(value: i64) -> Player {
        Player::from_definition(
            1,
            PlayerDefinition {
                name: "Client".to_string(),
                position: Position::Winger,
                age: 24,
                potential: 78,
                market_value: value,
            },
        )
    }

    #[test]
    fn overhead_grows_geometrically_with_level() {
        assert_eq!(monthly_rent(1), 5_000);
        assert_eq!(monthly_rent(2), 7_500);
        assert_eq!(monthly_rent(3), 11_250);
        assert_eq!(monthly_utilities(1), 1_000);
        assert_eq!(monthly_utilities(2), 1_200);
        for pair in OFFICE_LADDER.windows(2) {
            assert!(monthly_rent(pair[1].level) > monthly_rent(pair[0].level));
            assert!(monthly_utilities(pair[1].level) > monthly_utilities(pair[0].level));
        }
    }

    #[test]
    fn report_balance_nets_income_against_expenses() {
        let office = office_level(2);
        let sponsor = Sponsor {
            id: "sponsor-1".to_string(),
            name: "Boots & Co".to_string(),
            tier: SponsorTier::Minor,
            monthly_payment: 4_000,
            months_remaining: 2,
        };
        let date = CalendarDate::new(2024, 2, 1).unwrap();
        let report = settle_month(office, date, &[player(5_000_000)], &[sponsor], 3_000);

        // 5_000_000 * 0.002 * 1.05
        assert_eq!(report.income(IncomeKind::Commission), 10_500);
        assert_eq!(report.income(IncomeKind::Sponsorship), 4_000);
        assert_eq!(report.expense(ExpenseKind::Rent), 7_500);
        assert_eq!(report.expense(ExpenseKind::Utilities), 1_200);
        assert_eq!(report.expense(ExpenseKind::Maintenance), 1_500);
        assert_eq!(report.expense(ExpenseKind::Salaries), 3_000);
        assert_eq!(report.total_income, 14_500);
        assert_eq!(report.total_expenses, 13_200);
        assert_eq!(report.balance, report.total_income - report.total_expenses);
        assert_eq!(report.date, date);
    }

    #[test]
    fn empty_agency_still_pays_overhead() {
        let office = office_level(1);
        let report = settle_month(office, CalendarDate::new(2024, 3, 1).unwrap(), &[], &[], 0);
        assert!(report.income.is_empty());
        assert_eq!(report.total_expenses, 6_500);
        assert_eq!(report.balance, -6_500);
    }
}
