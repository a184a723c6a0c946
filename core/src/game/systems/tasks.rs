use rand::rngs::StdRng;
use tracing::{debug, warn};

use super::events::{EventSchedule, generate_random_event};
use super::matches::simulate_weekend;
use super::settlement::settle_month;
use crate::TaskKind;
use crate::collaborators::{Payroll, Persistence};
use crate::error::{CoreError, StateWarning};
use crate::game::records::{GameEventDraft, GameEventKind, GameEventPayload, MonthlyReport};
use crate::game::store::{ActionOutcome, GameAction, StateAccess};
use crate::time::CalendarDate;

/// What one advanced day did. Returned by every day advance.
#[derive(Debug, Clone, PartialEq)]
pub struct DayReport {
    pub date: CalendarDate,
    /// Scheduled tasks in the order they ran.
    pub tasks: Vec<TaskKind>,
    pub recovered_players: Vec<u32>,
    pub monthly_report: Option<MonthlyReport>,
    pub matches_played: usize,
    pub new_game_events: Vec<u64>,
    pub new_office_events: Vec<u64>,
    pub pruned_events: usize,
    pub saved: bool,
    /// Collaborator failures and a negative treasury. The day still completes.
    pub warnings: Vec<StateWarning>,
}

impl DayReport {
    pub(crate) fn new(date: CalendarDate, tasks: Vec<TaskKind>) -> Self {
        Self {
            date,
            tasks,
            recovered_players: Vec::new(),
            monthly_report: None,
            matches_played: 0,
            new_game_events: Vec::new(),
            new_office_events: Vec::new(),
            pruned_events: 0,
            saved: false,
            warnings: Vec::new(),
        }
    }

    fn warn(&mut self, warning: StateWarning) {
        warn!(date = %self.date, %warning, "simulation warning");
        self.warnings.push(warning);
    }
}

/// Borrowed view of everything a task may touch during one tick.
pub(crate) struct TickContext<'a> {
    pub store: &'a mut dyn StateAccess,
    pub rng: &'a mut StdRng,
    pub events: &'a EventSchedule,
    pub event_expiry_days: u64,
    pub payroll: &'a dyn Payroll,
    pub persistence: &'a mut dyn Persistence,
}

pub(crate) fn execute(
    kind: TaskKind,
    ctx: &mut TickContext<'_>,
    report: &mut DayReport,
) -> Result<(), CoreError> {
    match kind {
        TaskKind::MonthlySettlement => run_settlement(ctx, report),
        TaskKind::WeekendMatches => run_weekend(ctx, report),
        TaskKind::EventCheck => run_event_check(ctx, report),
        TaskKind::ExpiryPrune => run_prune(ctx, report),
        TaskKind::SaveCheckpoint => {
            run_save(ctx, report);
            Ok(())
        }
    }
}

/// Runs before the scheduled tasks so a player back today can play today.
pub(crate) fn recover_injuries(
    ctx: &mut TickContext<'_>,
    report: &mut DayReport,
) -> Result<(), CoreError> {
    let date = report.date;
    let recovered: Vec<_> = ctx
        .store
        .snapshot()
        .players()
        .iter()
        .filter_map(|player| {
            let mut player = player.clone();
            player.recover_if_due(&date).then_some(player)
        })
        .collect();
    for player in recovered {
        debug!(player = %player.name, "player back from injury");
        report.recovered_players.push(player.id);
        ctx.store.dispatch(GameAction::UpdatePlayer(player))?;
    }
    Ok(())
}

/// Settles the month that just closed. Sponsors are paid before their contracts count
/// down, so a contract with one month left pays one final time.
fn run_settlement(ctx: &mut TickContext<'_>, report: &mut DayReport) -> Result<(), CoreError> {
    let state = ctx.store.snapshot();
    let date = state.date();
    let salaries = match ctx.payroll.compute_monthly_salaries(state) {
        Ok(total) => total,
        Err(err) => {
            report.warn(StateWarning::PayrollFailed(err.to_string()));
            0
        }
    };
    let monthly = settle_month(
        state.office(),
        date,
        state.players(),
        state.sponsors(),
        salaries,
    );
    let balance = monthly.balance;

    if let ActionOutcome::SponsorsLapsed(lapsed) = ctx.store.dispatch(GameAction::RenewSponsors)? {
        if lapsed > 0 {
            debug!(lapsed, "sponsor contracts ended");
        }
    }
    ctx.store
        .dispatch(GameAction::AddMonthlyReport(monthly.clone()))?;
    ctx.store.dispatch(GameAction::UpdateTreasury {
        delta: balance,
        reason: format!("monthly settlement {date}"),
    })?;

    let treasury_after = ctx.store.snapshot().treasury();
    add_game_event(
        ctx,
        report,
        GameEventDraft {
            kind: GameEventKind::Settlement,
            date,
            description: format!(
                "Month closed with a balance of {balance}. Treasury now {treasury_after}."
            ),
            payload: GameEventPayload::Settlement {
                balance,
                treasury_after,
            },
        },
    )?;
    if treasury_after < 0 {
        report.warn(StateWarning::NegativeTreasury {
            projected: treasury_after,
        });
        add_game_event(
            ctx,
            report,
            GameEventDraft {
                kind: GameEventKind::TreasuryWarning,
                date,
                description: format!("The agency is in the red: {treasury_after}."),
                payload: GameEventPayload::TreasuryWarning {
                    projected: treasury_after,
                },
            },
        )?;
    }
    report.monthly_report = Some(monthly);
    Ok(())
}

fn run_weekend(ctx: &mut TickContext<'_>, report: &mut DayReport) -> Result<(), CoreError> {
    let state = ctx.store.snapshot();
    let outcome = simulate_weekend(&mut *ctx.rng, state.players(), state.date());
    report.matches_played += outcome.updated_players.len();
    for player in outcome.updated_players {
        ctx.store.dispatch(GameAction::UpdatePlayer(player))?;
    }
    for draft in outcome.events {
        add_game_event(ctx, report, draft)?;
    }
    Ok(())
}

fn run_event_check(ctx: &mut TickContext<'_>, report: &mut DayReport) -> Result<(), CoreError> {
    if !ctx.events.should_trigger(&mut *ctx.rng) {
        return Ok(());
    }
    let state = ctx.store.snapshot();
    let event = generate_random_event(
        &mut *ctx.rng,
        state.next_office_event_id(),
        state.office_level(),
        state.date(),
        ctx.event_expiry_days,
    );
    if let ActionOutcome::OfficeEventAdded(id) = ctx.store.dispatch(GameAction::AddEvent(event))? {
        report.new_office_events.push(id);
    }
    Ok(())
}

fn run_prune(ctx: &mut TickContext<'_>, report: &mut DayReport) -> Result<(), CoreError> {
    if let ActionOutcome::Pruned(count) = ctx.store.dispatch(GameAction::PruneExpiredEvents)? {
        report.pruned_events = count;
    }
    Ok(())
}

fn run_save(ctx: &mut TickContext<'_>, report: &mut DayReport) {
    match ctx.persistence.save_game(ctx.store.snapshot()) {
        Ok(()) => report.saved = true,
        Err(err) => report.warn(StateWarning::PersistenceFailed(err.to_string())),
    }
}

fn add_game_event(
    ctx: &mut TickContext<'_>,
    report: &mut DayReport,
    draft: GameEventDraft,
) -> Result<(), CoreError> {
    if let ActionOutcome::GameEventAdded(id) = ctx.store.dispatch(GameAction::AddGameEvent(draft))? {
        report.new_game_events.push(id);
    }
    Ok(())
}
