mod commands;

use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;

use agency_core::{
    DayReport, GameEventKind, GameState, OFFICE_LADDER, Position, TimeController,
    next_office_level,
};
use anyhow::{Context as _, Result, anyhow};

use crate::timer::LoopTimer;
use commands::{CommandRegistry, Context};

pub fn run(controller: &mut TimeController, timer: &LoopTimer) -> Result<()> {
    let registry = CommandRegistry::default();
    let mut watch = timer.watch();
    controller.pause()?;
    print_intro(controller.state());
    let lines = spawn_input_reader();
    prompt(controller.state())?;

    loop {
        let received = match watch.time_left() {
            Some(wait) => lines.recv_timeout(wait),
            None => lines.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };
        match received {
            Ok(line) => {
                let trimmed = line.trim();
                if !trimmed.is_empty() {
                    let mut ctx = Context::new(controller);
                    if let Err(error) = registry.execute_input(&mut ctx, trimmed) {
                        println!("error: {error}");
                    }
                }
                prompt(controller.state())?;
            }
            Err(RecvTimeoutError::Timeout) => {
                if !watch.fire_if_due() {
                    continue;
                }
                match controller.on_timer_tick() {
                    Ok(Some(report)) => {
                        if is_notable(&report) {
                            println!();
                            print_day_report(controller.state(), &report);
                            prompt(controller.state())?;
                        }
                    }
                    Ok(None) => {}
                    Err(error) => {
                        println!("error: {error}");
                        controller.pause()?;
                        prompt(controller.state())?;
                    }
                }
            }
            Err(RecvTimeoutError::Disconnected) => {
                println!("Input closed, leaving the agency.");
                return Ok(());
            }
        }
    }
}

fn spawn_input_reader() -> Receiver<String> {
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if sender.send(line).is_err() {
                break;
            }
        }
    });
    receiver
}

fn prompt(state: &GameState) -> Result<()> {
    let status = if state.is_paused() { "paused" } else { "running" };
    print!("{} [{}]> ", state.date(), status);
    io::stdout().flush().context("failed to flush the prompt")
}

fn print_intro(state: &GameState) {
    println!("Football agency simulator.");
    println!(
        "{} at the {} with {} client(s) and a treasury of {}.",
        state.date(),
        state.office().name,
        state.players().len(),
        state.treasury()
    );
    println!("The clock starts paused: use resume, day or week to move time.");
    println!("Type help to list the commands.");
}

pub(crate) fn print_help() {
    println!("Commands:");
    println!("  overview                 agency summary");
    println!("  players                  roster with form and value");
    println!("  events                   open office events and unread news");
    println!("  resolve <event> <option> choose an office event option");
    println!("  ack <id|all>             mark news as read");
    println!("  day | week               advance one day or seven days");
    println!("  pause | resume           stop or start the running clock");
    println!("  speed <1-4>              autonomous clock speed");
    println!("  upgrade                  move to the next office level");
    println!("  sign <position> <age> <potential> <value> <name...>");
    println!("  reports [n]              last n monthly reports (default 3)");
    println!("  quit                     leave the game");
}

pub(crate) fn print_overview(controller: &TimeController) {
    let state = controller.state();
    let office = state.office();
    println!("-- {} --", state.date());
    println!(
        "Clock: {} at speed x{} ({:?} per day)",
        if state.is_paused() { "paused" } else { "running" },
        state.speed().multiplier(),
        controller.tick_interval()
    );
    println!("Treasury: {}", state.treasury());
    println!("Reputation: {}  Experience: {}", state.reputation(), state.experience());
    println!(
        "Office: {} (level {}/{}), players {}/{}, staff {}/{}",
        office.name,
        office.level,
        OFFICE_LADDER.len(),
        state.players().len(),
        office.max_players,
        state.staff().len(),
        office.max_staff
    );
    match next_office_level(office.level) {
        Some(next) => println!(
            "Next office: {} for {} (needs reputation {})",
            next.name, next.upgrade_cost, next.required_reputation
        ),
        None => println!("Next office: none, already at the top"),
    }
    if let Some(days) = controller.clock().days_until_save() {
        println!("Next checkpoint in {days} day(s)");
    }
    for (entity, score) in state.relationships() {
        println!("Relationship: {entity} {score:+}");
    }
    for sponsor in state.sponsors() {
        println!(
            "Sponsor: {} pays {} for {} more month(s)",
            sponsor.name, sponsor.monthly_payment, sponsor.months_remaining
        );
    }
    for member in state.staff() {
        println!(
            "Staff: {} ({}) at {} per month",
            member.name,
            member.role.label(),
            member.monthly_salary
        );
    }
}

pub(crate) fn print_players(state: &GameState) {
    println!(
        "ID | {:<20} | Pos | Age | Pot | {:>10} | Apps | Gls | Ast | Avg | Status",
        "Name", "Value"
    );
    for player in state.players() {
        let stats = player.stats();
        let status = match player.injury {
            Some(injury) if player.is_injured_on(&state.date()) => {
                format!("{} injury until {}", injury.severity.label(), injury.returns_on)
            }
            _ => "fit".to_string(),
        };
        println!(
            "{:>2} | {:<20} | {:<3} | {:>3} | {:>3} | {:>10} | {:>4} | {:>3} | {:>3} | {:>3.1} | {}",
            player.id,
            player.name,
            player.position.label(),
            player.age,
            player.potential,
            player.market_value(),
            stats.appearances,
            stats.goals,
            stats.assists,
            stats.average_rating,
            status
        );
    }
}

pub(crate) fn print_events(state: &GameState) {
    let mut open = state.open_office_events().peekable();
    if open.peek().is_none() {
        println!("No open office events.");
    }
    for event in open {
        let expiry = event
            .expires_at
            .map(|date| format!(" (expires {date})"))
            .unwrap_or_default();
        println!("[{}] {}{}", event.id, event.title, expiry);
        println!("     {}", event.description);
        for option in &event.options {
            println!("     - {}: {}", option.id, option.label);
        }
    }
    let news: Vec<_> = state.unhandled_game_events().collect();
    if !news.is_empty() {
        println!("Unread news:");
        for event in news {
            println!("  #{} {} {}", event.id, event.date, event.description);
        }
    }
}

pub(crate) fn print_reports(state: &GameState, count: usize) {
    let reports = state.monthly_reports();
    if reports.is_empty() {
        println!("No month has been settled yet.");
        return;
    }
    for report in reports.iter().rev().take(count).rev() {
        println!(
            "{}: income {} / expenses {} / balance {}",
            report.date, report.total_income, report.total_expenses, report.balance
        );
        for item in &report.income {
            println!("    + {:<28} {:>9}", item.label, item.amount);
        }
        for item in &report.expenses {
            println!("    - {:<28} {:>9}", format!("{:?}", item.kind), item.amount);
        }
    }
}

fn is_notable(report: &DayReport) -> bool {
    !report.new_game_events.is_empty()
        || !report.new_office_events.is_empty()
        || !report.warnings.is_empty()
}

pub(crate) fn print_day_report(state: &GameState, report: &DayReport) {
    println!("== {} ==", report.date);
    for id in &report.new_game_events {
        if let Some(event) = state.game_events().iter().find(|event| event.id == *id) {
            let marker = match event.kind {
                GameEventKind::MatchResult => "match",
                GameEventKind::Injury => "injury",
                GameEventKind::Settlement => "month",
                GameEventKind::OfficeUpgrade => "office",
                GameEventKind::TreasuryWarning => "warning",
            };
            println!("  [{marker}] {}", event.description);
        }
    }
    for id in &report.new_office_events {
        if let Some(event) = state.office_event(*id) {
            println!("  [event {}] {} (see events)", event.id, event.title);
        }
    }
    for warning in &report.warnings {
        println!("  [!] {warning}");
    }
    if report.saved {
        println!("  game saved");
    }
}

pub(crate) fn parse_speed(token: &str) -> Result<u8> {
    token
        .parse()
        .map_err(|_| anyhow!("speed must be a number from 1 to 4, got {token}"))
}

pub(crate) fn parse_position(token: &str) -> Result<Position> {
    let position = match token.to_ascii_lowercase().as_str() {
        "gk" | "goalkeeper" => Position::Goalkeeper,
        "cb" | "centre_back" => Position::CentreBack,
        "fb" | "full_back" => Position::FullBack,
        "dm" | "defensive_midfielder" => Position::DefensiveMidfielder,
        "cm" | "central_midfielder" => Position::CentralMidfielder,
        "am" | "attacking_midfielder" => Position::AttackingMidfielder,
        "w" | "winger" => Position::Winger,
        "st" | "striker" => Position::Striker,
        other => return Err(anyhow!("unknown position: {other}")),
    };
    Ok(position)
}
