use std::collections::HashMap;
use std::process;

use agency_core::{GameState, PlayerDefinition, TimeController};
use anyhow::{Result, anyhow, bail};

use super::{
    parse_position, parse_speed, print_day_report, print_events, print_help, print_overview,
    print_players, print_reports,
};

pub struct Context<'a> {
    controller: &'a mut TimeController,
}

impl<'a> Context<'a> {
    pub fn new(controller: &'a mut TimeController) -> Self {
        Self { controller }
    }

    pub fn controller(&self) -> &TimeController {
        &*self.controller
    }

    pub fn controller_mut(&mut self) -> &mut TimeController {
        &mut *self.controller
    }

    pub fn state(&self) -> &GameState {
        self.controller.state()
    }
}

pub struct Args<'a> {
    tokens: Vec<&'a str>,
    index: usize,
}

impl<'a> Args<'a> {
    pub fn new(tokens: Vec<&'a str>) -> Self {
        Self { tokens, index: 0 }
    }

    pub fn next(&mut self) -> Option<&'a str> {
        let value = self.tokens.get(self.index).copied()?;
        self.index += 1;
        Some(value)
    }

    pub fn next_required(&mut self, message: &str) -> Result<&'a str> {
        self.next().ok_or_else(|| anyhow!(message.to_owned()))
    }

    /// Everything not consumed yet, joined back with single spaces.
    pub fn rest(&mut self) -> Option<String> {
        if self.index >= self.tokens.len() {
            return None;
        }
        let rest = self.tokens[self.index..].join(" ");
        self.index = self.tokens.len();
        Some(rest)
    }
}

pub trait Command {
    fn name() -> &'static str;
    fn execute(ctx: &mut Context<'_>, args: Args<'_>) -> Result<()>;
}

type CommandFn = for<'a> fn(&mut Context<'a>, Args<'a>) -> Result<()>;

pub struct CommandRegistry {
    handlers: HashMap<&'static str, CommandFn>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    pub fn register<C: Command>(&mut self) {
        let name = C::name();
        if self.handlers.insert(name, C::execute).is_some() {
            panic!("command registered twice: {name}");
        }
    }

    pub fn dispatch<'a>(&self, command: &str, ctx: &mut Context<'a>, args: Args<'a>) -> Result<()> {
        if let Some(handler) = self.handlers.get(command) {
            handler(ctx, args)
        } else {
            bail!("unknown command: {command}. Type help for the list.");
        }
    }

    pub fn execute_input<'a>(&self, ctx: &mut Context<'a>, input: &'a str) -> Result<()> {
        let mut parts = input.split_whitespace();
        let Some(head) = parts.next() else {
            return Err(anyhow!("no command given"));
        };
        let command_name = head.to_ascii_lowercase();
        let args = Args::new(parts.collect());
        self.dispatch(command_name.as_str(), ctx, args)
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register::<HelpCommand>();
        registry.register::<HelpAliasCommand>();
        registry.register::<OverviewCommand>();
        registry.register::<OverviewAliasCommand>();
        registry.register::<PlayersCommand>();
        registry.register::<EventsCommand>();
        registry.register::<ResolveCommand>();
        registry.register::<AckCommand>();
        registry.register::<DayCommand>();
        registry.register::<WeekCommand>();
        registry.register::<PauseCommand>();
        registry.register::<ResumeCommand>();
        registry.register::<SpeedCommand>();
        registry.register::<UpgradeCommand>();
        registry.register::<SignCommand>();
        registry.register::<ReportsCommand>();
        registry.register::<QuitCommand>();
        registry.register::<ExitCommand>();
        registry
    }
}

pub struct HelpCommand;

impl Command for HelpCommand {
    fn name() -> &'static str {
        "help"
    }

    fn execute(_ctx: &mut Context<'_>, _args: Args<'_>) -> Result<()> {
        print_help();
        Ok(())
    }
}

pub struct HelpAliasCommand;

impl Command for HelpAliasCommand {
    fn name() -> &'static str {
        "?"
    }

    fn execute(ctx: &mut Context<'_>, args: Args<'_>) -> Result<()> {
        HelpCommand::execute(ctx, args)
    }
}

pub struct OverviewCommand;

impl Command for OverviewCommand {
    fn name() -> &'static str {
        "overview"
    }

    fn execute(ctx: &mut Context<'_>, _args: Args<'_>) -> Result<()> {
        print_overview(ctx.controller());
        Ok(())
    }
}

pub struct OverviewAliasCommand;

impl Command for OverviewAliasCommand {
    fn name() -> &'static str {
        "ov"
    }

    fn execute(ctx: &mut Context<'_>, args: Args<'_>) -> Result<()> {
        OverviewCommand::execute(ctx, args)
    }
}

pub struct PlayersCommand;

impl Command for PlayersCommand {
    fn name() -> &'static str {
        "players"
    }

    fn execute(ctx: &mut Context<'_>, _args: Args<'_>) -> Result<()> {
        print_players(ctx.state());
        Ok(())
    }
}

pub struct EventsCommand;

impl Command for EventsCommand {
    fn name() -> &'static str {
        "events"
    }

    fn execute(ctx: &mut Context<'_>, _args: Args<'_>) -> Result<()> {
        print_events(ctx.state());
        Ok(())
    }
}

pub struct ResolveCommand;

impl Command for ResolveCommand {
    fn name() -> &'static str {
        "resolve"
    }

    fn execute(ctx: &mut Context<'_>, mut args: Args<'_>) -> Result<()> {
        let event_id = parse_id(args.next_required("which event? e.g. resolve 3 accept")?)?;
        let option_id = args.next_required("which option? see the events list")?;
        let effects = ctx
            .controller_mut()
            .resolve_event_option(event_id, option_id)?;
        if effects.is_empty() {
            println!("Event {event_id} closed with no effect.");
        } else {
            println!("Event {event_id} resolved with {option_id}.");
            if let Some(delta) = effects.treasury {
                println!("  treasury {delta:+}");
            }
            if let Some(delta) = effects.reputation {
                println!("  reputation {delta:+}");
            }
            if let Some(delta) = effects.experience {
                println!("  experience {delta:+}");
            }
        }
        Ok(())
    }
}

pub struct AckCommand;

impl Command for AckCommand {
    fn name() -> &'static str {
        "ack"
    }

    fn execute(ctx: &mut Context<'_>, mut args: Args<'_>) -> Result<()> {
        let token = args.next_required("give a news id or all")?;
        if token.eq_ignore_ascii_case("all") {
            let ids: Vec<u64> = ctx
                .state()
                .unhandled_game_events()
                .map(|event| event.id)
                .collect();
            for id in &ids {
                ctx.controller_mut().acknowledge_event(*id)?;
            }
            println!("Marked {} item(s) as read.", ids.len());
        } else {
            let id = parse_id(token)?;
            ctx.controller_mut().acknowledge_event(id)?;
            println!("Marked #{id} as read.");
        }
        Ok(())
    }
}

pub struct DayCommand;

impl Command for DayCommand {
    fn name() -> &'static str {
        "day"
    }

    fn execute(ctx: &mut Context<'_>, _args: Args<'_>) -> Result<()> {
        let report = ctx.controller_mut().advance_one_day()?;
        print_day_report(ctx.state(), &report);
        Ok(())
    }
}

pub struct WeekCommand;

impl Command for WeekCommand {
    fn name() -> &'static str {
        "week"
    }

    fn execute(ctx: &mut Context<'_>, _args: Args<'_>) -> Result<()> {
        let reports = ctx.controller_mut().advance_one_week()?;
        for report in &reports {
            print_day_report(ctx.state(), report);
        }
        Ok(())
    }
}

pub struct PauseCommand;

impl Command for PauseCommand {
    fn name() -> &'static str {
        "pause"
    }

    fn execute(ctx: &mut Context<'_>, _args: Args<'_>) -> Result<()> {
        ctx.controller_mut().toggle_pause(true)?;
        println!("Clock paused.");
        Ok(())
    }
}

pub struct ResumeCommand;

impl Command for ResumeCommand {
    fn name() -> &'static str {
        "resume"
    }

    fn execute(ctx: &mut Context<'_>, _args: Args<'_>) -> Result<()> {
        ctx.controller_mut().toggle_pause(false)?;
        println!(
            "Clock running, one day every {:?}.",
            ctx.controller().tick_interval()
        );
        Ok(())
    }
}

pub struct SpeedCommand;

impl Command for SpeedCommand {
    fn name() -> &'static str {
        "speed"
    }

    fn execute(ctx: &mut Context<'_>, mut args: Args<'_>) -> Result<()> {
        let token = args.next_required("give a speed from 1 to 4")?;
        let speed = ctx.controller_mut().set_speed(parse_speed(token)?)?;
        println!(
            "Speed x{} ({:?} per day).",
            speed.multiplier(),
            ctx.controller().tick_interval()
        );
        Ok(())
    }
}

pub struct UpgradeCommand;

impl Command for UpgradeCommand {
    fn name() -> &'static str {
        "upgrade"
    }

    fn execute(ctx: &mut Context<'_>, _args: Args<'_>) -> Result<()> {
        ctx.controller_mut().upgrade_office()?;
        let office = ctx.state().office();
        println!(
            "Moved into the {}: up to {} players and {} staff.",
            office.name, office.max_players, office.max_staff
        );
        Ok(())
    }
}

pub struct SignCommand;

impl Command for SignCommand {
    fn name() -> &'static str {
        "sign"
    }

    fn execute(ctx: &mut Context<'_>, mut args: Args<'_>) -> Result<()> {
        let position = parse_position(args.next_required("give a position, e.g. st")?)?;
        let age: u8 = parse_number(args.next_required("give the player's age")?, "age")?;
        let potential: u8 = parse_number(args.next_required("give the potential (0-100)")?, "potential")?;
        if potential > 100 {
            bail!("potential must be at most 100");
        }
        let market_value: i64 = parse_number(args.next_required("give the market value")?, "value")?;
        let name = args
            .rest()
            .ok_or_else(|| anyhow!("give the player's name"))?;
        let id = ctx.controller_mut().sign_player(PlayerDefinition {
            name: name.clone(),
            position,
            age,
            potential,
            market_value,
        })?;
        println!("Signed {name} as client #{id}.");
        Ok(())
    }
}

pub struct ReportsCommand;

impl Command for ReportsCommand {
    fn name() -> &'static str {
        "reports"
    }

    fn execute(ctx: &mut Context<'_>, mut args: Args<'_>) -> Result<()> {
        let count: usize = match args.next() {
            Some(token) => parse_number(token, "report count")?,
            None => 3,
        };
        print_reports(ctx.state(), count);
        Ok(())
    }
}

pub struct QuitCommand;

impl Command for QuitCommand {
    fn name() -> &'static str {
        "quit"
    }

    fn execute(_ctx: &mut Context<'_>, _args: Args<'_>) -> Result<()> {
        println!("Closing the agency for today.");
        process::exit(0);
    }
}

pub struct ExitCommand;

impl Command for ExitCommand {
    fn name() -> &'static str {
        "exit"
    }

    fn execute(ctx: &mut Context<'_>, args: Args<'_>) -> Result<()> {
        QuitCommand::execute(ctx, args)
    }
}

fn parse_id(token: &str) -> Result<u64> {
    parse_number(token, "id")
}

fn parse_number<T: std::str::FromStr>(token: &str, what: &str) -> Result<T> {
    token
        .parse()
        .map_err(|_| anyhow!("{what} must be a number, got {token}"))
}
