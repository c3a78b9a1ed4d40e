//! Interactive prompt loop.
//!
//! Reads from any `BufRead` and writes to any `Write` so the whole game can be
//! scripted in tests. Bad input is answered with a message and a fresh prompt;
//! end of input is treated as quitting.
use std::io::{BufRead, Write};

use anyhow::Result;
use colored::Colorize;
use ecohk_game::{
    ActionOutcome, Catalog, DayReport, GameEngine, GameSession, LocationId, ResultSummary,
    SessionError,
};

const MENU: [&str; 7] = [
    "Perform an action",
    "Change location",
    "End the day",
    "Learn a sustainability fact",
    "Get a sustainability tip",
    "Learn about this location",
    "Quit",
];

pub struct PromptLoop<R, W> {
    input: R,
    output: W,
}

enum Command {
    Act,
    Travel,
    EndDay,
    Fact,
    Tip,
    LocationFact,
    Quit,
}

impl Command {
    fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Self::Act),
            "2" => Some(Self::Travel),
            "3" => Some(Self::EndDay),
            "4" => Some(Self::Fact),
            "5" => Some(Self::Tip),
            "6" => Some(Self::LocationFact),
            "7" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// 1-based menu entry to a 0-based index below `count`.
fn parse_choice(input: &str, count: usize) -> Option<usize> {
    let number = input.trim().parse::<usize>().ok()?;
    (1..=count).contains(&number).then(|| number - 1)
}

impl<R: BufRead, W: Write> PromptLoop<R, W> {
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print `prompt` and read one line; `None` at end of input.
    fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Play one game to the end. Returns `None` if input ended before a name
    /// was entered.
    pub fn run(
        &mut self,
        engine: &GameEngine,
        name: Option<&str>,
        seed: u64,
    ) -> Result<Option<ResultSummary>> {
        writeln!(
            self.output,
            "{}",
            "🌏 Hong Kong Sustainability Challenge".bright_green().bold()
        )?;
        writeln!(self.output, "{}", "=====================================".green())?;

        let Some(mut session) = self.start_session(engine, name, seed)? else {
            writeln!(self.output, "Goodbye!")?;
            return Ok(None);
        };

        let days = session.rules().horizon_days;
        writeln!(
            self.output,
            "\nWelcome, {}! You have {days} days to make Hong Kong more sustainable.",
            session.state().name
        )?;
        if let Some(fact) = session.random_fact() {
            writeln!(self.output, "Did you know? {fact}")?;
        }

        while !session.is_over() {
            self.show_status(&session)?;
            let Some(line) = self.ask("Choose an option (1-7): ")? else {
                session.quit();
                break;
            };
            let Some(command) = Command::parse(&line) else {
                writeln!(
                    self.output,
                    "Invalid choice. Please enter a number from 1 to 7."
                )?;
                continue;
            };
            match command {
                Command::Act => self.choose_action(&mut session)?,
                Command::Travel => self.choose_location(&mut session)?,
                Command::EndDay => {
                    let report = session.end_day()?;
                    self.show_day_report(&report)?;
                }
                Command::Fact => {
                    let fact = session.random_fact();
                    self.show_line("Did you know?", fact)?;
                }
                Command::Tip => {
                    let tip = session.random_tip();
                    self.show_line("Tip:", tip)?;
                }
                Command::LocationFact => {
                    let fact = session.location_fact();
                    self.show_line(session.state().location.title(), fact)?;
                }
                Command::Quit => self.confirm_quit(&mut session)?,
            }
        }

        let summary = session.summary();
        self.show_results(&summary)?;
        if let Some(fact) = session.random_fact() {
            writeln!(self.output, "\nOne last thing to remember: {fact}")?;
        }
        writeln!(self.output, "Thanks for playing!")?;
        self.output.flush()?;
        Ok(Some(summary))
    }

    fn start_session(
        &mut self,
        engine: &GameEngine,
        name: Option<&str>,
        seed: u64,
    ) -> Result<Option<GameSession>> {
        if let Some(name) = name
            && let Ok(session) = engine.create_session(name, seed)
        {
            return Ok(Some(session));
        }
        loop {
            let Some(line) = self.ask("Enter your name: ")? else {
                return Ok(None);
            };
            match engine.create_session(&line, seed) {
                Ok(session) => return Ok(Some(session)),
                Err(err) => writeln!(self.output, "{err}. Please try again.")?,
            }
        }
    }

    fn show_status(&mut self, session: &GameSession) -> Result<()> {
        let state = session.state();
        writeln!(self.output)?;
        writeln!(
            self.output,
            "{}",
            format!(
                "Day {}/{} | {} | Eco points: {} | Energy: {} | Sustainability: {:.1}",
                state.day,
                session.rules().horizon_days,
                state.name,
                state.eco_points,
                state.energy,
                state.sustainability_level
            )
            .bold()
        )?;
        writeln!(
            self.output,
            "You are at {}: {}",
            state.location.title(),
            session.location_description()
        )?;
        writeln!(self.output, "Available actions:")?;
        let catalog = session.catalog();
        for (idx, action) in session.available_actions().iter().enumerate() {
            let label = Catalog::action_label(action);
            match catalog.effect(action).map(|e| e.description.as_str()) {
                Some(desc) if !desc.is_empty() => {
                    writeln!(self.output, "  {}. {label} - {desc}", idx + 1)?;
                }
                _ => writeln!(self.output, "  {}. {label}", idx + 1)?,
            }
        }
        writeln!(self.output, "What would you like to do?")?;
        for (idx, entry) in MENU.iter().enumerate() {
            writeln!(self.output, "  {}. {entry}", idx + 1)?;
        }
        Ok(())
    }

    fn choose_action(&mut self, session: &mut GameSession) -> Result<()> {
        let count = session.available_actions().len();
        loop {
            let Some(line) = self.ask(&format!("Choose an action (1-{count}): "))? else {
                session.quit();
                return Ok(());
            };
            let Some(index) = parse_choice(&line, count) else {
                writeln!(self.output, "Invalid action number. Please try again.")?;
                continue;
            };
            match session.perform_action_at(index) {
                Ok(outcome) => return self.show_outcome(&outcome, session),
                Err(err) => writeln!(self.output, "{err}. Please try again.")?,
            }
        }
    }

    fn show_outcome(&mut self, outcome: &ActionOutcome, session: &GameSession) -> Result<()> {
        let effect = &outcome.effect;
        let label = Catalog::action_label(&outcome.action);
        let line = format!(
            "You chose to {label}. Eco points {:+}, energy {:+}, sustainability {:+.1}.",
            effect.eco_points, effect.energy, effect.sustainability
        );
        if effect.is_harmful() {
            writeln!(self.output, "{}", line.red())?;
        } else {
            writeln!(self.output, "{}", line.green())?;
        }
        if !effect.description.is_empty() {
            writeln!(self.output, "  {}", effect.description)?;
        }
        if outcome.exhausted {
            writeln!(
                self.output,
                "You're exhausted! Your energy has been reset to {}.",
                session.rules().exhaustion_floor
            )?;
        }
        Ok(())
    }

    fn choose_location(&mut self, session: &mut GameSession) -> Result<()> {
        writeln!(self.output, "Where would you like to go?")?;
        for (idx, id) in LocationId::ALL.iter().enumerate() {
            let marker = if *id == session.state().location {
                " (you are here)"
            } else {
                ""
            };
            writeln!(self.output, "  {}. {}{marker}", idx + 1, id.title())?;
        }
        let count = LocationId::ALL.len();
        loop {
            let Some(line) = self.ask(&format!("Choose a location (1-{count}): "))? else {
                session.quit();
                return Ok(());
            };
            let Some(index) = parse_choice(&line, count) else {
                writeln!(self.output, "Invalid location number. Please try again.")?;
                continue;
            };
            match session.travel_to_index(index) {
                Ok(outcome) => {
                    writeln!(
                        self.output,
                        "You traveled to {}. Energy is now {}.",
                        outcome.to.title(),
                        outcome.energy
                    )?;
                    return Ok(());
                }
                Err(SessionError::AlreadyThere(id)) => writeln!(
                    self.output,
                    "You are already at {}. Pick somewhere else.",
                    id.title()
                )?,
                Err(err) => writeln!(self.output, "{err}. Please try again.")?,
            }
        }
    }

    fn show_day_report(&mut self, report: &DayReport) -> Result<()> {
        writeln!(
            self.output,
            "\n{}",
            format!("Day {} is over.", report.ended_day).bright_cyan()
        )?;
        writeln!(self.output, "{}", report.status)?;
        writeln!(
            self.output,
            "Eco points: {} | Sustainability: {:.1} | Energy restored to {}",
            report.eco_points, report.sustainability_level, report.energy
        )?;
        if let Some(fact) = &report.fact {
            writeln!(self.output, "Did you know? {fact}")?;
        }
        Ok(())
    }

    fn show_line(&mut self, heading: &str, text: Option<String>) -> Result<()> {
        match text {
            Some(text) => writeln!(self.output, "{} {text}", heading.bold())?,
            None => writeln!(self.output, "Nothing to share here yet.")?,
        }
        Ok(())
    }

    fn confirm_quit(&mut self, session: &mut GameSession) -> Result<()> {
        let answer = self.ask("Are you sure you want to quit? (y/n): ")?;
        match answer.as_deref().map(str::to_ascii_lowercase).as_deref() {
            None | Some("y" | "yes") => session.quit(),
            _ => writeln!(self.output, "Back to the game.")?,
        }
        Ok(())
    }

    fn show_results(&mut self, summary: &ResultSummary) -> Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "{}", "🏁 Final Results".bright_yellow().bold())?;
        writeln!(self.output, "{}", "================".yellow())?;
        writeln!(self.output, "Player: {}", summary.name)?;
        writeln!(self.output, "Days played: {}", summary.days_played)?;
        writeln!(self.output, "Eco points: {}", summary.eco_points)?;
        writeln!(
            self.output,
            "Sustainability level: {:.1}",
            summary.sustainability_level
        )?;
        writeln!(self.output, "Rank: {}", summary.eco_rank)?;
        writeln!(self.output, "{}", summary.status)?;
        writeln!(self.output, "{}", summary.headline())?;
        Ok(())
    }
}
