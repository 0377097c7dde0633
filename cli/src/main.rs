use std::io::{self, BufRead, Write};

use anyhow::Result;
use clap::{Parser, ValueEnum};
use minegrid_core::{
    CellCount, Coord, GameConfig, GameSession, GameState, Outcome, Preset, SessionEvent,
};
use rand::{SeedableRng, rngs::SmallRng};
use web_time::{Duration, Instant};

use command::Command;
use render::Screen;

mod command;
mod logging;
mod render;

#[derive(ValueEnum, Copy, Clone, Debug)]
enum PresetArg {
    /// 8x8 board with 10 hazards
    Beginner,
    /// 16x16 board with 40 hazards
    Intermediate,
    /// 16x30 board with 99 hazards
    Expert,
}

impl From<PresetArg> for Preset {
    fn from(preset: PresetArg) -> Self {
        match preset {
            PresetArg::Beginner => Preset::Beginner,
            PresetArg::Intermediate => Preset::Intermediate,
            PresetArg::Expert => Preset::Expert,
        }
    }
}

#[derive(Parser, Debug)]
#[command(version, about = "Terminal host for the minegrid rule engine", long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Difficulty preset, ignored when a custom board is given
    #[arg(short, long, value_enum, default_value_t = PresetArg::Beginner)]
    preset: PresetArg,

    /// Rows of a custom board
    #[arg(long, requires_all = ["cols", "hazards"])]
    rows: Option<Coord>,

    /// Columns of a custom board
    #[arg(long, requires_all = ["rows", "hazards"])]
    cols: Option<Coord>,

    /// Hazards on a custom board
    #[arg(long, requires_all = ["rows", "cols"])]
    hazards: Option<CellCount>,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Print session events as JSON lines instead of drawing the board
    #[arg(long)]
    json: bool,
}

impl Args {
    fn config(&self) -> Result<GameConfig> {
        Ok(match (self.rows, self.cols, self.hazards) {
            (Some(rows), Some(cols), Some(hazards)) => GameConfig::new(rows, cols, hazards)?,
            _ => Preset::from(self.preset).config(),
        })
    }
}

/// Elapsed time of one session, running from the first effective action until it finishes.
#[derive(Debug, Default)]
struct Clock {
    started_at: Option<Instant>,
    frozen: Option<Duration>,
}

impl Clock {
    fn start(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
    }

    fn stop(&mut self) {
        if self.frozen.is_none() {
            self.frozen = Some(self.elapsed());
        }
    }

    fn elapsed(&self) -> Duration {
        self.frozen
            .or_else(|| self.started_at.map(|started_at| started_at.elapsed()))
            .unwrap_or_default()
    }
}

struct Host<W> {
    session: GameSession<SmallRng>,
    clock: Clock,
    json: bool,
    out: W,
}

impl<W: Write> Host<W> {
    /// Runs one command, returns `false` when the player wants to quit.
    fn handle(&mut self, command: Command) -> Result<bool> {
        match command {
            Command::Reveal(coords) => {
                let outcome = self.session.reveal(coords)?;
                if outcome.has_update() {
                    self.clock.start();
                }
            }
            Command::Flag(coords) => {
                let outcome = self.session.toggle_flag(coords)?;
                if outcome.has_update() {
                    self.clock.start();
                }
            }
            Command::Restart => {
                self.session.restart()?;
                self.clock = Clock::default();
            }
            Command::New(config) => {
                self.session.new_session_with(config)?;
                self.clock = Clock::default();
            }
            Command::Help => {
                writeln!(self.out, "{}", command::HELP)?;
                return Ok(true);
            }
            Command::Quit => return Ok(false),
        }
        self.flush_events()?;
        Ok(true)
    }

    fn flush_events(&mut self) -> Result<()> {
        let events: Vec<_> = self.session.drain_events().collect();
        for event in &events {
            log::debug!("{event:?}");
            if self.json {
                writeln!(self.out, "{}", serde_json::to_string(event)?)?;
            }
            if let SessionEvent::StateChanged { state, .. } = event {
                self.clock.stop();
                self.report(*state)?;
            }
        }
        if !self.json && !events.is_empty() {
            write!(self.out, "{}", Screen(&self.session.snapshot()))?;
        }
        Ok(())
    }

    fn report(&mut self, state: GameState) -> Result<()> {
        if self.json {
            return Ok(());
        }
        let verdict = match state {
            GameState::Finished(Outcome::Win) => "All safe cells cleared, you win!",
            GameState::Finished(Outcome::Loss) => "Boom! You hit a hazard.",
            GameState::Active => return Ok(()),
        };
        writeln!(
            self.out,
            "{verdict} {}s, revealed {}/{}, flags left {}. Type `n` to play again.",
            self.clock.elapsed().as_secs(),
            self.session.revealed_count(),
            self.session.cells_to_reveal(),
            self.session.remaining_flags()
        )?;
        Ok(())
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose.log_level_filter());

    let config = args.config()?;
    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!("seed: {seed}");

    let session = GameSession::new(config, SmallRng::seed_from_u64(seed))?;
    let mut host = Host {
        session,
        clock: Clock::default(),
        json: args.json,
        out: io::stdout().lock(),
    };
    if !host.json {
        writeln!(host.out, "{}", command::HELP)?;
    }
    host.flush_events()?;

    for line in io::stdin().lock().lines() {
        let line = line?;
        match command::parse(&line).and_then(|command| host.handle(command)) {
            Ok(true) => {}
            Ok(false) => break,
            Err(err) => writeln!(host.out, "error: {err:#}")?,
        }
        host.out.flush()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use minegrid_core::Board;

    fn host(json: bool) -> Host<Vec<u8>> {
        let board = Board::from_hazard_coords(1, 3, &[(0, 1)]).unwrap();
        let mut host = Host {
            session: GameSession::with_board(board, SmallRng::seed_from_u64(0)).unwrap(),
            clock: Clock::default(),
            json,
            out: Vec::new(),
        };
        host.session.drain_events().for_each(drop);
        host
    }

    fn output(host: &Host<Vec<u8>>) -> String {
        String::from_utf8(host.out.clone()).unwrap()
    }

    #[test]
    fn custom_board_overrides_preset() {
        let args = Args::parse_from(["minegrid", "--rows", "4", "--cols", "5", "--hazards", "3"]);
        assert_eq!(args.config().unwrap(), GameConfig::new_unchecked(4, 5, 3));

        let args = Args::parse_from(["minegrid", "-p", "expert"]);
        assert_eq!(args.config().unwrap(), GameConfig::expert());
    }

    #[test]
    fn custom_board_needs_all_dimensions() {
        assert!(Args::try_parse_from(["minegrid", "--rows", "4"]).is_err());
    }

    #[test]
    fn win_reports_counters() {
        let mut host = host(false);

        assert!(host.handle(Command::Reveal((0, 0))).unwrap());
        assert!(host.handle(Command::Reveal((0, 2))).unwrap());

        let text = output(&host);
        assert!(text.contains("you win!"));
        assert!(text.contains("revealed 2/2"));
        assert!(host.clock.frozen.is_some());
    }

    #[test]
    fn json_mode_prints_events() {
        let mut host = host(true);

        host.handle(Command::Flag((0, 1))).unwrap();

        let text = output(&host);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with(r#"{"CellChanged":"#));
        assert_eq!(lines[1], r#"{"FlagsChanged":{"remaining":0}}"#);
    }

    #[test]
    fn quit_stops_the_loop() {
        let mut host = host(false);
        assert!(!host.handle(Command::Quit).unwrap());
    }

    #[test]
    fn restart_resets_clock() {
        let mut host = host(false);
        host.handle(Command::Reveal((0, 0))).unwrap();
        assert!(host.clock.started_at.is_some());

        host.handle(Command::Restart).unwrap();

        assert!(host.clock.started_at.is_none());
        assert_eq!(host.session.revealed_count(), 0);
    }
}
