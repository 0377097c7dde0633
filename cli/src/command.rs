use anyhow::{Context, Result, bail};
use minegrid_core::{Coord, Coord2, GameConfig, Preset};

pub const HELP: &str = "\
commands:
  r X Y          reveal the cell at row X, column Y
  f X Y          toggle a flag at row X, column Y
  n              start over with the same board size
  n PRESET       start a beginner, intermediate or expert game
  n ROWS COLS N  start a custom game with N hazards
  h              show this help
  q              quit";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Reveal(Coord2),
    Flag(Coord2),
    Restart,
    New(GameConfig),
    Help,
    Quit,
}

pub fn parse(line: &str) -> Result<Command> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        bail!("empty command, type `h` for help");
    };
    let args: Vec<&str> = words.collect();

    Ok(match (verb, args.as_slice()) {
        ("r" | "reveal", [x, y]) => Command::Reveal(coords(x, y)?),
        ("f" | "flag", [x, y]) => Command::Flag(coords(x, y)?),
        ("n" | "new", []) => Command::Restart,
        ("n" | "new", [name]) => Command::New(preset(name)?.config()),
        ("n" | "new", [rows, cols, hazards]) => {
            let hazards = hazards
                .parse()
                .with_context(|| format!("invalid hazard count `{hazards}`"))?;
            Command::New(GameConfig::new(number(rows)?, number(cols)?, hazards)?)
        }
        ("h" | "help" | "?", []) => Command::Help,
        ("q" | "quit", []) => Command::Quit,
        _ => bail!("unknown command `{}`, type `h` for help", line.trim()),
    })
}

fn coords(x: &str, y: &str) -> Result<Coord2> {
    Ok((number(x)?, number(y)?))
}

fn number(word: &str) -> Result<Coord> {
    word.parse()
        .with_context(|| format!("invalid coordinate `{word}`"))
}

fn preset(name: &str) -> Result<Preset> {
    Ok(match name {
        "beginner" | "b" => Preset::Beginner,
        "intermediate" | "i" => Preset::Intermediate,
        "expert" | "e" => Preset::Expert,
        _ => bail!("unknown preset `{name}`"),
    })
}
