use std::error::Error;
use std::fs;
use std::io::{self, BufRead};
use std::path::PathBuf;

use log::info;
use quadoku_core::{Generator, Position, Puzzle, SaveState};

use crate::render;
use crate::Args;

/// Result of handling a command.
enum AppAction {
    Continue,
    Quit,
}

/// Game settings carried across `new` commands.
#[derive(Debug, Clone, Copy)]
struct Settings {
    dimension: usize,
    max_misses: u32,
    max_hints: u32,
}

/// A parsed player command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Start a new game, optionally with new dimension/miss/hint settings.
    New(Option<(usize, u32, u32)>),
    Exit,
    Hint,
    Save,
    Load,
    /// Change the selected value.
    Select(u8),
    /// Place the selected value, 1-based row and column as typed.
    Place(usize, usize),
    Unknown,
}

fn parse_command(input: &str) -> Command {
    let trimmed = input.trim();
    if trimmed.eq_ignore_ascii_case("exit") || trimmed.eq_ignore_ascii_case("quit") {
        return Command::Exit;
    }
    if trimmed.eq_ignore_ascii_case("hint") || trimmed.eq_ignore_ascii_case("h") {
        return Command::Hint;
    }
    if trimmed.eq_ignore_ascii_case("save") {
        return Command::Save;
    }
    if trimmed.eq_ignore_ascii_case("load") {
        return Command::Load;
    }

    let parts: Vec<&str> = trimmed.split_whitespace().collect();
    match parts.as_slice() {
        [head] if head.eq_ignore_ascii_case("new") => Command::New(None),
        [head, dim, misses, hints] if head.eq_ignore_ascii_case("new") => {
            match (dim.parse(), misses.parse(), hints.parse()) {
                (Ok(dim), Ok(misses), Ok(hints)) => Command::New(Some((dim, misses, hints))),
                _ => Command::Unknown,
            }
        }
        [value] => value
            .parse()
            .map(Command::Select)
            .unwrap_or(Command::Unknown),
        [row, col] => match (row.parse(), col.parse()) {
            (Ok(row), Ok(col)) => Command::Place(row, col),
            _ => Command::Unknown,
        },
        _ => Command::Unknown,
    }
}

/// A running game plus the cross-game pieces: the RNG stream and the settings
/// the next `new` will reuse.
struct Session {
    puzzle: Puzzle,
    generator: Generator,
    settings: Settings,
    selected: u8,
}

impl Session {
    fn start(args: &Args) -> Result<Self, Box<dyn Error>> {
        let settings = Settings {
            dimension: args.dimension,
            max_misses: args.misses,
            max_hints: args.hints,
        };
        let mut generator = match args.seed {
            Some(seed) => Generator::with_seed(seed),
            None => Generator::new(),
        };
        render::generating(settings.dimension);
        let puzzle = Puzzle::from_generator(
            &mut generator,
            settings.dimension,
            settings.max_misses,
            settings.max_hints,
        )?;
        Ok(Self {
            puzzle,
            generator,
            settings,
            selected: 1,
        })
    }

    fn new_game(&mut self, settings: Option<(usize, u32, u32)>) -> Result<(), Box<dyn Error>> {
        if let Some((dimension, max_misses, max_hints)) = settings {
            self.settings = Settings {
                dimension,
                max_misses,
                max_hints,
            };
        }
        render::generating(self.settings.dimension);
        self.puzzle = Puzzle::from_generator(
            &mut self.generator,
            self.settings.dimension,
            self.settings.max_misses,
            self.settings.max_hints,
        )?;
        self.selected = 1;
        Ok(())
    }

    fn redraw(&self) -> io::Result<()> {
        render::title()?;
        render::status(
            self.selected,
            self.puzzle.misses_remaining(),
            self.puzzle.hints_remaining(),
        );
        render::board(&self.puzzle, self.selected);
        Ok(())
    }

    fn handle(&mut self, line: &str) -> Result<AppAction, Box<dyn Error>> {
        match parse_command(line) {
            Command::Exit => {
                render::goodbye();
                return Ok(AppAction::Quit);
            }
            Command::New(settings) => {
                self.new_game(settings)?;
                self.redraw()?;
            }
            Command::Hint => {
                if self.puzzle.hints_remaining() == 0 {
                    self.redraw()?;
                    println!("No hints left.");
                } else {
                    self.puzzle.reveal_hint();
                    self.redraw()?;
                }
            }
            Command::Select(value) => {
                let n = self.puzzle.dimension();
                if (1..=n).contains(&usize::from(value)) {
                    self.selected = value;
                    self.redraw()?;
                } else {
                    println!("The value must be between 1 and {n}.");
                }
            }
            Command::Place(row, col) => {
                let n = self.puzzle.dimension();
                if (1..=n).contains(&row) && (1..=n).contains(&col) {
                    self.puzzle
                        .attempt_placement(Position::new(row - 1, col - 1), self.selected);
                    self.redraw()?;
                } else {
                    println!("Rows and columns run from 1 to {n}.");
                }
            }
            Command::Save => match self.save() {
                Ok(path) => println!("Game saved to {}.", path.display()),
                Err(err) => println!("Could not save the game: {err}"),
            },
            Command::Load => match self.load() {
                Ok(()) => {
                    self.selected = 1;
                    self.redraw()?;
                    println!("Game loaded.");
                }
                Err(err) => println!("Could not load a saved game: {err}"),
            },
            Command::Unknown => {
                println!("Enter a value to select it, ROW COL to place, or one of: new, hint, save, load, exit.");
            }
        }
        Ok(AppAction::Continue)
    }

    fn save(&self) -> Result<PathBuf, Box<dyn Error>> {
        let path = save_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(&self.puzzle.save_state())?;
        fs::write(&path, json)?;
        info!("saved game to {}", path.display());
        Ok(path)
    }

    fn load(&mut self) -> Result<(), Box<dyn Error>> {
        let json = fs::read_to_string(save_path())?;
        let state: SaveState = serde_json::from_str(&json)?;
        self.puzzle = Puzzle::restore(state).ok_or("the save file is inconsistent")?;
        Ok(())
    }
}

fn save_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("quadoku")
        .join("save.json")
}

fn read_line(stdin: &io::Stdin) -> io::Result<Option<String>> {
    let mut buffer = String::new();
    if stdin.lock().read_line(&mut buffer)? == 0 {
        Ok(None)
    } else {
        Ok(Some(buffer))
    }
}

/// Runs the turn-based game loop until the player quits or input ends.
pub fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    render::title()?;
    render::intro();

    let mut session = Session::start(args)?;
    session.redraw()?;

    let stdin = io::stdin();
    loop {
        let Some(line) = read_line(&stdin)? else {
            break;
        };
        match session.handle(&line)? {
            AppAction::Quit => break,
            AppAction::Continue => {}
        }

        if session.puzzle.is_solved() {
            render::victory();
            if !keep_playing(&stdin)? {
                render::goodbye();
                break;
            }
            session.new_game(None)?;
            session.redraw()?;
        } else if session.puzzle.misses_remaining() == 0 {
            render::failure();
            if !keep_playing(&stdin)? {
                render::goodbye();
                break;
            }
            session.new_game(None)?;
            session.redraw()?;
        }
    }
    Ok(())
}

fn keep_playing(stdin: &io::Stdin) -> io::Result<bool> {
    match read_line(stdin)? {
        None => Ok(false),
        Some(reply) => Ok(!reply.trim().eq_ignore_ascii_case("n")),
    }
}
