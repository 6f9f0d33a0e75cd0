use std::io;

use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::style::Stylize;
use crossterm::terminal::{Clear, ClearType};
use quadoku_core::{Position, Puzzle};

const LOGO: &str = r"  ___  _   _   _   ___   ___  _  __ _   _
 / _ \| | | | / \ |   \ / _ \| |/ /| | | |
| (_) | |_| |/ _ \| |) | (_) |   < | |_| |
 \__\_\\___//_/ \_\___/ \___/|_|\_\ \___/";

/// Clears the screen and prints the logo.
pub fn title() -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, Clear(ClearType::All), MoveTo(0, 0))?;
    println!("{}", LOGO.yellow());
    println!();
    Ok(())
}

pub fn intro() {
    println!("How to play:");
    println!();
    println!("Fill the board so that every row, column, and region contains");
    println!("each value exactly once. Enter a value to select it, then enter");
    println!("the row and column to place it. Wrong guesses cost a miss, and");
    println!("running out of misses loses the game.");
    println!();
    println!("Commands: a value to select, ROW COL to place, 'hint' for a");
    println!("free cell, 'new [DIM MISSES HINTS]' for a fresh board, 'save'");
    println!("and 'load' to keep a game for later, 'exit' to quit.");
    println!();
}

pub fn generating(dimension: usize) {
    println!("Generating a board...  (dimension {dimension})");
}

/// The selected value, misses left, and hints left.
pub fn status(selected: u8, misses_left: u32, hints_left: u32) {
    println!(" -------------------------------------------------");
    println!("  Current selected value : {}", selected.to_string().green());
    println!("   Number of misses left : {misses_left}");
    println!("    Number of hints left : {hints_left}");
    println!(" -------------------------------------------------");
}

/// Draws the board with region borders, highlighting the selected value.
pub fn board(puzzle: &Puzzle, selected: u8) {
    for line in board_lines(puzzle, selected) {
        println!("{line}");
    }
    println!("Enter a value within the domain to change the selection.");
    println!("To place the selected value, enter ROW COL.");
}

/// Board lines, region-aware: `|` opens each region column and `:` separates
/// cells inside one; region-bottom rows are drawn with `_`, inner rows
/// with `.`.
fn board_lines(puzzle: &Puzzle, selected: u8) -> Vec<String> {
    let n = puzzle.dimension();
    let r = puzzle.region_size();
    let w = digit_width(n);
    let mut lines = Vec::with_capacity(2 + 2 * n);

    let mut key = " ".repeat(w + 1);
    for col in 0..n {
        key.push_str(&format!("  {:>w$} ", col + 1));
    }
    lines.push(key);

    let mut top = " ".repeat(w + 2);
    top.push_str(&"_".repeat(n * (w + 3) - 1));
    lines.push(top);

    for row in 0..n {
        let mut line = format!("{:>w$} ", row + 1);
        for col in 0..n {
            line.push(if col % r == 0 { '|' } else { ':' });
            line.push(' ');
            match puzzle.value(Position::new(row, col)) {
                Some(value) => {
                    let cell = format!("{value:>w$}");
                    if value == selected {
                        line.push_str(&format!("{}", cell.green()));
                    } else {
                        line.push_str(&cell);
                    }
                }
                None => line.push_str(&" ".repeat(w)),
            }
            line.push(' ');
        }
        line.push('|');
        lines.push(line);

        let bottom = (row + 1) % r == 0;
        let fill = if bottom { "_" } else { "." };
        let mut sep = " ".repeat(w + 1);
        for col in 0..n {
            sep.push(if col % r == 0 {
                '|'
            } else if bottom {
                ';'
            } else {
                ':'
            });
            sep.push_str(&fill.repeat(w + 2));
        }
        sep.push('|');
        lines.push(sep);
    }

    lines
}

pub fn victory() {
    println!("{}", "Congratulations!".green());
    println!("Keep playing? [y/n]");
}

pub fn failure() {
    println!("{}", "Better luck next time!".red());
    println!("Keep playing? [y/n]");
}

pub fn goodbye() {
    println!("Goodbye!");
}

fn digit_width(n: usize) -> usize {
    n.to_string().len()
}
