#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]

use std::io;

mod board;
mod board_display;
mod color;
mod coord;
mod game;
mod history;
mod piece;
mod repl;

fn main() -> io::Result<()> {
    repl::repl()
}
