use std::{
    error::Error,
    fmt::{self, Display, Formatter, Write as _},
    io::{self, BufRead, Write, stderr, stdin, stdout},
    str::FromStr,
};

use rand::{SeedableRng, rngs::SmallRng, seq::IndexedRandom};

use crate::{
    board_display::BoardDisplay,
    coord::{Coord, ParseCoordError},
    game::Game,
    piece::PieceKind,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Input {
    Help,
    New,
    Undo,
    Random,
    Debug,
    Quit,
    Move(Coord, Coord),
}
impl FromStr for Input {
    type Err = ParseInputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "help" => Ok(Input::Help),
            "new" => Ok(Input::New),
            "undo" => Ok(Input::Undo),
            "random" => Ok(Input::Random),
            "debug" => Ok(Input::Debug),
            "quit" => Ok(Input::Quit),
            s => {
                let Some((start, end)) = s.split_once(' ') else {
                    return Err(ParseInputError::NotAMove);
                };
                Ok(Input::Move(start.trim().parse()?, end.trim().parse()?))
            }
        }
    }
}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum ParseInputError {
    NotAMove,
    Coord(ParseCoordError),
}
impl From<ParseCoordError> for ParseInputError {
    fn from(value: ParseCoordError) -> Self {
        ParseInputError::Coord(value)
    }
}
impl Display for ParseInputError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ParseInputError::NotAMove => write!(
                f,
                "enter a move as two digit pairs separated by a space, such as `04 05`"
            )?,
            ParseInputError::Coord(err) => write!(f, "{err}")?,
        }
        Ok(())
    }
}
impl Error for ParseInputError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ParseInputError::NotAMove => None,
            ParseInputError::Coord(err) => Some(err),
        }
    }
}
pub fn repl() -> io::Result<()> {
    let input = stdin().lock();
    let mut output = stdout().lock();
    let mut error = stderr().lock();

    let mut lines = input.lines();

    let mut rng = SmallRng::from_os_rng();
    let mut game = Game::new();
    let mut debug = false;
    let mut info = String::new();
    let mut first_time = true;
    let mut update = true;
    loop {
        if update {
            info.clear();
            match game.board().winner() {
                Some(winner) => writeln!(&mut info, "{winner} wins").unwrap(),
                None => writeln!(&mut info, "{} plays", game.board().turn()).unwrap(),
            }
        }
        if first_time {
            writeln!(&mut info, "type `help` for instructions").unwrap();
            first_time = false;
        }
        update = false;
        writeln!(
            output,
            "{}",
            BoardDisplay {
                board: game.board(),
                info: &info,
            },
        )?;
        loop {
            write!(output, "> ")?;
            output.flush()?;
            let Some(text) = lines.next() else {
                return Ok(());
            };
            let text = text?;
            let input = match text.trim().parse() {
                Ok(input) => input,
                Err(err) => {
                    writeln!(error, "Error: {err}")?;
                    continue;
                }
            };
            match input {
                Input::Help => {
                    writeln!(output, "new    - start a new game")?;
                    writeln!(
                        output,
                        "04 05  - move the piece on column 0 row 4 to column 0 row 5"
                    )?;
                    writeln!(output, "undo   - take back the latest recorded move")?;
                    writeln!(output, "random - play a random permitted move")?;
                    writeln!(output, "debug  - toggle move classification traces")?;
                    writeln!(output, "quit   - quit the game")?;
                }
                Input::New => {
                    game = Game::new();
                    game.set_debug(debug);
                    update = true;
                }
                Input::Undo => match game.undo_last() {
                    Ok(record) => {
                        writeln!(output, "took back {record}")?;
                        update = true;
                    }
                    Err(err) => {
                        writeln!(error, "Error: {err}")?;
                        continue;
                    }
                },
                Input::Random => {
                    let moves = game.board().classified_moves();
                    let Some((start, end, _)) = moves.choose(&mut rng).copied() else {
                        writeln!(error, "Error: no move available")?;
                        continue;
                    };
                    match game.play(start, end) {
                        Ok(played) => {
                            writeln!(output, "{}", played.record)?;
                            if played.promotion.is_some()
                                && let Ok(coord) = game.promote(PieceKind::Queen)
                            {
                                writeln!(output, "pawn on {coord} promoted to queen")?;
                            }
                            update = true;
                        }
                        Err(err) => {
                            writeln!(error, "Error: {err}")?;
                            continue;
                        }
                    }
                }
                Input::Debug => {
                    debug = !debug;
                    game.set_debug(debug);
                    writeln!(output, "debug {}", if debug { "on" } else { "off" })?;
                }
                Input::Quit => return Ok(()),
                Input::Move(start, end) => match game.play(start, end) {
                    Ok(played) => {
                        writeln!(output, "{}", played.record)?;
                        if let Some(coord) = played.promotion {
                            prompt_promotion(&mut lines, &mut output, &mut error, &mut game, coord)?;
                        }
                        update = true;
                    }
                    Err(err) => {
                        writeln!(error, "Error: {err}")?;
                        continue;
                    }
                },
            }
            break;
        }
    }
}
fn prompt_promotion(
    lines: &mut io::Lines<io::StdinLock<'static>>,
    output: &mut io::StdoutLock<'static>,
    error: &mut io::StderrLock<'static>,
    game: &mut Game,
    coord: Coord,
) -> io::Result<()> {
    loop {
        write!(output, "promote pawn on {coord} to [q/r/b/n]: ")?;
        output.flush()?;
        let Some(text) = lines.next() else {
            return Ok(());
        };
        let text = text?;
        let mut chars = text.trim().chars();
        let letter = match (chars.next(), chars.next()) {
            (Some(letter), None) => letter,
            _ => {
                writeln!(error, "Error: enter a single letter")?;
                continue;
            }
        };
        let kind = match PieceKind::from_promotion_letter(letter) {
            Ok(kind) => kind,
            Err(err) => {
                writeln!(error, "Error: {err}")?;
                continue;
            }
        };
        match game.promote(kind) {
            Ok(_) => return Ok(()),
            Err(err) => writeln!(error, "Error: {err}")?,
        }
    }
}
