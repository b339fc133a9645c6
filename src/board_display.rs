use std::fmt::{self, Display, Formatter};

use crate::board::Board;

pub struct BoardDisplay<'a, 'b> {
    pub board: &'a Board,
    pub info: &'b str,
}
impl Display for BoardDisplay<'_, '_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut lines = self.info.lines().fuse();
        writeln!(f, "   0  1  2  3  4  5  6  7")?;
        for (i, cells) in self.board.display().iter().enumerate() {
            write!(f, "{} ", 7 - i)?;
            for cell in cells {
                if cell.is_empty() {
                    write!(f, " ..")?;
                } else {
                    write!(f, " {cell}")?;
                }
            }
            if let Some(line) = lines.next() {
                write!(f, "  {line}")?;
            }
            writeln!(f)?;
        }
        for line in lines {
            writeln!(f, "{:28}{line}", "")?;
        }
        Ok(())
    }
}
