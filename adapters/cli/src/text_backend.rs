use std::io::Write;

use anyhow::{Context, Result};
use hulkgen_rendering::{Frame, RenderingBackend};

const FILLED_GLYPH: char = '#';
const EMPTY_GLYPH: char = ' ';
const CELL_SEPARATOR: char = '|';

/// Console backend that prints one `|`-delimited line per grid row.
#[derive(Debug)]
pub(crate) struct TextBackend<W> {
    out: W,
}

impl<W: Write> TextBackend<W> {
    /// Creates a backend writing into the provided sink.
    pub(crate) fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RenderingBackend for TextBackend<W> {
    fn present(&mut self, frame: &Frame) -> Result<()> {
        let columns = frame.columns as usize;
        let mut board = vec![vec![EMPTY_GLYPH; columns]; frame.rows as usize];
        for tile in &frame.tiles {
            if let Some(cell) = board
                .get_mut(tile.cell.row() as usize)
                .and_then(|row| row.get_mut(tile.cell.column() as usize))
            {
                *cell = FILLED_GLYPH;
            }
        }

        for row in board {
            let mut line = String::with_capacity(columns * 2 + 1);
            line.push(CELL_SEPARATOR);
            for glyph in row {
                line.push(glyph);
                line.push(CELL_SEPARATOR);
            }
            writeln!(self.out, "{line}").context("failed to write board row")?;
        }
        self.out.flush().context("failed to flush board output")
    }
}
