use std::io::{self, BufRead, Write};

use super::{Piece, Puzzle};
use crate::io::{next_valid_line, ReadError};

/// Reads the line-oriented puzzle form:
///
/// ```text
/// ROWS: 1 1 1        # per-row piece counts
/// COLS: 0 3 0        # per-column piece counts
/// FIXED:
/// 0,1: Vertical      # zero-indexed row,col and piece name
/// ```
///
/// Keywords are case-insensitive, `#` starts a comment and blank lines are
/// skipped. `ROWS` and `COLS` are mandatory and must sum to the same total.
pub fn read_tracks_problem<R: BufRead>(reader: &mut R) -> Result<Puzzle, ReadError> {
    let mut rows: Option<Vec<i32>> = None;
    let mut cols: Option<Vec<i32>> = None;
    let mut fixed: Vec<(usize, usize, Piece)> = vec![];
    let mut in_fixed = false;
    let mut buffer = String::new();

    loop {
        if next_valid_line(reader, &mut buffer)? == 0 {
            break;
        }
        let line = buffer.split('#').next().unwrap_or("").trim();
        let keyword = line.to_ascii_uppercase();
        if let Some(rest) = keyword.strip_prefix("ROWS:") {
            rows = Some(parse_counts(rest)?);
        } else if let Some(rest) = keyword.strip_prefix("COLS:") {
            cols = Some(parse_counts(rest)?);
        } else if keyword == "FIXED:" {
            in_fixed = true;
        } else if in_fixed {
            fixed.push(parse_fixed(line)?);
        } else {
            return Err(ReadError::InvalidFormat);
        }
    }

    let rows = rows.ok_or(ReadError::InvalidFormat)?;
    let cols = cols.ok_or(ReadError::InvalidFormat)?;
    if rows.iter().sum::<i32>() != cols.iter().sum::<i32>() {
        return Err(ReadError::InvalidValue);
    }

    let height = rows.len();
    let width = cols.len();
    let mut starting_grid = vec![Piece::Empty; height * width];
    for (r, c, piece) in fixed {
        if r >= height || c >= width {
            return Err(ReadError::InvalidValue);
        }
        starting_grid[r * width + c] = piece;
    }

    Ok(Puzzle {
        grid_width: width as i32,
        grid_height: height as i32,
        vertical_clues: cols,
        horizontal_clues: rows,
        starting_grid,
    })
}

fn parse_counts(s: &str) -> Result<Vec<i32>, ReadError> {
    let mut counts = vec![];
    for token in s.split_whitespace() {
        let n = token
            .parse::<i32>()
            .map_err(|_| ReadError::InvalidValue)?;
        if n < 0 {
            return Err(ReadError::InvalidValue);
        }
        counts.push(n);
    }
    if counts.is_empty() {
        return Err(ReadError::InvalidFormat);
    }
    Ok(counts)
}

fn parse_fixed(line: &str) -> Result<(usize, usize, Piece), ReadError> {
    let (coords, name) = line.split_once(':').ok_or(ReadError::InvalidFormat)?;
    let (r, c) = coords.split_once(',').ok_or(ReadError::InvalidFormat)?;
    let r = r.trim().parse::<usize>().map_err(|_| ReadError::InvalidValue)?;
    let c = c.trim().parse::<usize>().map_err(|_| ReadError::InvalidValue)?;
    let piece = Piece::from_name(name.trim()).ok_or(ReadError::InvalidValue)?;
    Ok((r, c, piece))
}

/// Writes a puzzle back in the text form read by `read_tracks_problem`.
pub fn write_tracks_problem<W: Write>(writer: &mut W, puzzle: &Puzzle) -> io::Result<()> {
    write!(writer, "ROWS:")?;
    for n in &puzzle.horizontal_clues {
        write!(writer, " {}", n)?;
    }
    writeln!(writer)?;
    write!(writer, "COLS:")?;
    for n in &puzzle.vertical_clues {
        write!(writer, " {}", n)?;
    }
    writeln!(writer)?;
    writeln!(writer, "FIXED:")?;
    for (i, &piece) in puzzle.starting_grid.iter().enumerate() {
        if piece != Piece::Empty {
            let r = i as i32 / puzzle.grid_width;
            let c = i as i32 % puzzle.grid_width;
            writeln!(writer, "{},{}: {}", r, c, piece.name())?;
        }
    }
    Ok(())
}

pub fn puzzle_from_json(json: &str) -> serde_json::Result<Puzzle> {
    serde_json::from_str(json)
}

pub fn puzzle_to_json(puzzle: &Puzzle) -> serde_json::Result<String> {
    serde_json::to_string(puzzle)
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;

    #[test]
    fn test_read_problem() {
        let puzzle = puzzle_from_text(STRAIGHT_3X3);
        assert_eq!(puzzle.grid_width, 3);
        assert_eq!(puzzle.grid_height, 3);
        assert_eq!(puzzle.horizontal_clues, vec![1, 1, 1]);
        assert_eq!(puzzle.vertical_clues, vec![0, 3, 0]);
        assert_eq!(puzzle.starting_grid[1], Piece::Vertical);
        assert_eq!(puzzle.starting_grid[7], Piece::Vertical);
        assert_eq!(
            puzzle
                .starting_grid
                .iter()
                .filter(|&&p| p != Piece::Empty)
                .count(),
            2
        );
    }

    #[test]
    fn test_read_accepts_comments_and_case() {
        let mut src = "
# a tiny puzzle
rows: 1 1 1
cols: 0 3 0   # trailing comment
Fixed:
0,1: Vertical
2,1: Vertical
"
        .as_bytes();
        let puzzle = read_tracks_problem(&mut src).unwrap();
        assert_eq!(puzzle, puzzle_from_text(STRAIGHT_3X3));
    }

    #[test]
    fn test_read_errors() {
        // missing COLS
        let mut src = "ROWS: 1 1\n".as_bytes();
        assert!(matches!(
            read_tracks_problem(&mut src),
            Err(ReadError::InvalidFormat)
        ));

        // sums differ
        let mut src = "ROWS: 1 1\nCOLS: 1 2\n".as_bytes();
        assert!(matches!(
            read_tracks_problem(&mut src),
            Err(ReadError::InvalidValue)
        ));

        // negative count
        let mut src = "ROWS: 1 -1\nCOLS: 0 0\n".as_bytes();
        assert!(matches!(
            read_tracks_problem(&mut src),
            Err(ReadError::InvalidValue)
        ));

        // unknown piece name
        let mut src = "ROWS: 1 1\nCOLS: 1 1\nFIXED:\n0,0: Curve\n".as_bytes();
        assert!(matches!(
            read_tracks_problem(&mut src),
            Err(ReadError::InvalidValue)
        ));

        // fixed cell outside the grid
        let mut src = "ROWS: 1 1\nCOLS: 1 1\nFIXED:\n2,0: Vertical\n".as_bytes();
        assert!(matches!(
            read_tracks_problem(&mut src),
            Err(ReadError::InvalidValue)
        ));

        // fixed entry before the FIXED: marker
        let mut src = "ROWS: 1 1\n0,0: Vertical\n".as_bytes();
        assert!(matches!(
            read_tracks_problem(&mut src),
            Err(ReadError::InvalidFormat)
        ));
    }

    #[test]
    fn test_write_read_round_trip() {
        for text in [
            STRAIGHT_3X3,
            OUTER_L_5X5,
            LINE_10X10,
            ASYMMETRIC_7X9,
            UNSOLVABLE_3X3,
        ] {
            let puzzle = puzzle_from_text(text);
            let mut out = Vec::new();
            write_tracks_problem(&mut out, &puzzle).unwrap();
            let reparsed = read_tracks_problem(&mut out.as_slice()).unwrap();
            assert_eq!(reparsed, puzzle);
        }
    }

    #[test]
    fn test_json_round_trip() {
        let puzzle = puzzle_from_text(STRAIGHT_3X3);
        let json = puzzle_to_json(&puzzle).unwrap();
        assert!(json.contains("\"gridWidth\":3"));
        assert!(json.contains("\"horizontalClues\":[1,1,1]"));
        assert_eq!(puzzle_from_json(&json).unwrap(), puzzle);
    }
}
