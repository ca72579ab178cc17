//! Tile grid loading and lookup.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{GameError, Result};

/// Tile code reserved for door slots. Never used as a static wall id.
pub const DOOR_TILE: i32 = 5;
pub const EMPTY: i32 = 0;
/// What lookups outside the grid return.
pub const BOUNDARY: i32 = 1;

/// Read-only tile lookup the ray caster, doors and movement run against.
pub trait GridSource {
    fn width(&self) -> i32;
    fn height(&self) -> i32;
    /// Tile code at `(x, y)`; out of bounds is solid.
    fn at(&self, x: i32, y: i32) -> i32;

    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width() && y < self.height()
    }
}

#[inline]
pub fn is_static_wall(code: i32) -> bool {
    code > 0 && code != DOOR_TILE
}

/// Anything that is not empty floor, door slots included.
#[inline]
pub fn is_solid(code: i32) -> bool {
    code > 0
}

#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
    tiles: Vec<i32>,
    spawn: Option<(i32, i32)>,
}

impl GridSource for Grid {
    fn width(&self) -> i32 { self.width }
    fn height(&self) -> i32 { self.height }

    #[inline]
    fn at(&self, x: i32, y: i32) -> i32 {
        if !self.in_bounds(x, y) {
            return BOUNDARY;
        }
        self.tiles[(y * self.width + x) as usize]
    }
}

impl Grid {
    /// Grid filled with `fill`. Used by the generator and tests.
    pub fn filled(width: i32, height: i32, fill: i32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            tiles: vec![fill; width as usize * height as usize],
            spawn: None,
        }
    }

    pub fn from_rows(rows: &[&[i32]]) -> Self {
        let height = rows.len() as i32;
        let width = rows.iter().map(|r| r.len()).max().unwrap_or(0) as i32;
        let mut grid = Self::filled(width, height, BOUNDARY);
        for (y, row) in rows.iter().enumerate() {
            for (x, &code) in row.iter().enumerate() {
                grid.set(x as i32, y as i32, code);
            }
        }
        grid
    }

    pub fn set(&mut self, x: i32, y: i32, code: i32) {
        if self.in_bounds(x, y) {
            self.tiles[(y * self.width + x) as usize] = code;
        }
    }

    pub fn set_spawn(&mut self, x: i32, y: i32) {
        self.spawn = Some((x, y));
    }

    /// Parses the text map format.
    ///
    /// `' '`/`'.'` floor, `'1'..='4'` wall ids, `'#'` wall 1, `'D'` door slot,
    /// `'P'` player spawn. Short rows are padded with wall.
    pub fn parse<I, S>(lines: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rows: Vec<Vec<i32>> = Vec::new();
        let mut spawn = None;

        for line in lines {
            let line = line.as_ref().trim_end_matches(['\r', '\n']);
            if line.is_empty() {
                continue;
            }
            let y = rows.len() as i32;
            let mut row = Vec::with_capacity(line.len());
            for (x, ch) in line.chars().enumerate() {
                let code = match ch {
                    ' ' | '.' => EMPTY,
                    'P' | 'p' => {
                        spawn = Some((x as i32, y));
                        EMPTY
                    }
                    'D' | 'd' => DOOR_TILE,
                    '1'..='4' => ch as i32 - '0' as i32,
                    // unknown glyphs are plain wall
                    _ => BOUNDARY,
                };
                row.push(code);
            }
            rows.push(row);
        }

        if rows.is_empty() {
            return Err(GameError::EmptyMap);
        }

        let refs: Vec<&[i32]> = rows.iter().map(|r| r.as_slice()).collect();
        let mut grid = Self::from_rows(&refs);
        grid.spawn = spawn;
        Ok(grid)
    }

    /// Spawn position at a cell center: the `P` marker or the first free interior cell.
    pub fn spawn_point(&self) -> Result<(f32, f32)> {
        if let Some((x, y)) = self.spawn {
            return Ok((x as f32 + 0.5, y as f32 + 0.5));
        }
        for y in 1..self.height - 1 {
            for x in 1..self.width - 1 {
                if self.at(x, y) == EMPTY {
                    return Ok((x as f32 + 0.5, y as f32 + 0.5));
                }
            }
        }
        Err(GameError::NoSpawn)
    }

    pub fn door_slots(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        (0..self.height).flat_map(move |y| {
            (0..self.width).filter_map(move |x| (self.at(x, y) == DOOR_TILE).then_some((x, y)))
        })
    }

    /// Small hand-made level with a few rooms joined by doors.
    pub fn demo() -> Self {
        const DEMO: &[&str] = &[
            "1111111111111111",
            "1P.....1.......1",
            "1......1.......1",
            "1......D.......1",
            "1......1.......1",
            "1111D111222D2221",
            "3......2.......4",
            "3......2.......4",
            "3......D.......4",
            "3......2.......4",
            "3333333222224444",
        ];
        // the literal above is well formed
        Self::parse(DEMO.iter()).unwrap_or_else(|_| Self::filled(3, 3, BOUNDARY))
    }
}

pub fn load_grid(path: &Path) -> Result<Grid> {
    let file = File::open(path).map_err(|source| GameError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line.map_err(|source| GameError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        lines.push(line);
    }
    Grid::parse(lines)
}
