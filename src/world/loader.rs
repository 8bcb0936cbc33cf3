//! Tile-coded map loading
//!
//! Maps are CSV files where every cell holds an integer tile code. A
//! [`TilePalette`] decides which codes are walkable, solid, or mark one of
//! the special zones (restaurants, client houses, safe zones).

use std::fmt;
use std::fs;
use std::path::Path;

use glam::Vec2;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::{Grid, PixelRect, TileCoord};

/// Special areas marked in the map by dedicated tile codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneKind {
    /// Where food is picked up
    Restaurant,
    /// Where orders are delivered
    ClientHouse,
    /// Where enemies cannot hurt the player
    SafeZone,
}

impl ZoneKind {
    pub const ALL: [Self; 3] = [Self::Restaurant, Self::ClientHouse, Self::SafeZone];
}

/// Mapping from tile codes to tile roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilePalette {
    pub walkable: Vec<i32>,
    pub solid: Vec<i32>,
    pub restaurant: Vec<i32>,
    pub client_house: Vec<i32>,
    pub safe_zone: Vec<i32>,
}

impl TilePalette {
    /// `1` is road, `0` is wall, `2..=4` are zones
    #[must_use]
    pub fn classic() -> Self {
        Self {
            walkable: vec![1],
            solid: vec![0],
            restaurant: vec![2],
            client_house: vec![3],
            safe_zone: vec![4],
        }
    }

    /// `0` and `1` are road, `2` is wall, `3..=5` are zones
    #[must_use]
    pub fn simple() -> Self {
        Self {
            walkable: vec![0, 1],
            solid: vec![2],
            restaurant: vec![3],
            client_house: vec![4],
            safe_zone: vec![5],
        }
    }

    /// Codes exported by the tile editor for the unified city tileset
    #[must_use]
    pub fn unified() -> Self {
        Self {
            walkable: vec![963],
            solid: vec![973],
            restaurant: vec![894],
            client_house: vec![822],
            safe_zone: vec![861],
        }
    }

    /// Look up a preset by name
    #[must_use]
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "classic" => Some(Self::classic()),
            "simple" => Some(Self::simple()),
            "unified" => Some(Self::unified()),
            _ => None,
        }
    }

    /// Codes that mark the given zone
    #[must_use]
    pub fn zone_codes(&self, kind: ZoneKind) -> &[i32] {
        match kind {
            ZoneKind::Restaurant => &self.restaurant,
            ZoneKind::ClientHouse => &self.client_house,
            ZoneKind::SafeZone => &self.safe_zone,
        }
    }

    /// Zones are walkable; unknown codes are not.
    #[must_use]
    pub fn is_walkable(&self, code: i32) -> bool {
        self.walkable.contains(&code)
            || self.restaurant.contains(&code)
            || self.client_house.contains(&code)
            || self.safe_zone.contains(&code)
    }

    /// Zone marked by a code, if any
    #[must_use]
    pub fn zone_of(&self, code: i32) -> Option<ZoneKind> {
        ZoneKind::ALL
            .into_iter()
            .find(|&kind| self.zone_codes(kind).contains(&code))
    }
}

impl Default for TilePalette {
    fn default() -> Self {
        Self::classic()
    }
}

/// Errors that can occur while loading or using a map
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    /// IO error
    IoError(String),
    /// No rows with content
    Empty,
    /// A row differs in width from the first one
    RaggedRow {
        row: usize,
        found: usize,
        expected: usize,
    },
    /// A cell is not an integer
    InvalidCell {
        row: usize,
        column: usize,
        text: String,
    },
    /// No walkable placement was found for an entity
    NoSpawnPosition { width: i32, height: i32 },
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IoError(e) => write!(f, "IO error: {e}"),
            Self::Empty => write!(f, "Map is empty"),
            Self::RaggedRow {
                row,
                found,
                expected,
            } => write!(f, "Row {row} has {found} cells (expected {expected})"),
            Self::InvalidCell { row, column, text } => {
                write!(f, "Invalid tile code {text:?} at row {row}, column {column}")
            }
            Self::NoSpawnPosition { width, height } => {
                write!(f, "No walkable spawn position for a {width}x{height} entity")
            }
        }
    }
}

impl std::error::Error for MapError {}

/// A loaded map: raw tile codes plus the derived walkability grid.
#[derive(Debug, Clone)]
pub struct TileMap {
    codes: Vec<i32>,
    grid: Grid,
    zones: FxHashMap<ZoneKind, Vec<TileCoord>>,
}

impl TileMap {
    /// Parse CSV text.
    ///
    /// The separator is `,` unless `;` is more frequent in the first 1024
    /// bytes. Blank cells and blank lines are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty map, an unparsable cell or a row whose
    /// width differs from the first row.
    pub fn parse_csv(text: &str, palette: &TilePalette, tile_size: i32) -> Result<Self, MapError> {
        let sample: String = text.chars().take(1024).collect();
        let separator = if sample.matches(';').count() > sample.matches(',').count() {
            ';'
        } else {
            ','
        };

        let mut rows: Vec<Vec<i32>> = Vec::new();
        for line in text.lines() {
            let row_index = rows.len();
            let mut row = Vec::new();
            for (column, cell) in line.split(separator).enumerate() {
                let cell = cell.trim();
                if cell.is_empty() {
                    continue;
                }
                let code = cell.parse::<i32>().map_err(|_| MapError::InvalidCell {
                    row: row_index,
                    column,
                    text: cell.to_string(),
                })?;
                row.push(code);
            }
            if !row.is_empty() {
                rows.push(row);
            }
        }

        Self::from_codes(rows, palette, tile_size)
    }

    /// Load a CSV map from disk
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or fails to parse
    pub fn load_csv(
        path: impl AsRef<Path>,
        palette: &TilePalette,
        tile_size: i32,
    ) -> Result<Self, MapError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| MapError::IoError(format!("{}: {e}", path.display())))?;
        let map = Self::parse_csv(&text, palette, tile_size)?;
        log::info!(
            "Loaded map {} ({}x{} tiles, {} walkable)",
            path.display(),
            map.grid.width(),
            map.grid.height(),
            map.grid.walkable_count()
        );
        Ok(map)
    }

    /// Build a map from rows of tile codes
    ///
    /// # Errors
    ///
    /// Returns an error for an empty map or ragged rows
    pub fn from_codes(
        rows: Vec<Vec<i32>>,
        palette: &TilePalette,
        tile_size: i32,
    ) -> Result<Self, MapError> {
        let expected = rows.first().map(Vec::len).ok_or(MapError::Empty)?;
        if expected == 0 {
            return Err(MapError::Empty);
        }
        if let Some((row, found)) = rows
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, len)| len != expected)
        {
            return Err(MapError::RaggedRow {
                row,
                found,
                expected,
            });
        }

        let walkable: Vec<Vec<bool>> = rows
            .iter()
            .map(|row| row.iter().map(|&code| palette.is_walkable(code)).collect())
            .collect();
        let grid = Grid::from_rows(&walkable, tile_size);

        let mut zones: FxHashMap<ZoneKind, Vec<TileCoord>> = FxHashMap::default();
        for (y, row) in rows.iter().enumerate() {
            for (x, &code) in row.iter().enumerate() {
                if let Some(kind) = palette.zone_of(code) {
                    zones
                        .entry(kind)
                        .or_default()
                        .push(TileCoord::new(x as i32, y as i32));
                }
            }
        }

        Ok(Self {
            codes: rows.into_iter().flatten().collect(),
            grid,
            zones,
        })
    }

    /// The walkability grid
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Raw tile code at a tile, `None` out of bounds
    #[must_use]
    pub fn code_at(&self, tile: TileCoord) -> Option<i32> {
        if tile.x < 0 || tile.y < 0 {
            return None;
        }
        let (x, y) = (tile.x as usize, tile.y as usize);
        if x >= self.grid.width() || y >= self.grid.height() {
            return None;
        }
        self.codes.get(y * self.grid.width() + x).copied()
    }

    /// Tiles marked as the given zone, in row-major order
    #[must_use]
    pub fn zone_tiles(&self, kind: ZoneKind) -> &[TileCoord] {
        self.zones.get(&kind).map_or(&[], Vec::as_slice)
    }

    /// Pixel centers of the tiles marked as the given zone
    #[must_use]
    pub fn zone_centers(&self, kind: ZoneKind) -> Vec<Vec2> {
        self.zone_tiles(kind)
            .iter()
            .map(|&tile| self.grid.tile_center(tile))
            .collect()
    }

    /// One pixel rect per solid tile.
    ///
    /// This is the auxiliary obstacle list handed to the collision resolver.
    #[must_use]
    pub fn obstacle_rects(&self) -> Vec<PixelRect> {
        self.grid
            .solid_tiles()
            .map(|tile| self.grid.tile_rect(tile))
            .collect()
    }
}
