//! Static walkability grid
//!
//! The grid answers two questions for every other system: "can an entity
//! stand on tile (tx, ty)?" and "which tiles does this pixel rect touch?".
//! It is built once at map load and only read afterwards.

use std::fmt;

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::PixelRect;

/// Coordinates of a single tile, in tile units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: i32,
    pub y: i32,
}

impl TileCoord {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Number of axis-aligned steps between two tiles
    #[must_use]
    pub const fn manhattan(self, other: Self) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// The four axis-aligned neighbours, in right/left/down/up order
    #[must_use]
    pub const fn adjacent(self) -> [Self; 4] {
        [
            Self::new(self.x + 1, self.y),
            Self::new(self.x - 1, self.y),
            Self::new(self.x, self.y + 1),
            Self::new(self.x, self.y - 1),
        ]
    }
}

impl From<(i32, i32)> for TileCoord {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Tiles touched by a rect. Entities are at most a few tiles wide.
pub type CoveredTiles = SmallVec<[TileCoord; 8]>;

/// A 2D walkability grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    tile_size: i32,
    /// Row-major walkable flags
    cells: Vec<bool>,
}

impl Grid {
    /// Create a new grid (all cells walkable)
    #[must_use]
    pub fn new(width: usize, height: usize, tile_size: i32) -> Self {
        Self {
            width,
            height,
            tile_size: tile_size.max(1),
            cells: vec![true; width * height],
        }
    }

    /// Build a grid from rows of walkable flags.
    ///
    /// Rows are assumed rectangular; the map loader rejects ragged input
    /// before it reaches this point. Missing cells are treated as solid.
    #[must_use]
    pub fn from_rows(rows: &[Vec<bool>], tile_size: i32) -> Self {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        let mut grid = Self::new(width, height, tile_size);
        for (y, row) in rows.iter().enumerate() {
            for x in 0..width {
                grid.cells[y * width + x] = row.get(x).copied().unwrap_or(false);
            }
        }
        grid
    }

    /// Parse an ASCII picture of the grid: `#` is solid, anything else walkable.
    ///
    /// Handy for tests and small hand-written maps.
    #[must_use]
    pub fn from_ascii(picture: &str, tile_size: i32) -> Self {
        let rows: Vec<Vec<bool>> = picture
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| line.chars().map(|c| c != '#').collect())
            .collect();
        Self::from_rows(&rows, tile_size)
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Edge length of a tile in pixels
    #[must_use]
    pub fn tile_size(&self) -> i32 {
        self.tile_size
    }

    /// The whole map in pixel space
    #[must_use]
    pub fn pixel_bounds(&self) -> PixelRect {
        PixelRect::new(
            0,
            0,
            self.width as i32 * self.tile_size,
            self.height as i32 * self.tile_size,
        )
    }

    fn index(&self, tile: TileCoord) -> Option<usize> {
        if tile.x < 0 || tile.y < 0 {
            return None;
        }
        let (x, y) = (tile.x as usize, tile.y as usize);
        (x < self.width && y < self.height).then_some(y * self.width + x)
    }

    /// Set a cell's walkability. Out-of-bounds writes are ignored.
    pub fn set_walkable(&mut self, tile: TileCoord, walkable: bool) {
        if let Some(index) = self.index(tile) {
            self.cells[index] = walkable;
        }
    }

    /// Whether an entity may stand on the tile. The map edge is solid.
    #[must_use]
    pub fn is_walkable(&self, tile: TileCoord) -> bool {
        self.index(tile).is_some_and(|index| self.cells[index])
    }

    /// Tile containing a pixel
    #[must_use]
    pub fn tile_of(&self, px: i32, py: i32) -> TileCoord {
        TileCoord::new(px.div_euclid(self.tile_size), py.div_euclid(self.tile_size))
    }

    /// Tile containing a sub-pixel position
    #[must_use]
    pub fn tile_at(&self, position: Vec2) -> TileCoord {
        self.tile_of(position.x.floor() as i32, position.y.floor() as i32)
    }

    /// Every tile the rect overlaps, including partially overlapped ones.
    ///
    /// The range runs from the top-left pixel to the bottom-right pixel
    /// (`right - 1`, `bottom - 1`), so a rect ending exactly on a tile
    /// boundary does not claim the next tile. Empty rects cover nothing.
    #[must_use]
    pub fn tiles_covered(&self, rect: &PixelRect) -> CoveredTiles {
        let mut tiles = CoveredTiles::new();
        if rect.is_empty() {
            return tiles;
        }
        let first = self.tile_of(rect.left(), rect.top());
        let last = self.tile_of(rect.right() - 1, rect.bottom() - 1);
        for ty in first.y..=last.y {
            for tx in first.x..=last.x {
                tiles.push(TileCoord::new(tx, ty));
            }
        }
        tiles
    }

    /// Whether every tile under the rect is walkable
    #[must_use]
    pub fn is_rect_walkable(&self, rect: &PixelRect) -> bool {
        self.tiles_covered(rect)
            .iter()
            .all(|&tile| self.is_walkable(tile))
    }

    /// Pixel-space center of a tile
    #[must_use]
    pub fn tile_center(&self, tile: TileCoord) -> Vec2 {
        let half = self.tile_size as f32 * 0.5;
        Vec2::new(
            (tile.x * self.tile_size) as f32 + half,
            (tile.y * self.tile_size) as f32 + half,
        )
    }

    /// Pixel rect occupied by a tile
    #[must_use]
    pub fn tile_rect(&self, tile: TileCoord) -> PixelRect {
        PixelRect::new(
            tile.x * self.tile_size,
            tile.y * self.tile_size,
            self.tile_size,
            self.tile_size,
        )
    }

    /// Walkable 4-connected neighbours of a tile
    #[must_use]
    pub fn neighbors(&self, tile: TileCoord) -> SmallVec<[TileCoord; 4]> {
        tile.adjacent()
            .into_iter()
            .filter(|&n| self.is_walkable(n))
            .collect()
    }

    /// All walkable tiles in row-major order
    pub fn walkable_tiles(&self) -> impl Iterator<Item = TileCoord> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, walkable)| **walkable)
            .map(|(index, _)| {
                TileCoord::new((index % self.width) as i32, (index / self.width) as i32)
            })
    }

    /// All solid tiles in row-major order
    pub fn solid_tiles(&self) -> impl Iterator<Item = TileCoord> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, walkable)| !**walkable)
            .map(|(index, _)| {
                TileCoord::new((index % self.width) as i32, (index / self.width) as i32)
            })
    }

    /// Number of walkable cells
    #[must_use]
    pub fn walkable_count(&self) -> usize {
        self.cells.iter().filter(|walkable| **walkable).count()
    }

    /// Top-left corner that centers a rect of `size` on a tile
    #[must_use]
    pub fn centered_top_left(&self, tile: TileCoord, size: IVec2) -> Vec2 {
        self.tile_center(tile) - size.as_vec2() * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds_is_not_walkable() {
        let grid = Grid::new(4, 3, 16);
        for tile in [
            TileCoord::new(-1, 0),
            TileCoord::new(0, -1),
            TileCoord::new(4, 0),
            TileCoord::new(0, 3),
            TileCoord::new(100, 100),
            TileCoord::new(i32::MIN, 0),
        ] {
            assert!(!grid.is_walkable(tile), "{tile} should be solid");
        }
        assert!(grid.is_walkable(TileCoord::new(3, 2)));
    }

    #[test]
    fn test_tile_of_uses_floor_division() {
        let grid = Grid::new(4, 4, 16);
        assert_eq!(grid.tile_of(0, 0), TileCoord::new(0, 0));
        assert_eq!(grid.tile_of(15, 15), TileCoord::new(0, 0));
        assert_eq!(grid.tile_of(16, 31), TileCoord::new(1, 1));
        assert_eq!(grid.tile_of(-1, -16), TileCoord::new(-1, -1));
        assert_eq!(grid.tile_of(-17, 0), TileCoord::new(-2, 0));
    }

    #[test]
    fn test_tiles_covered_single_tile_on_boundary() {
        let grid = Grid::new(4, 4, 16);
        // Right and bottom land exactly on a tile boundary
        let tiles = grid.tiles_covered(&PixelRect::new(16, 16, 16, 16));
        assert_eq!(tiles.as_slice(), &[TileCoord::new(1, 1)]);
    }

    #[test]
    fn test_tiles_covered_spanning_boundaries() {
        let grid = Grid::new(4, 4, 16);
        let tiles = grid.tiles_covered(&PixelRect::new(10, 10, 16, 16));
        assert_eq!(
            tiles.as_slice(),
            &[
                TileCoord::new(0, 0),
                TileCoord::new(1, 0),
                TileCoord::new(0, 1),
                TileCoord::new(1, 1),
            ]
        );

        // One pixel past the boundary claims the next column
        let tiles = grid.tiles_covered(&PixelRect::new(0, 0, 17, 16));
        assert_eq!(tiles.len(), 2);
    }

    #[test]
    fn test_tiles_covered_empty_rect() {
        let grid = Grid::new(4, 4, 16);
        assert!(grid.tiles_covered(&PixelRect::new(5, 5, 0, 0)).is_empty());
    }

    #[test]
    fn test_from_ascii_and_neighbors() {
        let grid = Grid::from_ascii(
            "
            ...
            .#.
            ...
            ",
            16,
        );
        assert_eq!((grid.width(), grid.height()), (3, 3));
        assert!(!grid.is_walkable(TileCoord::new(1, 1)));
        assert_eq!(grid.walkable_count(), 8);

        let neighbors = grid.neighbors(TileCoord::new(1, 0));
        assert_eq!(neighbors.len(), 2);
        assert!(!neighbors.contains(&TileCoord::new(1, 1)));
    }

    #[test]
    fn test_tile_center() {
        let grid = Grid::new(4, 4, 16);
        assert_eq!(grid.tile_center(TileCoord::new(2, 1)), Vec2::new(40.0, 24.0));
        assert_eq!(
            grid.centered_top_left(TileCoord::new(2, 1), IVec2::new(12, 12)),
            Vec2::new(34.0, 18.0)
        );
    }

    #[test]
    fn test_walkable_and_solid_tiles() {
        let grid = Grid::from_ascii("#.\n.#", 8);
        let walkable: Vec<_> = grid.walkable_tiles().collect();
        let solid: Vec<_> = grid.solid_tiles().collect();
        assert_eq!(walkable, vec![TileCoord::new(1, 0), TileCoord::new(0, 1)]);
        assert_eq!(solid, vec![TileCoord::new(0, 0), TileCoord::new(1, 1)]);
    }
}
