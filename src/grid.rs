use glam::UVec2;

/// One grid cell of the partitioned source image. `x`/`y` are pixel offsets
/// of the top-left corner; `row`/`col` are grid coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub row: u32,
    pub col: u32,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Row-major grid of fixed-size tiles over an image. Trailing pixels that do
/// not fill a whole tile are excluded from the grid.
#[derive(Debug, Clone)]
pub struct TileGrid {
    tile_dims: UVec2,
    cols: u32,
    rows: u32,
}

impl TileGrid {
    pub fn new(image_dims: UVec2, tile_dims: UVec2) -> Self {
        assert!(
            tile_dims.x > 0 && tile_dims.y > 0,
            "tile dimensions must be positive"
        );
        if image_dims.x % tile_dims.x != 0 || image_dims.y % tile_dims.y != 0 {
            log::warn!(
                "image {}x{} does not divide evenly into {}x{} tiles, trailing pixels are dropped",
                image_dims.x,
                image_dims.y,
                tile_dims.x,
                tile_dims.y
            );
        }
        return Self {
            tile_dims,
            cols: image_dims.x / tile_dims.x,
            rows: image_dims.y / tile_dims.y,
        };
    }

    pub fn rows(&self) -> u32 {
        return self.rows;
    }

    pub fn cols(&self) -> u32 {
        return self.cols;
    }

    pub fn tile_dims(&self) -> UVec2 {
        return self.tile_dims;
    }

    pub fn len(&self) -> usize {
        return (self.rows * self.cols) as usize;
    }

    pub fn is_empty(&self) -> bool {
        return self.len() == 0;
    }

    /// Pixel area actually covered by tiles, and so the canvas size.
    pub fn covered_dims(&self) -> UVec2 {
        return UVec2::new(self.cols * self.tile_dims.x, self.rows * self.tile_dims.y);
    }

    pub fn tile_at(&self, row: u32, col: u32) -> Tile {
        return Tile {
            row,
            col,
            x: col * self.tile_dims.x,
            y: row * self.tile_dims.y,
            width: self.tile_dims.x,
            height: self.tile_dims.y,
        };
    }

    /// Tiles in row-major order (row 0 left to right, then row 1, ...).
    /// Each call starts a fresh iteration.
    pub fn iter(&self) -> TileIter<'_> {
        return TileIter {
            grid: self,
            cur: UVec2::ZERO,
            end_row: self.rows,
        };
    }

    pub fn iter_row(&self, row: u32) -> TileIter<'_> {
        return TileIter {
            grid: self,
            cur: UVec2::new(0, row),
            end_row: (row + 1).min(self.rows),
        };
    }
}

#[derive(Clone)]
pub struct TileIter<'g> {
    grid: &'g TileGrid,
    cur: UVec2,
    end_row: u32,
}

impl Iterator for TileIter<'_> {
    type Item = Tile;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cur.y >= self.end_row || self.grid.cols == 0 {
            return None;
        }
        let tile = self.grid.tile_at(self.cur.y, self.cur.x);
        self.cur.x += 1;
        if self.cur.x == self.grid.cols {
            self.cur.x = 0;
            self.cur.y += 1;
        }
        return Some(tile);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn even_division_produces_full_grid() {
        let grid = TileGrid::new(UVec2::new(512, 288), UVec2::new(256, 144));
        assert_eq!(grid.cols(), 2);
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.len(), 4);
        assert_eq!(grid.covered_dims(), UVec2::new(512, 288));
    }

    #[test]
    fn uneven_division_drops_remainder() {
        let grid = TileGrid::new(UVec2::new(100, 70), UVec2::new(30, 30));
        assert_eq!(grid.cols(), 3);
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.covered_dims(), UVec2::new(90, 60));
    }

    #[test]
    fn tiles_are_row_major_disjoint_and_exactly_sized() {
        let grid = TileGrid::new(UVec2::new(8, 6), UVec2::new(4, 3));
        let tiles: Vec<Tile> = grid.iter().collect();
        assert_eq!(tiles.len(), 4);
        let expected = [(0, 0, 0, 0), (0, 1, 4, 0), (1, 0, 0, 3), (1, 1, 4, 3)];
        for (tile, &(row, col, x, y)) in tiles.iter().zip(expected.iter()) {
            assert_eq!((tile.row, tile.col, tile.x, tile.y), (row, col, x, y));
            assert_eq!((tile.width, tile.height), (4, 3));
        }
    }

    #[test]
    fn iteration_is_restartable() {
        let grid = TileGrid::new(UVec2::new(8, 6), UVec2::new(4, 3));
        let first: Vec<Tile> = grid.iter().collect();
        let second: Vec<Tile> = grid.iter().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn iter_row_yields_one_row() {
        let grid = TileGrid::new(UVec2::new(12, 6), UVec2::new(4, 3));
        let row: Vec<Tile> = grid.iter_row(1).collect();
        assert_eq!(row.len(), 3);
        assert!(row.iter().all(|t| t.row == 1));
        assert_eq!(row.iter().map(|t| t.col).collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn tile_smaller_grid_is_empty() {
        let grid = TileGrid::new(UVec2::new(3, 3), UVec2::new(4, 4));
        assert!(grid.is_empty());
        assert_eq!(grid.iter().count(), 0);
    }
}
