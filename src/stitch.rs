use glam::UVec2;
use image::{imageops, GenericImageView, RgbImage};
use rayon::prelude::*;

use crate::catalog::{Catalog, Replacement};
use crate::color::{self, MeanColor};
use crate::error::MosaicError;
use crate::grid::{Tile, TileGrid};
use crate::thumbnail;

fn tile_mean(source: &RgbImage, tile: &Tile) -> Result<MeanColor, MosaicError> {
    let view = source.view(tile.x, tile.y, tile.width, tile.height);
    return color::mean_color(&*view).ok_or(MosaicError::DegenerateRegion {
        row: tile.row,
        col: tile.col,
    });
}

fn new_canvas(grid: &TileGrid) -> RgbImage {
    let UVec2 { x, y } = grid.covered_dims();
    return RgbImage::new(x, y);
}

/// Swatch mode: every tile becomes a flat rectangle of its own mean color.
pub fn swatches(source: &RgbImage, grid: &TileGrid) -> Result<RgbImage, MosaicError> {
    let mut canvas = new_canvas(grid);
    for tile in grid.iter() {
        let mean = tile_mean(source, &tile)?;
        let swatch = RgbImage::from_pixel(tile.width, tile.height, mean.to_rgb());
        imageops::replace(&mut canvas, &swatch, tile.x as i64, tile.y as i64);
    }
    return Ok(canvas);
}

/// Catalog mode: every tile is replaced with the nearest-colored catalog
/// candidate, thumbnailed to the tile's exact size.
///
/// Rows are resolved by parallel workers, each producing its tiles in column
/// order; painting happens only after every row has finished, so the pixels
/// written for a given assignment do not depend on worker scheduling. Under
/// [`Replacement::Without`] the order in which rows consume catalog entries
/// still varies run to run.
///
/// Any per-tile failure aborts the whole run; no partial canvas is returned.
pub fn with_catalog(
    source: &RgbImage,
    grid: &TileGrid,
    catalog: &Catalog,
    policy: Replacement,
) -> Result<RgbImage, MosaicError> {
    catalog.reset();

    let rows: Vec<Vec<(Tile, RgbImage)>> = (0..grid.rows())
        .into_par_iter()
        .map(|row| resolve_row(source, grid, catalog, policy, row))
        .collect::<Result<_, MosaicError>>()?;

    let mut canvas = new_canvas(grid);
    for (tile, thumb) in rows.into_iter().flatten() {
        imageops::replace(&mut canvas, &thumb, tile.x as i64, tile.y as i64);
    }
    return Ok(canvas);
}

fn resolve_row(
    source: &RgbImage,
    grid: &TileGrid,
    catalog: &Catalog,
    policy: Replacement,
    row: u32,
) -> Result<Vec<(Tile, RgbImage)>, MosaicError> {
    return grid
        .iter_row(row)
        .map(|tile| {
            let mean = tile_mean(source, &tile)?;
            let idx = catalog.select(mean, policy)?;
            let candidate = catalog.entry(idx).load()?;
            let thumb = thumbnail::aspect_fit(&candidate, tile.width, tile.height);
            return Ok((tile, thumb));
        })
        .collect();
}

/// Per-pixel linear interpolation `stitched * (1 - alpha) + original * alpha`
/// for the ghosting effect. `alpha` is clamped to `[0, 1]`.
pub fn blend(
    stitched: &RgbImage,
    original: &RgbImage,
    alpha: f32,
) -> Result<RgbImage, MosaicError> {
    if stitched.dimensions() != original.dimensions() {
        let (expected_w, expected_h) = stitched.dimensions();
        let (actual_w, actual_h) = original.dimensions();
        return Err(MosaicError::DimensionMismatch {
            expected_w,
            expected_h,
            actual_w,
            actual_h,
        });
    }
    let alpha = alpha.clamp(0.0, 1.0);

    let mut out = stitched.clone();
    for (out_pixel, orig_pixel) in out.pixels_mut().zip(original.pixels()) {
        for channel in 0..3 {
            let s = out_pixel.0[channel] as f32;
            let o = orig_pixel.0[channel] as f32;
            out_pixel.0[channel] = ((1.0 - alpha) * s + alpha * o).round() as u8;
        }
    }
    return Ok(out);
}
