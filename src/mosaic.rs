use std::path::{Path, PathBuf};

use glam::UVec2;
use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbImage};

use crate::catalog::{Catalog, Replacement};
use crate::error::MosaicError;
use crate::grid::TileGrid;
use crate::stitch;

const TILE_DIMS_DEFAULT: UVec2 = UVec2::new(256, 144);

#[derive(Default)]
enum TileSource {
    #[default]
    Swatches,
    CatalogDir(PathBuf),
    Catalog(Catalog),
}

/// Builder for one mosaic run over one source image.
///
/// Defaults to swatch mode; configuring a catalog switches to candidate
/// matching. The source image is never mutated, every transform yields a new
/// buffer.
pub struct Mosaic {
    image: DynamicImage,
    tile_dims: UVec2,
    source: TileSource,
    replacement: Replacement,
    blend_ratio: Option<f32>,
    upscale: Option<u32>,
}

impl Mosaic {
    pub fn new_from_image(image: DynamicImage) -> Self {
        return Self {
            image,
            tile_dims: TILE_DIMS_DEFAULT,
            source: TileSource::default(),
            replacement: Replacement::default(),
            blend_ratio: None,
            upscale: None,
        };
    }

    pub fn new_from_image_path(path: impl AsRef<Path>) -> Result<Self, MosaicError> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|source| MosaicError::UnreadableSource {
            path: path.to_path_buf(),
            source,
        })?;
        return Ok(Self::new_from_image(image));
    }

    pub fn with_tile_size(mut self, width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "tile dimensions must be positive");
        self.tile_dims = UVec2::new(width, height);
        return self;
    }

    pub fn with_catalog_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.source = TileSource::CatalogDir(dir.into());
        return self;
    }

    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.source = TileSource::Catalog(catalog);
        return self;
    }

    /// Each catalog entry may be used for at most one tile.
    pub fn without_replacement(mut self) -> Self {
        self.replacement = Replacement::Without;
        return self;
    }

    /// Blends the finished mosaic back toward the original: 0 keeps the
    /// mosaic, 1 restores the original.
    pub fn with_blend(mut self, alpha: f32) -> Self {
        self.blend_ratio = Some(alpha);
        return self;
    }

    /// Upscales the source by an integer factor before tiling.
    pub fn with_upscale(mut self, factor: u32) -> Self {
        assert!(factor > 0, "upscale factor must be positive");
        self.upscale = Some(factor);
        return self;
    }

    pub fn render(self) -> Result<RgbImage, MosaicError> {
        let mut source = self.image.to_rgb8();
        if let Some(factor) = self.upscale {
            if factor > 1 {
                log::info!("upscaling source by {factor}x before tiling");
                source = imageops::resize(
                    &source,
                    source.width() * factor,
                    source.height() * factor,
                    FilterType::Lanczos3,
                );
            }
        }

        let image_dims = UVec2::new(source.width(), source.height());
        let grid = TileGrid::new(image_dims, self.tile_dims);
        log::info!(
            "stitching {}x{} tiles of {}x{} pixels",
            grid.cols(),
            grid.rows(),
            self.tile_dims.x,
            self.tile_dims.y
        );

        let stitched = match &self.source {
            TileSource::Swatches => stitch::swatches(&source, &grid)?,
            TileSource::CatalogDir(dir) => {
                let catalog = Catalog::from_dir(dir)?;
                stitch::with_catalog(&source, &grid, &catalog, self.replacement)?
            }
            TileSource::Catalog(catalog) => {
                stitch::with_catalog(&source, &grid, catalog, self.replacement)?
            }
        };

        match self.blend_ratio {
            Some(alpha) => {
                // the canvas drops uneven trailing pixels, match the original to it
                let covered = grid.covered_dims();
                let original = imageops::crop_imm(&source, 0, 0, covered.x, covered.y).to_image();
                return stitch::blend(&stitched, &original, alpha);
            }
            None => return Ok(stitched),
        }
    }
}
