use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use derive_more::IsVariant;
use image::DynamicImage;
use rayon::prelude::*;

use crate::color::{self, MeanColor, MAX_RGB_DISTANCE};
use crate::error::MosaicError;

/// Whether a catalog entry may be matched to more than one tile per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, IsVariant)]
pub enum Replacement {
    #[default]
    With,
    Without,
}

/// A candidate image with its precomputed mean color.
pub struct CatalogEntry {
    pub path: PathBuf,
    pub mean: MeanColor,
    cached: Option<Arc<DynamicImage>>,
}

impl CatalogEntry {
    pub fn new(path: PathBuf, mean: MeanColor) -> Self {
        return Self {
            path,
            mean,
            cached: None,
        };
    }

    pub fn preloaded(path: PathBuf, mean: MeanColor, image: DynamicImage) -> Self {
        return Self {
            path,
            mean,
            cached: Some(Arc::new(image)),
        };
    }

    pub fn load(&self) -> Result<Arc<DynamicImage>, MosaicError> {
        if let Some(cached) = &self.cached {
            return Ok(Arc::clone(cached));
        }
        let image = image::open(&self.path).map_err(|source| MosaicError::UnreadableSource {
            path: self.path.clone(),
            source,
        })?;
        return Ok(Arc::new(image));
    }
}

/// The set of reference images available for substitution into tiles.
///
/// Entry order is fixed at build time; only availability changes, and only
/// through [`Catalog::select`] under the without-replacement policy. One
/// catalog is meant to serve one mosaic run; call [`Catalog::reset`] before
/// reusing it.
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    taken: Mutex<Vec<bool>>,
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        let taken = Mutex::new(vec![false; entries.len()]);
        return Self { entries, taken };
    }

    /// Builds a catalog from every readable image file in `dir`.
    ///
    /// A `name#RRGGBB.ext` filename tag supplies the mean color without
    /// decoding the file; untagged candidates are decoded and averaged (and
    /// kept in memory for stitching). Unreadable candidates are skipped with
    /// a warning. Paths are sorted so entry order does not depend on
    /// platform directory order.
    pub fn from_dir(dir: &Path) -> Result<Self, MosaicError> {
        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .map(|entry| entry.path())
            .collect();
        paths.sort();

        let entries: Vec<CatalogEntry> = paths
            .into_par_iter()
            .filter_map(|path| match analyse_candidate(&path) {
                Ok(entry) => Some(entry),
                Err(err) => {
                    log::warn!("skipping candidate {}: {err}", path.display());
                    None
                }
            })
            .collect();
        log::info!("catalog holds {} candidates from {}", entries.len(), dir.display());
        return Ok(Self::new(entries));
    }

    pub fn len(&self) -> usize {
        return self.entries.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.entries.is_empty();
    }

    pub fn entry(&self, idx: usize) -> &CatalogEntry {
        return &self.entries[idx];
    }

    /// Makes every entry available again for the next run.
    pub fn reset(&self) {
        let mut taken = self.taken.lock().unwrap();
        taken.iter_mut().for_each(|t| *t = false);
    }

    /// Index of the available entry nearest to `query` in euclidean RGB
    /// distance. Ties resolve to the first entry in catalog order.
    ///
    /// Under [`Replacement::Without`] the winner is marked unavailable before
    /// the lock is released, so concurrent tile workers can never take the
    /// same entry twice.
    pub fn select(&self, query: MeanColor, policy: Replacement) -> Result<usize, MosaicError> {
        let mut taken = self.taken.lock().unwrap();

        let mut best: Option<usize> = None;
        let mut best_dist = MAX_RGB_DISTANCE;
        for (idx, entry) in self.entries.iter().enumerate() {
            if taken[idx] {
                continue;
            }
            let dist = query.distance(&entry.mean);
            if dist < best_dist {
                best_dist = dist;
                best = Some(idx);
            }
        }

        match best {
            Some(idx) => {
                if policy.is_without() {
                    taken[idx] = true;
                }
                log::trace!("query {query} -> entry {idx} at distance {best_dist:.2}");
                return Ok(idx);
            }
            None => {
                let requested = taken.iter().filter(|&&t| t).count() + 1;
                return Err(MosaicError::CatalogExhausted { requested });
            }
        }
    }
}

fn analyse_candidate(path: &Path) -> Result<CatalogEntry, MosaicError> {
    if let Some(mean) = mean_from_tag(path) {
        return Ok(CatalogEntry::new(path.to_path_buf(), mean));
    }
    let image = image::open(path).map_err(|source| MosaicError::UnreadableSource {
        path: path.to_path_buf(),
        source,
    })?;
    let mean = color::mean_color_of(&image).ok_or_else(|| MosaicError::DegenerateCandidate {
        path: path.to_path_buf(),
    })?;
    return Ok(CatalogEntry::preloaded(path.to_path_buf(), mean, image));
}

fn mean_from_tag(path: &Path) -> Option<MeanColor> {
    let stem = path.file_stem()?.to_str()?;
    let (_, tag) = stem.rsplit_once('#')?;
    return MeanColor::from_hex(tag);
}
