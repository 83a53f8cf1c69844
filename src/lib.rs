pub mod catalog;
pub mod color;
pub mod error;
pub mod grid;
pub mod mosaic;
pub mod stitch;
pub mod thumbnail;

pub use catalog::{Catalog, CatalogEntry, Replacement};
pub use color::{mean_color, mean_color_of, MeanColor};
pub use error::MosaicError;
pub use grid::{Tile, TileGrid};
pub use mosaic::Mosaic;
