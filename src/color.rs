use std::fmt;

use image::{DynamicImage, GenericImageView, Rgb};

/// Distance between pure black and pure white (`sqrt(3 * 255^2)`), rounded up.
/// Upper bound for any euclidean distance between two RGB colors, used as the
/// "no candidate found yet" sentinel when scanning the catalog.
pub const MAX_RGB_DISTANCE: f32 = 441.68;

/// Per-channel intensity-weighted average color of a region.
/// Computed once per tile or catalog entry and never recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeanColor(pub [u8; 3]);

impl MeanColor {
    pub fn distance(&self, other: &MeanColor) -> f32 {
        let [r1, g1, b1] = self.0.map(f32::from);
        let [r2, g2, b2] = other.0.map(f32::from);
        return ((r1 - r2).powi(2) + (g1 - g2).powi(2) + (b1 - b2).powi(2)).sqrt();
    }

    pub fn to_rgb(&self) -> Rgb<u8> {
        return Rgb(self.0);
    }

    /// Parses an `RRGGBB` hex triplet, the tag format embedded in catalog
    /// filenames (`sunset#FFA040.png`).
    pub fn from_hex(tag: &str) -> Option<MeanColor> {
        if tag.len() != 6 || !tag.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&tag[0..2], 16).ok()?;
        let g = u8::from_str_radix(&tag[2..4], 16).ok()?;
        let b = u8::from_str_radix(&tag[4..6], 16).ok()?;
        return Some(MeanColor([r, g, b]));
    }
}

impl fmt::Display for MeanColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{:02X}{:02X}{:02X}", r, g, b)
    }
}

fn weighted_average(channel: &[u64; 256]) -> Option<u8> {
    let total: u64 = channel.iter().sum();
    if total == 0 {
        return None;
    }
    let weighted: u64 = channel
        .iter()
        .enumerate()
        .map(|(intensity, &count)| intensity as u64 * count)
        .sum();
    // floor division keeps the result an exact integer triple
    return Some((weighted / total) as u8);
}

/// Mean color of any three-channel RGB view (full image or tile sub-region).
/// Returns `None` only for an empty region.
pub fn mean_color<I>(region: &I) -> Option<MeanColor>
where
    I: GenericImageView<Pixel = Rgb<u8>>,
{
    let mut histograms = [[0u64; 256]; 3];
    for (_, _, pixel) in region.pixels() {
        for (channel, &intensity) in pixel.0.iter().enumerate() {
            histograms[channel][intensity as usize] += 1;
        }
    }

    let r = weighted_average(&histograms[0])?;
    let g = weighted_average(&histograms[1])?;
    let b = weighted_average(&histograms[2])?;
    return Some(MeanColor([r, g, b]));
}

/// Mean color of a decoded image of any color mode. Non-RGB inputs are
/// converted before averaging.
pub fn mean_color_of(image: &DynamicImage) -> Option<MeanColor> {
    match image {
        DynamicImage::ImageRgb8(rgb) => mean_color(rgb),
        other => mean_color(&other.to_rgb8()),
    }
}
