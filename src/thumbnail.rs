use image::imageops::FilterType;
use image::{DynamicImage, RgbImage};

/// Resizes `image` to exactly `tw x th`, first center-cropping it to the
/// target aspect ratio so the resize never stretches.
///
/// Aspect ratios are compared by cross-multiplication: `tw/th < sw/sh` is
/// exactly `tw * sh < th * sw` without float rounding.
pub fn aspect_fit(image: &DynamicImage, tw: u32, th: u32) -> RgbImage {
    let (sw, sh) = (image.width(), image.height());

    let target_cross = tw as u64 * sh as u64;
    let source_cross = th as u64 * sw as u64;

    let cropped = if target_cross < source_cross {
        // source is wider than the target aspect: trim left and right
        let crop_w = (target_cross / th as u64) as u32;
        let left = (sw - crop_w) / 2;
        image.crop_imm(left, 0, crop_w, sh)
    } else if target_cross > source_cross {
        // source is taller: trim top and bottom
        let crop_h = (source_cross / tw as u64) as u32;
        let top = (sh - crop_h) / 2;
        image.crop_imm(0, top, sw, crop_h)
    } else {
        image.clone()
    };

    return cropped.resize_exact(tw, th, FilterType::Lanczos3).to_rgb8();
}
