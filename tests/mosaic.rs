use image::{DynamicImage, Rgb, RgbImage};
use mosaic_rust::{Catalog, Mosaic};

const QUADRANTS: [[u8; 3]; 4] = [
    [200, 40, 40],
    [40, 200, 40],
    [40, 40, 200],
    [200, 200, 40],
];

/// 512x288 source whose 256x144 quadrants are flat colors.
fn quadrant_source() -> RgbImage {
    return RgbImage::from_fn(512, 288, |x, y| {
        let quadrant = (y / 144) * 2 + x / 256;
        Rgb(QUADRANTS[quadrant as usize])
    });
}

fn quadrant_of(image: &RgbImage, row: u32, col: u32) -> Vec<Rgb<u8>> {
    let mut pixels = Vec::new();
    for y in row * 144..(row + 1) * 144 {
        for x in col * 256..(col + 1) * 256 {
            pixels.push(*image.get_pixel(x, y));
        }
    }
    return pixels;
}

#[test]
fn swatch_mosaic_of_quadrant_image_is_the_image_itself() {
    let source = quadrant_source();
    let output = Mosaic::new_from_image(DynamicImage::ImageRgb8(source.clone()))
        .with_tile_size(256, 144)
        .render()
        .unwrap();

    assert_eq!(output.dimensions(), (512, 288));
    assert_eq!(output, source);
}

#[test]
fn swatch_mosaic_flattens_each_quadrant_to_its_mean() {
    // checkerboard the top-left quadrant between two colors whose floored
    // mean is (120, 20, 20), leave the rest flat
    let mut source = quadrant_source();
    for y in 0..144 {
        for x in 0..256 {
            let color = if (x + y) % 2 == 0 {
                Rgb([100, 0, 0])
            } else {
                Rgb([141, 41, 41])
            };
            source.put_pixel(x, y, color);
        }
    }

    let output = Mosaic::new_from_image(DynamicImage::ImageRgb8(source))
        .with_tile_size(256, 144)
        .render()
        .unwrap();

    assert!(quadrant_of(&output, 0, 0)
        .iter()
        .all(|p| *p == Rgb([120, 20, 20])));
    for (quadrant, expected) in [(1, QUADRANTS[1]), (2, QUADRANTS[2]), (3, QUADRANTS[3])] {
        let (row, col) = (quadrant / 2, quadrant % 2);
        assert!(quadrant_of(&output, row, col)
            .iter()
            .all(|p| *p == Rgb(expected)));
    }
}

/// Writes one uniform candidate per quadrant color, tagged with its mean so
/// the catalog build takes the filename fast path. Candidates are off-aspect
/// on purpose to exercise the thumbnailer.
fn write_candidates(dir: &std::path::Path) {
    for (i, &color) in QUADRANTS.iter().enumerate() {
        let [r, g, b] = color;
        let name = format!("candidate-{i}#{:02X}{:02X}{:02X}.png", r, g, b);
        RgbImage::from_pixel(300, 200, Rgb(color))
            .save(dir.join(name))
            .unwrap();
    }
}

#[test]
fn perfect_match_catalog_run_is_repeatable_without_replacement() {
    let dir = tempfile::tempdir().unwrap();
    write_candidates(dir.path());
    let source = quadrant_source();

    let render = || {
        Mosaic::new_from_image(DynamicImage::ImageRgb8(source.clone()))
            .with_tile_size(256, 144)
            .with_catalog_dir(dir.path())
            .without_replacement()
            .render()
            .unwrap()
    };

    // every tile finds its distance-zero candidate, so the mosaic equals the
    // source, and a second run against a fresh catalog agrees with the first
    let first = render();
    assert_eq!(first, source);
    assert_eq!(render(), first);
}

#[test]
fn catalog_smaller_than_grid_fails_without_replacement() {
    let dir = tempfile::tempdir().unwrap();
    RgbImage::from_pixel(64, 64, Rgb([90, 90, 90]))
        .save(dir.path().join("lonely.png"))
        .unwrap();

    let result = Mosaic::new_from_image(DynamicImage::ImageRgb8(quadrant_source()))
        .with_tile_size(256, 144)
        .with_catalog_dir(dir.path())
        .without_replacement()
        .render();

    assert!(matches!(
        result,
        Err(mosaic_rust::MosaicError::CatalogExhausted { .. })
    ));
}

#[test]
fn preloaded_catalog_with_blend_ghosts_toward_the_source() {
    let source = quadrant_source();
    let entries = QUADRANTS
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            mosaic_rust::CatalogEntry::preloaded(
                std::path::PathBuf::from(format!("mem-{i}.png")),
                mosaic_rust::MeanColor(c),
                DynamicImage::ImageRgb8(RgbImage::from_pixel(128, 128, Rgb(c))),
            )
        })
        .collect();

    let output = Mosaic::new_from_image(DynamicImage::ImageRgb8(source.clone()))
        .with_tile_size(256, 144)
        .with_catalog(Catalog::new(entries))
        .without_replacement()
        .with_blend(1.0)
        .render()
        .unwrap();

    // alpha 1.0 restores the original pixel for pixel
    assert_eq!(output, source);
}
