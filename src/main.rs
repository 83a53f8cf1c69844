use std::path::PathBuf;
use std::process::ExitCode;

use mosaic_rust::Mosaic;

const USAGE: &str = "usage: mosaic-rust <input> <output> \
    [--tile WxH] [--catalog DIR] [--no-repeat] [--blend ALPHA] [--upscale FACTOR]";

fn main() -> ExitCode {
    use simplelog::*;
    TermLogger::init(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .unwrap();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let mut input: Option<PathBuf> = None;
    let mut output: Option<PathBuf> = None;
    let mut tile: Option<(u32, u32)> = None;
    let mut catalog: Option<PathBuf> = None;
    let mut no_repeat = false;
    let mut blend: Option<f32> = None;
    let mut upscale: Option<u32> = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--tile" => tile = Some(parse_tile(iter.next().ok_or(USAGE)?)?),
            "--catalog" => catalog = Some(PathBuf::from(iter.next().ok_or(USAGE)?)),
            "--no-repeat" => no_repeat = true,
            "--blend" => blend = Some(iter.next().ok_or(USAGE)?.parse()?),
            "--upscale" => upscale = Some(iter.next().ok_or(USAGE)?.parse()?),
            _ if input.is_none() => input = Some(PathBuf::from(arg)),
            _ if output.is_none() => output = Some(PathBuf::from(arg)),
            _ => return Err(USAGE.into()),
        }
    }
    let input = input.ok_or(USAGE)?;
    let output = output.ok_or(USAGE)?;

    let mut mosaic = Mosaic::new_from_image_path(&input)?;
    if let Some((w, h)) = tile {
        mosaic = mosaic.with_tile_size(w, h);
    }
    if let Some(dir) = catalog {
        mosaic = mosaic.with_catalog_dir(dir);
    }
    if no_repeat {
        mosaic = mosaic.without_replacement();
    }
    if let Some(alpha) = blend {
        mosaic = mosaic.with_blend(alpha);
    }
    if let Some(factor) = upscale {
        mosaic = mosaic.with_upscale(factor);
    }

    // render fully before touching the output path, so a failed run never
    // leaves a partial file behind
    let image = mosaic.render()?;
    image.save(&output)?;
    log::info!("wrote {}", output.display());
    return Ok(());
}

fn parse_tile(value: &str) -> Result<(u32, u32), Box<dyn std::error::Error>> {
    let (w, h) = value
        .split_once('x')
        .ok_or("tile size must look like 256x144")?;
    let (w, h) = (w.parse()?, h.parse()?);
    if w == 0 || h == 0 {
        return Err("tile dimensions must be positive".into());
    }
    return Ok((w, h));
}
