use std::path::Path;

use image::DynamicImage;
use image::imageops::FilterType;

use crate::color::Rgb;
use crate::error::{SampleError, SampleResult};

/// Side length of the square grid a photo is squeezed into before averaging.
pub const ANALYSIS_GRID: u32 = 50;

/// Decode the image at `path` and return its average colour.
pub fn sample_file(path: &Path) -> SampleResult<Rgb> {
    let reader = image::ImageReader::open(path)
        .map_err(|e| SampleError::io(path, e))?
        .with_guessed_format()
        .map_err(|e| SampleError::io(path, e))?;
    let img = reader.decode().map_err(|e| SampleError::decode(path, e))?;
    average_color(&img).ok_or_else(|| SampleError::empty(path))
}

/// Stretch the image onto the analysis grid (aspect ratio is ignored) and take
/// the per-channel mean over every grid pixel, floored. `None` for an image
/// with no pixels.
pub fn average_color(img: &DynamicImage) -> Option<Rgb> {
    if img.width() == 0 || img.height() == 0 {
        return None;
    }

    let grid = if img.width() == ANALYSIS_GRID && img.height() == ANALYSIS_GRID {
        img.to_rgba8()
    } else {
        img.resize_exact(ANALYSIS_GRID, ANALYSIS_GRID, FilterType::Triangle)
            .to_rgba8()
    };

    let (mut r, mut g, mut b) = (0u64, 0u64, 0u64);
    for px in grid.pixels() {
        r += px[0] as u64;
        g += px[1] as u64;
        b += px[2] as u64;
    }
    let count = grid.width() as u64 * grid.height() as u64;

    Some(Rgb::new(
        (r / count) as u8,
        (g / count) as u8,
        (b / count) as u8,
    ))
}
