use crate::fdi::NormalizedGrid;
use anyhow::Result;
use image::{ImageBuffer, ImageEncoder, Rgba, RgbaImage, codecs::png::PngEncoder};

/// Red whose alpha follows the normalized value: transparent at 0, opaque at 1.
pub const CONCENTRATION_STOPS: [(f32, Rgba<u8>); 2] = [
    (0.0, Rgba([255, 0, 0, 0])),
    (1.0, Rgba([255, 0, 0, 255])),
];

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Returns an interpolated colour based on a value and a set of colour stops.
pub fn get_color(value: f32, color_stops: &[(f32, Rgba<u8>)]) -> Rgba<u8> {
    for window in color_stops.windows(2) {
        let (v1, c1) = window[0];
        let (v2, c2) = window[1];

        if value <= v1 {
            return c1;
        }
        if value <= v2 {
            let t = (value - v1) / (v2 - v1);
            let mix = |a: u8, b: u8| (a as f32 * (1.0 - t) + b as f32 * t).round() as u8;
            return Rgba([
                mix(c1.0[0], c2.0[0]),
                mix(c1.0[1], c2.0[1]),
                mix(c1.0[2], c2.0[2]),
                mix(c1.0[3], c2.0[3]),
            ]);
        }
    }
    color_stops
        .last()
        .map(|(_, c)| *c)
        .unwrap_or(TRANSPARENT)
}

/// Colours the grid; missing cells stay fully transparent.
pub fn colorize(grid: &NormalizedGrid) -> RgbaImage {
    let (width, height) = (grid.width() as u32, grid.height() as u32);
    ImageBuffer::from_fn(width, height, |x, y| {
        match grid.get(x as usize, y as usize) {
            Some(v) if !v.is_nan() => get_color(v, &CONCENTRATION_STOPS),
            _ => TRANSPARENT,
        }
    })
}

/// Renders the grid as a PNG overlay, row 0 at the top (north).
pub fn render_overlay(grid: &NormalizedGrid) -> Result<Vec<u8>> {
    let img_rgba = colorize(grid);

    let mut png_data = Vec::new();
    {
        let encoder = PngEncoder::new(&mut png_data);
        encoder
            .write_image(
                img_rgba.as_raw(),
                img_rgba.width(),
                img_rgba.height(),
                image::ColorType::Rgba8.into(),
            )
            .map_err(|e| anyhow::anyhow!("[overlay] PNG encoding error: {:?}", e))?;
    }
    Ok(png_data)
}
