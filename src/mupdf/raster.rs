//! Page rendering for OCR

use std::io::Cursor;

use image::DynamicImage;
use mupdf::{Colorspace, Matrix, Page, Pixmap};

use crate::document::{ProviderError, RasterPage};

/// Render a page to PNG at `scale` pixels per point
pub fn render_page(page: &Page, scale: f32) -> Result<RasterPage, ProviderError> {
    let matrix = Matrix::new_scale(scale, scale);
    let colorspace = Colorspace::device_rgb();
    let pixmap = page
        .to_pixmap(&matrix, &colorspace, false, true)
        .map_err(|e| ProviderError::RenderError(e.to_string()))?;
    encode_png(&pixmap)
}

fn encode_pixmap_rgb(pixmap: &Pixmap) -> Result<image::RgbImage, ProviderError> {
    let width = pixmap.width() as u32;
    let height = pixmap.height() as u32;
    let samples = pixmap.samples();
    let n = pixmap.n() as usize;

    let mut rgb_buffer = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height as usize {
        for x in 0..width as usize {
            let offset = (y * width as usize + x) * n;
            let r = samples.get(offset).copied().unwrap_or(255);
            let g = samples.get(offset + 1).copied().unwrap_or(255);
            let b = samples.get(offset + 2).copied().unwrap_or(255);
            rgb_buffer.extend_from_slice(&[r, g, b]);
        }
    }

    image::RgbImage::from_raw(width, height, rgb_buffer)
        .ok_or_else(|| ProviderError::ImageError("Failed to create image buffer".to_string()))
}

fn encode_png(pixmap: &Pixmap) -> Result<RasterPage, ProviderError> {
    let img = DynamicImage::ImageRgb8(encode_pixmap_rgb(pixmap)?);
    let (width, height) = (img.width(), img.height());

    let mut data = Vec::new();
    img.write_to(&mut Cursor::new(&mut data), image::ImageFormat::Png)
        .map_err(|e| ProviderError::ImageError(e.to_string()))?;

    Ok(RasterPage { data, width, height })
}
