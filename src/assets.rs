//! Image files to occupancy masks
//!
//! Only the alpha channel matters: a pixel is solid when its alpha is above
//! the threshold. Images without alpha are solid everywhere.

use std::fs;
use std::path::Path;

use crate::sim::Mask;
use crate::sim::track::TrackError;

/// Decode a PNG and turn its alpha channel into a mask
pub fn load_png_mask(path: &Path, threshold: u8) -> Result<Mask, TrackError> {
    let file = fs::File::open(path).map_err(|source| TrackError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let png_err = |source| TrackError::Png {
        path: path.to_path_buf(),
        source,
    };

    let mut decoder = png::Decoder::new(file);
    // Palette/low bit depths expand to 8-bit samples, tRNS becomes alpha
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder.read_info().map_err(png_err)?;
    let mut buf = vec![0u8; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf).map_err(png_err)?;

    let channels = match info.color_type {
        png::ColorType::Grayscale => 1,
        png::ColorType::GrayscaleAlpha => 2,
        png::ColorType::Rgb => 3,
        png::ColorType::Rgba => 4,
        other => {
            return Err(TrackError::UnsupportedImage {
                path: path.to_path_buf(),
                reason: format!("color type {other:?} after expansion"),
            });
        }
    };
    let has_alpha = matches!(
        info.color_type,
        png::ColorType::GrayscaleAlpha | png::ColorType::Rgba
    );

    let (width, height) = (info.width, info.height);
    let mut alpha = Vec::with_capacity(width as usize * height as usize);
    for row in buf.chunks(info.line_size).take(height as usize) {
        for px in row.chunks_exact(channels).take(width as usize) {
            alpha.push(if has_alpha { px[channels - 1] } else { u8::MAX });
        }
    }

    let mask = Mask::from_alpha(width, height, &alpha, threshold).ok_or_else(|| {
        TrackError::UnsupportedImage {
            path: path.to_path_buf(),
            reason: "truncated pixel data".to_string(),
        }
    })?;
    log::debug!(
        "Mask from {}: {}x{}, {} solid pixels",
        path.display(),
        width,
        height,
        mask.count()
    );
    Ok(mask)
}
