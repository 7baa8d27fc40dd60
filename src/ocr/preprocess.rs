use image::imageops::FilterType;
use image::{DynamicImage, GrayImage};

/// Converts a screenshot to grayscale for Tesseract, optionally upscaling it.
///
/// Overlay text in small screenshots is only a few pixels high; scaling by
/// 2.0 or so helps recognition. Factors at or below 1.0 (or non-finite)
/// leave the size unchanged.
pub fn prepare_for_ocr(img: &DynamicImage, upscale: f32) -> GrayImage {
    let gray = img.to_luma8();

    if !upscale.is_finite() || upscale <= 1.0 {
        return gray;
    }

    let (w, h) = gray.dimensions();
    let new_w = ((w as f32) * upscale).round() as u32;
    let new_h = ((h as f32) * upscale).round() as u32;

    image::imageops::resize(&gray, new_w.max(1), new_h.max(1), FilterType::CatmullRom)
}
