// Shared fixtures for integration tests
// Author: kelexine (https://github.com/kelexine)

#![allow(dead_code)]

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

/// Deterministic noise so JPEG fixtures have a realistic size.
pub fn noise_image(width: u32, height: u32) -> RgbImage {
    let mut state: u32 = 0x2545_f491;
    RgbImage::from_fn(width, height, |_, _| {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        let [r, g, b, _] = state.to_le_bytes();
        Rgb([r, g, b])
    })
}

pub fn encode(image: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buf), format)
        .expect("fixture encodes");
    buf
}

pub fn tiny_png() -> Vec<u8> {
    encode(
        &DynamicImage::ImageRgb8(RgbImage::from_pixel(2, 2, Rgb([255, 0, 0]))),
        ImageFormat::Png,
    )
}

/// Two-entry palette PNG; the second entry is fully transparent.
pub fn palette_png() -> Vec<u8> {
    let mut buf = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut buf, 2, 1);
        encoder.set_color(png::ColorType::Indexed);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_palette(vec![255u8, 0, 0, 0, 0, 255]);
        encoder.set_trns(vec![255u8, 0]);
        let mut writer = encoder.write_header().expect("png header");
        writer.write_image_data(&[0, 1]).expect("png data");
    }
    buf
}

/// Gemini `generateContent` success body with a single text part.
pub fn gemini_body(text: &str) -> String {
    serde_json::json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }],
        "usageMetadata": {"promptTokenCount": 263, "candidatesTokenCount": 6, "totalTokenCount": 269}
    })
    .to_string()
}
