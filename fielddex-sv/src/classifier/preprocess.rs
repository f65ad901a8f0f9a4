//! Camera frame decoding and tensor preparation
//!
//! Browsers post camera frames as base64 data URLs. Frames are decoded,
//! forced to RGB, resized to the model's input size, and laid out as a
//! channels-last f32 tensor with the per-channel mean subtraction the model
//! was trained with. Preprocessing fidelity is the model service's concern;
//! this step only has to be deterministic.

use base64::Engine;
use image::imageops::FilterType;

use fielddex_common::{Error, Result};

/// Model input edge length (pixels)
pub const INPUT_SIZE: u32 = 224;

/// Per-channel means in BGR order (caffe-style preprocessing)
const CHANNEL_MEAN_BGR: [f32; 3] = [103.939, 116.779, 123.68];

/// Decode a base64 camera frame (data-URL prefix optional) into the model
/// input tensor.
pub fn decode_frame(payload: &str) -> Result<Vec<f32>> {
    let b64 = match payload.split_once(',') {
        // "data:image/jpeg;base64,...." → keep everything after the comma
        Some((_, rest)) => rest,
        None => payload,
    };

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(b64.trim())
        .map_err(|e| Error::Decode(format!("invalid base64 image: {}", e)))?;

    let rgb = image::load_from_memory(&bytes)
        .map_err(|e| Error::Decode(format!("undecodable image: {}", e)))?
        .to_rgb8();

    let resized = image::imageops::resize(&rgb, INPUT_SIZE, INPUT_SIZE, FilterType::Triangle);

    let mut tensor = Vec::with_capacity((INPUT_SIZE * INPUT_SIZE * 3) as usize);
    for pixel in resized.pixels() {
        let [r, g, b] = pixel.0;
        // RGB → BGR, zero-centered per channel
        tensor.push(f32::from(b) - CHANNEL_MEAN_BGR[0]);
        tensor.push(f32::from(g) - CHANNEL_MEAN_BGR[1]);
        tensor.push(f32::from(r) - CHANNEL_MEAN_BGR[2]);
    }
    Ok(tensor)
}
