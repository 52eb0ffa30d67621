//! Embedded signature images
//!
//! Signature pads in the dashboard export a canvas as a `data:image/png;base64,`
//! URL. Records carry that string untouched; it is only decoded when a form
//! is rendered, and a failed decode never aborts rendering.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while decoding an embedded signature
#[derive(Debug, Error)]
pub enum SignatureError {
    #[error("signature data is empty")]
    MissingPayload,

    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("data URL is not base64 encoded")]
    NotBase64,

    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("unreadable image: {0}")]
    Image(#[from] image::ImageError),

    #[error("image has no pixels")]
    Empty,
}

/// Decoded raster, split into the planes a page writer embeds
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,

    /// 8-bit RGB samples, row-major
    #[serde(skip)]
    pub rgb: Vec<u8>,

    /// 8-bit alpha samples; `None` when the image is fully opaque
    #[serde(skip)]
    pub alpha: Option<Vec<u8>>,
}

impl RasterImage {
    /// Whether the image needs a soft mask
    pub fn has_alpha(&self) -> bool {
        self.alpha.is_some()
    }
}

/// A pre-rendered signature as a data URL or bare base64 string
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(transparent)]
pub struct SignatureImage(String);

impl SignatureImage {
    pub fn new(data: impl Into<String>) -> Self {
        Self(data.into())
    }

    /// Wrap encoded PNG bytes the way a signature pad would
    pub fn from_png_bytes(bytes: &[u8]) -> Self {
        Self(format!("data:image/png;base64,{}", STANDARD.encode(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode into RGB(A) planes
    pub fn decode(&self) -> Result<RasterImage, SignatureError> {
        let bytes = self.payload_bytes()?;
        let rgba = image::load_from_memory(&bytes)?.to_rgba8();

        let (width, height) = rgba.dimensions();
        if width == 0 || height == 0 {
            return Err(SignatureError::Empty);
        }

        let pixel_count = (width as usize) * (height as usize);
        let mut rgb = Vec::with_capacity(pixel_count * 3);
        let mut alpha = Vec::with_capacity(pixel_count);
        for pixel in rgba.pixels() {
            let [r, g, b, a] = pixel.0;
            rgb.extend_from_slice(&[r, g, b]);
            alpha.push(a);
        }

        let opaque = alpha.iter().all(|&a| a == u8::MAX);

        Ok(RasterImage {
            width,
            height,
            rgb,
            alpha: if opaque { None } else { Some(alpha) },
        })
    }

    fn payload_bytes(&self) -> Result<Vec<u8>, SignatureError> {
        let raw = self.0.trim();

        let payload = match raw.strip_prefix("data:") {
            Some(rest) => {
                let (meta, payload) = rest
                    .split_once(',')
                    .ok_or(SignatureError::MissingPayload)?;
                let mut params = meta.split(';');
                let media_type = params.next().unwrap_or_default();
                if !media_type.is_empty() && !media_type.starts_with("image/") {
                    return Err(SignatureError::UnsupportedMediaType(media_type.to_string()));
                }
                if !params.any(|param| param.eq_ignore_ascii_case("base64")) {
                    return Err(SignatureError::NotBase64);
                }
                payload
            }
            None => raw,
        };

        // Data URLs copied from devtools or e-mails often carry line breaks
        let compact: String = payload
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        if compact.is_empty() {
            return Err(SignatureError::MissingPayload);
        }

        Ok(STANDARD.decode(compact)?)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    /// Small PNG with a transparent background and one dark stroke
    pub(crate) fn sample_png(transparent: bool) -> Vec<u8> {
        let background = if transparent {
            Rgba([255, 255, 255, 0])
        } else {
            Rgba([255, 255, 255, 255])
        };
        let mut img = RgbaImage::from_pixel(8, 4, background);
        for x in 0..8 {
            img.put_pixel(x, 2, Rgba([10, 10, 10, 255]));
        }
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_decode_data_url_with_alpha() {
        let signature = SignatureImage::from_png_bytes(&sample_png(true));
        assert!(signature.as_str().starts_with("data:image/png;base64,"));

        let raster = signature.decode().unwrap();
        assert_eq!((raster.width, raster.height), (8, 4));
        assert_eq!(raster.rgb.len(), 8 * 4 * 3);
        assert!(raster.has_alpha());
    }

    #[test]
    fn test_decode_bare_base64_opaque() {
        let signature = SignatureImage::new(STANDARD.encode(sample_png(false)));
        let raster = signature.decode().unwrap();
        assert!(!raster.has_alpha());
    }

    #[test]
    fn test_decode_tolerates_line_breaks() {
        let encoded = STANDARD.encode(sample_png(true));
        let (head, tail) = encoded.split_at(encoded.len() / 2);
        let signature = SignatureImage::new(format!("data:image/png;base64,{}\n{}", head, tail));
        assert!(signature.decode().is_ok());
    }

    #[test]
    fn test_decode_rejects_corrupt_payloads() {
        let not_base64 = SignatureImage::new("data:image/png;base64,@@@@");
        assert!(matches!(not_base64.decode(), Err(SignatureError::Base64(_))));

        let not_an_image = SignatureImage::new(format!(
            "data:image/png;base64,{}",
            STANDARD.encode(b"definitely not a png")
        ));
        assert!(matches!(not_an_image.decode(), Err(SignatureError::Image(_))));

        let empty = SignatureImage::new("data:image/png;base64,");
        assert!(matches!(empty.decode(), Err(SignatureError::MissingPayload)));

        let text = SignatureImage::new("data:text/plain;base64,aGVsbG8=");
        assert!(matches!(text.decode(), Err(SignatureError::UnsupportedMediaType(_))));

        let url_encoded = SignatureImage::new("data:image/png,abc");
        assert!(matches!(url_encoded.decode(), Err(SignatureError::NotBase64)));
    }
}
