//! Palette helpers for the detail view
//!
//! Dominant-color extraction from cover images, the HSL desaturation applied
//! to the background, and the black/white text decision.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Share of the original saturation kept for backgrounds
pub const BACKGROUND_SATURATION: f64 = 0.6;

/// Perceived brightness above which text switches to black
pub const BRIGHTNESS_THRESHOLD: f64 = 128.0;

// Pixels sampled per cover; larger images are thumbnailed down first.
const SAMPLE_EDGE: u32 = 64;
const SIGNIFICANT_BITS: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (the `#` is optional).
    pub fn from_hex(value: &str) -> Option<Self> {
        let hex = value.strip_prefix('#').unwrap_or(value);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// CSS form, `rgb(10, 20, 30)`
    pub fn to_css(&self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }

    /// `0.299R + 0.587G + 0.114B`
    pub fn brightness(&self) -> f64 {
        0.299 * f64::from(self.r) + 0.587 * f64::from(self.g) + 0.114 * f64::from(self.b)
    }

    /// Scale HSL saturation by `factor`, keeping hue and lightness.
    pub fn desaturate(&self, factor: f64) -> Self {
        let (h, s, l) = self.to_hsl();
        Self::from_hsl(h, (s * factor).clamp(0.0, 1.0), l)
    }

    fn to_hsl(self) -> (f64, f64, f64) {
        let r = f64::from(self.r) / 255.0;
        let g = f64::from(self.g) / 255.0;
        let b = f64::from(self.b) / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;

        if max == min {
            return (0.0, 0.0, l);
        }

        let d = max - min;
        let s = if l > 0.5 {
            d / (2.0 - max - min)
        } else {
            d / (max + min)
        };
        let h = if max == r {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };

        (h / 6.0, s, l)
    }

    fn from_hsl(h: f64, s: f64, l: f64) -> Self {
        if s == 0.0 {
            let v = to_channel(l);
            return Self::new(v, v, v);
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;

        Self::new(
            to_channel(hue_to_rgb(p, q, h + 1.0 / 3.0)),
            to_channel(hue_to_rgb(p, q, h)),
            to_channel(hue_to_rgb(p, q, h - 1.0 / 3.0)),
        )
    }
}

fn hue_to_rgb(p: f64, q: f64, t: f64) -> f64 {
    let t = if t < 0.0 {
        t + 1.0
    } else if t > 1.0 {
        t - 1.0
    } else {
        t
    };

    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn to_channel(v: f64) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TextColor {
    Black,
    White,
}

impl TextColor {
    pub fn for_background(background: Rgb) -> Self {
        if background.brightness() > BRIGHTNESS_THRESHOLD {
            TextColor::Black
        } else {
            TextColor::White
        }
    }
}

/// Background and text colors derived from a dominant color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scheme {
    pub background: Rgb,
    pub text: TextColor,
}

impl Scheme {
    pub fn from_dominant(dominant: Rgb) -> Self {
        let background = dominant.desaturate(BACKGROUND_SATURATION);
        Self {
            background,
            text: TextColor::for_background(background),
        }
    }
}

#[derive(Debug)]
pub enum PaletteError {
    /// No cover reference on the book
    NoImage,
    /// Download failed or returned a non-success status
    Fetch(String),
    /// Bytes could not be decoded as an image
    Decode(String),
    /// Every pixel was transparent or near white
    NoOpaquePixels,
}

impl fmt::Display for PaletteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaletteError::NoImage => write!(f, "Book has no cover image"),
            PaletteError::Fetch(msg) => write!(f, "Failed to fetch cover: {}", msg),
            PaletteError::Decode(msg) => write!(f, "Failed to decode cover: {}", msg),
            PaletteError::NoOpaquePixels => write!(f, "Cover has no usable pixels"),
        }
    }
}

impl std::error::Error for PaletteError {}

/// Most representative color of an encoded image.
///
/// Pixels are bucketed by their top five bits per channel; the average of the
/// most populated bucket wins. Mostly transparent and near-white pixels are
/// skipped, as cover scans tend to have white borders.
pub fn dominant_color(bytes: &[u8]) -> Result<Rgb, PaletteError> {
    let image = image::load_from_memory(bytes).map_err(|e| PaletteError::Decode(e.to_string()))?;
    let sample = if image.width() > SAMPLE_EDGE || image.height() > SAMPLE_EDGE {
        image.thumbnail(SAMPLE_EDGE, SAMPLE_EDGE).to_rgba8()
    } else {
        image.to_rgba8()
    };

    let shift = 8 - SIGNIFICANT_BITS;
    let mut buckets: HashMap<(u8, u8, u8), (u64, u64, u64, u64)> = HashMap::new();

    for pixel in sample.pixels() {
        let [r, g, b, a] = pixel.0;
        if a < 125 || (r > 250 && g > 250 && b > 250) {
            continue;
        }
        let entry = buckets
            .entry((r >> shift, g >> shift, b >> shift))
            .or_insert((0, 0, 0, 0));
        entry.0 += 1;
        entry.1 += u64::from(r);
        entry.2 += u64::from(g);
        entry.3 += u64::from(b);
    }

    // Ties resolve to the smallest bucket key so results are stable.
    let (_, (count, r, g, b)) = buckets
        .into_iter()
        .max_by(|(ka, a), (kb, b)| a.0.cmp(&b.0).then_with(|| kb.cmp(ka)))
        .ok_or(PaletteError::NoOpaquePixels)?;

    Ok(Rgb::new(
        (r / count) as u8,
        (g / count) as u8,
        (b / count) as u8,
    ))
}

/// Downloads cover images for color extraction
#[derive(Clone)]
pub struct CoverLoader {
    client: reqwest::Client,
}

impl CoverLoader {
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Falling back to default HTTP client: {}", e);
                reqwest::Client::new()
            });
        Self { client }
    }

    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, PaletteError> {
        let res = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| PaletteError::Fetch(e.to_string()))?;

        if !res.status().is_success() {
            return Err(PaletteError::Fetch(format!("HTTP {}", res.status())));
        }

        let bytes = res
            .bytes()
            .await
            .map_err(|e| PaletteError::Fetch(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    /// Fetch and analyse a cover in one go.
    pub async fn dominant_color(&self, image_url: Option<&str>) -> Result<Rgb, PaletteError> {
        let url = image_url.ok_or(PaletteError::NoImage)?;
        let bytes = self.fetch(url).await?;
        dominant_color(&bytes)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    pub(crate) fn png_bytes(
        width: u32,
        height: u32,
        paint: impl Fn(u32, u32) -> Rgba<u8>,
    ) -> Vec<u8> {
        let img = RgbaImage::from_fn(width, height, paint);
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_hex_parsing() {
        assert_eq!(Rgb::from_hex("#0A141E"), Some(Rgb::new(10, 20, 30)));
        assert_eq!(Rgb::from_hex("0a141e"), Some(Rgb::new(10, 20, 30)));
        assert_eq!(Rgb::from_hex("#12345"), None);
        assert_eq!(Rgb::from_hex("#GG0000"), None);
    }

    #[test]
    fn test_desaturate_keeps_hue_and_lightness() {
        // Pure red: h=0, s=1, l=0.5 -> s=0.6 gives rgb(204, 51, 51)
        assert_eq!(Rgb::new(255, 0, 0).desaturate(0.6), Rgb::new(204, 51, 51));
        // Greys have no saturation to remove
        assert_eq!(Rgb::new(90, 90, 90).desaturate(0.6), Rgb::new(90, 90, 90));
    }

    #[test]
    fn test_text_color_threshold() {
        assert_eq!(TextColor::for_background(Rgb::new(255, 255, 255)), TextColor::Black);
        assert_eq!(TextColor::for_background(Rgb::new(0, 0, 0)), TextColor::White);
        // brightness exactly 128 is not "> 128"
        assert_eq!(TextColor::for_background(Rgb::new(128, 128, 128)), TextColor::White);
        assert_eq!(TextColor::for_background(Rgb::new(129, 129, 129)), TextColor::Black);
    }

    #[test]
    fn test_scheme_from_dominant() {
        let scheme = Scheme::from_dominant(Rgb::new(10, 20, 30));
        assert_eq!(scheme.text, TextColor::White);
        assert_ne!(scheme.background, Rgb::new(10, 20, 30));
    }

    #[test]
    fn test_dominant_color_prefers_largest_region() {
        let bytes = png_bytes(10, 10, |x, _| {
            if x < 7 {
                Rgba([200, 30, 40, 255])
            } else {
                Rgba([10, 10, 200, 255])
            }
        });
        assert_eq!(dominant_color(&bytes).unwrap(), Rgb::new(200, 30, 40));
    }

    #[test]
    fn test_dominant_color_skips_white_and_transparent() {
        let bytes = png_bytes(10, 10, |x, y| match (x, y) {
            (0, 0) => Rgba([20, 120, 60, 255]),
            (1, _) => Rgba([0, 0, 0, 0]),
            _ => Rgba([255, 255, 255, 255]),
        });
        assert_eq!(dominant_color(&bytes).unwrap(), Rgb::new(20, 120, 60));
    }

    #[test]
    fn test_dominant_color_errors() {
        assert!(matches!(dominant_color(b"not an image"), Err(PaletteError::Decode(_))));

        let blank = png_bytes(4, 4, |_, _| Rgba([255, 255, 255, 255]));
        assert!(matches!(dominant_color(&blank), Err(PaletteError::NoOpaquePixels)));
    }
}
