//! Serializable challenge payloads handed to transport layers.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;

use crate::placement::Direction;

const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Raw engine output: two encoded rasters plus the answer offset.
#[derive(Clone, Debug)]
pub struct CaptchaAssets {
    pub background_png: Vec<u8>,
    pub slider_png: Vec<u8>,
    pub slide_offset: Option<i32>,
}

/// Transport-ready challenge. Image payloads are PNG data URIs; an empty
/// string payload with no offset is the failure sentinel, not a challenge.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Challenge {
    pub captcha_direction: Direction,
    pub image_width: u32,
    pub image_height: u32,
    #[serde(rename = "backgroundBase64String")]
    pub background: String,
    #[serde(rename = "sliderBase64String")]
    pub slider: String,
    pub slide_offset: Option<i32>,
}

impl Challenge {
    pub fn from_assets(
        direction: Direction,
        width: u32,
        height: u32,
        assets: &CaptchaAssets,
    ) -> Self {
        Self {
            captcha_direction: direction,
            image_width: width,
            image_height: height,
            background: data_uri(&assets.background_png),
            slider: data_uri(&assets.slider_png),
            slide_offset: assets.slide_offset,
        }
    }

    /// The committed failure value: callers must treat this as "no captcha".
    pub fn sentinel(direction: Direction, width: u32, height: u32) -> Self {
        Self {
            captcha_direction: direction,
            image_width: width,
            image_height: height,
            background: String::new(),
            slider: String::new(),
            slide_offset: None,
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.background.is_empty() && self.slider.is_empty() && self.slide_offset.is_none()
    }
}

fn data_uri(png: &[u8]) -> String {
    if png.is_empty() {
        return String::new();
    }
    format!("{PNG_DATA_URI_PREFIX}{}", STANDARD.encode(png))
}

/// Strips the data-URI prefix and decodes the payload back to PNG bytes.
/// Intended for tests and debugging tools.
pub fn decode_data_uri(uri: &str) -> Option<Vec<u8>> {
    let encoded = uri.strip_prefix(PNG_DATA_URI_PREFIX)?;
    STANDARD.decode(encoded).ok()
}
