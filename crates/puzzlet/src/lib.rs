#![forbid(unsafe_code)]

//! Slider-captcha engine.
//!
//! One call produces a photo-backed background with a jigsaw-shaped notch, a
//! floating slider tile holding the notched-out pixels, and the single-axis
//! offset a user must drag the tile to pass.
//!
//! Design goals:
//! - every generation is self-contained and stateless; nothing survives a call
//! - randomness is injected, so outputs are reproducible under a seeded RNG
//! - the public entry point never panics or errors: failures collapse into a
//!   sentinel challenge with empty payloads and no offset

pub mod error;
pub mod geom;
pub mod model;
pub mod outline;
pub mod placement;
pub mod raster;
pub mod shape;

pub use error::{Error, Result};
pub use model::{CaptchaAssets, Challenge};
pub use placement::Direction;
pub use shape::EdgeShape;

use rand::Rng;

use crate::geom::vector;

/// Knobs for outline randomization. Both default on; switching them off makes
/// the piece a fixed axis-aligned silhouette, which is mainly useful in tests.
#[derive(Debug, Clone, Copy)]
pub struct GenerateOptions {
    /// Jitter anchor points and arc radii so no two pieces look alike.
    pub drift: bool,
    /// Rotate the whole outline by a random angle on a coin flip.
    pub rotate: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            drift: true,
            rotate: true,
        }
    }
}

/// Generates a challenge, swallowing any failure into the sentinel value.
///
/// Callers that need the failure cause (or deterministic output) should use
/// [`generate_with_rng`] instead.
pub fn generate(
    source: &image::DynamicImage,
    direction: Direction,
    width: u32,
    height: u32,
    options: &GenerateOptions,
) -> Challenge {
    let mut rng = rand::thread_rng();
    match generate_with_rng(source, direction, width, height, options, &mut rng) {
        Ok(challenge) => challenge,
        Err(err) => {
            tracing::warn!(%err, width, height, "captcha generation failed, returning sentinel");
            Challenge::sentinel(direction, width, height)
        }
    }
}

/// Fallible, RNG-injected generation. Deterministic for a fixed seed, source
/// image and arguments.
pub fn generate_with_rng(
    source: &image::DynamicImage,
    direction: Direction,
    width: u32,
    height: u32,
    options: &GenerateOptions,
    rng: &mut impl Rng,
) -> Result<Challenge> {
    let assets = generate_assets_with_rng(source, direction, width, height, options, rng)?;
    Ok(Challenge::from_assets(direction, width, height, &assets))
}

/// Like [`generate_with_rng`], but returns the raw PNG payloads instead of a
/// transport DTO.
pub fn generate_assets_with_rng(
    source: &image::DynamicImage,
    direction: Direction,
    width: u32,
    height: u32,
    options: &GenerateOptions,
    rng: &mut impl Rng,
) -> Result<CaptchaAssets> {
    let min_length = width.min(height);
    let outline = outline::jigsaw_outline(min_length, options, rng)?;

    let bounds = outline.bounds();
    let (piece_w, piece_h) = (bounds.width(), bounds.height());

    let rect = placement::placement_rect(direction, width, height, piece_w, piece_h);
    let (place_x, place_y) = rect.sample(rng);
    tracing::debug!(
        ?direction,
        place_x,
        place_y,
        piece_w,
        piece_h,
        "placed jigsaw outline"
    );

    // Rebase the outline so its bounding-box origin lands exactly on the
    // sampled placement point.
    let placed = outline.translate(vector(
        place_x as f32 - bounds.min_x,
        place_y as f32 - bounds.min_y,
    ));
    let piece = placed.to_path().ok_or(Error::DegeneratePath)?;

    let canvas = raster::source_pixmap(source, width, height)?;
    let background = raster::notched_background(&canvas, &piece);
    let tile = raster::slider_tile(
        &canvas, &piece, piece_w, piece_h, direction, place_x, place_y,
    )?;

    let offset = placement::slide_offset(direction, place_x, place_y, piece_w, piece_h, width, height);

    Ok(CaptchaAssets {
        background_png: raster::encode_png(&background)?,
        slider_png: raster::encode_png(&tile)?,
        slide_offset: Some(offset),
    })
}
