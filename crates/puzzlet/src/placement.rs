//! Legal placement of the outline inside the canvas, and the answer offset.
//!
//! Every direction-dependent rule lives in one of the two match tables here;
//! nothing else in the crate branches on [`Direction`] except the final crop.

use std::str::FromStr;

use rand::Rng;
use serde::Serialize;

/// Which way the slider tile travels in the UI. The side of the piece facing
/// the travel start is kept clear of that canvas edge by half the piece's own
/// extent so the cropped tile has room to render.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum Direction {
    #[default]
    LeftToRight,
    RightToLeft,
    TopToBottom,
    BottomToTop,
}

impl Direction {
    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::LeftToRight | Direction::RightToLeft)
    }
}

impl FromStr for Direction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s
            .trim()
            .to_ascii_lowercase()
            .replace(['-', '_'], "")
            .as_str()
        {
            "lefttoright" | "ltr" => Ok(Self::LeftToRight),
            "righttoleft" | "rtl" => Ok(Self::RightToLeft),
            "toptobottom" | "ttb" => Ok(Self::TopToBottom),
            "bottomtotop" | "btt" => Ok(Self::BottomToTop),
            _ => Err(()),
        }
    }
}

/// Inclusive range of legal top-left corners for the placed outline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacementRect {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

impl PlacementRect {
    /// Uniformly samples a placement point. A range whose floor collapsed to
    /// empty yields its minimum, so extreme piece/canvas ratios degrade into
    /// a fixed placement instead of a panic.
    pub fn sample(&self, rng: &mut impl Rng) -> (i32, i32) {
        let x = if self.max_x > self.min_x {
            rng.gen_range(self.min_x..=self.max_x)
        } else {
            self.min_x
        };
        let y = if self.max_y > self.min_y {
            rng.gen_range(self.min_y..=self.max_y)
        } else {
            self.min_y
        };
        (x, y)
    }
}

/// Legal placement range for a piece of `piece_w` x `piece_h` on a
/// `canvas_w` x `canvas_h` canvas, given the drag direction.
pub fn placement_rect(
    direction: Direction,
    canvas_w: u32,
    canvas_h: u32,
    piece_w: f32,
    piece_h: f32,
) -> PlacementRect {
    let w = canvas_w as f32;
    let h = canvas_h as f32;
    let (min_x, max_x, min_y, max_y) = match direction {
        Direction::LeftToRight => (piece_w / 2.0, w - piece_w, 0.0, h - piece_h),
        Direction::RightToLeft => (0.0, w - piece_w - piece_w / 2.0, 0.0, h - piece_h),
        Direction::TopToBottom => (0.0, w - piece_w, piece_h / 2.0, h - piece_h),
        Direction::BottomToTop => (0.0, w - piece_w, 0.0, h - piece_h - piece_h / 2.0),
    };
    PlacementRect {
        min_x: min_x.floor() as i32,
        max_x: max_x.floor() as i32,
        min_y: min_y.floor() as i32,
        max_y: max_y.floor() as i32,
    }
}

/// Distance the slider must travel from its start edge to line up with the
/// notch. Integer arithmetic throughout, so the placement point is exactly
/// recoverable from the offset.
pub fn slide_offset(
    direction: Direction,
    place_x: i32,
    place_y: i32,
    piece_w: f32,
    piece_h: f32,
    canvas_w: u32,
    canvas_h: u32,
) -> i32 {
    match direction {
        Direction::LeftToRight => place_x,
        Direction::RightToLeft => canvas_w as i32 - piece_w as i32 / 2 - place_x,
        Direction::TopToBottom => place_y,
        Direction::BottomToTop => canvas_h as i32 - piece_h as i32 / 2 - place_y,
    }
}
