//! Raster compositing: the notched background and the extracted slider tile.

use tiny_skia::{
    FillRule, FilterQuality, IntRect, Paint, Pattern, Pixmap, SpreadMode, Stroke, Transform,
};

use crate::error::{Error, Result};
use crate::placement::Direction;

// The notch is marked, not erased: a translucent white fill keeps the photo
// readable while showing where the piece belongs.
const NOTCH_FILL_ALPHA: u8 = 125;
const NOTCH_BORDER_ALPHA: u8 = 200;
const NOTCH_BORDER_WIDTH: f32 = 2.0;
const TILE_BEVEL_ALPHA: u8 = 125;
const TILE_BEVEL_WIDTH: f32 = 4.0;

/// Converts a decoded photo into an opaque canvas-sized pixmap, scaling to
/// cover and center-cropping the overflow.
pub fn source_pixmap(image: &image::DynamicImage, width: u32, height: u32) -> Result<Pixmap> {
    let resized = image.resize_to_fill(width, height, image::imageops::FilterType::Triangle);
    let rgb = resized.to_rgb8();

    let mut data = Vec::with_capacity(width as usize * height as usize * 4);
    for px in rgb.pixels() {
        data.extend_from_slice(&[px[0], px[1], px[2], 255]);
    }
    let size =
        tiny_skia::IntSize::from_wh(width, height).ok_or(Error::PixmapAlloc { width, height })?;
    Pixmap::from_vec(data, size).ok_or(Error::PixmapAlloc { width, height })
}

/// Clones the source and paints the translucent notch mask plus a slightly
/// more opaque border along the placed outline.
pub fn notched_background(source: &Pixmap, piece: &tiny_skia::Path) -> Pixmap {
    let mut background = source.clone();

    let mut fill = Paint::default();
    fill.set_color_rgba8(255, 255, 255, NOTCH_FILL_ALPHA);
    fill.anti_alias = true;
    background.fill_path(piece, &fill, FillRule::Winding, Transform::identity(), None);

    let mut border = Paint::default();
    border.set_color_rgba8(255, 255, 255, NOTCH_BORDER_ALPHA);
    border.anti_alias = true;
    background.stroke_path(
        piece,
        &border,
        &Stroke {
            width: NOTCH_BORDER_WIDTH,
            ..Stroke::default()
        },
        Transform::identity(),
        None,
    );

    background
}

/// Paints the piece's pixel content onto a transparent canvas and crops the
/// result down to the axis the slider travels along.
///
/// The piece interior is pattern-filled from a clone of the source cropped at
/// the piece's top-left corner, so the tile stays visually connected to the
/// photo content under the notch. Horizontal directions trim the tile to the
/// piece's column, vertical ones to its row.
pub fn slider_tile(
    source: &Pixmap,
    piece: &tiny_skia::Path,
    piece_w: f32,
    piece_h: f32,
    direction: Direction,
    place_x: i32,
    place_y: i32,
) -> Result<Pixmap> {
    let (w, h) = (source.width(), source.height());

    let mut brush = source.clone();
    let mut bevel = Paint::default();
    bevel.set_color_rgba8(255, 255, 255, TILE_BEVEL_ALPHA);
    bevel.anti_alias = true;
    brush.stroke_path(
        piece,
        &bevel,
        &Stroke {
            width: TILE_BEVEL_WIDTH,
            ..Stroke::default()
        },
        Transform::identity(),
        None,
    );

    let brush = crop(
        &brush,
        place_x,
        place_y,
        w.saturating_sub(place_x.max(0) as u32),
        h.saturating_sub(place_y.max(0) as u32),
    )?;

    let mut tile = Pixmap::new(w, h).ok_or(Error::PixmapAlloc {
        width: w,
        height: h,
    })?;
    let mut paint = Paint::default();
    paint.anti_alias = true;
    paint.shader = Pattern::new(
        brush.as_ref(),
        SpreadMode::Pad,
        FilterQuality::Nearest,
        1.0,
        Transform::from_translate(place_x as f32, place_y as f32),
    );
    tile.fill_path(piece, &paint, FillRule::Winding, Transform::identity(), None);

    if direction.is_horizontal() {
        crop(&tile, place_x, 0, piece_w.ceil() as u32, h)
    } else {
        crop(&tile, 0, place_y, w, piece_h.ceil() as u32)
    }
}

pub fn encode_png(pixmap: &Pixmap) -> Result<Vec<u8>> {
    pixmap.encode_png().map_err(|_| Error::PngEncode)
}

fn crop(pixmap: &Pixmap, x: i32, y: i32, width: u32, height: u32) -> Result<Pixmap> {
    let oob = || Error::CropOutOfBounds {
        x,
        y,
        width,
        height,
    };
    if x < 0
        || y < 0
        || width == 0
        || height == 0
        || x as i64 + width as i64 > pixmap.width() as i64
        || y as i64 + height as i64 > pixmap.height() as i64
    {
        return Err(oob());
    }
    let rect = IntRect::from_xywh(x, y, width, height).ok_or_else(oob)?;
    pixmap.clone_rect(rect).ok_or_else(oob)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::point;
    use crate::outline::Outline;
    use crate::outline::OutlineBuilder;

    fn test_source(width: u32, height: u32) -> Pixmap {
        let img = image::RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 251) as u8, (y % 241) as u8, 90])
        });
        source_pixmap(&image::DynamicImage::ImageRgb8(img), width, height).unwrap()
    }

    fn square_piece(x: f32, y: f32, side: f32) -> Outline {
        OutlineBuilder::new(point(x, y))
            .line_to(point(x + side, y))
            .line_to(point(x + side, y + side))
            .line_to(point(x, y + side))
            .close()
    }

    #[test]
    fn source_pixmap_matches_the_requested_canvas() {
        let img = image::DynamicImage::ImageRgb8(image::RgbImage::from_fn(300, 200, |_, _| {
            image::Rgb([10, 20, 30])
        }));
        let pixmap = source_pixmap(&img, 280, 150).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (280, 150));
    }

    #[test]
    fn background_is_marked_only_inside_the_notch() {
        let source = test_source(280, 150);
        let piece = square_piece(60.0, 40.0, 44.0);
        let background = notched_background(&source, &piece.to_path().unwrap());

        assert_eq!(
            (background.width(), background.height()),
            (source.width(), source.height())
        );
        // Far corner untouched, piece center visibly whitened.
        assert_eq!(background.pixel(5, 5), source.pixel(5, 5));
        assert_ne!(background.pixel(82, 62), source.pixel(82, 62));
    }

    #[test]
    fn horizontal_tile_is_cropped_to_the_piece_column() {
        let source = test_source(280, 150);
        let piece = square_piece(60.0, 40.0, 44.5);
        let tile = slider_tile(
            &source,
            &piece.to_path().unwrap(),
            44.5,
            44.5,
            Direction::LeftToRight,
            60,
            40,
        )
        .unwrap();
        assert_eq!((tile.width(), tile.height()), (45, 150));
    }

    #[test]
    fn vertical_tile_is_cropped_to_the_piece_row() {
        let source = test_source(280, 150);
        let piece = square_piece(60.0, 40.0, 44.5);
        let tile = slider_tile(
            &source,
            &piece.to_path().unwrap(),
            44.5,
            44.5,
            Direction::TopToBottom,
            60,
            40,
        )
        .unwrap();
        assert_eq!((tile.width(), tile.height()), (280, 45));
    }

    #[test]
    fn tile_carries_source_pixels_inside_and_nothing_outside() {
        let source = test_source(280, 150);
        let piece = square_piece(60.0, 40.0, 44.0);
        let tile = slider_tile(
            &source,
            &piece.to_path().unwrap(),
            44.0,
            44.0,
            Direction::LeftToRight,
            60,
            40,
        )
        .unwrap();

        // Above the piece the tile is fully transparent.
        let above = tile.pixel(10, 10).unwrap();
        assert_eq!(above.alpha(), 0);

        // At the piece center (tile x = 82 - 60) the photo shows through.
        let center = tile.pixel(22, 62).unwrap();
        let expected = source.pixel(82, 62).unwrap();
        assert_eq!(
            (center.red(), center.green(), center.blue(), center.alpha()),
            (
                expected.red(),
                expected.green(),
                expected.blue(),
                expected.alpha()
            )
        );
    }

    #[test]
    fn out_of_canvas_crop_is_an_error() {
        let source = test_source(280, 150);
        let piece = square_piece(60.0, 40.0, 44.0);
        let err = slider_tile(
            &source,
            &piece.to_path().unwrap(),
            44.0,
            44.0,
            Direction::LeftToRight,
            -3,
            40,
        )
        .unwrap_err();
        assert!(matches!(err, Error::CropOutOfBounds { .. }));
    }

    #[test]
    fn png_encoding_round_trips() {
        let source = test_source(64, 48);
        let bytes = encode_png(&source).unwrap();
        assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"));
        let decoded = Pixmap::decode_png(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (64, 48));
    }
}
