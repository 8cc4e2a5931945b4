use puzzlet::{Direction, Error, GenerateOptions, generate, generate_assets_with_rng};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tiny_skia::Pixmap;

fn photo(width: u32, height: u32) -> image::DynamicImage {
    image::DynamicImage::ImageRgb8(image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x * 7 % 256) as u8, (y * 5 % 256) as u8, ((x + y) % 256) as u8])
    }))
}

const ALL_DIRECTIONS: [Direction; 4] = [
    Direction::LeftToRight,
    Direction::RightToLeft,
    Direction::TopToBottom,
    Direction::BottomToTop,
];

#[test]
fn outputs_are_always_canvas_sized() {
    let source = photo(640, 480);
    for seed in 0..20u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let assets = generate_assets_with_rng(
            &source,
            Direction::LeftToRight,
            280,
            150,
            &GenerateOptions::default(),
            &mut rng,
        )
        .unwrap();

        let background = Pixmap::decode_png(&assets.background_png).unwrap();
        assert_eq!((background.width(), background.height()), (280, 150));

        let slider = Pixmap::decode_png(&assets.slider_png).unwrap();
        assert_eq!(slider.height(), 150);
        assert!(slider.width() < 280, "slider width {}", slider.width());
    }
}

#[test]
fn every_direction_produces_a_consistent_offset() {
    let source = photo(500, 500);
    let options = GenerateOptions {
        drift: true,
        rotate: false,
    };
    for direction in ALL_DIRECTIONS {
        for seed in 0..10u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let assets =
                generate_assets_with_rng(&source, direction, 400, 400, &options, &mut rng)
                    .unwrap();
            let offset = assets.slide_offset.unwrap();
            assert!(offset >= 0, "{direction:?} seed {seed}: offset {offset}");
            assert!(offset <= 400, "{direction:?} seed {seed}: offset {offset}");

            let slider = Pixmap::decode_png(&assets.slider_png).unwrap();
            match direction {
                Direction::LeftToRight | Direction::RightToLeft => {
                    assert_eq!(slider.height(), 400);
                    assert!(slider.width() <= 400);
                }
                Direction::TopToBottom | Direction::BottomToTop => {
                    assert_eq!(slider.width(), 400);
                    assert!(slider.height() <= 400);
                }
            }
        }
    }
}

#[test]
fn same_seed_and_source_reproduce_the_same_challenge() {
    let source = photo(640, 480);
    let run = |seed: u64| {
        let mut rng = StdRng::seed_from_u64(seed);
        generate_assets_with_rng(
            &source,
            Direction::LeftToRight,
            280,
            150,
            &GenerateOptions::default(),
            &mut rng,
        )
        .unwrap()
    };

    let a = run(11);
    let b = run(11);
    assert_eq!(a.slide_offset, b.slide_offset);
    assert_eq!(a.background_png, b.background_png);
    assert_eq!(a.slider_png, b.slider_png);

    let c = run(12);
    // A different seed reshapes or moves the notch.
    assert_ne!(a.background_png, c.background_png);
}

#[test]
fn challenge_payloads_decode_back_to_pngs() {
    let source = photo(640, 480);
    let mut rng = StdRng::seed_from_u64(4);
    let challenge = puzzlet::generate_with_rng(
        &source,
        Direction::LeftToRight,
        280,
        150,
        &GenerateOptions::default(),
        &mut rng,
    )
    .unwrap();

    assert!(!challenge.is_sentinel());
    let png = puzzlet::model::decode_data_uri(&challenge.background).unwrap();
    let background = Pixmap::decode_png(&png).unwrap();
    assert_eq!((background.width(), background.height()), (280, 150));
}

#[test]
fn undersized_canvas_yields_the_sentinel() {
    let source = photo(64, 64);
    let challenge = generate(
        &source,
        Direction::LeftToRight,
        10,
        10,
        &GenerateOptions::default(),
    );
    assert!(challenge.is_sentinel());
    assert!(challenge.background.is_empty());
    assert!(challenge.slider.is_empty());
    assert_eq!(challenge.slide_offset, None);
}

#[test]
fn undersized_canvas_reports_its_cause_through_the_fallible_api() {
    let source = photo(64, 64);
    let mut rng = StdRng::seed_from_u64(0);
    let err = puzzlet::generate_with_rng(
        &source,
        Direction::LeftToRight,
        10,
        10,
        &GenerateOptions::default(),
        &mut rng,
    )
    .unwrap_err();
    assert!(matches!(err, Error::CanvasTooSmall { min_length: 10 }));
}
