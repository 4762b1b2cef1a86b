//! File round-trips through the container boundary, on real scratch files.

use std::path::PathBuf;

use rasterbuf::{CropRect, Pixel, PixelBuffer, PixelFormat, RasterError};

fn tmp_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_TARGET_TMPDIR"));
    path.push(name);
    path
}

fn numbered_rgb(width: u32, height: u32) -> PixelBuffer {
    let mut buf = PixelBuffer::new(width, height, PixelFormat::Rgb8).unwrap();
    for y in 0..height {
        for x in 0..width {
            let base = (y * width + x) as u8;
            buf.set_pixel_at(x, y, Pixel::rgb8(base, base * 3, 255 - base))
                .unwrap();
        }
    }
    buf
}

#[test]
fn png_round_trip_preserves_rgb_pixels() {
    let original = numbered_rgb(5, 4);
    let path = tmp_path("roundtrip_rgb.png");
    let written = original.save(&path).unwrap();
    assert_eq!(written, path);

    let loaded = PixelBuffer::load(&path).unwrap();
    assert_eq!(loaded, original);
}

#[test]
fn png_round_trip_keeps_alpha() {
    let mut original = PixelBuffer::new(4, 1, PixelFormat::Rgba8).unwrap();
    for x in 0..4 {
        let v = x as u8 * 40;
        original
            .set_pixel_at(x, 0, Pixel::rgba8(v, 255 - v, 7, 20 + v))
            .unwrap();
    }
    let path = tmp_path("roundtrip_rgba.png");
    original.save(&path).unwrap();

    let loaded = PixelBuffer::load(&path).unwrap();
    assert_eq!(loaded, original);
}

#[test]
fn png_round_trip_preserves_grayscale() {
    let grey = PixelBuffer::filled(3, 3, Pixel::grey8(77)).unwrap();
    let path = tmp_path("roundtrip_grey.png");
    grey.save(&path).unwrap();
    assert_eq!(PixelBuffer::load(&path).unwrap(), grey);

    let grey_alpha = PixelBuffer::filled(2, 2, Pixel::grey_alpha8(42, 128)).unwrap();
    let path = tmp_path("roundtrip_grey_alpha.png");
    grey_alpha.save(&path).unwrap();
    assert_eq!(PixelBuffer::load(&path).unwrap(), grey_alpha);
}

#[test]
fn bgr_storage_round_trips_as_rgb() {
    let original = PixelBuffer::filled(2, 1, Pixel::bgra8(10, 20, 30, 40)).unwrap();
    let path = tmp_path("roundtrip_bgra.png");
    original.save(&path).unwrap();

    // Decoders never produce the BGR-ordered formats; the logical channel
    // values survive under Rgba8.
    let loaded = PixelBuffer::load(&path).unwrap();
    assert_eq!(loaded.format(), PixelFormat::Rgba8);
    let pixel = loaded.pixel_at(0, 0).unwrap();
    assert_eq!(pixel.red(), Some(10));
    assert_eq!(pixel.green(), Some(20));
    assert_eq!(pixel.blue(), Some(30));
    assert_eq!(pixel.alpha(), Some(40));
}

#[test]
fn bmp_round_trip_preserves_rgb_pixels() {
    let original = numbered_rgb(4, 4);
    let path = tmp_path("roundtrip.bmp");
    original.save(&path).unwrap();
    assert_eq!(PixelBuffer::load(&path).unwrap(), original);
}

#[test]
fn tga_round_trip_preserves_grayscale() {
    let original = PixelBuffer::filled(6, 2, Pixel::grey8(200)).unwrap();
    let path = tmp_path("roundtrip.tga");
    original.save(&path).unwrap();
    assert_eq!(PixelBuffer::load(&path).unwrap(), original);
}

#[test]
fn jpeg_write_is_near_lossless_on_flat_color() {
    let original = PixelBuffer::filled(16, 16, Pixel::rgb8(90, 120, 180)).unwrap();
    let path = tmp_path("quality.jpeg");
    original.save(&path).unwrap();

    let loaded = PixelBuffer::load(&path).unwrap();
    assert_eq!((loaded.width(), loaded.height()), (16, 16));
    assert_eq!(loaded.format(), PixelFormat::Rgb8);
    for index in 0..loaded.pixel_count() {
        let pixel = loaded.pixel_at_index(index).unwrap();
        assert!(pixel.red().unwrap().abs_diff(90) <= 3);
        assert!(pixel.green().unwrap().abs_diff(120) <= 3);
        assert!(pixel.blue().unwrap().abs_diff(180) <= 3);
    }
}

#[test]
fn unknown_extension_falls_back_to_png() {
    let original = numbered_rgb(3, 3);
    let requested = tmp_path("fallback.webp");
    let written = original.save(&requested).unwrap();

    assert_eq!(written, tmp_path("fallback.png"));
    assert!(!requested.exists());
    assert_eq!(PixelBuffer::load(&written).unwrap(), original);
}

#[test]
fn strict_save_writes_nothing_for_unknown_extensions() {
    let original = numbered_rgb(3, 3);
    let requested = tmp_path("strict.webp");
    let err = original.save_strict(&requested).unwrap_err();
    assert_eq!(
        err,
        RasterError::UnsupportedContainerFormat {
            extension: "webp".into(),
        }
    );
    assert!(!requested.exists());
    assert!(!tmp_path("strict.png").exists());
}

#[test]
fn load_does_not_need_an_extension() {
    let original = numbered_rgb(4, 2);
    let source = tmp_path("sniffed_src.png");
    original.save(&source).unwrap();

    let bare = tmp_path("sniffed_payload");
    std::fs::copy(&source, &bare).unwrap();
    assert_eq!(PixelBuffer::load(&bare).unwrap(), original);
}

#[test]
fn missing_files_fail_to_decode() {
    let err = PixelBuffer::load(tmp_path("never_written.png")).unwrap_err();
    assert!(matches!(err, RasterError::DecodeFailure { .. }));
}

#[test]
fn pad_then_crop_scenario() {
    let black = Pixel::rgb8(0, 0, 0);
    let red = Pixel::rgb8(255, 0, 0);
    let path = tmp_path("scenario.png");
    PixelBuffer::filled(4, 4, black).unwrap().save(&path).unwrap();

    let mut buf = PixelBuffer::load(&path).unwrap();
    let original = buf.clone();
    buf.pad_border_equal(1, red).unwrap();
    assert_eq!((buf.width(), buf.height()), (6, 6));
    for i in 0..6 {
        assert_eq!(buf.pixel_at(i, 0).unwrap(), red);
        assert_eq!(buf.pixel_at(i, 5).unwrap(), red);
        assert_eq!(buf.pixel_at(0, i).unwrap(), red);
        assert_eq!(buf.pixel_at(5, i).unwrap(), red);
    }
    for y in 1..5 {
        for x in 1..5 {
            assert_eq!(buf.pixel_at(x, y).unwrap(), black);
        }
    }

    buf.crop(CropRect::new(2, 2, 6, 6)).unwrap();
    assert_eq!(buf, original);
}
