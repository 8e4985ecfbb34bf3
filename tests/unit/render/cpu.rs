use std::io::Cursor;

use super::*;
use crate::{
    assets::{
        fonts::FontSet,
        text::{ParleyShaper, TextShaper},
    },
    composition::model::TextSpec,
    form::photo::{ImageUpload, ProfileImage},
    template::descriptor::FontKind,
};

fn plan(width: f64, height: f64, ops: Vec<DrawOp>) -> RenderPlan {
    RenderPlan {
        width,
        height,
        background: Rgba8::WHITE,
        ops,
    }
}

fn pixel(frame: &FrameRGBA, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * frame.width + x) * 4) as usize;
    [
        frame.data[i],
        frame.data[i + 1],
        frame.data[i + 2],
        frame.data[i + 3],
    ]
}

fn png_photo(color: [u8; 4]) -> ProfileImage {
    let img = image::RgbaImage::from_pixel(8, 8, image::Rgba(color));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    ProfileImage::from_upload(&ImageUpload::new("image/png", buf)).unwrap()
}

#[test]
fn frame_is_scaled_and_background_filled() {
    let red = Rgba8::hex(0xff0000);
    let p = plan(
        10.0,
        5.0,
        vec![DrawOp::FillRect {
            rect: Rect::new(0.0, 0.0, 5.0, 5.0),
            radius: 0.0,
            color: red,
        }],
    );
    let frame = CpuBackend::new(RenderSettings::default())
        .render_plan(&p)
        .unwrap();
    assert_eq!((frame.width, frame.height), (20, 10));
    assert!(frame.premultiplied);
    assert_eq!(pixel(&frame, 2, 2), [255, 0, 0, 255]);
    assert_eq!(pixel(&frame, 15, 5), [255, 255, 255, 255]);
}

#[test]
fn photo_is_drawn_at_device_resolution() {
    let p = plan(
        40.0,
        40.0,
        vec![DrawOp::Image {
            rect: Rect::new(10.0, 10.0, 30.0, 30.0),
            source: png_photo([0, 0, 255, 255]),
        }],
    );
    let frame = CpuBackend::new(RenderSettings::default())
        .render_plan(&p)
        .unwrap();
    let center = pixel(&frame, 40, 40);
    assert!(center[2] > 200 && center[0] < 50, "{center:?}");
    // Corner of the photo square lies outside the circle.
    assert_eq!(pixel(&frame, 21, 21), [255, 255, 255, 255]);
}

#[test]
fn svg_photo_is_drawn() {
    let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"><rect width="10" height="10" fill="#00ff00"/></svg>"##;
    let source = ProfileImage::from_upload(&ImageUpload::new("image/svg+xml", svg.to_vec())).unwrap();
    let p = plan(
        40.0,
        40.0,
        vec![DrawOp::Image {
            rect: Rect::new(10.0, 10.0, 30.0, 30.0),
            source,
        }],
    );
    let frame = CpuBackend::new(RenderSettings::default())
        .render_plan(&p)
        .unwrap();
    let center = pixel(&frame, 40, 40);
    assert!(center[1] > 200 && center[0] < 50 && center[2] < 50, "{center:?}");
    assert_eq!(pixel(&frame, 21, 21), [255, 255, 255, 255]);
}

#[test]
fn glyphs_land_inside_their_text_box_with_local_fonts_if_present() {
    let Ok(fonts) = FontSet::discover(&[]) else {
        return;
    };
    let mut shaper = ParleyShaper::new(fonts);
    let spec = TextSpec::plain("Jean Dupont", FontKind::Sans, 20.0, Rgba8::rgb(0, 0, 0));
    let shaped = shaper.shape(&spec, None).unwrap();
    assert!(!shaped.runs.is_empty());

    let origin = Point::new(10.0, 10.0);
    let ops = shaped
        .runs
        .iter()
        .map(|run| DrawOp::Glyphs {
            run: run.clone(),
            origin,
        })
        .collect();
    let p = plan(shaped.width + 20.0, shaped.height + 20.0, ops);
    let frame = CpuBackend::new(RenderSettings::default())
        .render_plan(&p)
        .unwrap();

    // One logical pixel of slack around the box for antialiasing.
    let (x0, y0) = (origin.x - 1.0, origin.y - 1.0);
    let (x1, y1) = (origin.x + shaped.width + 1.0, origin.y + shaped.height + 1.0);
    let (mut inside, mut outside) = (0usize, 0usize);
    for y in 0..frame.height {
        for x in 0..frame.width {
            if pixel(&frame, x, y)[0] >= 128 {
                continue;
            }
            let (lx, ly) = (f64::from(x) / 2.0, f64::from(y) / 2.0);
            if lx >= x0 && lx <= x1 && ly >= y0 && ly <= y1 {
                inside += 1;
            } else {
                outside += 1;
            }
        }
    }
    assert!(inside > 100, "{inside}");
    assert_eq!(outside, 0);
}

#[test]
fn undecodable_photo_is_an_error() {
    let bogus = ProfileImage::from_upload(&ImageUpload::new("image/png", vec![1, 2, 3])).unwrap();
    let p = plan(
        10.0,
        10.0,
        vec![DrawOp::Image {
            rect: Rect::new(0.0, 0.0, 10.0, 10.0),
            source: bogus,
        }],
    );
    assert!(CpuBackend::new(RenderSettings::default()).render_plan(&p).is_err());
}

#[test]
fn empty_or_oversized_pages_are_rejected() {
    let mut backend = CpuBackend::new(RenderSettings::default());
    assert!(matches!(
        backend.render_plan(&plan(10.0, 0.0, Vec::new())),
        Err(CvError::Render(_))
    ));
    assert!(matches!(
        backend.render_plan(&plan(10.0, f64::INFINITY, Vec::new())),
        Err(CvError::Render(_))
    ));
}

#[test]
fn very_tall_pages_are_rendered_at_a_reduced_scale() {
    let red = Rgba8::hex(0xff0000);
    let p = plan(
        10.0,
        40_000.0,
        vec![DrawOp::FillRect {
            rect: Rect::new(0.0, 39_990.0, 10.0, 40_000.0),
            radius: 0.0,
            color: red,
        }],
    );
    let frame = CpuBackend::new(RenderSettings::default())
        .render_plan(&p)
        .unwrap();
    assert!(frame.height <= u32::from(u16::MAX) && frame.height > 60_000);
    assert_eq!(frame.width, 17);
    assert_eq!(pixel(&frame, 8, frame.height - 2), [255, 0, 0, 255]);
}

#[test]
fn fit_scale_keeps_pages_that_already_fit() {
    assert_eq!(fit_scale(&plan(672.0, 1200.0, Vec::new()), 2.0), 2.0);
    let s = fit_scale(&plan(672.0, 40_000.0, Vec::new()), 2.0);
    assert!(s < 2.0 && 40_000.0 * s <= f64::from(u16::MAX));
}

#[test]
fn device_extent_rounds_up() {
    assert_eq!(device_extent(10.2, 2.0, "width").unwrap(), 21);
}
