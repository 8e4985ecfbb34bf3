use anyhow::Context;
use lopdf::{
    Dictionary, Document, Object, Stream,
    content::{Content, Operation},
    dictionary,
};

use crate::{
    foundation::core::mm_to_pt,
    foundation::error::{CvError, CvResult},
    render::backend::FrameRGBA,
};

/// ISO A4 page width.
pub const A4_WIDTH_MM: f64 = 210.0;

/// Portrait page size in millimetres.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageGeometry {
    pub width_mm: f64,
    pub height_mm: f64,
}

impl PageGeometry {
    /// Page of `width_mm` whose height keeps the bitmap's aspect ratio.
    pub fn fit(px_width: u32, px_height: u32, width_mm: f64) -> CvResult<Self> {
        if px_width == 0 || px_height == 0 {
            return Err(CvError::render(format!(
                "cannot place a {px_width}x{px_height} bitmap on a page"
            )));
        }
        if !width_mm.is_finite() || width_mm <= 0.0 {
            return Err(CvError::validation("page width must be finite and > 0"));
        }
        Ok(Self {
            width_mm,
            height_mm: width_mm * f64::from(px_height) / f64::from(px_width),
        })
    }

    pub fn width_pt(&self) -> f64 {
        mm_to_pt(self.width_mm)
    }

    pub fn height_pt(&self) -> f64 {
        mm_to_pt(self.height_mm)
    }
}

/// Build a one-page PDF whose only content is `frame`, stretched over the whole page.
pub fn assemble_pdf(frame: &FrameRGBA, page: &PageGeometry) -> CvResult<Vec<u8>> {
    let expected = frame.width as usize * frame.height as usize * 4;
    if frame.data.len() != expected {
        return Err(CvError::export(format!(
            "frame has {} bytes, expected {expected}",
            frame.data.len()
        )));
    }
    let w = page.width_pt() as f32;
    let h = page.height_pt() as f32;

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(frame.width),
            "Height" => i64::from(frame.height),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        },
        flatten_over_white(frame),
    ));

    // Image space is the unit square; scale it to the page, origin at the bottom-left.
    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    w.into(),
                    0.0f32.into(),
                    0.0f32.into(),
                    h.into(),
                    0.0f32.into(),
                    0.0f32.into(),
                ],
            ),
            Operation::new("Do", vec!["Im0".into()]),
            Operation::new("Q", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(
        Dictionary::new(),
        content.encode().context("encode page content")?,
    ));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.0f32.into(), 0.0f32.into(), w.into(), h.into()],
        "Resources" => dictionary! {
            "XObject" => dictionary! { "Im0" => image_id },
        },
        "Contents" => content_id,
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Producer" => Object::string_literal("cvpress"),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);
    doc.compress();

    let mut out = Vec::new();
    doc.save_to(&mut out).context("serialize pdf")?;
    Ok(out)
}

/// Composite pixels over opaque white and drop alpha.
fn flatten_over_white(frame: &FrameRGBA) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(frame.data.len() / 4 * 3);
    for px in frame.data.chunks_exact(4) {
        let a = u16::from(px[3]);
        for &c in &px[..3] {
            let c = u16::from(c);
            let premul = if frame.premultiplied {
                c
            } else {
                (c * a + 127) / 255
            };
            rgb.push((premul + (255 - a)).min(255) as u8);
        }
    }
    rgb
}

#[cfg(test)]
#[path = "../../tests/unit/export/pdf.rs"]
mod tests;
