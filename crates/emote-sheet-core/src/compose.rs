use image::{Rgba, RgbaImage, imageops};
use tracing::debug;

use crate::error::{Result, SheetError};
use crate::group::Bucket;

/// A member's slot on the finished sheet. `x` is always 0: sheets are a
/// single vertical column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub key: String,
    /// Vertical offset from the top of the sheet.
    pub y: u32,
    /// Final width/height after any downscale.
    pub w: u32,
    pub h: u32,
    /// Original image size before any downscale.
    pub source_size: (u32, u32),
    pub resized: bool,
    pub text: bool,
}

/// Geometry of one composed sheet.
#[derive(Debug, Clone)]
pub struct SheetLayout {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub raw: bool,
    pub placements: Vec<Placement>,
}

/// A composed sheet. `rgba` is `None` for raw sheets, where the caller copies
/// the source file through unchanged instead of re-encoding.
#[derive(Debug)]
pub struct SheetOutput {
    pub layout: SheetLayout,
    pub rgba: Option<RgbaImage>,
}

/// Width of a member downscaled to `max_height`, aspect ratio preserved.
pub fn scaled_width(w: u32, h: u32, max_height: u32) -> u32 {
    ((w as f64 * max_height as f64 / h as f64).round() as u32).max(1)
}

/// Composes one bucket into a sheet.
///
/// Raw mode (single member flagged `raw`): no pixels are produced, only the
/// layout with the source dimensions. Otherwise members taller than their
/// `max_height` are downscaled with Lanczos3, then everything is stacked top
/// to bottom on an opaque white canvas at x = 0, with each member's margin
/// separating it from the next.
pub fn compose_bucket(bucket: &Bucket) -> Result<SheetOutput> {
    if bucket.members.is_empty() {
        return Err(SheetError::Empty);
    }

    if bucket.members.len() == 1 && bucket.members[0].config.raw {
        let m = &bucket.members[0];
        let (w, h) = (m.image.width(), m.image.height());
        debug!(sheet = %bucket.name, w, h, "raw passthrough sheet");
        return Ok(SheetOutput {
            layout: SheetLayout {
                name: bucket.name.clone(),
                width: w,
                height: h,
                raw: true,
                placements: vec![Placement {
                    key: m.key.clone(),
                    y: 0,
                    w,
                    h,
                    source_size: (w, h),
                    resized: false,
                    text: m.config.text,
                }],
            },
            rgba: None,
        });
    }

    let mut frames: Vec<RgbaImage> = Vec::with_capacity(bucket.members.len());
    let mut placements: Vec<Placement> = Vec::with_capacity(bucket.members.len());
    let mut width = 0u32;
    let mut offset = 0u32;
    for m in &bucket.members {
        let (sw, sh) = (m.image.width(), m.image.height());
        let (frame, resized) = if sh > m.config.max_height {
            let nw = scaled_width(sw, sh, m.config.max_height);
            (
                imageops::resize(
                    &m.image.to_rgba8(),
                    nw,
                    m.config.max_height,
                    imageops::FilterType::Lanczos3,
                ),
                true,
            )
        } else {
            (m.image.to_rgba8(), false)
        };
        let (w, h) = frame.dimensions();
        placements.push(Placement {
            key: m.key.clone(),
            y: offset,
            w,
            h,
            source_size: (sw, sh),
            resized,
            text: m.config.text,
        });
        width = width.max(w);
        offset += h + m.config.margin;
        frames.push(frame);
    }

    // No margin trails the last member: the sheet ends at its bottom edge.
    let height = placements.last().map_or(0, |p| p.y + p.h);
    let mut canvas = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));
    for (frame, p) in frames.iter().zip(&placements) {
        imageops::replace(&mut canvas, frame, 0, i64::from(p.y));
    }
    debug!(
        sheet = %bucket.name,
        width,
        height,
        members = placements.len(),
        "composed sheet"
    );
    Ok(SheetOutput {
        layout: SheetLayout {
            name: bucket.name.clone(),
            width,
            height,
            raw: false,
            placements,
        },
        rgba: Some(canvas),
    })
}
