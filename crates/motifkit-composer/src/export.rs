//! PNG export of the composition.
//!
//! Renders the surface into an RGBA buffer at a supersampling
//! multiplier and encodes it as PNG. Placement uses inverse mapping
//! with nearest sampling, which handles scale, horizontal flip and
//! rotation uniformly. Objects whose pixels were never loaded in this
//! session (e.g. restored from a foreign session state) are skipped
//! with a warning rather than failing the whole export.

use std::io::Cursor;

use image::{DynamicImage, Rgba, RgbaImage};
use motifkit_core::constants::{CANVAS_HEIGHT, CANVAS_WIDTH, EXPORT_MULTIPLIER};
use motifkit_core::{ComposerError, Result};
use tracing::warn;

use crate::fetcher::PixelCache;
use crate::object::SceneObject;
use crate::surface::Surface;

/// Renders the surface and encodes it as a PNG at the fixed export
/// multiplier.
pub fn export_png(surface: &Surface, cache: &PixelCache) -> Result<Vec<u8>> {
    let rendered = render(surface, cache, EXPORT_MULTIPLIER);
    let mut buf = Vec::new();
    DynamicImage::ImageRgba8(rendered)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| ComposerError::Export {
            reason: e.to_string(),
        })?;
    Ok(buf)
}

/// Renders the surface into an RGBA buffer at the given multiplier.
pub fn render(surface: &Surface, cache: &PixelCache, multiplier: u32) -> RgbaImage {
    let m = multiplier.max(1) as f64;
    let width = (CANVAS_WIDTH * m) as u32;
    let height = (CANVAS_HEIGHT * m) as u32;
    let mut out = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));

    if let Some(bg) = surface.background() {
        match cache.get(&bg.source_key) {
            Some(pixels) => draw_sprite(
                &mut out,
                &pixels.to_rgba8(),
                CANVAS_WIDTH / 2.0 * m,
                CANVAS_HEIGHT / 2.0 * m,
                bg.scale_x * m,
                bg.scale_y * m,
                0.0,
                false,
            ),
            None => warn!(source = %bg.source_key, "background pixels not cached, skipping"),
        }
    }

    for obj in surface.iter() {
        let Some(pixels) = cache.get(obj.source()) else {
            warn!(source = %obj.source(), id = obj.id, "object pixels not cached, skipping");
            continue;
        };
        let t = obj.transform();
        draw_sprite(
            &mut out,
            &pixels.to_rgba8(),
            t.left * m,
            t.top * m,
            t.scale_x * m,
            t.scale_y * m,
            t.angle,
            t.flip_x,
        );
    }

    out
}

/// Draws `src` centered at (`cx`, `cy`) with the given scales, rotation
/// in degrees and optional horizontal flip, alpha-blending over `out`.
#[allow(clippy::too_many_arguments)]
fn draw_sprite(
    out: &mut RgbaImage,
    src: &RgbaImage,
    cx: f64,
    cy: f64,
    sx: f64,
    sy: f64,
    angle_deg: f64,
    flip_x: bool,
) {
    if sx <= 0.0 || sy <= 0.0 || src.width() == 0 || src.height() == 0 {
        return;
    }
    let nat_w = src.width() as f64;
    let nat_h = src.height() as f64;
    let half_w = nat_w * sx / 2.0;
    let half_h = nat_h * sy / 2.0;
    let theta = angle_deg.to_radians();
    let (sin, cos) = theta.sin_cos();

    // Axis-aligned bounds of the rotated sprite
    let ext_x = half_w * cos.abs() + half_h * sin.abs();
    let ext_y = half_w * sin.abs() + half_h * cos.abs();
    let x0 = ((cx - ext_x).floor().max(0.0)) as u32;
    let y0 = ((cy - ext_y).floor().max(0.0)) as u32;
    let x1 = ((cx + ext_x).ceil().min(out.width() as f64)) as u32;
    let y1 = ((cy + ext_y).ceil().min(out.height() as f64)) as u32;

    for py in y0..y1 {
        for px in x0..x1 {
            let dx = px as f64 + 0.5 - cx;
            let dy = py as f64 + 0.5 - cy;
            // Inverse rotation back into sprite space
            let rx = dx * cos + dy * sin;
            let ry = -dx * sin + dy * cos;
            let mut u = rx / sx + nat_w / 2.0;
            let v = ry / sy + nat_h / 2.0;
            if flip_x {
                u = nat_w - u;
            }
            if u < 0.0 || u >= nat_w || v < 0.0 || v >= nat_h {
                continue;
            }
            let pixel = *src.get_pixel(u as u32, v as u32);
            blend(out.get_pixel_mut(px, py), pixel);
        }
    }
}

/// Source-over alpha blend.
fn blend(dst: &mut Rgba<u8>, src: Rgba<u8>) {
    let sa = src.0[3] as u32;
    if sa == 0 {
        return;
    }
    if sa == 255 {
        *dst = src;
        return;
    }
    let da = dst.0[3] as u32;
    let inv = 255 - sa;
    let out_a = sa + da * inv / 255;
    for c in 0..3 {
        let s = src.0[c] as u32;
        let d = dst.0[c] as u32;
        dst.0[c] = ((s * sa + d * inv) / 255) as u8;
    }
    dst.0[3] = out_a as u8;
}
