// RGB <-> Y/Pb/Pr per-pixel colour transform (Module C).

use bytemuck::Zeroable;

use crate::raster::Raster;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rgb {
  pub red: u16,
  pub green: u16,
  pub blue: u16,
}

unsafe impl Zeroable for Rgb {}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vc {
  pub y: f32,
  pub pb: f32,
  pub pr: f32,
}

unsafe impl Zeroable for Vc {}

fn truncate_toward_zero(value: f32) -> i64 {
  value as i64
}

/// Convert a single RGB pixel to Y/Pb/Pr, normalizing by `maxval`.
pub fn rgb_to_vc_pixel(p: Rgb, maxval: u16) -> Vc {
  let denom = maxval as f32;
  let r = p.red as f32 / denom;
  let g = p.green as f32 / denom;
  let b = p.blue as f32 / denom;

  Vc {
    y: 0.299 * r + 0.587 * g + 0.114 * b,
    pb: -0.168736 * r - 0.331264 * g + 0.5 * b,
    pr: 0.5 * r - 0.418688 * g - 0.081312 * b,
  }
}

/// Convert a single Y/Pb/Pr pixel back to RGB, scaling by `denom`
/// (`255` at decompression, per spec.md's open question on `maxval`
/// non-preservation). Output channels are not clamped here; the PPM
/// writer saturates them into `[0, denom]`.
pub fn vc_to_rgb_pixel(p: Vc, denom: u16) -> (i64, i64, i64) {
  let d = denom as f32;
  let red = truncate_toward_zero(d * (p.y + 1.402 * p.pr));
  let green = truncate_toward_zero(d * (p.y - 0.344136 * p.pb - 0.714136 * p.pr));
  let blue = truncate_toward_zero(d * (p.y + 1.772 * p.pb));
  (red, green, blue)
}

/// Convert a full RGB raster to VC, consuming the input.
pub fn rgb_to_vc(rgb: &Raster<Rgb>, maxval: u16) -> Raster<Vc> {
  Raster::new_with(rgb.rows(), rgb.cols(), |row, col| rgb_to_vc_pixel(rgb[row][col], maxval))
}

/// Convert a full VC raster back to RGB, saturating channels into `[0, denom]`.
pub fn vc_to_rgb(vc: &Raster<Vc>, denom: u16) -> Raster<Rgb> {
  Raster::new_with(vc.rows(), vc.cols(), |row, col| {
    let (r, g, b) = vc_to_rgb_pixel(vc[row][col], denom);
    let clamp = |v: i64| v.clamp(0, denom as i64) as u16;
    Rgb {
      red: clamp(r),
      green: clamp(g),
      blue: clamp(b),
    }
  })
}
