// Diff tool (Module H): RMS pixel difference between two RGB rasters
// of near-equal size. Grounded on ppmdiff.c's `compare_image`/`find_E`.

use crate::error::{CodecError, Result};
use crate::ppm::Ppm;

/// Root-mean-square channel difference between two images, per
/// spec.md §4.7. Returns an error if either dimension differs by more
/// than 1 — the caller is responsible for printing `1.0` and exiting
/// nonzero in that case, matching `ppmdiff.c`'s behaviour.
pub fn rms_diff(a: &Ppm, b: &Ppm) -> Result<f64> {
  if (a.width as i64 - b.width as i64).abs() > 1 || (a.height as i64 - b.height as i64).abs() > 1 {
    return Err(CodecError::InvalidPpm("image size differs by more than 1".into()));
  }

  let width = a.width.min(b.width);
  let height = a.height.min(b.height);

  let mut sum_sq: i64 = 0;
  for row in 0..height {
    for col in 0..width {
      let p1 = a.pixels[row][col];
      let p2 = b.pixels[row][col];
      let dr = p1.red as i64 - p2.red as i64;
      let dg = p1.green as i64 - p2.green as i64;
      let db = p1.blue as i64 - p2.blue as i64;
      sum_sq += dr * dr + dg * dg + db * db;
    }
  }

  let denom = 3.0 * width as f64 * height as f64 * a.maxval as f64 * b.maxval as f64;
  Ok((sum_sq as f64 / denom).sqrt())
}
