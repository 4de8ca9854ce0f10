// 2x2 block aggregation (Module D): forward/inverse 4-point Hadamard-like
// DCT on the block's four luma samples, chroma averaging/subsampling,
// and quantization into the fixed-width fields packed by Module E.
//
// Grounded on tinyavif's txfm.rs stage structure (forward/inverse
// transform as explicit named stages) and recon.rs's quantize/dequantize,
// narrowed from the 8-point DCT and qindex tables AV1 uses down to this
// format's 2x2, fixed-scalar quantization.

use crate::chroma::{chroma_of_index, index_of_chroma};
use crate::color::Vc;
use crate::raster::Raster;

/// The six quantized fields carried by one codeword.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QuantizedBlock {
  pub a: u16,
  pub b: i8,
  pub c: i8,
  pub d: i8,
  pub pb_idx: u8,
  pub pr_idx: u8,
}

unsafe impl bytemuck::Zeroable for QuantizedBlock {}

fn floor_to_i64(v: f32) -> i64 {
  v.floor() as i64
}

/// Forward 4-point transform over one block's luma samples, labelled
/// Y1 (top-left), Y2 (top-right), Y3 (bottom-left), Y4 (bottom-right).
pub fn fwd_dct4(y1: f32, y2: f32, y3: f32, y4: f32) -> (f32, f32, f32, f32) {
  let a = (y4 + y3 + y2 + y1) / 4.0;
  let b = (y4 + y3 - y2 - y1) / 4.0;
  let c = (y4 - y3 + y2 - y1) / 4.0;
  let d = (y4 - y3 - y2 + y1) / 4.0;
  (a, b, c, d)
}

/// Inverse 4-point transform, recovering (Y1, Y2, Y3, Y4) from dequantized
/// coefficients.
pub fn inv_dct4(a: f32, b: f32, c: f32, d: f32) -> (f32, f32, f32, f32) {
  let y1 = a - b - c + d;
  let y2 = a - b + c - d;
  let y3 = a + b - c - d;
  let y4 = a + b + c + d;
  (y1, y2, y3, y4)
}

/// Quantize `a` (assumed in `[0, 1]`) into a 9-bit unsigned field.
/// Clamped to `[0, 1]` first, since float rounding can push it just
/// past 1.0 and overflow the field otherwise.
pub fn quantize_a(a: f32) -> u16 {
  floor_to_i64(a.clamp(0.0, 1.0) * 511.0) as u16
}

pub fn dequantize_a(a_q: u16) -> f32 {
  a_q as f32 / 511.0
}

/// Quantize a `b`/`c`/`d` coefficient: clamp to `[-0.3, 0.3]`, then scale
/// by 50 and floor. The clamp is essential: unclamped coefficients from
/// high-contrast blocks would overflow the 5-bit signed field.
pub fn quantize_bcd(x: f32) -> i8 {
  let clamped = x.clamp(-0.3, 0.3);
  floor_to_i64(clamped * 50.0) as i8
}

pub fn dequantize_bcd(x_q: i8) -> f32 {
  x_q as f32 / 50.0
}

/// Transform a single VC 2x2 block (given as Y1..Y4, Pb/Pr averages
/// over the block) into its quantized form.
pub fn quantize_block(y1: f32, y2: f32, y3: f32, y4: f32, pb: f32, pr: f32) -> QuantizedBlock {
  let (a, b, c, d) = fwd_dct4(y1, y2, y3, y4);
  QuantizedBlock {
    a: quantize_a(a),
    b: quantize_bcd(b),
    c: quantize_bcd(c),
    d: quantize_bcd(d),
    pb_idx: index_of_chroma(pb),
    pr_idx: index_of_chroma(pr),
  }
}

/// Inverse of [`quantize_block`]: returns (Y1, Y2, Y3, Y4, Pb, Pr), with
/// Pb/Pr shared across all four pixels of the reconstructed block.
pub fn dequantize_block(q: QuantizedBlock) -> (f32, f32, f32, f32, f32, f32) {
  let a = dequantize_a(q.a);
  let b = dequantize_bcd(q.b);
  let c = dequantize_bcd(q.c);
  let d = dequantize_bcd(q.d);
  let (y1, y2, y3, y4) = inv_dct4(a, b, c, d);
  (y1, y2, y3, y4, chroma_of_index(q.pb_idx), chroma_of_index(q.pr_idx))
}

/// Aggregate a full VC raster (even width/height) into a `W/2 x H/2`
/// raster of quantized blocks.
pub fn blockify(vc: &Raster<Vc>) -> Raster<QuantizedBlock> {
  assert!(vc.rows() % 2 == 0 && vc.cols() % 2 == 0);
  let block_rows = vc.rows() / 2;
  let block_cols = vc.cols() / 2;

  Raster::new_with(block_rows, block_cols, |br, bc| {
    let row0 = 2 * br;
    let col0 = 2 * bc;
    let p1 = vc[row0][col0];
    let p2 = vc[row0][col0 + 1];
    let p3 = vc[row0 + 1][col0];
    let p4 = vc[row0 + 1][col0 + 1];

    let pb = (p1.pb + p2.pb + p3.pb + p4.pb) / 4.0;
    let pr = (p1.pr + p2.pr + p3.pr + p4.pr) / 4.0;

    quantize_block(p1.y, p2.y, p3.y, p4.y, pb, pr)
  })
}

/// Inverse of [`blockify`]: expand a `W/2 x H/2` quantized-block raster
/// back into a `W x H` VC raster.
pub fn unblockify(blocks: &Raster<QuantizedBlock>) -> Raster<Vc> {
  let rows = blocks.rows() * 2;
  let cols = blocks.cols() * 2;

  let mut out = Raster::zeroed(rows, cols);
  for br in 0..blocks.rows() {
    for bc in 0..blocks.cols() {
      let (y1, y2, y3, y4, pb, pr) = dequantize_block(blocks[br][bc]);
      let row0 = 2 * br;
      let col0 = 2 * bc;
      out[row0][col0] = Vc { y: y1, pb, pr };
      out[row0][col0 + 1] = Vc { y: y2, pb, pr };
      out[row0 + 1][col0] = Vc { y: y3, pb, pr };
      out[row0 + 1][col0 + 1] = Vc { y: y4, pb, pr };
    }
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn dct_is_invertible_in_exact_arithmetic() {
    let (a, b, c, d) = fwd_dct4(0.1, 0.4, 0.6, 0.9);
    let (y1, y2, y3, y4) = inv_dct4(a, b, c, d);
    assert!((y1 - 0.1).abs() < 1e-6);
    assert!((y2 - 0.4).abs() < 1e-6);
    assert!((y3 - 0.6).abs() < 1e-6);
    assert!((y4 - 0.9).abs() < 1e-6);
  }

  #[test]
  fn vertical_gradient_scenario() {
    let (a, b, c, d) = fwd_dct4(0.0, 0.0, 1.0, 1.0);
    assert!((a - 0.5).abs() < 1e-6);
    assert!((b - 0.5).abs() < 1e-6);
    assert!(c.abs() < 1e-6);
    assert!(d.abs() < 1e-6);

    assert_eq!(quantize_a(a), 255);
    assert_eq!(quantize_bcd(b), 15);
    assert_eq!(quantize_bcd(c), 0);
    assert_eq!(quantize_bcd(d), 0);

    // Exact on the pre-quantization coefficients.
    let (y1, y2, y3, y4) = inv_dct4(a, b, c, d);
    assert!((y1 - 0.0).abs() < 1e-6);
    assert!((y2 - 0.0).abs() < 1e-6);
    assert!((y3 - 1.0).abs() < 1e-6);
    assert!((y4 - 1.0).abs() < 1e-6);
  }

  #[test]
  fn bcd_clamp_prevents_field_overflow() {
    assert_eq!(quantize_bcd(10.0), 15);
    assert_eq!(quantize_bcd(-10.0), -15);
  }

  #[test]
  fn blockify_unblockify_round_trip_shape() {
    let vc = Raster::new_with(4, 4, |row, col| Vc { y: (row + col) as f32 / 8.0, pb: 0.0, pr: 0.0 });
    let blocks = blockify(&vc);
    assert_eq!(blocks.rows(), 2);
    assert_eq!(blocks.cols(), 2);
    let back = unblockify(&blocks);
    assert_eq!(back.rows(), 4);
    assert_eq!(back.cols(), 4);
  }
}
