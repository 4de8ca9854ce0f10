// End-to-end PPM -> compressed -> PPM tests, exercising the whole
// pipeline (Modules C-G) through public API rather than per-module units.

use std::io::Cursor;

use ppmvc::diff::rms_diff;
use ppmvc::pipeline::{compress, decompress};
use ppmvc::ppm::{read_ppm, write_ppm, Ppm};
use ppmvc::raster::Raster;
use ppmvc::color::Rgb;

fn gradient_ppm(width: usize, height: usize) -> Vec<u8> {
  let pixels = Raster::new_with(height, width, |row, col| Rgb {
    red: ((row * 37 + col * 11) % 256) as u16,
    green: ((row * 13 + col * 29) % 256) as u16,
    blue: ((row * 5 + col * 53) % 256) as u16,
  });
  let ppm = Ppm { width, height, maxval: 255, pixels };
  let mut buf = Vec::new();
  write_ppm(&mut buf, &ppm).unwrap();
  buf
}

#[test]
fn compress_then_decompress_is_close_to_original_p8() {
  let original_bytes = gradient_ppm(32, 24);
  let original = read_ppm(&mut Cursor::new(original_bytes.clone())).unwrap();

  let mut compressed = Vec::new();
  compress(&mut Cursor::new(original_bytes), &mut compressed).unwrap();

  let mut decompressed_bytes = Vec::new();
  decompress(&mut Cursor::new(compressed), &mut decompressed_bytes).unwrap();
  let decompressed = read_ppm(&mut Cursor::new(decompressed_bytes)).unwrap();

  assert_eq!(decompressed.width, original.width);
  assert_eq!(decompressed.height, original.height);

  let e = rms_diff(&original, &decompressed).unwrap();
  assert!(e < 0.05, "RMS error {} too large", e);
}

#[test]
fn compressed_stream_has_expected_header_and_size() {
  let bytes = gradient_ppm(8, 8);
  let mut compressed = Vec::new();
  compress(&mut Cursor::new(bytes), &mut compressed).unwrap();

  assert!(compressed.starts_with(b"COMP40 Compressed image format 2\n"));

  let header_len = "COMP40 Compressed image format 2\n8 8\n".len();
  let body_len = compressed.len() - header_len;
  // 8x8 image -> 4x4 blocks -> 16 codewords of 4 bytes each
  assert_eq!(body_len, 16 * 4);
}

#[test]
fn truncated_compressed_stream_is_rejected() {
  let bytes = gradient_ppm(8, 8);
  let mut compressed = Vec::new();
  compress(&mut Cursor::new(bytes), &mut compressed).unwrap();
  compressed.truncate(compressed.len() - 2);

  let mut out = Vec::new();
  let err = decompress(&mut Cursor::new(compressed), &mut out).unwrap_err();
  assert!(matches!(err, ppmvc::error::CodecError::TruncatedStream { .. }));
}

#[test]
fn diff_against_self_is_zero() {
  let bytes = gradient_ppm(16, 16);
  let image = read_ppm(&mut Cursor::new(bytes)).unwrap();
  assert_eq!(rms_diff(&image, &image).unwrap(), 0.0);
}

#[test]
fn compress_and_decompress_through_real_files() {
  use std::fs::File;

  let dir = tempfile::tempdir().unwrap();
  let source_path = dir.path().join("source.ppm");
  let compressed_path = dir.path().join("source.comp");
  let output_path = dir.path().join("output.ppm");

  std::fs::write(&source_path, gradient_ppm(12, 10)).unwrap();

  let mut source = File::open(&source_path).unwrap();
  let mut compressed = File::create(&compressed_path).unwrap();
  compress(&mut source, &mut compressed).unwrap();
  drop(compressed);

  let mut compressed = File::open(&compressed_path).unwrap();
  let mut output = File::create(&output_path).unwrap();
  decompress(&mut compressed, &mut output).unwrap();
  drop(output);

  let original = read_ppm(&mut Cursor::new(gradient_ppm(12, 10))).unwrap();
  let mut roundtripped = File::open(&output_path).unwrap();
  let roundtripped = read_ppm(&mut roundtripped).unwrap();

  assert_eq!(roundtripped.width, original.width);
  assert_eq!(roundtripped.height, original.height);
  assert!(rms_diff(&original, &roundtripped).unwrap() < 0.05);
}
