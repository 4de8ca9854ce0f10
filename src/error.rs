// Error kinds for the codec pipeline and CLI. Contract violations
// (FieldOutOfRange, Overflow) are fatal: the pipeline guarantees they
// are never reachable in practice, but they're still distinct variants
// so a violation is reported precisely rather than panicking blind.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
  #[error("bad arguments: {0}")]
  BadArguments(String),

  #[error("I/O error: {0}")]
  IoError(#[from] std::io::Error),

  #[error("invalid PPM: {0}")]
  InvalidPpm(String),

  #[error("truncated compressed stream: expected {expected} codewords, got {got}")]
  TruncatedStream { expected: usize, got: usize },

  #[error("bad compressed-stream header")]
  BadHeader,

  #[error("bit-pack field out of range: width={width}, lsb={lsb}")]
  FieldOutOfRange { width: u32, lsb: u32 },

  #[error("bit-pack overflow: value does not fit in {width}-bit field")]
  Overflow { width: u32 },
}

pub type Result<T> = std::result::Result<T, CodecError>;
