/* src/error.rs */

use std::io;

/// Errors produced by [`Decoder`](crate::Decoder) operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
	/// A non-empty read was attempted with no bytes left before the current limit.
	#[error("end of scope: no bytes left until the current limit")]
	EndOfScope,

	/// A skip asked for more bytes than remain before the current limit.
	#[error("cannot skip {requested} bytes: only {remaining} left until limit")]
	InsufficientBytes {
		/// Bytes the caller asked to skip.
		requested: u64,
		/// Bytes left before the current limit.
		remaining: u64,
	},

	/// A nested limit would extend past the limit that encloses it.
	#[error("new limit {requested} exceeds current limit {current}")]
	LimitExceeded {
		/// Absolute position the new limit would sit at.
		requested: u64,
		/// Absolute position of the currently active limit.
		current: u64,
	},

	/// `pop_limit` was called with no pushed limit to return to.
	#[error("no nested limit to pop")]
	NoScope,

	/// A skip stopped before discarding every requested byte.
	#[error("skip stopped after {skipped} of {requested} bytes")]
	SkipIncomplete {
		/// Bytes the caller asked to skip.
		requested: u64,
		/// Bytes discarded before the skip stopped.
		skipped: u64,
		/// Error reported by the byte source; `None` when it simply ended.
		#[source]
		source: Option<io::Error>,
	},

	/// An exact-length read ran into the current limit or the end of the source.
	#[error("short read: expected {expected} bytes, got {}", partial.len())]
	ShortRead {
		/// Bytes the read needed.
		expected: usize,
		/// Bytes obtained before the read stopped.
		partial: Vec<u8>,
	},

	/// The underlying byte source failed.
	#[error("i/o error after {} of {expected} bytes", partial.len())]
	Io {
		/// Bytes the read needed.
		expected: usize,
		/// Bytes obtained before the failure.
		partial: Vec<u8>,
		/// Error reported by the byte source.
		#[source]
		source: io::Error,
	},
}

impl Error {
	/// Whether this error only signals that the current scope has no bytes left.
	#[must_use]
	pub fn is_end_of_scope(&self) -> bool {
		matches!(self, Self::EndOfScope)
	}

	/// Bytes obtained by a failed exact-length read before it stopped.
	///
	/// Empty for errors that are not raised by a read.
	#[must_use]
	pub fn partial(&self) -> &[u8] {
		match self {
			Self::ShortRead { partial, .. } | Self::Io { partial, .. } => partial,
			_ => &[],
		}
	}
}

impl From<Error> for io::Error {
	fn from(err: Error) -> Self {
		match err {
			Error::Io { source, .. }
			| Error::SkipIncomplete {
				source: Some(source),
				..
			} => source,
			Error::EndOfScope | Error::ShortRead { .. } | Error::SkipIncomplete { .. } => {
				Self::new(io::ErrorKind::UnexpectedEof, err)
			}
			Error::InsufficientBytes { .. } | Error::LimitExceeded { .. } => {
				Self::new(io::ErrorKind::InvalidData, err)
			}
			Error::NoScope => Self::other(err),
		}
	}
}
