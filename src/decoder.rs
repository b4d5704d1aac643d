/* src/decoder.rs */

use std::io::{self, Read};

use bstr::BString;

use crate::ByteOrder;
use crate::Error;
use crate::trace::{debug, trace};

/// Sequential decoder over a byte source with a stack of nested read limits.
///
/// Limits are absolute positions measured in bytes consumed since the
/// decoder was created. Reads never cross the innermost limit: once it is
/// reached the scope is exhausted and non-empty reads fail with
/// [`Error::EndOfScope`] until the scope is popped.
///
/// ```
/// use dicomio::{ByteOrder, Decoder};
///
/// let data = [0x02, 0x00, 0xAA, 0xBB, 0xCC, 0xDD];
/// let mut dec = Decoder::new(&data[..], ByteOrder::Little, data.len() as u64);
///
/// let len = dec.read_u16().unwrap();
/// dec.push_limit(u64::from(len)).unwrap();
/// assert_eq!(dec.read_bytes(1).unwrap(), [0xAA]);
/// // The unread byte of the nested element is dropped on the way out.
/// dec.pop_limit().unwrap();
/// assert_eq!(dec.bytes_consumed(), 4);
/// assert_eq!(dec.read_u16().unwrap(), 0xDDCC);
/// assert!(dec.is_exhausted());
/// ```
#[derive(Debug)]
pub struct Decoder<R> {
	source: R,
	byte_order: ByteOrder,
	bytes_consumed: u64,
	limit: u64,
	limit_stack: Vec<u64>,
}

/// Where an exact-length fill stopped, and why.
struct Stall {
	filled: usize,
	source: Option<io::Error>,
}

macro_rules! read_fns {
	($($name:ident: $ty:ident),* $(,)?) => {
		$(
			#[doc = concat!("Read a `", stringify!($ty), "` in the configured byte order.")]
			///
			/// # Errors
			///
			/// [`Error::EndOfScope`] when the scope is already exhausted,
			/// [`Error::ShortRead`] when the current limit or the end of the
			/// source is hit part way, [`Error::Io`] when the source fails.
			/// The bytes obtained so far stay consumed.
			pub fn $name(&mut self) -> Result<$ty, Error> {
				let bytes: [u8; size_of::<$ty>()] = self.read_array()?;
				Ok(self.byte_order.$ty(bytes))
			}
		)*
	};
}

impl<R: Read> Decoder<R> {
	/// Create a decoder that may read at most `limit` bytes from `source`.
	#[must_use]
	pub fn new(source: R, byte_order: ByteOrder, limit: u64) -> Self {
		Self {
			source,
			byte_order,
			bytes_consumed: 0,
			limit,
			limit_stack: Vec::new(),
		}
	}

	/// Create a decoder whose outer limit is only the end of `source`.
	#[must_use]
	pub fn unbounded(source: R, byte_order: ByteOrder) -> Self {
		Self::new(source, byte_order, u64::MAX)
	}

	/// Total bytes pulled from the source since creation.
	#[must_use]
	pub fn bytes_consumed(&self) -> u64 {
		self.bytes_consumed
	}

	/// Absolute position of the currently active limit.
	#[must_use]
	pub fn limit(&self) -> u64 {
		self.limit
	}

	/// Number of nested limits currently pushed.
	#[must_use]
	pub fn depth(&self) -> usize {
		self.limit_stack.len()
	}

	/// Byte order applied to multi-byte reads.
	#[must_use]
	pub fn byte_order(&self) -> ByteOrder {
		self.byte_order
	}

	/// Switch the byte order for all following reads.
	pub fn set_byte_order(&mut self, byte_order: ByteOrder) {
		self.byte_order = byte_order;
	}

	/// Bytes left before the current limit.
	#[must_use]
	pub fn remaining(&self) -> u64 {
		self.limit.saturating_sub(self.bytes_consumed)
	}

	/// Whether the current limit has been reached.
	#[must_use]
	pub fn is_exhausted(&self) -> bool {
		self.remaining() == 0
	}

	/// Borrow the byte source.
	#[must_use]
	pub fn get_ref(&self) -> &R {
		&self.source
	}

	/// Mutably borrow the byte source.
	///
	/// Bytes read through this reference bypass the decoder's accounting.
	pub fn get_mut(&mut self) -> &mut R {
		&mut self.source
	}

	/// Release the byte source.
	#[must_use]
	pub fn into_inner(self) -> R {
		self.source
	}

	/// Pull up to `buf.len()` bytes, never past the current limit.
	///
	/// Performs a single read on the source, so fewer bytes than requested
	/// may come back. `Ok(0)` with a non-empty buffer means the source itself
	/// has ended.
	///
	/// # Errors
	///
	/// [`Error::EndOfScope`] when the scope is exhausted and `buf` is not
	/// empty, [`Error::Io`] when the source fails.
	pub fn pull(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
		let remaining = self.remaining();
		if remaining == 0 {
			if buf.is_empty() {
				return Ok(0);
			}
			return Err(Error::EndOfScope);
		}
		let len = usize::try_from(remaining).map_or(buf.len(), |r| r.min(buf.len()));
		match self.source.read(&mut buf[..len]) {
			Ok(n) => {
				self.bytes_consumed += n as u64;
				Ok(n)
			}
			Err(source) => Err(Error::Io {
				expected: len,
				partial: Vec::new(),
				source,
			}),
		}
	}

	// Interrupted reads are retried, everything else stops the fill.
	fn fill(&mut self, buf: &mut [u8]) -> Result<(), Stall> {
		let mut filled = 0;
		while filled < buf.len() {
			match self.pull(&mut buf[filled..]) {
				Ok(0) | Err(Error::EndOfScope) => {
					return Err(Stall {
						filled,
						source: None,
					});
				}
				Ok(n) => filled += n,
				Err(Error::Io { source, .. }) if source.kind() == io::ErrorKind::Interrupted => {}
				Err(Error::Io { source, .. }) => {
					return Err(Stall {
						filled,
						source: Some(source),
					});
				}
				Err(err) => {
					return Err(Stall {
						filled,
						source: Some(io::Error::other(err)),
					});
				}
			}
		}
		Ok(())
	}

	fn stalled(&self, stall: Stall, expected: usize, partial: Vec<u8>) -> Error {
		match stall.source {
			Some(source) => Error::Io {
				expected,
				partial,
				source,
			},
			None => self.short_read(expected, partial),
		}
	}

	// A read that got nothing from an exhausted scope started at its end.
	fn short_read(&self, expected: usize, partial: Vec<u8>) -> Error {
		if partial.is_empty() && self.is_exhausted() {
			Error::EndOfScope
		} else {
			Error::ShortRead { expected, partial }
		}
	}

	fn read_array<const N: usize>(&mut self) -> Result<[u8; N], Error> {
		let mut bytes = [0u8; N];
		if let Err(stall) = self.fill(&mut bytes) {
			let partial = bytes[..stall.filled].to_vec();
			return Err(self.stalled(stall, N, partial));
		}
		Ok(bytes)
	}

	/// Fill `buf` completely.
	///
	/// # Errors
	///
	/// [`Error::EndOfScope`] when the scope is already exhausted, otherwise
	/// [`Error::ShortRead`] or [`Error::Io`] carrying the bytes that did
	/// arrive.
	pub fn read_exact_into(&mut self, buf: &mut [u8]) -> Result<(), Error> {
		self.fill(buf).map_err(|stall| {
			let partial = buf[..stall.filled].to_vec();
			self.stalled(stall, buf.len(), partial)
		})
	}

	/// Read exactly `n` raw bytes.
	///
	/// # Errors
	///
	/// [`Error::EndOfScope`] when the scope is already exhausted, otherwise
	/// [`Error::ShortRead`] or [`Error::Io`] carrying the bytes that did
	/// arrive.
	pub fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>, Error> {
		// Never allocate past the limit for a declared length that cannot fit.
		let len = usize::try_from(self.remaining()).map_or(n, |r| r.min(n));
		let mut buf = vec![0u8; len];
		if let Err(stall) = self.fill(&mut buf) {
			buf.truncate(stall.filled);
			return Err(self.stalled(stall, n, buf));
		}
		if len < n {
			return Err(self.short_read(n, buf));
		}
		Ok(buf)
	}

	/// Read an `n` byte string without any character set conversion.
	///
	/// # Errors
	///
	/// Same as [`read_bytes`](Self::read_bytes); [`Error::partial`] holds
	/// the text read before the failure.
	pub fn read_string(&mut self, n: usize) -> Result<BString, Error> {
		self.read_bytes(n).map(BString::from)
	}

	/// Read a single byte.
	///
	/// # Errors
	///
	/// [`Error::EndOfScope`], [`Error::ShortRead`] or [`Error::Io`].
	pub fn read_u8(&mut self) -> Result<u8, Error> {
		let [b]: [u8; 1] = self.read_array()?;
		Ok(b)
	}

	/// Read a single signed byte.
	///
	/// # Errors
	///
	/// [`Error::EndOfScope`], [`Error::ShortRead`] or [`Error::Io`].
	pub fn read_i8(&mut self) -> Result<i8, Error> {
		let [b]: [u8; 1] = self.read_array()?;
		Ok(i8::from_ne_bytes([b]))
	}

	read_fns! {
		read_u16: u16,
		read_i16: i16,
		read_u32: u32,
		read_i32: i32,
		read_u64: u64,
		read_i64: i64,
		read_f32: f32,
		read_f64: f64,
	}

	/// Discard exactly `n` bytes.
	///
	/// # Errors
	///
	/// [`Error::InsufficientBytes`] without consuming anything when `n` is
	/// past the current limit. [`Error::SkipIncomplete`] when the source
	/// ends early or fails, with the count of bytes discarded before that.
	pub fn skip(&mut self, n: u64) -> Result<(), Error> {
		let remaining = self.remaining();
		if n > remaining {
			return Err(Error::InsufficientBytes {
				requested: n,
				remaining,
			});
		}
		let start = self.bytes_consumed;
		let copied = io::copy(&mut self.by_ref().take(n), &mut io::sink());
		let skipped = self.bytes_consumed - start;
		match copied {
			Ok(_) if skipped == n => Ok(()),
			Ok(_) => Err(Error::SkipIncomplete {
				requested: n,
				skipped,
				source: None,
			}),
			Err(source) => Err(Error::SkipIncomplete {
				requested: n,
				skipped,
				source: Some(source),
			}),
		}
	}

	/// Enter a nested scope of `n` bytes starting at the current position.
	///
	/// # Errors
	///
	/// [`Error::LimitExceeded`] when the scope would end past the current
	/// limit. Nothing changes in that case.
	pub fn push_limit(&mut self, n: u64) -> Result<(), Error> {
		let requested = self.bytes_consumed.saturating_add(n);
		if n > self.remaining() {
			return Err(Error::LimitExceeded {
				requested,
				current: self.limit,
			});
		}
		self.limit_stack.push(self.limit);
		self.limit = requested;
		trace!(limit = requested, depth = self.limit_stack.len(), "entered scope");
		Ok(())
	}

	/// Leave the innermost scope, discarding whatever it has left unread.
	///
	/// On success the cursor sits exactly at the limit of the scope that was
	/// left and the enclosing limit is active again.
	///
	/// # Errors
	///
	/// [`Error::NoScope`] when nothing was pushed. Errors from discarding the
	/// unread remainder are returned as-is and leave the scope in place.
	pub fn pop_limit(&mut self) -> Result<(), Error> {
		let Some(&previous) = self.limit_stack.last() else {
			return Err(Error::NoScope);
		};
		let left = self.remaining();
		if left > 0 {
			debug!(
				discarded = left,
				position = self.bytes_consumed,
				"discarding unread bytes at end of scope"
			);
			self.skip(left)?;
		}
		self.limit_stack.pop();
		trace!(limit = previous, depth = self.limit_stack.len(), "left scope");
		self.limit = previous;
		Ok(())
	}

	/// Run `f` inside a nested scope of `n` bytes.
	///
	/// When `f` returns, every scope it left pushed is popped along with the
	/// one entered here, so the cursor ends up at this scope's limit. If `f`
	/// fails the pops are still attempted and `f`'s error is returned.
	///
	/// # Errors
	///
	/// Errors from [`push_limit`](Self::push_limit), `f`, or
	/// [`pop_limit`](Self::pop_limit).
	pub fn with_limit<T, E, F>(&mut self, n: u64, f: F) -> Result<T, E>
	where
		F: FnOnce(&mut Self) -> Result<T, E>,
		E: From<Error>,
	{
		self.push_limit(n)?;
		let outer = self.depth() - 1;
		let result = f(self);
		let unwound = self.unwind_to(outer);
		match result {
			Ok(value) => {
				unwound?;
				Ok(value)
			}
			Err(err) => {
				if unwound.is_err() {
					debug!(depth = self.limit_stack.len(), "scope left in place after failed read");
				}
				Err(err)
			}
		}
	}

	// Stops at the first failed pop, leaving that scope in place.
	fn unwind_to(&mut self, depth: usize) -> Result<(), Error> {
		while self.depth() > depth {
			self.pop_limit()?;
		}
		Ok(())
	}
}

/// Reads stop at the current limit as if the stream had ended there.
impl<R: Read> Read for Decoder<R> {
	fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
		match self.pull(buf) {
			Ok(n) => Ok(n),
			Err(Error::EndOfScope) => Ok(0),
			Err(err) => Err(err.into()),
		}
	}
}
