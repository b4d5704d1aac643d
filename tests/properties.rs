/* tests/properties.rs */
#![allow(missing_docs)]

use dicomio::{ByteOrder, Decoder, Error};
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;

fn decoder(data: &[u8]) -> Decoder<&[u8]> {
	Decoder::new(data, ByteOrder::Little, data.len() as u64)
}

/// Reads that fit the limit all succeed and advance the cursor by exactly
/// what they asked for.
#[quickcheck]
fn reads_within_limit_advance_exactly(data: Vec<u8>, chunks: Vec<u8>) -> bool {
	let mut dec = decoder(&data);
	let mut expected = 0u64;
	for chunk in chunks {
		let n = usize::from(chunk);
		if u64::try_from(n).unwrap() > dec.remaining() {
			break;
		}
		let got = dec.read_bytes(n).unwrap();
		let start = usize::try_from(expected).unwrap();
		if got != data[start..start + n] {
			return false;
		}
		expected += n as u64;
	}
	dec.bytes_consumed() == expected
}

#[quickcheck]
fn push_then_pop_skips_whole_scope(data: Vec<u8>, offset: u8, size: u8) -> TestResult {
	let len = data.len() as u64;
	let offset = u64::from(offset);
	let size = u64::from(size);
	if offset + size > len {
		return TestResult::discard();
	}
	let mut dec = decoder(&data);
	dec.skip(offset).unwrap();
	dec.push_limit(size).unwrap();
	dec.pop_limit().unwrap();
	TestResult::from_bool(
		dec.bytes_consumed() == offset + size && dec.limit() == len && dec.depth() == 0,
	)
}

#[quickcheck]
fn oversized_push_changes_nothing(data: Vec<u8>, inner: u8, extra: u8) -> TestResult {
	let len = data.len() as u64;
	let inner = u64::from(inner);
	if inner > len {
		return TestResult::discard();
	}
	let mut dec = decoder(&data);
	dec.push_limit(inner).unwrap();
	let before = (dec.bytes_consumed(), dec.limit(), dec.depth());
	let result = dec.push_limit(inner + u64::from(extra) + 1);
	let after = (dec.bytes_consumed(), dec.limit(), dec.depth());
	TestResult::from_bool(matches!(result, Err(Error::LimitExceeded { .. })) && before == after)
}

#[quickcheck]
fn pop_lands_on_boundary(data: Vec<u8>, size: u8, read: u8) -> TestResult {
	let len = data.len() as u64;
	let size = u64::from(size);
	if size > len {
		return TestResult::discard();
	}
	let mut dec = decoder(&data);
	dec.push_limit(size).unwrap();
	let boundary = dec.limit();
	// Reads may fall short of `read`; the pop must land on the boundary anyway.
	let _ = dec.read_bytes(usize::from(read));
	dec.pop_limit().unwrap();
	TestResult::from_bool(dec.bytes_consumed() == boundary)
}

#[quickcheck]
fn skip_is_all_or_nothing(data: Vec<u8>, n: u16) -> bool {
	let mut dec = decoder(&data);
	let n = u64::from(n);
	let fits = n <= dec.remaining();
	match dec.skip(n) {
		Ok(()) => fits && dec.bytes_consumed() == n,
		Err(Error::InsufficientBytes { .. }) => !fits && dec.bytes_consumed() == 0,
		Err(_) => false,
	}
}

#[quickcheck]
fn text_is_returned_unmodified(data: Vec<u8>) -> bool {
	let mut dec = decoder(&data);
	let text = dec.read_string(data.len()).unwrap();
	text.as_slice() == data.as_slice() && dec.is_exhausted()
}

#[quickcheck]
fn u32_matches_std_conversion(bytes: (u8, u8, u8, u8)) -> bool {
	let raw = [bytes.0, bytes.1, bytes.2, bytes.3];
	let little = Decoder::new(&raw[..], ByteOrder::Little, 4).read_u32().unwrap();
	let big = Decoder::new(&raw[..], ByteOrder::Big, 4).read_i32().unwrap();
	little == u32::from_le_bytes(raw) && big == i32::from_be_bytes(raw)
}
