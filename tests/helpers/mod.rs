/* tests/helpers/mod.rs */

use std::io::{self, Read};

/// Source that hands out at most one byte per read.
pub(crate) struct Trickle<'a> {
	data: &'a [u8],
}

impl<'a> Trickle<'a> {
	pub(crate) fn new(data: &'a [u8]) -> Self {
		Self { data }
	}
}

impl Read for Trickle<'_> {
	fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
		let Some((&first, rest)) = self.data.split_first() else {
			return Ok(0);
		};
		if buf.is_empty() {
			return Ok(0);
		}
		buf[0] = first;
		self.data = rest;
		Ok(1)
	}
}

/// Source that reports `Interrupted` before every successful read.
pub(crate) struct Interrupting<'a> {
	data: &'a [u8],
	interrupt_next: bool,
}

impl<'a> Interrupting<'a> {
	pub(crate) fn new(data: &'a [u8]) -> Self {
		Self {
			data,
			interrupt_next: true,
		}
	}
}

impl Read for Interrupting<'_> {
	fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
		if self.interrupt_next {
			self.interrupt_next = false;
			return Err(io::ErrorKind::Interrupted.into());
		}
		self.interrupt_next = true;
		self.data.read(buf)
	}
}

/// Source that yields `data` and then fails instead of reporting EOF.
pub(crate) struct Failing<'a> {
	data: &'a [u8],
}

impl<'a> Failing<'a> {
	pub(crate) fn new(data: &'a [u8]) -> Self {
		Self { data }
	}
}

impl Read for Failing<'_> {
	fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
		if self.data.is_empty() {
			return Err(io::Error::new(io::ErrorKind::ConnectionReset, "source reset"));
		}
		self.data.read(buf)
	}
}

/// Build a little-endian explicit-length element: group, element, u32 length, value.
pub(crate) fn element(group: u16, elem: u16, value: &[u8]) -> Vec<u8> {
	let mut out = Vec::with_capacity(8 + value.len());
	out.extend_from_slice(&group.to_le_bytes());
	out.extend_from_slice(&elem.to_le_bytes());
	out.extend_from_slice(&(value.len() as u32).to_le_bytes());
	out.extend_from_slice(value);
	out
}

/// Build a sequence element whose value is the concatenation of `items`.
pub(crate) fn sequence(group: u16, elem: u16, items: &[Vec<u8>]) -> Vec<u8> {
	let value: Vec<u8> = items.concat();
	element(group, elem, &value)
}
