/* demos/nested_scopes.rs */
#![allow(missing_docs)]

use dicomio::{ByteOrder, Decoder, Error};

fn main() {
	let data = build_sample_dataset();
	let mut dec = Decoder::new(&data[..], ByteOrder::Little, data.len() as u64);

	if let Err(err) = dump(&mut dec, 0) {
		eprintln!("decode failed at byte {}: {err}", dec.bytes_consumed());
	}
}

/// Print every element in the current scope, descending into sequences.
fn dump(dec: &mut Decoder<&[u8]>, indent: usize) -> Result<(), Error> {
	while !dec.is_exhausted() {
		let group = dec.read_u16()?;
		let elem = dec.read_u16()?;
		let len = dec.read_u32()?;
		let pad = "  ".repeat(indent);
		if group == 0xFFFE {
			println!("{pad}item ({len} bytes)");
			dec.with_limit(u64::from(len), |dec| dump(dec, indent + 1))?;
		} else if is_sequence(group, elem) {
			println!("{pad}({group:04X},{elem:04X}) SQ ({len} bytes)");
			dec.with_limit(u64::from(len), |dec| dump(dec, indent + 1))?;
		} else {
			let value = dec.read_string(len as usize)?;
			println!("{pad}({group:04X},{elem:04X}) {value:?}");
		}
	}
	Ok(())
}

fn is_sequence(group: u16, elem: u16) -> bool {
	matches!((group, elem), (0x0008, 0x1115) | (0x0040, 0xA730))
}

fn build_sample_dataset() -> Vec<u8> {
	let code = element(0x0008, 0x0100, b"T-04000");
	let meaning = element(0x0008, 0x0104, b"BREAST");
	let item = element(0xFFFE, 0xE000, &[code, meaning].concat());
	let content = element(0x0040, 0xA730, &item);

	let mut out = element(0x0010, 0x0010, b"DOE^JANE");
	out.extend(element(0x0010, 0x0020, b"PID-0001"));
	out.extend(content);
	out.extend(element(0x0020, 0x000D, b"1.2.840.1"));
	out
}

fn element(group: u16, elem: u16, value: &[u8]) -> Vec<u8> {
	let mut out = Vec::with_capacity(8 + value.len());
	out.extend_from_slice(&group.to_le_bytes());
	out.extend_from_slice(&elem.to_le_bytes());
	out.extend_from_slice(&(value.len() as u32).to_le_bytes());
	out.extend_from_slice(value);
	out
}
