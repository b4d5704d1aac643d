/* src/lib.rs */

//! Bounded binary decoder for length-prefixed, nested data streams such as
//! DICOM.
//!
//! A [`Decoder`] wraps any [`std::io::Read`] source and keeps a stack of
//! read limits:
//!
//! - [`Decoder::push_limit`] enters an element whose payload length was
//!   declared up front. Reads inside it can never cross its end.
//! - [`Decoder::pop_limit`] leaves the element, discarding whatever was not
//!   read, so the next read starts exactly after it.
//!
//! Multi-byte values are decoded in the [`ByteOrder`] the caller selects.
//!
//! ```
//! use dicomio::{ByteOrder, Decoder};
//!
//! // (group, element) tag, a 4-byte length, then the value.
//! let data = [0x10, 0x00, 0x10, 0x00, 0x04, 0x00, 0x00, 0x00, b'D', b'O', b'E', b' '];
//! let mut dec = Decoder::new(&data[..], ByteOrder::Little, data.len() as u64);
//!
//! let group = dec.read_u16().unwrap();
//! let element = dec.read_u16().unwrap();
//! let len = dec.read_u32().unwrap();
//! let name = dec
//! 	.with_limit(u64::from(len), |dec| dec.read_string(3))
//! 	.unwrap();
//!
//! assert_eq!((group, element), (0x0010, 0x0010));
//! assert_eq!(name, "DOE");
//! assert!(dec.is_exhausted());
//! ```
//!
//! # Features
//!
//! - `tracing` (default): log scope entry, exit and discarded bytes through
//!   the [`tracing`](https://docs.rs/tracing) crate.

mod byte_order;
mod decoder;
mod error;
mod trace;

pub use crate::byte_order::ByteOrder;
pub use crate::decoder::Decoder;
pub use crate::error::Error;
