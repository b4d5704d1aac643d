/* src/byte_order.rs */

/// Byte order used to interpret multi-byte values.
///
/// The decoder never detects this on its own; callers pick it from the
/// transfer syntax they are reading.
///
/// ```
/// use dicomio::ByteOrder;
///
/// assert_eq!(ByteOrder::Little.u16([0x01, 0x00]), 1);
/// assert_eq!(ByteOrder::Big.u16([0x01, 0x00]), 256);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ByteOrder {
	/// Most significant byte first.
	Big,
	/// Least significant byte first.
	#[default]
	Little,
}

macro_rules! decode_fns {
	($($name:ident => $ty:ty),* $(,)?) => {
		$(
			#[doc = concat!("Decode a `", stringify!($ty), "` from its raw bytes.")]
			#[must_use]
			pub fn $name(self, bytes: [u8; size_of::<$ty>()]) -> $ty {
				match self {
					Self::Big => <$ty>::from_be_bytes(bytes),
					Self::Little => <$ty>::from_le_bytes(bytes),
				}
			}
		)*
	};
}

impl ByteOrder {
	decode_fns! {
		u16 => u16,
		i16 => i16,
		u32 => u32,
		i32 => i32,
		u64 => u64,
		i64 => i64,
		f32 => f32,
		f64 => f64,
	}
}
