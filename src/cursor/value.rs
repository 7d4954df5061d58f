//! Fixed-width field values read without an intermediate buffer.

use zerocopy::{FromBytes, little_endian};

/// A value with a fixed little-endian encoding in a header field.
///
/// See [`Cursor::read`](super::Cursor::read).
pub trait Value: Sized {
    /// The bytes storing this value.
    type Raw: AsMut<[u8]> + AsRef<[u8]> + Default;

    /// Convert the stored bytes to the value.
    fn decode(r: Self::Raw) -> Self;
}

macro_rules! value {
    ($t:ident) => {
        impl Value for $t {
            type Raw = [u8; size_of::<$t>()];

            fn decode(r: Self::Raw) -> Self {
                $t::from_le_bytes(r)
            }
        }
    };
}

value!(u8);
value!(u16);
value!(u32);
value!(u64);

/// A ROS timestamp, as stored in the `time` fields of message, chunk, and
/// chunk info records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Time {
    pub sec: u32,
    pub nsec: u32,
}

impl Time {
    /// Total nanoseconds since the epoch.
    pub fn as_nanos(&self) -> u64 {
        self.sec as u64 * 1_000_000_000 + self.nsec as u64
    }
}

impl Value for Time {
    type Raw = [u8; 8];

    fn decode(r: Self::Raw) -> Self {
        #[repr(C)]
        #[derive(FromBytes)]
        struct RawTime {
            sec: little_endian::U32,
            nsec: little_endian::U32,
        }

        let RawTime { sec, nsec } = zerocopy::transmute!(r);

        Self {
            sec: sec.get(),
            nsec: nsec.get(),
        }
    }
}
