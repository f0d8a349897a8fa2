use smallvec::SmallVec;

/// Widest register payload a device exchanges in one transaction.
pub const MAX_ENDIAN_BYTES: usize = 4;

pub type WireBytes = SmallVec<[u8; MAX_ENDIAN_BYTES]>;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Endianness {
    Little,
    Big,
}

impl Endianness {
    /// Assembles up to four wire bytes into a right-aligned word.
    #[inline(always)]
    pub fn decode(self, bytes: &[u8]) -> Option<u32> {
        if bytes.len() > MAX_ENDIAN_BYTES {
            return None;
        }
        if bytes.is_empty() {
            return Some(0);
        }
        let mut buf = [0u8; MAX_ENDIAN_BYTES];
        let value = match self {
            Endianness::Little => {
                buf[..bytes.len()].copy_from_slice(bytes);
                u32::from_le_bytes(buf)
            }
            Endianness::Big => {
                let start = MAX_ENDIAN_BYTES - bytes.len();
                buf[start..].copy_from_slice(bytes);
                u32::from_be_bytes(buf)
            }
        };
        Some(value)
    }

    /// Splits the low `byte_len` bytes of `value` into wire order.
    #[inline(always)]
    pub fn encode(self, value: u32, byte_len: usize) -> Option<WireBytes> {
        if byte_len > MAX_ENDIAN_BYTES {
            return None;
        }
        let masked = value & mask_bytes(byte_len);
        let out = match self {
            Endianness::Little => SmallVec::from_slice(&masked.to_le_bytes()[..byte_len]),
            Endianness::Big => {
                SmallVec::from_slice(&masked.to_be_bytes()[MAX_ENDIAN_BYTES - byte_len..])
            }
        };
        Some(out)
    }
}

#[inline(always)]
fn mask_bytes(byte_len: usize) -> u32 {
    if byte_len >= MAX_ENDIAN_BYTES {
        u32::MAX
    } else {
        (1u32 << (byte_len * 8)) - 1
    }
}
