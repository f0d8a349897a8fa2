use std::fmt;

mod sealed {
    pub trait Sealed {}
}

/// Backing word of a register. Only byte, short and word widths exist.
pub trait RegisterValue:
    sealed::Sealed + Copy + Eq + fmt::Debug + fmt::LowerHex + Default + 'static
{
    const BITS: u32;
    const BYTES: usize = (Self::BITS / 8) as usize;

    fn to_bits(self) -> u32;

    /// Keeps the low `BITS` bits of `bits`.
    fn from_bits(bits: u32) -> Self;

    #[inline(always)]
    fn all_ones() -> u32 {
        u32::MAX >> (32 - Self::BITS)
    }
}

/// `Self` can be re-presented as the narrower `N` by truncation.
pub trait Narrow<N: RegisterValue>: RegisterValue {}

macro_rules! register_value {
    ($($ty:ty),*) => {
        $(
            impl sealed::Sealed for $ty {}

            impl RegisterValue for $ty {
                const BITS: u32 = <$ty>::BITS;

                #[inline(always)]
                fn to_bits(self) -> u32 {
                    self as u32
                }

                #[inline(always)]
                fn from_bits(bits: u32) -> Self {
                    bits as $ty
                }
            }
        )*
    };
}

register_value!(u8, u16, u32);

impl Narrow<u16> for u32 {}
impl Narrow<u8> for u32 {}
impl Narrow<u8> for u16 {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths_match_the_primitive() {
        assert_eq!((u8::BYTES, u16::BYTES, u32::BYTES), (1, 2, 4), "byte counts per width");
        assert_eq!(u16::all_ones(), 0xFFFF, "all ones covers the full width");
        assert_eq!(u32::all_ones(), u32::MAX, "word width has no shift overflow");
    }

    #[test]
    fn from_bits_truncates_to_width() {
        assert_eq!(u8::from_bits(0x1234), 0x34, "upper bits are dropped");
        assert_eq!(u16::from_bits(0xABCD_1234), 0x1234, "upper half is dropped");
    }
}
