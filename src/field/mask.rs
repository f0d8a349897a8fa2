//! Mask-based field: the value lives under `mask` and is shifted down by the
//! mask's trailing zeros.

use std::fmt;

use crate::{
    error::{FieldError, FieldResult},
    field::Field,
    register::RegisterValue,
};

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct BitField<W: RegisterValue> {
    mask: W,
    inverse: u32,
    shift: u32,
}

impl<W: RegisterValue> BitField<W> {
    pub fn new(mask: W) -> FieldResult<Self> {
        let bits = mask.to_bits();
        if bits == 0 {
            return Err(FieldError::InvalidMask {
                mask: bits,
                reason: "field mask selects no bits",
            });
        }
        Ok(Self {
            mask,
            inverse: !bits & W::all_ones(),
            shift: bits.trailing_zeros(),
        })
    }

    /// Value under the mask, shifted down to bit zero.
    #[inline(always)]
    pub fn read_from(&self, word: W) -> W {
        W::from_bits((word.to_bits() & self.mask.to_bits()) >> self.shift)
    }

    /// `word` with the masked bits replaced by `value`.
    #[inline(always)]
    pub fn write_to(&self, word: W, value: W) -> W {
        let cleared = word.to_bits() & self.inverse;
        let shifted = (value.to_bits() << self.shift) & self.mask.to_bits();
        W::from_bits(cleared | shifted)
    }
}

impl<W: RegisterValue> Field for BitField<W> {
    type Word = W;
    type Value = W;

    #[inline(always)]
    fn mask(&self) -> W {
        self.mask
    }

    #[inline(always)]
    fn shift(&self) -> u32 {
        self.shift
    }

    fn value_mask(&self) -> u32 {
        self.mask.to_bits() >> self.shift
    }

    fn extract(&self, word: W) -> FieldResult<W> {
        Ok(self.read_from(word))
    }

    fn inject(&self, word: W, value: W) -> FieldResult<W> {
        Ok(self.write_to(word, value))
    }
}

impl<W: RegisterValue> fmt::Debug for BitField<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitField({:#x})", self.mask)
    }
}
