//! Numeric transforms: byte swapping, width narrowing and the split 12-bit
//! layout some light sensors use for their counters.

use std::{fmt, marker::PhantomData};

use crate::{
    error::FieldResult,
    field::Transform,
    register::{Narrow, RegisterValue},
};

#[inline(always)]
pub const fn swap_bytes(value: u16) -> u16 {
    (value >> 8) | ((value & 0x00FF) << 8)
}

/// Exchanges the two bytes of a short. Self-inverse.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SwapBytes;

impl Transform for SwapBytes {
    type Inner = u16;
    type Outer = u16;

    #[inline(always)]
    fn decode(&self, raw: u16) -> FieldResult<u16> {
        Ok(swap_bytes(raw))
    }

    #[inline(always)]
    fn encode(&self, value: u16) -> FieldResult<u16> {
        Ok(swap_bytes(value))
    }

    fn value_mask(&self, inner: u32) -> u32 {
        swap_bytes(inner as u16) as u32
    }
}

/// Re-presents a wide value as the narrower `N`. Decoding truncates and
/// encoding zero-extends, so the inner mask must keep the upper bits clear.
pub struct Focus<W, N> {
    _widths: PhantomData<fn(W) -> N>,
}

impl<W: Narrow<N>, N: RegisterValue> Focus<W, N> {
    pub fn new() -> Self {
        Self {
            _widths: PhantomData,
        }
    }
}

impl<W: Narrow<N>, N: RegisterValue> Default for Focus<W, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W, N> Clone for Focus<W, N> {
    fn clone(&self) -> Self {
        Self {
            _widths: PhantomData,
        }
    }
}

impl<W, N> fmt::Debug for Focus<W, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Focus<{} -> {}>",
            std::any::type_name::<W>(),
            std::any::type_name::<N>()
        )
    }
}

impl<W: Narrow<N>, N: RegisterValue> Transform for Focus<W, N> {
    type Inner = W;
    type Outer = N;

    #[inline(always)]
    fn decode(&self, raw: W) -> FieldResult<N> {
        Ok(N::from_bits(raw.to_bits()))
    }

    #[inline(always)]
    fn encode(&self, value: N) -> FieldResult<W> {
        Ok(W::from_bits(value.to_bits()))
    }

    fn value_mask(&self, inner: u32) -> u32 {
        inner & N::all_ones()
    }
}

/// Twelve-bit count stored as `low byte | unused nibble | high nibble`: the
/// low byte sits in the upper wire byte and the high nibble in wire bits 0-3.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Split12;

impl Split12 {
    pub const MAX: u16 = 0x0FFF;

    #[inline(always)]
    pub const fn join(wire: u16) -> u16 {
        ((wire & 0xFF00) >> 8) | ((wire & 0x000F) << 8)
    }

    #[inline(always)]
    pub const fn split(value: u16) -> u16 {
        ((value & 0x00FF) << 8) | ((value & 0x0F00) >> 8)
    }
}

impl Transform for Split12 {
    type Inner = u16;
    type Outer = u16;

    #[inline(always)]
    fn decode(&self, raw: u16) -> FieldResult<u16> {
        Ok(Self::join(raw))
    }

    #[inline(always)]
    fn encode(&self, value: u16) -> FieldResult<u16> {
        Ok(Self::split(value))
    }

    fn value_mask(&self, inner: u32) -> u32 {
        Self::join(inner as u16) as u32
    }
}
