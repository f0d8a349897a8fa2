//! Typed views over register words. A [`BitField`] extracts and injects the
//! bits under a mask; an [`Adapted`] field decorates any inner field with a
//! [`Transform`] that converts its value to a richer type and back. Adapters
//! stack, so `mask -> as_short -> bit12` reads a split 12-bit count out of one
//! half of a word register.
//!
//! Every transform satisfies `decode(encode(x)) == x` for the values it
//! accepts.

pub mod codec;
pub mod lookup;
pub mod mask;

pub use codec::{Focus, Split12, SwapBytes};
pub use lookup::{FieldMapping, Lookup};
pub use mask::BitField;

use std::{fmt, hash::Hash};

use crate::{
    error::{FieldError, FieldResult},
    register::{Narrow, ReadRegister, RegisterValue, WriteRegister},
};

pub type LookupField<F, T> = Adapted<F, Lookup<<F as Field>::Value, T>>;
pub type BoolField<F> = LookupField<F, bool>;

pub trait Field {
    /// Width of the register the field lives in.
    type Word: RegisterValue;
    type Value;

    fn mask(&self) -> Self::Word;

    #[inline(always)]
    fn shift(&self) -> u32 {
        self.mask().to_bits().trailing_zeros()
    }

    /// Bits of a decoded value that can be non-zero.
    fn value_mask(&self) -> u32;

    fn extract(&self, word: Self::Word) -> FieldResult<Self::Value>;

    /// Merges `value` into `word`, leaving every bit outside the mask intact.
    fn inject(&self, word: Self::Word, value: Self::Value) -> FieldResult<Self::Word>;

    fn get<R>(&self, register: &mut R) -> FieldResult<Self::Value>
    where
        R: ReadRegister<Value = Self::Word> + ?Sized,
    {
        let word = register.value()?;
        self.extract(word)
    }

    /// Rewrites the field in the register's cached word. The bus sees the
    /// change on the next flush.
    fn set<R>(&self, register: &mut R, value: Self::Value) -> FieldResult<()>
    where
        R: WriteRegister<Value = Self::Word> + ?Sized,
    {
        let word = register.value()?;
        let word = self.inject(word, value)?;
        register.set_value(word);
        Ok(())
    }
}

/// Value-level strategy an [`Adapted`] field applies on top of its inner field.
pub trait Transform {
    type Inner;
    type Outer;

    fn decode(&self, raw: Self::Inner) -> FieldResult<Self::Outer>;

    fn encode(&self, value: Self::Outer) -> FieldResult<Self::Inner>;

    /// Maps the inner field's value mask to the decoded side.
    fn value_mask(&self, inner: u32) -> u32;
}

/// Decorator forwarding mask metadata to the inner field and converting values
/// with `T`.
#[derive(Clone)]
pub struct Adapted<F, T> {
    inner: F,
    transform: T,
}

impl<F, T> Adapted<F, T>
where
    F: Field,
    T: Transform<Inner = F::Value>,
{
    pub fn new(inner: F, transform: T) -> Self {
        Self { inner, transform }
    }

    pub fn decode(&self, raw: F::Value) -> FieldResult<T::Outer> {
        self.transform.decode(raw)
    }

    pub fn encode(&self, value: T::Outer) -> FieldResult<F::Value> {
        self.transform.encode(value)
    }
}

impl<F, T> Field for Adapted<F, T>
where
    F: Field,
    T: Transform<Inner = F::Value>,
{
    type Word = F::Word;
    type Value = T::Outer;

    #[inline(always)]
    fn mask(&self) -> F::Word {
        self.inner.mask()
    }

    #[inline(always)]
    fn shift(&self) -> u32 {
        self.inner.shift()
    }

    fn value_mask(&self) -> u32 {
        self.transform.value_mask(self.inner.value_mask())
    }

    fn extract(&self, word: F::Word) -> FieldResult<T::Outer> {
        let raw = self.inner.extract(word)?;
        self.transform.decode(raw)
    }

    fn inject(&self, word: F::Word, value: T::Outer) -> FieldResult<F::Word> {
        let raw = self.transform.encode(value)?;
        self.inner.inject(word, raw)
    }
}

impl<F: fmt::Debug, T: fmt::Debug> fmt::Debug for Adapted<F, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Adapted")
            .field("inner", &self.inner)
            .field("transform", &self.transform)
            .finish()
    }
}

/// Adapter constructors available on every field.
pub trait FieldExt: Field + Sized {
    /// Maps raw codes to values through an explicit table.
    fn lookup<T, I>(self, pairs: I) -> FieldResult<LookupField<Self, T>>
    where
        Self::Value: RegisterValue,
        T: Clone + Eq + Hash + fmt::Debug,
        I: IntoIterator<Item = (u32, T)>,
    {
        let table = Lookup::new(pairs, self.value_mask())?;
        Ok(Adapted::new(self, table))
    }

    /// Maps raw codes to the variants of a [`FieldMapping`] enumeration.
    fn lookup_enum<T>(self) -> FieldResult<LookupField<Self, T>>
    where
        Self::Value: RegisterValue,
        T: FieldMapping,
    {
        self.lookup(T::VARIANTS.iter().map(|variant| (variant.code(), *variant)))
    }

    /// Single-bit flag: `1 <-> true`, `0 <-> false`.
    fn as_boolean(self) -> FieldResult<BoolField<Self>>
    where
        Self::Value: RegisterValue,
    {
        let mask = self.mask().to_bits();
        if mask.count_ones() != 1 {
            return Err(FieldError::InvalidMask {
                mask,
                reason: "boolean fields span exactly one bit",
            });
        }
        self.lookup([(1, true), (0, false)])
    }

    fn swap_bytes(self) -> Adapted<Self, SwapBytes>
    where
        Self: Field<Value = u16>,
    {
        Adapted::new(self, SwapBytes)
    }

    fn as_short(self) -> Adapted<Self, Focus<Self::Value, u16>>
    where
        Self::Value: Narrow<u16>,
    {
        Adapted::new(self, Focus::new())
    }

    fn as_byte(self) -> Adapted<Self, Focus<Self::Value, u8>>
    where
        Self::Value: Narrow<u8>,
    {
        Adapted::new(self, Focus::new())
    }

    fn bit12(self) -> Adapted<Self, Split12>
    where
        Self: Field<Value = u16>,
    {
        Adapted::new(self, Split12)
    }
}

impl<F: Field> FieldExt for F {}
