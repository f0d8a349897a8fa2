//! Bijective tables between raw field codes and symbolic values.

use std::{fmt, hash::Hash, marker::PhantomData};

use ahash::AHashMap;

use crate::{
    error::{Duplicate, FieldError, FieldResult, Unmapped},
    field::Transform,
    register::RegisterValue,
};

/// Closed set of variants, each carrying the raw code it is stored as.
pub trait FieldMapping: Copy + Eq + Hash + fmt::Debug + 'static {
    const VARIANTS: &'static [Self];

    fn code(self) -> u32;

    fn from_code(code: u32) -> Option<Self> {
        Self::VARIANTS
            .iter()
            .copied()
            .find(|variant| variant.code() == code)
    }
}

/// Declares a fieldless enum together with its [`FieldMapping`] codes.
///
/// ```
/// regfield::field_mapping! {
///     pub enum Polarity {
///         ActiveLow = 0,
///         ActiveHigh = 1,
///     }
/// }
/// ```
#[macro_export]
macro_rules! field_mapping {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $code:expr ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $crate::field::FieldMapping for $name {
            const VARIANTS: &'static [Self] = &[$(Self::$variant),+];

            #[inline]
            fn code(self) -> u32 {
                match self {
                    $(Self::$variant => $code),+
                }
            }
        }
    };
}

/// Transform backed by two hash maps, one per direction.
pub struct Lookup<I, T> {
    by_code: AHashMap<u32, T>,
    by_symbol: AHashMap<T, u32>,
    _raw: PhantomData<fn() -> I>,
}

impl<I, T> Lookup<I, T>
where
    I: RegisterValue,
    T: Clone + Eq + Hash + fmt::Debug,
{
    /// Builds the table, rejecting repeated codes, repeated values and codes
    /// outside `value_mask`.
    pub fn new<P>(pairs: P, value_mask: u32) -> FieldResult<Self>
    where
        P: IntoIterator<Item = (u32, T)>,
    {
        let pairs = pairs.into_iter();
        let (hint, _) = pairs.size_hint();
        let mut by_code = AHashMap::with_capacity(hint);
        let mut by_symbol = AHashMap::with_capacity(hint);
        for (code, symbol) in pairs {
            if code & !value_mask != 0 {
                return Err(FieldError::CodeOutOfRange { code, value_mask });
            }
            if by_code.contains_key(&code) {
                return Err(FieldError::DuplicateMapping(Duplicate::Code(code)));
            }
            if by_symbol.contains_key(&symbol) {
                return Err(FieldError::DuplicateMapping(Duplicate::Symbol(format!(
                    "{symbol:?}"
                ))));
            }
            by_symbol.insert(symbol.clone(), code);
            by_code.insert(code, symbol);
        }
        Ok(Self {
            by_code,
            by_symbol,
            _raw: PhantomData,
        })
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

impl<I, T> Transform for Lookup<I, T>
where
    I: RegisterValue,
    T: Clone + Eq + Hash + fmt::Debug,
{
    type Inner = I;
    type Outer = T;

    fn decode(&self, raw: I) -> FieldResult<T> {
        let code = raw.to_bits();
        self.by_code
            .get(&code)
            .cloned()
            .ok_or(FieldError::UnmappedValue(Unmapped::Code(code)))
    }

    fn encode(&self, value: T) -> FieldResult<I> {
        match self.by_symbol.get(&value) {
            Some(code) => Ok(I::from_bits(*code)),
            None => Err(FieldError::UnmappedValue(Unmapped::Symbol(format!(
                "{value:?}"
            )))),
        }
    }

    fn value_mask(&self, inner: u32) -> u32 {
        inner
    }
}

impl<I, T: Clone> Clone for Lookup<I, T> {
    fn clone(&self) -> Self {
        Self {
            by_code: self.by_code.clone(),
            by_symbol: self.by_symbol.clone(),
            _raw: PhantomData,
        }
    }
}

impl<I, T: fmt::Debug> fmt::Debug for Lookup<I, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entries: Vec<_> = self.by_code.iter().collect();
        entries.sort_unstable_by_key(|(code, _)| **code);
        f.debug_map().entries(entries).finish()
    }
}
