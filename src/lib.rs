//! Typed bit-field access to byte, short and word registers on a serial bus.
//!
//! A [`Register`] caches the word read from one register address and a
//! [`MutableRegister`] adds a write-ahead value that is committed by
//! [`WriteRegister::flush`]. Fields declared over a register mask extract and
//! inject sub-ranges of that word, and adapters layered on top of a field turn
//! the raw bits into enumerations, booleans, byte-swapped or split values.
#![deny(unsafe_code)]

pub mod device;
pub mod error;
pub mod field;
#[cfg(feature = "ltr559")]
pub mod ltr559;
pub mod register;

pub use device::{BusDevice, DeviceError, DeviceResult, Endianness, I2cDevice, RegisterMemory};
pub use error::{FieldError, FieldResult};
pub use field::{Adapted, BitField, Field, FieldExt, FieldMapping, Transform};
pub use register::{
    CacheState, MutableRegister, ReadRegister, Register, RegisterValue, WriteRegister,
};
