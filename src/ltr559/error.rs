use std::{error::Error, fmt};

use crate::error::FieldError;

pub type Ltr559Result<T> = Result<T, Ltr559Error>;

#[derive(Debug)]
pub enum Ltr559Error {
    Field(FieldError),
    UnexpectedDevice {
        register: u8,
        expected: u8,
        found: u8,
    },
    ResetTimeout {
        waited_ms: u32,
    },
    SettingOutOfRange {
        setting: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },
}

impl fmt::Display for Ltr559Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ltr559Error::Field(_) => write!(f, "register access failed"),
            Ltr559Error::UnexpectedDevice {
                register,
                expected,
                found,
            } => write!(
                f,
                "register 0x{register:02X} reads 0x{found:02X}, expected 0x{expected:02X}"
            ),
            Ltr559Error::ResetTimeout { waited_ms } => {
                write!(f, "software reset still pending after {waited_ms} ms")
            }
            Ltr559Error::SettingOutOfRange {
                setting,
                value,
                min,
                max,
            } => write!(f, "{setting} {value} is outside {min}..={max}"),
        }
    }
}

impl Error for Ltr559Error {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Ltr559Error::Field(err) => Some(err),
            _ => None,
        }
    }
}

impl From<FieldError> for Ltr559Error {
    fn from(err: FieldError) -> Self {
        Ltr559Error::Field(err)
    }
}
