use std::{error::Error, fmt};

use crate::device::DeviceError;

pub type FieldResult<T> = Result<T, FieldError>;

/// Which side of a lookup table repeated an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Duplicate {
    Code(u32),
    Symbol(String),
}

/// The value a lookup table had no entry for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unmapped {
    Code(u32),
    Symbol(String),
}

#[derive(Debug)]
pub enum FieldError {
    Transport {
        register: u8,
        source: DeviceError,
    },
    DuplicateMapping(Duplicate),
    UnmappedValue(Unmapped),
    InvalidMask {
        mask: u32,
        reason: &'static str,
    },
    CodeOutOfRange {
        code: u32,
        value_mask: u32,
    },
}

impl FieldError {
    pub(crate) fn transport(register: u8, source: DeviceError) -> Self {
        FieldError::Transport { register, source }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::Transport { register, .. } => {
                write!(f, "bus transfer for register 0x{register:02X} failed")
            }
            FieldError::DuplicateMapping(Duplicate::Code(code)) => {
                write!(f, "lookup table maps raw code {code:#x} more than once")
            }
            FieldError::DuplicateMapping(Duplicate::Symbol(symbol)) => {
                write!(f, "lookup table maps value {symbol} more than once")
            }
            FieldError::UnmappedValue(Unmapped::Code(code)) => {
                write!(f, "raw code {code:#x} has no mapped value")
            }
            FieldError::UnmappedValue(Unmapped::Symbol(symbol)) => {
                write!(f, "value {symbol} has no mapped raw code")
            }
            FieldError::InvalidMask { mask, reason } => {
                write!(f, "invalid field mask {mask:#x}: {reason}")
            }
            FieldError::CodeOutOfRange { code, value_mask } => write!(
                f,
                "raw code {code:#x} does not fit field bits {value_mask:#x}"
            ),
        }
    }
}

impl Error for FieldError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            FieldError::Transport { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_errors_chain_the_device_error() {
        let err = FieldError::transport(0x80, DeviceError::Unsupported("read"));
        assert_eq!(
            err.to_string(),
            "bus transfer for register 0x80 failed",
            "display should name the register"
        );
        let source = err.source().expect("transport errors carry a source");
        assert_eq!(
            source.to_string(),
            "device operation unsupported: read",
            "source should be the device error"
        );
    }

    #[test]
    fn lookup_errors_describe_the_offending_entry() {
        let dup = FieldError::DuplicateMapping(Duplicate::Symbol("true".into()));
        assert_eq!(dup.to_string(), "lookup table maps value true more than once");
        let unmapped = FieldError::UnmappedValue(Unmapped::Code(3));
        assert_eq!(unmapped.to_string(), "raw code 0x3 has no mapped value");
        assert!(unmapped.source().is_none(), "lookup errors have no underlying cause");
    }
}
