use std::{error::Error, fmt};

use embedded_hal::i2c::ErrorKind;

pub type DeviceResult<T> = Result<T, DeviceError>;

#[derive(Debug)]
pub enum DeviceError {
    OutOfRange { register: u8, len: usize, capacity: usize },
    I2c { address: u8, kind: ErrorKind },
    Unsupported(&'static str),
    LockPoisoned,
    Backend(Box<dyn Error + Send + Sync>),
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceError::OutOfRange { register, len, capacity } => {
                write!(
                    f,
                    "register access 0x{register:02X} len {len} exceeds capacity 0x{capacity:X}"
                )
            }
            DeviceError::I2c { address, kind } => {
                write!(f, "i2c transfer to 0x{address:02X} failed: {kind:?}")
            }
            DeviceError::Unsupported(msg) => write!(f, "device operation unsupported: {msg}"),
            DeviceError::LockPoisoned => {
                write!(f, "device lock has been poisoned due to a prior error")
            }
            DeviceError::Backend(_) => write!(f, "device backend error"),
        }
    }
}

impl Error for DeviceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DeviceError::Backend(source) => Some(source.as_ref()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_failing_register() {
        let err = DeviceError::OutOfRange {
            register: 0xFE,
            len: 4,
            capacity: 0x100,
        };
        assert_eq!(
            err.to_string(),
            "register access 0xFE len 4 exceeds capacity 0x100",
            "out of range errors should describe the access"
        );
    }

    #[test]
    fn backend_errors_chain_their_source() {
        let inner = std::io::Error::other("wire fault");
        let err = DeviceError::Backend(Box::new(inner));
        let source = err.source().expect("backend error should expose its cause");
        assert_eq!(source.to_string(), "wire fault", "source should be the wrapped error");
    }

    #[test]
    fn i2c_errors_report_the_bus_address() {
        let err = DeviceError::I2c {
            address: 0x23,
            kind: ErrorKind::Other,
        };
        assert!(
            err.to_string().starts_with("i2c transfer to 0x23 failed"),
            "i2c errors should name the device address"
        );
    }
}
