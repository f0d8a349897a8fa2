//! Defines the `BusDevice` trait registers use to reach hardware. A device
//! addresses its registers by an 8-bit pointer and moves whole register
//! payloads in one transaction, reporting failures through `DeviceResult` so
//! register code can surface them as `FieldError::Transport`.
use std::sync::Arc;

use super::{endianness::Endianness, error::DeviceResult};

pub trait BusDevice {
    fn name(&self) -> &str;

    /// Byte order of multi-byte register payloads on the wire.
    #[inline(always)]
    fn endianness(&self) -> Endianness {
        Endianness::Big
    }

    /// Read `out.len()` bytes starting at `register` in a single transaction.
    fn read(&self, register: u8, out: &mut [u8]) -> DeviceResult<()>;

    /// Write `data` starting at `register` in a single transaction.
    fn write(&self, register: u8, data: &[u8]) -> DeviceResult<()>;
}

impl<D: BusDevice + ?Sized> BusDevice for Arc<D> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn endianness(&self) -> Endianness {
        (**self).endianness()
    }

    fn read(&self, register: u8, out: &mut [u8]) -> DeviceResult<()> {
        (**self).read(register, out)
    }

    fn write(&self, register: u8, data: &[u8]) -> DeviceResult<()> {
        (**self).write(register, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::DeviceError;

    #[derive(Default)]
    struct FaultyDevice;

    impl BusDevice for FaultyDevice {
        fn name(&self) -> &str {
            "faulty"
        }

        fn read(&self, _register: u8, _out: &mut [u8]) -> DeviceResult<()> {
            Err(DeviceError::Unsupported("read"))
        }

        fn write(&self, _register: u8, _data: &[u8]) -> DeviceResult<()> {
            Err(DeviceError::Unsupported("write"))
        }
    }

    #[test]
    fn trait_helpers_propagate_device_errors() {
        let dev = FaultyDevice;
        let mut buf = [0u8; 2];
        assert!(
            dev.read(0x10, &mut buf).is_err(),
            "read should surface backend errors"
        );
        assert!(
            dev.write(0x10, &buf).is_err(),
            "write should surface backend errors"
        );
    }

    #[test]
    fn default_byte_order_is_big_endian() {
        assert_eq!(
            FaultyDevice.endianness(),
            Endianness::Big,
            "register payloads default to most-significant byte first"
        );
    }

    #[test]
    fn shared_handles_forward_to_the_device() {
        let dev: Arc<FaultyDevice> = Arc::new(FaultyDevice);
        assert_eq!(dev.name(), "faulty", "Arc should forward the device name");
        assert!(
            BusDevice::read(&dev, 0, &mut [0u8; 1]).is_err(),
            "Arc should forward reads"
        );
    }
}
