//! `BusDevice` over an `embedded_hal` I2C bus. Each register access is one
//! transfer: reads write the register pointer and read the payload back with a
//! repeated start, writes send the pointer followed by the payload.
use std::sync::Mutex;

use embedded_hal::i2c::{Error as _, I2c};
use smallvec::SmallVec;

use super::{BusDevice, DeviceError, DeviceResult, Endianness, endianness::MAX_ENDIAN_BYTES};

pub struct I2cDevice<I2C> {
    name: String,
    bus: Mutex<I2C>,
    address: u8,
    endian: Endianness,
}

impl<I2C: I2c> I2cDevice<I2C> {
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self::builder(i2c, address).build()
    }

    pub fn builder(i2c: I2C, address: u8) -> I2cDeviceBuilder<I2C> {
        I2cDeviceBuilder::new(i2c, address)
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// Gives the bus back, e.g. to hand it to another driver.
    pub fn release(self) -> DeviceResult<I2C> {
        self.bus.into_inner().map_err(|_| DeviceError::LockPoisoned)
    }

    fn transport_error(&self, err: I2C::Error) -> DeviceError {
        DeviceError::I2c {
            address: self.address,
            kind: err.kind(),
        }
    }
}

impl<I2C: I2c> BusDevice for I2cDevice<I2C> {
    fn name(&self) -> &str {
        &self.name
    }

    fn endianness(&self) -> Endianness {
        self.endian
    }

    fn read(&self, register: u8, out: &mut [u8]) -> DeviceResult<()> {
        let mut bus = self.bus.lock().map_err(|_| DeviceError::LockPoisoned)?;
        bus.write_read(self.address, &[register], out)
            .map_err(|err| self.transport_error(err))
    }

    fn write(&self, register: u8, data: &[u8]) -> DeviceResult<()> {
        let mut frame: SmallVec<[u8; MAX_ENDIAN_BYTES + 1]> = SmallVec::new();
        frame.push(register);
        frame.extend_from_slice(data);
        let mut bus = self.bus.lock().map_err(|_| DeviceError::LockPoisoned)?;
        bus.write(self.address, &frame)
            .map_err(|err| self.transport_error(err))
    }
}

pub struct I2cDeviceBuilder<I2C> {
    i2c: I2C,
    address: u8,
    name: Option<String>,
    endian: Endianness,
}

impl<I2C: I2c> I2cDeviceBuilder<I2C> {
    fn new(i2c: I2C, address: u8) -> Self {
        Self {
            i2c,
            address,
            name: None,
            endian: Endianness::Big,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn endianness(mut self, endian: Endianness) -> Self {
        self.endian = endian;
        self
    }

    pub fn build(self) -> I2cDevice<I2C> {
        let name = self
            .name
            .unwrap_or_else(|| format!("i2c@0x{:02X}", self.address));
        I2cDevice {
            name,
            bus: Mutex::new(self.i2c),
            address: self.address,
            endian: self.endian,
        }
    }
}
