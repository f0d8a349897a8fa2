#[path = "device.rs"]
mod device_trait;
pub mod endianness;
pub mod error;
pub mod i2c;
pub mod memory;

pub use device_trait::BusDevice;
pub use endianness::Endianness;
pub use error::{DeviceError, DeviceResult};
pub use i2c::{I2cDevice, I2cDeviceBuilder};
pub use memory::RegisterMemory;
