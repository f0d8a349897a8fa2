use std::{fmt, sync::Arc};

use bitflags::bitflags;

use crate::{
    device::{BusDevice, Endianness, endianness::MAX_ENDIAN_BYTES},
    error::{FieldError, FieldResult},
    register::{ReadRegister, RegisterValue, WriteRegister},
};

bitflags! {
    #[derive(Default, PartialEq, Eq, Copy, Clone, Debug)]
    pub struct CacheState: u8 {
        /// The cached word is usable.
        const VALID = 0b01;
        /// The cached word was assigned since the last flush.
        const DIRTY = 0b10;
    }
}

/// Read-only view of one register address. The device handle is shared with
/// every other register on the same device.
pub struct Register<V: RegisterValue, D: BusDevice + ?Sized> {
    device: Arc<D>,
    address: u8,
    endian: Endianness,
    cached: V,
    state: CacheState,
}

impl<V: RegisterValue, D: BusDevice + ?Sized> Register<V, D> {
    /// Binds `address` on `device`, using the device's byte order.
    pub fn new(device: Arc<D>, address: u8) -> Self {
        let endian = device.endianness();
        Self::with_endianness(device, address, endian)
    }

    pub fn with_endianness(device: Arc<D>, address: u8, endian: Endianness) -> Self {
        Self {
            device,
            address,
            endian,
            cached: V::default(),
            state: CacheState::empty(),
        }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn endianness(&self) -> Endianness {
        self.endian
    }

    pub fn state(&self) -> CacheState {
        self.state
    }

    pub fn is_cached(&self) -> bool {
        self.state.contains(CacheState::VALID)
    }

    pub fn cached(&self) -> Option<V> {
        self.is_cached().then_some(self.cached)
    }

    fn load(&mut self) -> FieldResult<V> {
        let mut buf = [0u8; MAX_ENDIAN_BYTES];
        let bytes = &mut buf[..V::BYTES];
        self.device
            .read(self.address, bytes)
            .map_err(|err| FieldError::transport(self.address, err))?;
        let bits = self.endian.decode(bytes).ok_or(FieldError::InvalidMask {
            mask: V::all_ones(),
            reason: "register width exceeds a word",
        })?;
        let value = V::from_bits(bits);
        log::trace!(
            "{}: read 0x{:02X} -> {value:#x}",
            self.device.name(),
            self.address
        );
        self.cached = value;
        self.state = CacheState::VALID;
        Ok(value)
    }

    fn store(&mut self, value: V) -> FieldResult<()> {
        let bytes = self
            .endian
            .encode(value.to_bits(), V::BYTES)
            .ok_or(FieldError::InvalidMask {
                mask: V::all_ones(),
                reason: "register width exceeds a word",
            })?;
        self.device
            .write(self.address, &bytes)
            .map_err(|err| FieldError::transport(self.address, err))?;
        log::trace!(
            "{}: write 0x{:02X} <- {value:#x}",
            self.device.name(),
            self.address
        );
        Ok(())
    }
}

impl<V: RegisterValue, D: BusDevice + ?Sized> ReadRegister for Register<V, D> {
    type Value = V;

    fn value(&mut self) -> FieldResult<V> {
        if self.is_cached() {
            return Ok(self.cached);
        }
        self.load()
    }

    fn invalidate(&mut self) {
        if self.state.contains(CacheState::DIRTY) {
            log::trace!(
                "{}: dropping unflushed value for 0x{:02X}",
                self.device.name(),
                self.address
            );
        }
        self.state = CacheState::empty();
    }
}

impl<V: RegisterValue, D: BusDevice + ?Sized> fmt::Debug for Register<V, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Register")
            .field("device", &self.device.name())
            .field("address", &format_args!("0x{:02X}", self.address))
            .field("cached", &self.cached())
            .field("state", &self.state)
            .finish()
    }
}

/// Register that also accepts writes. Assigned words are visible to reads
/// immediately and reach the bus on `flush`.
pub struct MutableRegister<V: RegisterValue, D: BusDevice + ?Sized> {
    register: Register<V, D>,
}

impl<V: RegisterValue, D: BusDevice + ?Sized> MutableRegister<V, D> {
    pub fn new(device: Arc<D>, address: u8) -> Self {
        Self {
            register: Register::new(device, address),
        }
    }

    pub fn with_endianness(device: Arc<D>, address: u8, endian: Endianness) -> Self {
        Self {
            register: Register::with_endianness(device, address, endian),
        }
    }

    pub fn address(&self) -> u8 {
        self.register.address()
    }

    pub fn state(&self) -> CacheState {
        self.register.state()
    }

    pub fn cached(&self) -> Option<V> {
        self.register.cached()
    }

    pub fn is_dirty(&self) -> bool {
        self.register.state.contains(CacheState::DIRTY)
    }
}

impl<V: RegisterValue, D: BusDevice + ?Sized> ReadRegister for MutableRegister<V, D> {
    type Value = V;

    fn value(&mut self) -> FieldResult<V> {
        self.register.value()
    }

    fn invalidate(&mut self) {
        self.register.invalidate();
    }
}

impl<V: RegisterValue, D: BusDevice + ?Sized> WriteRegister for MutableRegister<V, D> {
    fn set_value(&mut self, value: V) {
        self.register.cached = value;
        self.register.state = CacheState::VALID | CacheState::DIRTY;
    }

    fn flush(&mut self) -> FieldResult<()> {
        let Some(value) = self.register.cached() else {
            return Ok(());
        };
        self.register.store(value)?;
        self.register.state.remove(CacheState::DIRTY);
        Ok(())
    }
}

impl<V: RegisterValue, D: BusDevice + ?Sized> fmt::Debug for MutableRegister<V, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MutableRegister").field(&self.register).finish()
    }
}
