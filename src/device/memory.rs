//! In-memory register file standing in for a bus device. Every transaction is
//! counted and writes are logged so callers can check how many bus accesses a
//! sequence of field operations costs.
use std::{collections::BTreeSet, sync::Mutex};

use smallvec::SmallVec;

use crate::device::{BusDevice, DeviceError, DeviceResult, Endianness, endianness::MAX_ENDIAN_BYTES};

pub const REGISTER_SPACE: usize = 0x100;

pub type WriteRecord = (u8, SmallVec<[u8; MAX_ENDIAN_BYTES]>);

#[derive(Default)]
struct MemoryState {
    reads: usize,
    writes: usize,
    write_log: Vec<WriteRecord>,
    faults: BTreeSet<u8>,
}

pub struct RegisterMemory {
    name: String,
    bytes: Mutex<Vec<u8>>,
    state: Mutex<MemoryState>,
    endian: Endianness,
}

impl RegisterMemory {
    pub fn new(name: impl Into<String>, endian: Endianness) -> Self {
        Self {
            name: name.into(),
            bytes: Mutex::new(vec![0_u8; REGISTER_SPACE]),
            state: Mutex::new(MemoryState::default()),
            endian,
        }
    }

    /// Stores `data` at `register` without counting a bus transaction, the way
    /// hardware changes state behind the driver's back.
    pub fn poke(&self, register: u8, data: &[u8]) -> DeviceResult<()> {
        let end = check_span(register, data.len())?;
        let mut bytes = self.bytes.lock().map_err(|_| DeviceError::LockPoisoned)?;
        bytes[register as usize..end].copy_from_slice(data);
        Ok(())
    }

    /// Copies `len` bytes at `register` without counting a bus transaction.
    pub fn peek(&self, register: u8, len: usize) -> DeviceResult<Vec<u8>> {
        let end = check_span(register, len)?;
        let bytes = self.bytes.lock().map_err(|_| DeviceError::LockPoisoned)?;
        Ok(bytes[register as usize..end].to_vec())
    }

    /// Makes every later transaction touching `register` fail.
    pub fn fail_at(&self, register: u8) -> DeviceResult<()> {
        self.state()?.faults.insert(register);
        Ok(())
    }

    pub fn clear_faults(&self) -> DeviceResult<()> {
        self.state()?.faults.clear();
        Ok(())
    }

    pub fn reads(&self) -> DeviceResult<usize> {
        Ok(self.state()?.reads)
    }

    pub fn writes(&self) -> DeviceResult<usize> {
        Ok(self.state()?.writes)
    }

    pub fn write_log(&self) -> DeviceResult<Vec<WriteRecord>> {
        Ok(self.state()?.write_log.clone())
    }

    /// Zeroes the transaction counters and empties the write log. Faults stay
    /// armed.
    pub fn reset_counters(&self) -> DeviceResult<()> {
        let mut state = self.state()?;
        state.reads = 0;
        state.writes = 0;
        state.write_log.clear();
        Ok(())
    }

    fn state(&self) -> DeviceResult<std::sync::MutexGuard<'_, MemoryState>> {
        self.state.lock().map_err(|_| DeviceError::LockPoisoned)
    }
}

fn check_span(register: u8, len: usize) -> DeviceResult<usize> {
    let end = register as usize + len;
    if end > REGISTER_SPACE {
        return Err(DeviceError::OutOfRange {
            register,
            len,
            capacity: REGISTER_SPACE,
        });
    }
    Ok(end)
}

impl BusDevice for RegisterMemory {
    fn name(&self) -> &str {
        &self.name
    }

    #[inline(always)]
    fn endianness(&self) -> Endianness {
        self.endian
    }

    fn read(&self, register: u8, out: &mut [u8]) -> DeviceResult<()> {
        let end = check_span(register, out.len())?;
        {
            let mut state = self.state()?;
            if state.faults.contains(&register) {
                return Err(DeviceError::Unsupported("injected read fault"));
            }
            state.reads += 1;
        }
        let bytes = self.bytes.lock().map_err(|_| DeviceError::LockPoisoned)?;
        out.copy_from_slice(&bytes[register as usize..end]);
        Ok(())
    }

    fn write(&self, register: u8, data: &[u8]) -> DeviceResult<()> {
        let end = check_span(register, data.len())?;
        {
            let mut state = self.state()?;
            if state.faults.contains(&register) {
                return Err(DeviceError::Unsupported("injected write fault"));
            }
            state.writes += 1;
            state.write_log.push((register, SmallVec::from_slice(data)));
        }
        let mut bytes = self.bytes.lock().map_err(|_| DeviceError::LockPoisoned)?;
        bytes[register as usize..end].copy_from_slice(data);
        Ok(())
    }
}
