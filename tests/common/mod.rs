#![allow(dead_code)]

use std::sync::Mutex;

use embedded_hal::{
    delay::DelayNs,
    i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation},
};
use regfield::{BusDevice, DeviceResult, Endianness, RegisterMemory};

pub const ALS_CONTROL: u8 = 0x80;
const SOFTWARE_RESET: u8 = 0b0000_0010;

/// Delay that only keeps count of the time it was asked to wait.
#[derive(Default)]
pub struct CountingDelay {
    pub elapsed_ms: u32,
}

impl DelayNs for CountingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.elapsed_ms += ns / 1_000_000;
    }

    fn delay_ms(&mut self, ms: u32) {
        self.elapsed_ms += ms;
    }
}

/// LTR-559 register file whose software reset bit stays set for a fixed
/// number of polls before the part restores its control register.
pub struct SimulatedLtr559 {
    pub memory: RegisterMemory,
    reset_polls: usize,
    pending: Mutex<Option<usize>>,
}

impl SimulatedLtr559 {
    pub fn new(reset_polls: usize) -> Self {
        let memory = RegisterMemory::new("ltr559-sim", Endianness::Big);
        memory.poke(0x86, &[0x92]).expect("part id");
        memory.poke(0x87, &[0x05]).expect("manufacturer id");
        Self {
            memory,
            reset_polls,
            pending: Mutex::new(None),
        }
    }

    pub fn byte(&self, register: u8) -> u8 {
        self.memory.peek(register, 1).expect("peek")[0]
    }

    pub fn bytes(&self, register: u8, len: usize) -> Vec<u8> {
        self.memory.peek(register, len).expect("peek")
    }
}

impl BusDevice for SimulatedLtr559 {
    fn name(&self) -> &str {
        self.memory.name()
    }

    fn read(&self, register: u8, out: &mut [u8]) -> DeviceResult<()> {
        if register == ALS_CONTROL {
            let mut pending = self.pending.lock().expect("reset state");
            match *pending {
                Some(0) => {
                    self.memory.poke(ALS_CONTROL, &[0x00])?;
                    *pending = None;
                }
                Some(left) => *pending = Some(left - 1),
                None => {}
            }
        }
        self.memory.read(register, out)
    }

    fn write(&self, register: u8, data: &[u8]) -> DeviceResult<()> {
        if register == ALS_CONTROL && data.first().is_some_and(|b| b & SOFTWARE_RESET != 0) {
            *self.pending.lock().expect("reset state") = Some(self.reset_polls);
        }
        self.memory.write(register, data)
    }
}

#[derive(Debug)]
pub struct Nack;

impl embedded_hal::i2c::Error for Nack {
    fn kind(&self) -> ErrorKind {
        ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)
    }
}

/// I2C target with a 256-byte register bank and an auto-incrementing
/// register pointer, the way most sensor parts behave.
pub struct RegisterBus {
    pub address: u8,
    pub bank: [u8; 256],
    pointer: u8,
    pub transactions: usize,
}

impl RegisterBus {
    pub fn new(address: u8) -> Self {
        Self {
            address,
            bank: [0; 256],
            pointer: 0,
            transactions: 0,
        }
    }
}

impl ErrorType for RegisterBus {
    type Error = Nack;
}

impl I2c for RegisterBus {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if address != self.address {
            return Err(Nack);
        }
        self.transactions += 1;
        for op in operations {
            match op {
                Operation::Write(bytes) => {
                    let Some((&pointer, payload)) = bytes.split_first() else {
                        continue;
                    };
                    self.pointer = pointer;
                    for byte in payload.iter() {
                        self.bank[self.pointer as usize] = *byte;
                        self.pointer = self.pointer.wrapping_add(1);
                    }
                }
                Operation::Read(buf) => {
                    for byte in buf.iter_mut() {
                        *byte = self.bank[self.pointer as usize];
                        self.pointer = self.pointer.wrapping_add(1);
                    }
                }
            }
        }
        Ok(())
    }
}
