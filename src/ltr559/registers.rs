//! LTR-559 register map. Each struct owns one register and the fields
//! declared over it; multi-byte registers are composed most significant byte
//! first, which puts every mask where the datasheet expects it.

use std::sync::Arc;

use crate::{
    device::BusDevice,
    error::FieldResult,
    field::{Adapted, BitField, BoolField, FieldExt, Focus, LookupField, Split12, SwapBytes},
    register::{MutableRegister, ReadRegister, Register},
};

use super::types::{
    InterruptMode, LightSensorGain, LightSensorIntegrationTime, LightSensorRepeatRate,
    ProximitySensorCurrent, ProximitySensorDutyCycle, ProximitySensorMeasureRate,
    ProximitySensorPulseFrequency,
};

pub(crate) type Flag<W> = BoolField<BitField<W>>;
pub(crate) type Coded<W, T> = LookupField<BitField<W>, T>;
pub(crate) type SwappedHalf = Adapted<Adapted<BitField<u32>, Focus<u32, u16>>, SwapBytes>;
pub(crate) type SplitHalf = Adapted<Adapted<BitField<u32>, Focus<u32, u16>>, Split12>;

pub(crate) const ALS_CONTROL: u8 = 0x80;
pub(crate) const PS_CONTROL: u8 = 0x81;
pub(crate) const PS_LED: u8 = 0x82;
pub(crate) const PS_N_PULSES: u8 = 0x83;
pub(crate) const PS_MEAS_RATE: u8 = 0x84;
pub(crate) const ALS_MEAS_RATE: u8 = 0x85;
pub(crate) const PART_ID: u8 = 0x86;
pub(crate) const MANUFACTURER_ID: u8 = 0x87;
pub(crate) const ALS_DATA: u8 = 0x88;
pub(crate) const ALS_PS_STATUS: u8 = 0x8C;
pub(crate) const PS_DATA: u8 = 0x8D;
pub(crate) const INTERRUPT: u8 = 0x8F;
pub(crate) const PS_THRESHOLD: u8 = 0x90;
pub(crate) const PS_OFFSET: u8 = 0x94;
pub(crate) const ALS_THRESHOLD: u8 = 0x97;
pub(crate) const INTERRUPT_PERSIST: u8 = 0x9E;

pub(crate) struct AlsControl<D: BusDevice + ?Sized> {
    pub(crate) register: MutableRegister<u8, D>,
    pub(crate) gain: Coded<u8, LightSensorGain>,
    pub(crate) software_reset: Flag<u8>,
    pub(crate) active: Flag<u8>,
}

impl<D: BusDevice + ?Sized> AlsControl<D> {
    pub(crate) fn new(device: Arc<D>) -> FieldResult<Self> {
        let register: MutableRegister<u8, D> = MutableRegister::new(device, ALS_CONTROL);
        Ok(Self {
            gain: register.field(0b0001_1100)?.lookup_enum()?,
            software_reset: register.field(0b0000_0010)?.as_boolean()?,
            active: register.field(0b0000_0001)?.as_boolean()?,
            register,
        })
    }
}

pub(crate) struct PsControl<D: BusDevice + ?Sized> {
    pub(crate) register: MutableRegister<u8, D>,
    pub(crate) saturation_indicator: Flag<u8>,
    pub(crate) active: Coded<u8, bool>,
}

impl<D: BusDevice + ?Sized> PsControl<D> {
    pub(crate) fn new(device: Arc<D>) -> FieldResult<Self> {
        let register: MutableRegister<u8, D> = MutableRegister::new(device, PS_CONTROL);
        Ok(Self {
            saturation_indicator: register.field(0b0010_0000)?.as_boolean()?,
            active: register.field(0b0000_0011)?.lookup([(0b00, false), (0b11, true)])?,
            register,
        })
    }
}

pub(crate) struct PsLed<D: BusDevice + ?Sized> {
    pub(crate) register: MutableRegister<u8, D>,
    pub(crate) pulse_frequency: Coded<u8, ProximitySensorPulseFrequency>,
    pub(crate) duty_cycle: Coded<u8, ProximitySensorDutyCycle>,
    pub(crate) current: Coded<u8, ProximitySensorCurrent>,
}

impl<D: BusDevice + ?Sized> PsLed<D> {
    pub(crate) fn new(device: Arc<D>) -> FieldResult<Self> {
        let register: MutableRegister<u8, D> = MutableRegister::new(device, PS_LED);
        Ok(Self {
            pulse_frequency: register.field(0b1110_0000)?.lookup_enum()?,
            duty_cycle: register.field(0b0001_1000)?.lookup_enum()?,
            current: register.field(0b0000_0111)?.lookup_enum()?,
            register,
        })
    }
}

pub(crate) struct PsPulses<D: BusDevice + ?Sized> {
    pub(crate) register: MutableRegister<u8, D>,
    pub(crate) count: BitField<u8>,
}

impl<D: BusDevice + ?Sized> PsPulses<D> {
    pub(crate) const MIN_PULSES: u8 = 1;
    pub(crate) const MAX_PULSES: u8 = 0x0F;

    pub(crate) fn new(device: Arc<D>) -> FieldResult<Self> {
        let register: MutableRegister<u8, D> = MutableRegister::new(device, PS_N_PULSES);
        Ok(Self {
            count: register.field(0b0000_1111)?,
            register,
        })
    }
}

pub(crate) struct PsMeasureRate<D: BusDevice + ?Sized> {
    pub(crate) register: MutableRegister<u8, D>,
    pub(crate) rate: Coded<u8, ProximitySensorMeasureRate>,
}

impl<D: BusDevice + ?Sized> PsMeasureRate<D> {
    pub(crate) fn new(device: Arc<D>) -> FieldResult<Self> {
        let register: MutableRegister<u8, D> = MutableRegister::new(device, PS_MEAS_RATE);
        Ok(Self {
            rate: register.field(0b0000_1111)?.lookup_enum()?,
            register,
        })
    }
}

pub(crate) struct AlsMeasureRate<D: BusDevice + ?Sized> {
    pub(crate) register: MutableRegister<u8, D>,
    pub(crate) integration_time: Coded<u8, LightSensorIntegrationTime>,
    pub(crate) repeat_rate: Coded<u8, LightSensorRepeatRate>,
}

impl<D: BusDevice + ?Sized> AlsMeasureRate<D> {
    pub(crate) fn new(device: Arc<D>) -> FieldResult<Self> {
        let register: MutableRegister<u8, D> = MutableRegister::new(device, ALS_MEAS_RATE);
        Ok(Self {
            integration_time: register.field(0b0011_1000)?.lookup_enum()?,
            repeat_rate: register.field(0b0000_0111)?.lookup_enum()?,
            register,
        })
    }
}

pub(crate) struct PartId<D: BusDevice + ?Sized> {
    pub(crate) register: Register<u8, D>,
    pub(crate) part: BitField<u8>,
    pub(crate) revision: BitField<u8>,
}

impl<D: BusDevice + ?Sized> PartId<D> {
    pub(crate) fn new(device: Arc<D>) -> FieldResult<Self> {
        let register: Register<u8, D> = Register::new(device, PART_ID);
        Ok(Self {
            part: register.field(0xF0)?,
            revision: register.field(0x0F)?,
            register,
        })
    }
}

pub(crate) struct ManufacturerId<D: BusDevice + ?Sized> {
    pub(crate) register: Register<u8, D>,
    pub(crate) id: BitField<u8>,
}

impl<D: BusDevice + ?Sized> ManufacturerId<D> {
    pub(crate) fn new(device: Arc<D>) -> FieldResult<Self> {
        let register: Register<u8, D> = Register::new(device, MANUFACTURER_ID);
        Ok(Self {
            id: register.field(0xFF)?,
            register,
        })
    }
}

pub(crate) struct AlsData<D: BusDevice + ?Sized> {
    pub(crate) register: Register<u32, D>,
    pub(crate) ch1: SwappedHalf,
    pub(crate) ch0: SwappedHalf,
}

impl<D: BusDevice + ?Sized> AlsData<D> {
    pub(crate) fn new(device: Arc<D>) -> FieldResult<Self> {
        let register: Register<u32, D> = Register::new(device, ALS_DATA);
        Ok(Self {
            ch1: register.field(0xFFFF_0000)?.as_short().swap_bytes(),
            ch0: register.field(0x0000_FFFF)?.as_short().swap_bytes(),
            register,
        })
    }
}

pub(crate) struct AlsPsStatus<D: BusDevice + ?Sized> {
    pub(crate) register: Register<u8, D>,
    pub(crate) light_data_valid: Flag<u8>,
    pub(crate) light_gain: Coded<u8, LightSensorGain>,
    pub(crate) light_interrupt: Flag<u8>,
    pub(crate) light_data: Flag<u8>,
    pub(crate) proximity_interrupt: Flag<u8>,
    pub(crate) proximity_data: Flag<u8>,
}

impl<D: BusDevice + ?Sized> AlsPsStatus<D> {
    pub(crate) fn new(device: Arc<D>) -> FieldResult<Self> {
        let register: Register<u8, D> = Register::new(device, ALS_PS_STATUS);
        Ok(Self {
            light_data_valid: register.field(0b1000_0000)?.as_boolean()?,
            light_gain: register.field(0b0111_0000)?.lookup_enum()?,
            light_interrupt: register.field(0b0000_1000)?.as_boolean()?,
            light_data: register.field(0b0000_0100)?.as_boolean()?,
            proximity_interrupt: register.field(0b0000_0010)?.as_boolean()?,
            proximity_data: register.field(0b0000_0001)?.as_boolean()?,
            register,
        })
    }
}

pub(crate) struct PsData<D: BusDevice + ?Sized> {
    pub(crate) register: Register<u16, D>,
    pub(crate) ch0: Adapted<BitField<u16>, Split12>,
    pub(crate) saturation: Flag<u16>,
}

impl<D: BusDevice + ?Sized> PsData<D> {
    pub(crate) fn new(device: Arc<D>) -> FieldResult<Self> {
        let register: Register<u16, D> = Register::new(device, PS_DATA);
        Ok(Self {
            ch0: register.field(0xFF0F)?.bit12(),
            saturation: register.field(0x0080)?.as_boolean()?,
            register,
        })
    }
}

pub(crate) struct Interrupt<D: BusDevice + ?Sized> {
    pub(crate) register: MutableRegister<u8, D>,
    pub(crate) active_high: Flag<u8>,
    pub(crate) mode: Coded<u8, InterruptMode>,
}

impl<D: BusDevice + ?Sized> Interrupt<D> {
    pub(crate) fn new(device: Arc<D>) -> FieldResult<Self> {
        let register: MutableRegister<u8, D> = MutableRegister::new(device, INTERRUPT);
        Ok(Self {
            active_high: register.field(0b0000_0100)?.as_boolean()?,
            mode: register.field(0b0000_0011)?.lookup_enum()?,
            register,
        })
    }
}

pub(crate) struct PsThreshold<D: BusDevice + ?Sized> {
    pub(crate) register: MutableRegister<u32, D>,
    pub(crate) upper: SplitHalf,
    pub(crate) lower: SplitHalf,
}

impl<D: BusDevice + ?Sized> PsThreshold<D> {
    pub(crate) fn new(device: Arc<D>) -> FieldResult<Self> {
        let register: MutableRegister<u32, D> = MutableRegister::new(device, PS_THRESHOLD);
        Ok(Self {
            upper: register.field(0xFF0F_0000)?.as_short().bit12(),
            lower: register.field(0x0000_FF0F)?.as_short().bit12(),
            register,
        })
    }
}

pub(crate) struct PsOffset<D: BusDevice + ?Sized> {
    pub(crate) register: MutableRegister<u16, D>,
    pub(crate) offset: BitField<u16>,
}

impl<D: BusDevice + ?Sized> PsOffset<D> {
    pub(crate) const MAX_OFFSET: u16 = 0x03FF;

    pub(crate) fn new(device: Arc<D>) -> FieldResult<Self> {
        let register: MutableRegister<u16, D> = MutableRegister::new(device, PS_OFFSET);
        Ok(Self {
            offset: register.field(Self::MAX_OFFSET)?,
            register,
        })
    }
}

pub(crate) struct AlsThreshold<D: BusDevice + ?Sized> {
    pub(crate) register: MutableRegister<u32, D>,
    pub(crate) upper: SwappedHalf,
    pub(crate) lower: SwappedHalf,
}

impl<D: BusDevice + ?Sized> AlsThreshold<D> {
    pub(crate) fn new(device: Arc<D>) -> FieldResult<Self> {
        let register: MutableRegister<u32, D> = MutableRegister::new(device, ALS_THRESHOLD);
        Ok(Self {
            upper: register.field(0xFFFF_0000)?.as_short().swap_bytes(),
            lower: register.field(0x0000_FFFF)?.as_short().swap_bytes(),
            register,
        })
    }
}

pub(crate) struct InterruptPersist<D: BusDevice + ?Sized> {
    pub(crate) register: MutableRegister<u8, D>,
    pub(crate) proximity: BitField<u8>,
    pub(crate) light: BitField<u8>,
}

impl<D: BusDevice + ?Sized> InterruptPersist<D> {
    pub(crate) const MAX_COUNT: u8 = 0x0F;

    pub(crate) fn new(device: Arc<D>) -> FieldResult<Self> {
        let register: MutableRegister<u8, D> = MutableRegister::new(device, INTERRUPT_PERSIST);
        Ok(Self {
            proximity: register.field(0xF0)?,
            light: register.field(0x0F)?,
            register,
        })
    }
}
