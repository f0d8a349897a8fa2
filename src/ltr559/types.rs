use crate::field_mapping;

field_mapping! {
    /// Light sensor gain. Higher gains trade range for resolution.
    pub enum LightSensorGain {
        /// 1 to 64k lux.
        X1 = 0b000,
        /// 0.5 to 32k lux.
        X2 = 0b001,
        /// 0.25 to 16k lux.
        X4 = 0b010,
        /// 0.125 to 8k lux.
        X8 = 0b011,
        /// 0.02 to 1.3k lux.
        X48 = 0b110,
        /// 0.01 to 600 lux.
        X96 = 0b111,
    }
}

field_mapping! {
    /// Time spent on each light measurement. Must not exceed the repeat rate.
    pub enum LightSensorIntegrationTime {
        Ms100 = 0b000,
        Ms50 = 0b001,
        Ms200 = 0b010,
        Ms400 = 0b011,
        Ms150 = 0b100,
        Ms250 = 0b101,
        Ms300 = 0b110,
        Ms350 = 0b111,
    }
}

field_mapping! {
    /// Interval between light measurements.
    pub enum LightSensorRepeatRate {
        Ms50 = 0b000,
        Ms100 = 0b001,
        Ms200 = 0b010,
        Ms500 = 0b011,
        Ms1000 = 0b100,
        Ms2000 = 0b101,
    }
}

field_mapping! {
    /// Interval between proximity measurements.
    pub enum ProximitySensorMeasureRate {
        Ms10 = 0b1000,
        Ms50 = 0b0000,
        Ms70 = 0b0001,
        Ms100 = 0b0010,
        Ms200 = 0b0011,
        Ms500 = 0b0100,
        Ms1000 = 0b0101,
        Ms2000 = 0b0110,
    }
}

field_mapping! {
    pub enum ProximitySensorPulseFrequency {
        Khz30 = 0b000,
        Khz40 = 0b001,
        Khz50 = 0b010,
        Khz60 = 0b011,
        Khz70 = 0b100,
        Khz80 = 0b101,
        Khz90 = 0b110,
        Khz100 = 0b111,
    }
}

field_mapping! {
    pub enum ProximitySensorDutyCycle {
        Percent25 = 0b00,
        Percent50 = 0b01,
        Percent75 = 0b10,
        Percent100 = 0b11,
    }
}

field_mapping! {
    /// Proximity LED drive current.
    pub enum ProximitySensorCurrent {
        Ma5 = 0b000,
        Ma10 = 0b001,
        Ma20 = 0b010,
        Ma50 = 0b011,
        Ma100 = 0b100,
    }
}

field_mapping! {
    /// Which sensors drive the interrupt pin.
    pub enum InterruptMode {
        Off = 0b00,
        Proximity = 0b01,
        Light = 0b10,
        ProximityAndLight = 0b11,
    }
}

/// Settings applied by [`Ltr559::initialise`](super::Ltr559::initialise).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ltr559Config {
    pub gain: LightSensorGain,
    pub integration_time: LightSensorIntegrationTime,
    pub repeat_rate: LightSensorRepeatRate,
    pub proximity_rate: ProximitySensorMeasureRate,
    pub led_current: ProximitySensorCurrent,
    pub led_duty_cycle: ProximitySensorDutyCycle,
    pub led_pulse_frequency: ProximitySensorPulseFrequency,
    /// LED pulses per proximity measurement, 1 to 15.
    pub led_pulses: u8,
    pub interrupt_mode: InterruptMode,
    pub interrupt_active_high: bool,
    /// Upper bound on waiting for the software reset to clear.
    pub reset_timeout_ms: u32,
}

impl Default for Ltr559Config {
    fn default() -> Self {
        Self {
            gain: LightSensorGain::X4,
            integration_time: LightSensorIntegrationTime::Ms50,
            repeat_rate: LightSensorRepeatRate::Ms50,
            proximity_rate: ProximitySensorMeasureRate::Ms100,
            led_current: ProximitySensorCurrent::Ma50,
            led_duty_cycle: ProximitySensorDutyCycle::Percent100,
            led_pulse_frequency: ProximitySensorPulseFrequency::Khz30,
            led_pulses: 1,
            interrupt_mode: InterruptMode::Off,
            interrupt_active_high: false,
            reset_timeout_ms: 5_000,
        }
    }
}

/// Snapshot of the ALS_PS_STATUS register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status {
    pub light_data_valid: bool,
    pub light_gain: LightSensorGain,
    pub light_interrupt: bool,
    pub light_data_ready: bool,
    pub proximity_interrupt: bool,
    pub proximity_data_ready: bool,
}

impl Status {
    pub fn light_pending(&self) -> bool {
        self.light_interrupt || self.light_data_ready
    }

    pub fn proximity_pending(&self) -> bool {
        self.proximity_interrupt || self.proximity_data_ready
    }
}

/// Raw ALS counts. Channel 0 sees visible and infrared light, channel 1 only
/// infrared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LightChannels {
    pub ch0: u16,
    pub ch1: u16,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Proximity {
    /// Twelve-bit count; closer objects read higher.
    pub count: u16,
    pub saturated: bool,
}
