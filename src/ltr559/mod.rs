//! LTR-559 ambient light and proximity sensor, expressed entirely as cached
//! registers and field adapters. Lux conversion is left to the caller; the
//! driver exposes raw channel counts.

pub mod error;
mod registers;
pub mod types;

use std::sync::Arc;

use embedded_hal::delay::DelayNs;

use crate::{
    device::BusDevice,
    field::{Field, Split12},
    register::{ReadRegister, WriteRegister},
};

pub use error::{Ltr559Error, Ltr559Result};
pub use types::{
    InterruptMode, LightChannels, LightSensorGain, LightSensorIntegrationTime,
    LightSensorRepeatRate, Ltr559Config, Proximity, ProximitySensorCurrent,
    ProximitySensorDutyCycle, ProximitySensorMeasureRate, ProximitySensorPulseFrequency, Status,
};

use registers::{
    AlsControl, AlsData, AlsMeasureRate, AlsPsStatus, AlsThreshold, Interrupt, InterruptPersist,
    ManufacturerId, PartId, PsControl, PsData, PsLed, PsMeasureRate, PsOffset, PsPulses,
    PsThreshold,
};

pub const I2C_ADDRESS: u8 = 0x23;
pub const PART_ID: u8 = 0x09;
pub const REVISION_ID: u8 = 0x02;
pub const MANUFACTURER_ID: u8 = 0x05;

const RESET_POLL_MS: u32 = 5;

pub struct Ltr559<D: BusDevice + ?Sized> {
    als_control: AlsControl<D>,
    ps_control: PsControl<D>,
    ps_led: PsLed<D>,
    ps_pulses: PsPulses<D>,
    ps_measure_rate: PsMeasureRate<D>,
    als_measure_rate: AlsMeasureRate<D>,
    part_id: PartId<D>,
    manufacturer_id: ManufacturerId<D>,
    als_data: AlsData<D>,
    status: AlsPsStatus<D>,
    ps_data: PsData<D>,
    interrupt: Interrupt<D>,
    ps_threshold: PsThreshold<D>,
    ps_offset: PsOffset<D>,
    als_threshold: AlsThreshold<D>,
    interrupt_persist: InterruptPersist<D>,
}

impl<D: BusDevice + ?Sized> Ltr559<D> {
    /// Declares the register map on `device`. No bus traffic happens until
    /// the first read or [`initialise`](Self::initialise).
    pub fn new(device: Arc<D>) -> Ltr559Result<Self> {
        Ok(Self {
            als_control: AlsControl::new(device.clone())?,
            ps_control: PsControl::new(device.clone())?,
            ps_led: PsLed::new(device.clone())?,
            ps_pulses: PsPulses::new(device.clone())?,
            ps_measure_rate: PsMeasureRate::new(device.clone())?,
            als_measure_rate: AlsMeasureRate::new(device.clone())?,
            part_id: PartId::new(device.clone())?,
            manufacturer_id: ManufacturerId::new(device.clone())?,
            als_data: AlsData::new(device.clone())?,
            status: AlsPsStatus::new(device.clone())?,
            ps_data: PsData::new(device.clone())?,
            interrupt: Interrupt::new(device.clone())?,
            ps_threshold: PsThreshold::new(device.clone())?,
            ps_offset: PsOffset::new(device.clone())?,
            als_threshold: AlsThreshold::new(device.clone())?,
            interrupt_persist: InterruptPersist::new(device)?,
        })
    }

    /// Checks the part identity, resets the sensor and applies `config`.
    pub fn initialise(&mut self, delay: &mut impl DelayNs, config: &Ltr559Config) -> Ltr559Result<()> {
        self.check_identity()?;
        self.software_reset(delay, config.reset_timeout_ms)?;

        // The interrupt register only takes effect while the sensors are in
        // standby, so it goes first.
        self.set_interrupt_mode(config.interrupt_mode, config.interrupt_active_high)?;
        self.set_proximity_led(
            config.led_current,
            config.led_duty_cycle,
            config.led_pulse_frequency,
            config.led_pulses,
        )?;
        self.set_light_options(true, config.gain)?;
        self.set_proximity_active(true, true)?;
        self.set_proximity_rate(config.proximity_rate)?;
        self.set_light_measurement(config.integration_time, config.repeat_rate)?;
        self.set_light_threshold(0x0000, 0xFFFF)?;
        self.set_proximity_threshold(0x0000, Split12::MAX)?;
        self.set_proximity_offset(0)?;
        log::debug!("ltr559: initialised with {config:?}");
        Ok(())
    }

    /// Part number and silicon revision.
    pub fn part_info(&mut self) -> Ltr559Result<(u8, u8)> {
        let PartId {
            register,
            part,
            revision,
        } = &mut self.part_id;
        Ok(register.scoped_read(|r| Ok((part.get(r)?, revision.get(r)?)))?)
    }

    pub fn manufacturer_id(&mut self) -> Ltr559Result<u8> {
        let ManufacturerId { register, id } = &mut self.manufacturer_id;
        Ok(register.scoped_read(|r| id.get(r))?)
    }

    fn check_identity(&mut self) -> Ltr559Result<()> {
        let (part, revision) = self.part_info()?;
        expect_id(registers::PART_ID, PART_ID, part)?;
        expect_id(registers::PART_ID, REVISION_ID, revision)?;
        let manufacturer = self.manufacturer_id()?;
        expect_id(registers::MANUFACTURER_ID, MANUFACTURER_ID, manufacturer)
    }

    fn software_reset(&mut self, delay: &mut impl DelayNs, timeout_ms: u32) -> Ltr559Result<()> {
        let AlsControl {
            register,
            software_reset,
            ..
        } = &mut self.als_control;
        register.scoped_write(|r| software_reset.set(r, true))?;

        let mut waited_ms = 0;
        loop {
            delay.delay_ms(RESET_POLL_MS);
            waited_ms += RESET_POLL_MS;
            register.invalidate();
            if !software_reset.get(register)? {
                log::debug!("ltr559: software reset cleared after {waited_ms} ms");
                return Ok(());
            }
            if waited_ms >= timeout_ms {
                log::warn!("ltr559: software reset still pending after {waited_ms} ms");
                return Err(Ltr559Error::ResetTimeout { waited_ms });
            }
        }
    }

    /// Reads ALS_PS_STATUS once and decodes every flag from that snapshot.
    pub fn status(&mut self) -> Ltr559Result<Status> {
        let AlsPsStatus {
            register,
            light_data_valid,
            light_gain,
            light_interrupt,
            light_data,
            proximity_interrupt,
            proximity_data,
        } = &mut self.status;
        let status = register.scoped_read(|r| {
            Ok(Status {
                light_data_valid: light_data_valid.get(r)?,
                light_gain: light_gain.get(r)?,
                light_interrupt: light_interrupt.get(r)?,
                light_data_ready: light_data.get(r)?,
                proximity_interrupt: proximity_interrupt.get(r)?,
                proximity_data_ready: proximity_data.get(r)?,
            })
        })?;
        log::trace!("ltr559: {status:?}");
        Ok(status)
    }

    /// Both ALS channels from one four-byte read, so they belong to the same
    /// measurement.
    pub fn light_channels(&mut self) -> Ltr559Result<LightChannels> {
        let AlsData { register, ch0, ch1 } = &mut self.als_data;
        Ok(register.scoped_read(|r| {
            Ok(LightChannels {
                ch0: ch0.get(r)?,
                ch1: ch1.get(r)?,
            })
        })?)
    }

    pub fn proximity(&mut self) -> Ltr559Result<Proximity> {
        let PsData {
            register,
            ch0,
            saturation,
        } = &mut self.ps_data;
        Ok(register.scoped_read(|r| {
            Ok(Proximity {
                count: ch0.get(r)?,
                saturated: saturation.get(r)?,
            })
        })?)
    }

    /// Readings outside `lower..=upper` raise the light interrupt.
    pub fn set_light_threshold(&mut self, lower: u16, upper: u16) -> Ltr559Result<()> {
        let AlsThreshold {
            register,
            upper: upper_field,
            lower: lower_field,
        } = &mut self.als_threshold;
        register.scoped_write(|r| {
            lower_field.set(r, lower)?;
            upper_field.set(r, upper)
        })?;
        Ok(())
    }

    /// Readings outside `lower..=upper` raise the proximity interrupt. Both
    /// bounds are twelve-bit counts.
    pub fn set_proximity_threshold(&mut self, lower: u16, upper: u16) -> Ltr559Result<()> {
        check_setting("proximity threshold", lower.into(), Split12::MAX.into())?;
        check_setting("proximity threshold", upper.into(), Split12::MAX.into())?;
        let PsThreshold {
            register,
            upper: upper_field,
            lower: lower_field,
        } = &mut self.ps_threshold;
        register.scoped_write(|r| {
            lower_field.set(r, lower)?;
            upper_field.set(r, upper)
        })?;
        Ok(())
    }

    /// Compensation subtracted from every proximity reading, 0 to 1023.
    pub fn set_proximity_offset(&mut self, offset: u16) -> Ltr559Result<()> {
        check_setting(
            "proximity offset",
            offset.into(),
            PsOffset::<D>::MAX_OFFSET.into(),
        )?;
        let PsOffset {
            register,
            offset: field,
        } = &mut self.ps_offset;
        register.scoped_write(|r| field.set(r, offset))?;
        Ok(())
    }

    pub fn set_interrupt_mode(&mut self, mode: InterruptMode, active_high: bool) -> Ltr559Result<()> {
        let Interrupt {
            register,
            active_high: polarity,
            mode: mode_field,
        } = &mut self.interrupt;
        register.scoped_write(|r| {
            polarity.set(r, active_high)?;
            mode_field.set(r, mode)
        })?;
        Ok(())
    }

    /// Switches the light sensor between active and standby and sets its gain.
    pub fn set_light_options(&mut self, active: bool, gain: LightSensorGain) -> Ltr559Result<()> {
        let AlsControl {
            register,
            gain: gain_field,
            active: active_field,
            ..
        } = &mut self.als_control;
        register.scoped_write(|r| {
            active_field.set(r, active)?;
            gain_field.set(r, gain)
        })?;
        Ok(())
    }

    /// The sensor raises the repeat rate to the integration time when the
    /// repeat rate is shorter.
    pub fn set_light_measurement(
        &mut self,
        integration_time: LightSensorIntegrationTime,
        repeat_rate: LightSensorRepeatRate,
    ) -> Ltr559Result<()> {
        let AlsMeasureRate {
            register,
            integration_time: integration_field,
            repeat_rate: repeat_field,
        } = &mut self.als_measure_rate;
        register.scoped_write(|r| {
            integration_field.set(r, integration_time)?;
            repeat_field.set(r, repeat_rate)
        })?;
        Ok(())
    }

    pub fn set_proximity_rate(&mut self, rate: ProximitySensorMeasureRate) -> Ltr559Result<()> {
        let PsMeasureRate {
            register,
            rate: field,
        } = &mut self.ps_measure_rate;
        register.scoped_write(|r| field.set(r, rate))?;
        Ok(())
    }

    pub fn set_proximity_active(&mut self, active: bool, saturation_indicator: bool) -> Ltr559Result<()> {
        let PsControl {
            register,
            saturation_indicator: indicator_field,
            active: active_field,
        } = &mut self.ps_control;
        register.scoped_write(|r| {
            active_field.set(r, active)?;
            indicator_field.set(r, saturation_indicator)
        })?;
        Ok(())
    }

    /// LED drive settings and the number of pulses per measurement (1 to 15).
    ///
    /// The drive settings and the pulse count live in separate registers. When
    /// the pulse write fails the drive settings may already be applied.
    pub fn set_proximity_led(
        &mut self,
        current: ProximitySensorCurrent,
        duty_cycle: ProximitySensorDutyCycle,
        pulse_frequency: ProximitySensorPulseFrequency,
        pulses: u8,
    ) -> Ltr559Result<()> {
        check_range(
            "proximity LED pulses",
            pulses.into(),
            PsPulses::<D>::MIN_PULSES.into(),
            PsPulses::<D>::MAX_PULSES.into(),
        )?;
        let PsLed {
            register,
            pulse_frequency: frequency_field,
            duty_cycle: duty_field,
            current: current_field,
        } = &mut self.ps_led;
        register.scoped_write(|r| {
            current_field.set(r, current)?;
            duty_field.set(r, duty_cycle)?;
            frequency_field.set(r, pulse_frequency)
        })?;

        let PsPulses { register, count } = &mut self.ps_pulses;
        register.scoped_write(|r| count.set(r, pulses))?;
        Ok(())
    }

    /// Consecutive out-of-range readings needed before each interrupt fires,
    /// 0 to 15.
    pub fn set_interrupt_persist(&mut self, proximity: u8, light: u8) -> Ltr559Result<()> {
        let max = InterruptPersist::<D>::MAX_COUNT.into();
        check_setting("proximity interrupt persist", proximity.into(), max)?;
        check_setting("light interrupt persist", light.into(), max)?;
        let InterruptPersist {
            register,
            proximity: proximity_field,
            light: light_field,
        } = &mut self.interrupt_persist;
        register.scoped_write(|r| {
            proximity_field.set(r, proximity)?;
            light_field.set(r, light)
        })?;
        Ok(())
    }
}

fn expect_id(register: u8, expected: u8, found: u8) -> Ltr559Result<()> {
    if found != expected {
        return Err(Ltr559Error::UnexpectedDevice {
            register,
            expected,
            found,
        });
    }
    Ok(())
}

fn check_setting(setting: &'static str, value: u32, max: u32) -> Ltr559Result<()> {
    check_range(setting, value, 0, max)
}

fn check_range(setting: &'static str, value: u32, min: u32, max: u32) -> Ltr559Result<()> {
    if !(min..=max).contains(&value) {
        return Err(Ltr559Error::SettingOutOfRange {
            setting,
            value,
            min,
            max,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;
    use crate::{
        device::{Endianness, RegisterMemory},
        error::FieldError,
    };

    #[derive(Default)]
    struct CountingDelay {
        elapsed_ms: u32,
    }

    impl DelayNs for CountingDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.elapsed_ms += ns / 1_000_000;
        }

        fn delay_ms(&mut self, ms: u32) {
            self.elapsed_ms += ms;
        }
    }

    fn sensor() -> (Arc<RegisterMemory>, Ltr559<RegisterMemory>) {
        let mem = Arc::new(RegisterMemory::new("ltr559", Endianness::Big));
        mem.poke(registers::PART_ID, &[0x92]).expect("seed part id");
        mem.poke(registers::MANUFACTURER_ID, &[MANUFACTURER_ID]).expect("seed manufacturer");
        let ltr = Ltr559::new(mem.clone()).expect("register map");
        (mem, ltr)
    }

    #[test]
    fn declaring_the_register_map_touches_no_bus() {
        let (mem, _ltr) = sensor();
        assert_eq!((mem.reads().expect("reads"), mem.writes().expect("writes")), (0, 0), "construction is lazy");
    }

    #[test]
    fn part_info_splits_the_identity_register() {
        let (mem, mut ltr) = sensor();
        assert_eq!(ltr.part_info().expect("part info"), (PART_ID, REVISION_ID), "nibbles");
        assert_eq!(mem.reads().expect("reads"), 1, "both nibbles from one read");
        assert_eq!(ltr.manufacturer_id().expect("manufacturer"), MANUFACTURER_ID, "id byte");
    }

    #[test]
    fn foreign_parts_are_rejected_before_reset() {
        let (mem, mut ltr) = sensor();
        mem.poke(registers::PART_ID, &[0xA2]).expect("foreign part");
        let err = ltr
            .initialise(&mut CountingDelay::default(), &Ltr559Config::default())
            .expect_err("wrong part");
        assert!(
            matches!(
                err,
                Ltr559Error::UnexpectedDevice {
                    register: 0x86,
                    expected: PART_ID,
                    found: 0x0A
                }
            ),
            "identity mismatch reported, got {err:?}"
        );
        assert_eq!(mem.writes().expect("writes"), 0, "nothing written to a foreign device");
    }

    #[test]
    fn stuck_reset_times_out() {
        let (mem, mut ltr) = sensor();
        let mut delay = CountingDelay::default();
        let config = Ltr559Config {
            reset_timeout_ms: 20,
            ..Ltr559Config::default()
        };
        let err = ltr.initialise(&mut delay, &config).expect_err("reset never clears");
        assert!(
            matches!(err, Ltr559Error::ResetTimeout { waited_ms: 20 }),
            "timeout reported, got {err:?}"
        );
        assert_eq!(delay.elapsed_ms, 20, "polled every 5 ms until the deadline");
        assert_eq!(mem.peek(registers::ALS_CONTROL, 1).expect("peek"), vec![0x02], "reset bit written");
    }

    #[test]
    fn status_decodes_one_snapshot() {
        let (mem, mut ltr) = sensor();
        mem.poke(registers::ALS_PS_STATUS, &[0b1010_0101]).expect("seed");
        let status = ltr.status().expect("status");
        assert_eq!(
            status,
            Status {
                light_data_valid: true,
                light_gain: LightSensorGain::X4,
                light_interrupt: false,
                light_data_ready: true,
                proximity_interrupt: false,
                proximity_data_ready: true,
            },
            "every flag decoded"
        );
        assert!(status.light_pending() && status.proximity_pending(), "both sensors pending");
        assert_eq!(mem.reads().expect("reads"), 1, "one bus read for six fields");
    }

    #[test]
    fn channel_and_proximity_readings_decode() {
        let (mem, mut ltr) = sensor();
        mem.poke(registers::ALS_DATA, &hex!("3412 7856")).expect("seed als");
        mem.poke(registers::PS_DATA, &hex!("F383")).expect("seed ps");
        assert_eq!(
            ltr.light_channels().expect("channels"),
            LightChannels {
                ch0: 0x5678,
                ch1: 0x1234
            },
            "little endian channel pairs"
        );
        assert_eq!(
            ltr.proximity().expect("proximity"),
            Proximity {
                count: 0x3F3,
                saturated: true
            },
            "split count and saturation bit"
        );
    }

    #[test]
    fn thresholds_are_written_in_one_transaction() {
        let (mem, mut ltr) = sensor();
        ltr.set_proximity_threshold(0x123, 0xABC).expect("ps threshold");
        ltr.set_light_threshold(0x0102, 0xA0B0).expect("als threshold");
        assert_eq!(mem.peek(registers::PS_THRESHOLD, 4).expect("peek"), hex!("BC0A 2301").to_vec(), "split halves");
        assert_eq!(mem.peek(registers::ALS_THRESHOLD, 4).expect("peek"), hex!("B0A0 0201").to_vec(), "swapped halves");
        assert_eq!(mem.writes().expect("writes"), 2, "one write per register");
    }

    #[test]
    fn out_of_range_settings_never_reach_the_bus() {
        let (mem, mut ltr) = sensor();
        let err = ltr.set_proximity_offset(0x400).expect_err("offset too large");
        assert!(
            matches!(err, Ltr559Error::SettingOutOfRange { value: 0x400, max: 0x3FF, .. }),
            "offset bound, got {err:?}"
        );
        assert!(ltr.set_proximity_threshold(0, 0x1000).is_err(), "thirteen-bit threshold");
        assert!(ltr.set_interrupt_persist(16, 0).is_err(), "persist count bound");
        assert_eq!(mem.writes().expect("writes"), 0, "rejected before any access");
        ltr.set_proximity_offset(0x2AB).expect("offset");
        assert_eq!(mem.peek(registers::PS_OFFSET, 2).expect("peek"), hex!("02AB").to_vec(), "ten-bit offset");
    }

    #[test]
    fn led_settings_merge_into_their_registers() {
        let (mem, mut ltr) = sensor();
        ltr.set_proximity_led(
            ProximitySensorCurrent::Ma100,
            ProximitySensorDutyCycle::Percent50,
            ProximitySensorPulseFrequency::Khz100,
            4,
        )
        .expect("led");
        ltr.set_interrupt_persist(0x3, 0xA).expect("persist");
        assert_eq!(mem.peek(registers::PS_LED, 1).expect("peek"), vec![0b1110_1100], "led byte");
        assert_eq!(mem.peek(registers::PS_N_PULSES, 1).expect("peek"), vec![0x04], "pulses");
        assert_eq!(mem.peek(registers::INTERRUPT_PERSIST, 1).expect("peek"), vec![0x3A], "persist");
    }

    #[test]
    fn led_needs_at_least_one_pulse() {
        let (mem, mut ltr) = sensor();
        let err = ltr
            .set_proximity_led(
                ProximitySensorCurrent::Ma50,
                ProximitySensorDutyCycle::Percent100,
                ProximitySensorPulseFrequency::Khz30,
                0,
            )
            .expect_err("zero pulses");
        assert!(
            matches!(err, Ltr559Error::SettingOutOfRange { value: 0, min: 1, max: 15, .. }),
            "pulse bounds, got {err:?}"
        );
        assert_eq!(mem.writes().expect("writes"), 0, "rejected before any access");
    }

    #[test]
    fn led_drive_stays_applied_when_the_pulse_write_fails() {
        let (mem, mut ltr) = sensor();
        mem.fail_at(registers::PS_N_PULSES).expect("arm fault");
        let err = ltr
            .set_proximity_led(
                ProximitySensorCurrent::Ma100,
                ProximitySensorDutyCycle::Percent50,
                ProximitySensorPulseFrequency::Khz100,
                4,
            )
            .expect_err("pulse register fails");
        assert!(
            matches!(err, Ltr559Error::Field(FieldError::Transport { register: registers::PS_N_PULSES, .. })),
            "failing register reported, got {err:?}"
        );
        assert_eq!(mem.peek(registers::PS_LED, 1).expect("peek"), vec![0b1110_1100], "drive byte committed");
    }
}
