/*
Copyright (c) 2025 bmi160 contributors
LICENSE: BSD3 (see LICENSE file)
*/

//! Driver for the Bosch BMI160 inertial measurement unit.
//!
//! The sensor is reached through either of two register-access transports
//! (I2C or SPI) behind the [`SensorInterface`] trait; the driver layers
//! power-mode control, configuration, and raw-plus-scaled data reads on top.
//! Multi-byte quantities are always moved in a single block transfer so that
//! axis data and the 24-bit sensor-time counter stay contemporaneous.
//!
//! ```ignore
//! let mut imu = Builder::new_i2c(i2c, I2C_ADDRESS_SDO_HIGH);
//! imu.setup(&mut delay)?;
//!
//! let config = imu.get_accel_config()?;
//! let mut samples = [0f32; 3 * 128];
//! for chunk in samples.chunks_exact_mut(3) {
//!     while !imu.get_status()?.drdy_acc {}
//!     let xyz = imu.get_accel_xyz(config.range)?;
//!     chunk.copy_from_slice(&[xyz.x.scaled, xyz.y.scaled, xyz.z.scaled]);
//! }
//! ```

#![no_std]

use embedded_hal as hal;
use hal::delay::DelayNs;
use hal::digital::OutputPin;

#[cfg(feature = "rttdebug")]
use panic_rtt_core::rprintln;

pub mod config;
mod interface;
pub mod registers;

pub use config::{
    AccelBandwidth, AccelConfig, AccelOdr, AccelRange, GyroBandwidth, GyroConfig, GyroOdr,
    GyroRange,
};
pub use interface::{I2cInterface, SensorInterface, SpiInterface};
pub use interface::i2c::{I2C_ADDRESS_SDO_HIGH, I2C_ADDRESS_SDO_LOW};

use registers::{Command, Register};

/// Errors in this crate
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<CommE, PinE> {
    /// Sensor communication error
    Comm(CommE),
    /// Pin setting error
    Pin(PinE),

    /// Unrecognized chip ID
    UnknownChipId,
    /// Sensor not responding
    Unresponsive,
    /// Configuration register contents do not decode to a documented setting
    InvalidConfig,
}

/// Chip identification code of the BMI160
pub const CHIP_ID_VALUE: u8 = 0xD1;

/// Period of the internal sensor-time counter, in seconds per tick
pub const SENSOR_TIME_LSB: f32 = 39e-6;

/// Reboot settling time after a soft reset command
const SOFT_RESET_SETTLE_MS: u32 = 15;
/// Accelerometer suspend-to-normal transition time
const ACCEL_STARTUP_MS: u32 = 5;
/// Gyroscope suspend-to-normal transition time
const GYRO_STARTUP_MS: u32 = 80;

/// Sensors addressable through the power-mode command set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Sensor {
    /// Optional external magnetometer
    Mag,
    /// Angular rate sensor
    Gyro,
    /// g sensor
    Accel,
}

/// Power modes selectable through the CMD register
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerMode {
    /// No sampling, no FIFO data readout
    Suspend = 0,
    /// Full chip operation
    Normal = 1,
    /// Duty-cycling between suspend and normal (accelerometer)
    LowPower = 2,
    /// Start-up to normal mode in 10 ms or less (gyroscope)
    FastStartUp = 3,
}

impl PowerMode {
    pub(crate) const fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => Self::Suspend,
            1 => Self::Normal,
            2 => Self::LowPower,
            _ => Self::FastStartUp,
        }
    }
}

/// Sensor measurement axes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    X,
    Y,
    Z,
}

/// One axis reading, raw and scaled
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisData {
    /// Two's-complement register value
    pub raw: i16,
    /// Reading in physical units for the range in effect at capture
    pub scaled: f32,
}

impl AxisData {
    /// Decode a little-endian register pair and scale it.
    pub fn from_registers(lo: u8, hi: u8, lsb_per_unit: f32) -> Self {
        let raw = i16::from_le_bytes([lo, hi]);
        Self {
            raw,
            scaled: f32::from(raw) / lsb_per_unit,
        }
    }
}

/// One tri-axis reading
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorData {
    pub x: AxisData,
    pub y: AxisData,
    pub z: AxisData,
}

impl SensorData {
    /// Decode a contiguous 6-byte X/Y/Z register block.
    pub fn from_block(block: &[u8], lsb_per_unit: f32) -> Self {
        debug_assert!(block.len() >= 6);
        Self {
            x: AxisData::from_registers(block[0], block[1], lsb_per_unit),
            y: AxisData::from_registers(block[2], block[3], lsb_per_unit),
            z: AxisData::from_registers(block[4], block[5], lsb_per_unit),
        }
    }
}

/// The free-running 24-bit sensor-time counter
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorTime {
    /// Counter value
    pub raw: u32,
    /// Counter value converted to seconds (39 us per tick)
    pub seconds: f32,
}

impl SensorTime {
    /// Decode the three SENSORTIME registers, lowest address first.
    pub fn from_registers(b0: u8, b1: u8, b2: u8) -> Self {
        let raw = u32::from_le_bytes([b0, b1, b2, 0]);
        Self {
            raw,
            seconds: raw as f32 * SENSOR_TIME_LSB,
        }
    }
}

/// Decoded STATUS register flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status {
    /// Gyroscope self-test finished successfully
    pub gyr_self_test_ok: bool,
    /// Magnetometer manual interface operation in progress
    pub mag_man_op: bool,
    /// Fast offset compensation completed
    pub foc_rdy: bool,
    /// NVM controller ready
    pub nvm_rdy: bool,
    /// New magnetometer data since the last readout
    pub drdy_mag: bool,
    /// New gyroscope data since the last readout
    pub drdy_gyr: bool,
    /// New accelerometer data since the last readout
    pub drdy_acc: bool,
}

impl Status {
    pub(crate) const fn from_bits(bits: u8) -> Self {
        Self {
            gyr_self_test_ok: bits & registers::GYR_SELF_TEST_OK_MASK != 0,
            mag_man_op: bits & registers::MAG_MAN_OP_MASK != 0,
            foc_rdy: bits & registers::FOC_RDY_MASK != 0,
            nvm_rdy: bits & registers::NVM_RDY_MASK != 0,
            drdy_mag: bits & registers::DRDY_MAG_MASK != 0,
            drdy_gyr: bits & registers::DRDY_GYR_MASK != 0,
            drdy_acc: bits & registers::DRDY_ACC_MASK != 0,
        }
    }
}

/// Decoded ERR_REG flags. The hardware clears the register when it is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ErrorFlags {
    /// Chip is not in an operable state
    pub fatal_err: bool,
    /// Error code (0 = none, 6 = ODR mismatch of enabled sensors in
    /// headerless FIFO mode, 7 = pre-filtered data used in low power mode)
    pub error_code: u8,
    /// I2C failure on the magnetometer interface
    pub i2c_fail_err: bool,
    /// Command dropped because the previous one was still executing
    pub drop_cmd_err: bool,
    /// Magnetometer data-ready was not reached before the readout
    pub mag_drdy_err: bool,
}

impl ErrorFlags {
    pub(crate) const fn from_bits(bits: u8) -> Self {
        Self {
            fatal_err: bits & registers::FATAL_ERR_MASK != 0,
            error_code: (bits & registers::ERR_CODE_MASK) >> registers::ERR_CODE_POS,
            i2c_fail_err: bits & registers::I2C_FAIL_ERR_MASK != 0,
            drop_cmd_err: bits & registers::DROP_CMD_ERR_MASK != 0,
            mag_drdy_err: bits & registers::MAG_DRDY_ERR_MASK != 0,
        }
    }
}

/// Per-sensor power modes decoded from PMU_STATUS
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PowerStatus {
    pub mag: PowerMode,
    pub gyro: PowerMode,
    pub accel: PowerMode,
}

impl PowerStatus {
    pub(crate) const fn from_bits(bits: u8) -> Self {
        Self {
            mag: PowerMode::from_bits(
                (bits & registers::MAG_PMU_STATUS_MASK) >> registers::MAG_PMU_STATUS_POS,
            ),
            gyro: PowerMode::from_bits(
                (bits & registers::GYR_PMU_STATUS_MASK) >> registers::GYR_PMU_STATUS_POS,
            ),
            accel: PowerMode::from_bits(
                (bits & registers::ACC_PMU_STATUS_MASK) >> registers::ACC_PMU_STATUS_POS,
            ),
        }
    }
}

/// Convert a raw TEMPERATURE_0/1 reading to degrees Celsius.
///
/// The register pair is a 1/512 °C-per-LSB offset from 23 °C; the high bit
/// marks the negative half of the two's-complement range.
pub fn temperature_from_raw(raw: u16) -> f32 {
    if raw & 0x8000 != 0 {
        23.0 - ((0x1_0000 - u32::from(raw)) as f32 / 512.0)
    } else {
        f32::from(raw) / 512.0 + 23.0
    }
}

pub struct Builder {}

impl Builder {
    /// Create a new driver using I2C interface
    pub fn new_i2c<I2C, CommE>(i2c: I2C, address: u8) -> Bmi160<I2cInterface<I2C>>
    where
        I2C: hal::i2c::I2c<Error = CommE>,
        CommE: core::fmt::Debug,
    {
        let iface = interface::I2cInterface::new(i2c, address);
        Bmi160::new_with_interface(iface)
    }

    /// Create a new driver using SPI interface
    pub fn new_spi<SPI, CSN, CommE, PinE>(spi: SPI, csn: CSN) -> Bmi160<SpiInterface<SPI, CSN>>
    where
        SPI: hal::spi::SpiBus<u8, Error = CommE>,
        CSN: OutputPin<Error = PinE>,
        CommE: core::fmt::Debug,
        PinE: core::fmt::Debug,
    {
        let iface = interface::SpiInterface::new(spi, csn);
        Bmi160::new_with_interface(iface)
    }
}

pub struct Bmi160<SI> {
    pub(crate) si: SI,
}

impl<SI, CommE, PinE> Bmi160<SI>
where
    SI: SensorInterface<InterfaceError = Error<CommE, PinE>>,
{
    /// Wrap an already-constructed interface.
    ///
    /// Useful for custom transports and for driving the sensor protocol
    /// against a mock in tests; ordinarily use [`Builder`].
    pub fn new_with_interface(sensor_interface: SI) -> Self {
        Self {
            si: sensor_interface,
        }
    }

    /// Release owned resources
    pub fn release(self) -> SI {
        self.si
    }

    /// Read the chip identifier and return true if it matches the BMI160
    pub fn check_identity(
        &mut self,
        delay_source: &mut impl DelayNs,
    ) -> Result<bool, SI::InterfaceError> {
        for _ in 0..5 {
            let chip_id = self.si.register_read(Register::ChipId)?;
            if chip_id == CHIP_ID_VALUE {
                #[cfg(feature = "rttdebug")]
                rprintln!("found device: 0x{:0x}  ", chip_id);
                return Ok(true);
            }
            #[cfg(feature = "rttdebug")]
            rprintln!("bogus chip id: 0x{:0x}  ", chip_id);

            delay_source.delay_ms(10);
        }

        Ok(false)
    }

    /// Perform a soft reset, rebooting the sensor
    pub fn soft_reset(&mut self, delay_source: &mut impl DelayNs) -> Result<(), SI::InterfaceError> {
        self.si
            .register_write(Register::Cmd, Command::SoftReset as u8)?;
        //reboot takes around 15 ms before the device accepts commands again
        delay_source.delay_ms(SOFT_RESET_SETTLE_MS);

        if self.si.using_spi() {
            //a rising chip-select edge returns the rebooted part to SPI mode,
            //so issue one throwaway read before talking to it in earnest
            let _ = self.si.register_read(Register::ChipId);
        }

        let mut reset_success = false;
        for _ in 0..10 {
            if self.si.register_read(Register::ChipId).is_ok() {
                reset_success = true;
                break;
            }
            delay_source.delay_ms(10);
        }
        if !reset_success {
            #[cfg(feature = "rttdebug")]
            rprintln!("no response after reset");
            return Err(Error::Unresponsive);
        }

        Ok(())
    }

    /// Reset the sensor and bring both motion sensors to normal power with
    /// the default configuration
    pub fn setup(&mut self, delay_source: &mut impl DelayNs) -> Result<(), SI::InterfaceError> {
        self.soft_reset(delay_source)?;
        let supported = self.check_identity(delay_source)?;
        if !supported {
            return Err(Error::UnknownChipId);
        }

        self.set_power_mode(Sensor::Accel, PowerMode::Normal)?;
        delay_source.delay_ms(ACCEL_STARTUP_MS);
        self.set_power_mode(Sensor::Gyro, PowerMode::Normal)?;
        delay_source.delay_ms(GYRO_STARTUP_MS);

        //configure some default ranges
        self.set_accel_config(&AccelConfig::default())?;
        self.set_gyro_config(&GyroConfig::default())?;

        Ok(())
    }

    /// Command a power mode change for one sensor.
    ///
    /// Observe the mode transition times given in the datasheet before
    /// issuing further commands; [`get_power_status`](Self::get_power_status)
    /// reports the mode actually reached.
    pub fn set_power_mode(
        &mut self,
        sensor: Sensor,
        mode: PowerMode,
    ) -> Result<(), SI::InterfaceError> {
        let opcode = match sensor {
            Sensor::Mag => Command::MagSetPmuMode,
            Sensor::Gyro => Command::GyrSetPmuMode,
            Sensor::Accel => Command::AccSetPmuMode,
        };
        self.si
            .register_write(Register::Cmd, opcode as u8 | mode as u8)
    }

    /// Read the current power mode of all three sensors
    pub fn get_power_status(&mut self) -> Result<PowerStatus, SI::InterfaceError> {
        let bits = self.si.register_read(Register::PmuStatus)?;
        Ok(PowerStatus::from_bits(bits))
    }

    /// Write the accelerometer configuration register pair
    pub fn set_accel_config(&mut self, config: &AccelConfig) -> Result<(), SI::InterfaceError> {
        self.si
            .block_write(Register::AccConf, Register::AccRange, &config.encode())
    }

    /// Read back the accelerometer configuration register pair
    pub fn get_accel_config(&mut self) -> Result<AccelConfig, SI::InterfaceError> {
        let mut data = [0u8; 2];
        self.si
            .block_read(Register::AccConf, Register::AccRange, &mut data)?;
        AccelConfig::decode(data).ok_or(Error::InvalidConfig)
    }

    /// Write the gyroscope configuration register pair
    pub fn set_gyro_config(&mut self, config: &GyroConfig) -> Result<(), SI::InterfaceError> {
        self.si
            .block_write(Register::GyrConf, Register::GyrRange, &config.encode())
    }

    /// Read back the gyroscope configuration register pair
    pub fn get_gyro_config(&mut self) -> Result<GyroConfig, SI::InterfaceError> {
        let mut data = [0u8; 2];
        self.si
            .block_read(Register::GyrConf, Register::GyrRange, &mut data)?;
        GyroConfig::decode(data).ok_or(Error::InvalidConfig)
    }

    /// Read one accelerometer axis.
    ///
    /// `range` must be the range currently configured in the device; the raw
    /// count is only meaningful relative to it.
    pub fn get_accel_axis(
        &mut self,
        axis: Axis,
        range: AccelRange,
    ) -> Result<AxisData, SI::InterfaceError> {
        let (start, stop) = match axis {
            Axis::X => (Register::Data14, Register::Data15),
            Axis::Y => (Register::Data16, Register::Data17),
            Axis::Z => (Register::Data18, Register::Data19),
        };
        let mut data = [0u8; 2];
        self.si.block_read(start, stop, &mut data)?;
        Ok(AxisData::from_registers(data[0], data[1], range.lsb_per_g()))
    }

    /// Read one gyroscope axis.
    ///
    /// `range` must be the range currently configured in the device.
    pub fn get_gyro_axis(
        &mut self,
        axis: Axis,
        range: GyroRange,
    ) -> Result<AxisData, SI::InterfaceError> {
        let (start, stop) = match axis {
            Axis::X => (Register::Data8, Register::Data9),
            Axis::Y => (Register::Data10, Register::Data11),
            Axis::Z => (Register::Data12, Register::Data13),
        };
        let mut data = [0u8; 2];
        self.si.block_read(start, stop, &mut data)?;
        Ok(AxisData::from_registers(
            data[0],
            data[1],
            range.lsb_per_dps(),
        ))
    }

    /// Read all three accelerometer axes in one 6-byte transfer
    pub fn get_accel_xyz(&mut self, range: AccelRange) -> Result<SensorData, SI::InterfaceError> {
        let mut block = [0u8; 6];
        self.si
            .block_read(Register::Data14, Register::Data19, &mut block)?;
        Ok(SensorData::from_block(&block, range.lsb_per_g()))
    }

    /// Read all three gyroscope axes in one 6-byte transfer
    pub fn get_gyro_xyz(&mut self, range: GyroRange) -> Result<SensorData, SI::InterfaceError> {
        let mut block = [0u8; 6];
        self.si
            .block_read(Register::Data8, Register::Data13, &mut block)?;
        Ok(SensorData::from_block(&block, range.lsb_per_dps()))
    }

    /// Read accelerometer axes together with the sensor-time counter.
    ///
    /// Axis registers and counter are captured in a single 9-byte transfer,
    /// so the counter is guaranteed contemporaneous with the sample; two
    /// separate reads could straddle a counter rollover.
    pub fn get_accel_xyz_and_time(
        &mut self,
        range: AccelRange,
    ) -> Result<(SensorData, SensorTime), SI::InterfaceError> {
        let mut block = [0u8; 9];
        self.si
            .block_read(Register::Data14, Register::Sensortime2, &mut block)?;
        Ok((
            SensorData::from_block(&block[..6], range.lsb_per_g()),
            SensorTime::from_registers(block[6], block[7], block[8]),
        ))
    }

    /// Read gyroscope axes together with the sensor-time counter.
    ///
    /// The transfer spans the intervening accelerometer registers, 15 bytes
    /// in all, to keep counter and sample contemporaneous.
    pub fn get_gyro_xyz_and_time(
        &mut self,
        range: GyroRange,
    ) -> Result<(SensorData, SensorTime), SI::InterfaceError> {
        let mut block = [0u8; 15];
        self.si
            .block_read(Register::Data8, Register::Sensortime2, &mut block)?;
        Ok((
            SensorData::from_block(&block[..6], range.lsb_per_dps()),
            SensorTime::from_registers(block[12], block[13], block[14]),
        ))
    }

    /// Read both motion sensors and the sensor-time counter in a single
    /// 15-byte transfer, returned as (accel, gyro, time)
    pub fn get_gyro_accel_and_time(
        &mut self,
        accel_range: AccelRange,
        gyro_range: GyroRange,
    ) -> Result<(SensorData, SensorData, SensorTime), SI::InterfaceError> {
        let mut block = [0u8; 15];
        self.si
            .block_read(Register::Data8, Register::Sensortime2, &mut block)?;
        Ok((
            SensorData::from_block(&block[6..12], accel_range.lsb_per_g()),
            SensorData::from_block(&block[..6], gyro_range.lsb_per_dps()),
            SensorTime::from_registers(block[12], block[13], block[14]),
        ))
    }

    /// Read the sensor-time counter on its own
    pub fn get_sensor_time(&mut self) -> Result<SensorTime, SI::InterfaceError> {
        let mut block = [0u8; 3];
        self.si
            .block_read(Register::Sensortime0, Register::Sensortime2, &mut block)?;
        Ok(SensorTime::from_registers(block[0], block[1], block[2]))
    }

    /// Read the die temperature in degrees Celsius
    pub fn get_temperature(&mut self) -> Result<f32, SI::InterfaceError> {
        let mut data = [0u8; 2];
        self.si
            .block_read(Register::Temperature0, Register::Temperature1, &mut data)?;
        Ok(temperature_from_raw(u16::from_le_bytes(data)))
    }

    /// Read the status flags; the data-ready bits signal fresh samples
    pub fn get_status(&mut self) -> Result<Status, SI::InterfaceError> {
        let bits = self.si.register_read(Register::Status)?;
        Ok(Status::from_bits(bits))
    }

    /// Read and clear the error register
    pub fn get_error_flags(&mut self) -> Result<ErrorFlags, SI::InterfaceError> {
        let bits = self.si.register_read(Register::ErrReg)?;
        Ok(ErrorFlags::from_bits(bits))
    }
}
