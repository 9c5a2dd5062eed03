//! Accelerometer and gyroscope configuration.
//!
//! Each configuration struct mirrors one pair of adjacent registers
//! (ACC_CONF/ACC_RANGE or GYR_CONF/GYR_RANGE) and converts to and from the
//! packed byte layout with [`encode`](AccelConfig::encode) and
//! [`decode`](AccelConfig::decode). The conversions are pure and can be
//! exercised without a bus.

use crate::registers::{
    ACC_BWP_MASK, ACC_BWP_POS, ACC_ODR_MASK, ACC_RANGE_MASK, ACC_US_MASK, ACC_US_POS,
    GYR_BWP_MASK, GYR_BWP_POS, GYR_ODR_MASK, GYR_RANGE_MASK,
};

/// Accelerometer full-scale ranges.
///
/// The encodings are the ACC_RANGE register values, which are not a simple
/// 0..3 sequence on this part.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AccelRange {
    /// ±2g, 16384 LSB/g
    G2 = 0x03,
    /// ±4g, 8192 LSB/g
    G4 = 0x05,
    /// ±8g, 4096 LSB/g
    G8 = 0x08,
    /// ±16g, 2048 LSB/g
    G16 = 0x0C,
}

impl AccelRange {
    /// Raw counts per g at this range.
    pub const fn lsb_per_g(self) -> f32 {
        match self {
            Self::G2 => 16384.0,
            Self::G4 => 8192.0,
            Self::G8 => 4096.0,
            Self::G16 => 2048.0,
        }
    }

    pub(crate) const fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0x03 => Some(Self::G2),
            0x05 => Some(Self::G4),
            0x08 => Some(Self::G8),
            0x0C => Some(Self::G16),
            _ => None,
        }
    }
}

/// Accelerometer output data rates (ACC_CONF odr field).
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AccelOdr {
    /// 25/32 Hz
    Hz0_78 = 0x01,
    /// 25/16 Hz
    Hz1_56 = 0x02,
    /// 25/8 Hz
    Hz3_12 = 0x03,
    /// 25/4 Hz
    Hz6_25 = 0x04,
    /// 25/2 Hz
    Hz12_5 = 0x05,
    /// 25 Hz
    Hz25 = 0x06,
    /// 50 Hz
    Hz50 = 0x07,
    /// 100 Hz
    Hz100 = 0x08,
    /// 200 Hz
    Hz200 = 0x09,
    /// 400 Hz
    Hz400 = 0x0A,
    /// 800 Hz
    Hz800 = 0x0B,
    /// 1600 Hz
    Hz1600 = 0x0C,
}

impl AccelOdr {
    pub(crate) const fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0x01 => Some(Self::Hz0_78),
            0x02 => Some(Self::Hz1_56),
            0x03 => Some(Self::Hz3_12),
            0x04 => Some(Self::Hz6_25),
            0x05 => Some(Self::Hz12_5),
            0x06 => Some(Self::Hz25),
            0x07 => Some(Self::Hz50),
            0x08 => Some(Self::Hz100),
            0x09 => Some(Self::Hz200),
            0x0A => Some(Self::Hz400),
            0x0B => Some(Self::Hz800),
            0x0C => Some(Self::Hz1600),
            _ => None,
        }
    }
}

/// Accelerometer bandwidth parameter (ACC_CONF bwp field).
///
/// With undersampling disabled the values select a filter mode; with
/// undersampling enabled they select the number of averaged samples.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AccelBandwidth {
    /// OSR4 filter; 1-sample average when undersampling
    Osr4 = 0,
    /// OSR2 filter; 2-sample average when undersampling
    Osr2 = 1,
    /// Normal filter; 4-sample average when undersampling
    Normal = 2,
    /// 8-sample average (undersampling only)
    Avg8 = 3,
    /// 16-sample average (undersampling only)
    Avg16 = 4,
    /// 32-sample average (undersampling only)
    Avg32 = 5,
    /// 64-sample average (undersampling only)
    Avg64 = 6,
    /// 128-sample average (undersampling only)
    Avg128 = 7,
}

impl AccelBandwidth {
    pub(crate) const fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0 => Some(Self::Osr4),
            1 => Some(Self::Osr2),
            2 => Some(Self::Normal),
            3 => Some(Self::Avg8),
            4 => Some(Self::Avg16),
            5 => Some(Self::Avg32),
            6 => Some(Self::Avg64),
            7 => Some(Self::Avg128),
            _ => None,
        }
    }
}

/// Gyroscope full-scale ranges.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GyroRange {
    /// ±2000 dps, 16.4 LSB/dps
    Dps2000 = 0x00,
    /// ±1000 dps, 32.8 LSB/dps
    Dps1000 = 0x01,
    /// ±500 dps, 65.6 LSB/dps
    Dps500 = 0x02,
    /// ±250 dps, 131.2 LSB/dps
    Dps250 = 0x03,
    /// ±125 dps, 262.4 LSB/dps
    Dps125 = 0x04,
}

impl GyroRange {
    /// Raw counts per degree-per-second at this range.
    pub const fn lsb_per_dps(self) -> f32 {
        match self {
            Self::Dps2000 => 16.4,
            Self::Dps1000 => 32.8,
            Self::Dps500 => 65.6,
            Self::Dps250 => 131.2,
            Self::Dps125 => 262.4,
        }
    }

    pub(crate) const fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0x00 => Some(Self::Dps2000),
            0x01 => Some(Self::Dps1000),
            0x02 => Some(Self::Dps500),
            0x03 => Some(Self::Dps250),
            0x04 => Some(Self::Dps125),
            _ => None,
        }
    }
}

/// Gyroscope output data rates (GYR_CONF odr field).
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GyroOdr {
    /// 25 Hz
    Hz25 = 0x06,
    /// 50 Hz
    Hz50 = 0x07,
    /// 100 Hz
    Hz100 = 0x08,
    /// 200 Hz
    Hz200 = 0x09,
    /// 400 Hz
    Hz400 = 0x0A,
    /// 800 Hz
    Hz800 = 0x0B,
    /// 1600 Hz
    Hz1600 = 0x0C,
    /// 3200 Hz
    Hz3200 = 0x0D,
}

impl GyroOdr {
    pub(crate) const fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0x06 => Some(Self::Hz25),
            0x07 => Some(Self::Hz50),
            0x08 => Some(Self::Hz100),
            0x09 => Some(Self::Hz200),
            0x0A => Some(Self::Hz400),
            0x0B => Some(Self::Hz800),
            0x0C => Some(Self::Hz1600),
            0x0D => Some(Self::Hz3200),
            _ => None,
        }
    }
}

/// Gyroscope bandwidth parameter (GYR_CONF bwp field).
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GyroBandwidth {
    /// Oversampling rate of 4
    Osr4 = 0,
    /// Oversampling rate of 2
    Osr2 = 1,
    /// Normal mode, equidistant sampling
    Normal = 2,
}

impl GyroBandwidth {
    pub(crate) const fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0 => Some(Self::Osr4),
            1 => Some(Self::Osr2),
            2 => Some(Self::Normal),
            _ => None,
        }
    }
}

/// Accelerometer configuration, mirroring the ACC_CONF/ACC_RANGE pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AccelConfig {
    /// Full-scale measurement range
    pub range: AccelRange,
    /// Power-saving undersampling mode
    pub undersampling: bool,
    /// Bandwidth parameter
    pub bandwidth: AccelBandwidth,
    /// Output data rate
    pub odr: AccelOdr,
}

impl Default for AccelConfig {
    /// ±2g, no undersampling, normal filtering, 100 Hz.
    fn default() -> Self {
        Self {
            range: AccelRange::G2,
            undersampling: false,
            bandwidth: AccelBandwidth::Normal,
            odr: AccelOdr::Hz100,
        }
    }
}

impl AccelConfig {
    /// Pack into the ACC_CONF/ACC_RANGE byte pair.
    pub fn encode(&self) -> [u8; 2] {
        let conf = ((self.undersampling as u8) << ACC_US_POS)
            | ((self.bandwidth as u8) << ACC_BWP_POS)
            | (self.odr as u8);
        [conf, self.range as u8]
    }

    /// Unpack from the ACC_CONF/ACC_RANGE byte pair.
    ///
    /// Returns `None` when a field holds a bit pattern the part does not
    /// document.
    pub fn decode(data: [u8; 2]) -> Option<Self> {
        Some(Self {
            range: AccelRange::from_bits(data[1] & ACC_RANGE_MASK)?,
            undersampling: (data[0] & ACC_US_MASK) != 0,
            bandwidth: AccelBandwidth::from_bits((data[0] & ACC_BWP_MASK) >> ACC_BWP_POS)?,
            odr: AccelOdr::from_bits(data[0] & ACC_ODR_MASK)?,
        })
    }
}

/// Gyroscope configuration, mirroring the GYR_CONF/GYR_RANGE pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GyroConfig {
    /// Full-scale measurement range
    pub range: GyroRange,
    /// Bandwidth parameter
    pub bandwidth: GyroBandwidth,
    /// Output data rate
    pub odr: GyroOdr,
}

impl Default for GyroConfig {
    /// ±2000 dps, normal filtering, 100 Hz.
    fn default() -> Self {
        Self {
            range: GyroRange::Dps2000,
            bandwidth: GyroBandwidth::Normal,
            odr: GyroOdr::Hz100,
        }
    }
}

impl GyroConfig {
    /// Pack into the GYR_CONF/GYR_RANGE byte pair.
    pub fn encode(&self) -> [u8; 2] {
        let conf = ((self.bandwidth as u8) << GYR_BWP_POS) | (self.odr as u8);
        [conf, self.range as u8]
    }

    /// Unpack from the GYR_CONF/GYR_RANGE byte pair.
    ///
    /// Returns `None` when a field holds a bit pattern the part does not
    /// document.
    pub fn decode(data: [u8; 2]) -> Option<Self> {
        Some(Self {
            range: GyroRange::from_bits(data[1] & GYR_RANGE_MASK)?,
            bandwidth: GyroBandwidth::from_bits((data[0] & GYR_BWP_MASK) >> GYR_BWP_POS)?,
            odr: GyroOdr::from_bits(data[0] & GYR_ODR_MASK)?,
        })
    }
}
