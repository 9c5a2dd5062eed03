use embedded_hal as hal;

use super::{SensorInterface, MAX_BLOCK_LEN};
use crate::registers::{block_len, Register};
use crate::Error;

/// BMI160 I2C address with the SDO pin pulled low
pub const I2C_ADDRESS_SDO_LOW: u8 = 0x68;
/// BMI160 I2C address with the SDO pin pulled high
pub const I2C_ADDRESS_SDO_HIGH: u8 = 0x69;

/// Connects the sensor through a two-wire addressed bus.
///
/// Reads are two sequential bus operations: an address-phase write of the
/// register address, then a data-phase read of the payload. Writes are one
/// transaction carrying the register address followed by the data bytes.
pub struct I2cInterface<I2C> {
    /// i2c port
    i2c_port: I2C,
    /// 7-bit device address; the read/write bit is applied by the bus
    /// peripheral on each transfer
    address: u8,
}

impl<I2C, CommE> I2cInterface<I2C>
where
    I2C: hal::i2c::I2c<Error = CommE>,
{
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self {
            i2c_port: i2c,
            address,
        }
    }

    /// Release owned resources
    pub fn release(self) -> I2C {
        self.i2c_port
    }
}

impl<I2C, CommE> SensorInterface for I2cInterface<I2C>
where
    I2C: hal::i2c::I2c<Error = CommE>,
{
    type InterfaceError = Error<CommE, ()>;

    fn register_read(&mut self, reg: Register) -> Result<u8, Self::InterfaceError> {
        let mut data = [0u8];
        self.i2c_port
            .write_read(self.address, &[reg.addr()], &mut data)
            .map_err(Error::Comm)?;
        Ok(data[0])
    }

    fn register_write(&mut self, reg: Register, val: u8) -> Result<(), Self::InterfaceError> {
        self.i2c_port
            .write(self.address, &[reg.addr(), val])
            .map_err(Error::Comm)
    }

    fn block_read(
        &mut self,
        start: Register,
        stop: Register,
        buffer: &mut [u8],
    ) -> Result<(), Self::InterfaceError> {
        let n = block_len(start, stop);
        debug_assert_eq!(buffer.len(), n);
        self.i2c_port
            .write_read(self.address, &[start.addr()], &mut buffer[..n])
            .map_err(Error::Comm)
    }

    fn block_write(
        &mut self,
        start: Register,
        stop: Register,
        data: &[u8],
    ) -> Result<(), Self::InterfaceError> {
        let n = block_len(start, stop);
        debug_assert_eq!(data.len(), n);
        let mut packet = [0u8; MAX_BLOCK_LEN + 1];
        packet[0] = start.addr();
        packet[1..=n].copy_from_slice(&data[..n]);
        self.i2c_port
            .write(self.address, &packet[..=n])
            .map_err(Error::Comm)
    }
}
