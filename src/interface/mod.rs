pub mod i2c;
pub mod spi;

pub use self::i2c::I2cInterface;
pub use self::spi::SpiInterface;

use crate::registers::Register;

/// Largest register block moved in one transaction.
///
/// The longest run the driver touches is gyro + accel + sensor time
/// (15 bytes); leave headroom for callers driving the interface directly.
pub(crate) const MAX_BLOCK_LEN: usize = 32;

/// A method of communicating with the sensor.
///
/// Implementations translate the four register-access primitives into bus
/// transactions. Block operations cover the inclusive register span
/// `[start, stop]`. The caller guarantees that every address in the span is
/// defined and readable (or writeable) and that buffers hold exactly
/// `block_len(start, stop)` bytes; violating either is not detected at run
/// time and yields whatever the bus returns.
pub trait SensorInterface {
    /// Interface error type
    type InterfaceError;

    /// Read a single register.
    fn register_read(&mut self, reg: Register) -> Result<u8, Self::InterfaceError>;

    /// Write a single register.
    fn register_write(&mut self, reg: Register, val: u8) -> Result<(), Self::InterfaceError>;

    /// Read the contiguous register run `[start, stop]` into `buffer`.
    fn block_read(
        &mut self,
        start: Register,
        stop: Register,
        buffer: &mut [u8],
    ) -> Result<(), Self::InterfaceError>;

    /// Write `data` to the contiguous register run `[start, stop]`.
    fn block_write(
        &mut self,
        start: Register,
        stop: Register,
        data: &[u8],
    ) -> Result<(), Self::InterfaceError>;

    /// Returns true if the sensor is connected over SPI.
    fn using_spi(&self) -> bool {
        false
    }
}
