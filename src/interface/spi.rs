use embedded_hal as hal;
use hal::digital::OutputPin;
use hal::spi::SpiBus;

use super::{SensorInterface, MAX_BLOCK_LEN};
use crate::registers::{block_len, Register};
use crate::Error;
#[cfg(feature = "rttdebug")]
use panic_rtt_core::rprintln;

/// This combines the SPI peripheral and
/// associated control pins such as:
/// - CSN : Chip Select (aka SS or Slave Select)
///
/// The chip select is asserted for the duration of each transaction and
/// deasserted afterward. The first byte clocked out is the register address
/// with the MSB set for reads and cleared for writes.
pub struct SpiInterface<SPI, CSN> {
    /// the SPI port to use when communicating
    spi: SPI,
    /// the Chip Select pin (GPIO output) to use when communicating
    csn: CSN,
}

impl<SPI, CSN, CommE, PinE> SpiInterface<SPI, CSN>
where
    SPI: SpiBus<u8, Error = CommE>,
    CSN: OutputPin<Error = PinE>,
{
    /// Combined with the register address for reading
    const DIR_READ: u8 = 0x80;
    /// Mask applied to the register address when writing
    const DIR_WRITE: u8 = 0x7F;

    pub fn new(spi: SPI, csn: CSN) -> Self {
        let mut inst = Self { spi, csn };
        //ensure that the device is initially deselected
        let _ = inst.csn.set_high();
        inst
    }

    /// Release owned resources
    pub fn release(self) -> (SPI, CSN) {
        (self.spi, self.csn)
    }

    /// One full-duplex transfer with chip select held low throughout.
    fn transfer_block(&mut self, block: &mut [u8]) -> Result<(), Error<CommE, PinE>> {
        self.csn.set_low().map_err(Error::Pin)?;
        let rc = self
            .spi
            .transfer_in_place(block)
            .and_then(|()| self.spi.flush());
        self.csn.set_high().map_err(Error::Pin)?;
        rc.map_err(Error::Comm)
    }

    fn write_frame(&mut self, frame: &[u8]) -> Result<(), Error<CommE, PinE>> {
        #[cfg(feature = "rttdebug")]
        rprintln!("write {:x?} ", frame);

        self.csn.set_low().map_err(Error::Pin)?;
        let rc = self.spi.write(frame).and_then(|()| self.spi.flush());
        self.csn.set_high().map_err(Error::Pin)?;
        rc.map_err(Error::Comm)
    }
}

impl<SPI, CSN, CommE, PinE> SensorInterface for SpiInterface<SPI, CSN>
where
    SPI: SpiBus<u8, Error = CommE>,
    CSN: OutputPin<Error = PinE>,
{
    type InterfaceError = Error<CommE, PinE>;

    fn register_read(&mut self, reg: Register) -> Result<u8, Self::InterfaceError> {
        let mut block: [u8; 2] = [reg.addr() | Self::DIR_READ, 0];
        self.transfer_block(&mut block)?;

        #[cfg(feature = "rttdebug")]
        rprintln!("read reg 0x{:x} {:x?} ", reg.addr(), block[1]);

        Ok(block[1])
    }

    fn register_write(&mut self, reg: Register, val: u8) -> Result<(), Self::InterfaceError> {
        let frame: [u8; 2] = [reg.addr() & Self::DIR_WRITE, val];
        self.write_frame(&frame)
    }

    fn block_read(
        &mut self,
        start: Register,
        stop: Register,
        buffer: &mut [u8],
    ) -> Result<(), Self::InterfaceError> {
        let n = block_len(start, stop);
        debug_assert_eq!(buffer.len(), n);
        let mut block = [0u8; MAX_BLOCK_LEN + 1];
        block[0] = start.addr() | Self::DIR_READ;
        self.transfer_block(&mut block[..=n])?;
        buffer[..n].copy_from_slice(&block[1..=n]);
        Ok(())
    }

    fn block_write(
        &mut self,
        start: Register,
        stop: Register,
        data: &[u8],
    ) -> Result<(), Self::InterfaceError> {
        let n = block_len(start, stop);
        debug_assert_eq!(data.len(), n);
        let mut frame = [0u8; MAX_BLOCK_LEN + 1];
        frame[0] = start.addr() & Self::DIR_WRITE;
        frame[1..=n].copy_from_slice(&data[..n]);
        self.write_frame(&frame[..=n])
    }

    fn using_spi(&self) -> bool {
        true
    }
}
