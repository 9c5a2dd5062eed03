//! Wire-level encodings of both transports, checked against embedded-hal
//! mock buses.

use embedded_hal_mock::eh1::digital::{
    Mock as PinMock, State as PinState, Transaction as PinTransaction,
};
use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};
use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};
use embedded_hal::i2c::ErrorKind;

use bmi160::registers::Register;
use bmi160::{Error, I2cInterface, SensorInterface, SpiInterface, I2C_ADDRESS_SDO_HIGH};

#[test]
fn i2c_read_is_pointer_write_then_data_read() {
    let expectations = [I2cTransaction::write_read(
        I2C_ADDRESS_SDO_HIGH,
        vec![0x00],
        vec![0xD1],
    )];
    let mut iface = I2cInterface::new(I2cMock::new(&expectations), I2C_ADDRESS_SDO_HIGH);

    assert_eq!(iface.register_read(Register::ChipId).unwrap(), 0xD1);
    assert!(!iface.using_spi());

    iface.release().done();
}

#[test]
fn i2c_write_is_one_address_plus_data_transaction() {
    let expectations = [I2cTransaction::write(
        I2C_ADDRESS_SDO_HIGH,
        vec![0x7E, 0x11],
    )];
    let mut iface = I2cInterface::new(I2cMock::new(&expectations), I2C_ADDRESS_SDO_HIGH);

    iface.register_write(Register::Cmd, 0x11).unwrap();

    iface.release().done();
}

#[test]
fn i2c_block_read_names_only_the_start_address() {
    let expectations = [I2cTransaction::write_read(
        I2C_ADDRESS_SDO_HIGH,
        vec![0x12],
        vec![1, 2, 3, 4, 5, 6],
    )];
    let mut iface = I2cInterface::new(I2cMock::new(&expectations), I2C_ADDRESS_SDO_HIGH);

    let mut buffer = [0u8; 6];
    iface
        .block_read(Register::Data14, Register::Data19, &mut buffer)
        .unwrap();
    assert_eq!(buffer, [1, 2, 3, 4, 5, 6]);

    iface.release().done();
}

#[test]
fn i2c_block_write_prefixes_the_start_address() {
    let expectations = [I2cTransaction::write(
        I2C_ADDRESS_SDO_HIGH,
        vec![0x40, 0x28, 0x03],
    )];
    let mut iface = I2cInterface::new(I2cMock::new(&expectations), I2C_ADDRESS_SDO_HIGH);

    iface
        .block_write(Register::AccConf, Register::AccRange, &[0x28, 0x03])
        .unwrap();

    iface.release().done();
}

#[test]
fn i2c_nack_surfaces_as_comm_error() {
    let expectations = [I2cTransaction::write_read(
        I2C_ADDRESS_SDO_HIGH,
        vec![0x00],
        vec![0x00],
    )
    .with_error(ErrorKind::Other)];
    let mut iface = I2cInterface::new(I2cMock::new(&expectations), I2C_ADDRESS_SDO_HIGH);

    assert!(matches!(
        iface.register_read(Register::ChipId),
        Err(Error::Comm(_))
    ));

    iface.release().done();
}

#[test]
fn spi_read_sets_the_read_flag_and_brackets_chip_select() {
    let spi_expectations = [
        SpiTransaction::transfer_in_place(vec![0x80, 0x00], vec![0x00, 0xD1]),
        SpiTransaction::flush(),
    ];
    let pin_expectations = [
        PinTransaction::set(PinState::High), // deselected at construction
        PinTransaction::set(PinState::Low),
        PinTransaction::set(PinState::High),
    ];
    let mut iface = SpiInterface::new(
        SpiMock::new(&spi_expectations),
        PinMock::new(&pin_expectations),
    );

    assert_eq!(iface.register_read(Register::ChipId).unwrap(), 0xD1);
    assert!(iface.using_spi());

    let (mut spi, mut csn) = iface.release();
    spi.done();
    csn.done();
}

#[test]
fn spi_write_clears_the_read_flag() {
    let spi_expectations = [
        SpiTransaction::write_vec(vec![0x7E, 0xB6]),
        SpiTransaction::flush(),
    ];
    let pin_expectations = [
        PinTransaction::set(PinState::High),
        PinTransaction::set(PinState::Low),
        PinTransaction::set(PinState::High),
    ];
    let mut iface = SpiInterface::new(
        SpiMock::new(&spi_expectations),
        PinMock::new(&pin_expectations),
    );

    iface.register_write(Register::Cmd, 0xB6).unwrap();

    let (mut spi, mut csn) = iface.release();
    spi.done();
    csn.done();
}

#[test]
fn spi_block_read_is_one_full_duplex_transaction() {
    let spi_expectations = [
        SpiTransaction::transfer_in_place(
            vec![0x92, 0, 0, 0, 0, 0, 0],
            vec![0x00, 1, 2, 3, 4, 5, 6],
        ),
        SpiTransaction::flush(),
    ];
    let pin_expectations = [
        PinTransaction::set(PinState::High),
        PinTransaction::set(PinState::Low),
        PinTransaction::set(PinState::High),
    ];
    let mut iface = SpiInterface::new(
        SpiMock::new(&spi_expectations),
        PinMock::new(&pin_expectations),
    );

    let mut buffer = [0u8; 6];
    iface
        .block_read(Register::Data14, Register::Data19, &mut buffer)
        .unwrap();
    assert_eq!(buffer, [1, 2, 3, 4, 5, 6]);

    let (mut spi, mut csn) = iface.release();
    spi.done();
    csn.done();
}

#[test]
fn spi_block_write_is_one_frame() {
    let spi_expectations = [
        SpiTransaction::write_vec(vec![0x40, 0x28, 0x03]),
        SpiTransaction::flush(),
    ];
    let pin_expectations = [
        PinTransaction::set(PinState::High),
        PinTransaction::set(PinState::Low),
        PinTransaction::set(PinState::High),
    ];
    let mut iface = SpiInterface::new(
        SpiMock::new(&spi_expectations),
        PinMock::new(&pin_expectations),
    );

    iface
        .block_write(Register::AccConf, Register::AccRange, &[0x28, 0x03])
        .unwrap();

    let (mut spi, mut csn) = iface.release();
    spi.done();
    csn.done();
}
