//! Die temperature decoding, including the two's-complement boundary.

use crate::common::{driver_with_mock, Operation};
use bmi160::registers::Register;

fn read_temp_raw(raw: u16) -> f32 {
    let (mut driver, mock) = driver_with_mock();
    let bytes = raw.to_le_bytes();
    mock.set_register(Register::Temperature0, bytes[0]);
    mock.set_register(Register::Temperature1, bytes[1]);
    driver.get_temperature().unwrap()
}

#[test]
fn zero_reads_as_base_temperature() {
    assert_eq!(read_temp_raw(0x0000), 23.0);
}

#[test]
fn one_lsb_is_a_512th_of_a_degree() {
    assert_eq!(read_temp_raw(0x0200), 24.0);
    assert_eq!(read_temp_raw(0x0001), 23.0 + 1.0 / 512.0);
}

#[test]
fn high_bit_selects_the_negative_half() {
    assert_eq!(read_temp_raw(0x8000), -41.0);
    assert_eq!(read_temp_raw(0xFFFF), 23.0 - 1.0 / 512.0);
}

#[test]
fn temperature_is_a_two_byte_block_read() {
    let (mut driver, mock) = driver_with_mock();
    driver.get_temperature().unwrap();
    assert_eq!(
        mock.operations(),
        vec![Operation::BlockRead {
            start: Register::Temperature0,
            stop: Register::Temperature1,
            len: 2,
        }]
    );
}
