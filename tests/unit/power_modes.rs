//! Power mode commands and PMU status decoding.

use crate::common::{driver_with_mock, Operation};
use bmi160::registers::Register;
use bmi160::{PowerMode, Sensor};

#[test]
fn power_mode_commands_encode_sensor_opcode_and_mode() {
    let cases = [
        (Sensor::Accel, PowerMode::Suspend, 0x10),
        (Sensor::Accel, PowerMode::Normal, 0x11),
        (Sensor::Accel, PowerMode::LowPower, 0x12),
        (Sensor::Gyro, PowerMode::Suspend, 0x14),
        (Sensor::Gyro, PowerMode::Normal, 0x15),
        (Sensor::Gyro, PowerMode::FastStartUp, 0x17),
        (Sensor::Mag, PowerMode::Suspend, 0x18),
        (Sensor::Mag, PowerMode::Normal, 0x19),
    ];

    for (sensor, mode, expected) in cases {
        let (mut driver, mock) = driver_with_mock();
        driver.set_power_mode(sensor, mode).unwrap();
        assert_eq!(
            mock.operations(),
            vec![Operation::RegisterWrite {
                reg: Register::Cmd,
                value: expected,
            }],
            "wrong CMD byte for {:?}/{:?}",
            sensor,
            mode,
        );
    }
}

#[test]
fn pmu_status_reports_per_sensor_modes() {
    let (mut driver, mock) = driver_with_mock();

    // mag normal, gyro fast start-up, accel normal
    mock.set_register(Register::PmuStatus, 0x1D);
    let status = driver.get_power_status().unwrap();
    assert_eq!(status.mag, PowerMode::Normal);
    assert_eq!(status.gyro, PowerMode::FastStartUp);
    assert_eq!(status.accel, PowerMode::Normal);

    // everything suspended after reset
    mock.set_register(Register::PmuStatus, 0x00);
    let status = driver.get_power_status().unwrap();
    assert_eq!(status.mag, PowerMode::Suspend);
    assert_eq!(status.gyro, PowerMode::Suspend);
    assert_eq!(status.accel, PowerMode::Suspend);

    // accel duty-cycling in low power
    mock.set_register(Register::PmuStatus, 0x20);
    assert_eq!(driver.get_power_status().unwrap().accel, PowerMode::LowPower);
}
