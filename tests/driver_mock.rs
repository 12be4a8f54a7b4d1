#![cfg(not(feature = "async"))]

use embedded_hal::i2c::ErrorKind;
use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTrans};
use lc709203f_rs::codec::crc8;
use lc709203f_rs::data_types::{BatteryProfile, CurrentDirection, PowerMode, TemperatureMode};
use lc709203f_rs::{ChargeReport, Config, CrcMismatch, Error, Lc709203f};

const ADDR: u8 = 0x0B;

fn probe() -> I2cTrans {
    I2cTrans::write(ADDR, vec![])
}

/// Word read reply with a valid CRC over [addr W, cmd, addr R, lo, hi].
fn read_word(cmd: u8, value: u16) -> I2cTrans {
    let [lo, hi] = value.to_le_bytes();
    let crc = crc8(&[ADDR << 1, cmd, (ADDR << 1) | 1, lo, hi]);
    I2cTrans::write_read(ADDR, vec![cmd], vec![lo, hi, crc])
}

/// Open a driver with the default config; the version probe returns 0x2717.
fn opened(mut expectations: Vec<I2cTrans>) -> Lc709203f<I2cMock> {
    let mut all = vec![probe(), I2cTrans::write_read(ADDR, vec![0x11], vec![0x17, 0x27, 0x75])];
    all.append(&mut expectations);
    let mut driver = Lc709203f::new(I2cMock::new(&all));
    driver.begin().unwrap();
    driver
}

#[test]
fn begin_probes_address_then_reads_version() {
    let mut driver = opened(vec![]);
    assert!(driver.is_open());
    assert_eq!(driver.session_address(), Some(ADDR));
    driver.free().done();
}

#[test]
fn cell_voltage_reads_millivolts() {
    // 3700 mV = 0x0E74, CRC over [16 09 17 74 0E] = B7
    let mut driver = opened(vec![I2cTrans::write_read(ADDR, vec![0x09], vec![0x74, 0x0E, 0xB7])]);
    assert_eq!(driver.cell_voltage().unwrap(), 3.7);
    driver.free().done();
}

#[test]
fn corrupted_crc_fails_read() {
    let mut driver = opened(vec![I2cTrans::write_read(ADDR, vec![0x09], vec![0x74, 0x0E, 0xB6])]);
    match driver.cell_voltage() {
        Err(Error::Crc(m)) => assert_eq!(
            m,
            CrcMismatch {
                expected: 0xB7,
                received: 0xB6
            }
        ),
        other => panic!("expected CRC error, got {:?}", other),
    }
    driver.free().done();
}

#[test]
fn bus_error_on_read_is_reported_as_i2c() {
    let mut driver = opened(vec![
        I2cTrans::write_read(ADDR, vec![0x06], vec![0, 0, 0]).with_error(ErrorKind::Other),
    ]);
    assert!(matches!(driver.thermistor_b(), Err(Error::I2c(ErrorKind::Other))));
    driver.free().done();
}

#[test]
fn cell_percent_reports_remaining_by_default() {
    // ITE 755 = 0x02F3, CRC 3A
    let mut driver = opened(vec![I2cTrans::write_read(ADDR, vec![0x0F], vec![0xF3, 0x02, 0x3A])]);
    assert_eq!(driver.cell_percent().unwrap(), 75.5);
    driver.free().done();
}

#[test]
fn cell_percent_to_empty_policy() {
    let expectations = [
        probe(),
        read_word(0x11, 0x2717),
        I2cTrans::write_read(ADDR, vec![0x0F], vec![0xF3, 0x02, 0x3A]),
    ];
    let config = Config::default().with_charge_report(ChargeReport::ToEmpty);
    let mut driver = Lc709203f::with_config(I2cMock::new(&expectations), config);
    driver.begin().unwrap();
    assert_eq!(driver.cell_percent().unwrap(), 24.5);
    driver.free().done();
}

#[test]
fn cell_temperature_remaps_raw_code() {
    let mut driver = opened(vec![
        I2cTrans::write_read(ADDR, vec![0x08], vec![0xE4, 0x09, 0x55]),
        I2cTrans::write_read(ADDR, vec![0x08], vec![0x04, 0x0D, 0x0A]),
        I2cTrans::write_read(ADDR, vec![0x08], vec![0x74, 0x0B, 0xBA]),
    ]);
    assert_eq!(driver.cell_temperature().unwrap(), -20.0);
    assert_eq!(driver.cell_temperature().unwrap(), 60.0);
    assert_eq!(driver.cell_temperature().unwrap(), 20.0);
    driver.free().done();
}

#[test]
fn thermistor_b_write_frame() {
    // Wire bytes: cmd, lo, hi, CRC over [16 06 34 0D] = E0
    let mut driver = opened(vec![
        I2cTrans::write(ADDR, vec![0x06, 0x34, 0x0D, 0xE0]),
        I2cTrans::write_read(ADDR, vec![0x06], vec![0x34, 0x0D, 0x37]),
    ]);
    driver.set_thermistor_b(0x0D34).unwrap();
    assert_eq!(driver.thermistor_b().unwrap(), 0x0D34);
    driver.free().done();
}

#[test]
fn init_rsoc_writes_magic_code() {
    let mut driver = opened(vec![I2cTrans::write(ADDR, vec![0x07, 0x55, 0xAA, 0x17])]);
    driver.init_rsoc().unwrap();
    driver.free().done();
}

#[test]
fn alarm_writes_and_range_checks() {
    let mut driver = opened(vec![
        I2cTrans::write(ADDR, vec![0x13, 0x0A, 0x00, 0x8E]),
        I2cTrans::write(ADDR, vec![0x14, 0x48, 0x0D, 0xCA]),
    ]);
    driver.set_alarm_rsoc(10).unwrap();
    driver.set_alarm_voltage(3.4).unwrap();
    // Rejected before any bus traffic.
    assert!(matches!(driver.set_alarm_rsoc(101), Err(Error::OutOfRange)));
    assert!(matches!(driver.set_alarm_voltage(-0.5), Err(Error::OutOfRange)));
    assert!(matches!(driver.set_cell_temperature(f32::NAN), Err(Error::OutOfRange)));
    driver.free().done();
}

#[test]
fn configuration_setters_write_codes() {
    let mut driver = opened(vec![
        I2cTrans::write(ADDR, vec![0x0A, 0xFF, 0xFF, 0xB0]),
        I2cTrans::write(ADDR, vec![0x08, 0xA6, 0x0B, 0x15]),
        I2cTrans::write(ADDR, vec![0x15, 0x02, 0x00, 0x5B]),
        I2cTrans::write(ADDR, vec![0x0B, 0x2D, 0x00, 0xB8]),
    ]);
    driver.set_current_direction(CurrentDirection::Discharge).unwrap();
    driver.set_cell_temperature(25.0).unwrap();
    driver.set_power_mode(PowerMode::Sleep).unwrap();
    driver.set_pack_apa(0x2D).unwrap();
    driver.free().done();
}

#[test]
fn enum_getters_decode_and_reject_undefined() {
    let mut driver = opened(vec![
        I2cTrans::write_read(ADDR, vec![0x15], vec![0x01, 0x00, 0xF1]),
        I2cTrans::write_read(ADDR, vec![0x15], vec![0x05, 0x00, 0xA5]),
        I2cTrans::write_read(ADDR, vec![0x12], vec![0x01, 0x00, 0x93]),
        read_word(0x16, 0x0001),
        read_word(0x0D, 87),
        read_word(0x1A, 0x1001),
    ]);
    assert_eq!(driver.power_mode().unwrap(), PowerMode::Operate);
    assert!(matches!(driver.power_mode(), Err(Error::InvalidValue(0x0005))));
    assert_eq!(driver.battery_profile().unwrap(), BatteryProfile::Profile1);
    assert_eq!(driver.temperature_mode().unwrap(), TemperatureMode::Thermistor);
    assert_eq!(driver.rsoc_percent().unwrap(), 87);
    assert_eq!(driver.battery_profile_code().unwrap(), 0x1001);
    driver.free().done();
}

#[test]
fn operations_without_session_fail() {
    let mut driver = Lc709203f::new(I2cMock::new(&[]));
    assert!(matches!(driver.cell_voltage(), Err(Error::NotInitialized)));
    assert!(matches!(driver.init_rsoc(), Err(Error::NotInitialized)));
    driver.free().done();
}

#[test]
fn end_releases_session() {
    let mut driver = opened(vec![]);
    driver.end();
    assert!(!driver.is_open());
    assert!(matches!(driver.ic_version(), Err(Error::NotInitialized)));
    driver.free().done();
}
