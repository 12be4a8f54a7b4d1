//! Register map and constants for LC709203F.
//! Command codes and value ranges follow the datasheet; all registers are 16-bit words.

/// Default 7-bit I2C address (fixed on the LC709203F).
pub const DEFAULT_I2C_ADDRESS: u8 = 0x0B;

/// Command codes (register selectors).
pub mod cmd {
    /// Thermistor B-constant (R/W).
    pub const THERMISTOR_B: u8 = 0x06;
    /// Initial RSOC (W). Writing [`super::RSOC_INIT_CODE`] restarts the estimate.
    pub const INITIAL_RSOC: u8 = 0x07;
    /// Cell temperature (R in thermistor mode, W in I2C mode). 0.1 K units.
    pub const CELL_TEMPERATURE: u8 = 0x08;
    /// Cell voltage (R), 1 mV LSB.
    pub const CELL_VOLTAGE: u8 = 0x09;
    /// Current direction (R/W).
    pub const CURRENT_DIRECTION: u8 = 0x0A;
    /// Adjustment pack application (R/W).
    pub const APA: u8 = 0x0B;
    /// RSOC (R), 1 % LSB.
    pub const RSOC: u8 = 0x0D;
    /// Indicator to empty (R), 0.1 % LSB.
    pub const ITE: u8 = 0x0F;
    /// IC version (R).
    pub const IC_VERSION: u8 = 0x11;
    /// Change of the parameter: battery profile selector (R/W).
    pub const BATTERY_PROFILE: u8 = 0x12;
    /// Alarm low RSOC (R/W), 1 % LSB, 0 disables.
    pub const ALARM_RSOC: u8 = 0x13;
    /// Alarm low cell voltage (R/W), 1 mV LSB, 0 disables.
    pub const ALARM_VOLTAGE: u8 = 0x14;
    /// IC power mode (R/W).
    pub const POWER_MODE: u8 = 0x15;
    /// Status bit: temperature source (R/W).
    pub const STATUS: u8 = 0x16;
    /// Number of the parameter: loaded profile code (R).
    pub const PROFILE_PARAMETER: u8 = 0x1A;
}

/// Magic word written to [`cmd::INITIAL_RSOC`].
pub const RSOC_INIT_CODE: u16 = 0xAA55;

/// Raw temperature code range accepted by the chip (0.1 K units, -20 °C ..= +60 °C).
pub const TEMP_RAW_MIN: u16 = 0x09E4;
pub const TEMP_RAW_MAX: u16 = 0x0D04;
/// Temperature range in 0.1 °C units that the raw range maps onto.
pub const TEMP_DECI_C_MIN: i32 = -200;
pub const TEMP_DECI_C_MAX: i32 = 600;

/// Largest alarm voltage the 16-bit millivolt register can hold.
pub const ALARM_VOLTAGE_MAX_MV: u16 = u16::MAX;
/// Largest alarm RSOC in percent.
pub const ALARM_RSOC_MAX: u8 = 100;

/// Convert a raw cell-voltage word (mV) to volts.
pub fn raw_to_volts(raw: u16) -> f32 {
    raw as f32 / 1000.0
}

/// Convert volts to a millivolt word. Returns `None` when the value does not fit.
pub fn volts_to_raw(volts: f32) -> Option<u16> {
    if !volts.is_finite() || volts < 0.0 {
        return None;
    }
    // Round to the nearest millivolt.
    let mv = volts * 1000.0 + 0.5;
    if mv >= ALARM_VOLTAGE_MAX_MV as f32 + 1.0 {
        return None;
    }
    Some(mv as u16)
}

/// Convert a raw tenths-of-percent word to percent.
pub fn raw_to_percent(raw: u16) -> f32 {
    raw as f32 / 10.0
}

/// Linear remap; integer division truncates toward zero.
fn remap(x: i32, in_lo: i32, in_hi: i32, out_lo: i32, out_hi: i32) -> i32 {
    out_lo + (x - in_lo) * (out_hi - out_lo) / (in_hi - in_lo)
}

/// Remap a raw temperature code to tenths of a degree Celsius.
pub fn raw_to_deci_celsius(raw: u16) -> i32 {
    remap(
        raw as i32,
        TEMP_RAW_MIN as i32,
        TEMP_RAW_MAX as i32,
        TEMP_DECI_C_MIN,
        TEMP_DECI_C_MAX,
    )
}

/// Convert a raw temperature code to degrees Celsius.
pub fn raw_to_celsius(raw: u16) -> f32 {
    raw_to_deci_celsius(raw) as f32 / 10.0
}

/// Convert degrees Celsius to a raw temperature code. Clamps to the chip range;
/// returns `None` for NaN.
pub fn celsius_to_raw(celsius: f32) -> Option<u16> {
    if celsius.is_nan() {
        return None;
    }
    let scaled = celsius * 10.0;
    // Round half away from zero; `as` saturates on overflow.
    let rounded = if scaled < 0.0 { scaled - 0.5 } else { scaled + 0.5 };
    let deci = (rounded as i32).clamp(TEMP_DECI_C_MIN, TEMP_DECI_C_MAX);
    Some(remap(
        deci,
        TEMP_DECI_C_MIN,
        TEMP_DECI_C_MAX,
        TEMP_RAW_MIN as i32,
        TEMP_RAW_MAX as i32,
    ) as u16)
}
