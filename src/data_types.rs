//! Data types for LC709203F driver: enumerated register codes and driver policies.

/// Temperature source (STATUS register 0x16).
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TemperatureMode {
    /// Host writes the cell temperature over I2C.
    I2c,
    /// Chip measures the cell temperature through the TSENSE thermistor.
    Thermistor,
}

impl TemperatureMode {
    pub const fn code(self) -> u16 {
        match self {
            TemperatureMode::I2c => 0x0000,
            TemperatureMode::Thermistor => 0x0001,
        }
    }

    pub const fn from_code(code: u16) -> Option<Self> {
        match code {
            0x0000 => Some(TemperatureMode::I2c),
            0x0001 => Some(TemperatureMode::Thermistor),
            _ => None,
        }
    }
}

/// IC power mode (register 0x15).
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PowerMode {
    Operate,
    Sleep,
}

impl PowerMode {
    pub const fn code(self) -> u16 {
        match self {
            PowerMode::Operate => 0x0001,
            PowerMode::Sleep => 0x0002,
        }
    }

    pub const fn from_code(code: u16) -> Option<Self> {
        match code {
            0x0001 => Some(PowerMode::Operate),
            0x0002 => Some(PowerMode::Sleep),
            _ => None,
        }
    }
}

/// Approximate pack capacity classes and their APA codes (register 0x0B).
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PackSize {
    Mah100,
    Mah200,
    Mah500,
    Mah1000,
    Mah2000,
    Mah3000,
}

impl PackSize {
    pub const fn apa(self) -> u16 {
        match self {
            PackSize::Mah100 => 0x08,
            PackSize::Mah200 => 0x0B,
            PackSize::Mah500 => 0x10,
            PackSize::Mah1000 => 0x19,
            PackSize::Mah2000 => 0x2D,
            PackSize::Mah3000 => 0x36,
        }
    }
}

/// Battery profile selector (register 0x12).
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BatteryProfile {
    Profile0,
    Profile1,
}

impl BatteryProfile {
    pub const fn code(self) -> u16 {
        match self {
            BatteryProfile::Profile0 => 0x0000,
            BatteryProfile::Profile1 => 0x0001,
        }
    }

    pub const fn from_code(code: u16) -> Option<Self> {
        match code {
            0x0000 => Some(BatteryProfile::Profile0),
            0x0001 => Some(BatteryProfile::Profile1),
            _ => None,
        }
    }
}

/// Current direction (register 0x0A).
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CurrentDirection {
    Auto,
    Charge,
    Discharge,
}

impl CurrentDirection {
    pub const fn code(self) -> u16 {
        match self {
            CurrentDirection::Auto => 0x0000,
            CurrentDirection::Charge => 0x0001,
            CurrentDirection::Discharge => 0xFFFF,
        }
    }
}

/// What `begin` does after the session is open and the version register was probed.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum InitPolicy {
    /// Only probe liveness; succeed whatever the version read returns.
    #[default]
    ProbeOnly,
    /// Also write the given configuration; any failed write fails `begin`.
    Configure(InitConfig),
}

/// Register values written by [`InitPolicy::Configure`], in write order.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct InitConfig {
    pub power_mode: PowerMode,
    pub pack_size: PackSize,
    pub profile: BatteryProfile,
    pub temperature: TemperatureMode,
}

impl Default for InitConfig {
    fn default() -> Self {
        Self {
            power_mode: PowerMode::Operate,
            pack_size: PackSize::Mah500,
            profile: BatteryProfile::Profile1,
            temperature: TemperatureMode::I2c,
        }
    }
}

/// How `cell_percent` interprets the ITE register (0x0F, 0.1 % units).
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ChargeReport {
    /// Report the ratio as remaining charge.
    #[default]
    Remaining,
    /// Report `100 - ratio`.
    ToEmpty,
}

/// Driver configuration resolved at integration time.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Config {
    /// 7-bit address used by `begin`.
    pub address: u8,
    /// What `begin` does after probing the chip.
    pub init: InitPolicy,
    /// How `cell_percent` reports the ITE register.
    pub charge: ChargeReport,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: crate::registers::DEFAULT_I2C_ADDRESS,
            init: InitPolicy::default(),
            charge: ChargeReport::default(),
        }
    }
}

impl Config {
    pub fn with_address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    pub fn with_init(mut self, init: InitPolicy) -> Self {
        self.init = init;
        self
    }

    pub fn with_charge_report(mut self, charge: ChargeReport) -> Self {
        self.charge = charge;
        self
    }
}
