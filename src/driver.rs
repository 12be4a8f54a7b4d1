//! LC709203F driver.
//! Blocking API over `embedded_hal::i2c::I2c`; the `async` feature adds `_async` twins
//! over `embedded_hal_async::i2c::I2c` with the same semantics.

use crate::codec::{self, READ_REPLY_LEN};
use crate::data_types::{
    BatteryProfile, ChargeReport, Config, CurrentDirection, InitConfig, InitPolicy, PackSize, PowerMode,
    TemperatureMode,
};
use crate::error::Error;
use crate::registers::{
    ALARM_RSOC_MAX, RSOC_INIT_CODE, celsius_to_raw, cmd, raw_to_celsius, raw_to_percent, raw_to_volts,
    volts_to_raw,
};

/// Open device session: the chip answered a presence probe at `address`.
struct Session {
    address: u8,
}

/// LC709203F fuel gauge.
///
/// The driver owns the bus. Register access requires an open session, created by
/// [`begin`](Self::begin) and released by [`end`](Self::end), by the next `begin`,
/// or when the driver is dropped or [`free`](Self::free)d.
pub struct Lc709203f<I2C> {
    i2c: I2C,
    config: Config,
    session: Option<Session>,
}

impl<I2C> Lc709203f<I2C> {
    /// Create a driver with the default configuration (address 0x0B, probe-only init,
    /// charge reported as remaining).
    pub fn new(i2c: I2C) -> Self {
        Self::with_config(i2c, Config::default())
    }

    /// Create a driver with an explicit configuration.
    pub fn with_config(i2c: I2C, config: Config) -> Self {
        Self {
            i2c,
            config,
            session: None,
        }
    }

    /// Configuration this driver was created with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Address of the open session, if any.
    pub fn session_address(&self) -> Option<u8> {
        self.session.as_ref().map(|s| s.address)
    }

    /// Whether a session is open.
    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// Release the current session. Subsequent register access fails with
    /// [`Error::NotInitialized`] until `begin` succeeds again.
    pub fn end(&mut self) {
        if let Some(_session) = self.session.take() {
            debug!("LC709203F: session at {:#x} released", _session.address);
        }
    }

    /// Release the session and return the bus.
    pub fn free(mut self) -> I2C {
        self.end();
        self.i2c
    }

    fn ite_to_percent(&self, raw: u16) -> f32 {
        let ratio = raw_to_percent(raw);
        match self.config.charge {
            ChargeReport::Remaining => ratio,
            ChargeReport::ToEmpty => 100.0 - ratio,
        }
    }
}

fn decode<T, E>(raw: u16, from_code: fn(u16) -> Option<T>) -> Result<T, Error<E>> {
    from_code(raw).ok_or(Error::InvalidValue(raw))
}

impl<I2C> Lc709203f<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    /// Open a session at the configured address.
    pub fn begin(&mut self) -> Result<(), Error<I2C::Error>> {
        self.begin_at(self.config.address)
    }

    /// Open a session at `address`, releasing any previous session first.
    ///
    /// Fails if the chip does not acknowledge its address. The IC version is then
    /// read as a liveness probe whose outcome does not affect the result. With
    /// [`InitPolicy::Configure`] the configuration is written afterwards and any
    /// failed write is returned.
    pub fn begin_at(&mut self, address: u8) -> Result<(), Error<I2C::Error>> {
        self.end();
        self.i2c.write(address, &[]).map_err(|e| {
            warn!("LC709203F: no response at {:#x}", address);
            Error::I2c(e)
        })?;
        self.session = Some(Session { address });
        debug!("LC709203F: session open at {:#x}", address);

        match self.ic_version() {
            Ok(_version) => {
                debug!("LC709203F: IC version {:#x}", _version);
            }
            Err(_) => {
                warn!("LC709203F: version probe failed");
            }
        }

        match self.config.init {
            InitPolicy::ProbeOnly => Ok(()),
            InitPolicy::Configure(init) => self.configure(&init),
        }
    }

    /// Write power mode, pack size, battery profile and temperature source, in that order.
    pub fn configure(&mut self, init: &InitConfig) -> Result<(), Error<I2C::Error>> {
        self.set_power_mode(init.power_mode)?;
        self.set_pack_size(init.pack_size)?;
        self.set_battery_profile(init.profile)?;
        self.set_temperature_mode(init.temperature)
    }

    /// Read a CRC-checked 16-bit word.
    pub fn read_word(&mut self, command: u8) -> Result<u16, Error<I2C::Error>> {
        let Some(address) = self.session_address() else {
            return Err(Error::NotInitialized);
        };
        let mut reply = [0u8; READ_REPLY_LEN];
        self.i2c
            .write_read(address, &[command], &mut reply)
            .map_err(Error::I2c)?;
        let value = codec::decode_read(address, command, reply).map_err(|m| {
            warn!(
                "LC709203F: CRC mismatch on {:#x} (expected {:#x}, received {:#x})",
                command, m.expected, m.received
            );
            Error::<I2C::Error>::Crc(m)
        })?;
        trace!("LC709203F: read {:#x} = {:#x}", command, value);
        Ok(value)
    }

    /// Write a CRC-framed 16-bit word.
    pub fn write_word(&mut self, command: u8, value: u16) -> Result<(), Error<I2C::Error>> {
        let Some(address) = self.session_address() else {
            return Err(Error::NotInitialized);
        };
        let frame = codec::encode_write(address, command, value);
        trace!("LC709203F: write {:#x} = {:#x}", command, value);
        self.i2c.write(address, &frame).map_err(Error::I2c)
    }

    /// Raw IC version identifier.
    pub fn ic_version(&mut self) -> Result<u16, Error<I2C::Error>> {
        self.read_word(cmd::IC_VERSION)
    }

    /// Cell voltage in volts.
    pub fn cell_voltage(&mut self) -> Result<f32, Error<I2C::Error>> {
        Ok(raw_to_volts(self.read_word(cmd::CELL_VOLTAGE)?))
    }

    /// Charge in percent from the ITE register, interpreted per [`ChargeReport`].
    pub fn cell_percent(&mut self) -> Result<f32, Error<I2C::Error>> {
        let raw = self.read_word(cmd::ITE)?;
        Ok(self.ite_to_percent(raw))
    }

    /// RSOC in whole percent.
    pub fn rsoc_percent(&mut self) -> Result<u16, Error<I2C::Error>> {
        self.read_word(cmd::RSOC)
    }

    /// Cell temperature in degrees Celsius.
    pub fn cell_temperature(&mut self) -> Result<f32, Error<I2C::Error>> {
        Ok(raw_to_celsius(self.read_word(cmd::CELL_TEMPERATURE)?))
    }

    /// Report the cell temperature to the chip (I2C temperature mode). Clamped to -20..=60 °C;
    /// NaN is rejected with [`Error::OutOfRange`].
    pub fn set_cell_temperature(&mut self, celsius: f32) -> Result<(), Error<I2C::Error>> {
        let Some(raw) = celsius_to_raw(celsius) else {
            return Err(Error::OutOfRange);
        };
        self.write_word(cmd::CELL_TEMPERATURE, raw)
    }

    /// Thermistor B-constant.
    pub fn thermistor_b(&mut self) -> Result<u16, Error<I2C::Error>> {
        self.read_word(cmd::THERMISTOR_B)
    }

    /// Set the thermistor B-constant.
    pub fn set_thermistor_b(&mut self, b: u16) -> Result<(), Error<I2C::Error>> {
        self.write_word(cmd::THERMISTOR_B, b)
    }

    /// Selected battery profile.
    pub fn battery_profile(&mut self) -> Result<BatteryProfile, Error<I2C::Error>> {
        decode(self.read_word(cmd::BATTERY_PROFILE)?, BatteryProfile::from_code)
    }

    /// Select the battery profile.
    pub fn set_battery_profile(&mut self, profile: BatteryProfile) -> Result<(), Error<I2C::Error>> {
        self.write_word(cmd::BATTERY_PROFILE, profile.code())
    }

    /// Profile code currently loaded (register 0x1A).
    pub fn battery_profile_code(&mut self) -> Result<u16, Error<I2C::Error>> {
        self.read_word(cmd::PROFILE_PARAMETER)
    }

    /// Current IC power mode.
    pub fn power_mode(&mut self) -> Result<PowerMode, Error<I2C::Error>> {
        decode(self.read_word(cmd::POWER_MODE)?, PowerMode::from_code)
    }

    /// Switch between operate and sleep.
    pub fn set_power_mode(&mut self, mode: PowerMode) -> Result<(), Error<I2C::Error>> {
        self.write_word(cmd::POWER_MODE, mode.code())
    }

    /// Write the APA code for an approximate pack capacity.
    pub fn set_pack_size(&mut self, size: PackSize) -> Result<(), Error<I2C::Error>> {
        self.write_word(cmd::APA, size.apa())
    }

    /// Write a raw APA value for packs between the enumerated sizes.
    pub fn set_pack_apa(&mut self, apa: u16) -> Result<(), Error<I2C::Error>> {
        self.write_word(cmd::APA, apa)
    }

    /// Temperature source (I2C or thermistor).
    pub fn temperature_mode(&mut self) -> Result<TemperatureMode, Error<I2C::Error>> {
        decode(self.read_word(cmd::STATUS)?, TemperatureMode::from_code)
    }

    /// Select the temperature source.
    pub fn set_temperature_mode(&mut self, mode: TemperatureMode) -> Result<(), Error<I2C::Error>> {
        self.write_word(cmd::STATUS, mode.code())
    }

    /// Low-RSOC alarm threshold in percent (0 disables).
    pub fn set_alarm_rsoc(&mut self, percent: u8) -> Result<(), Error<I2C::Error>> {
        if percent > ALARM_RSOC_MAX {
            return Err(Error::OutOfRange);
        }
        self.write_word(cmd::ALARM_RSOC, percent as u16)
    }

    /// Low-voltage alarm threshold in volts (0 disables).
    pub fn set_alarm_voltage(&mut self, volts: f32) -> Result<(), Error<I2C::Error>> {
        let Some(mv) = volts_to_raw(volts) else {
            return Err(Error::OutOfRange);
        };
        self.write_word(cmd::ALARM_VOLTAGE, mv)
    }

    /// Set the current direction (auto, charge, discharge).
    pub fn set_current_direction(&mut self, direction: CurrentDirection) -> Result<(), Error<I2C::Error>> {
        self.write_word(cmd::CURRENT_DIRECTION, direction.code())
    }

    /// Restart the RSOC estimate.
    pub fn init_rsoc(&mut self) -> Result<(), Error<I2C::Error>> {
        self.write_word(cmd::INITIAL_RSOC, RSOC_INIT_CODE)
    }
}

#[cfg(feature = "async")]
impl<I2C> Lc709203f<I2C>
where
    I2C: embedded_hal_async::i2c::I2c,
{
    /// Async version of [`begin`](Self::begin).
    pub async fn begin_async(&mut self) -> Result<(), Error<I2C::Error>> {
        self.begin_at_async(self.config.address).await
    }

    pub async fn begin_at_async(&mut self, address: u8) -> Result<(), Error<I2C::Error>> {
        self.end();
        self.i2c.write(address, &[]).await.map_err(|e| {
            warn!("LC709203F: no response at {:#x}", address);
            Error::I2c(e)
        })?;
        self.session = Some(Session { address });
        debug!("LC709203F: session open at {:#x}", address);

        match self.ic_version_async().await {
            Ok(_version) => {
                debug!("LC709203F: IC version {:#x}", _version);
            }
            Err(_) => {
                warn!("LC709203F: version probe failed");
            }
        }

        match self.config.init {
            InitPolicy::ProbeOnly => Ok(()),
            InitPolicy::Configure(init) => self.configure_async(&init).await,
        }
    }

    pub async fn configure_async(&mut self, init: &InitConfig) -> Result<(), Error<I2C::Error>> {
        self.set_power_mode_async(init.power_mode).await?;
        self.set_pack_size_async(init.pack_size).await?;
        self.set_battery_profile_async(init.profile).await?;
        self.set_temperature_mode_async(init.temperature).await
    }

    pub async fn read_word_async(&mut self, command: u8) -> Result<u16, Error<I2C::Error>> {
        let Some(address) = self.session_address() else {
            return Err(Error::NotInitialized);
        };
        let mut reply = [0u8; READ_REPLY_LEN];
        self.i2c
            .write_read(address, &[command], &mut reply)
            .await
            .map_err(Error::I2c)?;
        let value = codec::decode_read(address, command, reply).map_err(|m| {
            warn!(
                "LC709203F: CRC mismatch on {:#x} (expected {:#x}, received {:#x})",
                command, m.expected, m.received
            );
            Error::<I2C::Error>::Crc(m)
        })?;
        trace!("LC709203F: read {:#x} = {:#x}", command, value);
        Ok(value)
    }

    pub async fn write_word_async(&mut self, command: u8, value: u16) -> Result<(), Error<I2C::Error>> {
        let Some(address) = self.session_address() else {
            return Err(Error::NotInitialized);
        };
        let frame = codec::encode_write(address, command, value);
        trace!("LC709203F: write {:#x} = {:#x}", command, value);
        self.i2c.write(address, &frame).await.map_err(Error::I2c)
    }

    pub async fn ic_version_async(&mut self) -> Result<u16, Error<I2C::Error>> {
        self.read_word_async(cmd::IC_VERSION).await
    }

    pub async fn cell_voltage_async(&mut self) -> Result<f32, Error<I2C::Error>> {
        Ok(raw_to_volts(self.read_word_async(cmd::CELL_VOLTAGE).await?))
    }

    pub async fn cell_percent_async(&mut self) -> Result<f32, Error<I2C::Error>> {
        let raw = self.read_word_async(cmd::ITE).await?;
        Ok(self.ite_to_percent(raw))
    }

    pub async fn rsoc_percent_async(&mut self) -> Result<u16, Error<I2C::Error>> {
        self.read_word_async(cmd::RSOC).await
    }

    pub async fn cell_temperature_async(&mut self) -> Result<f32, Error<I2C::Error>> {
        Ok(raw_to_celsius(self.read_word_async(cmd::CELL_TEMPERATURE).await?))
    }

    pub async fn set_cell_temperature_async(&mut self, celsius: f32) -> Result<(), Error<I2C::Error>> {
        let Some(raw) = celsius_to_raw(celsius) else {
            return Err(Error::OutOfRange);
        };
        self.write_word_async(cmd::CELL_TEMPERATURE, raw).await
    }

    pub async fn thermistor_b_async(&mut self) -> Result<u16, Error<I2C::Error>> {
        self.read_word_async(cmd::THERMISTOR_B).await
    }

    pub async fn set_thermistor_b_async(&mut self, b: u16) -> Result<(), Error<I2C::Error>> {
        self.write_word_async(cmd::THERMISTOR_B, b).await
    }

    pub async fn battery_profile_async(&mut self) -> Result<BatteryProfile, Error<I2C::Error>> {
        decode(
            self.read_word_async(cmd::BATTERY_PROFILE).await?,
            BatteryProfile::from_code,
        )
    }

    pub async fn set_battery_profile_async(&mut self, profile: BatteryProfile) -> Result<(), Error<I2C::Error>> {
        self.write_word_async(cmd::BATTERY_PROFILE, profile.code()).await
    }

    pub async fn battery_profile_code_async(&mut self) -> Result<u16, Error<I2C::Error>> {
        self.read_word_async(cmd::PROFILE_PARAMETER).await
    }

    pub async fn power_mode_async(&mut self) -> Result<PowerMode, Error<I2C::Error>> {
        decode(self.read_word_async(cmd::POWER_MODE).await?, PowerMode::from_code)
    }

    pub async fn set_power_mode_async(&mut self, mode: PowerMode) -> Result<(), Error<I2C::Error>> {
        self.write_word_async(cmd::POWER_MODE, mode.code()).await
    }

    pub async fn set_pack_size_async(&mut self, size: PackSize) -> Result<(), Error<I2C::Error>> {
        self.write_word_async(cmd::APA, size.apa()).await
    }

    pub async fn set_pack_apa_async(&mut self, apa: u16) -> Result<(), Error<I2C::Error>> {
        self.write_word_async(cmd::APA, apa).await
    }

    pub async fn temperature_mode_async(&mut self) -> Result<TemperatureMode, Error<I2C::Error>> {
        decode(self.read_word_async(cmd::STATUS).await?, TemperatureMode::from_code)
    }

    pub async fn set_temperature_mode_async(&mut self, mode: TemperatureMode) -> Result<(), Error<I2C::Error>> {
        self.write_word_async(cmd::STATUS, mode.code()).await
    }

    pub async fn set_alarm_rsoc_async(&mut self, percent: u8) -> Result<(), Error<I2C::Error>> {
        if percent > ALARM_RSOC_MAX {
            return Err(Error::OutOfRange);
        }
        self.write_word_async(cmd::ALARM_RSOC, percent as u16).await
    }

    pub async fn set_alarm_voltage_async(&mut self, volts: f32) -> Result<(), Error<I2C::Error>> {
        let Some(mv) = volts_to_raw(volts) else {
            return Err(Error::OutOfRange);
        };
        self.write_word_async(cmd::ALARM_VOLTAGE, mv).await
    }

    pub async fn set_current_direction_async(&mut self, direction: CurrentDirection) -> Result<(), Error<I2C::Error>> {
        self.write_word_async(cmd::CURRENT_DIRECTION, direction.code()).await
    }

    pub async fn init_rsoc_async(&mut self) -> Result<(), Error<I2C::Error>> {
        self.write_word_async(cmd::INITIAL_RSOC, RSOC_INIT_CODE).await
    }
}
