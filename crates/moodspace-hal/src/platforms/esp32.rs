// Copyright 2025 MoodSpace Kinetic contributors
// SPDX-License-Identifier: Apache-2.0

//! ESP32 platform (ESP-IDF, std)
//!
//! Board wiring:
//! - Pixy2 on I2C0, SDA GPIO21, SCL GPIO22
//! - Bus probe on SPI2, SCK GPIO18, MOSI GPIO23, MISO GPIO19, CS GPIO5

use std::net::IpAddr;

use anyhow::{anyhow, Context};
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::delay::FreeRtos;
use esp_idf_svc::hal::gpio::{Gpio18, Gpio19, Gpio21, Gpio22, Gpio23, Gpio5};
use esp_idf_svc::hal::i2c::{I2cConfig, I2cDriver, I2C0};
use esp_idf_svc::hal::modem::Modem;
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::hal::prelude::*;
use esp_idf_svc::hal::spi::{config::Config as SpiConfig, config::MODE_1, SpiDeviceDriver, SpiDriver, SpiDriverConfig, SPI2};
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::sys::{self as esp_idf_sys, EspError};
use esp_idf_svc::wifi::{AuthMethod, ClientConfiguration, Configuration, EspWifi};
use tracing::info;

use crate::hal::{NetworkLink, Platform, TimeProvider, WifiCredentials};
use crate::sensors::{Pixy2, Pixy2Config};

/// DHCP hostname announced when credentials do not name one
pub const DEFAULT_HOSTNAME: &str = "MoodSpace-ESP32";

/// SPI clock for the bus probe
pub const SPI_PROBE_FREQUENCY_HZ: u32 = 1_000_000;

/// ESP32 platform structure
pub struct Esp32Platform {
    _private: (),
}

impl Esp32Platform {
    /// Initialize the ESP-IDF runtime
    pub fn init() -> anyhow::Result<Self> {
        esp_idf_sys::link_patches();
        info!(target: "moodspace-hal", "ESP32 platform initialized");
        Ok(Self { _private: () })
    }

    /// Get ESP32 chip model
    pub fn chip_model(&self) -> &'static str {
        #[cfg(feature = "esp32-s3")]
        {
            return "ESP32-S3";
        }
        #[cfg(feature = "esp32-c3")]
        {
            return "ESP32-C3";
        }
        #[allow(unreachable_code)]
        "ESP32"
    }

    pub fn free_heap_bytes(&self) -> usize {
        unsafe { esp_idf_sys::esp_get_free_heap_size() as usize }
    }
}

impl TimeProvider for Esp32Platform {
    fn get_time_us(&self) -> u64 {
        unsafe { esp_idf_sys::esp_timer_get_time() as u64 }
    }

    fn delay_us(&self, us: u32) {
        unsafe { esp_idf_sys::esp_rom_delay_us(us) }
    }

    // Yield to FreeRTOS instead of spinning
    fn delay_ms(&self, ms: u32) {
        FreeRtos::delay_ms(ms);
    }
}

impl Platform for Esp32Platform {
    fn name(&self) -> &'static str {
        self.chip_model()
    }
}

/// Station-mode Wi-Fi link
pub struct Esp32WifiLink {
    wifi: EspWifi<'static>,
}

impl Esp32WifiLink {
    pub fn new(modem: Modem) -> anyhow::Result<Self> {
        let sysloop = EspSystemEventLoop::take().context("Failed to take system event loop")?;
        let nvs = EspDefaultNvsPartition::take().context("Failed to take NVS partition")?;
        let wifi = EspWifi::new(modem, sysloop, Some(nvs)).context("Failed to create Wi-Fi driver")?;
        Ok(Self { wifi })
    }
}

/// Wi-Fi setup failures
#[derive(Debug, thiserror::Error)]
pub enum Esp32WifiError {
    #[error(transparent)]
    Driver(#[from] EspError),

    #[error("{0} is too long")]
    TooLong(&'static str),
}

impl NetworkLink for Esp32WifiLink {
    type Error = Esp32WifiError;

    fn begin_connect(&mut self, credentials: &WifiCredentials) -> Result<(), Self::Error> {
        let hostname = credentials.hostname.as_deref().unwrap_or(DEFAULT_HOSTNAME);
        self.wifi.sta_netif_mut().set_hostname(hostname)?;

        let auth_method = if credentials.password.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };
        let client = ClientConfiguration {
            ssid: credentials
                .ssid
                .as_str()
                .try_into()
                .map_err(|_| Esp32WifiError::TooLong("SSID"))?,
            password: credentials
                .password
                .as_str()
                .try_into()
                .map_err(|_| Esp32WifiError::TooLong("password"))?,
            auth_method,
            ..Default::default()
        };

        self.wifi.set_configuration(&Configuration::Client(client))?;
        self.wifi.start()?;
        self.wifi.connect()?;
        Ok(())
    }

    fn is_connected(&mut self) -> Result<bool, Self::Error> {
        Ok(self.wifi.is_connected()? && self.wifi.sta_netif().is_up()?)
    }

    fn local_address(&mut self) -> Result<Option<IpAddr>, Self::Error> {
        let ip = self.wifi.sta_netif().get_ip_info()?.ip;
        Ok((!ip.is_unspecified()).then_some(IpAddr::V4(ip)))
    }
}

/// Pixy2 on I2C0 (SDA GPIO21, SCL GPIO22)
pub fn pixy2_on_i2c0(
    i2c0: I2C0,
    sda: Gpio21,
    scl: Gpio22,
    frequency_hz: u32,
    config: Pixy2Config,
) -> anyhow::Result<Pixy2<I2cDriver<'static>>> {
    let bus_config = I2cConfig::new().baudrate(frequency_hz.Hz().into());
    let i2c = I2cDriver::new(i2c0, sda, scl, &bus_config)
        .map_err(|e| anyhow!("Failed to initialize I2C0: {:?}", e))?;
    info!(
        target: "moodspace-hal",
        "Pixy2 on I2C0 (SDA 21, SCL 22) at {} Hz, address 0x{:02x}",
        frequency_hz, config.address
    );
    Ok(Pixy2::new(i2c, config))
}

/// SPI device for the bus probe (SPI2, mode 1, 1 MHz)
pub fn spi_probe_device(
    spi2: SPI2,
    sck: Gpio18,
    mosi: Gpio23,
    miso: Gpio19,
    cs: Gpio5,
) -> anyhow::Result<SpiDeviceDriver<'static, SpiDriver<'static>>> {
    let bus_config = SpiConfig::new()
        .baudrate(SPI_PROBE_FREQUENCY_HZ.Hz())
        .data_mode(MODE_1);
    SpiDeviceDriver::new_single(
        spi2,
        sck,
        mosi,
        Some(miso),
        Some(cs),
        &SpiDriverConfig::new(),
        &bus_config,
    )
    .map_err(|e| anyhow!("Failed to initialize SPI2: {:?}", e))
}

/// Pixy2 driver type on this board
pub type Pixy2I2c = Pixy2<I2cDriver<'static>>;

/// SPI device type used by the bus probe
pub type SpiProbeDevice = SpiDeviceDriver<'static, SpiDriver<'static>>;

/// Everything the monitor needs, carved out of the chip peripherals
pub struct Esp32Board {
    pub platform: Esp32Platform,
    pub wifi: Esp32WifiLink,
    pub pixy: Pixy2I2c,
}

impl Esp32Board {
    /// Take the peripherals (once per boot) and wire up Wi-Fi and the camera
    pub fn take(i2c_frequency_hz: u32, pixy_config: Pixy2Config) -> anyhow::Result<Self> {
        let platform = Esp32Platform::init()?;
        let peripherals = Peripherals::take().context("Peripherals already taken")?;
        let wifi = Esp32WifiLink::new(peripherals.modem)?;
        let pixy = pixy2_on_i2c0(
            peripherals.i2c0,
            peripherals.pins.gpio21,
            peripherals.pins.gpio22,
            i2c_frequency_hz,
            pixy_config,
        )?;
        Ok(Self { platform, wifi, pixy })
    }
}

/// Take the peripherals and open the SPI probe device
pub fn take_spi_probe() -> anyhow::Result<(Esp32Platform, SpiProbeDevice)> {
    let platform = Esp32Platform::init()?;
    let peripherals = Peripherals::take().context("Peripherals already taken")?;
    let device = spi_probe_device(
        peripherals.spi2,
        peripherals.pins.gpio18,
        peripherals.pins.gpio23,
        peripherals.pins.gpio19,
        peripherals.pins.gpio5,
    )?;
    Ok((platform, device))
}
