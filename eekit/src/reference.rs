//! Static quick-reference tables: serial bus interfaces and common sensor
//! families.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::core::ToolboxError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Interface {
    I2c,
    Spi,
    Uart,
    Can,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterfaceInfo {
    pub interface: Interface,
    pub pins: &'static [&'static str],
    pub speed: &'static str,
    pub tips: &'static str,
}

impl Interface {
    pub const ALL: [Interface; 4] = [Interface::I2c, Interface::Spi, Interface::Uart, Interface::Can];

    pub fn info(&self) -> InterfaceInfo {
        const I2C_PINS: &[&str] = &["SDA", "SCL"];
        const SPI_PINS: &[&str] = &["MOSI", "MISO", "SCK", "CS"];
        const UART_PINS: &[&str] = &["TX", "RX", "(GND)"];
        const CAN_PINS: &[&str] = &["CAN_H", "CAN_L"];

        let (pins, speed, tips) = match self {
            Interface::I2c => (
                I2C_PINS,
                "100/400/1000 kHz",
                "Requires pull-up resistors (typically 2.2k-10k).",
            ),
            Interface::Spi => (
                SPI_PINS,
                "10 - 50+ MHz",
                "Supports full-duplex. Multiple slaves require separate CS pins.",
            ),
            Interface::Uart => (
                UART_PINS,
                "9600 - 1M+ bps",
                "Asynchronous. Ensure baud rates match on both ends.",
            ),
            Interface::Can => (
                CAN_PINS,
                "125k - 1M bps",
                "Differential pair. Requires 120Ω termination at bus ends.",
            ),
        };
        InterfaceInfo {
            interface: *self,
            pins,
            speed,
            tips,
        }
    }
}

impl fmt::Display for Interface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Interface::I2c => "I2C",
            Interface::Spi => "SPI",
            Interface::Uart => "UART",
            Interface::Can => "CAN",
        };
        f.write_str(s)
    }
}

impl FromStr for Interface {
    type Err = ToolboxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "I2C" | "I²C" => Ok(Interface::I2c),
            "SPI" => Ok(Interface::Spi),
            "UART" => Ok(Interface::Uart),
            "CAN" => Ok(Interface::Can),
            _ => Err(ToolboxError::UnknownUnitOrDimension(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SensorCategory {
    Environment,
    Motion,
    Light,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SensorInfo {
    pub name: &'static str,
    pub range: &'static str,
    /// Typical parts.
    pub typical: &'static str,
    /// Precision, resolution or other headline spec.
    pub key_spec: &'static str,
}

const fn sensor(
    name: &'static str,
    range: &'static str,
    typical: &'static str,
    key_spec: &'static str,
) -> SensorInfo {
    SensorInfo {
        name,
        range,
        typical,
        key_spec,
    }
}

static ENVIRONMENT: [SensorInfo; 3] = [
    sensor("Temperature", "-40 to 125°C", "TMP117, SHT40", "±0.1°C"),
    sensor("Pressure", "300 to 1100 hPa", "BMP280, LPS22", "±1 hPa"),
    sensor("Humidity", "0 to 100% RH", "HDC1080", "±2%"),
];

static MOTION: [SensorInfo; 3] = [
    sensor("Accelerometer", "±2g to ±16g", "LIS3DH, BMA400", "12-16 Bit"),
    sensor("Gyroscope", "±125 to ±2000 dps", "ICM-42605", "16 Bit"),
    sensor("Magnetometer", "±4800 uT", "MMC5603", "16 Bit"),
];

static LIGHT: [SensorInfo; 2] = [
    sensor("ALS", "0.01 to 64k Lux", "OPT3001", "Human Eye"),
    sensor("ToF", "0 to 4m", "VL53L1X", "Laser/IR"),
];

impl SensorCategory {
    pub const ALL: [SensorCategory; 3] = [
        SensorCategory::Environment,
        SensorCategory::Motion,
        SensorCategory::Light,
    ];

    pub fn sensors(&self) -> &'static [SensorInfo] {
        match self {
            SensorCategory::Environment => &ENVIRONMENT,
            SensorCategory::Motion => &MOTION,
            SensorCategory::Light => &LIGHT,
        }
    }
}

impl fmt::Display for SensorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SensorCategory::Environment => "Environment",
            SensorCategory::Motion => "Motion",
            SensorCategory::Light => "Light",
        };
        f.write_str(s)
    }
}

impl FromStr for SensorCategory {
    type Err = ToolboxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "env" | "environment" => Ok(SensorCategory::Environment),
            "motion" => Ok(SensorCategory::Motion),
            "light" => Ok(SensorCategory::Light),
            _ => Err(ToolboxError::UnknownUnitOrDimension(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interface_lookup() {
        let can: Interface = "can".parse().unwrap();
        let info = can.info();
        assert_eq!(info.pins, &["CAN_H", "CAN_L"]);
        assert!(info.tips.contains("120Ω"));
        assert!("usb".parse::<Interface>().is_err());
    }

    #[test]
    fn test_every_interface_has_pins() {
        for iface in Interface::ALL {
            assert!(!iface.info().pins.is_empty(), "{}", iface);
        }
    }

    #[test]
    fn test_sensor_categories() {
        assert_eq!("env".parse::<SensorCategory>().unwrap(), SensorCategory::Environment);
        assert_eq!(SensorCategory::Light.sensors().len(), 2);
        assert_eq!(SensorCategory::Motion.sensors()[1].name, "Gyroscope");
    }
}
