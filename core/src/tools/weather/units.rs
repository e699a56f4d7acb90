use serde::{Deserialize, Serialize};
use std::fmt;

const ABSOLUTE_ZERO_CELSIUS: f64 = 273.15;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Celsius => f.write_str("celsius"),
            Self::Fahrenheit => f.write_str("fahrenheit"),
        }
    }
}

/// Whole degrees for Celsius, two decimals for Fahrenheit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Temperature {
    Whole(i64),
    Decimal(f64),
}

impl Temperature {
    pub fn from_kelvin(kelvin: f64, unit: TemperatureUnit) -> Self {
        match unit {
            TemperatureUnit::Celsius => Self::Whole(kelvin_to_celsius(kelvin)),
            TemperatureUnit::Fahrenheit => Self::Decimal(kelvin_to_fahrenheit(kelvin)),
        }
    }
}

/// Halves go to the even neighbour: 275.65 K is 2, not 3.
pub fn kelvin_to_celsius(kelvin: f64) -> i64 {
    (kelvin - ABSOLUTE_ZERO_CELSIUS).round_ties_even() as i64
}

pub fn kelvin_to_fahrenheit(kelvin: f64) -> f64 {
    round2((kelvin - ABSOLUTE_ZERO_CELSIUS) * 9.0 / 5.0 + 32.0)
}

/// Two decimals of the value actually stored, so -99.535 (held as
/// -99.53499..) becomes -99.53.
fn round2(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}
