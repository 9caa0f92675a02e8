use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

pub const ML_PER_OZ: f64 = 29.5735;
pub const ML_PER_CUP: f64 = 236.588;

/// Display unit for amounts. Everything on disk is milliliters.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Ml,
    Oz,
    Cups,
}

impl Unit {
    pub const ALL: [Unit; 3] = [Unit::Ml, Unit::Oz, Unit::Cups];

    pub const fn ml_per_unit(self) -> f64 {
        match self {
            Unit::Ml => 1.0,
            Unit::Oz => ML_PER_OZ,
            Unit::Cups => ML_PER_CUP,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Unit::Ml => "ml",
            Unit::Oz => "oz",
            Unit::Cups => "cups",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ml" => Ok(Unit::Ml),
            "oz" => Ok(Unit::Oz),
            "cup" | "cups" => Ok(Unit::Cups),
            other => Err(format!("unknown unit '{other}' (expected ml, oz or cups)")),
        }
    }
}

/// Converts `amount` between units. Not rounded; round when displaying.
pub fn convert(amount: f64, from: Unit, to: Unit) -> f64 {
    if from == to {
        return amount;
    }

    let amount_ml = amount * from.ml_per_unit();
    amount_ml / to.ml_per_unit()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_unit_is_identity() {
        for unit in Unit::ALL {
            for x in [0.0, 1.0, 250.0, 1234.5678, -3.0] {
                assert_eq!(convert(x, unit, unit), x);
            }
        }
    }

    #[test]
    fn converting_there_and_back_is_lossless_within_rounding() {
        for from in Unit::ALL {
            for to in Unit::ALL {
                for x in [0.5, 8.0, 250.0, 2000.0] {
                    let back = convert(convert(x, from, to), to, from);
                    assert!((back - x).abs() < 1e-9, "{x} {from} -> {to} -> {back}");
                }
            }
        }
    }

    #[test]
    fn uses_fixed_table() {
        assert_eq!(convert(1.0, Unit::Oz, Unit::Ml), 29.5735);
        assert_eq!(convert(1.0, Unit::Cups, Unit::Ml), 236.588);
        assert_eq!(convert(236.588, Unit::Ml, Unit::Cups), 1.0);
        assert!((convert(1.0, Unit::Cups, Unit::Oz) - 8.0).abs() < 0.001);
    }

    #[test]
    fn parses_and_serializes_unit_names() {
        assert_eq!("cups".parse::<Unit>(), Ok(Unit::Cups));
        assert_eq!("OZ".parse::<Unit>(), Ok(Unit::Oz));
        assert!("litre".parse::<Unit>().is_err());
        assert_eq!(serde_json::to_string(&Unit::Cups).unwrap(), "\"cups\"");
        assert_eq!(serde_json::from_str::<Unit>("\"ml\"").unwrap(), Unit::Ml);
    }
}
