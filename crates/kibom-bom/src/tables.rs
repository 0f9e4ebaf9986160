use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid BOM config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Static classification data, constructed once and passed by reference.
///
/// Key casing is normalized at construction so lookups never re-case the
/// tables themselves: partnumber keys are stored upper-case, corrector and
/// description keys lower-case, whitelist tokens lower-case. Designator
/// keys are matched exactly as authored.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClassificationTables {
    /// Category tokens recognized in footprint namespaces. Lower-case,
    /// plural form ("capacitors", not "Capacitor").
    pub whitelist: BTreeSet<String>,
    /// Partnumber to category, for parts whose category cannot be inferred
    /// from footprint or designator.
    pub by_partnumber: HashMap<String, String>,
    /// Raw category token to display label (e.g. "capacitors" to
    /// "Capacitor SMD"). Applied after resolution.
    pub corrector: HashMap<String, String>,
    /// Designator prefix to category. The fallback when nothing else
    /// matched, and the primary mechanism with smart mode off.
    pub by_designator: HashMap<String, String>,
    /// Value to fixed description, for parts identified by partnumber-like
    /// values that the templated descriptions cannot cover.
    pub descriptions: HashMap<String, String>,
}

impl Default for ClassificationTables {
    fn default() -> Self {
        let tables = Self {
            whitelist: [
                "capacitors",
                "resistors",
                "inductors",
                "ic",
                "diodes",
                "leds",
                "connectors",
                "installations",
                "antennas",
                "pictures",
                "btnsswitches",
                "quartz",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            by_partnumber: [
                ("MSD3C031V", "Bidir Zener"),
                ("SY8120", "IC"),
                ("STM32F411CxU6", "IC"),
                ("ICN2012", "IC"),
                ("ICN2595", "IC"),
                ("AT24C01D", "IC"),
            ]
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
            corrector: [
                ("leds", "LED RGB"),
                ("capacitors", "Capacitor SMD"),
                ("resistors", "Resistor SMD"),
                ("inductors", "Inductor SMD"),
                ("ic", "IC"),
                ("connectors", "Connector"),
                ("transistors", "Transistor"),
            ]
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
            by_designator: [
                ("C", "Capacitor SMD"),
                ("DA", "IC"),
                ("DD", "IC"),
                ("D", "Diode"),
                ("Hole", "Do not mount"),
                ("Logo", "Do not mount"),
                ("Q", "Transistor"),
                ("L", "Inductor SMD"),
                ("R", "Resistor SMD"),
                ("SW", "Swith or button"),
                ("TP", "do not mount"),
                ("XL", "Connector"),
                ("XTAL", "Quartz"),
            ]
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
            descriptions: [
                ("SY8120", "Sync Power Supply"),
                ("MSD3C031V", "ESD Protection Zener"),
                ("ICN2595", "16-ch LED current supply"),
                ("AT24C01D", "EEPROM 1k"),
                ("Choke", "Choke"),
            ]
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        };
        tables.normalized()
    }
}

impl ClassificationTables {
    /// Re-case keys per the lookup contract of each table.
    fn normalized(self) -> Self {
        Self {
            whitelist: self.whitelist.iter().map(|t| t.to_lowercase()).collect(),
            by_partnumber: self
                .by_partnumber
                .into_iter()
                .map(|(k, v)| (k.to_uppercase(), v))
                .collect(),
            corrector: self
                .corrector
                .into_iter()
                .map(|(k, v)| (k.to_lowercase(), v))
                .collect(),
            by_designator: self.by_designator,
            descriptions: self
                .descriptions
                .into_iter()
                .map(|(k, v)| (k.to_lowercase(), v))
                .collect(),
        }
    }

    /// Partnumber override lookup, case-insensitive.
    pub fn category_for_partnumber(&self, partnumber: &str) -> Option<&str> {
        self.by_partnumber
            .get(&partnumber.to_uppercase())
            .map(String::as_str)
    }

    /// Whether a footprint namespace token names a known category.
    pub fn is_known_category(&self, token: &str) -> bool {
        self.whitelist.contains(&token.to_lowercase())
    }

    /// Display label for a resolved category token, if one is configured.
    pub fn correct(&self, category: &str) -> Option<&str> {
        self.corrector
            .get(&category.to_lowercase())
            .map(String::as_str)
    }

    /// Designator-prefix default lookup. Exact match.
    pub fn category_for_prefix(&self, prefix: &str) -> Option<&str> {
        self.by_designator.get(prefix).map(String::as_str)
    }

    /// Fixed description override lookup, case-insensitive on the value.
    pub fn description_for_value(&self, value: &str) -> Option<&str> {
        self.descriptions
            .get(&value.to_lowercase())
            .map(String::as_str)
    }
}

/// The full configuration surface of the BOM engine.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BomConfig {
    /// Classify from the footprint namespace (`category:shape`) before
    /// falling back to the designator table.
    pub smart: bool,
    pub tables: ClassificationTables,
}

impl Default for BomConfig {
    fn default() -> Self {
        Self {
            smart: true,
            tables: ClassificationTables::default(),
        }
    }
}

impl BomConfig {
    /// Load configuration from a TOML string. Missing sections keep their
    /// built-in defaults; present tables replace the defaults wholesale.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        Ok(Self {
            smart: config.smart,
            tables: config.tables.normalized(),
        })
    }

    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
