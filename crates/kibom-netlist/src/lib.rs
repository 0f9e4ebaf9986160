//! KiCad netlist reading for BOM generation.
//!
//! Parses the XML netlist document that KiCad hands to BOM plugins
//! (`<export>` root, `eeschema` "generic" netlist format) into read-only
//! [`Component`] records, and partitions interchangeable components into
//! [`ComponentGroup`]s, one per BOM line.
//!
//! The structures here are deliberately dumb: all classification and row
//! synthesis lives in the `kibom-bom` crate, which borrows components from
//! this one.

mod group;
mod parser;

pub use group::{group_components, ComponentGroup};

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use thiserror::Error;

/// Field that stores the primary partnumber.
pub const FIELD_PN: &str = "PN";
/// Field that stores the part manufacturer.
pub const FIELD_MANUFACTURER: &str = "Manufacturer";
/// First substitute partnumber field.
pub const FIELD_PN_ALT1: &str = "PN Alternative 1";
/// Second substitute partnumber field.
pub const FIELD_PN_ALT2: &str = "PN Alternative 2";
/// Explicit category override field.
pub const FIELD_TYPE: &str = "Type";
/// Explicit dielectric/insulation override field.
pub const FIELD_DIELECTRIC: &str = "Dielectric";
/// Explicit tolerance override field.
pub const FIELD_TOLERANCE: &str = "Tolerance";
/// Explicit description override field.
pub const FIELD_DESCRIPTION: &str = "Description";
/// Any non-empty value excludes the instance from the designator list.
pub const FIELD_DO_NOT_BOM: &str = "DoNotBOM";

/// KiCad property marking a symbol as excluded from BOM output.
pub const PROP_EXCLUDE_FROM_BOM: &str = "exclude_from_bom";

#[derive(Debug, Error)]
pub enum NetlistError {
    #[error("XML parse error: {0}")]
    XmlParse(#[from] roxmltree::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Missing required element: {0}")]
    MissingElement(&'static str),

    #[error("Missing required attribute '{attr}' on element '{element}'")]
    MissingAttribute {
        element: &'static str,
        attr: &'static str,
    },

    #[error("Invalid netlist structure: {0}")]
    InvalidStructure(String),
}

pub type Result<T> = std::result::Result<T, NetlistError>;

/// A single component instance from the netlist. Read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    /// Reference designator, unique per placement (e.g. "R12").
    pub reference: String,
    /// Schematic value string (e.g. "10k", "100nF").
    pub value: String,
    /// Footprint identifier, optionally namespaced as `library:shape`.
    pub footprint: String,
    /// Named fields from the symbol. Unset fields are simply absent.
    pub fields: BTreeMap<String, String>,
    /// KiCad symbol properties present on this instance (names only).
    pub properties: BTreeSet<String>,
}

impl Component {
    /// Named-field lookup; returns the empty string when the field is unset.
    pub fn field(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or("")
    }

    /// Whether this instance belongs on a BOM at all. Power flags and
    /// similar virtual symbols carry `#`-prefixed references; schematic
    /// symbols can also opt out via the `exclude_from_bom` property.
    pub fn is_interesting(&self) -> bool {
        !self.reference.is_empty()
            && !self.reference.starts_with('#')
            && !self.properties.contains(PROP_EXCLUDE_FROM_BOM)
    }
}

/// A parsed netlist. Only the `<components>` section is retained; nets and
/// library parts are irrelevant to BOM generation.
#[derive(Debug, Clone)]
pub struct Netlist {
    components: Vec<Component>,
}

impl Netlist {
    /// Parse a netlist from an XML string.
    pub fn parse(xml: &str) -> Result<Self> {
        parser::parse_netlist(xml)
    }

    /// Parse a netlist from a file.
    pub fn parse_file(path: impl AsRef<Path>) -> Result<Self> {
        let xml = std::fs::read_to_string(path)?;
        Self::parse(&xml)
    }

    /// All components, in document order.
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Components that belong on a BOM, in document order.
    pub fn interesting_components(&self) -> Vec<&Component> {
        self.components
            .iter()
            .filter(|c| c.is_interesting())
            .collect()
    }
}
