//! The BOM core: classification tables, category resolution, attribute
//! synthesis and row building.
//!
//! The pipeline is a pure in-memory transform. Components come from
//! `kibom-netlist`, get partitioned into groups there, and each group is
//! turned into exactly one output row here (or none, when every member is
//! marked `DoNotBOM`). Nothing in this crate fails on malformed input:
//! unknown parts degrade to empty categories, blank descriptions and a
//! `"-"` tolerance rather than errors.

#[cfg(feature = "table")]
mod bom_table;
mod classify;
mod describe;
mod row;
mod sink;
mod tables;

#[cfg(feature = "table")]
pub use bom_table::write_table;
pub use classify::{classify, designator_prefix, TypeRule};
pub use describe::{case_code, describe, insulation, tolerance};
pub use row::{build_rows, BomRow, BOM_COLUMNS};
pub use sink::{rows_json, write_csv};
pub use tables::{BomConfig, ClassificationTables, ConfigError};
