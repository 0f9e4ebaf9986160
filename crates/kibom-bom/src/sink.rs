use std::io::Write;

use crate::row::{BomRow, BOM_COLUMNS};

/// Write rows as CSV with the standard twelve-column header. The header is
/// written even when the row set is empty.
pub fn write_csv<W: Write>(rows: &[BomRow], writer: W) -> csv::Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(BOM_COLUMNS)?;
    for row in rows {
        csv_writer.write_record([
            &row.category,
            &row.value,
            &row.partnumber,
            &row.manufacturer,
            &row.pn_alt1,
            &row.pn_alt2,
            &row.designators,
            &row.footprint,
            &row.dielectric,
            &row.tolerance,
            &row.description,
            &row.quantity.to_string(),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Rows as pretty-printed JSON, column names as keys.
pub fn rows_json(rows: &[BomRow]) -> String {
    serde_json::to_string_pretty(rows).unwrap()
}
