use std::io::{self, Write};

use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{ContentArrangement, Table};

use crate::row::{BomRow, BOM_COLUMNS};

/// Render rows as a terminal table, in emitted order.
pub fn write_table<W: Write>(rows: &[BomRow], mut writer: W) -> io::Result<()> {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::DynamicFullWidth);
    table.set_header(BOM_COLUMNS);

    for row in rows {
        table.add_row(vec![
            row.category.clone(),
            row.value.clone(),
            row.partnumber.clone(),
            row.manufacturer.clone(),
            row.pn_alt1.clone(),
            row.pn_alt2.clone(),
            row.designators.clone(),
            row.footprint.clone(),
            row.dielectric.clone(),
            row.tolerance.clone(),
            row.description.clone(),
            row.quantity.to_string(),
        ]);
    }

    writeln!(writer, "{table}")?;
    Ok(())
}
