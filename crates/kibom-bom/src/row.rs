use kibom_netlist::{
    ComponentGroup, FIELD_DESCRIPTION, FIELD_DIELECTRIC, FIELD_DO_NOT_BOM, FIELD_MANUFACTURER,
    FIELD_PN, FIELD_PN_ALT1, FIELD_PN_ALT2, FIELD_TOLERANCE, FIELD_TYPE,
};
use serde::Serialize;

use crate::classify::{classify, designator_prefix};
use crate::describe::{describe, insulation, tolerance};
use crate::tables::BomConfig;

/// Column order expected by the spreadsheet consumers.
pub const BOM_COLUMNS: [&str; 12] = [
    "Type",
    "Value",
    "PN",
    "Manufacturer",
    "PN Alternative 1",
    "PN Alternative 2",
    "Designator",
    "Footprint",
    "Dielectric",
    "Tolerance",
    "Description",
    "Quantity",
];

/// One line of the finished BOM.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BomRow {
    #[serde(rename = "Type")]
    pub category: String,
    #[serde(rename = "Value")]
    pub value: String,
    #[serde(rename = "PN")]
    pub partnumber: String,
    #[serde(rename = "Manufacturer")]
    pub manufacturer: String,
    #[serde(rename = "PN Alternative 1")]
    pub pn_alt1: String,
    #[serde(rename = "PN Alternative 2")]
    pub pn_alt2: String,
    #[serde(rename = "Designator")]
    pub designators: String,
    #[serde(rename = "Footprint")]
    pub footprint: String,
    #[serde(rename = "Dielectric")]
    pub dielectric: String,
    #[serde(rename = "Tolerance")]
    pub tolerance: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Quantity")]
    pub quantity: usize,
}

/// Build the ordered row set: one row per group that still has at least
/// one populated member, in engine-supplied group order. No re-sorting.
pub fn build_rows(config: &BomConfig, groups: &[ComponentGroup]) -> Vec<BomRow> {
    groups
        .iter()
        .filter_map(|group| build_row(config, group))
        .collect()
}

fn build_row(config: &BomConfig, group: &ComponentGroup) -> Option<BomRow> {
    let designators = group
        .members()
        .iter()
        .filter(|c| c.field(FIELD_DO_NOT_BOM).is_empty())
        .map(|c| c.reference.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    if designators.is_empty() {
        log::debug!(
            "skipping fully excluded group ({})",
            group.representative().reference
        );
        return None;
    }

    let representative = group.representative();
    let footprint = &representative.footprint;
    let partnumber = representative.field(FIELD_PN);
    let value = &representative.value;

    // The classification prefix comes from the first reference that
    // survived the DoNotBOM filter, which is not necessarily the
    // representative. Kept as-is.
    let prefix = designator_prefix(designators.split(',').next().unwrap_or(""));

    let category = non_empty_or(representative.field(FIELD_TYPE), || {
        classify(&config.tables, partnumber, footprint, &prefix, config.smart)
    });

    let mut dielectric = representative.field(FIELD_DIELECTRIC).to_string();
    if dielectric.is_empty() && category.to_lowercase().contains("capacitor") {
        dielectric = insulation(value).to_string();
    }

    let row_tolerance = non_empty_or(representative.field(FIELD_TOLERANCE), || {
        tolerance(&category).to_string()
    });

    let description = non_empty_or(representative.field(FIELD_DESCRIPTION), || {
        describe(&config.tables, &category, value, footprint)
    });

    Some(BomRow {
        category,
        value: value.clone(),
        partnumber: partnumber.to_string(),
        manufacturer: representative.field(FIELD_MANUFACTURER).to_string(),
        pn_alt1: representative.field(FIELD_PN_ALT1).to_string(),
        pn_alt2: representative.field(FIELD_PN_ALT2).to_string(),
        designators,
        footprint: footprint.clone(),
        dielectric,
        tolerance: row_tolerance,
        description,
        // Quantity counts every member, DoNotBOM included, while the
        // designator list above omits excluded ones. Kept as-is.
        quantity: group.len(),
    })
}

fn non_empty_or(explicit: &str, fallback: impl FnOnce() -> String) -> String {
    if explicit.is_empty() {
        fallback()
    } else {
        explicit.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kibom_netlist::{group_components, Component};
    use std::collections::{BTreeMap, BTreeSet};

    fn component(reference: &str, value: &str, footprint: &str) -> Component {
        Component {
            reference: reference.to_string(),
            value: value.to_string(),
            footprint: footprint.to_string(),
            fields: BTreeMap::new(),
            properties: BTreeSet::new(),
        }
    }

    fn with_field(mut c: Component, name: &str, value: &str) -> Component {
        c.fields.insert(name.to_string(), value.to_string());
        c
    }

    fn rows_for(components: &[Component]) -> Vec<BomRow> {
        let refs: Vec<&Component> = components.iter().collect();
        let groups = group_components(&refs);
        build_rows(&BomConfig::default(), &groups)
    }

    #[test]
    fn two_identical_resistors_make_one_full_row() {
        let rows = rows_for(&[
            component("R1", "10k", "resistors:0603"),
            component("R2", "10k", "resistors:0603"),
        ]);

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.category, "Resistor SMD");
        assert_eq!(row.value, "10k");
        assert_eq!(row.designators, "R1, R2");
        assert_eq!(row.footprint, "resistors:0603");
        assert_eq!(row.dielectric, "");
        assert_eq!(row.tolerance, "1%");
        assert_eq!(
            row.description,
            "Any 10k Resistor SMD value in 0603case with 1% tolerance"
        );
        assert_eq!(row.quantity, 2);
    }

    #[test]
    fn explicit_type_field_wins_over_the_classifier() {
        // The classifier would say "Resistor SMD"; the explicit field must win.
        let rows = rows_for(&[with_field(
            component("R1", "10k", "resistors:0603"),
            FIELD_TYPE,
            "Jumper",
        )]);

        assert_eq!(rows[0].category, "Jumper");
        assert_eq!(rows[0].tolerance, "-");
        assert_eq!(rows[0].description, "");
    }

    #[test]
    fn explicit_overrides_win_for_all_advisory_fields() {
        let c = with_field(
            with_field(
                with_field(
                    component("C1", "100nF", "capacitors:0402"),
                    FIELD_DIELECTRIC,
                    "X7R",
                ),
                FIELD_TOLERANCE,
                "10%",
            ),
            FIELD_DESCRIPTION,
            "Decoupling cap",
        );
        let rows = rows_for(&[c]);

        let row = &rows[0];
        assert_eq!(row.dielectric, "X7R");
        assert_eq!(row.tolerance, "10%");
        assert_eq!(row.description, "Decoupling cap");
    }

    #[test]
    fn capacitor_rows_get_inferred_dielectric() {
        let rows = rows_for(&[component("C1", "10pF", "capacitors:0402")]);
        assert_eq!(rows[0].category, "Capacitor SMD");
        assert_eq!(rows[0].dielectric, "NP0");
        assert_eq!(rows[0].tolerance, "20%");
    }

    #[test]
    fn fully_excluded_group_emits_no_row() {
        let rows = rows_for(&[with_field(
            component("TP1", "TestPad", "testpoints:pad"),
            FIELD_DO_NOT_BOM,
            "1",
        )]);
        assert!(rows.is_empty());
    }

    #[test]
    fn mixed_exclusion_keeps_quantity_but_drops_the_reference() {
        let rows = rows_for(&[
            component("R1", "10k", "resistors:0603"),
            with_field(component("R2", "10k", "resistors:0603"), FIELD_DO_NOT_BOM, "1"),
            component("R3", "10k", "resistors:0603"),
        ]);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].designators, "R1, R3");
        assert_eq!(rows[0].quantity, 3);
    }

    #[test]
    fn prefix_comes_from_first_surviving_reference() {
        // The representative (and its DoNotBOM sibling) is first in the
        // group, but classification keys off the first listed reference.
        let rows = rows_for(&[
            with_field(component("R1", "10k", "plainlib"), FIELD_DO_NOT_BOM, "1"),
            component("R2", "10k", "plainlib"),
        ]);

        assert_eq!(rows[0].designators, "R2");
        assert_eq!(rows[0].category, "Resistor SMD");
        assert_eq!(rows[0].quantity, 2);
    }

    #[test]
    fn unknown_part_degrades_to_blank_advisory_fields() {
        let rows = rows_for(&[component("ZZ1", "??", "mystery")]);
        let row = &rows[0];
        assert_eq!(row.category, "");
        assert_eq!(row.dielectric, "");
        assert_eq!(row.tolerance, "-");
        assert_eq!(row.description, "");
        assert_eq!(row.quantity, 1);
    }

    #[test]
    fn quantities_conserve_the_component_count() {
        let components = vec![
            component("R1", "10k", "resistors:0603"),
            component("R2", "10k", "resistors:0603"),
            component("C1", "100nF", "capacitors:0402"),
            with_field(component("TP1", "TestPad", "pads:pad"), FIELD_DO_NOT_BOM, "x"),
            with_field(component("R3", "1k", "resistors:0603"), FIELD_DO_NOT_BOM, "x"),
        ];
        let refs: Vec<&Component> = components.iter().collect();
        let groups = group_components(&refs);
        let rows = build_rows(&BomConfig::default(), &groups);

        let emitted: usize = rows.iter().map(|r| r.quantity).sum();
        let fully_excluded: usize = groups
            .iter()
            .filter(|g| {
                g.members()
                    .iter()
                    .all(|c| !c.field(FIELD_DO_NOT_BOM).is_empty())
            })
            .map(|g| g.len())
            .sum();
        assert_eq!(emitted + fully_excluded, components.len());
    }

    #[test]
    fn transform_is_deterministic() {
        let components = vec![
            component("C1", "10pF", "capacitors:0402"),
            component("R1", "10k", "resistors:0603"),
            component("C2", "10pF", "capacitors:0402"),
        ];
        let refs: Vec<&Component> = components.iter().collect();
        let groups = group_components(&refs);
        let config = BomConfig::default();
        assert_eq!(build_rows(&config, &groups), build_rows(&config, &groups));
    }
}
