use crate::tables::ClassificationTables;

/// Dielectric class inferred from a capacitance value: picofarad-range
/// parts get "NP0", anything larger "x5r or x7r".
pub fn insulation(value: &str) -> &'static str {
    if value.to_lowercase().contains("pf") {
        "NP0"
    } else {
        "x5r or x7r"
    }
}

/// "1%" for resistors, "20%" for capacitors, "-" for everything else.
/// Substring match on the category, so compound labels like
/// "do not mount resistor" still count as resistors.
pub fn tolerance(category: &str) -> &'static str {
    let category = category.to_lowercase();
    if category.contains("resistor") {
        "1%"
    } else if category.contains("capacitor") {
        "20%"
    } else {
        "-"
    }
}

/// Concatenated digits of a footprint name ("R_0603_1608Metric" -> "06031608").
pub fn case_code(footprint: &str) -> String {
    footprint.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Produce a free-text description for a part.
///
/// The value-override table wins outright; otherwise capacitors, resistors
/// and inductors get a templated phrase built from the case code, and any
/// other category gets no description at all. The exact spacing of the
/// templates (including the missing blanks in the resistor and inductor
/// forms) is kept byte-for-byte: downstream sheets match on these strings.
pub fn describe(
    tables: &ClassificationTables,
    category: &str,
    value: &str,
    footprint: &str,
) -> String {
    if let Some(fixed) = tables.description_for_value(value) {
        return fixed.to_string();
    }

    let case = case_code(footprint);
    let lower = category.to_lowercase();
    let base = format!("Any {value} {category} value");

    if lower.contains("capacitor") {
        format!("{base} with {} isolator in {case} case", insulation(value))
    } else if lower.contains("resistor") {
        format!("{base} in {case}case with 1% tolerance")
    } else if lower.contains("inductor") {
        format!("{base}in {case} case")
    } else {
        String::new()
    }
}
