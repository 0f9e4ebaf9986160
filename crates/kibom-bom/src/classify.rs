use crate::tables::ClassificationTables;

/// One step of the category resolution chain. Rules run in a fixed order
/// and the first one that yields a category wins; the corrector pass then
/// maps the raw token to its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeRule {
    /// Explicit partnumber override (case-insensitive on the partnumber).
    Partnumber,
    /// Footprint namespace (`category:shape`) checked against the
    /// whitelist. Footprints without a namespace separator fall through.
    SmartFootprint,
    /// Designator-prefix default.
    DesignatorPrefix,
}

impl TypeRule {
    /// Apply this rule. `None` means "no opinion": the next rule in the
    /// chain gets a turn.
    pub fn apply(
        self,
        tables: &ClassificationTables,
        partnumber: &str,
        footprint: &str,
        prefix: &str,
    ) -> Option<String> {
        match self {
            TypeRule::Partnumber => tables
                .category_for_partnumber(partnumber)
                .map(str::to_string),
            TypeRule::SmartFootprint => {
                let (namespace, _) = footprint.split_once(':')?;
                let namespace = namespace.to_lowercase();
                tables.is_known_category(&namespace).then_some(namespace)
            }
            TypeRule::DesignatorPrefix => {
                tables.category_for_prefix(prefix).map(str::to_string)
            }
        }
    }
}

const SMART_RULES: &[TypeRule] = &[
    TypeRule::Partnumber,
    TypeRule::SmartFootprint,
    TypeRule::DesignatorPrefix,
];

const DESIGNATOR_RULES: &[TypeRule] = &[TypeRule::Partnumber, TypeRule::DesignatorPrefix];

/// Resolve a component category. Returns the corrected display label, or
/// the empty string when no rule matched.
pub fn classify(
    tables: &ClassificationTables,
    partnumber: &str,
    footprint: &str,
    prefix: &str,
    smart: bool,
) -> String {
    let rules = if smart { SMART_RULES } else { DESIGNATOR_RULES };
    let raw = rules
        .iter()
        .find_map(|rule| rule.apply(tables, partnumber, footprint, prefix))
        .unwrap_or_default();
    match tables.correct(&raw) {
        Some(label) => label.to_string(),
        None => raw,
    }
}

/// Letters of a reference designator ("R12" -> "R").
pub fn designator_prefix(reference: &str) -> String {
    reference.chars().filter(|c| !c.is_ascii_digit()).collect()
}
