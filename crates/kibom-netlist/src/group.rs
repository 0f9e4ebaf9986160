use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::{
    Component, FIELD_DESCRIPTION, FIELD_DIELECTRIC, FIELD_MANUFACTURER, FIELD_PN, FIELD_PN_ALT1,
    FIELD_PN_ALT2, FIELD_TOLERANCE, FIELD_TYPE,
};

/// Fields that participate in group identity. Two components may share a
/// group only when they are interchangeable as a single BOM line.
/// `DoNotBOM` is intentionally absent: exclusion is per instance, so a
/// group can mix populated and unpopulated members.
const GROUP_FIELDS: &[&str] = &[
    FIELD_PN,
    FIELD_MANUFACTURER,
    FIELD_PN_ALT1,
    FIELD_PN_ALT2,
    FIELD_TYPE,
    FIELD_DIELECTRIC,
    FIELD_TOLERANCE,
    FIELD_DESCRIPTION,
];

/// An ordered, non-empty set of components treated as one BOM line.
#[derive(Debug, Clone)]
pub struct ComponentGroup<'a> {
    members: Vec<&'a Component>,
}

impl<'a> ComponentGroup<'a> {
    /// Members in first-seen order.
    pub fn members(&self) -> &[&'a Component] {
        &self.members
    }

    /// The first member. It supplies every per-row attribute except the
    /// designator list and quantity.
    pub fn representative(&self) -> &'a Component {
        self.members[0]
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[derive(Debug, PartialEq, Eq, Hash)]
struct GroupKey<'a> {
    value: &'a str,
    footprint: &'a str,
    fields: [&'a str; GROUP_FIELDS.len()],
}

impl<'a> GroupKey<'a> {
    fn of(component: &'a Component) -> Self {
        Self {
            value: &component.value,
            footprint: &component.footprint,
            fields: std::array::from_fn(|i| component.field(GROUP_FIELDS[i])),
        }
    }
}

/// Partition components into groups, preserving the first-occurrence order
/// of each distinct group and the within-group order of members.
pub fn group_components<'a>(components: &[&'a Component]) -> Vec<ComponentGroup<'a>> {
    let mut index: HashMap<GroupKey<'a>, usize> = HashMap::new();
    let mut groups: Vec<ComponentGroup<'a>> = Vec::new();

    for &component in components {
        match index.entry(GroupKey::of(component)) {
            Entry::Occupied(slot) => groups[*slot.get()].members.push(component),
            Entry::Vacant(slot) => {
                slot.insert(groups.len());
                groups.push(ComponentGroup {
                    members: vec![component],
                });
            }
        }
    }

    groups
}
