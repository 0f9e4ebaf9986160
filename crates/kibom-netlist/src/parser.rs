use std::collections::{BTreeMap, BTreeSet};

use roxmltree::{Document, Node};

use crate::{Component, Netlist, NetlistError, Result};

pub(crate) fn parse_netlist(xml: &str) -> Result<Netlist> {
    let doc = Document::parse(xml)?;
    let root = doc.root_element();

    if root.tag_name().name() != "export" {
        return Err(NetlistError::InvalidStructure(format!(
            "expected root element 'export', found '{}'",
            root.tag_name().name()
        )));
    }

    let components_node = root
        .children()
        .filter(|n| n.is_element())
        .find(|n| n.tag_name().name() == "components")
        .ok_or(NetlistError::MissingElement("components"))?;

    let mut components = Vec::new();
    for comp in components_node
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == "comp")
    {
        components.push(parse_comp(&comp)?);
    }

    log::debug!("parsed netlist with {} components", components.len());
    Ok(Netlist { components })
}

fn parse_comp(node: &Node) -> Result<Component> {
    let reference = node
        .attribute("ref")
        .ok_or(NetlistError::MissingAttribute {
            element: "comp",
            attr: "ref",
        })?
        .to_string();

    let mut value = String::new();
    let mut footprint = String::new();
    let mut fields = BTreeMap::new();
    let mut properties = BTreeSet::new();

    for child in node.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "value" => value = element_text(&child),
            "footprint" => footprint = element_text(&child),
            "fields" => {
                for field in child
                    .children()
                    .filter(|n| n.is_element() && n.tag_name().name() == "field")
                {
                    if let Some(name) = field.attribute("name") {
                        fields.insert(name.to_string(), element_text(&field));
                    }
                }
            }
            "property" => {
                if let Some(name) = child.attribute("name") {
                    properties.insert(name.to_string());
                }
            }
            _ => {}
        }
    }

    Ok(Component {
        reference,
        value,
        footprint,
        fields,
        properties,
    })
}

fn element_text(node: &Node) -> String {
    node.text().unwrap_or("").trim().to_string()
}

#[cfg(test)]
mod tests {
    use crate::Netlist;

    const NETLIST: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<export version="E">
  <design>
    <source>demo.kicad_sch</source>
    <tool>Eeschema</tool>
  </design>
  <components>
    <comp ref="R1">
      <value>10k</value>
      <footprint>resistors:0603</footprint>
      <fields>
        <field name="PN">RC0603FR-0710KL</field>
        <field name="Manufacturer">Yageo</field>
      </fields>
    </comp>
    <comp ref="C3">
      <value>100nF</value>
      <footprint>capacitors:0402</footprint>
    </comp>
    <comp ref="#PWR01">
      <value>GND</value>
      <footprint></footprint>
    </comp>
    <comp ref="TP1">
      <value>TestPoint</value>
      <footprint>testpoints:pad</footprint>
      <property name="exclude_from_bom"/>
    </comp>
  </components>
  <nets>
    <net code="1" name="GND"/>
  </nets>
</export>
"##;

    #[test]
    fn parses_components_in_document_order() {
        let netlist = Netlist::parse(NETLIST).unwrap();
        let refs: Vec<&str> = netlist
            .components()
            .iter()
            .map(|c| c.reference.as_str())
            .collect();
        assert_eq!(refs, ["R1", "C3", "#PWR01", "TP1"]);

        let r1 = &netlist.components()[0];
        assert_eq!(r1.value, "10k");
        assert_eq!(r1.footprint, "resistors:0603");
        assert_eq!(r1.field("PN"), "RC0603FR-0710KL");
        assert_eq!(r1.field("Manufacturer"), "Yageo");
    }

    #[test]
    fn absent_fields_read_as_empty() {
        let netlist = Netlist::parse(NETLIST).unwrap();
        let c3 = &netlist.components()[1];
        assert_eq!(c3.field("PN"), "");
        assert_eq!(c3.field("DoNotBOM"), "");
    }

    #[test]
    fn interesting_filter_drops_power_flags_and_excluded_symbols() {
        let netlist = Netlist::parse(NETLIST).unwrap();
        let refs: Vec<&str> = netlist
            .interesting_components()
            .iter()
            .map(|c| c.reference.as_str())
            .collect();
        assert_eq!(refs, ["R1", "C3"]);
    }

    #[test]
    fn rejects_wrong_root_element() {
        let err = Netlist::parse("<netlist/>").unwrap_err();
        assert!(err.to_string().contains("export"));
    }

    #[test]
    fn rejects_missing_components_section() {
        let err = Netlist::parse("<export version=\"E\"><design/></export>").unwrap_err();
        assert!(err.to_string().contains("components"));
    }

    #[test]
    fn rejects_comp_without_ref() {
        let xml = "<export><components><comp><value>10k</value></comp></components></export>";
        let err = Netlist::parse(xml).unwrap_err();
        assert!(err.to_string().contains("ref"));
    }
}
