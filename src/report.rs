use crate::import::EntityImporter;
use crate::ir::PortRecord;

/// Human-readable listing of everything the importer currently holds.
///
/// Deselected records are kept in the listing and marked `(disabled)`.
pub fn interface_report(importer: &EntityImporter) -> String {
    let Some(entity) = importer.entity() else {
        return "No entity found\n".to_string();
    };

    let mut result = String::new();
    result.push_str(&format!("Entity: {}\n", entity.name));

    result.push_str(&format!("  Generics: {}\n", importer.generics().len()));
    for generic in importer.generics() {
        result.push_str(&format!("    {} : {}", generic.name, generic.generic_type));
        if !generic.value.is_empty() {
            result.push_str(&format!(" = {}", generic.value));
        }
        if !generic.description.is_empty() {
            result.push_str(&format!("  -- {}", generic.description));
        }
        if !generic.enabled {
            result.push_str(" (disabled)");
        }
        result.push('\n');
    }

    result.push_str(&format!("  Ports: {}\n", importer.ports().len()));
    for port in importer.ports() {
        result.push_str(&format!(
            "    {} : {} {}",
            port.name,
            port.direction.as_str(),
            port_type(port)
        ));
        if !port.default_value.is_empty() {
            result.push_str(&format!(" := {}", port.default_value));
        }
        if !port.description.is_empty() {
            result.push_str(&format!("  -- {}", port.description));
        }
        if !port.enabled {
            result.push_str(" (disabled)");
        }
        result.push('\n');
    }

    let dependencies = importer.graph().edge_count();
    if dependencies > 0 {
        result.push_str(&format!("  Dependencies: {}\n", dependencies));
        for generic in importer.generics() {
            let dependents: Vec<&str> = importer
                .graph()
                .dependent_generics(generic.id)
                .filter_map(|id| importer.generic(id).map(|g| g.name.as_str()))
                .chain(
                    importer
                        .graph()
                        .dependent_ports(generic.id)
                        .filter_map(|id| importer.port(id).map(|p| p.name.as_str())),
                )
                .collect();
            if !dependents.is_empty() {
                result.push_str(&format!("    {} -> {}\n", generic.name, dependents.join(", ")));
            }
        }
    }

    result
}

fn port_type(port: &PortRecord) -> String {
    if port.left_bound == 0 && port.right_bound == 0 {
        port.port_type.clone()
    } else {
        format!("{}[{}:{}]", port.port_type, port.left_bound, port.right_bound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::RecordingSink;

    #[test]
    fn test_report_lists_interface() {
        let mut importer = EntityImporter::default();
        let mut sink = RecordingSink::new();
        importer.load_document(
            "entity alu is\n  generic (N : integer := 4);\n  port (\n    a : in bit_vector(N-1 downto 0); -- operand\n    en : in bit\n  );\nend alu;\n",
            &mut sink,
        );
        let span = importer.span_of("en").unwrap();
        importer.on_selection_toggled(span, false, &mut sink).unwrap();

        let report = interface_report(&importer);
        assert!(report.starts_with("Entity: alu\n"));
        assert!(report.contains("    N : integer = 4\n"));
        assert!(report.contains("    a : in bit_vector[3:0]  -- operand\n"));
        assert!(report.contains("    en : in bit (disabled)\n"));
        assert!(report.contains("    N -> a\n"));
    }

    #[test]
    fn test_report_without_entity() {
        let importer = EntityImporter::default();
        assert_eq!(interface_report(&importer), "No entity found\n");
    }
}
