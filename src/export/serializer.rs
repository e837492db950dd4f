//! Walks the constructed form tree into raw report lines

use crate::export::formatter::ensure_ends_with_dot;
use crate::form::{FieldKind, FieldWidget, FormPage, FormTree, NodeId, NodeKind};

/// Width of separator and spacer rules in the raw text
const RULE_WIDTH: usize = 120;

fn rule_line() -> String {
    "-".repeat(RULE_WIDTH)
}

/// Serialize the form subtree into raw, line-oriented text.
///
/// Pre-order walk: a node's own text precedes its children's. Recognized
/// structural units each emit one fragment; every other node emits nothing
/// and is descended into. Traversal never descends beneath an emitted
/// field group or passthrough element.
pub fn serialize(page: &FormPage) -> String {
    let mut out = String::new();
    for &child in page.tree().children(page.form()) {
        visit(page.tree(), child, &mut out);
    }
    out.trim().to_string()
}

fn visit(tree: &FormTree, id: NodeId, out: &mut String) {
    let node = tree.node(id);
    match &node.kind {
        NodeKind::Separator => {
            out.push('\n');
            out.push_str(&rule_line());
            out.push('\n');
        }
        NodeKind::LineSpacer => {
            out.push_str(&rule_line());
            out.push('\n');
        }
        NodeKind::Header { text, .. } => {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                out.push_str(trimmed);
                out.push_str(":\n");
            }
        }
        // opaque passthrough: verbatim text, no field interpretation below
        kind if node.has_class_prefix("proc") => {
            let text = match kind {
                NodeKind::Element { text } => text.as_str(),
                _ => "",
            };
            out.push_str(text.trim());
            out.push('\n');
        }
        NodeKind::FieldGroup(widget) => {
            out.push_str(&field_line(widget));
            out.push('\n');
        }
        _ => {
            for &child in &node.children {
                visit(tree, child, out);
            }
        }
    }
}

/// Compose one labeled value line. Selects contribute the selected
/// option's display text, everything else its trimmed current value.
fn field_line(widget: &FieldWidget) -> String {
    let value = match widget.kind {
        FieldKind::Select => widget.selected_text().unwrap_or("").trim().to_string(),
        _ => widget.value.trim().to_string(),
    };
    let content = match widget.label.as_deref() {
        Some(label) => {
            let label = label.strip_suffix(':').unwrap_or(label).trim();
            match widget.sub_text.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
                Some(sub_text) => format!("{label}: {value} {sub_text}"),
                None => format!("{label}: {value}"),
            }
        }
        None => value,
    };
    ensure_ends_with_dot(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{
        ElementOptions, FieldDescriptor, FieldOption, FormPage, InputListParams, PageConfig,
    };

    fn page() -> FormPage {
        FormPage::new(PageConfig::default()).unwrap()
    }

    fn rule() -> String {
        "-".repeat(120)
    }

    #[test]
    fn test_empty_form_serializes_to_nothing() {
        assert_eq!(serialize(&page()), "");
    }

    #[test]
    fn test_separator_and_spacer_framing() {
        let mut page = page();
        page.add_field(FieldDescriptor::text("a").label("A:").initial_value("1"))
            .unwrap();
        page.add_separator();
        page.add_spacer();
        let raw = serialize(&page);
        assert_eq!(raw, format!("A: 1.\n\n{rule}\n{rule}", rule = rule()));
    }

    #[test]
    fn test_header_inside_form_gets_colon() {
        let mut page = page();
        let form = page.form();
        page.add_header("Complaints", 3, Some(form)).unwrap();
        assert_eq!(serialize(&page), "Complaints:");
    }

    #[test]
    fn test_blank_header_emits_nothing() {
        let mut page = page();
        let form = page.form();
        page.add_header("   ", 3, Some(form)).unwrap();
        assert_eq!(serialize(&page), "");
    }

    #[test]
    fn test_header_before_form_is_not_serialized() {
        let mut page = page();
        page.add_header("Consultation", 1, None).unwrap();
        assert_eq!(serialize(&page), "");
    }

    #[test]
    fn test_passthrough_element_is_verbatim() {
        let mut page = page();
        page.create_element(ElementOptions::named("title").text("  ## Consultation record  "));
        assert_eq!(serialize(&page), "## Consultation record");
    }

    #[test]
    fn test_unclassified_element_emits_nothing() {
        let mut page = page();
        page.create_element(
            ElementOptions::default()
                .text("invisible")
                .class("plain-note"),
        );
        assert_eq!(serialize(&page), "");
    }

    #[test]
    fn test_labeled_field_line() {
        let mut page = page();
        page.add_field(
            FieldDescriptor::text("growth")
                .label("Height:")
                .initial_value("180")
                .sub_text("cm"),
        )
        .unwrap();
        assert_eq!(serialize(&page), "Height: 180 cm.");
    }

    #[test]
    fn test_label_colon_is_stripped_before_composing() {
        let mut page = page();
        page.add_field(FieldDescriptor::text("pulse").label("Pulse:").initial_value("70"))
            .unwrap();
        assert_eq!(serialize(&page), "Pulse: 70.");
    }

    #[test]
    fn test_unlabeled_field_emits_value_alone() {
        let mut page = page();
        page.add_field(FieldDescriptor::text("note").initial_value("stable"))
            .unwrap();
        assert_eq!(serialize(&page), "stable.");
    }

    #[test]
    fn test_select_uses_display_text_not_value() {
        let mut page = page();
        page.add_field(
            FieldDescriptor::select(
                "blood",
                vec![
                    FieldOption::new("O", "O (I)"),
                    FieldOption::new("A", "A (II)"),
                ],
            )
            .label("Blood group:")
            .initial_value("A"),
        )
        .unwrap();
        assert_eq!(serialize(&page), "Blood group: A (II).");
    }

    #[test]
    fn test_fields_in_sub_containers_are_reached() {
        let mut page = page();
        let section = page.add_div("exam-section", None);
        page.add_field(
            FieldDescriptor::text("pulse")
                .label("Pulse:")
                .initial_value("70")
                .container(section),
        )
        .unwrap();
        assert_eq!(serialize(&page), "Pulse: 70.");
    }

    #[test]
    fn test_input_lists_emit_nothing() {
        let mut page = page();
        page.create_input_list(
            InputListParams::new("complaints").values(vec!["headache".to_string()]),
        );
        assert_eq!(serialize(&page), "");
    }

    #[test]
    fn test_document_order_is_preserved() {
        let mut page = page();
        let form = page.form();
        page.add_header("Vitals", 2, Some(form)).unwrap();
        page.add_field(FieldDescriptor::text("growth").label("Height:").initial_value("180"))
            .unwrap();
        page.add_separator();
        page.add_field(FieldDescriptor::text("mass").label("Weight:").initial_value("75"))
            .unwrap();
        let raw = serialize(&page);
        assert_eq!(
            raw,
            format!(
                "Vitals:\nHeight: 180.\n\n{rule}\nWeight: 75.",
                rule = rule()
            )
        );
    }
}
