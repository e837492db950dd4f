//! Field construction and the reactive input contract
//!
//! The host environment calls `handle_input`/`handle_blur` (and the
//! toggle/select/list variants) on its own input events; the factory never
//! registers listeners of its own.

use crate::form::error::FormError;
use crate::form::field::{FieldDescriptor, FieldInitial, FieldKind, FieldOption, FieldWidget};
use crate::form::page::FormPage;
use crate::form::store::FieldValue;
use crate::form::tree::{NodeId, NodeKind};
use uuid::Uuid;

/// Parameters for [`FormPage::create_input_list`]
#[derive(Debug, Clone)]
pub struct InputListParams {
    pub name: String,
    pub values: Vec<String>,
    pub container: Option<NodeId>,
}

impl InputListParams {
    /// A list starting with one blank entry
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            values: vec![String::new()],
            container: None,
        }
    }

    pub fn values(mut self, values: Vec<String>) -> Self {
        self.values = values;
        self
    }

    pub fn container(mut self, container: NodeId) -> Self {
        self.container = Some(container);
        self
    }
}

impl FormPage {
    /// Build one field group from a descriptor: wrapping group node,
    /// optional label, the typed control, a hidden error slot, optional
    /// sub-text. Always seeds the store with the field's initial value.
    pub fn add_field(&mut self, descriptor: FieldDescriptor) -> Result<NodeId, FormError> {
        if descriptor.name.trim().is_empty() {
            return Err(FormError::InvalidDescriptor(
                "field descriptor requires a non-empty name".to_string(),
            ));
        }
        let FieldDescriptor {
            kind,
            name,
            label,
            initial,
            options,
            sub_text,
            required,
            checked,
            container,
            class,
            validation_message,
        } = descriptor;

        let parent = container.unwrap_or(self.form);
        let mut classes = vec!["field-group".to_string(), format!("{name}-group")];
        if let Some(class) = class {
            classes.extend(class.split_whitespace().map(str::to_string));
        }
        if required {
            classes.push("required-field".to_string());
        }

        let mut widget = FieldWidget {
            name: name.clone(),
            kind,
            label,
            value: String::new(),
            checked: false,
            options,
            selected: None,
            sub_text,
            required,
            validation_message,
            error_visible: false,
            flagged: false,
        };

        let seed = match kind {
            FieldKind::Select => {
                widget.selected = resolve_selected(&widget.options, &initial);
                FieldValue::Text(widget.selected_value().unwrap_or("").to_string())
            }
            FieldKind::Checkbox | FieldKind::Radio => {
                widget.checked = checked;
                widget.value = initial.as_text();
                FieldValue::Flag(checked)
            }
            FieldKind::Text | FieldKind::Datalist | FieldKind::TextArea => {
                widget.value = initial.as_text();
                FieldValue::Text(widget.value.clone())
            }
        };

        let id = self
            .tree
            .append(parent, NodeKind::FieldGroup(widget), classes);
        if let Some(prior) = self.fields.insert(name.clone(), id) {
            // duplicate names silently take over the mapping
            tracing::debug!("field {name:?} redefined, node {prior:?} unmapped");
            self.field_order.retain(|n| n != &name);
        }
        self.field_order.push(name.clone());
        self.data.set(name, seed);
        Ok(id)
    }

    /// Write a changed value into the store and the live control, clearing
    /// any visible validation error. Unknown names are ignored.
    pub fn handle_input(&mut self, name: &str, value: &str) {
        let Some(widget) = self.widget_mut(name) else {
            return;
        };
        match widget.kind {
            FieldKind::Select => {
                if let Some(index) = widget.options.iter().position(|opt| opt.value == value) {
                    widget.selected = Some(index);
                }
            }
            _ => widget.value = value.to_string(),
        }
        if widget.error_visible {
            widget.error_visible = false;
            widget.flagged = false;
        }
        self.data
            .set(name.to_string(), FieldValue::Text(value.to_string()));
    }

    /// Focus-loss validation: advisory flagging only, never an error path
    pub fn handle_blur(&mut self, name: &str) {
        let Some(widget) = self.widget_mut(name) else {
            return;
        };
        if widget.required && widget.effective_is_empty() {
            widget.error_visible = true;
            widget.flagged = true;
        } else {
            widget.error_visible = false;
            widget.flagged = false;
        }
    }

    /// Set a toggle control's boolean state
    pub fn set_checked(&mut self, name: &str, checked: bool) {
        let Some(widget) = self.widget_mut(name) else {
            return;
        };
        if !widget.kind.is_toggle() {
            return;
        }
        widget.checked = checked;
        if widget.error_visible {
            widget.error_visible = false;
            widget.flagged = false;
        }
        self.data.set(name.to_string(), FieldValue::Flag(checked));
    }

    pub fn toggle_checked(&mut self, name: &str) {
        if let Some(widget) = self.field(name) {
            let next = !widget.checked;
            self.set_checked(name, next);
        }
    }

    /// Select an option by index; out-of-range indices are ignored
    pub fn select_option(&mut self, name: &str, index: usize) {
        let Some(widget) = self.widget_mut(name) else {
            return;
        };
        let Some(option) = widget.options.get(index) else {
            return;
        };
        let value = option.value.clone();
        widget.selected = Some(index);
        if widget.error_visible {
            widget.error_visible = false;
            widget.flagged = false;
        }
        self.data.set(name.to_string(), FieldValue::Text(value));
    }

    /// Advance a select to its next option, wrapping around
    pub fn cycle_option(&mut self, name: &str) {
        let Some(widget) = self.field(name) else {
            return;
        };
        if widget.options.is_empty() {
            return;
        }
        let next = widget
            .selected
            .map(|index| (index + 1) % widget.options.len())
            .unwrap_or(0);
        self.select_option(name, next);
    }

    /// Build a growable entry list under one base name and seed its value
    pub fn create_input_list(&mut self, params: InputListParams) -> NodeId {
        let parent = params.container.unwrap_or(self.form);
        let list = self.tree.append(
            parent,
            NodeKind::InputList {
                base_name: params.name.clone(),
            },
            vec!["input-list-container".to_string()],
        );
        self.lists.insert(params.name.clone(), list);
        for value in &params.values {
            self.push_list_entry(list, value);
        }
        self.recompute_list(&params.name);
        list
    }

    /// Append a new entry; returns its id, or None for unknown lists
    pub fn add_list_entry(&mut self, base_name: &str, value: &str) -> Option<Uuid> {
        let list = self.lists.get(base_name).copied()?;
        let id = self.push_list_entry(list, value);
        self.recompute_list(base_name);
        Some(id)
    }

    /// Update one entry's text
    pub fn set_list_entry(&mut self, base_name: &str, entry: Uuid, value: &str) {
        let Some(list) = self.lists.get(base_name).copied() else {
            return;
        };
        let children = self.tree.children(list).to_vec();
        for child in children {
            if let NodeKind::ListEntry { id, value: stored } =
                &mut self.tree.node_mut(child).kind
            {
                if *id == entry {
                    *stored = value.to_string();
                    break;
                }
            }
        }
        self.recompute_list(base_name);
    }

    /// Detach one entry
    pub fn remove_list_entry(&mut self, base_name: &str, entry: Uuid) -> bool {
        let Some(list) = self.lists.get(base_name).copied() else {
            return false;
        };
        let node = self
            .tree
            .children(list)
            .iter()
            .copied()
            .find(|&child| matches!(self.tree.node(child).kind, NodeKind::ListEntry { id, .. } if id == entry));
        match node {
            Some(node) => {
                let removed = self.tree.detach(node);
                self.recompute_list(base_name);
                removed
            }
            None => false,
        }
    }

    /// Current entries of a list in display order
    pub fn list_entries(&self, base_name: &str) -> Vec<(Uuid, String)> {
        let Some(list) = self.lists.get(base_name).copied() else {
            return Vec::new();
        };
        self.tree
            .children(list)
            .iter()
            .filter_map(|&child| match &self.tree.node(child).kind {
                NodeKind::ListEntry { id, value } => Some((*id, value.clone())),
                _ => None,
            })
            .collect()
    }

    fn push_list_entry(&mut self, list: NodeId, value: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.tree.append(
            list,
            NodeKind::ListEntry {
                id,
                value: value.to_string(),
            },
            vec!["input-list-item".to_string()],
        );
        id
    }

    /// The tracked list value is the ordered sequence of non-blank entries
    fn recompute_list(&mut self, base_name: &str) {
        let values: Vec<String> = self
            .list_entries(base_name)
            .into_iter()
            .map(|(_, value)| value)
            .filter(|value| !value.trim().is_empty())
            .collect();
        self.data
            .set(base_name.to_string(), FieldValue::List(values));
    }

    pub(crate) fn rebuild_list_entries(&mut self, list: NodeId, values: &[String]) {
        self.tree.clear_children(list);
        for value in values {
            self.push_list_entry(list, value);
        }
    }
}

fn resolve_selected(options: &[FieldOption], initial: &FieldInitial) -> Option<usize> {
    if options.is_empty() {
        return None;
    }
    let matched = match initial {
        FieldInitial::Absent => Some(0),
        FieldInitial::Value(value) => options.iter().position(|opt| &opt.value == value),
        FieldInitial::Index(index) if *index < options.len() => Some(*index),
        FieldInitial::Index(_) => None,
    };
    // unmatched values and out-of-range indices keep the first option
    Some(matched.unwrap_or(0))
}
