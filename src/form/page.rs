//! Form page assembly: root container resolution and structural helpers

use crate::form::error::FormError;
use crate::form::field::{FieldKind, FieldWidget};
use crate::form::store::{read_snapshot, FieldValue, FormData};
use crate::form::tree::{ContainerKind, FormTree, NodeId, NodeKind};
use crate::platform::{KeyValueStore, Notifier};
use std::collections::{BTreeMap, HashMap};

/// Configuration for a form page
#[derive(Debug, Clone)]
pub struct PageConfig {
    /// Class the root form container is tagged with
    pub form_class: String,
    /// Element kind of the root form container
    pub container_kind: ContainerKind,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            form_class: "form-group".to_string(),
            container_kind: ContainerKind::Form,
        }
    }
}

/// Options for [`FormPage::create_element`]
#[derive(Debug, Clone)]
pub struct ElementOptions {
    pub name: Option<String>,
    pub text: Option<String>,
    pub class: Option<String>,
    pub parent: Option<NodeId>,
    /// Tag the element with `proc-<name>` automatically (default on)
    pub auto_proc: bool,
}

impl Default for ElementOptions {
    fn default() -> Self {
        Self {
            name: None,
            text: None,
            class: None,
            parent: None,
            auto_proc: true,
        }
    }
}

impl ElementOptions {
    pub fn named(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Self::default()
        }
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    pub fn class(mut self, class: &str) -> Self {
        self.class = Some(class.to_string());
        self
    }

    pub fn parent(mut self, parent: NodeId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn auto_proc(mut self, auto_proc: bool) -> Self {
        self.auto_proc = auto_proc;
        self
    }
}

/// A live form: structural tree, tracked values, and name lookups
pub struct FormPage {
    pub(crate) tree: FormTree,
    pub(crate) container: NodeId,
    pub(crate) form: NodeId,
    pub(crate) data: FormData,
    pub(crate) config: PageConfig,
    pub(crate) fields: HashMap<String, NodeId>,
    pub(crate) lists: HashMap<String, NodeId>,
    pub(crate) field_order: Vec<String>,
}

impl FormPage {
    /// Create a page and resolve or create its root form container
    pub fn new(config: PageConfig) -> Result<Self, FormError> {
        if config.form_class.trim().is_empty() {
            return Err(FormError::InvalidDescriptor(
                "container class must be a non-empty string".to_string(),
            ));
        }
        let tree = FormTree::new(vec!["form-container".to_string()]);
        let container = tree.root();
        let mut page = Self {
            tree,
            container,
            form: container,
            data: FormData::default(),
            config,
            fields: HashMap::new(),
            lists: HashMap::new(),
            field_order: Vec::new(),
        };
        page.form = page.ensure_container();
        Ok(page)
    }

    /// Find an existing container of the configured class, or create one
    pub(crate) fn ensure_container(&mut self) -> NodeId {
        if let Some(existing) = self
            .tree
            .find_child_by_class(self.container, &self.config.form_class)
        {
            return existing;
        }
        tracing::debug!(
            "creating <{}> container with class {:?}",
            self.config.container_kind.as_str(),
            self.config.form_class
        );
        self.tree.append(
            self.container,
            NodeKind::Container {
                tag: self.config.container_kind,
            },
            vec![self.config.form_class.clone()],
        )
    }

    pub fn tree(&self) -> &FormTree {
        &self.tree
    }

    /// The root form container node
    pub fn form(&self) -> NodeId {
        self.form
    }

    pub fn data(&self) -> &FormData {
        &self.data
    }

    /// Add a heading. Without a target it is inserted before the form,
    /// outside the serialized subtree.
    pub fn add_header(
        &mut self,
        text: &str,
        level: u8,
        target: Option<NodeId>,
    ) -> Result<NodeId, FormError> {
        if !(1..=6).contains(&level) {
            return Err(FormError::InvalidDescriptor(format!(
                "heading level must be between 1 and 6, got {level}"
            )));
        }
        let classes = vec![
            "form-header".to_string(),
            format!("form-header--{level}"),
        ];
        let kind = NodeKind::Header {
            text: text.to_string(),
            level,
        };
        let id = match target {
            Some(parent) => self.tree.append(parent, kind, classes),
            None => self.tree.insert_before(self.container, self.form, kind, classes),
        };
        Ok(id)
    }

    /// Add a grouping sub-container
    pub fn add_div(&mut self, class: &str, parent: Option<NodeId>) -> NodeId {
        self.tree.append(
            parent.unwrap_or(self.form),
            NodeKind::Container {
                tag: ContainerKind::Div,
            },
            vec![class.to_string()],
        )
    }

    /// Add a section separator
    pub fn add_separator(&mut self) -> NodeId {
        self.tree.append(
            self.form,
            NodeKind::Separator,
            vec!["separator".to_string()],
        )
    }

    /// Add a single rule line
    pub fn add_spacer(&mut self) -> NodeId {
        self.tree.append(
            self.form,
            NodeKind::LineSpacer,
            vec!["line-spacer".to_string()],
        )
    }

    /// Add a generic element; named elements get a `proc-<name>` class
    /// unless auto-tagging is disabled
    pub fn create_element(&mut self, options: ElementOptions) -> NodeId {
        let mut classes: Vec<String> = options
            .class
            .as_deref()
            .map(|raw| raw.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();
        if options.auto_proc {
            if let Some(name) = &options.name {
                let proc_class = format!("proc-{name}");
                if !classes.contains(&proc_class) {
                    classes.push(proc_class);
                }
            }
        }
        self.tree.append(
            options.parent.unwrap_or(self.form),
            NodeKind::Element {
                text: options.text.unwrap_or_default(),
            },
            classes,
        )
    }

    /// Detach a field group by name. The tracked value stays in the store.
    pub fn remove_field(&mut self, name: &str) -> bool {
        match self.fields.remove(name) {
            Some(id) => {
                self.field_order.retain(|n| n != name);
                self.tree.detach(id)
            }
            None => false,
        }
    }

    /// Drop everything inside the form and reset tracked values
    pub fn clear_form(&mut self) {
        self.tree.clear_children(self.form);
        self.fields.clear();
        self.lists.clear();
        self.field_order.clear();
        self.data.clear();
    }

    /// Effective values read from live controls: checked state for
    /// toggles, the selected option value for selects, text otherwise.
    /// Names without a live control (lists, removed fields) are skipped.
    pub fn form_values(&self) -> BTreeMap<String, FieldValue> {
        let mut out = BTreeMap::new();
        for name in self.data.names() {
            if let Some(widget) = self.field(name) {
                let value = if widget.kind.is_toggle() {
                    FieldValue::Flag(widget.checked)
                } else if widget.kind == FieldKind::Select {
                    FieldValue::Text(widget.selected_value().unwrap_or("").to_string())
                } else {
                    FieldValue::Text(widget.value.clone())
                };
                out.insert(name.clone(), value);
            }
        }
        out
    }

    /// Live widget for a field name
    pub fn field(&self, name: &str) -> Option<&FieldWidget> {
        let id = self.fields.get(name)?;
        match &self.tree.node(*id).kind {
            NodeKind::FieldGroup(widget) => Some(widget),
            _ => None,
        }
    }

    pub(crate) fn widget_mut(&mut self, name: &str) -> Option<&mut FieldWidget> {
        let id = self.fields.get(name).copied()?;
        match &mut self.tree.node_mut(id).kind {
            NodeKind::FieldGroup(widget) => Some(widget),
            _ => None,
        }
    }

    /// Field names in construction order
    pub fn field_order(&self) -> &[String] {
        &self.field_order
    }

    /// Base names of the page's input lists
    pub fn list_names(&self) -> Vec<String> {
        self.lists.keys().cloned().collect()
    }

    /// Replace all tracked values and re-sync live controls
    pub fn restore_all(&mut self, values: BTreeMap<String, FieldValue>) {
        self.data.restore_all(values);
        self.sync_controls();
    }

    /// Persist the current snapshot
    pub fn save_to_storage(&self, store: &dyn KeyValueStore, key: &str) {
        self.data.save(store, key);
    }

    /// Load a stored snapshot, replacing tracked values and re-syncing
    /// controls. Returns whether the map changed.
    pub fn load_from_storage(&mut self, store: &dyn KeyValueStore, key: &str) -> bool {
        match read_snapshot(store, key) {
            Some(values) => {
                self.restore_all(values);
                true
            }
            None => false,
        }
    }

    /// Remove the stored snapshot and report the outcome
    pub fn clear_storage(
        &self,
        store: &dyn KeyValueStore,
        notifier: &mut dyn Notifier,
        key: &str,
    ) {
        match store.remove(key) {
            Ok(()) => {
                tracing::info!("form data removed from key {key:?}");
                notifier.success("Saved form data cleared");
            }
            Err(err) => {
                let err = FormError::Persistence(err.to_string());
                tracing::warn!("could not clear stored form data: {err}");
                notifier.failure(&err.to_string());
            }
        }
    }

    /// Push tracked values back into live controls by name lookup.
    /// Snapshot names with no live counterpart are ignored.
    fn sync_controls(&mut self) {
        let snapshot = self.data.snapshot_all();
        for (name, value) in snapshot {
            if self.fields.contains_key(&name) {
                if let Some(widget) = self.widget_mut(&name) {
                    match value {
                        FieldValue::Flag(checked) if widget.kind.is_toggle() => {
                            widget.checked = checked;
                        }
                        FieldValue::Text(text) => match widget.kind {
                            FieldKind::Select => {
                                if let Some(index) =
                                    widget.options.iter().position(|opt| opt.value == text)
                                {
                                    widget.selected = Some(index);
                                }
                            }
                            _ => widget.value = text,
                        },
                        _ => {}
                    }
                }
            } else if let Some(list) = self.lists.get(&name).copied() {
                if let FieldValue::List(values) = value {
                    self.rebuild_list_entries(list, &values);
                }
            }
        }
    }
}
