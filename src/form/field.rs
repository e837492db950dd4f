//! Field descriptors and live control state

use super::tree::NodeId;

/// Default message shown when a required field is left empty
pub const DEFAULT_VALIDATION_MESSAGE: &str = "This field is required";

/// Input control kinds the factory can build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Select,
    Datalist,
    TextArea,
    Checkbox,
    Radio,
}

impl FieldKind {
    /// Checkbox and radio controls carry boolean state
    pub fn is_toggle(&self) -> bool {
        matches!(self, Self::Checkbox | Self::Radio)
    }
}

/// One option of a select or datalist field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldOption {
    pub value: String,
    pub text: String,
}

impl FieldOption {
    pub fn new(value: &str, text: &str) -> Self {
        Self {
            value: value.to_string(),
            text: text.to_string(),
        }
    }
}

impl From<&str> for FieldOption {
    /// Plain options use the same string for value and display text
    fn from(raw: &str) -> Self {
        Self::new(raw, raw)
    }
}

/// Initial value a descriptor may carry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldInitial {
    #[default]
    Absent,
    /// For selects, matched against option values; otherwise the initial text
    Value(String),
    /// For selects, an ordinal into the option list
    Index(usize),
}

impl FieldInitial {
    pub fn as_text(&self) -> String {
        match self {
            Self::Absent => String::new(),
            Self::Value(value) => value.clone(),
            Self::Index(index) => index.to_string(),
        }
    }
}

/// Declarative description of one form field
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub kind: FieldKind,
    pub name: String,
    pub label: Option<String>,
    pub initial: FieldInitial,
    pub options: Vec<FieldOption>,
    pub sub_text: Option<String>,
    pub required: bool,
    pub checked: bool,
    pub container: Option<NodeId>,
    pub class: Option<String>,
    pub validation_message: String,
}

impl FieldDescriptor {
    pub fn new(kind: FieldKind, name: &str) -> Self {
        Self {
            kind,
            name: name.to_string(),
            label: None,
            initial: FieldInitial::Absent,
            options: Vec::new(),
            sub_text: None,
            required: true,
            checked: false,
            container: None,
            class: None,
            validation_message: DEFAULT_VALIDATION_MESSAGE.to_string(),
        }
    }

    pub fn text(name: &str) -> Self {
        Self::new(FieldKind::Text, name)
    }

    pub fn select(name: &str, options: Vec<FieldOption>) -> Self {
        let mut descriptor = Self::new(FieldKind::Select, name);
        descriptor.options = options;
        descriptor
    }

    pub fn datalist(name: &str, options: Vec<FieldOption>) -> Self {
        let mut descriptor = Self::new(FieldKind::Datalist, name);
        descriptor.options = options;
        descriptor
    }

    pub fn text_area(name: &str) -> Self {
        Self::new(FieldKind::TextArea, name)
    }

    pub fn checkbox(name: &str) -> Self {
        Self::new(FieldKind::Checkbox, name)
    }

    pub fn radio(name: &str) -> Self {
        Self::new(FieldKind::Radio, name)
    }

    pub fn label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn initial_value(mut self, value: &str) -> Self {
        self.initial = FieldInitial::Value(value.to_string());
        self
    }

    pub fn initial_index(mut self, index: usize) -> Self {
        self.initial = FieldInitial::Index(index);
        self
    }

    pub fn sub_text(mut self, sub_text: &str) -> Self {
        self.sub_text = Some(sub_text.to_string());
        self
    }

    /// Mark the field as not required
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    pub fn container(mut self, container: NodeId) -> Self {
        self.container = Some(container);
        self
    }

    pub fn class(mut self, class: &str) -> Self {
        self.class = Some(class.to_string());
        self
    }

    pub fn validation_message(mut self, message: &str) -> Self {
        self.validation_message = message.to_string();
        self
    }
}

/// Live state of a constructed control and its surrounding group
#[derive(Debug, Clone)]
pub struct FieldWidget {
    pub name: String,
    pub kind: FieldKind,
    pub label: Option<String>,
    /// Current text for value-bearing controls
    pub value: String,
    /// Boolean state for checkbox/radio controls
    pub checked: bool,
    pub options: Vec<FieldOption>,
    /// Selected option index for select controls
    pub selected: Option<usize>,
    pub sub_text: Option<String>,
    pub required: bool,
    pub validation_message: String,
    /// Whether the error slot is currently shown
    pub error_visible: bool,
    /// Whether the control itself is visually flagged
    pub flagged: bool,
}

impl FieldWidget {
    pub fn selected_option(&self) -> Option<&FieldOption> {
        self.selected.and_then(|index| self.options.get(index))
    }

    /// Underlying value of the selected option
    pub fn selected_value(&self) -> Option<&str> {
        self.selected_option().map(|opt| opt.value.as_str())
    }

    /// Display text of the selected option
    pub fn selected_text(&self) -> Option<&str> {
        self.selected_option().map(|opt| opt.text.as_str())
    }

    /// Per-kind emptiness check used by focus-loss validation
    pub fn effective_is_empty(&self) -> bool {
        match self.kind {
            FieldKind::Checkbox | FieldKind::Radio => !self.checked,
            FieldKind::Select => self
                .selected_value()
                .map(|value| value.trim().is_empty())
                .unwrap_or(true),
            _ => self.value.trim().is_empty(),
        }
    }

    /// Value shown by the renderer
    pub fn display_value(&self) -> String {
        match self.kind {
            FieldKind::Checkbox | FieldKind::Radio => {
                let mark = if self.checked { "[x]" } else { "[ ]" };
                mark.to_string()
            }
            FieldKind::Select => self.selected_text().unwrap_or("").to_string(),
            _ => self.value.clone(),
        }
    }
}
