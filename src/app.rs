//! Application state and core logic
//!
//! The app owns the live form page and drives its reactive contract from
//! terminal events: typing goes through `handle_input`, focus changes fire
//! `handle_blur`, and the export/save/load/clear shortcuts run against the
//! platform capabilities.

use crate::bsa;
use crate::config::TuiConfig;
use crate::consult;
use crate::export;
use crate::form::{FieldKind, FormPage, FormTree, NodeId, NodeKind};
use crate::platform::{JsonFileStore, Notifier, SystemClipboard, COMMAND_MODIFIER};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use uuid::Uuid;

/// Status line doubling as the notification surface
#[derive(Debug, Default)]
pub struct StatusLine {
    pub message: Option<String>,
    pub is_error: bool,
}

impl Notifier for StatusLine {
    fn success(&mut self, message: &str) {
        self.message = Some(message.to_string());
        self.is_error = false;
    }

    fn failure(&mut self, message: &str) {
        self.message = Some(message.to_string());
        self.is_error = true;
    }
}

/// Focusable positions in the rendered form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Focus {
    Field(String),
    ListEntry { base: String, id: Uuid },
}

/// Main application struct
pub struct App {
    /// The live consultation page
    pub page: FormPage,
    /// User configuration
    pub config: TuiConfig,
    /// Persistent snapshot storage
    storage: JsonFileStore,
    /// Clipboard capability
    clipboard: SystemClipboard,
    /// Status line / notification surface
    pub status: StatusLine,
    /// Focus ring over fields and list entries, in display order
    focus_order: Vec<Focus>,
    /// Index of the focused control
    pub focused: usize,
    /// Whether the app should quit
    quit: bool,
}

impl App {
    /// Create a new App instance
    pub fn new() -> Result<Self> {
        let config = TuiConfig::load().unwrap_or_default();
        let storage = JsonFileStore::new()?;
        Self::with_storage(config, storage)
    }

    fn with_storage(config: TuiConfig, storage: JsonFileStore) -> Result<Self> {
        let page = consult::build(&config)?;
        let mut app = Self {
            page,
            config,
            storage,
            clipboard: SystemClipboard,
            status: StatusLine::default(),
            focus_order: Vec::new(),
            focused: 0,
            quit: false,
        };
        app.rebuild_focus();
        app.enter_focus();
        Ok(app)
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Currently focused position
    pub fn focus(&self) -> Option<&Focus> {
        self.focus_order.get(self.focused)
    }

    /// Rebuild the focus ring from the current tree order
    fn rebuild_focus(&mut self) {
        let mut order = Vec::new();
        collect_focus(self.page.tree(), self.page.form(), &mut order);
        self.focus_order = order;
        if self.focused >= self.focus_order.len() {
            self.focused = self.focus_order.len().saturating_sub(1);
        }
    }

    fn focus_next(&mut self) {
        if self.focus_order.is_empty() {
            return;
        }
        self.leave_focus();
        self.focused = (self.focused + 1) % self.focus_order.len();
        self.enter_focus();
    }

    fn focus_prev(&mut self) {
        if self.focus_order.is_empty() {
            return;
        }
        self.leave_focus();
        self.focused = if self.focused == 0 {
            self.focus_order.len() - 1
        } else {
            self.focused - 1
        };
        self.enter_focus();
    }

    /// Focus loss runs the field's validation
    fn leave_focus(&mut self) {
        if let Some(Focus::Field(name)) = self.focus().cloned() {
            self.page.handle_blur(&name);
        }
    }

    /// Focus gain recomputes BSA when entering one of its fields
    fn enter_focus(&mut self) {
        if let Some(Focus::Field(name)) = self.focus().cloned() {
            if consult::BSA_FIELDS.contains(&name.as_str()) {
                self.recalculate_bsa();
            }
        }
    }

    fn focus_to(&mut self, target: &Focus) {
        if let Some(index) = self.focus_order.iter().position(|f| f == target) {
            self.focused = index;
        }
    }

    /// Recompute body surface area from the height and weight fields
    fn recalculate_bsa(&mut self) {
        let growth = self
            .page
            .data()
            .text("growth")
            .and_then(|v| v.trim().parse::<f64>().ok());
        let mass = self
            .page
            .data()
            .text("mass")
            .and_then(|v| v.trim().parse::<f64>().ok());
        match (growth, mass) {
            (Some(growth), Some(mass)) => {
                let value = bsa::formatted(growth, mass);
                self.page.handle_input("bsaResult", &value);
            }
            _ => tracing::debug!("bsa inputs missing or not numeric, skipped"),
        }
    }

    /// Handle key event
    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.modifiers.contains(COMMAND_MODIFIER) {
            match key.code {
                KeyCode::Char('e') => {
                    self.export().await;
                    return Ok(());
                }
                KeyCode::Char('s') => {
                    self.save();
                    return Ok(());
                }
                KeyCode::Char('l') => {
                    self.load();
                    return Ok(());
                }
                KeyCode::Char('r') => {
                    self.clear_saved()?;
                    return Ok(());
                }
                KeyCode::Char('n') => {
                    self.add_entry();
                    return Ok(());
                }
                KeyCode::Char('d') => {
                    self.remove_focused();
                    return Ok(());
                }
                KeyCode::Char('q') | KeyCode::Char('c') => {
                    self.quit = true;
                    return Ok(());
                }
                _ => {}
            }
        }
        match key.code {
            KeyCode::Tab | KeyCode::Down => self.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.focus_prev(),
            KeyCode::Enter => self.on_enter(),
            KeyCode::Backspace => self.pop_char(),
            KeyCode::Char(' ') => self.on_space(),
            KeyCode::Char(c) => self.push_char(c),
            KeyCode::Esc => self.quit = true,
            _ => {}
        }
        Ok(())
    }

    fn push_char(&mut self, c: char) {
        match self.focus().cloned() {
            Some(Focus::Field(name)) => {
                let Some(widget) = self.page.field(&name) else {
                    return;
                };
                match widget.kind {
                    FieldKind::Checkbox | FieldKind::Radio | FieldKind::Select => {}
                    _ => {
                        let mut value = widget.value.clone();
                        value.push(c);
                        self.page.handle_input(&name, &value);
                    }
                }
            }
            Some(Focus::ListEntry { base, id }) => {
                if let Some(mut value) = self.entry_value(&base, id) {
                    value.push(c);
                    self.page.set_list_entry(&base, id, &value);
                }
            }
            None => {}
        }
    }

    fn pop_char(&mut self) {
        match self.focus().cloned() {
            Some(Focus::Field(name)) => {
                let Some(widget) = self.page.field(&name) else {
                    return;
                };
                if widget.kind.is_toggle() || widget.kind == FieldKind::Select {
                    return;
                }
                let mut value = widget.value.clone();
                if value.pop().is_some() {
                    self.page.handle_input(&name, &value);
                }
            }
            Some(Focus::ListEntry { base, id }) => {
                if let Some(mut value) = self.entry_value(&base, id) {
                    if value.pop().is_some() {
                        self.page.set_list_entry(&base, id, &value);
                    }
                }
            }
            None => {}
        }
    }

    /// Space toggles checkboxes, cycles selects, and types into text
    fn on_space(&mut self) {
        if let Some(Focus::Field(name)) = self.focus().cloned() {
            if let Some(widget) = self.page.field(&name) {
                if widget.kind.is_toggle() {
                    self.page.toggle_checked(&name);
                    return;
                }
                if widget.kind == FieldKind::Select {
                    self.page.cycle_option(&name);
                    return;
                }
            }
        }
        self.push_char(' ');
    }

    /// Enter breaks lines in text areas and advances focus elsewhere
    fn on_enter(&mut self) {
        if let Some(Focus::Field(name)) = self.focus().cloned() {
            if let Some(widget) = self.page.field(&name) {
                if widget.kind == FieldKind::TextArea {
                    self.push_char('\n');
                    return;
                }
            }
        }
        self.focus_next();
    }

    fn entry_value(&self, base: &str, id: Uuid) -> Option<String> {
        self.page
            .list_entries(base)
            .into_iter()
            .find(|(entry, _)| *entry == id)
            .map(|(_, value)| value)
    }

    /// Append a blank entry to the focused list and move into it
    fn add_entry(&mut self) {
        if let Some(Focus::ListEntry { base, .. }) = self.focus().cloned() {
            if let Some(id) = self.page.add_list_entry(&base, "") {
                self.rebuild_focus();
                self.focus_to(&Focus::ListEntry { base, id });
            }
        }
    }

    /// Remove the focused list entry or field from the form
    fn remove_focused(&mut self) {
        match self.focus().cloned() {
            Some(Focus::ListEntry { base, id }) => {
                self.page.remove_list_entry(&base, id);
                // keep the list reachable with at least one entry
                if self.page.list_entries(&base).is_empty() {
                    self.page.add_list_entry(&base, "");
                }
                self.rebuild_focus();
            }
            Some(Focus::Field(name)) => {
                self.page.remove_field(&name);
                self.rebuild_focus();
            }
            None => {}
        }
        self.enter_focus();
    }

    /// Run the export pipeline against the platform capabilities
    async fn export(&mut self) {
        export::export_and_copy(
            &self.page,
            &self.clipboard,
            &self.storage,
            &mut self.status,
            self.config.storage_key(),
        )
        .await;
    }

    fn save(&mut self) {
        self.page
            .save_to_storage(&self.storage, self.config.storage_key());
        self.status.success("Form data saved");
    }

    fn load(&mut self) {
        if self
            .page
            .load_from_storage(&self.storage, self.config.storage_key())
        {
            // restored lists may come back without entries
            for base in self.page.list_names() {
                if self.page.list_entries(&base).is_empty() {
                    self.page.add_list_entry(&base, "");
                }
            }
            self.rebuild_focus();
            self.status.success("Form data loaded");
        } else {
            self.status.success("No saved form data");
        }
    }

    /// Clear stored data and rebuild the form with construction defaults
    fn clear_saved(&mut self) -> Result<()> {
        self.page
            .clear_storage(&self.storage, &mut self.status, self.config.storage_key());
        self.page = consult::build(&self.config)?;
        self.focused = 0;
        self.rebuild_focus();
        self.enter_focus();
        Ok(())
    }
}

/// Collect focus targets in document order
fn collect_focus(tree: &FormTree, id: NodeId, out: &mut Vec<Focus>) {
    for &child in tree.children(id) {
        let node = tree.node(child);
        match &node.kind {
            NodeKind::FieldGroup(widget) => out.push(Focus::Field(widget.name.clone())),
            NodeKind::InputList { base_name } => {
                for &entry in tree.children(child) {
                    if let NodeKind::ListEntry { id, .. } = &tree.node(entry).kind {
                        out.push(Focus::ListEntry {
                            base: base_name.clone(),
                            id: *id,
                        });
                    }
                }
            }
            _ => collect_focus(tree, child, out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FieldValue;
    use crossterm::event::KeyModifiers;

    fn test_app() -> App {
        let dir = std::env::temp_dir().join(format!("consult-tui-app-{}", Uuid::new_v4()));
        App::with_storage(TuiConfig::default(), JsonFileStore::with_dir(dir)).unwrap()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn command(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, COMMAND_MODIFIER)
    }

    #[test]
    fn test_focus_ring_covers_fields_and_entries() {
        let app = test_app();
        assert_eq!(app.focus(), Some(&Focus::Field("patient".to_string())));
        assert!(app
            .focus_order
            .iter()
            .any(|f| matches!(f, Focus::ListEntry { base, .. } if base == "complaints")));
        assert!(app
            .focus_order
            .iter()
            .any(|f| *f == Focus::Field("conclusion".to_string())));
    }

    #[tokio::test]
    async fn test_typing_reaches_the_store() {
        let mut app = test_app();
        app.handle_key(key(KeyCode::Char('I'))).await.unwrap();
        app.handle_key(key(KeyCode::Char('v'))).await.unwrap();
        assert_eq!(app.page.data().text("patient"), Some("Iv"));
        app.handle_key(key(KeyCode::Backspace)).await.unwrap();
        assert_eq!(app.page.data().text("patient"), Some("I"));
    }

    #[tokio::test]
    async fn test_tab_blurs_and_flags_required_field() {
        let mut app = test_app();
        app.handle_key(key(KeyCode::Tab)).await.unwrap();
        let patient = app.page.field("patient").unwrap();
        assert!(patient.error_visible);
        assert_eq!(patient.validation_message, "Patient name is required");
        assert_eq!(app.focus(), Some(&Focus::Field("birth".to_string())));
    }

    #[tokio::test]
    async fn test_typing_into_list_entry() {
        let mut app = test_app();
        let target = app
            .focus_order
            .iter()
            .find(|f| matches!(f, Focus::ListEntry { .. }))
            .cloned()
            .unwrap();
        app.focus_to(&target);
        app.handle_key(key(KeyCode::Char('f'))).await.unwrap();
        assert_eq!(
            app.page.data().get("complaints"),
            Some(&FieldValue::List(vec!["f".to_string()]))
        );
    }

    #[tokio::test]
    async fn test_add_and_remove_list_entries() {
        let mut app = test_app();
        let target = app
            .focus_order
            .iter()
            .find(|f| matches!(f, Focus::ListEntry { .. }))
            .cloned()
            .unwrap();
        app.focus_to(&target);
        app.handle_key(command(KeyCode::Char('n'))).await.unwrap();
        assert_eq!(app.page.list_entries("complaints").len(), 2);
        // the new entry took focus
        assert!(matches!(app.focus(), Some(Focus::ListEntry { .. })));
        app.handle_key(command(KeyCode::Char('d'))).await.unwrap();
        assert_eq!(app.page.list_entries("complaints").len(), 1);
    }

    #[tokio::test]
    async fn test_removing_last_entry_keeps_list_reachable() {
        let mut app = test_app();
        let target = app
            .focus_order
            .iter()
            .find(|f| matches!(f, Focus::ListEntry { .. }))
            .cloned()
            .unwrap();
        app.focus_to(&target);
        app.handle_key(command(KeyCode::Char('d'))).await.unwrap();
        assert_eq!(app.page.list_entries("complaints").len(), 1);
    }

    #[tokio::test]
    async fn test_space_toggles_checkbox_and_cycles_select() {
        let mut app = test_app();
        app.focus_to(&Focus::Field("followup".to_string()));
        app.handle_key(key(KeyCode::Char(' '))).await.unwrap();
        assert_eq!(
            app.page.data().get("followup"),
            Some(&FieldValue::Flag(true))
        );

        app.focus_to(&Focus::Field("blood".to_string()));
        app.handle_key(key(KeyCode::Char(' '))).await.unwrap();
        assert_eq!(app.page.data().text("blood"), Some("A"));
    }

    #[tokio::test]
    async fn test_enter_breaks_lines_only_in_text_area() {
        let mut app = test_app();
        app.focus_to(&Focus::Field("conclusion".to_string()));
        app.handle_key(key(KeyCode::Char('o'))).await.unwrap();
        app.handle_key(key(KeyCode::Enter)).await.unwrap();
        app.handle_key(key(KeyCode::Char('k'))).await.unwrap();
        assert_eq!(app.page.data().text("conclusion"), Some("o\nk"));
    }

    #[tokio::test]
    async fn test_bsa_recomputed_on_focus() {
        let mut app = test_app();
        app.focus_to(&Focus::Field("growth".to_string()));
        for c in "180".chars() {
            app.handle_key(key(KeyCode::Char(c))).await.unwrap();
        }
        app.focus_to(&Focus::Field("mass".to_string()));
        for c in "75".chars() {
            app.handle_key(key(KeyCode::Char(c))).await.unwrap();
        }
        // moving focus onto the result field triggers the computation
        app.focus_to(&Focus::Field("mass".to_string()));
        app.focus_next();
        assert_eq!(app.focus(), Some(&Focus::Field("bsaResult".to_string())));
        assert_eq!(app.page.data().text("bsaResult"), Some("1.94"));
    }

    #[tokio::test]
    async fn test_bsa_skipped_without_numbers() {
        let mut app = test_app();
        app.focused = app
            .focus_order
            .iter()
            .position(|f| *f == Focus::Field("mass".to_string()))
            .unwrap();
        app.focus_next();
        assert_eq!(app.page.data().text("bsaResult"), Some(""));
    }

    #[tokio::test]
    async fn test_remove_focused_field() {
        let mut app = test_app();
        app.focus_to(&Focus::Field("birth".to_string()));
        app.handle_key(command(KeyCode::Char('d'))).await.unwrap();
        assert!(app.page.field("birth").is_none());
        assert!(!app
            .focus_order
            .iter()
            .any(|f| *f == Focus::Field("birth".to_string())));
    }

    #[tokio::test]
    async fn test_save_load_round_trip_through_storage() {
        let mut app = test_app();
        for c in "Ivanov".chars() {
            app.handle_key(key(KeyCode::Char(c))).await.unwrap();
        }
        app.handle_key(command(KeyCode::Char('s'))).await.unwrap();
        assert_eq!(app.status.message.as_deref(), Some("Form data saved"));

        // overwrite locally, then restore from storage
        app.page.handle_input("patient", "other");
        app.handle_key(command(KeyCode::Char('l'))).await.unwrap();
        assert_eq!(app.page.data().text("patient"), Some("Ivanov"));
        assert_eq!(app.page.field("patient").unwrap().value, "Ivanov");
    }

    #[tokio::test]
    async fn test_clear_rebuilds_with_defaults() {
        let mut app = test_app();
        for c in "Ivanov".chars() {
            app.handle_key(key(KeyCode::Char(c))).await.unwrap();
        }
        app.handle_key(command(KeyCode::Char('r'))).await.unwrap();
        assert_eq!(app.page.data().text("patient"), Some(""));
        assert_eq!(app.status.message.as_deref(), Some("Saved form data cleared"));
    }

    #[tokio::test]
    async fn test_quit_keys() {
        let mut app = test_app();
        assert!(!app.should_quit());
        app.handle_key(key(KeyCode::Esc)).await.unwrap();
        assert!(app.should_quit());
    }

    #[test]
    fn test_status_line_notifier() {
        let mut status = StatusLine::default();
        status.success("ok");
        assert_eq!(status.message.as_deref(), Some("ok"));
        assert!(!status.is_error);
        status.failure("bad");
        assert!(status.is_error);
    }
}
