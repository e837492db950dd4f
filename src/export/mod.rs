//! Export pipeline: serialize, format, copy, persist, notify

mod formatter;
mod serializer;

pub use formatter::{ensure_ends_with_dot, format};
pub use serializer::serialize;

use crate::form::{FormError, FormPage};
use crate::platform::{ClipboardSink, KeyValueStore, Notifier};

/// Run the full export pipeline for a form page.
///
/// Serialize and format are pure, so the awaited clipboard write is the
/// only step that can fail. On success the current snapshot is persisted
/// (failures there stay recoverable) and the notifier reports success; a
/// clipboard failure is reported and stops the pipeline with no further
/// side effects.
pub async fn export_and_copy(
    page: &FormPage,
    clipboard: &dyn ClipboardSink,
    store: &dyn KeyValueStore,
    notifier: &mut dyn Notifier,
    storage_key: &str,
) {
    let raw = serialize(page);
    let report = format(&raw);

    if let Err(err) = clipboard.write_text(&report).await {
        let err = FormError::Export(format!("clipboard write failed: {err}"));
        tracing::error!("{err}");
        notifier.failure(&err.to_string());
        return;
    }

    page.save_to_storage(store, storage_key);
    tracing::info!("report copied to clipboard ({} chars)", report.len());
    notifier.success("Report copied to clipboard");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{FieldDescriptor, FormPage, PageConfig, STORAGE_KEY};
    use crate::platform::{MockClipboardSink, MockKeyValueStore, MockNotifier};
    use anyhow::anyhow;
    use pretty_assertions::assert_eq;

    fn rule() -> String {
        "-".repeat(120)
    }

    /// Form from the vitals walkthrough: header, one line before the
    /// rules, one line per outer section, a two-line target section.
    fn vitals_page() -> FormPage {
        let mut page = FormPage::new(PageConfig::default()).unwrap();
        let form = page.form();
        page.add_header("Vitals", 2, Some(form)).unwrap();
        page.add_field(FieldDescriptor::text("growth").label("Height:").initial_value("180"))
            .unwrap();
        page.add_separator();
        page.add_field(FieldDescriptor::text("mass").label("Weight:").initial_value("75"))
            .unwrap();
        page.add_separator();
        page.add_field(FieldDescriptor::text("pulse").label("Pulse:").initial_value("70"))
            .unwrap();
        page.add_field(
            FieldDescriptor::text("pressure")
                .label("Pressure:")
                .initial_value("120/80"),
        )
        .unwrap();
        page.add_separator();
        page.add_field(FieldDescriptor::text("note").label("Note:").initial_value("ok"))
            .unwrap();
        page
    }

    #[test]
    fn test_end_to_end_vitals_report() {
        let page = vitals_page();
        let report = format(&serialize(&page));
        let rule = rule();
        let expected = format!(
            "Vitals:\nHeight: 180.\n{rule}\n\nWeight: 75.\n{rule}\n\nPulse: 70. Pressure: 120/80.\n\n{rule}\n\nNote: ok."
        );
        assert_eq!(report, expected);
    }

    #[tokio::test]
    async fn test_export_success_persists_and_notifies() {
        let page = vitals_page();
        let mut clipboard = MockClipboardSink::new();
        clipboard
            .expect_write_text()
            .withf(|text| text.contains("Pulse: 70. Pressure: 120/80."))
            .times(1)
            .returning(|_| Ok(()));
        let mut store = MockKeyValueStore::new();
        store
            .expect_write()
            .withf(|key, payload| key == STORAGE_KEY && payload.contains("120/80"))
            .times(1)
            .returning(|_, _| Ok(()));
        let mut notifier = MockNotifier::new();
        notifier
            .expect_success()
            .withf(|msg| msg.contains("copied"))
            .times(1)
            .return_const(());

        export_and_copy(&page, &clipboard, &store, &mut notifier, STORAGE_KEY).await;
    }

    #[tokio::test]
    async fn test_clipboard_failure_halts_pipeline() {
        let page = vitals_page();
        let mut clipboard = MockClipboardSink::new();
        clipboard
            .expect_write_text()
            .returning(|_| Err(anyhow!("no display")));
        let mut store = MockKeyValueStore::new();
        store.expect_write().times(0);
        let mut notifier = MockNotifier::new();
        notifier
            .expect_failure()
            .withf(|msg| msg.contains("clipboard write failed"))
            .times(1)
            .return_const(());

        export_and_copy(&page, &clipboard, &store, &mut notifier, STORAGE_KEY).await;
    }

    #[tokio::test]
    async fn test_persistence_failure_still_reports_success() {
        let page = vitals_page();
        let mut clipboard = MockClipboardSink::new();
        clipboard.expect_write_text().returning(|_| Ok(()));
        let mut store = MockKeyValueStore::new();
        store
            .expect_write()
            .returning(|_, _| Err(anyhow!("disk full")));
        let mut notifier = MockNotifier::new();
        notifier.expect_success().times(1).return_const(());

        export_and_copy(&page, &clipboard, &store, &mut notifier, STORAGE_KEY).await;
    }
}
