//! System clipboard implementation backed by arboard

use super::ClipboardSink;
use anyhow::Result;
use async_trait::async_trait;

/// Writes through the OS clipboard
#[derive(Debug, Default)]
pub struct SystemClipboard;

#[async_trait]
impl ClipboardSink for SystemClipboard {
    async fn write_text(&self, text: &str) -> Result<()> {
        use arboard::Clipboard;
        let mut clipboard = Clipboard::new()?;
        clipboard.set_text(text)?;
        Ok(())
    }
}
