//! Host capability implementations and platform constants

mod clipboard;
mod store;
mod traits;

pub use clipboard::SystemClipboard;
pub use store::JsonFileStore;
pub use traits::{ClipboardSink, KeyValueStore, Notifier};

#[cfg(test)]
pub use traits::{MockClipboardSink, MockKeyValueStore, MockNotifier};

use crossterm::event::KeyModifiers;

/// Platform-appropriate modifier for command shortcuts
/// - macOS: SUPER (Cmd key)
/// - Linux/Windows: CONTROL (Ctrl key)
#[cfg(target_os = "macos")]
pub const COMMAND_MODIFIER: KeyModifiers = KeyModifiers::SUPER;

#[cfg(not(target_os = "macos"))]
pub const COMMAND_MODIFIER: KeyModifiers = KeyModifiers::CONTROL;
