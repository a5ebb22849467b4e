//! Clipboard integration.

use crate::error::Result;
use arboard::Clipboard;

/// Copy text to clipboard.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = Clipboard::new()?;
    clipboard.set_text(text)?;
    Ok(())
}

/// Copy selected items to the clipboard, one per line in selection order.
pub fn copy_selection<I: AsRef<str>>(items: &[I]) -> Result<()> {
    copy_to_clipboard(&format_selection(items))
}

/// Format selected items one per line.
pub fn format_selection<I: AsRef<str>>(items: &[I]) -> String {
    items
        .iter()
        .map(|item| item.as_ref())
        .collect::<Vec<_>>()
        .join("\n")
}
