//! Clipboard utilities

use vault_core::Fault;
use wasm_bindgen_futures::JsFuture;
use web_sys::window;

/// Copy text to the clipboard
pub async fn copy_to_clipboard(text: &str) -> Result<(), Fault> {
    let window = window().ok_or_else(|| Fault::other("No window object"))?;
    let clipboard = window.navigator().clipboard();

    JsFuture::from(clipboard.write_text(text))
        .await
        .map_err(|_| Fault::other("Clipboard access was denied"))?;

    Ok(())
}
