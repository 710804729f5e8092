use anyhow::{Context, Result};

/// Convert a rendered HTML page to wrapped plain text for terminals.
pub fn html_to_text(html: &str, width: usize) -> Result<String> {
    // html2text fails on very narrow widths
    let text = html2text::from_read(html.as_bytes(), width.max(20))
        .context("Failed to convert HTML page to text")?;
    Ok(text)
}
