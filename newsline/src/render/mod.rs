//! Renderers consuming the page model.

pub mod html;
pub mod text;

use anyhow::{Context, Result};
use clap::ValueEnum;
use common::Config;

use crate::timeline::PageState;

pub use html::{escape_html, HtmlRenderer};

/// Output formats offered by the CLI and the HTTP routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Html,
    Text,
    Json,
}

/// Render `page` in the requested format using the page and style settings from `config`.
pub fn render(page: &PageState, format: OutputFormat, config: &Config) -> Result<String> {
    match format {
        OutputFormat::Html => Ok(HtmlRenderer::new(&config.page, &config.style).render(page)),
        OutputFormat::Text => {
            let html = HtmlRenderer::new(&config.page, &config.style).render(page);
            text::html_to_text(&html, config.render.text_width)
        }
        OutputFormat::Json => {
            serde_json::to_string_pretty(page).context("Failed to serialize page model")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_format_renders_an_empty_page() {
        let config = Config::default();
        let html = render(&PageState::Empty, OutputFormat::Html, &config).expect("html");
        assert!(html.starts_with("<!DOCTYPE html>"));

        let text = render(&PageState::Empty, OutputFormat::Text, &config).expect("text");
        assert!(text.contains("No news data to display."));

        let json = render(&PageState::Empty, OutputFormat::Json, &config).expect("json");
        assert!(json.contains("\"state\": \"empty\""));
    }
}
