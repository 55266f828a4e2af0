use std::io::{self, Write};

use ruledeck::config::{ColorMode, Config};

use crate::cli::ColorWhen;
use crate::ui::terminal::{detect_capabilities, Stream, TerminalCapabilities};

/// Output settings resolved once per command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiContext {
    pub json: bool,
    pub verbose: u8,
    pub caps: TerminalCapabilities,
    pub color: bool,
    pub unicode: bool,
    pub stream: Stream,
}

impl UiContext {
    pub fn new(
        json: bool,
        verbose: u8,
        cli_color: Option<ColorWhen>,
        config: &Config,
        stream: Stream,
    ) -> Self {
        let caps = detect_capabilities(stream);
        Self::from_caps(json, verbose, cli_color, config, caps, stream)
    }

    pub(crate) fn from_caps(
        json: bool,
        verbose: u8,
        cli_color: Option<ColorWhen>,
        config: &Config,
        caps: TerminalCapabilities,
        stream: Stream,
    ) -> Self {
        let unicode = config.output.unicode && caps.supports_unicode;

        let color = !json
            && match cli_color {
                Some(ColorWhen::Never) => false,
                Some(ColorWhen::Always) => true,
                Some(ColorWhen::Auto) | None => match config.output.color {
                    ColorMode::Never => false,
                    ColorMode::Always => true,
                    ColorMode::Auto => caps.supports_color && !caps.is_ci,
                },
            };

        Self {
            json,
            verbose,
            caps,
            color,
            unicode,
            stream,
        }
    }

    /// Write already-rendered text to the command's stream
    pub fn print(&self, text: &str) {
        // A closed pipe must not abort the command
        let _ = match self.stream {
            Stream::Stdout => io::stdout().lock().write_all(text.as_bytes()),
            Stream::Stderr => io::stderr().lock().write_all(text.as_bytes()),
        };
    }

    /// Render and print unless in JSON mode
    pub fn show(&self, render: impl FnOnce(bool, bool) -> String) {
        if !self.json {
            self.print(&render(self.color, self.unicode));
        }
    }

    /// Emit an NDJSON event in JSON mode
    pub fn event(&self, event: &crate::ui::json::Event<'_>) {
        if self.json {
            let _ = crate::ui::json::write_event(self.stream, event);
        }
    }
}
