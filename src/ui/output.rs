use ruledeck::config::ConfigWarning;

use crate::ui::context::UiContext;
use crate::ui::json::Event;
use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::{paint, Tone};

pub fn render_config_warning(
    warning: &ConfigWarning,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let icon = Icon::Warning.colored(supports_color, supports_unicode);
    let mut out = match warning.line {
        Some(line) => format!(
            "{icon} Unknown config key '{}' in {}:{}\n",
            warning.key,
            warning.file.display(),
            line
        ),
        None => format!(
            "{icon} Unknown config key '{}' in {}\n",
            warning.key,
            warning.file.display()
        ),
    };
    if let Some(suggestion) = &warning.suggestion {
        out.push_str(&format!(
            "  {}\n",
            paint(&format!("Did you mean '{suggestion}'?"), Tone::Dim, supports_color)
        ));
    }
    out
}

pub fn print_config_warnings(ui: &UiContext, warnings: &[ConfigWarning]) {
    for warning in warnings {
        ui.event(&Event::ConfigWarning {
            key: &warning.key,
            file: &warning.file,
            line: warning.line,
            suggestion: warning.suggestion.as_deref(),
        });
        ui.show(|color, unicode| render_config_warning(warning, color, unicode));
    }
}

pub fn print_env_warnings(ui: &UiContext, warnings: &[String]) {
    for message in warnings {
        ui.event(&Event::EnvWarning { message });
        ui.show(|color, unicode| {
            format!("{} {message}\n", Icon::Warning.colored(color, unicode))
        });
    }
}

/// Top-level error line plus its cause chain
pub fn render_error(error: &anyhow::Error, supports_color: bool, supports_unicode: bool) -> String {
    let mut out = format!(
        "{} {}\n",
        Icon::Error.colored(supports_color, supports_unicode),
        paint(&error.to_string(), Tone::Error, supports_color)
    );
    for cause in error.chain().skip(1) {
        out.push_str(&format!(
            "  {}\n",
            paint(&format!("caused by: {cause}"), Tone::Dim, supports_color)
        ));
    }
    out
}
