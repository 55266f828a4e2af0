use ruledeck::rules::ValidationReport;

use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::{paint, Tone};

pub fn render_validation(
    report: &ValidationReport,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let mut out = format!(
        "{} Validating {} rule file(s)...\n",
        Icon::Check.colored(supports_color, supports_unicode),
        report.checked
    );

    if report.is_clean() {
        out.push_str(&format!(
            "{} All rule files validated successfully\n",
            Icon::Success.colored(supports_color, supports_unicode)
        ));
        return out;
    }

    out.push_str(&format!(
        "{} Rule validation warnings:\n",
        Icon::Warning.colored(supports_color, supports_unicode)
    ));
    for issue in &report.issues {
        out.push_str(&format!(
            "  {}: {}\n",
            paint(&issue.file, Tone::Warning, supports_color),
            issue.message
        ));
    }
    out.push_str(&format!(
        "{} Fix these so the IDE picks up every rule\n",
        Icon::Hint.colored(supports_color, supports_unicode)
    ));
    out
}
