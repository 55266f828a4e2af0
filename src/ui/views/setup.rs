use ruledeck::project::TemplateSource;
use ruledeck::rules::{SetupReport, SetupWarning};

use crate::ui::blocks::header::CommandHeader;
use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::{paint, Tone};

pub fn render_init_header(
    project: &str,
    rules_dir: &str,
    source: Option<&TemplateSource>,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let mut header = CommandHeader::new(Icon::Init, "ruledeck init");
    header.add("Project", project);
    header.add("Rules", rules_dir);
    header.add(
        "Templates",
        source
            .map(|s| s.rules_dir.display().to_string())
            .unwrap_or_else(|| "(none)".to_string()),
    );
    header.render(supports_color, supports_unicode)
}

fn render_warning(warning: &SetupWarning, supports_color: bool, supports_unicode: bool) -> String {
    let icon = Icon::Warning.colored(supports_color, supports_unicode);
    let detail = |text: &str| format!("  {}\n", paint(text, Tone::Dim, supports_color));
    match warning {
        SetupWarning::NoTemplateSource => format!(
            "{icon} Could not find a template rules directory\n{}",
            detail("Pass --templates <dir> or set rules.templates in the config")
        ),
        SetupWarning::SourceMissing { path } => {
            format!("{icon} Template rules directory not found: {}\n", path.display())
        }
        SetupWarning::NoTemplates { path, suffix } => format!(
            "{icon} No {suffix} files found in template directory: {}\n",
            path.display()
        ),
    }
}

/// Summary of a setup pass
pub fn render_setup(
    project: &str,
    report: &SetupReport,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let file = Icon::File.colored(supports_color, supports_unicode);
    let mut out = String::new();

    if report.created_dir {
        out.push_str(&format!(
            "{} Created rules directory for {project}\n",
            Icon::Init.colored(supports_color, supports_unicode)
        ));
    }
    for warning in &report.warnings {
        out.push_str(&render_warning(warning, supports_color, supports_unicode));
    }
    for name in &report.skipped {
        out.push_str(&format!(
            "  {}\n",
            paint(&format!("Skipping {name} (already exists)"), Tone::Dim, supports_color)
        ));
    }

    if !report.copied.is_empty() {
        out.push_str(&format!(
            "{} Copied {} rule file(s) to {project}:\n",
            Icon::Success.colored(supports_color, supports_unicode),
            report.copied.len()
        ));
        for name in &report.copied {
            out.push_str(&format!("  {file} {name}\n"));
        }
    } else if report.source.is_some() && report.warnings.is_empty() {
        out.push_str(&format!(
            "{} All rule files already exist in {project}\n",
            Icon::Success.colored(supports_color, supports_unicode)
        ));
    }

    out
}

/// The rule files the project ends up with
pub fn render_available(
    project: &str,
    available: &[String],
    suffix: &str,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    if available.is_empty() {
        return format!(
            "{} No {suffix} files found in rules directory\n",
            Icon::Warning.colored(supports_color, supports_unicode)
        );
    }
    let file = Icon::File.colored(supports_color, supports_unicode);
    let mut out = format!(
        "{} Available rule files in {project}:\n",
        Icon::List.colored(supports_color, supports_unicode)
    );
    for name in available {
        out.push_str(&format!("  {file} {name}\n"));
    }
    out
}
