use std::path::Path;

use ruledeck::mcp_config::MergeOutcome;

use crate::ui::blocks::header::CommandHeader;
use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::{paint, strong, Tone};

pub fn render_config_header(
    project: &str,
    executable: &str,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let mut header = CommandHeader::new(Icon::Config, "ruledeck config");
    header.add("Project", project);
    header.add("Server", executable);
    header.render(supports_color, supports_unicode)
}

/// The mcp.json snippet plus how to install it
pub fn render_snippet(
    snippet: &str,
    target: &Path,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let mut out = format!(
        "\n{}\n\n{snippet}\n\n",
        strong(
            &format!("Add this to {}:", target.display()),
            None,
            supports_color
        )
    );
    out.push_str(&format!(
        "{} Or run `ruledeck config --write` to merge it automatically\n",
        Icon::Hint.colored(supports_color, supports_unicode)
    ));
    out.push_str(&format!(
        "  {}\n",
        paint(
            "Restart the IDE afterwards so it starts the server",
            Tone::Dim,
            supports_color
        )
    ));
    out
}

pub fn render_written(
    target: &Path,
    outcome: MergeOutcome,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let ok = Icon::Success.colored(supports_color, supports_unicode);
    let path = target.display();
    match outcome {
        MergeOutcome::Created => format!("{ok} Created {path}\n"),
        MergeOutcome::Added => format!("{ok} Added ruledeck to {path}\n"),
        MergeOutcome::Updated => format!("{ok} Updated the ruledeck entry in {path}\n"),
        MergeOutcome::Unchanged => format!("{ok} {path} is already up to date\n"),
    }
}

/// Shown instead of the snippet when run inside the template project
pub fn render_template_project_warning(
    dir: &Path,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let warn = Icon::Warning.colored(supports_color, supports_unicode);
    let hint = Icon::Hint.colored(supports_color, supports_unicode);
    let dim = |text: &str| paint(text, Tone::Dim, supports_color);

    format!(
        "{warn} {} is the template source project\n  {}\n  {}\n{hint} Run this from your actual project instead:\n  {}\n",
        dir.display(),
        dim("Do not create mcp.json here."),
        dim("The IDE would load the server twice."),
        dim("cd ~/my-project && ruledeck config")
    )
}
