use ruledeck::rules::RuleSummary;

use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::{paint, strong, Tone};

pub fn render_rule_list(
    rules_dir: &str,
    rules: &[RuleSummary],
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let mut out = format!(
        "{} {} rule file(s) in {rules_dir}\n",
        Icon::List.colored(supports_color, supports_unicode),
        rules.len()
    );

    for rule in rules {
        out.push('\n');
        out.push_str(&format!(
            "{} {}\n",
            Icon::File.colored(supports_color, supports_unicode),
            strong(&rule.name, None, supports_color)
        ));

        if let Some(problem) = &rule.problem {
            out.push_str(&format!(
                "  {} {}\n",
                Icon::Warning.colored(supports_color, supports_unicode),
                paint(problem, Tone::Warning, supports_color)
            ));
            continue;
        }

        let description = rule.description.as_deref().unwrap_or("(no description)");
        let globs = if rule.globs.is_empty() {
            "(none)".to_string()
        } else {
            rule.globs.join(", ")
        };
        out.push_str(&format!("  {description}\n"));
        out.push_str(&format!(
            "  {} {globs}\n",
            paint("globs:", Tone::Dim, supports_color)
        ));
        if rule.always_apply {
            out.push_str(&format!(
                "  {}\n",
                paint("always applied", Tone::Info, supports_color)
            ));
        }
    }

    out
}
