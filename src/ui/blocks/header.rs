use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::{paint, strong, Tone};

/// Title line plus aligned `label: value` rows
#[derive(Debug, Clone)]
pub struct CommandHeader {
    icon: Icon,
    title: String,
    items: Vec<(String, String)>,
}

impl CommandHeader {
    pub fn new(icon: Icon, title: impl Into<String>) -> Self {
        Self {
            icon,
            title: title.into(),
            items: Vec::new(),
        }
    }

    pub fn add(&mut self, label: impl Into<String>, value: impl Into<String>) {
        self.items.push((label.into(), value.into()));
    }

    pub fn render(&self, supports_color: bool, supports_unicode: bool) -> String {
        let mut out = format!(
            "{} {}\n",
            self.icon.colored(supports_color, supports_unicode),
            strong(&self.title, Some(Tone::Info), supports_color)
        );
        let width = self.items.iter().map(|(l, _)| l.len()).max().unwrap_or(0);
        for (label, value) in &self.items {
            let label = format!("{:<width$}", format!("{label}:"), width = width + 1);
            out.push_str(&format!("  {} {}\n", paint(&label, Tone::Dim, supports_color), value));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_ascii_header_with_aligned_rows() {
        let mut header = CommandHeader::new(Icon::Serve, "ruledeck serve");
        header.add("Project", "webshop");
        header.add("Rules", "/home/dev/webshop/.cursor/rules");

        insta::assert_snapshot!(header.render(false, false), @r"
        [SERVE] ruledeck serve
          Project: webshop
          Rules:   /home/dev/webshop/.cursor/rules
        ");
    }
}
