use crossterm::style::Stylize;

use crate::ui::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Success,
    Error,
    Warning,
    Hint,
    Arrow,
    File,
    Added,
    Removed,
    Changed,
    Watch,
    Serve,
    Init,
    Check,
    List,
    Config,
}

impl Icon {
    pub fn render(&self, supports_unicode: bool) -> &'static str {
        match (supports_unicode, self) {
            (true, Icon::Success) => theme::icons::SUCCESS,
            (true, Icon::Error) => theme::icons::ERROR,
            (true, Icon::Warning) => theme::icons::WARNING,
            (true, Icon::Hint) => theme::icons::HINT,
            (true, Icon::Arrow) => theme::icons::ARROW,
            (true, Icon::File) => theme::icons::FILE,
            (true, Icon::Added) => theme::icons::ADDED,
            (true, Icon::Removed) => theme::icons::REMOVED,
            (true, Icon::Changed) => theme::icons::CHANGED,
            (true, Icon::Watch) => theme::icons::WATCH,
            (true, Icon::Serve) => theme::icons::SERVE,
            (true, Icon::Init) => theme::icons::INIT,
            (true, Icon::Check) => theme::icons::CHECK,
            (true, Icon::List) => theme::icons::LIST,
            (true, Icon::Config) => theme::icons::CONFIG,
            (false, Icon::Success) => theme::icons_ascii::SUCCESS,
            (false, Icon::Error) => theme::icons_ascii::ERROR,
            (false, Icon::Warning) => theme::icons_ascii::WARNING,
            (false, Icon::Hint) => theme::icons_ascii::HINT,
            (false, Icon::Arrow) => theme::icons_ascii::ARROW,
            (false, Icon::File) => theme::icons_ascii::FILE,
            (false, Icon::Added) => theme::icons_ascii::ADDED,
            (false, Icon::Removed) => theme::icons_ascii::REMOVED,
            (false, Icon::Changed) => theme::icons_ascii::CHANGED,
            (false, Icon::Watch) => theme::icons_ascii::WATCH,
            (false, Icon::Serve) => theme::icons_ascii::SERVE,
            (false, Icon::Init) => theme::icons_ascii::INIT,
            (false, Icon::Check) => theme::icons_ascii::CHECK,
            (false, Icon::List) => theme::icons_ascii::LIST,
            (false, Icon::Config) => theme::icons_ascii::CONFIG,
        }
    }

    pub fn colored(&self, supports_color: bool, supports_unicode: bool) -> String {
        let s = self.render(supports_unicode);
        if !supports_color {
            return s.to_string();
        }
        let color = match self {
            Icon::Success | Icon::Added => theme::colors::SUCCESS,
            Icon::Error | Icon::Removed => theme::colors::ERROR,
            Icon::Warning | Icon::Changed => theme::colors::WARNING,
            Icon::Hint | Icon::Arrow | Icon::File => theme::colors::DIM,
            Icon::Watch | Icon::Serve | Icon::Init | Icon::Check | Icon::List | Icon::Config => {
                theme::colors::INFO
            }
        };
        format!("{}", s.with(color))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icon_renders_ascii_when_unicode_unsupported() {
        assert_eq!(Icon::Success.render(false), theme::icons_ascii::SUCCESS);
    }

    #[test]
    fn icon_renders_unicode_when_supported() {
        assert_eq!(Icon::Warning.render(true), theme::icons::WARNING);
    }

    #[test]
    fn uncolored_icon_has_no_escape_codes() {
        assert_eq!(Icon::Removed.colored(false, false), "[-]");
    }
}
