use ruledeck::ServerExit;

use crate::ui::blocks::header::CommandHeader;
use crate::ui::primitives::icon::Icon;

pub fn render_serve_header(
    project: &str,
    root: &str,
    rules_dir: &str,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let mut header = CommandHeader::new(Icon::Serve, "ruledeck serve");
    header.add("Project", project);
    header.add("Path", root);
    header.add("Rules", rules_dir);
    header.render(supports_color, supports_unicode)
}

pub fn render_server_started(
    command_line: &str,
    pid: u32,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    format!(
        "{} Started server (pid {pid}): {command_line}\n",
        Icon::Serve.colored(supports_color, supports_unicode)
    )
}

pub fn render_server_exited(exit: ServerExit, supports_color: bool, supports_unicode: bool) -> String {
    match exit.code {
        Some(0) => format!(
            "{} Server exited\n",
            Icon::Success.colored(supports_color, supports_unicode)
        ),
        Some(code) => format!(
            "{} Server exited with code {code}\n",
            Icon::Error.colored(supports_color, supports_unicode)
        ),
        None => format!(
            "{} Server terminated by signal\n",
            Icon::Error.colored(supports_color, supports_unicode)
        ),
    }
}

pub fn render_server_failed(message: &str, supports_color: bool, supports_unicode: bool) -> String {
    format!(
        "{} {message}\n",
        Icon::Error.colored(supports_color, supports_unicode)
    )
}
