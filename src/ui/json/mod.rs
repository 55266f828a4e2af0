//! JSON output for `--json` mode
//!
//! One JSON object per line, written to the command's output stream.

mod events;

pub use events::Event;

use serde::Serialize;
use std::io::{self, Write};

use crate::ui::terminal::Stream;

/// Write a typed event as one NDJSON line.
pub fn write_typed_event<T: Serialize, W: Write>(out: &mut W, event: &T) -> io::Result<()> {
    let json =
        serde_json::to_string(event).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    out.write_all(json.as_bytes())?;
    out.write_all(b"\n")?;
    out.flush()
}

/// Emit an event on `stream`.
pub fn write_event(stream: Stream, event: &Event<'_>) -> io::Result<()> {
    match stream {
        Stream::Stdout => write_typed_event(&mut io::stdout().lock(), event),
        Stream::Stderr => write_typed_event(&mut io::stderr().lock(), event),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ruledeck::watcher::{StrategyTier, WatchNotice};

    fn to_line(event: &Event<'_>) -> String {
        let mut buffer = Vec::new();
        write_typed_event(&mut buffer, event).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn start_event_carries_version() {
        let line = to_line(&Event::start("serve"));
        assert!(line.ends_with('\n'));

        let parsed: serde_json::Value = serde_json::from_str(line.trim()).unwrap();
        assert_eq!(parsed["event"], "start");
        assert_eq!(parsed["command"], "serve");
        assert_eq!(parsed["version"], env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn watch_notices_nest_their_own_tag() {
        let notice = WatchNotice::Started {
            tier: StrategyTier::PerFile,
            subscriptions: 3,
            detects_new_files: true,
        };
        let parsed: serde_json::Value =
            serde_json::from_str(to_line(&Event::Watch(&notice)).trim()).unwrap();

        assert_eq!(parsed["event"], "watch");
        assert_eq!(parsed["notice"], "started");
        assert_eq!(parsed["tier"], "per_file");
        assert_eq!(parsed["subscriptions"], 3);
    }

    #[test]
    fn unit_notice_serializes() {
        let line = to_line(&Event::Watch(&WatchNotice::Unavailable));
        assert_eq!(line.trim(), r#"{"event":"watch","notice":"unavailable"}"#);
    }

    #[test]
    fn events_are_ndjson() {
        let mut buffer = Vec::new();
        write_typed_event(&mut buffer, &Event::start("check")).unwrap();
        write_typed_event(&mut buffer, &Event::complete("check", true)).unwrap();

        let output = String::from_utf8(buffer).unwrap();
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        for line in lines {
            assert!(serde_json::from_str::<serde_json::Value>(line).is_ok());
        }
    }
}
