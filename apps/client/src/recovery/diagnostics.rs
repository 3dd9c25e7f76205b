//! Best-effort capture of decode failure context. Sinks are a side
//! channel: whatever happens in here (permission errors, disk full) is
//! logged and swallowed, and must never change the decode outcome.

use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::recovery::decode::DecodeAttempt;

/// Only this much of the raw body goes into the hex dump.
const HEX_DUMP_LIMIT: usize = 500;
const HEX_BYTES_PER_LINE: usize = 16;

/// Everything known about a failing decode at the moment of capture.
pub struct DiagnosticContext<'a> {
    pub body_text: &'a str,
    pub body_bytes: &'a [u8],
    pub attempts: &'a [DecodeAttempt],
}

/// Receiver for decode failure context.
pub trait DiagnosticSink: Send + Sync {
    fn record(&self, ctx: &DiagnosticContext<'_>);
}

/// Discards everything. For tests and callers that opt out of capture.
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn record(&self, _ctx: &DiagnosticContext<'_>) {}
}

/// Writes the raw response text, a hex/ASCII dump of its first bytes, and
/// the attempt log into a fixed debug directory. Concurrent calls may
/// overwrite each other's files; the dumps are a debugging aid, not a
/// durable record.
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileSink { dir: dir.into() }
    }

    /// `$HOME/resume_optimizer_debug`, falling back to the system temp dir
    /// when `HOME` is unset.
    pub fn default_dir() -> PathBuf {
        std::env::var_os("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(std::env::temp_dir)
            .join("resume_optimizer_debug")
    }

    fn write_dumps(&self, ctx: &DiagnosticContext<'_>) -> std::io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.dir.join("raw_response.txt"), ctx.body_text)?;
        fs::write(
            self.dir.join("response_bytes.txt"),
            hex_dump(ctx.body_bytes, HEX_DUMP_LIMIT),
        )?;
        fs::write(
            self.dir.join("decode_attempts.txt"),
            attempt_log(ctx.attempts),
        )?;
        Ok(())
    }
}

impl DiagnosticSink for FileSink {
    fn record(&self, ctx: &DiagnosticContext<'_>) {
        match self.write_dumps(ctx) {
            Ok(()) => debug!("decode diagnostics written to {}", self.dir.display()),
            Err(e) => warn!(
                "failed to write decode diagnostics to {}: {e}",
                self.dir.display()
            ),
        }
    }
}

/// Offset, hex and printable-ASCII columns, 16 bytes per line.
pub fn hex_dump(bytes: &[u8], limit: usize) -> String {
    let mut out = String::from("Offset  Hex                                              ASCII\n");
    let truncated = &bytes[..bytes.len().min(limit)];
    for (line, chunk) in truncated.chunks(HEX_BYTES_PER_LINE).enumerate() {
        let hex = chunk
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect::<Vec<_>>()
            .join(" ");
        let ascii: String = chunk
            .iter()
            .map(|&b| if (32..=126).contains(&b) { b as char } else { '.' })
            .collect();
        let _ = writeln!(
            out,
            "{:06x}  {hex:<47}  {ascii}",
            line * HEX_BYTES_PER_LINE
        );
    }
    out
}

fn attempt_log(attempts: &[DecodeAttempt]) -> String {
    let mut out = String::new();
    for a in attempts {
        let _ = write!(out, "{:?}: {}", a.stage, if a.succeeded { "ok" } else { "failed" });
        if let Some(offset) = a.error_offset {
            let _ = write!(out, " at offset {offset}");
        }
        if let Some(ctx) = &a.error_context {
            let _ = write!(out, " near ...{ctx}...");
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recovery::decode::DecodeStage;

    fn ctx<'a>(text: &'a str, attempts: &'a [DecodeAttempt]) -> DiagnosticContext<'a> {
        DiagnosticContext {
            body_text: text,
            body_bytes: text.as_bytes(),
            attempts,
        }
    }

    #[test]
    fn test_hex_dump_line_format() {
        let dump = hex_dump(b"AB", HEX_DUMP_LIMIT);
        let line = dump.lines().nth(1).unwrap();
        assert_eq!(line, format!("000000  {:<47}  AB", "41 42"));
    }

    #[test]
    fn test_hex_dump_nonprintable_as_dot() {
        let dump = hex_dump(&[0x00, 0x1f, 0x41, 0x7f], HEX_DUMP_LIMIT);
        assert!(dump.lines().nth(1).unwrap().ends_with("..A."));
    }

    #[test]
    fn test_hex_dump_truncates_at_limit() {
        let bytes = vec![0x41u8; 600];
        let dump = hex_dump(&bytes, HEX_DUMP_LIMIT);
        // 500 bytes at 16 per line, plus the header
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines.len(), 1 + 500_usize.div_ceil(16));
        assert!(lines.last().unwrap().starts_with("0001f0"));
    }

    #[test]
    fn test_file_sink_writes_all_dumps() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSink::new(dir.path().join("dumps"));
        let attempts = [DecodeAttempt {
            stage: DecodeStage::Strict,
            succeeded: false,
            error_offset: Some(3),
            error_context: Some("oop".to_string()),
        }];
        sink.record(&ctx("not json", &attempts));

        let base = dir.path().join("dumps");
        assert_eq!(
            fs::read_to_string(base.join("raw_response.txt")).unwrap(),
            "not json"
        );
        let hex = fs::read_to_string(base.join("response_bytes.txt")).unwrap();
        assert!(hex.contains("not json"), "ascii column missing: {hex}");
        let log = fs::read_to_string(base.join("decode_attempts.txt")).unwrap();
        assert!(log.contains("Strict: failed at offset 3"), "was: {log}");
    }

    #[test]
    fn test_file_sink_failure_is_swallowed() {
        // a file where the directory should be makes every write fail
        let file = tempfile::NamedTempFile::new().unwrap();
        let sink = FileSink::new(file.path());
        sink.record(&ctx("body", &[])); // must not panic or propagate
    }

    #[test]
    fn test_null_sink_is_a_no_op() {
        NullSink.record(&ctx("anything", &[]));
    }
}
