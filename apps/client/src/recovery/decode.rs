//! Cascading decoder for response bodies that are expected to be JSON but
//! may not quite be. Stages run in a fixed order, each strictly more
//! permissive (and more destructive) than the last, so input that is
//! already valid is never altered:
//!
//! 1. strict parse of the body verbatim
//! 2. strip control characters (keeping `\n`, `\r`, `\t`) and re-parse
//! 3. greedy first-`{`-to-last-`}` extraction of the cleaned text
//! 4. remove trailing commas before `]`/`}` in the extracted span
//!
//! Stage results are plain values, not unwound errors: the short circuit
//! is visible in the control flow below. Every failing stage reports to
//! the diagnostic sink before the next one runs.

use serde_json::Value;
use tracing::{debug, warn};

use crate::recovery::diagnostics::{DiagnosticContext, DiagnosticSink};

/// Characters kept on each side of a parse error in diagnostic context.
const CONTEXT_WINDOW: usize = 50;

/// How far down the cascade a decode had to go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStage {
    Strict,
    StripControlChars,
    RegexExtract,
    TrailingCommaFix,
}

/// Outcome of one attempted stage. Accumulated within a single call and
/// handed to the diagnostic sink; never persisted across calls.
#[derive(Debug, Clone)]
pub struct DecodeAttempt {
    pub stage: DecodeStage,
    pub succeeded: bool,
    pub error_offset: Option<usize>,
    pub error_context: Option<String>,
}

/// A successfully decoded body, tagged with the stage that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub value: Value,
    pub stage: DecodeStage,
}

/// Terminal failure: the last known error position and the text around it.
#[derive(Debug, Clone)]
pub struct DecodeFailure {
    pub position: usize,
    pub context: String,
}

/// Decodes `body` as JSON, falling back through progressively more
/// destructive repairs. `body_bytes` is only used for diagnostics.
pub fn decode_recoverable(
    body: &str,
    body_bytes: &[u8],
    sink: &dyn DiagnosticSink,
) -> Result<Decoded, DecodeFailure> {
    let mut attempts: Vec<DecodeAttempt> = Vec::new();

    // Stage 1: the body verbatim. Valid input must pass through untouched.
    match try_stage(DecodeStage::Strict, body, &mut attempts) {
        Ok(value) => return Ok(Decoded { value, stage: DecodeStage::Strict }),
        Err(offset) => {
            warn!("strict JSON parse failed at offset {offset}, entering recovery cascade");
            sink.record(&DiagnosticContext { body_text: body, body_bytes, attempts: &attempts });
        }
    }

    // Stage 2: drop control characters and re-parse.
    let cleaned = strip_control_chars(body);
    match try_stage(DecodeStage::StripControlChars, &cleaned, &mut attempts) {
        Ok(value) => {
            debug!("JSON recovered after stripping control characters");
            return Ok(Decoded { value, stage: DecodeStage::StripControlChars });
        }
        Err(_) => {
            sink.record(&DiagnosticContext { body_text: body, body_bytes, attempts: &attempts });
        }
    }

    // Stages 3 and 4: the widest object-looking span of the cleaned text,
    // first verbatim, then with trailing commas removed. The extraction is
    // intentionally greedy rather than balance-aware; prose containing
    // braces can mis-extract, and callers get a terminal failure then.
    let mut last_failure = terminal_failure(&cleaned, &attempts);
    if let Some(span) = extract_object_span(&cleaned) {
        match try_stage(DecodeStage::RegexExtract, span, &mut attempts) {
            Ok(value) => {
                debug!("JSON recovered by extracting an object span");
                return Ok(Decoded { value, stage: DecodeStage::RegexExtract });
            }
            Err(_) => {
                sink.record(&DiagnosticContext { body_text: body, body_bytes, attempts: &attempts });
            }
        }

        let repaired = strip_trailing_commas(span);
        match try_stage(DecodeStage::TrailingCommaFix, &repaired, &mut attempts) {
            Ok(value) => {
                debug!("JSON recovered after trailing comma repair");
                return Ok(Decoded { value, stage: DecodeStage::TrailingCommaFix });
            }
            Err(offset) => {
                last_failure = DecodeFailure {
                    position: offset,
                    context: context_window(&repaired, offset),
                };
                sink.record(&DiagnosticContext { body_text: body, body_bytes, attempts: &attempts });
            }
        }
    }

    warn!(
        "all decode stages exhausted, failing at position {}",
        last_failure.position
    );
    Err(last_failure)
}

/// Runs one parse attempt, records it, and returns either the value or the
/// byte offset of the parse error.
fn try_stage(stage: DecodeStage, input: &str, attempts: &mut Vec<DecodeAttempt>) -> Result<Value, usize> {
    match serde_json::from_str::<Value>(input) {
        Ok(value) => {
            attempts.push(DecodeAttempt {
                stage,
                succeeded: true,
                error_offset: None,
                error_context: None,
            });
            Ok(value)
        }
        Err(e) => {
            let offset = error_offset(input, &e);
            attempts.push(DecodeAttempt {
                stage,
                succeeded: false,
                error_offset: Some(offset),
                error_context: Some(context_window(input, offset)),
            });
            Err(offset)
        }
    }
}

fn terminal_failure(cleaned: &str, attempts: &[DecodeAttempt]) -> DecodeFailure {
    let position = attempts
        .iter()
        .rev()
        .find_map(|a| a.error_offset)
        .unwrap_or(0);
    DecodeFailure {
        position,
        context: context_window(cleaned, position),
    }
}

/// Keeps characters with code point >= 32 plus newline, carriage return
/// and tab.
fn strip_control_chars(input: &str) -> String {
    input
        .chars()
        .filter(|&c| c >= ' ' || c == '\n' || c == '\r' || c == '\t')
        .collect()
}

/// Greedy span from the first `{` to the last `}`.
fn extract_object_span(input: &str) -> Option<&str> {
    let start = input.find('{')?;
    let end = input.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&input[start..=end])
}

/// Removes commas that sit immediately before a closing `]` or `}`,
/// ignoring whitespace in between. Like the naive regex it replaces, this
/// does not know about string literals; a quoted `",]"` gets rewritten
/// too, which is acceptable for a repair of last resort.
fn strip_trailing_commas(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == ',' {
            let mut j = i + 1;
            while j < chars.len() && chars[j].is_whitespace() {
                j += 1;
            }
            if j < chars.len() && (chars[j] == ']' || chars[j] == '}') {
                i += 1; // drop the comma, keep the whitespace
                continue;
            }
        }
        out.push(chars[i]);
        i += 1;
    }
    out
}

/// serde_json reports errors as 1-based line/column; convert back to a
/// byte offset into `input`.
fn error_offset(input: &str, err: &serde_json::Error) -> usize {
    let line = err.line();
    if line == 0 {
        return 0;
    }
    let mut offset = 0;
    for (i, l) in input.split('\n').enumerate() {
        if i + 1 == line {
            return (offset + err.column().saturating_sub(1)).min(input.len());
        }
        offset += l.len() + 1;
    }
    input.len()
}

/// Up to `CONTEXT_WINDOW` characters on each side of `offset`, clamped to
/// character boundaries.
fn context_window(input: &str, offset: usize) -> String {
    let pos = floor_char_boundary(input, offset.min(input.len()));
    let start = floor_char_boundary(input, pos.saturating_sub(CONTEXT_WINDOW));
    let end = floor_char_boundary(input, (pos + CONTEXT_WINDOW).min(input.len()));
    input[start..end].to_string()
}

fn floor_char_boundary(s: &str, mut i: usize) -> usize {
    i = i.min(s.len());
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}
