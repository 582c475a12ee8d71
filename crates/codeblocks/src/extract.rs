use std::borrow::Cow;
use std::ops::Range;

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag};

use crate::block::CodeBlock;
use crate::state::State;

/// Extracts every tagged, non-empty fenced code block from raw markdown bytes.
///
/// Invalid UTF-8 is replaced before parsing, so this never fails.
pub fn extract(source: &[u8]) -> Vec<CodeBlock> {
    let markdown: Cow<'_, str> = String::from_utf8_lossy(source);
    extract_from_str(&markdown)
}

/// Extracts fenced code blocks in document order.
///
/// Blocks nested in block quotes or list items are found as well; their
/// content has the container prefixes removed. Indented code blocks and fences
/// without an info string are skipped. The language tag and the content are
/// copied from the source text, so escapes stay undecoded and `\r\n` line
/// endings survive.
pub fn extract_from_str(markdown: &str) -> Vec<CodeBlock> {
    let mut state = State::new();
    // End of the last source byte copied into the open fence.
    let mut copied_to = 0usize;

    for (event, range) in Parser::new_ext(markdown, Options::empty()).into_offset_iter() {
        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                let language = raw_info(markdown, range.start).unwrap_or(&*info);
                state.enter_fence(language);
                copied_to = range.start;
            }
            Event::Text(text) if state.is_within_fence() => {
                append_raw(&mut state, markdown, range.clone(), &*text, copied_to);
                copied_to = range.end;
            }
            Event::End(Tag::CodeBlock(_)) => state.exit_fence(),
            _ => {}
        }
    }

    state.finalize()
}

/// Reads the info string from the opening fence line that starts at `start`.
///
/// Returns `None` when the line does not begin with a fence run.
fn raw_info(source: &str, start: usize) -> Option<&str> {
    let line = source.get(start..)?.split('\n').next()?;
    let line = line.trim_start();
    let fence_char = line.chars().next().filter(|ch| *ch == '`' || *ch == '~')?;
    Some(line.trim_start_matches(fence_char).trim())
}

/// Appends a text event's source bytes, restoring any `\r` the parser
/// dropped in front of a line feed.
fn append_raw(state: &mut State, source: &str, range: Range<usize>, text: &str, copied_to: usize) {
    let raw = match source.get(range.clone()) {
        Some(raw) if raw == text => raw,
        _ => {
            state.append_text(text);
            return;
        }
    };

    let dropped_cr = raw.starts_with('\n')
        && range.start > copied_to
        && source.as_bytes().get(range.start - 1) == Some(&b'\r');
    if dropped_cr {
        state.append_text("\r");
    }
    state.append_text(raw);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_info_strips_fence_and_whitespace() {
        let source = "  ```  rust ignore \r\nfn x() {}\n```\n";
        assert_eq!(raw_info(source, 0), Some("rust ignore"));
        assert_eq!(raw_info("~~~~toml\n", 0), Some("toml"));
        assert_eq!(raw_info("```\n", 0), Some(""));
        assert_eq!(raw_info("> ```sh\n", 0), None);
    }
}
