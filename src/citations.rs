// src/citations.rs
//! Turns the agent's inline citation markers (`[1]`, `[2]`, ...) into
//! superscript markup while escaping everything else for safe insertion into
//! the chat log.
//!
//! Order matters: markers are tagged first, then the whole string is
//! HTML-escaped, then the escaped sup tags are restored. Escaping first would
//! leave no reliable way to tell a user-typed `<sup>` from ours.
//!
//! Not idempotent: re-running over already-rendered output would re-wrap the
//! restored markers. Callers invoke it once per raw answer.

use once_cell::sync::OnceCell;
use regex::Regex;

fn re_marker() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| Regex::new(r"\[[0-9]+\]").unwrap())
}

fn re_escaped_sup() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| Regex::new(r"&lt;sup&gt;\[([0-9]+)\]&lt;/sup&gt;").unwrap())
}

/// Render an agent answer to display-safe HTML: standalone `[n]` markers get
/// `<sup>` wrapping, `&`/`<`/`>` are escaped, newlines become `<br/>`.
///
/// Markdown links survive untouched: a marker directly followed by `(` is the
/// bracketed text of `[text](url)`, and one directly preceded by `]` can be
/// the tail of such bracketed text, so both are left alone. Code spans get no
/// special protection.
pub fn render_citations(md: &str) -> String {
    let marked = mark_citation_spans(md);
    let escaped = html_escape::encode_text(&marked).into_owned();
    let restored = re_escaped_sup()
        .replace_all(&escaped, "<sup>[$1]</sup>")
        .into_owned();
    restored.replace('\n', "<br/>")
}

fn mark_citation_spans(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len() + 32);
    let mut last = 0;

    for m in re_marker().find_iter(text) {
        let standalone = (m.start() == 0 || bytes[m.start() - 1] != b']')
            && (m.end() >= bytes.len() || bytes[m.end()] != b'(');

        out.push_str(&text[last..m.start()]);
        if standalone {
            out.push_str("<sup>");
            out.push_str(m.as_str());
            out.push_str("</sup>");
        } else {
            out.push_str(m.as_str());
        }
        last = m.end();
    }

    out.push_str(&text[last..]);
    out
}
