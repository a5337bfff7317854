/*!
format.rs

Formatting utilities for human output paths (help listing, error banners).

Goals:
  - Centralize style decisions (NO_COLOR env, terminal width).
  - Keep output deterministic when ANSI is disabled so listings can be asserted on.
  - Measure widths ANSI-aware so colored cells still line up.

Public API Summary:
  - StyleOptions::detect(&Env) -> StyleOptions
  - StyleOptions::plain() -> StyleOptions
  - color(role, text, &StyleOptions) -> String
  - tablify(rows) -> String
  - truncate_ellipsis(s, max_chars) -> String

NOTE:
  - This module never prints; it only returns formatted strings.
*/

use std::borrow::Cow;

use crate::env::Env;

/* -------------------------------------------------------------------------- */
/* Style Options                                                              */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Clone)]
pub struct StyleOptions {
    pub use_color: bool,
    pub term_width: usize,
}

impl StyleOptions {
    pub fn detect(env: &Env) -> Self {
        let use_color = !env.contains("NO_COLOR");

        let width = env
            .get("COLUMNS")
            .and_then(|v| v.parse::<usize>().ok())
            .map(|w| w.clamp(40, 220))
            .unwrap_or(100);

        StyleOptions {
            use_color,
            term_width: width,
        }
    }

    /// No color, default width.
    pub fn plain() -> Self {
        StyleOptions {
            use_color: false,
            term_width: 100,
        }
    }
}

/* -------------------------------------------------------------------------- */
/* Color                                                                      */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Clone, Copy)]
pub enum Role {
    Warning,
    Error,
    Bold,
}

pub fn color(role: Role, text: impl AsRef<str>, style: &StyleOptions) -> String {
    if !style.use_color {
        return text.as_ref().to_string();
    }
    let code = match role {
        Role::Warning => "38;5;214", // orange
        Role::Error => "38;5;196",   // red
        Role::Bold => "1",
    };
    format!("\x1b[{code}m{}\x1b[0m", text.as_ref())
}

/* -------------------------------------------------------------------------- */
/* Table Rendering                                                             */
/* -------------------------------------------------------------------------- */

/// Render rows as an aligned, border-less table.
///
/// Every column except the last is padded to its widest cell, columns are
/// separated by two spaces and each row ends with a newline. Rows may have
/// different lengths; missing cells are treated as empty.
pub fn tablify(rows: &[Vec<String>]) -> String {
    let col_count = rows.iter().map(|r| r.len()).max().unwrap_or(0);
    let mut widths = vec![0usize; col_count];
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            let w = display_width(cell);
            if w > widths[i] {
                widths[i] = w;
            }
        }
    }

    let mut out = String::new();
    for row in rows {
        let mut line = String::new();
        for (i, cell) in row.iter().enumerate() {
            if i > 0 {
                line.push_str("  ");
            }
            line.push_str(cell);
            if i + 1 < row.len() {
                let pad = widths[i] - display_width(cell);
                line.push_str(&" ".repeat(pad));
            }
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/* -------------------------------------------------------------------------- */
/* Text Helpers                                                                */
/* -------------------------------------------------------------------------- */

pub fn truncate_ellipsis(s: &str, max_chars: usize) -> String {
    if max_chars == 0 {
        return String::new();
    }
    let raw_len = s.chars().count();
    if raw_len <= max_chars {
        return s.to_string();
    }
    if max_chars <= 1 {
        return "…".into();
    }
    let mut out = String::new();
    for ch in s.chars().take(max_chars - 1) {
        out.push(ch);
    }
    out.push('…');
    out
}

/* -------------------------------------------------------------------------- */
/* ANSI / Width Utilities                                                      */
/* -------------------------------------------------------------------------- */

fn strip_ansi(s: &str) -> Cow<'_, str> {
    // Minimal implementation (no regex) — scans for ESC '[' ... 'm'
    if !s.contains('\x1b') {
        return Cow::Borrowed(s);
    }
    let mut buf = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            for n in chars.by_ref() {
                if n.is_ascii_alphabetic() {
                    break;
                }
            }
            continue;
        }
        buf.push(c);
    }
    Cow::Owned(buf)
}

fn display_width(s: &str) -> usize {
    strip_ansi(s).chars().count()
}

/* -------------------------------------------------------------------------- */
/* Tests                                                                       */
/* -------------------------------------------------------------------------- */
