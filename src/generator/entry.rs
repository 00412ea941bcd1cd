/*
entry.rs

Copyright 2025 The Jigsaw Generate contributors

This file is part of Jigsaw Generate.

Jigsaw Generate is free software: you can redistribute it and/or modify it
under the terms of the GNU General Public License as published by the Free
Software Foundation, either version 3 of the License, or (at your option) any
later version.

Jigsaw Generate is distributed in the hope that it will be useful, but WITHOUT
ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.

You should have received a copy of the GNU General Public License along with
Jigsaw Generate. If not, see <https://www.gnu.org/licenses/>.

SPDX-License-Identifier: GPL-3.0-or-later
*/

//! Format the entries for the LaTeX and Markdown documents.
//!
//! The same entry is formatted differently depending on the [`Style`] of the output and on
//! whether it is displayed in the puzzle or in the solution ([`Mode`]).
//! Entries marked as hidden are blanked in the puzzle and highlighted in the solution.
//!
//! The [`EntryFormatter`] object remembers whether a hidden entry has been formatted during the
//! run, so that the documents can include a note explaining the highlighting.

use log::warn;
use regex::{Captures, Regex};
use std::sync::LazyLock;
use strum_macros::FromRepr;

use crate::puzzle_data::{Entry, RichEntry};

/// Index of `\normalsize` in the size scale.
pub const NORMAL_SIZE: usize = 4;

/// Placeholder for empty Markdown entries.
pub const DEFAULT_BLANK: &str = "(BLANK)";

/// Markdown image reference: `![caption](path)`.
static IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"!\[([^\]]*)\]\(([^\)]*)\)").expect("invalid image regular expression")
});

/// LaTeX font sizes, from the smallest to the largest.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, FromRepr)]
#[repr(usize)]
pub enum FontSize {
    Tiny,
    ScriptSize,
    FootnoteSize,
    Small,
    NormalSize,
    Large,
    LargeUpper,
    LargeAllCaps,
    Huge,
    HugeUpper,
}

impl FontSize {
    /// Largest size index.
    pub const MAX_INDEX: usize = 9;

    /// Return the size for the given index, clamped to the scale.
    pub fn from_index(index: i64) -> Self {
        let clamped: usize = index.clamp(0, Self::MAX_INDEX as i64) as usize;
        FontSize::from_repr(clamped).unwrap_or(FontSize::NormalSize)
    }

    /// Return the size that is `steps` below the given index, without going below `\tiny`.
    pub fn reduced(index: usize, steps: usize) -> Self {
        Self::from_index(index as i64 - steps as i64)
    }

    /// LaTeX command that selects the size.
    pub fn command(self) -> &'static str {
        match self {
            FontSize::Tiny => r"\tiny",
            FontSize::ScriptSize => r"\scriptsize",
            FontSize::FootnoteSize => r"\footnotesize",
            FontSize::Small => r"\small",
            FontSize::NormalSize => r"\normalsize",
            FontSize::Large => r"\large",
            FontSize::LargeUpper => r"\Large",
            FontSize::LargeAllCaps => r"\LARGE",
            FontSize::Huge => r"\huge",
            FontSize::HugeUpper => r"\Huge",
        }
    }
}

/// Output style.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Style {
    /// LaTeX answer table: raw text, hidden text prefixed with `(*)`, no size.
    Table,

    /// LaTeX pieces and cards: `{regular}{<size> <text>}` or `{hidden}{<size> <text>}`.
    Geometric,

    /// Markdown: raw text, hidden text prefixed with `(*)`, empty text replaced by the blank
    /// placeholder.
    Inline,
}

/// Whether the entry is formatted for the puzzle or for the solution.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Mode {
    Puzzle,
    Solution,
}

/// Formatting parameters.
#[derive(Debug, Clone)]
pub struct FormatParams<'a> {
    /// Default size index.
    pub size: usize,

    pub style: Style,

    /// Label used when the entry does not have one.
    pub label: &'a str,

    /// Label size index used when the entry does not have one.
    pub label_size: usize,

    /// Replacement text for empty Markdown entries.
    pub blank: &'a str,
}

impl<'a> FormatParams<'a> {
    /// Create a [`FormatParams`] object with no default label.
    pub fn new(style: Style, size: usize) -> Self {
        Self {
            size,
            style,
            label: "",
            label_size: 0,
            blank: DEFAULT_BLANK,
        }
    }

    /// Set the default label.
    pub fn with_label(mut self, label: &'a str, label_size: usize) -> Self {
        self.label = label;
        self.label_size = label_size;
        self
    }

    /// Set the blank placeholder.
    pub fn with_blank(mut self, blank: &'a str) -> Self {
        self.blank = blank;
        self
    }
}

/// Formatted entry.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Formatted {
    pub text: String,
    pub label: String,

    /// Whether the entry is hidden in the puzzle.
    pub hidden: bool,
}

/// Format an entry.
pub fn format_entry(entry: &Entry, params: &FormatParams, mode: Mode) -> Formatted {
    let label: String = format_label(entry, params);
    match entry {
        Entry::Plain(text) => Formatted {
            text: render(text, FontSize::from_index(params.size as i64), false, params),
            label,
            hidden: false,
        },
        Entry::Rich(rich) => format_rich(rich, params, mode, label),
    }
}

/// Format an entry with attributes.
fn format_rich(rich: &RichEntry, params: &FormatParams, mode: Mode, label: String) -> Formatted {
    let has_puzzle_text: bool = rich.puzzle_text.is_some();
    let has_solution_text: bool = rich.solution_text.is_some();

    if has_puzzle_text != has_solution_text {
        warn!(
            "Cannot have only one of \"puzzletext\" and \"solutiontext\" in an entry. \
             Relevant entry is:\n{}",
            rich.describe()
        );
    }
    let base_text: &str = match rich.text.as_deref() {
        Some(text) => text,
        None if has_puzzle_text && has_solution_text => "",
        None => {
            if !has_puzzle_text && !has_solution_text {
                warn!(
                    "No \"text\" field in entry in data file. Relevant entry is:\n{}",
                    rich.describe()
                );
            }
            return Formatted {
                text: render_blank(params),
                label,
                hidden: false,
            };
        }
    };

    let reference: &str = rich
        .text
        .as_deref()
        .or(rich.puzzle_text.as_deref())
        .unwrap_or_default();
    let size: usize = resolve_size(rich.size.as_deref(), params.size, None, reference);

    // An entry with a solution text is hidden unless explicitly specified otherwise
    let hidden: bool = rich.hidden.unwrap_or(has_solution_text);

    match mode {
        Mode::Solution => {
            let text: String = match rich.solution_text.as_deref() {
                Some(solution_text) => {
                    let solution_size: usize = resolve_size(
                        rich.solution_size.as_deref(),
                        params.size,
                        Some(size),
                        solution_text,
                    );
                    render(solution_text, FontSize::from_index(solution_size as i64), hidden, params)
                }
                None => render(base_text, FontSize::from_index(size as i64), hidden, params),
            };
            Formatted {
                text,
                label,
                hidden,
            }
        }
        Mode::Puzzle => match rich.puzzle_text.as_deref() {
            Some(puzzle_text) => {
                let puzzle_size: usize = resolve_size(
                    rich.puzzle_size.as_deref(),
                    params.size,
                    Some(size),
                    puzzle_text,
                );
                Formatted {
                    text: render(puzzle_text, FontSize::from_index(puzzle_size as i64), false, params),
                    label,
                    hidden,
                }
            }
            None if hidden => Formatted {
                text: render_blank(params),
                label: String::new(),
                hidden,
            },
            None => Formatted {
                text: render(base_text, FontSize::from_index(size as i64), false, params),
                label,
                hidden,
            },
        },
    }
}

/// Compute the size index from the size offset of the entry.
///
/// Without an offset, or if the offset is invalid, return `fallback`, or `default` if
/// `fallback` is not set.
fn resolve_size(raw: Option<&str>, default: usize, fallback: Option<usize>, text: &str) -> usize {
    let fallback: usize = fallback.unwrap_or(default);
    match raw {
        None => fallback,
        Some(raw) => match raw.trim().parse::<i64>() {
            Ok(delta) => (default as i64 + delta).clamp(0, FontSize::MAX_INDEX as i64) as usize,
            Err(_) => {
                warn!(
                    "Unrecognised size entry for text {text}: size = {raw}. Defaulting to default size"
                );
                fallback
            }
        },
    }
}

/// Format the label of the entry.
fn format_label(entry: &Entry, params: &FormatParams) -> String {
    let (text, size): (&str, usize) = match entry {
        Entry::Rich(rich) => {
            let size: usize = match rich.label_size.as_deref() {
                None => params.label_size,
                Some(raw) => raw.trim().parse::<usize>().unwrap_or_else(|_| {
                    warn!("Unrecognised label size {raw}, using the default label size");
                    params.label_size
                }),
            };
            (rich.label.as_deref().unwrap_or(params.label), size)
        }
        Entry::Plain(_) => (params.label, params.label_size),
    };
    let text: &str = text.trim_end();

    match params.style {
        Style::Table => embed_images(text),
        Style::Geometric => {
            if text.is_empty() {
                String::new()
            } else {
                format!(
                    "{} {}",
                    FontSize::from_index(size as i64).command(),
                    embed_images(text)
                )
            }
        }
        Style::Inline => text.to_string(),
    }
}

/// Render an empty entry.
fn render_blank(params: &FormatParams) -> String {
    match params.style {
        Style::Geometric => "{regular}{ }".to_string(),
        Style::Table => String::new(),
        Style::Inline => params.blank.to_string(),
    }
}

/// Render the text once the size and the hidden marking are known.
fn render(text: &str, size: FontSize, mark_hidden: bool, params: &FormatParams) -> String {
    let text: &str = text.trim_end();
    match (params.style, mark_hidden) {
        (Style::Table, true) => format!("(*) {}", embed_images(text)),
        (Style::Table, false) => embed_images(text),
        (Style::Geometric, true) => format!("{{hidden}}{{{} {}}}", size.command(), embed_images(text)),
        (Style::Geometric, false) => {
            format!("{{regular}}{{{} {}}}", size.command(), embed_images(text))
        }
        (Style::Inline, true) => format!("(*) {text}"),
        (Style::Inline, false) => {
            if text.is_empty() {
                params.blank.to_string()
            } else {
                text.to_string()
            }
        }
    }
}

/// Replace the Markdown image references by LaTeX image commands.
///
/// `![caption](path)` becomes `\imagecap{path}{caption}`, and `![](path)` becomes
/// `\image{path}`.
pub fn embed_images(text: &str) -> String {
    IMAGE_RE
        .replace_all(text, |caps: &Captures| {
            if caps[1].is_empty() {
                format!(r"\image{{{}}}", &caps[2])
            } else {
                format!(r"\imagecap{{{}}}{{{}}}", &caps[2], &caps[1])
            }
        })
        .into_owned()
}

/// Format entries and keep track of the hidden entries.
#[derive(Debug, Default)]
pub struct EntryFormatter {
    /// Whether at least one formatted entry is hidden in the puzzle.
    exists_hidden: bool,
}

impl EntryFormatter {
    /// Create an [`EntryFormatter`] object.
    pub fn new() -> Self {
        Self {
            exists_hidden: false,
        }
    }

    /// Format an entry.
    pub fn format(&mut self, entry: &Entry, params: &FormatParams, mode: Mode) -> Formatted {
        let formatted: Formatted = format_entry(entry, params, mode);
        self.exists_hidden |= formatted.hidden;
        formatted
    }

    /// Format an entry and return only its text.
    pub fn text(&mut self, entry: &Entry, params: &FormatParams, mode: Mode) -> String {
        self.format(entry, params, mode).text
    }

    /// Whether a hidden entry has been formatted.
    pub fn exists_hidden(&self) -> bool {
        self.exists_hidden
    }
}
