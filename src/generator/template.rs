/*
template.rs

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

//! Template substitution.
//!
//! Templates are LaTeX or Markdown texts with `<: name :>` placeholders. The placeholders are
//! replaced by the values of the corresponding variables.
//!
//! Card sorts and dominoes use templates that are split into sections by markers at the
//! beginning of a line. The LaTeX templates have the following form ([`GridTemplate`]):
//!
//! ```text
//! %%% BEGIN DOCUMENT
//! ...
//! %%% BEGIN PAGE
//! ...
//! %%% BEGIN ITEM
//! \card{<: rownum :>}{<: colnum :>}{<: cardnum :>}{<: text :>}{<: label :>}
//! %%% END PAGE
//! ...
//! %%% END DOCUMENT
//! ...
//! ```
//!
//! and the Markdown templates have a simpler form, without pages ([`ListTemplate`]):
//!
//! ```text
//! ### BEGIN DOCUMENT
//! ...
//! ### BEGIN ITEM
//! ...
//! ### END DOCUMENT
//! ...
//! ```
//!
//! Anything before the first marker, and the rest of the marker lines, are ignored.

use log::warn;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use crate::errors::GenerateError;

/// Placeholder: `<: name :>`.
static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<:\s*(\S*?)\s*:>").expect("invalid placeholder regular expression")
});

/// Section markers of the LaTeX card templates.
pub const GRID_MARKERS: [&str; 5] = [
    "%%% BEGIN DOCUMENT",
    "%%% BEGIN PAGE",
    "%%% BEGIN ITEM",
    "%%% END PAGE",
    "%%% END DOCUMENT",
];

/// Section markers of the Markdown card templates.
pub const LIST_MARKERS: [&str; 3] = ["### BEGIN DOCUMENT", "### BEGIN ITEM", "### END DOCUMENT"];

/// Template variables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Substitutions {
    values: HashMap<String, String>,
}

impl Substitutions {
    /// Create an empty [`Substitutions`] object.
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Set a variable.
    pub fn set(&mut self, name: &str, value: impl fmt::Display) {
        self.values.insert(name.to_string(), value.to_string());
    }

    /// Append text to a variable, creating it if needed.
    pub fn append(&mut self, name: &str, text: &str) {
        self.values.entry(name.to_string()).or_default().push_str(text);
    }

    /// Return the value of a variable.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Copy all the variables of `other`, replacing the existing ones.
    pub fn extend(&mut self, other: &Substitutions) {
        for (name, value) in &other.values {
            self.values.insert(name.clone(), value.clone());
        }
    }
}

/// Replace the `<: name :>` placeholders in the template.
///
/// Unknown placeholders are reported and removed.
pub fn substitute(template: &str, subs: &Substitutions) -> String {
    PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures| match subs.get(&caps[1]) {
            Some(value) => value.to_string(),
            None => {
                warn!("Unrecognised substitution: {}", &caps[0]);
                String::new()
            }
        })
        .into_owned()
}

/// Split the template into the sections that follow each marker.
///
/// Each marker must be at the beginning of a line, and the markers must appear in the given
/// order. The returned list has one section per marker.
///
/// # Errors
///
/// The function returns an error that names the template and the first marker that cannot be
/// found.
pub fn extract_blocks(
    name: &str,
    template: &str,
    markers: &[&str],
) -> Result<Vec<String>, GenerateError> {
    let mut sections: Vec<String> = Vec::with_capacity(markers.len());
    let mut section_start: Option<usize> = None;
    let mut position: usize = 0;

    for marker in markers {
        let (line_start, next_line) = find_marker(template, position, marker).ok_or_else(|| {
            GenerateError::TemplateStructure {
                name: name.to_string(),
                marker: marker.to_string(),
            }
        })?;
        if let Some(start) = section_start {
            sections.push(template[start..line_start].to_string());
        }
        section_start = Some(next_line);
        position = next_line;
    }
    if let Some(start) = section_start {
        sections.push(template[start..].to_string());
    }
    Ok(sections)
}

/// Find the first line, starting at `from`, that begins with the marker.
///
/// `from` must be the beginning of a line. Return the positions of the beginning of that line
/// and of the next line.
fn find_marker(text: &str, from: usize, marker: &str) -> Option<(usize, usize)> {
    let mut line_start: usize = from;
    loop {
        let rest: &str = &text[line_start..];
        let next_line: usize = rest
            .find('\n')
            .map(|i| line_start + i + 1)
            .unwrap_or(text.len());
        if rest.starts_with(marker) {
            return Some((line_start, next_line));
        }
        if next_line >= text.len() {
            return None;
        }
        line_start = next_line;
    }
}

/// LaTeX template for cards, with pages.
#[derive(Debug, Clone, PartialEq)]
pub struct GridTemplate {
    pub begin_document: String,
    pub begin_page: String,
    pub item: String,
    pub end_page: String,
    pub end_document: String,
}

impl GridTemplate {
    /// Split a template into its sections.
    pub fn parse(name: &str, template: &str) -> Result<Self, GenerateError> {
        let mut sections = extract_blocks(name, template, &GRID_MARKERS)?.into_iter();
        let mut next = || sections.next().unwrap_or_default();
        Ok(Self {
            begin_document: next(),
            begin_page: next(),
            item: next(),
            end_page: next(),
            end_document: next(),
        })
    }
}

/// Markdown template for cards.
#[derive(Debug, Clone, PartialEq)]
pub struct ListTemplate {
    pub begin_document: String,
    pub item: String,
    pub end_document: String,
}

impl ListTemplate {
    /// Split a template into its sections.
    pub fn parse(name: &str, template: &str) -> Result<Self, GenerateError> {
        let mut sections = extract_blocks(name, template, &LIST_MARKERS)?.into_iter();
        let mut next = || sections.next().unwrap_or_default();
        Ok(Self {
            begin_document: next(),
            item: next(),
            end_document: next(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRID: &str = "\
preamble ignored
%%% BEGIN DOCUMENT (trailing text ignored)
\\begin{document}
%%% BEGIN PAGE
\\begin{page}
%%% BEGIN ITEM
\\card{<: rownum :>}{<: text :>}
%%% END PAGE
\\end{page}
%%% END DOCUMENT
\\end{document}
";

    #[test]
    fn substitute_variables() {
        let mut subs: Substitutions = Substitutions::new();
        subs.set("title", "Fractions");
        subs.set("rows", 3);
        assert_eq!(
            substitute("<:title:> has <:   rows :> rows", &subs),
            "Fractions has 3 rows"
        );
    }

    #[test]
    fn unknown_placeholders_are_removed() {
        let subs: Substitutions = Substitutions::new();
        assert_eq!(substitute("a<: nope :>b", &subs), "ab");
    }

    #[test]
    fn substituted_values_are_not_rescanned() {
        let mut subs: Substitutions = Substitutions::new();
        subs.set("a", "<: b :>");
        subs.set("b", "x");
        assert_eq!(substitute("<: a :>", &subs), "<: b :>");
    }

    #[test]
    fn append_creates_variables() {
        let mut subs: Substitutions = Substitutions::new();
        subs.append("rows", "a\n");
        subs.append("rows", "b\n");
        assert_eq!(subs.get("rows"), Some("a\nb\n"));
    }

    #[test]
    fn grid_template_sections() {
        let template: GridTemplate = GridTemplate::parse("TeX puzzle template", GRID).expect("parse");
        assert_eq!(template.begin_document, "\\begin{document}\n");
        assert_eq!(template.begin_page, "\\begin{page}\n");
        assert_eq!(template.item, "\\card{<: rownum :>}{<: text :>}\n");
        assert_eq!(template.end_page, "\\end{page}\n");
        assert_eq!(template.end_document, "\\end{document}\n");
    }

    #[test]
    fn missing_page_marker() {
        let broken: String = GRID.replace("%%% BEGIN PAGE", "%% BEGIN PAGE");
        match GridTemplate::parse("TeX puzzle template", &broken) {
            Err(GenerateError::TemplateStructure { name, marker }) => {
                assert_eq!(name, "TeX puzzle template");
                assert_eq!(marker, "%%% BEGIN PAGE");
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn markers_must_start_a_line() {
        let indented: String = GRID.replace("%%% BEGIN ITEM", "  %%% BEGIN ITEM");
        assert!(GridTemplate::parse("t", &indented).is_err());
    }

    #[test]
    fn markers_must_be_in_order() {
        let template: &str = "### BEGIN ITEM\nitem\n### BEGIN DOCUMENT\ndoc\n### END DOCUMENT\n";
        assert!(ListTemplate::parse("Markdown puzzle template", template).is_err());
    }

    #[test]
    fn list_template_sections() {
        let template: ListTemplate = ListTemplate::parse(
            "Markdown puzzle template",
            "### BEGIN DOCUMENT\n# <: title :>\n### BEGIN ITEM\n* <: text :>\n### END DOCUMENT\nend",
        )
        .expect("parse");
        assert_eq!(template.begin_document, "# <: title :>\n");
        assert_eq!(template.item, "* <: text :>\n");
        assert_eq!(template.end_document, "end");
    }
}
