/*
settings.rs

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

//! Option resolution.
//!
//! An option can be set, by order of priority, on the command line, in the puzzle data file, in
//! the puzzle layout file, and in the user configuration file. The first source that defines the
//! option wins, and built-in defaults apply when no source defines it.
//!
//! The options are resolved once per run into a [`Settings`] object.

use log::debug;
use serde_yaml::{Mapping, Value};
use std::collections::HashMap;

use crate::errors::GenerateError;
use crate::generator::dominoes::ChainEnds;
use crate::puzzle_data::{Entry, map_get, scalar_text};

/// Default hidden note for the LaTeX solution.
pub const HIDDEN_NOTE: &str = "Entries that are hidden in the puzzle are highlighted in yellow.";

/// Default hidden note for the Markdown solution and the LaTeX table.
pub const HIDDEN_NOTE_MARKDOWN: &str =
    "Entries that are hidden in the puzzle are indicated with (*).";

/// Options that name templates and their headers.
pub const TEMPLATE_KEYS: [&str; 10] = [
    "tableTemplateTeX",
    "tableHeaderTeX",
    "puzzleTemplateTeX",
    "puzzleHeaderTeX",
    "solutionTemplateTeX",
    "solutionHeaderTeX",
    "puzzleTemplateMarkdown",
    "puzzleHeaderMarkdown",
    "solutionTemplateMarkdown",
    "solutionHeaderMarkdown",
];

/// Ordered option sources.
#[derive(Debug, Clone, Default)]
pub struct OptionSources {
    sources: Vec<(&'static str, Mapping)>,
}

impl OptionSources {
    /// Create an [`OptionSources`] object from the sources, by order of priority.
    pub fn new(cli: Mapping, data: Mapping, layout: Mapping, user: Mapping) -> Self {
        Self {
            sources: vec![
                ("command line", cli),
                ("data file", data),
                ("layout", layout),
                ("configuration file", user),
            ],
        }
    }

    /// Return the value from the first source that defines the option.
    pub fn lookup(&self, key: &str) -> Option<&Value> {
        for (source, values) in &self.sources {
            if let Some(value) = map_get(values, key) {
                if !value.is_null() {
                    debug!("Option {key} set to {value:?} by {source}");
                    return Some(value);
                }
            }
        }
        None
    }

    /// Return a boolean option.
    ///
    /// The strings `true`, `yes`, `on`, `false`, `no`, and `off` are also accepted, because the
    /// configuration file may store booleans as strings.
    pub fn flag(&self, key: &str, default: bool) -> Result<bool, GenerateError> {
        match self.lookup(key) {
            None => Ok(default),
            Some(Value::Bool(b)) => Ok(*b),
            Some(Value::String(s)) => match s.trim().to_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Ok(true),
                "false" | "no" | "off" | "0" => Ok(false),
                _ => Err(invalid(key, "expected true or false")),
            },
            Some(_) => Err(invalid(key, "expected true or false")),
        }
    }

    /// Return a non-negative integer option.
    pub fn number(&self, key: &str) -> Result<Option<usize>, GenerateError> {
        match self.lookup(key) {
            None => Ok(None),
            Some(Value::Number(n)) => n
                .as_u64()
                .map(|n| Some(n as usize))
                .ok_or_else(|| invalid(key, "expected a non-negative integer")),
            Some(Value::String(s)) => s
                .trim()
                .parse::<usize>()
                .map(Some)
                .map_err(|_| invalid(key, "expected a non-negative integer")),
            Some(_) => Err(invalid(key, "expected a non-negative integer")),
        }
    }

    /// Return a text option.
    pub fn text(&self, key: &str) -> Option<String> {
        self.lookup(key).and_then(scalar_text)
    }

    /// Return an option that is a content entry.
    pub fn entry(&self, key: &str) -> Option<Entry> {
        self.lookup(key).map(Entry::from_value)
    }
}

/// Build an [`GenerateError::InvalidOption`] error.
fn invalid(key: &str, message: &str) -> GenerateError {
    GenerateError::InvalidOption {
        key: key.to_string(),
        message: message.to_string(),
    }
}

/// Notes that explain how the hidden entries are shown.
#[derive(Debug, Clone, PartialEq)]
pub struct HiddenNotes {
    /// `hiddennote`, for the LaTeX solution.
    pub solution: String,

    /// `hiddennotetable`, for the LaTeX table.
    pub table: String,

    /// `hiddennotemd`, for the Markdown solution.
    pub markdown: String,
}

/// Options for the external tools.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeSettings {
    /// Generate the LaTeX documents and typeset them.
    pub makepdf: bool,

    /// Generate the Markdown documents.
    pub makemd: bool,

    /// Remove the auxiliary files after typesetting.
    pub clean: bool,

    /// LaTeX program.
    pub latex: String,

    pub texfilter: Option<String>,
    pub mdfilter: Option<String>,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            makepdf: true,
            makemd: true,
            clean: true,
            latex: "pdflatex".to_string(),
            texfilter: None,
            mdfilter: None,
        }
    }
}

/// Resolved options.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Text size index of the puzzle pieces.
    pub puzzle_text_size: usize,

    /// Text size index of the solution pieces.
    pub solution_text_size: usize,

    pub number_cards: bool,

    /// Text size index of the cards and dominoes.
    pub text_size: usize,

    pub label: String,
    pub label_size: usize,

    pub card_title: Option<String>,
    pub card_title_size: Option<usize>,

    /// Grid of the card and domino pages.
    pub rows: Option<usize>,
    pub columns: Option<usize>,

    pub cardsep_horizontal: String,
    pub cardsep_vertical: String,

    pub shuffle_cards: bool,
    pub shuffle_pairs: bool,
    pub shuffle_edges: bool,
    pub flip: bool,
    pub produce_solution: bool,

    /// Domino chain ends.
    pub chain: ChainEnds,

    /// `note` option, substituted as `puzzlenote`.
    pub note: String,

    pub hidden_notes: HiddenNotes,

    /// Template file names, by option name.
    pub templates: HashMap<String, String>,

    pub runtime: RuntimeSettings,
}

impl Settings {
    /// Resolve the options.
    pub fn resolve(sources: &OptionSources) -> Result<Self, GenerateError> {
        let text_size: usize = sources.number("textSize")?.unwrap_or(5);
        let cardsep: String = sources.text("cardsep").unwrap_or_else(|| "12pt".to_string());
        let hidden_markdown: String = sources
            .text("hiddennotemd")
            .unwrap_or_else(|| HIDDEN_NOTE_MARKDOWN.to_string());

        let mut templates: HashMap<String, String> = HashMap::new();
        for key in TEMPLATE_KEYS {
            if let Some(name) = sources.text(key) {
                templates.insert(key.to_string(), name);
            }
        }

        let defaults: RuntimeSettings = RuntimeSettings::default();
        let runtime: RuntimeSettings = RuntimeSettings {
            makepdf: sources.flag("makepdf", defaults.makepdf)?,
            makemd: sources.flag("makemd", defaults.makemd)?,
            clean: sources.flag("clean", defaults.clean)?,
            latex: sources.text("latex").unwrap_or(defaults.latex),
            texfilter: sources.text("texfilter").filter(|f| !f.is_empty()),
            mdfilter: sources.text("mdfilter").filter(|f| !f.is_empty()),
        };

        let chain_defaults: ChainEnds = ChainEnds::default();
        Ok(Self {
            puzzle_text_size: sources.number("puzzleTextSize")?.unwrap_or(5),
            solution_text_size: sources.number("solutionTextSize")?.unwrap_or(5),
            number_cards: sources.flag("numberCards", true)?,
            text_size,
            label: sources.text("label").unwrap_or_default(),
            label_size: sources
                .number("labelSize")?
                .unwrap_or(text_size.saturating_sub(2)),
            card_title: sources.text("cardTitle"),
            card_title_size: sources.number("cardTitleSize")?,
            rows: sources.number("rows")?,
            columns: sources.number("columns")?,
            cardsep_horizontal: sources
                .text("cardsepHorizontal")
                .unwrap_or_else(|| cardsep.clone()),
            cardsep_vertical: sources.text("cardsepVertical").unwrap_or(cardsep),
            shuffle_cards: sources.flag("shuffleCards", false)?,
            shuffle_pairs: sources.flag("shufflePairs", false)?,
            shuffle_edges: sources.flag("shuffleEdges", false)?,
            flip: sources.flag("flip", false)?,
            produce_solution: sources.flag("produceSolution", true)?,
            chain: ChainEnds {
                looped: sources.flag("loop", chain_defaults.looped)?,
                start: sources.entry("start").unwrap_or(chain_defaults.start),
                finish: sources.entry("finish").unwrap_or(chain_defaults.finish),
            },
            note: sources.text("note").unwrap_or_default(),
            hidden_notes: HiddenNotes {
                solution: sources
                    .text("hiddennote")
                    .unwrap_or_else(|| HIDDEN_NOTE.to_string()),
                table: sources
                    .text("hiddennotetable")
                    .unwrap_or_else(|| hidden_markdown.clone()),
                markdown: hidden_markdown,
            },
            templates,
            runtime,
        })
    }

    /// Return the file name given by a template option.
    pub fn template(&self, key: &str) -> Option<&str> {
        self.templates.get(key).map(String::as_str)
    }
}
