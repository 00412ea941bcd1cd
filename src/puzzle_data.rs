/*
puzzle_data.rs

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

//! Puzzle data file.
//!
//! The data file is a YAML mapping with the puzzle `type`, its `title`, the content of the
//! puzzle in the `pairs`, `edges`, or `cards` lists, and option overrides.
//!
//! ```yaml
//! type: smalltriangle
//! title: Multiplication
//! shufflePairs: true
//! pairs:
//!   - [ "3 x 4", 12 ]
//!   - [ "6 x 7", { text: 42, hidden: true } ]
//! ```
//!
//! The entries are kept as loosely as the YAML file provides them: defects in a single entry
//! are reported when the entry is formatted, so that the rest of the documents still get
//! generated.

use log::{debug, warn};
use serde_yaml::{Mapping, Value};
use std::fmt;
use std::fs;
use std::path::Path;

use crate::errors::GenerateError;

/// Content of a piece edge, a card, or one side of a pair.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    /// Simple text.
    Plain(String),

    /// Text with formatting attributes.
    Rich(RichEntry),
}

/// Entry with formatting attributes.
///
/// Sizes are kept as written in the data file. They are offsets from the default size of the
/// puzzle and are parsed when the entry is formatted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RichEntry {
    /// Text for both the puzzle and the solution.
    pub text: Option<String>,

    /// Text for the puzzle, overriding [`RichEntry::text`].
    pub puzzle_text: Option<String>,

    /// Text for the solution, overriding [`RichEntry::text`].
    pub solution_text: Option<String>,

    /// Size offset.
    pub size: Option<String>,

    /// Size offset for the puzzle text.
    pub puzzle_size: Option<String>,

    /// Size offset for the solution text.
    pub solution_size: Option<String>,

    /// Whether the text is hidden in the puzzle.
    pub hidden: Option<bool>,

    /// Card label, overriding the default label.
    pub label: Option<String>,

    /// Label size index, overriding the default label size.
    pub label_size: Option<String>,

    /// All the fields as found in the data file, for the diagnostic messages.
    pub fields: Vec<(String, String)>,
}

impl RichEntry {
    /// Return the fields of the entry, one per line, for diagnostic messages.
    pub fn describe(&self) -> String {
        self.fields
            .iter()
            .map(|(key, value)| format!("  {key}: {value}"))
            .collect::<Vec<String>>()
            .join("\n")
    }
}

impl Entry {
    /// Create a plain text entry.
    pub fn text(text: &str) -> Self {
        Entry::Plain(text.to_string())
    }

    /// Build an entry from a YAML value.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Mapping(map) => Entry::Rich(rich_entry(map)),
            Value::Tagged(tagged) => Entry::from_value(&tagged.value),
            _ => match scalar_text(value) {
                Some(text) => Entry::Plain(text),
                None => {
                    warn!("Unrecognised entry in data file, ignoring it: {value:?}");
                    Entry::Plain(String::new())
                }
            },
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Entry::Plain(text) => write!(f, "{text}"),
            Entry::Rich(rich) => {
                let text: &str = rich
                    .text
                    .as_deref()
                    .or(rich.puzzle_text.as_deref())
                    .or(rich.solution_text.as_deref())
                    .unwrap_or_default();
                write!(f, "{text}")
            }
        }
    }
}

/// Question and answer.
#[derive(Debug, Clone, PartialEq)]
pub struct Pair {
    pub question: Entry,
    pub answer: Entry,
}

impl Pair {
    /// Create a [`Pair`] object.
    pub fn new(question: Entry, answer: Entry) -> Self {
        Self { question, answer }
    }

    /// Return the pair with the question and the answer swapped.
    pub fn flipped(&self) -> Self {
        Self {
            question: self.answer.clone(),
            answer: self.question.clone(),
        }
    }
}

/// Item of a card-sort deck.
#[derive(Debug, Clone, PartialEq)]
pub enum CardItem {
    /// Real card.
    Text(Entry),

    /// Start a new page (only for decks that are not shuffled).
    PageBreak,

    /// Change the default label for the following cards.
    SetLabel(String),

    /// Change the default label size for the following cards.
    SetLabelSize(usize),
}

impl CardItem {
    /// Whether the item is a real card.
    pub fn is_card(&self) -> bool {
        matches!(self, CardItem::Text(_))
    }
}

/// Keys that turn a card into a special marker.
const SPECIAL_KEYS: [&str; 3] = ["newpage", "newlabel", "newlabelsize"];

/// Convert a YAML item of the `cards` list into card items.
///
/// A special marker with several directives produces several items, in the order label, label
/// size, page break.
pub fn card_items(value: &Value) -> Vec<CardItem> {
    let map: &Mapping = match value {
        Value::Mapping(map) if is_special(map) => map,
        _ => return vec![CardItem::Text(Entry::from_value(value))],
    };

    if map_get(map, "text").is_some() {
        warn!(
            "Cannot have a special entry (newpage, newlabel, newlabelsize) and text on same card! \
             Ignoring special requests."
        );
        return vec![CardItem::Text(Entry::from_value(value))];
    }

    let mut items: Vec<CardItem> = Vec::with_capacity(3);
    if let Some(label) = map_get(map, "newlabel") {
        match label {
            Value::String(text) => items.push(CardItem::SetLabel(text.clone())),
            other => warn!("Invalid value for newlabel entry: it must be a string. Entry value: {other:?}"),
        }
    }
    if let Some(size) = map_get(map, "newlabelsize") {
        match scalar_text(size).and_then(|s| s.trim().parse::<usize>().ok()) {
            Some(n) => items.push(CardItem::SetLabelSize(n)),
            None => warn!("Invalid value for newlabelsize entry: {size:?}"),
        }
    }
    if let Some(newpage) = map_get(map, "newpage") {
        if *newpage != Value::Bool(true) {
            warn!(
                "Invalid value for newpage, only newpage: true permitted. Value: {newpage:?}. \
                 Treating as newpage: true anyway"
            );
        }
        items.push(CardItem::PageBreak);
    }
    items
}

/// Puzzle data file contents.
#[derive(Debug, Clone, Default)]
pub struct PuzzleData {
    /// Puzzle type, which selects the `<type>-layout.yaml` layout file.
    pub puzzle_type: Option<String>,

    /// Puzzle title. It also seeds the random layout.
    pub title: String,

    /// Raw `pairs` list.
    pub pairs: Option<Vec<Value>>,

    /// Raw `edges` list.
    pub edges: Option<Vec<Value>>,

    /// Raw `cards` list.
    pub cards: Option<Vec<Value>>,

    /// The whole file, for the option lookups.
    pub values: Mapping,
}

impl PuzzleData {
    /// Parse the data file contents.
    pub fn parse(text: &str, what: &str) -> Result<Self, GenerateError> {
        let values: Mapping = match serde_yaml::from_str::<Value>(text) {
            Ok(Value::Mapping(map)) => map,
            Ok(Value::Null) => Mapping::new(),
            Ok(_) => {
                return Err(GenerateError::InvalidOption {
                    key: what.to_string(),
                    message: "the puzzle data file must be a YAML mapping".to_string(),
                });
            }
            Err(source) => {
                return Err(GenerateError::Yaml {
                    what: what.to_string(),
                    source,
                });
            }
        };

        let puzzle_type: Option<String> = map_get(&values, "type").and_then(scalar_text);
        let title: String = map_get(&values, "title")
            .and_then(scalar_text)
            .unwrap_or_default();
        debug!("Puzzle type {puzzle_type:?}, title \"{title}\"");

        Ok(Self {
            puzzle_type,
            title,
            pairs: list(&values, "pairs")?,
            edges: list(&values, "edges")?,
            cards: list(&values, "cards")?,
            values,
        })
    }

    /// Read and parse the data file.
    pub fn from_file(path: &Path) -> Result<Self, GenerateError> {
        let text: String =
            fs::read_to_string(path).map_err(|source| GenerateError::io(path, source))?;
        Self::parse(&text, &format!("puzzle data file {}", path.display()))
    }

    /// Number of items in the `pairs` list, if any.
    pub fn num_pairs(&self) -> Option<usize> {
        self.pairs.as_ref().map(Vec::len)
    }

    /// Convert the `pairs` list.
    ///
    /// For dominoes (`allow_special`), special markers are skipped with a warning. Otherwise
    /// every item must be a list of two entries.
    pub fn pair_list(&self, typename: &str, allow_special: bool) -> Result<Vec<Pair>, GenerateError> {
        let mut pairs: Vec<Pair> = Vec::new();
        for (i, value) in self.pairs.iter().flatten().enumerate() {
            match value {
                Value::Sequence(items) if items.len() == 2 => {
                    pairs.push(Pair::new(
                        Entry::from_value(&items[0]),
                        Entry::from_value(&items[1]),
                    ));
                }
                Value::Mapping(map) if allow_special && is_special(map) => {
                    warn!("Special cards are not accepted for dominoes");
                }
                _ => {
                    return Err(GenerateError::MalformedPair {
                        typename: typename.to_string(),
                        position: i + 1,
                    });
                }
            }
        }
        Ok(pairs)
    }

    /// Convert the `edges` list.
    pub fn edge_list(&self) -> Vec<Entry> {
        self.edges
            .iter()
            .flatten()
            .map(Entry::from_value)
            .collect()
    }

    /// Convert the `cards` list.
    pub fn card_list(&self) -> Vec<CardItem> {
        self.cards.iter().flatten().flat_map(card_items).collect()
    }
}

/// Retrieve a value from a mapping with a string key.
pub fn map_get<'a>(map: &'a Mapping, key: &str) -> Option<&'a Value> {
    map.get(key)
}

/// Return the text of a scalar YAML value.
///
/// Numbers and booleans are converted to their text representation, and a null value is an
/// empty text. Lists and mappings have no text.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        Value::Tagged(tagged) => scalar_text(&tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

/// Whether a card or a pair given as a mapping is a special marker.
fn is_special(map: &Mapping) -> bool {
    SPECIAL_KEYS.iter().any(|key| map_get(map, key).is_some())
}

/// Retrieve a list from the data file.
fn list(values: &Mapping, key: &str) -> Result<Option<Vec<Value>>, GenerateError> {
    match map_get(values, key) {
        None => Ok(None),
        Some(Value::Sequence(items)) => Ok(Some(items.clone())),
        Some(Value::Null) => Ok(Some(Vec::new())),
        Some(other) => Err(GenerateError::InvalidOption {
            key: key.to_string(),
            message: format!("expected a list, found {other:?}"),
        }),
    }
}

/// Build a [`RichEntry`] object from a YAML mapping.
///
/// Keys are compared case-insensitively, so that `puzzleText` and `puzzletext` are the same.
fn rich_entry(map: &Mapping) -> RichEntry {
    let mut entry: RichEntry = RichEntry::default();

    for (key, value) in map {
        let key: String = match scalar_text(key) {
            Some(k) => k,
            None => continue,
        };
        let text: Option<String> = scalar_text(value);
        entry
            .fields
            .push((key.clone(), text.clone().unwrap_or_else(|| format!("{value:?}"))));

        match key.to_lowercase().as_str() {
            "text" => entry.text = text,
            "puzzletext" => entry.puzzle_text = text,
            "solutiontext" => entry.solution_text = text,
            "size" => entry.size = text,
            "puzzlesize" => entry.puzzle_size = text,
            "solutionsize" => entry.solution_size = text,
            "label" => entry.label = text,
            "labelsize" => entry.label_size = text,
            "hidden" => match value {
                Value::Bool(b) => entry.hidden = Some(*b),
                other => warn!("Invalid value for hidden (expected true or false): {other:?}"),
            },
            _ => (),
        }
    }
    entry
}
