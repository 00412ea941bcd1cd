/*
errors.rs

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

//! Fatal errors.
//!
//! Problems in a single entry of the data file (a missing `text` field, an unparsable size, an
//! unknown template placeholder) are not errors: they are logged and replaced by a safe default
//! so that the rest of the documents still get generated.
//! The errors below abort the generation. Their messages are shown to the user on a single
//! line and must tell them what to fix.

use std::io;
use std::path::PathBuf;

/// Type of errors.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// The data file does not provide a `type` key.
    #[error("No jigsaw type found in puzzle file")]
    MissingType,

    /// No layout file exists for the puzzle type.
    #[error("Unrecognised jigsaw type {0}")]
    UnknownType(String),

    /// The `category` key of the layout is not `jigsaw`, `cardsort`, or `dominoes`.
    #[error("Unrecognised category in {typename} layout file: {category}")]
    UnknownCategory { typename: String, category: String },

    /// A file cannot be read or written.
    #[error("Cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A YAML file cannot be parsed.
    #[error("Error parsing {what}: {source}")]
    Yaml {
        what: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// The user configuration file cannot be parsed.
    #[error("Error parsing configuration file {}: {source}", path.display())]
    UserConfig {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The data file provides a different number of items than the layout requires.
    #[error("Puzzle type {typename} needs exactly {expected} {kind}")]
    WrongCount {
        typename: String,
        kind: &'static str,
        expected: usize,
    },

    /// The layout accepts any number of items, but the data file provides none.
    #[error("Puzzle type {typename} needs at least one {kind}")]
    NoItems { typename: String, kind: &'static str },

    /// The layout requires a section that the data file does not provide.
    #[error("Puzzle type {typename} requires {kind} in data file")]
    MissingSection { typename: String, kind: &'static str },

    /// The data file provides a section that the layout does not accept.
    #[error("Puzzle type {typename} does not accept {kind} in data file")]
    UnexpectedSection { typename: String, kind: &'static str },

    /// An item of the `pairs` section is not a two-element list.
    #[error("Puzzle type {typename}: pair {position} must be a list of two entries")]
    MalformedPair { typename: String, position: usize },

    /// An entry reference such as `Q3` cannot be parsed.
    #[error("Unrecognised entry {reference} in layout file ({table})")]
    BadReference { reference: String, table: String },

    /// An entry reference points past the end of the pairs or edges.
    #[error("Layout {typename} refers to {reference} in {table}, but only {available} are available")]
    ReferenceOutOfRange {
        typename: String,
        reference: String,
        table: String,
        available: usize,
    },

    /// A layout table is missing or inconsistent with the other tables.
    #[error("Layout {typename}: {message}")]
    Layout { typename: String, message: String },

    /// An option has a value of the wrong type.
    #[error("Invalid value for option {key}: {message}")]
    InvalidOption { key: String, message: String },

    /// A template file cannot be found in the template directories.
    #[error("Could not find template file {0}, giving up")]
    TemplateNotFound(String),

    /// A multi-section template does not provide its markers in the expected order.
    #[error("{name} does not have required structure (missing or misplaced \"{marker}\")")]
    TemplateStructure { name: String, marker: String },

    /// The output base name points outside the current directory.
    #[error("Cannot currently handle --output not in current directory; please change directory first")]
    OutputDirectory,
}

impl GenerateError {
    /// Build a [`GenerateError::Io`] error for the given path.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        GenerateError::Io {
            path: path.into(),
            source,
        }
    }

    /// Build a [`GenerateError::Layout`] error.
    pub fn layout(typename: &str, message: impl Into<String>) -> Self {
        GenerateError::Layout {
            typename: typename.to_string(),
            message: message.into(),
        }
    }
}
