/*
generator.rs

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

//! Generate the puzzle documents.
//!
//! A run reads the puzzle data file, finds the layout of the puzzle type, resolves the options,
//! and builds the documents:
//!
//! * Jigsaws ([`pieces`]) are made of triangular and square pieces whose sides carry the
//!   questions, the answers, and the edge texts. The pieces are moved and rotated at random.
//! * Card sorts ([`cards`]) are lists of cards, optionally shuffled, printed on a grid.
//! * Dominoes ([`dominoes`]) chain the answer of one pair with the question of the next pair.
//!   The dominoes are always shuffled.
//!
//! The random draws come from a [`random_source::RandomSource`]. The default source is seeded
//! from the puzzle title, so that the same data file always produces the same puzzle.
//!
//! The documents are built from templates by [`documents::build_documents`], written next to
//! the data file, and then handed to a [`crate::renderer::Renderer`] for typesetting and
//! filtering.

pub mod cards;
pub mod documents;
pub mod dominoes;
pub mod entry;
pub mod layout;
pub mod pieces;
pub mod random_source;
pub mod table;
pub mod template;

use log::{debug, info};
use serde_yaml::Mapping;
use std::path::{Path, PathBuf};

use crate::errors::GenerateError;
use crate::puzzle_data::PuzzleData;
use crate::renderer::Renderer;
use crate::resources::{TemplateDirs, load_layout};
use crate::saver::documents::SaverDocuments;
use crate::settings::{OptionSources, Settings};
use documents::{Document, build_documents};
use layout::Layout;
use random_source::TitleSeeded;

/// Parameters of a run that do not come from the data file.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Base name of the output files.
    pub output_base: PathBuf,

    /// Directories where the templates and the layouts are searched.
    pub template_dirs: TemplateDirs,

    /// Options given on the command line.
    pub overrides: Mapping,

    /// Options from the user configuration file.
    pub user_config: Mapping,
}

/// Generate the documents of a puzzle and return the paths of the files.
///
/// # Errors
///
/// The function returns an error when the data file, the layout, or a template cannot be read
/// or does not have the expected structure, or when a document cannot be written.
/// Failures of the external programs are only reported.
pub fn generate(
    data_path: &Path,
    options: &RunOptions,
    renderer: &dyn Renderer,
) -> Result<Vec<PathBuf>, GenerateError> {
    let data: PuzzleData = PuzzleData::from_file(data_path)?;
    let puzzle_type: &str = data.puzzle_type.as_deref().ok_or(GenerateError::MissingType)?;

    let store: &TemplateDirs = &options.template_dirs;
    let layout: Layout = load_layout(store, puzzle_type)?;

    let sources: OptionSources = OptionSources::new(
        options.overrides.clone(),
        data.values.clone(),
        layout.values.clone(),
        options.user_config.clone(),
    );
    let settings: Settings = Settings::resolve(&sources)?;

    let mut rng: TitleSeeded = TitleSeeded::new(&data.title);
    let documents: Vec<Document> = build_documents(&data, &layout, &settings, store, &mut rng)?;
    if documents.is_empty() {
        info!("No output requested for {}", data_path.display());
    }

    let saver: SaverDocuments = SaverDocuments::new(options.output_base.clone());
    let mut paths: Vec<PathBuf> = Vec::with_capacity(documents.len());
    for document in &documents {
        paths.push(saver.save(document)?);
    }

    for (document, path) in documents.iter().zip(&paths) {
        debug!("Post-processing {}", path.display());
        if document.kind.is_tex() {
            renderer.typeset(path, &settings.runtime);
        } else {
            renderer.filter_markdown(path, &settings.runtime);
        }
    }
    Ok(paths)
}
