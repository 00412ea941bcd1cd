/*
mod.rs

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

//! Helpers shared by the integration tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use jigsaw_generate::renderer::Renderer;
use jigsaw_generate::settings::RuntimeSettings;

/// Layout with two triangles, two pairs, and two edges.
pub const TRIANGLES_LAYOUT: &str = "
typename: Two triangles
category: jigsaw
pairs: 2
edges: 2
triangleSolutionCards:
  - [E1, Q1, E2]
  - [A1, Q2, A2]
triangleSolutionOrientation: [0, 180]
trianglePuzzleOrientation:
  - [0, 0]
  - [180, -30]
puzzleTemplateTeX: tri-puzzle.tex
puzzleHeaderTeX: header.tex
solutionTemplateTeX: tri-solution.tex
solutionHeaderTeX: header.tex
tableTemplateTeX: table.tex
tableHeaderTeX: header.tex
puzzleTemplateMarkdown: tri-puzzle.md
puzzleHeaderMarkdown: header.md
solutionTemplateMarkdown: tri-solution.md
solutionHeaderMarkdown: header.md
";

/// Domino layout with a three-row grid.
pub const DOMINOES_LAYOUT: &str = "
typename: Dominoes
category: dominoes
pairs: 0
rows: 3
columns: 1
puzzleTemplateMarkdown: dominoes.md
puzzleHeaderMarkdown: header.md
solutionTemplateMarkdown: dominoes.md
solutionHeaderMarkdown: header.md
puzzleTemplateTeX: dominoes.tex
puzzleHeaderTeX: header.tex
";

/// Templates, by file name.
pub fn templates() -> HashMap<String, String> {
    let files: [(&str, &str); 10] = [
        ("header.tex", "\\documentclass{article}"),
        ("header.md", "---\ntitle: puzzle\n---"),
        ("tri-puzzle.tex", "<: title :>\n<: tripuzcard1 :>\n<: tripuzcard2 :>"),
        ("tri-solution.tex", "<: trisolcard1 :>\n<: trisolcard2 :>\n<: hiddennotesolution :>"),
        ("table.tex", "<: tablepairs :><: tableedges :>"),
        ("tri-puzzle.md", "# <: title :>\n<: puzcards3 :>"),
        ("tri-solution.md", "# <: title :>\n<: pairs :><: edges :><: hiddennotemd :>"),
        (
            "dominoes.md",
            "### BEGIN DOCUMENT\n# <: title :>\n### BEGIN ITEM\n<: cardnum :>. <: textL :> / <: textR :>\n### END DOCUMENT\n",
        ),
        (
            "dominoes.tex",
            "%%% BEGIN DOCUMENT\n<: cardtitle :>\n%%% BEGIN PAGE\n\\begin{page}\n%%% BEGIN ITEM\n\\domino{<: textL :>}{<: textR :>}\n%%% END PAGE\n\\end{page}\n%%% END DOCUMENT\n",
        ),
        ("two-layout.yaml", TRIANGLES_LAYOUT),
    ];
    files
        .iter()
        .map(|(name, text)| (name.to_string(), text.to_string()))
        .collect()
}

/// Create an empty temporary directory for a test.
pub fn temp_dir(name: &str) -> PathBuf {
    let dir: PathBuf =
        env::temp_dir().join(format!("jigsaw-generate-{name}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("cannot create the test directory");
    dir
}

/// Write the templates to the directory.
pub fn write_templates(dir: &Path) {
    for (name, text) in templates() {
        fs::write(dir.join(name), text).expect("cannot write template");
    }
}

/// [`Renderer`] that records the calls instead of running external programs.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub typeset: RefCell<Vec<PathBuf>>,
    pub filtered: RefCell<Vec<PathBuf>>,
}

impl Renderer for RecordingRenderer {
    fn typeset(&self, path: &Path, _settings: &RuntimeSettings) {
        self.typeset.borrow_mut().push(path.to_path_buf());
    }

    fn filter_markdown(&self, path: &Path, _settings: &RuntimeSettings) {
        self.filtered.borrow_mut().push(path.to_path_buf());
    }
}
