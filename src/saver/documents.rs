/*
documents.rs

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

//! Write the generated documents.

use log::info;
use std::ffi::OsString;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use crate::errors::GenerateError;
use crate::generator::documents::Document;

/// Object to write the documents of a puzzle.
pub struct SaverDocuments {
    /// Base name of the output files, without the suffix.
    output_base: PathBuf,
}

impl SaverDocuments {
    /// Create a [`SaverDocuments`] object.
    ///
    /// The output file names are built by appending the document suffix to `output_base`,
    /// for example `puzzle-table.tex`.
    pub fn new(output_base: PathBuf) -> Self {
        Self { output_base }
    }

    /// Return the path of the file for the document.
    pub fn path(&self, document: &Document) -> PathBuf {
        let mut name: OsString = self.output_base.clone().into_os_string();
        name.push(document.kind.suffix());
        PathBuf::from(name)
    }

    /// Write the document and return the path of the file.
    pub fn save(&self, document: &Document) -> Result<PathBuf, GenerateError> {
        let path: PathBuf = self.path(document);
        let file: File = File::create(&path).map_err(|e| GenerateError::io(&path, e))?;
        let mut writer: BufWriter<File> = BufWriter::new(file);

        writer
            .write_all(document.contents().as_bytes())
            .and_then(|()| writer.flush())
            .map_err(|e| GenerateError::io(&path, e))?;
        info!("Wrote {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::documents::OutputKind;
    use std::env;
    use std::fs;

    #[test]
    fn document_file() {
        let dir: PathBuf = env::temp_dir().join(format!("jigsaw-documents-{}", std::process::id()));
        fs::create_dir_all(&dir).expect("create dir");
        let saver: SaverDocuments = SaverDocuments::new(dir.join("sums"));
        let document: Document = Document {
            kind: OutputKind::SolutionMarkdown,
            header: "---\ntitle: Sums\n---".to_string(),
            body: "| 1 | 2 |".to_string(),
        };

        let path: PathBuf = saver.save(&document).expect("save");
        assert_eq!(path, dir.join("sums-solution.md"));
        assert_eq!(
            fs::read_to_string(&path).expect("read"),
            "---\ntitle: Sums\n---\n| 1 | 2 |\n"
        );
        let _ = fs::remove_dir_all(&dir);
    }
}
