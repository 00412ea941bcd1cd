/*
resources.rs

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

//! Template and layout lookup.
//!
//! The templates, their headers, and the `<type>-layout.yaml` layout files are user-supplied
//! resources. They are searched in an ordered list of directories: the current directory, the
//! `templates` subdirectory of the user configuration directory, and then any directory given
//! on the command line.

use log::debug;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::errors::GenerateError;
use crate::generator::layout::Layout;

/// Source of template and layout files.
pub trait TemplateStore {
    /// Return the content of the named file.
    ///
    /// # Errors
    ///
    /// [`GenerateError::TemplateNotFound`] when no directory provides the file.
    fn read(&self, name: &str) -> Result<String, GenerateError>;
}

/// Ordered list of template directories.
#[derive(Debug, Clone, Default)]
pub struct TemplateDirs {
    dirs: Vec<PathBuf>,
}

impl TemplateDirs {
    /// Create a [`TemplateDirs`] object from the directories, in search order.
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        debug!("Template directories: {dirs:?}");
        Self { dirs }
    }

    /// Build the standard search path.
    ///
    /// `config_dir` is the user configuration directory, if known, and `extra` the directories
    /// given on the command line.
    pub fn standard(config_dir: Option<&Path>, extra: &[PathBuf]) -> Self {
        let mut dirs: Vec<PathBuf> = search_path(config_dir, "templates");
        dirs.extend(extra.iter().cloned());
        Self::new(dirs)
    }

    /// Return the directories, in search order.
    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }
}

impl TemplateStore for TemplateDirs {
    fn read(&self, name: &str) -> Result<String, GenerateError> {
        for dir in &self.dirs {
            let path: PathBuf = dir.join(name);
            match fs::read_to_string(&path) {
                Ok(text) => {
                    debug!("Using {}", path.display());
                    return Ok(text);
                }
                Err(error) => match error.kind() {
                    ErrorKind::NotFound => continue,
                    _ => return Err(GenerateError::io(path, error)),
                },
            }
        }
        Err(GenerateError::TemplateNotFound(name.to_string()))
    }
}

/// In-memory templates, by file name.
impl TemplateStore for HashMap<String, String> {
    fn read(&self, name: &str) -> Result<String, GenerateError> {
        self.get(name)
            .cloned()
            .ok_or_else(|| GenerateError::TemplateNotFound(name.to_string()))
    }
}

/// Return the current directory followed by the given subdirectory of the user configuration
/// directory.
pub fn search_path(config_dir: Option<&Path>, subdir: &str) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = vec![PathBuf::from(".")];
    if let Some(config_dir) = config_dir {
        dirs.push(config_dir.join(subdir));
    }
    dirs
}

/// Load the layout of the given puzzle type.
pub fn load_layout(store: &dyn TemplateStore, puzzle_type: &str) -> Result<Layout, GenerateError> {
    let text: String = match store.read(&format!("{puzzle_type}-layout.yaml")) {
        Ok(text) => text,
        Err(GenerateError::TemplateNotFound(_)) => {
            return Err(GenerateError::UnknownType(puzzle_type.to_string()));
        }
        Err(e) => return Err(e),
    };
    Layout::parse(puzzle_type, &text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn first_directory_wins() {
        let base: PathBuf = env::temp_dir().join(format!("jigsaw-resources-{}", std::process::id()));
        let first: PathBuf = base.join("first");
        let second: PathBuf = base.join("second");
        fs::create_dir_all(&first).expect("create dir");
        fs::create_dir_all(&second).expect("create dir");
        fs::write(first.join("a.tex"), "first a").expect("write");
        fs::write(second.join("a.tex"), "second a").expect("write");
        fs::write(second.join("b.tex"), "second b").expect("write");

        let store: TemplateDirs = TemplateDirs::new(vec![first, second]);
        assert_eq!(store.read("a.tex").expect("read"), "first a");
        assert_eq!(store.read("b.tex").expect("read"), "second b");
        assert!(matches!(
            store.read("c.tex"),
            Err(GenerateError::TemplateNotFound(name)) if name == "c.tex"
        ));
        let _ = fs::remove_dir_all(&base);
    }

    #[test]
    fn standard_search_path() {
        let store: TemplateDirs = TemplateDirs::standard(
            Some(Path::new("/home/u/.config/jigsaw-generate")),
            &[PathBuf::from("/opt/templates")],
        );
        assert_eq!(
            store.dirs(),
            &[
                PathBuf::from("."),
                PathBuf::from("/home/u/.config/jigsaw-generate/templates"),
                PathBuf::from("/opt/templates"),
            ]
        );
    }

    #[test]
    fn unknown_puzzle_type() {
        let store: HashMap<String, String> = HashMap::new();
        assert!(matches!(
            load_layout(&store, "hexagon"),
            Err(GenerateError::UnknownType(name)) if name == "hexagon"
        ));
    }

    #[test]
    fn layout_from_store() {
        let mut store: HashMap<String, String> = HashMap::new();
        store.insert(
            "deck-layout.yaml".to_string(),
            "typename: Deck\ncategory: cardsort\ncards: 0\n".to_string(),
        );
        let layout: Layout = load_layout(&store, "deck").expect("layout");
        assert_eq!(layout.typename, "Deck");
        assert_eq!(layout.cards, Some(0));
    }
}
