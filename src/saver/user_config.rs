/*
user_config.rs

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

//! Read the user configuration file.
//!
//! The configuration file is a JSON object that maps option names to values, for example:
//!
//! ```json
//! {"latex": "lualatex", "clean": false, "mdfilter": "pandoc-filter"}
//! ```
//!
//! Its values have the lowest priority: the command line, the data file, and the layout all
//! override them.

use log::debug;
use serde_json::{Map, Value};
use serde_yaml::Mapping;
use std::env;
use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::PathBuf;

use crate::errors::GenerateError;

/// Name of the directory that holds the configuration, the templates, and the filters.
pub const CONFIG_DIR_NAME: &str = "jigsaw-generate";

/// Return the user configuration directory.
///
/// The directory is `$XDG_CONFIG_HOME/jigsaw-generate`, or `$HOME/.config/jigsaw-generate`
/// when `XDG_CONFIG_HOME` is not set. Return `None` if neither variable is set.
pub fn default_config_dir() -> Option<PathBuf> {
    let base: PathBuf = match env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        Some(dir) => PathBuf::from(dir),
        None => PathBuf::from(env::var_os("HOME")?).join(".config"),
    };
    Some(base.join(CONFIG_DIR_NAME))
}

/// Object to read the user configuration.
pub struct SaverUserConfig {
    /// Path to the configuration file.
    config_file: PathBuf,
}

impl SaverUserConfig {
    /// Create a [`SaverUserConfig`] object.
    ///
    /// The provided [`PathBuf`] is the configuration directory.
    pub fn new(mut config_dir: PathBuf) -> Self {
        config_dir.push("config.json");
        Self::from_path(config_dir)
    }

    /// Create a [`SaverUserConfig`] object for an explicit configuration file.
    pub fn from_path(config_file: PathBuf) -> Self {
        debug!("Configuration file: {config_file:?}");
        Self { config_file }
    }

    /// Retrieve the options from the configuration file.
    ///
    /// Return the options or None if the configuration file does not exist.
    pub fn get_config(&self) -> Result<Option<Mapping>, GenerateError> {
        let file: File = match File::open(&self.config_file) {
            Ok(f) => f,
            Err(error) => match error.kind() {
                ErrorKind::NotFound => return Ok(None),
                _ => return Err(GenerateError::io(&self.config_file, error)),
            },
        };
        let reader: BufReader<File> = BufReader::new(file);
        let options: Map<String, Value> =
            serde_json::from_reader(reader).map_err(|source| GenerateError::UserConfig {
                path: self.config_file.clone(),
                source,
            })?;

        let mut mapping: Mapping = Mapping::new();
        for (key, value) in options {
            mapping.insert(serde_yaml::Value::String(key), json_to_yaml(value));
        }
        Ok(Some(mapping))
    }
}

/// Convert a JSON value into the equivalent YAML value.
fn json_to_yaml(value: Value) -> serde_yaml::Value {
    match value {
        Value::Null => serde_yaml::Value::Null,
        Value::Bool(b) => serde_yaml::Value::Bool(b),
        Value::Number(n) => match (n.as_u64(), n.as_i64(), n.as_f64()) {
            (Some(u), _, _) => serde_yaml::Value::from(u),
            (None, Some(i), _) => serde_yaml::Value::from(i),
            (None, None, Some(f)) => serde_yaml::Value::from(f),
            (None, None, None) => serde_yaml::Value::Null,
        },
        Value::String(s) => serde_yaml::Value::String(s),
        Value::Array(items) => {
            serde_yaml::Value::Sequence(items.into_iter().map(json_to_yaml).collect())
        }
        Value::Object(map) => serde_yaml::Value::Mapping(
            map.into_iter()
                .map(|(k, v)| (serde_yaml::Value::String(k), json_to_yaml(v)))
                .collect(),
        ),
    }
}
