/*
cli_options.rs

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

//! Process command-line options.
//!
//! # Examples
//!
//! Generate the documents for `fractions.yaml`, in the current directory:
//!
//! ```
//! $ jigsaw-generate fractions
//! ```
//!
//! Generate only the Markdown documents, with a different base name for the output files:
//!
//! ```
//! $ jigsaw-generate --no-makepdf -o week3 fractions.yaml
//! ```

use clap::Parser;
use log::{LevelFilter, debug};
use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};

use jigsaw_generate::errors::GenerateError;
use jigsaw_generate::generator::{RunOptions, generate};
use jigsaw_generate::renderer::LatexRenderer;
use jigsaw_generate::resources::{TemplateDirs, search_path};
use jigsaw_generate::saver::user_config::{SaverUserConfig, default_config_dir};

/// Generate printable jigsaw, card-sort, and domino puzzles.
#[derive(Parser, Debug)]
#[command(about, long_about = None, version)]
struct Args {
    /// Puzzle data file (the .yaml extension is optional)
    puzzle_file: String,

    /// Base name of the output files, in the current directory
    #[arg(short, long)]
    output: Option<String>,

    /// Remove the auxiliary files after running LaTeX
    #[arg(long, conflicts_with = "no_clean")]
    clean: bool,

    /// Keep the auxiliary files
    #[arg(long, alias = "noclean")]
    no_clean: bool,

    /// Make PDF output via LaTeX
    #[arg(long, conflicts_with = "no_makepdf")]
    makepdf: bool,

    /// Do not make PDF output
    #[arg(long, alias = "nomakepdf")]
    no_makepdf: bool,

    /// Make Markdown output
    #[arg(long, conflicts_with = "no_makemd")]
    makemd: bool,

    /// Do not make Markdown output
    #[arg(long, alias = "nomakemd")]
    no_makemd: bool,

    /// LaTeX variant to run (default pdflatex)
    #[arg(long)]
    latex: Option<String>,

    /// Filter to run on the LaTeX files
    #[arg(long)]
    texfilter: Option<String>,

    /// Filter to run on the Markdown files
    #[arg(long)]
    mdfilter: Option<String>,

    /// Additional template directory, searched after the standard ones
    #[arg(long = "template-dir", value_name = "DIR")]
    template_dirs: Vec<PathBuf>,

    /// Configuration file to use instead of the user configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable debug messages
    #[arg(short, long, default_value_t = false)]
    debug: bool,
}

/// Return the value of a `--x`/`--no-x` pair of options, if either is given.
fn switch(yes: bool, no: bool) -> Option<bool> {
    match (yes, no) {
        (true, _) => Some(true),
        (false, true) => Some(false),
        (false, false) => None,
    }
}

impl Args {
    /// Collect the options that override the data file, the layout, and the configuration.
    fn overrides(&self) -> Mapping {
        let mut overrides: Mapping = Mapping::new();
        let switches: [(&str, Option<bool>); 3] = [
            ("clean", switch(self.clean, self.no_clean)),
            ("makepdf", switch(self.makepdf, self.no_makepdf)),
            ("makemd", switch(self.makemd, self.no_makemd)),
        ];
        for (key, value) in switches {
            if let Some(value) = value {
                overrides.insert(Value::from(key), Value::Bool(value));
            }
        }
        let texts: [(&str, &Option<String>); 3] = [
            ("latex", &self.latex),
            ("texfilter", &self.texfilter),
            ("mdfilter", &self.mdfilter),
        ];
        for (key, value) in texts {
            if let Some(value) = value {
                overrides.insert(Value::from(key), Value::from(value.as_str()));
            }
        }
        overrides
    }
}

/// Return the data file path and its base name without the `.yaml` extension.
fn puzzle_paths(puzzle_file: &str) -> (PathBuf, String) {
    match puzzle_file.strip_suffix(".yaml") {
        Some(base) => (PathBuf::from(puzzle_file), base.to_string()),
        None => (
            PathBuf::from(format!("{puzzle_file}.yaml")),
            puzzle_file.to_string(),
        ),
    }
}

/// Return the base name of the output files.
///
/// The files are always written in the current directory.
fn output_base(output: Option<&str>, puzzle_base: &str) -> Result<PathBuf, GenerateError> {
    match output {
        Some(output) => match Path::new(output).parent() {
            Some(dir) if !dir.as_os_str().is_empty() && dir != Path::new(".") => {
                Err(GenerateError::OutputDirectory)
            }
            _ => Ok(PathBuf::from(output)),
        },
        None => Ok(Path::new(puzzle_base)
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(puzzle_base))),
    }
}

/// Initialize the logger.
///
/// Warnings are shown by default, and everything with `--debug`. `RUST_LOG` overrides both.
fn init_logger(debug: bool) {
    let level: LevelFilter = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

/// Run the generation described by the arguments.
fn run(args: &Args) -> Result<Vec<PathBuf>, GenerateError> {
    let (data_path, puzzle_base): (PathBuf, String) = puzzle_paths(&args.puzzle_file);
    let output_base: PathBuf = output_base(args.output.as_deref(), &puzzle_base)?;

    let config_dir: Option<PathBuf> = default_config_dir();
    let saver: Option<SaverUserConfig> = match (&args.config, &config_dir) {
        (Some(file), _) => Some(SaverUserConfig::from_path(file.clone())),
        (None, Some(dir)) => Some(SaverUserConfig::new(dir.clone())),
        (None, None) => None,
    };
    let user_config: Mapping = match saver {
        Some(saver) => saver.get_config()?.unwrap_or_default(),
        None => Mapping::new(),
    };

    let template_dirs: TemplateDirs =
        TemplateDirs::standard(config_dir.as_deref(), &args.template_dirs);
    let renderer: LatexRenderer = LatexRenderer::new(search_path(config_dir.as_deref(), "filters"));

    let options: RunOptions = RunOptions {
        output_base,
        template_dirs,
        overrides: args.overrides(),
        user_config,
    };
    debug!("Run options: {options:?}");
    generate(&data_path, &options, &renderer)
}

/// Parse and process command-line options.
///
/// Return the exit code of the program.
pub fn parse() -> u8 {
    let args: Args = Args::parse();
    init_logger(args.debug);

    match run(&args) {
        Ok(paths) => {
            for path in paths {
                debug!("Generated {}", path.display());
            }
            0
        }
        Err(e) => {
            eprintln!("Error: {e}");
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_extension_is_optional() {
        assert_eq!(
            puzzle_paths("week1/fractions"),
            (PathBuf::from("week1/fractions.yaml"), "week1/fractions".to_string())
        );
        assert_eq!(
            puzzle_paths("fractions.yaml"),
            (PathBuf::from("fractions.yaml"), "fractions".to_string())
        );
    }

    #[test]
    fn output_in_current_directory() {
        assert_eq!(
            output_base(None, "week1/fractions").expect("base"),
            PathBuf::from("fractions")
        );
        assert_eq!(output_base(Some("out"), "f").expect("base"), PathBuf::from("out"));
        assert_eq!(output_base(Some("./out"), "f").expect("base"), PathBuf::from("./out"));
        assert!(matches!(
            output_base(Some("build/out"), "f"),
            Err(GenerateError::OutputDirectory)
        ));
    }

    #[test]
    fn command_line_overrides() {
        let args: Args = Args::parse_from([
            "jigsaw-generate",
            "--no-makepdf",
            "--clean",
            "--latex",
            "lualatex",
            "--template-dir",
            "/opt/a",
            "--template-dir",
            "/opt/b",
            "fractions",
        ]);
        let overrides: Mapping = args.overrides();
        assert_eq!(overrides.get("makepdf"), Some(&Value::Bool(false)));
        assert_eq!(overrides.get("clean"), Some(&Value::Bool(true)));
        assert_eq!(overrides.get("latex"), Some(&Value::from("lualatex")));
        assert_eq!(overrides.get("makemd"), None);
        assert_eq!(args.template_dirs.len(), 2);
    }

    #[test]
    fn conflicting_switches() {
        assert!(Args::try_parse_from(["jigsaw-generate", "--clean", "--no-clean", "f"]).is_err());
    }
}
