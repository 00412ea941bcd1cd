/*
renderer.rs

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

//! Post-process the generated documents with external programs.
//!
//! The LaTeX documents go through an optional filter and are then typeset. LaTeX is run up to
//! four times, until its output no longer asks for a rerun. The Markdown documents only go
//! through an optional filter.
//!
//! A filter reads the document on its standard input and writes the new document on its
//! standard output. Filters are searched by name in the filter directories, and must be
//! executable.
//!
//! Failures of the external programs are not fatal: they are reported and the run goes on with
//! the next document.

use log::{debug, info, warn};
use regex::Regex;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::sync::LazyLock;

use crate::settings::RuntimeSettings;

/// LaTeX asks for another run.
static RERUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)rerun ").expect("invalid rerun regular expression"));

/// Maximum number of LaTeX runs per document.
const MAX_LATEX_RUNS: usize = 4;

/// Extensions of the files removed after a successful LaTeX run.
const AUXILIARY_EXTENSIONS: [&str; 7] = ["aux", "log", "tex", "ind", "idx", "out", "tex.filter"];

/// External processing of the generated files.
pub trait Renderer {
    /// Filter and typeset a LaTeX document.
    fn typeset(&self, path: &Path, settings: &RuntimeSettings);

    /// Filter a Markdown document.
    fn filter_markdown(&self, path: &Path, settings: &RuntimeSettings);
}

/// [`Renderer`] that runs the LaTeX program and the filters.
#[derive(Debug, Clone)]
pub struct LatexRenderer {
    /// Directories where the filters are searched, in order.
    filter_dirs: Vec<PathBuf>,
}

impl LatexRenderer {
    /// Create a [`LatexRenderer`] object.
    pub fn new(filter_dirs: Vec<PathBuf>) -> Self {
        debug!("Filter directories: {filter_dirs:?}");
        Self { filter_dirs }
    }

    /// Return the path of the first executable file with that name in the filter directories.
    fn find_filter(&self, name: &str) -> Option<PathBuf> {
        self.filter_dirs
            .iter()
            .map(|dir| dir.join(name))
            .find(|path| is_executable(path))
    }

    /// Run the filter on the file.
    ///
    /// The unfiltered file is kept with the `.filter` extension appended. Return `false` when
    /// the filter fails, in which case the unfiltered file is put back.
    fn apply_filter(&self, path: &Path, filter: &str, what: &str) -> bool {
        let Some(program) = self.find_filter(filter) else {
            warn!("Requested {what} filter {filter} not found, skipping");
            return true;
        };
        let saved: PathBuf = with_suffix(path, ".filter");
        if let Err(e) = fs::rename(path, &saved) {
            warn!("Cannot rename {}: {e}", path.display());
            return false;
        }

        debug!("Running {} on {}", program.display(), path.display());
        match run_filter(&program, &saved, path) {
            Ok(()) => true,
            Err(message) => {
                warn!("{what} filter failed: {message}");
                warn!("Continuing with the unfiltered file");
                if let Err(e) = fs::rename(&saved, path) {
                    warn!("Cannot restore {}: {e}", path.display());
                }
                false
            }
        }
    }

    /// Run LaTeX until it does not ask for a rerun. Return `false` on failure.
    fn run_latex(&self, path: &Path, latex: &str) -> bool {
        let dir: &Path = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let file_name: OsString = path.file_name().map(OsString::from).unwrap_or_default();

        for run in 1..=MAX_LATEX_RUNS {
            debug!("Running {latex} on {} (run {run})", path.display());
            let output: Output = match Command::new(latex)
                .arg("--interaction=nonstopmode")
                .arg(&file_name)
                .current_dir(dir)
                .stdin(Stdio::null())
                .output()
            {
                Ok(output) => output,
                Err(e) => {
                    warn!("Cannot run {latex}: {e}");
                    return false;
                }
            };
            if !output.status.success() {
                warn!(
                    "{latex} {} failed, return value {}",
                    path.display(),
                    output
                        .status
                        .code()
                        .map_or_else(|| "unknown".to_string(), |c| c.to_string())
                );
                warn!("See the {latex} log file for more details.");
                return false;
            }
            if !RERUN_RE.is_match(&String::from_utf8_lossy(&output.stdout)) {
                break;
            }
        }
        true
    }
}

impl Renderer for LatexRenderer {
    fn typeset(&self, path: &Path, settings: &RuntimeSettings) {
        let mut success: bool = true;
        if let Some(filter) = settings.texfilter.as_deref() {
            success &= self.apply_filter(path, filter, "LaTeX");
        }
        success &= self.run_latex(path, &settings.latex);
        if success {
            info!("Typeset {}", path.display());
        }
        if success && settings.clean {
            remove_auxiliary_files(path);
        }
    }

    fn filter_markdown(&self, path: &Path, settings: &RuntimeSettings) {
        let Some(filter) = settings.mdfilter.as_deref() else {
            return;
        };
        if self.apply_filter(path, filter, "Markdown") && settings.clean {
            let _ = fs::remove_file(with_suffix(path, ".filter"));
        }
    }
}

/// Append a suffix to the file name.
fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

/// Run the filter program with `input` as its standard input, and write its output to `output`.
fn run_filter(program: &Path, input: &Path, output: &Path) -> Result<(), String> {
    let stdin: File = File::open(input).map_err(|e| e.to_string())?;
    let result: Output = Command::new(program)
        .stdin(stdin)
        .output()
        .map_err(|e| e.to_string())?;
    if !result.status.success() {
        return Err(match result.status.code() {
            Some(code) => format!("return value {code}"),
            None => "terminated by a signal".to_string(),
        });
    }

    let file: File = File::create(output).map_err(|e| e.to_string())?;
    let mut writer: BufWriter<File> = BufWriter::new(file);
    writer
        .write_all(&result.stdout)
        .and_then(|()| writer.flush())
        .map_err(|e| e.to_string())
}

/// Remove the LaTeX auxiliary files and the source of the document.
fn remove_auxiliary_files(path: &Path) {
    let base: PathBuf = path.with_extension("");
    for extension in AUXILIARY_EXTENSIONS {
        let junk: PathBuf = with_suffix(&base, &format!(".{extension}"));
        if fs::remove_file(&junk).is_ok() {
            debug!("Removed {}", junk.display());
        }
    }
}

/// Whether the file exists and can be executed.
#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::env;
    use std::os::unix::fs::PermissionsExt;

    fn temp_dir(name: &str) -> PathBuf {
        let dir: PathBuf =
            env::temp_dir().join(format!("jigsaw-renderer-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).expect("create dir");
        dir
    }

    fn script(dir: &Path, name: &str, body: &str) {
        let path: PathBuf = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write script");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod");
    }

    fn settings(mdfilter: &str) -> RuntimeSettings {
        RuntimeSettings {
            mdfilter: Some(mdfilter.to_string()),
            ..RuntimeSettings::default()
        }
    }

    #[test]
    fn markdown_filter() {
        let dir: PathBuf = temp_dir("filter");
        script(&dir, "upper", "tr a-z A-Z");
        let document: PathBuf = dir.join("p-puzzle.md");
        fs::write(&document, "hello\n").expect("write");

        let renderer: LatexRenderer = LatexRenderer::new(vec![dir.clone()]);
        renderer.filter_markdown(&document, &settings("upper"));
        assert_eq!(fs::read_to_string(&document).expect("read"), "HELLO\n");
        assert!(!with_suffix(&document, ".filter").exists());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn failed_filter_restores_the_file() {
        let dir: PathBuf = temp_dir("failure");
        script(&dir, "broken", "exit 3");
        let document: PathBuf = dir.join("p-puzzle.md");
        fs::write(&document, "hello\n").expect("write");

        let renderer: LatexRenderer = LatexRenderer::new(vec![dir.clone()]);
        renderer.filter_markdown(&document, &settings("broken"));
        assert_eq!(fs::read_to_string(&document).expect("read"), "hello\n");
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn filters_must_be_executable() {
        let dir: PathBuf = temp_dir("executable");
        fs::write(dir.join("plain"), "#!/bin/sh\n").expect("write");
        let renderer: LatexRenderer = LatexRenderer::new(vec![dir.clone()]);
        assert_eq!(renderer.find_filter("plain"), None);
        assert_eq!(renderer.find_filter("absent"), None);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn auxiliary_files() {
        let dir: PathBuf = temp_dir("clean");
        for name in ["q-puzzle.aux", "q-puzzle.log", "q-puzzle.tex", "q-puzzle.pdf"] {
            fs::write(dir.join(name), "").expect("write");
        }
        remove_auxiliary_files(&dir.join("q-puzzle.tex"));
        assert!(!dir.join("q-puzzle.aux").exists());
        assert!(!dir.join("q-puzzle.tex").exists());
        assert!(dir.join("q-puzzle.pdf").exists());
        let _ = fs::remove_dir_all(&dir);
    }

    /// Number of lines the fake LaTeX program appended to `runs.txt`.
    fn latex_runs(dir: &Path) -> usize {
        fs::read_to_string(dir.join("runs.txt"))
            .map(|runs| runs.lines().count())
            .unwrap_or(0)
    }

    #[test]
    fn latex_runs_at_most_four_times() {
        let dir: PathBuf = temp_dir("rerun");
        script(&dir, "fakelatex", "echo run >> runs.txt\necho 'Rerun to get cross-references right.'");
        let document: PathBuf = dir.join("p-puzzle.tex");
        fs::write(&document, "").expect("write");

        let latex: PathBuf = dir.join("fakelatex");
        let renderer: LatexRenderer = LatexRenderer::new(Vec::new());
        assert!(renderer.run_latex(&document, &latex.to_string_lossy()));
        assert_eq!(latex_runs(&dir), MAX_LATEX_RUNS);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn latex_stops_without_rerun() {
        let dir: PathBuf = temp_dir("once");
        script(&dir, "fakelatex", "echo run >> runs.txt\necho 'Output written on p-puzzle.pdf'");
        let document: PathBuf = dir.join("p-puzzle.tex");
        fs::write(&document, "").expect("write");

        let latex: PathBuf = dir.join("fakelatex");
        let renderer: LatexRenderer = LatexRenderer::new(Vec::new());
        assert!(renderer.run_latex(&document, &latex.to_string_lossy()));
        assert_eq!(latex_runs(&dir), 1);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn latex_failure() {
        let dir: PathBuf = temp_dir("latexfail");
        script(&dir, "fakelatex", "echo run >> runs.txt\necho 'Rerun'\nexit 1");
        let document: PathBuf = dir.join("p-puzzle.tex");
        fs::write(&document, "").expect("write");

        let latex: PathBuf = dir.join("fakelatex");
        let renderer: LatexRenderer = LatexRenderer::new(Vec::new());
        assert!(!renderer.run_latex(&document, &latex.to_string_lossy()));
        assert_eq!(latex_runs(&dir), 1);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn rerun_detection() {
        assert!(RERUN_RE.is_match("LaTeX Warning: Label(s) may have changed. Rerun to get"));
        assert!(!RERUN_RE.is_match("Output written on p-puzzle.pdf"));
    }
}
