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

//! Build the output documents.
//!
//! A run produces up to five documents: the LaTeX answer table, the LaTeX puzzle and solution,
//! and the Markdown puzzle and solution. Each document is enabled when its template and its
//! header template are both named by the options, and when its format is requested
//! (`makepdf` for LaTeX, `makemd` for Markdown).
//!
//! The random draws happen in a fixed order: shuffle the pairs, shuffle the edges (jigsaws
//! only), flip the pairs, and then place the pieces, shuffle the cards, or shuffle the dominoes.

use log::{debug, info, warn};

use crate::errors::GenerateError;
use crate::generator::cards::{Deck, DeckBody, DeckOptions, DeckTemplates, build_card_sort};
use crate::generator::dominoes::build_dominoes;
use crate::generator::entry::{EntryFormatter, FontSize};
use crate::generator::layout::{Category, Layout};
use crate::generator::pieces::{JigsawPieces, PieceSizes, build_pieces};
use crate::generator::random_source::RandomSource;
use crate::generator::table::{AnswerTable, build_table};
use crate::generator::template::{GridTemplate, ListTemplate, Substitutions, substitute};
use crate::puzzle_data::{CardItem, Entry, Pair, PuzzleData};
use crate::resources::TemplateStore;
use crate::settings::{HiddenNotes, Settings};

/// Output documents, in the order they are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputKind {
    Table,
    Puzzle,
    Solution,
    PuzzleMarkdown,
    SolutionMarkdown,
}

impl OutputKind {
    pub const ALL: [OutputKind; 5] = [
        OutputKind::Table,
        OutputKind::Puzzle,
        OutputKind::Solution,
        OutputKind::PuzzleMarkdown,
        OutputKind::SolutionMarkdown,
    ];

    /// Suffix of the output file name.
    pub fn suffix(self) -> &'static str {
        match self {
            OutputKind::Table => "-table.tex",
            OutputKind::Puzzle => "-puzzle.tex",
            OutputKind::Solution => "-solution.tex",
            OutputKind::PuzzleMarkdown => "-puzzle.md",
            OutputKind::SolutionMarkdown => "-solution.md",
        }
    }

    /// Whether the document is a LaTeX document.
    pub fn is_tex(self) -> bool {
        matches!(
            self,
            OutputKind::Table | OutputKind::Puzzle | OutputKind::Solution
        )
    }

    /// Whether the document shows the solution.
    fn is_solution(self) -> bool {
        matches!(self, OutputKind::Solution | OutputKind::SolutionMarkdown)
    }

    /// Option that names the body template.
    fn template_key(self) -> &'static str {
        match self {
            OutputKind::Table => "tableTemplateTeX",
            OutputKind::Puzzle => "puzzleTemplateTeX",
            OutputKind::Solution => "solutionTemplateTeX",
            OutputKind::PuzzleMarkdown => "puzzleTemplateMarkdown",
            OutputKind::SolutionMarkdown => "solutionTemplateMarkdown",
        }
    }

    /// Option that names the header template.
    fn header_key(self) -> &'static str {
        match self {
            OutputKind::Table => "tableHeaderTeX",
            OutputKind::Puzzle => "puzzleHeaderTeX",
            OutputKind::Solution => "solutionHeaderTeX",
            OutputKind::PuzzleMarkdown => "puzzleHeaderMarkdown",
            OutputKind::SolutionMarkdown => "solutionHeaderMarkdown",
        }
    }

    /// Template description for the error messages.
    fn describe(self) -> &'static str {
        match self {
            OutputKind::Table => "TeX table template",
            OutputKind::Puzzle => "TeX puzzle template",
            OutputKind::Solution => "TeX solution template",
            OutputKind::PuzzleMarkdown => "Markdown puzzle template",
            OutputKind::SolutionMarkdown => "Markdown solution template",
        }
    }
}

/// Generated document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub kind: OutputKind,
    pub header: String,
    pub body: String,
}

impl Document {
    /// Return the text of the output file: the header, then the body.
    pub fn contents(&self) -> String {
        format!("{}\n{}\n", self.header, self.body)
    }
}

/// Body and header templates of an enabled document.
#[derive(Debug)]
struct SelectedTemplate {
    kind: OutputKind,
    header: String,
    body: String,
}

/// Read the templates of the enabled documents.
fn select_templates(
    settings: &Settings,
    store: &dyn TemplateStore,
    with_solution: bool,
) -> Result<Vec<SelectedTemplate>, GenerateError> {
    let mut selected: Vec<SelectedTemplate> = Vec::new();
    for kind in OutputKind::ALL {
        let requested: bool = if kind.is_tex() {
            settings.runtime.makepdf
        } else {
            settings.runtime.makemd
        };
        if !requested || (kind.is_solution() && !with_solution) {
            continue;
        }
        let Some(body_name) = settings.template(kind.template_key()) else {
            continue;
        };
        let Some(header_name) = settings.template(kind.header_key()) else {
            warn!(
                "{} file specified but not {}",
                kind.template_key(),
                kind.header_key()
            );
            continue;
        };
        debug!("{:?} document: template {body_name}, header {header_name}", kind);
        selected.push(SelectedTemplate {
            kind,
            body: store.read(body_name)?,
            header: store.read(header_name)?,
        });
    }
    Ok(selected)
}

/// Verify the number of items of a data file section against the layout.
///
/// `required` is the number of items the layout requires (0 for any non-zero number), or `None`
/// if the layout does not accept the section.
fn check_section(
    typename: &str,
    kind: &'static str,
    singular: &'static str,
    required: Option<usize>,
    provided: Option<usize>,
) -> Result<(), GenerateError> {
    match (required, provided) {
        (None, None) => Ok(()),
        (None, Some(_)) => Err(GenerateError::UnexpectedSection {
            typename: typename.to_string(),
            kind,
        }),
        (Some(_), None) => Err(GenerateError::MissingSection {
            typename: typename.to_string(),
            kind,
        }),
        (Some(0), Some(0)) => Err(GenerateError::NoItems {
            typename: typename.to_string(),
            kind: singular,
        }),
        (Some(0), Some(_)) => Ok(()),
        (Some(expected), Some(count)) if expected != count => Err(GenerateError::WrongCount {
            typename: typename.to_string(),
            kind,
            expected,
        }),
        (Some(_), Some(_)) => Ok(()),
    }
}

/// Return exactly `count` edges, dropping or blanking edges as needed.
fn fit_edges(mut edges: Vec<Entry>, count: usize, provided: bool) -> Vec<Entry> {
    if edges.len() > count {
        warn!("More than {count} edges given; extra will be ignored");
        edges.truncate(count);
    } else if edges.len() < count {
        if provided {
            warn!("Fewer than {count} edges given; remainder will be blank");
        }
        edges.resize(count, Entry::text(""));
    }
    edges
}

/// Shuffle the pairs if requested.
fn shuffle_pairs<R: RandomSource>(pairs: &mut [Pair], settings: &Settings, rng: &mut R) {
    if settings.shuffle_pairs {
        rng.shuffle(pairs);
    }
}

/// Swap the question and answer of each pair with a probability of 1/2, if requested.
///
/// The original pairs are kept for the answer table.
fn flip_pairs<R: RandomSource>(pairs: &[Pair], settings: &Settings, rng: &mut R) -> Vec<Pair> {
    if !settings.flip {
        return pairs.to_vec();
    }
    pairs
        .iter()
        .map(|pair| {
            if rng.coin() {
                pair.flipped()
            } else {
                pair.clone()
            }
        })
        .collect()
}

/// Document variables, for LaTeX and for Markdown.
#[derive(Debug, Default)]
struct DocumentVariables {
    tex: Substitutions,
    markdown: Substitutions,
}

impl DocumentVariables {
    /// Create the variables common to all the puzzles.
    fn new(title: &str, settings: &Settings) -> Self {
        let mut variables: DocumentVariables = DocumentVariables::default();
        for subs in [&mut variables.tex, &mut variables.markdown] {
            subs.set("title", title);
            subs.set("puzzlenote", &settings.note);
        }
        variables
    }

    /// Add the hidden notes, or empty notes if no entry is hidden.
    fn set_hidden_notes(&mut self, exists_hidden: bool, settings: &Settings) {
        let notes: &HiddenNotes = &settings.hidden_notes;
        if exists_hidden {
            self.tex.set("hiddennotesolution", &notes.solution);
            self.tex.set("hiddennotetable", &notes.table);
            self.markdown.set("hiddennotemd", &notes.markdown);
        } else {
            self.tex.set("hiddennotesolution", "");
            self.tex.set("hiddennotetable", "");
            self.markdown.set("hiddennotemd", "");
        }
    }

    /// Return the variables for the given document.
    fn for_kind(&self, kind: OutputKind) -> &Substitutions {
        if kind.is_tex() {
            &self.tex
        } else {
            &self.markdown
        }
    }
}

/// Build the documents of a puzzle.
///
/// # Errors
///
/// The function returns an error when the data file does not match the layout, when a template
/// cannot be found or has the wrong structure, or when an option has the wrong type.
pub fn build_documents<R: RandomSource>(
    data: &PuzzleData,
    layout: &Layout,
    settings: &Settings,
    store: &dyn TemplateStore,
    rng: &mut R,
) -> Result<Vec<Document>, GenerateError> {
    info!("Generating {} puzzle \"{}\"", layout.typename, data.title);
    match layout.category {
        Category::Jigsaw => build_jigsaw(data, layout, settings, store, rng),
        Category::CardSort | Category::Dominoes => build_deck(data, layout, settings, store, rng),
    }
}

/// Build the documents of a jigsaw.
fn build_jigsaw<R: RandomSource>(
    data: &PuzzleData,
    layout: &Layout,
    settings: &Settings,
    store: &dyn TemplateStore,
    rng: &mut R,
) -> Result<Vec<Document>, GenerateError> {
    let typename: &str = &layout.typename;
    check_section(typename, "pairs", "pair", layout.pairs, data.num_pairs())?;
    if layout.edges.is_none() && data.edges.is_some() {
        return Err(GenerateError::UnexpectedSection {
            typename: typename.to_string(),
            kind: "edges",
        });
    }
    if data.cards.is_some() {
        return Err(GenerateError::UnexpectedSection {
            typename: typename.to_string(),
            kind: "cards",
        });
    }

    let mut pairs: Vec<Pair> = data.pair_list(typename, false)?;
    let mut edges: Vec<Entry> = match layout.edges {
        Some(count) => fit_edges(data.edge_list(), count, data.edges.is_some()),
        None => Vec::new(),
    };
    layout.check_references(pairs.len(), edges.len())?;

    let selected: Vec<SelectedTemplate> = select_templates(settings, store, true)?;

    shuffle_pairs(&mut pairs, settings, rng);
    if settings.shuffle_edges {
        rng.shuffle(&mut edges);
    }
    let flipped: Vec<Pair> = flip_pairs(&pairs, settings, rng);

    let mut formatter: EntryFormatter = EntryFormatter::new();
    let mut variables: DocumentVariables = DocumentVariables::new(&data.title, settings);

    let needs_table: bool = selected
        .iter()
        .any(|t| matches!(t.kind, OutputKind::Table | OutputKind::SolutionMarkdown));
    if needs_table {
        let table: AnswerTable = build_table(&pairs, &edges, &[], "", &mut formatter);
        variables.tex.extend(&table.tex);
        variables.markdown.extend(&table.markdown);
    }

    let sizes: PieceSizes = PieceSizes {
        puzzle: settings.puzzle_text_size,
        solution: settings.solution_text_size,
        number_cards: settings.number_cards,
    };
    let pieces: JigsawPieces = build_pieces(layout, &flipped, &edges, sizes, &mut formatter, rng)?;
    variables.tex.extend(&pieces.tex);
    variables.markdown.extend(&pieces.markdown);
    variables.set_hidden_notes(formatter.exists_hidden(), settings);

    Ok(selected
        .into_iter()
        .map(|template| Document {
            kind: template.kind,
            body: substitute(&template.body, variables.for_kind(template.kind)),
            header: template.header,
        })
        .collect())
}

/// Return a grid dimension, which must be set and non-zero.
fn grid_dimension(typename: &str, name: &str, value: Option<usize>) -> Result<usize, GenerateError> {
    match value {
        Some(n) if n > 0 => Ok(n),
        Some(_) => Err(GenerateError::layout(typename, format!("{name} must not be zero"))),
        None => Err(GenerateError::layout(
            typename,
            format!("the {name} option is required"),
        )),
    }
}

/// Split the card templates into their sections.
fn deck_templates(selected: &[SelectedTemplate]) -> Result<DeckTemplates, GenerateError> {
    let mut templates: DeckTemplates = DeckTemplates::default();
    for template in selected {
        let name: &str = template.kind.describe();
        match template.kind {
            OutputKind::Table => (),
            OutputKind::Puzzle => {
                templates.puzzle_tex = Some(GridTemplate::parse(name, &template.body)?)
            }
            OutputKind::Solution => {
                templates.solution_tex = Some(GridTemplate::parse(name, &template.body)?)
            }
            OutputKind::PuzzleMarkdown => {
                templates.puzzle_markdown = Some(ListTemplate::parse(name, &template.body)?)
            }
            OutputKind::SolutionMarkdown => {
                templates.solution_markdown = Some(ListTemplate::parse(name, &template.body)?)
            }
        }
    }
    Ok(templates)
}

/// Build the documents of a card sort or of dominoes.
fn build_deck<R: RandomSource>(
    data: &PuzzleData,
    layout: &Layout,
    settings: &Settings,
    store: &dyn TemplateStore,
    rng: &mut R,
) -> Result<Vec<Document>, GenerateError> {
    let typename: &str = &layout.typename;
    check_section(typename, "pairs", "pair", layout.pairs, data.num_pairs())?;
    check_section(
        typename,
        "cards",
        "card",
        layout.cards,
        data.cards.as_ref().map(Vec::len),
    )?;
    if data.edges.is_some() {
        return Err(GenerateError::UnexpectedSection {
            typename: typename.to_string(),
            kind: "edges",
        });
    }

    let dominoes: bool = layout.category == Category::Dominoes;
    let with_solution: bool = dominoes || settings.produce_solution;
    let options: DeckOptions = DeckOptions {
        rows: grid_dimension(typename, "rows", settings.rows)?,
        columns: grid_dimension(typename, "columns", settings.columns)?,
        text_size: settings.text_size,
        label: settings.label.clone(),
        label_size: settings.label_size,
        number_cards: settings.number_cards,
    };

    let selected: Vec<SelectedTemplate> = select_templates(settings, store, with_solution)?;
    let templates: DeckTemplates = deck_templates(&selected)?;

    let mut pairs: Vec<Pair> = data.pair_list(typename, dominoes)?;
    let cards: Vec<CardItem> = data.card_list();
    shuffle_pairs(&mut pairs, settings, rng);
    let flipped: Vec<Pair> = flip_pairs(&pairs, settings, rng);

    let mut formatter: EntryFormatter = EntryFormatter::new();
    let mut variables: DocumentVariables = DocumentVariables::new(&data.title, settings);

    if selected.iter().any(|t| t.kind == OutputKind::Table) {
        let table: AnswerTable = build_table(&pairs, &[], &cards, &settings.label, &mut formatter);
        variables.tex.extend(&table.tex);
        variables.markdown.extend(&table.markdown);
    }

    let deck: Deck = if dominoes {
        build_dominoes(
            &flipped,
            &settings.chain,
            &options,
            &templates,
            &mut formatter,
            rng,
        )
    } else {
        build_card_sort(
            &cards,
            &options,
            settings.shuffle_cards,
            settings.produce_solution,
            &templates,
            &mut formatter,
            rng,
        )
    };

    for subs in [&mut variables.tex, &mut variables.markdown] {
        subs.set("rows", options.rows);
        subs.set("columns", options.columns);
    }
    match settings.card_title.as_deref() {
        Some(title) => {
            let size: usize = settings
                .card_title_size
                .unwrap_or(settings.label_size.saturating_sub(1));
            variables.tex.set(
                "cardtitle",
                format!("{} {title}", FontSize::from_index(size as i64).command()),
            );
            variables.markdown.set("cardtitle", title);
        }
        None => {
            variables.tex.set("cardtitle", "");
            variables.markdown.set("cardtitle", "");
        }
    }
    if !dominoes {
        variables.tex.set("cardseph", &settings.cardsep_horizontal);
        variables.tex.set("cardsepv", &settings.cardsep_vertical);
    }
    variables.set_hidden_notes(formatter.exists_hidden(), settings);

    let solution: DeckBody = deck.solution.unwrap_or_default();
    let mut documents: Vec<Document> = Vec::with_capacity(selected.len());
    for template in selected {
        let body: Option<&String> = match template.kind {
            OutputKind::Table => Some(&template.body),
            OutputKind::Puzzle => deck.puzzle.tex.as_ref(),
            OutputKind::Solution => solution.tex.as_ref(),
            OutputKind::PuzzleMarkdown => deck.puzzle.markdown.as_ref(),
            OutputKind::SolutionMarkdown => solution.markdown.as_ref(),
        };
        if let Some(body) = body {
            documents.push(Document {
                kind: template.kind,
                body: substitute(body, variables.for_kind(template.kind)),
                header: template.header.clone(),
            });
        }
    }
    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::random_source::{Scripted, TitleSeeded};
    use crate::settings::OptionSources;
    use serde_yaml::Mapping;
    use std::collections::HashMap;

    const TRIANGLE_LAYOUT: &str = "
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
";

    const CARD_LAYOUT: &str = "
typename: Card sort
category: cardsort
cards: 0
rows: 2
columns: 1
puzzleTemplateTeX: cards.tex
puzzleHeaderTeX: header.tex
solutionTemplateTeX: cards.tex
solutionHeaderTeX: header.tex
puzzleTemplateMarkdown: cards.md
puzzleHeaderMarkdown: header.md
solutionTemplateMarkdown: cards.md
solutionHeaderMarkdown: header.md
";

    fn store() -> HashMap<String, String> {
        let files: [(&str, &str); 8] = [
            ("header.tex", "% header"),
            ("header.md", "<!-- header -->"),
            ("tri-puzzle.tex", "<: title :>: <: tripuzcard1 :> <: tripuzcard2 :>"),
            ("tri-solution.tex", "<: trisolcard1 :> <: trisolcard2 :>\n<: hiddennotesolution :>"),
            ("table.tex", "<: tablepairs :><: tableedges :><: hiddennotetable :>"),
            ("tri-puzzle.md", "# <: title :>\n<: puzcards3 :><: puzzlenote :>"),
            (
                "cards.tex",
                "%%% BEGIN DOCUMENT\n<: title :> <: cardseph :>\n%%% BEGIN PAGE\n[\n%%% BEGIN ITEM\n<: cardnum :>=<: text :>\n%%% END PAGE\n]\n%%% END DOCUMENT\n<: hiddennotesolution :>",
            ),
            (
                "cards.md",
                "### BEGIN DOCUMENT\n# <: title :> (<: rows :>x<: columns :>)\n### BEGIN ITEM\n* <: text :>\n### END DOCUMENT\n<: hiddennotemd :>",
            ),
        ];
        files
            .iter()
            .map(|(name, text)| (name.to_string(), text.to_string()))
            .collect()
    }

    fn data(yaml: &str) -> PuzzleData {
        PuzzleData::parse(yaml, "test data").expect("data")
    }

    fn settings(data: &PuzzleData, layout: &Layout) -> Settings {
        let sources: OptionSources = OptionSources::new(
            Mapping::new(),
            data.values.clone(),
            layout.values.clone(),
            Mapping::new(),
        );
        Settings::resolve(&sources).expect("settings")
    }

    fn kinds(documents: &[Document]) -> Vec<OutputKind> {
        documents.iter().map(|d| d.kind).collect()
    }

    #[test]
    fn jigsaw_documents() {
        let layout: Layout = Layout::parse("two", TRIANGLE_LAYOUT).expect("layout");
        let data: PuzzleData = data(
            "type: two\ntitle: Sums\nnote: Good luck\npairs:\n  - [1+1, 2]\n  - [2+2, {text: 4, hidden: true}]\nedges: [e1]\n",
        );
        let settings: Settings = settings(&data, &layout);
        // Slots [1, 0], then rotations 1 and 0
        let mut rng: Scripted = Scripted::new(&[0, 1, 0]);
        let documents: Vec<Document> =
            build_documents(&data, &layout, &settings, &store(), &mut rng).expect("documents");

        // The Markdown solution has no header
        assert_eq!(
            kinds(&documents),
            vec![OutputKind::Table, OutputKind::Puzzle, OutputKind::Solution, OutputKind::PuzzleMarkdown]
        );
        let table: &Document = &documents[0];
        assert_eq!(
            table.body,
            "1+1&2\\\\ \\hline\n2+2&(*) 4\\\\ \\hline\n\\strut e1\\\\ \\hline\n\\strut \\\\ \\hline\nEntries that are hidden in the puzzle are indicated with (*)."
        );
        assert_eq!(table.contents(), format!("% header\n{}\n", table.body));

        let puzzle: &Document = &documents[1];
        assert_eq!(
            puzzle.body,
            r"Sums: {{regular}{\large 2}}{{regular}{\large 2+2}}{{regular}{ }}{\footnotesize 1}{0} {{regular}{\large }}{{regular}{\large e1}}{{regular}{\large 1+1}}{\footnotesize 2}{-30}"
        );
        assert!(documents[2].body.ends_with(HIDDEN_SOLUTION_NOTE));
        assert_eq!(
            documents[3].body,
            "# Sums\n| 2 | 2+2 | (BLANK) |\n| (BLANK) | e1 | 1+1 |\nGood luck"
        );
    }

    const HIDDEN_SOLUTION_NOTE: &str = "highlighted in yellow.";

    #[test]
    fn jigsaw_is_reproducible() {
        let layout: Layout = Layout::parse("two", TRIANGLE_LAYOUT).expect("layout");
        let data: PuzzleData = data(
            "type: two\ntitle: Sums\nshufflePairs: true\nflip: true\npairs:\n  - [1+1, 2]\n  - [2+2, 4]\nedges: [e1, e2]\n",
        );
        let settings: Settings = settings(&data, &layout);
        let first: Vec<Document> =
            build_documents(&data, &layout, &settings, &store(), &mut TitleSeeded::new("Sums"))
                .expect("documents");
        let second: Vec<Document> =
            build_documents(&data, &layout, &settings, &store(), &mut TitleSeeded::new("Sums"))
                .expect("documents");
        assert_eq!(first, second);
    }

    #[test]
    fn jigsaw_draw_order() {
        let layout: Layout = Layout::parse("two", TRIANGLE_LAYOUT).expect("layout");
        let data: PuzzleData = data(
            "type: two\ntitle: Sums\nshufflePairs: true\nshuffleEdges: true\nflip: true\nmakemd: false\npairs:\n  - [1+1, 2]\n  - [2+2, 4]\nedges: [e1, e2]\n",
        );
        let settings: Settings = settings(&data, &layout);
        // Pairs swapped, edges kept, first pair flipped, slots [1, 0], rotations 1 and 0
        let mut rng: Scripted = Scripted::new(&[0, 1, 1, 0, 0, 1, 0]);
        let documents: Vec<Document> =
            build_documents(&data, &layout, &settings, &store(), &mut rng).expect("documents");

        // Pair shuffle, edge shuffle, two coins, triangle permutation, two rotations
        assert_eq!(rng.bounds, vec![2, 2, 2, 2, 2, 3, 3]);
        assert_eq!(
            kinds(&documents),
            vec![OutputKind::Table, OutputKind::Puzzle, OutputKind::Solution]
        );

        // The table shows the shuffled pairs before flipping
        assert_eq!(
            documents[0].body,
            "2+2&4\\\\ \\hline\n1+1&2\\\\ \\hline\n\\strut e1\\\\ \\hline\n\\strut e2\\\\ \\hline\n"
        );
        assert_eq!(
            documents[1].body,
            r"Sums: {{regular}{\large 2+2}}{{regular}{\large 1+1}}{{regular}{\large 2}}{\footnotesize 1}{0} {{regular}{\large e2}}{{regular}{\large e1}}{{regular}{\large 4}}{\footnotesize 2}{-30}"
        );
    }

    #[test]
    fn wrong_pair_count() {
        let layout: Layout = Layout::parse("two", TRIANGLE_LAYOUT).expect("layout");
        let data: PuzzleData = data("type: two\npairs:\n  - [a, b]\n  - [c, d]\n  - [e, f]\n");
        let settings: Settings = settings(&data, &layout);
        let error: GenerateError =
            build_documents(&data, &layout, &settings, &store(), &mut Scripted::new(&[]))
                .expect_err("three pairs");
        assert_eq!(error.to_string(), "Puzzle type Two triangles needs exactly 2 pairs");
    }

    #[test]
    fn unexpected_sections() {
        let layout: Layout = Layout::parse("two", TRIANGLE_LAYOUT).expect("layout");
        let data: PuzzleData = data("type: two\npairs: [[a, b], [c, d]]\ncards: [x]\n");
        let settings: Settings = settings(&data, &layout);
        assert!(matches!(
            build_documents(&data, &layout, &settings, &store(), &mut Scripted::new(&[])),
            Err(GenerateError::UnexpectedSection { kind: "cards", .. })
        ));
    }

    #[test]
    fn edges_are_fitted() {
        let many: Vec<Entry> = vec![Entry::text("a"), Entry::text("b"), Entry::text("c")];
        assert_eq!(fit_edges(many, 2, true).len(), 2);
        let few: Vec<Entry> = fit_edges(vec![Entry::text("a")], 3, true);
        assert_eq!(few, vec![Entry::text("a"), Entry::text(""), Entry::text("")]);
    }

    #[test]
    fn section_checks() {
        assert!(check_section("T", "cards", "card", Some(0), Some(4)).is_ok());
        assert!(check_section("T", "cards", "card", None, None).is_ok());
        let error: GenerateError =
            check_section("T", "cards", "card", Some(0), Some(0)).expect_err("no cards");
        assert_eq!(error.to_string(), "Puzzle type T needs at least one card");
        let error: GenerateError =
            check_section("T", "pairs", "pair", Some(3), None).expect_err("missing");
        assert_eq!(error.to_string(), "Puzzle type T requires pairs in data file");
        let error: GenerateError =
            check_section("T", "pairs", "pair", None, Some(3)).expect_err("unexpected");
        assert_eq!(error.to_string(), "Puzzle type T does not accept pairs in data file");
    }

    #[test]
    fn card_sort_documents() {
        let layout: Layout = Layout::parse("cards", CARD_LAYOUT).expect("layout");
        let data: PuzzleData = data(
            "type: cards\ntitle: Sort\ncards:\n  - one\n  - {newpage: true}\n  - two\n  - {text: three, hidden: true}\n",
        );
        let settings: Settings = settings(&data, &layout);
        let mut rng: Scripted = Scripted::new(&[]);
        let documents: Vec<Document> =
            build_documents(&data, &layout, &settings, &store(), &mut rng).expect("documents");
        assert_eq!(
            kinds(&documents),
            vec![
                OutputKind::Puzzle,
                OutputKind::Solution,
                OutputKind::PuzzleMarkdown,
                OutputKind::SolutionMarkdown
            ]
        );
        assert_eq!(
            documents[0].body,
            concat!(
                "Sort 12pt\n",
                "[\n",
                "\\footnotesize 1={regular}{\\large one}\n",
                "]\n",
                "[\n",
                "\\footnotesize 2={regular}{\\large two}\n",
                "\\footnotesize 3={regular}{ }\n",
                "]\n",
                "Entries that are hidden in the puzzle are highlighted in yellow.",
            )
        );
        assert!(documents[1].body.contains("{hidden}{\\large three}"));
        assert!(documents[1].body.ends_with("highlighted in yellow."));
        assert_eq!(
            documents[2].body,
            "# Sort (2x1)\n* one\n* two\n* &nbsp;\nEntries that are hidden in the puzzle are indicated with (*)."
        );
        assert!(rng.bounds.is_empty());
    }

    #[test]
    fn card_sort_without_solution() {
        let layout: Layout = Layout::parse("cards", CARD_LAYOUT).expect("layout");
        let data: PuzzleData =
            data("type: cards\nproduceSolution: false\nmakemd: false\ncards: [a, b]\n");
        let settings: Settings = settings(&data, &layout);
        let documents: Vec<Document> =
            build_documents(&data, &layout, &settings, &store(), &mut Scripted::new(&[]))
                .expect("documents");
        assert_eq!(kinds(&documents), vec![OutputKind::Puzzle]);
    }

    #[test]
    fn card_sort_requires_a_grid() {
        let layout: Layout =
            Layout::parse("cards", &CARD_LAYOUT.replace("rows: 2\n", "")).expect("layout");
        let data: PuzzleData = data("type: cards\ncards: [a]\n");
        let settings: Settings = settings(&data, &layout);
        assert!(matches!(
            build_documents(&data, &layout, &settings, &store(), &mut Scripted::new(&[])),
            Err(GenerateError::Layout { .. })
        ));
    }

    #[test]
    fn empty_card_list() {
        let layout: Layout = Layout::parse("cards", CARD_LAYOUT).expect("layout");
        let data: PuzzleData = data("type: cards\ncards: []\n");
        let settings: Settings = settings(&data, &layout);
        assert!(matches!(
            build_documents(&data, &layout, &settings, &store(), &mut Scripted::new(&[])),
            Err(GenerateError::NoItems { kind: "card", .. })
        ));
    }

    #[test]
    fn broken_card_template() {
        let layout: Layout = Layout::parse("cards", CARD_LAYOUT).expect("layout");
        let data: PuzzleData = data("type: cards\ncards: [a]\n");
        let settings: Settings = settings(&data, &layout);
        let mut store: HashMap<String, String> = store();
        store.insert("cards.tex".to_string(), "%%% BEGIN DOCUMENT\nno pages\n".to_string());
        let error: GenerateError =
            build_documents(&data, &layout, &settings, &store, &mut Scripted::new(&[]))
                .expect_err("broken template");
        assert!(error.to_string().starts_with("TeX puzzle template"));
    }
}
