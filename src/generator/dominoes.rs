/*
dominoes.rs

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

//! Domino chains.
//!
//! Each domino carries the answer of one pair on its left half and the question of the next pair
//! on its right half. Laid out in solution order, the dominoes form a chain:
//!
//! ```text
//! solution domino 0: A(n-1) | Q0
//! solution domino 1: A0     | Q1
//! ...
//! solution domino n-1: A(n-2) | Q(n-1)
//! ```
//!
//! When the chain is not a loop, a terminal pair (`finish`, `start`) is appended, so that the
//! first domino starts with `start` and the last one ends with `finish`.
//!
//! The printed order of the dominoes is always shuffled.

use log::debug;

use crate::generator::cards::{
    Deck, DeckOptions, DeckTemplates, DeckWriter, GridPosition, MARKDOWN_BLANK, Paginator,
    inverse,
};
use crate::generator::entry::{EntryFormatter, FormatParams, Formatted, Mode, Style};
use crate::generator::random_source::RandomSource;
use crate::generator::template::Substitutions;
use crate::puzzle_data::{Entry, Pair};

/// Ends of the chain.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainEnds {
    /// Whether the last domino connects back to the first one.
    pub looped: bool,

    /// Left half of the first domino, when the chain is not a loop.
    pub start: Entry,

    /// Right half of the last domino, when the chain is not a loop.
    pub finish: Entry,
}

impl Default for ChainEnds {
    fn default() -> Self {
        Self {
            looped: true,
            start: Entry::text("Start"),
            finish: Entry::text("Finish"),
        }
    }
}

/// Return the left and right halves of the domino at the given position of the chain.
pub fn domino_faces(pairs: &[Pair], position: usize) -> (&Entry, &Entry) {
    let n: usize = pairs.len();
    let previous: usize = (position + n - 1) % n;
    (&pairs[previous].answer, &pairs[position].question)
}

/// Set the variables of one half of a domino.
fn set_half(
    side: &str,
    entry: &Entry,
    options: &DeckOptions,
    mode: Mode,
    formatter: &mut EntryFormatter,
    tex: &mut Substitutions,
    markdown: &mut Substitutions,
) {
    let tex_params: FormatParams = FormatParams::new(Style::Geometric, options.text_size)
        .with_label(&options.label, options.label_size);
    let formatted: Formatted = formatter.format(entry, &tex_params, mode);
    tex.set(&format!("text{side}"), formatted.text);
    tex.set(&format!("label{side}"), formatted.label);

    let md_params: FormatParams = FormatParams::new(Style::Inline, 0)
        .with_label(&options.label, options.label_size)
        .with_blank(MARKDOWN_BLANK);
    let formatted: Formatted = formatter.format(entry, &md_params, mode);
    markdown.set(&format!("text{side}"), formatted.text);
    markdown.set(&format!("label{side}"), formatted.label);
}

/// Set the variables of both halves of the domino at the given chain position.
fn set_domino(
    pairs: &[Pair],
    position: usize,
    options: &DeckOptions,
    mode: Mode,
    formatter: &mut EntryFormatter,
    tex: &mut Substitutions,
    markdown: &mut Substitutions,
) {
    let (left, right): (&Entry, &Entry) = domino_faces(pairs, position);
    set_half("L", left, options, mode, formatter, tex, markdown);
    set_half("R", right, options, mode, formatter, tex, markdown);
}

/// Build a domino deck.
///
/// `pairs` are the pairs after the optional flip, without special items.
pub fn build_dominoes<R: RandomSource>(
    pairs: &[Pair],
    ends: &ChainEnds,
    options: &DeckOptions,
    templates: &DeckTemplates,
    formatter: &mut EntryFormatter,
    rng: &mut R,
) -> Deck {
    let mut chain: Vec<Pair> = pairs.to_vec();
    if !ends.looped {
        chain.push(Pair::new(ends.finish.clone(), ends.start.clone()));
    }

    let order: Vec<usize> = rng.permutation(chain.len());
    let inverse_order: Vec<usize> = inverse(&order);
    debug!("Dominoes: {} dominoes, order {order:?}", chain.len());

    let mut puzzle: DeckWriter = DeckWriter::new(
        templates.puzzle_tex.as_ref(),
        templates.puzzle_markdown.as_ref(),
    );
    let mut solution: DeckWriter = DeckWriter::new(
        templates.solution_tex.as_ref(),
        templates.solution_markdown.as_ref(),
    );
    let mut paginator: Paginator = Paginator::new(options.rows, options.columns);

    for i in 0..chain.len() {
        let position: GridPosition = paginator.place();

        let (mut tex, mut markdown) = options.item_variables(position, i + 1);
        set_domino(&chain, order[i], options, Mode::Puzzle, formatter, &mut tex, &mut markdown);
        puzzle.push(position, &tex, &markdown);

        let (mut tex, mut markdown) = options.item_variables(position, inverse_order[i] + 1);
        set_domino(&chain, i, options, Mode::Solution, formatter, &mut tex, &mut markdown);
        solution.push(position, &tex, &markdown);
    }

    Deck {
        puzzle: puzzle.finish(),
        solution: Some(solution.finish()),
        order,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::random_source::{Scripted, TitleSeeded};
    use crate::generator::template::ListTemplate;

    fn pairs(n: usize) -> Vec<Pair> {
        (0..n)
            .map(|i| Pair::new(Entry::text(&format!("Q{i}")), Entry::text(&format!("A{i}"))))
            .collect()
    }

    fn options() -> DeckOptions {
        DeckOptions {
            rows: 2,
            columns: 2,
            text_size: 5,
            label: String::new(),
            label_size: 3,
            number_cards: true,
        }
    }

    fn templates() -> DeckTemplates {
        let list: ListTemplate = ListTemplate {
            begin_document: String::new(),
            item: "<: cardnum :>=<: textL :>|<: textR :>\n".to_string(),
            end_document: String::new(),
        };
        DeckTemplates {
            puzzle_markdown: Some(list.clone()),
            solution_markdown: Some(list),
            ..DeckTemplates::default()
        }
    }

    #[test]
    fn chain_closes() {
        let pairs: Vec<Pair> = pairs(5);
        for position in 0..pairs.len() {
            let (_, right) = domino_faces(&pairs, position);
            let (left, _) = domino_faces(&pairs, (position + 1) % pairs.len());
            // The question on the right matches the answer on the left of the next domino
            assert_eq!(right.to_string().replace('Q', ""), left.to_string().replace('A', ""));
        }
        assert_eq!(domino_faces(&pairs, 0).0, &Entry::text("A4"));
    }

    #[test]
    fn open_chain_solution() {
        let ends: ChainEnds = ChainEnds {
            looped: false,
            ..ChainEnds::default()
        };
        let mut formatter: EntryFormatter = EntryFormatter::new();
        let mut rng: Scripted = Scripted::new(&[]);
        let deck: Deck = build_dominoes(
            &pairs(2),
            &ends,
            &options(),
            &templates(),
            &mut formatter,
            &mut rng,
        );
        // Three dominoes: bounds 3, then 2
        assert_eq!(rng.bounds, vec![3, 2]);
        assert_eq!(deck.order, vec![1, 2, 0]);
        assert_eq!(
            deck.solution.and_then(|s| s.markdown).as_deref(),
            Some("3=Start|Q0\n1=A0|Q1\n2=A1|Finish\n")
        );
        assert_eq!(
            deck.puzzle.markdown.as_deref(),
            Some("1=A0|Q1\n2=A1|Finish\n3=Start|Q0\n")
        );
    }

    #[test]
    fn puzzle_dominoes_are_the_solution_dominoes() {
        let pairs: Vec<Pair> = pairs(7);
        let mut formatter: EntryFormatter = EntryFormatter::new();
        let mut rng: TitleSeeded = TitleSeeded::new("dominoes");
        let deck: Deck = build_dominoes(
            &pairs,
            &ChainEnds::default(),
            &options(),
            &templates(),
            &mut formatter,
            &mut rng,
        );
        let strip = |line: &str| line.split_once('=').map(|(_, d)| d.to_string());
        let puzzle: Vec<String> = deck
            .puzzle
            .markdown
            .as_deref()
            .unwrap_or_default()
            .lines()
            .filter_map(strip)
            .collect();
        let solution: Vec<String> = deck
            .solution
            .and_then(|s| s.markdown)
            .unwrap_or_default()
            .lines()
            .filter_map(strip)
            .collect();
        assert_eq!(puzzle.len(), 7);
        for (i, domino) in puzzle.iter().enumerate() {
            assert_eq!(domino, &solution[deck.order[i]]);
        }
    }

    #[test]
    fn latex_pages_break_every_grid() {
        let grid = crate::generator::template::GridTemplate {
            begin_document: String::new(),
            begin_page: "(".to_string(),
            item: "<: rownum :><: colnum :>".to_string(),
            end_page: ")".to_string(),
            end_document: String::new(),
        };
        let templates: DeckTemplates = DeckTemplates {
            puzzle_tex: Some(grid.clone()),
            solution_tex: Some(grid),
            ..DeckTemplates::default()
        };
        let mut formatter: EntryFormatter = EntryFormatter::new();
        let mut rng: Scripted = Scripted::new(&[]);
        let deck: Deck = build_dominoes(
            &pairs(5),
            &ChainEnds::default(),
            &options(),
            &templates,
            &mut formatter,
            &mut rng,
        );
        assert_eq!(deck.puzzle.tex.as_deref(), Some("(11122122)(11)"));
    }
}
