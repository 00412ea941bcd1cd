/*
cards.rs

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

//! Card sort decks.
//!
//! The cards are printed on pages of `rows` x `columns` cards, from the top row to the bottom
//! row and from left to right in each row. In the puzzle the cards can be shuffled, and each card
//! carries its position in the printed sequence. In the solution the cards are in their original
//! order, and each card carries the number of its position in the puzzle, so that the solver can
//! find it.
//!
//! The pages and the cards are written through the [`GridTemplate`] (LaTeX) and [`ListTemplate`]
//! (Markdown) sections. The resulting bodies still contain the document variables (`title`,
//! `rows`...), which are substituted once the whole document is known.

use log::{debug, warn};

use crate::generator::entry::{EntryFormatter, FontSize, FormatParams, Formatted, Mode, Style};
use crate::generator::random_source::RandomSource;
use crate::generator::template::{GridTemplate, ListTemplate, Substitutions, substitute};
use crate::puzzle_data::{CardItem, Entry};

/// Blank placeholder for the Markdown cards.
pub const MARKDOWN_BLANK: &str = "&nbsp;";

/// Position of a card on its page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPosition {
    /// Row, starting at 1.
    pub row: usize,

    /// Column, starting at 1.
    pub column: usize,

    /// Whether the card is the first one of a page.
    pub new_page: bool,
}

/// Running position in the page grid.
#[derive(Debug)]
pub struct Paginator {
    rows: usize,
    columns: usize,

    /// Number of cards already on the current page.
    on_page: usize,
}

impl Paginator {
    /// Create a [`Paginator`] object. `rows` and `columns` must not be zero.
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            on_page: 0,
        }
    }

    /// Return the position of the next card.
    pub fn place(&mut self) -> GridPosition {
        let position: GridPosition = GridPosition {
            row: self.on_page / self.columns + 1,
            column: self.on_page % self.columns + 1,
            new_page: self.on_page == 0,
        };
        self.on_page += 1;
        if self.on_page == self.rows * self.columns {
            self.on_page = 0;
        }
        position
    }

    /// Start a new page with the next card.
    ///
    /// Nothing happens if the current page is still empty.
    pub fn break_page(&mut self) {
        self.on_page = 0;
    }
}

/// Compute the position of every card.
///
/// Forced page breaks are ignored, with a warning, when `honour_breaks` is false.
pub fn paginate(
    items: &[CardItem],
    rows: usize,
    columns: usize,
    honour_breaks: bool,
) -> Vec<GridPosition> {
    let mut paginator: Paginator = Paginator::new(rows, columns);
    let mut positions: Vec<GridPosition> = Vec::new();
    for item in items {
        match item {
            CardItem::Text(_) => positions.push(paginator.place()),
            CardItem::PageBreak if honour_breaks => paginator.break_page(),
            CardItem::PageBreak => warn!("newpage makes no sense for shuffled cards! Ignoring"),
            CardItem::SetLabel(_) | CardItem::SetLabelSize(_) => (),
        }
    }
    positions
}

/// Card with the label in force at its position in the data file.
#[derive(Debug, Clone, PartialEq)]
pub struct Card<'a> {
    pub entry: &'a Entry,
    pub label: String,
    pub label_size: usize,
}

/// Collect the real cards, resolving the label changes.
pub fn collect_cards<'a>(items: &'a [CardItem], label: &str, label_size: usize) -> Vec<Card<'a>> {
    let mut label: String = label.to_string();
    let mut label_size: usize = label_size;
    let mut cards: Vec<Card> = Vec::new();
    for item in items {
        match item {
            CardItem::Text(entry) => cards.push(Card {
                entry,
                label: label.clone(),
                label_size,
            }),
            CardItem::SetLabel(new_label) => label = new_label.clone(),
            CardItem::SetLabelSize(new_size) => label_size = *new_size,
            CardItem::PageBreak => (),
        }
    }
    cards
}

/// Return the inverse of a permutation.
pub fn inverse(order: &[usize]) -> Vec<usize> {
    let mut inverse: Vec<usize> = vec![0; order.len()];
    for (i, j) in order.iter().enumerate() {
        inverse[*j] = i;
    }
    inverse
}

/// Write a LaTeX deck, page by page.
#[derive(Debug)]
pub struct GridWriter<'t> {
    template: &'t GridTemplate,
    body: String,
    page_open: bool,
}

impl<'t> GridWriter<'t> {
    /// Create a [`GridWriter`] object and start the document.
    pub fn new(template: &'t GridTemplate) -> Self {
        Self {
            template,
            body: template.begin_document.clone(),
            page_open: false,
        }
    }

    /// Write a card.
    pub fn push(&mut self, position: GridPosition, subs: &Substitutions) {
        if position.new_page || !self.page_open {
            if self.page_open {
                self.body.push_str(&self.template.end_page);
            }
            self.body.push_str(&self.template.begin_page);
            self.page_open = true;
        }
        self.body.push_str(&substitute(&self.template.item, subs));
    }

    /// Close the last page and the document.
    pub fn finish(mut self) -> String {
        if self.page_open {
            self.body.push_str(&self.template.end_page);
        }
        self.body.push_str(&self.template.end_document);
        self.body
    }
}

/// Write a Markdown deck.
#[derive(Debug)]
pub struct ListWriter<'t> {
    template: &'t ListTemplate,
    body: String,
}

impl<'t> ListWriter<'t> {
    /// Create a [`ListWriter`] object and start the document.
    pub fn new(template: &'t ListTemplate) -> Self {
        Self {
            template,
            body: template.begin_document.clone(),
        }
    }

    /// Write a card.
    pub fn push(&mut self, subs: &Substitutions) {
        self.body.push_str(&substitute(&self.template.item, subs));
    }

    /// Close the document.
    pub fn finish(mut self) -> String {
        self.body.push_str(&self.template.end_document);
        self.body
    }
}

/// Templates of a deck. Missing templates produce no output.
#[derive(Debug, Clone, Default)]
pub struct DeckTemplates {
    pub puzzle_tex: Option<GridTemplate>,
    pub solution_tex: Option<GridTemplate>,
    pub puzzle_markdown: Option<ListTemplate>,
    pub solution_markdown: Option<ListTemplate>,
}

/// Bodies of one side (puzzle or solution) of a deck.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeckBody {
    pub tex: Option<String>,
    pub markdown: Option<String>,
}

/// Write one side of a deck in LaTeX and in Markdown.
#[derive(Debug)]
pub struct DeckWriter<'t> {
    tex: Option<GridWriter<'t>>,
    markdown: Option<ListWriter<'t>>,
}

impl<'t> DeckWriter<'t> {
    /// Create a [`DeckWriter`] object.
    pub fn new(tex: Option<&'t GridTemplate>, markdown: Option<&'t ListTemplate>) -> Self {
        Self {
            tex: tex.map(GridWriter::new),
            markdown: markdown.map(ListWriter::new),
        }
    }

    /// Write a card.
    pub fn push(&mut self, position: GridPosition, tex: &Substitutions, markdown: &Substitutions) {
        if let Some(writer) = self.tex.as_mut() {
            writer.push(position, tex);
        }
        if let Some(writer) = self.markdown.as_mut() {
            writer.push(markdown);
        }
    }

    /// Close the documents.
    pub fn finish(self) -> DeckBody {
        DeckBody {
            tex: self.tex.map(GridWriter::finish),
            markdown: self.markdown.map(ListWriter::finish),
        }
    }
}

/// Layout and text parameters shared by card sorts and dominoes.
#[derive(Debug, Clone)]
pub struct DeckOptions {
    pub rows: usize,
    pub columns: usize,
    pub text_size: usize,
    pub label: String,
    pub label_size: usize,
    pub number_cards: bool,
}

impl DeckOptions {
    /// Card number variables for LaTeX and Markdown.
    pub fn card_numbers(&self, number: usize) -> (String, String) {
        if self.number_cards {
            (
                format!("{} {number}", FontSize::reduced(self.text_size, 3).command()),
                number.to_string(),
            )
        } else {
            (String::new(), String::new())
        }
    }

    /// Start the item variables of a card.
    pub fn item_variables(
        &self,
        position: GridPosition,
        number: usize,
    ) -> (Substitutions, Substitutions) {
        let (tex_number, md_number): (String, String) = self.card_numbers(number);
        let mut tex: Substitutions = Substitutions::new();
        let mut markdown: Substitutions = Substitutions::new();
        for subs in [&mut tex, &mut markdown] {
            subs.set("rownum", position.row);
            subs.set("colnum", position.column);
        }
        tex.set("cardnum", tex_number);
        markdown.set("cardnum", md_number);
        (tex, markdown)
    }
}

/// Puzzle and solution bodies.
#[derive(Debug, Clone, Default)]
pub struct Deck {
    pub puzzle: DeckBody,

    /// `None` when the solution is not requested.
    pub solution: Option<DeckBody>,

    /// Printed order: puzzle card `i` is original card `order[i]`.
    pub order: Vec<usize>,
}

/// Set the `text` and `label` variables of a card.
fn set_card_text(
    card: &Card,
    options: &DeckOptions,
    mode: Mode,
    formatter: &mut EntryFormatter,
    tex: &mut Substitutions,
    markdown: &mut Substitutions,
) {
    let tex_params: FormatParams = FormatParams::new(Style::Geometric, options.text_size)
        .with_label(&card.label, card.label_size);
    let formatted: Formatted = formatter.format(card.entry, &tex_params, mode);
    tex.set("text", formatted.text);
    tex.set("label", formatted.label);

    let md_params: FormatParams = FormatParams::new(Style::Inline, 0)
        .with_label(&card.label, card.label_size)
        .with_blank(MARKDOWN_BLANK);
    let formatted: Formatted = formatter.format(card.entry, &md_params, mode);
    markdown.set("text", formatted.text);
    markdown.set("label", formatted.label);
}

/// Build a card sort deck.
///
/// The card order is drawn from `rng` only when `shuffle` is set.
pub fn build_card_sort<R: RandomSource>(
    items: &[CardItem],
    options: &DeckOptions,
    shuffle: bool,
    produce_solution: bool,
    templates: &DeckTemplates,
    formatter: &mut EntryFormatter,
    rng: &mut R,
) -> Deck {
    let cards: Vec<Card> = collect_cards(items, &options.label, options.label_size);
    let order: Vec<usize> = if shuffle {
        rng.permutation(cards.len())
    } else {
        (0..cards.len()).collect()
    };
    let inverse_order: Vec<usize> = inverse(&order);
    let positions: Vec<GridPosition> = paginate(items, options.rows, options.columns, !shuffle);
    debug!("Card sort: {} cards, order {order:?}", cards.len());

    let mut puzzle: DeckWriter = DeckWriter::new(
        templates.puzzle_tex.as_ref(),
        templates.puzzle_markdown.as_ref(),
    );
    let mut solution: Option<DeckWriter> = produce_solution.then(|| {
        DeckWriter::new(
            templates.solution_tex.as_ref(),
            templates.solution_markdown.as_ref(),
        )
    });

    for (i, position) in positions.iter().enumerate() {
        let (mut tex, mut markdown) = options.item_variables(*position, i + 1);
        set_card_text(
            &cards[order[i]],
            options,
            Mode::Puzzle,
            formatter,
            &mut tex,
            &mut markdown,
        );
        puzzle.push(*position, &tex, &markdown);

        if let Some(writer) = solution.as_mut() {
            let (mut tex, mut markdown) = options.item_variables(*position, inverse_order[i] + 1);
            set_card_text(
                &cards[i],
                options,
                Mode::Solution,
                formatter,
                &mut tex,
                &mut markdown,
            );
            writer.push(*position, &tex, &markdown);
        }
    }

    Deck {
        puzzle: puzzle.finish(),
        solution: solution.map(DeckWriter::finish),
        order,
    }
}
