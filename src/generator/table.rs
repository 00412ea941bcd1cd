/*
table.rs

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

//! Answer table.
//!
//! The table lists the pairs, the edges, and the cards in their original order, with the
//! solution text of every entry. It feeds the LaTeX table document (`tablepairs`, `tableedges`,
//! and `tablecards` variables) and the Markdown solution document (`pairs`, `edges`, and `cards`
//! variables).

use crate::generator::entry::{EntryFormatter, FormatParams, Formatted, Mode, NORMAL_SIZE, Style};
use crate::generator::template::Substitutions;
use crate::puzzle_data::{CardItem, Entry, Pair};

/// Table variables for the LaTeX and the Markdown documents.
#[derive(Debug, Default)]
pub struct AnswerTable {
    pub tex: Substitutions,
    pub markdown: Substitutions,
}

/// Build a Markdown table row: `| a | b |`.
pub fn markdown_row(cells: &[String]) -> String {
    let mut row: String = String::from("|");
    for cell in cells {
        row.push(' ');
        row.push_str(cell);
        row.push_str(" |");
    }
    row
}

/// Prefix the text with the label in brackets, if any.
fn with_label(label: &str, text: &str) -> String {
    if label.is_empty() {
        text.to_string()
    } else {
        format!("[{label}] {text}")
    }
}

/// Build the answer table.
///
/// `pairs` must be in their original orientation. Special card items update the label used for
/// the following cards.
pub fn build_table(
    pairs: &[Pair],
    edges: &[Entry],
    cards: &[CardItem],
    default_label: &str,
    formatter: &mut EntryFormatter,
) -> AnswerTable {
    let mut table: AnswerTable = AnswerTable::default();
    for name in ["tablepairs", "tableedges", "tablecards"] {
        table.tex.set(name, "");
    }
    for name in ["pairs", "edges", "cards"] {
        table.markdown.set(name, "");
    }

    let tex_params: FormatParams = FormatParams::new(Style::Table, NORMAL_SIZE);
    let md_params: FormatParams = FormatParams::new(Style::Inline, 0);

    for pair in pairs {
        let question: String = formatter.text(&pair.question, &tex_params, Mode::Solution);
        let answer: String = formatter.text(&pair.answer, &tex_params, Mode::Solution);
        table
            .tex
            .append("tablepairs", &format!("{question}&{answer}\\\\ \\hline\n"));

        let cells: [String; 2] = [
            formatter.text(&pair.question, &md_params, Mode::Solution),
            formatter.text(&pair.answer, &md_params, Mode::Solution),
        ];
        table
            .markdown
            .append("pairs", &format!("{}\n", markdown_row(&cells)));
    }

    for edge in edges {
        let text: String = formatter.text(edge, &tex_params, Mode::Solution);
        table
            .tex
            .append("tableedges", &format!("\\strut {text}\\\\ \\hline\n"));
        let cell: String = formatter.text(edge, &md_params, Mode::Solution);
        table
            .markdown
            .append("edges", &format!("{}\n", markdown_row(&[cell])));
    }

    let mut label: String = default_label.to_string();
    for item in cards {
        let entry: &Entry = match item {
            CardItem::SetLabel(new_label) => {
                label = new_label.clone();
                continue;
            }
            CardItem::PageBreak | CardItem::SetLabelSize(_) => continue,
            CardItem::Text(entry) => entry,
        };

        let tex_params: FormatParams =
            FormatParams::new(Style::Table, NORMAL_SIZE).with_label(&label, NORMAL_SIZE);
        let formatted: Formatted = formatter.format(entry, &tex_params, Mode::Solution);
        table.tex.append(
            "tablecards",
            &format!("{}\\\\ \\hline\n", with_label(&formatted.label, &formatted.text)),
        );

        let md_params: FormatParams = FormatParams::new(Style::Inline, 0).with_label(&label, 0);
        let formatted: Formatted = formatter.format(entry, &md_params, Mode::Solution);
        table.markdown.append(
            "cards",
            &format!("| {} |\n", with_label(&formatted.label, &formatted.text)),
        );
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle_data::RichEntry;

    fn hidden(text: &str) -> Entry {
        Entry::Rich(RichEntry {
            text: Some(text.to_string()),
            hidden: Some(true),
            ..RichEntry::default()
        })
    }

    #[test]
    fn markdown_rows() {
        assert_eq!(markdown_row(&["a".to_string(), "b".to_string()]), "| a | b |");
        assert_eq!(markdown_row(&[]), "|");
    }

    #[test]
    fn pairs_and_edges() {
        let pairs: Vec<Pair> = vec![
            Pair::new(Entry::text("1+1"), Entry::text("2")),
            Pair::new(Entry::text("2+2"), hidden("4")),
        ];
        let edges: Vec<Entry> = vec![Entry::text("e"), Entry::text("")];
        let mut formatter: EntryFormatter = EntryFormatter::new();
        let table: AnswerTable = build_table(&pairs, &edges, &[], "", &mut formatter);

        assert_eq!(
            table.tex.get("tablepairs"),
            Some("1+1&2\\\\ \\hline\n2+2&(*) 4\\\\ \\hline\n")
        );
        assert_eq!(
            table.tex.get("tableedges"),
            Some("\\strut e\\\\ \\hline\n\\strut \\\\ \\hline\n")
        );
        assert_eq!(table.tex.get("tablecards"), Some(""));
        assert_eq!(table.markdown.get("pairs"), Some("| 1+1 | 2 |\n| 2+2 | (*) 4 |\n"));
        assert_eq!(table.markdown.get("edges"), Some("| e |\n| (BLANK) |\n"));
        assert!(formatter.exists_hidden());
    }

    #[test]
    fn cards_follow_label_changes() {
        let cards: Vec<CardItem> = vec![
            CardItem::Text(Entry::text("a")),
            CardItem::SetLabel("Set B".to_string()),
            CardItem::PageBreak,
            CardItem::Text(Entry::text("b")),
        ];
        let mut formatter: EntryFormatter = EntryFormatter::new();
        let table: AnswerTable = build_table(&[], &[], &cards, "Set A", &mut formatter);
        assert_eq!(
            table.tex.get("tablecards"),
            Some("[Set A] a\\\\ \\hline\n[Set B] b\\\\ \\hline\n")
        );
        assert_eq!(table.markdown.get("cards"), Some("| [Set A] a |\n| [Set B] b |\n"));
    }

    #[test]
    fn unlabelled_cards() {
        let cards: Vec<CardItem> = vec![CardItem::Text(Entry::text("a"))];
        let mut formatter: EntryFormatter = EntryFormatter::new();
        let table: AnswerTable = build_table(&[], &[], &cards, "", &mut formatter);
        assert_eq!(table.tex.get("tablecards"), Some("a\\\\ \\hline\n"));
        assert_eq!(table.markdown.get("cards"), Some("| a |\n"));
    }
}
