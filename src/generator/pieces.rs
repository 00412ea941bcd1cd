/*
pieces.rs

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

//! Jigsaw pieces.
//!
//! The layout describes the solved puzzle: each piece lists its entries anticlockwise, starting
//! with its base side. To build the puzzle, the solved pieces are moved to random slots and
//! rotated by a random number of sides. Solved piece `i` goes to puzzle slot `slots[i]`, and the
//! entries of the puzzle piece are
//!
//! ```text
//! puzzle[k] = solved[(N - rotation + k) mod N]
//! ```
//!
//! where `N` is the number of sides of the piece.
//!
//! The pieces carry their slot number, so that the solver can find the piece in the solution.
//! The number is printed at a fixed angle in the puzzle slot. In the solution, the number must
//! turn with the piece: the angle is the slot angle, corrected by the difference between the
//! base orientations of the solved piece and of the slot, minus the rotation.

use log::debug;

use crate::errors::GenerateError;
use crate::generator::entry::{EntryFormatter, FontSize, FormatParams, Mode, Style};
use crate::generator::layout::{EntryRef, Layout, Role, Shape, ShapeLayout};
use crate::generator::random_source::RandomSource;
use crate::generator::table::markdown_row;
use crate::generator::template::Substitutions;
use crate::puzzle_data::{Entry, Pair};

/// Format a piece or card number, underlining 6 and 9 so they cannot be confused.
pub fn cardnum(number: usize) -> String {
    if number == 6 || number == 9 {
        format!(r"\underline{{{number}}}")
    } else {
        number.to_string()
    }
}

/// Rotate the entries of a solved piece anticlockwise by `rotation` sides.
pub fn rotate<T: Clone>(entries: &[T], rotation: usize) -> Vec<T> {
    let sides: usize = entries.len();
    (0..sides)
        .map(|k| entries[(sides - rotation % sides + k) % sides].clone())
        .collect()
}

/// Undo [`rotate`].
pub fn unrotate<T: Clone>(entries: &[T], rotation: usize) -> Vec<T> {
    let sides: usize = entries.len();
    (0..sides)
        .map(|k| entries[(k + rotation) % sides].clone())
        .collect()
}

/// Compute the angle of the number of a solved piece, in `-180..180`.
pub fn label_angle(
    sides: usize,
    solution_base: i32,
    slot_base: i32,
    slot_number: i32,
    rotation: usize,
) -> i32 {
    let step: i32 = 360 / sides as i32;
    let angle: i32 = slot_number + (solution_base - slot_base) - step * rotation as i32;
    (angle + 180).rem_euclid(360) - 180
}

/// Random slots and rotations for the pieces of one shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Arrangement {
    /// Puzzle slot of each solved piece.
    pub slots: Vec<usize>,

    /// Rotation of each solved piece, in sides.
    pub rotations: Vec<usize>,
}

impl Arrangement {
    /// Draw the permutation, then the rotations in solution order.
    pub fn draw<R: RandomSource>(num_pieces: usize, sides: usize, rng: &mut R) -> Self {
        let slots: Vec<usize> = rng.permutation(num_pieces);
        let rotations: Vec<usize> = (0..num_pieces).map(|_| rng.below(sides)).collect();
        Self { slots, rotations }
    }
}

/// Piece with its entries, number, and number angle.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedPiece<'a> {
    pub entries: Vec<&'a Entry>,
    pub number: usize,
    pub angle: i32,
}

/// Solved and puzzle pieces of one shape.
#[derive(Debug, Clone)]
pub struct ShapeArrangement<'a> {
    pub layout: &'a ShapeLayout,

    /// Pieces in solution order.
    pub solution: Vec<PlacedPiece<'a>>,

    /// Pieces in slot order.
    pub puzzle: Vec<PlacedPiece<'a>>,
}

/// Return the entry an [`EntryRef`] points to.
fn resolve<'a>(reference: &EntryRef, pairs: &'a [Pair], edges: &'a [Entry]) -> Option<&'a Entry> {
    match reference.role {
        Role::Question => pairs.get(reference.index).map(|p| &p.question),
        Role::Answer => pairs.get(reference.index).map(|p| &p.answer),
        Role::Edge => edges.get(reference.index),
    }
}

/// Assemble the solved pieces of a shape and place them in the puzzle.
///
/// `first_number` is the number of the first puzzle slot.
pub fn arrange<'a, R: RandomSource>(
    typename: &str,
    layout: &'a ShapeLayout,
    pairs: &'a [Pair],
    edges: &'a [Entry],
    first_number: usize,
    rng: &mut R,
) -> Result<ShapeArrangement<'a>, GenerateError> {
    let sides: usize = layout.shape.sides();
    let mut solved: Vec<Vec<&'a Entry>> = Vec::with_capacity(layout.len());
    for piece in &layout.solution_pieces {
        let mut entries: Vec<&'a Entry> = Vec::with_capacity(sides);
        for reference in piece {
            let entry: &Entry = resolve(reference, pairs, edges).ok_or_else(|| {
                GenerateError::ReferenceOutOfRange {
                    typename: typename.to_string(),
                    reference: reference.to_string(),
                    table: format!("{}SolutionCards", layout.shape.layout_prefix()),
                    available: match reference.role {
                        Role::Edge => edges.len(),
                        _ => pairs.len(),
                    },
                }
            })?;
            entries.push(entry);
        }
        solved.push(entries);
    }

    let arrangement: Arrangement = Arrangement::draw(solved.len(), sides, rng);
    debug!(
        "{:?} pieces: slots {:?}, rotations {:?}",
        layout.shape, arrangement.slots, arrangement.rotations
    );

    let mut solution: Vec<PlacedPiece> = Vec::with_capacity(solved.len());
    let mut puzzle: Vec<Option<PlacedPiece>> = vec![None; solved.len()];
    for (i, entries) in solved.into_iter().enumerate() {
        let slot: usize = arrangement.slots[i];
        let rotation: usize = arrangement.rotations[i];
        let (slot_base, slot_number): (i32, i32) = layout.puzzle_orientation[slot];
        let number: usize = slot + first_number;

        puzzle[slot] = Some(PlacedPiece {
            entries: rotate(&entries, rotation),
            number,
            angle: slot_number,
        });
        solution.push(PlacedPiece {
            entries,
            number,
            angle: label_angle(
                sides,
                layout.solution_orientation[i],
                slot_base,
                slot_number,
                rotation,
            ),
        });
    }

    Ok(ShapeArrangement {
        layout,
        solution,
        puzzle: puzzle.into_iter().flatten().collect(),
    })
}

/// Text sizes of the pieces.
#[derive(Debug, Clone, Copy)]
pub struct PieceSizes {
    pub puzzle: usize,
    pub solution: usize,

    /// Whether to print the piece numbers.
    pub number_cards: bool,
}

/// Build the `{e1}...{eN}{number}{angle}` brace groups of a piece.
fn brace_groups(
    piece: &PlacedPiece,
    size: usize,
    number_cards: bool,
    mode: Mode,
    formatter: &mut EntryFormatter,
) -> String {
    let params: FormatParams = FormatParams::new(Style::Geometric, size);
    let mut groups: String = String::new();
    for entry in &piece.entries {
        groups.push('{');
        groups.push_str(&formatter.text(entry, &params, mode));
        groups.push('}');
    }
    if number_cards {
        groups.push_str(&format!(
            "{{{} {}}}",
            FontSize::reduced(size, 3).command(),
            cardnum(piece.number)
        ));
    } else {
        groups.push_str("{}");
    }
    groups.push_str(&format!("{{{}}}", piece.angle));
    groups
}

/// Jigsaw variables for the LaTeX and the Markdown documents.
#[derive(Debug, Default)]
pub struct JigsawPieces {
    pub tex: Substitutions,
    pub markdown: Substitutions,
}

impl JigsawPieces {
    /// Add the variables of one shape.
    fn render(
        &mut self,
        arrangement: &ShapeArrangement,
        sizes: PieceSizes,
        formatter: &mut EntryFormatter,
    ) {
        let prefix: &str = arrangement.layout.shape.variable_prefix();
        for (i, piece) in arrangement.solution.iter().enumerate() {
            let groups: String =
                brace_groups(piece, sizes.solution, sizes.number_cards, Mode::Solution, formatter);
            self.tex.set(&format!("{prefix}solcard{}", i + 1), groups);
        }

        let md_params: FormatParams = FormatParams::new(Style::Inline, 0);
        for (j, piece) in arrangement.puzzle.iter().enumerate() {
            let groups: String =
                brace_groups(piece, sizes.puzzle, sizes.number_cards, Mode::Puzzle, formatter);
            self.tex.set(&format!("{prefix}puzcard{}", j + 1), groups);

            let cells: Vec<String> = piece
                .entries
                .iter()
                .map(|entry| formatter.text(entry, &md_params, Mode::Puzzle))
                .collect();
            let row: String = markdown_row(&cells);
            match arrangement.layout.shape {
                Shape::Triangle => {
                    self.markdown.append("puzcards3", &format!("{row}\n"));
                    self.markdown.append("puzcards4", &format!("{row} &nbsp; |\n"));
                }
                Shape::Square => self.markdown.append("puzcards4", &format!("{row}\n")),
            }
        }
    }
}

/// Build the pieces of a jigsaw: triangles first, then squares.
///
/// `pairs` are the pairs after the optional flip. The random draws are consumed in this order:
/// triangle slots, triangle rotations, square slots, square rotations.
pub fn build_pieces<R: RandomSource>(
    layout: &Layout,
    pairs: &[Pair],
    edges: &[Entry],
    sizes: PieceSizes,
    formatter: &mut EntryFormatter,
    rng: &mut R,
) -> Result<JigsawPieces, GenerateError> {
    let mut pieces: JigsawPieces = JigsawPieces::default();
    pieces.markdown.set("puzcards3", "");
    pieces.markdown.set("puzcards4", "");

    let mut first_number: usize = 1;
    for shape in layout.shapes() {
        let arrangement: ShapeArrangement =
            arrange(&layout.typename, shape, pairs, edges, first_number, rng)?;
        pieces.render(&arrangement, sizes, formatter);
        first_number += shape.len();
    }
    Ok(pieces)
}
