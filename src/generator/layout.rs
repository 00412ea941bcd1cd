/*
layout.rs

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

//! Puzzle layout.
//!
//! A layout file, `<type>-layout.yaml`, describes one puzzle type: its category, how many pairs,
//! edges, or cards it needs, the templates to use, default option values, and, for jigsaws,
//! the pieces of the solved puzzle.
//!
//! Each solved piece lists its edges anticlockwise as entry references: `Q3` is the question of
//! the third pair, `A3` its answer, and `E2` the second edge.
//!
//! ```yaml
//! typename: Small triangle
//! category: jigsaw
//! pairs: 3
//! edges: 6
//! triangleSolutionCards:
//!   - [ E1, Q1, E2 ]
//!   - [ A1, Q2, A3 ]
//! triangleSolutionOrientation: [ 0, 180 ]
//! trianglePuzzleOrientation:
//!   - [ 0, 0 ]
//!   - [ 180, -30 ]
//! ```
//!
//! The references and the tables are checked when the layout is loaded, so that an
//! inconsistent layout is reported before any document is generated.

use log::debug;
use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};
use std::fmt;
use std::str::FromStr;

use crate::errors::GenerateError;
use crate::puzzle_data::{map_get, scalar_text};

/// Puzzle category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Triangle and square pieces.
    Jigsaw,

    /// Independent cards.
    CardSort,

    /// Chain of domino cards.
    Dominoes,
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "jigsaw" => Ok(Category::Jigsaw),
            "cardsort" => Ok(Category::CardSort),
            "dominoes" => Ok(Category::Dominoes),
            _ => Err(s.to_string()),
        }
    }
}

/// Side of a pair, or edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Question,
    Answer,
    Edge,
}

/// Reference to a pair side or an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryRef {
    pub role: Role,

    /// Index, starting at 0.
    pub index: usize,
}

impl FromStr for EntryRef {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        let role: Role = match chars.next() {
            Some('Q') => Role::Question,
            Some('A') => Role::Answer,
            Some('E') => Role::Edge,
            _ => return Err(()),
        };
        let number: usize = chars.as_str().parse::<usize>().map_err(|_| ())?;
        if number == 0 {
            return Err(());
        }
        Ok(Self {
            role,
            index: number - 1,
        })
    }
}

impl fmt::Display for EntryRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let prefix: char = match self.role {
            Role::Question => 'Q',
            Role::Answer => 'A',
            Role::Edge => 'E',
        };
        write!(f, "{prefix}{}", self.index + 1)
    }
}

/// Jigsaw piece shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Triangle,
    Square,
}

impl Shape {
    /// Number of sides.
    pub fn sides(self) -> usize {
        match self {
            Shape::Triangle => 3,
            Shape::Square => 4,
        }
    }

    /// Prefix of the layout keys (`triangleSolutionCards`...).
    pub fn layout_prefix(self) -> &'static str {
        match self {
            Shape::Triangle => "triangle",
            Shape::Square => "square",
        }
    }

    /// Prefix of the template variables (`trisolcard1`, `tripuzcard1`...).
    pub fn variable_prefix(self) -> &'static str {
        match self {
            Shape::Triangle => "tri",
            Shape::Square => "sq",
        }
    }
}

/// Solved pieces and orientations for one shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeLayout {
    pub shape: Shape,

    /// Entries of each solved piece, anticlockwise.
    pub solution_pieces: Vec<Vec<EntryRef>>,

    /// Direction of the base side of each solved piece, in degrees.
    pub solution_orientation: Vec<i32>,

    /// Direction of the base side and direction of the card number of each puzzle slot, in
    /// degrees.
    pub puzzle_orientation: Vec<(i32, i32)>,
}

impl ShapeLayout {
    /// Number of pieces.
    pub fn len(&self) -> usize {
        self.solution_pieces.len()
    }

    /// Whether the shape has no pieces.
    pub fn is_empty(&self) -> bool {
        self.solution_pieces.is_empty()
    }

    /// Read the tables of the given shape from the layout file.
    ///
    /// Return `None` if the layout has no pieces of that shape.
    fn parse(shape: Shape, typename: &str, values: &Mapping) -> Result<Option<Self>, GenerateError> {
        let prefix: &str = shape.layout_prefix();
        let cards_key: String = format!("{prefix}SolutionCards");
        let raw_pieces: Vec<Vec<String>> = match table::<Vec<Vec<Value>>>(typename, values, &cards_key)? {
            Some(pieces) => pieces
                .iter()
                .map(|piece| piece.iter().map(|v| scalar_text(v).unwrap_or_default()).collect())
                .collect(),
            None => return Ok(None),
        };

        let mut solution_pieces: Vec<Vec<EntryRef>> = Vec::with_capacity(raw_pieces.len());
        for (i, piece) in raw_pieces.iter().enumerate() {
            if piece.len() != shape.sides() {
                return Err(GenerateError::layout(
                    typename,
                    format!(
                        "piece {} of {cards_key} has {} entries instead of {}",
                        i + 1,
                        piece.len(),
                        shape.sides()
                    ),
                ));
            }
            let refs: Vec<EntryRef> = piece
                .iter()
                .map(|reference| {
                    reference.parse::<EntryRef>().map_err(|()| GenerateError::BadReference {
                        reference: reference.clone(),
                        table: cards_key.clone(),
                    })
                })
                .collect::<Result<Vec<EntryRef>, GenerateError>>()?;
            solution_pieces.push(refs);
        }

        let solution_key: String = format!("{prefix}SolutionOrientation");
        let solution_orientation: Vec<i32> = table::<Vec<i32>>(typename, values, &solution_key)?
            .ok_or_else(|| GenerateError::layout(typename, format!("missing {solution_key}")))?;

        let puzzle_key: String = format!("{prefix}PuzzleOrientation");
        let puzzle_orientation: Vec<(i32, i32)> =
            table::<Vec<[i32; 2]>>(typename, values, &puzzle_key)?
                .ok_or_else(|| GenerateError::layout(typename, format!("missing {puzzle_key}")))?
                .into_iter()
                .map(|[base, number]| (base, number))
                .collect();

        for (key, len) in [
            (&solution_key, solution_orientation.len()),
            (&puzzle_key, puzzle_orientation.len()),
        ] {
            if len != solution_pieces.len() {
                return Err(GenerateError::layout(
                    typename,
                    format!(
                        "{key} has {len} entries but {cards_key} has {} pieces",
                        solution_pieces.len()
                    ),
                ));
            }
        }

        debug!("Layout {typename}: {} {prefix} pieces", solution_pieces.len());
        Ok(Some(Self {
            shape,
            solution_pieces,
            solution_orientation,
            puzzle_orientation,
        }))
    }
}

/// Puzzle layout.
#[derive(Debug, Clone)]
pub struct Layout {
    /// Name of the puzzle type for the messages.
    pub typename: String,

    pub category: Category,

    /// Number of pairs the puzzle requires (0 for any non-zero number), or `None` if the puzzle
    /// does not accept pairs.
    pub pairs: Option<usize>,

    /// Number of edges the puzzle uses, or `None` if the puzzle does not accept edges.
    pub edges: Option<usize>,

    /// Number of cards the puzzle requires (0 for any non-zero number), or `None` if the puzzle
    /// does not accept cards.
    pub cards: Option<usize>,

    /// Triangle pieces.
    pub triangles: Option<ShapeLayout>,

    /// Square pieces.
    pub squares: Option<ShapeLayout>,

    /// The whole file, for the option lookups.
    pub values: Mapping,
}

impl Layout {
    /// Parse the layout file for the given puzzle type.
    pub fn parse(puzzle_type: &str, text: &str) -> Result<Self, GenerateError> {
        let values: Mapping = match serde_yaml::from_str::<Value>(text) {
            Ok(Value::Mapping(map)) => map,
            Ok(_) => {
                return Err(GenerateError::layout(
                    puzzle_type,
                    "the layout file must be a YAML mapping",
                ));
            }
            Err(source) => {
                return Err(GenerateError::Yaml {
                    what: format!("puzzle layout file {puzzle_type}-layout.yaml"),
                    source,
                });
            }
        };

        let typename: String = map_get(&values, "typename")
            .and_then(scalar_text)
            .unwrap_or_else(|| puzzle_type.to_string());

        let category_name: String = map_get(&values, "category")
            .and_then(scalar_text)
            .unwrap_or_default();
        let category: Category =
            category_name
                .parse::<Category>()
                .map_err(|category| GenerateError::UnknownCategory {
                    typename: typename.clone(),
                    category,
                })?;

        let pairs: Option<usize> = table::<usize>(&typename, &values, "pairs")?;
        let edges: Option<usize> = table::<usize>(&typename, &values, "edges")?;
        let cards: Option<usize> = table::<usize>(&typename, &values, "cards")?;

        let (triangles, squares) = if category == Category::Jigsaw {
            (
                ShapeLayout::parse(Shape::Triangle, &typename, &values)?,
                ShapeLayout::parse(Shape::Square, &typename, &values)?,
            )
        } else {
            (None, None)
        };

        Ok(Self {
            typename,
            category,
            pairs,
            edges,
            cards,
            triangles,
            squares,
            values,
        })
    }

    /// Return the shapes of the jigsaw pieces, triangles first.
    pub fn shapes(&self) -> impl Iterator<Item = &ShapeLayout> {
        self.triangles.iter().chain(self.squares.iter())
    }

    /// Verify that every entry reference points to an existing pair or edge.
    pub fn check_references(&self, num_pairs: usize, num_edges: usize) -> Result<(), GenerateError> {
        for shape in self.shapes() {
            for reference in shape.solution_pieces.iter().flatten() {
                let available: usize = match reference.role {
                    Role::Question | Role::Answer => num_pairs,
                    Role::Edge => num_edges,
                };
                if reference.index >= available {
                    return Err(GenerateError::ReferenceOutOfRange {
                        typename: self.typename.clone(),
                        reference: reference.to_string(),
                        table: format!("{}SolutionCards", shape.shape.layout_prefix()),
                        available,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Read and convert a layout key.
fn table<T: DeserializeOwned>(
    typename: &str,
    values: &Mapping,
    key: &str,
) -> Result<Option<T>, GenerateError> {
    match map_get(values, key) {
        None => Ok(None),
        Some(value) => serde_yaml::from_value::<T>(value.clone())
            .map(Some)
            .map_err(|e| GenerateError::layout(typename, format!("invalid {key}: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = "
typename: Small
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
";

    #[test]
    fn parse_entry_references() {
        assert_eq!(
            "Q3".parse::<EntryRef>(),
            Ok(EntryRef {
                role: Role::Question,
                index: 2
            })
        );
        assert_eq!(
            "E12".parse::<EntryRef>(),
            Ok(EntryRef {
                role: Role::Edge,
                index: 11
            })
        );
        assert!("X1".parse::<EntryRef>().is_err());
        assert!("Q0".parse::<EntryRef>().is_err());
        assert!("Q".parse::<EntryRef>().is_err());
        assert_eq!("A7".parse::<EntryRef>().map(|r| r.to_string()), Ok("A7".to_string()));
    }

    #[test]
    fn parse_jigsaw_layout() {
        let layout: Layout = Layout::parse("small", SMALL).expect("cannot parse layout");
        assert_eq!(layout.typename, "Small");
        assert_eq!(layout.category, Category::Jigsaw);
        assert_eq!(layout.pairs, Some(2));
        assert_eq!(layout.cards, None);
        let triangles: &ShapeLayout = layout.triangles.as_ref().expect("no triangles");
        assert_eq!(triangles.len(), 2);
        assert_eq!(triangles.puzzle_orientation[1], (180, -30));
        assert!(layout.squares.is_none());
        assert!(layout.check_references(2, 2).is_ok());
    }

    #[test]
    fn out_of_range_reference() {
        let layout: Layout = Layout::parse("small", SMALL).expect("cannot parse layout");
        match layout.check_references(1, 2) {
            Err(GenerateError::ReferenceOutOfRange { reference, .. }) => {
                assert_eq!(reference, "Q2")
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn unknown_prefix_is_rejected_at_load_time() {
        let text: String = SMALL.replace("E2]", "Z2]");
        assert!(matches!(
            Layout::parse("small", &text),
            Err(GenerateError::BadReference { .. })
        ));
    }

    #[test]
    fn orientation_length_mismatch() {
        let text: String = SMALL.replace("[0, 180]", "[0]");
        assert!(matches!(
            Layout::parse("small", &text),
            Err(GenerateError::Layout { .. })
        ));
    }

    #[test]
    fn unknown_category() {
        assert!(matches!(
            Layout::parse("x", "category: crossword\n"),
            Err(GenerateError::UnknownCategory { .. })
        ));
    }
}
