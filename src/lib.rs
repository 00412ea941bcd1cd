/*
lib.rs

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

//! Generate printable jigsaw, card-sort, and domino puzzles from YAML data files.
//!
//! The [`generator::generate`] function runs the whole pipeline for one data file. The
//! command-line front end lives in `main.rs`.

pub mod errors;
pub mod generator;
pub mod puzzle_data;
pub mod renderer;
pub mod resources;
pub mod saver;
pub mod settings;
