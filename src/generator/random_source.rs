/*
random_source.rs

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

//! Random sequence shared by all the shuffling, flipping, and rotating steps.
//!
//! A generation run uses a single [`RandomSource`] object, seeded from the puzzle title, and
//! passes it explicitly to every step. The draws are consumed in a fixed order (shuffle pairs,
//! shuffle edges, flip pairs, then the pieces or the cards), so identical input files produce
//! identical documents.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// Source of uniformly distributed random integers.
pub trait RandomSource {
    /// Return an integer in `0..bound`.
    ///
    /// `bound` is never zero.
    fn below(&mut self, bound: usize) -> usize;

    /// Return `true` or `false` with the same probability.
    fn coin(&mut self) -> bool {
        self.below(2) == 1
    }

    /// Shuffle the given slice in place (Fisher-Yates, from the end of the slice).
    fn shuffle<T>(&mut self, items: &mut [T])
    where
        Self: Sized,
    {
        for i in (1..items.len()).rev() {
            let j: usize = self.below(i + 1);
            items.swap(i, j);
        }
    }

    /// Return a random permutation of `0..len`.
    fn permutation(&mut self, len: usize) -> Vec<usize>
    where
        Self: Sized,
    {
        let mut order: Vec<usize> = (0..len).collect();
        self.shuffle(&mut order);
        order
    }
}

/// Random source seeded from the puzzle title.
pub struct TitleSeeded {
    rng: StdRng,
}

impl TitleSeeded {
    /// Create a [`TitleSeeded`] object for the given title.
    pub fn new(title: &str) -> Self {
        Self {
            rng: StdRng::seed_from_u64(title_seed(title)),
        }
    }
}

impl RandomSource for TitleSeeded {
    fn below(&mut self, bound: usize) -> usize {
        self.rng.random_range(0..bound)
    }
}

/// Compute the 64-bit FNV-1a hash of the title.
///
/// The standard library hashers are not guaranteed to stay the same between Rust releases,
/// which would change the layouts of existing puzzles.
pub fn title_seed(title: &str) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    title.bytes().fold(OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(PRIME)
    })
}

/// Random source that replays a fixed list of draws.
///
/// Each draw is reduced modulo the requested bound. Once the list is exhausted, the source
/// returns zero.
#[derive(Debug, Default, Clone)]
pub struct Scripted {
    draws: VecDeque<usize>,

    /// Bounds requested so far, in order.
    pub bounds: Vec<usize>,
}

impl Scripted {
    /// Create a [`Scripted`] object from the list of draws.
    pub fn new(draws: &[usize]) -> Self {
        Self {
            draws: draws.iter().copied().collect(),
            bounds: Vec::new(),
        }
    }
}

impl RandomSource for Scripted {
    fn below(&mut self, bound: usize) -> usize {
        self.bounds.push(bound);
        self.draws.pop_front().unwrap_or(0) % bound
    }
}
