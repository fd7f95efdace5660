/*
nanobase, a transactional editing core for DNA nanostructure designs.
    Copyright (C) 2026  The nanobase authors.

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU General Public License as published by
    the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU General Public License for more details.

    You should have received a copy of the GNU General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/
//! Host selections and their conversion into operation batches.
//!
//! A host holds a heterogeneous list of selected items; each operation only
//! cares about one item kind. The extraction helpers filter a selection down
//! to the element type of an operation, preserving the host's order and
//! dropping duplicates (a host may list the same item twice, operations must
//! not see it twice).

use ahash::AHashSet;
use nanobase_design::{BaseId, Design};

/// One selected item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Base(BaseId),
    Helix(usize),
    Nothing,
}

impl Selection {
    /// A short human readable description of the selected item.
    pub fn info(&self, design: &Design) -> String {
        match self {
            Selection::Base(id) => design
                .base_name(*id)
                .unwrap_or_else(|| format!("{} (dead)", id)),
            Selection::Helix(h_id) => format!("helix {}", h_id),
            Selection::Nothing => "nothing".to_string(),
        }
    }
}

/// The bases of a selection, in selection order, without duplicates.
pub fn extract_bases(selection: &[Selection]) -> Vec<BaseId> {
    let mut seen = AHashSet::new();
    selection
        .iter()
        .filter_map(|s| match s {
            Selection::Base(id) => Some(*id),
            _ => None,
        })
        .filter(|id| seen.insert(*id))
        .collect()
}

/// The helices of a selection, in selection order, without duplicates.
pub fn extract_helices(selection: &[Selection]) -> Vec<usize> {
    let mut seen = AHashSet::new();
    selection
        .iter()
        .filter_map(|s| match s {
            Selection::Helix(h_id) => Some(*h_id),
            _ => None,
        })
        .filter(|h_id| seen.insert(*h_id))
        .collect()
}
