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
//! Helices: ordered containers of paired base positions.

use crate::bases::BaseId;
use std::collections::BTreeMap;

/// The two bases occupying one position of a helix.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BasePair {
    pub forward: BaseId,
    pub backward: BaseId,
}

/// One of the two directional ends of a helix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelixEnd {
    /// The low-index end, 5' for the forward rail.
    Prime5,
    /// The high-index end, 3' for the forward rail.
    Prime3,
}

/// A helix: a run of base pairs with contiguous positions starting at 0.
///
/// The helix only records which bases occupy which position; the bases
/// themselves live in the design's arena.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Helix {
    pub(crate) positions: Vec<BasePair>,
}

impl Helix {
    pub fn nb_positions(&self) -> usize {
        self.positions.len()
    }

    pub fn pair_at(&self, position: usize) -> Option<&BasePair> {
        self.positions.get(position)
    }

    pub fn pairs(&self) -> impl Iterator<Item = &BasePair> {
        self.positions.iter()
    }

    /// All bases of the helix, forward rail then backward rail per position.
    pub fn bases(&self) -> impl Iterator<Item = BaseId> + '_ {
        self.positions
            .iter()
            .flat_map(|pair| std::iter::once(pair.forward).chain(std::iter::once(pair.backward)))
    }
}

/// A structure maping helices identifier to `Helix` objects
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Helices(pub(crate) BTreeMap<usize, Helix>);

impl Helices {
    // Collection methods
    //============================================================================================
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, id: &usize) -> Option<&Helix> {
        self.0.get(id)
    }

    pub fn get_mut(&mut self, id: &usize) -> Option<&mut Helix> {
        self.0.get_mut(id)
    }

    pub fn contains_key(&self, id: &usize) -> bool {
        self.0.contains_key(id)
    }

    pub fn insert(&mut self, key: usize, helix: Helix) -> Option<Helix> {
        self.0.insert(key, helix)
    }

    pub fn remove(&mut self, key: &usize) -> Option<Helix> {
        self.0.remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &usize> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&usize, &Helix)> {
        self.0.iter()
    }

    pub fn values(&self) -> impl Iterator<Item = &Helix> {
        self.0.values()
    }

    /// Insert `helix` under the smallest unused identifier and return it.
    pub fn push(&mut self, helix: Helix) -> usize {
        let id = self.0.keys().max().map(|m| m + 1).unwrap_or(0);
        self.0.insert(id, helix);
        id
    }
    //============================================================================================
}
