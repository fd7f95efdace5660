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
//! The atomic elements of a design: bases and the arena that owns them.
//!
//! Bases are identified by `BaseId` handles into a `BaseArena`. Arena slots are
//! tombstoned when a base is destroyed and are never reused, so a handle stays
//! comparable for the whole editing session and resolves to `None` once its
//! base is gone.

use crate::utils::*;

/// A stable handle identifying one base of a design.
///
/// Handles compare and hash by identity (the arena slot they denote), never by
/// the value of the base they point to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BaseId(pub(crate) usize);

impl std::fmt::Display for BaseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "base#{}", self.0)
    }
}

/// The nucleotide label carried by a base.
///
/// Any character can be stored; characters outside the canonical alphabet are
/// kept opaque, validation being the business of the calling application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Label {
    A,
    C,
    G,
    T,
    Other(char),
    Unset,
}

impl Default for Label {
    fn default() -> Self {
        Label::Unset
    }
}

impl Label {
    /// Canonical nucleotides are recognized in either case; any other
    /// character is stored as written.
    pub fn from_char(c: char) -> Self {
        match c.to_ascii_uppercase() {
            'A' => Label::A,
            'C' => Label::C,
            'G' => Label::G,
            'T' => Label::T,
            _ => Label::Other(c),
        }
    }

    pub fn to_char(self) -> Option<char> {
        match self {
            Label::A => Some('A'),
            Label::C => Some('C'),
            Label::G => Some('G'),
            Label::T => Some('T'),
            Label::Other(c) => Some(c),
            Label::Unset => None,
        }
    }

    pub fn is_set(self) -> bool {
        !matches!(self, Label::Unset)
    }
}

/// The material (a color) with which a base is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Material(pub u32);

/// The rail of a helix on which a base sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HelixSide {
    Forward,
    Backward,
}

impl HelixSide {
    pub(crate) fn short_name(self) -> &'static str {
        match self {
            HelixSide::Forward => "fwd",
            HelixSide::Backward => "bwd",
        }
    }
}

/// One base of the design.
///
/// The `forward`/`backward` links are only ever written through
/// `Design::set_forward_link` and `Design::clear_forward_link`, which maintain
/// link symmetry on both endpoints. The `pair` link is fixed at creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Base {
    #[serde(default, skip_serializing_if = "label_is_unset")]
    label: Label,
    #[serde(default, skip_serializing_if = "material_is_default")]
    material: Material,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) forward: Option<BaseId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) backward: Option<BaseId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) pair: Option<BaseId>,
    helix: usize,
    pub(crate) position: usize,
    side: HelixSide,
}

impl Base {
    pub(crate) fn new(helix: usize, position: usize, side: HelixSide) -> Self {
        Self {
            label: Label::Unset,
            material: Material::default(),
            forward: None,
            backward: None,
            pair: None,
            helix,
            position,
            side,
        }
    }

    pub fn label(&self) -> Label {
        self.label
    }

    pub fn set_label(&mut self, label: Label) {
        self.label = label;
    }

    pub fn material(&self) -> Material {
        self.material
    }

    pub fn set_material(&mut self, material: Material) {
        self.material = material;
    }

    /// The next base on the strand, in the 5' to 3' direction.
    pub fn forward(&self) -> Option<BaseId> {
        self.forward
    }

    /// The previous base on the strand, in the 5' to 3' direction.
    pub fn backward(&self) -> Option<BaseId> {
        self.backward
    }

    /// The complementary base on the opposite rail of the owning helix.
    pub fn pair(&self) -> Option<BaseId> {
        self.pair
    }

    pub fn helix(&self) -> usize {
        self.helix
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn side(&self) -> HelixSide {
        self.side
    }
}

/// The owner of every base of a design.
///
/// Slots of destroyed bases stay in place as `None` so that handles are never
/// ambiguous: a dangling `BaseId` resolves to `None` instead of to an
/// unrelated, newer base.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BaseArena {
    slots: Vec<Option<Base>>,
    nb_live: usize,
}

impl BaseArena {
    pub(crate) fn alloc(&mut self, base: Base) -> BaseId {
        let id = BaseId(self.slots.len());
        self.slots.push(Some(base));
        self.nb_live += 1;
        id
    }

    pub fn get(&self, id: BaseId) -> Option<&Base> {
        self.slots.get(id.0).and_then(|slot| slot.as_ref())
    }

    pub(crate) fn get_mut(&mut self, id: BaseId) -> Option<&mut Base> {
        self.slots.get_mut(id.0).and_then(|slot| slot.as_mut())
    }

    pub fn contains(&self, id: BaseId) -> bool {
        self.get(id).is_some()
    }

    /// Tombstone the slot of `id`, returning the base it held.
    pub(crate) fn free(&mut self, id: BaseId) -> Option<Base> {
        let base = self.slots.get_mut(id.0).and_then(|slot| slot.take());
        if base.is_some() {
            self.nb_live -= 1;
        }
        base
    }

    /// Put a previously freed base back into its original slot.
    ///
    /// The slot must exist and be empty; used by operations whose undo removes
    /// bases that their redo must bring back under the same identity.
    pub(crate) fn reinstate(&mut self, id: BaseId, base: Base) -> Result<(), Base> {
        match self.slots.get_mut(id.0) {
            Some(slot @ None) => {
                *slot = Some(base);
                self.nb_live += 1;
                Ok(())
            }
            _ => Err(base),
        }
    }

    /// Number of live (non tombstoned) bases.
    pub fn nb_live(&self) -> usize {
        self.nb_live
    }

    pub fn iter(&self) -> impl Iterator<Item = (BaseId, &Base)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|b| (BaseId(i), b)))
    }
}
