/*
nanobase, a transactional editing core for DNA nanostructures.
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
//! This module defines the nanobase design format: a directed graph of bases
//! organized into helices. Run-time manipulation of designs is performed on a
//! `nanobase_design::Design` structure, through the operations of the
//! `nanobase_interactor` crate.
//!
//! The only code allowed to rewrite the forward/backward links of bases is
//! `Design::set_forward_link` / `Design::clear_forward_link`, so that the link
//! symmetry invariant (`a.forward == b` implies `b.backward == a`) is enforced
//! in a single place.

#[macro_use]
extern crate serde_derive;
extern crate serde;

use ahash::AHashSet;
use std::path::Path;

mod bases;
pub use bases::*;
mod helices;
pub use helices::*;
mod strands;
pub use strands::*;
pub mod utils;
use utils::default_version;

#[cfg(test)]
mod tests;

/// An error that occured when manipulating a design.
#[derive(Debug)]
pub enum ErrDesign {
    BaseDoesNotExist(BaseId),
    HelixDoesNotExist(usize),
    HelixAlreadyExists(usize),
    ZeroLengthHelix,
    SelfLink(BaseId),
    /// The link slot is already taken; connecting over it would leave a non
    /// reciprocal link behind.
    LinkOccupied {
        base: BaseId,
        current: BaseId,
    },
    /// The graph already violates link symmetry at this base.
    NonReciprocalLink {
        base: BaseId,
        forward: BaseId,
    },
    /// A base could not be put back into its original arena slot.
    SlotNotRestorable(BaseId),
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl From<std::io::Error> for ErrDesign {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for ErrDesign {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

/// The content of a helix removed with `Design::take_helix`, sufficient to
/// reinstate it under the same identities.
#[derive(Debug)]
pub struct TakenHelix {
    pub helix: Helix,
    pub bases: Vec<(BaseId, Base)>,
    /// Boundary edges that were severed by the removal, (source, target).
    pub severed: Vec<(BaseId, BaseId)>,
}

/// The `nanobase` Design structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Design {
    /// The collection of all helices used in this design.
    pub helices: Helices,
    /// The arena owning every base of the design.
    arena: BaseArena,
    #[serde(default = "default_version")]
    pub nanobase_version: String,
}

impl Default for Design {
    fn default() -> Self {
        Self::new()
    }
}

impl Design {
    pub fn new() -> Self {
        Self {
            helices: Helices::default(),
            arena: BaseArena::default(),
            nanobase_version: default_version(),
        }
    }

    // Base access
    //============================================================================================
    pub fn get_base(&self, id: BaseId) -> Option<&Base> {
        self.arena.get(id)
    }

    /// Mutable access to a base. Labels and materials may be edited through
    /// this; links cannot, they are private to the link mutators below.
    pub fn get_base_mut(&mut self, id: BaseId) -> Option<&mut Base> {
        self.arena.get_mut(id)
    }

    pub fn has_base(&self, id: BaseId) -> bool {
        self.arena.contains(id)
    }

    /// Number of live bases.
    pub fn nb_bases(&self) -> usize {
        self.arena.nb_live()
    }

    pub fn bases(&self) -> impl Iterator<Item = (BaseId, &Base)> {
        self.arena.iter()
    }

    /// A human readable name for a base, derived from its owning helix, rail
    /// and position. Names are computed, never stored.
    pub fn base_name(&self, id: BaseId) -> Option<String> {
        let base = self.arena.get(id)?;
        Some(format!(
            "h{}.{}[{}]",
            base.helix(),
            base.side().short_name(),
            base.position()
        ))
    }
    //============================================================================================

    // Helix lifecycle
    //============================================================================================
    /// Create a helix with `nb_positions` base pairs and return its identifier.
    ///
    /// When `linked` is true, the two rails are pre-chained: the forward rail
    /// runs 5' to 3' by increasing position, the backward rail by decreasing
    /// position. Importers typically want this; interactive creation starts
    /// unlinked.
    pub fn add_helix(&mut self, nb_positions: usize, linked: bool) -> Result<usize, ErrDesign> {
        if nb_positions == 0 {
            return Err(ErrDesign::ZeroLengthHelix);
        }
        let id = self.helices.keys().max().map(|m| m + 1).unwrap_or(0);
        let mut positions = Vec::with_capacity(nb_positions);
        for pos in 0..nb_positions {
            positions.push(self.alloc_pair(id, pos));
        }
        if linked {
            for w in positions.windows(2) {
                self.raw_link(w[0].forward, w[1].forward);
                self.raw_link(w[1].backward, w[0].backward);
            }
        }
        self.helices.insert(id, Helix { positions });
        Ok(id)
    }

    /// Append `nb_positions` base pairs at one end of helix `h_id`.
    ///
    /// The new pairs are chained among themselves and onto the previous end
    /// when its link slot is free, and the new end is left unlinked. Existing
    /// base handles stay valid; a 5' extension renumbers positions but never
    /// reallocates bases.
    pub fn extend_helix(
        &mut self,
        h_id: usize,
        end: HelixEnd,
        nb_positions: usize,
    ) -> Result<(), ErrDesign> {
        let old: Vec<BasePair> = self
            .helices
            .get(&h_id)
            .ok_or(ErrDesign::HelixDoesNotExist(h_id))?
            .pairs()
            .copied()
            .collect();
        if nb_positions == 0 {
            return Ok(());
        }
        match end {
            HelixEnd::Prime3 => {
                let mut fresh = Vec::with_capacity(nb_positions);
                for k in 0..nb_positions {
                    fresh.push(self.alloc_pair(h_id, old.len() + k));
                }
                for w in fresh.windows(2) {
                    self.raw_link(w[0].forward, w[1].forward);
                    self.raw_link(w[1].backward, w[0].backward);
                }
                if let Some(seam) = old.last() {
                    self.seam_link(seam.forward, fresh[0].forward);
                    self.seam_link(fresh[0].backward, seam.backward);
                }
                if let Some(helix) = self.helices.get_mut(&h_id) {
                    helix.positions.extend_from_slice(&fresh);
                }
            }
            HelixEnd::Prime5 => {
                // Shift the positions of the existing bases before the new
                // pairs take indices 0..nb_positions.
                for pair in &old {
                    for id in [pair.forward, pair.backward].iter() {
                        if let Some(base) = self.arena.get_mut(*id) {
                            base.position += nb_positions;
                        }
                    }
                }
                let mut fresh = Vec::with_capacity(nb_positions);
                for k in 0..nb_positions {
                    fresh.push(self.alloc_pair(h_id, k));
                }
                for w in fresh.windows(2) {
                    self.raw_link(w[0].forward, w[1].forward);
                    self.raw_link(w[1].backward, w[0].backward);
                }
                if let Some(seam) = old.first() {
                    self.seam_link(fresh[nb_positions - 1].forward, seam.forward);
                    self.seam_link(seam.backward, fresh[nb_positions - 1].backward);
                }
                if let Some(helix) = self.helices.get_mut(&h_id) {
                    fresh.extend_from_slice(&old);
                    helix.positions = fresh;
                }
            }
        }
        Ok(())
    }

    /// Destroy a helix and every base it owns. External edges pointing at the
    /// destroyed bases are disconnected on both sides.
    pub fn remove_helix(&mut self, h_id: usize) -> Result<(), ErrDesign> {
        self.take_helix(h_id).map(|_| ())
    }

    /// Remove a helix from the design while keeping ownership of its content,
    /// so that it can later be reinstated under the same identities (see
    /// `restore_helix`). Used by operations whose undo must be redoable
    /// without reallocating.
    ///
    /// Edges crossing the helix boundary are severed on both sides and
    /// reported as the third member of the returned tuple, in (source, target)
    /// orientation.
    pub fn take_helix(&mut self, h_id: usize) -> Result<TakenHelix, ErrDesign> {
        let helix = self
            .helices
            .remove(&h_id)
            .ok_or(ErrDesign::HelixDoesNotExist(h_id))?;
        let members: AHashSet<BaseId> = helix.bases().collect();
        let mut bases = Vec::with_capacity(members.len());
        let mut severed = Vec::new();
        for id in helix.bases() {
            if let Some(mut base) = self.arena.free(id) {
                // Sever edges crossing the helix boundary, on both sides.
                if let Some(target) = base.forward {
                    if !members.contains(&target) {
                        base.forward = None;
                        if let Some(neighbour) = self.arena.get_mut(target) {
                            neighbour.backward = None;
                        }
                        severed.push((id, target));
                    }
                }
                if let Some(source) = base.backward {
                    if !members.contains(&source) {
                        base.backward = None;
                        if let Some(neighbour) = self.arena.get_mut(source) {
                            neighbour.forward = None;
                        }
                        severed.push((source, id));
                    }
                }
                bases.push((id, base));
            }
        }
        Ok(TakenHelix {
            helix,
            bases,
            severed,
        })
    }

    /// Put back a helix previously removed with `take_helix`, under its
    /// original identifier and with its bases in their original arena slots.
    ///
    /// Severed boundary edges whose other endpoint is live again are relinked;
    /// edges whose endpoint is still gone are dropped with a log, never left
    /// dangling.
    pub fn restore_helix(&mut self, h_id: usize, taken: TakenHelix) -> Result<(), ErrDesign> {
        if self.helices.contains_key(&h_id) {
            return Err(ErrDesign::HelixAlreadyExists(h_id));
        }
        for (id, base) in taken.bases {
            self.arena
                .reinstate(id, base)
                .map_err(|_| ErrDesign::SlotNotRestorable(id))?;
        }
        self.helices.insert(h_id, taken.helix);
        for (source, target) in taken.severed {
            if self.arena.contains(source) && self.arena.contains(target) {
                self.set_forward_link(source, target)?;
            } else {
                log::debug!(
                    "dropping severed edge {} -> {}: endpoint no longer live",
                    source,
                    target
                );
            }
        }
        Ok(())
    }

    /// Allocate an unlinked copy of helix `src`: same position count, same
    /// labels and materials, fresh pair links, no forward/backward links.
    ///
    /// Returns the new helix identifier and the (source base, clone base)
    /// correspondence in position order; relinking the clones is the caller's
    /// business.
    pub fn clone_helix_bases(
        &mut self,
        src: usize,
    ) -> Result<(usize, Vec<(BaseId, BaseId)>), ErrDesign> {
        let old: Vec<BasePair> = self
            .helices
            .get(&src)
            .ok_or(ErrDesign::HelixDoesNotExist(src))?
            .pairs()
            .copied()
            .collect();
        let id = self.helices.keys().max().map(|m| m + 1).unwrap_or(0);
        let mut positions = Vec::with_capacity(old.len());
        let mut mapping = Vec::with_capacity(2 * old.len());
        for (pos, pair) in old.iter().enumerate() {
            let fresh = self.alloc_pair(id, pos);
            self.copy_decorations(pair.forward, fresh.forward);
            self.copy_decorations(pair.backward, fresh.backward);
            mapping.push((pair.forward, fresh.forward));
            mapping.push((pair.backward, fresh.backward));
            positions.push(fresh);
        }
        self.helices.insert(id, Helix { positions });
        Ok((id, mapping))
    }
    //============================================================================================

    // Link mutators, reserved to the edge rewiring operations
    //============================================================================================
    /// Set `source.forward = target` and `target.backward = source`.
    ///
    /// Both slots must be free: a connect that displaces an existing edge must
    /// clear it first, so that the displacement is recorded where it can be
    /// undone.
    pub fn set_forward_link(&mut self, source: BaseId, target: BaseId) -> Result<(), ErrDesign> {
        if source == target {
            return Err(ErrDesign::SelfLink(source));
        }
        let src = self
            .arena
            .get(source)
            .ok_or(ErrDesign::BaseDoesNotExist(source))?;
        if let Some(current) = src.forward {
            return Err(ErrDesign::LinkOccupied {
                base: source,
                current,
            });
        }
        let tgt = self
            .arena
            .get(target)
            .ok_or(ErrDesign::BaseDoesNotExist(target))?;
        if let Some(current) = tgt.backward {
            return Err(ErrDesign::LinkOccupied {
                base: target,
                current,
            });
        }
        self.raw_link(source, target);
        Ok(())
    }

    /// Clear the forward link of `source` and the matching backward link of
    /// its target. Returns the previous target, if any.
    pub fn clear_forward_link(&mut self, source: BaseId) -> Result<Option<BaseId>, ErrDesign> {
        let target = match self.arena.get(source) {
            None => return Err(ErrDesign::BaseDoesNotExist(source)),
            Some(base) => match base.forward {
                None => return Ok(None),
                Some(t) => t,
            },
        };
        match self.arena.get(target) {
            Some(tgt) if tgt.backward == Some(source) => {}
            _ => {
                return Err(ErrDesign::NonReciprocalLink {
                    base: source,
                    forward: target,
                })
            }
        }
        if let Some(base) = self.arena.get_mut(source) {
            base.forward = None;
        }
        if let Some(base) = self.arena.get_mut(target) {
            base.backward = None;
        }
        Ok(Some(target))
    }
    //============================================================================================

    // Persistence
    //============================================================================================
    pub fn to_json(&self) -> Result<String, ErrDesign> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, ErrDesign> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), ErrDesign> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ErrDesign> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
    //============================================================================================

    fn alloc_pair(&mut self, helix: usize, position: usize) -> BasePair {
        let forward = self.arena.alloc(Base::new(helix, position, HelixSide::Forward));
        let backward = self
            .arena
            .alloc(Base::new(helix, position, HelixSide::Backward));
        if let Some(base) = self.arena.get_mut(forward) {
            base.pair = Some(backward);
        }
        if let Some(base) = self.arena.get_mut(backward) {
            base.pair = Some(forward);
        }
        BasePair { forward, backward }
    }

    fn copy_decorations(&mut self, from: BaseId, to: BaseId) {
        let decorations = self.arena.get(from).map(|b| (b.label(), b.material()));
        if let Some((label, material)) = decorations {
            if let Some(base) = self.arena.get_mut(to) {
                base.set_label(label);
                base.set_material(material);
            }
        }
    }

    /// Creation-time linking: both slots are known to be free.
    fn raw_link(&mut self, source: BaseId, target: BaseId) {
        if let Some(base) = self.arena.get_mut(source) {
            base.forward = Some(target);
        }
        if let Some(base) = self.arena.get_mut(target) {
            base.backward = Some(source);
        }
    }

    /// Link across an extension seam, unless a pre-existing edge (a crossover
    /// leaving the old end) occupies one of the slots.
    fn seam_link(&mut self, source: BaseId, target: BaseId) {
        let free = self.arena.get(source).map_or(false, |b| b.forward.is_none())
            && self
                .arena
                .get(target)
                .map_or(false, |b| b.backward.is_none());
        if free {
            self.raw_link(source, target);
        } else {
            log::debug!(
                "extension seam {} -> {} left unlinked, slot occupied",
                source,
                target
            );
        }
    }

    #[cfg(test)]
    pub(crate) fn arena_mut(&mut self) -> &mut BaseArena {
        &mut self.arena
    }
}
