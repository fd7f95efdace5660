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
//! Duplication of a set of helices as an isolated copy of the subgraph they
//! span.
//!
//! The copy happens in two phases. The clone phase allocates, per source
//! helix, an unlinked copy of its bases while building the source to clone
//! correspondence table. The relink phase then replays every edge whose two
//! endpoints belong to the duplicated set onto the clones; edges leaving the
//! set are dropped, so the copy never points into the original. Both phases
//! report progress per helix and honor cooperative cancellation.

use crate::progress::{Phase, ProgressReporter, Progression};
use crate::{Atomicity, ErrOperation, OperationKind, Outcome};
use ahash::AHashMap;
use nanobase_design::{BaseId, Design, TakenHelix};

/// Undo record of one cloned helix: which helix to take back out.
#[derive(Debug)]
pub struct DuplicateUndo {
    new_helix: usize,
}

/// Redo record of one cloned helix: the taken content, reinstated verbatim so
/// that redo reproduces the same identifiers and the same decorations.
#[derive(Debug)]
pub struct DuplicateRedo {
    new_helix: usize,
    taken: TakenHelix,
}

/// Clone every helix of the batch and rewire the clones among themselves.
pub struct Duplicate {
    reporter: Box<dyn ProgressReporter>,
    /// Source base to clone base, across the whole batch.
    table: AHashMap<BaseId, BaseId>,
    /// Per source helix, the (source, clone) pairs produced by its clone.
    mappings: AHashMap<usize, Vec<(BaseId, BaseId)>>,
}

impl Duplicate {
    pub fn new(reporter: Box<dyn ProgressReporter>) -> Self {
        Self {
            reporter,
            table: AHashMap::new(),
            mappings: AHashMap::new(),
        }
    }

    /// The source base to clone base correspondence built during execution.
    pub fn base_mapping(&self) -> &AHashMap<BaseId, BaseId> {
        &self.table
    }
}

impl OperationKind for Duplicate {
    type Element = usize;
    type UndoData = DuplicateUndo;
    type RedoData = DuplicateRedo;

    const LABEL: &'static str = "duplicate";
    const ATOMICITY: Atomicity = Atomicity::WholeBatch;

    fn begin_batch(
        &mut self,
        design: &mut Design,
        elements: &[usize],
    ) -> Result<(), ErrOperation> {
        for &h_id in elements {
            if design.helices.get(&h_id).is_none() {
                return Err(nanobase_design::ErrDesign::HelixDoesNotExist(h_id).into());
            }
        }
        self.reporter.start(Phase::Clone, elements.len());
        Ok(())
    }

    fn execute_one(
        &mut self,
        design: &mut Design,
        src: usize,
    ) -> Result<Outcome<DuplicateUndo>, ErrOperation> {
        let (new_helix, mapping) = design.clone_helix_bases(src)?;
        if self.reporter.step() == Progression::Stop {
            // Undo the local clone before reporting the cancellation; the
            // driver rolls back the earlier elements.
            design.take_helix(new_helix)?;
            return Err(ErrOperation::Cancelled);
        }
        self.table.extend(mapping.iter().copied());
        self.mappings.insert(src, mapping);
        Ok(Outcome::Done(DuplicateUndo { new_helix }))
    }

    fn finish_batch(
        &mut self,
        design: &mut Design,
        undo_log: &[(usize, DuplicateUndo)],
    ) -> Result<(), ErrOperation> {
        self.reporter.done();
        self.reporter.start(Phase::Relink, undo_log.len());
        for (src, _) in undo_log {
            if let Some(mapping) = self.mappings.get(src) {
                for &(old, new) in mapping {
                    let target = design.get_base(old).and_then(|b| b.forward());
                    if let Some(target) = target {
                        // Edges leaving the duplicated set are not replayed.
                        if let Some(&clone_target) = self.table.get(&target) {
                            design.set_forward_link(new, clone_target)?;
                        }
                    }
                }
            }
            if self.reporter.step() == Progression::Stop {
                return Err(ErrOperation::Cancelled);
            }
        }
        self.reporter.done();
        Ok(())
    }

    fn undo_one(
        &mut self,
        design: &mut Design,
        _src: usize,
        undo: DuplicateUndo,
    ) -> Result<DuplicateRedo, ErrOperation> {
        let taken = design.take_helix(undo.new_helix)?;
        Ok(DuplicateRedo {
            new_helix: undo.new_helix,
            taken,
        })
    }

    fn redo_one(
        &mut self,
        design: &mut Design,
        _src: usize,
        redo: DuplicateRedo,
    ) -> Result<DuplicateUndo, ErrOperation> {
        design.restore_helix(redo.new_helix, redo.taken)?;
        Ok(DuplicateUndo {
            new_helix: redo.new_helix,
        })
    }
}
