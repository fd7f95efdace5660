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
//! Edge rewiring: the `Connect` and `Disconnect` operations.
//!
//! Connecting (source, target) may displace an existing edge on either side;
//! the displacement is captured in the undo data so that undo restores the
//! displaced edge instead of merely unlinking. After a rewire, the materials
//! of every touched strand are re-derived (coloring is a view over the graph,
//! recomputing it avoids staleness); the recolor is part of the same undo
//! unit.
//!
//! Both operations are whole-batch atomic: a failed element rolls the batch
//! back.

use crate::paint::{repaint, swap_materials, FreshMaterials};
use crate::{Atomicity, ErrOperation, OperationKind, Outcome};
use ahash::AHashSet;
use nanobase_design::{BaseId, Design, ErrDesign, Material, Strand};

/// The per-element record of an edge rewire: which edges were in place before
/// (or after, for redo data), and the materials the rewire overwrote (or
/// assigned).
#[derive(Debug)]
pub struct ConnectRecord {
    /// Previous forward target of the source, displaced by the connect.
    source_prev: Option<BaseId>,
    /// Previous backward partner of the target, whose forward edge was
    /// displaced by the connect.
    target_prev: Option<BaseId>,
    repaint: Vec<(BaseId, Material)>,
}

/// Attach the forward link of each (source, target) pair of the batch.
pub struct Connect {
    materials: FreshMaterials,
}

impl Connect {
    pub fn new(materials: FreshMaterials) -> Self {
        Self { materials }
    }
}

impl OperationKind for Connect {
    type Element = (BaseId, BaseId);
    type UndoData = ConnectRecord;
    type RedoData = ConnectRecord;

    const LABEL: &'static str = "connect";
    const ATOMICITY: Atomicity = Atomicity::WholeBatch;

    fn execute_one(
        &mut self,
        design: &mut Design,
        (source, target): (BaseId, BaseId),
    ) -> Result<Outcome<ConnectRecord>, ErrOperation> {
        if source == target {
            return Err(ErrOperation::SelfConnection(source));
        }
        if !design.has_base(source) {
            return Err(ErrDesign::BaseDoesNotExist(source).into());
        }
        if !design.has_base(target) {
            return Err(ErrDesign::BaseDoesNotExist(target).into());
        }
        if design.get_base(source).and_then(|b| b.forward()) == Some(target) {
            // The requested edge already exists.
            return Ok(Outcome::Skipped);
        }
        let source_prev = design.clear_forward_link(source)?;
        let target_prev = match design.get_base(target).and_then(|b| b.backward()) {
            Some(prev) => {
                design.clear_forward_link(prev)?;
                Some(prev)
            }
            None => None,
        };
        design.set_forward_link(source, target)?;
        let repaint = repaint_touched(
            design,
            &self.materials,
            &[Some(source), source_prev, target_prev],
        );
        Ok(Outcome::Done(ConnectRecord {
            source_prev,
            target_prev,
            repaint,
        }))
    }

    fn undo_one(
        &mut self,
        design: &mut Design,
        (source, target): (BaseId, BaseId),
        undo: ConnectRecord,
    ) -> Result<ConnectRecord, ErrOperation> {
        match design.clear_forward_link(source)? {
            Some(t) if t == target => {}
            _ => return Err(ErrOperation::GraphChanged(source)),
        }
        if let Some(old_target) = undo.source_prev {
            design.set_forward_link(source, old_target)?;
        }
        if let Some(old_source) = undo.target_prev {
            design.set_forward_link(old_source, target)?;
        }
        let assigned = swap_materials(design, undo.repaint)?;
        Ok(ConnectRecord {
            source_prev: undo.source_prev,
            target_prev: undo.target_prev,
            repaint: assigned,
        })
    }

    fn redo_one(
        &mut self,
        design: &mut Design,
        (source, target): (BaseId, BaseId),
        redo: ConnectRecord,
    ) -> Result<ConnectRecord, ErrOperation> {
        if design.clear_forward_link(source)? != redo.source_prev {
            return Err(ErrOperation::GraphChanged(source));
        }
        let backward = design
            .get_base(target)
            .ok_or(ErrOperation::GraphChanged(target))?
            .backward();
        if backward != redo.target_prev {
            return Err(ErrOperation::GraphChanged(target));
        }
        if let Some(old_source) = redo.target_prev {
            design.clear_forward_link(old_source)?;
        }
        design.set_forward_link(source, target)?;
        let priors = swap_materials(design, redo.repaint)?;
        Ok(ConnectRecord {
            source_prev: redo.source_prev,
            target_prev: redo.target_prev,
            repaint: priors,
        })
    }
}

/// The per-element record of a disconnect.
#[derive(Debug)]
pub struct DisconnectRecord {
    target: BaseId,
    repaint: Vec<(BaseId, Material)>,
}

/// Detach the forward link of each base of the batch.
///
/// Disconnecting a base with no forward link is a success no-op: the element
/// is skipped, not recorded and not failed, which keeps the operation
/// idempotent under repeated host commands.
pub struct Disconnect {
    materials: FreshMaterials,
}

impl Disconnect {
    pub fn new(materials: FreshMaterials) -> Self {
        Self { materials }
    }
}

impl OperationKind for Disconnect {
    type Element = BaseId;
    type UndoData = DisconnectRecord;
    type RedoData = DisconnectRecord;

    const LABEL: &'static str = "disconnect";
    const ATOMICITY: Atomicity = Atomicity::WholeBatch;

    fn execute_one(
        &mut self,
        design: &mut Design,
        source: BaseId,
    ) -> Result<Outcome<DisconnectRecord>, ErrOperation> {
        if !design.has_base(source) {
            return Err(ErrDesign::BaseDoesNotExist(source).into());
        }
        let target = match design.clear_forward_link(source)? {
            None => return Ok(Outcome::Skipped),
            Some(t) => t,
        };
        let repaint = repaint_touched(design, &self.materials, &[Some(source), Some(target)]);
        Ok(Outcome::Done(DisconnectRecord { target, repaint }))
    }

    fn undo_one(
        &mut self,
        design: &mut Design,
        source: BaseId,
        undo: DisconnectRecord,
    ) -> Result<DisconnectRecord, ErrOperation> {
        design.set_forward_link(source, undo.target)?;
        let assigned = swap_materials(design, undo.repaint)?;
        Ok(DisconnectRecord {
            target: undo.target,
            repaint: assigned,
        })
    }

    fn redo_one(
        &mut self,
        design: &mut Design,
        source: BaseId,
        redo: DisconnectRecord,
    ) -> Result<DisconnectRecord, ErrOperation> {
        match design.clear_forward_link(source)? {
            Some(t) if t == redo.target => {}
            _ => return Err(ErrOperation::GraphChanged(source)),
        }
        let priors = swap_materials(design, redo.repaint)?;
        Ok(DisconnectRecord {
            target: redo.target,
            repaint: priors,
        })
    }
}

/// Re-derive the material of every strand holding one of the candidate bases,
/// one fresh material per strand. Returns the overwritten materials.
fn repaint_touched(
    design: &mut Design,
    materials: &FreshMaterials,
    candidates: &[Option<BaseId>],
) -> Vec<(BaseId, Material)> {
    let mut priors = Vec::new();
    let mut painted: AHashSet<BaseId> = AHashSet::new();
    for &candidate in candidates.iter().flatten() {
        if painted.contains(&candidate) || !design.has_base(candidate) {
            continue;
        }
        let members = Strand::new(candidate).members(design);
        let material = materials.next();
        priors.extend(repaint(design, &members, material));
        painted.extend(members);
    }
    priors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Operation;
    use nanobase_design::Label;

    fn rail(design: &Design, h: usize) -> Vec<BaseId> {
        (0..design.helices.get(&h).unwrap().nb_positions())
            .map(|p| design.helices.get(&h).unwrap().pair_at(p).unwrap().forward)
            .collect()
    }

    /// Observational state of every live base: links, label, material.
    fn snapshot(design: &Design) -> Vec<(BaseId, Option<BaseId>, Option<BaseId>, Label, Material)> {
        design
            .bases()
            .map(|(id, b)| (id, b.forward(), b.backward(), b.label(), b.material()))
            .collect()
    }

    fn connect_op() -> Operation<Connect> {
        Operation::new(Connect::new(FreshMaterials::new()))
    }

    fn disconnect_op() -> Operation<Disconnect> {
        Operation::new(Disconnect::new(FreshMaterials::new()))
    }

    #[test]
    fn connect_sets_both_sides_and_undo_clears_them() {
        let mut design = Design::new();
        let h1 = design.add_helix(3, true).unwrap();
        let h2 = design.add_helix(3, true).unwrap();
        let source = rail(&design, h1)[2];
        let target = rail(&design, h2)[0];
        let before = snapshot(&design);

        let mut op = connect_op();
        op.execute(&mut design, &[(source, target)]).unwrap();
        assert_eq!(design.get_base(source).unwrap().forward(), Some(target));
        assert_eq!(design.get_base(target).unwrap().backward(), Some(source));
        // The merged strand spans both helices.
        assert_eq!(Strand::new(source).length(&design), 6);

        op.undo(&mut design).unwrap();
        assert_eq!(snapshot(&design), before);
    }

    #[test]
    fn connect_displacing_edges_restores_them_on_undo() {
        let mut design = Design::new();
        let h1 = design.add_helix(3, true).unwrap();
        let h2 = design.add_helix(3, true).unwrap();
        let r1 = rail(&design, h1);
        let r2 = rail(&design, h2);
        // Source sits mid-strand (its forward edge will be displaced) and the
        // target does too (the edge into it will be displaced).
        let source = r1[1];
        let target = r2[1];
        let before = snapshot(&design);

        let mut op = connect_op();
        op.execute(&mut design, &[(source, target)]).unwrap();
        assert_eq!(design.get_base(source).unwrap().forward(), Some(target));
        // Both displaced edges are gone.
        assert!(design.get_base(r1[2]).unwrap().backward().is_none());
        assert!(design.get_base(r2[0]).unwrap().forward().is_none());

        op.undo(&mut design).unwrap();
        // The displaced edges are back, not merely unlinked.
        assert_eq!(snapshot(&design), before);
        assert_eq!(design.get_base(source).unwrap().forward(), Some(r1[2]));
        assert_eq!(design.get_base(r2[0]).unwrap().forward(), Some(target));
    }

    #[test]
    fn redo_reproduces_execute_exactly() {
        let mut design = Design::new();
        let h1 = design.add_helix(3, true).unwrap();
        let h2 = design.add_helix(3, true).unwrap();
        let source = rail(&design, h1)[1];
        let target = rail(&design, h2)[1];

        let mut op = connect_op();
        op.execute(&mut design, &[(source, target)]).unwrap();
        let after_execute = snapshot(&design);
        op.undo(&mut design).unwrap();
        op.redo(&mut design).unwrap();
        // Same links and same materials: the repaint is replayed from the
        // record, not re-derived with fresh colors.
        assert_eq!(snapshot(&design), after_execute);
    }

    #[test]
    fn failed_batch_leaves_no_trace() {
        let mut design = Design::new();
        let h1 = design.add_helix(3, true).unwrap();
        let h2 = design.add_helix(3, true).unwrap();
        let source = rail(&design, h1)[2];
        let target = rail(&design, h2)[0];
        let bad = rail(&design, h2)[2];
        let before = snapshot(&design);

        let mut op = connect_op();
        let result = op.execute(&mut design, &[(source, target), (bad, bad)]);
        assert!(matches!(result, Err(ErrOperation::SelfConnection(_))));
        // The first pair was rolled back with the batch.
        assert_eq!(snapshot(&design), before);
        assert!(!op.has_effect());
    }

    #[test]
    fn connect_repaints_the_merged_strand_uniformly() {
        let mut design = Design::new();
        let h1 = design.add_helix(2, true).unwrap();
        let h2 = design.add_helix(2, true).unwrap();
        let r1 = rail(&design, h1);
        let r2 = rail(&design, h2);
        for &b in &r1 {
            design.get_base_mut(b).unwrap().set_material(Material(1));
        }
        for &b in &r2 {
            design.get_base_mut(b).unwrap().set_material(Material(2));
        }

        let mut op = connect_op();
        op.execute(&mut design, &[(r1[1], r2[0])]).unwrap();
        let merged = design.get_base(r1[0]).unwrap().material();
        for &b in r1.iter().chain(r2.iter()) {
            assert_eq!(design.get_base(b).unwrap().material(), merged);
        }
        assert_ne!(merged, Material(1));
        assert_ne!(merged, Material(2));

        op.undo(&mut design).unwrap();
        for &b in &r1 {
            assert_eq!(design.get_base(b).unwrap().material(), Material(1));
        }
        for &b in &r2 {
            assert_eq!(design.get_base(b).unwrap().material(), Material(2));
        }
    }

    #[test]
    fn disconnect_on_unlinked_base_is_a_success_noop() {
        let mut design = Design::new();
        let h = design.add_helix(2, true).unwrap();
        let end = rail(&design, h)[1];
        assert!(design.get_base(end).unwrap().forward().is_none());

        let mut op = disconnect_op();
        let report = op.execute(&mut design, &[end]).unwrap();
        assert_eq!(report.applied, 0);
        assert_eq!(report.skipped, 1);
        assert!(report.is_full_success());
        assert!(!op.has_effect());
    }

    #[test]
    fn disconnect_undo_redo_preserves_loop_detection() {
        let mut design = Design::new();
        let h = design.add_helix(4, true).unwrap();
        let bases = rail(&design, h);
        design.set_forward_link(bases[3], bases[0]).unwrap();
        assert!(Strand::new(bases[1]).is_loop(&design));

        let mut op = disconnect_op();
        op.execute(&mut design, &[bases[3]]).unwrap();
        assert!(!Strand::new(bases[1]).is_loop(&design));
        let after_execute = snapshot(&design);

        op.undo(&mut design).unwrap();
        assert!(Strand::new(bases[1]).is_loop(&design));
        assert_eq!(Strand::new(bases[2]).length(&design), 4);

        op.redo(&mut design).unwrap();
        assert_eq!(snapshot(&design), after_execute);
    }

    #[test]
    fn connecting_the_two_ends_of_a_strand_makes_a_loop() {
        let mut design = Design::new();
        let h = design.add_helix(5, true).unwrap();
        let bases = rail(&design, h);
        let mut op = connect_op();
        op.execute(&mut design, &[(bases[4], bases[0])]).unwrap();
        for &b in &bases {
            assert!(Strand::new(b).is_loop(&design));
            assert_eq!(Strand::new(b).length(&design), 5);
        }
        op.undo(&mut design).unwrap();
        assert!(!Strand::new(bases[0]).is_loop(&design));
    }
}
