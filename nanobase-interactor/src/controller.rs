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
//! The session facade: one design, its operation history, and the session's
//! material source.
//!
//! Executed operations go on the undo stack only when they actually changed
//! something; a new mutation invalidates the redo stack. A consistency fault
//! during undo or redo means the recorded history no longer matches the
//! design, so both stacks are discarded rather than replayed further.

use crate::paint::FreshMaterials;
use crate::progress::ProgressReporter;
use crate::{
    ApplySequence, BatchReport, Connect, ConsistencyFault, Disconnect, Duplicate, ErrOperation,
    Operation, OperationKind, PaintStrand, ReversibleOperation,
};
use nanobase_design::{BaseId, Design, Material};

pub struct Controller {
    design: Design,
    undo_stack: Vec<Box<dyn ReversibleOperation>>,
    redo_stack: Vec<Box<dyn ReversibleOperation>>,
    materials: FreshMaterials,
}

impl Controller {
    pub fn new(design: Design) -> Self {
        Self {
            design,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            materials: FreshMaterials::new(),
        }
    }

    pub fn design(&self) -> &Design {
        &self.design
    }

    /// Direct mutable access to the design. Mutations made through this
    /// handle are invisible to the history; replaying an operation over them
    /// fails with a consistency fault instead of corrupting the graph.
    pub fn design_mut(&mut self) -> &mut Design {
        &mut self.design
    }

    /// Execute `kind` over `elements` and record it in the history if it had
    /// any effect.
    pub fn apply<K: OperationKind + 'static>(
        &mut self,
        kind: K,
        elements: &[K::Element],
    ) -> Result<BatchReport<K::Element>, ErrOperation> {
        let mut op = Operation::new(kind);
        let report = op.execute(&mut self.design, elements)?;
        if op.has_effect() {
            self.undo_stack.push(Box::new(op));
            self.redo_stack.clear();
        }
        Ok(report)
    }

    pub fn connect(
        &mut self,
        pairs: &[(BaseId, BaseId)],
    ) -> Result<BatchReport<(BaseId, BaseId)>, ErrOperation> {
        let materials = self.materials.clone();
        self.apply(Connect::new(materials), pairs)
    }

    pub fn disconnect(&mut self, bases: &[BaseId]) -> Result<BatchReport<BaseId>, ErrOperation> {
        let materials = self.materials.clone();
        self.apply(Disconnect::new(materials), bases)
    }

    pub fn duplicate(
        &mut self,
        helices: &[usize],
        reporter: Box<dyn ProgressReporter>,
    ) -> Result<BatchReport<usize>, ErrOperation> {
        self.apply(Duplicate::new(reporter), helices)
    }

    pub fn apply_sequence(
        &mut self,
        sequence: &str,
        bases: &[BaseId],
    ) -> Result<BatchReport<BaseId>, ErrOperation> {
        self.apply(ApplySequence::new(sequence), bases)
    }

    pub fn paint_strands(
        &mut self,
        material: Material,
        anchors: &[BaseId],
    ) -> Result<BatchReport<BaseId>, ErrOperation> {
        self.apply(PaintStrand { material }, anchors)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Label of the operation `undo` would revert, for host menus.
    pub fn undo_label(&self) -> Option<&'static str> {
        self.undo_stack.last().map(|op| op.label())
    }

    pub fn redo_label(&self) -> Option<&'static str> {
        self.redo_stack.last().map(|op| op.label())
    }

    /// Revert the most recent operation. `Ok(false)` when there is nothing to
    /// undo.
    pub fn undo(&mut self) -> Result<bool, ConsistencyFault> {
        let mut op = match self.undo_stack.pop() {
            None => return Ok(false),
            Some(op) => op,
        };
        if let Err(fault) = op.undo(&mut self.design) {
            self.discard_history(&fault);
            return Err(fault);
        }
        self.redo_stack.push(op);
        Ok(true)
    }

    /// Reapply the most recently undone operation. `Ok(false)` when there is
    /// nothing to redo.
    pub fn redo(&mut self) -> Result<bool, ConsistencyFault> {
        let mut op = match self.redo_stack.pop() {
            None => return Ok(false),
            Some(op) => op,
        };
        if let Err(fault) = op.redo(&mut self.design) {
            self.discard_history(&fault);
            return Err(fault);
        }
        self.undo_stack.push(op);
        Ok(true)
    }

    fn discard_history(&mut self, fault: &ConsistencyFault) {
        log::error!("discarding history: {}", fault);
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
