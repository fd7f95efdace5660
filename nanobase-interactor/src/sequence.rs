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
//! Sequence application over an ordered set of bases, and strand length
//! queries.

use crate::{Atomicity, ErrOperation, OperationKind, Outcome};
use nanobase_design::{BaseId, Design, ErrDesign, Label, Strand};

/// Write a nucleotide sequence over the bases of the batch, in batch order:
/// the first base gets the first character, and so on.
///
/// A batch longer than the sequence is legal: bases past the end of the
/// sequence are skipped. Each element commits on its own, and a failed element
/// still consumes its character, so the characters written to the surviving
/// bases do not shift.
pub struct ApplySequence {
    sequence: Vec<Label>,
    cursor: usize,
}

impl ApplySequence {
    pub fn new(sequence: &str) -> Self {
        Self {
            sequence: sequence.chars().map(Label::from_char).collect(),
            cursor: 0,
        }
    }
}

impl OperationKind for ApplySequence {
    type Element = BaseId;
    type UndoData = Label;
    type RedoData = Label;

    const LABEL: &'static str = "apply sequence";
    const ATOMICITY: Atomicity = Atomicity::PerElement;

    fn execute_one(
        &mut self,
        design: &mut Design,
        element: BaseId,
    ) -> Result<Outcome<Label>, ErrOperation> {
        let position = self.cursor;
        self.cursor += 1;
        let label = match self.sequence.get(position) {
            None => return Ok(Outcome::Skipped),
            Some(&label) => label,
        };
        let base = design
            .get_base_mut(element)
            .ok_or(ErrOperation::Design(ErrDesign::BaseDoesNotExist(element)))?;
        let prior = base.label();
        base.set_label(label);
        Ok(Outcome::Done(prior))
    }

    fn undo_one(
        &mut self,
        design: &mut Design,
        element: BaseId,
        undo: Label,
    ) -> Result<Label, ErrOperation> {
        swap_label(design, element, undo)
    }

    fn redo_one(
        &mut self,
        design: &mut Design,
        element: BaseId,
        redo: Label,
    ) -> Result<Label, ErrOperation> {
        swap_label(design, element, redo)
    }
}

fn swap_label(design: &mut Design, element: BaseId, label: Label) -> Result<Label, ErrOperation> {
    let base = design
        .get_base_mut(element)
        .ok_or(ErrOperation::GraphChanged(element))?;
    let current = base.label();
    base.set_label(label);
    Ok(current)
}

/// Number of bases on the strand holding `base`. Loops count each member
/// once, whichever member the query is anchored at.
pub fn strand_length_count(design: &Design, base: BaseId) -> Result<usize, ErrOperation> {
    if !design.has_base(base) {
        return Err(ErrDesign::BaseDoesNotExist(base).into());
    }
    Ok(Strand::new(base).length(design))
}
