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
//! The generic transactional command primitive.
//!
//! An `OperationKind` describes one mutation on one element; `Operation`
//! batches it over a set of elements treated as a single logical user action,
//! and gives it execute/undo/redo with identical bookkeeping regardless of
//! the mutation kind.

use crate::ErrOperation;
use nanobase_design::Design;
use std::fmt;

/// What happens to a batch when one of its elements fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Atomicity {
    /// The first failure rolls back the already applied elements and fails
    /// the whole batch. Edge rewiring wants this: a half rewired selection is
    /// worse than an untouched one.
    WholeBatch,
    /// Failures are recorded per element and the rest of the batch proceeds.
    /// Label and paint assignment want this.
    PerElement,
}

/// The result of executing one element.
pub enum Outcome<U> {
    /// The element was mutated; `U` inverts the mutation exactly.
    Done(U),
    /// The element was a no-op under the operation's policy. Skipped elements
    /// are not recorded in the undo log.
    Skipped,
}

/// One kind of per-element mutation.
///
/// The three methods must be exact inverses of one another: `undo_one` must
/// restore the state from before `execute_one`, and `redo_one` must reproduce
/// the recorded effect rather than re-derive it.
pub trait OperationKind {
    type Element: Copy + fmt::Debug;
    type UndoData;
    type RedoData;

    const LABEL: &'static str;
    const ATOMICITY: Atomicity;

    fn execute_one(
        &mut self,
        design: &mut Design,
        element: Self::Element,
    ) -> Result<Outcome<Self::UndoData>, ErrOperation>;

    fn undo_one(
        &mut self,
        design: &mut Design,
        element: Self::Element,
        undo: Self::UndoData,
    ) -> Result<Self::RedoData, ErrOperation>;

    fn redo_one(
        &mut self,
        design: &mut Design,
        element: Self::Element,
        redo: Self::RedoData,
    ) -> Result<Self::UndoData, ErrOperation>;

    /// Called once before any element is executed.
    fn begin_batch(
        &mut self,
        _design: &mut Design,
        _elements: &[Self::Element],
    ) -> Result<(), ErrOperation> {
        Ok(())
    }

    /// Called once after every element was executed, with the recorded undo
    /// log. Operations with a cross-element second phase (Duplicate's relink)
    /// run it here; an error rolls the whole batch back.
    fn finish_batch(
        &mut self,
        _design: &mut Design,
        _undo_log: &[(Self::Element, Self::UndoData)],
    ) -> Result<(), ErrOperation> {
        Ok(())
    }
}

/// Aggregate outcome of a batch execution.
#[derive(Debug)]
pub struct BatchReport<E> {
    /// Number of elements in the input batch.
    pub total: usize,
    /// Number of elements actually mutated.
    pub applied: usize,
    /// Number of elements that were policy no-ops.
    pub skipped: usize,
    /// The elements that failed, with their error. Empty for whole-batch
    /// operations (those fail as a unit instead).
    pub failures: Vec<(E, ErrOperation)>,
}

impl<E> BatchReport<E> {
    pub fn is_full_success(&self) -> bool {
        self.failures.is_empty()
    }
}

impl<E: fmt::Debug> fmt::Display for BatchReport<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.failures.is_empty() {
            write!(f, "{} of {} elements applied", self.applied, self.total)
        } else {
            write!(
                f,
                "{} of {} elements failed:",
                self.failures.len(),
                self.total
            )?;
            for (element, error) in &self.failures {
                write!(f, " {:?} ({:?})", element, error.kind())?;
            }
            Ok(())
        }
    }
}

/// A failure while replaying recorded undo/redo data. This is not a
/// recoverable error: it means the graph was mutated outside the operation
/// framework and the recorded state is stale.
#[derive(Debug)]
pub struct ConsistencyFault {
    pub operation: &'static str,
    pub detail: String,
}

impl fmt::Display for ConsistencyFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "consistency fault during {}: {} (the design was modified outside the undo system)",
            self.operation, self.detail
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OperationState {
    Fresh,
    Applied,
    Undone,
}

/// A batched, invertible application of an `OperationKind`.
pub struct Operation<K: OperationKind> {
    kind: K,
    undo_log: Vec<(K::Element, K::UndoData)>,
    redo_log: Vec<(K::Element, K::RedoData)>,
    state: OperationState,
}

impl<K: OperationKind> Operation<K> {
    pub fn new(kind: K) -> Self {
        Self {
            kind,
            undo_log: Vec::new(),
            redo_log: Vec::new(),
            state: OperationState::Fresh,
        }
    }

    /// Apply the operation to `elements`, in the caller's order.
    pub fn execute(
        &mut self,
        design: &mut Design,
        elements: &[K::Element],
    ) -> Result<BatchReport<K::Element>, ErrOperation> {
        if self.state != OperationState::Fresh {
            return Err(ErrOperation::Fault(ConsistencyFault {
                operation: K::LABEL,
                detail: "execute called twice".to_string(),
            }));
        }
        self.kind.begin_batch(design, elements)?;
        let mut skipped = 0;
        let mut failures = Vec::new();
        for &element in elements {
            match self.kind.execute_one(design, element) {
                Ok(Outcome::Done(undo)) => self.undo_log.push((element, undo)),
                Ok(Outcome::Skipped) => skipped += 1,
                Err(e) => match K::ATOMICITY {
                    Atomicity::WholeBatch => {
                        self.rollback(design)?;
                        return Err(e);
                    }
                    Atomicity::PerElement => failures.push((element, e)),
                },
            }
        }
        if let Err(e) = self.kind.finish_batch(design, &self.undo_log) {
            self.rollback(design)?;
            return Err(e);
        }
        self.state = OperationState::Applied;
        let report = BatchReport {
            total: elements.len(),
            applied: self.undo_log.len(),
            skipped,
            failures,
        };
        log::debug!("{}: {}", K::LABEL, report);
        Ok(report)
    }

    /// Revert every recorded element, last applied first.
    pub fn undo(&mut self, design: &mut Design) -> Result<(), ConsistencyFault> {
        if self.state != OperationState::Applied {
            return Err(self.fault("undo called while not in the applied state".to_string()));
        }
        let mut redo_log = Vec::with_capacity(self.undo_log.len());
        while let Some((element, undo)) = self.undo_log.pop() {
            match self.kind.undo_one(design, element, undo) {
                Ok(redo) => redo_log.push((element, redo)),
                Err(e) => {
                    let fault = self.fault(format!("undo of {:?} failed: {:?}", element, e));
                    log::error!("{}", fault);
                    return Err(fault);
                }
            }
        }
        // Back to the original apply order, which is the redo order.
        redo_log.reverse();
        self.redo_log = redo_log;
        self.state = OperationState::Undone;
        Ok(())
    }

    /// Reproduce the recorded effect, in the original apply order.
    pub fn redo(&mut self, design: &mut Design) -> Result<(), ConsistencyFault> {
        if self.state != OperationState::Undone {
            return Err(self.fault("redo called while not in the undone state".to_string()));
        }
        let redo_log = std::mem::replace(&mut self.redo_log, Vec::new());
        for (element, redo) in redo_log {
            match self.kind.redo_one(design, element, redo) {
                Ok(undo) => self.undo_log.push((element, undo)),
                Err(e) => {
                    let fault = self.fault(format!("redo of {:?} failed: {:?}", element, e));
                    log::error!("{}", fault);
                    return Err(fault);
                }
            }
        }
        self.state = OperationState::Applied;
        Ok(())
    }

    /// Whether this operation mutated anything (and is therefore worth a slot
    /// on an undo stack).
    pub fn has_effect(&self) -> bool {
        !self.undo_log.is_empty() || !self.redo_log.is_empty()
    }

    pub fn kind(&self) -> &K {
        &self.kind
    }

    fn rollback(&mut self, design: &mut Design) -> Result<(), ErrOperation> {
        while let Some((element, undo)) = self.undo_log.pop() {
            if let Err(e) = self.kind.undo_one(design, element, undo) {
                let fault = self.fault(format!("rollback of {:?} failed: {:?}", element, e));
                log::error!("{}", fault);
                return Err(ErrOperation::Fault(fault));
            }
        }
        Ok(())
    }

    fn fault(&self, detail: String) -> ConsistencyFault {
        ConsistencyFault {
            operation: K::LABEL,
            detail,
        }
    }
}

/// Object-safe view of an executed operation, as stored on undo/redo stacks.
pub trait ReversibleOperation {
    fn label(&self) -> &'static str;
    fn has_effect(&self) -> bool;
    fn undo(&mut self, design: &mut Design) -> Result<(), ConsistencyFault>;
    fn redo(&mut self, design: &mut Design) -> Result<(), ConsistencyFault>;
}

impl<K: OperationKind> ReversibleOperation for Operation<K> {
    fn label(&self) -> &'static str {
        K::LABEL
    }

    fn has_effect(&self) -> bool {
        Operation::has_effect(self)
    }

    fn undo(&mut self, design: &mut Design) -> Result<(), ConsistencyFault> {
        Operation::undo(self, design)
    }

    fn redo(&mut self, design: &mut Design) -> Result<(), ConsistencyFault> {
        Operation::redo(self, design)
    }
}
