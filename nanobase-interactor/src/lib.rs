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
//! Operations that can be performed on a design to modify it, with uniform
//! execute/undo/redo semantics.
//!
//! Every mutating command is an `OperationKind` driven by the generic
//! `Operation` bookkeeping: per element, the executed mutation records enough
//! data to invert itself exactly, and an undone mutation records enough data
//! to reproduce itself exactly rather than being re-derived.

use nanobase_design::{BaseId, ErrDesign};

pub mod operation;
pub use operation::{
    Atomicity, BatchReport, ConsistencyFault, Operation, OperationKind, Outcome,
    ReversibleOperation,
};
mod connect;
pub use connect::{Connect, ConnectRecord, Disconnect, DisconnectRecord};
mod duplicate;
pub use duplicate::{Duplicate, DuplicateRedo, DuplicateUndo};
mod paint;
pub use paint::{FreshMaterials, PaintStrand};
mod sequence;
pub use sequence::{strand_length_count, ApplySequence};
pub mod progress;
pub use progress::{Phase, ProgressReporter, Progression, SilentProgress};
mod controller;
pub use controller::Controller;
mod selection;
pub use selection::{extract_bases, extract_helices, Selection};

/// An error that occured when trying to apply an operation.
#[derive(Debug)]
pub enum ErrOperation {
    Design(ErrDesign),
    /// Connecting a base to itself is not a meaningful edge.
    SelfConnection(BaseId),
    /// Recorded undo/redo data no longer matches the graph: it was mutated
    /// outside the operation framework.
    GraphChanged(BaseId),
    /// The progress reporter asked for a cooperative stop.
    Cancelled,
    /// An undo or redo walk failed; see `ConsistencyFault`.
    Fault(ConsistencyFault),
}

impl From<ErrDesign> for ErrOperation {
    fn from(e: ErrDesign) -> Self {
        Self::Design(e)
    }
}

/// The coarse classification of operation errors, used by callers to decide
/// how to report a per-element failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A reference is no longer live or of the wrong type.
    ElementInvalid,
    /// The mutation would break link symmetry or pairing.
    InvariantViolation,
    /// A collaborator reported an io failure.
    IOFailure,
    /// The caller's progress reporter stopped the operation.
    Cancelled,
}

impl ErrOperation {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ErrOperation::Design(e) => match e {
                ErrDesign::BaseDoesNotExist(_) | ErrDesign::HelixDoesNotExist(_) => {
                    ErrorKind::ElementInvalid
                }
                ErrDesign::Io(_) | ErrDesign::Json(_) => ErrorKind::IOFailure,
                _ => ErrorKind::InvariantViolation,
            },
            ErrOperation::SelfConnection(_) => ErrorKind::InvariantViolation,
            ErrOperation::GraphChanged(_) => ErrorKind::InvariantViolation,
            ErrOperation::Cancelled => ErrorKind::Cancelled,
            ErrOperation::Fault(_) => ErrorKind::InvariantViolation,
        }
    }
}
