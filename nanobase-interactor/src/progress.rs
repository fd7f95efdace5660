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
//! Progress reporting and cooperative cancellation for long running
//! operations.
//!
//! Operations that may run long (duplication of large selections, exports)
//! announce each phase they enter and call back after each unit of work. The
//! callback's return value lets the host stop the operation at the next unit
//! boundary; the operation then rolls back whatever it had already done.

use strum::Display;

/// The phase a long running operation is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Phase {
    /// Copying elements, without any links between the copies.
    Clone,
    /// Wiring the links between the copies.
    Relink,
    /// Writing strand records out.
    Export,
}

/// Whether the operation should keep going after a unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progression {
    Continue,
    Stop,
}

/// Host callback for long running operations.
pub trait ProgressReporter {
    /// A new phase begins, made of `total` units of work.
    fn start(&mut self, phase: Phase, total: usize);

    /// One unit of work of the current phase completed. Returning
    /// `Progression::Stop` cancels the operation at this boundary.
    fn step(&mut self) -> Progression;

    /// The current phase completed.
    fn done(&mut self);
}

/// A reporter that never cancels; the default when the host does not care
/// about progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn start(&mut self, phase: Phase, total: usize) {
        log::debug!("starting phase {} ({} units)", phase, total);
    }

    fn step(&mut self) -> Progression {
        Progression::Continue
    }

    fn done(&mut self) {}
}
