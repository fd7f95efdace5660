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
//! Strands as computed traversal views.
//!
//! A strand is not stored anywhere: it is the maximal chain of bases reachable
//! from a defining base by following the forward or backward links. Two
//! `Strand` values denote the same strand whenever they share a member.
//!
//! Every traversal here is bounded by the number of live bases of the design,
//! so it terminates even on a malformed graph with non reciprocal links. The
//! bound being hit is a defect of whoever wrote the links and is logged.

use crate::{BaseId, Design};

/// The direction in which a strand is walked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrandDirection {
    /// Follow `forward` links, 5' to 3'.
    Forward,
    /// Follow `backward` links, 3' to 5'.
    Backward,
}

/// A strand of the design, anchored at any one of its member bases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strand {
    pub defining_base: BaseId,
}

impl Strand {
    pub fn new(defining_base: BaseId) -> Self {
        Self { defining_base }
    }

    /// Iterate over the strand members starting at the defining base and
    /// following forward links. On a loop, iteration stops after coming back
    /// to the defining base.
    pub fn iter_forward<'a>(&self, design: &'a Design) -> StrandIter<'a> {
        StrandIter::new(design, self.defining_base, StrandDirection::Forward)
    }

    /// Same as `iter_forward`, following backward links.
    pub fn iter_backward<'a>(&self, design: &'a Design) -> StrandIter<'a> {
        StrandIter::new(design, self.defining_base, StrandDirection::Backward)
    }

    /// A strand is a loop if forward traversal from the defining base comes
    /// back to it before running out of links.
    pub fn is_loop(&self, design: &Design) -> bool {
        let mut walk = BoundedWalk::new(design, self.defining_base, StrandDirection::Forward);
        while let Some(next) = walk.advance() {
            if next == self.defining_base {
                return true;
            }
        }
        false
    }

    /// Whether `base` belongs to this strand.
    ///
    /// Searches forward first; if the forward pass detects a loop, the
    /// backward pass is skipped since a loop contains every reachable member.
    pub fn contains(&self, design: &Design, base: BaseId) -> bool {
        if base == self.defining_base {
            return true;
        }
        let mut walk = BoundedWalk::new(design, self.defining_base, StrandDirection::Forward);
        while let Some(next) = walk.advance() {
            if next == base {
                return true;
            }
            if next == self.defining_base {
                // Loop: the forward pass visited the whole strand.
                return false;
            }
        }
        let mut walk = BoundedWalk::new(design, self.defining_base, StrandDirection::Backward);
        while let Some(next) = walk.advance() {
            if next == base {
                return true;
            }
            if next == self.defining_base {
                return false;
            }
        }
        false
    }

    /// Whether `self` and `other` denote the same strand.
    pub fn same_strand_as(&self, design: &Design, other: &Strand) -> bool {
        self.contains(design, other.defining_base)
    }

    /// The 5'-most base of the strand, or the defining base itself on a loop
    /// (loops have no distinguished start).
    pub fn rewind(&self, design: &Design) -> BaseId {
        let mut current = self.defining_base;
        let mut walk = BoundedWalk::new(design, self.defining_base, StrandDirection::Backward);
        while let Some(next) = walk.advance() {
            if next == self.defining_base {
                return self.defining_base;
            }
            current = next;
        }
        current
    }

    /// Number of bases on the strand. For a loop this is the length of the
    /// cycle, whichever member the strand is anchored at.
    pub fn length(&self, design: &Design) -> usize {
        let start = self.rewind(design);
        Strand::new(start).iter_forward(design).count()
    }

    /// Every member of the strand, in 5' to 3' order (starting at the
    /// defining base on a loop).
    pub fn members(&self, design: &Design) -> Vec<BaseId> {
        let start = self.rewind(design);
        Strand::new(start).iter_forward(design).collect()
    }
}

/// One step of links with an explicit visit budget.
struct BoundedWalk<'a> {
    design: &'a Design,
    current: BaseId,
    direction: StrandDirection,
    budget: usize,
}

impl<'a> BoundedWalk<'a> {
    fn new(design: &'a Design, start: BaseId, direction: StrandDirection) -> Self {
        Self {
            design,
            current: start,
            direction,
            // One extra step allows a full loop to come back to its start.
            budget: design.nb_bases() + 1,
        }
    }

    fn advance(&mut self) -> Option<BaseId> {
        if self.budget == 0 {
            log::error!(
                "strand walk from {} exceeded the live base count: non reciprocal links",
                self.current
            );
            return None;
        }
        self.budget -= 1;
        let base = self.design.get_base(self.current)?;
        let next = match self.direction {
            StrandDirection::Forward => base.forward(),
            StrandDirection::Backward => base.backward(),
        }?;
        self.current = next;
        Some(next)
    }
}

/// Lazy iterator over the members of a strand, in link order.
pub struct StrandIter<'a> {
    walk: BoundedWalk<'a>,
    start: BaseId,
    next: Option<BaseId>,
}

impl<'a> StrandIter<'a> {
    fn new(design: &'a Design, start: BaseId, direction: StrandDirection) -> Self {
        let next = design.get_base(start).map(|_| start);
        Self {
            walk: BoundedWalk::new(design, start, direction),
            start,
            next,
        }
    }
}

impl<'a> Iterator for StrandIter<'a> {
    type Item = BaseId;

    fn next(&mut self) -> Option<BaseId> {
        let current = self.next?;
        self.next = match self.walk.advance() {
            Some(next) if next == self.start => None,
            other => other,
        };
        Some(current)
    }
}
