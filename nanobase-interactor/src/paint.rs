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
//! Strand painting: material assignment over whole strands, and the source of
//! fresh materials used when edge rewiring re-derives strand colors.

use crate::{Atomicity, ErrOperation, OperationKind, Outcome};
use nanobase_design::{BaseId, Design, ErrDesign, Material, Strand};
use std::cell::Cell;
use std::rc::Rc;

/// A session-scoped source of visually distinct materials, stepping a golden
/// ratio walk through HSV space. Clones share the same counter so that two
/// operations minted from the same session never restart the walk.
#[derive(Clone, Default)]
pub struct FreshMaterials(Rc<Cell<usize>>);

impl FreshMaterials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> Material {
        let idx = self.0.get();
        self.0.set(idx + 1);
        let hue = (idx as f64 * (1. + 5f64.sqrt()) / 2.).fract() * 360.;
        let saturation = (idx as f64 * 7. * (1. + 5f64.sqrt() / 2.)).fract() * 0.4 + 0.4;
        let value = (idx as f64 * 11. * (1. + 5f64.sqrt() / 2.)).fract() * 0.7 + 0.1;
        let hsv = color_space::Hsv::new(hue, saturation, value);
        let rgb = color_space::Rgb::from(hsv);
        Material((0xFF << 24) | ((rgb.r as u32) << 16) | ((rgb.g as u32) << 8) | (rgb.b as u32))
    }
}

/// Record the current material of every base in `members`, then overwrite it
/// with `material`. Returns the priors in `members` order.
pub(crate) fn repaint(
    design: &mut Design,
    members: &[BaseId],
    material: Material,
) -> Vec<(BaseId, Material)> {
    let mut priors = Vec::with_capacity(members.len());
    for &id in members {
        if let Some(base) = design.get_base_mut(id) {
            priors.push((id, base.material()));
            base.set_material(material);
        }
    }
    priors
}

/// Read back the materials currently carried by the recorded bases, then
/// restore the recorded ones. Used by undo/redo so that each replay direction
/// captures what the other must reproduce.
pub(crate) fn swap_materials(
    design: &mut Design,
    recorded: Vec<(BaseId, Material)>,
) -> Result<Vec<(BaseId, Material)>, ErrOperation> {
    let mut captured = Vec::with_capacity(recorded.len());
    for (id, material) in recorded {
        let base = design
            .get_base_mut(id)
            .ok_or(ErrOperation::GraphChanged(id))?;
        captured.push((id, base.material()));
        base.set_material(material);
    }
    Ok(captured)
}

/// Assign one material to every base of one or more strands, each strand
/// given by any of its member bases.
///
/// Undo restores each base's individual prior material: the strand may have
/// been painted unevenly before.
pub struct PaintStrand {
    pub material: Material,
}

impl OperationKind for PaintStrand {
    type Element = BaseId;
    type UndoData = Vec<(BaseId, Material)>;
    type RedoData = Vec<(BaseId, Material)>;

    const LABEL: &'static str = "paint strand";
    const ATOMICITY: Atomicity = Atomicity::PerElement;

    fn execute_one(
        &mut self,
        design: &mut Design,
        element: BaseId,
    ) -> Result<Outcome<Self::UndoData>, ErrOperation> {
        if !design.has_base(element) {
            return Err(ErrDesign::BaseDoesNotExist(element).into());
        }
        let members = Strand::new(element).members(design);
        Ok(Outcome::Done(repaint(design, &members, self.material)))
    }

    fn undo_one(
        &mut self,
        design: &mut Design,
        _element: BaseId,
        undo: Self::UndoData,
    ) -> Result<Self::RedoData, ErrOperation> {
        swap_materials(design, undo)
    }

    fn redo_one(
        &mut self,
        design: &mut Design,
        _element: BaseId,
        redo: Self::RedoData,
    ) -> Result<Self::UndoData, ErrOperation> {
        swap_materials(design, redo)
    }
}
