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

use crate::{Label, Material};

// Serialization utils
//===========================================================================
pub(crate) fn label_is_unset(label: &Label) -> bool {
    !label.is_set()
}

pub(crate) fn material_is_default(material: &Material) -> bool {
    *material == Material::default()
}

pub(crate) fn default_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
//===========================================================================
