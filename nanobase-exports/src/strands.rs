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
//! Extraction of one record per strand of a design, and the JSON and CSV
//! writers over those records.

use crate::ExportError;
use ahash::AHashSet;
use itertools::Itertools;
use serde_derive::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

use nanobase_design::{BaseId, Design, Strand};
use nanobase_interactor::{Phase, ProgressReporter, Progression};

/// One strand of the design, ready to be written out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrandExport {
    /// For an open strand, the names of its 5' and 3' ends joined by `--`.
    /// For a loop, the name of one member (loops have no distinguished end).
    pub strand_name: String,
    /// The labels of the members in 5' to 3' order, unset labels written as
    /// `?`.
    pub sequence: String,
}

/// One record per strand, each strand visited exactly once.
///
/// Strands are enumerated in the arena order of their first member, which
/// makes the output stable for a given design. The reporter sees one export
/// phase with one unit per strand; a stop aborts with `Cancelled` before any
/// further record is built.
pub fn strand_records(
    design: &Design,
    reporter: &mut dyn ProgressReporter,
) -> Result<Vec<StrandExport>, ExportError> {
    let mut visited: AHashSet<BaseId> = AHashSet::new();
    let mut strands: Vec<Vec<BaseId>> = Vec::new();
    for (id, _) in design.bases() {
        if visited.contains(&id) {
            continue;
        }
        let members = Strand::new(id).members(design);
        visited.extend(members.iter().copied());
        strands.push(members);
    }

    reporter.start(Phase::Export, strands.len());
    let mut records = Vec::with_capacity(strands.len());
    for members in strands {
        records.push(record_of(design, &members));
        if reporter.step() == Progression::Stop {
            return Err(ExportError::Cancelled);
        }
    }
    reporter.done();
    Ok(records)
}

fn record_of(design: &Design, members: &[BaseId]) -> StrandExport {
    let sequence: String = members
        .iter()
        .map(|&id| {
            design
                .get_base(id)
                .and_then(|b| b.label().to_char())
                .unwrap_or('?')
        })
        .collect();
    let name_of = |id: BaseId| design.base_name(id).unwrap_or_else(|| format!("{}", id));
    let first = members[0];
    let last = members[members.len() - 1];
    let strand_name = if Strand::new(first).is_loop(design) {
        name_of(first)
    } else {
        format!("{}--{}", name_of(first), name_of(last))
    };
    StrandExport {
        strand_name,
        sequence,
    }
}

/// Write the strand records of `design` to `path` as a pretty printed JSON
/// array.
pub fn write_strands_json(
    design: &Design,
    reporter: &mut dyn ProgressReporter,
    path: &Path,
) -> Result<(), ExportError> {
    let records = strand_records(design, reporter)?;
    let out = std::fs::File::create(path)?;
    serde_json::to_writer_pretty(out, &records)?;
    Ok(())
}

/// Write the strand records of `design` to `path` as CSV with a header line.
///
/// Strand names contain no commas or quotes, so no field needs escaping.
pub fn write_strands_csv(
    design: &Design,
    reporter: &mut dyn ProgressReporter,
    path: &Path,
) -> Result<(), ExportError> {
    let records = strand_records(design, reporter)?;
    let mut out = std::fs::File::create(path)?;
    let body = records
        .iter()
        .map(|r| format!("{},{}", r.strand_name, r.sequence))
        .join("\n");
    writeln!(out, "strand_name,sequence")?;
    writeln!(out, "{}", body)?;
    Ok(())
}
