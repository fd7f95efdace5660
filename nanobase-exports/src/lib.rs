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
//! Export of the strands of a design to file formats consumed by synthesis
//! pipelines.

use std::path::{Path, PathBuf};
use strum::Display;

use nanobase_design::Design;
use nanobase_interactor::ProgressReporter;

pub mod strands;
pub use strands::{strand_records, StrandExport};

/// The file formats to which an export is implemented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ExportType {
    Json,
    Csv,
}

/// A value returned by the export functions when the export was successful.
///
/// This means that both the record extraction and the write to the output
/// file were successful.
pub enum ExportSuccess {
    Json(PathBuf),
    Csv(PathBuf),
}

const SUCCESSFUL_EXPORT_MSG_PREFIX: &str = "Succussfully exported to";

impl ExportSuccess {
    /// A message telling that the export operation was successful and giving
    /// the path to which the export was made
    pub fn message(&self) -> String {
        match self {
            Self::Json(p) => format!("{SUCCESSFUL_EXPORT_MSG_PREFIX}\n{}", p.to_string_lossy()),
            Self::Csv(p) => format!("{SUCCESSFUL_EXPORT_MSG_PREFIX}\n{}", p.to_string_lossy()),
        }
    }
}

#[derive(Debug)]
pub enum ExportError {
    IOError(std::io::Error),
    JsonError(serde_json::Error),
    /// The progress reporter asked for a cooperative stop; no file was
    /// written.
    Cancelled,
}

impl From<std::io::Error> for ExportError {
    fn from(e: std::io::Error) -> Self {
        Self::IOError(e)
    }
}
impl From<serde_json::Error> for ExportError {
    fn from(e: serde_json::Error) -> Self {
        Self::JsonError(e)
    }
}

pub fn export(
    design: &Design,
    export_type: ExportType,
    reporter: &mut dyn ProgressReporter,
    export_path: &Path,
) -> ExportResult {
    log::info!("exporting strands as {} to {:?}", export_type, export_path);
    match export_type {
        ExportType::Json => {
            strands::write_strands_json(design, reporter, export_path)?;
            Ok(ExportSuccess::Json(export_path.to_path_buf()))
        }
        ExportType::Csv => {
            strands::write_strands_csv(design, reporter, export_path)?;
            Ok(ExportSuccess::Csv(export_path.to_path_buf()))
        }
    }
}

pub type ExportResult = Result<ExportSuccess, ExportError>;
