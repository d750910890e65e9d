//! Solver process management.

use std::path::PathBuf;
use std::process::Command;

use tempfile::TempDir;
use wn_impact::{HydraulicSolver, PressureSeries, SolveError};
use wn_model::NetworkModel;

use crate::rpt;

/// Default binary name, resolved from `PATH`.
pub const DEFAULT_BINARY: &str = "runepanet";

/// Runs an EPANET command-line binary (`runepanet INPUT REPORT`) on a
/// scratch copy of the model document.
#[derive(Debug, Clone)]
pub struct EpanetSolver {
    binary: PathBuf,
}

impl EpanetSolver {
    pub fn new() -> Self {
        Self {
            binary: PathBuf::from(DEFAULT_BINARY),
        }
    }

    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for EpanetSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl HydraulicSolver for EpanetSolver {
    fn simulate(&self, model: &NetworkModel) -> Result<PressureSeries, SolveError> {
        // The scratch directory cleans itself up on drop, on success and
        // failure alike.
        let dir = TempDir::new().map_err(|e| SolveError::Invocation {
            message: format!("scratch dir: {e}"),
        })?;
        let inp_path = dir.path().join("model.inp");
        let rpt_path = dir.path().join("model.rpt");

        std::fs::write(&inp_path, model.to_inp()).map_err(|e| SolveError::Invocation {
            message: format!("write {}: {e}", inp_path.display()),
        })?;

        tracing::debug!(binary = %self.binary.display(), "invoking hydraulic solver");
        let output = Command::new(&self.binary)
            .arg(&inp_path)
            .arg(&rpt_path)
            .output()
            .map_err(|e| SolveError::Invocation {
                message: format!("spawn {}: {e}", self.binary.display()),
            })?;

        // The report may exist even on failure and usually carries a better
        // diagnostic than stderr does.
        let report = std::fs::read_to_string(&rpt_path).unwrap_or_default();

        if !output.status.success() {
            let detail = first_error_line(&report)
                .map(str::to_owned)
                .unwrap_or_else(|| String::from_utf8_lossy(&output.stderr).trim().to_string());
            return Err(SolveError::Invocation {
                message: format!("solver exited with {}: {detail}", output.status),
            });
        }

        rpt::check_for_errors(&report)?;
        rpt::parse_report(&report)
    }
}

fn first_error_line(report: &str) -> Option<&str> {
    report
        .lines()
        .map(str::trim)
        .find(|l| l.starts_with("Error") || l.starts_with("Input Error"))
}
