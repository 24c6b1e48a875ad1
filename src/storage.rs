//! Writing sheets and summaries to disk, and compiling sheets to PDF.
//!
//! `pdflatex` runs in the document's own directory so its aux/log/pdf files
//! land next to the `.tex` file. On failure its stderr goes to `error.log`
//! in the same directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;

use tracing::{info, warn};

use crate::constants::LATEX_ERROR_LOG;
use crate::error::{AllocationError, Result};
use crate::summary::ResultSummary;
use crate::types::ProbabilityMatrix;

/// Write UTF-8 `content` to `path`, creating parent directories.
pub fn save_document(path: impl AsRef<Path>, content: &str) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, content)?;
    info!(path = %path.display(), bytes = content.len(), "saved document");
    Ok(())
}

/// Pretty JSON array of summaries.
pub fn save_summaries_json(path: impl AsRef<Path>, summaries: &[ResultSummary]) -> Result<()> {
    let json = serde_json::to_string_pretty(summaries)?;
    save_document(path, &json)
}

/// Read a matrix document: `{"companies": n, "machines": m, "probabilities": [...]}`.
pub fn load_matrix(path: impl AsRef<Path>) -> Result<ProbabilityMatrix> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Run `pdflatex` on `path`. Returns the produced PDF path.
pub fn compile_latex_to_pdf(path: impl AsRef<Path>) -> Result<PathBuf> {
    let start = Instant::now();
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file_name = path.file_name().ok_or_else(|| {
        AllocationError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("not a file: {}", path.display()),
        ))
    })?;

    let output = Command::new("pdflatex")
        .arg("-interaction=nonstopmode")
        .arg(file_name)
        .current_dir(&dir)
        .output()?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        let log_path = dir.join(LATEX_ERROR_LOG);
        fs::write(&log_path, &stderr)?;
        warn!(path = %path.display(), log = %log_path.display(), "pdflatex failed");
        return Err(AllocationError::LatexCompilation {
            path: path.to_path_buf(),
            stderr,
        });
    }

    let pdf = path.with_extension("pdf");
    info!(
        pdf = %pdf.display(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "compiled document"
    );
    Ok(pdf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::max_probability_allocation;

    #[test]
    fn test_save_document_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/tasks.tex");
        save_document(&path, "\\begin{document}\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "\\begin{document}\n");
    }

    #[test]
    fn test_summaries_json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summaries.json");
        let summary = max_probability_allocation(2, 2, &[0.9, 0.5, 0.6, 0.8]).unwrap();
        save_summaries_json(&path, std::slice::from_ref(&summary)).unwrap();

        let back: Vec<ResultSummary> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back, vec![summary]);
    }

    #[test]
    fn test_load_matrix() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("matrix.json");
        fs::write(
            &path,
            r#"{"companies": 2, "machines": 2, "probabilities": [0.9, 0.5, 0.6, 0.8]}"#,
        )
        .unwrap();
        let matrix = load_matrix(&path).unwrap();
        assert_eq!(matrix.row(1), &[0.6, 0.8]);
    }

    #[test]
    fn test_load_matrix_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("matrix.json");
        fs::write(
            &path,
            r#"{"companies": 1, "machines": 2, "probabilities": [0.9, 1.5]}"#,
        )
        .unwrap();
        assert!(matches!(load_matrix(&path), Err(AllocationError::Json(_))));
        assert!(matches!(
            load_matrix(dir.path().join("missing.json")),
            Err(AllocationError::Io(_))
        ));
    }
}
