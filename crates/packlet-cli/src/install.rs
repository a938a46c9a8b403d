//! Production dependency installation before packaging.

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use std::path::Path;
use std::process::Command;

/// Runs `<program> install --production --prefix <project_dir>`.
///
/// # Errors
///
/// Returns an error if the program cannot be started or exits unsuccessfully.
pub fn install_dependencies(program: &str, project_dir: &Path) -> Result<()> {
    let output = Command::new(program)
        .arg("install")
        .arg("--production")
        .arg("--prefix")
        .arg(project_dir)
        .output()
        .with_context(|| {
            format!(
                "Failed to run '{program}'\n\
                 HINT: Install Node.js, or pass --npm with the path to npm."
            )
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!(
            "'{program} install --production' failed in '{}' ({})\n{}",
            project_dir.display(),
            output.status,
            stderr.trim()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_program() {
        let err = install_dependencies("packlet-no-such-npm", Path::new(".")).unwrap_err();
        let msg = format!("{err:?}");
        assert!(msg.contains("packlet-no-such-npm"));
        assert!(msg.contains("HINT"));
    }

    #[cfg(unix)]
    #[test]
    fn test_successful_program() {
        assert!(install_dependencies("true", Path::new(".")).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_program() {
        let err = install_dependencies("false", Path::new(".")).unwrap_err();
        assert!(err.to_string().contains("failed"));
    }
}
