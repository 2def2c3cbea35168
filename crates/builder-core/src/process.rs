//! A subprocess invocation wrapper that treats any return code outside an
//! explicit allow-list as fatal, per §7's `ToolchainError`.

use crate::error::BuilderError;
use std::path::Path;
use std::process::Command;

/// Captured output from a command invocation.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Runs `program` with `args` in `cwd`, succeeding only if the exit code is in
/// `allowed_codes` (an empty slice means "zero only"). Any other code becomes a
/// `BuilderError::Toolchain` naming the formatted command line and the code.
pub fn checked_run(
    cwd: &Path,
    program: &str,
    args: &[String],
    allowed_codes: &[i32],
) -> Result<CommandOutput, BuilderError> {
    let output = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .output()
        .map_err(BuilderError::Io)?;

    let code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    let ok = code == 0 || allowed_codes.contains(&code);
    if !ok {
        return Err(BuilderError::Toolchain {
            command: format_command(program, args),
            code,
        });
    }

    Ok(CommandOutput { code, stdout, stderr })
}

pub fn format_command(program: &str, args: &[String]) -> String {
    let mut out = format_command_part(program);
    for arg in args {
        out.push(' ');
        out.push_str(&format_command_part(arg));
    }
    out
}

fn format_command_part(part: &str) -> String {
    if part.contains(' ') || part.contains('\t') {
        format!("\"{}\"", part.replace('"', "\\\""))
    } else {
        part.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn succeeds_on_zero() {
        let dir = tempfile::tempdir().unwrap();
        let out = checked_run(dir.path(), "true", &[], &[]).unwrap();
        assert_eq!(out.code, 0);
    }

    #[test]
    fn fails_on_disallowed_code() {
        let dir = tempfile::tempdir().unwrap();
        let err = checked_run(dir.path(), "false", &[], &[]).unwrap_err();
        match err {
            BuilderError::Toolchain { code, .. } => assert_eq!(code, 1),
            other => panic!("expected Toolchain error, got {other:?}"),
        }
    }

    #[test]
    fn allowed_code_passes() {
        let dir = tempfile::tempdir().unwrap();
        let out = checked_run(dir.path(), "false", &[], &[1]).unwrap();
        assert_eq!(out.code, 1);
    }

    #[test]
    fn quotes_args_with_spaces() {
        assert_eq!(
            format_command("prog", &["a b".to_string()]),
            "prog \"a b\""
        );
    }
}
