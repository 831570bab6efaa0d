// ===========================================================================
// process - External Process Invocation (GPU offer search)
// ===========================================================================

use std::process::{Command, ExitStatus, Stdio};

use crate::config::GpuConfig;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' failed with {status}{}", stderr_suffix(.stderr))]
    Failed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {trimmed}")
    }
}

/// Captured result of a finished process
#[derive(Debug)]
pub struct Output {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

/// Run `program` to completion with stdin closed, capturing its output
pub fn run_captured(program: &str, args: &[String]) -> Result<Output> {
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .map_err(|source| Error::Spawn {
            program: program.to_string(),
            source,
        })?;

    Ok(Output {
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

/// Configured base arguments followed by the caller's extra arguments
pub fn gpu_search_args(config: &GpuConfig, extra: &[String]) -> Vec<String> {
    config.args.iter().chain(extra).cloned().collect()
}

/// Query the GPU marketplace tool; a non-zero exit is an error
pub fn search_gpu_offers(config: &GpuConfig, extra: &[String]) -> Result<Output> {
    let args = gpu_search_args(config, extra);
    let output = run_captured(&config.program, &args)?;

    if !output.status.success() {
        return Err(Error::Failed {
            program: config.program.clone(),
            status: output.status,
            stderr: output.stderr,
        });
    }

    Ok(output)
}
