// src/exec.rs

//! Shell-command rule bodies.
//!
//! The CLI layer registers each `cmd = "..."` from the config as a deferred
//! body built here: the command runs as a child process via
//! `tokio::process::Command`, and the rule completes when the process exits.
//! A non-zero exit status fails the rule (and with it, the invocation).

use std::process::Stdio;

use anyhow::{anyhow, Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, error, info};

use crate::rule::RuleBody;

/// Build a deferred rule body that runs `cmd` in the platform shell.
///
/// Each invocation of the body spawns its own process; the engine's dedupe
/// invariant already guarantees at most one spawn per rule per invocation.
pub fn shell_command(rule: &str, cmd: &str) -> RuleBody {
    let rule = rule.to_string();
    let cmd = cmd.to_string();

    RuleBody::deferred(move |done| {
        let rule = rule.clone();
        let cmd = cmd.clone();

        tokio::spawn(async move {
            match run_command(&rule, &cmd).await {
                Ok(()) => done.complete(),
                Err(err) => {
                    error!(rule = %rule, error = %err, "command failed");
                    done.fail(err);
                }
            }
        });

        Ok(())
    })
}

/// Run a single shell command to completion, streaming its output to the log.
async fn run_command(rule: &str, cmd: &str) -> Result<()> {
    info!(rule, cmd, "starting command");

    // Build a shell command appropriate for the platform.
    let mut command = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(cmd);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(cmd);
        c
    };

    command
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = command
        .spawn()
        .with_context(|| format!("spawning process for rule '{rule}'"))?;

    if let Some(stdout) = child.stdout.take() {
        let rule = rule.to_string();
        tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                info!(rule = %rule, "stdout: {}", line);
            }
        });
    }

    // Always consume stderr so buffers don't fill; log at debug.
    if let Some(stderr) = child.stderr.take() {
        let rule = rule.to_string();
        tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                debug!(rule = %rule, "stderr: {}", line);
            }
        });
    }

    let status = child
        .wait()
        .await
        .with_context(|| format!("waiting for process of rule '{rule}'"))?;

    let code = status.code().unwrap_or(-1);
    info!(
        rule,
        exit_code = code,
        success = status.success(),
        "command exited"
    );

    if status.success() {
        Ok(())
    } else {
        Err(anyhow!("command for rule '{rule}' exited with code {code}"))
    }
}
