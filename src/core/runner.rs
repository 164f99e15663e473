//! Subprocess execution with captured line-oriented output.
//!
//! This module provides [`Runner`], the single place where git-switch spawns
//! external commands. Commands are argv vectors, never shell strings, and run
//! with an explicit working directory plus optional environment overrides
//! (used to inject a per-repository `GIT_SSH_COMMAND`).
//!
//! # Public API
//! - [`Runner`]: configured executor with an optional timeout
//! - [`Runner::run`]: one command, stdout captured line by line
//! - [`Runner::run_steps`]: a compound command of sequential steps
//!
//! # Failure Semantics
//! A non-zero exit is not an error: git signals failure to these callers only
//! through its output, so the exit code is logged and the captured lines are
//! returned as-is. Spawn failures and timeouts do error; a timeout kills the
//! child and aborts any remaining compound steps.

use crate::core::error::{GitSwitchError, Result};
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Extra environment merged over the ambient environment of a command.
pub type EnvOverrides = Vec<(String, String)>;

#[derive(Debug, Clone)]
pub struct Runner {
    timeout: Option<Duration>,
}

impl Runner {
    pub fn new(timeout: Option<Duration>) -> Self {
        Runner { timeout }
    }

    /// Run one command and capture its stdout, order preserved.
    pub fn run<S: AsRef<str>>(
        &self,
        workdir: &Path,
        argv: &[S],
        env: &EnvOverrides,
    ) -> Result<Vec<String>> {
        let (program, args) = match argv.split_first() {
            Some(parts) => parts,
            None => {
                log::warn!("Skipping empty command");
                return Ok(Vec::new());
            }
        };
        let program = program.as_ref();

        log::debug!(
            "Running '{}' with {} arg(s) in {}",
            program,
            args.len(),
            workdir.display()
        );

        let mut cmd = Command::new(program);
        cmd.args(args.iter().map(|arg| arg.as_ref()))
            .current_dir(workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        for (key, value) in env {
            cmd.env(key, value);
        }

        let mut child = cmd.spawn()?;
        let stdout_reader = spawn_line_reader(child.stdout.take());
        let stderr_reader = spawn_line_reader(child.stderr.take());

        let exit = self.wait_with_timeout(&mut child, program)?;

        let stdout_lines = stdout_reader.join().unwrap_or_default();
        let stderr_lines = stderr_reader.join().unwrap_or_default();

        for line in &stderr_lines {
            log::debug!("{program} stderr: {line}");
        }
        if !exit.success() {
            log::warn!(
                "'{}' exited with {} ({})",
                program,
                exit.code()
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "signal".to_string()),
                stderr_lines.last().map(String::as_str).unwrap_or("no stderr")
            );
        }

        Ok(stdout_lines)
    }

    /// Run a compound command: sequential steps in the same working
    /// directory and environment. A failing step does not abort the
    /// remaining steps; only a timeout does.
    pub fn run_steps(&self, workdir: &Path, steps: &[Vec<String>], env: &EnvOverrides) -> Result<()> {
        for step in steps {
            match self.run(workdir, step, env) {
                Ok(_) => {}
                Err(err @ GitSwitchError::CommandTimedOut { .. }) => return Err(err),
                Err(err) => {
                    log::warn!("Compound step failed, continuing: {err}");
                }
            }
        }
        Ok(())
    }

    fn wait_with_timeout(
        &self,
        child: &mut Child,
        program: &str,
    ) -> Result<std::process::ExitStatus> {
        let timeout = match self.timeout {
            Some(timeout) => timeout,
            None => return Ok(child.wait()?),
        };

        let start = Instant::now();
        let mut sleep_duration = Duration::from_millis(10);
        let max_sleep = Duration::from_millis(200);

        loop {
            if let Some(exit) = child.try_wait()? {
                return Ok(exit);
            }
            if start.elapsed() >= timeout {
                let _ = child.kill();
                let _ = child.wait();
                return Err(GitSwitchError::command_timed_out(
                    program,
                    timeout.as_secs(),
                ));
            }
            thread::sleep(sleep_duration);
            sleep_duration = (sleep_duration * 2).min(max_sleep);
        }
    }
}

/// Drain a child pipe on its own thread so the child never blocks on a
/// full pipe while we wait on it.
fn spawn_line_reader<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<Vec<String>> {
    thread::spawn(move || match pipe {
        Some(pipe) => BufReader::new(pipe)
            .lines()
            .filter_map(|line| line.ok())
            .collect(),
        None => Vec::new(),
    })
}
