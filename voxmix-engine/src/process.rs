//! External tool invocation with an optional deadline
//!
//! Speech synthesis and MP3 encoding run outside the process. A child that
//! outlives its deadline is killed and reaped before the caller sees
//! [`ProcessError::TimedOut`], so staged files it was writing can be released
//! on the normal error path.

use std::io::{Read, Write};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, warn};

/// How often a running child is polled for exit
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Exit status and captured output of a finished child
#[derive(Debug)]
pub(crate) struct ProcessOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

#[derive(Debug, Error)]
pub(crate) enum ProcessError {
    /// The program could not be started
    #[error("failed to start: {0}")]
    Spawn(std::io::Error),

    /// Waiting on or talking to the child failed
    #[error("I/O error: {0}")]
    Io(std::io::Error),

    /// The child was killed after running past the deadline
    #[error("killed after {0:?}")]
    TimedOut(Duration),
}

/// Run `command` to completion, feeding `input` on stdin.
///
/// With a `timeout`, the child is killed once it has run that long.
pub(crate) fn run(
    mut command: Command,
    input: Option<Vec<u8>>,
    timeout: Option<Duration>,
) -> Result<ProcessOutput, ProcessError> {
    command
        .stdin(if input.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = command.spawn().map_err(ProcessError::Spawn)?;
    debug!("Started child process {}", child.id());

    // stdin is fed from its own thread while the output pipes drain
    let feeder = match (input, child.stdin.take()) {
        (Some(bytes), Some(mut stdin)) => Some(thread::spawn(move || stdin.write_all(&bytes))),
        _ => None,
    };
    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    let status = wait(&mut child, timeout)?;

    let stdout = collect(stdout)?;
    let stderr = collect(stderr)?;

    if let Some(feeder) = feeder {
        let fed = feeder
            .join()
            .map_err(|_| ProcessError::Io(std::io::Error::other("stdin thread panicked")))?;
        // Broken stdin only matters when the child reports success
        if let Err(e) = fed {
            if status.success() {
                return Err(ProcessError::Io(e));
            }
        }
    }

    Ok(ProcessOutput {
        status,
        stdout,
        stderr,
    })
}

fn wait(child: &mut Child, timeout: Option<Duration>) -> Result<ExitStatus, ProcessError> {
    let started = Instant::now();
    loop {
        if let Some(status) = child.try_wait().map_err(ProcessError::Io)? {
            return Ok(status);
        }

        if let Some(limit) = timeout {
            if started.elapsed() >= limit {
                warn!("Child process {} exceeded {:?}, killing it", child.id(), limit);
                if let Err(e) = child.kill() {
                    warn!("Failed to kill child process {}: {}", child.id(), e);
                }
                // Reap so no zombie is left behind; output threads are abandoned
                let _ = child.wait();
                return Err(ProcessError::TimedOut(limit));
            }
        }

        thread::sleep(POLL_INTERVAL);
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<std::io::Result<Vec<u8>>>> {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            pipe.read_to_end(&mut buf)?;
            Ok(buf)
        })
    })
}

fn collect(handle: Option<JoinHandle<std::io::Result<Vec<u8>>>>) -> Result<Vec<u8>, ProcessError> {
    match handle {
        Some(handle) => handle
            .join()
            .map_err(|_| ProcessError::Io(std::io::Error::other("output thread panicked")))?
            .map_err(ProcessError::Io),
        None => Ok(Vec::new()),
    }
}
