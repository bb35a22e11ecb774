//! Two-state supervisor for the child process.
//!
//! | state      | signal | effect                          | next       |
//! |------------|--------|---------------------------------|------------|
//! | NotRunning | start  | spawn                           | Running    |
//! | NotRunning | stop   | none                            | NotRunning |
//! | Running    | start  | terminate, reap, spawn          | Running    |
//! | Running    | stop   | terminate, reap                 | NotRunning |

use std::fmt;
use std::process::{Child, Command};
use std::str::FromStr;
use std::thread;
use std::time::{Duration, Instant};

use adnauseam_sync::RenderRound;

use crate::error::DaemonError;

const REAP_POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorSignal {
    Start,
    Stop,
}

impl SupervisorSignal {
    /// `Start` iff every binding produced output this round.
    pub fn for_round(round: &RenderRound) -> Self {
        if round.is_complete() {
            SupervisorSignal::Start
        } else {
            SupervisorSignal::Stop
        }
    }
}

impl FromStr for SupervisorSignal {
    type Err = DaemonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(SupervisorSignal::Start),
            "stop" => Ok(SupervisorSignal::Stop),
            other => Err(DaemonError::UnknownTransition(other.to_string())),
        }
    }
}

impl fmt::Display for SupervisorSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SupervisorSignal::Start => f.write_str("start"),
            SupervisorSignal::Stop => f.write_str("stop"),
        }
    }
}

#[derive(Debug, Default)]
pub enum ProcessState {
    #[default]
    NotRunning,
    Running(Child),
}

impl ProcessState {
    pub fn is_running(&self) -> bool {
        matches!(self, ProcessState::Running(_))
    }
}

/// Apply one signal. The old child is reaped before any replacement is spawned.
pub fn transition(
    state: ProcessState,
    signal: SupervisorSignal,
    command: &[String],
    stop_timeout: Duration,
) -> Result<ProcessState, DaemonError> {
    match (state, signal) {
        (ProcessState::NotRunning, SupervisorSignal::Start) => {
            tracing::info!("starting {}", display_command(command));
            spawn(command).map(ProcessState::Running)
        }
        (ProcessState::NotRunning, SupervisorSignal::Stop) => Ok(ProcessState::NotRunning),
        (ProcessState::Running(child), SupervisorSignal::Start) => {
            tracing::info!("restarting {}", display_command(command));
            terminate(child, stop_timeout)?;
            spawn(command).map(ProcessState::Running)
        }
        (ProcessState::Running(child), SupervisorSignal::Stop) => {
            tracing::info!("killing {}", display_command(command));
            terminate(child, stop_timeout)?;
            Ok(ProcessState::NotRunning)
        }
    }
}

fn spawn(command: &[String]) -> Result<Child, DaemonError> {
    let (program, args) = command.split_first().ok_or(DaemonError::EmptyCommand)?;
    let child = Command::new(program)
        .args(args)
        .spawn()
        .map_err(|source| DaemonError::Spawn {
            program: program.clone(),
            source,
        })?;
    tracing::debug!(pid = child.id(), "spawned {}", program);
    Ok(child)
}

/// Ask the child to exit, wait up to `timeout`, then kill it.
fn terminate(mut child: Child, timeout: Duration) -> Result<(), DaemonError> {
    let pid = child.id();
    let process_err = |source| DaemonError::Process { pid, source };

    if let Some(status) = child.try_wait().map_err(process_err)? {
        tracing::info!(pid, %status, "process had already exited");
        return Ok(());
    }

    request_exit(&mut child)?;
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait().map_err(process_err)? {
            tracing::debug!(pid, %status, "process exited");
            return Ok(());
        }
        if Instant::now() >= deadline {
            break;
        }
        thread::sleep(REAP_POLL_INTERVAL);
    }

    tracing::warn!(
        pid,
        timeout_ms = timeout.as_millis() as u64,
        "process did not exit in time; killing"
    );
    // Fails only if the child exited since the last poll; wait() still reaps it.
    let _ = child.kill();
    let status = child.wait().map_err(process_err)?;
    tracing::debug!(pid, %status, "process killed");
    Ok(())
}

#[cfg(unix)]
fn request_exit(child: &mut Child) -> Result<(), DaemonError> {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    let pid = child.id();
    let raw = i32::try_from(pid).map_err(|_| DaemonError::Process {
        pid,
        source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "pid out of range"),
    })?;
    // The child has not been reaped, so the pid cannot have been reused.
    kill(Pid::from_raw(raw), Signal::SIGTERM).map_err(|errno| DaemonError::Process {
        pid,
        source: std::io::Error::from(errno),
    })
}

#[cfg(not(unix))]
fn request_exit(child: &mut Child) -> Result<(), DaemonError> {
    let pid = child.id();
    child
        .kill()
        .map_err(|source| DaemonError::Process { pid, source })
}

fn display_command(command: &[String]) -> String {
    command.join(" ")
}

/// Owns the [`ProcessState`] and the command line it spawns.
///
/// Dropping a supervisor stops its child.
#[derive(Debug)]
pub struct Supervisor {
    command: Vec<String>,
    stop_timeout: Duration,
    state: ProcessState,
    spawn_count: usize,
}

impl Supervisor {
    pub fn new(command: Vec<String>, stop_timeout: Duration) -> Result<Self, DaemonError> {
        if command.is_empty() {
            return Err(DaemonError::EmptyCommand);
        }
        Ok(Self {
            command,
            stop_timeout,
            state: ProcessState::NotRunning,
            spawn_count: 0,
        })
    }

    pub fn handle(&mut self, signal: SupervisorSignal) -> Result<(), DaemonError> {
        let state = std::mem::take(&mut self.state);
        self.state = transition(state, signal, &self.command, self.stop_timeout)?;
        if signal == SupervisorSignal::Start {
            self.spawn_count += 1;
        }
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn pid(&self) -> Option<u32> {
        match &self.state {
            ProcessState::Running(child) => Some(child.id()),
            ProcessState::NotRunning => None,
        }
    }

    /// Children spawned so far, restarts included.
    pub fn spawn_count(&self) -> usize {
        self.spawn_count
    }

    pub fn shutdown(&mut self) -> Result<(), DaemonError> {
        self.handle(SupervisorSignal::Stop)
    }
}

impl Drop for Supervisor {
    fn drop(&mut self) {
        if self.is_running() {
            if let Err(err) = self.shutdown() {
                tracing::warn!("failed to stop {}: {err}", display_command(&self.command));
            }
        }
    }
}
