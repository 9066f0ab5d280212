//! Backend process ownership and the reader/writer loops
//!
//! A [`ProcessBridge`] owns one backend child process, a FIFO of pending
//! commands and exactly two background tasks:
//! - the writer task drains the queue into the backend's stdin, in order
//! - the reader task hands each stdout line, trimmed, to the output hook
//!
//! Lifecycle is `Unlaunched -> Running -> Terminated`. Both tasks check the
//! shared state every iteration and exit once it leaves `Running`.

use crate::config::BackendConfig;
use crate::queue::CommandQueue;
use nars_core::{LaunchCommand, NarsError, Result};
use std::fmt;
use std::process::Stdio;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// First line sent after spawn, silencing the backend's own chatter
pub const HANDSHAKE: &str = "*volume=0";

/// Callback receiving each trimmed backend output line
pub type OutputHook = Box<dyn FnMut(&str) + Send>;

/// Lifecycle state of a bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BridgeState {
    Unlaunched = 0,
    Running = 1,
    /// Terminal; the process is gone and commands are refused
    Terminated = 2,
}

impl BridgeState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => BridgeState::Unlaunched,
            1 => BridgeState::Running,
            _ => BridgeState::Terminated,
        }
    }
}

/// State shared between the owner and the two tasks
struct Shared {
    state: AtomicU8,
    queue: CommandQueue,
    hook: Mutex<Option<OutputHook>>,
    wake: Notify,
}

impl Shared {
    fn new() -> Self {
        Self {
            state: AtomicU8::new(BridgeState::Unlaunched as u8),
            queue: CommandQueue::new(),
            hook: Mutex::new(None),
            wake: Notify::new(),
        }
    }

    fn state(&self) -> BridgeState {
        BridgeState::from_u8(self.state.load(Ordering::SeqCst))
    }

    fn is_running(&self) -> bool {
        self.state() == BridgeState::Running
    }

    /// Move to `Terminated`, returning whether this call made the transition
    fn shut_down(&self) -> bool {
        let previous = self
            .state
            .swap(BridgeState::Terminated as u8, Ordering::SeqCst);
        self.queue.close();
        self.hook
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        self.wake.notify_one();
        BridgeState::from_u8(previous) != BridgeState::Terminated
    }

    fn dispatch(&self, line: &str) {
        let mut hook = self.hook.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(hook) = hook.as_mut() {
            hook(line);
        }
    }
}

/// Owner of a backend process and its I/O tasks
pub struct ProcessBridge {
    command: LaunchCommand,
    inference_cadence: u32,
    shared: Arc<Shared>,
    child: Option<Child>,
    reader_handle: Option<JoinHandle<()>>,
    writer_handle: Option<JoinHandle<()>>,
}

impl ProcessBridge {
    /// Create an unlaunched bridge
    ///
    /// `inference_cadence` is the step count pushed by [`step_inference`];
    /// 0 leaves pacing to the backend.
    ///
    /// [`step_inference`]: ProcessBridge::step_inference
    pub fn new(command: LaunchCommand, inference_cadence: u32) -> Self {
        Self {
            command,
            inference_cadence,
            shared: Arc::new(Shared::new()),
            child: None,
            reader_handle: None,
            writer_handle: None,
        }
    }

    /// Create an unlaunched bridge for a configured backend family
    pub fn from_config(config: &BackendConfig) -> Self {
        Self::new(config.launch_command(), config.inference_cadence())
    }

    pub fn command(&self) -> &LaunchCommand {
        &self.command
    }

    pub fn state(&self) -> BridgeState {
        self.shared.state()
    }

    pub fn is_alive(&self) -> bool {
        self.shared.is_running()
    }

    /// Install the callback that receives backend output lines
    ///
    /// The hook runs on the reader task, one line at a time.
    pub fn set_output_hook<F>(&self, hook: F)
    where
        F: FnMut(&str) + Send + 'static,
    {
        *self.shared.hook.lock().unwrap_or_else(PoisonError::into_inner) = Some(Box::new(hook));
    }

    pub fn clear_output_hook(&self) {
        self.shared
            .hook
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }

    /// Spawn the backend, send the handshake and start the reader and writer tasks
    ///
    /// Must be called from within a tokio runtime. Commands enqueued before
    /// launch are written after the handshake.
    pub async fn launch(&mut self) -> Result<()> {
        match self.state() {
            BridgeState::Unlaunched => {}
            BridgeState::Running => return Err(NarsError::AlreadyLaunched),
            BridgeState::Terminated => return Err(NarsError::Terminated),
        }

        info!("Launching backend: {}", self.command);

        let mut child = Command::new(&self.command.program)
            .args(&self.command.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| NarsError::Spawn(format!("{}: {}", self.command, e)))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| NarsError::Spawn("Failed to capture backend stdin".into()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| NarsError::Spawn("Failed to capture backend stdout".into()))?;

        if let Err(e) = write_line(&mut stdin, HANDSHAKE).await {
            let _ = child.start_kill();
            return Err(NarsError::Io(format!("Handshake failed: {}", e)));
        }

        self.shared
            .state
            .store(BridgeState::Running as u8, Ordering::SeqCst);

        self.reader_handle = Some(tokio::spawn(read_loop(stdout, self.shared.clone())));
        self.writer_handle = Some(tokio::spawn(write_loop(stdin, self.shared.clone())));
        self.child = Some(child);

        info!(
            "Backend running (pid {:?}, {} queued command(s))",
            self.child.as_ref().and_then(|c| c.id()),
            self.shared.queue.len()
        );
        Ok(())
    }

    /// Append a command to the queue. Never blocks.
    ///
    /// Fails with [`NarsError::Terminated`] once the bridge has shut down.
    pub fn enqueue(&self, command: impl Into<String>) -> Result<()> {
        let command = command.into();
        if let Err(e) = self.shared.queue.push(command) {
            debug!("Dropping command for terminated backend");
            return Err(e);
        }
        self.shared.wake.notify_one();
        Ok(())
    }

    pub fn inference_cadence(&self) -> u32 {
        self.inference_cadence
    }

    pub fn set_inference_cadence(&mut self, cadence: u32) {
        self.inference_cadence = cadence;
    }

    /// Push one inference step, unless the backend paces itself
    pub fn step_inference(&self) -> Result<()> {
        if self.inference_cadence == 0 {
            return Ok(());
        }
        self.enqueue(self.inference_cadence.to_string())
    }

    pub fn pending_command_count(&self) -> usize {
        self.shared.queue.len()
    }

    /// Pending commands, oldest first
    pub fn pending_commands(&self) -> Vec<String> {
        self.shared.queue.snapshot()
    }

    /// Drop all pending commands, returning how many were dropped
    pub fn clear_pending_commands(&self) -> usize {
        self.shared.queue.clear()
    }

    /// Kill the backend and stop both tasks. Idempotent.
    pub fn terminate(&mut self) {
        let transitioned = self.shared.shut_down();

        if let Some(mut child) = self.child.take() {
            if let Err(e) = child.start_kill() {
                debug!("Backend already gone: {}", e);
            }
        }
        if let Some(handle) = self.reader_handle.take() {
            handle.abort();
        }
        if let Some(handle) = self.writer_handle.take() {
            handle.abort();
        }

        if transitioned {
            info!("Backend terminated: {}", self.command);
        }
    }
}

impl Drop for ProcessBridge {
    fn drop(&mut self) {
        self.terminate();
    }
}

impl fmt::Debug for ProcessBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessBridge")
            .field("command", &self.command)
            .field("state", &self.state())
            .field("inference_cadence", &self.inference_cadence)
            .field("pending", &self.pending_command_count())
            .finish()
    }
}

async fn write_line(stdin: &mut ChildStdin, line: &str) -> std::io::Result<()> {
    stdin.write_all(line.as_bytes()).await?;
    stdin.write_all(b"\n").await?;
    stdin.flush().await
}

/// Drain the queue into the backend's stdin while running
async fn write_loop(mut stdin: ChildStdin, shared: Arc<Shared>) {
    while shared.is_running() {
        let Some(command) = shared.queue.pop() else {
            shared.wake.notified().await;
            continue;
        };

        debug!("[Rust→NARS] {}", command);
        if let Err(e) = write_line(&mut stdin, &command).await {
            warn!("Write to backend failed: {}", e);
            shared.shut_down();
            break;
        }
    }
    debug!("Writer task exiting");
}

/// Dispatch backend stdout lines to the hook while running
async fn read_loop(stdout: ChildStdout, shared: Arc<Shared>) {
    let mut reader = BufReader::new(stdout);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => {
                debug!("Backend closed stdout");
                break;
            }
            Ok(_) => {
                if !shared.is_running() {
                    break;
                }
                let line = String::from_utf8_lossy(&buf);
                let line = line.trim();
                debug!("[NARS→Rust] {}", line);
                shared.dispatch(line);
            }
            Err(e) => {
                warn!("Read from backend failed: {}", e);
                break;
            }
        }
    }

    if shared.shut_down() {
        info!("Backend output ended, bridge terminated");
    }
    debug!("Reader task exiting");
}
