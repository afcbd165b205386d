use std::collections::HashMap;
use std::future::Future;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use colored::Color;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use forewoman_core::{InstanceName, InstanceSpec, Plan};

use crate::error::SupervisorError;
use crate::event::{Event, InstanceExit, Stream};
use crate::multiplexer::Multiplexer;
use crate::palette::color_for;

const READ_BUFFER: usize = 8 * 1024;

/// How long pipe readers may keep draining after the child itself exited.
/// A background grandchild can hold the pipes open far longer.
const DRAIN_TIMEOUT: Duration = Duration::from_millis(250);

/// A spawned (or failed-to-spawn) instance, owned by the [`Supervisor`].
#[derive(Debug)]
pub struct RunningProcess {
    pub pid: Option<u32>,
    pub port: u16,
    pub color: Color,
    kill: Option<oneshot::Sender<()>>,
}

/// How each instance ended, in the order exits were observed.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub exits: Vec<(InstanceName, InstanceExit)>,
}

impl RunSummary {
    pub fn failed(&self) -> usize {
        self.exits.iter().filter(|(_, exit)| !exit.success()).count()
    }
}

/// Spawns instances and routes their lifecycle events to the console.
///
/// The registry of running instances is owned here and only mutated by
/// [`Supervisor::spawn`] and the [`Supervisor::run`] loop. Each child gets a
/// reader task per pipe plus a watcher task; all of them report back over one
/// channel, so the loop never blocks on any single child.
pub struct Supervisor<W: Write> {
    working_dir: PathBuf,
    running: HashMap<InstanceName, RunningProcess>,
    spawned: usize,
    events_tx: mpsc::UnboundedSender<Event>,
    events_rx: mpsc::UnboundedReceiver<Event>,
    console: Multiplexer<W>,
    summary: RunSummary,
}

impl<W: Write> Supervisor<W> {
    pub fn new(working_dir: impl Into<PathBuf>, console: Multiplexer<W>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            working_dir: working_dir.into(),
            running: HashMap::new(),
            spawned: 0,
            events_tx,
            events_rx,
            console,
            summary: RunSummary::default(),
        }
    }

    /// Launch one instance without waiting on it.
    ///
    /// A launch failure is not returned: it is logged and reported as an
    /// ordinary exit event so sibling instances are unaffected.
    pub fn spawn(&mut self, spec: InstanceSpec) {
        let color = color_for(self.spawned);
        self.spawned += 1;

        let (kill_tx, kill_rx) = oneshot::channel();
        let pid = match launch(&spec, &self.working_dir) {
            Ok(mut child) => {
                let pid = child.id();
                tracing::debug!(instance = %spec.name, port = spec.port, pid = ?pid, "spawned");
                let tx = &self.events_tx;
                let readers = [
                    child.stdout.take().map(|out| {
                        tokio::spawn(pump(out, spec.name.clone(), Stream::Stdout, tx.clone()))
                    }),
                    child.stderr.take().map(|err| {
                        tokio::spawn(pump(err, spec.name.clone(), Stream::Stderr, tx.clone()))
                    }),
                ];
                tokio::spawn(watch(
                    child,
                    spec.name.clone(),
                    kill_rx,
                    readers.into_iter().flatten().collect(),
                    self.events_tx.clone(),
                ));
                pid
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to start process");
                let _ = self.events_tx.send(Event::Exited {
                    instance: spec.name.clone(),
                    exit: InstanceExit::SpawnFailed,
                });
                None
            }
        };

        self.running.insert(
            spec.name,
            RunningProcess {
                pid,
                port: spec.port,
                color,
                kill: Some(kill_tx),
            },
        );
    }

    pub fn running(&self) -> usize {
        self.running.len()
    }

    pub fn get(&self, instance: &str) -> Option<&RunningProcess> {
        self.running.get(&InstanceName::from(instance))
    }

    /// Ask every live instance to terminate. Their exit lines still print.
    pub fn stop_all(&mut self) {
        for (name, process) in &mut self.running {
            if let Some(kill) = process.kill.take() {
                tracing::debug!(instance = %name, "stopping");
                let _ = kill.send(());
            }
        }
    }

    /// Drive the event loop until every instance has exited.
    ///
    /// When `shutdown` resolves, all remaining instances are killed and the
    /// loop keeps going until their exits are reported.
    pub async fn run<F>(mut self, shutdown: F) -> Result<RunSummary, SupervisorError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut stopping = false;

        while !self.running.is_empty() {
            tokio::select! {
                _ = &mut shutdown, if !stopping => {
                    stopping = true;
                    tracing::info!(running = self.running.len(), "stopping all processes");
                    self.stop_all();
                }
                event = self.events_rx.recv() => {
                    let Some(event) = event else { break };
                    self.handle(event)?;
                }
            }
        }

        Ok(self.summary)
    }

    fn handle(&mut self, event: Event) -> Result<(), SupervisorError> {
        match event {
            Event::Output {
                instance,
                stream,
                chunk,
            } => {
                let Some(process) = self.running.get(&instance) else {
                    tracing::debug!(instance = %instance, ?stream, "output from unknown instance");
                    return Ok(());
                };
                self.console
                    .output(&instance.0, process.color, &chunk)
                    .map_err(SupervisorError::Console)
            }
            Event::Exited { instance, exit } => {
                let Some(process) = self.running.remove(&instance) else {
                    return Ok(());
                };
                self.console
                    .exited(&instance.0, process.color, exit)
                    .map_err(SupervisorError::Console)?;
                self.summary.exits.push((instance, exit));
                Ok(())
            }
        }
    }
}

/// Split a command on runs of whitespace into program and arguments.
///
/// There is no shell quoting: `echo "a b"` yields `["\"a", "b\""]`.
pub fn tokenize(command: &str) -> Option<(&str, Vec<&str>)> {
    let mut tokens = command.split_whitespace();
    let program = tokens.next()?;
    Some((program, tokens.collect()))
}

fn launch(spec: &InstanceSpec, working_dir: &Path) -> Result<Child, SupervisorError> {
    let (program, args) =
        tokenize(&spec.command).ok_or_else(|| SupervisorError::EmptyCommand {
            instance: spec.name.0.clone(),
        })?;

    Command::new(program)
        .args(args)
        .current_dir(working_dir)
        .env_clear()
        .envs(&spec.environment)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| SupervisorError::Spawn {
            instance: spec.name.0.clone(),
            program: program.to_string(),
            source,
        })
}

/// Forward raw chunks from one pipe until EOF.
async fn pump<R>(
    mut reader: R,
    instance: InstanceName,
    stream: Stream,
    tx: mpsc::UnboundedSender<Event>,
) where
    R: AsyncRead + Unpin,
{
    let mut buf = vec![0u8; READ_BUFFER];
    loop {
        match reader.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => {
                let event = Event::Output {
                    instance: instance.clone(),
                    stream,
                    chunk: buf[..n].to_vec(),
                };
                if tx.send(event).is_err() {
                    break;
                }
            }
            Err(err) => {
                tracing::warn!(instance = %instance, ?stream, error = %err, "pipe read failed");
                break;
            }
        }
    }
}

/// Wait for the child (or a kill request), drain its pipes, report the exit.
async fn watch(
    mut child: Child,
    instance: InstanceName,
    mut kill_rx: oneshot::Receiver<()>,
    readers: Vec<JoinHandle<()>>,
    tx: mpsc::UnboundedSender<Event>,
) {
    let status = tokio::select! {
        status = child.wait() => status,
        _ = &mut kill_rx => {
            if let Err(err) = child.start_kill() {
                tracing::warn!(instance = %instance, error = %err, "kill failed");
            }
            child.wait().await
        }
    };

    let deadline = tokio::time::Instant::now() + DRAIN_TIMEOUT;
    for mut reader in readers {
        if tokio::time::timeout_at(deadline, &mut reader).await.is_err() {
            tracing::debug!(instance = %instance, "pipe still held open after exit, dropping reader");
            reader.abort();
        }
    }

    let exit = match status {
        Ok(status) => InstanceExit::from_status(status),
        Err(err) => {
            tracing::error!(instance = %instance, error = %err, "failed to wait on process");
            InstanceExit::Unknown
        }
    };
    let _ = tx.send(Event::Exited { instance, exit });
}

/// Spawn every planned instance and supervise them on the current thread
/// until all exit. Ctrl-c stops the remaining instances.
pub fn start_blocking(plan: Plan, colorize: bool) -> Result<RunSummary, SupervisorError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(SupervisorError::Runtime)?;

    runtime.block_on(async move {
        let console = Multiplexer::new(std::io::stdout(), colorize);
        let mut supervisor = Supervisor::new(plan.working_dir, console);
        for spec in plan.instances {
            supervisor.spawn(spec);
        }
        supervisor.run(ctrl_c()).await
    })
}

async fn ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("received ctrl-c"),
        Err(err) => {
            tracing::warn!(error = %err, "ctrl-c handler unavailable");
            std::future::pending::<()>().await;
        }
    }
}

pub fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
