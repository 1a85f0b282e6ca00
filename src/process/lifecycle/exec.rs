/*!
 * Exec
 * Spawn a process and rendezvous with its load result
 */

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, info, warn};

use crate::core::limits::EXIT_FAILURE;
use crate::core::types::StatusCode;
use crate::kernel::Kernel;
use crate::process::context::UserContext;
use crate::process::record::ProcessRecord;
use crate::process::task::Process;
use crate::process::types::{ExitStatus, Holder, LoadError};

/// One-shot report sent by a new process before it runs user code
#[derive(Debug)]
enum LoadOutcome {
    Loaded,
    Failed(LoadError),
}

/// A successfully loaded process
///
/// The caller holds the parent-side reference on `record`.
pub(crate) struct Spawned {
    pub record: Arc<ProcessRecord>,
    pub handle: JoinHandle<()>,
}

impl Kernel {
    /// exec(cmdline): new child pid, or -1 if the command is empty or fails to load
    pub(crate) fn exec(&self, process: &mut Process, cmdline: &str) -> StatusCode {
        match self.spawn(cmdline) {
            Ok(spawned) => {
                let pid = spawned.record.pid();
                process.children.insert(spawned.record);
                // Detached: the child is observed through its record only
                drop(spawned.handle);
                pid as StatusCode
            }
            Err(err) => {
                debug!(pid = process.pid(), cmdline, error = %err, "exec failed");
                EXIT_FAILURE
            }
        }
    }

    /// Start a process for `cmdline` and block until it has loaded or failed
    ///
    /// On failure the child has already run its exit path and its thread has
    /// been joined; the parent-side reference is released here, so nothing of
    /// the child remains reachable.
    pub(crate) fn spawn(&self, cmdline: &str) -> Result<Spawned, LoadError> {
        let argv: Vec<String> = cmdline.split_whitespace().map(str::to_string).collect();
        let Some(name) = argv.first().cloned() else {
            return Err(LoadError::EmptyCommand);
        };
        if self.is_halted() {
            return Err(LoadError::PoweredOff(name));
        }

        let record = self.records().allocate(&name);
        let pid = record.pid();
        let (tx, rx) = flume::bounded(1);

        let kernel = self.clone();
        let owner = Arc::clone(&record);
        let active = self.threads().register();

        let spawned = thread::Builder::new()
            .name(format!("{name}#{pid}"))
            .spawn(move || {
                let _active = active;
                kernel.process_main(owner, argv, tx);
            });

        let handle = match spawned {
            Ok(handle) => handle,
            Err(e) => {
                self.records().release(&record, Holder::Owner);
                self.records().release(&record, Holder::Parent);
                return Err(LoadError::SpawnFailed(e.to_string()));
            }
        };

        let outcome = rx.recv().unwrap_or_else(|_| {
            LoadOutcome::Failed(LoadError::SpawnFailed(format!(
                "{name}: process ended without reporting"
            )))
        });

        match outcome {
            LoadOutcome::Loaded => {
                info!(pid, name, "process started");
                Ok(Spawned { record, handle })
            }
            LoadOutcome::Failed(err) => {
                if handle.join().is_err() {
                    warn!(pid, "process thread panicked during load");
                }
                self.records().release(&record, Holder::Parent);
                Err(err)
            }
        }
    }

    /// Body of every process thread
    fn process_main(
        &self,
        record: Arc<ProcessRecord>,
        argv: Vec<String>,
        report: flume::Sender<LoadOutcome>,
    ) {
        let pid = record.pid();
        let mut process = Process::new(record, self.config().user_stack_pages);
        self.mark_live(pid, process.name());

        let loaded = panic::catch_unwind(AssertUnwindSafe(|| {
            self.loader().load(&argv, process.memory_mut())
        }))
        .unwrap_or_else(|_| {
            Err(LoadError::Rejected {
                program: process.name().to_string(),
                reason: "loader panicked".into(),
            })
        });

        let mut program = match loaded {
            Ok(program) => program,
            Err(err) => {
                warn!(pid, error = %err, "load failed");
                self.exit(&mut process, ExitStatus::Exited(EXIT_FAILURE));
                let _ = report.send(LoadOutcome::Failed(err));
                return;
            }
        };

        // The parent is blocked in recv until this arrives
        let _ = report.send(LoadOutcome::Loaded);
        drop(report);

        let (result, stopped) = {
            let mut ctx = UserContext::new(self, &mut process);
            let result = panic::catch_unwind(AssertUnwindSafe(|| program.main(&mut ctx, &argv)));
            (result, ctx.stopped())
        };

        // Exit path already ran, or the machine is off and nothing may print
        if stopped.is_some() || self.is_halted() {
            return;
        }

        let status = match result {
            Ok(Ok(code)) => ExitStatus::Exited(code),
            Ok(Err(trap)) => {
                warn!(pid, %trap, "program returned a trap without terminating");
                ExitStatus::killed()
            }
            Err(_) => {
                warn!(pid, "program panicked");
                ExitStatus::killed()
            }
        };
        self.exit(&mut process, status);
    }
}
