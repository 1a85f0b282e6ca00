/*!
 * Kernel
 *
 * Shared kernel state and the entry points used to boot a first task. Every
 * process thread holds a cheap clone; the lifecycle and syscall handlers are
 * implemented on `Kernel` in their own modules.
 */

use dashmap::DashMap;
use parking_lot::{Condvar, Mutex};
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

use crate::core::config::KernelConfig;
use crate::core::errors::KernelError;
use crate::core::types::{KernelResult, Pid, StatusCode};
use crate::devices::{Console, PowerControl, SimulatedPower, StdConsole};
use crate::process::{Holder, LoadError, ProcessTable, ProgramLoader, ProgramRegistry};
use crate::vfs::{FileSystem, MemFS};

/// Handle to a running kernel
#[derive(Clone)]
pub struct Kernel {
    inner: Arc<KernelInner>,
}

struct KernelInner {
    config: KernelConfig,
    records: ProcessTable,
    live: DashMap<Pid, String>,
    fs: Arc<dyn FileSystem>,
    console: Arc<dyn Console>,
    power: Arc<dyn PowerControl>,
    loader: Arc<dyn ProgramLoader>,
    threads: ThreadTracker,
}

impl Kernel {
    pub fn builder() -> KernelBuilder {
        KernelBuilder::new()
    }

    // ========================================================================
    // Booting
    // ========================================================================

    /// Run `cmdline` as the initial task and wait for it to finish
    ///
    /// The task's termination notice has been written when this returns.
    /// Orphans it left behind may still be running; see [`Kernel::wait_idle`].
    pub fn run_task(&self, cmdline: &str) -> KernelResult<StatusCode> {
        if self.is_halted() {
            return Err(KernelError::Halted);
        }

        let spawned = self.spawn(cmdline).map_err(|err| match err {
            LoadError::EmptyCommand => KernelError::EmptyCommand,
            LoadError::PoweredOff(_) => KernelError::Halted,
            other => KernelError::LoadFailed(other.to_string()),
        })?;

        let record = spawned.record;
        let pid = record.pid();
        let status = record.wait_completion(self.power());
        self.records().release(&record, Holder::Parent);

        let Some(status) = status else {
            warn!(pid, "machine powered off before the initial task finished");
            return Err(KernelError::PoweredOff(pid));
        };

        // Completion is signaled before the exit notice is printed
        if spawned.handle.join().is_err() {
            warn!(pid, "initial task thread panicked");
        }

        info!(pid, code = status.code(), "initial task finished");
        Ok(status.code())
    }

    /// Power off and release every blocked waiter
    pub fn halt(&self) {
        self.power().power_off();
        self.records().interrupt_all();
    }

    /// Block until every process thread has returned
    pub fn wait_idle(&self) {
        self.inner.threads.wait_idle();
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Whether `pid` is still schedulable (created and not yet exited)
    #[inline]
    pub fn is_live(&self, pid: Pid) -> bool {
        self.inner.live.contains_key(&pid)
    }

    /// Whether a process record for `pid` is still held by anyone
    #[inline]
    pub fn has_record(&self, pid: Pid) -> bool {
        self.records().contains(pid)
    }

    #[inline]
    pub fn record_count(&self) -> usize {
        self.records().len()
    }

    #[inline]
    pub fn live_count(&self) -> usize {
        self.inner.live.len()
    }

    #[inline]
    pub fn is_halted(&self) -> bool {
        self.power().is_off()
    }

    #[inline]
    pub fn config(&self) -> &KernelConfig {
        &self.inner.config
    }

    // ========================================================================
    // Collaborators
    // ========================================================================

    #[inline]
    pub(crate) fn records(&self) -> &ProcessTable {
        &self.inner.records
    }

    #[inline]
    pub(crate) fn threads(&self) -> &ThreadTracker {
        &self.inner.threads
    }

    #[inline]
    pub(crate) fn loader(&self) -> &dyn ProgramLoader {
        self.inner.loader.as_ref()
    }

    #[inline]
    pub(crate) fn power(&self) -> &dyn PowerControl {
        self.inner.power.as_ref()
    }

    #[inline]
    pub(crate) fn console(&self) -> &dyn Console {
        self.inner.console.as_ref()
    }

    #[inline]
    pub(crate) fn fs(&self) -> &dyn FileSystem {
        self.inner.fs.as_ref()
    }

    pub(crate) fn mark_live(&self, pid: Pid, name: &str) {
        self.inner.live.insert(pid, name.to_string());
    }

    pub(crate) fn unmark_live(&self, pid: Pid) {
        self.inner.live.remove(&pid);
    }
}

impl fmt::Debug for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Kernel")
            .field("fs", &self.inner.fs.name())
            .field("live", &self.inner.live.len())
            .field("records", &self.inner.records.len())
            .field("halted", &self.is_halted())
            .finish()
    }
}

// ============================================================================
// Thread accounting
// ============================================================================

/// Counts process threads so the host can wait for orphans to finish
#[derive(Default)]
pub(crate) struct ThreadTracker {
    state: Arc<TrackerState>,
}

#[derive(Default)]
struct TrackerState {
    active: Mutex<usize>,
    idle: Condvar,
}

impl ThreadTracker {
    /// Count one thread until the returned guard drops
    pub(crate) fn register(&self) -> ActiveThread {
        *self.state.active.lock() += 1;
        ActiveThread {
            state: Arc::clone(&self.state),
        }
    }

    fn wait_idle(&self) {
        let mut active = self.state.active.lock();
        while *active > 0 {
            self.state.idle.wait(&mut active);
        }
    }
}

/// Registration of one process thread; moved into the thread it counts
pub(crate) struct ActiveThread {
    state: Arc<TrackerState>,
}

impl Drop for ActiveThread {
    fn drop(&mut self) {
        let mut active = self.state.active.lock();
        *active -= 1;
        if *active == 0 {
            self.state.idle.notify_all();
        }
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`Kernel`]
pub struct KernelBuilder {
    config: KernelConfig,
    fs: Option<Arc<dyn FileSystem>>,
    console: Option<Arc<dyn Console>>,
    power: Option<Arc<dyn PowerControl>>,
    loader: Option<Arc<dyn ProgramLoader>>,
}

impl KernelBuilder {
    pub fn new() -> Self {
        Self {
            config: KernelConfig::default(),
            fs: None,
            console: None,
            power: None,
            loader: None,
        }
    }

    pub fn with_config(mut self, config: KernelConfig) -> Self {
        self.config = config;
        self
    }

    /// Shared file system (default: empty `MemFS`)
    pub fn with_filesystem(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = Some(fs);
        self
    }

    /// Console device (default: host stdin/stdout)
    pub fn with_console(mut self, console: Arc<dyn Console>) -> Self {
        self.console = Some(console);
        self
    }

    pub fn with_power(mut self, power: Arc<dyn PowerControl>) -> Self {
        self.power = Some(power);
        self
    }

    /// Program loader (default: an empty `ProgramRegistry`)
    pub fn with_loader(mut self, loader: Arc<dyn ProgramLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    pub fn build(self) -> KernelResult<Kernel> {
        self.config.validate()?;

        let fs = self.fs.unwrap_or_else(|| Arc::new(MemFS::new()));
        info!(
            fs = fs.name(),
            stack_pages = self.config.user_stack_pages,
            "Kernel initialized"
        );

        Ok(Kernel {
            inner: Arc::new(KernelInner {
                config: self.config,
                records: ProcessTable::new(),
                live: DashMap::new(),
                fs,
                console: self.console.unwrap_or_else(|| Arc::new(StdConsole::new())),
                power: self.power.unwrap_or_else(|| Arc::new(SimulatedPower::new())),
                loader: self
                    .loader
                    .unwrap_or_else(|| Arc::new(ProgramRegistry::new())),
                threads: ThreadTracker::default(),
            }),
        })
    }
}

impl Default for KernelBuilder {
    fn default() -> Self {
        Self::new()
    }
}
