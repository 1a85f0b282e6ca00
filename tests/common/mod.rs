/*!
 * Shared test harness
 * A kernel wired to a buffered console, an in-memory file system and an
 * empty program registry the test fills in.
 */

#![allow(dead_code)]

use std::sync::Arc;

use userprog_kernel::{
    BufferedConsole, Kernel, KernelResult, MemFS, ProgramRegistry, ProgramResult, StatusCode,
    UserContext,
};

pub struct Harness {
    pub kernel: Kernel,
    pub console: Arc<BufferedConsole>,
    pub fs: MemFS,
    pub programs: ProgramRegistry,
}

impl Harness {
    pub fn new() -> Self {
        let console = Arc::new(BufferedConsole::new());
        let fs = MemFS::new();
        let programs = ProgramRegistry::new();
        let kernel = Kernel::builder()
            .with_console(console.clone())
            .with_filesystem(Arc::new(fs.clone()))
            .with_loader(Arc::new(programs.clone()))
            .build()
            .expect("default config is valid");

        Self {
            kernel,
            console,
            fs,
            programs,
        }
    }

    pub fn program<F>(&self, name: &str, main: F) -> &Self
    where
        F: Fn(&mut UserContext<'_>, &[String]) -> ProgramResult + Send + Sync + 'static,
    {
        self.programs.register(name, main);
        self
    }

    /// Run `cmdline` as the initial task and wait for every thread to finish
    pub fn run(&self, cmdline: &str) -> KernelResult<StatusCode> {
        let result = self.kernel.run_task(cmdline);
        if result.is_ok() {
            self.kernel.wait_idle();
        }
        result
    }

    pub fn lines(&self) -> Vec<String> {
        self.console.lines()
    }

    /// Termination notices only, in print order
    pub fn exit_notices(&self) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|line| line.contains(": exit("))
            .collect()
    }
}
