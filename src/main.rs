/*!
 * Userprog Kernel - Main Entry Point
 *
 * Boots the kernel with an in-memory file system and the demo programs,
 * runs the command line given as arguments as the initial task, and exits
 * with that task's status.
 *
 * Example: `kernel run cat motd`
 */

use miette::{IntoDiagnostic, Result};
use std::sync::Arc;
use tracing::info;

use userprog_kernel::{demo_registry, init_tracing, Kernel, KernelConfig, MemFS, StdConsole};

const MOTD: &[u8] = b"Welcome to the userprog kernel.\n";

fn main() -> Result<()> {
    let config = KernelConfig::from_env()?;
    init_tracing(config.trace_json);

    let cmdline = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    let cmdline = if cmdline.trim().is_empty() {
        "echo hello from userprog".to_string()
    } else {
        cmdline
    };

    let fs = MemFS::new();
    fs.insert("motd", MOTD).into_diagnostic()?;

    let kernel = Kernel::builder()
        .with_config(config)
        .with_filesystem(Arc::new(fs))
        .with_console(Arc::new(StdConsole::new()))
        .with_loader(Arc::new(demo_registry()))
        .build()?;

    info!(cmdline = %cmdline, "Running initial task");
    let code = kernel.run_task(&cmdline)?;
    kernel.wait_idle();

    info!(code, "Kernel shutting down");
    std::process::exit(code);
}
