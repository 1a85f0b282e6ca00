/*!
 * Demo Programs
 *
 * Small user programs registered with the default loader. They exercise
 * the syscall surface end to end and double as fixtures for the binary.
 */

use crate::core::limits::{PHYS_BASE, STDIN_FILENO, STDOUT_FILENO};
use crate::core::types::RawFd;
use crate::process::{ProgramRegistry, ProgramResult, UserContext};

const STDIN: RawFd = STDIN_FILENO as RawFd;
const STDOUT: RawFd = STDOUT_FILENO as RawFd;

/// Chunk size used when copying files to the console
const COPY_CHUNK: u32 = 64;

/// Registry preloaded with every demo program
pub fn demo_registry() -> ProgramRegistry {
    let registry = ProgramRegistry::new();
    register_demos(&registry);
    registry
}

/// Add the demo programs to `registry`
pub fn register_demos(registry: &ProgramRegistry) {
    registry
        .register("echo", echo)
        .register("cat", cat)
        .register("touch", touch)
        .register("rm", rm)
        .register("exit", exit_with)
        .register("run", run)
        .register("readline", readline)
        .register("halt", |ctx, _| Err(ctx.halt()))
        .register("bad-pointer", bad_pointer)
        .register("fault", fault);
}

/// echo ARGS...: print the arguments on one line
fn echo(ctx: &mut UserContext<'_>, argv: &[String]) -> ProgramResult {
    let line = format!("{}\n", argv[1..].join(" "));
    ctx.print(&line)?;
    Ok(0)
}

/// cat FILE...: copy files to the console
fn cat(ctx: &mut UserContext<'_>, argv: &[String]) -> ProgramResult {
    let mut status = 0;
    for name in &argv[1..] {
        let fd = ctx.open(name)?;
        if fd < 0 {
            ctx.print(&format!("cat: {name}: cannot open\n"))?;
            status = 1;
            continue;
        }
        loop {
            let (count, bytes) = ctx.read(fd, COPY_CHUNK)?;
            if count <= 0 {
                break;
            }
            ctx.write(STDOUT, &bytes)?;
        }
        ctx.close(fd)?;
    }
    Ok(status)
}

/// touch NAME [SIZE]: create a zero-filled file
fn touch(ctx: &mut UserContext<'_>, argv: &[String]) -> ProgramResult {
    let Some(name) = argv.get(1) else {
        return Ok(1);
    };
    let size = argv.get(2).and_then(|s| s.parse().ok()).unwrap_or(0);
    Ok(if ctx.create(name, size)? { 0 } else { 1 })
}

/// rm NAME: remove a file
fn rm(ctx: &mut UserContext<'_>, argv: &[String]) -> ProgramResult {
    let Some(name) = argv.get(1) else {
        return Ok(1);
    };
    Ok(if ctx.remove(name)? { 0 } else { 1 })
}

/// exit CODE: terminate through the exit syscall
fn exit_with(ctx: &mut UserContext<'_>, argv: &[String]) -> ProgramResult {
    let code = argv.get(1).and_then(|s| s.parse().ok()).unwrap_or(0);
    Err(ctx.exit(code))
}

/// run CMD ARGS...: exec a child, wait for it and exit with its status
fn run(ctx: &mut UserContext<'_>, argv: &[String]) -> ProgramResult {
    let cmdline = argv[1..].join(" ");
    let child = ctx.exec(&cmdline)?;
    if child < 0 {
        ctx.print(&format!("run: cannot exec '{cmdline}'\n"))?;
        return Ok(-1);
    }
    ctx.wait(child)
}

/// readline: echo one line of console input
fn readline(ctx: &mut UserContext<'_>, _argv: &[String]) -> ProgramResult {
    let mut line = Vec::new();
    loop {
        let (count, bytes) = ctx.read(STDIN, 1)?;
        if count <= 0 || bytes.first().map_or(true, |&b| b == b'\n' || b == 0) {
            break;
        }
        line.extend_from_slice(&bytes);
    }
    line.push(b'\n');
    ctx.write(STDOUT, &line)?;
    Ok(0)
}

/// bad-pointer: pass a kernel address to write; the kernel kills the process
fn bad_pointer(ctx: &mut UserContext<'_>, _argv: &[String]) -> ProgramResult {
    use crate::syscalls::SyscallNumber;
    ctx.syscall(&[SyscallNumber::Write as u32, STDOUT_FILENO, PHYS_BASE, 4])?;
    Ok(0)
}

/// fault: dereference null from user mode
fn fault(ctx: &mut UserContext<'_>, _argv: &[String]) -> ProgramResult {
    let byte = ctx.load(0)?;
    Ok(byte as i32)
}
