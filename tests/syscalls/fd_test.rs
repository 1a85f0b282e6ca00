/*!
 * Descriptor Syscall Tests
 * open/close/read/write/seek/tell/filesize through the trap path
 */

use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use std::sync::Arc;

use crate::common::Harness;
use userprog_kernel::{ProgramResult, UserContext};

/// Run `body` as the initial task, returning its status and whatever it logged
fn run_logged<F>(h: &Harness, body: F) -> (i32, Vec<i32>)
where
    F: Fn(&mut UserContext<'_>, &mut Vec<i32>) -> ProgramResult + Send + Sync + 'static,
{
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = seen.clone();
    h.program("fdtest", move |ctx, _| {
        let mut local = Vec::new();
        let result = body(ctx, &mut local);
        log.lock().extend(local);
        result
    });
    let code = h.run("fdtest").unwrap();
    let values = seen.lock().clone();
    (code, values)
}

#[test]
fn test_open_missing_file() {
    let h = Harness::new();
    let (code, seen) = run_logged(&h, |ctx, log| {
        log.push(ctx.open("nothing")?);
        log.push(ctx.open("")?);
        Ok(0)
    });
    assert_eq!(code, 0);
    assert_eq!(seen, vec![-1, -1]);
}

#[test]
fn test_lowest_free_descriptor() {
    let h = Harness::new();
    h.fs.insert("a", b"x").unwrap();

    let (_, seen) = run_logged(&h, |ctx, log| {
        let first = ctx.open("a")?;
        let second = ctx.open("a")?;
        let third = ctx.open("a")?;
        ctx.close(second)?;
        let reused = ctx.open("a")?;
        log.extend([first, second, third, reused]);
        Ok(0)
    });
    assert_eq!(seen, vec![2, 3, 4, 3]);
}

#[test]
fn test_independent_offsets() {
    let h = Harness::new();
    h.fs.insert("data", b"hello world").unwrap();

    let (_, seen) = run_logged(&h, |ctx, log| {
        let a = ctx.open("data")?;
        let b = ctx.open("data")?;
        let (n, bytes) = ctx.read(a, 5)?;
        assert_eq!(bytes, b"hello");
        log.push(n);
        log.push(ctx.tell(a)?);
        log.push(ctx.tell(b)?);
        let (_, bytes) = ctx.read(b, 3)?;
        assert_eq!(bytes, b"hel");
        Ok(0)
    });
    assert_eq!(seen, vec![5, 5, 0]);
}

#[test]
fn test_write_seek_tell_filesize() {
    let h = Harness::new();

    let (code, seen) = run_logged(&h, |ctx, log| {
        assert!(ctx.create("notes", 8)?);
        let fd = ctx.open("notes")?;
        log.push(ctx.filesize(fd)?);
        log.push(ctx.write(fd, b"abcd")?);
        log.push(ctx.tell(fd)?);
        ctx.seek(fd, 6)?;
        // Files do not grow past their length
        log.push(ctx.write(fd, b"XYZ")?);
        log.push(ctx.filesize(fd)?);
        ctx.seek(fd, 100)?;
        log.push(ctx.tell(fd)?);
        let (n, _) = ctx.read(fd, 4)?;
        log.push(n);
        Ok(0)
    });

    assert_eq!(code, 0);
    assert_eq!(seen, vec![8, 4, 4, 2, 8, 100, 0]);
    assert_eq!(h.fs.contents("notes").unwrap(), b"abcd\0\0XY".to_vec());
}

#[test]
fn test_create_and_remove() {
    let h = Harness::new();
    h.fs.insert("old", b"1").unwrap();

    let (_, seen) = run_logged(&h, |ctx, log| {
        log.push(ctx.create("new", 0)? as i32);
        log.push(ctx.create("new", 0)? as i32);
        log.push(ctx.create("this-name-is-too-long", 0)? as i32);
        log.push(ctx.remove("old")? as i32);
        log.push(ctx.remove("old")? as i32);
        Ok(0)
    });
    assert_eq!(seen, vec![1, 0, 0, 1, 0]);
    assert!(h.fs.exists("new"));
    assert!(!h.fs.exists("old"));
}

#[test]
fn test_removed_file_stays_readable() {
    let h = Harness::new();
    h.fs.insert("tmp", b"still here").unwrap();

    let (_, seen) = run_logged(&h, |ctx, log| {
        let fd = ctx.open("tmp")?;
        assert!(ctx.remove("tmp")?);
        let (n, bytes) = ctx.read(fd, 32)?;
        assert_eq!(bytes, b"still here");
        log.push(n);
        log.push(ctx.open("tmp")?);
        Ok(0)
    });
    assert_eq!(seen, vec![10, -1]);
}

#[test]
fn test_console_descriptors() {
    let h = Harness::new();
    h.console.push_input(b"abc");

    let (_, seen) = run_logged(&h, |ctx, log| {
        let (n, bytes) = ctx.read(0, 3)?;
        assert_eq!(bytes, b"abc");
        log.push(n);
        log.push(ctx.write(1, b"out\n")?);
        log.push(ctx.write(0, b"nope")?);
        log.push(ctx.read(1, 4)?.0);
        log.push(ctx.filesize(0)?);
        log.push(ctx.tell(1)?);
        // Closing the console is a no-op
        ctx.close(1)?;
        log.push(ctx.write(1, b"again\n")?);
        Ok(0)
    });

    assert_eq!(seen, vec![3, 4, -1, -1, -1, -1, 6]);
    assert_eq!(h.lines(), vec!["out", "again", "fdtest: exit(0)"]);
}

#[test]
fn test_unopened_descriptors() {
    let h = Harness::new();

    let (code, seen) = run_logged(&h, |ctx, log| {
        log.push(ctx.read(5, 4)?.0);
        log.push(ctx.write(5, b"x")?);
        log.push(ctx.filesize(127)?);
        log.push(ctx.tell(64)?);
        ctx.seek(64, 3)?;
        ctx.close(64)?;
        Ok(0)
    });

    assert_eq!(code, 0);
    assert_eq!(seen, vec![-1, -1, -1, -1]);
}

#[test]
fn test_double_close_is_noop() {
    let h = Harness::new();
    h.fs.insert("f", b"").unwrap();

    let (code, _) = run_logged(&h, |ctx, _| {
        let fd = ctx.open("f")?;
        ctx.close(fd)?;
        ctx.close(fd)?;
        Ok(0)
    });
    assert_eq!(code, 0);
    assert_eq!(h.fs.open_count(), 0);
}

#[test]
fn test_table_full() {
    let h = Harness::new();
    h.fs.insert("f", b"").unwrap();

    let (_, seen) = run_logged(&h, |ctx, log| {
        let mut last = 0;
        for _ in 2..128 {
            last = ctx.open("f")?;
        }
        log.push(last);
        log.push(ctx.open("f")?);
        ctx.close(50)?;
        log.push(ctx.open("f")?);
        Ok(0)
    });

    assert_eq!(seen, vec![127, -1, 50]);
    assert_eq!(h.fs.open_count(), 0);
}

#[test]
fn test_exit_closes_descriptors() {
    let h = Harness::new();
    h.fs.insert("f", b"data").unwrap();
    let during = Arc::new(Mutex::new(0));
    let count = during.clone();
    let fs = h.fs.clone();

    h.program("leaky", move |ctx, _| {
        ctx.open("f")?;
        ctx.open("f")?;
        *count.lock() = fs.open_count();
        Err(ctx.exit(0))
    });

    assert_eq!(h.run("leaky").unwrap(), 0);
    assert_eq!(*during.lock(), 2);
    assert_eq!(h.fs.open_count(), 0);
}

#[test]
fn test_killed_process_closes_descriptors() {
    let h = Harness::new();
    h.fs.insert("f", b"data").unwrap();

    h.program("crash", |ctx, _| {
        ctx.open("f")?;
        ctx.load(0)?;
        Ok(0)
    });

    assert_eq!(h.run("crash").unwrap(), -1);
    assert_eq!(h.fs.open_count(), 0);
}

#[test]
fn test_read_into_oversized_buffer_is_killed() {
    let h = Harness::new();
    h.program("greedy", |ctx, _| {
        ctx.read(0, u32::MAX)?;
        Ok(0)
    });

    assert_eq!(h.run("greedy").unwrap(), -1);
    assert_eq!(h.exit_notices(), vec!["greedy: exit(-1)"]);
}
