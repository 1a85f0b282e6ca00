/*!
 * Dispatcher Tests
 * Hand-built trap frames: stack decoding, boundary violations and the
 * result register
 */

use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use std::sync::Arc;

use crate::common::Harness;
use userprog_kernel::core::limits::{PGSIZE, PHYS_BASE};
use userprog_kernel::{SyscallNumber, Trap, TrapFrame, UserContext};

/// Write argument words at `esp` in the caller's memory
fn push_words(ctx: &mut UserContext<'_>, esp: u32, words: &[u32]) {
    for (i, word) in words.iter().enumerate() {
        ctx.memory()
            .write_bytes(esp + 4 * i as u32, &word.to_le_bytes())
            .expect("stack page is mapped");
    }
}

fn trap_with(h: &Harness, esp: u32, words: Vec<u32>) -> i32 {
    h.program("trapper", move |ctx, _| {
        push_words(ctx, esp, &words);
        ctx.trap(TrapFrame::new(esp))?;
        Ok(0)
    });
    h.run("trapper").unwrap()
}

#[test]
fn test_unmapped_stack_pointer_kills() {
    let h = Harness::new();
    h.program("trapper", |ctx, _| {
        let trap = ctx.trap(TrapFrame::new(0x1000)).unwrap_err();
        assert_eq!(trap, Trap::Terminated);
        Err(trap)
    });

    assert_eq!(h.run("trapper").unwrap(), -1);
    assert_eq!(h.lines(), vec!["trapper: exit(-1)"]);
}

#[test]
fn test_kernel_stack_pointer_kills() {
    let h = Harness::new();
    h.program("trapper", |ctx, _| {
        ctx.trap(TrapFrame::new(PHYS_BASE))?;
        Ok(0)
    });
    assert_eq!(h.run("trapper").unwrap(), -1);
}

#[test]
fn test_unknown_syscall_kills() {
    let h = Harness::new();
    assert_eq!(trap_with(&h, PHYS_BASE - 64, vec![13]), -1);

    let h = Harness::new();
    assert_eq!(trap_with(&h, PHYS_BASE - 64, vec![u32::MAX]), -1);
}

#[test]
fn test_argument_past_stack_kills() {
    // Number is the last mapped word; its argument lies in kernel space
    let h = Harness::new();
    assert_eq!(
        trap_with(&h, PHYS_BASE - 4, vec![SyscallNumber::Exit as u32]),
        -1
    );
    assert_eq!(h.lines(), vec!["trapper: exit(-1)"]);
}

#[test]
fn test_straddling_stack_word_kills() {
    // Number word spans the unmapped page below the stack
    let h = Harness::new();
    h.program("trapper", |ctx, _| {
        let esp = PHYS_BASE - PGSIZE - 2;
        ctx.trap(TrapFrame::new(esp))?;
        Ok(0)
    });
    assert_eq!(h.run("trapper").unwrap(), -1);
}

#[test]
fn test_kernel_buffer_pointer_kills() {
    let h = Harness::new();
    let code = trap_with(
        &h,
        PHYS_BASE - 64,
        vec![SyscallNumber::Write as u32, 1, PHYS_BASE - 2, 4],
    );
    assert_eq!(code, -1);
    // Nothing reached the console before the kill
    assert_eq!(h.lines(), vec!["trapper: exit(-1)"]);
}

#[test]
fn test_read_into_unmapped_buffer_kills() {
    let h = Harness::new();
    h.console.push_input(b"zzzz");
    let code = trap_with(
        &h,
        PHYS_BASE - 64,
        vec![SyscallNumber::Read as u32, 0, 0x0900_0000, 4],
    );
    assert_eq!(code, -1);
}

#[test]
fn test_bad_descriptor_kills() {
    let h = Harness::new();
    assert_eq!(
        trap_with(&h, PHYS_BASE - 64, vec![SyscallNumber::Close as u32, 128]),
        -1
    );

    let h = Harness::new();
    assert_eq!(
        trap_with(
            &h,
            PHYS_BASE - 64,
            vec![SyscallNumber::Filesize as u32, (-3i32) as u32]
        ),
        -1
    );
}

#[test]
fn test_exit_status_from_stack() {
    let h = Harness::new();
    assert_eq!(
        trap_with(&h, PHYS_BASE - 64, vec![SyscallNumber::Exit as u32, 57]),
        57
    );
    assert_eq!(h.lines(), vec!["trapper: exit(57)"]);
}

#[test]
fn test_result_register() {
    let h = Harness::new();
    h.fs.insert("f", b"abc").unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = seen.clone();

    h.program("regs", move |ctx, _| {
        let esp = PHYS_BASE - 64;
        let name = ctx.alloc_str("f");

        push_words(ctx, esp, &[SyscallNumber::Open as u32, name]);
        let frame = ctx.trap(TrapFrame::new(esp).with_eax(0xDEAD))?;
        let fd = frame.eax;
        log.lock().push(frame.eax);

        // seek and close leave the accumulator alone
        push_words(ctx, esp, &[SyscallNumber::Seek as u32, fd, 1]);
        log.lock().push(ctx.trap(TrapFrame::new(esp).with_eax(0xBEEF))?.eax);

        push_words(ctx, esp, &[SyscallNumber::Tell as u32, fd]);
        log.lock().push(ctx.trap(TrapFrame::new(esp).with_eax(0xBEEF))?.eax);

        push_words(ctx, esp, &[SyscallNumber::Close as u32, fd]);
        log.lock().push(ctx.trap(TrapFrame::new(esp).with_eax(0xCAFE))?.eax);

        // Failure results are written as -1
        push_words(ctx, esp, &[SyscallNumber::Tell as u32, fd]);
        log.lock().push(ctx.trap(TrapFrame::new(esp))?.eax);
        Ok(0)
    });

    assert_eq!(h.run("regs").unwrap(), 0);
    assert_eq!(*seen.lock(), vec![2, 0xBEEF, 1, 0xCAFE, u32::MAX]);
}

#[test]
fn test_zero_length_write_checks_pointer() {
    let h = Harness::new();
    let seen = Arc::new(Mutex::new(None));
    let log = seen.clone();

    h.program("empty", move |ctx, _| {
        let buf = ctx.alloc(1);
        *log.lock() = Some(ctx.syscall(&[SyscallNumber::Write as u32, 1, buf, 0])?);
        ctx.syscall(&[SyscallNumber::Write as u32, 1, 0, 0])?;
        Ok(0)
    });

    assert_eq!(h.run("empty").unwrap(), -1);
    assert_eq!(*seen.lock(), Some(0));
}

#[test]
fn test_unterminated_string_kills() {
    let h = Harness::new();
    h.program("runaway", |ctx, _| {
        // Fill the whole stack page with non-NUL bytes up to PHYS_BASE
        let base = PHYS_BASE - PGSIZE;
        ctx.memory()
            .write_bytes(base, &vec![b'a'; PGSIZE as usize])
            .expect("stack page is mapped");
        let esp = base + 16;
        push_words(ctx, esp, &[SyscallNumber::Open as u32, PHYS_BASE - 8]);
        ctx.trap(TrapFrame::new(esp))?;
        Ok(0)
    });
    assert_eq!(h.run("runaway").unwrap(), -1);
}

#[test]
fn test_no_return_after_trap() {
    let h = Harness::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = seen.clone();

    h.program("sticky", move |ctx, _| {
        let first = ctx.trap(TrapFrame::new(0)).unwrap_err();
        let second = ctx.print("after").unwrap_err();
        let third = ctx.load(PHYS_BASE - 4).unwrap_err();
        log.lock().extend([first, second, third]);
        Err(first)
    });

    assert_eq!(h.run("sticky").unwrap(), -1);
    assert_eq!(*seen.lock(), vec![Trap::Terminated; 3]);
    assert_eq!(h.lines(), vec!["sticky: exit(-1)"]);
}
