/*!
 * Kernel Tracing
 * Structured tracing for syscalls and process lifecycle using the tracing crate
 *
 * Features:
 * - Per-syscall spans carrying pid, syscall name and result
 * - JSON-formatted logs for structured parsing
 * - Slow-syscall flagging (blocking calls such as wait show up here)
 */

use std::time::Instant;
use tracing::{debug, info, span, warn, Level};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

use crate::core::types::Pid;

/// Syscalls slower than this are flagged `slow`
const SLOW_SYSCALL_MS: u128 = 10;

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
///
/// `json` selects machine-readable output (see `KernelConfig::trace_json`).
/// A second initialization is ignored.
pub fn init_tracing(json: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_names(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_names(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
    };

    if installed.is_ok() {
        info!(json, "Structured tracing initialized");
    }
}

/// Span covering one syscall from decode to result
pub struct SyscallSpan {
    span: tracing::Span,
    start: Instant,
    syscall: &'static str,
    pid: Pid,
}

impl SyscallSpan {
    pub fn new(syscall: &'static str, pid: Pid) -> Self {
        let span = span!(
            Level::DEBUG,
            "syscall",
            syscall,
            pid,
            result = tracing::field::Empty,
            duration_us = tracing::field::Empty,
        );

        Self {
            span,
            start: Instant::now(),
            syscall,
            pid,
        }
    }

    /// Record the value placed in the result register
    pub fn record_result(&self, value: i32) {
        self.span.record("result", value);
    }

    pub fn enter(&self) -> tracing::span::Entered<'_> {
        self.span.enter()
    }
}

impl Drop for SyscallSpan {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        let _entered = self.span.enter();
        self.span.record("duration_us", duration.as_micros() as u64);

        if duration.as_millis() > SLOW_SYSCALL_MS {
            debug!(
                syscall = self.syscall,
                pid = self.pid,
                duration_ms = duration.as_millis() as u64,
                slow = true,
                "slow syscall"
            );
        } else {
            debug!(
                syscall = self.syscall,
                pid = self.pid,
                duration_us = duration.as_micros() as u64,
                "syscall completed"
            );
        }
    }
}

/// Start a syscall span
#[inline]
pub fn span_syscall(syscall: &'static str, pid: Pid) -> SyscallSpan {
    SyscallSpan::new(syscall, pid)
}

/// Log a violation that ends a process
#[inline]
pub fn trace_violation(pid: Pid, esp: u32, violation: &dyn std::fmt::Display) {
    warn!(pid, esp = format_args!("{esp:#010x}"), %violation, "boundary violation, killing process");
}
