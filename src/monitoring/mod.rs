/*!
 * Monitoring
 * Tracing setup and syscall spans
 */

mod tracer;

pub use tracer::{init_tracing, span_syscall, trace_violation, SyscallSpan};
