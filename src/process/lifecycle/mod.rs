/*!
 * Process Lifecycle
 *
 * Binds exec, wait and exit together through the process record.
 *
 * # Architecture
 *
 * - **exec**: spawns the child thread and blocks on a one-shot load report,
 *   so the parent never races ahead of load-failure detection
 * - **wait**: blocks on the child's record, never on its thread, because the
 *   record outlives the child's execution context
 * - **exit**: the single termination path for normal exit, faults, boundary
 *   violations and load failures
 */

mod exec;
mod exit;
mod wait;
