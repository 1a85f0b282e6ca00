/*!
 * Power Device
 * Machine power-off used by the halt syscall
 */

use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info;

/// Power control collaborator
pub trait PowerControl: Send + Sync {
    /// Power the machine down; idempotent
    fn power_off(&self);

    /// Whether the machine has been powered down
    fn is_off(&self) -> bool;
}

/// Hosted power switch: records the request, the kernel unwinds its threads
#[derive(Debug, Default)]
pub struct SimulatedPower {
    off: AtomicBool,
}

impl SimulatedPower {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PowerControl for SimulatedPower {
    fn power_off(&self) {
        if !self.off.swap(true, Ordering::SeqCst) {
            info!("Powering off");
        }
    }

    fn is_off(&self) -> bool {
        self.off.load(Ordering::SeqCst)
    }
}
