/*!
 * Kernel Configuration
 * Runtime knobs layered over the compile-time limits
 *
 * Environment variables:
 * - KERNEL_USER_STACK_PAGES: stack pages mapped per process (default: 1)
 * - KERNEL_TRACE_JSON: JSON trace output (default: false)
 */

use serde::{Deserialize, Serialize};

use super::errors::KernelError;
use super::limits::{DEFAULT_USER_STACK_PAGES, MAX_USER_STACK_PAGES};

/// Kernel runtime configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct KernelConfig {
    /// Pages mapped below `PHYS_BASE` for each new process stack
    pub user_stack_pages: usize,
    /// Emit traces as JSON
    pub trace_json: bool,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            user_stack_pages: DEFAULT_USER_STACK_PAGES,
            trace_json: false,
        }
    }
}

impl KernelConfig {
    /// Build configuration from the environment, falling back to defaults
    pub fn from_env() -> Result<Self, KernelError> {
        let mut config = Self::default();

        if let Ok(pages) = std::env::var("KERNEL_USER_STACK_PAGES") {
            config.user_stack_pages = pages.trim().parse().map_err(|_| {
                KernelError::Config(format!("KERNEL_USER_STACK_PAGES is not a number: {pages}"))
            })?;
        }

        if let Ok(json) = std::env::var("KERNEL_TRACE_JSON") {
            config.trace_json = json == "1" || json == "true";
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject values the address space cannot honor
    pub fn validate(&self) -> Result<(), KernelError> {
        if self.user_stack_pages == 0 || self.user_stack_pages > MAX_USER_STACK_PAGES {
            return Err(KernelError::Config(format!(
                "user_stack_pages must be in 1..={MAX_USER_STACK_PAGES}, got {}",
                self.user_stack_pages
            )));
        }
        Ok(())
    }

    #[inline]
    #[must_use]
    pub fn with_stack_pages(mut self, pages: usize) -> Self {
        self.user_stack_pages = pages;
        self
    }
}
