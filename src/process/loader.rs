/*!
 * Program Loader
 * Collaborator that turns a command line into a runnable user program
 */

use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;

use super::context::{ProgramResult, UserContext};
use super::types::LoadError;
use crate::memory::UserMemory;

/// A loaded user program
///
/// `main` runs on the process's own thread. Returning `Ok(code)` exits with
/// `code`; returning a trap leaves termination to the kernel.
pub trait UserProgram: Send {
    fn main(&mut self, ctx: &mut UserContext<'_>, argv: &[String]) -> ProgramResult;
}

/// Loader collaborator consulted by `exec`
pub trait ProgramLoader: Send + Sync {
    /// Load `argv[0]` into `memory`; `argv` is never empty
    fn load(&self, argv: &[String], memory: &mut UserMemory)
        -> Result<Box<dyn UserProgram>, LoadError>;
}

type ProgramFn = dyn Fn(&mut UserContext<'_>, &[String]) -> ProgramResult + Send + Sync;

/// Program backed by a shared function
struct FnProgram(Arc<ProgramFn>);

impl UserProgram for FnProgram {
    fn main(&mut self, ctx: &mut UserContext<'_>, argv: &[String]) -> ProgramResult {
        (self.0)(ctx, argv)
    }
}

/// Name-indexed loader of built-in programs
#[derive(Clone, Default)]
pub struct ProgramRegistry {
    programs: Arc<DashMap<String, Arc<ProgramFn>>>,
}

impl ProgramRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `main` under `name`, replacing any previous program
    pub fn register<F>(&self, name: &str, main: F) -> &Self
    where
        F: Fn(&mut UserContext<'_>, &[String]) -> ProgramResult + Send + Sync + 'static,
    {
        self.programs.insert(name.to_string(), Arc::new(main));
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.programs.contains_key(name)
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.programs.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }
}

impl fmt::Debug for ProgramRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgramRegistry")
            .field("programs", &self.names())
            .finish()
    }
}

impl ProgramLoader for ProgramRegistry {
    fn load(
        &self,
        argv: &[String],
        _memory: &mut UserMemory,
    ) -> Result<Box<dyn UserProgram>, LoadError> {
        let name = argv.first().ok_or(LoadError::EmptyCommand)?;
        let main = self
            .programs
            .get(name)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| LoadError::NotFound(name.clone()))?;
        Ok(Box::new(FnProgram(main)))
    }
}
