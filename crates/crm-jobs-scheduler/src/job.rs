//! Job capability and class resolution.
//!
//! A job class is registered under a name. The scheduler stores only that
//! name; the execution engine resolves it again when the job is due.

use std::any::type_name;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::error::{JobError, RegistryError};
use crate::job_data::JobData;

/// A unit of deferred work.
#[async_trait]
pub trait Job: Send + Sync {
    /// Run the job with its payload.
    async fn run(&self, data: JobData) -> Result<(), JobError>;
}

/// Outcome of resolving a class name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassLookup {
    /// No type is known under the name.
    Missing,
    /// A type is known but it does not implement [`Job`].
    NotRunnable,
    /// A type implementing [`Job`] is known.
    Runnable,
}

/// Resolves class names to job capability.
pub trait JobResolver: Send + Sync {
    fn lookup(&self, class_name: &str) -> ClassLookup;
}

#[derive(Debug, Clone, Copy)]
struct ClassEntry {
    type_name: &'static str,
    runnable: bool,
}

/// Registry of named classes known to the application.
///
/// Job classes go through [`JobRegistry::register_job`], whose `J: Job`
/// bound is the capability check. Other types can be registered with
/// [`JobRegistry::register_class`] so that naming them is reported as
/// "not a job" rather than "does not exist".
pub struct JobRegistry {
    classes: DashMap<String, ClassEntry>,
}

impl JobRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            classes: DashMap::new(),
        }
    }

    /// Register a job class.
    ///
    /// Returns an error if the name is already taken.
    pub fn register_job<J: Job + 'static>(
        &self,
        class_name: impl Into<String>,
    ) -> Result<(), RegistryError> {
        self.insert(
            class_name.into(),
            ClassEntry {
                type_name: type_name::<J>(),
                runnable: true,
            },
        )
    }

    /// Register a class that is not a job.
    pub fn register_class<T: 'static>(
        &self,
        class_name: impl Into<String>,
    ) -> Result<(), RegistryError> {
        self.insert(
            class_name.into(),
            ClassEntry {
                type_name: type_name::<T>(),
                runnable: false,
            },
        )
    }

    fn insert(&self, class_name: String, entry: ClassEntry) -> Result<(), RegistryError> {
        if self.classes.contains_key(&class_name) {
            return Err(RegistryError::AlreadyRegistered(class_name));
        }

        self.classes.insert(class_name, entry);
        Ok(())
    }

    /// Unregister a class by name.
    pub fn unregister(&self, class_name: &str) -> Result<(), RegistryError> {
        self.classes
            .remove(class_name)
            .ok_or_else(|| RegistryError::NotFound(class_name.to_string()))?;
        Ok(())
    }

    /// Check if a class is registered.
    pub fn contains(&self, class_name: &str) -> bool {
        self.classes.contains_key(class_name)
    }

    /// Rust type registered under a class name.
    pub fn type_name(&self, class_name: &str) -> Option<&'static str> {
        self.classes.get(class_name).map(|entry| entry.type_name)
    }

    /// Names of registered job classes, sorted.
    pub fn job_class_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .classes
            .iter()
            .filter(|entry| entry.value().runnable)
            .map(|entry| entry.key().clone())
            .collect();
        names.sort();
        names
    }

    /// Names of all registered classes, sorted.
    pub fn class_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.classes.iter().map(|entry| entry.key().clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl Default for JobRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl JobResolver for JobRegistry {
    fn lookup(&self, class_name: &str) -> ClassLookup {
        match self.classes.get(class_name) {
            Some(entry) if entry.runnable => ClassLookup::Runnable,
            Some(_) => ClassLookup::NotRunnable,
            None => ClassLookup::Missing,
        }
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
