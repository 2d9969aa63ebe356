//! Registry of every subsystem running in the city
//!
//! The registry is an ordinary value owned by the host (normally the
//! [`CityController`](super::controller::CityController)). There is no hidden
//! global: one registry per process is kept by constructing exactly one.

use log::{debug, info, warn};
use std::collections::HashMap;

use super::error::CityError;
use super::subsystem::{into_handle, Subsystem, SubsystemHandle};
use super::types::RegistryStats;

/// Outcome of a bulk start or stop
#[derive(Debug, Default)]
pub struct LifecycleReport {
    /// Subsystems whose transition succeeded, in registry order
    pub succeeded: Vec<String>,
    /// Subsystems whose transition failed, with the reason
    pub failed: Vec<(String, CityError)>,
}

impl LifecycleReport {
    /// True when every subsystem transitioned successfully
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Clone, Copy)]
enum Transition {
    Start,
    Stop,
}

impl Transition {
    fn verb(self) -> &'static str {
        match self {
            Transition::Start => "start",
            Transition::Stop => "stop",
        }
    }
}

/// Name-keyed collection of subsystems, iterated in insertion order
#[derive(Default)]
pub struct SubsystemRegistry {
    /// Registered subsystems in insertion order
    entries: Vec<(String, SubsystemHandle)>,
    /// Name -> position in `entries`
    index: HashMap<String, usize>,
}

impl SubsystemRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subsystem under its own name
    ///
    /// A second registration under the same name replaces the first
    /// one (which keeps its position in iteration order). The replaced handle
    /// is returned.
    pub fn register(&mut self, subsystem: SubsystemHandle) -> Option<SubsystemHandle> {
        let name = subsystem.borrow().name().to_string();

        if let Some(&slot) = self.index.get(&name) {
            warn!("Subsystem \"{}\" was already registered; replacing it", name);
            let previous = std::mem::replace(&mut self.entries[slot].1, subsystem);
            return Some(previous);
        }

        info!("Subsystem \"{}\" registered", name);
        self.index.insert(name.clone(), self.entries.len());
        self.entries.push((name, subsystem));
        None
    }

    /// Wrap a concrete subsystem in a handle and register it
    pub fn register_subsystem<S: Subsystem + 'static>(&mut self, subsystem: S) -> SubsystemHandle {
        let handle = into_handle(subsystem);
        self.register(handle.clone());
        handle
    }

    pub fn get(&self, name: &str) -> Option<SubsystemHandle> {
        self.index
            .get(name)
            .map(|&slot| self.entries[slot].1.clone())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Registered names in insertion order
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|(name, _)| name.clone()).collect()
    }

    /// Iterate over `(name, handle)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SubsystemHandle)> {
        self.entries
            .iter()
            .map(|(name, handle)| (name.as_str(), handle))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Start every registered subsystem
    ///
    /// A failing subsystem is recorded in the report and does not prevent
    /// the remaining ones from starting.
    pub fn start_all(&self) -> LifecycleReport {
        info!("Starting all city systems...");
        self.transition_all(Transition::Start)
    }

    /// Stop every registered subsystem, isolating failures the same way as
    /// [`start_all`](Self::start_all)
    pub fn stop_all(&self) -> LifecycleReport {
        info!("Stopping all city systems...");
        self.transition_all(Transition::Stop)
    }

    fn transition_all(&self, transition: Transition) -> LifecycleReport {
        let mut report = LifecycleReport::default();

        for (name, handle) in &self.entries {
            let result = match handle.try_borrow_mut() {
                Ok(mut subsystem) => match transition {
                    Transition::Start => subsystem.start(),
                    Transition::Stop => subsystem.stop(),
                },
                Err(_) => Err(CityError::SubsystemBusy(name.clone())),
            };

            match result {
                Ok(()) => {
                    debug!("{} {}: ok", transition.verb(), name);
                    report.succeeded.push(name.clone());
                }
                Err(e) => {
                    warn!("Failed to {} subsystem \"{}\": {}", transition.verb(), name, e);
                    report.failed.push((name.clone(), e));
                }
            }
        }

        info!(
            "{} complete: {} succeeded, {} failed",
            transition.verb(),
            report.succeeded.len(),
            report.failed.len()
        );
        report
    }

    /// Count registered and active subsystems
    pub fn stats(&self) -> RegistryStats {
        let active = self
            .entries
            .iter()
            .filter(|(_, handle)| handle.try_borrow().map(|s| s.is_active()).unwrap_or(false))
            .count();

        RegistryStats {
            total: self.entries.len(),
            active,
        }
    }

    /// Drop every registration so a test can start from a clean slate
    #[doc(hidden)]
    pub fn reset(&mut self) {
        self.entries.clear();
        self.index.clear();
    }
}
