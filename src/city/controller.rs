//! Top-level entry point for running a city
//!
//! The controller owns the one registry of the process and the security
//! proxy, and wires them together at construction time.

use std::cell::RefCell;
use std::fmt::Write as _;
use std::rc::Rc;

use anyhow::{Context, Result};
use log::info;

use super::energy::{EnergyGrid, EnergyReading};
use super::error::CityError;
use super::factory::SubsystemFactory;
use super::proxy::{AccessDecision, SecurityProxy};
use super::registry::{LifecycleReport, SubsystemRegistry};
use super::subsystem::{Subsystem, SubsystemHandle};
use super::types::{Role, SecurityLevel, SubsystemKind};

pub struct CityController {
    registry: SubsystemRegistry,
    security: SecurityProxy,
    energy: Rc<RefCell<EnergyGrid>>,
}

impl CityController {
    /// Build every default subsystem, register it, and put the security
    /// subsystem behind a proxy for `role`
    pub fn new(role: Role, seed: Option<u64>) -> Result<Self> {
        info!("Initializing smart city controller...");
        let factory = match seed {
            Some(seed) => SubsystemFactory::with_seed(seed),
            None => SubsystemFactory::new(),
        };

        let mut registry = SubsystemRegistry::new();

        let security = factory.create_security();
        let energy = factory.create_energy();
        for kind in SubsystemKind::ALL {
            let handle: SubsystemHandle = match kind {
                SubsystemKind::Security => security.clone(),
                SubsystemKind::Energy => energy.clone(),
                _ => factory
                    .create(kind)
                    .with_context(|| format!("Failed to create {} subsystem", kind))?,
            };
            registry.register(handle);
        }

        Ok(Self {
            registry,
            security: SecurityProxy::new(security, role),
            energy,
        })
    }

    pub fn registry(&self) -> &SubsystemRegistry {
        &self.registry
    }

    /// Mutable access to the registry
    ///
    /// The security proxy is bound to the security instance registered at
    /// construction. Registering another subsystem under that name replaces
    /// the registry entry only: the proxy keeps forwarding to the original,
    /// which then no longer takes part in `start_city`/`shutdown`.
    pub fn registry_mut(&mut self) -> &mut SubsystemRegistry {
        &mut self.registry
    }

    pub fn security(&mut self) -> &mut SecurityProxy {
        &mut self.security
    }

    pub fn start_city(&self) -> LifecycleReport {
        self.registry.start_all()
    }

    pub fn shutdown(&self) -> LifecycleReport {
        self.registry.stop_all()
    }

    /// Arm the security system, sound the alarms and raise the level to
    /// critical, each through the proxy
    ///
    /// Returns the decisions in that order. Stops at the first call that
    /// finds the security system busy.
    pub fn emergency_mode(&mut self) -> Result<[AccessDecision; 3], CityError> {
        info!("EMERGENCY MODE requested by {}", self.security.role());
        Ok([
            self.security.arm()?,
            self.security.activate_alarms()?,
            self.security.set_level(SecurityLevel::Critical)?,
        ])
    }

    /// Sample the energy grid; fails if the grid is borrowed elsewhere
    pub fn energy_reading(&self) -> Result<EnergyReading, CityError> {
        let name = SubsystemKind::Energy.default_name();
        let mut grid = self
            .energy
            .try_borrow_mut()
            .map_err(|_| CityError::SubsystemBusy(name.to_string()))?;
        Ok(grid.sample())
    }

    /// One line per subsystem plus a totals line
    pub fn status_report(&self) -> String {
        let mut report = String::new();
        for (name, handle) in self.registry.iter() {
            match handle.try_borrow() {
                Ok(subsystem) => {
                    let state = if subsystem.is_active() {
                        "ACTIVE"
                    } else {
                        "INACTIVE"
                    };
                    let _ = writeln!(report, "{}: {} - {}", name, state, subsystem.status());
                }
                Err(_) => {
                    let _ = writeln!(report, "{}: BUSY", name);
                }
            }
        }
        let _ = write!(report, "{}", self.registry.stats());
        report
    }
}
