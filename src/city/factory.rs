//! Construction of the city's default subsystems

use std::cell::RefCell;
use std::rc::Rc;

use super::energy::EnergyGrid;
use super::error::CityError;
use super::lighting::{LightGroup, LightKind, LightingGrid};
use super::security::SecuritySystem;
use super::subsystem::SubsystemHandle;
use super::traffic_signal::{TrafficSignalBuilder, TransportNetwork};
use super::types::SubsystemKind;

/// Streets lit by the default lighting grid
pub const DEFAULT_STREETS: [&str; 2] = ["Main Street", "Park Avenue"];
/// Lights per street in the default lighting grid
pub const DEFAULT_LIGHTS_PER_STREET: usize = 5;

/// Builds subsystems, each registered under its kind's default name
#[derive(Debug, Clone, Copy, Default)]
pub struct SubsystemFactory {
    /// Seed for subsystems with simulated readings
    seed: Option<u64>,
}

impl SubsystemFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }

    /// Create a subsystem of the given kind behind a shared handle
    pub fn create(&self, kind: SubsystemKind) -> Result<SubsystemHandle, CityError> {
        let handle: SubsystemHandle = match kind {
            SubsystemKind::Lighting => Rc::new(RefCell::new(self.create_lighting())),
            SubsystemKind::Security => self.create_security(),
            SubsystemKind::Transport => Rc::new(RefCell::new(self.create_transport()?)),
            SubsystemKind::Energy => self.create_energy(),
        };
        Ok(handle)
    }

    /// Create a subsystem from a type name such as `"lighting"`
    pub fn create_named(&self, kind: &str) -> Result<SubsystemHandle, CityError> {
        self.create(kind.parse()?)
    }

    pub fn create_lighting(&self) -> LightingGrid {
        let district = LightGroup::district(
            "Downtown",
            &DEFAULT_STREETS,
            DEFAULT_LIGHTS_PER_STREET,
            LightKind::Led,
        );
        LightingGrid::new(SubsystemKind::Lighting.default_name(), district)
    }

    pub fn create_security(&self) -> Rc<RefCell<SecuritySystem>> {
        Rc::new(RefCell::new(SecuritySystem::default()))
    }

    pub fn create_transport(&self) -> Result<TransportNetwork, CityError> {
        let mut network = TransportNetwork::new(SubsystemKind::Transport.default_name());
        network.add_signal(
            TrafficSignalBuilder::new()
                .id("TS-001")
                .location("Main Street & Park Avenue")
                .with_pedestrian_crossing()
                .with_camera()
                .build()?,
        );
        network.add_signal(
            TrafficSignalBuilder::new()
                .id("TS-002")
                .location("Park Avenue & 5th Street")
                .timings(45, 5, 40)
                .build()?,
        );
        Ok(network)
    }

    pub fn create_energy(&self) -> Rc<RefCell<EnergyGrid>> {
        let name = SubsystemKind::Energy.default_name();
        let grid = match self.seed {
            Some(seed) => EnergyGrid::new_with_seed(name, seed),
            None => EnergyGrid::new(name),
        };
        Rc::new(RefCell::new(grid))
    }
}
