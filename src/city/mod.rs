//! Smart city core
//!
//! A registry of independently startable subsystems (lighting, security,
//! transport, energy) and a role-gated proxy in front of the security
//! subsystem. Everything here is in-memory and single-threaded.

mod controller;
mod energy;
mod error;
mod factory;
mod lighting;
mod proxy;
mod registry;
mod security;
mod subsystem;
mod traffic_signal;
mod types;

pub use controller::CityController;
pub use energy::{
    EnergyGrid, EnergyReading, EnergySource, LegacyGridMeter, LegacyMeterAdapter,
    READING_HISTORY_LEN,
};
pub use error::CityError;
pub use factory::{SubsystemFactory, DEFAULT_LIGHTS_PER_STREET, DEFAULT_STREETS};
pub use lighting::{
    LightConfig, LightGroup, LightKind, LightNode, LightingFactory, LightingGrid, StreetLight,
    DEFAULT_BRIGHTNESS, UNKNOWN_LOCATION,
};
pub use proxy::{AccessDecision, AccessLogEntry, Action, SecurityProxy};
pub use registry::{LifecycleReport, SubsystemRegistry};
pub use security::{SecuritySystem, RECENT_EVENT_COUNT};
pub use subsystem::{into_handle, Subsystem, SubsystemHandle};
pub use traffic_signal::{
    SignalState, SignalTimings, TrafficSignal, TrafficSignalBuilder, TransportNetwork,
    DEFAULT_GREEN_SECS, DEFAULT_RED_SECS, DEFAULT_YELLOW_SECS,
};
pub use types::{EventKind, RegistryStats, Role, SecurityEvent, SecurityLevel, SubsystemKind};
