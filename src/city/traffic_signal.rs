//! Traffic signals and the transport network that runs them

use log::{info, warn};

use super::error::CityError;
use super::subsystem::Subsystem;
use super::types::SubsystemKind;

pub const DEFAULT_RED_SECS: u32 = 30;
pub const DEFAULT_YELLOW_SECS: u32 = 5;
pub const DEFAULT_GREEN_SECS: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignalState {
    #[default]
    Red,
    Yellow,
    Green,
}

/// Phase durations in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalTimings {
    pub red: u32,
    pub yellow: u32,
    pub green: u32,
}

impl Default for SignalTimings {
    fn default() -> Self {
        Self {
            red: DEFAULT_RED_SECS,
            yellow: DEFAULT_YELLOW_SECS,
            green: DEFAULT_GREEN_SECS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TrafficSignal {
    id: String,
    location: String,
    state: SignalState,
    timings: SignalTimings,
    pedestrian_crossing: bool,
    camera: bool,
    active: bool,
}

impl TrafficSignal {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn state(&self) -> SignalState {
        self.state
    }

    pub fn timings(&self) -> SignalTimings {
        self.timings
    }

    pub fn has_pedestrian_crossing(&self) -> bool {
        self.pedestrian_crossing
    }

    pub fn has_camera(&self) -> bool {
        self.camera
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn start(&mut self) {
        self.active = true;
        info!("Traffic signal {} at {} is now active", self.id, self.location);
    }

    /// Deactivate the signal; a stopped signal always shows red
    pub fn stop(&mut self) {
        self.active = false;
        self.state = SignalState::Red;
        info!("Traffic signal {} stopped", self.id);
    }

    pub fn change_state(&mut self, state: SignalState) -> Result<(), CityError> {
        if !self.active {
            warn!("Cannot change state: signal {} is not active", self.id);
            return Err(CityError::SignalInactive(self.id.clone()));
        }
        self.state = state;
        Ok(())
    }

    pub fn info(&self) -> String {
        let mut features = Vec::new();
        if self.pedestrian_crossing {
            features.push("Pedestrian Crossing");
        }
        if self.camera {
            features.push("Camera Surveillance");
        }
        let features = if features.is_empty() {
            "None".to_string()
        } else {
            features.join(", ")
        };

        format!(
            "Traffic Signal {} at {} | State: {:?} | Status: {} | Timings: R:{}s Y:{}s G:{}s | Features: {}",
            self.id,
            self.location,
            self.state,
            if self.active { "Active" } else { "Inactive" },
            self.timings.red,
            self.timings.yellow,
            self.timings.green,
            features
        )
    }
}

/// Step-by-step construction of a [`TrafficSignal`]
///
/// `id` and `location` are required; everything else has a default.
#[derive(Debug, Clone, Default)]
pub struct TrafficSignalBuilder {
    id: Option<String>,
    location: Option<String>,
    timings: SignalTimings,
    pedestrian_crossing: bool,
    camera: bool,
}

impl TrafficSignalBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn red_secs(mut self, secs: u32) -> Self {
        self.timings.red = secs;
        self
    }

    pub fn yellow_secs(mut self, secs: u32) -> Self {
        self.timings.yellow = secs;
        self
    }

    pub fn green_secs(mut self, secs: u32) -> Self {
        self.timings.green = secs;
        self
    }

    pub fn timings(mut self, red: u32, yellow: u32, green: u32) -> Self {
        self.timings = SignalTimings { red, yellow, green };
        self
    }

    pub fn with_pedestrian_crossing(mut self) -> Self {
        self.pedestrian_crossing = true;
        self
    }

    pub fn with_camera(mut self) -> Self {
        self.camera = true;
        self
    }

    /// Clear every field back to its default
    pub fn reset(self) -> Self {
        Self::default()
    }

    pub fn build(self) -> Result<TrafficSignal, CityError> {
        let id = self.id.ok_or(CityError::MissingField {
            builder: "TrafficSignalBuilder",
            field: "id",
        })?;
        let location = self.location.ok_or(CityError::MissingField {
            builder: "TrafficSignalBuilder",
            field: "location",
        })?;

        for (field, secs) in [
            ("red_secs", self.timings.red),
            ("yellow_secs", self.timings.yellow),
            ("green_secs", self.timings.green),
        ] {
            if secs == 0 {
                return Err(CityError::InvalidValue {
                    field,
                    reason: "phase duration must be at least one second".to_string(),
                });
            }
        }

        Ok(TrafficSignal {
            id,
            location,
            state: SignalState::Red,
            timings: self.timings,
            pedestrian_crossing: self.pedestrian_crossing,
            camera: self.camera,
            active: false,
        })
    }
}

/// Transport subsystem: owns the city's traffic signals
#[derive(Debug, Clone)]
pub struct TransportNetwork {
    name: String,
    active: bool,
    signals: Vec<TrafficSignal>,
}

impl TransportNetwork {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            active: false,
            signals: Vec::new(),
        }
    }

    /// Add a signal; it is started immediately if the network is running
    pub fn add_signal(&mut self, mut signal: TrafficSignal) {
        if self.active {
            signal.start();
        }
        self.signals.push(signal);
    }

    pub fn signals(&self) -> &[TrafficSignal] {
        &self.signals
    }

    pub fn signal_mut(&mut self, id: &str) -> Option<&mut TrafficSignal> {
        self.signals.iter_mut().find(|signal| signal.id == id)
    }
}

impl Subsystem for TransportNetwork {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> SubsystemKind {
        SubsystemKind::Transport
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn start(&mut self) -> Result<(), CityError> {
        if !self.active {
            self.signals.iter_mut().for_each(TrafficSignal::start);
            self.active = true;
            info!("Transport network \"{}\" active", self.name);
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<(), CityError> {
        if self.active {
            self.signals.iter_mut().for_each(TrafficSignal::stop);
            self.active = false;
            info!("Transport network \"{}\" stopped", self.name);
        }
        Ok(())
    }

    fn status(&self) -> String {
        if !self.active {
            return "Transport system offline".to_string();
        }
        let running = self.signals.iter().filter(|s| s.is_active()).count();
        format!("{}/{} traffic signals synchronized", running, self.signals.len())
    }
}
