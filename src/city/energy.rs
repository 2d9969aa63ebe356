//! Energy grid subsystem
//!
//! There is no metering hardware behind this. The grid reads through an
//! [`EnergySource`]; the default one adapts a [`LegacyGridMeter`], which
//! reports raw watts from a random range.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

use super::error::CityError;
use super::subsystem::Subsystem;
use super::types::SubsystemKind;

/// Demand range of the legacy meter, in watts
const LEGACY_DEMAND_WATTS: std::ops::Range<f64> = 100_000.0..500_000.0;
/// Supply range of the legacy meter, in watts
const LEGACY_SUPPLY_WATTS: std::ops::Range<f64> = 80_000.0..450_000.0;

/// Number of readings kept by [`EnergyGrid::history`]
pub const READING_HISTORY_LEN: usize = 100;

/// Consumption and production in kW
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EnergyReading {
    pub consumption: f32,
    pub production: f32,
}

impl EnergyReading {
    /// Production as a percentage of consumption, capped at 100
    pub fn efficiency(&self) -> f32 {
        if self.consumption <= 0.0 {
            return 0.0;
        }
        (self.production / self.consumption * 100.0).min(100.0)
    }
}

/// Anything the energy grid can take readings from
pub trait EnergySource {
    fn reading(&mut self) -> EnergyReading;
}

/// Old grid meter with its own interface: separate demand and supply
/// probes reporting raw watts as `f64`
pub struct LegacyGridMeter {
    /// Optional seeded RNG for reproducible readings
    rng: Option<StdRng>,
}

impl Default for LegacyGridMeter {
    fn default() -> Self {
        Self::new()
    }
}

impl LegacyGridMeter {
    pub fn new() -> Self {
        Self { rng: None }
    }

    pub fn new_with_seed(seed: u64) -> Self {
        Self {
            rng: Some(StdRng::seed_from_u64(seed)),
        }
    }

    fn random_range(&mut self, range: std::ops::Range<f64>) -> f64 {
        match &mut self.rng {
            Some(rng) => rng.random_range(range),
            None => rand::rng().random_range(range),
        }
    }

    pub fn read_demand_watts(&mut self) -> f64 {
        self.random_range(LEGACY_DEMAND_WATTS)
    }

    pub fn read_supply_watts(&mut self) -> f64 {
        self.random_range(LEGACY_SUPPLY_WATTS)
    }
}

/// Presents a [`LegacyGridMeter`] as an [`EnergySource`], converting watts
/// to kilowatts
pub struct LegacyMeterAdapter {
    meter: LegacyGridMeter,
}

impl LegacyMeterAdapter {
    pub fn new(meter: LegacyGridMeter) -> Self {
        Self { meter }
    }

    fn to_kilowatts(watts: f64) -> f32 {
        (watts / 1000.0) as f32
    }
}

impl EnergySource for LegacyMeterAdapter {
    fn reading(&mut self) -> EnergyReading {
        EnergyReading {
            consumption: Self::to_kilowatts(self.meter.read_demand_watts()),
            production: Self::to_kilowatts(self.meter.read_supply_watts()),
        }
    }
}

pub struct EnergyGrid {
    name: String,
    active: bool,
    source: Box<dyn EnergySource>,
    last_reading: EnergyReading,
    /// Most recent readings, oldest first, capped at READING_HISTORY_LEN
    history: VecDeque<EnergyReading>,
}

impl EnergyGrid {
    pub fn new(name: &str) -> Self {
        Self::with_source(name, Box::new(LegacyMeterAdapter::new(LegacyGridMeter::new())))
    }

    /// Create a grid whose readings are reproducible for a given seed
    pub fn new_with_seed(name: &str, seed: u64) -> Self {
        let meter = LegacyGridMeter::new_with_seed(seed);
        Self::with_source(name, Box::new(LegacyMeterAdapter::new(meter)))
    }

    pub fn with_source(name: &str, source: Box<dyn EnergySource>) -> Self {
        Self {
            name: name.to_string(),
            active: false,
            source,
            last_reading: EnergyReading::default(),
            history: VecDeque::with_capacity(READING_HISTORY_LEN),
        }
    }

    /// Take a new reading; an inactive grid always reads zero and records
    /// nothing
    pub fn sample(&mut self) -> EnergyReading {
        if !self.active {
            self.last_reading = EnergyReading::default();
            return self.last_reading;
        }

        let reading = self.source.reading();
        debug!(
            "Energy reading: {:.1} kW consumed, {:.1} kW produced",
            reading.consumption, reading.production
        );
        if self.history.len() == READING_HISTORY_LEN {
            self.history.pop_front();
        }
        self.history.push_back(reading);
        self.last_reading = reading;
        reading
    }

    pub fn last_reading(&self) -> EnergyReading {
        self.last_reading
    }

    pub fn history(&self) -> &VecDeque<EnergyReading> {
        &self.history
    }

    /// Mean efficiency over the recorded history
    pub fn average_efficiency(&self) -> f32 {
        if self.history.is_empty() {
            return 0.0;
        }
        let total: f32 = self.history.iter().map(EnergyReading::efficiency).sum();
        total / self.history.len() as f32
    }
}

impl Subsystem for EnergyGrid {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> SubsystemKind {
        SubsystemKind::Energy
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn start(&mut self) -> Result<(), CityError> {
        if !self.active {
            self.active = true;
            info!("Energy management system activated");
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<(), CityError> {
        if self.active {
            self.active = false;
            self.last_reading = EnergyReading::default();
            info!("Energy management system deactivated");
        }
        Ok(())
    }

    fn status(&self) -> String {
        if !self.active {
            return "Energy system offline".to_string();
        }
        format!(
            "Consumption: {:.1} kW | Production: {:.1} kW | Efficiency: {:.1}% | Samples: {}",
            self.last_reading.consumption,
            self.last_reading.production,
            self.last_reading.efficiency(),
            self.history.len()
        )
    }
}
