//! Street lighting: individual lights, the factory that makes them, and the
//! group hierarchy (district -> street -> light) the lighting grid runs on.

use log::info;

use super::error::CityError;
use super::subsystem::Subsystem;
use super::types::SubsystemKind;

/// Default brightness for new lights, in percent
pub const DEFAULT_BRIGHTNESS: u8 = 100;

/// Location used when a light is created without one
pub const UNKNOWN_LOCATION: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LightKind {
    #[default]
    Led,
    Halogen,
    Solar,
}

impl LightKind {
    /// Power draw at full brightness, in watts
    pub fn rated_watts(self) -> f32 {
        match self {
            LightKind::Led => 10.0,
            LightKind::Halogen => 50.0,
            LightKind::Solar => 5.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LightKind::Led => "LED",
            LightKind::Halogen => "Halogen",
            LightKind::Solar => "Solar",
        }
    }
}

/// Parameters for [`LightingFactory::create`]
#[derive(Debug, Clone, Default)]
pub struct LightConfig {
    pub id: String,
    pub kind: LightKind,
    pub brightness: Option<u8>,
    pub location: Option<String>,
}

impl LightConfig {
    pub fn new(id: impl Into<String>, kind: LightKind) -> Self {
        Self {
            id: id.into(),
            kind,
            brightness: None,
            location: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StreetLight {
    pub id: String,
    pub kind: LightKind,
    pub location: String,
    brightness: u8,
    on: bool,
}

impl StreetLight {
    pub fn turn_on(&mut self) {
        self.on = true;
    }

    pub fn turn_off(&mut self) {
        self.on = false;
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Set brightness in percent, clamped to 0..=100
    pub fn set_brightness(&mut self, level: i32) {
        self.brightness = level.clamp(0, 100) as u8;
    }

    /// Current draw in watts (zero when off)
    pub fn energy_consumption(&self) -> f32 {
        if self.on {
            self.kind.rated_watts() * f32::from(self.brightness) / 100.0
        } else {
            0.0
        }
    }

    pub fn info(&self) -> String {
        let state = if self.on {
            format!("ON ({}%)", self.brightness)
        } else {
            "OFF".to_string()
        };
        format!(
            "{} Light [{}] at {} - {}",
            self.kind.label(),
            self.id,
            self.location,
            state
        )
    }
}

pub struct LightingFactory;

impl LightingFactory {
    pub fn create(config: LightConfig) -> StreetLight {
        StreetLight {
            id: config.id,
            kind: config.kind,
            location: config
                .location
                .unwrap_or_else(|| UNKNOWN_LOCATION.to_string()),
            brightness: config.brightness.unwrap_or(DEFAULT_BRIGHTNESS).min(100),
            on: false,
        }
    }

    pub fn create_many(configs: impl IntoIterator<Item = LightConfig>) -> Vec<StreetLight> {
        configs.into_iter().map(Self::create).collect()
    }

    /// Lights numbered `<street>-L1..=<street>-L<count>` along one street
    pub fn create_street(street: &str, count: usize, kind: LightKind) -> Vec<StreetLight> {
        (1..=count)
            .map(|position| {
                Self::create(LightConfig {
                    id: format!("{}-L{}", street, position),
                    kind,
                    brightness: Some(DEFAULT_BRIGHTNESS),
                    location: Some(format!("{}, Position {}", street, position)),
                })
            })
            .collect()
    }
}

/// A node in the lighting hierarchy
#[derive(Debug, Clone)]
pub enum LightNode {
    Light(StreetLight),
    Group(LightGroup),
}

impl LightNode {
    fn turn_on(&mut self) {
        match self {
            LightNode::Light(light) => light.turn_on(),
            LightNode::Group(group) => group.turn_on(),
        }
    }

    fn turn_off(&mut self) {
        match self {
            LightNode::Light(light) => light.turn_off(),
            LightNode::Group(group) => group.turn_off(),
        }
    }

    fn is_on(&self) -> bool {
        match self {
            LightNode::Light(light) => light.is_on(),
            LightNode::Group(group) => group.is_on(),
        }
    }

    fn energy_consumption(&self) -> f32 {
        match self {
            LightNode::Light(light) => light.energy_consumption(),
            LightNode::Group(group) => group.energy_consumption(),
        }
    }

    fn total_lights(&self) -> usize {
        match self {
            LightNode::Light(_) => 1,
            LightNode::Group(group) => group.total_lights(),
        }
    }

    fn lights_on(&self) -> usize {
        match self {
            LightNode::Light(light) => usize::from(light.is_on()),
            LightNode::Group(group) => group.lights_on(),
        }
    }
}

/// A named group of lights and nested groups, controlled as one
#[derive(Debug, Clone)]
pub struct LightGroup {
    pub name: String,
    children: Vec<LightNode>,
}

impl LightGroup {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            children: Vec::new(),
        }
    }

    pub fn add_light(&mut self, light: StreetLight) {
        self.children.push(LightNode::Light(light));
    }

    pub fn add_group(&mut self, group: LightGroup) {
        self.children.push(LightNode::Group(group));
    }

    /// Remove a direct child light by id; returns it if found
    pub fn remove_light(&mut self, id: &str) -> Option<StreetLight> {
        let position = self
            .children
            .iter()
            .position(|child| matches!(child, LightNode::Light(light) if light.id == id))?;
        match self.children.remove(position) {
            LightNode::Light(light) => Some(light),
            LightNode::Group(_) => None,
        }
    }

    pub fn children(&self) -> &[LightNode] {
        &self.children
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn turn_on(&mut self) {
        self.children.iter_mut().for_each(LightNode::turn_on);
    }

    pub fn turn_off(&mut self) {
        self.children.iter_mut().for_each(LightNode::turn_off);
    }

    /// True when any light below this group is on
    pub fn is_on(&self) -> bool {
        self.children.iter().any(LightNode::is_on)
    }

    pub fn energy_consumption(&self) -> f32 {
        self.children.iter().map(LightNode::energy_consumption).sum()
    }

    pub fn total_lights(&self) -> usize {
        self.children.iter().map(LightNode::total_lights).sum()
    }

    pub fn lights_on(&self) -> usize {
        self.children.iter().map(LightNode::lights_on).sum()
    }

    /// A district group with one sub-group of lights per street
    pub fn district(
        name: &str,
        streets: &[&str],
        lights_per_street: usize,
        kind: LightKind,
    ) -> Self {
        let mut district = LightGroup::new(name);
        for street in streets {
            let mut group = LightGroup::new(street);
            for light in LightingFactory::create_street(street, lights_per_street, kind) {
                group.add_light(light);
            }
            district.add_group(group);
        }
        district
    }
}

/// Lighting subsystem: switches the whole light hierarchy on and off
#[derive(Debug, Clone)]
pub struct LightingGrid {
    name: String,
    active: bool,
    root: LightGroup,
}

impl LightingGrid {
    pub fn new(name: &str, root: LightGroup) -> Self {
        Self {
            name: name.to_string(),
            active: false,
            root,
        }
    }

    pub fn root(&self) -> &LightGroup {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut LightGroup {
        &mut self.root
    }
}

impl Subsystem for LightingGrid {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> SubsystemKind {
        SubsystemKind::Lighting
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn start(&mut self) -> Result<(), CityError> {
        if !self.active {
            self.root.turn_on();
            self.active = true;
            info!("Lighting grid \"{}\" on: {} lights", self.name, self.root.total_lights());
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<(), CityError> {
        if self.active {
            self.root.turn_off();
            self.active = false;
            info!("Lighting grid \"{}\" off", self.name);
        }
        Ok(())
    }

    fn status(&self) -> String {
        if !self.active {
            return "Lighting system offline".to_string();
        }
        format!(
            "{}/{} lights on, drawing {:.2}W",
            self.root.lights_on(),
            self.root.total_lights(),
            self.root.energy_consumption()
        )
    }
}
