//! The security subsystem
//!
//! This is the real subject behind [`SecurityProxy`](super::proxy::SecurityProxy).
//! It performs no access checks of its own.

use log::info;

use super::error::CityError;
use super::subsystem::Subsystem;
use super::types::{SecurityEvent, SecurityLevel, SubsystemKind};

/// Number of events returned by [`SecuritySystem::recent_events`]
pub const RECENT_EVENT_COUNT: usize = 10;

#[derive(Debug, Clone)]
pub struct SecuritySystem {
    name: String,
    active: bool,
    armed: bool,
    cameras_active: bool,
    alarms_active: bool,
    level: SecurityLevel,
    events: Vec<SecurityEvent>,
}

impl Default for SecuritySystem {
    fn default() -> Self {
        Self::new(SubsystemKind::Security.default_name())
    }
}

impl SecuritySystem {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            active: false,
            armed: false,
            cameras_active: false,
            alarms_active: false,
            level: SecurityLevel::default(),
            events: Vec::new(),
        }
    }

    pub fn arm(&mut self) {
        self.armed = true;
        self.record_event(SecurityLevel::Medium, "System", "Security system armed");
        info!("Security system armed");
    }

    pub fn disarm(&mut self) {
        self.armed = false;
        self.record_event(SecurityLevel::Medium, "System", "Security system disarmed");
        info!("Security system disarmed");
    }

    pub fn activate_cameras(&mut self) {
        self.cameras_active = true;
        self.record_event(SecurityLevel::Low, "All Locations", "Security cameras activated");
        info!("Security cameras are now active");
    }

    pub fn deactivate_cameras(&mut self) {
        self.cameras_active = false;
        self.record_event(SecurityLevel::Low, "All Locations", "Security cameras deactivated");
        info!("Security cameras deactivated");
    }

    pub fn activate_alarms(&mut self) {
        self.alarms_active = true;
        self.record_event(SecurityLevel::Low, "All Locations", "Alarm systems activated");
        info!("Alarm systems are now active");
    }

    pub fn deactivate_alarms(&mut self) {
        self.alarms_active = false;
        self.record_event(SecurityLevel::Low, "All Locations", "Alarm systems deactivated");
        info!("Alarm systems deactivated");
    }

    pub fn set_level(&mut self, level: SecurityLevel) {
        self.level = level;
        self.record_event(
            SecurityLevel::Medium,
            "System",
            &format!("Security level changed to {}", level),
        );
        info!("Security level set to {}", level);
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
        info!("Security event log cleared");
    }

    pub fn record_event(&mut self, severity: SecurityLevel, location: &str, description: &str) {
        self.events
            .push(SecurityEvent::new(severity, location, description));
    }

    pub fn events(&self) -> &[SecurityEvent] {
        &self.events
    }

    /// The last [`RECENT_EVENT_COUNT`] events, oldest first
    pub fn recent_events(&self) -> &[SecurityEvent] {
        let start = self.events.len().saturating_sub(RECENT_EVENT_COUNT);
        &self.events[start..]
    }

    pub fn level(&self) -> SecurityLevel {
        self.level
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn cameras_active(&self) -> bool {
        self.cameras_active
    }

    pub fn alarms_active(&self) -> bool {
        self.alarms_active
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "Active"
    } else {
        "Inactive"
    }
}

impl Subsystem for SecuritySystem {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> SubsystemKind {
        SubsystemKind::Security
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn start(&mut self) -> Result<(), CityError> {
        if !self.active {
            self.active = true;
            info!("Security system online");
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<(), CityError> {
        if self.active {
            self.active = false;
            info!("Security system offline");
        }
        Ok(())
    }

    fn status(&self) -> String {
        if !self.active {
            return "Security system offline".to_string();
        }
        format!(
            "Level: {} | Armed: {} | Cameras: {} | Alarms: {} | Events: {}",
            self.level,
            if self.armed { "Yes" } else { "No" },
            on_off(self.cameras_active),
            on_off(self.alarms_active),
            self.events.len()
        )
    }
}
