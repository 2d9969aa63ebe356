//! Core types for the smart city
//!
//! Plain value types shared by the registry, the security proxy and the
//! individual subsystems.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local};

use super::error::CityError;

/// A caller's authorization level
///
/// Ordered by rank: viewer < operator < admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, clap::ValueEnum)]
pub enum Role {
    #[default]
    Viewer,
    Operator,
    Admin,
}

impl Role {
    /// Numeric rank used for access checks
    pub fn rank(self) -> u8 {
        match self {
            Role::Viewer => 1,
            Role::Operator => 2,
            Role::Admin => 3,
        }
    }

    /// True when this role meets or exceeds `required`
    pub fn satisfies(self, required: Role) -> bool {
        self.rank() >= required.rank()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Viewer => "viewer",
            Role::Operator => "operator",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kinds of subsystem a city can run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubsystemKind {
    Lighting,
    Security,
    Transport,
    Energy,
}

impl SubsystemKind {
    pub const ALL: [SubsystemKind; 4] = [
        SubsystemKind::Lighting,
        SubsystemKind::Security,
        SubsystemKind::Transport,
        SubsystemKind::Energy,
    ];

    /// Name the subsystem is registered under by default
    pub fn default_name(self) -> &'static str {
        match self {
            SubsystemKind::Lighting => "Lighting",
            SubsystemKind::Security => "Security",
            SubsystemKind::Transport => "Transport",
            SubsystemKind::Energy => "Energy",
        }
    }
}

impl fmt::Display for SubsystemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.default_name())
    }
}

impl FromStr for SubsystemKind {
    type Err = CityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lighting" => Ok(SubsystemKind::Lighting),
            "security" => Ok(SubsystemKind::Security),
            "transport" => Ok(SubsystemKind::Transport),
            "energy" => Ok(SubsystemKind::Energy),
            _ => Err(CityError::UnknownSubsystem(s.to_string())),
        }
    }
}

/// Security alert level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum SecurityLevel {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl fmt::Display for SecurityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SecurityLevel::Low => "LOW",
            SecurityLevel::Medium => "MEDIUM",
            SecurityLevel::High => "HIGH",
            SecurityLevel::Critical => "CRITICAL",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Info,
    Alert,
}

/// A single entry in the security system's event log
#[derive(Debug, Clone)]
pub struct SecurityEvent {
    pub timestamp: DateTime<Local>,
    pub kind: EventKind,
    pub severity: SecurityLevel,
    pub location: String,
    pub description: String,
}

impl SecurityEvent {
    pub fn new(severity: SecurityLevel, location: &str, description: &str) -> Self {
        let kind = if severity == SecurityLevel::Critical {
            EventKind::Alert
        } else {
            EventKind::Info
        };
        Self {
            timestamp: Local::now(),
            kind,
            severity,
            location: location.to_string(),
            description: description.to_string(),
        }
    }
}

/// Aggregate counts over the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegistryStats {
    pub total: usize,
    pub active: usize,
}

impl fmt::Display for RegistryStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} subsystems active", self.active, self.total)
    }
}
