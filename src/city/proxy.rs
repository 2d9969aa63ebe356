//! Role-gated access to the security subsystem
//!
//! Every mutating call is checked against the caller's [`Role`] before it is
//! forwarded. A denied call leaves the security system untouched and is
//! reported as `Ok(AccessDecision::Denied)`; denial is never an error. The
//! only error is [`CityError::SubsystemBusy`], when the security system is
//! already borrowed. Every attempt is appended to the proxy's access log.

use chrono::{DateTime, Local};
use log::{info, warn};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::error::CityError;
use super::security::SecuritySystem;
use super::subsystem::{Subsystem, SubsystemHandle};
use super::types::{Role, SecurityEvent, SecurityLevel, SubsystemKind};

/// A gated operation on the security system
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Arm,
    Disarm,
    ActivateCameras,
    DeactivateCameras,
    ActivateAlarms,
    DeactivateAlarms,
    SetLevel(SecurityLevel),
    ClearEvents,
    ViewAccessLog,
}

impl Action {
    /// Minimum role allowed to perform this action
    pub fn required_role(self) -> Role {
        match self {
            Action::ActivateCameras | Action::DeactivateCameras => Role::Operator,
            Action::Arm
            | Action::Disarm
            | Action::ActivateAlarms
            | Action::DeactivateAlarms
            | Action::SetLevel(_)
            | Action::ClearEvents
            | Action::ViewAccessLog => Role::Admin,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Arm => f.write_str("arm security system"),
            Action::Disarm => f.write_str("disarm security system"),
            Action::ActivateCameras => f.write_str("activate cameras"),
            Action::DeactivateCameras => f.write_str("deactivate cameras"),
            Action::ActivateAlarms => f.write_str("activate alarms"),
            Action::DeactivateAlarms => f.write_str("deactivate alarms"),
            Action::SetLevel(level) => write!(f, "set security level to {}", level),
            Action::ClearEvents => f.write_str("clear security events"),
            Action::ViewAccessLog => f.write_str("view access log"),
        }
    }
}

/// Result of an access check
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Granted,
    Denied { required: Role, current: Role },
}

impl AccessDecision {
    pub fn is_granted(self) -> bool {
        matches!(self, AccessDecision::Granted)
    }
}

#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    pub timestamp: DateTime<Local>,
    pub message: String,
}

impl AccessLogEntry {
    fn now(message: String) -> Self {
        Self {
            timestamp: Local::now(),
            message,
        }
    }
}

impl fmt::Display for AccessLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.message
        )
    }
}

/// Forwarding wrapper that authorizes calls against the caller's role
pub struct SecurityProxy {
    inner: Rc<RefCell<SecuritySystem>>,
    /// Subject name, kept so a busy subject can still be named
    subject_name: String,
    role: Role,
    access_log: Vec<AccessLogEntry>,
}

impl SecurityProxy {
    pub fn new(inner: Rc<RefCell<SecuritySystem>>, role: Role) -> Self {
        let subject_name = inner
            .try_borrow()
            .map(|security| security.name().to_string())
            .unwrap_or_else(|_| SubsystemKind::Security.default_name().to_string());
        let mut proxy = Self {
            inner,
            subject_name,
            role,
            access_log: Vec::new(),
        };
        proxy.record(format!("Security proxy initialized for role: {}", role));
        proxy
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Change the caller's role for all later calls
    pub fn set_role(&mut self, role: Role) {
        info!("Security proxy role changed: {} -> {}", self.role, role);
        self.role = role;
        self.record(format!("User role changed to: {}", role));
    }

    /// True when `handle` is the subsystem this proxy forwards to
    pub fn wraps(&self, handle: &SubsystemHandle) -> bool {
        Rc::as_ptr(&self.inner) as *const () == Rc::as_ptr(handle) as *const ()
    }

    fn decide(&self, action: Action) -> AccessDecision {
        let required = action.required_role();
        if self.role.satisfies(required) {
            AccessDecision::Granted
        } else {
            AccessDecision::Denied {
                required,
                current: self.role,
            }
        }
    }

    fn record_decision(&mut self, action: Action, decision: AccessDecision) {
        match decision {
            AccessDecision::Granted => {
                self.record(format!("GRANTED: {} (role: {})", action, self.role));
            }
            AccessDecision::Denied { required, current } => {
                let message = format!(
                    "ACCESS DENIED: cannot {} - requires {} (current role: {})",
                    action, required, current
                );
                warn!("{}", message);
                self.record(message);
            }
        }
    }

    /// Check `action` against the current role and log the outcome
    pub fn authorize(&mut self, action: Action) -> AccessDecision {
        let decision = self.decide(action);
        self.record_decision(action, decision);
        decision
    }

    /// Authorize `action`, then run `op` on the subject
    ///
    /// A granted call whose subject is already borrowed fails with
    /// [`CityError::SubsystemBusy`] and is logged as failed, not granted.
    fn gated(
        &mut self,
        action: Action,
        op: impl FnOnce(&mut SecuritySystem),
    ) -> Result<AccessDecision, CityError> {
        let decision = self.decide(action);
        if !decision.is_granted() {
            self.record_decision(action, decision);
            return Ok(decision);
        }

        let inner = Rc::clone(&self.inner);
        let Ok(mut security) = inner.try_borrow_mut() else {
            let message = format!("FAILED: cannot {} - security system is busy", action);
            warn!("{}", message);
            self.record(message);
            return Err(CityError::SubsystemBusy(self.subject_name.clone()));
        };
        self.record_decision(action, decision);
        op(&mut *security);
        Ok(decision)
    }

    pub fn arm(&mut self) -> Result<AccessDecision, CityError> {
        self.gated(Action::Arm, SecuritySystem::arm)
    }

    pub fn disarm(&mut self) -> Result<AccessDecision, CityError> {
        self.gated(Action::Disarm, SecuritySystem::disarm)
    }

    pub fn activate_cameras(&mut self) -> Result<AccessDecision, CityError> {
        self.gated(Action::ActivateCameras, SecuritySystem::activate_cameras)
    }

    pub fn deactivate_cameras(&mut self) -> Result<AccessDecision, CityError> {
        self.gated(Action::DeactivateCameras, SecuritySystem::deactivate_cameras)
    }

    pub fn activate_alarms(&mut self) -> Result<AccessDecision, CityError> {
        self.gated(Action::ActivateAlarms, SecuritySystem::activate_alarms)
    }

    pub fn deactivate_alarms(&mut self) -> Result<AccessDecision, CityError> {
        self.gated(Action::DeactivateAlarms, SecuritySystem::deactivate_alarms)
    }

    pub fn set_level(&mut self, level: SecurityLevel) -> Result<AccessDecision, CityError> {
        self.gated(Action::SetLevel(level), |security| security.set_level(level))
    }

    pub fn clear_events(&mut self) -> Result<AccessDecision, CityError> {
        self.gated(Action::ClearEvents, SecuritySystem::clear_events)
    }

    /// All access log entries, or an empty list for non-admin callers
    ///
    /// The attempt itself is logged before the snapshot is taken.
    pub fn access_log(&mut self) -> Vec<AccessLogEntry> {
        if self.authorize(Action::ViewAccessLog).is_granted() {
            self.access_log.clone()
        } else {
            Vec::new()
        }
    }

    // Read-only queries are not gated, but fail while the subject is
    // mutably borrowed elsewhere.

    fn read<T>(&self, query: impl FnOnce(&SecuritySystem) -> T) -> Result<T, CityError> {
        let security = self
            .inner
            .try_borrow()
            .map_err(|_| CityError::SubsystemBusy(self.subject_name.clone()))?;
        Ok(query(&*security))
    }

    pub fn status(&self) -> Result<String, CityError> {
        self.read(|security| security.status())
    }

    pub fn level(&self) -> Result<SecurityLevel, CityError> {
        self.read(SecuritySystem::level)
    }

    pub fn events(&self) -> Result<Vec<SecurityEvent>, CityError> {
        self.read(|security| security.events().to_vec())
    }

    pub fn recent_events(&self) -> Result<Vec<SecurityEvent>, CityError> {
        self.read(|security| security.recent_events().to_vec())
    }

    pub fn is_armed(&self) -> Result<bool, CityError> {
        self.read(SecuritySystem::is_armed)
    }

    pub fn cameras_active(&self) -> Result<bool, CityError> {
        self.read(SecuritySystem::cameras_active)
    }

    pub fn alarms_active(&self) -> Result<bool, CityError> {
        self.read(SecuritySystem::alarms_active)
    }

    fn record(&mut self, message: String) {
        self.access_log.push(AccessLogEntry::now(message));
    }
}
