//! The subsystem abstraction shared by every part of the city

use std::cell::RefCell;
use std::rc::Rc;

use super::error::CityError;
use super::types::SubsystemKind;

/// A named unit of the city that can be started and stopped
///
/// `start` and `stop` are idempotent: starting an active subsystem (or
/// stopping an inactive one) is a no-op that still returns `Ok`.
pub trait Subsystem {
    fn name(&self) -> &str;

    fn kind(&self) -> SubsystemKind;

    fn is_active(&self) -> bool;

    fn start(&mut self) -> Result<(), CityError>;

    fn stop(&mut self) -> Result<(), CityError>;

    /// Human-readable status line
    fn status(&self) -> String;
}

/// Shared handle to a registered subsystem
///
/// The registry and the security proxy hold clones of the same handle, so
/// both always see the identical instance.
pub type SubsystemHandle = Rc<RefCell<dyn Subsystem>>;

/// Wrap a concrete subsystem into a shareable handle
pub fn into_handle<S: Subsystem + 'static>(subsystem: S) -> SubsystemHandle {
    Rc::new(RefCell::new(subsystem))
}
