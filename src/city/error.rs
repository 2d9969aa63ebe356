/// Errors raised by the city core.
///
/// Unknown subsystem lookups are `None`, and access denials are reported as
/// [`AccessDecision::Denied`](super::proxy::AccessDecision), so neither shows
/// up here.
#[derive(Debug, thiserror::Error)]
pub enum CityError {
    #[error("Unknown subsystem type: {0}")]
    UnknownSubsystem(String),

    #[error("{builder}: required field `{field}` is missing")]
    MissingField {
        builder: &'static str,
        field: &'static str,
    },

    #[error("{field} is invalid: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("Subsystem '{name}' failed: {reason}")]
    SubsystemFault { name: String, reason: String },

    #[error("Subsystem '{0}' is already in use")]
    SubsystemBusy(String),

    #[error("Traffic signal {0} is not active")]
    SignalInactive(String),
}
