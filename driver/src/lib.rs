use crate::error::DriverError;

pub mod bus;
pub mod config;
pub mod database;
pub mod error;
pub mod notify;

/// Reads `key` from the environment, treating an unset variable as `None`.
pub(crate) fn env(key: &str) -> Result<Option<String>, DriverError> {
    match dotenvy::var(key) {
        Ok(value) => Ok(Some(value)),
        Err(dotenvy::Error::EnvVar(std::env::VarError::NotPresent)) => Ok(None),
        Err(error) => Err(DriverError::from(error)),
    }
}
