use std::str::FromStr;

use kernel::interface::bus::BusConfig;
use kernel::KernelError;

use crate::env;
use crate::error::{ConvertError, DriverError};

const POSTGRES_URL: &str = "POSTGRES_URL";
const EVENT_BUS_CAPACITY: &str = "EVENT_BUS_CAPACITY";
const SERVER_ADDR: &str = "SERVER_ADDR";

const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:8080";

/// Process configuration read from the environment (and `.env`, if present).
#[derive(Debug, Clone)]
pub struct Config {
    postgres_url: Option<String>,
    bus: BusConfig,
    server_addr: String,
}

impl Config {
    pub fn from_env() -> error_stack::Result<Self, KernelError> {
        let postgres_url = env(POSTGRES_URL).convert_error()?;
        let bus = match parse::<usize>(EVENT_BUS_CAPACITY).convert_error()? {
            Some(capacity) => BusConfig::new(capacity),
            None => BusConfig::default(),
        };
        let server_addr = env(SERVER_ADDR)
            .convert_error()?
            .unwrap_or_else(|| DEFAULT_SERVER_ADDR.to_string());
        Ok(Self {
            postgres_url,
            bus,
            server_addr,
        })
    }

    /// `None` selects the in-memory storage backend.
    pub fn postgres_url(&self) -> Option<&str> {
        self.postgres_url.as_deref()
    }

    pub fn bus(&self) -> &BusConfig {
        &self.bus
    }

    pub fn server_addr(&self) -> &str {
        &self.server_addr
    }
}

fn parse<T: FromStr>(key: &str) -> Result<Option<T>, DriverError> {
    env(key)?
        .map(|value| {
            value.parse::<T>().map_err(|_| DriverError::InvalidValue {
                key: key.to_string(),
                value,
            })
        })
        .transpose()
}
