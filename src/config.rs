use std::str::FromStr;
use std::time::Duration;

use crate::error::{BusError, Result};
use crate::queue::{DEFAULT_QUEUE_CAPACITY, OverflowPolicy};

pub const ENV_QUEUE_CAPACITY: &str = "VEHICLE_BUS_QUEUE_CAPACITY";
pub const ENV_TICK_MS: &str = "VEHICLE_BUS_TICK_MS";
pub const ENV_VEHICLE_PERIOD_MS: &str = "VEHICLE_BUS_VEHICLE_PERIOD_MS";

/// Runtime configuration for the bus and its terminal host.
#[derive(Debug, Clone, PartialEq)]
pub struct BusConfig {
    /// Overflow behaviour of the command queue.
    pub overflow: OverflowPolicy,
    /// UI update period; the dispatcher drains once per tick.
    pub tick_interval: Duration,
    /// Period of the simulated vehicle-I/O event loop.
    pub vehicle_period: Duration,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            overflow: OverflowPolicy::DropOldest {
                capacity: DEFAULT_QUEUE_CAPACITY,
            },
            tick_interval: Duration::from_millis(50),
            vehicle_period: Duration::from_millis(400),
        }
    }
}

impl BusConfig {
    /// Read overrides from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from `lookup`, falling back to defaults for missing keys.
    ///
    /// A queue capacity of `0` selects an unbounded queue.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_QUEUE_CAPACITY) {
            config.overflow = match parse_number::<usize>(ENV_QUEUE_CAPACITY, &raw)? {
                0 => OverflowPolicy::Unbounded,
                capacity => OverflowPolicy::DropOldest { capacity },
            };
        }
        if let Some(raw) = lookup(ENV_TICK_MS) {
            config.tick_interval = parse_millis(ENV_TICK_MS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_VEHICLE_PERIOD_MS) {
            config.vehicle_period = parse_millis(ENV_VEHICLE_PERIOD_MS, &raw)?;
        }

        Ok(config)
    }
}

fn parse_number<T: FromStr>(key: &'static str, raw: &str) -> Result<T> {
    raw.trim().parse().map_err(|_| BusError::InvalidConfig {
        key,
        value: raw.to_string(),
    })
}

fn parse_millis(key: &'static str, raw: &str) -> Result<Duration> {
    match parse_number::<u64>(key, raw)? {
        0 => Err(BusError::InvalidConfig {
            key,
            value: raw.to_string(),
        }),
        ms => Ok(Duration::from_millis(ms)),
    }
}
