//! Sensors: callbacks that turn environment arguments into perceptions

use crate::perception::Perception;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for a sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SensorId(u64);

static NEXT_SENSOR_ID: AtomicU64 = AtomicU64::new(1);

impl SensorId {
    fn next() -> Self {
        SensorId(NEXT_SENSOR_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Arguments handed to every sensor on an update
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SenseArgs {
    /// Positional arguments
    #[serde(default)]
    pub positional: Vec<serde_json::Value>,
    /// Named arguments
    #[serde(default)]
    pub named: HashMap<String, serde_json::Value>,
}

impl SenseArgs {
    /// Empty argument set
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional argument
    pub fn arg(mut self, value: impl Into<serde_json::Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Add a named argument
    pub fn named(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.named.insert(key.into(), value.into());
        self
    }

    /// Look up a named argument
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.named.get(key)
    }
}

type SenseFn = dyn Fn(&SenseArgs) -> Vec<Perception> + Send + Sync;

/// A named, enable-able perception source
///
/// Clones share the same callback and identity.
#[derive(Clone)]
pub struct Sensor {
    id: SensorId,
    name: String,
    /// Disabled sensors are skipped by agent updates
    pub enabled: bool,
    sense: Arc<SenseFn>,
}

impl Sensor {
    /// Wrap a perception callback
    pub fn new<F>(name: impl Into<String>, sense: F) -> Self
    where
        F: Fn(&SenseArgs) -> Vec<Perception> + Send + Sync + 'static,
    {
        Self {
            id: SensorId::next(),
            name: name.into(),
            enabled: true,
            sense: Arc::new(sense),
        }
    }

    pub fn id(&self) -> SensorId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the callback. Ignores `enabled`; agents check it before calling.
    pub fn sense(&self, args: &SenseArgs) -> Vec<Perception> {
        (self.sense)(args)
    }
}

impl fmt::Debug for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sensor")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("enabled", &self.enabled)
            .finish()
    }
}
