//! Operation activation bookkeeping
//!
//! The book is shared between the agent (environment side) and the bridge's
//! reader task (backend side). Every access goes through one mutex.

use nars_core::{Dialect, Operation};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Operation name -> number of outstanding activations
pub type ActivationMap = BTreeMap<String, u32>;

/// Hook run after each activation increment
///
/// Receives the map (already incremented) and the activated operation.
pub type ActivationPolicy = Arc<dyn Fn(&mut ActivationMap, &Operation) + Send + Sync>;

/// Policy that zeroes the other members of `group` when one of them activates
pub fn mutually_exclusive(group: impl IntoIterator<Item = Operation>) -> ActivationPolicy {
    let group: Vec<String> = group.into_iter().map(String::from).collect();
    Arc::new(move |map: &mut ActivationMap, activated: &Operation| {
        if !group.iter().any(|name| name == activated.name()) {
            return;
        }
        for name in group.iter().filter(|name| *name != activated.name()) {
            if let Some(count) = map.get_mut(name) {
                *count = 0;
            }
        }
    })
}

#[derive(Default)]
struct BookInner {
    activations: ActivationMap,
    policy: Option<ActivationPolicy>,
}

/// Activation counts plus the backend-operation gate and counter
pub struct OperationBook {
    inner: Mutex<BookInner>,
    operations_enabled: AtomicBool,
    operations_received: AtomicU64,
}

impl Default for OperationBook {
    fn default() -> Self {
        Self::new(true)
    }
}

impl OperationBook {
    pub fn new(operations_enabled: bool) -> Self {
        Self {
            inner: Mutex::new(BookInner::default()),
            operations_enabled: AtomicBool::new(operations_enabled),
            operations_received: AtomicU64::new(0),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BookInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn operations_enabled(&self) -> bool {
        self.operations_enabled.load(Ordering::SeqCst)
    }

    pub fn set_operations_enabled(&self, enabled: bool) {
        self.operations_enabled.store(enabled, Ordering::SeqCst);
    }

    /// Operations accepted from the backend so far
    pub fn operations_received(&self) -> u64 {
        self.operations_received.load(Ordering::SeqCst)
    }

    pub fn set_policy(&self, policy: Option<ActivationPolicy>) {
        self.lock().policy = policy;
    }

    /// Increment `operation` and apply the policy
    pub fn activate(&self, operation: &Operation) {
        let mut inner = self.lock();
        let BookInner {
            activations,
            policy,
        } = &mut *inner;
        *activations.entry(operation.name().to_string()).or_insert(0) += 1;
        if let Some(policy) = policy {
            policy(activations, operation);
        }
    }

    /// Record an operation chosen by the backend, if operations are enabled
    pub fn receive(&self, operation: &Operation) -> bool {
        if !self.operations_enabled() {
            debug!("Ignoring backend operation {} (operations disabled)", operation);
            return false;
        }
        self.activate(operation);
        self.operations_received.fetch_add(1, Ordering::SeqCst);
        true
    }

    /// Extract and record the operation reported on a backend output line
    pub fn handle_line(&self, dialect: &Dialect, line: &str) -> Option<Operation> {
        let name = dialect.extract(line).filter(|name| !name.is_empty())?;
        let operation = Operation::new(name);
        debug!("Backend operation: {}", operation);
        self.receive(&operation).then_some(operation)
    }

    /// Outstanding activations of `operation`, 0 if never seen
    pub fn count(&self, operation: &Operation) -> u32 {
        self.lock()
            .activations
            .get(operation.name())
            .copied()
            .unwrap_or(0)
    }

    pub fn contains(&self, operation: &Operation) -> bool {
        self.lock().activations.contains_key(operation.name())
    }

    pub fn set(&self, operation: &Operation, value: u32) {
        self.lock()
            .activations
            .insert(operation.name().to_string(), value);
    }

    /// Set every known operation to `value`
    pub fn reset_all(&self, value: u32) {
        for count in self.lock().activations.values_mut() {
            *count = value;
        }
    }

    /// Every operation name seen so far
    pub fn names(&self) -> Vec<String> {
        self.lock().activations.keys().cloned().collect()
    }

    /// Names with at least one outstanding activation
    pub fn active_names(&self) -> Vec<String> {
        self.lock()
            .activations
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Copy of the activation map
    pub fn snapshot(&self) -> ActivationMap {
        self.lock().activations.clone()
    }
}
