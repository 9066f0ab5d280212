//! The agent: what an environment sees of its reasoning backend
//!
//! An agent owns an optional "brain" (a [`ProcessBridge`] plus the
//! [`Dialect`] it speaks), a list of sensors and the operation book.
//! Environment code drives it through [`Agent::update`] and polls the book
//! for operations the backend asked for.

use crate::book::{ActivationMap, ActivationPolicy, OperationBook};
use crate::config::AgentConfig;
use nars_bridge::{BackendConfig, ProcessBridge};
use nars_core::{Dialect, NarsError, Operation, Perception, Result, SenseArgs, Sensor, SensorId};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info};

/// Callback seeing every raw backend output line
pub type OutputObserver = Box<dyn FnMut(&str) + Send>;

struct Brain {
    bridge: ProcessBridge,
    dialect: Arc<Dialect>,
}

/// Counters and queue state at a point in time
#[derive(Debug, Clone, Serialize)]
pub struct AgentStats {
    pub equipped: bool,
    pub perceptions_sent: u64,
    pub operations_received: u64,
    pub pending_commands: usize,
    pub active_operations: Vec<String>,
}

/// Environment-facing interface to a reasoning backend
pub struct Agent {
    brain: Option<Brain>,
    sensors: Vec<Sensor>,
    book: Arc<OperationBook>,
    observer: Arc<Mutex<Option<OutputObserver>>>,
    main_goal: Option<String>,
    negative_goal: Option<String>,
    senses_enabled: bool,
    perceptions_sent: u64,
}

impl Default for Agent {
    fn default() -> Self {
        Self::new(AgentConfig::default())
    }
}

impl Agent {
    /// Create a brain-less agent
    pub fn new(config: AgentConfig) -> Self {
        Self {
            brain: None,
            sensors: Vec::new(),
            book: Arc::new(OperationBook::new(config.operations_enabled)),
            observer: Arc::new(Mutex::new(None)),
            main_goal: config.main_goal,
            negative_goal: config.negative_goal,
            senses_enabled: config.senses_enabled,
            perceptions_sent: 0,
        }
    }

    // === Brain lifecycle ===

    pub fn has_brain(&self) -> bool {
        self.brain.is_some()
    }

    /// Launch the configured backend and start listening to it
    pub async fn equip(&mut self, config: &BackendConfig) -> Result<()> {
        let bridge = ProcessBridge::from_config(config);
        self.equip_with(bridge, config.backend.dialect()).await
    }

    /// Attach an unlaunched bridge and launch it
    pub async fn equip_with(&mut self, bridge: ProcessBridge, dialect: Dialect) -> Result<()> {
        self.attach(bridge, dialect)?;
        let launched = match self.brain.as_mut() {
            Some(brain) => brain.bridge.launch().await,
            None => Err(NarsError::NotEquipped),
        };
        if let Err(e) = launched {
            self.disconnect();
            return Err(e);
        }
        Ok(())
    }

    /// Attach a bridge without launching it
    ///
    /// Commands are queued until the bridge is launched.
    pub fn attach(&mut self, bridge: ProcessBridge, dialect: Dialect) -> Result<()> {
        if self.brain.is_some() {
            return Err(NarsError::AlreadyEquipped);
        }

        let dialect = Arc::new(dialect);
        let book = self.book.clone();
        let observer = self.observer.clone();
        let hook_dialect = dialect.clone();
        bridge.set_output_hook(move |line: &str| {
            if let Some(observe) = observer
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .as_mut()
            {
                observe(line);
            }
            book.handle_line(&hook_dialect, line);
        });

        self.brain = Some(Brain { bridge, dialect });
        Ok(())
    }

    /// Terminate the backend. The agent can be equipped again afterwards.
    pub fn disconnect(&mut self) {
        if let Some(mut brain) = self.brain.take() {
            brain.bridge.terminate();
            info!("Agent disconnected from backend");
        }
    }

    pub fn bridge(&self) -> Option<&ProcessBridge> {
        self.brain.as_ref().map(|brain| &brain.bridge)
    }

    pub fn dialect(&self) -> Option<&Dialect> {
        self.brain.as_ref().map(|brain| brain.dialect.as_ref())
    }

    fn brain(&self) -> Result<&Brain> {
        self.brain.as_ref().ok_or(NarsError::NotEquipped)
    }

    /// Install a callback for every raw backend line
    pub fn set_output_observer<F>(&self, observer: F)
    where
        F: FnMut(&str) + Send + 'static,
    {
        *self.observer.lock().unwrap_or_else(PoisonError::into_inner) = Some(Box::new(observer));
    }

    pub fn clear_output_observer(&self) {
        self.observer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }

    // === Perception and goals ===

    /// Sense, remind goals, step inference
    ///
    /// Every enabled sensor runs with `args`. Perceptions are forwarded only
    /// while senses are enabled. The main and negative goals are re-sent on
    /// every call.
    pub fn update(&mut self, args: &SenseArgs) -> Result<()> {
        let brain = self.brain.as_ref().ok_or(NarsError::NotEquipped)?;

        for sensor in self.sensors.iter().filter(|sensor| sensor.enabled) {
            for perception in sensor.sense(args) {
                if self.senses_enabled {
                    brain.bridge.enqueue(brain.dialect.sense(&perception))?;
                    self.perceptions_sent += 1;
                }
            }
        }

        if let Some(goal) = &self.main_goal {
            brain.bridge.enqueue(brain.dialect.goal(goal, false))?;
        }
        if let Some(goal) = &self.negative_goal {
            brain.bridge.enqueue(brain.dialect.goal(goal, true))?;
        }

        brain.bridge.step_inference()
    }

    /// Forward one perception, if senses are enabled
    pub fn add_perception(&mut self, perception: &Perception) -> Result<()> {
        if !self.senses_enabled {
            return Ok(());
        }
        let brain = self.brain()?;
        brain.bridge.enqueue(brain.dialect.sense(perception))?;
        self.perceptions_sent += 1;
        Ok(())
    }

    /// Register a sensor, returning its id
    pub fn add_sensor(&mut self, sensor: Sensor) -> SensorId {
        let id = sensor.id();
        debug!("Adding sensor {:?} ({})", id, sensor.name());
        self.sensors.push(sensor);
        id
    }

    pub fn remove_sensor(&mut self, id: SensorId) -> Option<Sensor> {
        let index = self.sensors.iter().position(|sensor| sensor.id() == id)?;
        Some(self.sensors.remove(index))
    }

    /// Enable or disable a sensor; false if it is not registered
    pub fn set_sensor_enabled(&mut self, id: SensorId, enabled: bool) -> bool {
        match self.sensors.iter_mut().find(|sensor| sensor.id() == id) {
            Some(sensor) => {
                sensor.enabled = enabled;
                true
            }
            None => false,
        }
    }

    pub fn sensors(&self) -> &[Sensor] {
        &self.sensors
    }

    pub fn put_goal(&self, name: &str, negative: bool) -> Result<()> {
        let brain = self.brain()?;
        brain.bridge.enqueue(brain.dialect.goal(name, negative))
    }

    /// Tell the backend `name` was achieved
    pub fn praise_goal(&self, name: &str) -> Result<()> {
        let brain = self.brain()?;
        brain.bridge.enqueue(brain.dialect.praise(name))
    }

    /// Tell the backend `name` was not achieved
    pub fn punish_goal(&self, name: &str) -> Result<()> {
        let brain = self.brain()?;
        brain.bridge.enqueue(brain.dialect.punish(name))
    }

    pub fn main_goal(&self) -> Option<&str> {
        self.main_goal.as_deref()
    }

    pub fn set_main_goal(&mut self, goal: Option<String>) {
        self.main_goal = goal;
    }

    pub fn negative_goal(&self) -> Option<&str> {
        self.negative_goal.as_deref()
    }

    pub fn set_negative_goal(&mut self, goal: Option<String>) {
        self.negative_goal = goal;
    }

    pub fn senses_enabled(&self) -> bool {
        self.senses_enabled
    }

    pub fn set_senses_enabled(&mut self, enabled: bool) {
        self.senses_enabled = enabled;
    }

    /// Send a raw line to the backend
    pub fn add_input(&self, line: impl Into<String>) -> Result<()> {
        self.brain()?.bridge.enqueue(line)
    }

    // === Operations ===

    /// Declare that the agent can perform `operation`
    ///
    /// Does not touch the activation map.
    pub fn register_operation(&self, operation: &Operation) -> Result<()> {
        let brain = self.brain()?;
        brain.bridge.enqueue(brain.dialect.register(operation))
    }

    pub fn register_operations(&self, operations: &[Operation]) -> Result<()> {
        operations
            .iter()
            .try_for_each(|operation| self.register_operation(operation))
    }

    /// Whether the equipped backend accepts babble sentences
    pub fn needs_babble(&self) -> bool {
        self.dialect().is_some_and(Dialect::supports_babble)
    }

    /// Tell the backend the agent performed `operation` on its own
    ///
    /// With `activate_locally`, the operation is also recorded as if the
    /// backend had chosen it (without counting as received).
    pub fn force_unconscious_operation(
        &self,
        operation: &Operation,
        activate_locally: bool,
    ) -> Result<()> {
        let brain = self.brain()?;
        match brain.dialect.babble(operation) {
            Some(sentence) => brain.bridge.enqueue(sentence)?,
            None => debug!("Backend does not accept babble, skipping {}", operation),
        }
        if activate_locally {
            self.book.activate(operation);
        }
        Ok(())
    }

    /// With chance 1/`probability`, force a random candidate operation
    ///
    /// A probability of 0 never babbles.
    pub fn babble(&self, probability: u32, candidates: &[Operation]) -> Result<Option<Operation>> {
        self.babble_with(&mut rand::thread_rng(), probability, candidates)
    }

    /// [`babble`](Agent::babble) with a caller-supplied RNG
    pub fn babble_with<R: Rng>(
        &self,
        rng: &mut R,
        probability: u32,
        candidates: &[Operation],
    ) -> Result<Option<Operation>> {
        if probability == 0 || candidates.is_empty() {
            return Ok(None);
        }
        if rng.gen_range(1..=probability) != 1 {
            return Ok(None);
        }
        let Some(operation) = candidates.choose(rng) else {
            return Ok(None);
        };
        self.force_unconscious_operation(operation, true)?;
        Ok(Some(operation.clone()))
    }

    /// Process one backend output line as the reader task would
    pub fn handle_output_line(&self, line: &str) -> Option<Operation> {
        let brain = self.brain.as_ref()?;
        self.book.handle_line(&brain.dialect, line)
    }

    pub fn operations_enabled(&self) -> bool {
        self.book.operations_enabled()
    }

    pub fn set_operations_enabled(&self, enabled: bool) {
        self.book.set_operations_enabled(enabled);
    }

    /// Replace the post-activation policy
    pub fn set_activation_policy(&self, policy: Option<ActivationPolicy>) {
        self.book.set_policy(policy);
    }

    /// Outstanding activations of `operation`, 0 if never seen
    pub fn is_active(&self, operation: &Operation) -> u32 {
        self.book.count(operation)
    }

    pub fn contains(&self, operation: &Operation) -> bool {
        self.book.contains(operation)
    }

    pub fn set_activation(&self, operation: &Operation, value: u32) {
        self.book.set(operation, value);
    }

    pub fn reset_all(&self, value: u32) {
        self.book.reset_all(value);
    }

    pub fn stored_operation_names(&self) -> Vec<String> {
        self.book.names()
    }

    pub fn active_operation_names(&self) -> Vec<String> {
        self.book.active_names()
    }

    pub fn stored_operations(&self) -> ActivationMap {
        self.book.snapshot()
    }

    // === Counters and queue ===

    pub fn total_perceptions_sent(&self) -> u64 {
        self.perceptions_sent
    }

    pub fn total_operations_received(&self) -> u64 {
        self.book.operations_received()
    }

    pub fn pending_command_count(&self) -> usize {
        self.bridge().map_or(0, ProcessBridge::pending_command_count)
    }

    pub fn pending_commands(&self) -> Vec<String> {
        self.bridge()
            .map(ProcessBridge::pending_commands)
            .unwrap_or_default()
    }

    pub fn clear_pending_commands(&self) -> usize {
        self.bridge().map_or(0, ProcessBridge::clear_pending_commands)
    }

    pub fn stats(&self) -> AgentStats {
        AgentStats {
            equipped: self.has_brain(),
            perceptions_sent: self.perceptions_sent,
            operations_received: self.total_operations_received(),
            pending_commands: self.pending_command_count(),
            active_operations: self.active_operation_names(),
        }
    }
}

impl Drop for Agent {
    fn drop(&mut self) {
        self.disconnect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::mutually_exclusive;
    use nars_core::LaunchCommand;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use tokio_test::assert_ok;

    fn bridge(cadence: u32) -> ProcessBridge {
        ProcessBridge::new(LaunchCommand::new("cat"), cadence)
    }

    fn agent_with(config: AgentConfig, dialect: Dialect, cadence: u32) -> Agent {
        let mut agent = Agent::new(config);
        assert_ok!(agent.attach(bridge(cadence), dialect));
        agent
    }

    fn position_sensor() -> Sensor {
        Sensor::new("position", |args: &SenseArgs| {
            args.positional
                .iter()
                .filter_map(|v| v.as_str())
                .map(|side| Perception::new("ball", side))
                .collect()
        })
    }

    #[test]
    fn test_brainless_agent() {
        let mut agent = Agent::default();
        assert!(!agent.has_brain());
        assert!(matches!(agent.update(&SenseArgs::new()), Err(NarsError::NotEquipped)));
        assert!(matches!(agent.put_goal("good", false), Err(NarsError::NotEquipped)));
        assert_eq!(agent.handle_output_line("^left executed with args"), None);
        assert_eq!(agent.pending_command_count(), 0);
        assert!(!agent.needs_babble());
    }

    #[test]
    fn test_attach_twice() {
        let mut agent = agent_with(AgentConfig::default(), Dialect::ona(), 0);
        assert!(matches!(
            agent.attach(bridge(0), Dialect::ona()),
            Err(NarsError::AlreadyEquipped)
        ));
        agent.disconnect();
        assert!(!agent.has_brain());
        assert_ok!(agent.attach(bridge(0), Dialect::ona()));
    }

    #[test]
    fn test_update_sends_perceptions_goals_and_step() {
        let config = AgentConfig::with_goal("good");
        let mut agent = agent_with(config, Dialect::opennars(), 5);
        agent.add_sensor(position_sensor());

        assert_ok!(agent.update(&SenseArgs::new().arg("left")));

        assert_eq!(
            agent.pending_commands(),
            vec![
                "<{ball} --> [left]>. :|:",
                "<{SELF} --> [good]>! :|:",
                "5",
            ]
        );
        assert_eq!(agent.total_perceptions_sent(), 1);
    }

    #[test]
    fn test_senses_disabled() {
        let mut agent = agent_with(AgentConfig::default(), Dialect::ona(), 0);
        agent.add_sensor(position_sensor());
        agent.set_senses_enabled(false);

        assert_ok!(agent.update(&SenseArgs::new().arg("left").arg("right")));
        assert_eq!(agent.pending_command_count(), 0);
        assert_eq!(agent.total_perceptions_sent(), 0);

        assert_ok!(agent.add_perception(&Perception::of_self("hit")));
        assert_eq!(agent.pending_command_count(), 0);
    }

    #[test]
    fn test_disabled_and_removed_sensors() {
        let mut agent = agent_with(AgentConfig::default(), Dialect::ona(), 0);
        let first = agent.add_sensor(position_sensor());
        let second = agent.add_sensor(position_sensor());

        assert!(agent.set_sensor_enabled(first, false));
        assert_ok!(agent.update(&SenseArgs::new().arg("up")));
        assert_eq!(agent.total_perceptions_sent(), 1);

        assert!(agent.remove_sensor(second).is_some());
        assert!(agent.remove_sensor(second).is_none());
        assert_ok!(agent.update(&SenseArgs::new().arg("up")));
        assert_eq!(agent.total_perceptions_sent(), 1);
        assert_eq!(agent.sensors().len(), 1);
    }

    #[test]
    fn test_goal_reminders_every_update() {
        let config = AgentConfig {
            main_goal: Some("good".into()),
            negative_goal: Some("bad".into()),
            ..Default::default()
        };
        let mut agent = agent_with(config, Dialect::ona(), 0);

        assert_ok!(agent.update(&SenseArgs::new()));
        assert_ok!(agent.update(&SenseArgs::new()));

        assert_eq!(
            agent.pending_commands(),
            vec![
                "<{SELF} --> [good]>! :|:",
                "(--, <{SELF} --> [bad]>)! :|:",
                "<{SELF} --> [good]>! :|:",
                "(--, <{SELF} --> [bad]>)! :|:",
            ]
        );
    }

    #[test]
    fn test_reward_signals_pass_through() {
        let agent = agent_with(AgentConfig::default(), Dialect::python(), 0);
        assert_ok!(agent.praise_goal("good"));
        assert_ok!(agent.punish_goal("good"));
        assert_ok!(agent.put_goal("bad", true));

        assert_eq!(
            agent.pending_commands(),
            vec![
                "({SELF} --> [good]). :|:",
                "({SELF} --> [good]). :|: %0.00;0.90%",
                "({SELF} --> (-, [bad]))! :|:",
            ]
        );
        assert!(agent.stored_operations().is_empty());
    }

    #[test]
    fn test_register_does_not_activate() {
        let agent = agent_with(AgentConfig::default(), Dialect::ona(), 0);
        let ops = [Operation::new("left"), Operation::new("right")];
        assert_ok!(agent.register_operations(&ops));

        assert_eq!(
            agent.pending_commands(),
            vec!["(*,{SELF}, ^left). :|:", "(*,{SELF}, ^right). :|:"]
        );
        assert!(!agent.contains(&ops[0]));
        assert!(agent.stored_operation_names().is_empty());
    }

    #[test]
    fn test_reports_activate_and_reset() {
        let agent = agent_with(AgentConfig::default(), Dialect::ona(), 0);
        let left = Operation::new("left");
        let right = Operation::new("right");

        for _ in 0..3 {
            assert_eq!(
                agent.handle_output_line("^left executed with args"),
                Some(left.clone())
            );
        }
        assert_eq!(agent.is_active(&left), 3);
        assert_eq!(agent.total_operations_received(), 3);
        assert_eq!(agent.active_operation_names(), vec!["left"]);

        agent.reset_all(0);
        assert_eq!(agent.is_active(&left), 0);
        assert_eq!(agent.is_active(&right), 0);
        assert!(agent.contains(&left));
        assert!(!agent.contains(&right));
        assert!(agent.active_operation_names().is_empty());
    }

    #[test]
    fn test_operations_disabled() {
        let config = AgentConfig {
            operations_enabled: false,
            ..Default::default()
        };
        let agent = agent_with(config, Dialect::opennars(), 0);

        let line = "EXE: $0.27;0.90;0.93$ ^left([{SELF}])=null";
        assert_eq!(agent.handle_output_line(line), None);
        assert!(agent.stored_operations().is_empty());
        assert_eq!(agent.total_operations_received(), 0);

        agent.set_operations_enabled(true);
        assert!(agent.handle_output_line(line).is_some());
        assert_eq!(agent.is_active(&Operation::new("left")), 1);
    }

    #[test]
    fn test_force_unconscious_operation() {
        let agent = agent_with(AgentConfig::default(), Dialect::opennars(), 0);
        let fire = Operation::new("fire");

        assert_ok!(agent.force_unconscious_operation(&fire, true));
        assert_eq!(agent.pending_commands(), vec!["<(*,{SELF}) --> ^fire>. :|:"]);
        assert_eq!(agent.is_active(&fire), 1);
        assert_eq!(agent.total_operations_received(), 0);

        assert_ok!(agent.force_unconscious_operation(&fire, false));
        assert_eq!(agent.is_active(&fire), 1);
        assert_eq!(agent.pending_command_count(), 2);
    }

    #[test]
    fn test_force_without_babble_support() {
        let agent = agent_with(AgentConfig::default(), Dialect::ona(), 0);
        let fire = Operation::new("fire");
        assert!(!agent.needs_babble());

        assert_ok!(agent.force_unconscious_operation(&fire, true));
        assert_eq!(agent.pending_command_count(), 0);
        assert_eq!(agent.is_active(&fire), 1);
    }

    #[test]
    fn test_babble_probability_one_always_fires() {
        let agent = agent_with(AgentConfig::default(), Dialect::opennars(), 0);
        let op = Operation::new("opA");
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..20 {
            let chosen = agent.babble_with(&mut rng, 1, std::slice::from_ref(&op)).unwrap();
            assert_eq!(chosen, Some(op.clone()));
        }
        assert_eq!(agent.is_active(&op), 20);
        assert_eq!(agent.pending_command_count(), 20);
    }

    #[test]
    fn test_babble_probability_zero_never_fires() {
        let agent = agent_with(AgentConfig::default(), Dialect::opennars(), 0);
        let op = Operation::new("opA");

        for _ in 0..20 {
            assert_eq!(agent.babble(0, std::slice::from_ref(&op)).unwrap(), None);
        }
        assert!(!agent.contains(&op));
        assert_eq!(agent.pending_command_count(), 0);
        assert_eq!(agent.babble(1, &[]).unwrap(), None);
    }

    #[test]
    fn test_babble_picks_from_candidates() {
        let agent = agent_with(AgentConfig::default(), Dialect::python(), 0);
        let candidates = [Operation::new("left"), Operation::new("right")];
        let mut rng = StdRng::seed_from_u64(42);

        let mut fired = 0;
        for _ in 0..200 {
            if let Some(op) = agent.babble_with(&mut rng, 4, &candidates).unwrap() {
                assert!(candidates.contains(&op));
                fired += 1;
            }
        }
        assert!(fired > 0 && fired < 200);
        let total: u32 = agent.stored_operations().values().sum();
        assert_eq!(total, fired);
    }

    #[test]
    fn test_activation_policy() {
        let agent = agent_with(AgentConfig::default(), Dialect::ona(), 0);
        agent.set_activation_policy(Some(mutually_exclusive([
            Operation::new("left"),
            Operation::new("right"),
        ])));

        agent.handle_output_line("^left executed with args");
        agent.handle_output_line("^right executed with args");
        assert_eq!(agent.is_active(&Operation::new("left")), 0);
        assert_eq!(agent.is_active(&Operation::new("right")), 1);

        agent.set_activation(&Operation::new("left"), 2);
        assert_eq!(agent.stored_operations().get("left"), Some(&2));
    }

    #[test]
    fn test_clear_pending_and_stats() {
        let agent = agent_with(AgentConfig::default(), Dialect::ona(), 0);
        assert_ok!(agent.add_input("*volume=0"));
        assert_ok!(agent.add_input("10"));
        agent.handle_output_line("^left executed with args");

        let stats = agent.stats();
        assert!(stats.equipped);
        assert_eq!(stats.pending_commands, 2);
        assert_eq!(stats.operations_received, 1);
        assert_eq!(stats.active_operations, vec!["left"]);

        assert_eq!(agent.clear_pending_commands(), 2);
        assert_eq!(agent.pending_command_count(), 0);
    }

    #[test]
    fn test_disconnect_rejects_further_commands() {
        let mut agent = agent_with(AgentConfig::with_goal("good"), Dialect::ona(), 0);
        agent.disconnect();
        assert!(matches!(agent.update(&SenseArgs::new()), Err(NarsError::NotEquipped)));
        agent.disconnect();
    }

    #[tokio::test]
    async fn test_equip_missing_backend() {
        let config = BackendConfig::new(nars_core::BackendType::Ona, "/nonexistent/nars");
        let mut agent = Agent::default();
        let result = agent.equip(&config).await;
        assert!(matches!(result, Err(NarsError::Spawn(_))));
        assert!(!agent.has_brain());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_end_to_end_with_echo_backend() {
        use tokio::time::{Duration, sleep, timeout};

        let mut agent = Agent::default();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        agent.set_output_observer(move |line| {
            sink.lock().unwrap().push(line.to_string());
        });

        assert_ok!(agent.equip_with(bridge(0), Dialect::ona()).await);
        assert!(agent.bridge().is_some_and(ProcessBridge::is_alive));

        // cat echoes the report back as if the backend printed it
        assert_ok!(agent.add_input("^left executed with args"));
        assert_ok!(agent.add_input("^left executed with args"));

        let left = Operation::new("left");
        let reached = timeout(Duration::from_secs(5), async {
            while agent.is_active(&left) < 2 {
                sleep(Duration::from_millis(10)).await;
            }
        })
        .await;
        assert!(reached.is_ok(), "operation report never arrived");
        assert_eq!(agent.total_operations_received(), 2);
        assert_eq!(seen.lock().unwrap().first().map(String::as_str), Some("*volume=0"));

        assert!(matches!(
            agent.equip_with(bridge(0), Dialect::ona()).await,
            Err(NarsError::AlreadyEquipped)
        ));
        agent.disconnect();
        assert!(!agent.has_brain());
    }
}
