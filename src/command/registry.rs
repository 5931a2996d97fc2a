//! Command registry and the startup aggregator that fills it
//!
//! Each feature exposes its commands as a [`CommandSet`]. At startup a
//! [`RegistryBuilder`] registers the sets in priority band order (first,
//! normal, last), keeping insertion order within a band. The registry is
//! read-only once built.

use super::descriptor::CommandDescriptor;
use thiserror::Error;
use tracing::{debug, error, warn};

/// Default number of command slots
pub const DEFAULT_CAPACITY: usize = 64;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Registry full ({capacity} commands)")]
    Full { capacity: usize },

    #[error("Command already registered: {0:?}")]
    Duplicate(&'static str),
}

/// Ordered, bounded list of command descriptors
#[derive(Debug)]
pub struct Registry {
    commands: Vec<CommandDescriptor>,
    capacity: usize,
}

impl Registry {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            commands: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a descriptor; the first registration of a name wins
    pub fn register(&mut self, descriptor: CommandDescriptor) -> Result<(), RegistryError> {
        if self.commands.len() >= self.capacity {
            error!(
                "Cannot register {:?}: registry full ({} commands)",
                descriptor.name(),
                self.capacity
            );
            return Err(RegistryError::Full {
                capacity: self.capacity,
            });
        }
        if self.find(descriptor.name()).is_some() {
            warn!("Ignoring duplicate registration of {:?}", descriptor.name());
            return Err(RegistryError::Duplicate(descriptor.name()));
        }

        self.commands.push(descriptor);
        Ok(())
    }

    /// Exact-name lookup
    pub fn find(&self, name: &str) -> Option<&CommandDescriptor> {
        self.commands.iter().find(|c| c.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandDescriptor> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }
}

/// Registration band of a command set
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Priority {
    First,
    Normal,
    Last,
}

/// A feature's contribution to the registry
pub trait CommandSet {
    /// Name used in registration logs
    fn name(&self) -> &'static str;

    fn priority(&self) -> Priority {
        Priority::Normal
    }

    fn commands(&self) -> Vec<CommandDescriptor>;
}

/// Collects command sets and registers them in one pass
pub struct RegistryBuilder {
    capacity: usize,
    sets: Vec<Box<dyn CommandSet>>,
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl RegistryBuilder {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            sets: Vec::new(),
        }
    }

    pub fn with(mut self, set: impl CommandSet + 'static) -> Self {
        self.sets.push(Box::new(set));
        self
    }

    /// Register every set; a set that fails is logged and the rest continue
    pub fn build(mut self) -> Registry {
        // Stable: sets within a band keep the order they were added in
        self.sets.sort_by_key(|set| set.priority());

        let mut registry = Registry::with_capacity(self.capacity);
        for set in &self.sets {
            let mut failed = 0;
            for descriptor in set.commands() {
                if registry.register(descriptor).is_err() {
                    failed += 1;
                }
            }

            if failed == 0 {
                debug!("{} success", set.name());
            } else {
                error!("{} failed ({} commands not registered)", set.name(), failed);
            }
        }

        registry
    }
}
