use crate::{ConnectorFactory, Error, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of connector factories, keyed by connector type name. Statically
/// linked plugins register themselves here at host startup.
pub struct Registry {
    factories: HashMap<String, Arc<dyn ConnectorFactory>>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a connector factory under its own name.
    pub fn register(&mut self, factory: Arc<dyn ConnectorFactory>) {
        let name = factory.name().to_string();
        self.factories.insert(name, factory);
    }

    /// Look up a connector factory by type name.
    pub fn factory(&self, name: &str) -> Result<Arc<dyn ConnectorFactory>> {
        self.factories
            .get(name)
            .cloned()
            .ok_or_else(|| Error::Configuration(format!("Connector factory '{}' not found", name)))
    }

    /// List all registered connector types.
    pub fn list(&self) -> Vec<String> {
        self.factories.keys().cloned().collect()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
