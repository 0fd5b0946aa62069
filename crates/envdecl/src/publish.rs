//! Publication of resolved configuration under stable lookup tokens.
//!
//! Every resolution pass produces a [`ConfigSet`]: one token per resolved
//! instance and one token per field value. Consumers look entries up by
//! declaration name, by declaration name plus field, or by raw token. A set
//! can additionally be installed process-wide when resolution runs with
//! `define_global`.

use crate::value::{ConfigInstance, ConfigValue};
use log::debug;
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Token under which a whole resolved instance is published.
pub fn config_token(declaration: &str) -> String {
    format!("config__{declaration}")
}

/// Token under which a single resolved field value is published.
pub fn config_value_token(declaration: &str, field: &str) -> String {
    format!("config__value__{declaration}__{field}")
}

/// One published entry: a whole instance or a single field value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Published {
    /// A fully resolved instance.
    Instance(ConfigInstance),
    /// One field's final value; falsy values are normalized to `Null`.
    Value(ConfigValue),
}

/// The output of one resolution pass: token to published entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConfigSet {
    entries: HashMap<String, Published>,
}

impl ConfigSet {
    /// Create an empty set.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Publish an instance along with every one of its field values.
    pub(crate) fn publish_instance(&mut self, instance: ConfigInstance) {
        let declaration = instance.declaration().to_string();
        for (field, value) in instance.fields() {
            let published = if value.is_falsy() {
                ConfigValue::Null
            } else {
                value.clone()
            };
            self.entries.insert(
                config_value_token(&declaration, field),
                Published::Value(published),
            );
        }
        debug!(
            "published {} (fields={})",
            config_token(&declaration),
            instance.len()
        );
        self.entries
            .insert(config_token(&declaration), Published::Instance(instance));
    }

    /// Look up a whole instance by declaration name.
    pub fn instance(&self, declaration: &str) -> Option<&ConfigInstance> {
        match self.entries.get(&config_token(declaration)) {
            Some(Published::Instance(instance)) => Some(instance),
            _ => None,
        }
    }

    /// Look up a single published field value by declaration and field name.
    pub fn value(&self, declaration: &str, field: &str) -> Option<&ConfigValue> {
        match self.entries.get(&config_value_token(declaration, field)) {
            Some(Published::Value(value)) => Some(value),
            _ => None,
        }
    }

    /// Look up any entry by its raw token.
    pub fn by_token(&self, token: &str) -> Option<&Published> {
        self.entries.get(token)
    }

    /// Iterate all published tokens.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of published entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been published.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

static GLOBAL_SET: LazyLock<RwLock<Option<ConfigSet>>> = LazyLock::new(|| RwLock::new(None));

/// Install a set as the process-wide one.
pub(crate) fn install_global(set: ConfigSet) {
    debug!("installing global config set (entries={})", set.len());
    *GLOBAL_SET.write() = Some(set);
}

/// The process-wide set installed by the last `define_global` resolution,
/// if any.
pub fn global_set() -> Option<ConfigSet> {
    GLOBAL_SET.read().clone()
}

/// Remove the process-wide set. Intended for test suites.
pub(crate) fn clear_global() {
    *GLOBAL_SET.write() = None;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn token_formats_are_stable() {
        assert_eq!(config_token("DemoConfig"), "config__DemoConfig");
        assert_eq!(
            config_value_token("DemoConfig", "someVar"),
            "config__value__DemoConfig__someVar"
        );
    }

    #[test]
    fn falsy_field_values_publish_as_null() {
        let mut instance = ConfigInstance::new("Demo");
        instance.set("empty", ConfigValue::Str(String::new()));
        instance.set("zero", ConfigValue::Int(0));
        instance.set("set", ConfigValue::Str("x".to_string()));

        let mut set = ConfigSet::new();
        set.publish_instance(instance);

        assert_eq!(set.value("Demo", "empty"), Some(&ConfigValue::Null));
        assert_eq!(set.value("Demo", "zero"), Some(&ConfigValue::Null));
        assert_eq!(
            set.value("Demo", "set"),
            Some(&ConfigValue::Str("x".to_string()))
        );
        // The instance keeps the un-normalized values.
        let instance = set.instance("Demo").expect("instance");
        assert_eq!(instance.get("empty"), Some(&ConfigValue::Str(String::new())));
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn lookup_by_raw_token() {
        let mut instance = ConfigInstance::new("Demo");
        instance.set("field", ConfigValue::Bool(true));
        let mut set = ConfigSet::new();
        set.publish_instance(instance);

        assert!(matches!(
            set.by_token("config__Demo"),
            Some(Published::Instance(_))
        ));
        assert!(matches!(
            set.by_token("config__value__Demo__field"),
            Some(Published::Value(ConfigValue::Bool(true)))
        ));
        assert!(set.by_token("config__Missing").is_none());
    }
}
