//! Process-wide declaration registry with a write-once lifecycle.
//!
//! Declarations are registered during application start-up. The first
//! resolution pass freezes the registry; registration after that point is an
//! error. Test suites rebuild a clean state with [`reset_for_tests`] instead
//! of relying on leftover process-wide entries.

use crate::error::ConfigError;
use crate::schema::ConfigDecl;
use log::debug;
use parking_lot::RwLock;
use std::sync::{Arc, LazyLock};

/// Handle to a registered declaration.
///
/// Identity is positional within the owning registry, so two declarations
/// with the same name remain distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeclId(usize);

#[derive(Default)]
struct RegistryState {
    decls: Vec<ConfigDecl>,
    frozen: bool,
}

/// Ordered store of configuration declarations.
#[derive(Clone, Default)]
pub struct Registry {
    state: Arc<RwLock<RegistryState>>,
}

impl Registry {
    /// Create an empty, unfrozen registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a declaration, returning its identity handle.
    ///
    /// Fails once the registry has been frozen by a resolution pass.
    pub fn register(&self, decl: ConfigDecl) -> Result<DeclId, ConfigError> {
        let mut state = self.state.write();
        if state.frozen {
            return Err(ConfigError::Invalid(format!(
                "cannot register {} after resolution has started",
                decl.name()
            )));
        }
        debug!(
            "registering declaration {} (fields={})",
            decl.name(),
            decl.bindings().len()
        );
        state.decls.push(decl);
        Ok(DeclId(state.decls.len() - 1))
    }

    /// Clone out the declarations behind the given handles, in handle order.
    pub fn declarations(&self, ids: &[DeclId]) -> Result<Vec<ConfigDecl>, ConfigError> {
        let state = self.state.read();
        ids.iter()
            .map(|id| {
                state
                    .decls
                    .get(id.0)
                    .cloned()
                    .ok_or_else(|| ConfigError::Invalid(format!("unknown declaration id {}", id.0)))
            })
            .collect()
    }

    /// Clone out the declaration behind one handle.
    pub fn declaration(&self, id: DeclId) -> Result<ConfigDecl, ConfigError> {
        self.declarations(&[id]).map(|mut decls| decls.remove(0))
    }

    /// Stop accepting registrations. Idempotent.
    pub fn freeze(&self) {
        let mut state = self.state.write();
        if !state.frozen {
            debug!("freezing registry (declarations={})", state.decls.len());
            state.frozen = true;
        }
    }

    /// Whether a resolution pass has frozen the registry.
    pub fn is_frozen(&self) -> bool {
        self.state.read().frozen
    }

    /// Number of registered declarations.
    pub fn len(&self) -> usize {
        self.state.read().decls.len()
    }

    /// Whether no declarations are registered.
    pub fn is_empty(&self) -> bool {
        self.state.read().decls.is_empty()
    }

    /// Drop all declarations and unfreeze. Intended for test suites.
    pub fn reset_for_tests(&self) {
        let mut state = self.state.write();
        state.decls.clear();
        state.frozen = false;
    }
}

static GLOBAL_REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

/// The process-wide registry used by [`register`](crate::DeclBuilder::register)
/// and [`load`](crate::load).
pub fn registry() -> &'static Registry {
    &GLOBAL_REGISTRY
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::describe_config;

    #[test]
    fn register_then_freeze_rejects_further_registration() {
        let registry = Registry::new();
        let id = registry
            .register(describe_config("Demo").bind_field("a", "A").build())
            .expect("register");
        assert_eq!(registry.declaration(id).expect("decl").name(), "Demo");

        registry.freeze();
        assert!(registry.is_frozen());
        let err = registry.register(describe_config("Late").build());
        assert!(err.is_err());

        registry.reset_for_tests();
        assert!(!registry.is_frozen());
        assert!(registry.is_empty());
    }

    #[test]
    fn same_named_declarations_get_distinct_ids() {
        let registry = Registry::new();
        let first = registry
            .register(describe_config("Demo").bind_field("a", "A").build())
            .expect("register");
        let second = registry
            .register(describe_config("Demo").bind_field("b", "B").build())
            .expect("register");
        assert_ne!(first, second);
        assert_eq!(
            registry.declaration(second).expect("decl").bindings()[0].field_name,
            "b"
        );
    }
}
