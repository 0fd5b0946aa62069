//! Resolution engine: environment values onto declared schemas.
//!
//! Materializes an environment mapping, resolves each declaration's fields
//! (prefix-qualified name first, declared default otherwise), applies each
//! field's validators in declaration order, and publishes the results as a
//! [`ConfigSet`]. The whole batch fails together on the first validation
//! error; nothing is published from a failed pass.

mod env_io;


use crate::error::ConfigError;
use crate::publish::{self, ConfigSet};
use crate::registry::{DeclId, registry};
use crate::schema::ConfigDecl;
use crate::value::{ConfigInstance, ConfigValue};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::path::PathBuf;

/// Materialized environment: flat, case-sensitive key to string value.
pub type EnvMap = HashMap<String, String>;

/// Separator between a declaration prefix and an environment variable name.
const PREFIX_SEPARATOR: &str = "__";

/// Options controlling where the environment mapping comes from and whether
/// the published set is installed process-wide.
///
/// At most one of `use_file`/`use_string` should be set; with neither, the
/// process's live environment is used as-is.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Read a `.env`-format file, merged under the live process environment.
    pub use_file: Option<PathBuf>,
    /// Parse `.env`-format text and use only its entries.
    pub use_string: Option<String>,
    /// Install the published set into the process-wide slot.
    pub define_global: bool,
}

impl LoadOptions {
    /// Options that use the live process environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Source the environment from a `.env`-format file.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.use_file = Some(path.into());
        self
    }

    /// Source the environment from `.env`-format text.
    pub fn with_string(mut self, text: impl Into<String>) -> Self {
        self.use_string = Some(text.into());
        self
    }

    /// Install the result as the process-wide config set.
    pub fn define_global(mut self) -> Self {
        self.define_global = true;
        self
    }
}

/// Resolve registered declarations against an environment chosen by
/// `options`, publishing the results.
///
/// Freezes the process-wide registry before resolving, so no declaration can
/// change mid-pass or after it.
pub fn load(ids: &[DeclId], options: LoadOptions) -> Result<ConfigSet, ConfigError> {
    if options.use_file.is_some() && options.use_string.is_some() {
        warn!("both use_file and use_string set; the file takes precedence");
    }
    let env = env_io::materialize(&options)?;
    let decls = registry().declarations(ids)?;
    registry().freeze();

    let set = resolve(&decls, &env)?;
    if options.define_global {
        publish::install_global(set.clone());
    }
    Ok(set)
}

/// Resolve explicit declarations against an explicit environment.
///
/// The registry-free entry point: declarations resolve independently, in
/// sequence, and the first validation failure aborts the entire batch.
pub fn resolve(decls: &[ConfigDecl], env: &EnvMap) -> Result<ConfigSet, ConfigError> {
    let mut set = ConfigSet::new();
    for decl in decls {
        let instance = resolve_declaration(decl, env)?;
        set.publish_instance(instance);
    }
    info!(
        "resolved {} declarations ({} published entries)",
        decls.len(),
        set.len()
    );
    Ok(set)
}

/// Resolve and validate a single declaration.
fn resolve_declaration(decl: &ConfigDecl, env: &EnvMap) -> Result<ConfigInstance, ConfigError> {
    debug!(
        "resolving declaration {} (prefix={:?})",
        decl.name(),
        decl.prefix()
    );
    let mut instance = ConfigInstance::new(decl.name());

    for binding in decl.bindings() {
        let key = qualified_key(decl.prefix(), &binding.env_name);
        // Only the single qualified key is consulted; once a prefix is
        // configured the unprefixed name is never read.
        let value = match env.get(&key) {
            Some(raw) => ConfigValue::Str(raw.clone()),
            None => binding.default.clone(),
        };
        instance.set(&binding.field_name, value);
    }

    for (field, validators) in decl.validators() {
        for validator in validators {
            let current = instance.get(field).cloned().unwrap_or(ConfigValue::Unset);
            match validator.apply(field, &current) {
                Ok(next) => instance.set(field, next),
                Err(err) => {
                    return Err(ConfigError::Validation {
                        declaration: decl.name().to_string(),
                        field: field.to_string(),
                        message: err.message,
                        value: current.to_string(),
                        value_type: current.type_name(),
                    });
                }
            }
        }
    }

    Ok(instance)
}

/// Environment key consulted for one binding.
fn qualified_key(prefix: &str, env_name: &str) -> String {
    if prefix.is_empty() {
        env_name.to_string()
    } else {
        format!("{prefix}{PREFIX_SEPARATOR}{env_name}")
    }
}

/// Clear the process-wide registry and published set. Intended for test
/// suites that exercise the global entry points.
pub fn reset_for_tests() {
    registry().reset_for_tests();
    publish::clear_global();
}
