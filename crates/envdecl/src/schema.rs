//! Configuration declarations and the registration builder.

use crate::error::ConfigError;
use crate::registry::{DeclId, registry};
use crate::validate::Validator;
use crate::value::ConfigValue;
use log::warn;

/// One field of a declaration: the target field name, the unqualified
/// environment variable that supplies it, and the value used when the
/// variable is absent.
#[derive(Debug, Clone)]
pub struct FieldBinding {
    /// Target field on the resolved instance.
    pub field_name: String,
    /// Unqualified environment variable name.
    pub env_name: String,
    /// Pre-initialized value used when the variable is absent.
    pub default: ConfigValue,
}

/// A user-defined configuration schema: an optional prefix, ordered field
/// bindings, and per-field ordered validator lists.
///
/// Declarations are immutable once built; construct them with
/// [`describe_config`].
#[derive(Debug, Clone)]
pub struct ConfigDecl {
    name: String,
    prefix: String,
    bindings: Vec<FieldBinding>,
    validators: Vec<(String, Vec<Validator>)>,
}

impl ConfigDecl {
    /// Declaration name, used to derive publication tokens.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Namespace prefix; empty means no prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Field bindings in declaration order.
    pub fn bindings(&self) -> &[FieldBinding] {
        &self.bindings
    }

    /// Per-field validator lists, keyed by field name in first-registration
    /// order.
    pub fn validators(&self) -> impl Iterator<Item = (&str, &[Validator])> {
        self.validators
            .iter()
            .map(|(field, checks)| (field.as_str(), checks.as_slice()))
    }

    /// Validators registered for one field, in registration order.
    pub fn validators_of(&self, field: &str) -> &[Validator] {
        self.validators
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, checks)| checks.as_slice())
            .unwrap_or(&[])
    }
}

/// Start describing a configuration declaration.
pub fn describe_config(name: &str) -> DeclBuilder {
    DeclBuilder {
        decl: ConfigDecl {
            name: name.to_string(),
            prefix: String::new(),
            bindings: Vec::new(),
            validators: Vec::new(),
        },
    }
}

/// Chained builder for a [`ConfigDecl`].
#[derive(Debug, Clone)]
pub struct DeclBuilder {
    decl: ConfigDecl,
}

impl DeclBuilder {
    /// Set the namespace prefix for every binding of this declaration.
    pub fn prefix(mut self, prefix: &str) -> Self {
        self.decl.prefix = prefix.to_string();
        self
    }

    /// Bind a field to an unqualified environment variable name.
    pub fn bind_field(mut self, field_name: &str, env_name: &str) -> Self {
        self.decl.bindings.push(FieldBinding {
            field_name: field_name.to_string(),
            env_name: env_name.to_string(),
            default: ConfigValue::Unset,
        });
        self
    }

    /// Set the default for the most recently bound field, used when its
    /// variable is absent from the environment.
    pub fn default_value(mut self, value: impl Into<ConfigValue>) -> Self {
        match self.decl.bindings.last_mut() {
            Some(binding) => binding.default = value.into(),
            None => warn!(
                "default_value on {} ignored: no field bound yet",
                self.decl.name
            ),
        }
        self
    }

    /// Append a validator to the most recently bound field.
    pub fn with_validator(self, validator: Validator) -> Self {
        let field = self
            .decl
            .bindings
            .last()
            .map(|binding| binding.field_name.clone());
        match field {
            Some(field) => self.validator_for(&field, validator),
            None => {
                warn!(
                    "with_validator on {} ignored: no field bound yet",
                    self.decl.name
                );
                self
            }
        }
    }

    /// Append a validator to the named field's ordered list.
    ///
    /// The list is keyed by field name, so duplicate bindings of the same
    /// field share one validator list.
    pub fn validator_for(mut self, field: &str, validator: Validator) -> Self {
        match self
            .decl
            .validators
            .iter_mut()
            .find(|(name, _)| name == field)
        {
            Some((_, checks)) => checks.push(validator),
            None => self
                .decl
                .validators
                .push((field.to_string(), vec![validator])),
        }
        self
    }

    /// Finish building without registering, for use with a scoped
    /// [`Registry`](crate::Registry) or direct resolution.
    pub fn build(self) -> ConfigDecl {
        self.decl
    }

    /// Register the declaration with the process-wide registry.
    ///
    /// Fails when the registry has already been frozen by a resolution pass.
    pub fn register(self) -> Result<DeclId, ConfigError> {
        registry().register(self.decl)
    }
}
