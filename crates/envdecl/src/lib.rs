//! Declarative environment configuration with typed, composable validators.
//!
//! Declarations describe how environment variables map onto named fields:
//! an optional namespace prefix, ordered field bindings, and per-field
//! validator chains. A resolution pass materializes an environment (live
//! process env, a `.env` file, or `.env` text), resolves every declaration,
//! and publishes the results under stable string tokens for retrieval by
//! name.
//!
//! ```no_run
//! use envdecl::{IntRange, LoadOptions, describe_config, integer, load};
//!
//! # fn main() -> Result<(), envdecl::ConfigError> {
//! let id = describe_config("ServerConfig")
//!     .prefix("SRV")
//!     .bind_field("port", "PORT")
//!     .with_validator(integer(IntRange { from: Some(1), to: Some(65535) }))
//!     .register()?;
//!
//! let set = load(&[id], LoadOptions::new())?;
//! let port = set.instance("ServerConfig").and_then(|c| c.get("port"));
//! # let _ = port;
//! # Ok(())
//! # }
//! ```

mod error;
mod publish;
mod registry;
mod resolver;
mod schema;
mod validate;
mod value;

/// Public error types for resolution and validation.
pub use error::{ConfigError, ValidationError};
/// Publication tokens, the resolved set, and the process-wide slot.
pub use publish::{ConfigSet, Published, config_token, config_value_token, global_set};
/// Declaration registry and identity handles.
pub use registry::{DeclId, Registry, registry};
/// Resolution entry points and environment options.
pub use resolver::{EnvMap, LoadOptions, load, reset_for_tests, resolve};
/// Declaration schema and builder.
pub use schema::{ConfigDecl, DeclBuilder, FieldBinding, describe_config};
/// Validator type, factories, and the built-in validator library.
pub use validate::{
    IntRange, NumRange, StrRule, Validator, any_number, boolean, date, email, integer, string,
};
/// Scalar values and resolved instances.
pub use value::{ConfigInstance, ConfigValue};
