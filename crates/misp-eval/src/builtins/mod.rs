//! Builtins registered by the core itself.
//!
//! Each submodule owns one family and exposes a `register` function; the
//! standard-library packs use the same [`Registry::register`] entry point.

mod control;
mod functions;
mod lists;
mod persistence;
mod records;
mod scope;
mod text;
mod vitals;

use misp_types::SetupError;

use crate::registry::Registry;

/// Register every core builtin, in listing order.
pub fn register_core(registry: &mut Registry) -> Result<(), SetupError> {
    vitals::register(registry)?;
    control::register(registry)?;
    text::register(registry)?;
    functions::register(registry)?;
    scope::register(registry)?;
    records::register(registry)?;
    lists::register(registry)?;
    persistence::register(registry)?;
    tracing::debug!(builtins = registry.len(), "core builtins registered");
    Ok(())
}
