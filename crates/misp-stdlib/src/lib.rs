//! MISP standard library.
//!
//! Each pack is a plain registration function over the core [`Registry`];
//! hosts choose which packs to install and in what order:
//!
//! ```text
//! math     + - * / < >
//! lists    map mapex fold where for
//! strings  slength sindex to-char ssubstring
//! ```

pub mod lists;
pub mod math;
pub mod strings;

use misp_eval::Registry;
use misp_types::SetupError;

/// A registration callback run once during interpreter setup.
pub type Pack = fn(&mut Registry) -> Result<(), SetupError>;

/// Every pack in this crate, in installation order.
pub const PACKS: &[Pack] = &[math::register, lists::register, strings::register];

/// Install every pack into `registry`.
pub fn register_all(registry: &mut Registry) -> Result<(), SetupError> {
    for pack in PACKS {
        pack(registry)?;
    }
    tracing::debug!(builtins = registry.len(), "standard library installed");
    Ok(())
}
