//! `serialize` and whole-file text I/O.

use misp_types::{Atom, EvalError, SetupError};

use crate::args;
use crate::registry::Registry;
use crate::serializer::serialize;

pub(super) fn register(registry: &mut Registry) -> Result<(), SetupError> {
    registry.register("serialize record", |ev, args| {
        let root = args::record("serialize", 1, &args[0])?;
        Ok(Atom::string(serialize(&ev.heap, root)?))
    })?;

    registry.register("write-all file text", |_, args| {
        let path = args::string("write-all", 1, &args[0])?;
        let text = args::string("write-all", 2, &args[1])?;
        std::fs::write(path, text).map_err(|e| EvalError::Io(format!("{path}: {e}")))?;
        Ok(args[1].clone())
    })?;

    registry.register("read-all file", |_, args| {
        let path = args::string("read-all", 1, &args[0])?;
        let text =
            std::fs::read_to_string(path).map_err(|e| EvalError::Io(format!("{path}: {e}")))?;
        Ok(Atom::string(text))
    })?;

    Ok(())
}
