//! Builtin function registry.
//!
//! Builtins are declared with a small DSL that is itself MISP text: the
//! declaration `"set object 'name value"` is parsed as the list
//! `(set object 'name value)`, whose head names the builtin and whose
//! remaining tokens are its formals (see [`Signature`]).

use std::fmt;
use std::rc::Rc;

use misp_types::{Atom, EvalResult, Heap, Modifier, SetupError, Signature};
use rustc_hash::FxHashMap;

use crate::evaluator::Evaluator;

/// Native implementation of a builtin.
///
/// Receives one atom per formal: evaluated or raw per the formal's
/// convention, with a rest formal's operands collected into a single list.
pub type NativeFn = Rc<dyn Fn(&mut Evaluator, Vec<Atom>) -> EvalResult<Atom>>;

/// A registered builtin.
pub struct Builtin {
    pub name: Rc<str>,
    pub signature: Signature,
    pub implementation: NativeFn,
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builtin")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        for param in self.signature.params() {
            write!(f, " {param}")?;
        }
        Ok(())
    }
}

/// Ordered table of builtins, looked up by name.
#[derive(Default)]
pub struct Registry {
    builtins: Vec<Rc<Builtin>>,
    index: FxHashMap<Rc<str>, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a builtin.
    ///
    /// Fails if the declaration does not parse, its head is not a bare
    /// token, a formal is malformed, or the name is already taken.
    pub fn register<F>(&mut self, declaration: &str, implementation: F) -> Result<(), SetupError>
    where
        F: Fn(&mut Evaluator, Vec<Atom>) -> EvalResult<Atom> + 'static,
    {
        let (name, signature) = parse_declaration(declaration)?;
        if self.index.contains_key(&*name) {
            return Err(SetupError::Duplicate(name.to_string()));
        }
        tracing::debug!(builtin = %name, %signature, "registered builtin");
        self.index.insert(Rc::clone(&name), self.builtins.len());
        self.builtins.push(Rc::new(Builtin {
            name,
            signature,
            implementation: Rc::new(implementation),
        }));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Rc<Builtin>> {
        self.index.get(name).map(|&i| Rc::clone(&self.builtins[i]))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Builtins in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Builtin> {
        self.builtins.iter().map(|b| &**b)
    }

    pub fn len(&self) -> usize {
        self.builtins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.builtins.is_empty()
    }

    /// One line per builtin: its name followed by its formals.
    pub fn listing(&self) -> String {
        let mut out = String::new();
        for builtin in self.iter() {
            out.push_str(&builtin.to_string());
            out.push('\n');
        }
        out
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.builtins.iter()).finish()
    }
}

fn parse_declaration(declaration: &str) -> Result<(Rc<str>, Signature), SetupError> {
    let mut scratch = Heap::new();
    let parsed = misp_parser::parse(&format!("({declaration})"), &mut scratch)?;
    let Some(items) = parsed.as_list() else {
        return Err(SetupError::malformed(declaration, "expected a list"));
    };
    let Some((head, formals)) = items.split_first() else {
        return Err(SetupError::malformed(declaration, "missing builtin name"));
    };
    let name = match head.as_token() {
        Some(name) if head.modifier == Modifier::None => Rc::<str>::from(name),
        _ => {
            return Err(SetupError::malformed(
                declaration,
                "builtin name must be a bare token",
            ))
        }
    };
    let signature = Signature::from_formals(formals)
        .map_err(|reason| SetupError::malformed(declaration, reason))?;
    Ok((name, signature))
}

#[cfg(test)]
mod tests {
    use super::*;
    use misp_types::{Convention, Rest};

    fn noop(_: &mut Evaluator, _: Vec<Atom>) -> EvalResult<Atom> {
        Ok(Atom::nil())
    }

    #[test]
    fn test_register_parses_formals() {
        let mut registry = Registry::new();
        registry.register("fold 'x 'y first list 'code", noop).unwrap();
        let builtin = registry.get("fold").unwrap();
        let params = builtin.signature.params();
        assert_eq!(params.len(), 5);
        assert_eq!(params[0].convention, Convention::Quoted);
        assert_eq!(params[2].convention, Convention::Evaluated);
        assert_eq!(builtin.to_string(), "fold 'x 'y first list 'code");
    }

    #[test]
    fn test_rest_formal() {
        let mut registry = Registry::new();
        registry.register("using '+vars", noop).unwrap();
        let builtin = registry.get("using").unwrap();
        let rest = builtin.signature.rest().unwrap();
        assert_eq!(rest.name, "vars");
        assert_eq!(rest.rest, Some(Rest::OneOrMore));
    }

    #[test]
    fn test_malformed_declarations() {
        let mut registry = Registry::new();
        assert!(matches!(
            registry.register("bad $x", noop),
            Err(SetupError::MalformedDeclaration { .. })
        ));
        assert!(matches!(
            registry.register("bad :x", noop),
            Err(SetupError::MalformedDeclaration { .. })
        ));
        assert!(matches!(
            registry.register("bad 5", noop),
            Err(SetupError::MalformedDeclaration { .. })
        ));
        assert!(matches!(
            registry.register("bad *xs y", noop),
            Err(SetupError::MalformedDeclaration { .. })
        ));
        assert!(matches!(
            registry.register("", noop),
            Err(SetupError::MalformedDeclaration { .. })
        ));
        assert!(matches!(
            registry.register("bad (x", noop),
            Err(SetupError::Parse(_))
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut registry = Registry::new();
        registry.register("f x", noop).unwrap();
        assert_eq!(
            registry.register("f y", noop),
            Err(SetupError::Duplicate("f".into()))
        );
    }

    #[test]
    fn test_listing_keeps_registration_order() {
        let mut registry = Registry::new();
        registry.register("b x", noop).unwrap();
        registry.register("a *xs", noop).unwrap();
        assert_eq!(registry.listing(), "b x\na *xs\n");
    }
}
