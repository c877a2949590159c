//! Formal parameter lists for builtins and user functions.
//!
//! A formal is a bare token. Its modifier picks the calling convention and a
//! leading `+` or `*` marks the trailing rest parameter:
//!
//! | Formal   | Meaning                                          |
//! |----------|--------------------------------------------------|
//! | `x`      | operand evaluated in the caller's scope          |
//! | `'x`     | operand passed as its raw parse form             |
//! | `+xs`    | one or more remaining operands, collected in a list |
//! | `*xs`    | zero or more remaining operands, collected in a list |

use std::fmt;

use crate::atom::{Atom, Modifier};

/// How an operand reaches a formal parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Convention {
    Evaluated,
    Quoted,
}

/// Minimum operand count of a rest parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rest {
    /// `+name`
    OneOrMore,
    /// `*name`
    ZeroOrMore,
}

impl Rest {
    fn sigil(self) -> char {
        match self {
            Self::OneOrMore => '+',
            Self::ZeroOrMore => '*',
        }
    }

    /// Fewest actual operands the rest parameter accepts.
    pub fn minimum(self) -> usize {
        match self {
            Self::OneOrMore => 1,
            Self::ZeroOrMore => 0,
        }
    }
}

/// One formal parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// Binding name, without any rest sigil.
    pub name: String,
    pub convention: Convention,
    pub rest: Option<Rest>,
}

impl Param {
    /// Read a formal from its parsed atom.
    pub fn from_atom(atom: &Atom) -> Result<Self, String> {
        let Some(text) = atom.as_token() else {
            return Err(format!("formal parameter must be a token, found {}", atom.type_name()));
        };
        let convention = match atom.modifier {
            Modifier::None => Convention::Evaluated,
            Modifier::Quote => Convention::Quoted,
            Modifier::Expand => return Err(format!("expand modifier is illegal on formal `{text}`")),
            Modifier::Evaluate => {
                return Err(format!("evaluate modifier is illegal on formal `{text}`"))
            }
        };
        let (rest, name) = match text.chars().next() {
            Some('+') if text.len() > 1 => (Some(Rest::OneOrMore), &text[1..]),
            Some('*') if text.len() > 1 => (Some(Rest::ZeroOrMore), &text[1..]),
            _ => (None, text),
        };
        Ok(Self {
            name: name.to_string(),
            convention,
            rest,
        })
    }

    /// The atom this formal was read from.
    pub fn to_atom(&self) -> Atom {
        let text = match self.rest {
            Some(rest) => format!("{}{}", rest.sigil(), self.name),
            None => self.name.clone(),
        };
        let modifier = match self.convention {
            Convention::Evaluated => Modifier::None,
            Convention::Quoted => Modifier::Quote,
        };
        Atom::token(text).with_modifier(modifier)
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.convention == Convention::Quoted {
            f.write_str("'")?;
        }
        if let Some(rest) = self.rest {
            write!(f, "{}", rest.sigil())?;
        }
        f.write_str(&self.name)
    }
}

/// An ordered formal parameter list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Signature {
    params: Vec<Param>,
}

impl Signature {
    /// Read a formal list. A rest parameter may only appear last.
    pub fn from_formals(formals: &[Atom]) -> Result<Self, String> {
        let params = formals
            .iter()
            .map(Param::from_atom)
            .collect::<Result<Vec<_>, _>>()?;
        if let Some(pos) = params.iter().position(|p| p.rest.is_some()) {
            if pos + 1 != params.len() {
                return Err(format!(
                    "rest parameter `{}` must be the last formal",
                    params[pos]
                ));
            }
        }
        Ok(Self { params })
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// The trailing rest parameter, if any.
    pub fn rest(&self) -> Option<&Param> {
        self.params.last().filter(|p| p.rest.is_some())
    }

    /// Number of non-rest formals.
    pub fn fixed_count(&self) -> usize {
        self.params.len() - usize::from(self.rest().is_some())
    }

    pub fn to_atoms(&self) -> Vec<Atom> {
        self.params.iter().map(Param::to_atom).collect()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{param}")?;
        }
        Ok(())
    }
}
