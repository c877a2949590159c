//! Arena storage for records and functions.
//!
//! Records double as data objects and scope frames. Both they and functions
//! may reference each other cyclically (a record's parent chain, a closure's
//! declaration scope), so they are owned by a [`Heap`] and addressed by copyable
//! handles. Handles are only ever minted by the heap that owns the slot and
//! slots are never removed, so indexing with a handle cannot go out of bounds.
//!
//! [`Heap::collect`] reclaims whatever the given roots cannot reach. A freed
//! slot is cleared and goes on a free list for the next allocation, so a
//! handle held past a collection that did not root it reads an empty record
//! or, once the slot is reused, an unrelated one.

use std::rc::Rc;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::atom::{Atom, AtomKind};
use crate::signature::Signature;

/// Handle to a [`Record`] in a [`Heap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(u32);

impl RecordId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Handle to a [`Function`] in a [`Heap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FunctionId(u32);

impl FunctionId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Record
// ══════════════════════════════════════════════════════════════════════════════

/// An associative object with an optional parent.
///
/// Keys are unique and iterate in first-insertion order, which keeps both
/// debug output and serialized environments deterministic.
#[derive(Debug, Clone, Default)]
pub struct Record {
    entries: Vec<(Rc<str>, Atom)>,
    index: FxHashMap<Rc<str>, usize>,
    /// Next record consulted by chained lookups.
    pub parent: Option<RecordId>,
    /// Set on records that came straight from bracket syntax.
    pub literal: bool,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty record whose lookups fall back to `parent`.
    pub fn with_parent(parent: RecordId) -> Self {
        Self {
            parent: Some(parent),
            ..Self::default()
        }
    }

    /// An empty bracket-syntax record.
    pub fn literal() -> Self {
        Self {
            literal: true,
            ..Self::default()
        }
    }

    /// Own entry only; never consults the parent.
    pub fn get(&self, name: &str) -> Option<&Atom> {
        self.index.get(name).map(|&i| &self.entries[i].1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Insert or overwrite. An overwritten key keeps its original position.
    pub fn insert(&mut self, name: &str, value: Atom) -> Option<Atom> {
        if let Some(&i) = self.index.get(name) {
            return Some(std::mem::replace(&mut self.entries[i].1, value));
        }
        let key: Rc<str> = Rc::from(name);
        self.index.insert(Rc::clone(&key), self.entries.len());
        self.entries.push((key, value));
        None
    }

    /// Remove an own entry, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<Atom> {
        let i = self.index.remove(name)?;
        let (_, value) = self.entries.remove(i);
        for (_, slot) in self.index.iter_mut() {
            if *slot > i {
                *slot -= 1;
            }
        }
        Some(value)
    }

    /// Own entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Atom)> {
        self.entries.iter().map(|(k, v)| (&**k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Function
// ══════════════════════════════════════════════════════════════════════════════

/// A user-defined closure.
#[derive(Debug, Clone)]
pub struct Function {
    pub signature: Signature,
    pub body: Atom,
    /// Scope active when the closure was created; calls open a child of it.
    /// Reassignable so persisted environments can re-link closures.
    pub scope: RecordId,
}

// ══════════════════════════════════════════════════════════════════════════════
// Heap
// ══════════════════════════════════════════════════════════════════════════════

/// Owner of every record and function reachable from a running program.
#[derive(Debug, Default)]
pub struct Heap {
    records: Vec<Record>,
    functions: Vec<Function>,
    free_records: Vec<RecordId>,
    free_functions: Vec<FunctionId>,
}

/// Slots reclaimed by one [`Heap::collect`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Collected {
    pub records: usize,
    pub functions: usize,
}

impl Heap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc_record(&mut self, record: Record) -> RecordId {
        if let Some(id) = self.free_records.pop() {
            self.records[id.index()] = record;
            return id;
        }
        let id = RecordId(self.records.len() as u32);
        self.records.push(record);
        id
    }

    pub fn alloc_function(&mut self, function: Function) -> FunctionId {
        if let Some(id) = self.free_functions.pop() {
            self.functions[id.index()] = function;
            return id;
        }
        let id = FunctionId(self.functions.len() as u32);
        self.functions.push(function);
        id
    }

    pub fn record(&self, id: RecordId) -> &Record {
        &self.records[id.index()]
    }

    pub fn record_mut(&mut self, id: RecordId) -> &mut Record {
        &mut self.records[id.index()]
    }

    pub fn function(&self, id: FunctionId) -> &Function {
        &self.functions[id.index()]
    }

    pub fn function_mut(&mut self, id: FunctionId) -> &mut Function {
        &mut self.functions[id.index()]
    }

    /// Live records, not counting freed slots.
    pub fn record_count(&self) -> usize {
        self.records.len() - self.free_records.len()
    }

    pub fn function_count(&self) -> usize {
        self.functions.len() - self.free_functions.len()
    }

    // ── Collection ────────────────────────────────────────────────────────

    /// Mark everything reachable from `roots`, then free the rest.
    ///
    /// Marking follows record fields and parents, function scopes and
    /// bodies, and list and member elements, quoted or not, since quoted code
    /// may hold bracket-syntax records.
    pub fn collect(&mut self, roots: &[Atom]) -> Collected {
        let mut live_records = vec![false; self.records.len()];
        let mut live_functions = vec![false; self.functions.len()];
        let mut stack: Vec<Atom> = roots.to_vec();
        while let Some(atom) = stack.pop() {
            match &atom.kind {
                AtomKind::List(items) => stack.extend(items.iter().cloned()),
                AtomKind::Member(member) => {
                    stack.push(member.lhs.clone());
                    stack.push(member.rhs.clone());
                }
                AtomKind::Record(id) => {
                    if std::mem::replace(&mut live_records[id.index()], true) {
                        continue;
                    }
                    let record = &self.records[id.index()];
                    stack.extend(record.parent.map(Atom::record));
                    stack.extend(record.iter().map(|(_, value)| value.clone()));
                }
                AtomKind::Function(id) => {
                    if std::mem::replace(&mut live_functions[id.index()], true) {
                        continue;
                    }
                    let function = &self.functions[id.index()];
                    stack.push(Atom::record(function.scope));
                    stack.push(function.body.clone());
                }
                AtomKind::Nil
                | AtomKind::Integer(_)
                | AtomKind::Decimal(_)
                | AtomKind::String(_)
                | AtomKind::Token(_) => {}
            }
        }

        for id in &self.free_records {
            live_records[id.index()] = true;
        }
        for id in &self.free_functions {
            live_functions[id.index()] = true;
        }

        let mut collected = Collected::default();
        for (i, live) in live_records.into_iter().enumerate() {
            if !live {
                self.records[i] = Record::new();
                self.free_records.push(RecordId(i as u32));
                collected.records += 1;
            }
        }
        for (i, live) in live_functions.into_iter().enumerate() {
            if !live {
                let function = &mut self.functions[i];
                function.signature = Signature::default();
                function.body = Atom::nil();
                self.free_functions.push(FunctionId(i as u32));
                collected.functions += 1;
            }
        }
        collected
    }

    // ── Parent-chain lookup ───────────────────────────────────────────────

    /// `start` followed by its ancestors, each visited at most once.
    pub fn ancestors(&self, start: RecordId) -> Ancestors<'_> {
        Ancestors {
            heap: self,
            next: Some(start),
            visited: FxHashSet::default(),
        }
    }

    /// Resolve `name` on `start` or the nearest ancestor that has it.
    ///
    /// Terminates on cyclic parent chains.
    pub fn lookup(&self, start: RecordId, name: &str) -> Option<&Atom> {
        self.ancestors(start)
            .find_map(|id| self.record(id).get(name))
    }

    /// The nearest record in the chain from `start` that declares `name`.
    pub fn find_declaring(&self, start: RecordId, name: &str) -> Option<RecordId> {
        self.ancestors(start)
            .find(|&id| self.record(id).contains(name))
    }
}

/// Iterator over a parent chain, guarded against cycles.
pub struct Ancestors<'h> {
    heap: &'h Heap,
    next: Option<RecordId>,
    visited: FxHashSet<RecordId>,
}

impl Iterator for Ancestors<'_> {
    type Item = RecordId;

    fn next(&mut self) -> Option<RecordId> {
        let current = self.next.take()?;
        if !self.visited.insert(current) {
            return None;
        }
        self.next = self.heap.record(current).parent;
        Some(current)
    }
}
