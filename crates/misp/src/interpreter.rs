//! The host-facing interpreter.

use std::path::Path;

use misp_eval::{register_core, serialize, Evaluator, Registry};
use misp_parser::Parser;
use misp_stdlib::Pack;
use misp_types::{emit, Atom, EvalResult, Heap, RecordId, SourceFile};

use crate::config::InterpreterConfig;
use crate::error::MispError;

/// A MISP environment: builtins, heap and global scope.
///
/// Setup registers the core builtins followed by each pack in order. All
/// evaluation entry points run in the global scope; `load` replaces that
/// scope with a persisted one.
///
/// Each top-level evaluation ends with a heap collection rooted at the global
/// scope, the evaluated atom and its result. Records and functions held by the
/// host outside the global scope stay valid until the next evaluation.
pub struct Interpreter {
    evaluator: Evaluator,
    global: RecordId,
    config: InterpreterConfig,
}

impl Interpreter {
    /// Core builtins plus the full standard library, default configuration.
    pub fn new() -> Result<Self, MispError> {
        Self::with_config(InterpreterConfig::default())
    }

    /// Core builtins plus the full standard library.
    pub fn with_config(config: InterpreterConfig) -> Result<Self, MispError> {
        Self::with_packs(config, misp_stdlib::PACKS)
    }

    /// Core builtins plus exactly `packs`, installed in the given order.
    pub fn with_packs(config: InterpreterConfig, packs: &[Pack]) -> Result<Self, MispError> {
        let mut registry = Registry::new();
        register_core(&mut registry)?;
        for pack in packs {
            pack(&mut registry)?;
        }
        tracing::debug!(
            builtins = registry.len(),
            packs = packs.len(),
            "interpreter setup complete"
        );

        let mut evaluator = Evaluator::new(registry);
        evaluator.gas_limit = config.gas_limit;
        let global = evaluator.active_scope();
        let mut interpreter = Self {
            evaluator,
            global,
            config,
        };
        interpreter.bind_self();
        Ok(interpreter)
    }

    fn bind_self(&mut self) {
        if let Some(name) = &self.config.self_binding {
            self.evaluator
                .heap
                .record_mut(self.global)
                .insert(name, Atom::record(self.global));
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    /// The current global scope.
    pub fn global(&self) -> RecordId {
        self.global
    }

    pub fn heap(&self) -> &Heap {
        &self.evaluator.heap
    }

    pub fn heap_mut(&mut self) -> &mut Heap {
        &mut self.evaluator.heap
    }

    /// Look up a global variable.
    pub fn get_global(&self, name: &str) -> Option<&Atom> {
        self.evaluator.heap.record(self.global).get(name)
    }

    /// Define or overwrite a global variable.
    pub fn set_global(&mut self, name: &str, value: Atom) {
        self.evaluator
            .heap
            .record_mut(self.global)
            .insert(name, value);
    }

    // ── Entry points ──────────────────────────────────────────────────────

    /// Parse anonymous source text.
    pub fn parse(&mut self, source: &str) -> Result<Atom, MispError> {
        self.parse_file(&SourceFile::anonymous(source))
    }

    /// Parse a named source; errors carry the name.
    pub fn parse_file(&mut self, file: &SourceFile) -> Result<Atom, MispError> {
        Ok(Parser::new(file, &mut self.evaluator.heap).parse()?)
    }

    /// Evaluate an atom in the global scope.
    ///
    /// The gas budget, if any, applies to this call alone.
    pub fn eval(&mut self, atom: &Atom) -> Result<Atom, MispError> {
        self.evaluator.gas = 0;
        let result = self.evaluator.eval_in(atom, self.global);
        match &result {
            Ok(value) => self.collect(&[atom.clone(), value.clone()]),
            Err(_) => self.collect(&[atom.clone()]),
        }
        Ok(result?)
    }

    /// Parse and evaluate.
    pub fn run(&mut self, source: &str) -> Result<Atom, MispError> {
        let atom = self.parse(source)?;
        self.eval(&atom)
    }

    /// Human-readable text for an atom.
    pub fn emit(&self, atom: &Atom) -> String {
        emit(atom, &self.evaluator.heap)
    }

    /// Add a host builtin.
    pub fn register<F>(&mut self, declaration: &str, implementation: F) -> Result<(), MispError>
    where
        F: Fn(&mut Evaluator, Vec<Atom>) -> EvalResult<Atom> + 'static,
    {
        Ok(self
            .evaluator
            .registry_mut()
            .register(declaration, implementation)?)
    }

    /// One line per builtin: its name and formal parameters.
    pub fn builtin_listing(&self) -> String {
        self.evaluator.registry().listing()
    }

    // ── Persistence ───────────────────────────────────────────────────────

    /// The global scope as a loadable program.
    pub fn serialize_global(&self) -> Result<String, MispError> {
        Ok(serialize(&self.evaluator.heap, self.global)?)
    }

    /// Evaluate a persisted environment and adopt the record it produces as
    /// the global scope.
    pub fn load(&mut self, source: &str) -> Result<RecordId, MispError> {
        self.load_file(&SourceFile::anonymous(source))
    }

    #[tracing::instrument(level = "debug", skip_all, fields(file = %file.name))]
    fn load_file(&mut self, file: &SourceFile) -> Result<RecordId, MispError> {
        let atom = self.parse_file(file)?;
        let result = self.eval(&atom)?;
        let Some(record) = result.as_record() else {
            return Err(MispError::NotARecord(result.type_name()));
        };
        self.global = record;
        self.evaluator.set_active_scope(record);
        self.bind_self();
        self.collect(&[]);
        tracing::debug!(
            fields = self.evaluator.heap.record(record).len(),
            "adopted loaded global scope"
        );
        Ok(record)
    }

    /// Free everything unreachable from the global scope, the active scope
    /// and `extra`.
    fn collect(&mut self, extra: &[Atom]) {
        let mut roots = vec![
            Atom::record(self.global),
            Atom::record(self.evaluator.active_scope()),
        ];
        roots.extend_from_slice(extra);
        let collected = self.evaluator.heap.collect(&roots);
        tracing::trace!(
            records = collected.records,
            functions = collected.functions,
            live_records = self.evaluator.heap.record_count(),
            "heap collected"
        );
    }

    /// Write [`Interpreter::serialize_global`] to a file.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), MispError> {
        let path = path.as_ref();
        let text = self.serialize_global()?;
        std::fs::write(path, text).map_err(|source| MispError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    /// Read a file and [`Interpreter::load`] it.
    pub fn load_from(&mut self, path: impl AsRef<Path>) -> Result<RecordId, MispError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| MispError::Io {
            path: path.display().to_string(),
            source,
        })?;
        self.load_file(&SourceFile::new(path.display().to_string(), text))
    }
}
