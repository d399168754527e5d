//! The Scope Table
//!
//! An ordered stack of scope levels over a symbol arena. Level indices are
//! fixed by convention: 0 holds class names, 1 class fields, 2 method
//! names, and 3 upwards method locals, parameters and nested-block
//! variables. Entering a block pushes a level; leaving it clears and pops
//! that level, so block-local names do not outlive the block. The arena
//! itself survives popping: resolved `SymbolId`s on the AST stay valid for
//! the later passes, which receive the arena as a [`SymbolMap`].

use crate::types::{Symbol, SymbolId, SymbolKind, StorageClass, Type};
use std::collections::HashMap;

/// Scope level holding the class names of the program
pub const LEVEL_CLASSES: usize = 0;
/// Scope level holding the fields of every class
pub const LEVEL_FIELDS: usize = 1;
/// Scope level holding the method names of every class
pub const LEVEL_METHODS: usize = 2;
/// First scope level for method parameters and locals
pub const LEVEL_LOCALS: usize = 3;

/// Symbol storage shared by the passes after resolution
#[derive(Debug, Clone, Default)]
pub struct SymbolMap {
    symbols: HashMap<SymbolId, Symbol>,
}

impl SymbolMap {
    /// Look up a symbol; absence here is an upstream bug, so most callers
    /// go through [`SymbolMap::expect`] instead.
    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(&id)
    }

    pub fn get_mut(&mut self, id: SymbolId) -> Option<&mut Symbol> {
        self.symbols.get_mut(&id)
    }

    /// Fetch a symbol that resolution has guaranteed to exist
    pub fn expect(&self, id: SymbolId) -> &Symbol {
        self.symbols
            .get(&id)
            .expect("symbol id survived resolution but is missing from the arena")
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.values()
    }
}

/// A stack of symbol scopes over an arena of symbol data
#[derive(Debug, Clone)]
pub struct ScopeTable {
    levels: Vec<HashMap<String, SymbolId>>,
    symbols: HashMap<SymbolId, Symbol>,
    next_id: SymbolId,
}

impl ScopeTable {
    /// Create a table with the three fixed base levels (classes, fields,
    /// methods) already in place
    pub fn new() -> Self {
        Self {
            levels: vec![HashMap::new(), HashMap::new(), HashMap::new()],
            symbols: HashMap::new(),
            next_id: 0,
        }
    }

    /// Index of the innermost level
    pub fn current_level(&self) -> usize {
        self.levels.len() - 1
    }

    /// Enter a nested scope
    pub fn push_level(&mut self) {
        self.levels.push(HashMap::new());
    }

    /// Leave the innermost scope. The level is cleared before removal;
    /// the base levels are never popped.
    pub fn pop_level(&mut self) {
        if self.levels.len() > LEVEL_LOCALS {
            if let Some(level) = self.levels.last_mut() {
                level.clear();
            }
            self.levels.pop();
        }
    }

    /// Insert a symbol into the innermost level.
    ///
    /// Returns `None` when the identifier already occupies that level; the
    /// caller reports this as a declaration error and continues.
    pub fn insert(
        &mut self,
        name: &str,
        ty: Type,
        kind: SymbolKind,
        storage: StorageClass,
    ) -> Option<SymbolId> {
        self.insert_at(self.current_level(), name, ty, kind, storage)
    }

    /// Insert a symbol into a specific level (used for the fixed class /
    /// field / method levels while the traversal sits deeper).
    pub fn insert_at(
        &mut self,
        level: usize,
        name: &str,
        ty: Type,
        kind: SymbolKind,
        storage: StorageClass,
    ) -> Option<SymbolId> {
        let scope = &mut self.levels[level];
        if scope.contains_key(name) {
            return None;
        }

        let id = self.next_id;
        self.next_id += 1;
        scope.insert(name.to_string(), id);
        self.symbols.insert(
            id,
            Symbol::new(id, name.to_string(), ty)
                .with_kind(kind)
                .with_storage(storage),
        );
        Some(id)
    }

    /// Look up an identifier at one specific level
    pub fn lookup(&self, name: &str, level: usize) -> Option<&Symbol> {
        let id = self.levels.get(level)?.get(name)?;
        self.symbols.get(id)
    }

    /// Look up an identifier in the local levels, innermost first,
    /// falling back to the class-field level
    pub fn lookup_variable(&self, name: &str) -> Option<&Symbol> {
        for level in (LEVEL_LOCALS..self.levels.len()).rev() {
            if let Some(sym) = self.lookup(name, level) {
                return Some(sym);
            }
        }
        self.lookup(name, LEVEL_FIELDS)
    }

    pub fn symbol(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(&id)
    }

    pub fn symbol_mut(&mut self, id: SymbolId) -> Option<&mut Symbol> {
        self.symbols.get_mut(&id)
    }

    /// Hand the accumulated symbol data to the downstream passes
    pub fn into_symbols(self) -> SymbolMap {
        SymbolMap {
            symbols: self.symbols,
        }
    }
}

impl Default for ScopeTable {
    fn default() -> Self {
        Self::new()
    }
}
