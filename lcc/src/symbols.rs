use crate::error::Error;
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Scope {
    Global,
    Local,
    Argument,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
pub enum SymbolKind {
    #[strum(to_string = "INTEGER")]
    Scalar,
    #[strum(to_string = "TABLE")]
    Array,
    #[strum(to_string = "FUNCTION")]
    Function,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Symbol {
    pub name: String,
    pub scope: Scope,
    pub kind: SymbolKind,
    /// Word offset: from the data segment for globals, inside the frame otherwise
    pub address: usize,
    /// Array length, or parameter count of a function
    pub extra: usize,
}

pub type Table = IndexMap<String, Symbol>;

/// Global table plus the table of the function being analyzed
#[derive(Debug, Clone)]
pub struct SymbolTable {
    global: Table,
    local: Table,
    scope: Scope,
    global_addr: usize,
    local_addr: usize,
    arg_addr: usize,
    functions: usize,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            global: IndexMap::new(),
            local: IndexMap::new(),
            scope: Scope::Global,
            global_addr: 0,
            local_addr: 0,
            arg_addr: 0,
            functions: 0,
        }
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Switch between argument and local declarations of the current function
    pub fn set_scope(&mut self, scope: Scope) {
        self.scope = scope;
    }

    pub fn enter_function_scope(&mut self) {
        self.scope = Scope::Local;
        self.local = IndexMap::new();
        self.local_addr = 0;
        self.arg_addr = 0;
    }

    /// Leave the function, handing back its finished local table
    pub fn exit_function_scope(&mut self) -> Table {
        self.scope = Scope::Global;
        std::mem::take(&mut self.local)
    }

    pub fn add(&mut self, symbol: Symbol) -> Result<&Symbol, Error> {
        let table = match symbol.scope {
            Scope::Global => &mut self.global,
            Scope::Local | Scope::Argument => &mut self.local,
        };
        if table.contains_key(&symbol.name) {
            return Err(Error::DuplicateSymbol(symbol.name));
        }
        let (idx, _) = table.insert_full(symbol.name.clone(), symbol);
        Ok(&table[idx])
    }

    /// Declare a variable in the active scope at the next free address
    pub fn declare(&mut self, name: &str, kind: SymbolKind, extra: usize) -> Result<&Symbol, Error> {
        let (address, size) = match self.scope {
            Scope::Global => (self.global_addr, if kind == SymbolKind::Array { extra } else { 1 }),
            Scope::Local => (self.local_addr, 1),
            Scope::Argument => (self.arg_addr, 1),
        };
        let symbol = Symbol {
            name: name.to_string(),
            scope: self.scope,
            kind,
            address,
            extra,
        };
        let scope = self.scope;
        self.add(symbol)?;
        match scope {
            Scope::Global => self.global_addr += size,
            Scope::Local => self.local_addr += size,
            Scope::Argument => self.arg_addr += size,
        }
        self.lookup(name).ok_or_else(|| Error::UndefinedSymbol(name.to_string()))
    }

    /// Functions always land in the global table, numbered in declaration order
    pub fn declare_function(&mut self, name: &str, arity: usize) -> Result<&Symbol, Error> {
        let symbol = Symbol {
            name: name.to_string(),
            scope: Scope::Global,
            kind: SymbolKind::Function,
            address: self.functions,
            extra: arity,
        };
        self.add(symbol)?;
        self.functions += 1;
        self.search_global(name).ok_or_else(|| Error::UndefinedSymbol(name.to_string()))
    }

    pub fn search_local(&self, name: &str) -> Option<&Symbol> {
        self.local.get(name)
    }

    pub fn search_global(&self, name: &str) -> Option<&Symbol> {
        self.global.get(name)
    }

    /// Local first, then global
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.search_local(name).or_else(|| self.search_global(name))
    }

    pub fn globals(&self) -> &Table {
        &self.global
    }

    /// Count of local (non-argument) slots of the current function
    pub fn frame_size(&self) -> usize {
        self.local_addr
    }

    pub fn arity(&self) -> usize {
        self.arg_addr
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.name, self.scope, self.kind, self.address, self.extra
        )
    }
}

/// One line per entry: `index name SCOPE KIND address extra`
pub fn print_table(title: &str, table: &Table) -> String {
    let mut out = format!("--- {}\n", title);
    for (idx, symbol) in table.values().enumerate() {
        out.push_str(&format!("{} {}\n", idx, symbol));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_addresses() {
        let mut table = SymbolTable::new();
        assert_eq!(table.declare("x", SymbolKind::Scalar, 0).unwrap().address, 0);
        assert_eq!(table.declare("t", SymbolKind::Array, 10).unwrap().address, 1);
        assert_eq!(table.declare("y", SymbolKind::Scalar, 0).unwrap().address, 11);

        table.enter_function_scope();
        table.set_scope(Scope::Argument);
        assert_eq!(table.declare("a", SymbolKind::Scalar, 0).unwrap().address, 0);
        assert_eq!(table.declare("b", SymbolKind::Scalar, 0).unwrap().address, 1);
        table.set_scope(Scope::Local);
        assert_eq!(table.declare("l", SymbolKind::Scalar, 0).unwrap().address, 0);
        assert_eq!(table.declare_function("f", 2).unwrap().scope, Scope::Global);
        assert_eq!(table.arity(), 2);
        assert_eq!(table.frame_size(), 1);

        let locals = table.exit_function_scope();
        assert_eq!(locals.len(), 3);
        assert_eq!(table.scope(), Scope::Global);
        assert!(table.search_local("a").is_none());
        assert_eq!(table.search_global("f").unwrap().extra, 2);
    }

    #[test]
    fn test_shadowing() {
        let mut table = SymbolTable::new();
        table.declare("x", SymbolKind::Array, 4).unwrap();
        table.enter_function_scope();
        table.declare("x", SymbolKind::Scalar, 0).unwrap();
        assert_eq!(table.lookup("x").unwrap().scope, Scope::Local);
        assert!(matches!(
            table.declare("x", SymbolKind::Scalar, 0),
            Err(Error::DuplicateSymbol(_))
        ));
        table.exit_function_scope();
        assert_eq!(table.lookup("x").unwrap().kind, SymbolKind::Array);

        table.enter_function_scope();
        assert!(table.search_local("x").is_none());
        assert_eq!(table.frame_size(), 0);
    }

    #[test]
    fn test_print() {
        let mut table = SymbolTable::new();
        table.declare("x", SymbolKind::Scalar, 0).unwrap();
        table.declare_function("main", 0).unwrap();
        let text = print_table("global", table.globals());
        println!("{}", text);
        assert_eq!(text, "--- global\n0 x GLOBAL INTEGER 0 0\n1 main GLOBAL FUNCTION 0 0\n");
    }
}
