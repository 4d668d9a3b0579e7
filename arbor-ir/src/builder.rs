//! Functional construction of programs.
//!
//! Every operation consumes a value and returns the extended one, appending
//! the new declaration so that all sequences stay in declaration order. None
//! of the operations fail: duplicate or dangling names are left for the
//! linker and the backends to deal with.

use std::collections::HashSet;
use crate::ir::{Expression, Field, Function, Import, Module, Param, Program, Statement, StructDef,
         Variable};


impl Program {
    /// Create an empty program.
    pub fn new() -> Self {
        Default::default()
    }

    /// Append a global variable.
    pub fn add_variable<N, T>(mut self, name: N, ty: T, value: Expression) -> Self
        where N: Into<String>,
              T: Into<String>,
    {
        self.variables.push(Variable { name: name.into(), ty: ty.into(), value });
        self
    }

    /// Append a top-level function.
    pub fn add_function<N, T>(
        mut self,
        name: N,
        return_type: T,
        params: Vec<Param>,
        body: Vec<Statement>,
    ) -> Self
        where N: Into<String>,
              T: Into<String>,
    {
        self.functions.push(Function {
            name: name.into(),
            return_type: return_type.into(),
            params,
            body,
        });
        self
    }

    /// Append a struct definition.
    pub fn add_struct<N: Into<String>>(mut self, name: N, fields: Vec<Field>) -> Self {
        self.structs.push(StructDef { name: name.into(), fields });
        self
    }

    /// Append a module built from its parts.
    pub fn add_module<N, E, S>(
        self,
        name: N,
        exports: E,
        imports: Vec<Import>,
        variables: Vec<Variable>,
        functions: Vec<Function>,
        structs: Vec<StructDef>,
    ) -> Self
        where N: Into<String>,
              E: IntoIterator<Item = S>,
              S: Into<String>,
    {
        self.add_module_value(Module {
            name: name.into(),
            exports: exports.into_iter().map(Into::into).collect(),
            imports,
            variables,
            functions,
            structs,
        })
    }

    /// Append an already assembled module.
    pub fn add_module_value(mut self, module: Module) -> Self {
        self.modules.push(module);
        self
    }

    /// Find a function by name: top-level functions first, then module
    /// functions in module order.
    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions
            .iter()
            .chain(self.modules.iter().flat_map(|m| m.functions.iter()))
            .find(|f| f.name == name)
    }

    pub fn module(&self, name: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.name == name)
    }

    /// Names of every top-level and module variable. Both live in one flat
    /// namespace.
    pub fn global_names(&self) -> HashSet<&str> {
        self.variables
            .iter()
            .chain(self.modules.iter().flat_map(|m| m.variables.iter()))
            .map(|v| v.name.as_str())
            .collect()
    }
}

/// Concatenate programs field by field, keeping the order of each input and
/// taking the inputs first to last.
pub fn merge<I: IntoIterator<Item = Program>>(programs: I) -> Program {
    let mut merged = Program::new();
    for program in programs {
        merged.variables.extend(program.variables);
        merged.functions.extend(program.functions);
        merged.structs.extend(program.structs);
        merged.modules.extend(program.modules);
    }
    merged
}

impl Module {
    pub fn new<N: Into<String>>(name: N) -> Self {
        Module {
            name: name.into(),
            exports: Default::default(),
            imports: Vec::new(),
            variables: Vec::new(),
            functions: Vec::new(),
            structs: Vec::new(),
        }
    }

    pub fn export<N: Into<String>>(mut self, name: N) -> Self {
        self.exports.insert(name.into());
        self
    }

    pub fn import(mut self, import: Import) -> Self {
        self.imports.push(import);
        self
    }

    pub fn variable<N, T>(mut self, name: N, ty: T, value: Expression) -> Self
        where N: Into<String>,
              T: Into<String>,
    {
        self.variables.push(Variable { name: name.into(), ty: ty.into(), value });
        self
    }

    pub fn function<N, T>(
        mut self,
        name: N,
        return_type: T,
        params: Vec<Param>,
        body: Vec<Statement>,
    ) -> Self
        where N: Into<String>,
              T: Into<String>,
    {
        self.functions.push(Function {
            name: name.into(),
            return_type: return_type.into(),
            params,
            body,
        });
        self
    }

    pub fn structure<N: Into<String>>(mut self, name: N, fields: Vec<Field>) -> Self {
        self.structs.push(StructDef { name: name.into(), fields });
        self
    }
}
