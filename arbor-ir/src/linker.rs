use std::collections::{BTreeSet, HashMap};
use thiserror::Error;
use crate::ir::{Import, Module, Program};


#[derive(Error, PartialEq, Eq, Debug, Clone)]
pub enum LinkError {
    #[error("module `{module}` imports from `{target}`, which does not exist")]
    MissingImportTarget { module: String, target: String },

    #[error("module `{module}` imports `{function}` from `{target}`, which does not export it")]
    UnexportedImport { module: String, function: String, target: String },
}

/// Resolves imports against the exports of the modules in one program.
pub struct Linker<'a> {
    exports: HashMap<&'a str, &'a BTreeSet<String>>,
}

impl<'a> Linker<'a> {
    pub fn new(program: &'a Program) -> Self {
        let mut exports = HashMap::new();
        for module in &program.modules {
            // first module with a given name wins, like function lookup does
            exports.entry(module.name.as_str()).or_insert(&module.exports);
        }
        Linker { exports }
    }

    fn check_import(&self, module: &Module, import: &Import, errors: &mut Vec<LinkError>) {
        let exports = match self.exports.get(import.module.as_str()) {
            Some(exports) => exports,
            None => {
                errors.push(LinkError::MissingImportTarget {
                    module: module.name.clone(),
                    target: import.module.clone(),
                });
                return;
            }
        };
        for function in &import.functions {
            if !exports.contains(function) {
                errors.push(LinkError::UnexportedImport {
                    module: module.name.clone(),
                    function: function.clone(),
                    target: import.module.clone(),
                });
            }
        }
    }

    /// Check every import of every module, collecting all problems.
    pub fn check(&self, program: &Program) -> Vec<LinkError> {
        let mut errors = Vec::new();
        for module in &program.modules {
            for import in &module.imports {
                self.check_import(module, import, &mut errors);
            }
        }
        errors
    }
}

/// Validate that every import in the program resolves to an existing module
/// and one of its exported functions.
///
/// The program is handed back untouched when it links, so calls can be
/// chained. Otherwise every violation found in the program is returned at
/// once.
pub fn validate(program: Program) -> Result<Program, Vec<LinkError>> {
    let errors = Linker::new(&program).check(&program);
    if errors.is_empty() {
        debug!("program with {} modules links", program.modules.len());
        Ok(program)
    } else {
        debug!("program failed to link with {} errors", errors.len());
        Err(errors)
    }
}
