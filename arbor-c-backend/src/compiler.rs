use std::collections::HashSet;
use arbor_ir::ir::{Expression, Function, Literal, Module, Program, Statement, StructDef, Variable};
use crate::c;


struct Compiler<'a> {
    /// Every program and module variable; assigning to one of these never
    /// introduces a local.
    globals: HashSet<&'a str>,
}

impl<'a> Compiler<'a> {
    fn new(program: &'a Program) -> Self {
        Compiler {
            globals: program.global_names(),
        }
    }

    fn compile_block(
        &self,
        label: Option<&str>,
        structs: &[StructDef],
        variables: &[Variable],
        functions: &[Function],
    ) -> c::Block {
        c::Block {
            label: label.map(String::from),
            structs: structs.iter().map(compile_struct).collect(),
            globals: variables.iter().map(compile_global).collect(),
            functions: functions.iter().map(|f| self.compile_function(f)).collect(),
        }
    }

    fn compile_module(&self, module: &Module) -> c::Block {
        trace!("compiling module {}", module.name);
        self.compile_block(
            Some(&module.name),
            &module.structs,
            &module.variables,
            &module.functions,
        )
    }

    fn compile_function(&self, f: &Function) -> c::Function {
        c::Function {
            signature: signature(f),
            locals: self.infer_locals(f),
            body: f.body.iter().map(compile_statement).collect(),
        }
    }

    /// Names assigned in the body that are neither parameters nor globals, in
    /// order of first assignment.
    fn infer_locals(&self, f: &Function) -> Vec<String> {
        let params = f.params.iter().map(|p| p.name.as_str()).collect::<HashSet<_>>();
        let mut seen = HashSet::new();
        let mut locals = Vec::new();
        for statement in &f.body {
            if let Statement::Assign(ref name, _) = *statement {
                let name = name.as_str();
                if params.contains(name) || self.globals.contains(name) {
                    continue;
                }
                if seen.insert(name) {
                    locals.push(name.to_string());
                }
            }
        }
        locals
    }
}

fn signature(f: &Function) -> c::Signature {
    c::Signature {
        return_type: f.return_type.clone(),
        name: f.name.clone(),
        params: f.params.iter().map(|p| (p.ty.clone(), p.name.clone())).collect(),
    }
}

fn compile_struct(s: &StructDef) -> c::Struct {
    c::Struct {
        name: s.name.clone(),
        fields: s.fields.iter().map(|f| (f.ty.clone(), f.name.clone())).collect(),
    }
}

fn compile_global(v: &Variable) -> c::Global {
    let init = match v.value {
        Expression::StructNew(_, ref fields) => c::Initializer::Designated(compile_fields(fields)),
        ref value => c::Initializer::Expr(compile_expression(value)),
    };
    c::Global {
        ty: v.ty.clone(),
        name: v.name.clone(),
        init,
    }
}

fn compile_statement(s: &Statement) -> c::Stmt {
    match *s {
        Statement::Return(ref value) => c::Stmt::Return(compile_expression(value)),
        Statement::Assign(ref name, ref value) => {
            c::Stmt::Assign(name.clone(), compile_expression(value))
        }
        Statement::Call(ref name, ref args) => {
            c::Stmt::Expr(c::Expr::Call(name.clone(), compile_args(args)))
        }
    }
}

fn compile_expression(e: &Expression) -> c::Expr {
    match *e {
        Expression::Var(ref name) => c::Expr::Ident(name.clone()),
        Expression::Literal(Literal::Int(value)) => c::Expr::Int(value),
        Expression::Literal(Literal::Str(ref value)) => c::Expr::Str(value.clone()),
        Expression::BinaryOp(op, ref a, ref b) => {
            c::Expr::Binary(op, Box::new(compile_expression(a)), Box::new(compile_expression(b)))
        }
        Expression::Call(ref name, ref args) => c::Expr::Call(name.clone(), compile_args(args)),
        Expression::StructNew(ref name, ref fields) => {
            c::Expr::CompoundLiteral(name.clone(), compile_fields(fields))
        }
        Expression::FieldAccess(ref base, ref field) => {
            c::Expr::Member(Box::new(compile_expression(base)), field.clone())
        }
    }
}

fn compile_args(args: &[Expression]) -> Vec<c::Expr> {
    args.iter().map(compile_expression).collect()
}

fn compile_fields(fields: &[(String, Expression)]) -> Vec<(String, c::Expr)> {
    fields.iter().map(|&(ref name, ref value)| (name.clone(), compile_expression(value))).collect()
}

/// Lower a program to a C translation unit.
///
/// Without modules the unit is a single unlabelled block. With modules,
/// every exported function gets a prototype up front so that modules can
/// call each other regardless of their order, top-level declarations come
/// next, and each module follows as its own labelled block.
pub fn compile_program(program: &Program) -> c::Unit {
    let compiler = Compiler::new(program);
    let top_level = compiler.compile_block(
        None,
        &program.structs,
        &program.variables,
        &program.functions,
    );
    if program.modules.is_empty() {
        return c::Unit {
            prototypes: Vec::new(),
            blocks: vec![top_level],
        };
    }

    let mut prototypes = Vec::new();
    for module in &program.modules {
        for f in &module.functions {
            if module.exports.contains(&f.name) {
                prototypes.push(signature(f));
            }
        }
    }
    let mut blocks = Vec::new();
    if !top_level.structs.is_empty() || !top_level.globals.is_empty() ||
        !top_level.functions.is_empty()
    {
        blocks.push(top_level);
    }
    blocks.extend(program.modules.iter().map(|m| compiler.compile_module(m)));
    debug!("compiled {} prototypes and {} blocks", prototypes.len(), blocks.len());
    c::Unit { prototypes, blocks }
}
