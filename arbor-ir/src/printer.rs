use std::io::{self, Write};
use crate::ir;

pub fn emit_program<W: Write>(program: &ir::Program, mut out: W) -> io::Result<()> {
    emit_declarations(&program.structs, &program.variables, &program.functions, 0, &mut out)?;
    for module in &program.modules {
        emit_module(module, &mut out)?;
    }
    Ok(())
}

fn emit_module<W: Write>(module: &ir::Module, out: &mut W) -> io::Result<()> {
    writeln!(out, "module {} {{", module.name)?;
    if !module.exports.is_empty() {
        write!(out, "    export ")?;
        emit_names(module.exports.iter(), out)?;
        writeln!(out)?;
    }
    for import in &module.imports {
        write!(out, "    import {} ", import.module)?;
        emit_names(import.functions.iter(), out)?;
        writeln!(out)?;
    }
    emit_declarations(&module.structs, &module.variables, &module.functions, 1, out)?;
    writeln!(out, "}}")
}

fn emit_declarations<W: Write>(
    structs: &[ir::StructDef],
    variables: &[ir::Variable],
    functions: &[ir::Function],
    depth: usize,
    out: &mut W,
) -> io::Result<()> {
    let indent = "    ".repeat(depth);
    for s in structs {
        writeln!(out, "{}struct {} {{", indent, s.name)?;
        for field in &s.fields {
            writeln!(out, "{}    {}: {}", indent, field.name, field.ty)?;
        }
        writeln!(out, "{}}}", indent)?;
    }
    for var in variables {
        write!(out, "{}let {}: {} = ", indent, var.name, var.ty)?;
        emit_expression(&var.value, out)?;
        writeln!(out)?;
    }
    for func in functions {
        write!(out, "{}function {}(", indent, func.name)?;
        let mut first = true;
        for param in &func.params {
            if !first { write!(out, ", ")?; }
            first = false;
            write!(out, "{}: {}", param.name, param.ty)?;
        }
        writeln!(out, "): {} {{", func.return_type)?;
        for statement in &func.body {
            write!(out, "{}    ", indent)?;
            emit_statement(statement, out)?;
            writeln!(out)?;
        }
        writeln!(out, "{}}}", indent)?;
    }
    Ok(())
}

fn emit_statement<W: Write>(s: &ir::Statement, out: &mut W) -> io::Result<()> {
    match *s {
        ir::Statement::Return(ref value) => {
            write!(out, "return ")?;
            emit_expression(value, out)
        }
        ir::Statement::Assign(ref name, ref value) => {
            write!(out, "{} = ", name)?;
            emit_expression(value, out)
        }
        ir::Statement::Call(ref name, ref args) => {
            write!(out, "call {}", name)?;
            emit_args(args, out)
        }
    }
}

fn emit_expression<W: Write>(e: &ir::Expression, out: &mut W) -> io::Result<()> {
    match *e {
        ir::Expression::Var(ref name) => write!(out, "{}", name),
        ir::Expression::Literal(ir::Literal::Int(value)) => write!(out, "{}", value),
        ir::Expression::Literal(ir::Literal::Str(ref value)) => write!(out, "{:?}", value),
        ir::Expression::BinaryOp(op, ref a, ref b) => {
            // fully parenthesized, the dump shows tree shape
            write!(out, "(")?;
            emit_expression(a, out)?;
            write!(out, " {} ", op.symbol())?;
            emit_expression(b, out)?;
            write!(out, ")")
        }
        ir::Expression::Call(ref name, ref args) => {
            write!(out, "{}", name)?;
            emit_args(args, out)
        }
        ir::Expression::StructNew(ref name, ref fields) => {
            write!(out, "{} {{", name)?;
            let mut first = true;
            for &(ref field, ref value) in fields {
                if !first { write!(out, ",")?; }
                first = false;
                write!(out, " {}: ", field)?;
                emit_expression(value, out)?;
            }
            write!(out, " }}")
        }
        ir::Expression::FieldAccess(ref base, ref field) => {
            emit_expression(base, out)?;
            write!(out, ".{}", field)
        }
    }
}

fn emit_args<W: Write>(args: &[ir::Expression], out: &mut W) -> io::Result<()> {
    write!(out, "(")?;
    let mut first = true;
    for arg in args {
        if !first { write!(out, ", ")?; }
        first = false;
        emit_expression(arg, out)?;
    }
    write!(out, ")")
}

fn emit_names<'a, W, I>(names: I, out: &mut W) -> io::Result<()>
    where W: Write,
          I: Iterator<Item = &'a String>,
{
    write!(out, "[")?;
    let mut first = true;
    for name in names {
        if !first { write!(out, ", ")?; }
        first = false;
        write!(out, "{}", name)?;
    }
    write!(out, "]")
}
