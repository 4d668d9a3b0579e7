use std::io;
use std::io::prelude::*;
use arbor_ir::ir::BinaryOp;
use crate::c;

/// Headers needed by the `printf` built-in. The emitter itself never writes
/// them, callers that compile the output prepend this.
pub fn print_prelude<W: Write>(mut to: W) -> io::Result<()> {
    const PRELUDE: &str = "#include <stdio.h>\n";
    writeln!(to, "{}", PRELUDE)
}

/// Separates top level items with exactly one blank line.
struct Printer<W> {
    to: W,
    started: bool,
    attached: bool,
}

impl<W: Write> Printer<W> {
    fn new(to: W) -> Self {
        Printer { to, started: false, attached: false }
    }

    fn item(&mut self) -> io::Result<()> {
        if self.started && !self.attached {
            writeln!(self.to)?;
        }
        self.started = true;
        self.attached = false;
        Ok(())
    }

    /// The next item follows the label without a blank line.
    fn label(&mut self, label: &str) -> io::Result<()> {
        self.item()?;
        writeln!(self.to, "// module {}", label)?;
        self.attached = true;
        Ok(())
    }

    fn print_unit(&mut self, unit: &c::Unit) -> io::Result<()> {
        if !unit.prototypes.is_empty() {
            self.item()?;
            for signature in &unit.prototypes {
                print_signature(&mut self.to, signature)?;
                writeln!(self.to, ";")?;
            }
        }
        for block in &unit.blocks {
            self.print_block(block)?;
        }
        Ok(())
    }

    fn print_block(&mut self, block: &c::Block) -> io::Result<()> {
        if let Some(ref label) = block.label {
            self.label(label)?;
        }
        for s in &block.structs {
            self.item()?;
            print_struct(&mut self.to, s)?;
        }
        if !block.globals.is_empty() {
            self.item()?;
            for global in &block.globals {
                print_global(&mut self.to, global)?;
            }
        }
        for f in &block.functions {
            self.item()?;
            print_function(&mut self.to, f)?;
        }
        self.attached = false;
        Ok(())
    }
}

pub fn print_c<W: Write>(to: W, unit: &c::Unit) -> io::Result<()> {
    Printer::new(to).print_unit(unit)
}

fn print_struct<W: Write>(to: &mut W, s: &c::Struct) -> io::Result<()> {
    writeln!(to, "typedef struct {} {{", s.name)?;
    for &(ref ty, ref name) in &s.fields {
        writeln!(to, "    {} {};", ty, name)?;
    }
    writeln!(to, "}} {};", s.name)
}

fn print_global<W: Write>(to: &mut W, global: &c::Global) -> io::Result<()> {
    write!(to, "{} {} = ", global.ty, global.name)?;
    match global.init {
        c::Initializer::Expr(ref e) => print_expr(to, e)?,
        c::Initializer::Designated(ref fields) => print_designated(to, fields)?,
    }
    writeln!(to, ";")
}

fn print_signature<W: Write>(to: &mut W, signature: &c::Signature) -> io::Result<()> {
    write!(to, "{} {}(", signature.return_type, signature.name)?;
    if signature.params.is_empty() {
        write!(to, "void")?;
    }
    let mut first = true;
    for &(ref ty, ref name) in &signature.params {
        if !first { write!(to, ", ")?; }
        first = false;
        write!(to, "{} {}", ty, name)?;
    }
    write!(to, ")")
}

fn print_function<W: Write>(to: &mut W, f: &c::Function) -> io::Result<()> {
    print_signature(to, &f.signature)?;
    writeln!(to, " {{")?;
    for local in &f.locals {
        writeln!(to, "    {} {};", c::LOCAL_TYPE, local)?;
    }
    for stmt in &f.body {
        write!(to, "    ")?;
        print_stmt(to, stmt)?;
        writeln!(to)?;
    }
    writeln!(to, "}}")
}

fn print_stmt<W: Write>(to: &mut W, stmt: &c::Stmt) -> io::Result<()> {
    match *stmt {
        c::Stmt::Return(ref e) => {
            write!(to, "return ")?;
            print_expr(to, e)?;
        }
        c::Stmt::Assign(ref name, ref e) => {
            write!(to, "{} = ", name)?;
            print_expr(to, e)?;
        }
        c::Stmt::Expr(ref e) => print_expr(to, e)?,
    }
    write!(to, ";")
}

#[derive(PartialEq, Eq, Copy, Clone)]
enum Side {
    Left,
    Right,
}

/// Whether `child` needs parentheses to keep its shape as an operand of
/// `parent`. Both operators are left associative.
fn needs_parens(parent: BinaryOp, child: &c::Expr, side: Side) -> bool {
    match *child {
        c::Expr::Binary(op, _, _) => {
            op.precedence() < parent.precedence() ||
                (side == Side::Right && op.precedence() == parent.precedence())
        }
        _ => false,
    }
}

fn print_operand<W: Write>(to: &mut W, parent: BinaryOp, e: &c::Expr, side: Side) -> io::Result<()> {
    if needs_parens(parent, e, side) {
        write!(to, "(")?;
        print_expr(to, e)?;
        write!(to, ")")
    } else {
        print_expr(to, e)
    }
}

fn print_expr<W: Write>(to: &mut W, e: &c::Expr) -> io::Result<()> {
    match *e {
        c::Expr::Ident(ref name) => write!(to, "{}", name),
        c::Expr::Int(value) => write!(to, "{}", value),
        c::Expr::Str(ref s) => print_string(to, s),
        c::Expr::Binary(op, ref a, ref b) => {
            print_operand(to, op, a, Side::Left)?;
            write!(to, " {} ", op.symbol())?;
            print_operand(to, op, b, Side::Right)
        }
        c::Expr::Call(ref name, ref args) => {
            write!(to, "{}(", name)?;
            let mut first = true;
            for arg in args {
                if !first { write!(to, ", ")?; }
                first = false;
                print_expr(to, arg)?;
            }
            write!(to, ")")
        }
        c::Expr::CompoundLiteral(ref name, ref fields) => {
            write!(to, "({})", name)?;
            print_designated(to, fields)
        }
        c::Expr::Member(ref base, ref field) => {
            if let c::Expr::Binary(..) = **base {
                write!(to, "(")?;
                print_expr(to, base)?;
                write!(to, ")")?;
            } else {
                print_expr(to, base)?;
            }
            write!(to, ".{}", field)
        }
    }
}

fn print_designated<W: Write>(to: &mut W, fields: &[(String, c::Expr)]) -> io::Result<()> {
    write!(to, "{{")?;
    let mut first = true;
    for &(ref name, ref value) in fields {
        if !first { write!(to, ", ")?; }
        first = false;
        write!(to, ".{} = ", name)?;
        print_expr(to, value)?;
    }
    write!(to, "}}")
}

fn print_string<W: Write>(to: &mut W, s: &str) -> io::Result<()> {
    write!(to, "\"")?;
    for &byte in s.as_bytes() {
        match byte {
            b'"' => write!(to, "\\\"")?,
            b'\\' => write!(to, "\\\\")?,
            b'\n' => write!(to, "\\n")?,
            b'\t' => write!(to, "\\t")?,
            b'\r' => write!(to, "\\r")?,
            32..=126 => write!(to, "{}", byte as char)?,
            // three digit octal escape
            _ => write!(to, "\\{:03o}", byte)?,
        }
    }
    write!(to, "\"")
}
