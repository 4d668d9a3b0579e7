#[macro_use]
extern crate log;
extern crate arbor_ir;

pub mod c;
mod compiler;
mod printer;

use std::io;
use arbor_ir::Program;

pub use compiler::compile_program;
pub use printer::{print_c, print_prelude};

/// Write the C translation of `program` to `to`.
pub fn emit_to<W: io::Write>(program: &Program, to: W) -> io::Result<()> {
    let unit = compile_program(program);
    print_c(to, &unit)
}

/// Translate `program` to C source text.
///
/// The text is a bare sequence of declarations; no `#include` lines are
/// produced (see [`print_prelude`]).
pub fn emit(program: &Program) -> String {
    let mut out = Vec::new();
    emit_to(program, &mut out).expect("writing to memory failed");
    String::from_utf8_lossy(&out).into_owned()
}
