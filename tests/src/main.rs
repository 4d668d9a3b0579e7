#![allow(dead_code)]

#[macro_use]
extern crate log;
extern crate arbor_c_backend;
extern crate arbor_interpreter;
extern crate arbor_ir;

mod cases;

use std::io;
use std::path::PathBuf;
use clap::{ArgAction, Parser};
use log::LevelFilter;
use thiserror::Error;
use arbor_interpreter::Value;
use arbor_ir::LinkError;
use cases::Case;


/// Runs every bundled program through the interpreter and through the C
/// emitter plus a system C compiler, and checks that both agree.
#[derive(Parser, Debug)]
#[command(name = "arbor-tests")]
struct Options {
    /// C compiler used to build emitted code
    #[arg(long, env = "CC", default_value = "cc")]
    cc: PathBuf,

    /// Directory for generated sources and binaries, defaults to the system
    /// temp directory
    #[arg(long)]
    work_dir: Option<PathBuf>,

    /// Keep generated sources
    #[arg(long)]
    keep: bool,

    /// Skip the C compiler, only check interpreter results
    #[arg(long)]
    interpret_only: bool,

    /// Increase logging, can be repeated
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Only run cases whose name contains this
    filter: Option<String>,
}

#[derive(Error, Debug)]
enum Error {
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("{0} of {1} cases failed")]
    Failed(usize, usize),
}

#[derive(Debug)]
enum TestResult {
    LinkFail(Vec<LinkError>),
    InterpreterError(arbor_interpreter::Error),
    NotAnInteger(Value),
    UnexpectedValue { expected: i64, got: i64 },
    /// Interpreter result checked, compiled comparison skipped.
    InterpreterOnly(&'static str),
    Toolchain(cc::Error),
    ValueMismatch { interpreted: i64, compiled: i64 },
    OutputMismatch { interpreted: String, compiled: String },
    Ok,
}

/// Exit statuses only keep the low byte.
fn exit_status(value: i64) -> i32 {
    (value & 0xff) as i32
}

/// Cases the harness `main` cannot wrap.
fn interpreter_only_reason(case: &Case) -> Option<&'static str> {
    if case.entry == "main" {
        return None;
    }
    if case.program.function("main").is_some() {
        return Some("program defines its own `main`");
    }
    match case.program.function(case.entry) {
        Some(f) if f.return_type != "int" => Some("entry point does not return `int`"),
        _ => None,
    }
}

/// Emitted source plus, for entry points other than `main`, a `main` that
/// prints the entry point's result.
fn c_source(case: &Case) -> io::Result<String> {
    let mut out = Vec::new();
    arbor_c_backend::print_prelude(&mut out)?;
    arbor_c_backend::emit_to(&case.program, &mut out)?;
    let mut source = String::from_utf8_lossy(&out).into_owned();
    if case.entry != "main" {
        let args = case.args.iter().map(|a| a.to_string()).collect::<Vec<_>>().join(", ");
        source.push_str(&format!(
            "\nint main(void) {{\n    printf(\"%d\\n\", {}({}));\n    return 0;\n}}\n",
            case.entry,
            args,
        ));
    }
    Ok(source)
}

fn run_case(case: &Case, toolchain: Option<&cc::Toolchain>) -> TestResult {
    let program = match arbor_ir::validate(case.program.clone()) {
        Ok(program) => program,
        Err(errors) => return TestResult::LinkFail(errors),
    };
    let args = case.args.iter().map(|&a| Value::Int(a)).collect::<Vec<_>>();
    let mut printed = Vec::new();
    let value = match arbor_interpreter::execute_with_output(&program, case.entry, &args, &mut printed) {
        Ok(Value::Int(value)) => value,
        Ok(other) => return TestResult::NotAnInteger(other),
        Err(e) => return TestResult::InterpreterError(e),
    };
    if let Some(expected) = case.expected {
        if expected != value {
            return TestResult::UnexpectedValue { expected, got: value };
        }
    }
    let toolchain = match toolchain {
        Some(toolchain) => toolchain,
        None => return TestResult::Ok,
    };
    if let Some(reason) = interpreter_only_reason(case) {
        return TestResult::InterpreterOnly(reason);
    }

    let source = match c_source(case) {
        Ok(source) => source,
        Err(e) => return TestResult::Toolchain(cc::Error::Io(e)),
    };
    trace!("{} emitted:\n{}", case.name, source);
    let run = match toolchain.build_and_run(case.name, &source) {
        Ok(run) => run,
        Err(e) => return TestResult::Toolchain(e),
    };
    let interpreted = String::from_utf8_lossy(&printed).into_owned();
    let mut compiled = String::from_utf8_lossy(&run.stdout).into_owned();
    if case.entry == "main" {
        if run.status != exit_status(value) {
            return TestResult::ValueMismatch {
                interpreted: value,
                compiled: i64::from(run.status),
            };
        }
    } else {
        // the harness prints the result on the last line
        let last = compiled.trim_end_matches('\n').rsplit('\n').next().unwrap_or("").to_string();
        match last.parse::<i64>() {
            Ok(result) if result == value => {}
            Ok(result) => {
                return TestResult::ValueMismatch { interpreted: value, compiled: result };
            }
            Err(_) => {
                return TestResult::OutputMismatch { interpreted, compiled };
            }
        }
        let keep = compiled.len().saturating_sub(last.len() + 1);
        compiled.truncate(keep);
    }
    if interpreted != compiled {
        return TestResult::OutputMismatch { interpreted, compiled };
    }
    TestResult::Ok
}

fn run(options: Options) -> Result<(), Error> {
    let toolchain = if options.interpret_only {
        None
    } else {
        let work_dir = options.work_dir.clone().unwrap_or_else(::std::env::temp_dir);
        Some(cc::Toolchain::new(options.cc.clone(), work_dir, options.keep))
    };
    let cases = cases::all()
        .into_iter()
        .filter(|case| match options.filter {
            Some(ref filter) => case.name.contains(filter.as_str()),
            None => true,
        })
        .collect::<Vec<_>>();

    let mut failed = 0;
    for case in &cases {
        let result = run_case(case, toolchain.as_ref());
        match result {
            TestResult::Ok => println!("test {} ... ok", case.name),
            TestResult::InterpreterOnly(reason) => {
                println!("test {} ... ok (interpreter only: {})", case.name, reason);
            }
            _ => {
                failed += 1;
                println!("test {} ... FAIL", case.name);
                println!("{:?}", result);
                let stdout = io::stdout();
                arbor_ir::emit_program(&case.program, stdout.lock())?;
            }
        }
    }
    if failed == 0 {
        Ok(())
    } else {
        Err(Error::Failed(failed, cases.len()))
    }
}

fn main() {
    let options = Options::parse();
    let level = match options.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    simple_logging::log_to_stderr(level);

    if let Err(err) = run(options) {
        eprintln!("error: {}", err);
        ::std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_ir::ir::{Expression as E, Statement};
    use arbor_ir::Program;

    fn case(program: Program, entry: &'static str) -> Case {
        Case { name: "case", program, entry, args: vec![], expected: None }
    }

    fn returning(program: Program, name: &str, ty: &str) -> Program {
        program.add_function(name, ty, vec![], vec![Statement::ret(E::int(1))])
    }

    #[test]
    fn entry_beside_main_is_interpreter_only() {
        let program = returning(returning(Program::new(), "main", "int"), "f", "int");
        assert_eq!(
            interpreter_only_reason(&case(program, "f")),
            Some("program defines its own `main`"),
        );
    }

    #[test]
    fn non_int_entry_is_interpreter_only() {
        let program = returning(Program::new(), "f", "char*");
        assert_eq!(
            interpreter_only_reason(&case(program, "f")),
            Some("entry point does not return `int`"),
        );
    }

    #[test]
    fn int_entry_gets_a_harness() {
        let case = case(returning(Program::new(), "f", "int"), "f");
        assert_eq!(interpreter_only_reason(&case), None);
        let source = c_source(&case).unwrap();
        assert!(source.starts_with("#include <stdio.h>\n"));
        assert!(source.contains("int main(void) {\n    printf(\"%d\\n\", f());\n"));
    }

    #[test]
    fn bundled_cases_are_all_compiled() {
        for case in cases::all() {
            assert_eq!(interpreter_only_reason(&case), None, "{}", case.name);
        }
    }
}
