#[macro_use]
extern crate log;
extern crate arbor_ir;

mod format;

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::io::{self, Write};
use arbor_ir::{ir, Program};
use thiserror::Error;


#[derive(Error, Debug)]
pub enum Error {
    #[error("function `{0}` not found")]
    FunctionNotFound(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("cannot apply `{op}` to {left} and {right}")]
    TypeMismatch { op: &'static str, left: &'static str, right: &'static str },

    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Name of the only built-in function.
pub const PRINTF: &str = "printf";

#[derive(PartialEq, Eq, Debug, Clone)]
pub enum Value {
    /// Result of a function that finished without `return`.
    Unit,
    Int(i64),
    Str(String),
    Struct { name: String, fields: BTreeMap<String, Value> },
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match *self {
            Value::Unit => "unit",
            Value::Int(_) => "int",
            Value::Str(_) => "string",
            Value::Struct { .. } => "struct",
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match *self {
            Value::Int(i) => Some(i),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Value {
        Value::Int(i)
    }
}

impl<'a> From<&'a str> for Value {
    fn from(s: &'a str) -> Value {
        Value::Str(s.to_string())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Value::Unit => write!(f, "()"),
            Value::Int(i) => write!(f, "{}", i),
            Value::Str(ref s) => write!(f, "{}", s),
            Value::Struct { ref name, ref fields } => {
                write!(f, "{} {{", name)?;
                let mut first = true;
                for (field, value) in fields {
                    if !first { write!(f, ",")?; }
                    first = false;
                    write!(f, " {}: {}", field, value)?;
                }
                write!(f, " }}")
            }
        }
    }
}

/// Run `entry` with `args`, writing `printf` output to stdout.
pub fn execute(program: &Program, entry: &str, args: &[Value]) -> Result<Value, Error> {
    let stdout = io::stdout();
    execute_with_output(program, entry, args, stdout.lock())
}

/// Run `entry` with `args`, writing `printf` output to `output`.
///
/// Every call gets fresh bindings, so the same program can be executed any
/// number of times, from any number of threads.
pub fn execute_with_output<W: Write>(
    program: &Program,
    entry: &str,
    args: &[Value],
    output: W,
) -> Result<Value, Error> {
    let mut vm = Vm::new(program, output)?;
    let result = vm.run(entry, args.to_vec());
    vm.output.flush()?;
    result
}

/// How a statement finished.
enum Flow {
    Continue,
    Return(Value),
}

struct StackFrame<'a> {
    function: &'a str,
    locals: HashMap<&'a str, Value>,
}

struct Vm<'a, W> {
    output: W,
    functions: HashMap<&'a str, &'a ir::Function>,
    globals: HashMap<&'a str, Value>,
    frames: Vec<StackFrame<'a>>,
}

impl<'a, W: Write> Vm<'a, W> {
    fn new(program: &'a Program, output: W) -> Result<Self, Error> {
        let mut functions = HashMap::new();
        let all_functions = program.functions
            .iter()
            .chain(program.modules.iter().flat_map(|m| m.functions.iter()));
        for f in all_functions {
            // top-level functions shadow module ones, earlier modules shadow later
            functions.entry(f.name.as_str()).or_insert(f);
        }
        let mut vm = Vm {
            output,
            functions,
            globals: HashMap::new(),
            frames: Vec::new(),
        };
        let all_variables = program.variables
            .iter()
            .chain(program.modules.iter().flat_map(|m| m.variables.iter()));
        for var in all_variables {
            let value = vm.eval(&var.value)?;
            vm.globals.insert(var.name.as_str(), value);
        }
        Ok(vm)
    }

    fn run(&mut self, entry: &str, args: Vec<Value>) -> Result<Value, Error> {
        match self.functions.get(entry) {
            Some(&f) => self.call_function(f, args),
            None => Err(Error::FunctionNotFound(entry.to_string())),
        }
    }

    fn call_function(&mut self, f: &'a ir::Function, args: Vec<Value>) -> Result<Value, Error> {
        if args.len() != f.params.len() {
            debug!(
                "`{}` takes {} arguments but got {}",
                f.name,
                f.params.len(),
                args.len(),
            );
        }
        let mut args = args.into_iter();
        let mut locals = HashMap::new();
        for param in &f.params {
            locals.insert(param.name.as_str(), args.next().unwrap_or(Value::Int(0)));
        }
        trace!("entering `{}` at depth {}", f.name, self.frames.len());
        self.frames.push(StackFrame { function: &f.name, locals });
        let result = self.run_body(&f.body);
        self.frames.pop();
        result
    }

    fn run_body(&mut self, body: &'a [ir::Statement]) -> Result<Value, Error> {
        for statement in body {
            if let Flow::Return(value) = self.run_statement(statement)? {
                return Ok(value);
            }
        }
        Ok(Value::Unit)
    }

    fn run_statement(&mut self, s: &'a ir::Statement) -> Result<Flow, Error> {
        match *s {
            ir::Statement::Return(ref e) => Ok(Flow::Return(self.eval(e)?)),
            ir::Statement::Assign(ref name, ref e) => {
                let value = self.eval(e)?;
                self.assign(name, value);
                Ok(Flow::Continue)
            }
            ir::Statement::Call(ref name, ref args) => {
                self.call(name, args)?;
                Ok(Flow::Continue)
            }
        }
    }

    /// Parameters and locals of the running call win, then globals. Any other
    /// name becomes a new local of the running call.
    fn assign(&mut self, name: &'a str, value: Value) {
        if let Some(frame) = self.frames.last_mut() {
            if frame.locals.contains_key(name) || !self.globals.contains_key(name) {
                frame.locals.insert(name, value);
                return;
            }
        }
        self.globals.insert(name, value);
    }

    fn lookup(&self, name: &str) -> Value {
        let local = self.frames.last().and_then(|frame| frame.locals.get(name));
        match local.or_else(|| self.globals.get(name)) {
            Some(value) => value.clone(),
            None => {
                trace!("`{}` is unbound, reading zero", name);
                Value::Int(0)
            }
        }
    }

    fn call(&mut self, name: &str, args: &'a [ir::Expression]) -> Result<Value, Error> {
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.eval(arg)?);
        }
        if name == PRINTF {
            let text = format::printf(&values);
            self.output.write_all(text.as_bytes())?;
            return Ok(Value::Int(text.len() as i64));
        }
        match self.functions.get(name) {
            Some(&f) => self.call_function(f, values),
            None => {
                let caller = self.frames.last().map_or("<init>", |frame| frame.function);
                warn!("`{}` calls undefined function `{}`, using zero", caller, name);
                Ok(Value::Int(0))
            }
        }
    }

    fn eval(&mut self, e: &'a ir::Expression) -> Result<Value, Error> {
        match *e {
            ir::Expression::Var(ref name) => Ok(self.lookup(name)),
            ir::Expression::Literal(ir::Literal::Int(i)) => Ok(Value::Int(i)),
            ir::Expression::Literal(ir::Literal::Str(ref s)) => Ok(Value::Str(s.clone())),
            ir::Expression::BinaryOp(op, ref a, ref b) => {
                let a = self.eval(a)?;
                let b = self.eval(b)?;
                binary_op(op, a, b)
            }
            ir::Expression::Call(ref name, ref args) => self.call(name, args),
            ir::Expression::StructNew(ref name, ref inits) => {
                let mut fields = BTreeMap::new();
                for &(ref field, ref e) in inits {
                    let value = self.eval(e)?;
                    fields.insert(field.clone(), value);
                }
                Ok(Value::Struct { name: name.clone(), fields })
            }
            ir::Expression::FieldAccess(ref base, ref field) => {
                match self.eval(base)? {
                    Value::Struct { mut fields, .. } => {
                        Ok(fields.remove(field).unwrap_or(Value::Int(0)))
                    }
                    _ => Ok(Value::Int(0)),
                }
            }
        }
    }
}

fn binary_op(op: ir::BinaryOp, a: Value, b: Value) -> Result<Value, Error> {
    let (a, b) = match (a, b) {
        (Value::Int(a), Value::Int(b)) => (a, b),
        (a, b) => {
            return Err(Error::TypeMismatch {
                op: op.symbol(),
                left: a.type_name(),
                right: b.type_name(),
            });
        }
    };
    match op {
        ir::BinaryOp::Add => Ok(Value::Int(a.wrapping_add(b))),
        ir::BinaryOp::Sub => Ok(Value::Int(a.wrapping_sub(b))),
        ir::BinaryOp::Mul => Ok(Value::Int(a.wrapping_mul(b))),
        ir::BinaryOp::Div if b == 0 => Err(Error::DivisionByZero),
        // truncates toward zero
        ir::BinaryOp::Div => Ok(Value::Int(a.wrapping_div(b))),
    }
}
