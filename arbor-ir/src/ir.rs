use std::collections::BTreeSet;


#[derive(PartialEq, Eq, Debug, Clone, Default)]
pub struct Program {
    pub variables: Vec<Variable>,
    pub functions: Vec<Function>,
    pub structs: Vec<StructDef>,
    pub modules: Vec<Module>,
}

#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Variable {
    pub name: String,
    /// Carried through verbatim, never checked.
    pub ty: String,
    pub value: Expression,
}

#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Function {
    pub name: String,
    pub return_type: String,
    pub params: Vec<Param>,
    pub body: Vec<Statement>,
}

#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Param {
    pub name: String,
    pub ty: String,
}

#[derive(PartialEq, Eq, Debug, Clone)]
pub struct StructDef {
    pub name: String,
    pub fields: Vec<Field>,
}

#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Field {
    pub name: String,
    pub ty: String,
}

/// A named unit of a program.
///
/// Every name in `exports` is expected to be one of the module's own
/// functions. This is not enforced when the module is built.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Module {
    pub name: String,
    pub exports: BTreeSet<String>,
    pub imports: Vec<Import>,
    pub variables: Vec<Variable>,
    pub functions: Vec<Function>,
    pub structs: Vec<StructDef>,
}

#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Import {
    pub module: String,
    pub functions: BTreeSet<String>,
}

#[derive(PartialEq, Eq, Debug, Clone)]
pub enum Statement {
    /// `return expr`
    Return(Expression),
    /// `name = expr`
    Assign(String, Expression),
    /// `name(arg1, arg2, ...)`, result is discarded
    Call(String, Vec<Expression>),
}

#[derive(PartialEq, Eq, Debug, Clone)]
pub enum Expression {
    Var(String),
    Literal(Literal),
    BinaryOp(BinaryOp, Box<Expression>, Box<Expression>),
    Call(String, Vec<Expression>),
    /// `Name { field: expr, ... }`, fields in initializer order
    StructNew(String, Vec<(String, Expression)>),
    FieldAccess(Box<Expression>, String),
}

#[derive(PartialEq, Eq, Debug, Clone)]
pub enum Literal {
    Int(i64),
    Str(String),
}

#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
        }
    }

    /// Binding strength, higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Add | BinaryOp::Sub => 1,
            BinaryOp::Mul | BinaryOp::Div => 2,
        }
    }
}

impl Param {
    pub fn new<N: Into<String>, T: Into<String>>(name: N, ty: T) -> Self {
        Param { name: name.into(), ty: ty.into() }
    }
}

impl Field {
    pub fn new<N: Into<String>, T: Into<String>>(name: N, ty: T) -> Self {
        Field { name: name.into(), ty: ty.into() }
    }
}

impl Import {
    pub fn new<M, I, F>(module: M, functions: I) -> Self
        where M: Into<String>,
              I: IntoIterator<Item = F>,
              F: Into<String>,
    {
        Import {
            module: module.into(),
            functions: functions.into_iter().map(Into::into).collect(),
        }
    }
}

impl Statement {
    pub fn ret(value: Expression) -> Self {
        Statement::Return(value)
    }

    pub fn assign<N: Into<String>>(name: N, value: Expression) -> Self {
        Statement::Assign(name.into(), value)
    }

    pub fn call<N: Into<String>>(name: N, args: Vec<Expression>) -> Self {
        Statement::Call(name.into(), args)
    }
}

impl Expression {
    pub fn int(value: i64) -> Self {
        Expression::Literal(Literal::Int(value))
    }

    pub fn str<S: Into<String>>(value: S) -> Self {
        Expression::Literal(Literal::Str(value.into()))
    }

    pub fn var<N: Into<String>>(name: N) -> Self {
        Expression::Var(name.into())
    }

    pub fn binary(op: BinaryOp, left: Expression, right: Expression) -> Self {
        Expression::BinaryOp(op, Box::new(left), Box::new(right))
    }

    pub fn add(left: Expression, right: Expression) -> Self {
        Expression::binary(BinaryOp::Add, left, right)
    }

    pub fn sub(left: Expression, right: Expression) -> Self {
        Expression::binary(BinaryOp::Sub, left, right)
    }

    pub fn mul(left: Expression, right: Expression) -> Self {
        Expression::binary(BinaryOp::Mul, left, right)
    }

    pub fn div(left: Expression, right: Expression) -> Self {
        Expression::binary(BinaryOp::Div, left, right)
    }

    pub fn call<N: Into<String>>(name: N, args: Vec<Expression>) -> Self {
        Expression::Call(name.into(), args)
    }

    pub fn struct_new<N, F>(name: N, fields: Vec<(F, Expression)>) -> Self
        where N: Into<String>,
              F: Into<String>,
    {
        let fields = fields.into_iter().map(|(f, e)| (f.into(), e)).collect();
        Expression::StructNew(name.into(), fields)
    }

    pub fn field<F: Into<String>>(base: Expression, field: F) -> Self {
        Expression::FieldAccess(Box::new(base), field.into())
    }
}
