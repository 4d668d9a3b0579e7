use arbor_ir::ir::BinaryOp;

/// Type given to every inferred local variable.
pub const LOCAL_TYPE: &str = "int";

#[derive(PartialEq, Eq, Debug, Clone, Default)]
pub struct Unit {
    pub prototypes: Vec<Signature>,
    pub blocks: Vec<Block>,
}

/// Declarations printed together, structs first, then globals, then
/// functions. Module blocks carry the module name as label.
#[derive(PartialEq, Eq, Debug, Clone, Default)]
pub struct Block {
    pub label: Option<String>,
    pub structs: Vec<Struct>,
    pub globals: Vec<Global>,
    pub functions: Vec<Function>,
}

#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Struct {
    pub name: String,
    /// `(type, name)` pairs
    pub fields: Vec<(String, String)>,
}

#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Global {
    pub ty: String,
    pub name: String,
    pub init: Initializer,
}

#[derive(PartialEq, Eq, Debug, Clone)]
pub enum Initializer {
    Expr(Expr),
    /// `{.a = x, .b = y}`
    Designated(Vec<(String, Expr)>),
}

#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Signature {
    pub return_type: String,
    pub name: String,
    /// `(type, name)` pairs
    pub params: Vec<(String, String)>,
}

#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Function {
    pub signature: Signature,
    pub locals: Vec<String>,
    pub body: Vec<Stmt>,
}

#[derive(PartialEq, Eq, Debug, Clone)]
pub enum Stmt {
    Return(Expr),
    Assign(String, Expr),
    Expr(Expr),
}

#[derive(PartialEq, Eq, Debug, Clone)]
pub enum Expr {
    Ident(String),
    Int(i64),
    Str(String),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Call(String, Vec<Expr>),
    /// `(Type){.a = x, .b = y}`
    CompoundLiteral(String, Vec<(String, Expr)>),
    Member(Box<Expr>, String),
}
