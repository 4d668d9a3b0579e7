//! Programs run through both backends.
//!
//! Every case sticks to what C and the interpreter agree on: integer
//! arithmetic that stays within `int`, calls, structs and `printf` with
//! `%d`/`%s`.

use arbor_ir::ir::{Expression as E, Field, Import, Module, Param, Statement};
use arbor_ir::{merge, Program};


pub struct Case {
    pub name: &'static str,
    pub program: Program,
    pub entry: &'static str,
    pub args: Vec<i64>,
    /// Known result, checked in addition to the two backends agreeing.
    pub expected: Option<i64>,
}

fn int_params(names: &[&str]) -> Vec<Param> {
    names.iter().map(|name| Param::new(*name, "int")).collect()
}

fn math_module() -> Module {
    Module::new("math")
        .export("add")
        .export("multiply")
        .function("add", "int", int_params(&["x", "y"]), vec![
            Statement::ret(E::add(E::var("x"), E::var("y"))),
        ])
        .function("multiply", "int", int_params(&["x", "y"]), vec![
            Statement::ret(E::mul(E::var("x"), E::var("y"))),
        ])
}

fn linked_modules() -> Case {
    let main = Module::new("main")
        .import(Import::new("math", vec!["add", "multiply"]))
        .function("main", "int", vec![], vec![
            Statement::ret(E::call("add", vec![
                E::int(5),
                E::call("multiply", vec![E::int(3), E::int(4)]),
            ])),
        ]);
    Case {
        name: "linked_modules",
        program: Program::new().add_module_value(math_module()).add_module_value(main),
        entry: "main",
        args: vec![],
        expected: Some(17),
    }
}

fn truncating_division() -> Case {
    let program = Program::new().add_function("quotient", "int", int_params(&["a", "b"]), vec![
        Statement::ret(E::div(E::var("a"), E::var("b"))),
    ]);
    Case {
        name: "truncating_division",
        program,
        entry: "quotient",
        args: vec![10, 3],
        expected: Some(3),
    }
}

fn mixed_operators() -> Case {
    // ((a + b) * (a - b)) / (c - (a - b)) - a * b
    let sum = E::add(E::var("a"), E::var("b"));
    let diff = E::sub(E::var("a"), E::var("b"));
    let body = E::sub(
        E::div(E::mul(sum, diff.clone()), E::sub(E::var("c"), diff)),
        E::mul(E::var("a"), E::var("b")),
    );
    let program = Program::new()
        .add_function("mixed", "int", int_params(&["a", "b", "c"]), vec![Statement::ret(body)]);
    Case {
        name: "mixed_operators",
        program,
        entry: "mixed",
        args: vec![9, 4, 10],
        expected: Some(65 / 5 - 36),
    }
}

fn locals_and_globals() -> Case {
    let program = Program::new()
        .add_variable("offset", "int", E::int(7))
        .add_function("accumulate", "int", int_params(&["n"]), vec![
            Statement::assign("acc", E::mul(E::var("n"), E::int(2))),
            Statement::assign("acc", E::add(E::var("acc"), E::var("offset"))),
            Statement::assign("offset", E::int(100)),
            Statement::assign("n", E::sub(E::var("acc"), E::int(1))),
            Statement::ret(E::add(E::var("n"), E::var("offset"))),
        ]);
    Case {
        name: "locals_and_globals",
        program,
        entry: "accumulate",
        args: vec![4],
        expected: Some(114),
    }
}

fn struct_fields() -> Case {
    let program = Program::new()
        .add_struct("Point", vec![Field::new("x", "int"), Field::new("y", "int")])
        .add_variable("origin", "Point", E::struct_new("Point", vec![
            ("x", E::int(1)),
            ("y", E::int(2)),
        ]))
        .add_function("y_plus_origin", "int", vec![], vec![
            // inferred locals are always `int`, so the struct is never stored
            Statement::ret(E::add(
                E::field(E::struct_new("Point", vec![("x", E::int(3)), ("y", E::int(4))]), "y"),
                E::field(E::var("origin"), "x"),
            )),
        ]);
    Case {
        name: "struct_fields",
        program,
        entry: "y_plus_origin",
        args: vec![],
        expected: Some(5),
    }
}

fn printed_output() -> Case {
    let program = Program::new().add_function("main", "int", vec![], vec![
        Statement::call("printf", vec![E::str("%s: %d\n"), E::str("answer"), E::int(42)]),
        Statement::call("printf", vec![E::str("%d%%\n"), E::div(E::int(250), E::int(3))]),
        Statement::ret(E::int(0)),
    ]);
    Case {
        name: "printed_output",
        program,
        entry: "main",
        args: vec![],
        expected: Some(0),
    }
}

fn merged_fragments() -> Case {
    let first = Program::new()
        .add_variable("base", "int", E::int(6))
        .add_function("half", "int", int_params(&["v"]), vec![
            Statement::ret(E::div(E::var("v"), E::int(2))),
        ]);
    let second = Program::new().add_function("compute", "int", vec![], vec![
        Statement::ret(E::call("half", vec![E::mul(E::var("base"), E::int(7))])),
    ]);
    Case {
        name: "merged_fragments",
        program: merge(vec![first, second]),
        entry: "compute",
        args: vec![],
        expected: Some(21),
    }
}

pub fn all() -> Vec<Case> {
    vec![
        linked_modules(),
        truncating_division(),
        mixed_operators(),
        locals_and_globals(),
        struct_fields(),
        printed_output(),
        merged_fragments(),
    ]
}
