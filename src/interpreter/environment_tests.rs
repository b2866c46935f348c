use super::*;
use crate::diagnostics::ErrorKind;

fn num(n: f64) -> Value {
    Value::Number(n)
}

#[test]
fn test_global_variables_are_case_insensitive() {
    let mut ctx = ExecutionContext::new();
    ctx.set_var("Size", num(10.0));
    assert_eq!(ctx.get_var("SIZE"), Some(&num(10.0)));
    assert_eq!(ctx.get_var("size"), Some(&num(10.0)));
    assert_eq!(ctx.get_var("other"), None);
}

#[test]
fn test_make_binds_in_innermost_frame() {
    let mut ctx = ExecutionContext::new();
    ctx.set_var("x", num(1.0));
    ctx.push_frame(vec![]);
    ctx.set_var("x", num(2.0));
    assert_eq!(ctx.get_var("x"), Some(&num(2.0)));
    ctx.pop_frame();
    assert_eq!(ctx.get_var("x"), Some(&num(1.0)));
}

#[test]
fn test_lookup_sees_caller_frames() {
    let mut ctx = ExecutionContext::new();
    ctx.set_var("g", num(0.0));
    ctx.push_frame(vec![("outer".to_string(), num(1.0))]);
    ctx.push_frame(vec![("inner".to_string(), num(2.0))]);

    assert_eq!(ctx.get_var("outer"), Some(&num(1.0)));
    assert_eq!(ctx.get_var("inner"), Some(&num(2.0)));
    assert_eq!(ctx.get_var("g"), Some(&num(0.0)));
    assert_eq!(ctx.depth(), 2);

    ctx.pop_frame();
    assert_eq!(ctx.get_var("inner"), None);
}

#[test]
fn test_inner_frame_shadows_outer() {
    let mut ctx = ExecutionContext::new();
    ctx.push_frame(vec![("n".to_string(), num(1.0))]);
    ctx.push_frame(vec![("N".to_string(), num(2.0))]);
    assert_eq!(ctx.get_var("n"), Some(&num(2.0)));
}

#[test]
fn test_local_requires_a_frame() {
    let mut ctx = ExecutionContext::new();
    let err = ctx.declare_local("tmp").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Context { .. }));

    ctx.set_var("tmp", num(9.0));
    ctx.push_frame(vec![]);
    ctx.declare_local("tmp").unwrap();
    assert_eq!(ctx.get_var("tmp"), Some(&num(0.0)));
    ctx.pop_frame();
    assert_eq!(ctx.get_var("tmp"), Some(&num(9.0)));
}

#[test]
fn test_procedures_last_definition_wins() {
    let mut ctx = ExecutionContext::new();
    ctx.define_procedure(Procedure {
        name: "sq".to_string(),
        params: vec!["x".to_string()],
        body: vec![],
    });
    ctx.define_procedure(Procedure {
        name: "SQ".to_string(),
        params: vec!["a".to_string(), "b".to_string()],
        body: vec![],
    });
    assert_eq!(ctx.procedure("Sq").map(|p| p.arity()), Some(2));
    assert_eq!(ctx.procedure_arities().get("SQ"), Some(&2));
    assert!(ctx.procedure("missing").is_none());
}

#[test]
fn test_repcount_stack() {
    let mut ctx = ExecutionContext::new();
    assert!(ctx.repcount().is_err());

    ctx.push_repcount();
    ctx.set_repcount(3);
    ctx.push_repcount();
    ctx.set_repcount(1);
    assert_eq!(ctx.repcount().unwrap(), 1);
    ctx.pop_repcount();
    assert_eq!(ctx.repcount().unwrap(), 3);
    ctx.pop_repcount();
    assert!(ctx.repcount().is_err());
}
