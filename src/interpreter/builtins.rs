//! Built-in functions for the Logo interpreter.
//!
//! Math functions work in degrees. List functions never mutate their
//! inputs; they build new lists.

use crate::diagnostics::LogoError;
use crate::parser::ast::{Function, HigherOrder};

use super::environment::Procedure;
use super::value::{values_equal, Value};
use super::Interpreter;

impl Interpreter {
    /// Call a built-in function on evaluated arguments
    pub(crate) fn call_function(
        &mut self,
        function: Function,
        args: Vec<Value>,
    ) -> Result<Value, LogoError> {
        let name = function.name();
        let [first, rest @ ..] = args.as_slice() else {
            return Err(LogoError::arity_mismatch(name, function.arity(), 0));
        };
        if args.len() != function.arity() {
            return Err(LogoError::arity_mismatch(name, function.arity(), args.len()));
        }
        let second = rest.first();
        let number = |value: &Value| value.as_number(name);

        let value = match function {
            Function::Sqrt => {
                let n = number(first)?;
                if n < 0.0 {
                    return Err(domain_error(name, first));
                }
                Value::Number(n.sqrt())
            }
            Function::Sin => Value::Number(number(first)?.to_radians().sin()),
            Function::Cos => Value::Number(number(first)?.to_radians().cos()),
            Function::Tan => Value::Number(number(first)?.to_radians().tan()),
            Function::Arctan => Value::Number(number(first)?.atan().to_degrees()),
            Function::Abs => Value::Number(number(first)?.abs()),
            Function::Round => Value::Number(number(first)?.round()),
            Function::Floor => Value::Number(number(first)?.floor()),
            Function::Ceiling => Value::Number(number(first)?.ceil()),
            Function::Int => Value::Number(number(first)?.trunc()),
            Function::Ln => {
                let n = number(first)?;
                if n <= 0.0 {
                    return Err(domain_error(name, first));
                }
                Value::Number(n.ln())
            }
            Function::Exp => Value::Number(number(first)?.exp()),
            Function::Minus => Value::Number(-number(first)?),
            Function::Random => {
                let n = number(first)?.floor();
                if n < 1.0 {
                    Value::Number(0.0)
                } else {
                    Value::Number(self.rand.int(0, n as i64 - 1) as f64)
                }
            }

            Function::First => first
                .as_list(name)?
                .first()
                .cloned()
                .ok_or_else(|| LogoError::empty_list(name))?,
            Function::Last => first
                .as_list(name)?
                .last()
                .cloned()
                .ok_or_else(|| LogoError::empty_list(name))?,
            Function::ButFirst => {
                let items = first.as_list(name)?;
                Value::List(items.iter().skip(1).cloned().collect())
            }
            Function::ButLast => {
                let items = first.as_list(name)?;
                let keep = items.len().saturating_sub(1);
                Value::List(items[..keep].to_vec())
            }
            Function::Count => Value::Number(first.as_list(name)?.len() as f64),
            Function::EmptyP => Value::bool(first.as_list(name)?.is_empty()),

            // Two inputs
            Function::Power
            | Function::Remainder
            | Function::Item
            | Function::Fput
            | Function::Lput
            | Function::MemberP
            | Function::Position
            | Function::Sentence
            | Function::List => {
                let Some(second) = second else {
                    return Err(LogoError::arity_mismatch(name, 2, 1));
                };
                binary_function(function, first, second)?
            }
        };
        Ok(value)
    }

    /// `MAP`, `FILTER`, `REDUCE` and `APPLY`
    pub(crate) fn call_higher_order(
        &mut self,
        function: HigherOrder,
        procedure: &str,
        list: Value,
    ) -> Result<Value, LogoError> {
        let name = function.name();
        let procedure = self
            .context
            .procedure(procedure)
            .ok_or_else(|| LogoError::undefined_procedure(procedure))?;
        let items = list.into_list(name)?;

        match function {
            HigherOrder::Map => {
                expect_arity(&procedure, 1)?;
                items
                    .into_iter()
                    .map(|item| self.invoke(&procedure, vec![item]))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::List)
            }
            HigherOrder::Filter => {
                expect_arity(&procedure, 1)?;
                let mut kept = Vec::new();
                for item in items {
                    if self
                        .invoke(&procedure, vec![item.clone()])?
                        .is_truthy(name)?
                    {
                        kept.push(item);
                    }
                }
                Ok(Value::List(kept))
            }
            HigherOrder::Reduce => {
                expect_arity(&procedure, 2)?;
                let mut items = items.into_iter();
                let seed = items.next().ok_or_else(|| LogoError::empty_list(name))?;
                items.try_fold(seed, |acc, item| self.invoke(&procedure, vec![acc, item]))
            }
            HigherOrder::Apply => {
                expect_arity(&procedure, items.len())?;
                self.invoke(&procedure, items)
            }
        }
    }
}

fn binary_function(function: Function, first: &Value, second: &Value) -> Result<Value, LogoError> {
    let name = function.name();
    let value = match function {
        Function::Power => Value::Number(first.as_number(name)?.powf(second.as_number(name)?)),
        Function::Remainder => {
            let a = first.as_number(name)?;
            let b = second.as_number(name)?;
            if b == 0.0 {
                return Err(LogoError::division_by_zero());
            }
            Value::Number(a % b)
        }
        Function::Item => {
            let index = first.as_number(name)?;
            let items = second.as_list(name)?;
            if index.fract() != 0.0 || index < 1.0 || index > items.len() as f64 {
                return Err(LogoError::index_out_of_bounds(index, items.len()));
            }
            items[index as usize - 1].clone()
        }
        Function::Fput => {
            let items = second.as_list(name)?;
            let mut list = Vec::with_capacity(items.len() + 1);
            list.push(first.clone());
            list.extend_from_slice(items);
            Value::List(list)
        }
        Function::Lput => {
            let mut list = second.as_list(name)?.to_vec();
            list.push(first.clone());
            Value::List(list)
        }
        Function::MemberP => {
            let items = second.as_list(name)?;
            Value::bool(items.iter().any(|item| values_equal(item, first)))
        }
        Function::Position => {
            let items = second.as_list(name)?;
            let position = items
                .iter()
                .position(|item| values_equal(item, first))
                .map_or(0, |i| i + 1);
            Value::Number(position as f64)
        }
        Function::Sentence => {
            let mut list = flatten_once(first);
            list.extend(flatten_once(second));
            Value::List(list)
        }
        Function::List => Value::List(vec![first.clone(), second.clone()]),
        _ => return Err(LogoError::arity_mismatch(name, function.arity(), 2)),
    };
    Ok(value)
}

/// A list's elements, or a number as a one-element list
fn flatten_once(value: &Value) -> Vec<Value> {
    match value {
        Value::List(items) => items.clone(),
        Value::Number(_) => vec![value.clone()],
    }
}

fn expect_arity(procedure: &Procedure, supplied: usize) -> Result<(), LogoError> {
    if procedure.arity() == supplied {
        Ok(())
    } else {
        Err(LogoError::arity_mismatch(
            &procedure.name,
            procedure.arity(),
            supplied,
        ))
    }
}

fn domain_error(name: &str, input: &Value) -> LogoError {
    LogoError::type_mismatch(name, "a number in its domain", input.to_string())
}

#[cfg(test)]
#[path = "builtins_tests.rs"]
mod tests;
