//! Execution context for the Logo interpreter.
//!
//! Variables and procedures are looked up case-insensitively. Lookup is
//! dynamically scoped: a miss in the innermost procedure frame keeps
//! searching the callers' frames, outermost last, before the globals.

use std::collections::HashMap;
use std::rc::Rc;

use crate::diagnostics::LogoError;
use crate::parser::ast::Block;

use super::value::Value;

/// A user-defined procedure
#[derive(Debug, Clone, PartialEq)]
pub struct Procedure {
    pub name: String,
    pub params: Vec<String>,
    pub body: Block,
}

impl Procedure {
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

fn key(name: &str) -> String {
    name.to_ascii_uppercase()
}

/// Variables, procedures and loop counters of one interpreter session
#[derive(Debug, Clone, Default)]
pub struct ExecutionContext {
    globals: HashMap<String, Value>,
    procedures: HashMap<String, Rc<Procedure>>,
    /// Stack of procedure frames (top = innermost call)
    frames: Vec<HashMap<String, Value>>,
    /// Active REPEAT counters (top = innermost loop)
    repcounts: Vec<usize>,
}

impl ExecutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a variable, searching frames from innermost to outermost
    /// and then the globals
    pub fn get_var(&self, name: &str) -> Option<&Value> {
        let key = key(name);
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.get(&key))
            .or_else(|| self.globals.get(&key))
    }

    /// `MAKE`: bind in the innermost frame if there is one, else globally
    pub fn set_var(&mut self, name: &str, value: Value) {
        let scope = match self.frames.last_mut() {
            Some(frame) => frame,
            None => &mut self.globals,
        };
        scope.insert(key(name), value);
    }

    /// `LOCAL`: create `name` as 0 in the innermost frame
    pub fn declare_local(&mut self, name: &str) -> Result<(), LogoError> {
        let frame = self
            .frames
            .last_mut()
            .ok_or_else(|| LogoError::context("LOCAL outside a procedure"))?;
        frame.insert(key(name), Value::Number(0.0));
        Ok(())
    }

    /// Push a frame holding the given parameter bindings
    pub fn push_frame(&mut self, bindings: impl IntoIterator<Item = (String, Value)>) {
        self.frames.push(
            bindings
                .into_iter()
                .map(|(name, value)| (key(&name), value))
                .collect(),
        );
    }

    pub fn pop_frame(&mut self) {
        self.frames.pop();
    }

    /// Number of active procedure frames
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Define a procedure, replacing any previous one with the same name
    pub fn define_procedure(&mut self, procedure: Procedure) {
        self.procedures
            .insert(key(&procedure.name), Rc::new(procedure));
    }

    pub fn procedure(&self, name: &str) -> Option<Rc<Procedure>> {
        self.procedures.get(&key(name)).cloned()
    }

    /// Arities of all defined procedures, keyed by upper-cased name
    pub fn procedure_arities(&self) -> HashMap<String, usize> {
        self.procedures
            .iter()
            .map(|(name, procedure)| (name.clone(), procedure.arity()))
            .collect()
    }

    pub fn push_repcount(&mut self) {
        self.repcounts.push(0);
    }

    /// Advance the innermost REPEAT counter to `iteration` (1-based)
    pub fn set_repcount(&mut self, iteration: usize) {
        if let Some(top) = self.repcounts.last_mut() {
            *top = iteration;
        }
    }

    pub fn pop_repcount(&mut self) {
        self.repcounts.pop();
    }

    /// Iteration index of the innermost active REPEAT
    pub fn repcount(&self) -> Result<usize, LogoError> {
        self.repcounts
            .last()
            .copied()
            .ok_or_else(|| LogoError::context("REPCOUNT outside a REPEAT"))
    }
}

#[cfg(test)]
#[path = "environment_tests.rs"]
mod tests;
