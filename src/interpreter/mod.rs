//! Interpreter for Logo programs
//!
//! A tree-walking evaluator. Statements return a [`Flow`] so that
//! `OUTPUT` and `STOP` unwind through nested blocks as ordinary values;
//! only procedure calls and the top level consume them. Expressions
//! evaluate to a [`Value`].
//!
//! Errors raised deep inside value operations carry no location; each
//! statement and expression attaches its own span on the way out, so the
//! innermost node that failed is the one reported.

pub mod builtins;
pub mod capabilities;
pub mod environment;
pub mod value;

pub use capabilities::{
    ConsoleCapability, FnConsole, MockConsole, RandCapability, SeededRand, StdoutConsole,
};
pub use environment::{ExecutionContext, Procedure};
pub use value::{values_equal, Value};

use crate::diagnostics::LogoError;
use crate::parser::ast::*;
use crate::parser::{tokenize, Parser};
use crate::stack::ensure_sufficient_stack;
use crate::turtle::{Color, Turtle};

/// How a statement finished
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    /// Continue with the next statement
    Normal,
    /// `OUTPUT`: leave the procedure with a value
    Output(Value),
    /// `STOP`: leave the procedure
    Stop,
}

/// Interpreter for Logo programs
pub struct Interpreter {
    /// Variables, procedures and loop counters
    pub context: ExecutionContext,
    /// The turtle the program draws with
    pub turtle: Turtle,
    console: Box<dyn ConsoleCapability>,
    rand: Box<dyn RandCapability>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// Create an interpreter with a fresh context and turtle, printing
    /// to stdout
    pub fn new() -> Self {
        Self::with_parts(ExecutionContext::new(), Turtle::new())
    }

    /// Create an interpreter over an existing context and turtle
    pub fn with_parts(context: ExecutionContext, turtle: Turtle) -> Self {
        Self {
            context,
            turtle,
            console: Box::new(StdoutConsole),
            rand: Box::new(SeededRand::from_time()),
        }
    }

    /// Send PRINT output to `console`
    pub fn with_console(mut self, console: impl ConsoleCapability + 'static) -> Self {
        self.console = Box::new(console);
        self
    }

    /// Draw RANDOM numbers from `rand`
    pub fn with_rand(mut self, rand: impl RandCapability + 'static) -> Self {
        self.rand = Box::new(rand);
        self
    }

    /// Make RANDOM deterministic
    pub fn with_seed(self, seed: u64) -> Self {
        self.with_rand(SeededRand::new(seed))
    }

    pub fn into_turtle(self) -> Turtle {
        self.turtle
    }

    /// Forget all variables and procedures. The turtle is untouched.
    pub fn reset(&mut self) {
        self.context = ExecutionContext::new();
    }

    /// Parse `source`, resolving calls to procedures defined by earlier
    /// runs as well as ones defined in `source` itself
    pub fn parse(&self, source: &str) -> Result<Program, LogoError> {
        Parser::with_procedures(tokenize(source), self.context.procedure_arities()).parse_program()
    }

    /// Parse and run a program
    pub fn run(&mut self, source: &str) -> Result<(), LogoError> {
        let program = self.parse(source)?;
        self.run_program(&program).map(|_| ())
    }

    /// Parse and run one line of interactive input, returning the value
    /// of its last statement when that statement is a bare expression
    pub fn eval_line(&mut self, source: &str) -> Result<Option<Value>, LogoError> {
        let program = self.parse(source)?;
        self.run_program(&program)
    }

    /// Parse and evaluate a single expression
    pub fn eval_source(&mut self, source: &str) -> Result<Value, LogoError> {
        let expr = Parser::with_procedures(tokenize(source), self.context.procedure_arities())
            .parse_expression()?;
        self.eval_expr(&expr)
    }

    /// Run a parsed program. An `OUTPUT` or `STOP` outside any procedure
    /// ends the program.
    pub fn run_program(&mut self, program: &Program) -> Result<Option<Value>, LogoError> {
        tracing::debug!(statements = program.statements.len(), "running program");

        let mut last = None;
        for stmt in &program.statements {
            let flow = match stmt {
                Stmt::Expression { expr } => {
                    last = Some(self.eval_expr(expr)?);
                    continue;
                }
                _ => self.exec_stmt(stmt)?,
            };
            last = None;
            match flow {
                Flow::Normal => {}
                Flow::Output(value) => {
                    tracing::debug!(%value, "program ended by OUTPUT");
                    break;
                }
                Flow::Stop => {
                    tracing::debug!("program ended by STOP");
                    break;
                }
            }
        }

        tracing::debug!(
            paths = self.turtle.drawing().len(),
            "program finished"
        );
        Ok(last)
    }

    // ----- statements -----

    /// Execute a block, stopping at the first statement that does not
    /// complete normally
    pub fn exec_block(&mut self, block: &[Stmt]) -> Result<Flow, LogoError> {
        for stmt in block {
            match self.exec_stmt(stmt)? {
                Flow::Normal => {}
                flow => return Ok(flow),
            }
        }
        Ok(Flow::Normal)
    }

    /// Execute a statement
    pub fn exec_stmt(&mut self, stmt: &Stmt) -> Result<Flow, LogoError> {
        ensure_sufficient_stack(|| self.exec_stmt_inner(stmt))
            .map_err(|e| e.or_at(stmt.span()))
    }

    fn exec_stmt_inner(&mut self, stmt: &Stmt) -> Result<Flow, LogoError> {
        match stmt {
            Stmt::Command { command, args, .. } => {
                self.exec_command(*command, args)?;
                Ok(Flow::Normal)
            }
            Stmt::Call { name, args, .. } => {
                self.call_procedure(name, args, true)?;
                Ok(Flow::Normal)
            }
            Stmt::Expression { expr } => {
                self.eval_expr(expr)?;
                Ok(Flow::Normal)
            }
            Stmt::Repeat { count, body, .. } => {
                let count = self.eval_number(count, "REPEAT")?;
                let times = if count < 1.0 { 0 } else { count.floor() as usize };

                self.context.push_repcount();
                let result = self.repeat(times, body);
                self.context.pop_repcount();
                result
            }
            Stmt::If { cond, body, .. } => {
                if self.eval_truth(cond, "IF")? {
                    self.exec_block(body)
                } else {
                    Ok(Flow::Normal)
                }
            }
            Stmt::IfElse {
                cond,
                then_body,
                else_body,
                ..
            } => {
                if self.eval_truth(cond, "IFELSE")? {
                    self.exec_block(then_body)
                } else {
                    self.exec_block(else_body)
                }
            }
            Stmt::While { cond, body, .. } => {
                while self.eval_truth(cond, "WHILE")? {
                    match self.exec_block(body)? {
                        Flow::Normal => {}
                        flow => return Ok(flow),
                    }
                }
                Ok(Flow::Normal)
            }
            Stmt::For {
                var,
                start,
                end,
                step,
                body,
                ..
            } => {
                let start = self.eval_number(start, "FOR")?;
                let end = self.eval_number(end, "FOR")?;
                let step = match step {
                    Some(step) => self.eval_number(step, "FOR")?,
                    None if start <= end => 1.0,
                    None => -1.0,
                };
                if step == 0.0 {
                    return Err(LogoError::for_loop_step());
                }

                // The counter is kept here; assigning to the loop
                // variable inside the body does not change the iteration.
                let mut i = start;
                while (step > 0.0 && i <= end) || (step < 0.0 && i >= end) {
                    self.context.set_var(var, Value::Number(i));
                    match self.exec_block(body)? {
                        Flow::Normal => {}
                        flow => return Ok(flow),
                    }
                    i += step;
                }
                Ok(Flow::Normal)
            }
            Stmt::ProcedureDef(def) => {
                tracing::debug!(name = %def.name, params = def.params.len(), "defining procedure");
                self.context.define_procedure(Procedure {
                    name: def.name.clone(),
                    params: def.params.clone(),
                    body: def.body.clone(),
                });
                Ok(Flow::Normal)
            }
            Stmt::Make { name, value, .. } => {
                let value = self.eval_expr(value)?;
                self.context.set_var(name, value);
                Ok(Flow::Normal)
            }
            Stmt::Output { value, .. } => Ok(Flow::Output(self.eval_expr(value)?)),
            Stmt::Stop { .. } => Ok(Flow::Stop),
            Stmt::Print { value, .. } => {
                let value = self.eval_expr(value)?;
                self.console.print(&value);
                Ok(Flow::Normal)
            }
            Stmt::Local { names, .. } => {
                for name in names {
                    self.context.declare_local(name)?;
                }
                Ok(Flow::Normal)
            }
        }
    }

    fn repeat(&mut self, times: usize, body: &[Stmt]) -> Result<Flow, LogoError> {
        for iteration in 1..=times {
            self.context.set_repcount(iteration);
            match self.exec_block(body)? {
                Flow::Normal => {}
                flow => return Ok(flow),
            }
        }
        Ok(Flow::Normal)
    }

    fn exec_command(&mut self, command: Command, args: &[Expr]) -> Result<(), LogoError> {
        let name = command.name();
        if args.len() != command.arity() {
            return Err(LogoError::arity_mismatch(name, command.arity(), args.len()));
        }
        let values = self.eval_args(args)?;
        let number = |i: usize| {
            values[i]
                .as_number(name)
                .map_err(|e| e.or_at(args[i].span()))
        };

        let turtle = &mut self.turtle;
        match command {
            Command::Forward => turtle.forward(number(0)?),
            Command::Backward => turtle.backward(number(0)?),
            Command::Left => turtle.left(number(0)?),
            Command::Right => turtle.right(number(0)?),
            Command::SetHeading => turtle.set_heading(number(0)?),
            Command::SetX => turtle.set_x(number(0)?),
            Command::SetY => turtle.set_y(number(0)?),
            Command::SetXY => turtle.set_xy(number(0)?, number(1)?),
            Command::SetPos => match values[0].as_list(name)? {
                [x, y] => turtle.set_xy(x.as_number(name)?, y.as_number(name)?),
                _ => {
                    return Err(LogoError::type_mismatch(
                        name,
                        "a list of two numbers",
                        values[0].to_string(),
                    )
                    .at(args[0].span()))
                }
            },
            Command::Home => turtle.home(),
            Command::PenUp => turtle.pen_up(),
            Command::PenDown => turtle.pen_down(),
            Command::Clear | Command::ClearScreen => turtle.clear(),
            Command::HideTurtle => turtle.hide(),
            Command::ShowTurtle => turtle.show(),
            Command::SetPenSize => turtle.set_pen_size(number(0)?),
            Command::SetPenColor | Command::SetPenRgb => {
                turtle.set_pen_color(Color::clamped(number(0)?, number(1)?, number(2)?))
            }
            Command::Circle => turtle.circle(number(0)?),
            Command::Square => turtle.square(number(0)?),
            Command::Box => turtle.draw_box(number(0)?, number(1)?),
        }
        Ok(())
    }

    // ----- procedures -----

    /// Call a user procedure by name. `as_command` selects the error
    /// reported when no such procedure exists.
    fn call_procedure(
        &mut self,
        name: &str,
        args: &[Expr],
        as_command: bool,
    ) -> Result<Value, LogoError> {
        let Some(procedure) = self.context.procedure(name) else {
            return Err(if as_command {
                LogoError::unknown_command(name)
            } else {
                LogoError::undefined_procedure(name)
            });
        };
        if args.len() != procedure.arity() {
            return Err(LogoError::arity_mismatch(
                &procedure.name,
                procedure.arity(),
                args.len(),
            ));
        }

        let values = self.eval_args(args)?;
        self.invoke(&procedure, values)
    }

    /// Run a procedure body in a new frame. The procedure's value is
    /// its OUTPUT, or 0 when it stops or finishes without one.
    pub(crate) fn invoke(&mut self, procedure: &Procedure, args: Vec<Value>) -> Result<Value, LogoError> {
        tracing::trace!(
            procedure = %procedure.name,
            depth = self.context.depth(),
            "calling procedure"
        );

        self.context
            .push_frame(procedure.params.iter().cloned().zip(args));
        let result = self.exec_block(&procedure.body);
        self.context.pop_frame();

        match result? {
            Flow::Output(value) => Ok(value),
            Flow::Normal | Flow::Stop => Ok(Value::Number(0.0)),
        }
    }

    // ----- expressions -----

    /// Evaluate an expression
    pub fn eval_expr(&mut self, expr: &Expr) -> Result<Value, LogoError> {
        ensure_sufficient_stack(|| self.eval_expr_inner(expr))
            .map_err(|e| e.or_at(expr.span()))
    }

    fn eval_expr_inner(&mut self, expr: &Expr) -> Result<Value, LogoError> {
        match expr {
            Expr::Number { value, .. } => Ok(Value::Number(*value)),
            Expr::List { items, .. } => Ok(Value::List(self.eval_args(items)?)),
            Expr::Variable { name, .. } => self
                .context
                .get_var(name)
                .cloned()
                .ok_or_else(|| LogoError::undefined_variable(name)),
            Expr::Binary {
                op: BinaryOp::And,
                left,
                right,
                ..
            } => {
                let result = self.eval_truth(left, "AND")? && self.eval_truth(right, "AND")?;
                Ok(Value::bool(result))
            }
            Expr::Binary {
                op: BinaryOp::Or,
                left,
                right,
                ..
            } => {
                let result = self.eval_truth(left, "OR")? || self.eval_truth(right, "OR")?;
                Ok(Value::bool(result))
            }
            Expr::Binary {
                op, left, right, ..
            } => {
                let left = self.eval_expr(left)?;
                let right = self.eval_expr(right)?;
                eval_binary_op(*op, &left, &right)
            }
            Expr::Unary { op, operand, .. } => match op {
                UnaryOp::Neg => Ok(Value::Number(-self.eval_number(operand, "-")?)),
                UnaryOp::Plus => Ok(Value::Number(self.eval_number(operand, "+")?)),
                UnaryOp::Not => Ok(Value::bool(!self.eval_truth(operand, "NOT")?)),
            },
            Expr::FunctionCall { function, args, .. } => {
                let values = self.eval_args(args)?;
                self.call_function(*function, values)
            }
            Expr::HigherOrder {
                function,
                procedure,
                list,
                ..
            } => {
                let list = self.eval_expr(list)?;
                self.call_higher_order(*function, procedure, list)
            }
            Expr::Query { query, .. } => self.eval_query(*query),
            Expr::Call { name, args, .. } => self.call_procedure(name, args, false),
        }
    }

    fn eval_args(&mut self, args: &[Expr]) -> Result<Vec<Value>, LogoError> {
        args.iter().map(|arg| self.eval_expr(arg)).collect()
    }

    fn eval_number(&mut self, expr: &Expr, operation: &str) -> Result<f64, LogoError> {
        self.eval_expr(expr)?
            .as_number(operation)
            .map_err(|e| e.or_at(expr.span()))
    }

    fn eval_truth(&mut self, expr: &Expr, operation: &str) -> Result<bool, LogoError> {
        self.eval_expr(expr)?
            .is_truthy(operation)
            .map_err(|e| e.or_at(expr.span()))
    }

    fn eval_query(&self, query: Query) -> Result<Value, LogoError> {
        let turtle = &self.turtle;
        let value = match query {
            Query::XCor => Value::Number(turtle.x()),
            Query::YCor => Value::Number(turtle.y()),
            Query::Heading => Value::Number(turtle.heading()),
            Query::Pos => Value::List(vec![
                Value::Number(turtle.x()),
                Value::Number(turtle.y()),
            ]),
            Query::PenDownP => Value::bool(turtle.is_pen_down()),
            Query::PenSize => Value::Number(turtle.pen_width()),
            Query::PenColor => {
                let color = turtle.pen_color();
                Value::List(vec![
                    Value::Number(f64::from(color.r)),
                    Value::Number(f64::from(color.g)),
                    Value::Number(f64::from(color.b)),
                ])
            }
            Query::ShownP => Value::bool(turtle.is_visible()),
            Query::RepCount => Value::Number(self.context.repcount()? as f64),
        };
        Ok(value)
    }
}

/// Apply a binary operator to two evaluated operands. The evaluator
/// short-circuits `AND` and `OR` itself before getting here.
fn eval_binary_op(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, LogoError> {
    let numbers = || -> Result<(f64, f64), LogoError> {
        Ok((left.as_number(op.symbol())?, right.as_number(op.symbol())?))
    };

    let value = match op {
        BinaryOp::Eq => Value::bool(values_equal(left, right)),
        BinaryOp::Ne => Value::bool(!values_equal(left, right)),
        BinaryOp::Add => {
            let (a, b) = numbers()?;
            Value::Number(a + b)
        }
        BinaryOp::Sub => {
            let (a, b) = numbers()?;
            Value::Number(a - b)
        }
        BinaryOp::Mul => {
            let (a, b) = numbers()?;
            Value::Number(a * b)
        }
        BinaryOp::Div | BinaryOp::Mod => {
            let (a, b) = numbers()?;
            if b == 0.0 {
                return Err(LogoError::division_by_zero());
            }
            // `%` truncates toward zero, like REMAINDER
            Value::Number(if op == BinaryOp::Div { a / b } else { a % b })
        }
        BinaryOp::Lt => {
            let (a, b) = numbers()?;
            Value::bool(a < b)
        }
        BinaryOp::Le => {
            let (a, b) = numbers()?;
            Value::bool(a <= b)
        }
        BinaryOp::Gt => {
            let (a, b) = numbers()?;
            Value::bool(a > b)
        }
        BinaryOp::Ge => {
            let (a, b) = numbers()?;
            Value::bool(a >= b)
        }
        BinaryOp::And => {
            let (a, b) = numbers()?;
            Value::bool(a != 0.0 && b != 0.0)
        }
        BinaryOp::Or => {
            let (a, b) = numbers()?;
            Value::bool(a != 0.0 || b != 0.0)
        }
    };
    Ok(value)
}

/// Run `source` on `turtle` with a fresh context, printing to stdout.
///
/// On failure the turtle keeps everything drawn before the error.
pub fn run(turtle: &mut Turtle, source: &str) -> Result<(), LogoError> {
    run_with(turtle, source, StdoutConsole)
}

/// Like [`run`], handing every PRINTed value to `console`
pub fn run_with(
    turtle: &mut Turtle,
    source: &str,
    console: impl ConsoleCapability + 'static,
) -> Result<(), LogoError> {
    let mut interpreter =
        Interpreter::with_parts(ExecutionContext::new(), std::mem::take(turtle))
            .with_console(console);
    let result = interpreter.run(source);
    *turtle = interpreter.into_turtle();
    result
}
