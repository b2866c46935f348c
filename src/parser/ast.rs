//! Abstract Syntax Tree definitions for Logo
//!
//! Statements and expressions are separate closed enums so the executor
//! and the evaluator each match exhaustively over their own node kinds.
//! Every node records the source span it was parsed from. Built-in
//! commands, functions and queries are resolved to typed enums at parse
//! time; only user procedures are referred to by name.

use serde::Serialize;

use crate::diagnostics::Span;

/// A parsed program
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

/// A bracketed statement block
pub type Block = Vec<Stmt>;

/// Statements
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Stmt {
    /// Built-in turtle command: `FORWARD 10`
    Command {
        span: Span,
        command: Command,
        args: Vec<Expr>,
    },
    /// User procedure used as a command; its result is discarded
    Call {
        span: Span,
        name: String,
        args: Vec<Expr>,
    },
    /// Function or query in command position, evaluated for its value
    Expression { expr: Expr },
    /// `REPEAT count [body]`
    Repeat { span: Span, count: Expr, body: Block },
    /// `IF cond [body]`
    If { span: Span, cond: Expr, body: Block },
    /// `IFELSE cond [then] [else]`
    IfElse {
        span: Span,
        cond: Expr,
        then_body: Block,
        else_body: Block,
    },
    /// `WHILE cond [body]`
    While { span: Span, cond: Expr, body: Block },
    /// `FOR [var start end step?] [body]`
    For {
        span: Span,
        var: String,
        start: Expr,
        end: Expr,
        step: Option<Expr>,
        body: Block,
    },
    /// `TO name :param ... END`
    ProcedureDef(ProcedureDef),
    /// `MAKE "name value`
    Make { span: Span, name: String, value: Expr },
    /// `OUTPUT value`
    Output { span: Span, value: Expr },
    /// `STOP`
    Stop { span: Span },
    /// `PRINT value`
    Print { span: Span, value: Expr },
    /// `LOCAL "name` or `LOCAL [names]`
    Local { span: Span, names: Vec<String> },
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Command { span, .. }
            | Stmt::Call { span, .. }
            | Stmt::Repeat { span, .. }
            | Stmt::If { span, .. }
            | Stmt::IfElse { span, .. }
            | Stmt::While { span, .. }
            | Stmt::For { span, .. }
            | Stmt::Make { span, .. }
            | Stmt::Output { span, .. }
            | Stmt::Stop { span }
            | Stmt::Print { span, .. }
            | Stmt::Local { span, .. } => *span,
            Stmt::Expression { expr } => expr.span(),
            Stmt::ProcedureDef(def) => def.span,
        }
    }
}

/// Procedure definition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcedureDef {
    pub span: Span,
    pub name: String,
    pub params: Vec<String>,
    pub body: Block,
}

/// Expressions
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Expr {
    Number {
        span: Span,
        value: f64,
    },
    /// `[1 2 [3 4]]`
    List {
        span: Span,
        items: Vec<Expr>,
    },
    /// `:name`
    Variable {
        span: Span,
        name: String,
    },
    Binary {
        span: Span,
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        span: Span,
        op: UnaryOp,
        operand: Box<Expr>,
    },
    /// Built-in math or list function
    FunctionCall {
        span: Span,
        function: Function,
        args: Vec<Expr>,
    },
    /// `MAP name list`; the procedure name is not evaluated
    HigherOrder {
        span: Span,
        function: HigherOrder,
        procedure: String,
        list: Box<Expr>,
    },
    /// Zero-input turtle/interpreter state query
    Query {
        span: Span,
        query: Query,
    },
    /// User procedure used for its value
    Call {
        span: Span,
        name: String,
        args: Vec<Expr>,
    },
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Number { span, .. }
            | Expr::List { span, .. }
            | Expr::Variable { span, .. }
            | Expr::Binary { span, .. }
            | Expr::Unary { span, .. }
            | Expr::FunctionCall { span, .. }
            | Expr::HigherOrder { span, .. }
            | Expr::Query { span, .. }
            | Expr::Call { span, .. } => *span,
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "MOD",
            BinaryOp::Eq => "=",
            BinaryOp::Ne => "<>",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "AND",
            BinaryOp::Or => "OR",
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnaryOp {
    Neg,
    Plus,
    Not,
}

/// Built-in turtle commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Command {
    PenUp,
    PenDown,
    Home,
    Clear,
    ClearScreen,
    HideTurtle,
    ShowTurtle,
    Forward,
    Backward,
    Left,
    Right,
    SetHeading,
    SetX,
    SetY,
    SetPenSize,
    SetPos,
    Circle,
    Square,
    SetXY,
    Box,
    SetPenColor,
    SetPenRgb,
}

impl Command {
    /// Resolve a command word, ignoring case
    pub fn from_name(name: &str) -> Option<Self> {
        let command = match name.to_ascii_uppercase().as_str() {
            "PENUP" | "PU" => Command::PenUp,
            "PENDOWN" | "PD" => Command::PenDown,
            "HOME" => Command::Home,
            "CLEAR" => Command::Clear,
            "CLEARSCREEN" | "CS" => Command::ClearScreen,
            "HIDETURTLE" | "HT" => Command::HideTurtle,
            "SHOWTURTLE" | "ST" => Command::ShowTurtle,
            "FORWARD" | "FD" => Command::Forward,
            "BACKWARD" | "BK" | "BACK" => Command::Backward,
            "LEFT" | "LT" => Command::Left,
            "RIGHT" | "RT" => Command::Right,
            "SETHEADING" | "SETH" => Command::SetHeading,
            "SETX" => Command::SetX,
            "SETY" => Command::SetY,
            "PENSIZE" | "SETPENSIZE" => Command::SetPenSize,
            "SETPOS" => Command::SetPos,
            "CIRCLE" => Command::Circle,
            "SQUARE" => Command::Square,
            "SETXY" => Command::SetXY,
            "BOX" => Command::Box,
            "SETPENCOLOR" | "SETPC" => Command::SetPenColor,
            "SETPENRGB" => Command::SetPenRgb,
            _ => return None,
        };
        Some(command)
    }

    /// Number of inputs the command consumes
    pub fn arity(&self) -> usize {
        match self {
            Command::PenUp
            | Command::PenDown
            | Command::Home
            | Command::Clear
            | Command::ClearScreen
            | Command::HideTurtle
            | Command::ShowTurtle => 0,
            Command::Forward
            | Command::Backward
            | Command::Left
            | Command::Right
            | Command::SetHeading
            | Command::SetX
            | Command::SetY
            | Command::SetPenSize
            | Command::SetPos
            | Command::Circle
            | Command::Square => 1,
            Command::SetXY | Command::Box => 2,
            Command::SetPenColor | Command::SetPenRgb => 3,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::PenUp => "PENUP",
            Command::PenDown => "PENDOWN",
            Command::Home => "HOME",
            Command::Clear => "CLEAR",
            Command::ClearScreen => "CLEARSCREEN",
            Command::HideTurtle => "HIDETURTLE",
            Command::ShowTurtle => "SHOWTURTLE",
            Command::Forward => "FORWARD",
            Command::Backward => "BACKWARD",
            Command::Left => "LEFT",
            Command::Right => "RIGHT",
            Command::SetHeading => "SETHEADING",
            Command::SetX => "SETX",
            Command::SetY => "SETY",
            Command::SetPenSize => "SETPENSIZE",
            Command::SetPos => "SETPOS",
            Command::Circle => "CIRCLE",
            Command::Square => "SQUARE",
            Command::SetXY => "SETXY",
            Command::Box => "BOX",
            Command::SetPenColor => "SETPENCOLOR",
            Command::SetPenRgb => "SETPENRGB",
        }
    }
}

/// Built-in functions taking one or two evaluated inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Function {
    // Math, one input
    Sqrt,
    Sin,
    Cos,
    Tan,
    Arctan,
    Abs,
    Round,
    Floor,
    Ceiling,
    Int,
    Ln,
    Exp,
    Minus,
    Random,
    // Lists, one input
    First,
    Last,
    ButFirst,
    ButLast,
    Count,
    EmptyP,
    // Two inputs
    Power,
    Remainder,
    Item,
    Fput,
    Lput,
    MemberP,
    Position,
    Sentence,
    List,
}

impl Function {
    /// Resolve a function word, ignoring case
    pub fn from_name(name: &str) -> Option<Self> {
        let function = match name.to_ascii_uppercase().as_str() {
            "SQRT" => Function::Sqrt,
            "SIN" => Function::Sin,
            "COS" => Function::Cos,
            "TAN" => Function::Tan,
            "ARCTAN" => Function::Arctan,
            "ABS" => Function::Abs,
            "ROUND" => Function::Round,
            "FLOOR" => Function::Floor,
            "CEILING" => Function::Ceiling,
            "INT" => Function::Int,
            "LN" => Function::Ln,
            "EXP" => Function::Exp,
            "MINUS" => Function::Minus,
            "RANDOM" => Function::Random,
            "FIRST" => Function::First,
            "LAST" => Function::Last,
            "BUTFIRST" | "BF" => Function::ButFirst,
            "BUTLAST" | "BL" => Function::ButLast,
            "COUNT" => Function::Count,
            "EMPTY?" | "EMPTYP" => Function::EmptyP,
            "POWER" | "POW" => Function::Power,
            "REMAINDER" => Function::Remainder,
            "ITEM" => Function::Item,
            "FPUT" => Function::Fput,
            "LPUT" => Function::Lput,
            "MEMBER?" | "MEMBERP" => Function::MemberP,
            "POSITION" => Function::Position,
            "SENTENCE" | "SE" => Function::Sentence,
            "LIST" => Function::List,
            _ => return None,
        };
        Some(function)
    }

    pub fn arity(&self) -> usize {
        match self {
            Function::Power
            | Function::Remainder
            | Function::Item
            | Function::Fput
            | Function::Lput
            | Function::MemberP
            | Function::Position
            | Function::Sentence
            | Function::List => 2,
            _ => 1,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Function::Sqrt => "SQRT",
            Function::Sin => "SIN",
            Function::Cos => "COS",
            Function::Tan => "TAN",
            Function::Arctan => "ARCTAN",
            Function::Abs => "ABS",
            Function::Round => "ROUND",
            Function::Floor => "FLOOR",
            Function::Ceiling => "CEILING",
            Function::Int => "INT",
            Function::Ln => "LN",
            Function::Exp => "EXP",
            Function::Minus => "MINUS",
            Function::Random => "RANDOM",
            Function::First => "FIRST",
            Function::Last => "LAST",
            Function::ButFirst => "BUTFIRST",
            Function::ButLast => "BUTLAST",
            Function::Count => "COUNT",
            Function::EmptyP => "EMPTY?",
            Function::Power => "POWER",
            Function::Remainder => "REMAINDER",
            Function::Item => "ITEM",
            Function::Fput => "FPUT",
            Function::Lput => "LPUT",
            Function::MemberP => "MEMBER?",
            Function::Position => "POSITION",
            Function::Sentence => "SENTENCE",
            Function::List => "LIST",
        }
    }
}

/// Higher-order list functions taking a procedure name and a list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HigherOrder {
    Map,
    Filter,
    Reduce,
    Apply,
}

impl HigherOrder {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "MAP" => Some(HigherOrder::Map),
            "FILTER" => Some(HigherOrder::Filter),
            "REDUCE" => Some(HigherOrder::Reduce),
            "APPLY" => Some(HigherOrder::Apply),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            HigherOrder::Map => "MAP",
            HigherOrder::Filter => "FILTER",
            HigherOrder::Reduce => "REDUCE",
            HigherOrder::Apply => "APPLY",
        }
    }
}

/// Zero-input state queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Query {
    XCor,
    YCor,
    Heading,
    Pos,
    PenDownP,
    PenSize,
    PenColor,
    ShownP,
    RepCount,
}

impl Query {
    pub fn from_name(name: &str) -> Option<Self> {
        let query = match name.to_ascii_uppercase().as_str() {
            "XCOR" => Query::XCor,
            "YCOR" => Query::YCor,
            "HEADING" => Query::Heading,
            "POS" => Query::Pos,
            "PENDOWN?" | "PENDOWNP" => Query::PenDownP,
            "PENSIZE" => Query::PenSize,
            "PENCOLOR" => Query::PenColor,
            "SHOWN?" | "SHOWNP" => Query::ShownP,
            "REPCOUNT" => Query::RepCount,
            _ => return None,
        };
        Some(query)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Query::XCor => "XCOR",
            Query::YCor => "YCOR",
            Query::Heading => "HEADING",
            Query::Pos => "POS",
            Query::PenDownP => "PENDOWN?",
            Query::PenSize => "PENSIZE",
            Query::PenColor => "PENCOLOR",
            Query::ShownP => "SHOWN?",
            Query::RepCount => "REPCOUNT",
        }
    }
}

/// Statement keywords, matched case-insensitively
pub const KEYWORDS: &[&str] = &[
    "TO", "END", "REPEAT", "IF", "IFELSE", "MAKE", "OUTPUT", "OP", "STOP", "PRINT", "PR", "WHILE",
    "FOR", "LOCAL",
];

/// Whether `word` is a statement keyword
pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.iter().any(|k| k.eq_ignore_ascii_case(word))
}

/// Whether `word` names any built-in command, function or query
pub fn is_builtin(word: &str) -> bool {
    Command::from_name(word).is_some()
        || Function::from_name(word).is_some()
        || HigherOrder::from_name(word).is_some()
        || Query::from_name(word).is_some()
}
