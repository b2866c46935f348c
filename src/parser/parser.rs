//! Recursive descent parser for Logo
//!
//! Statements are dispatched on their first word. Expressions use
//! precedence climbing, lowest to highest:
//! `OR`, `AND`, prefix `NOT`, one comparison, `+ -`, `* / MOD`, prefix
//! `+ -`, primary.
//!
//! Logo has no argument delimiters, so the parser must know how many
//! inputs every command, function and procedure takes. Built-in arities
//! live in [`crate::parser::ast`]; procedure arities are collected from
//! every `TO` line before parsing starts, which lets a procedure be
//! called above its definition or from its own body.

use std::collections::HashMap;

use crate::diagnostics::{LogoError, Span};
use crate::parser::ast::*;
use crate::parser::lexer::{Token, TokenKind};
use crate::stack::ensure_sufficient_stack;

/// Parser for a Logo token stream
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Known procedure arities, keyed by upper-cased name
    procedures: HashMap<String, usize>,
}

impl Parser {
    /// Create a new parser
    pub fn new(tokens: Vec<Token>) -> Self {
        Self::with_procedures(tokens, HashMap::new())
    }

    /// Create a parser that already knows some procedures, e.g. ones
    /// defined by earlier input in the same session
    pub fn with_procedures(mut tokens: Vec<Token>, procedures: HashMap<String, usize>) -> Self {
        if tokens.last().map_or(true, |t| t.kind != TokenKind::Eof) {
            let end = tokens.last().map_or(0, |t| t.span.end);
            tokens.push(Token::new(TokenKind::Eof, "", Span::new(end, end)));
        }

        let mut parser = Self {
            tokens,
            pos: 0,
            procedures: procedures
                .into_iter()
                .map(|(name, arity)| (name.to_ascii_uppercase(), arity))
                .collect(),
        };
        parser.collect_procedure_arities();
        parser
    }

    /// Procedure arities known to the parser
    pub fn procedures(&self) -> &HashMap<String, usize> {
        &self.procedures
    }

    /// Parse a complete program
    pub fn parse_program(&mut self) -> Result<Program, LogoError> {
        let mut statements = Vec::new();
        while !self.is_eof() {
            statements.push(self.parse_stmt()?);
        }
        tracing::trace!(statements = statements.len(), "parsed program");
        Ok(Program { statements })
    }

    /// Parse input that must consist of exactly one expression
    pub fn parse_expression(&mut self) -> Result<Expr, LogoError> {
        let expr = self.parse_expr()?;
        if !self.is_eof() {
            return Err(self.error_unexpected("end of input"));
        }
        Ok(expr)
    }

    fn collect_procedure_arities(&mut self) {
        let mut found: HashMap<String, usize> = HashMap::new();
        for (i, token) in self.tokens.iter().enumerate() {
            if !token.is_word("TO") {
                continue;
            }
            let Some(TokenKind::Word(name)) = self.tokens.get(i + 1).map(|t| &t.kind) else {
                continue;
            };
            let params = self.tokens[i + 2..]
                .chunks(2)
                .take_while(|pair| {
                    matches!(
                        pair,
                        [Token { kind: TokenKind::Colon, .. }, Token { kind: TokenKind::Word(_), .. }]
                    )
                })
                .count();
            found.entry(name.to_ascii_uppercase()).or_insert(params);
        }
        self.procedures.extend(found);
    }

    // ----- statements -----

    fn parse_stmt(&mut self) -> Result<Stmt, LogoError> {
        ensure_sufficient_stack(|| self.parse_stmt_inner())
    }

    fn parse_stmt_inner(&mut self) -> Result<Stmt, LogoError> {
        let token = self.peek().clone();
        let TokenKind::Word(word) = &token.kind else {
            return Err(self.error_unexpected("command"));
        };
        let start = token.span;

        match word.to_ascii_uppercase().as_str() {
            "TO" => return self.parse_procedure_def().map(Stmt::ProcedureDef),
            "END" => return Err(self.error_unexpected("command")),
            "REPEAT" => {
                self.advance();
                let count = self.parse_expr()?;
                let body = self.parse_block()?;
                return Ok(Stmt::Repeat {
                    span: self.span_from(start),
                    count,
                    body,
                });
            }
            "IF" => {
                self.advance();
                let cond = self.parse_expr()?;
                let body = self.parse_block()?;
                return Ok(Stmt::If {
                    span: self.span_from(start),
                    cond,
                    body,
                });
            }
            "IFELSE" => {
                self.advance();
                let cond = self.parse_expr()?;
                let then_body = self.parse_block()?;
                let else_body = self.parse_block()?;
                return Ok(Stmt::IfElse {
                    span: self.span_from(start),
                    cond,
                    then_body,
                    else_body,
                });
            }
            "WHILE" => {
                self.advance();
                let cond = self.parse_expr()?;
                let body = self.parse_block()?;
                return Ok(Stmt::While {
                    span: self.span_from(start),
                    cond,
                    body,
                });
            }
            "FOR" => return self.parse_for(start),
            "MAKE" => {
                self.advance();
                self.expect(TokenKind::Quote, "`\"` before variable name")?;
                let name = self.expect_word("variable name")?;
                let value = self.parse_expr()?;
                return Ok(Stmt::Make {
                    span: self.span_from(start),
                    name,
                    value,
                });
            }
            "OUTPUT" | "OP" => {
                self.advance();
                let value = self.parse_input("OUTPUT")?;
                return Ok(Stmt::Output {
                    span: self.span_from(start),
                    value,
                });
            }
            "STOP" => {
                self.advance();
                return Ok(Stmt::Stop { span: start });
            }
            "PRINT" | "PR" => {
                self.advance();
                let value = self.parse_input("PRINT")?;
                return Ok(Stmt::Print {
                    span: self.span_from(start),
                    value,
                });
            }
            "LOCAL" => return self.parse_local(start),
            _ => {}
        }

        if let Some(command) = Command::from_name(word) {
            self.advance();
            let mut args = Vec::with_capacity(command.arity());
            for _ in 0..command.arity() {
                args.push(self.parse_input(command.name())?);
            }
            return Ok(Stmt::Command {
                span: self.span_from(start),
                command,
                args,
            });
        }

        if Function::from_name(word).is_some()
            || HigherOrder::from_name(word).is_some()
            || Query::from_name(word).is_some()
        {
            let expr = self.parse_expr()?;
            return Ok(Stmt::Expression { expr });
        }

        // Unknown words still collect their inputs; whether the procedure
        // exists is decided when the statement runs.
        let arity = self.procedures.get(&word.to_ascii_uppercase()).copied();
        let name = word.clone();
        self.advance();
        let args = self.parse_call_args(arity)?;
        Ok(Stmt::Call {
            span: self.span_from(start),
            name,
            args,
        })
    }

    fn parse_procedure_def(&mut self) -> Result<ProcedureDef, LogoError> {
        let start = self.advance().span;

        let name_token = self.advance();
        let name = match &name_token.kind {
            TokenKind::Word(w) if !is_keyword(w) && !is_builtin(w) => w.clone(),
            _ => {
                return Err(LogoError::parse(
                    "procedure name",
                    name_token.to_string(),
                    name_token.span,
                ))
            }
        };

        let mut params: Vec<String> = Vec::new();
        while self.check(&TokenKind::Colon) {
            self.advance();
            let param_token = self.advance();
            let TokenKind::Word(param) = &param_token.kind else {
                return Err(LogoError::parse(
                    "parameter name",
                    param_token.to_string(),
                    param_token.span,
                ));
            };
            if params.iter().any(|p| p.eq_ignore_ascii_case(param)) {
                return Err(LogoError::parse(
                    "distinct parameter name",
                    param_token.to_string(),
                    param_token.span,
                ));
            }
            params.push(param.clone());
        }
        self.procedures
            .insert(name.to_ascii_uppercase(), params.len());

        let mut body = Vec::new();
        while !self.peek().is_word("END") {
            if self.is_eof() {
                return Err(self.error_unexpected("END"));
            }
            body.push(self.parse_stmt()?);
        }
        self.advance();

        Ok(ProcedureDef {
            span: self.span_from(start),
            name,
            params,
            body,
        })
    }

    fn parse_for(&mut self, start: Span) -> Result<Stmt, LogoError> {
        self.advance();
        self.expect(TokenKind::LBracket, "`[`")?;
        if self.check(&TokenKind::Quote) {
            self.advance();
        }
        let var = self.expect_word("loop variable")?;
        let from = self.parse_input("FOR")?;
        let to = self.parse_input("FOR")?;
        let step = if self.check(&TokenKind::RBracket) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(TokenKind::RBracket, "`]`")?;
        let body = self.parse_block()?;

        Ok(Stmt::For {
            span: self.span_from(start),
            var,
            start: from,
            end: to,
            step,
            body,
        })
    }

    fn parse_local(&mut self, start: Span) -> Result<Stmt, LogoError> {
        self.advance();
        let mut names = Vec::new();
        if self.check(&TokenKind::LBracket) {
            self.advance();
            while !self.check(&TokenKind::RBracket) {
                if self.check(&TokenKind::Quote) {
                    self.advance();
                }
                names.push(self.expect_word("variable name")?);
            }
            self.advance();
        } else {
            self.expect(TokenKind::Quote, "`\"` or `[` after LOCAL")?;
            names.push(self.expect_word("variable name")?);
            while self.check(&TokenKind::Quote) {
                self.advance();
                names.push(self.expect_word("variable name")?);
            }
        }

        Ok(Stmt::Local {
            span: self.span_from(start),
            names,
        })
    }

    /// Parse a `[ ... ]` statement block
    fn parse_block(&mut self) -> Result<Block, LogoError> {
        self.expect(TokenKind::LBracket, "`[`")?;
        let mut body = Vec::new();
        while !self.check(&TokenKind::RBracket) {
            if self.is_eof() {
                return Err(self.error_unexpected("`]`"));
            }
            body.push(self.parse_stmt()?);
        }
        self.advance();
        Ok(body)
    }

    /// Collect procedure inputs: up to `arity` of them, or as many as
    /// are present when the arity is unknown
    fn parse_call_args(&mut self, arity: Option<usize>) -> Result<Vec<Expr>, LogoError> {
        let mut args = Vec::new();
        while arity.map_or(!self.at_infix_operator(), |n| args.len() < n)
            && !self.at_argument_end()
        {
            args.push(self.parse_expr()?);
        }
        Ok(args)
    }

    /// Parse one required input of a built-in
    fn parse_input(&mut self, owner: &str) -> Result<Expr, LogoError> {
        if self.at_argument_end() {
            return Err(self.error_unexpected(&format!("input to {}", owner)));
        }
        self.parse_expr()
    }

    /// Whether the next token cannot start an input: a closing
    /// delimiter, the end of input, or a word that starts a statement
    fn at_argument_end(&self) -> bool {
        match &self.peek().kind {
            TokenKind::Eof | TokenKind::RBracket | TokenKind::RParen => true,
            TokenKind::Word(w) => {
                is_keyword(w) || (Command::from_name(w).is_some() && Query::from_name(w).is_none())
            }
            _ => false,
        }
    }

    /// Whether the next token can only continue an expression, so an
    /// input of unknown count ends before it
    fn at_infix_operator(&self) -> bool {
        match &self.peek().kind {
            TokenKind::Star
            | TokenKind::Slash
            | TokenKind::Eq
            | TokenKind::NotEq
            | TokenKind::Lt
            | TokenKind::LtEq
            | TokenKind::Gt
            | TokenKind::GtEq => true,
            TokenKind::Word(w) => ["MOD", "AND", "OR"]
                .iter()
                .any(|op| w.eq_ignore_ascii_case(op)),
            _ => false,
        }
    }

    // ----- expressions -----

    fn parse_expr(&mut self) -> Result<Expr, LogoError> {
        ensure_sufficient_stack(|| self.parse_or())
    }

    fn parse_or(&mut self) -> Result<Expr, LogoError> {
        let mut left = self.parse_and()?;
        while self.peek().is_word("OR") {
            self.advance();
            let right = self.parse_and()?;
            left = binary(BinaryOp::Or, left, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, LogoError> {
        let mut left = self.parse_not()?;
        while self.peek().is_word("AND") {
            self.advance();
            let right = self.parse_not()?;
            left = binary(BinaryOp::And, left, right);
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> Result<Expr, LogoError> {
        if self.peek().is_word("NOT") {
            let start = self.advance().span;
            let operand = ensure_sufficient_stack(|| self.parse_not())?;
            return Ok(Expr::Unary {
                span: start.merge(&operand.span()),
                op: UnaryOp::Not,
                operand: Box::new(operand),
            });
        }
        self.parse_comparison()
    }

    /// Comparisons do not chain: `1 < 2 < 3` leaves `< 3` unparsed
    fn parse_comparison(&mut self) -> Result<Expr, LogoError> {
        let left = self.parse_binary_expr(0)?;
        let op = match self.peek().kind {
            TokenKind::Eq => BinaryOp::Eq,
            TokenKind::NotEq => BinaryOp::Ne,
            TokenKind::Lt => BinaryOp::Lt,
            TokenKind::LtEq => BinaryOp::Le,
            TokenKind::Gt => BinaryOp::Gt,
            TokenKind::GtEq => BinaryOp::Ge,
            _ => return Ok(left),
        };
        self.advance();
        let right = self.parse_binary_expr(0)?;
        Ok(binary(op, left, right))
    }

    fn parse_binary_expr(&mut self, min_prec: u8) -> Result<Expr, LogoError> {
        let mut left = self.parse_unary_expr()?;

        loop {
            let (op, prec) = match &self.peek().kind {
                TokenKind::Plus => (BinaryOp::Add, 1),
                TokenKind::Minus => (BinaryOp::Sub, 1),
                TokenKind::Star => (BinaryOp::Mul, 2),
                TokenKind::Slash => (BinaryOp::Div, 2),
                TokenKind::Word(w) if w.eq_ignore_ascii_case("MOD") => (BinaryOp::Mod, 2),
                _ => break,
            };

            if prec < min_prec {
                break;
            }

            self.advance();
            let right = self.parse_binary_expr(prec + 1)?;
            left = binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_unary_expr(&mut self) -> Result<Expr, LogoError> {
        let op = match self.peek().kind {
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Plus => UnaryOp::Plus,
            _ => return self.parse_primary_expr(),
        };
        let start = self.advance().span;
        let operand = ensure_sufficient_stack(|| self.parse_unary_expr())?;
        Ok(Expr::Unary {
            span: start.merge(&operand.span()),
            op,
            operand: Box::new(operand),
        })
    }

    fn parse_primary_expr(&mut self) -> Result<Expr, LogoError> {
        ensure_sufficient_stack(|| self.parse_primary_expr_inner())
    }

    fn parse_primary_expr_inner(&mut self) -> Result<Expr, LogoError> {
        let token = self.peek().clone();
        match &token.kind {
            TokenKind::Number(value) => {
                self.advance();
                Ok(Expr::Number {
                    span: token.span,
                    value: *value,
                })
            }
            TokenKind::Colon => {
                self.advance();
                let name = self.expect_word("variable name")?;
                Ok(Expr::Variable {
                    span: self.span_from(token.span),
                    name,
                })
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expr()?;
                self.expect(TokenKind::RParen, "`)`")?;
                Ok(expr)
            }
            TokenKind::LBracket => self.parse_list_expr(),
            TokenKind::Word(word) => self.parse_word_expr(word, token.span),
            _ => Err(self.error_unexpected("expression")),
        }
    }

    /// `[ ... ]` in expression position: each element is a primary
    fn parse_list_expr(&mut self) -> Result<Expr, LogoError> {
        let start = self.advance().span;
        let mut items = Vec::new();
        while !self.check(&TokenKind::RBracket) {
            if self.is_eof() {
                return Err(self.error_unexpected("`]`"));
            }
            items.push(self.parse_primary_expr()?);
        }
        self.advance();
        Ok(Expr::List {
            span: self.span_from(start),
            items,
        })
    }

    fn parse_word_expr(&mut self, word: &str, start: Span) -> Result<Expr, LogoError> {
        if let Some(function) = Function::from_name(word) {
            self.advance();
            let mut args = Vec::with_capacity(function.arity());
            for _ in 0..function.arity() {
                args.push(self.parse_input(function.name())?);
            }
            return Ok(Expr::FunctionCall {
                span: self.span_from(start),
                function,
                args,
            });
        }

        if let Some(function) = HigherOrder::from_name(word) {
            self.advance();
            if self.check(&TokenKind::Quote) {
                self.advance();
            }
            let procedure = self.expect_word("procedure name")?;
            let list = self.parse_input(function.name())?;
            return Ok(Expr::HigherOrder {
                span: self.span_from(start),
                function,
                procedure,
                list: Box::new(list),
            });
        }

        if let Some(query) = Query::from_name(word) {
            self.advance();
            return Ok(Expr::Query { span: start, query });
        }

        if is_keyword(word) || Command::from_name(word).is_some() {
            return Err(self.error_unexpected("expression"));
        }

        // As in command position, a word with no known arity collects its
        // inputs greedily and is looked up only if the call is reached.
        let arity = self.procedures.get(&word.to_ascii_uppercase()).copied();
        let name = word.to_string();
        self.advance();
        let args = self.parse_call_args(arity)?;
        Ok(Expr::Call {
            span: self.span_from(start),
            name,
            args,
        })
    }

    // ----- token helpers -----

    fn peek(&self) -> &Token {
        // The token list always ends with EOF and `pos` never moves past it.
        &self.tokens[self.pos]
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos].clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn is_eof(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.peek().kind) == std::mem::discriminant(kind)
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<Token, LogoError> {
        if self.check(&kind) {
            Ok(self.advance())
        } else {
            Err(self.error_unexpected(expected))
        }
    }

    fn expect_word(&mut self, expected: &str) -> Result<String, LogoError> {
        match &self.peek().kind {
            TokenKind::Word(word) => {
                let word = word.clone();
                self.advance();
                Ok(word)
            }
            _ => Err(self.error_unexpected(expected)),
        }
    }

    /// Span from `start` to the end of the last consumed token
    fn span_from(&self, start: Span) -> Span {
        let last = self.tokens[self.pos.saturating_sub(1)].span;
        start.merge(&last)
    }

    fn error_unexpected(&self, expected: &str) -> LogoError {
        let token = self.peek();
        LogoError::parse(expected, token.to_string(), token.span)
    }
}

fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    Expr::Binary {
        span: left.span().merge(&right.span()),
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}
