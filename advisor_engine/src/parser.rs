//! Dialect parser adapter.
//!
//! Splits a multi-statement migration script into individually walkable
//! statement ASTs using the dialect's own parser configuration. Each parsed
//! statement keeps its 1-based start line and the raw source slice it came
//! from, so diagnostics can cite the author's original spelling rather than
//! the AST's normalized rendering.
//!
//! A syntax error is not an engine error: [`parse_or_advice`] converts it
//! into a single Error-severity advice so one bad statement degrades to
//! "report the parse problem" instead of failing the whole pipeline.

use regex::Regex;
use sqlparser::ast::Statement;
use sqlparser::dialect::{Dialect as ParserDialect, MySqlDialect, PostgreSqlDialect, SnowflakeDialect};
use sqlparser::parser::{Parser, ParserError};
use sqlparser::tokenizer::{Location, Token};

use crate::types::{Advice, AdviceCode, AdviceStatus, Dialect};

/// One statement of a script, ready for traversal.
#[derive(Debug, Clone)]
pub struct ParsedStatement {
    /// The dialect-parsed statement tree.
    pub ast: Statement,

    /// Raw source slice of this statement, trimmed, without the trailing
    /// semicolon. Used verbatim in advice content.
    pub text: String,

    /// 1-based line on which the statement starts.
    pub line: usize,
}

/// A failed parse of the script.
#[derive(Debug, Clone)]
pub struct SyntaxError {
    /// Parser message, including the reported position when available.
    pub message: String,

    /// 1-based line of the failure, 0 if the parser did not report one.
    pub line: usize,
}

/// Map an engine dialect onto its parser configuration.
///
/// The whole MySQL family (MySQL, TiDB, MariaDB, OceanBase) shares the
/// MySQL grammar.
fn parser_dialect(dialect: Dialect) -> Box<dyn ParserDialect> {
    match dialect {
        Dialect::MySql | Dialect::TiDb | Dialect::MariaDb | Dialect::OceanBase => {
            Box::new(MySqlDialect {})
        }
        Dialect::Postgres => Box::new(PostgreSqlDialect {}),
        Dialect::Snowflake => Box::new(SnowflakeDialect {}),
    }
}

/// Parse a script into its statements.
///
/// # Errors
///
/// Returns a [`SyntaxError`] when the script does not parse under the
/// dialect's grammar. Semantic checkers must not run in that case.
pub fn parse_statements(dialect: Dialect, text: &str) -> Result<Vec<ParsedStatement>, SyntaxError> {
    let parser_dialect = parser_dialect(dialect);
    let mut parser = Parser::new(parser_dialect.as_ref())
        .try_with_sql(text)
        .map_err(syntax_error)?;

    let line_starts = line_start_offsets(text);
    let mut statements = Vec::new();

    loop {
        // Skip empty statements between semicolons.
        while parser.consume_token(&Token::SemiColon) {}
        if parser.peek_token().token == Token::EOF {
            break;
        }

        let start = parser.peek_token().span.start;
        let ast = parser.parse_statement().map_err(syntax_error)?;
        let end = parser.peek_token().span.start;

        let text_slice = slice_source(text, &line_starts, start, end);
        statements.push(ParsedStatement {
            ast,
            text: text_slice.trim().trim_end_matches(';').trim_end().to_owned(),
            line: start.line as usize,
        });
    }

    Ok(statements)
}

/// Parse a script, converting a syntax error into the one-element advice
/// list the engine returns without running semantic checks.
///
/// # Errors
///
/// The `Err` arm carries the ready-to-return advice list, mirroring the
/// non-raising contract of the adapter.
pub fn parse_or_advice(dialect: Dialect, text: &str) -> Result<Vec<ParsedStatement>, Vec<Advice>> {
    parse_statements(dialect, text).map_err(|e| {
        vec![Advice {
            status: AdviceStatus::Error,
            code: AdviceCode::SyntaxError,
            title: "Syntax error".to_owned(),
            content: e.message,
            line: e.line,
        }]
    })
}

/// Byte offsets of each line start, for mapping parser locations back to
/// source slices.
fn line_start_offsets(text: &str) -> Vec<usize> {
    let mut starts = vec![0];
    for (idx, byte) in text.bytes().enumerate() {
        if byte == b'\n' {
            starts.push(idx + 1);
        }
    }
    starts
}

/// Byte offset of a 1-based parser location, column counted in characters.
fn location_offset(text: &str, line_starts: &[usize], loc: Location) -> usize {
    if loc.line == 0 {
        return text.len();
    }
    let Some(&line_start) = line_starts.get(loc.line as usize - 1) else {
        return text.len();
    };
    let column = loc.column.max(1) as usize - 1;
    text[line_start..]
        .char_indices()
        .nth(column)
        .map_or(text.len(), |(byte_idx, _)| line_start + byte_idx)
}

/// Slice the source between two parser locations. An end location of line 0
/// (the parser's empty span, seen at EOF) means "to the end of the script".
fn slice_source<'a>(text: &'a str, line_starts: &[usize], start: Location, end: Location) -> &'a str {
    let start_offset = location_offset(text, line_starts, start);
    let end_offset = location_offset(text, line_starts, end);
    if start_offset >= end_offset {
        return &text[start_offset..];
    }
    &text[start_offset..end_offset]
}

fn syntax_error(err: ParserError) -> SyntaxError {
    let message = err.to_string();
    // The parser embeds "Line: N, Column: M" in its messages when it knows
    // the position; surface N as the advice line.
    let line = Regex::new(r"Line: (\d+)")
        .expect("line pattern regex is valid")
        .captures(&message)
        .and_then(|cap| cap.get(1))
        .and_then(|m| m.as_str().parse::<usize>().ok())
        .unwrap_or(0);
    SyntaxError { message, line }
}
