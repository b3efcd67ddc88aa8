//! Enter/Leave traversal contract for statement checkers.
//!
//! Checkers visit each statement of a script in source order. `enter` runs
//! pre-order and may return [`Descent::Skip`] once a verdict for the
//! statement is reached; `leave` runs post-order. Statement kinds are the
//! closed `sqlparser` sum type, matched explicitly — there is no dynamic
//! dispatch on node types.

use crate::parser::ParsedStatement;

/// Whether to continue into a statement after `enter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Descent {
    /// Visit the statement's nested structure (and then `leave`).
    Continue,
    /// The verdict for this statement is final; go straight to `leave`.
    Skip,
}

/// A stateful per-invocation visitor over a script's statements.
pub trait StatementVisitor {
    /// Called before a statement is examined.
    fn enter(&mut self, statement: &ParsedStatement) -> Descent;

    /// Called after a statement (and, on [`Descent::Continue`], its nested
    /// structure) has been examined.
    fn leave(&mut self, _statement: &ParsedStatement) {}
}

/// Drive a visitor over every statement of a script in source order.
///
/// Traversal is statement-granular: a [`Descent::Skip`] verdict and a full
/// descent converge on `leave` immediately, since statements carry no
/// nested statements.
pub fn walk_statements<V: StatementVisitor>(visitor: &mut V, statements: &[ParsedStatement]) {
    for statement in statements {
        match visitor.enter(statement) {
            Descent::Continue | Descent::Skip => visitor.leave(statement),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_statements;
    use crate::types::Dialect;

    struct CountingVisitor {
        entered: usize,
        left: usize,
    }

    impl StatementVisitor for CountingVisitor {
        fn enter(&mut self, _statement: &ParsedStatement) -> Descent {
            self.entered += 1;
            Descent::Skip
        }

        fn leave(&mut self, _statement: &ParsedStatement) {
            self.left += 1;
        }
    }

    #[test]
    fn test_walk_visits_every_statement_in_order() {
        let statements =
            parse_statements(Dialect::MySql, "SELECT 1; SELECT 2; SELECT 3;").unwrap();
        let mut visitor = CountingVisitor {
            entered: 0,
            left: 0,
        };
        walk_statements(&mut visitor, &statements);
        assert_eq!(visitor.entered, 3);
        assert_eq!(visitor.left, 3);
    }
}
