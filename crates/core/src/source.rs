//! Parsing JavaScript and TypeScript with oxc, plus the few AST helpers the
//! rule needs to see through syntax that ESTree does not represent.

use std::path::Path;

use flaglint_diagnostics::Span;
use oxc_ast::ast::Expression;
use oxc_span::SourceType;

/// Source type for input without a usable file name: a TypeScript module.
pub fn default_source_type() -> SourceType {
    SourceType::default().with_typescript(true).with_module(true)
}

/// Pick the source type from the file extension (`.js`, `.cjs`, `.tsx`, ...).
///
/// Unknown extensions fall back to [`default_source_type`].
pub fn source_type_for_path(path: impl AsRef<Path>) -> SourceType {
    SourceType::from_path(path).unwrap_or_else(|_| default_source_type())
}

/// Convert an oxc span to a byte span.
pub(crate) fn byte_span(span: oxc_span::Span) -> Span {
    Span::new(span.start as usize, span.end as usize)
}

/// Strip grouping parentheses.
pub fn skip_parens<'p, 'a>(mut expr: &'p Expression<'a>) -> &'p Expression<'a> {
    while let Expression::ParenthesizedExpression(paren) = expr {
        expr = &paren.expression;
    }
    expr
}

/// Strip grouping parentheses and TypeScript non-null assertions (`x!`).
pub fn skip_transparent<'p, 'a>(mut expr: &'p Expression<'a>) -> &'p Expression<'a> {
    loop {
        match expr {
            Expression::ParenthesizedExpression(paren) => expr = &paren.expression,
            Expression::TSNonNullExpression(assertion) => expr = &assertion.expression,
            _ => return expr,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxc_allocator::Allocator;
    use oxc_ast::ast::Statement;
    use oxc_parser::Parser;

    fn with_expression(src: &str, check: impl FnOnce(&Expression<'_>)) {
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, src, default_source_type()).parse();
        assert!(ret.errors.is_empty(), "{src}: {:?}", ret.errors);
        let Some(Statement::ExpressionStatement(stmt)) = ret.program.body.first() else {
            panic!("{src}: expected an expression statement");
        };
        check(&stmt.expression);
    }

    #[test]
    fn default_is_typescript_module() {
        let source_type = default_source_type();
        assert!(source_type.is_typescript());
        assert!(source_type.is_module());
    }

    #[test]
    fn extension_selects_language() {
        assert!(source_type_for_path("cli.ts").is_typescript());
        assert!(source_type_for_path("cli.tsx").is_jsx());
        assert!(source_type_for_path("cli.js").is_javascript());
        assert!(source_type_for_path("cli.txt").is_typescript());
    }

    #[test]
    fn parens_are_skipped() {
        with_expression("((program));", |expr| {
            assert!(matches!(skip_parens(expr), Expression::Identifier(_)));
        });
        with_expression("(program)!;", |expr| {
            assert!(matches!(skip_parens(expr), Expression::TSNonNullExpression(_)));
        });
    }

    #[test]
    fn non_null_and_parens_are_transparent() {
        with_expression("((program)!)!;", |expr| {
            let Expression::Identifier(ident) = skip_transparent(expr) else {
                panic!("expected identifier");
            };
            assert_eq!(ident.name.as_str(), "program");
        });
    }

    #[test]
    fn spans_are_byte_offsets() {
        with_expression("'é'.length;", |expr| {
            let Expression::StaticMemberExpression(member) = expr else {
                panic!("expected member access");
            };
            assert_eq!(byte_span(member.property.span), Span::new(5, 11));
        });
    }
}
