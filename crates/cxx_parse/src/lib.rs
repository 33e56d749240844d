//! Error-tolerant C++ parser for cxx-syntax.
//!
//! [`Parser`] turns any byte sequence into a complete concrete syntax tree
//! plus diagnostics; malformed regions become error or missing nodes instead
//! of aborting the parse. Where the grammar declares readings ambiguous
//! (template arguments versus comparison chains, declarations versus
//! expression statements), the parser explores each declared alternative to
//! completion and commits the one that consumed the most input, breaking
//! ties by error count, dynamic precedence, and declaration order.
//!
//! ```
//! let parser = cxx_parse::Parser::new().unwrap();
//! let parsed = parser.parse("vector<vector<int>> rows;");
//! assert!(!parsed.has_errors());
//! ```

mod candidates;
mod context;
mod decls;
mod exprs;
mod green;
mod items;
mod session;
mod stmts;
mod token_set;
mod types;

use crate::session::ParseSession;
use cxx_grammar::{build, cpp, BuildError, ParseTables};
use cxx_lexer::lex;
use cxx_ir::{Span, SyntaxTree};
use std::sync::atomic::AtomicBool;

pub use cxx_diagnostic::{Diagnostic, ErrorCode, Severity};

/// A reusable parser over compiled grammar tables.
///
/// Construction validates the grammar declaration; parsing itself cannot
/// fail. One parser may be shared across parses.
pub struct Parser {
    tables: ParseTables,
}

impl Parser {
    /// Compile and validate the C++ grammar tables.
    pub fn new() -> Result<Parser, BuildError> {
        Ok(Parser {
            tables: build(&cpp())?,
        })
    }

    /// A parser over already-compiled tables.
    pub fn with_tables(tables: ParseTables) -> Parser {
        Parser { tables }
    }

    /// Parse `source` to completion.
    pub fn parse(&self, source: &str) -> ParsedTree {
        self.parse_inner(source, None)
    }

    /// Parse `source`, checking `cancel` at token boundaries. A raised flag
    /// stops consumption and finishes the tree from what was already read,
    /// with an E9002 diagnostic marking the stop.
    pub fn parse_with_cancellation(&self, source: &str, cancel: &AtomicBool) -> ParsedTree {
        self.parse_inner(source, Some(cancel))
    }

    /// Parse `source` as a bare expression, for tooling that works on
    /// fragments. Input past the expression is reported, not consumed.
    pub fn parse_expression(&self, source: &str) -> ParsedTree {
        let lexed = lex(source);
        let mut session = ParseSession::new(source, &lexed.tokens, &self.tables, None);
        let root = exprs::parse_comma_expression(&mut session);
        if !session.at_eof() {
            session.diagnostics.push(
                Diagnostic::error(ErrorCode::E1001)
                    .with_label(session.current_span(), "input continues past the expression"),
            );
        }
        self.finish(source, lexed.diagnostics, session, root)
    }

    fn parse_inner(&self, source: &str, cancel: Option<&AtomicBool>) -> ParsedTree {
        let lexed = lex(source);
        let mut session = ParseSession::new(source, &lexed.tokens, &self.tables, cancel);
        let root = items::parse_translation_unit(&mut session)
            .with_span(Span::new(0, source.len().min(u32::MAX as usize) as u32));
        self.finish(source, lexed.diagnostics, session, root)
    }

    fn finish(
        &self,
        source: &str,
        lex_diagnostics: Vec<Diagnostic>,
        session: ParseSession<'_>,
        root: crate::green::GreenNode,
    ) -> ParsedTree {
        let mut tree = SyntaxTree::new();
        let root_id = root.lower(&mut tree, &self.tables);
        tree.set_root(root_id);

        let mut diagnostics = lex_diagnostics;
        diagnostics.extend(session.diagnostics);
        diagnostics.sort_by_key(|d| d.primary_span().start);

        tracing::debug!(
            bytes = source.len(),
            nodes = tree.len(),
            diagnostics = diagnostics.len(),
            "parse finished"
        );
        ParsedTree { tree, diagnostics }
    }
}

/// A finished parse: the full concrete syntax tree and every lexical and
/// syntactic diagnostic, in source order.
pub struct ParsedTree {
    pub tree: SyntaxTree,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParsedTree {
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty() || self.tree.has_errors()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cxx_ir::{FieldName, NodeKind};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use std::sync::atomic::Ordering;

    fn parse(source: &str) -> ParsedTree {
        Parser::new().unwrap().parse(source)
    }

    fn dump(parsed: &ParsedTree) -> String {
        parsed.tree.root().map(|r| r.dump()).unwrap_or_default()
    }

    #[test]
    fn clean_function_has_no_errors() {
        let parsed = parse("int main() {\n    return 0;\n}\n");
        assert!(!parsed.has_errors());
        assert_eq!(
            parsed.tree.root().map(|r| r.kind()),
            Some(NodeKind::TranslationUnit)
        );
    }

    #[test]
    fn angle_brackets_read_by_position() {
        // Statement position: `a<b>` is a template type and `c` its
        // declarator, on a full tie with the comparison reading.
        let parsed = parse("a < b > c;");
        assert!(parsed.diagnostics.is_empty());
        let root = parsed.tree.root().unwrap();
        assert!(root.descendant_of_kind(NodeKind::Declaration).is_some());
        assert!(root.descendant_of_kind(NodeKind::TemplateType).is_some());

        // Condition position cannot be a declaration, so the comparison
        // chain survives with `<` and `>` as plain operators.
        let parsed = parse("if (a < b > c) { }");
        assert!(parsed.diagnostics.is_empty());
        let root = parsed.tree.root().unwrap();
        let outer = root.descendant_of_kind(NodeKind::BinaryExpression).unwrap();
        assert_eq!(
            outer.field(FieldName::Left).map(|n| n.kind()),
            Some(NodeKind::BinaryExpression)
        );
    }

    #[test]
    fn template_type_wins_in_declaration_position() {
        let parsed = parse("pair<int, int> p;");
        assert!(parsed.diagnostics.is_empty());
        let root = parsed.tree.root().unwrap();
        assert!(root.descendant_of_kind(NodeKind::TemplateType).is_some());
    }

    #[test]
    fn nested_template_closer_is_not_a_shift() {
        let parsed = parse("vector<vector<int>> rows;");
        assert!(parsed.diagnostics.is_empty());
        let root = parsed.tree.root().unwrap();
        let outer = root.descendant_of_kind(NodeKind::TemplateType).unwrap();
        let args = outer.field(FieldName::Arguments).unwrap();
        assert!(args.descendant_of_kind(NodeKind::TemplateType).is_some());
    }

    #[test]
    fn raw_string_keeps_delimiters_and_content() {
        let parsed = parse("const char* s = R\"(no \\escapes\n here)\";");
        assert!(parsed.diagnostics.is_empty());
        let root = parsed.tree.root().unwrap();
        let raw = root
            .descendant_of_kind(NodeKind::RawStringLiteral)
            .unwrap();
        let kinds: Vec<NodeKind> = raw.children().map(|c| c.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                NodeKind::RawStringDelimiter,
                NodeKind::RawStringContent,
                NodeKind::RawStringDelimiter,
            ]
        );
    }

    #[test]
    fn constructor_shaped_ambiguity_is_deterministic() {
        let first = parse("T(a);");
        let second = parse("T(a);");
        assert_eq!(dump(&first), dump(&second));
        let root = first.tree.root().unwrap();
        assert!(root.descendant_of_kind(NodeKind::Declaration).is_some());
    }

    #[test]
    fn fold_expressions_parse_cleanly() {
        let parsed = parse("template <class... T> int sum(T... t) { return (t + ...); }");
        assert!(parsed.diagnostics.is_empty());
        let root = parsed.tree.root().unwrap();
        let fold = root.descendant_of_kind(NodeKind::FoldExpression).unwrap();
        // Right fold: the pack operand sits on the left.
        assert!(fold.field(FieldName::Left).is_some());
    }

    #[test]
    fn spelled_out_fold_operator_parses_cleanly() {
        let parsed = parse("template <class... T> bool any(T... t) { return (t or ...); }");
        assert_eq!(parsed.diagnostics, vec![]);
        let root = parsed.tree.root().unwrap();
        assert!(root.descendant_of_kind(NodeKind::FoldExpression).is_some());
    }

    #[test]
    fn missing_initializer_does_not_poison_the_next_statement() {
        let parsed = parse("int x = ;\nint y = 1;");
        assert!(parsed.has_errors());
        assert_eq!(parsed.diagnostics.len(), 1);
        assert_eq!(parsed.diagnostics[0].code, ErrorCode::E1007);
        let root = parsed.tree.root().unwrap();
        let declarations = root
            .children()
            .filter(|c| c.kind() == NodeKind::Declaration)
            .count();
        assert_eq!(declarations, 2);
    }

    #[test]
    fn bare_expression_entry_point() {
        let parser = Parser::new().unwrap();
        let parsed = parser.parse_expression("a + b * c");
        assert!(parsed.diagnostics.is_empty());
        let root = parsed.tree.root().unwrap();
        assert_eq!(root.kind(), NodeKind::BinaryExpression);
        assert_eq!(
            root.field(FieldName::Right).map(|n| n.kind()),
            Some(NodeKind::BinaryExpression)
        );

        let parsed = parser.parse_expression("a + b; int x;");
        assert!(parsed
            .diagnostics
            .iter()
            .any(|d| d.code == ErrorCode::E1001));
    }

    #[test]
    fn lexical_and_parse_diagnostics_are_merged_in_order() {
        let parsed = parse("int a = 'x;\nint b = ;");
        assert!(parsed.diagnostics.len() >= 2);
        let starts: Vec<u32> = parsed
            .diagnostics
            .iter()
            .map(|d| d.primary_span().start)
            .collect();
        let mut sorted = starts.clone();
        sorted.sort_unstable();
        assert_eq!(starts, sorted);
    }

    #[test]
    fn cancellation_stops_early_with_a_marker() {
        let parser = Parser::new().unwrap();
        let flag = AtomicBool::new(false);
        flag.store(true, Ordering::Relaxed);
        let parsed = parser.parse_with_cancellation("int a; int b; int c;", &flag);
        assert!(parsed
            .diagnostics
            .iter()
            .any(|d| d.code == ErrorCode::E9002));
        assert!(parsed.tree.root().is_some());
    }

    #[test]
    fn whole_file_mix_parses_without_errors() {
        let source = r#"
namespace geo {

template <class T>
struct point {
    point(T x, T y) : x_(x), y_(y) {}
    T length() const noexcept { return x_ * x_ + y_ * y_; }

private:
    T x_;
    T y_;
};

enum class axis { x, y };

inline int flip(int v) {
    if (v < 0) {
        return -v;
    }
    return v;
}

}

using geo::point;

int main() {
    point<int> origin(0, 0);
    auto closure = [&origin](int scale) { return origin.length() * scale; };
    for (int i = 0; i < 3; ++i) {
        closure(i);
    }
    return 0;
}
"#;
        let parsed = parse(source);
        assert_eq!(parsed.diagnostics, vec![]);
        assert!(!parsed.tree.has_errors());
    }

    proptest! {
        #[test]
        fn parsing_never_panics(source in "\\PC{0,120}") {
            let parser = Parser::new().unwrap();
            let _ = parser.parse(&source);
        }

        #[test]
        fn reparsing_is_deterministic(source in "[a-zA-Z0-9_<>(){}\\[\\];:+*=,.&!~ \\n]{0,80}") {
            let parser = Parser::new().unwrap();
            let first = parser.parse(&source);
            let second = parser.parse(&source);
            prop_assert_eq!(dump(&first), dump(&second));
            prop_assert_eq!(first.diagnostics.len(), second.diagnostics.len());
        }
    }
}
