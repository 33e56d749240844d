//! Statements.
//!
//! The statement level is where the grammar's flagship conflict lives:
//! `T(a);` is a declaration or a call expression depending on what `T`
//! names, which the parser cannot know. Both readings run as candidates
//! and the declaration reading wins full ties, so the choice is stable
//! across parses of identical text.

use crate::candidates::{race, Candidate};
use crate::green::GreenNode;
use crate::session::ParseSession;
use crate::token_set::STMT_SYNC;
use crate::{decls, exprs, items};
use cxx_diagnostic::ErrorCode;
use cxx_ir::{FieldName, NodeKind, TokenKind};

pub(crate) fn parse_statement(s: &mut ParseSession<'_>) -> GreenNode {
    match s.peek() {
        TokenKind::LBrace => parse_compound_statement(s),
        TokenKind::Semicolon => GreenNode::node(NodeKind::ExpressionStatement, vec![s.bump()]),
        TokenKind::If => parse_if_statement(s),
        TokenKind::While => parse_while_statement(s),
        TokenKind::Do => parse_do_statement(s),
        TokenKind::For => parse_for_statement(s),
        TokenKind::Switch => parse_switch_statement(s),
        TokenKind::Case | TokenKind::Default => parse_case_statement(s),
        TokenKind::Break => parse_jump(s, NodeKind::BreakStatement),
        TokenKind::Continue => parse_jump(s, NodeKind::ContinueStatement),
        TokenKind::Return => parse_return_statement(s, NodeKind::ReturnStatement),
        TokenKind::CoReturn => parse_return_statement(s, NodeKind::CoReturnStatement),
        TokenKind::Goto => parse_goto_statement(s),
        TokenKind::Try => parse_try_statement(s),
        TokenKind::LBracket if s.peek_nth(1) == TokenKind::LBracket => {
            let attr = decls::parse_attribute_specifier(s);
            let stmt = parse_statement(s);
            GreenNode::node(NodeKind::AttributedStatement, vec![attr, stmt])
        }
        TokenKind::Identifier if s.peek_nth(1) == TokenKind::Colon => {
            let label = s.bump().with_field(FieldName::Name);
            let colon = s.bump();
            let stmt = parse_statement(s).with_field(FieldName::Body);
            GreenNode::node(NodeKind::LabeledStatement, vec![label, colon, stmt])
        }
        TokenKind::Typedef | TokenKind::Using | TokenKind::StaticAssert => {
            items::parse_top_level_item(s)
        }
        kind if decls::can_start_declaration(kind) => decls::parse_declaration_or_function(s),
        TokenKind::Identifier | TokenKind::ColonColon => {
            parse_declaration_or_expression_statement(s)
        }
        kind if exprs::can_start_expression(kind) => parse_expression_statement(s),
        _ => s.recover(ErrorCode::E1008, STMT_SYNC),
    }
}

/// The declared statement-level conflict: both readings parse to the end
/// of the statement and the finished shapes are scored.
pub(crate) fn parse_declaration_or_expression_statement(s: &mut ParseSession<'_>) -> GreenNode {
    race(
        s,
        vec![
            Candidate::new("declaration", 0, |s: &mut ParseSession<'_>| {
                decls::parse_declaration_or_function(s)
            }),
            Candidate::new("expression_statement", 0, |s: &mut ParseSession<'_>| {
                parse_expression_statement(s)
            }),
        ],
    )
}

pub(crate) fn parse_expression_statement(s: &mut ParseSession<'_>) -> GreenNode {
    let expr = exprs::parse_comma_expression(s).with_field(FieldName::Value);
    let semi = s.expect(TokenKind::Semicolon, ErrorCode::E1001);
    GreenNode::node(NodeKind::ExpressionStatement, vec![expr, semi])
}

pub(crate) fn parse_compound_statement(s: &mut ParseSession<'_>) -> GreenNode {
    let mut children = vec![s.expect(TokenKind::LBrace, ErrorCode::E1001)];
    while !s.at(TokenKind::RBrace) && !s.at_eof() && !s.is_cancelled() {
        let before = s.checkpoint();
        children.push(parse_statement(s));
        if s.consumed_since(&before) == 0 {
            // A statement that consumed nothing would loop; skip the token.
            children.push(s.bump_as(NodeKind::ErrorNode));
        }
    }
    children.push(s.expect(TokenKind::RBrace, ErrorCode::E1006));
    GreenNode::node(NodeKind::CompoundStatement, children)
}

fn parse_if_statement(s: &mut ParseSession<'_>) -> GreenNode {
    let kw = s.bump();
    let mut children = vec![kw];
    if s.at(TokenKind::Constexpr) {
        children.push(s.bump());
    }
    children.push(parse_condition_clause(s).with_field(FieldName::Condition));
    children.push(parse_statement(s).with_field(FieldName::Consequence));
    if s.at(TokenKind::Else) {
        let else_kw = s.bump();
        let alt = parse_statement(s).with_field(FieldName::Alternative);
        children.push(GreenNode::node(NodeKind::ElseClause, vec![else_kw, alt]));
    }
    GreenNode::node(NodeKind::IfStatement, children)
}

fn parse_while_statement(s: &mut ParseSession<'_>) -> GreenNode {
    let kw = s.bump();
    let cond = parse_condition_clause(s).with_field(FieldName::Condition);
    let body = parse_statement(s).with_field(FieldName::Body);
    GreenNode::node(NodeKind::WhileStatement, vec![kw, cond, body])
}

fn parse_do_statement(s: &mut ParseSession<'_>) -> GreenNode {
    let kw = s.bump();
    let body = parse_statement(s).with_field(FieldName::Body);
    let while_kw = s.expect(TokenKind::While, ErrorCode::E1001);
    let cond = parse_condition_clause(s).with_field(FieldName::Condition);
    let semi = s.expect(TokenKind::Semicolon, ErrorCode::E1001);
    GreenNode::node(NodeKind::DoStatement, vec![kw, body, while_kw, cond, semi])
}

fn parse_switch_statement(s: &mut ParseSession<'_>) -> GreenNode {
    let kw = s.bump();
    let cond = parse_condition_clause(s).with_field(FieldName::Condition);
    let body = parse_compound_statement(s).with_field(FieldName::Body);
    GreenNode::node(NodeKind::SwitchStatement, vec![kw, cond, body])
}

fn parse_case_statement(s: &mut ParseSession<'_>) -> GreenNode {
    let kw = s.bump();
    let mut children = vec![kw];
    if !s.at(TokenKind::Colon) && exprs::can_start_expression(s.peek()) {
        children.push(exprs::parse_expression(s).with_field(FieldName::Value));
    }
    children.push(s.expect(TokenKind::Colon, ErrorCode::E1001));
    GreenNode::node(NodeKind::CaseStatement, children)
}

fn parse_jump(s: &mut ParseSession<'_>, kind: NodeKind) -> GreenNode {
    let kw = s.bump();
    let semi = s.expect(TokenKind::Semicolon, ErrorCode::E1001);
    GreenNode::node(kind, vec![kw, semi])
}

fn parse_return_statement(s: &mut ParseSession<'_>, kind: NodeKind) -> GreenNode {
    let kw = s.bump();
    let mut children = vec![kw];
    if s.at(TokenKind::LBrace) {
        children.push(exprs::parse_initializer_list(s).with_field(FieldName::Value));
    } else if exprs::can_start_expression(s.peek()) {
        children.push(exprs::parse_comma_expression(s).with_field(FieldName::Value));
    }
    children.push(s.expect(TokenKind::Semicolon, ErrorCode::E1001));
    GreenNode::node(kind, children)
}

fn parse_goto_statement(s: &mut ParseSession<'_>) -> GreenNode {
    let kw = s.bump();
    let label = if s.at(TokenKind::Identifier) {
        s.bump().with_field(FieldName::Name)
    } else {
        s.missing(ErrorCode::E1004)
    };
    let semi = s.expect(TokenKind::Semicolon, ErrorCode::E1001);
    GreenNode::node(NodeKind::GotoStatement, vec![kw, label, semi])
}

fn parse_try_statement(s: &mut ParseSession<'_>) -> GreenNode {
    let kw = s.bump();
    let body = parse_compound_statement(s).with_field(FieldName::Body);
    let mut children = vec![kw, body];
    while s.at(TokenKind::Catch) {
        let catch_kw = s.bump();
        let params = decls::parse_parameter_list(s).with_field(FieldName::Parameters);
        let catch_body = parse_compound_statement(s).with_field(FieldName::Body);
        children.push(GreenNode::node(
            NodeKind::CatchClause,
            vec![catch_kw, params, catch_body],
        ));
    }
    GreenNode::node(NodeKind::TryStatement, children)
}

/// `( value )` or `( init; value )`, with declaration-shaped values kept as
/// condition declarations.
fn parse_condition_clause(s: &mut ParseSession<'_>) -> GreenNode {
    let open = s.expect(TokenKind::LParen, ErrorCode::E1001);
    let mut children = vec![open];
    let first = parse_condition_value(s);
    if s.at(TokenKind::Semicolon) {
        children.push(first.with_field(FieldName::Initializer));
        children.push(s.bump());
        children.push(parse_condition_value(s).with_field(FieldName::Value));
    } else {
        children.push(first.with_field(FieldName::Value));
    }
    children.push(s.expect(TokenKind::RParen, ErrorCode::E1006));
    GreenNode::node(NodeKind::ConditionClause, children)
}

/// `auto x = f()` inside a condition is a declaration only when a
/// declarator followed by an initializer actually materializes; anything
/// else rewinds to the expression reading.
fn parse_condition_value(s: &mut ParseSession<'_>) -> GreenNode {
    let head = decls::can_start_declaration(s.peek())
        || matches!(s.peek(), TokenKind::Identifier | TokenKind::ColonColon);
    if head {
        let cp = s.checkpoint();
        let mut children = decls::parse_declaration_specifiers(s);
        if s.diagnostics_since(&cp) == 0 && decls::can_start_declarator(s.peek()) {
            let decl = decls::parse_declarator(s);
            if s.diagnostics_since(&cp) == 0
                && matches!(s.peek(), TokenKind::Assign | TokenKind::LBrace)
            {
                children.push(decl.with_field(FieldName::Declarator));
                if s.at(TokenKind::Assign) {
                    children.push(s.bump());
                    children.push(exprs::parse_expression(s).with_field(FieldName::Value));
                } else {
                    children.push(exprs::parse_initializer_list(s).with_field(FieldName::Value));
                }
                return GreenNode::node(NodeKind::ConditionDeclaration, children);
            }
        }
        s.rewind(cp);
    }
    exprs::parse_comma_expression(s)
}

fn parse_for_statement(s: &mut ParseSession<'_>) -> GreenNode {
    let kw = s.bump();
    let open = s.expect(TokenKind::LParen, ErrorCode::E1001);
    let mut children = vec![kw, open];
    let head = decls::can_start_declaration(s.peek())
        || matches!(s.peek(), TokenKind::Identifier | TokenKind::ColonColon);
    if head {
        let cp = s.checkpoint();
        let mut specs = decls::parse_declaration_specifiers(s);
        if s.diagnostics_since(&cp) == 0 && decls::can_start_declarator(s.peek()) {
            let decl = decls::parse_declarator(s);
            if s.diagnostics_since(&cp) == 0 && s.at(TokenKind::Colon) {
                children.append(&mut specs);
                children.push(decl.with_field(FieldName::Declarator));
                children.push(s.bump());
                let range = if s.at(TokenKind::LBrace) {
                    exprs::parse_initializer_list(s)
                } else {
                    exprs::parse_expression(s)
                };
                children.push(range.with_field(FieldName::Right));
                children.push(s.expect(TokenKind::RParen, ErrorCode::E1006));
                children.push(parse_statement(s).with_field(FieldName::Body));
                return GreenNode::node(NodeKind::ForRangeLoop, children);
            }
        }
        s.rewind(cp);
    }
    let init = if s.at(TokenKind::Semicolon) {
        s.bump()
    } else if decls::can_start_declaration(s.peek()) {
        decls::parse_declaration_or_function(s)
    } else if matches!(s.peek(), TokenKind::Identifier | TokenKind::ColonColon) {
        parse_declaration_or_expression_statement(s)
    } else {
        parse_expression_statement(s)
    };
    children.push(init.with_field(FieldName::Initializer));
    if !s.at(TokenKind::Semicolon) && exprs::can_start_expression(s.peek()) {
        children.push(exprs::parse_comma_expression(s).with_field(FieldName::Condition));
    }
    children.push(s.expect(TokenKind::Semicolon, ErrorCode::E1001));
    if !s.at(TokenKind::RParen) && exprs::can_start_expression(s.peek()) {
        children.push(exprs::parse_comma_expression(s).with_field(FieldName::Update));
    }
    children.push(s.expect(TokenKind::RParen, ErrorCode::E1006));
    children.push(parse_statement(s).with_field(FieldName::Body));
    GreenNode::node(NodeKind::ForStatement, children)
}
