//! Expression parsing.
//!
//! A Pratt loop over the grammar's binary operator table, with candidate
//! exploration where lookahead cannot settle a reading. The canonical case
//! is `a < b`: a template argument list or a comparison, decided by racing
//! both continuations to completion and scoring them.

use crate::candidates::{race, Candidate};
use crate::context::ParseContext;
use crate::green::GreenNode;
use crate::session::ParseSession;
use crate::{decls, items, stmts, types};
use cxx_diagnostic::ErrorCode;
use cxx_grammar::prec::{self, is_fold_operator};
use cxx_grammar::Assoc;
use cxx_ir::{FieldName, NodeKind, TokenKind};

/// Nested speculation beyond this depth stops opening new races and takes
/// the deterministic comparison reading instead. Keeps pathological inputs
/// like `a<a<a<a<...` from going exponential.
const MAX_SPECULATION: u32 = 8;

/// Tokens that can open an expression.
pub(crate) fn can_start_expression(kind: TokenKind) -> bool {
    kind.is_literal()
        || matches!(
            kind,
            TokenKind::Identifier
                | TokenKind::ColonColon
                | TokenKind::This
                | TokenKind::Bang
                | TokenKind::Not
                | TokenKind::Tilde
                | TokenKind::Compl
                | TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Star
                | TokenKind::Amp
                | TokenKind::PlusPlus
                | TokenKind::MinusMinus
                | TokenKind::LParen
                | TokenKind::LBracket
                | TokenKind::Sizeof
                | TokenKind::Alignof
                | TokenKind::New
                | TokenKind::Delete
                | TokenKind::Throw
                | TokenKind::CoAwait
                | TokenKind::CoYield
                | TokenKind::Requires
                | TokenKind::Typeid
                | TokenKind::StaticCast
                | TokenKind::DynamicCast
                | TokenKind::ConstCast
                | TokenKind::ReinterpretCast
                | TokenKind::Operator
        )
}

/// One assignment-expression: everything except the comma operator.
pub(crate) fn parse_expression(s: &mut ParseSession<'_>) -> GreenNode {
    parse_expression_bp(s, prec::ASSIGNMENT)
}

/// Full expression including comma chains, for statement and parenthesized
/// positions.
pub(crate) fn parse_comma_expression(s: &mut ParseSession<'_>) -> GreenNode {
    let mut expr = parse_expression(s);
    while s.at(TokenKind::Comma) {
        let comma = s.bump();
        let right = parse_expression(s);
        expr = GreenNode::node(
            NodeKind::CommaExpression,
            vec![
                expr.with_field(FieldName::Left),
                comma,
                right.with_field(FieldName::Right),
            ],
        );
    }
    expr
}

/// Parse an expression binding at least as tightly as `min`.
///
/// A bare identifier followed by `<` is the template/comparison ambiguity:
/// both whole-expression continuations are raced, so the winner is chosen
/// by what the rest of the input turns out to be, not by local lookahead.
pub(crate) fn parse_expression_bp(s: &mut ParseSession<'_>, min: i16) -> GreenNode {
    if s.at(TokenKind::Identifier)
        && s.peek_nth(1) == TokenKind::Lt
        && s.speculation_depth() < MAX_SPECULATION
    {
        return race(
            s,
            vec![
                Candidate::new("template_function", 1, move |s: &mut ParseSession<'_>| {
                    let name = s.bump().with_field(FieldName::Name);
                    let args =
                        types::parse_template_argument_list(s).with_field(FieldName::Arguments);
                    let head = GreenNode::node(NodeKind::TemplateFunction, vec![name, args]);
                    parse_infix_loop(s, head, min)
                }),
                Candidate::new("expression", 0, move |s: &mut ParseSession<'_>| {
                    let head = s.bump();
                    parse_infix_loop(s, head, min)
                }),
            ],
        );
    }
    let lhs = parse_prefix(s);
    parse_infix_loop(s, lhs, min)
}

fn parse_infix_loop(s: &mut ParseSession<'_>, mut lhs: GreenNode, min: i16) -> GreenNode {
    loop {
        let op = s.peek();
        match op {
            TokenKind::LParen if prec::CALL >= min => {
                let args = parse_argument_list(s).with_field(FieldName::Arguments);
                lhs = GreenNode::node(
                    NodeKind::CallExpression,
                    vec![lhs.with_field(FieldName::Function), args],
                );
                continue;
            }
            TokenKind::LBracket if prec::SUBSCRIPT >= min => {
                let open = s.bump();
                let mut parts = vec![lhs.with_field(FieldName::Argument), open];
                if !s.at(TokenKind::RBracket) {
                    parts.push(parse_comma_expression(s).with_field(FieldName::Index));
                }
                parts.push(s.expect(TokenKind::RBracket, ErrorCode::E1006));
                lhs = GreenNode::node(NodeKind::SubscriptExpression, parts);
                continue;
            }
            // `.*` and `->*` are not member access; they sit in the binary
            // table below unary, so the generic loop handles them.
            TokenKind::Dot | TokenKind::Arrow if prec::FIELD >= min => {
                let dot = s.bump();
                let name = parse_field_name(s);
                lhs = GreenNode::node(
                    NodeKind::FieldExpression,
                    vec![
                        lhs.with_field(FieldName::Argument),
                        dot.with_field(FieldName::Operator),
                        name.with_field(FieldName::Field),
                    ],
                );
                continue;
            }
            TokenKind::PlusPlus | TokenKind::MinusMinus if prec::CALL >= min => {
                let opn = s.bump();
                lhs = GreenNode::node(
                    NodeKind::UpdateExpression,
                    vec![
                        lhs.with_field(FieldName::Argument),
                        opn.with_field(FieldName::Operator),
                    ],
                );
                continue;
            }
            TokenKind::Question if prec::CONDITIONAL >= min => {
                let question = s.bump();
                let consequence = parse_comma_expression(s).with_field(FieldName::Consequence);
                let colon = s.expect(TokenKind::Colon, ErrorCode::E1001);
                let alternative =
                    parse_expression_bp(s, prec::CONDITIONAL).with_field(FieldName::Alternative);
                lhs = GreenNode::node(
                    NodeKind::ConditionalExpression,
                    vec![
                        lhs.with_field(FieldName::Condition),
                        question,
                        consequence,
                        colon,
                        alternative,
                    ],
                );
                continue;
            }
            _ => {}
        }
        if op.is_assignment_operator() && prec::ASSIGNMENT >= min {
            // Fold forms like `(v = ... = pack)` belong to the paren level.
            if is_fold_operator(op) && s.peek_nth(1) == TokenKind::Ellipsis {
                break;
            }
            let opn = s.bump().with_field(FieldName::Operator);
            let rhs = if s.at(TokenKind::LBrace) {
                parse_initializer_list(s)
            } else {
                parse_expression_bp(s, prec::ASSIGNMENT)
            };
            lhs = GreenNode::node(
                NodeKind::AssignmentExpression,
                vec![
                    lhs.with_field(FieldName::Left),
                    opn,
                    rhs.with_field(FieldName::Right),
                ],
            );
            continue;
        }
        if s.ctx.contains(ParseContext::TEMPLATE_ARGS)
            && matches!(op, TokenKind::Gt | TokenKind::Shr)
        {
            break;
        }
        if is_fold_operator(op) && s.peek_nth(1) == TokenKind::Ellipsis {
            break;
        }
        let Some(info) = s.tables().binary_operator(op) else {
            break;
        };
        if info.level < min {
            break;
        }
        let opn = s.bump().with_field(FieldName::Operator);
        let next_min = match info.assoc {
            Assoc::Left => info.level + 1,
            Assoc::Right => info.level,
        };
        let rhs = parse_expression_bp(s, next_min).with_field(FieldName::Right);
        lhs = GreenNode::node(
            NodeKind::BinaryExpression,
            vec![lhs.with_field(FieldName::Left), opn, rhs],
        );
    }
    lhs
}

fn parse_prefix(s: &mut ParseSession<'_>) -> GreenNode {
    match s.peek() {
        TokenKind::NumberLiteral
        | TokenKind::CharLiteral
        | TokenKind::StringLiteral
        | TokenKind::True
        | TokenKind::False
        | TokenKind::Nullptr
        | TokenKind::This => s.bump(),
        TokenKind::RawStringDelimiter => parse_raw_string(s),
        TokenKind::Identifier => parse_name_expression(s),
        TokenKind::ColonColon => match s.peek_nth(1) {
            TokenKind::New => {
                let scope = s.bump();
                parse_new_expression(s, Some(scope))
            }
            TokenKind::Delete => {
                let scope = s.bump();
                parse_delete_expression(s, Some(scope))
            }
            _ => parse_name_expression(s),
        },
        TokenKind::Operator => parse_operator_name(s),
        TokenKind::Bang
        | TokenKind::Not
        | TokenKind::Tilde
        | TokenKind::Compl
        | TokenKind::Plus
        | TokenKind::Minus => {
            let opn = s.bump().with_field(FieldName::Operator);
            let value = parse_expression_bp(s, prec::UNARY).with_field(FieldName::Argument);
            GreenNode::node(NodeKind::UnaryExpression, vec![opn, value])
        }
        TokenKind::Star | TokenKind::Amp => {
            let opn = s.bump().with_field(FieldName::Operator);
            let value = parse_expression_bp(s, prec::UNARY).with_field(FieldName::Argument);
            GreenNode::node(NodeKind::PointerExpression, vec![opn, value])
        }
        TokenKind::PlusPlus | TokenKind::MinusMinus => {
            let opn = s.bump().with_field(FieldName::Operator);
            let value = parse_expression_bp(s, prec::UNARY).with_field(FieldName::Argument);
            GreenNode::node(NodeKind::UpdateExpression, vec![opn, value])
        }
        TokenKind::Sizeof => parse_sizeof(s),
        TokenKind::Alignof => parse_alignof(s),
        TokenKind::New => parse_new_expression(s, None),
        TokenKind::Delete => parse_delete_expression(s, None),
        TokenKind::Throw => {
            let kw = s.bump();
            let mut children = vec![kw];
            if can_start_expression(s.peek()) {
                children.push(parse_expression(s).with_field(FieldName::Value));
            }
            GreenNode::node(NodeKind::ThrowExpression, children)
        }
        TokenKind::CoAwait => {
            let kw = s.bump();
            let value = parse_expression_bp(s, prec::UNARY).with_field(FieldName::Value);
            GreenNode::node(NodeKind::CoAwaitExpression, vec![kw, value])
        }
        TokenKind::CoYield => {
            let kw = s.bump();
            let value = parse_expression(s).with_field(FieldName::Value);
            GreenNode::node(NodeKind::CoYieldExpression, vec![kw, value])
        }
        TokenKind::Requires => parse_requires_expression(s),
        TokenKind::Typeid => parse_typeid(s),
        TokenKind::StaticCast
        | TokenKind::DynamicCast
        | TokenKind::ConstCast
        | TokenKind::ReinterpretCast => parse_keyword_cast(s),
        TokenKind::LParen => parse_paren_expression(s),
        TokenKind::LBracket => parse_lambda(s),
        _ => s.missing(ErrorCode::E1002),
    }
}

/// A possibly-qualified name in expression position: `x`, `ns::x`,
/// `::x`, `q::operator+`, `q::~T`, `q::f<T>`.
fn parse_name_expression(s: &mut ParseSession<'_>) -> GreenNode {
    let mut parts: Vec<GreenNode> = Vec::new();
    if s.at(TokenKind::ColonColon) {
        parts.push(s.bump());
    }
    loop {
        match s.peek() {
            TokenKind::Identifier if s.peek_nth(1) == TokenKind::ColonColon => {
                parts.push(
                    s.bump_as(NodeKind::NamespaceIdentifier)
                        .with_field(FieldName::Scope),
                );
                parts.push(s.bump());
            }
            TokenKind::Identifier => {
                let mut name = s.bump();
                // Qualified names commit to the template reading when the
                // argument list closes cleanly; bare names are raced by the
                // caller instead.
                if s.at(TokenKind::Lt)
                    && !parts.is_empty()
                    && s.speculation_depth() < MAX_SPECULATION
                {
                    if let Some(args) = parse_template_args_speculative(s) {
                        name = GreenNode::node(
                            NodeKind::TemplateFunction,
                            vec![
                                name.with_field(FieldName::Name),
                                args.with_field(FieldName::Arguments),
                            ],
                        );
                    }
                }
                parts.push(name);
                break;
            }
            TokenKind::Operator => {
                parts.push(parse_operator_name(s));
                break;
            }
            TokenKind::Tilde => {
                let tilde = s.bump();
                let id = if s.at(TokenKind::Identifier) {
                    s.bump_as(NodeKind::TypeIdentifier)
                } else {
                    s.missing(ErrorCode::E1004)
                };
                parts.push(GreenNode::node(NodeKind::FieldIdentifier, vec![tilde, id]));
                break;
            }
            TokenKind::Template => {
                parts.push(s.bump());
            }
            _ => {
                parts.push(s.missing(ErrorCode::E1004));
                break;
            }
        }
    }
    if parts.len() == 1 {
        parts.remove(0)
    } else {
        GreenNode::node(NodeKind::QualifiedIdentifier, parts)
    }
}

/// The member name after `.` or `->`.
fn parse_field_name(s: &mut ParseSession<'_>) -> GreenNode {
    match s.peek() {
        TokenKind::Tilde => {
            let tilde = s.bump();
            let name = if s.at(TokenKind::Identifier) {
                s.bump_as(NodeKind::TypeIdentifier)
            } else {
                s.missing(ErrorCode::E1004)
            };
            GreenNode::node(NodeKind::FieldIdentifier, vec![tilde, name])
        }
        TokenKind::Template => {
            let kw = s.bump();
            let name = if s.at(TokenKind::Identifier) {
                s.bump_as(NodeKind::FieldIdentifier).with_field(FieldName::Name)
            } else {
                s.missing(ErrorCode::E1004)
            };
            let args = types::parse_template_argument_list(s).with_field(FieldName::Arguments);
            GreenNode::node(NodeKind::TemplateMethod, vec![kw, name, args])
        }
        TokenKind::Identifier => {
            let name = s.bump_as(NodeKind::FieldIdentifier);
            if s.at(TokenKind::Lt) && s.speculation_depth() < MAX_SPECULATION {
                if let Some(args) = parse_template_args_speculative(s) {
                    return GreenNode::node(
                        NodeKind::TemplateMethod,
                        vec![
                            name.with_field(FieldName::Name),
                            args.with_field(FieldName::Arguments),
                        ],
                    );
                }
            }
            name
        }
        TokenKind::Operator => parse_operator_name(s),
        _ => s.missing(ErrorCode::E1004),
    }
}

/// Accept a template argument list only when it closes without error.
fn parse_template_args_speculative(s: &mut ParseSession<'_>) -> Option<GreenNode> {
    let cp = s.checkpoint();
    let args = types::parse_template_argument_list(s);
    if s.diagnostics_since(&cp) == 0 {
        Some(args)
    } else {
        s.rewind(cp);
        None
    }
}

pub(crate) fn parse_operator_name(s: &mut ParseSession<'_>) -> GreenNode {
    let kw = s.bump();
    let mut children = vec![kw];
    match s.peek() {
        TokenKind::LParen if s.peek_nth(1) == TokenKind::RParen => {
            children.push(s.bump());
            children.push(s.bump());
        }
        TokenKind::LBracket if s.peek_nth(1) == TokenKind::RBracket => {
            children.push(s.bump());
            children.push(s.bump());
        }
        TokenKind::New | TokenKind::Delete => {
            children.push(s.bump());
            if s.at(TokenKind::LBracket) && s.peek_nth(1) == TokenKind::RBracket {
                children.push(s.bump());
                children.push(s.bump());
            }
        }
        TokenKind::StringLiteral => {
            // `operator"" _suffix`
            children.push(s.bump());
            if s.at(TokenKind::Identifier) {
                children.push(s.bump());
            }
        }
        kind if is_overloadable_symbol(kind) => children.push(s.bump()),
        _ => children.push(s.missing(ErrorCode::E1004)),
    }
    GreenNode::node(NodeKind::OperatorName, children)
}

fn is_overloadable_symbol(kind: TokenKind) -> bool {
    kind.is_assignment_operator()
        || matches!(
            kind,
            TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Star
                | TokenKind::Slash
                | TokenKind::Percent
                | TokenKind::Caret
                | TokenKind::Amp
                | TokenKind::Pipe
                | TokenKind::Tilde
                | TokenKind::Bang
                | TokenKind::Lt
                | TokenKind::Gt
                | TokenKind::Shl
                | TokenKind::Shr
                | TokenKind::EqEq
                | TokenKind::BangEq
                | TokenKind::LtEq
                | TokenKind::GtEq
                | TokenKind::Spaceship
                | TokenKind::AmpAmp
                | TokenKind::PipePipe
                | TokenKind::PlusPlus
                | TokenKind::MinusMinus
                | TokenKind::Comma
                | TokenKind::Arrow
                | TokenKind::ArrowStar
                | TokenKind::And
                | TokenKind::Or
                | TokenKind::Not
                | TokenKind::Bitand
                | TokenKind::Bitor
                | TokenKind::Xor
                | TokenKind::Compl
        )
}

fn parse_sizeof(s: &mut ParseSession<'_>) -> GreenNode {
    let kw = s.bump();
    if s.at(TokenKind::Ellipsis) {
        let ellipsis = s.bump();
        let open = s.expect(TokenKind::LParen, ErrorCode::E1001);
        let name = if s.at(TokenKind::Identifier) {
            s.bump().with_field(FieldName::Value)
        } else {
            s.missing(ErrorCode::E1004)
        };
        let close = s.expect(TokenKind::RParen, ErrorCode::E1006);
        return GreenNode::node(
            NodeKind::SizeofExpression,
            vec![kw, ellipsis, open, name, close],
        );
    }
    if s.at(TokenKind::LParen) {
        let next = s.peek_nth(1);
        if types::can_start_type(next)
            && !matches!(next, TokenKind::Identifier | TokenKind::ColonColon)
        {
            let open = s.bump();
            let ty = types::parse_type_descriptor(s).with_field(FieldName::Type);
            let close = s.expect(TokenKind::RParen, ErrorCode::E1006);
            return GreenNode::node(NodeKind::SizeofExpression, vec![kw, open, ty, close]);
        }
        if matches!(next, TokenKind::Identifier | TokenKind::ColonColon)
            && s.speculation_depth() < MAX_SPECULATION
        {
            // `sizeof(T)` and `sizeof(x)` look alike; both readings run and
            // the type reading wins full ties.
            let operand = race(
                s,
                vec![
                    Candidate::new("type_specifier", 1, |s: &mut ParseSession<'_>| {
                        let open = s.bump();
                        let ty = types::parse_type_descriptor(s).with_field(FieldName::Type);
                        let close = s.expect(TokenKind::RParen, ErrorCode::E1006);
                        GreenNode::node(NodeKind::Token, vec![open, ty, close])
                    }),
                    Candidate::new("expression", 0, |s: &mut ParseSession<'_>| {
                        parse_expression_bp(s, prec::SIZEOF).with_field(FieldName::Value)
                    }),
                ],
            );
            let mut children = vec![kw];
            if operand.kind == NodeKind::Token {
                children.extend(operand.children);
            } else {
                children.push(operand);
            }
            return GreenNode::node(NodeKind::SizeofExpression, children);
        }
    }
    let value = parse_expression_bp(s, prec::SIZEOF).with_field(FieldName::Value);
    GreenNode::node(NodeKind::SizeofExpression, vec![kw, value])
}

fn parse_alignof(s: &mut ParseSession<'_>) -> GreenNode {
    let kw = s.bump();
    let open = s.expect(TokenKind::LParen, ErrorCode::E1001);
    let ty = types::parse_type_descriptor(s).with_field(FieldName::Type);
    let close = s.expect(TokenKind::RParen, ErrorCode::E1006);
    GreenNode::node(NodeKind::AlignofExpression, vec![kw, open, ty, close])
}

fn parse_typeid(s: &mut ParseSession<'_>) -> GreenNode {
    let kw = s.bump();
    let open = s.expect(TokenKind::LParen, ErrorCode::E1001);
    let kind = s.peek();
    let inner = if types::can_start_type(kind)
        && !matches!(kind, TokenKind::Identifier | TokenKind::ColonColon)
    {
        types::parse_type_descriptor(s).with_field(FieldName::Type)
    } else {
        parse_comma_expression(s).with_field(FieldName::Value)
    };
    let close = s.expect(TokenKind::RParen, ErrorCode::E1006);
    GreenNode::node(NodeKind::TypeidExpression, vec![kw, open, inner, close])
}

fn parse_keyword_cast(s: &mut ParseSession<'_>) -> GreenNode {
    let kind = match s.peek() {
        TokenKind::StaticCast => NodeKind::StaticCastExpression,
        TokenKind::DynamicCast => NodeKind::DynamicCastExpression,
        TokenKind::ConstCast => NodeKind::ConstCastExpression,
        _ => NodeKind::ReinterpretCastExpression,
    };
    let kw = s.bump();
    let saved = s.ctx;
    s.ctx |= ParseContext::TEMPLATE_ARGS;
    let lt = s.expect(TokenKind::Lt, ErrorCode::E1001);
    let ty = types::parse_type_descriptor(s).with_field(FieldName::Type);
    let gt = match s.peek() {
        TokenKind::Gt => s.bump(),
        TokenKind::Shr => s.split_shr(),
        _ => s.missing(ErrorCode::E1006),
    };
    s.ctx = saved;
    let open = s.expect(TokenKind::LParen, ErrorCode::E1001);
    let value = parse_comma_expression(s).with_field(FieldName::Value);
    let close = s.expect(TokenKind::RParen, ErrorCode::E1006);
    GreenNode::node(kind, vec![kw, lt, ty, gt, open, value, close])
}

fn parse_new_expression(s: &mut ParseSession<'_>, scope: Option<GreenNode>) -> GreenNode {
    let mut children = Vec::new();
    if let Some(scope) = scope {
        children.push(scope);
    }
    children.push(s.bump());
    if s.at(TokenKind::LParen) {
        // Placement arguments only if a type follows the closing paren.
        let cp = s.checkpoint();
        let args = parse_argument_list(s);
        if types::can_start_type(s.peek()) && s.diagnostics_since(&cp) == 0 {
            children.push(args.with_field(FieldName::Placement));
        } else {
            s.rewind(cp);
        }
    }
    if s.at(TokenKind::LParen) {
        children.push(s.bump());
        children.push(types::parse_type_descriptor(s).with_field(FieldName::Type));
        children.push(s.expect(TokenKind::RParen, ErrorCode::E1006));
    } else {
        children.push(types::parse_type_specifier(s).with_field(FieldName::Type));
        while matches!(s.peek(), TokenKind::Star | TokenKind::Amp) {
            children.push(GreenNode::node(
                NodeKind::AbstractPointerDeclarator,
                vec![s.bump()],
            ));
        }
        while s.at(TokenKind::LBracket) {
            let open = s.bump();
            let mut parts = vec![open];
            if !s.at(TokenKind::RBracket) {
                parts.push(parse_expression(s).with_field(FieldName::Size));
            }
            parts.push(s.expect(TokenKind::RBracket, ErrorCode::E1006));
            children.push(GreenNode::node(NodeKind::NewDeclarator, parts));
        }
    }
    if s.at(TokenKind::LParen) {
        children.push(parse_argument_list(s).with_field(FieldName::Arguments));
    } else if s.at(TokenKind::LBrace) {
        children.push(parse_initializer_list(s).with_field(FieldName::Arguments));
    }
    GreenNode::node(NodeKind::NewExpression, children)
}

fn parse_delete_expression(s: &mut ParseSession<'_>, scope: Option<GreenNode>) -> GreenNode {
    let mut children = Vec::new();
    if let Some(scope) = scope {
        children.push(scope);
    }
    children.push(s.bump());
    if s.at(TokenKind::LBracket) {
        children.push(s.bump());
        children.push(s.expect(TokenKind::RBracket, ErrorCode::E1006));
    }
    children.push(parse_expression_bp(s, prec::UNARY).with_field(FieldName::Value));
    GreenNode::node(NodeKind::DeleteExpression, children)
}

/// `(` in expression position: parenthesized expression, fold expression,
/// or C-style cast.
fn parse_paren_expression(s: &mut ParseSession<'_>) -> GreenNode {
    let next = s.peek_nth(1);
    if types::can_start_type(next)
        && !matches!(next, TokenKind::Identifier | TokenKind::ColonColon)
    {
        return parse_cast(s);
    }
    let cp = s.checkpoint();
    let open = s.bump();
    if s.at(TokenKind::Ellipsis) {
        // `(... op pack)` unary left fold.
        let ellipsis = s.bump();
        let opn = if is_fold_operator(s.peek()) {
            s.bump()
        } else {
            s.missing(ErrorCode::E1001)
        };
        let value = parse_expression(s).with_field(FieldName::Right);
        let close = s.expect(TokenKind::RParen, ErrorCode::E1006);
        return GreenNode::node(
            NodeKind::FoldExpression,
            vec![open, ellipsis, opn.with_field(FieldName::Operator), value, close],
        );
    }
    let first = parse_expression(s);
    if is_fold_operator(s.peek()) && s.peek_nth(1) == TokenKind::Ellipsis {
        let op1 = s.bump().with_field(FieldName::Operator);
        let ellipsis = s.bump();
        if s.at(TokenKind::RParen) {
            // `(pack op ...)` unary right fold.
            let close = s.bump();
            return GreenNode::node(
                NodeKind::FoldExpression,
                vec![open, first.with_field(FieldName::Left), op1, ellipsis, close],
            );
        }
        let op2 = if is_fold_operator(s.peek()) {
            s.bump()
        } else {
            s.missing(ErrorCode::E1001)
        };
        let second = parse_expression(s).with_field(FieldName::Right);
        let close = s.expect(TokenKind::RParen, ErrorCode::E1006);
        return GreenNode::node(
            NodeKind::FoldExpression,
            vec![
                open,
                first.with_field(FieldName::Left),
                op1,
                ellipsis,
                op2,
                second,
                close,
            ],
        );
    }
    let mut expr = first;
    while s.at(TokenKind::Comma) {
        let comma = s.bump();
        let right = parse_expression(s);
        expr = GreenNode::node(
            NodeKind::CommaExpression,
            vec![
                expr.with_field(FieldName::Left),
                comma,
                right.with_field(FieldName::Right),
            ],
        );
    }
    let close = s.expect(TokenKind::RParen, ErrorCode::E1006);
    // `(name)operand` with nothing to continue the arithmetic reading is a
    // cast after all; reparse from the open paren.
    if is_plain_name(&expr) && starts_cast_operand(s.peek()) && s.speculation_depth() < MAX_SPECULATION
    {
        s.rewind(cp);
        return parse_cast(s);
    }
    GreenNode::node(NodeKind::ParenthesizedExpression, vec![open, expr, close])
}

fn is_plain_name(node: &GreenNode) -> bool {
    matches!(
        node.kind,
        NodeKind::Identifier | NodeKind::QualifiedIdentifier
    )
}

/// Tokens that can follow `(T)` only under the cast reading.
fn starts_cast_operand(kind: TokenKind) -> bool {
    kind.is_literal()
        || matches!(
            kind,
            TokenKind::Identifier
                | TokenKind::This
                | TokenKind::Bang
                | TokenKind::Not
                | TokenKind::Sizeof
                | TokenKind::New
                | TokenKind::Delete
        )
}

fn parse_cast(s: &mut ParseSession<'_>) -> GreenNode {
    let open = s.bump();
    let ty = types::parse_type_descriptor(s).with_field(FieldName::Type);
    let close = s.expect(TokenKind::RParen, ErrorCode::E1006);
    let value = parse_expression_bp(s, prec::CAST).with_field(FieldName::Value);
    GreenNode::node(NodeKind::CastExpression, vec![open, ty, close, value])
}

fn parse_lambda(s: &mut ParseSession<'_>) -> GreenNode {
    let captures = parse_capture_specifier(s).with_field(FieldName::Captures);
    let mut children = vec![captures];
    if s.at(TokenKind::Lt) {
        children.push(
            items::parse_template_parameter_list(s).with_field(FieldName::TemplateParameters),
        );
    }
    if s.at(TokenKind::LParen) {
        children.push(decls::parse_parameter_list(s).with_field(FieldName::Parameters));
    }
    loop {
        match s.peek() {
            TokenKind::Mutable | TokenKind::Constexpr | TokenKind::Consteval => {
                children.push(s.bump());
            }
            TokenKind::Noexcept => children.push(parse_noexcept_specifier(s)),
            _ => break,
        }
    }
    if s.at(TokenKind::Arrow) {
        children.push(s.bump());
        children.push(types::parse_type_descriptor(s).with_field(FieldName::Type));
    }
    if s.at(TokenKind::Requires) {
        children.push(parse_requires_clause(s));
    }
    let body = if s.at(TokenKind::LBrace) {
        stmts::parse_compound_statement(s)
    } else {
        s.missing(ErrorCode::E1001)
    };
    children.push(body.with_field(FieldName::Body));
    GreenNode::node(NodeKind::LambdaExpression, children)
}

pub(crate) fn parse_noexcept_specifier(s: &mut ParseSession<'_>) -> GreenNode {
    let kw = s.bump();
    let mut children = vec![kw];
    if s.at(TokenKind::LParen) {
        children.push(s.bump());
        children.push(parse_expression(s).with_field(FieldName::Value));
        children.push(s.expect(TokenKind::RParen, ErrorCode::E1006));
    }
    GreenNode::node(NodeKind::NoexceptSpecifier, children)
}

fn parse_capture_specifier(s: &mut ParseSession<'_>) -> GreenNode {
    let mut children = vec![s.bump()];
    if matches!(s.peek(), TokenKind::Assign | TokenKind::Amp)
        && matches!(s.peek_nth(1), TokenKind::Comma | TokenKind::RBracket)
    {
        children.push(GreenNode::node(NodeKind::LambdaDefaultCapture, vec![s.bump()]));
        if s.at(TokenKind::Comma) {
            children.push(s.bump());
        }
    }
    while !s.at(TokenKind::RBracket) && !s.at_eof() {
        if s.at(TokenKind::Amp) {
            children.push(s.bump());
        }
        if s.at(TokenKind::Star) {
            children.push(s.bump());
        }
        match s.peek() {
            TokenKind::This => children.push(s.bump()),
            TokenKind::Identifier => {
                children.push(s.bump());
                if s.at(TokenKind::Ellipsis) {
                    children.push(s.bump());
                }
                if s.at(TokenKind::Assign) {
                    children.push(s.bump());
                    children.push(parse_expression(s).with_field(FieldName::Value));
                }
            }
            _ => {
                children.push(s.missing(ErrorCode::E1011));
                if !s.at(TokenKind::Comma) {
                    break;
                }
            }
        }
        if s.at(TokenKind::Comma) {
            children.push(s.bump());
        } else {
            break;
        }
    }
    children.push(s.expect(TokenKind::RBracket, ErrorCode::E1006));
    GreenNode::node(NodeKind::LambdaCaptureSpecifier, children)
}

/// `requires` followed by a constraint expression, as used after template
/// parameter lists and function declarators.
pub(crate) fn parse_requires_clause(s: &mut ParseSession<'_>) -> GreenNode {
    let kw = s.bump();
    let constraint = parse_expression_bp(s, prec::LOGICAL_OR).with_field(FieldName::Constraint);
    GreenNode::node(NodeKind::RequiresClause, vec![kw, constraint])
}

fn parse_requires_expression(s: &mut ParseSession<'_>) -> GreenNode {
    let kw = s.bump();
    let mut children = vec![kw];
    if s.at(TokenKind::LParen) {
        children.push(decls::parse_parameter_list(s).with_field(FieldName::Parameters));
    }
    children.push(parse_requirement_list(s).with_field(FieldName::Requirements));
    GreenNode::node(NodeKind::RequiresExpression, children)
}

fn parse_requirement_list(s: &mut ParseSession<'_>) -> GreenNode {
    let mut children = vec![s.expect(TokenKind::LBrace, ErrorCode::E1001)];
    let saved = s.ctx;
    s.ctx |= ParseContext::REQUIREMENT;
    while !s.at(TokenKind::RBrace) && !s.at_eof() && !s.is_cancelled() {
        let before = s.checkpoint();
        children.push(parse_requirement(s));
        if s.consumed_since(&before) == 0 {
            // No progress on this token; skip it so the list terminates.
            children.push(s.bump_as(NodeKind::ErrorNode));
        }
    }
    s.ctx = saved;
    children.push(s.expect(TokenKind::RBrace, ErrorCode::E1006));
    GreenNode::node(NodeKind::RequirementList, children)
}

fn parse_requirement(s: &mut ParseSession<'_>) -> GreenNode {
    match s.peek() {
        TokenKind::Semicolon => s.bump(),
        TokenKind::Typename => {
            let kw = s.bump();
            let name = types::parse_named_type(s).with_field(FieldName::Type);
            let semi = s.expect(TokenKind::Semicolon, ErrorCode::E1001);
            GreenNode::node(NodeKind::TypeRequirement, vec![kw, name, semi])
        }
        TokenKind::LBrace => {
            let open = s.bump();
            let value = parse_expression(s).with_field(FieldName::Value);
            let close = s.expect(TokenKind::RBrace, ErrorCode::E1006);
            let mut children = vec![open, value, close];
            if s.at(TokenKind::Noexcept) {
                children.push(s.bump());
            }
            if s.at(TokenKind::Arrow) {
                children.push(s.bump());
                children.push(types::parse_type_descriptor(s).with_field(FieldName::Type));
            }
            children.push(s.expect(TokenKind::Semicolon, ErrorCode::E1001));
            GreenNode::node(NodeKind::CompoundRequirement, children)
        }
        TokenKind::Requires => {
            let clause = parse_requires_clause(s);
            let semi = s.expect(TokenKind::Semicolon, ErrorCode::E1001);
            GreenNode::node(NodeKind::SimpleRequirement, vec![clause, semi])
        }
        kind if can_start_expression(kind) => {
            let value = parse_expression(s).with_field(FieldName::Value);
            let semi = s.expect(TokenKind::Semicolon, ErrorCode::E1001);
            GreenNode::node(
                NodeKind::ExpressionStatementAsRequirement,
                vec![value, semi],
            )
        }
        _ => s.missing(ErrorCode::E1012),
    }
}

/// `( expr, expr, ... )` call arguments; braced items admitted.
pub(crate) fn parse_argument_list(s: &mut ParseSession<'_>) -> GreenNode {
    let mut children = vec![s.expect(TokenKind::LParen, ErrorCode::E1001)];
    if !s.at(TokenKind::RParen) && !s.at_eof() {
        loop {
            let item = if s.at(TokenKind::LBrace) {
                parse_initializer_list(s)
            } else {
                parse_expression(s)
            };
            let item = if s.at(TokenKind::Ellipsis) {
                GreenNode::node(
                    NodeKind::ParameterPackExpansion,
                    vec![item.with_field(FieldName::Pattern), s.bump()],
                )
            } else {
                item
            };
            children.push(item.with_field(FieldName::Argument));
            if s.at(TokenKind::Comma) {
                children.push(s.bump());
            } else {
                break;
            }
        }
    }
    children.push(s.expect(TokenKind::RParen, ErrorCode::E1006));
    GreenNode::node(NodeKind::ArgumentList, children)
}

/// `{ ... }` braced initializer, nested braces and trailing comma admitted.
pub(crate) fn parse_initializer_list(s: &mut ParseSession<'_>) -> GreenNode {
    let mut children = vec![s.bump()];
    while !s.at(TokenKind::RBrace) && !s.at_eof() {
        let item = if s.at(TokenKind::LBrace) {
            parse_initializer_list(s)
        } else if can_start_expression(s.peek()) {
            parse_expression(s)
        } else {
            break;
        };
        let item = if s.at(TokenKind::Ellipsis) {
            GreenNode::node(
                NodeKind::ParameterPackExpansion,
                vec![item.with_field(FieldName::Pattern), s.bump()],
            )
        } else {
            item
        };
        children.push(item);
        if s.at(TokenKind::Comma) {
            children.push(s.bump());
        } else {
            break;
        }
    }
    children.push(s.expect(TokenKind::RBrace, ErrorCode::E1006));
    GreenNode::node(NodeKind::InitializerList, children)
}

fn parse_raw_string(s: &mut ParseSession<'_>) -> GreenNode {
    let mut children = vec![s.bump().with_field(FieldName::Delimiter)];
    if s.at(TokenKind::RawStringContent) {
        children.push(s.bump().with_field(FieldName::Value));
    }
    if s.at(TokenKind::RawStringDelimiter) {
        children.push(s.bump().with_field(FieldName::Delimiter));
    }
    GreenNode::node(NodeKind::RawStringLiteral, children)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::tests_support::with_session;
    use pretty_assertions::assert_eq;

    fn field_kind(node: &GreenNode, field: FieldName) -> Option<NodeKind> {
        node.children
            .iter()
            .find(|c| c.field == Some(field))
            .map(|c| c.kind)
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        with_session("a + b * c", |s| {
            let node = parse_expression(s);
            assert_eq!(node.kind, NodeKind::BinaryExpression);
            assert_eq!(field_kind(&node, FieldName::Left), Some(NodeKind::Identifier));
            assert_eq!(
                field_kind(&node, FieldName::Right),
                Some(NodeKind::BinaryExpression)
            );
        });
    }

    #[test]
    fn assignment_is_right_associative() {
        with_session("a = b = c", |s| {
            let node = parse_expression(s);
            assert_eq!(node.kind, NodeKind::AssignmentExpression);
            assert_eq!(
                field_kind(&node, FieldName::Right),
                Some(NodeKind::AssignmentExpression)
            );
        });
    }

    #[test]
    fn template_call_wins_when_arguments_close() {
        with_session("f<int>(x)", |s| {
            let node = parse_expression(s);
            assert_eq!(node.kind, NodeKind::CallExpression);
            assert_eq!(
                field_kind(&node, FieldName::Function),
                Some(NodeKind::TemplateFunction)
            );
            assert!(s.at_eof());
            assert!(s.diagnostics.is_empty());
        });
    }

    #[test]
    fn chained_comparison_wins_on_consumption() {
        with_session("a<b>c", |s| {
            let node = parse_expression(s);
            // ((a < b) > c), not a template.
            assert_eq!(node.kind, NodeKind::BinaryExpression);
            assert_eq!(
                field_kind(&node, FieldName::Left),
                Some(NodeKind::BinaryExpression)
            );
            assert!(s.at_eof());
        });
    }

    #[test]
    fn unary_right_fold_tags_the_pack_left() {
        with_session("(args + ...)", |s| {
            let node = parse_expression(s);
            assert_eq!(node.kind, NodeKind::FoldExpression);
            assert_eq!(field_kind(&node, FieldName::Left), Some(NodeKind::Identifier));
            assert_eq!(field_kind(&node, FieldName::Right), None);
        });
    }

    #[test]
    fn unary_left_fold_tags_the_pack_right() {
        with_session("(... + args)", |s| {
            let node = parse_expression(s);
            assert_eq!(node.kind, NodeKind::FoldExpression);
            assert_eq!(field_kind(&node, FieldName::Right), Some(NodeKind::Identifier));
            assert_eq!(field_kind(&node, FieldName::Left), None);
        });
    }

    #[test]
    fn binary_fold_keeps_both_operands() {
        with_session("(0 + ... + args)", |s| {
            let node = parse_expression(s);
            assert_eq!(node.kind, NodeKind::FoldExpression);
            assert_eq!(
                field_kind(&node, FieldName::Left),
                Some(NodeKind::NumberLiteral)
            );
            assert_eq!(field_kind(&node, FieldName::Right), Some(NodeKind::Identifier));
        });
    }

    #[test]
    fn pointer_to_member_binds_below_unary() {
        with_session("-a.*b", |s| {
            let node = parse_expression(s);
            // ((-a) .* b), unary first.
            assert_eq!(node.kind, NodeKind::BinaryExpression);
            assert_eq!(
                field_kind(&node, FieldName::Left),
                Some(NodeKind::UnaryExpression)
            );
            assert_eq!(field_kind(&node, FieldName::Right), Some(NodeKind::Identifier));
            assert!(s.diagnostics.is_empty());
        });
    }

    #[test]
    fn pointer_to_member_operand_absorbs_a_call() {
        with_session("a->*f()", |s| {
            let node = parse_expression(s);
            // (a ->* (f())), call first.
            assert_eq!(node.kind, NodeKind::BinaryExpression);
            assert_eq!(field_kind(&node, FieldName::Left), Some(NodeKind::Identifier));
            assert_eq!(
                field_kind(&node, FieldName::Right),
                Some(NodeKind::CallExpression)
            );
        });
    }

    #[test]
    fn pointer_to_member_is_left_associative() {
        with_session("a.*b.*c", |s| {
            let node = parse_expression(s);
            assert_eq!(node.kind, NodeKind::BinaryExpression);
            assert_eq!(
                field_kind(&node, FieldName::Left),
                Some(NodeKind::BinaryExpression)
            );
            assert_eq!(field_kind(&node, FieldName::Right), Some(NodeKind::Identifier));
        });
    }

    #[test]
    fn alternative_spelling_makes_a_fold() {
        with_session("(t or ...)", |s| {
            let node = parse_expression(s);
            assert_eq!(node.kind, NodeKind::FoldExpression);
            assert_eq!(field_kind(&node, FieldName::Left), Some(NodeKind::Identifier));
            assert!(s.diagnostics.is_empty());
        });
        with_session("(true and ... and t)", |s| {
            let node = parse_expression(s);
            assert_eq!(node.kind, NodeKind::FoldExpression);
            assert_eq!(field_kind(&node, FieldName::Right), Some(NodeKind::Identifier));
            assert!(s.diagnostics.is_empty());
        });
    }

    #[test]
    fn sizeof_prefers_the_type_reading_on_a_tie() {
        with_session("sizeof(T)", |s| {
            let node = parse_expression(s);
            assert_eq!(node.kind, NodeKind::SizeofExpression);
            assert_eq!(field_kind(&node, FieldName::Type), Some(NodeKind::TypeDescriptor));
        });
    }

    #[test]
    fn conditional_collects_all_three_arms() {
        with_session("a ? b : c", |s| {
            let node = parse_expression(s);
            assert_eq!(node.kind, NodeKind::ConditionalExpression);
            assert_eq!(
                field_kind(&node, FieldName::Condition),
                Some(NodeKind::Identifier)
            );
            assert_eq!(
                field_kind(&node, FieldName::Alternative),
                Some(NodeKind::Identifier)
            );
        });
    }

    #[test]
    fn keyword_cast_splits_a_closing_shift() {
        with_session("static_cast<vector<int>>(x)", |s| {
            let node = parse_expression(s);
            assert_eq!(node.kind, NodeKind::StaticCastExpression);
            assert!(s.at_eof());
            assert!(s.diagnostics.is_empty());
        });
    }

    #[test]
    fn new_with_placement_arguments() {
        with_session("new (buf) int(5)", |s| {
            let node = parse_expression(s);
            assert_eq!(node.kind, NodeKind::NewExpression);
            assert_eq!(
                field_kind(&node, FieldName::Placement),
                Some(NodeKind::ArgumentList)
            );
            assert_eq!(
                field_kind(&node, FieldName::Arguments),
                Some(NodeKind::ArgumentList)
            );
        });
    }

    #[test]
    fn member_template_requires_a_closing_angle() {
        with_session("obj.get<int>()", |s| {
            let node = parse_expression(s);
            assert_eq!(node.kind, NodeKind::CallExpression);
            let field = node
                .children
                .iter()
                .find(|c| c.field == Some(FieldName::Function))
                .unwrap();
            assert_eq!(field.kind, NodeKind::FieldExpression);
            assert_eq!(
                field_kind(field, FieldName::Field),
                Some(NodeKind::TemplateMethod)
            );
        });
    }

    #[test]
    fn member_comparison_stays_a_comparison() {
        with_session("obj.count < 3", |s| {
            let node = parse_expression(s);
            assert_eq!(node.kind, NodeKind::BinaryExpression);
            assert_eq!(
                field_kind(&node, FieldName::Left),
                Some(NodeKind::FieldExpression)
            );
        });
    }

    #[test]
    fn missing_operand_is_reported_not_panicked() {
        with_session("a + ;", |s| {
            let node = parse_expression(s);
            assert_eq!(node.kind, NodeKind::BinaryExpression);
            assert_eq!(field_kind(&node, FieldName::Right), Some(NodeKind::Missing));
            assert_eq!(s.diagnostics.len(), 1);
            assert_eq!(s.diagnostics[0].code, ErrorCode::E1002);
        });
    }
}
