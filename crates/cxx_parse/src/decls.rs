//! Declarations, declarators, and parameter lists.
//!
//! Declarator parsing leans toward the declaration reading where C++ is
//! ambiguous: a parenthesized group after a declarator name is a parameter
//! list whenever its first token could open a type. The expression reading
//! gets its chance in the statement-level race, not here.

use crate::context::ParseContext;
use crate::exprs;
use crate::green::GreenNode;
use crate::session::ParseSession;
use crate::token_set::GROUP_SYNC;
use crate::{stmts, types};
use cxx_diagnostic::ErrorCode;
use cxx_ir::{FieldName, NodeKind, TokenKind};

/// Tokens that commit to a declaration with no ambiguity.
pub(crate) fn can_start_declaration(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Const
            | TokenKind::Volatile
            | TokenKind::Constexpr
            | TokenKind::Consteval
            | TokenKind::Constinit
            | TokenKind::Static
            | TokenKind::Extern
            | TokenKind::Inline
            | TokenKind::ThreadLocal
            | TokenKind::Mutable
            | TokenKind::Virtual
            | TokenKind::Explicit
            | TokenKind::Struct
            | TokenKind::Class
            | TokenKind::Union
            | TokenKind::Enum
            | TokenKind::Signed
            | TokenKind::Unsigned
            | TokenKind::Short
            | TokenKind::Long
            | TokenKind::PrimitiveType
            | TokenKind::Auto
            | TokenKind::Decltype
            | TokenKind::Typename
            | TokenKind::Alignas
    )
}

/// Leading specifiers and exactly one type specifier, in any order C++
/// permits. A run with no type at all gets a missing marker.
pub(crate) fn parse_declaration_specifiers(s: &mut ParseSession<'_>) -> Vec<GreenNode> {
    let mut specs = Vec::new();
    let mut have_type = false;
    loop {
        match s.peek() {
            TokenKind::Const | TokenKind::Volatile => {
                specs.push(GreenNode::node(NodeKind::TypeQualifier, vec![s.bump()]));
            }
            TokenKind::Constexpr
            | TokenKind::Consteval
            | TokenKind::Constinit
            | TokenKind::Static
            | TokenKind::Extern
            | TokenKind::Inline
            | TokenKind::ThreadLocal
            | TokenKind::Mutable => {
                specs.push(GreenNode::node(
                    NodeKind::StorageClassSpecifier,
                    vec![s.bump()],
                ));
            }
            TokenKind::Virtual => {
                specs.push(GreenNode::node(NodeKind::VirtualSpecifier, vec![s.bump()]));
            }
            TokenKind::Explicit => {
                let kw = s.bump();
                let mut parts = vec![kw];
                if s.at(TokenKind::LParen) {
                    parts.push(s.bump());
                    parts.push(exprs::parse_expression(s).with_field(FieldName::Value));
                    parts.push(s.expect(TokenKind::RParen, ErrorCode::E1006));
                }
                specs.push(GreenNode::node(NodeKind::ExplicitFunctionSpecifier, parts));
            }
            TokenKind::Alignas => {
                let kw = s.bump();
                let open = s.expect(TokenKind::LParen, ErrorCode::E1001);
                let inner = if types::can_start_type(s.peek())
                    && !matches!(s.peek(), TokenKind::Identifier | TokenKind::ColonColon)
                {
                    types::parse_type_descriptor(s).with_field(FieldName::Type)
                } else {
                    exprs::parse_expression(s).with_field(FieldName::Value)
                };
                let close = s.expect(TokenKind::RParen, ErrorCode::E1006);
                specs.push(GreenNode::node(
                    NodeKind::AttributeSpecifier,
                    vec![kw, open, inner, close],
                ));
            }
            TokenKind::LBracket if s.peek_nth(1) == TokenKind::LBracket => {
                specs.push(parse_attribute_specifier(s));
            }
            kind if types::can_start_type(kind) && !have_type => {
                specs.push(types::parse_type_specifier(s).with_field(FieldName::Type));
                have_type = true;
            }
            _ => break,
        }
    }
    if !have_type {
        specs.push(s.missing(ErrorCode::E1005));
    }
    specs
}

/// `[[attr, ns::attr(args)]]`
pub(crate) fn parse_attribute_specifier(s: &mut ParseSession<'_>) -> GreenNode {
    let mut children = vec![s.bump(), s.expect(TokenKind::LBracket, ErrorCode::E1001)];
    while !s.at(TokenKind::RBracket) && !s.at_eof() {
        match s.peek() {
            TokenKind::Identifier => {
                let mut parts = vec![s.bump()];
                while s.at(TokenKind::ColonColon) {
                    parts.push(s.bump());
                    if s.at(TokenKind::Identifier) {
                        parts.push(s.bump());
                    }
                }
                if s.at(TokenKind::LParen) {
                    parts.push(exprs::parse_argument_list(s));
                }
                children.push(GreenNode::node(NodeKind::Attribute, parts));
            }
            TokenKind::Comma => children.push(s.bump()),
            _ => children.push(s.bump_as(NodeKind::ErrorNode)),
        }
    }
    children.push(s.expect(TokenKind::RBracket, ErrorCode::E1006));
    children.push(s.expect(TokenKind::RBracket, ErrorCode::E1006));
    GreenNode::node(NodeKind::AttributeSpecifier, children)
}

pub(crate) fn can_start_declarator(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Star
            | TokenKind::Amp
            | TokenKind::AmpAmp
            | TokenKind::Identifier
            | TokenKind::ColonColon
            | TokenKind::Operator
            | TokenKind::Tilde
            | TokenKind::LParen
            | TokenKind::LBracket
    )
}

pub(crate) fn parse_declarator(s: &mut ParseSession<'_>) -> GreenNode {
    match s.peek() {
        TokenKind::Star => {
            let op = s.bump();
            let mut children = vec![op];
            while matches!(s.peek(), TokenKind::Const | TokenKind::Volatile) {
                children.push(GreenNode::node(NodeKind::TypeQualifier, vec![s.bump()]));
            }
            children.push(parse_declarator(s).with_field(FieldName::Declarator));
            GreenNode::node(NodeKind::PointerDeclarator, children)
        }
        TokenKind::Amp | TokenKind::AmpAmp => {
            let op = s.bump();
            let inner = parse_declarator(s).with_field(FieldName::Declarator);
            GreenNode::node(NodeKind::ReferenceDeclarator, vec![op, inner])
        }
        TokenKind::LBracket => parse_structured_binding(s),
        TokenKind::LParen => {
            let open = s.bump();
            let inner = parse_declarator(s).with_field(FieldName::Declarator);
            let close = s.expect(TokenKind::RParen, ErrorCode::E1006);
            let decl = GreenNode::node(NodeKind::ParenthesizedDeclarator, vec![open, inner, close]);
            parse_declarator_suffixes(s, decl)
        }
        TokenKind::Identifier | TokenKind::ColonColon | TokenKind::Operator | TokenKind::Tilde => {
            let name = parse_declarator_name(s);
            parse_declarator_suffixes(s, name)
        }
        _ => s.missing(ErrorCode::E1003),
    }
}

/// `x`, `ns::x`, `operator+`, `~T`, `f<T>`.
fn parse_declarator_name(s: &mut ParseSession<'_>) -> GreenNode {
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
                if s.at(TokenKind::Lt) && !parts.is_empty() {
                    if let Some(args) = speculative_template_arguments(s) {
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
                parts.push(exprs::parse_operator_name(s));
                break;
            }
            TokenKind::Tilde => {
                let tilde = s.bump();
                let id = if s.at(TokenKind::Identifier) {
                    s.bump_as(NodeKind::TypeIdentifier)
                } else {
                    s.missing(ErrorCode::E1004)
                };
                parts.push(GreenNode::node(NodeKind::Identifier, vec![tilde, id]));
                break;
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

fn speculative_template_arguments(s: &mut ParseSession<'_>) -> Option<GreenNode> {
    let cp = s.checkpoint();
    let args = types::parse_template_argument_list(s);
    if s.diagnostics_since(&cp) == 0 {
        Some(args)
    } else {
        s.rewind(cp);
        None
    }
}

fn parse_structured_binding(s: &mut ParseSession<'_>) -> GreenNode {
    let mut children = vec![s.bump()];
    while !s.at(TokenKind::RBracket) && !s.at_eof() {
        if s.at(TokenKind::Identifier) {
            children.push(s.bump());
        } else {
            children.push(s.missing(ErrorCode::E1004));
            if !s.at(TokenKind::Comma) {
                break;
            }
        }
        if s.at(TokenKind::Comma) {
            children.push(s.bump());
        } else {
            break;
        }
    }
    children.push(s.expect(TokenKind::RBracket, ErrorCode::E1006));
    GreenNode::node(NodeKind::StructuredBindingDeclarator, children)
}

/// Function and array suffixes, applied greedily.
fn parse_declarator_suffixes(s: &mut ParseSession<'_>, mut decl: GreenNode) -> GreenNode {
    loop {
        match s.peek() {
            TokenKind::LParen if paren_opens_parameters(s) => {
                let params = parse_parameter_list(s).with_field(FieldName::Parameters);
                let mut children = vec![decl.with_field(FieldName::Declarator), params];
                loop {
                    match s.peek() {
                        TokenKind::Const | TokenKind::Volatile => {
                            children
                                .push(GreenNode::node(NodeKind::TypeQualifier, vec![s.bump()]));
                        }
                        TokenKind::Amp | TokenKind::AmpAmp => {
                            children.push(GreenNode::node(NodeKind::RefQualifier, vec![s.bump()]));
                        }
                        TokenKind::Noexcept => {
                            children.push(exprs::parse_noexcept_specifier(s));
                        }
                        TokenKind::Override | TokenKind::Final => {
                            children
                                .push(GreenNode::node(NodeKind::VirtualSpecifier, vec![s.bump()]));
                        }
                        _ => break,
                    }
                }
                if s.at(TokenKind::Arrow) {
                    children.push(s.bump());
                    children.push(types::parse_type_descriptor(s).with_field(FieldName::Type));
                }
                if s.at(TokenKind::Requires) {
                    children.push(exprs::parse_requires_clause(s));
                }
                decl = GreenNode::node(NodeKind::FunctionDeclarator, children);
            }
            TokenKind::LBracket if s.peek_nth(1) != TokenKind::LBracket => {
                let open = s.bump();
                let mut children = vec![decl.with_field(FieldName::Declarator), open];
                if !s.at(TokenKind::RBracket) {
                    children.push(exprs::parse_expression(s).with_field(FieldName::Size));
                }
                children.push(s.expect(TokenKind::RBracket, ErrorCode::E1006));
                decl = GreenNode::node(NodeKind::ArrayDeclarator, children);
            }
            _ => break,
        }
    }
    decl
}

/// A paren after a declarator name reads as a parameter list when its first
/// token could open a parameter declaration. `x(5)` stays an initializer.
fn paren_opens_parameters(s: &ParseSession<'_>) -> bool {
    let next = s.peek_nth(1);
    next == TokenKind::RParen
        || next == TokenKind::Ellipsis
        || types::can_start_type(next)
        || can_start_declaration(next)
}

/// Declarator plus optional initializer.
pub(crate) fn parse_init_declarator(s: &mut ParseSession<'_>) -> GreenNode {
    let decl = parse_declarator(s);
    match s.peek() {
        // `= default` and `= delete` belong to the enclosing declaration.
        TokenKind::Assign
            if !matches!(s.peek_nth(1), TokenKind::Default | TokenKind::Delete) =>
        {
            let eq = s.bump();
            let value = if s.at(TokenKind::LBrace) {
                exprs::parse_initializer_list(s)
            } else if exprs::can_start_expression(s.peek()) {
                exprs::parse_expression(s)
            } else {
                s.missing(ErrorCode::E1007)
            };
            GreenNode::node(
                NodeKind::InitDeclarator,
                vec![
                    decl.with_field(FieldName::Declarator),
                    eq,
                    value.with_field(FieldName::Value),
                ],
            )
        }
        TokenKind::LBrace if !has_function_declarator(&decl) => {
            let value = exprs::parse_initializer_list(s).with_field(FieldName::Value);
            GreenNode::node(
                NodeKind::InitDeclarator,
                vec![decl.with_field(FieldName::Declarator), value],
            )
        }
        TokenKind::LParen if !has_function_declarator(&decl) => {
            let value = exprs::parse_argument_list(s).with_field(FieldName::Value);
            GreenNode::node(
                NodeKind::InitDeclarator,
                vec![decl.with_field(FieldName::Declarator), value],
            )
        }
        _ => decl,
    }
}

pub(crate) fn has_function_declarator(node: &GreenNode) -> bool {
    if node.kind == NodeKind::FunctionDeclarator {
        return true;
    }
    matches!(
        node.kind,
        NodeKind::PointerDeclarator
            | NodeKind::ReferenceDeclarator
            | NodeKind::ParenthesizedDeclarator
    ) && node.children.iter().any(has_function_declarator)
}

/// Specifiers, declarators, and either a body or a `;`.
///
/// Inside a class body a brace-bodied function becomes an inline method
/// definition and a trailing `: width` becomes a bitfield.
pub(crate) fn parse_declaration_or_function(s: &mut ParseSession<'_>) -> GreenNode {
    let mut children = parse_declaration_specifiers(s);
    if s.at(TokenKind::Semicolon) {
        children.push(s.bump());
        return GreenNode::node(NodeKind::Declaration, children);
    }
    let in_class = s.ctx.contains(ParseContext::CLASS_BODY);
    if in_class && s.at(TokenKind::Colon) {
        // Unnamed bitfield.
        children.push(parse_bitfield_clause(s));
        children.push(s.expect(TokenKind::Semicolon, ErrorCode::E1001));
        return GreenNode::node(NodeKind::FieldDeclaration, children);
    }
    let decl = parse_init_declarator(s);
    if s.at(TokenKind::LBrace) && has_function_declarator(&decl) {
        children.push(decl.with_field(FieldName::Declarator));
        children.push(stmts::parse_compound_statement(s).with_field(FieldName::Body));
        let kind = if in_class {
            NodeKind::InlineMethodDefinition
        } else {
            NodeKind::FunctionDefinition
        };
        return GreenNode::node(kind, children);
    }
    if s.at(TokenKind::Assign)
        && matches!(s.peek_nth(1), TokenKind::Default | TokenKind::Delete)
    {
        let clause_kind = if s.peek_nth(1) == TokenKind::Default {
            NodeKind::DefaultMethodClause
        } else {
            NodeKind::DeleteMethodClause
        };
        children.push(decl.with_field(FieldName::Declarator));
        children.push(GreenNode::node(clause_kind, vec![s.bump(), s.bump()]));
        children.push(s.expect(TokenKind::Semicolon, ErrorCode::E1001));
        return GreenNode::node(NodeKind::Declaration, children);
    }
    children.push(decl.with_field(FieldName::Declarator));
    if in_class && s.at(TokenKind::Colon) {
        children.push(parse_bitfield_clause(s));
    }
    while s.at(TokenKind::Comma) {
        children.push(s.bump());
        children.push(parse_init_declarator(s).with_field(FieldName::Declarator));
    }
    children.push(s.expect(TokenKind::Semicolon, ErrorCode::E1001));
    let kind = if in_class {
        NodeKind::FieldDeclaration
    } else {
        NodeKind::Declaration
    };
    GreenNode::node(kind, children)
}

fn parse_bitfield_clause(s: &mut ParseSession<'_>) -> GreenNode {
    let colon = s.bump();
    let width = exprs::parse_expression(s).with_field(FieldName::Size);
    GreenNode::node(NodeKind::BitfieldClause, vec![colon, width])
}

/// `( parameter, parameter = default, T... pack, ... )`
pub(crate) fn parse_parameter_list(s: &mut ParseSession<'_>) -> GreenNode {
    let mut children = vec![s.expect(TokenKind::LParen, ErrorCode::E1001)];
    if !s.at(TokenKind::RParen) && !s.at_eof() {
        loop {
            children.push(parse_parameter_declaration(s));
            if s.at(TokenKind::Comma) {
                children.push(s.bump());
            } else {
                break;
            }
        }
    }
    children.push(s.expect(TokenKind::RParen, ErrorCode::E1006));
    GreenNode::node(NodeKind::ParameterList, children)
}

pub(crate) fn parse_parameter_declaration(s: &mut ParseSession<'_>) -> GreenNode {
    if s.at(TokenKind::Ellipsis) {
        return s.bump();
    }
    let before = s.checkpoint();
    let mut children = parse_declaration_specifiers(s);
    if s.consumed_since(&before) == 0 {
        // The missing-type marker alone would not move the cursor; report
        // and let the list loop resynchronize.
        s.rewind(before);
        return s.recover(ErrorCode::E1010, GROUP_SYNC);
    }
    let mut variadic = false;
    if s.at(TokenKind::Ellipsis) {
        children.push(s.bump());
        variadic = true;
    }
    if let Some(decl) = parse_param_declarator(s) {
        children.push(decl.with_field(FieldName::Declarator));
    }
    if !variadic && s.at(TokenKind::Assign) {
        children.push(s.bump());
        let value = if s.at(TokenKind::LBrace) {
            exprs::parse_initializer_list(s)
        } else {
            exprs::parse_expression(s)
        };
        children.push(value.with_field(FieldName::DefaultValue));
        return GreenNode::node(NodeKind::OptionalParameterDeclaration, children);
    }
    let kind = if variadic {
        NodeKind::VariadicParameterDeclaration
    } else {
        NodeKind::ParameterDeclaration
    };
    GreenNode::node(kind, children)
}

/// A declarator that may be abstract: `*`, `&&`, `[]` with no name.
fn parse_param_declarator(s: &mut ParseSession<'_>) -> Option<GreenNode> {
    match s.peek() {
        TokenKind::Star => {
            let op = s.bump();
            let mut children = vec![op];
            while matches!(s.peek(), TokenKind::Const | TokenKind::Volatile) {
                children.push(GreenNode::node(NodeKind::TypeQualifier, vec![s.bump()]));
            }
            match parse_param_declarator(s) {
                Some(inner) => {
                    children.push(inner.with_field(FieldName::Declarator));
                    Some(GreenNode::node(NodeKind::PointerDeclarator, children))
                }
                None => Some(GreenNode::node(
                    NodeKind::AbstractPointerDeclarator,
                    children,
                )),
            }
        }
        TokenKind::Amp | TokenKind::AmpAmp => {
            let op = s.bump();
            match parse_param_declarator(s) {
                Some(inner) => Some(GreenNode::node(
                    NodeKind::ReferenceDeclarator,
                    vec![op, inner.with_field(FieldName::Declarator)],
                )),
                None => Some(GreenNode::node(
                    NodeKind::AbstractReferenceDeclarator,
                    vec![op],
                )),
            }
        }
        TokenKind::LBracket => {
            let open = s.bump();
            let mut children = vec![open];
            if !s.at(TokenKind::RBracket) {
                children.push(exprs::parse_expression(s).with_field(FieldName::Size));
            }
            children.push(s.expect(TokenKind::RBracket, ErrorCode::E1006));
            Some(GreenNode::node(NodeKind::AbstractArrayDeclarator, children))
        }
        TokenKind::Identifier | TokenKind::ColonColon | TokenKind::Operator => {
            Some(parse_declarator(s))
        }
        _ => None,
    }
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
    fn simple_declaration_with_initializer() {
        with_session("int x = 1;", |s| {
            let node = parse_declaration_or_function(s);
            assert_eq!(node.kind, NodeKind::Declaration);
            assert_eq!(
                field_kind(&node, FieldName::Declarator),
                Some(NodeKind::InitDeclarator)
            );
            assert!(s.at_eof());
            assert!(s.diagnostics.is_empty());
        });
    }

    #[test]
    fn missing_initializer_is_marked_and_reported() {
        with_session("int x = ;", |s| {
            let node = parse_declaration_or_function(s);
            assert_eq!(node.kind, NodeKind::Declaration);
            let init = node
                .children
                .iter()
                .find(|c| c.field == Some(FieldName::Declarator))
                .unwrap();
            assert_eq!(field_kind(init, FieldName::Value), Some(NodeKind::Missing));
            assert_eq!(s.diagnostics.len(), 1);
            assert_eq!(s.diagnostics[0].code, ErrorCode::E1007);
            // The `;` was still consumed.
            assert!(s.at_eof());
        });
    }

    #[test]
    fn function_definition_with_body() {
        with_session("int f(int a) { return a; }", |s| {
            let node = parse_declaration_or_function(s);
            assert_eq!(node.kind, NodeKind::FunctionDefinition);
            assert_eq!(
                field_kind(&node, FieldName::Declarator),
                Some(NodeKind::FunctionDeclarator)
            );
            assert_eq!(
                field_kind(&node, FieldName::Body),
                Some(NodeKind::CompoundStatement)
            );
            assert!(s.diagnostics.is_empty());
        });
    }

    #[test]
    fn function_pointer_declarator_nests() {
        with_session("int (*fp)(int);", |s| {
            let node = parse_declaration_or_function(s);
            assert_eq!(node.kind, NodeKind::Declaration);
            let decl = node
                .children
                .iter()
                .find(|c| c.field == Some(FieldName::Declarator))
                .unwrap();
            assert_eq!(decl.kind, NodeKind::FunctionDeclarator);
            assert_eq!(
                field_kind(decl, FieldName::Declarator),
                Some(NodeKind::ParenthesizedDeclarator)
            );
        });
    }

    #[test]
    fn parenthesized_arguments_stay_an_initializer() {
        with_session("int x(5);", |s| {
            let node = parse_declaration_or_function(s);
            assert_eq!(node.kind, NodeKind::Declaration);
            let init = node
                .children
                .iter()
                .find(|c| c.field == Some(FieldName::Declarator))
                .unwrap();
            assert_eq!(init.kind, NodeKind::InitDeclarator);
            assert_eq!(
                field_kind(init, FieldName::Value),
                Some(NodeKind::ArgumentList)
            );
        });
    }

    #[test]
    fn default_argument_makes_the_parameter_optional() {
        with_session("void f(int a = 3);", |s| {
            let node = parse_declaration_or_function(s);
            let decl = node
                .children
                .iter()
                .find(|c| c.field == Some(FieldName::Declarator))
                .unwrap();
            let params = decl
                .children
                .iter()
                .find(|c| c.field == Some(FieldName::Parameters))
                .unwrap();
            assert!(params
                .children
                .iter()
                .any(|c| c.kind == NodeKind::OptionalParameterDeclaration));
        });
    }

    #[test]
    fn trailing_return_type_lands_on_the_declarator() {
        with_session("auto f() -> int;", |s| {
            let node = parse_declaration_or_function(s);
            let decl = node
                .children
                .iter()
                .find(|c| c.field == Some(FieldName::Declarator))
                .unwrap();
            assert_eq!(decl.kind, NodeKind::FunctionDeclarator);
            assert_eq!(
                field_kind(decl, FieldName::Type),
                Some(NodeKind::TypeDescriptor)
            );
        });
    }

    #[test]
    fn structured_binding_declarator() {
        with_session("auto [a, b] = p;", |s| {
            let node = parse_declaration_or_function(s);
            let init = node
                .children
                .iter()
                .find(|c| c.field == Some(FieldName::Declarator))
                .unwrap();
            assert_eq!(
                field_kind(init, FieldName::Declarator),
                Some(NodeKind::StructuredBindingDeclarator)
            );
        });
    }
}
