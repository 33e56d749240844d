//! Type specifiers and type descriptors.
//!
//! Type position is the easy side of the template ambiguity: `a<b` after a
//! type name can only open an argument list, so no candidate exploration is
//! needed here. The hard cases live in expression position and are handled
//! in [`crate::exprs`].

use crate::exprs;
use crate::green::GreenNode;
use crate::items;
use crate::session::ParseSession;
use cxx_diagnostic::ErrorCode;
use cxx_ir::{FieldName, NodeKind, TokenKind};

/// Tokens that can open a type specifier.
pub(crate) fn can_start_type(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Struct
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
            | TokenKind::Identifier
            | TokenKind::ColonColon
    )
}

pub(crate) fn parse_type_specifier(s: &mut ParseSession<'_>) -> GreenNode {
    match s.peek() {
        TokenKind::Struct | TokenKind::Class | TokenKind::Union => parse_class_like(s),
        TokenKind::Enum => parse_enum_specifier(s),
        TokenKind::Signed | TokenKind::Unsigned | TokenKind::Short | TokenKind::Long => {
            parse_sized_type(s)
        }
        TokenKind::PrimitiveType => s.bump(),
        TokenKind::Auto => GreenNode::node(NodeKind::PlaceholderTypeSpecifier, vec![s.bump()]),
        TokenKind::Decltype => parse_decltype(s),
        TokenKind::Typename => {
            let keyword = s.bump();
            let name = parse_named_type(s);
            GreenNode::node(NodeKind::DependentTypeIdentifier, vec![keyword, name])
        }
        TokenKind::Identifier | TokenKind::ColonColon => parse_named_type(s),
        _ => s.missing(ErrorCode::E1005),
    }
}

/// A type plus abstract declarator pieces: what `sizeof(...)`, casts, and
/// template arguments consume.
pub(crate) fn parse_type_descriptor(s: &mut ParseSession<'_>) -> GreenNode {
    let mut children = vec![parse_type_specifier(s).with_field(FieldName::Type)];
    loop {
        match s.peek() {
            TokenKind::Star => {
                children.push(GreenNode::node(
                    NodeKind::AbstractPointerDeclarator,
                    vec![s.bump()],
                ));
            }
            TokenKind::Amp | TokenKind::AmpAmp => {
                children.push(GreenNode::node(
                    NodeKind::AbstractReferenceDeclarator,
                    vec![s.bump()],
                ));
            }
            TokenKind::Const | TokenKind::Volatile => {
                children.push(GreenNode::node(NodeKind::TypeQualifier, vec![s.bump()]));
            }
            TokenKind::LBracket => {
                let open = s.bump();
                let mut parts = vec![open];
                if !s.at(TokenKind::RBracket) {
                    parts.push(exprs::parse_expression(s).with_field(FieldName::Size));
                }
                parts.push(s.expect(TokenKind::RBracket, ErrorCode::E1006));
                children.push(GreenNode::node(NodeKind::AbstractArrayDeclarator, parts));
            }
            _ => break,
        }
    }
    GreenNode::node(NodeKind::TypeDescriptor, children)
}

/// `signed`, `unsigned`, `short`, `long` runs, optionally ending in a
/// primitive type.
fn parse_sized_type(s: &mut ParseSession<'_>) -> GreenNode {
    let mut children = Vec::new();
    while matches!(
        s.peek(),
        TokenKind::Signed | TokenKind::Unsigned | TokenKind::Short | TokenKind::Long
    ) {
        children.push(s.bump());
    }
    if s.at(TokenKind::PrimitiveType) {
        children.push(s.bump());
    }
    GreenNode::node(NodeKind::SizedTypeSpecifier, children)
}

fn parse_decltype(s: &mut ParseSession<'_>) -> GreenNode {
    let keyword = s.bump();
    let open = s.expect(TokenKind::LParen, ErrorCode::E1001);
    let inner = if s.at(TokenKind::Auto) {
        s.bump()
    } else {
        exprs::parse_expression(s)
    };
    let close = s.expect(TokenKind::RParen, ErrorCode::E1006);
    GreenNode::node(NodeKind::Decltype, vec![keyword, open, inner, close])
}

/// `T`, `ns::T`, `T<args>`, `ns::T<args>`, `::T`.
pub(crate) fn parse_named_type(s: &mut ParseSession<'_>) -> GreenNode {
    let mut prefix: Vec<GreenNode> = Vec::new();
    if s.at(TokenKind::ColonColon) {
        prefix.push(s.bump());
    }
    loop {
        if !s.at(TokenKind::Identifier) {
            prefix.push(s.missing(ErrorCode::E1004));
            break;
        }
        if s.peek_nth(1) == TokenKind::ColonColon {
            prefix.push(s.bump_as(NodeKind::NamespaceIdentifier).with_field(FieldName::Scope));
            prefix.push(s.bump());
            continue;
        }
        let name = s.bump_as(NodeKind::TypeIdentifier);
        if s.at(TokenKind::Lt) {
            let args = parse_template_argument_list(s);
            prefix.push(GreenNode::node(
                NodeKind::TemplateType,
                vec![
                    name.with_field(FieldName::Name),
                    args.with_field(FieldName::Arguments),
                ],
            ));
        } else {
            prefix.push(name);
        }
        break;
    }
    if prefix.len() == 1 {
        prefix.remove(0)
    } else {
        GreenNode::node(NodeKind::QualifiedTypeIdentifier, prefix)
    }
}

/// `<...>` with `>>` splitting at the close.
pub(crate) fn parse_template_argument_list(s: &mut ParseSession<'_>) -> GreenNode {
    let saved = s.ctx;
    s.ctx |= crate::context::ParseContext::TEMPLATE_ARGS;
    let mut children = vec![s.expect(TokenKind::Lt, ErrorCode::E1001)];
    if !matches!(s.peek(), TokenKind::Gt | TokenKind::Shr) {
        loop {
            children.push(parse_template_argument(s));
            if s.at(TokenKind::Comma) {
                children.push(s.bump());
            } else {
                break;
            }
        }
    }
    let close = match s.peek() {
        TokenKind::Gt => s.bump(),
        TokenKind::Shr => s.split_shr(),
        _ => s.missing(ErrorCode::E1006),
    };
    children.push(close);
    s.ctx = saved;
    GreenNode::node(NodeKind::TemplateArgumentList, children)
}

/// One template argument: `f<int>` vs `f<x>` is undecidable locally, so a
/// bare name races the type reading against the expression reading, with
/// the type reading preferred on a full tie.
fn parse_template_argument(s: &mut ParseSession<'_>) -> GreenNode {
    let kind = s.peek();
    let type_only = can_start_type(kind)
        && !matches!(kind, TokenKind::Identifier | TokenKind::ColonColon);
    if type_only {
        return parse_type_descriptor(s);
    }
    if matches!(kind, TokenKind::Identifier | TokenKind::ColonColon) {
        return crate::candidates::race(
            s,
            vec![
                crate::candidates::Candidate::new("type_specifier", 1, |s: &mut ParseSession<'_>| {
                    parse_type_descriptor(s)
                }),
                crate::candidates::Candidate::new("expression", 0, |s: &mut ParseSession<'_>| {
                    exprs::parse_expression(s)
                }),
            ],
        );
    }
    if exprs::can_start_expression(kind) {
        return exprs::parse_expression(s);
    }
    s.missing(ErrorCode::E1009)
}

fn parse_class_like(s: &mut ParseSession<'_>) -> GreenNode {
    let kind = match s.peek() {
        TokenKind::Class => NodeKind::ClassSpecifier,
        TokenKind::Union => NodeKind::UnionSpecifier,
        _ => NodeKind::StructSpecifier,
    };
    let mut children = vec![s.bump()];
    if s.at(TokenKind::Identifier) {
        children.push(parse_named_type(s).with_field(FieldName::Name));
    }
    if s.at(TokenKind::Final) {
        children.push(s.bump());
    }
    if s.at(TokenKind::Colon) {
        children.push(parse_base_class_clause(s));
    }
    if s.at(TokenKind::LBrace) {
        children.push(items::parse_field_declaration_list(s).with_field(FieldName::Body));
    }
    GreenNode::node(kind, children)
}

fn parse_base_class_clause(s: &mut ParseSession<'_>) -> GreenNode {
    let mut children = vec![s.bump()];
    loop {
        while matches!(
            s.peek(),
            TokenKind::Public | TokenKind::Private | TokenKind::Protected | TokenKind::Virtual
        ) {
            children.push(s.bump());
        }
        if s.at(TokenKind::Identifier) || s.at(TokenKind::ColonColon) {
            children.push(parse_named_type(s).with_field(FieldName::Base));
        } else {
            children.push(s.missing(ErrorCode::E1004));
        }
        if s.at(TokenKind::Comma) {
            children.push(s.bump());
        } else {
            break;
        }
    }
    GreenNode::node(NodeKind::BaseClassClause, children)
}

fn parse_enum_specifier(s: &mut ParseSession<'_>) -> GreenNode {
    let mut children = vec![s.bump()];
    if s.at(TokenKind::Class) || s.at(TokenKind::Struct) {
        children.push(s.bump());
    }
    if s.at(TokenKind::Identifier) {
        children.push(s.bump_as(NodeKind::TypeIdentifier).with_field(FieldName::Name));
    }
    if s.at(TokenKind::Colon) {
        children.push(s.bump());
        children.push(parse_type_specifier(s).with_field(FieldName::Type));
    }
    if s.at(TokenKind::LBrace) {
        children.push(items::parse_enumerator_list(s).with_field(FieldName::Body));
    }
    GreenNode::node(NodeKind::EnumSpecifier, children)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::tests_support::with_session;
    use cxx_ir::Span;
    use pretty_assertions::assert_eq;

    #[test]
    fn primitive_type_is_a_leaf() {
        with_session("int", |s| {
            let node = parse_type_specifier(s);
            assert_eq!(node.kind, NodeKind::PrimitiveType);
        });
    }

    #[test]
    fn sized_type_groups_modifiers() {
        with_session("unsigned long long int", |s| {
            let node = parse_type_specifier(s);
            assert_eq!(node.kind, NodeKind::SizedTypeSpecifier);
            assert_eq!(node.children.len(), 4);
        });
    }

    #[test]
    fn qualified_template_type() {
        with_session("std::vector<int>", |s| {
            let node = parse_type_specifier(s);
            assert_eq!(node.kind, NodeKind::QualifiedTypeIdentifier);
            let last = node.children.last().unwrap();
            assert_eq!(last.kind, NodeKind::TemplateType);
        });
    }

    #[test]
    fn nested_template_close_splits_shift() {
        with_session("vector<vector<int>>", |s| {
            let node = parse_type_specifier(s);
            assert_eq!(node.kind, NodeKind::TemplateType);
            assert!(s.at_eof());
            assert!(s.diagnostics.is_empty());
        });
    }

    #[test]
    fn type_descriptor_collects_abstract_declarators() {
        with_session("const char*", |s| {
            // Leading qualifier is the declaration layer's job; here the
            // type itself starts at `char`.
            let _ = s.bump();
            let node = parse_type_descriptor(s);
            assert_eq!(node.kind, NodeKind::TypeDescriptor);
            assert_eq!(
                node.children.last().map(|c| c.kind),
                Some(NodeKind::AbstractPointerDeclarator)
            );
        });
    }

    #[test]
    fn decltype_wraps_expression() {
        with_session("decltype(x + y)", |s| {
            let node = parse_type_specifier(s);
            assert_eq!(node.kind, NodeKind::Decltype);
            assert_eq!(node.span, Span::new(0, 15));
        });
    }
}
