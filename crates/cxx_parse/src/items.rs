//! Top-level items, class bodies, templates, enumerations.

use crate::candidates::{race, Candidate};
use crate::context::ParseContext;
use crate::green::GreenNode;
use crate::session::ParseSession;
use crate::token_set::{DECL_SYNC, GROUP_SYNC};
use crate::{decls, exprs, stmts, types};
use cxx_diagnostic::ErrorCode;
use cxx_ir::{FieldName, NodeKind, TokenKind};

pub(crate) fn parse_translation_unit(s: &mut ParseSession<'_>) -> GreenNode {
    let mut children = Vec::new();
    while !s.at_eof() && !s.is_cancelled() {
        let before = s.checkpoint();
        children.push(parse_top_level_item(s));
        if s.consumed_since(&before) == 0 {
            children.push(s.bump_as(NodeKind::ErrorNode));
        }
    }
    GreenNode::node(NodeKind::TranslationUnit, children)
}

pub(crate) fn parse_top_level_item(s: &mut ParseSession<'_>) -> GreenNode {
    match s.peek() {
        TokenKind::Semicolon => s.bump(),
        TokenKind::Namespace => parse_namespace(s),
        TokenKind::Inline if s.peek_nth(1) == TokenKind::Namespace => parse_namespace(s),
        TokenKind::Using => parse_using(s),
        TokenKind::Typedef => parse_typedef(s),
        TokenKind::StaticAssert => parse_static_assert(s),
        TokenKind::Template => parse_template(s),
        TokenKind::Extern if s.peek_nth(1) == TokenKind::StringLiteral => parse_linkage(s),
        TokenKind::Extern if s.peek_nth(1) == TokenKind::Template => {
            let kw = s.bump();
            let inner = parse_template(s);
            GreenNode::node(NodeKind::TemplateInstantiation, vec![kw, inner])
        }
        TokenKind::Module => parse_module_declaration(s),
        TokenKind::Import => parse_import_declaration(s),
        TokenKind::Export => parse_export(s),
        kind if decls::can_start_declaration(kind) => decls::parse_declaration_or_function(s),
        TokenKind::Identifier | TokenKind::ColonColon => {
            stmts::parse_declaration_or_expression_statement(s)
        }
        kind if exprs::can_start_expression(kind) => stmts::parse_expression_statement(s),
        _ => s.recover(ErrorCode::E1001, DECL_SYNC),
    }
}

/// Braced item list for namespace, linkage, and export bodies.
fn parse_declaration_list(s: &mut ParseSession<'_>) -> GreenNode {
    let mut children = vec![s.expect(TokenKind::LBrace, ErrorCode::E1001)];
    while !s.at(TokenKind::RBrace) && !s.at_eof() && !s.is_cancelled() {
        let before = s.checkpoint();
        children.push(parse_top_level_item(s));
        if s.consumed_since(&before) == 0 {
            children.push(s.bump_as(NodeKind::ErrorNode));
        }
    }
    children.push(s.expect(TokenKind::RBrace, ErrorCode::E1006));
    GreenNode::node(NodeKind::CompoundStatement, children)
}

fn parse_namespace(s: &mut ParseSession<'_>) -> GreenNode {
    let mut children = Vec::new();
    if s.at(TokenKind::Inline) {
        children.push(s.bump());
    }
    children.push(s.bump());
    if s.at(TokenKind::Identifier) {
        if s.peek_nth(1) == TokenKind::ColonColon {
            let mut parts = Vec::new();
            while s.at(TokenKind::Identifier) && s.peek_nth(1) == TokenKind::ColonColon {
                parts.push(s.bump_as(NodeKind::NamespaceIdentifier));
                parts.push(s.bump());
            }
            if s.at(TokenKind::Identifier) {
                parts.push(s.bump_as(NodeKind::NamespaceIdentifier));
            } else {
                parts.push(s.missing(ErrorCode::E1004));
            }
            children.push(
                GreenNode::node(NodeKind::NestedNamespaceSpecifier, parts)
                    .with_field(FieldName::Name),
            );
        } else {
            children.push(
                s.bump_as(NodeKind::NamespaceIdentifier)
                    .with_field(FieldName::Name),
            );
        }
    }
    if s.at(TokenKind::Assign) {
        children.push(s.bump());
        children.push(types::parse_named_type(s).with_field(FieldName::Value));
        children.push(s.expect(TokenKind::Semicolon, ErrorCode::E1001));
        return GreenNode::node(NodeKind::NamespaceAliasDefinition, children);
    }
    children.push(parse_declaration_list(s).with_field(FieldName::Body));
    GreenNode::node(NodeKind::NamespaceDefinition, children)
}

fn parse_using(s: &mut ParseSession<'_>) -> GreenNode {
    let kw = s.bump();
    if s.at(TokenKind::Namespace) {
        let ns = s.bump();
        let name = types::parse_named_type(s).with_field(FieldName::Name);
        let semi = s.expect(TokenKind::Semicolon, ErrorCode::E1001);
        return GreenNode::node(NodeKind::UsingDeclaration, vec![kw, ns, name, semi]);
    }
    if s.at(TokenKind::Identifier) && s.peek_nth(1) == TokenKind::Assign {
        let name = s.bump_as(NodeKind::TypeIdentifier).with_field(FieldName::Name);
        let eq = s.bump();
        let ty = types::parse_type_descriptor(s).with_field(FieldName::Type);
        let semi = s.expect(TokenKind::Semicolon, ErrorCode::E1001);
        return GreenNode::node(NodeKind::AliasDeclaration, vec![kw, name, eq, ty, semi]);
    }
    let mut children = vec![kw];
    if s.at(TokenKind::Typename) {
        children.push(s.bump());
    }
    children.push(types::parse_named_type(s).with_field(FieldName::Name));
    children.push(s.expect(TokenKind::Semicolon, ErrorCode::E1001));
    GreenNode::node(NodeKind::UsingDeclaration, children)
}

fn parse_typedef(s: &mut ParseSession<'_>) -> GreenNode {
    let kw = s.bump();
    let mut children = vec![kw];
    children.extend(decls::parse_declaration_specifiers(s));
    children.push(decls::parse_declarator(s).with_field(FieldName::Declarator));
    while s.at(TokenKind::Comma) {
        children.push(s.bump());
        children.push(decls::parse_declarator(s).with_field(FieldName::Declarator));
    }
    children.push(s.expect(TokenKind::Semicolon, ErrorCode::E1001));
    GreenNode::node(NodeKind::TypeDefinition, children)
}

fn parse_static_assert(s: &mut ParseSession<'_>) -> GreenNode {
    let kw = s.bump();
    let open = s.expect(TokenKind::LParen, ErrorCode::E1001);
    let cond = exprs::parse_expression(s).with_field(FieldName::Condition);
    let mut children = vec![kw, open, cond];
    if s.at(TokenKind::Comma) {
        children.push(s.bump());
        children.push(exprs::parse_expression(s).with_field(FieldName::Message));
    }
    children.push(s.expect(TokenKind::RParen, ErrorCode::E1006));
    children.push(s.expect(TokenKind::Semicolon, ErrorCode::E1001));
    GreenNode::node(NodeKind::StaticAssertDeclaration, children)
}

fn parse_linkage(s: &mut ParseSession<'_>) -> GreenNode {
    let kw = s.bump();
    let language = s.bump();
    let mut children = vec![kw, language];
    if s.at(TokenKind::LBrace) {
        children.push(parse_declaration_list(s).with_field(FieldName::Body));
    } else {
        children.push(parse_top_level_item(s));
    }
    GreenNode::node(NodeKind::LinkageSpecification, children)
}

fn parse_template(s: &mut ParseSession<'_>) -> GreenNode {
    let kw = s.bump();
    if !s.at(TokenKind::Lt) {
        // Explicit instantiation: `template class X<int>;`
        let mut children = vec![kw];
        children.extend(decls::parse_declaration_specifiers(s));
        if decls::can_start_declarator(s.peek()) {
            children.push(decls::parse_declarator(s).with_field(FieldName::Declarator));
        }
        children.push(s.expect(TokenKind::Semicolon, ErrorCode::E1001));
        return GreenNode::node(NodeKind::TemplateInstantiation, children);
    }
    let params = parse_template_parameter_list(s).with_field(FieldName::Parameters);
    let mut children = vec![kw, params];
    if s.at(TokenKind::Requires) {
        children.push(exprs::parse_requires_clause(s));
    }
    if s.at(TokenKind::Concept) {
        let concept_kw = s.bump();
        let name = if s.at(TokenKind::Identifier) {
            s.bump().with_field(FieldName::Name)
        } else {
            s.missing(ErrorCode::E1004)
        };
        let eq = s.expect(TokenKind::Assign, ErrorCode::E1001);
        let value = exprs::parse_expression(s).with_field(FieldName::Value);
        let semi = s.expect(TokenKind::Semicolon, ErrorCode::E1001);
        children.push(GreenNode::node(
            NodeKind::ConceptDefinition,
            vec![concept_kw, name, eq, value, semi],
        ));
        return GreenNode::node(NodeKind::TemplateDeclaration, children);
    }
    children.push(parse_top_level_item(s));
    GreenNode::node(NodeKind::TemplateDeclaration, children)
}

/// `<...>` of a template declaration, `>>` splitting at the close.
pub(crate) fn parse_template_parameter_list(s: &mut ParseSession<'_>) -> GreenNode {
    let saved = s.ctx;
    s.ctx |= ParseContext::TEMPLATE_ARGS;
    let mut children = vec![s.expect(TokenKind::Lt, ErrorCode::E1001)];
    if !matches!(s.peek(), TokenKind::Gt | TokenKind::Shr) {
        loop {
            children.push(parse_template_parameter(s));
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
    GreenNode::node(NodeKind::TemplateParameterList, children)
}

/// `class T` is a type parameter, but `class X* p` is a non-type parameter
/// with an elaborated type; the two readings race.
fn parse_template_parameter(s: &mut ParseSession<'_>) -> GreenNode {
    match s.peek() {
        TokenKind::Class | TokenKind::Typename => race(
            s,
            vec![
                Candidate::new(
                    "type_parameter_declaration",
                    1,
                    |s: &mut ParseSession<'_>| parse_type_parameter(s),
                ),
                Candidate::new("parameter_declaration", 0, |s: &mut ParseSession<'_>| {
                    decls::parse_parameter_declaration(s)
                }),
            ],
        ),
        TokenKind::Template => {
            let kw = s.bump();
            let inner = parse_template_parameter_list(s).with_field(FieldName::Parameters);
            let mut children = vec![kw, inner];
            if matches!(s.peek(), TokenKind::Class | TokenKind::Typename) {
                children.push(s.bump());
            }
            if s.at(TokenKind::Identifier) {
                children.push(
                    s.bump_as(NodeKind::TypeIdentifier)
                        .with_field(FieldName::Name),
                );
            }
            GreenNode::node(NodeKind::TemplateTemplateParameterDeclaration, children)
        }
        _ => decls::parse_parameter_declaration(s),
    }
}

fn parse_type_parameter(s: &mut ParseSession<'_>) -> GreenNode {
    let kw = s.bump();
    let mut children = vec![kw];
    if s.at(TokenKind::Ellipsis) {
        children.push(s.bump());
        if s.at(TokenKind::Identifier) {
            children.push(
                s.bump_as(NodeKind::TypeIdentifier)
                    .with_field(FieldName::Name),
            );
        }
        return GreenNode::node(NodeKind::VariadicTypeParameterDeclaration, children);
    }
    if s.at(TokenKind::Identifier) {
        children.push(
            s.bump_as(NodeKind::TypeIdentifier)
                .with_field(FieldName::Name),
        );
    }
    if s.at(TokenKind::Assign) {
        children.push(s.bump());
        children.push(types::parse_type_descriptor(s).with_field(FieldName::DefaultType));
        return GreenNode::node(NodeKind::OptionalTypeParameterDeclaration, children);
    }
    GreenNode::node(NodeKind::TypeParameterDeclaration, children)
}

fn parse_module_declaration(s: &mut ParseSession<'_>) -> GreenNode {
    let kw = s.bump();
    let name = parse_module_name(s).with_field(FieldName::Name);
    let semi = s.expect(TokenKind::Semicolon, ErrorCode::E1001);
    GreenNode::node(NodeKind::ModuleDeclaration, vec![kw, name, semi])
}

fn parse_import_declaration(s: &mut ParseSession<'_>) -> GreenNode {
    let kw = s.bump();
    let mut children = vec![kw];
    match s.peek() {
        TokenKind::StringLiteral => children.push(s.bump()),
        TokenKind::Lt => {
            // Header unit: `import <vector>;`
            children.push(s.bump());
            while !matches!(s.peek(), TokenKind::Gt | TokenKind::Semicolon | TokenKind::Eof) {
                children.push(s.bump());
            }
            children.push(s.expect(TokenKind::Gt, ErrorCode::E1006));
        }
        _ => children.push(parse_module_name(s).with_field(FieldName::Name)),
    }
    children.push(s.expect(TokenKind::Semicolon, ErrorCode::E1001));
    GreenNode::node(NodeKind::ImportDeclaration, children)
}

fn parse_export(s: &mut ParseSession<'_>) -> GreenNode {
    let kw = s.bump();
    if s.at(TokenKind::LBrace) {
        let body = parse_declaration_list(s).with_field(FieldName::Body);
        return GreenNode::node(NodeKind::ExportBlock, vec![kw, body]);
    }
    let item = parse_top_level_item(s);
    GreenNode::node(NodeKind::ExportSpecifier, vec![kw, item])
}

fn parse_module_name(s: &mut ParseSession<'_>) -> GreenNode {
    let mut children = Vec::new();
    if s.at(TokenKind::Identifier) {
        children.push(s.bump());
    } else {
        children.push(s.missing(ErrorCode::E1004));
    }
    while s.at(TokenKind::Dot) {
        children.push(s.bump());
        if s.at(TokenKind::Identifier) {
            children.push(s.bump());
        } else {
            children.push(s.missing(ErrorCode::E1004));
            break;
        }
    }
    GreenNode::node(NodeKind::ModuleName, children)
}

/// `{ ... }` of a class, struct, or union.
pub(crate) fn parse_field_declaration_list(s: &mut ParseSession<'_>) -> GreenNode {
    let saved = s.ctx;
    s.ctx |= ParseContext::CLASS_BODY;
    let mut children = vec![s.expect(TokenKind::LBrace, ErrorCode::E1001)];
    while !s.at(TokenKind::RBrace) && !s.at_eof() && !s.is_cancelled() {
        let before = s.checkpoint();
        children.push(parse_member_item(s));
        if s.consumed_since(&before) == 0 {
            children.push(s.bump_as(NodeKind::ErrorNode));
        }
    }
    children.push(s.expect(TokenKind::RBrace, ErrorCode::E1006));
    s.ctx = saved;
    GreenNode::node(NodeKind::FieldDeclarationList, children)
}

fn parse_member_item(s: &mut ParseSession<'_>) -> GreenNode {
    match s.peek() {
        TokenKind::Public | TokenKind::Private | TokenKind::Protected => {
            let kw = s.bump();
            let colon = s.expect(TokenKind::Colon, ErrorCode::E1001);
            GreenNode::node(NodeKind::AccessSpecifier, vec![kw, colon])
        }
        TokenKind::Friend => {
            let kw = s.bump();
            let inner = decls::parse_declaration_or_function(s);
            GreenNode::node(NodeKind::FriendDeclaration, vec![kw, inner])
        }
        TokenKind::Semicolon
        | TokenKind::Using
        | TokenKind::Typedef
        | TokenKind::StaticAssert
        | TokenKind::Template => parse_top_level_item(s),
        TokenKind::Operator if conversion_operator_ahead(s) => parse_operator_cast_member(s),
        _ if constructor_ahead(s) => parse_constructor_like(s),
        kind if decls::can_start_declaration(kind)
            || matches!(kind, TokenKind::Identifier | TokenKind::ColonColon | TokenKind::Operator) =>
        {
            decls::parse_declaration_or_function(s)
        }
        _ => s.recover(ErrorCode::E1001, DECL_SYNC),
    }
}

fn conversion_operator_ahead(s: &ParseSession<'_>) -> bool {
    types::can_start_type(s.peek_nth(1))
}

/// Constructor or destructor shape: optional specifiers, then `~` or a
/// name directly followed by a parameter list.
fn constructor_ahead(s: &ParseSession<'_>) -> bool {
    let mut n = 0;
    while matches!(
        s.peek_nth(n),
        TokenKind::Explicit | TokenKind::Virtual | TokenKind::Inline | TokenKind::Constexpr
    ) {
        n += 1;
    }
    match s.peek_nth(n) {
        TokenKind::Tilde => true,
        // `name(` with a leading `*` inside is a function-pointer field.
        TokenKind::Identifier => {
            s.peek_nth(n + 1) == TokenKind::LParen && s.peek_nth(n + 2) != TokenKind::Star
        }
        _ => false,
    }
}

fn parse_constructor_like(s: &mut ParseSession<'_>) -> GreenNode {
    let mut children = Vec::new();
    loop {
        match s.peek() {
            TokenKind::Explicit => {
                children.push(GreenNode::node(
                    NodeKind::ExplicitFunctionSpecifier,
                    vec![s.bump()],
                ));
            }
            TokenKind::Virtual => {
                children.push(GreenNode::node(NodeKind::VirtualSpecifier, vec![s.bump()]));
            }
            TokenKind::Inline | TokenKind::Constexpr => {
                children.push(GreenNode::node(
                    NodeKind::StorageClassSpecifier,
                    vec![s.bump()],
                ));
            }
            _ => break,
        }
    }
    let name = if s.at(TokenKind::Tilde) {
        let tilde = s.bump();
        let id = if s.at(TokenKind::Identifier) {
            s.bump_as(NodeKind::TypeIdentifier)
        } else {
            s.missing(ErrorCode::E1004)
        };
        GreenNode::node(NodeKind::Identifier, vec![tilde, id])
    } else {
        s.bump()
    };
    children.push(name.with_field(FieldName::Name));
    children.push(decls::parse_parameter_list(s).with_field(FieldName::Parameters));
    loop {
        match s.peek() {
            TokenKind::Noexcept => children.push(exprs::parse_noexcept_specifier(s)),
            TokenKind::Override | TokenKind::Final => {
                children.push(GreenNode::node(NodeKind::VirtualSpecifier, vec![s.bump()]));
            }
            _ => break,
        }
    }
    if s.at(TokenKind::Colon) {
        children.push(parse_field_initializer_list(s));
    }
    if s.at(TokenKind::LBrace) {
        children.push(stmts::parse_compound_statement(s).with_field(FieldName::Body));
        return GreenNode::node(NodeKind::ConstructorOrDestructorDefinition, children);
    }
    if s.at(TokenKind::Assign)
        && matches!(s.peek_nth(1), TokenKind::Default | TokenKind::Delete)
    {
        let kind = if s.peek_nth(1) == TokenKind::Default {
            NodeKind::DefaultMethodClause
        } else {
            NodeKind::DeleteMethodClause
        };
        children.push(GreenNode::node(kind, vec![s.bump(), s.bump()]));
    }
    children.push(s.expect(TokenKind::Semicolon, ErrorCode::E1001));
    GreenNode::node(NodeKind::ConstructorOrDestructorDeclaration, children)
}

fn parse_field_initializer_list(s: &mut ParseSession<'_>) -> GreenNode {
    let colon = s.bump();
    let mut children = vec![colon];
    loop {
        let mut parts = Vec::new();
        if s.at(TokenKind::Identifier) {
            parts.push(
                s.bump_as(NodeKind::FieldIdentifier)
                    .with_field(FieldName::Field),
            );
        } else {
            parts.push(s.missing(ErrorCode::E1004));
        }
        if s.at(TokenKind::LParen) {
            parts.push(exprs::parse_argument_list(s).with_field(FieldName::Arguments));
        } else if s.at(TokenKind::LBrace) {
            parts.push(exprs::parse_initializer_list(s).with_field(FieldName::Arguments));
        }
        if s.at(TokenKind::Ellipsis) {
            parts.push(s.bump());
        }
        children.push(GreenNode::node(NodeKind::FieldInitializer, parts));
        if s.at(TokenKind::Comma) {
            children.push(s.bump());
        } else {
            break;
        }
    }
    GreenNode::node(NodeKind::FieldInitializerList, children)
}

/// `operator type() const` conversion member.
fn parse_operator_cast_member(s: &mut ParseSession<'_>) -> GreenNode {
    let kw = s.bump();
    let ty = types::parse_type_descriptor(s).with_field(FieldName::Type);
    let cast = GreenNode::node(NodeKind::OperatorCast, vec![kw, ty])
        .with_field(FieldName::Declarator);
    let params = decls::parse_parameter_list(s).with_field(FieldName::Parameters);
    let mut children = vec![cast, params];
    loop {
        match s.peek() {
            TokenKind::Const | TokenKind::Volatile => {
                children.push(GreenNode::node(NodeKind::TypeQualifier, vec![s.bump()]));
            }
            TokenKind::Noexcept => children.push(exprs::parse_noexcept_specifier(s)),
            _ => break,
        }
    }
    if s.at(TokenKind::LBrace) {
        children.push(stmts::parse_compound_statement(s).with_field(FieldName::Body));
        return GreenNode::node(NodeKind::OperatorCastDefinition, children);
    }
    children.push(s.expect(TokenKind::Semicolon, ErrorCode::E1001));
    GreenNode::node(NodeKind::OperatorCastDeclaration, children)
}

/// `{ A, B = 2, }` of an enum specifier.
pub(crate) fn parse_enumerator_list(s: &mut ParseSession<'_>) -> GreenNode {
    let mut children = vec![s.expect(TokenKind::LBrace, ErrorCode::E1001)];
    while !s.at(TokenKind::RBrace) && !s.at_eof() {
        if s.at(TokenKind::Identifier) {
            let name = s.bump().with_field(FieldName::Name);
            let mut parts = vec![name];
            if s.at(TokenKind::Assign) {
                parts.push(s.bump());
                parts.push(exprs::parse_expression(s).with_field(FieldName::Value));
            }
            children.push(GreenNode::node(NodeKind::Enumerator, parts));
        } else {
            children.push(s.recover(ErrorCode::E1004, GROUP_SYNC));
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
    children.push(s.expect(TokenKind::RBrace, ErrorCode::E1006));
    GreenNode::node(NodeKind::EnumeratorList, children)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::tests_support::with_session;
    use pretty_assertions::assert_eq;

    fn kinds(node: &GreenNode) -> Vec<NodeKind> {
        node.children.iter().map(|c| c.kind).collect()
    }

    #[test]
    fn nested_namespace_definition() {
        with_session("namespace a::b { int x; }", |s| {
            let node = parse_top_level_item(s);
            assert_eq!(node.kind, NodeKind::NamespaceDefinition);
            assert!(kinds(&node).contains(&NodeKind::NestedNamespaceSpecifier));
            assert!(s.diagnostics.is_empty());
        });
    }

    #[test]
    fn using_alias_declaration() {
        with_session("using Row = vector<int>;", |s| {
            let node = parse_top_level_item(s);
            assert_eq!(node.kind, NodeKind::AliasDeclaration);
            assert!(s.at_eof());
            assert!(s.diagnostics.is_empty());
        });
    }

    #[test]
    fn template_with_defaulted_type_parameter() {
        with_session("template <class T, class A = alloc<T>> struct box {};", |s| {
            let node = parse_top_level_item(s);
            assert_eq!(node.kind, NodeKind::TemplateDeclaration);
            let params = node
                .children
                .iter()
                .find(|c| c.field == Some(FieldName::Parameters))
                .unwrap();
            assert!(params
                .children
                .iter()
                .any(|c| c.kind == NodeKind::TypeParameterDeclaration));
            assert!(params
                .children
                .iter()
                .any(|c| c.kind == NodeKind::OptionalTypeParameterDeclaration));
            assert!(s.diagnostics.is_empty());
        });
    }

    #[test]
    fn template_parameter_list_splits_closing_shift() {
        // The default argument's `>` and the parameter list's `>` arrive as
        // one `>>` token.
        with_session("template <class A = alloc<int>> struct box {};", |s| {
            let node = parse_top_level_item(s);
            assert_eq!(node.kind, NodeKind::TemplateDeclaration);
            assert!(s.at_eof());
            assert!(s.diagnostics.is_empty());
        });
    }

    #[test]
    fn concept_definition_under_template() {
        with_session("template <class T> concept Addable = requires(T t) { t + t; };", |s| {
            let node = parse_top_level_item(s);
            assert_eq!(node.kind, NodeKind::TemplateDeclaration);
            assert!(kinds(&node).contains(&NodeKind::ConceptDefinition));
            assert!(s.diagnostics.is_empty());
        });
    }

    #[test]
    fn class_with_constructor_destructor_and_access() {
        let source = "struct widget { widget(int w) : width(w) {} ~widget(); private: int width; };";
        with_session(source, |s| {
            let node = decls::parse_declaration_or_function(s);
            let class = node
                .children
                .iter()
                .find(|c| c.field == Some(FieldName::Type))
                .unwrap();
            let body = class
                .children
                .iter()
                .find(|c| c.field == Some(FieldName::Body))
                .unwrap();
            let member_kinds = kinds(body);
            assert!(member_kinds.contains(&NodeKind::ConstructorOrDestructorDefinition));
            assert!(member_kinds.contains(&NodeKind::ConstructorOrDestructorDeclaration));
            assert!(member_kinds.contains(&NodeKind::AccessSpecifier));
            assert!(member_kinds.contains(&NodeKind::FieldDeclaration));
            assert!(s.diagnostics.is_empty());
        });
    }

    #[test]
    fn conversion_operator_member() {
        with_session("struct wrap { operator bool() const; };", |s| {
            let node = decls::parse_declaration_or_function(s);
            let class = node
                .children
                .iter()
                .find(|c| c.field == Some(FieldName::Type))
                .unwrap();
            let body = class
                .children
                .iter()
                .find(|c| c.field == Some(FieldName::Body))
                .unwrap();
            assert!(kinds(body).contains(&NodeKind::OperatorCastDeclaration));
            assert!(s.diagnostics.is_empty());
        });
    }

    #[test]
    fn enumerators_with_values() {
        with_session("enum class color { red, green = 2, blue };", |s| {
            let node = decls::parse_declaration_or_function(s);
            let spec = node
                .children
                .iter()
                .find(|c| c.field == Some(FieldName::Type))
                .unwrap();
            assert_eq!(spec.kind, NodeKind::EnumSpecifier);
            let body = spec
                .children
                .iter()
                .find(|c| c.field == Some(FieldName::Body))
                .unwrap();
            let count = body
                .children
                .iter()
                .filter(|c| c.kind == NodeKind::Enumerator)
                .count();
            assert_eq!(count, 3);
        });
    }

    #[test]
    fn linkage_specification_with_block() {
        with_session("extern \"C\" { void f(); }", |s| {
            let node = parse_top_level_item(s);
            assert_eq!(node.kind, NodeKind::LinkageSpecification);
            assert!(s.diagnostics.is_empty());
        });
    }

    #[test]
    fn export_module_surface() {
        with_session("export module engine.core;", |s| {
            let node = parse_top_level_item(s);
            assert_eq!(node.kind, NodeKind::ExportSpecifier);
            assert!(kinds(&node).contains(&NodeKind::ModuleDeclaration));
            assert!(s.diagnostics.is_empty());
        });
    }
}
