//! The declared C++ grammar.
//!
//! This is the single source of truth for what the parser recognizes: rule
//! shapes, the conflict set, the operator table, the alias table, and the
//! external tokens. The rule bodies are declarative approximations — lists
//! are modeled by right recursion and option by an extra alternative — but
//! FIRST sets and choice structure are faithful, which is what validation
//! and the runtime tables need.
//!
//! Alternatives carry an explicit precedence wherever a choice is resolved
//! statically; choices left bare must be covered by the declared conflicts
//! in [`cpp_conflicts`](crate::conflict::cpp_conflicts).

use crate::alias::cpp_aliases;
use crate::conflict::cpp_conflicts;
use crate::prec::{self, cpp_binary_operators, FOLD_OPERATORS};
use crate::rule::{r, t, Alt, Grammar, Prec, Rule, Symbol};
use cxx_ir::{ExternalToken, TokenKind as T};

/// Candidate cap during conflict resolution. The widest declared group has
/// three members; doubling that leaves room for nested splits.
const AMBIGUITY_BOUND: usize = 8;

/// Statically-ordered alternative: one token of context or a preference
/// settles it, no conflict declaration needed.
fn ordered(symbols: Vec<Symbol>) -> Alt {
    Alt::new(symbols).with_prec(Prec::level(1))
}

/// Build the C++ grammar.
pub fn cpp() -> Grammar {
    let mut rules = Vec::with_capacity(128);

    top_level(&mut rules);
    declarations(&mut rules);
    types(&mut rules);
    class_bodies(&mut rules);
    templates(&mut rules);
    statements(&mut rules);
    expressions(&mut rules);

    Grammar {
        name: "cpp",
        start: "translation_unit",
        rules,
        conflicts: cpp_conflicts(),
        externals: vec![
            ExternalToken::RawStringDelimiter,
            ExternalToken::RawStringContent,
        ],
        binary_operators: cpp_binary_operators(),
        aliases: cpp_aliases(),
        ambiguity_bound: AMBIGUITY_BOUND,
    }
}

fn top_level(rules: &mut Vec<Rule>) {
    rules.push(Rule::new(
        "translation_unit",
        vec![
            Alt::new(vec![]),
            Alt::new(vec![r("top_level_item"), r("translation_unit")]),
        ],
    ));
    rules.push(Rule::new(
        "top_level_item",
        vec![
            // `T(a);` and friends: declaration vs function definition stays
            // live until the body or semicolon decides.
            Alt::new(vec![r("declaration")]),
            Alt::new(vec![r("function_definition")]),
            Alt::new(vec![r("template_declaration")]),
            ordered(vec![r("template_instantiation")]),
            ordered(vec![r("namespace_definition")]),
            ordered(vec![r("namespace_alias_definition")]),
            ordered(vec![r("using_declaration")]),
            ordered(vec![r("alias_declaration")]),
            Alt::new(vec![r("static_assert_declaration")]),
            ordered(vec![r("linkage_specification")]),
            Alt::new(vec![r("type_definition")]),
            Alt::new(vec![r("concept_definition")]),
            ordered(vec![r("module_declaration")]),
            ordered(vec![r("import_declaration")]),
            ordered(vec![r("export_block")]),
            Alt::new(vec![t(T::Semicolon)]),
        ],
    ));
    rules.push(Rule::new(
        "top_level_seq",
        vec![
            Alt::new(vec![r("top_level_item")]),
            Alt::new(vec![r("top_level_item"), r("top_level_seq")]),
        ],
    ));
    rules.push(Rule::new(
        "declaration_list",
        vec![
            Alt::new(vec![t(T::LBrace), t(T::RBrace)]),
            Alt::new(vec![t(T::LBrace), r("top_level_seq"), t(T::RBrace)]),
        ],
    ));
    rules.push(Rule::new(
        "namespace_definition",
        vec![
            Alt::new(vec![t(T::Namespace), t(T::Identifier), r("declaration_list")]),
            Alt::new(vec![t(T::Namespace), r("declaration_list")]),
            Alt::new(vec![
                t(T::Namespace),
                r("nested_namespace_specifier"),
                r("declaration_list"),
            ]),
            Alt::new(vec![
                t(T::Inline),
                t(T::Namespace),
                t(T::Identifier),
                r("declaration_list"),
            ]),
        ],
    ));
    rules.push(Rule::new(
        "nested_namespace_specifier",
        vec![
            Alt::new(vec![t(T::Identifier), t(T::ColonColon), t(T::Identifier)]),
            Alt::new(vec![
                t(T::Identifier),
                t(T::ColonColon),
                r("nested_namespace_specifier"),
            ]),
        ],
    ));
    rules.push(Rule::new(
        "namespace_alias_definition",
        vec![Alt::new(vec![
            t(T::Namespace),
            t(T::Identifier),
            t(T::Assign),
            r("qualified_identifier"),
            t(T::Semicolon),
        ])],
    ));
    rules.push(Rule::new(
        "using_declaration",
        vec![
            Alt::new(vec![t(T::Using), t(T::Identifier), t(T::Semicolon)]),
            Alt::new(vec![t(T::Using), r("qualified_identifier"), t(T::Semicolon)]),
            Alt::new(vec![
                t(T::Using),
                t(T::Namespace),
                t(T::Identifier),
                t(T::Semicolon),
            ]),
            Alt::new(vec![
                t(T::Using),
                t(T::Namespace),
                r("qualified_identifier"),
                t(T::Semicolon),
            ]),
            Alt::new(vec![
                t(T::Using),
                t(T::Enum),
                r("qualified_identifier"),
                t(T::Semicolon),
            ]),
        ],
    ));
    rules.push(Rule::new(
        "alias_declaration",
        vec![Alt::new(vec![
            t(T::Using),
            t(T::Identifier),
            t(T::Assign),
            r("type_descriptor"),
            t(T::Semicolon),
        ])],
    ));
    rules.push(Rule::new(
        "static_assert_declaration",
        vec![
            Alt::new(vec![
                t(T::StaticAssert),
                t(T::LParen),
                r("expression"),
                t(T::RParen),
                t(T::Semicolon),
            ]),
            Alt::new(vec![
                t(T::StaticAssert),
                t(T::LParen),
                r("expression"),
                t(T::Comma),
                r("string_literal"),
                t(T::RParen),
                t(T::Semicolon),
            ]),
        ],
    ));
    rules.push(Rule::new(
        "linkage_specification",
        vec![
            Alt::new(vec![t(T::Extern), t(T::StringLiteral), r("declaration")]),
            Alt::new(vec![t(T::Extern), t(T::StringLiteral), r("declaration_list")]),
        ],
    ));
    rules.push(Rule::new(
        "type_definition",
        vec![Alt::new(vec![
            t(T::Typedef),
            r("type_specifier"),
            r("declarator"),
            t(T::Semicolon),
        ])],
    ));
    rules.push(Rule::new(
        "module_declaration",
        vec![
            Alt::new(vec![t(T::Module), r("module_name"), t(T::Semicolon)]),
            Alt::new(vec![
                t(T::Export),
                t(T::Module),
                r("module_name"),
                t(T::Semicolon),
            ]),
            // Global module fragment: `module;`
            Alt::new(vec![t(T::Module), t(T::Semicolon)]),
        ],
    ));
    rules.push(Rule::new(
        "module_name",
        vec![
            Alt::new(vec![t(T::Identifier)]),
            Alt::new(vec![t(T::Identifier), t(T::Dot), r("module_name")]),
        ],
    ));
    rules.push(Rule::new(
        "import_declaration",
        vec![
            Alt::new(vec![t(T::Import), r("module_name"), t(T::Semicolon)]),
            Alt::new(vec![
                t(T::Export),
                t(T::Import),
                r("module_name"),
                t(T::Semicolon),
            ]),
            Alt::new(vec![t(T::Import), t(T::StringLiteral), t(T::Semicolon)]),
        ],
    ));
    rules.push(Rule::new(
        "export_block",
        vec![
            Alt::new(vec![t(T::Export), r("declaration_list")]),
            Alt::new(vec![t(T::Export), r("top_level_item")]),
        ],
    ));
}

fn declarations(rules: &mut Vec<Rule>) {
    rules.push(Rule::new(
        "declaration",
        vec![
            Alt::new(vec![
                r("declaration_specifiers"),
                r("init_declarator_seq"),
                t(T::Semicolon),
            ]),
            // Forward declarations: `struct S;`
            Alt::new(vec![r("declaration_specifiers"), t(T::Semicolon)]),
        ],
    ));
    rules.push(Rule::new(
        "function_definition",
        vec![Alt::new(vec![
            r("declaration_specifiers"),
            r("declarator"),
            r("compound_statement"),
        ])],
    ));
    rules.push(Rule::new(
        "declaration_specifiers",
        vec![
            Alt::new(vec![r("decl_specifier")]),
            Alt::new(vec![r("decl_specifier"), r("declaration_specifiers")]),
        ],
    ));
    rules.push(Rule::new(
        "decl_specifier",
        vec![
            Alt::new(vec![r("storage_class_specifier")]),
            Alt::new(vec![r("type_qualifier")]),
            Alt::new(vec![r("type_specifier")]),
            Alt::new(vec![r("attribute_specifier")]),
            Alt::new(vec![t(T::Virtual)]),
            Alt::new(vec![t(T::Explicit)]),
            Alt::new(vec![t(T::Friend)]),
        ],
    ));
    rules.push(Rule::new(
        "storage_class_specifier",
        vec![
            Alt::new(vec![t(T::Static)]),
            Alt::new(vec![t(T::Extern)]),
            Alt::new(vec![t(T::ThreadLocal)]),
            Alt::new(vec![t(T::Inline)]),
            Alt::new(vec![t(T::Mutable)]),
        ],
    ));
    rules.push(Rule::new(
        "type_qualifier",
        vec![
            Alt::new(vec![t(T::Const)]),
            Alt::new(vec![t(T::Volatile)]),
            Alt::new(vec![t(T::Constexpr)]),
            Alt::new(vec![t(T::Consteval)]),
            Alt::new(vec![t(T::Constinit)]),
        ],
    ));
    rules.push(Rule::new(
        "attribute_specifier",
        vec![Alt::new(vec![
            t(T::LBracket),
            t(T::LBracket),
            r("attribute"),
            t(T::RBracket),
            t(T::RBracket),
        ])],
    ));
    rules.push(Rule::new(
        "attribute",
        vec![
            Alt::new(vec![t(T::Identifier)]),
            Alt::new(vec![t(T::Identifier), r("argument_list")]),
            Alt::new(vec![
                t(T::Identifier),
                t(T::ColonColon),
                t(T::Identifier),
            ]),
        ],
    ));
    rules.push(Rule::new(
        "init_declarator_seq",
        vec![
            Alt::new(vec![r("init_declarator")]),
            Alt::new(vec![r("init_declarator"), t(T::Comma), r("init_declarator_seq")]),
        ],
    ));
    rules.push(Rule::new(
        "init_declarator",
        vec![
            Alt::new(vec![r("declarator")]),
            Alt::new(vec![r("declarator"), t(T::Assign), r("initializer")]),
            Alt::new(vec![r("declarator"), r("argument_list")]),
            Alt::new(vec![r("declarator"), r("initializer_list")]),
        ],
    ));
    rules.push(Rule::new(
        "initializer",
        vec![
            Alt::new(vec![r("expression")]),
            Alt::new(vec![r("initializer_list")]),
        ],
    ));
    rules.push(Rule::new(
        "initializer_list",
        vec![
            Alt::new(vec![t(T::LBrace), t(T::RBrace)]),
            Alt::new(vec![t(T::LBrace), r("initializer_seq"), t(T::RBrace)]),
        ],
    ));
    rules.push(Rule::new(
        "initializer_seq",
        vec![
            Alt::new(vec![r("initializer")]),
            Alt::new(vec![r("initializer"), t(T::Comma), r("initializer_seq")]),
        ],
    ));

    // Declarators.
    rules.push(Rule::new(
        "declarator",
        vec![
            Alt::new(vec![t(T::Identifier)]),
            Alt::new(vec![r("pointer_declarator")]),
            Alt::new(vec![r("reference_declarator")]),
            Alt::new(vec![r("function_declarator")]).with_prec(Prec::level(1)),
            Alt::new(vec![r("array_declarator")]).with_prec(Prec::level(1)),
            Alt::new(vec![r("parenthesized_declarator")])
                .with_prec(Prec::level(prec::PAREN_DECLARATOR)),
            Alt::new(vec![r("structured_binding_declarator")])
                .with_prec(Prec::level(prec::STRUCTURED_BINDING)),
            ordered(vec![r("qualified_identifier")]),
            Alt::new(vec![r("operator_name")]),
        ],
    ));
    rules.push(Rule::new(
        "pointer_declarator",
        vec![
            Alt::new(vec![t(T::Star), r("declarator")]),
            Alt::new(vec![t(T::Star), r("type_qualifier"), r("declarator")]),
        ],
    ));
    rules.push(Rule::new(
        "reference_declarator",
        vec![
            Alt::new(vec![t(T::Amp), r("declarator")]),
            Alt::new(vec![t(T::AmpAmp), r("declarator")]),
        ],
    ));
    rules.push(Rule::new(
        "function_declarator",
        vec![
            Alt::new(vec![r("declarator"), r("parameter_list")]),
            Alt::new(vec![r("declarator"), r("parameter_list"), r("function_suffix")]),
        ],
    ));
    rules.push(Rule::new(
        "function_suffix",
        vec![
            Alt::new(vec![r("type_qualifier")]),
            Alt::new(vec![r("ref_qualifier")]),
            Alt::new(vec![r("noexcept_specifier")]),
            Alt::new(vec![r("trailing_return_type")]),
            Alt::new(vec![r("requires_clause")]),
            Alt::new(vec![t(T::Override)]),
            Alt::new(vec![t(T::Final)]),
        ],
    ));
    rules.push(Rule::new(
        "ref_qualifier",
        vec![Alt::new(vec![t(T::Amp)]), Alt::new(vec![t(T::AmpAmp)])],
    ));
    rules.push(Rule::new(
        "noexcept_specifier",
        vec![
            Alt::new(vec![t(T::Noexcept)]),
            Alt::new(vec![t(T::Noexcept), t(T::LParen), r("expression"), t(T::RParen)]),
        ],
    ));
    rules.push(Rule::new(
        "trailing_return_type",
        vec![Alt::new(vec![t(T::Arrow), r("type_descriptor")])],
    ));
    rules.push(Rule::new(
        "array_declarator",
        vec![
            Alt::new(vec![r("declarator"), t(T::LBracket), t(T::RBracket)]),
            Alt::new(vec![
                r("declarator"),
                t(T::LBracket),
                r("expression"),
                t(T::RBracket),
            ]),
        ],
    ));
    rules.push(Rule::new(
        "parenthesized_declarator",
        vec![Alt::new(vec![
            t(T::LParen),
            r("declarator_or_expression"),
            t(T::RParen),
        ])],
    ));
    // The `int (x)` form: until the closing parenthesis the parenthesized
    // item reads both ways.
    rules.push(Rule::new(
        "declarator_or_expression",
        vec![
            Alt::new(vec![r("declarator")]),
            Alt::new(vec![r("expression")]),
        ],
    ));
    rules.push(Rule::new(
        "structured_binding_declarator",
        vec![Alt::new(vec![
            t(T::LBracket),
            r("binding_seq"),
            t(T::RBracket),
        ])],
    ));
    rules.push(Rule::new(
        "binding_seq",
        vec![
            Alt::new(vec![t(T::Identifier)]),
            Alt::new(vec![t(T::Identifier), t(T::Comma), r("binding_seq")]),
        ],
    ));
    rules.push(Rule::new(
        "operator_name",
        vec![Alt::new(vec![t(T::Operator), r("overloadable_operator")])],
    ));
    rules.push(Rule::new(
        "overloadable_operator",
        vec![
            Alt::new(vec![t(T::Plus)]),
            Alt::new(vec![t(T::Minus)]),
            Alt::new(vec![t(T::Star)]),
            Alt::new(vec![t(T::Slash)]),
            Alt::new(vec![t(T::Percent)]),
            Alt::new(vec![t(T::Assign)]),
            Alt::new(vec![t(T::EqEq)]),
            Alt::new(vec![t(T::BangEq)]),
            Alt::new(vec![t(T::Lt)]),
            Alt::new(vec![t(T::Gt)]),
            Alt::new(vec![t(T::LtEq)]),
            Alt::new(vec![t(T::GtEq)]),
            Alt::new(vec![t(T::Spaceship)]),
            Alt::new(vec![t(T::Shl)]),
            Alt::new(vec![t(T::Shr)]),
            Alt::new(vec![t(T::LParen), t(T::RParen)]),
            Alt::new(vec![t(T::LBracket), t(T::RBracket)]),
            Alt::new(vec![t(T::New)]),
            Alt::new(vec![t(T::Delete)]),
            Alt::new(vec![t(T::StringLiteral), t(T::Identifier)]),
        ],
    ));

    // Parameters.
    rules.push(Rule::new(
        "parameter_list",
        vec![
            Alt::new(vec![t(T::LParen), t(T::RParen)]),
            Alt::new(vec![t(T::LParen), r("parameter_seq"), t(T::RParen)]),
        ],
    ));
    rules.push(Rule::new(
        "parameter_seq",
        vec![
            Alt::new(vec![r("parameter_declaration")]),
            Alt::new(vec![
                r("parameter_declaration"),
                t(T::Comma),
                r("parameter_seq"),
            ]),
            ordered(vec![r("optional_parameter_declaration")]),
            ordered(vec![r("variadic_parameter_declaration")]),
            Alt::new(vec![t(T::Ellipsis)]),
        ],
    ));
    rules.push(Rule::new(
        "parameter_declaration",
        vec![
            Alt::new(vec![r("declaration_specifiers")]),
            Alt::new(vec![r("declaration_specifiers"), r("declarator")]),
            Alt::new(vec![r("declaration_specifiers"), r("abstract_declarator")]),
        ],
    ));
    rules.push(Rule::new(
        "optional_parameter_declaration",
        vec![
            Alt::new(vec![
                r("declaration_specifiers"),
                r("declarator"),
                t(T::Assign),
                r("expression"),
            ]),
            Alt::new(vec![
                r("declaration_specifiers"),
                t(T::Assign),
                r("expression"),
            ]),
        ],
    ));
    rules.push(Rule::new(
        "variadic_parameter_declaration",
        vec![
            Alt::new(vec![r("declaration_specifiers"), t(T::Ellipsis)]),
            Alt::new(vec![
                r("declaration_specifiers"),
                t(T::Ellipsis),
                t(T::Identifier),
            ]),
        ],
    ));
    rules.push(Rule::new(
        "abstract_declarator",
        vec![
            Alt::new(vec![r("abstract_pointer_declarator")]),
            Alt::new(vec![r("abstract_reference_declarator")]),
            Alt::new(vec![r("abstract_function_declarator")]),
            Alt::new(vec![r("abstract_array_declarator")]),
        ],
    ));
    rules.push(Rule::new(
        "abstract_pointer_declarator",
        vec![
            Alt::new(vec![t(T::Star)]),
            Alt::new(vec![t(T::Star), r("abstract_declarator")]),
        ],
    ));
    rules.push(Rule::new(
        "abstract_reference_declarator",
        vec![
            Alt::new(vec![t(T::Amp)]),
            Alt::new(vec![t(T::AmpAmp)]),
        ],
    ));
    rules.push(Rule::new(
        "abstract_function_declarator",
        vec![Alt::new(vec![r("parameter_list")])],
    ));
    rules.push(Rule::new(
        "abstract_array_declarator",
        vec![
            Alt::new(vec![t(T::LBracket), t(T::RBracket)]),
            Alt::new(vec![t(T::LBracket), r("expression"), t(T::RBracket)]),
        ],
    ));
}

fn types(rules: &mut Vec<Rule>) {
    rules.push(Rule::new(
        "type_specifier",
        vec![
            Alt::new(vec![r("struct_specifier")]),
            Alt::new(vec![r("class_specifier")]),
            Alt::new(vec![r("union_specifier")]),
            Alt::new(vec![r("enum_specifier")]),
            Alt::new(vec![r("sized_type_specifier")]),
            Alt::new(vec![t(T::PrimitiveType)]),
            Alt::new(vec![r("placeholder_type_specifier")]),
            Alt::new(vec![r("decltype_specifier")]),
            // `X<T>` vs `ns::X` both open with an identifier.
            Alt::new(vec![r("template_type")]),
            Alt::new(vec![r("qualified_type_identifier")]),
            Alt::new(vec![t(T::Identifier)]),
            Alt::new(vec![r("dependent_type_identifier")]),
        ],
    ));
    rules.push(Rule::new(
        "sized_type_specifier",
        vec![
            Alt::new(vec![t(T::Signed)]),
            Alt::new(vec![t(T::Unsigned)]),
            Alt::new(vec![t(T::Short)]),
            Alt::new(vec![t(T::Long)]),
            Alt::new(vec![t(T::Signed), r("type_specifier")]),
            Alt::new(vec![t(T::Unsigned), r("type_specifier")]),
            Alt::new(vec![t(T::Short), r("type_specifier")]),
            Alt::new(vec![t(T::Long), r("type_specifier")]),
        ],
    ));
    rules.push(Rule::new(
        "placeholder_type_specifier",
        vec![Alt::new(vec![t(T::Auto)])],
    ));
    rules.push(Rule::new(
        "decltype_specifier",
        vec![
            Alt::new(vec![t(T::Decltype), t(T::LParen), r("expression"), t(T::RParen)]),
            Alt::new(vec![t(T::Decltype), t(T::LParen), t(T::Auto), t(T::RParen)]),
        ],
    ));
    rules.push(Rule::new(
        "qualified_type_identifier",
        vec![
            Alt::new(vec![t(T::ColonColon), t(T::Identifier)]),
            Alt::new(vec![t(T::Identifier), t(T::ColonColon), t(T::Identifier)]),
            Alt::new(vec![
                t(T::Identifier),
                t(T::ColonColon),
                r("qualified_type_identifier"),
            ]),
        ],
    ));
    rules.push(Rule::new(
        "dependent_type_identifier",
        vec![Alt::new(vec![t(T::Typename), r("qualified_identifier")])],
    ));
    rules.push(Rule::new(
        "type_descriptor",
        vec![
            Alt::new(vec![r("type_specifier")]),
            Alt::new(vec![r("type_specifier"), r("abstract_declarator")]),
        ],
    ));

    rules.push(Rule::new(
        "enum_specifier",
        vec![
            Alt::new(vec![t(T::Enum), t(T::Identifier)]),
            Alt::new(vec![t(T::Enum), t(T::Identifier), r("enumerator_list")]),
            Alt::new(vec![t(T::Enum), r("enumerator_list")]),
            Alt::new(vec![t(T::Enum), t(T::Class), t(T::Identifier)]),
            Alt::new(vec![
                t(T::Enum),
                t(T::Class),
                t(T::Identifier),
                r("enumerator_list"),
            ]),
            Alt::new(vec![t(T::Enum), t(T::Struct), t(T::Identifier)]),
            Alt::new(vec![
                t(T::Enum),
                t(T::Identifier),
                t(T::Colon),
                r("type_specifier"),
                r("enumerator_list"),
            ]),
        ],
    ));
    rules.push(Rule::new(
        "enumerator_list",
        vec![
            Alt::new(vec![t(T::LBrace), t(T::RBrace)]),
            Alt::new(vec![t(T::LBrace), r("enumerator_seq"), t(T::RBrace)]),
        ],
    ));
    rules.push(Rule::new(
        "enumerator_seq",
        vec![
            Alt::new(vec![r("enumerator")]),
            Alt::new(vec![r("enumerator"), t(T::Comma), r("enumerator_seq")]),
        ],
    ));
    rules.push(Rule::new(
        "enumerator",
        vec![
            Alt::new(vec![t(T::Identifier)]),
            Alt::new(vec![t(T::Identifier), t(T::Assign), r("expression")]),
        ],
    ));
}

fn class_bodies(rules: &mut Vec<Rule>) {
    for (name, keyword) in [
        ("struct_specifier", T::Struct),
        ("class_specifier", T::Class),
        ("union_specifier", T::Union),
    ] {
        rules.push(Rule::new(
            name,
            vec![
                Alt::new(vec![t(keyword), t(T::Identifier)]),
                Alt::new(vec![t(keyword), t(T::Identifier), r("field_declaration_list")]),
                Alt::new(vec![
                    t(keyword),
                    t(T::Identifier),
                    r("base_class_clause"),
                    r("field_declaration_list"),
                ]),
                Alt::new(vec![t(keyword), r("field_declaration_list")]),
                Alt::new(vec![
                    t(keyword),
                    t(T::Identifier),
                    t(T::Final),
                    r("field_declaration_list"),
                ]),
            ],
        ));
    }
    rules.push(Rule::new(
        "base_class_clause",
        vec![
            Alt::new(vec![t(T::Colon), r("base_seq")]),
        ],
    ));
    rules.push(Rule::new(
        "base_seq",
        vec![
            Alt::new(vec![r("base_specifier")]),
            Alt::new(vec![r("base_specifier"), t(T::Comma), r("base_seq")]),
        ],
    ));
    rules.push(Rule::new(
        "base_specifier",
        vec![
            Alt::new(vec![t(T::Identifier)]),
            Alt::new(vec![t(T::Public), t(T::Identifier)]),
            Alt::new(vec![t(T::Private), t(T::Identifier)]),
            Alt::new(vec![t(T::Protected), t(T::Identifier)]),
            Alt::new(vec![t(T::Virtual), t(T::Identifier)]),
            ordered(vec![r("template_type")]),
            ordered(vec![r("qualified_identifier")]),
        ],
    ));
    rules.push(Rule::new(
        "field_declaration_list",
        vec![
            Alt::new(vec![t(T::LBrace), t(T::RBrace)]),
            Alt::new(vec![t(T::LBrace), r("field_item_seq"), t(T::RBrace)]),
        ],
    ));
    rules.push(Rule::new(
        "field_item_seq",
        vec![
            Alt::new(vec![r("field_item")]),
            Alt::new(vec![r("field_item"), r("field_item_seq")]),
        ],
    ));
    rules.push(Rule::new(
        "field_item",
        vec![
            Alt::new(vec![r("field_declaration")]),
            Alt::new(vec![r("access_specifier")]),
            ordered(vec![r("friend_declaration")]),
            ordered(vec![r("inline_method_definition")]),
            ordered(vec![r("constructor_or_destructor_definition")]),
            ordered(vec![r("constructor_or_destructor_declaration")]),
            ordered(vec![r("operator_cast_definition")]),
            ordered(vec![r("operator_cast_declaration")]),
            ordered(vec![r("using_declaration")]),
            ordered(vec![r("alias_declaration")]),
            Alt::new(vec![r("static_assert_declaration")]),
            ordered(vec![r("template_declaration")]),
            Alt::new(vec![r("type_definition")]),
        ],
    ));
    rules.push(Rule::new(
        "access_specifier",
        vec![
            Alt::new(vec![t(T::Public), t(T::Colon)]),
            Alt::new(vec![t(T::Private), t(T::Colon)]),
            Alt::new(vec![t(T::Protected), t(T::Colon)]),
        ],
    ));
    rules.push(Rule::new(
        "field_declaration",
        vec![
            Alt::new(vec![r("declaration_specifiers"), t(T::Semicolon)]),
            Alt::new(vec![
                r("declaration_specifiers"),
                r("declarator"),
                t(T::Semicolon),
            ]),
            Alt::new(vec![
                r("declaration_specifiers"),
                r("declarator"),
                r("bitfield_clause"),
                t(T::Semicolon),
            ]),
            Alt::new(vec![
                r("declaration_specifiers"),
                r("declarator"),
                t(T::Assign),
                r("initializer"),
                t(T::Semicolon),
            ]),
            Alt::new(vec![
                r("declaration_specifiers"),
                r("declarator"),
                r("initializer_list"),
                t(T::Semicolon),
            ]),
        ],
    ));
    rules.push(Rule::new(
        "bitfield_clause",
        vec![Alt::new(vec![t(T::Colon), r("expression")])],
    ));
    rules.push(Rule::new(
        "friend_declaration",
        vec![
            Alt::new(vec![t(T::Friend), r("declaration")]),
            Alt::new(vec![t(T::Friend), t(T::Class), t(T::Identifier), t(T::Semicolon)]),
            Alt::new(vec![t(T::Friend), t(T::Struct), t(T::Identifier), t(T::Semicolon)]),
        ],
    ));
    rules.push(Rule::new(
        "inline_method_definition",
        vec![Alt::new(vec![
            r("declaration_specifiers"),
            r("declarator"),
            r("compound_statement"),
        ])],
    ));
    rules.push(Rule::new(
        "constructor_or_destructor_definition",
        vec![
            Alt::new(vec![r("function_declarator"), r("compound_statement")]),
            Alt::new(vec![
                r("function_declarator"),
                r("field_initializer_list"),
                r("compound_statement"),
            ]),
            Alt::new(vec![t(T::Tilde), r("function_declarator"), r("compound_statement")]),
        ],
    ));
    rules.push(Rule::new(
        "constructor_or_destructor_declaration",
        vec![
            Alt::new(vec![r("function_declarator"), t(T::Semicolon)]),
            Alt::new(vec![
                r("function_declarator"),
                r("default_method_clause"),
                t(T::Semicolon),
            ]),
            Alt::new(vec![
                r("function_declarator"),
                r("delete_method_clause"),
                t(T::Semicolon),
            ]),
            Alt::new(vec![t(T::Tilde), r("function_declarator"), t(T::Semicolon)]),
        ],
    ));
    rules.push(Rule::new(
        "default_method_clause",
        vec![Alt::new(vec![t(T::Assign), t(T::Default)])],
    ));
    rules.push(Rule::new(
        "delete_method_clause",
        vec![Alt::new(vec![t(T::Assign), t(T::Delete)])],
    ));
    rules.push(Rule::new(
        "field_initializer_list",
        vec![Alt::new(vec![t(T::Colon), r("field_initializer_seq")])],
    ));
    rules.push(Rule::new(
        "field_initializer_seq",
        vec![
            Alt::new(vec![r("field_initializer")]),
            Alt::new(vec![
                r("field_initializer"),
                t(T::Comma),
                r("field_initializer_seq"),
            ]),
        ],
    ));
    rules.push(Rule::new(
        "field_initializer",
        vec![
            Alt::new(vec![t(T::Identifier), r("argument_list")]),
            Alt::new(vec![t(T::Identifier), r("initializer_list")]),
        ],
    ));
    rules.push(Rule::new(
        "operator_cast",
        vec![Alt::new(vec![t(T::Operator), r("type_descriptor")])],
    ));
    rules.push(Rule::new(
        "operator_cast_definition",
        vec![Alt::new(vec![
            r("operator_cast"),
            r("parameter_list"),
            r("compound_statement"),
        ])],
    ));
    rules.push(Rule::new(
        "operator_cast_declaration",
        vec![Alt::new(vec![
            r("operator_cast"),
            r("parameter_list"),
            t(T::Semicolon),
        ])],
    ));
}

fn templates(rules: &mut Vec<Rule>) {
    rules.push(Rule::new(
        "template_declaration",
        vec![
            Alt::new(vec![
                t(T::Template),
                r("template_parameter_list"),
                r("top_level_item"),
            ]),
            Alt::new(vec![
                t(T::Template),
                r("template_parameter_list"),
                r("requires_clause"),
                r("top_level_item"),
            ]),
        ],
    ));
    rules.push(Rule::new(
        "template_instantiation",
        vec![
            Alt::new(vec![t(T::Template), r("declaration")]),
            Alt::new(vec![t(T::Extern), t(T::Template), r("declaration")]),
        ],
    ));
    rules.push(Rule::new(
        "template_parameter_list",
        vec![
            Alt::new(vec![t(T::Lt), t(T::Gt)]),
            Alt::new(vec![t(T::Lt), r("template_parameter_seq"), t(T::Gt)]),
        ],
    ));
    rules.push(Rule::new(
        "template_parameter_seq",
        vec![
            Alt::new(vec![r("template_parameter")]),
            Alt::new(vec![
                r("template_parameter"),
                t(T::Comma),
                r("template_parameter_seq"),
            ]),
        ],
    ));
    rules.push(Rule::new(
        "template_parameter",
        vec![
            // `template<class T>` vs `template<class T x>`: the head alone
            // cannot tell a type parameter from a value parameter.
            Alt::new(vec![r("type_parameter_declaration")]),
            Alt::new(vec![r("parameter_declaration")]),
            ordered(vec![r("optional_type_parameter_declaration")]),
            ordered(vec![r("variadic_type_parameter_declaration")]),
            Alt::new(vec![r("template_template_parameter_declaration")]),
        ],
    ));
    rules.push(Rule::new(
        "type_parameter_declaration",
        vec![
            Alt::new(vec![t(T::Typename)]),
            Alt::new(vec![t(T::Class)]),
            Alt::new(vec![t(T::Typename), t(T::Identifier)]),
            Alt::new(vec![t(T::Class), t(T::Identifier)]),
        ],
    ));
    rules.push(Rule::new(
        "optional_type_parameter_declaration",
        vec![
            Alt::new(vec![
                t(T::Typename),
                t(T::Identifier),
                t(T::Assign),
                r("type_specifier"),
            ]),
            Alt::new(vec![
                t(T::Class),
                t(T::Identifier),
                t(T::Assign),
                r("type_specifier"),
            ]),
        ],
    ));
    rules.push(Rule::new(
        "variadic_type_parameter_declaration",
        vec![
            Alt::new(vec![t(T::Typename), t(T::Ellipsis)]),
            Alt::new(vec![t(T::Typename), t(T::Ellipsis), t(T::Identifier)]),
            Alt::new(vec![t(T::Class), t(T::Ellipsis), t(T::Identifier)]),
        ],
    ));
    rules.push(Rule::new(
        "template_template_parameter_declaration",
        vec![Alt::new(vec![
            t(T::Template),
            r("template_parameter_list"),
            r("type_parameter_declaration"),
        ])],
    ));
    rules.push(Rule::new(
        "template_type",
        vec![Alt::new(vec![t(T::Identifier), r("template_argument_list")])],
    ));
    rules.push(Rule::new(
        "template_function",
        vec![Alt::new(vec![t(T::Identifier), r("template_argument_list")])],
    ));
    rules.push(Rule::new(
        "template_method",
        vec![Alt::new(vec![t(T::Identifier), r("template_argument_list")])],
    ));
    rules.push(Rule::new(
        "template_argument_list",
        vec![
            Alt::new(vec![t(T::Lt), t(T::Gt)]),
            Alt::new(vec![t(T::Lt), r("template_argument_seq"), t(T::Gt)]),
        ],
    ));
    rules.push(Rule::new(
        "template_argument_seq",
        vec![
            Alt::new(vec![r("template_argument")]),
            Alt::new(vec![
                r("template_argument"),
                t(T::Comma),
                r("template_argument_seq"),
            ]),
        ],
    ));
    rules.push(Rule::new(
        "template_argument",
        vec![
            // `f<a>` — `a` reads as a type name and as an expression.
            Alt::new(vec![r("type_specifier")]),
            Alt::new(vec![r("expression")]),
        ],
    ));

    // Concepts.
    rules.push(Rule::new(
        "concept_definition",
        vec![Alt::new(vec![
            t(T::Concept),
            t(T::Identifier),
            t(T::Assign),
            r("expression"),
            t(T::Semicolon),
        ])],
    ));
    rules.push(Rule::new(
        "requires_clause",
        vec![Alt::new(vec![t(T::Requires), r("expression")])],
    ));
    rules.push(Rule::new(
        "requires_expression",
        vec![
            Alt::new(vec![t(T::Requires), r("requirement_list")]),
            Alt::new(vec![t(T::Requires), r("parameter_list"), r("requirement_list")]),
        ],
    ));
    rules.push(Rule::new(
        "requirement_list",
        vec![
            Alt::new(vec![t(T::LBrace), t(T::RBrace)]),
            Alt::new(vec![t(T::LBrace), r("requirement_seq"), t(T::RBrace)]),
        ],
    ));
    rules.push(Rule::new(
        "requirement_seq",
        vec![
            Alt::new(vec![r("requirement")]),
            Alt::new(vec![r("requirement"), r("requirement_seq")]),
        ],
    ));
    rules.push(Rule::new(
        "requirement",
        vec![
            Alt::new(vec![r("simple_requirement")]),
            Alt::new(vec![r("type_requirement")]),
            Alt::new(vec![r("compound_requirement")]),
            ordered(vec![r("nested_requirement")]),
        ],
    ));
    rules.push(Rule::new(
        "simple_requirement",
        vec![Alt::new(vec![r("expression"), t(T::Semicolon)])],
    ));
    rules.push(Rule::new(
        "type_requirement",
        vec![Alt::new(vec![t(T::Typename), r("qualified_identifier"), t(T::Semicolon)])],
    ));
    rules.push(Rule::new(
        "compound_requirement",
        vec![
            Alt::new(vec![
                t(T::LBrace),
                r("expression"),
                t(T::RBrace),
                t(T::Semicolon),
            ]),
            Alt::new(vec![
                t(T::LBrace),
                r("expression"),
                t(T::RBrace),
                t(T::Noexcept),
                t(T::Semicolon),
            ]),
            Alt::new(vec![
                t(T::LBrace),
                r("expression"),
                t(T::RBrace),
                t(T::Arrow),
                r("type_descriptor"),
                t(T::Semicolon),
            ]),
        ],
    ));
    rules.push(Rule::new(
        "nested_requirement",
        vec![Alt::new(vec![t(T::Requires), r("expression"), t(T::Semicolon)])],
    ));
}

fn statements(rules: &mut Vec<Rule>) {
    rules.push(Rule::new(
        "statement",
        vec![
            Alt::new(vec![r("compound_statement")]),
            // `T(a);` — statement-or-declaration stays live to the end.
            Alt::new(vec![r("expression_statement")]),
            Alt::new(vec![r("declaration")]),
            Alt::new(vec![r("if_statement")]),
            Alt::new(vec![r("while_statement")]),
            Alt::new(vec![r("do_statement")]),
            Alt::new(vec![r("for_statement")]),
            ordered(vec![r("for_range_loop")]),
            Alt::new(vec![r("switch_statement")]),
            Alt::new(vec![r("case_statement")]),
            Alt::new(vec![r("break_statement")]),
            Alt::new(vec![r("continue_statement")]),
            Alt::new(vec![r("return_statement")]),
            Alt::new(vec![r("co_return_statement")]),
            Alt::new(vec![r("goto_statement")]),
            ordered(vec![r("labeled_statement")]),
            Alt::new(vec![r("try_statement")]),
            ordered(vec![r("attributed_statement")]),
        ],
    ));
    rules.push(Rule::new(
        "statement_seq",
        vec![
            Alt::new(vec![r("statement")]),
            Alt::new(vec![r("statement"), r("statement_seq")]),
        ],
    ));
    rules.push(Rule::new(
        "compound_statement",
        vec![
            Alt::new(vec![t(T::LBrace), t(T::RBrace)]),
            Alt::new(vec![t(T::LBrace), r("statement_seq"), t(T::RBrace)]),
        ],
    ));
    rules.push(Rule::new(
        "expression_statement",
        vec![
            Alt::new(vec![r("expression"), t(T::Semicolon)]),
            Alt::new(vec![r("comma_expression"), t(T::Semicolon)])
                .with_prec(Prec::level(-1)),
            Alt::new(vec![t(T::Semicolon)]),
        ],
    ));
    rules.push(Rule::new(
        "if_statement",
        vec![
            Alt::new(vec![t(T::If), r("condition_clause"), r("statement")]),
            Alt::new(vec![
                t(T::If),
                r("condition_clause"),
                r("statement"),
                r("else_clause"),
            ]),
            Alt::new(vec![
                t(T::If),
                t(T::Constexpr),
                r("condition_clause"),
                r("statement"),
            ]),
        ],
    ));
    rules.push(Rule::new(
        "condition_clause",
        vec![Alt::new(vec![t(T::LParen), r("condition_body"), t(T::RParen)])],
    ));
    rules.push(Rule::new(
        "condition_body",
        vec![
            Alt::new(vec![r("expression")]),
            ordered(vec![r("condition_declaration")]),
        ],
    ));
    rules.push(Rule::new(
        "condition_declaration",
        vec![
            Alt::new(vec![
                r("declaration_specifiers"),
                r("declarator"),
                t(T::Assign),
                r("expression"),
            ]),
            Alt::new(vec![
                r("declaration_specifiers"),
                r("declarator"),
                r("initializer_list"),
            ]),
        ],
    ));
    rules.push(Rule::new(
        "else_clause",
        vec![Alt::new(vec![t(T::Else), r("statement")])],
    ));
    rules.push(Rule::new(
        "while_statement",
        vec![Alt::new(vec![t(T::While), r("condition_clause"), r("statement")])],
    ));
    rules.push(Rule::new(
        "do_statement",
        vec![Alt::new(vec![
            t(T::Do),
            r("statement"),
            t(T::While),
            t(T::LParen),
            r("expression"),
            t(T::RParen),
            t(T::Semicolon),
        ])],
    ));
    rules.push(Rule::new(
        "for_statement",
        vec![
            Alt::new(vec![
                t(T::For),
                t(T::LParen),
                r("declaration"),
                r("expression"),
                t(T::Semicolon),
                r("expression"),
                t(T::RParen),
                r("statement"),
            ]),
            Alt::new(vec![
                t(T::For),
                t(T::LParen),
                r("expression_statement"),
                r("expression"),
                t(T::Semicolon),
                r("expression"),
                t(T::RParen),
                r("statement"),
            ]),
            Alt::new(vec![
                t(T::For),
                t(T::LParen),
                r("expression_statement"),
                t(T::Semicolon),
                t(T::RParen),
                r("statement"),
            ]),
        ],
    ));
    rules.push(Rule::new(
        "for_range_loop",
        vec![Alt::new(vec![
            t(T::For),
            t(T::LParen),
            r("declaration_specifiers"),
            r("declarator"),
            t(T::Colon),
            r("expression"),
            t(T::RParen),
            r("statement"),
        ])],
    ));
    rules.push(Rule::new(
        "switch_statement",
        vec![Alt::new(vec![
            t(T::Switch),
            r("condition_clause"),
            r("compound_statement"),
        ])],
    ));
    rules.push(Rule::new(
        "case_statement",
        vec![
            Alt::new(vec![t(T::Case), r("expression"), t(T::Colon)]),
            Alt::new(vec![t(T::Case), r("expression"), t(T::Colon), r("statement_seq")]),
            Alt::new(vec![t(T::Default), t(T::Colon)]),
            Alt::new(vec![t(T::Default), t(T::Colon), r("statement_seq")]),
        ],
    ));
    rules.push(Rule::new(
        "break_statement",
        vec![Alt::new(vec![t(T::Break), t(T::Semicolon)])],
    ));
    rules.push(Rule::new(
        "continue_statement",
        vec![Alt::new(vec![t(T::Continue), t(T::Semicolon)])],
    ));
    rules.push(Rule::new(
        "return_statement",
        vec![
            Alt::new(vec![t(T::Return), t(T::Semicolon)]),
            Alt::new(vec![t(T::Return), r("expression"), t(T::Semicolon)]),
            Alt::new(vec![t(T::Return), r("initializer_list"), t(T::Semicolon)]),
        ],
    ));
    rules.push(Rule::new(
        "co_return_statement",
        vec![
            Alt::new(vec![t(T::CoReturn), t(T::Semicolon)]),
            Alt::new(vec![t(T::CoReturn), r("expression"), t(T::Semicolon)]),
        ],
    ));
    rules.push(Rule::new(
        "goto_statement",
        vec![Alt::new(vec![t(T::Goto), t(T::Identifier), t(T::Semicolon)])],
    ));
    rules.push(Rule::new(
        "labeled_statement",
        vec![Alt::new(vec![t(T::Identifier), t(T::Colon), r("statement")])],
    ));
    rules.push(Rule::new(
        "try_statement",
        vec![Alt::new(vec![
            t(T::Try),
            r("compound_statement"),
            r("catch_seq"),
        ])],
    ));
    rules.push(Rule::new(
        "catch_seq",
        vec![
            Alt::new(vec![r("catch_clause")]),
            Alt::new(vec![r("catch_clause"), r("catch_seq")]),
        ],
    ));
    rules.push(Rule::new(
        "catch_clause",
        vec![Alt::new(vec![
            t(T::Catch),
            r("parameter_list"),
            r("compound_statement"),
        ])],
    ));
    rules.push(Rule::new(
        "attributed_statement",
        vec![Alt::new(vec![r("attribute_specifier"), r("statement")])],
    ));
}

fn expressions(rules: &mut Vec<Rule>) {
    let alts = vec![
        Alt::new(vec![r("conditional_expression")]).with_prec(Prec::right(prec::CONDITIONAL)),
        Alt::new(vec![r("assignment_expression")]).with_prec(Prec::right(prec::ASSIGNMENT)),
        Alt::new(vec![r("binary_expression")]).with_prec(Prec::level(prec::DEFAULT)),
        Alt::new(vec![r("unary_expression")]).with_prec(Prec::level(prec::UNARY)),
        Alt::new(vec![r("update_expression")]).with_prec(Prec::level(prec::UNARY)),
        Alt::new(vec![r("cast_expression")]).with_prec(Prec::level(prec::CAST)),
        Alt::new(vec![r("pointer_expression")]).with_prec(Prec::level(prec::UNARY)),
        Alt::new(vec![r("sizeof_expression")]).with_prec(Prec::level(prec::SIZEOF)),
        Alt::new(vec![r("alignof_expression")]).with_prec(Prec::level(prec::SIZEOF)),
        Alt::new(vec![r("subscript_expression")]).with_prec(Prec::level(prec::SUBSCRIPT)),
        Alt::new(vec![r("call_expression")]).with_prec(Prec::level(prec::CALL)),
        Alt::new(vec![r("field_expression")]).with_prec(Prec::level(prec::FIELD)),
        Alt::new(vec![r("new_expression")]).with_prec(Prec::level(prec::NEW)),
        Alt::new(vec![r("delete_expression")]).with_prec(Prec::level(prec::UNARY)),
        Alt::new(vec![r("lambda_expression")]).with_prec(Prec::level(prec::LAMBDA)),
        Alt::new(vec![r("fold_expression")]).with_prec(Prec::level(prec::DEFAULT)),
        Alt::new(vec![r("parenthesized_expression")]).with_prec(Prec::level(prec::DEFAULT)),
        Alt::new(vec![r("throw_expression")]).with_prec(Prec::level(prec::DEFAULT)),
        Alt::new(vec![r("co_await_expression")]).with_prec(Prec::level(prec::UNARY)),
        Alt::new(vec![r("co_yield_expression")]).with_prec(Prec::level(prec::DEFAULT)),
        Alt::new(vec![r("requires_expression")]).with_prec(Prec::level(prec::DEFAULT)),
        Alt::new(vec![r("typeid_expression")]).with_prec(Prec::level(prec::CALL)),
        Alt::new(vec![r("static_cast_expression")]).with_prec(Prec::level(prec::CALL)),
        Alt::new(vec![r("dynamic_cast_expression")]).with_prec(Prec::level(prec::CALL)),
        Alt::new(vec![r("const_cast_expression")]).with_prec(Prec::level(prec::CALL)),
        Alt::new(vec![r("reinterpret_cast_expression")]).with_prec(Prec::level(prec::CALL)),
        ordered(vec![r("qualified_identifier")]),
        Alt::new(vec![r("template_function")]),
        Alt::new(vec![r("string_literal")]),
        Alt::new(vec![t(T::Identifier)]),
        Alt::new(vec![t(T::NumberLiteral)]),
        Alt::new(vec![t(T::CharLiteral)]),
        Alt::new(vec![t(T::True)]),
        Alt::new(vec![t(T::False)]),
        Alt::new(vec![t(T::Nullptr)]),
        Alt::new(vec![t(T::This)]),
    ];
    rules.push(Rule::new("expression", alts));

    rules.push(Rule::new(
        "conditional_expression",
        vec![Alt::new(vec![
            r("expression"),
            t(T::Question),
            r("expression"),
            t(T::Colon),
            r("expression"),
        ])
        .with_prec(Prec::right(prec::CONDITIONAL))],
    ));
    rules.push(Rule::new(
        "assignment_expression",
        vec![Alt::new(vec![
            r("expression"),
            r("assignment_operator"),
            r("expression"),
        ])
        .with_prec(Prec::right(prec::ASSIGNMENT))],
    ));
    rules.push(Rule::new(
        "assignment_operator",
        [
            T::Assign,
            T::PlusAssign,
            T::MinusAssign,
            T::StarAssign,
            T::SlashAssign,
            T::PercentAssign,
            T::CaretAssign,
            T::AmpAssign,
            T::PipeAssign,
            T::ShlAssign,
            T::ShrAssign,
            T::AndEq,
            T::OrEq,
            T::XorEq,
        ]
        .into_iter()
        .map(|op| Alt::new(vec![t(op)]))
        .collect(),
    ));
    // One alternative per operator, carrying the calibrated level.
    rules.push(Rule::new(
        "binary_expression",
        cpp_binary_operators()
            .into_iter()
            .map(|op| {
                Alt::new(vec![r("expression"), t(op.token), r("expression")]).with_prec(Prec {
                    level: op.level,
                    assoc: Some(op.assoc),
                    dynamic: op.dynamic,
                })
            })
            .collect(),
    ));
    rules.push(Rule::new(
        "unary_expression",
        [T::Bang, T::Not, T::Tilde, T::Compl, T::Minus, T::Plus]
            .into_iter()
            .map(|op| Alt::new(vec![t(op), r("expression")]).with_prec(Prec::right(prec::UNARY)))
            .collect(),
    ));
    rules.push(Rule::new(
        "update_expression",
        vec![
            Alt::new(vec![t(T::PlusPlus), r("expression")]),
            Alt::new(vec![t(T::MinusMinus), r("expression")]),
            Alt::new(vec![r("expression"), t(T::PlusPlus)]),
            Alt::new(vec![r("expression"), t(T::MinusMinus)]),
        ],
    ));
    rules.push(Rule::new(
        "cast_expression",
        vec![Alt::new(vec![
            t(T::LParen),
            r("type_descriptor"),
            t(T::RParen),
            r("expression"),
        ])
        .with_prec(Prec::right(prec::CAST))],
    ));
    rules.push(Rule::new(
        "pointer_expression",
        vec![
            Alt::new(vec![t(T::Star), r("expression")]).with_prec(Prec::right(prec::UNARY)),
            Alt::new(vec![t(T::Amp), r("expression")]).with_prec(Prec::right(prec::UNARY)),
        ],
    ));
    rules.push(Rule::new(
        "sizeof_expression",
        vec![
            Alt::new(vec![t(T::Sizeof), r("expression")]),
            Alt::new(vec![
                t(T::Sizeof),
                t(T::LParen),
                r("type_descriptor"),
                t(T::RParen),
            ]),
            Alt::new(vec![
                t(T::Sizeof),
                t(T::Ellipsis),
                t(T::LParen),
                t(T::Identifier),
                t(T::RParen),
            ]),
        ],
    ));
    rules.push(Rule::new(
        "alignof_expression",
        vec![Alt::new(vec![
            t(T::Alignof),
            t(T::LParen),
            r("type_descriptor"),
            t(T::RParen),
        ])],
    ));
    rules.push(Rule::new(
        "subscript_expression",
        vec![Alt::new(vec![
            r("expression"),
            t(T::LBracket),
            r("expression"),
            t(T::RBracket),
        ])],
    ));
    rules.push(Rule::new(
        "call_expression",
        vec![Alt::new(vec![r("expression"), r("argument_list")])],
    ));
    rules.push(Rule::new(
        "argument_list",
        vec![
            Alt::new(vec![t(T::LParen), t(T::RParen)]),
            Alt::new(vec![t(T::LParen), r("argument_seq"), t(T::RParen)]),
        ],
    ));
    rules.push(Rule::new(
        "argument_seq",
        vec![
            Alt::new(vec![r("expression")]),
            Alt::new(vec![r("expression"), t(T::Comma), r("argument_seq")]),
            Alt::new(vec![r("initializer_list")]),
            Alt::new(vec![r("initializer_list"), t(T::Comma), r("argument_seq")]),
        ],
    ));
    rules.push(Rule::new(
        "field_expression",
        vec![
            Alt::new(vec![r("expression"), t(T::Dot), t(T::Identifier)]),
            Alt::new(vec![r("expression"), t(T::Arrow), t(T::Identifier)]),
            Alt::new(vec![r("expression"), t(T::Dot), r("template_method")]),
            Alt::new(vec![r("expression"), t(T::Arrow), r("template_method")]),
            Alt::new(vec![r("expression"), t(T::DotStar), r("expression")]),
            Alt::new(vec![r("expression"), t(T::ArrowStar), r("expression")]),
        ],
    ));
    rules.push(Rule::new(
        "new_expression",
        vec![
            Alt::new(vec![t(T::New), r("type_specifier")]),
            Alt::new(vec![t(T::New), r("type_specifier"), r("argument_list")]),
            Alt::new(vec![t(T::New), r("type_specifier"), r("initializer_list")]),
            Alt::new(vec![t(T::New), r("type_specifier"), r("new_declarator")]),
            // Placement form: `new (buf) T(args)`.
            Alt::new(vec![
                t(T::New),
                r("argument_list"),
                r("type_specifier"),
                r("argument_list"),
            ]),
            Alt::new(vec![t(T::ColonColon), t(T::New), r("type_specifier")]),
        ],
    ));
    rules.push(Rule::new(
        "new_declarator",
        vec![
            Alt::new(vec![t(T::LBracket), r("expression"), t(T::RBracket)]),
            Alt::new(vec![
                t(T::LBracket),
                r("expression"),
                t(T::RBracket),
                r("new_declarator"),
            ]),
        ],
    ));
    rules.push(Rule::new(
        "delete_expression",
        vec![
            Alt::new(vec![t(T::Delete), r("expression")]),
            Alt::new(vec![t(T::Delete), t(T::LBracket), t(T::RBracket), r("expression")]),
            Alt::new(vec![t(T::ColonColon), t(T::Delete), r("expression")]),
        ],
    ));
    rules.push(Rule::new(
        "lambda_expression",
        vec![
            Alt::new(vec![r("lambda_capture_specifier"), r("compound_statement")]),
            Alt::new(vec![
                r("lambda_capture_specifier"),
                r("parameter_list"),
                r("compound_statement"),
            ]),
            Alt::new(vec![
                r("lambda_capture_specifier"),
                r("parameter_list"),
                r("trailing_return_type"),
                r("compound_statement"),
            ]),
            Alt::new(vec![
                r("lambda_capture_specifier"),
                r("template_parameter_list"),
                r("parameter_list"),
                r("compound_statement"),
            ]),
        ],
    ));
    rules.push(Rule::new(
        "lambda_capture_specifier",
        vec![
            Alt::new(vec![t(T::LBracket), t(T::RBracket)]),
            Alt::new(vec![t(T::LBracket), r("lambda_default_capture"), t(T::RBracket)]),
            Alt::new(vec![t(T::LBracket), r("capture_seq"), t(T::RBracket)]),
        ],
    ));
    rules.push(Rule::new(
        "lambda_default_capture",
        vec![Alt::new(vec![t(T::Assign)]), Alt::new(vec![t(T::Amp)])],
    ));
    rules.push(Rule::new(
        "capture_seq",
        vec![
            Alt::new(vec![t(T::Identifier)]),
            Alt::new(vec![t(T::Amp), t(T::Identifier)]),
            Alt::new(vec![t(T::This)]),
            Alt::new(vec![t(T::Identifier), t(T::Comma), r("capture_seq")]),
            Alt::new(vec![t(T::Amp), t(T::Identifier), t(T::Comma), r("capture_seq")]),
        ],
    ));
    rules.push(Rule::new(
        "fold_expression",
        vec![
            // `(... op pack)` — left fold.
            Alt::new(vec![
                t(T::LParen),
                t(T::Ellipsis),
                r("fold_operator"),
                r("expression"),
                t(T::RParen),
            ]),
            // `(pack op ...)` — right fold.
            Alt::new(vec![
                t(T::LParen),
                r("expression"),
                r("fold_operator"),
                t(T::Ellipsis),
                t(T::RParen),
            ]),
            // `(init op ... op pack)` — binary fold.
            Alt::new(vec![
                t(T::LParen),
                r("expression"),
                r("fold_operator"),
                t(T::Ellipsis),
                r("fold_operator"),
                r("expression"),
                t(T::RParen),
            ]),
        ],
    ));
    rules.push(Rule::new(
        "fold_operator",
        FOLD_OPERATORS
            .iter()
            .map(|&op| Alt::new(vec![t(op)]))
            .collect(),
    ));
    rules.push(Rule::new(
        "parenthesized_expression",
        vec![
            Alt::new(vec![t(T::LParen), r("expression"), t(T::RParen)]),
            Alt::new(vec![t(T::LParen), r("comma_expression"), t(T::RParen)]),
        ],
    ));
    rules.push(Rule::new(
        "comma_expression",
        vec![Alt::new(vec![r("expression"), t(T::Comma), r("expression")])],
    ));
    rules.push(Rule::new(
        "throw_expression",
        vec![
            Alt::new(vec![t(T::Throw)]),
            Alt::new(vec![t(T::Throw), r("expression")]),
        ],
    ));
    rules.push(Rule::new(
        "co_await_expression",
        vec![Alt::new(vec![t(T::CoAwait), r("expression")])],
    ));
    rules.push(Rule::new(
        "co_yield_expression",
        vec![Alt::new(vec![t(T::CoYield), r("expression")])],
    ));
    rules.push(Rule::new(
        "typeid_expression",
        vec![Alt::new(vec![
            t(T::Typeid),
            t(T::LParen),
            r("typeid_body"),
            t(T::RParen),
        ])],
    ));
    rules.push(Rule::new(
        "typeid_body",
        vec![
            Alt::new(vec![r("expression")]),
            ordered(vec![r("type_descriptor")]),
        ],
    ));
    for (name, keyword) in [
        ("static_cast_expression", T::StaticCast),
        ("dynamic_cast_expression", T::DynamicCast),
        ("const_cast_expression", T::ConstCast),
        ("reinterpret_cast_expression", T::ReinterpretCast),
    ] {
        rules.push(Rule::new(
            name,
            vec![Alt::new(vec![
                t(keyword),
                t(T::Lt),
                r("type_descriptor"),
                t(T::Gt),
                t(T::LParen),
                r("expression"),
                t(T::RParen),
            ])],
        ));
    }
    rules.push(Rule::new(
        "qualified_identifier",
        vec![
            Alt::new(vec![t(T::ColonColon), t(T::Identifier)]),
            Alt::new(vec![t(T::Identifier), t(T::ColonColon), t(T::Identifier)]),
            Alt::new(vec![
                t(T::Identifier),
                t(T::ColonColon),
                r("qualified_identifier"),
            ]),
            Alt::new(vec![t(T::Identifier), t(T::ColonColon), r("operator_name")]),
        ],
    ));
    rules.push(Rule::new(
        "string_literal",
        vec![
            Alt::new(vec![t(T::StringLiteral)]),
            Alt::new(vec![r("raw_string_literal")]),
        ],
    ));
    rules.push(Rule::new(
        "raw_string_literal",
        vec![Alt::new(vec![
            Symbol::External(ExternalToken::RawStringDelimiter),
            Symbol::External(ExternalToken::RawStringContent),
            Symbol::External(ExternalToken::RawStringDelimiter),
        ])],
    ));
}
