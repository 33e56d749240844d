//! The declared conflict set.
//!
//! Each group names rules that are allowed to stay simultaneously live
//! while the parser explores candidates; any ambiguity outside this set is
//! a grammar defect that [`build`](crate::build) rejects. A singleton group
//! declares a rule ambiguous with itself: distinct candidates within the
//! same rule (a class-head that may or may not be a definition, say) may
//! coexist until later tokens settle it.

/// Rules declared mutually ambiguous.
#[derive(Clone, Copy, Debug)]
pub struct ConflictGroup {
    pub members: &'static [&'static str],
}

impl ConflictGroup {
    pub const fn new(members: &'static [&'static str]) -> Self {
        ConflictGroup { members }
    }
}

/// The conflict groups of the C++ grammar.
pub fn cpp_conflicts() -> Vec<ConflictGroup> {
    const GROUPS: &[&[&str]] = &[
        // `a < b` as comparison vs `a<b>` opening a template name.
        &["template_function", "template_type"],
        &["template_function", "template_type", "expression"],
        &["template_method", "template_type", "field_expression"],
        &["template_type", "qualified_type_identifier"],
        &["qualified_type_identifier", "qualified_identifier"],
        // `(a, b)` grouping vs `{a, b}`-style initialization.
        &["comma_expression", "initializer_list"],
        // `int (x)` — parenthesized declarator vs call-shaped expression.
        &["expression", "declarator"],
        // `T(a);` — declaration with parenthesized declarator vs call.
        &["declaration", "expression_statement"],
        &["declaration", "function_definition"],
        &["expression", "structured_binding_declarator"],
        // `f(int)` vs `f(x)` after a name.
        &["parameter_list", "argument_list"],
        &["type_parameter_declaration", "parameter_declaration"],
        // A bare name in angle brackets or statement position.
        &["expression", "type_specifier"],
        // Specifier heads that may or may not grow a body.
        &["enum_specifier"],
        &["class_specifier"],
        &["struct_specifier"],
        &["union_specifier"],
    ];
    GROUPS.iter().map(|g| ConflictGroup::new(g)).collect()
}
