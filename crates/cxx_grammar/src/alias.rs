//! The alias table: internal node kinds renamed on emit.
//!
//! Disambiguation needs distinct derivations for what consumers see as one
//! construct — a constructor definition is found by a different path than an
//! ordinary function definition, but both surface as `FunctionDefinition`.
//! The table below is total over [`NodeKind::is_internal`]; finished trees
//! never contain an internal kind.

use cxx_ir::NodeKind;

/// One internal-to-public renaming.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct AliasPair {
    pub from: NodeKind,
    pub to: NodeKind,
}

impl AliasPair {
    pub const fn new(from: NodeKind, to: NodeKind) -> Self {
        AliasPair { from, to }
    }
}

/// The alias pairs of the C++ grammar.
pub fn cpp_aliases() -> Vec<AliasPair> {
    use NodeKind as N;
    vec![
        AliasPair::new(N::ConstructorOrDestructorDefinition, N::FunctionDefinition),
        AliasPair::new(N::ConstructorOrDestructorDeclaration, N::Declaration),
        AliasPair::new(N::OperatorCastDefinition, N::FunctionDefinition),
        AliasPair::new(N::OperatorCastDeclaration, N::Declaration),
        AliasPair::new(N::InlineMethodDefinition, N::FunctionDefinition),
        AliasPair::new(N::QualifiedTypeIdentifier, N::QualifiedIdentifier),
        AliasPair::new(N::QualifiedFieldIdentifier, N::QualifiedIdentifier),
        AliasPair::new(N::QualifiedOperatorCastIdentifier, N::QualifiedIdentifier),
        AliasPair::new(N::DependentTypeIdentifier, N::DependentName),
        AliasPair::new(N::DependentFieldIdentifier, N::DependentName),
        AliasPair::new(N::DependentIdentifier, N::DependentName),
        AliasPair::new(N::ConditionDeclaration, N::Declaration),
        AliasPair::new(N::ExpressionStatementAsRequirement, N::ExpressionStatement),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_target_is_public() {
        for pair in cpp_aliases() {
            assert!(pair.from.is_internal(), "{:?} is not internal", pair.from);
            assert!(!pair.to.is_internal(), "{:?} must be public", pair.to);
        }
    }
}
