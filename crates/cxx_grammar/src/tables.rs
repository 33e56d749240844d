//! Grammar validation and the immutable parse tables.
//!
//! [`build`] checks the declared grammar for the defects that would
//! otherwise surface as parser misbehavior: dangling rule references,
//! duplicate definitions, same-level operators pulling in opposite
//! directions, and — the load-bearing one — alternatives that can start
//! with the same token without either a static precedence ordering or a
//! declared conflict authorizing parallel exploration. The ambiguity check
//! works on FIRST sets computed to a fixpoint, with nullable leading
//! symbols skipped.

use crate::prec::BinaryOperator;
use crate::rule::{Assoc, Grammar, Rule, Symbol};
use cxx_ir::{ExternalToken, NodeKind, TokenKind};
use rustc_hash::{FxHashMap, FxHashSet};
use thiserror::Error;

/// A defect in the declared grammar. These are author errors, not input
/// errors; a released grammar never produces one.
#[derive(Error, Clone, Eq, PartialEq, Debug)]
pub enum BuildError {
    #[error("rule `{0}` is defined more than once")]
    DuplicateRule(&'static str),

    #[error("rule `{rule}` references undefined rule `{referenced}`")]
    UndefinedRule {
        rule: &'static str,
        referenced: &'static str,
    },

    #[error("rules `{a}` and `{b}` can start with the same token but are not a declared conflict")]
    UndeclaredConflict {
        a: &'static str,
        b: &'static str,
    },

    #[error("operators {a:?} and {b:?} share level {level} with opposite associativity")]
    UnorderedOperators {
        a: TokenKind,
        b: TokenKind,
        level: i16,
    },
}

/// Precedence facts for one binary operator token.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct OperatorInfo {
    pub level: i16,
    pub assoc: Assoc,
    pub dynamic: i16,
}

/// Everything the parser consults at runtime, validated and frozen.
///
/// Immutable after [`build`], so one instance can serve parsers on many
/// threads.
#[derive(Clone, Debug)]
pub struct ParseTables {
    binary: FxHashMap<TokenKind, OperatorInfo>,
    conflicts: FxHashSet<(&'static str, &'static str)>,
    aliases: FxHashMap<NodeKind, NodeKind>,
    externals: Vec<ExternalToken>,
    ambiguity_bound: usize,
}

impl ParseTables {
    /// Precedence facts for `token` when used as a binary operator.
    #[inline]
    pub fn binary_operator(&self, token: TokenKind) -> Option<OperatorInfo> {
        self.binary.get(&token).copied()
    }

    /// Whether `a` and `b` were declared mutually ambiguous. Symmetric;
    /// `a == b` queries singleton groups.
    pub fn is_declared_conflict(&self, a: &str, b: &str) -> bool {
        let pair = if a <= b { (a, b) } else { (b, a) };
        // Keys are 'static; compare by value.
        self.conflicts.iter().any(|&(x, y)| (x, y) == pair)
    }

    /// The public kind for `kind`: the alias target for internal kinds,
    /// `kind` itself otherwise.
    #[inline]
    pub fn alias_for(&self, kind: NodeKind) -> NodeKind {
        self.aliases.get(&kind).copied().unwrap_or(kind)
    }

    /// External tokens the grammar may request from the lexer.
    pub fn externals(&self) -> &[ExternalToken] {
        &self.externals
    }

    /// Upper bound on simultaneously live candidates.
    #[inline]
    pub fn ambiguity_bound(&self) -> usize {
        self.ambiguity_bound
    }
}

/// Validate `grammar` and freeze it into [`ParseTables`].
pub fn build(grammar: &Grammar) -> Result<ParseTables, BuildError> {
    let index = index_rules(grammar)?;
    check_references(grammar, &index)?;
    let binary = operator_table(&grammar.binary_operators)?;
    let conflicts = conflict_pairs(grammar);
    let first = first_sets(grammar, &index);
    check_overlaps(grammar, &first, &conflicts)?;

    let aliases = grammar
        .aliases
        .iter()
        .map(|pair| (pair.from, pair.to))
        .collect();

    Ok(ParseTables {
        binary,
        conflicts,
        aliases,
        externals: grammar.externals.clone(),
        ambiguity_bound: grammar.ambiguity_bound,
    })
}

fn index_rules<'g>(
    grammar: &'g Grammar,
) -> Result<FxHashMap<&'static str, &'g Rule>, BuildError> {
    let mut index = FxHashMap::default();
    for rule in &grammar.rules {
        if index.insert(rule.name, rule).is_some() {
            return Err(BuildError::DuplicateRule(rule.name));
        }
    }
    Ok(index)
}

fn check_references(
    grammar: &Grammar,
    index: &FxHashMap<&'static str, &Rule>,
) -> Result<(), BuildError> {
    if !index.contains_key(grammar.start) {
        return Err(BuildError::UndefinedRule {
            rule: grammar.name,
            referenced: grammar.start,
        });
    }
    for rule in &grammar.rules {
        for alt in &rule.alts {
            for symbol in &alt.symbols {
                if let Symbol::Rule(name) = *symbol {
                    if !index.contains_key(name) {
                        return Err(BuildError::UndefinedRule {
                            rule: rule.name,
                            referenced: name,
                        });
                    }
                }
            }
        }
    }
    for group in &grammar.conflicts {
        for &member in group.members {
            if !index.contains_key(member) {
                return Err(BuildError::UndefinedRule {
                    rule: grammar.name,
                    referenced: member,
                });
            }
        }
    }
    Ok(())
}

fn operator_table(
    operators: &[BinaryOperator],
) -> Result<FxHashMap<TokenKind, OperatorInfo>, BuildError> {
    let mut table: FxHashMap<TokenKind, OperatorInfo> = FxHashMap::default();
    for op in operators {
        // Same level must mean same direction, or `a ⊕ b ⊗ c` has no
        // deterministic reading.
        for (other, info) in &table {
            if info.level == op.level && info.assoc != op.assoc {
                return Err(BuildError::UnorderedOperators {
                    a: *other,
                    b: op.token,
                    level: op.level,
                });
            }
        }
        table.insert(
            op.token,
            OperatorInfo {
                level: op.level,
                assoc: op.assoc,
                dynamic: op.dynamic,
            },
        );
    }
    Ok(table)
}

/// All unordered member pairs of every group, singleton groups included as
/// `(a, a)`.
fn conflict_pairs(grammar: &Grammar) -> FxHashSet<(&'static str, &'static str)> {
    let mut pairs = FxHashSet::default();
    for group in &grammar.conflicts {
        match group.members {
            [only] => {
                pairs.insert((*only, *only));
            }
            members => {
                for (i, &a) in members.iter().enumerate() {
                    for &b in &members[i + 1..] {
                        pairs.insert(if a <= b { (a, b) } else { (b, a) });
                    }
                }
            }
        }
    }
    pairs
}

/// FIRST sets to a fixpoint, with nullability.
fn first_sets(
    grammar: &Grammar,
    index: &FxHashMap<&'static str, &Rule>,
) -> FxHashMap<&'static str, FxHashSet<TokenKind>> {
    let mut first: FxHashMap<&'static str, FxHashSet<TokenKind>> = index
        .keys()
        .map(|&name| (name, FxHashSet::default()))
        .collect();
    let mut nullable: FxHashSet<&'static str> = FxHashSet::default();

    loop {
        let mut changed = false;
        for rule in &grammar.rules {
            for alt in &rule.alts {
                let mut all_nullable = true;
                for symbol in &alt.symbols {
                    match symbol {
                        Symbol::Token(token) => {
                            changed |= first
                                .get_mut(rule.name)
                                .is_some_and(|set| set.insert(*token));
                            all_nullable = false;
                            break;
                        }
                        Symbol::External(ext) => {
                            changed |= first
                                .get_mut(rule.name)
                                .is_some_and(|set| set.insert(ext.token_kind()));
                            all_nullable = false;
                            break;
                        }
                        Symbol::Rule(name) => {
                            let inner: Vec<TokenKind> =
                                first.get(name).into_iter().flatten().copied().collect();
                            if let Some(set) = first.get_mut(rule.name) {
                                for token in inner {
                                    changed |= set.insert(token);
                                }
                            }
                            if !nullable.contains(name) {
                                all_nullable = false;
                                break;
                            }
                        }
                    }
                }
                if all_nullable {
                    changed |= nullable.insert(rule.name);
                }
            }
        }
        if !changed {
            return first;
        }
    }
}

/// Reject rule-led alternative pairs that overlap on FIRST without either a
/// precedence ordering or a declared conflict.
///
/// Alternatives carrying an explicit precedence are statically ordered
/// against their siblings and exempt; so are token-led alternatives, which
/// one token of lookahead separates.
fn check_overlaps(
    grammar: &Grammar,
    first: &FxHashMap<&'static str, FxHashSet<TokenKind>>,
    conflicts: &FxHashSet<(&'static str, &'static str)>,
) -> Result<(), BuildError> {
    for rule in &grammar.rules {
        for (i, left) in rule.alts.iter().enumerate() {
            let Some(a) = bare_leading_rule(left) else {
                continue;
            };
            for right in &rule.alts[i + 1..] {
                let Some(b) = bare_leading_rule(right) else {
                    continue;
                };
                if a == b {
                    continue;
                }
                let overlaps = first
                    .get(a)
                    .zip(first.get(b))
                    .is_some_and(|(fa, fb)| !fa.is_disjoint(fb));
                if !overlaps {
                    continue;
                }
                let pair = if a <= b { (a, b) } else { (b, a) };
                if !conflicts.contains(&pair) {
                    return Err(BuildError::UndeclaredConflict {
                        a: pair.0,
                        b: pair.1,
                    });
                }
            }
        }
    }
    Ok(())
}

/// The leading rule reference of an unordered alternative, if any.
fn bare_leading_rule(alt: &crate::rule::Alt) -> Option<&'static str> {
    if alt.prec.is_some() {
        return None;
    }
    match alt.symbols.first() {
        Some(&Symbol::Rule(name)) => Some(name),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{Alt, Prec};
    use crate::{cpp, ConflictGroup};
    use pretty_assertions::assert_eq;

    fn tiny(rules: Vec<Rule>, conflicts: Vec<ConflictGroup>) -> Grammar {
        Grammar {
            name: "tiny",
            start: "start",
            rules,
            conflicts,
            externals: Vec::new(),
            binary_operators: Vec::new(),
            aliases: Vec::new(),
            ambiguity_bound: 4,
        }
    }

    #[test]
    fn cpp_grammar_builds() {
        let tables = build(&cpp());
        assert!(tables.is_ok(), "{:?}", tables.err());
    }

    #[test]
    fn removing_a_conflict_group_is_rejected() {
        let mut grammar = cpp();
        grammar
            .conflicts
            .retain(|g| !(g.members.contains(&"expression") && g.members.contains(&"declarator")));
        let err = build(&grammar).unwrap_err();
        assert_eq!(
            err,
            BuildError::UndeclaredConflict {
                a: "declarator",
                b: "expression",
            }
        );
    }

    #[test]
    fn undefined_reference_is_rejected() {
        use crate::rule::r;
        let grammar = tiny(
            vec![Rule::new("start", vec![Alt::new(vec![r("missing")])])],
            Vec::new(),
        );
        assert_eq!(
            build(&grammar).unwrap_err(),
            BuildError::UndefinedRule {
                rule: "start",
                referenced: "missing",
            }
        );
    }

    #[test]
    fn duplicate_rule_is_rejected() {
        use crate::rule::t;
        let dup = || Rule::new("start", vec![Alt::new(vec![t(TokenKind::Semicolon)])]);
        let grammar = tiny(vec![dup(), dup()], Vec::new());
        assert_eq!(
            build(&grammar).unwrap_err(),
            BuildError::DuplicateRule("start")
        );
    }

    #[test]
    fn opposite_associativity_at_one_level_is_rejected() {
        use crate::prec;
        use crate::rule::t;
        let mut grammar = tiny(
            vec![Rule::new("start", vec![Alt::new(vec![t(TokenKind::Semicolon)])])],
            Vec::new(),
        );
        grammar.binary_operators = vec![
            BinaryOperator::left(TokenKind::Plus, prec::ADD),
            BinaryOperator::right(TokenKind::Minus, prec::ADD),
        ];
        assert!(matches!(
            build(&grammar).unwrap_err(),
            BuildError::UnorderedOperators { level, .. } if level == prec::ADD
        ));
    }

    #[test]
    fn overlap_with_precedence_ordering_is_accepted() {
        use crate::rule::{r, t};
        let grammar = tiny(
            vec![
                Rule::new(
                    "start",
                    vec![
                        Alt::new(vec![r("a")]),
                        Alt::new(vec![r("b")]).with_prec(Prec::level(1)),
                    ],
                ),
                Rule::new("a", vec![Alt::new(vec![t(TokenKind::Identifier)])]),
                Rule::new("b", vec![Alt::new(vec![t(TokenKind::Identifier)])]),
            ],
            Vec::new(),
        );
        assert!(build(&grammar).is_ok());
    }

    #[test]
    fn conflict_queries_are_symmetric() {
        let tables = build(&cpp()).unwrap();
        assert!(tables.is_declared_conflict("expression", "declarator"));
        assert!(tables.is_declared_conflict("declarator", "expression"));
        assert!(!tables.is_declared_conflict("expression", "while_statement"));
    }

    #[test]
    fn singleton_groups_declare_self_conflicts() {
        let tables = build(&cpp()).unwrap();
        assert!(tables.is_declared_conflict("enum_specifier", "enum_specifier"));
        assert!(tables.is_declared_conflict("class_specifier", "class_specifier"));
        assert!(!tables.is_declared_conflict("declaration", "declaration"));
    }

    #[test]
    fn alias_is_identity_for_public_kinds() {
        let tables = build(&cpp()).unwrap();
        assert_eq!(
            tables.alias_for(NodeKind::FunctionDefinition),
            NodeKind::FunctionDefinition
        );
        assert_eq!(
            tables.alias_for(NodeKind::ConstructorOrDestructorDefinition),
            NodeKind::FunctionDefinition
        );
        assert_eq!(
            tables.alias_for(NodeKind::QualifiedTypeIdentifier),
            NodeKind::QualifiedIdentifier
        );
    }

    #[test]
    fn cpp_tables_cover_both_external_tokens() {
        let tables = build(&cpp()).unwrap();
        assert_eq!(
            tables.externals(),
            [
                ExternalToken::RawStringDelimiter,
                ExternalToken::RawStringContent,
            ]
        );
    }

    #[test]
    fn spaceship_outranks_relational_in_tables() {
        let tables = build(&cpp()).unwrap();
        let lt = tables.binary_operator(TokenKind::Lt).unwrap();
        let spaceship = tables.binary_operator(TokenKind::Spaceship).unwrap();
        assert!(spaceship.level > lt.level);
    }
}
