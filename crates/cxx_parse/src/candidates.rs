//! Bounded candidate exploration at declared conflict points.
//!
//! At a point where the grammar declares rules mutually ambiguous, each
//! alternative is parsed to completion from the same checkpoint and scored.
//! The winner is the candidate that consumed the most input; ties fall to
//! the fewest embedded errors, then the highest dynamic precedence, then
//! declaration order. Scoring over complete candidate derivations is what
//! the precedence table alone cannot do: locally both readings are valid,
//! and only the shape of the finished parse separates them.
//!
//! The number of candidates at one point is bounded by the declared
//! conflict set. Exceeding the grammar's bound is a defect in the conflict
//! declarations, reported as E9001 and resolved by taking the
//! first-declared alternative.

use crate::green::GreenNode;
use crate::session::ParseSession;
use cxx_diagnostic::{Diagnostic, ErrorCode};

/// One alternative at a conflict point.
pub(crate) struct Candidate<'s> {
    /// Rule name, for conflict-set verification and tracing.
    pub name: &'static str,
    /// Dynamic precedence: breaks ties between fully-consumed candidates.
    pub dynamic: i16,
    pub run: Box<dyn FnOnce(&mut ParseSession<'_>) -> GreenNode + 's>,
}

impl<'s> Candidate<'s> {
    pub(crate) fn new(
        name: &'static str,
        dynamic: i16,
        run: impl FnOnce(&mut ParseSession<'_>) -> GreenNode + 's,
    ) -> Self {
        Candidate {
            name,
            dynamic,
            run: Box::new(run),
        }
    }
}

struct Outcome {
    node: GreenNode,
    diagnostics: Vec<Diagnostic>,
    end: crate::session::Checkpoint,
    consumed: usize,
    errors: usize,
    dynamic: i16,
    order: usize,
}

impl Outcome {
    /// `true` when this outcome beats `other`.
    fn beats(&self, other: &Outcome) -> bool {
        (self.consumed, other.errors, self.dynamic, other.order)
            > (other.consumed, self.errors, other.dynamic, self.order)
    }
}

/// Parse every candidate from the current position and commit the winner.
///
/// Candidate pairs must be declared in the conflict set; an undeclared pair
/// here is a grammar defect that [`cxx_grammar::build`] would have caught,
/// so it is asserted rather than handled.
pub(crate) fn race(session: &mut ParseSession<'_>, candidates: Vec<Candidate<'_>>) -> GreenNode {
    debug_assert!(!candidates.is_empty());
    debug_assert!(declared(session, &candidates));

    if candidates.len() > session.tables().ambiguity_bound() {
        // Defect in the conflict declarations: fall back to the
        // first-declared alternative, deterministically.
        session.diagnostics.push(
            Diagnostic::error(ErrorCode::E9001)
                .with_label(session.current_span(), "too many live alternatives here"),
        );
        let first = candidates
            .into_iter()
            .next()
            .map(|c| c.run);
        return match first {
            Some(run) => run(session),
            None => session.missing(ErrorCode::E1001),
        };
    }

    let start = session.checkpoint();
    let mut best: Option<Outcome> = None;
    session.enter_speculation();
    for (order, candidate) in candidates.into_iter().enumerate() {
        session.rewind(start);
        let node = (candidate.run)(session);
        let outcome = Outcome {
            consumed: session.consumed_since(&start),
            errors: session.diagnostics_since(&start) + node.error_count(),
            diagnostics: session.take_diagnostics_since(&start),
            end: session.checkpoint(),
            dynamic: candidate.dynamic,
            order,
            node,
        };
        tracing::trace!(
            candidate = candidate.name,
            consumed = outcome.consumed,
            errors = outcome.errors,
            "candidate finished"
        );
        let better = best.as_ref().is_none_or(|b| outcome.beats(b));
        if better {
            best = Some(outcome);
        }
    }
    session.exit_speculation();

    // Candidates are non-empty, so a winner exists.
    match best {
        Some(winner) => {
            session.restore(winner.end);
            session.append_diagnostics(winner.diagnostics);
            winner.node
        }
        None => session.missing(ErrorCode::E1001),
    }
}

/// Every pair of distinct candidate rules is a declared conflict.
fn declared(session: &ParseSession<'_>, candidates: &[Candidate<'_>]) -> bool {
    for (i, a) in candidates.iter().enumerate() {
        for b in &candidates[i + 1..] {
            if a.name != b.name && !session.tables().is_declared_conflict(a.name, b.name) {
                return false;
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::tests_support::with_session;
    use cxx_ir::NodeKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn longer_consumption_wins() {
        with_session("a b c", |s| {
            let node = race(
                s,
                vec![
                    Candidate::new("declaration", 0, |s: &mut ParseSession<'_>| {
                        GreenNode::node(NodeKind::Declaration, vec![s.bump()])
                    }),
                    Candidate::new("expression_statement", 0, |s: &mut ParseSession<'_>| {
                        GreenNode::node(
                            NodeKind::ExpressionStatement,
                            vec![s.bump(), s.bump(), s.bump()],
                        )
                    }),
                ],
            );
            assert_eq!(node.kind, NodeKind::ExpressionStatement);
            assert!(s.at_eof());
        });
    }

    #[test]
    fn fewer_errors_beat_equal_consumption() {
        with_session("a b", |s| {
            let node = race(
                s,
                vec![
                    Candidate::new("declaration", 0, |s: &mut ParseSession<'_>| {
                        let first = s.bump();
                        let miss = s.missing(ErrorCode::E1003);
                        let second = s.bump();
                        GreenNode::node(NodeKind::Declaration, vec![first, miss, second])
                    }),
                    Candidate::new("expression_statement", 0, |s: &mut ParseSession<'_>| {
                        GreenNode::node(NodeKind::ExpressionStatement, vec![s.bump(), s.bump()])
                    }),
                ],
            );
            assert_eq!(node.kind, NodeKind::ExpressionStatement);
            // The losing candidate's diagnostic was rolled back.
            assert!(s.diagnostics.is_empty());
        });
    }

    #[test]
    fn declaration_order_breaks_full_ties() {
        with_session("a", |s| {
            let node = race(
                s,
                vec![
                    Candidate::new("declaration", 0, |s: &mut ParseSession<'_>| {
                        GreenNode::node(NodeKind::Declaration, vec![s.bump()])
                    }),
                    Candidate::new("expression_statement", 0, |s: &mut ParseSession<'_>| {
                        GreenNode::node(NodeKind::ExpressionStatement, vec![s.bump()])
                    }),
                ],
            );
            assert_eq!(node.kind, NodeKind::Declaration);
        });
    }

    #[test]
    fn dynamic_precedence_breaks_ties_before_order() {
        with_session("a", |s| {
            let node = race(
                s,
                vec![
                    Candidate::new("expression", 0, |s: &mut ParseSession<'_>| {
                        GreenNode::node(NodeKind::ParenthesizedExpression, vec![s.bump()])
                    }),
                    Candidate::new("type_specifier", 1, |s: &mut ParseSession<'_>| {
                        GreenNode::node(NodeKind::TypeDescriptor, vec![s.bump()])
                    }),
                ],
            );
            assert_eq!(node.kind, NodeKind::TypeDescriptor);
        });
    }
}
