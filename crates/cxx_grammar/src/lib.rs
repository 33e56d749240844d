//! Grammar declaration and table construction.
//!
//! The C++ grammar lives here as data: [`cpp`] returns the declared rules,
//! precedence table, conflict set, alias table, and external tokens, and
//! [`build`] validates the declaration and compiles it into the
//! [`ParseTables`] the parser consults at runtime. Validation is where
//! ambiguity hygiene is enforced: any pair of alternatives that can start
//! with the same token must either be ordered by precedence or covered by a
//! declared conflict, so every disambiguation decision the parser can face
//! is written down in exactly one place.

mod alias;
mod conflict;
mod cpp;
pub mod prec;
mod rule;
mod tables;

pub use alias::{cpp_aliases, AliasPair};
pub use conflict::{cpp_conflicts, ConflictGroup};
pub use cpp::cpp;
pub use prec::{cpp_binary_operators, is_fold_operator, BinaryOperator, FOLD_OPERATORS};
pub use rule::{Alt, Assoc, Grammar, Prec, Rule, Symbol};
pub use tables::{build, BuildError, OperatorInfo, ParseTables};
