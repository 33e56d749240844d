//! Parse context flags.
//!
//! A few token readings depend on where the parser stands rather than on
//! lookahead: `>` terminates a template-argument list instead of comparing,
//! and class bodies admit constructor-shaped items that are illegal at
//! namespace scope. Flags are set on entry to the construct and restored on
//! exit.

use bitflags::bitflags;

bitflags! {
    #[derive(Clone, Copy, Eq, PartialEq, Debug, Default)]
    pub(crate) struct ParseContext: u8 {
        /// Inside `<...>` of a template argument or parameter list; `>` and
        /// `>>` close the list rather than acting as operators.
        const TEMPLATE_ARGS = 1 << 0;
        /// Inside a class/struct/union body.
        const CLASS_BODY = 1 << 1;
        /// Inside a requirement body, where a trailing expression statement
        /// reads as a requirement.
        const REQUIREMENT = 1 << 2;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_compose() {
        let ctx = ParseContext::TEMPLATE_ARGS | ParseContext::CLASS_BODY;
        assert!(ctx.contains(ParseContext::TEMPLATE_ARGS));
        assert!(!ctx.contains(ParseContext::REQUIREMENT));
    }
}
