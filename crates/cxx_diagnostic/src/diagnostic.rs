use crate::ErrorCode;
use cxx_ir::Span;

/// Severity of a diagnostic.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

/// A labeled span: where plus why.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Label {
    pub span: Span,
    pub message: String,
}

/// A diagnostic with code, message, and labeled spans.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub severity: Severity,
    pub message: String,
    pub labels: Vec<Label>,
}

impl Diagnostic {
    /// Create an error diagnostic with the code's summary as the message.
    pub fn error(code: ErrorCode) -> Self {
        Diagnostic {
            code,
            severity: Severity::Error,
            message: code.summary().to_string(),
            labels: Vec::new(),
        }
    }

    /// Create a warning diagnostic.
    pub fn warning(code: ErrorCode) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            ..Diagnostic::error(code)
        }
    }

    /// Replace the message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Attach a labeled span.
    #[must_use]
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label {
            span,
            message: message.into(),
        });
        self
    }

    /// Primary span: the first label's, or a dummy when unlabeled.
    pub fn primary_span(&self) -> Span {
        self.labels.first().map_or(Span::DUMMY, |l| l.span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn builder_chain() {
        let diag = Diagnostic::error(ErrorCode::E1001)
            .with_message("unexpected `;`")
            .with_label(Span::new(4, 5), "here");
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.message, "unexpected `;`");
        assert_eq!(diag.primary_span(), Span::new(4, 5));
    }

    #[test]
    fn default_message_is_summary() {
        let diag = Diagnostic::error(ErrorCode::E0005);
        assert_eq!(diag.message, "unterminated raw string literal");
        assert_eq!(diag.primary_span(), Span::DUMMY);
    }

    #[test]
    fn warning_severity() {
        let diag = Diagnostic::warning(ErrorCode::E9001);
        assert_eq!(diag.severity, Severity::Warning);
    }
}
