use crate::rules::{Context, Finding, Severity, SmellKind};
use ruff_text_size::TextSize;

/// Create a Finding at the line holding `location`.
pub(super) fn create_finding(
    kind: SmellKind,
    severity: Severity,
    message: String,
    context: &Context<'_>,
    location: TextSize,
    suggestion: &str,
) -> Finding {
    Finding::new(
        kind,
        severity,
        message,
        context.line_index.line_index(location),
        suggestion,
    )
}

/// Medium above `medium`, high above `high`, nothing otherwise.
pub(super) fn graded(value: usize, medium: usize, high: usize) -> Option<Severity> {
    if value > high {
        Some(Severity::High)
    } else if value > medium {
        Some(Severity::Medium)
    } else {
        None
    }
}
