use super::*;
use crate::{Diagnostic, DiagnosticQueue, DiagnosticSink, ErrorCode};

#[test]
fn proof_exists_only_for_reported_errors() {
    assert_eq!(ErrorGuaranteed::from_error_count(0), None);
    assert_eq!(
        ErrorGuaranteed::from_error_count(3),
        Some(ErrorGuaranteed::new())
    );
}

#[test]
fn sink_error_matches_queue_proof() {
    let mut queue = DiagnosticQueue::new();
    assert!(queue.has_errors().is_none());

    let reported = queue.error(Diagnostic::new(ErrorCode::E2002).with_message("shadowed"));
    assert_eq!(queue.has_errors(), Some(reported));
}

#[test]
fn display() {
    assert_eq!(ErrorGuaranteed::new().to_string(), "error(s) emitted");
}
