// SPDX-FileCopyrightText: 2026 Ragwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Failure classification for instrumented operations.

use std::fmt;

/// Fallback class for errors whose `Debug` form does not start with a name.
pub const UNNAMED_ERROR: &str = "Error";

/// Classify an error by the leading identifier of its `Debug` form.
///
/// For the usual derived `Debug` this is the enum variant or struct name:
/// `PipelineError::DivisionByZero` becomes `DivisionByZero`, and
/// `ParseIntError { kind: InvalidDigit }` becomes `ParseIntError`.
/// Errors that debug-print as plain strings classify as [`UNNAMED_ERROR`].
pub fn error_class<E: fmt::Debug + ?Sized>(err: &E) -> String {
    let debug = format!("{err:?}");
    let name: String = debug
        .chars()
        .take_while(|c| c.is_alphanumeric() || *c == '_')
        .collect();
    if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
        UNNAMED_ERROR.to_string()
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // fields are only read through Debug
    #[allow(dead_code)]
    #[derive(Debug)]
    enum PipelineError {
        DivisionByZero,
        Retrieval { index: String },
        Timeout(u64),
    }

    #[test]
    fn enum_variants_classify_by_name() {
        assert_eq!(error_class(&PipelineError::DivisionByZero), "DivisionByZero");
        assert_eq!(
            error_class(&PipelineError::Retrieval {
                index: "docs".into()
            }),
            "Retrieval"
        );
        assert_eq!(error_class(&PipelineError::Timeout(30)), "Timeout");
    }

    #[test]
    fn std_errors_classify_by_struct_name() {
        let err = "x".parse::<i32>().unwrap_err();
        assert_eq!(error_class(&err), "ParseIntError");
    }

    #[test]
    fn string_errors_fall_back() {
        assert_eq!(error_class("boom"), UNNAMED_ERROR);
        assert_eq!(error_class(&String::from("boom")), UNNAMED_ERROR);
        assert_eq!(error_class(&42), UNNAMED_ERROR);
    }
}
