//! Oracle error code helpers.

use std::sync::LazyLock;

use dbinspect_core::QueryError;
use regex::Regex;

/// Table or view does not exist.
pub const ORA_TABLE_NOT_FOUND: &str = "ORA-00942";

/// Insufficient privileges.
pub const ORA_INSUFFICIENT_PRIVILEGES: &str = "ORA-01031";

static ORA_CODE_RE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"(?i)\bORA-(\d{5})\b").ok());

/// First `ORA-nnnnn` code in `message`, upper-cased.
pub fn ora_code(message: &str) -> Option<String> {
    let re = ORA_CODE_RE.as_ref()?;
    re.captures(message)
        .and_then(|caps| caps.get(1))
        .map(|code| format!("ORA-{}", code.as_str()))
}

/// Every `ORA-nnnnn` code in `message`, in order of appearance.
pub fn ora_codes(message: &str) -> Vec<String> {
    let Some(re) = ORA_CODE_RE.as_ref() else {
        return Vec::new();
    };
    re.captures_iter(message)
        .filter_map(|caps| caps.get(1))
        .map(|code| format!("ORA-{}", code.as_str()))
        .collect()
}

/// Whether the object is missing or the session may not read it.
///
/// Oracle reports an object the session has no grant on as missing, so both
/// codes mean the same thing to an inspection.
pub fn is_missing_or_denied(err: &QueryError) -> bool {
    ora_codes(&err.to_string())
        .iter()
        .any(|code| code == ORA_TABLE_NOT_FOUND || code == ORA_INSUFFICIENT_PRIVILEGES)
}

/// Whether the object does not exist for this session.
pub fn is_table_not_found(err: &QueryError) -> bool {
    ora_codes(&err.to_string())
        .iter()
        .any(|code| code == ORA_TABLE_NOT_FOUND)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_first_code() {
        assert_eq!(
            ora_code("failed: ora-00942: table or view does not exist").as_deref(),
            Some("ORA-00942")
        );
        assert_eq!(ora_code("connection reset"), None);
    }

    #[test]
    fn classifies_nested_fallback_errors() {
        let err = QueryError::FallbackExhausted {
            primary: Box::new(QueryError::prepare("ORA-00904: invalid identifier")),
            fallback: Box::new(QueryError::prepare("ORA-01031: insufficient privileges")),
        };
        assert!(is_missing_or_denied(&err));
        assert!(!is_table_not_found(&err));
    }

    #[test]
    fn classifies_every_union_part() {
        let err = QueryError::UnionExhausted {
            errors: vec![
                QueryError::prepare("ORA-03113: end-of-file on communication channel"),
                QueryError::prepare("ORA-00942: table or view does not exist"),
            ],
        };
        assert_eq!(ora_codes(&err.to_string()), vec!["ORA-03113", "ORA-00942"]);
        assert!(is_table_not_found(&err));
    }

    #[test]
    fn ignores_longer_digit_runs() {
        assert!(ora_code("ORA-009421").is_none());
    }
}
