use crate::util::CONSTANTS;

/// Panics with an internal-assertion message when `condition` is false.
///
/// Reserved for broken internal contracts, never for bad input.
#[track_caller]
pub fn assert(condition: bool, message: impl AsRef<str>) {
    if !condition {
        panic!("{}", assertion_error(message));
    }
}

pub fn assertion_error(message: impl AsRef<str>) -> String {
    format!(
        "{} ({}) INTERNAL ASSERT FAILED: {}",
        CONSTANTS.sdk_name,
        CONSTANTS.sdk_version,
        message.as_ref()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "INTERNAL ASSERT FAILED")]
    fn assert_panics_on_false() {
        assert(false, "should panic");
    }

    #[test]
    fn assertion_error_formats_message() {
        let err = assertion_error("boom");
        assert!(err.starts_with("firestore-watch"));
        assert!(err.ends_with("boom"));
    }
}
