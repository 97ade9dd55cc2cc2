/// Build-time identity of the crate, embedded in assertion messages.
#[derive(Debug, Clone, Copy)]
pub struct Constants {
    pub sdk_name: &'static str,
    pub sdk_version: &'static str,
}

pub const CONSTANTS: Constants = Constants {
    sdk_name: env!("CARGO_PKG_NAME"),
    sdk_version: env!("CARGO_PKG_VERSION"),
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sdk_identity_matches_crate() {
        assert_eq!(CONSTANTS.sdk_name, "firestore-watch");
        assert_eq!(CONSTANTS.sdk_version, env!("CARGO_PKG_VERSION"));
    }
}
