use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Missing required configuration: {}", missing.join(", "))]
    Configuration { missing: Vec<String> },

    #[error("Invalid configuration: {name} {reason}")]
    InvalidSetting { name: String, reason: String },

    #[error("Ledger request failed: {0}")]
    Transport(String),

    #[error("Ledger reported errors: {0}")]
    Remote(String),

    #[error(
        "Label '{name}' not found. Please create it in Monarch first (e.g. as a transaction tag) and rerun."
    )]
    LabelNotFound { name: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_lists_all_missing_settings() {
        let error = Error::Configuration {
            missing: vec!["MAIN_ACCOUNT_ID".into(), "ADDL_ACCOUNT_ID".into()],
        };
        assert_eq!(
            error.to_string(),
            "Missing required configuration: MAIN_ACCOUNT_ID, ADDL_ACCOUNT_ID"
        );
    }

    #[test]
    fn invalid_setting_names_the_setting() {
        let error = Error::InvalidSetting {
            name: "MONARCH_API_TOKEN".into(),
            reason: "contains characters not allowed in an HTTP header".into(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid configuration: MONARCH_API_TOKEN contains characters not allowed in an HTTP header"
        );
    }

    #[test]
    fn label_not_found_tells_user_what_to_do() {
        let error = Error::LabelNotFound {
            name: "synced".into(),
        };
        let message = error.to_string();
        assert!(message.contains("'synced'"));
        assert!(message.contains("create it"));
    }
}
