use secrecy::SecretString;

/// Shared configuration for the backend integration, carried from the CLI
/// into the server wiring.
#[derive(Clone)]
pub struct GlobalArgs {
    pub backend_url: String,
    /// Operator credentials stay encrypted at rest; the session manager
    /// decrypts them per connect.
    pub operator_email: String,
    pub operator_otp: String,
    pub encryption_key: SecretString,
    pub organization: Option<String>,
    pub request_timeout_secs: u64,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(backend_url: String) -> Self {
        Self {
            backend_url,
            operator_email: String::new(),
            operator_otp: String::new(),
            encryption_key: SecretString::default(),
            organization: None,
            request_timeout_secs: 30,
        }
    }
}

impl std::fmt::Debug for GlobalArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlobalArgs")
            .field("backend_url", &self.backend_url)
            .field("operator_email", &"***")
            .field("operator_otp", &"***")
            .field("encryption_key", &"***")
            .field("organization", &self.organization)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_global_args() {
        let args = GlobalArgs::new("https://backend.tld/console/service.asmx".to_string());
        assert_eq!(args.backend_url, "https://backend.tld/console/service.asmx");
        assert_eq!(args.encryption_key.expose_secret(), "");
        assert_eq!(args.request_timeout_secs, 30);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let mut args = GlobalArgs::new("https://backend.tld".to_string());
        args.operator_email = "very-secret-blob".to_string();
        let debug = format!("{args:?}");
        assert!(!debug.contains("very-secret-blob"));
        assert!(debug.contains("***"));
    }
}
