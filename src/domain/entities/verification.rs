use std::fmt;

/// Which verification endpoint a receipt is submitted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationEnvironment {
    Sandbox,
    Production,
}

impl VerificationEnvironment {
    /// The opposite environment, used when the server signals a redirect.
    pub fn other(self) -> Self {
        match self {
            VerificationEnvironment::Sandbox => VerificationEnvironment::Production,
            VerificationEnvironment::Production => VerificationEnvironment::Sandbox,
        }
    }
}

impl fmt::Display for VerificationEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerificationEnvironment::Sandbox => f.write_str("sandbox"),
            VerificationEnvironment::Production => f.write_str("production"),
        }
    }
}
