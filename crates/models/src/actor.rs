use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// The principal on whose behalf a mutation is performed.
///
/// Handlers build one per request and hand it down to every service call that
/// writes, so audit columns never depend on ambient state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Actor(String);

impl Actor {
    /// Used when a request does not identify its caller
    pub const ANONYMOUS: &'static str = "anonymous";

    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let trimmed = name.trim();

        if trimmed.is_empty() {
            Self::anonymous()
        } else {
            Self(trimmed.to_owned())
        }
    }

    pub fn anonymous() -> Self {
        Self(Self::ANONYMOUS.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Actor {
    fn default() -> Self {
        Self::anonymous()
    }
}

impl Display for Actor {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_name_is_anonymous() {
        assert_eq!(Actor::new("  ").as_str(), Actor::ANONYMOUS);
        assert_eq!(Actor::default(), Actor::anonymous());
    }

    #[test]
    fn test_name_is_trimmed() {
        assert_eq!(Actor::new(" buyer01 ").to_string(), "buyer01");
    }
}
