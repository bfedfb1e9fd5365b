use std::fmt;

use serde::{Deserialize, Serialize};

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub givenname: Option<String>,
    pub surname: Option<String>,
    pub password: Option<String>,
}

/// Username and password as sent to the authentication endpoint.
#[derive(Clone, Serialize, Deserialize)]
pub struct Login {
    pub username: String,
    pub password: String,
}

impl Login {
    pub fn new<U: Into<String>, P: Into<String>>(username: U, password: P) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Login {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Login")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Bearer token handed out by the authentication endpoint. It is valid for
/// the whole run, there is no refresh.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credential {
    pub token: String,
}

impl Credential {
    pub const SCHEME: &'static str = "Sleepy";

    pub fn new<S: Into<String>>(token: S) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Value of the `Authorization` header.
    pub fn authorization(&self) -> String {
        format!("{} token={}", Self::SCHEME, self.token)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential").field("token", &"***").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorization_header() {
        let credential: Credential =
            serde_json::from_str(r#"{"token": "abc123"}"#).unwrap();
        assert_eq!(credential.authorization(), "Sleepy token=abc123");
        assert!(!format!("{credential:?}").contains("abc123"));
    }
}
