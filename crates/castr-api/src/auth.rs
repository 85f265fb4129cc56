use secrecy::{ExposeSecret, SecretString};

/// Account credentials for the Castr API.
///
/// Sent as HTTP Basic auth on every request: the access token is the
/// user name and the secret is the password (`base64(token:secret)`).
#[derive(Debug, Clone)]
pub struct Credentials {
    pub access_token: String,
    pub secret: SecretString,
}

impl Credentials {
    pub fn new(access_token: impl Into<String>, secret: SecretString) -> Self {
        Self {
            access_token: access_token.into(),
            secret,
        }
    }

    /// Attach the Basic-auth header to a request builder.
    pub(crate) fn apply(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder.basic_auth(&self.access_token, Some(self.secret.expose_secret()))
    }
}
