//! Credential descriptors and the auth header builder.
//!
//! A credential descriptor is pure data: one case per auth kind, each
//! carrying only the fields that kind needs. [`Credentials::headers`] maps a
//! descriptor to HTTP headers with no side effects. Partial or blank fields
//! degrade silently to "no header emitted" and the probe proceeds
//! unauthenticated.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use serde::{Deserialize, Serialize};

/// Authentication to use when probing an endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Credentials {
    /// Unauthenticated opaque reachability check.
    #[default]
    None,
    /// HTTP Basic authentication.
    Basic { username: String, password: String },
    /// Bearer token.
    Bearer { token: String },
    /// Arbitrary header name/value pair.
    ApiKey { header: String, value: String },
}

impl Credentials {
    /// Build the HTTP headers for this descriptor.
    ///
    /// Returns an empty map for `None` and for any descriptor with blank or
    /// unencodable fields.
    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        match self {
            Credentials::None => {}
            Credentials::Basic { username, password } => {
                if !username.is_empty() && !password.is_empty() {
                    let encoded = BASE64.encode(format!("{username}:{password}"));
                    if let Ok(value) = HeaderValue::from_str(&format!("Basic {encoded}")) {
                        map.insert(AUTHORIZATION, value);
                    }
                }
            }
            Credentials::Bearer { token } => {
                if !token.is_empty() {
                    if let Ok(value) = HeaderValue::from_str(&format!("Bearer {token}")) {
                        map.insert(AUTHORIZATION, value);
                    }
                }
            }
            Credentials::ApiKey { header, value } => {
                if !header.is_empty() && !value.is_empty() {
                    if let (Ok(name), Ok(value)) = (
                        HeaderName::from_bytes(header.as_bytes()),
                        HeaderValue::from_str(value),
                    ) {
                        map.insert(name, value);
                    }
                }
            }
        }
        map
    }

    /// Whether this descriptor will emit at least one header.
    pub fn is_authenticated(&self) -> bool {
        !self.headers().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_emits_no_headers() {
        assert!(Credentials::None.headers().is_empty());
        assert!(!Credentials::None.is_authenticated());
    }

    #[test]
    fn basic_encodes_user_and_password() {
        let creds = Credentials::Basic {
            username: "user".to_string(),
            password: "pass".to_string(),
        };
        let headers = creds.headers();
        // base64("user:pass")
        assert_eq!(headers[AUTHORIZATION], "Basic dXNlcjpwYXNz");
    }

    #[test]
    fn basic_requires_both_fields() {
        let creds = Credentials::Basic {
            username: String::new(),
            password: "pass".to_string(),
        };
        assert!(creds.headers().is_empty());

        let creds = Credentials::Basic {
            username: "user".to_string(),
            password: String::new(),
        };
        assert!(creds.headers().is_empty());
    }

    #[test]
    fn bearer_emits_exact_header() {
        let creds = Credentials::Bearer {
            token: "t".to_string(),
        };
        assert_eq!(creds.headers()[AUTHORIZATION], "Bearer t");
    }

    #[test]
    fn empty_bearer_degrades_to_no_header() {
        let creds = Credentials::Bearer {
            token: String::new(),
        };
        assert!(creds.headers().is_empty());
    }

    #[test]
    fn api_key_requires_name_and_value() {
        let creds = Credentials::ApiKey {
            header: String::new(),
            value: "v".to_string(),
        };
        assert!(creds.headers().is_empty());

        let creds = Credentials::ApiKey {
            header: "X-Api-Key".to_string(),
            value: "v".to_string(),
        };
        assert_eq!(creds.headers()["X-Api-Key"], "v");
    }

    #[test]
    fn invalid_header_name_degrades_silently() {
        let creds = Credentials::ApiKey {
            header: "not a header".to_string(),
            value: "v".to_string(),
        };
        assert!(creds.headers().is_empty());
    }

    #[test]
    fn serde_round_trip() {
        let creds = Credentials::Basic {
            username: "u".to_string(),
            password: "p".to_string(),
        };
        let json = serde_json::to_string(&creds).unwrap();
        assert!(json.contains("\"kind\":\"basic\""));
        let back: Credentials = serde_json::from_str(&json).unwrap();
        assert_eq!(back, creds);
    }
}
