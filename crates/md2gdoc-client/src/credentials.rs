use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};

pub const DOCUMENTS_SCOPE: &str = "https://www.googleapis.com/auth/documents";
pub const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive";
pub const DEFAULT_SCOPES: &[&str] = &[DOCUMENTS_SCOPE, DRIVE_SCOPE];

const SERVICE_ACCOUNT_TYPE: &str = "service_account";

/// Fields of a service-account key file that the token exchange needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub project_id: Option<String>,
    pub client_email: String,
    pub private_key: String,
    pub token_uri: String,
}

/// Unsigned claim set of the token request made on behalf of the account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
}

#[derive(Debug, Clone)]
pub struct Credentials {
    key: ServiceAccountKey,
    scopes: Vec<String>,
}

impl Credentials {
    pub fn load(path: &Path, scopes: &[String]) -> ClientResult<Self> {
        let contents = fs::read_to_string(path).map_err(|err| {
            ClientError::Auth(format!(
                "failed to read credential file '{}': {err}",
                path.display()
            ))
        })?;
        Self::from_json(&contents, scopes).map_err(|err| match err {
            ClientError::Auth(message) => {
                ClientError::Auth(format!("{message} ({})", path.display()))
            }
            other => other,
        })
    }

    pub fn from_json(contents: &str, scopes: &[String]) -> ClientResult<Self> {
        let key: ServiceAccountKey = serde_json::from_str(contents)
            .map_err(|err| ClientError::Auth(format!("invalid service account key: {err}")))?;

        if let Some(kind) = &key.kind {
            if kind != SERVICE_ACCOUNT_TYPE {
                return Err(ClientError::Auth(format!(
                    "expected a '{SERVICE_ACCOUNT_TYPE}' key, found '{kind}'"
                )));
            }
        }

        for (field, value) in [
            ("client_email", &key.client_email),
            ("private_key", &key.private_key),
            ("token_uri", &key.token_uri),
        ] {
            if value.trim().is_empty() {
                return Err(ClientError::Auth(format!("service account {field} is empty")));
            }
        }

        if scopes.is_empty() {
            return Err(ClientError::Auth("no authorization scopes requested".into()));
        }

        Ok(Self {
            key,
            scopes: scopes.to_vec(),
        })
    }

    pub fn principal(&self) -> &str {
        &self.key.client_email
    }

    pub fn claims(&self) -> TokenClaims {
        TokenClaims {
            iss: self.key.client_email.clone(),
            scope: self.scopes.join(" "),
            aud: self.key.token_uri.clone(),
        }
    }
}

pub fn default_scopes() -> Vec<String> {
    DEFAULT_SCOPES.iter().map(|scope| scope.to_string()).collect()
}
