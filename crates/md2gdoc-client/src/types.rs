use std::fmt;
use std::str::FromStr;

use serde::Serialize;

pub const DOCUMENT_URL_PREFIX: &str = "https://docs.google.com/document/d/";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn url(&self) -> String {
        format!("{DOCUMENT_URL_PREFIX}{}", self.0)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Address of the principal a document is shared with. Only the shape is
/// checked: one `@` with something on both sides and no whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn parse(value: &str) -> Result<Self, String> {
        let trimmed = value.trim();
        let mut parts = trimmed.split('@');
        let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(format!("'{value}' is not an email address"));
        };

        if local.is_empty() || domain.is_empty() || trimmed.contains(char::is_whitespace) {
            return Err(format!("'{value}' is not an email address"));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for EmailAddress {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        EmailAddress::parse(value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Reader,
    #[default]
    Writer,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Reader => "reader",
            Role::Writer => "writer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "reader" => Ok(Role::Reader),
            "writer" => Ok(Role::Writer),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_addresses() {
        let email = EmailAddress::parse(" someone@example.com ").unwrap();
        assert_eq!(email.as_str(), "someone@example.com");
    }

    #[test]
    fn rejects_malformed_addresses() {
        for value in ["", "nobody", "@example.com", "a@", "a@b@c", "a b@c.d"] {
            assert!(EmailAddress::parse(value).is_err(), "{value} accepted");
        }
    }

    #[test]
    fn builds_document_url() {
        let id = DocumentId::new("abc123");
        assert_eq!(id.url(), "https://docs.google.com/document/d/abc123");
    }

    #[test]
    fn role_round_trips_through_str() {
        assert_eq!("reader".parse::<Role>(), Ok(Role::Reader));
        assert_eq!(Role::Writer.to_string(), "writer");
        assert!("owner".parse::<Role>().is_err());
    }
}
