use crate::config::DEFAULT_POSTGRES_PORT;
use crate::error::ResolutionError;
use serde_json::{Map, Value};
use std::fmt;

/// Database credentials as stored in an RDS-style secret.
///
/// Built fresh for every connection attempt; never cached.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    pub host: String,
    pub dbname: String,
    pub username: String,
    pub password: String,
    pub port: u16,
}

impl CredentialRecord {
    /// Parse the raw JSON text of a credential secret.
    pub fn from_json_str(raw: &str) -> Result<Self, ResolutionError> {
        let value: Value = serde_json::from_str(raw)?;
        Self::from_payload(&value)
    }

    /// Build a record from an already-decoded JSON payload.
    pub fn from_payload(value: &Value) -> Result<Self, ResolutionError> {
        let obj = value.as_object().ok_or_else(|| {
            ResolutionError::ParseFailure(serde::de::Error::custom(
                "credential payload must be a JSON object",
            ))
        })?;

        Ok(Self {
            host: required_str(obj, "host")?,
            dbname: required_str(obj, "dbname")?,
            username: required_str(obj, "username")?,
            password: required_str(obj, "password")?,
            port: optional_port(obj)?,
        })
    }
}

fn required_str(obj: &Map<String, Value>, key: &'static str) -> Result<String, ResolutionError> {
    match obj.get(key) {
        None | Some(Value::Null) => Err(ResolutionError::MissingField(key)),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(ResolutionError::InvalidField(key)),
    }
}

// RDS secrets carry the port as a number, hand-written ones often as a string.
fn optional_port(obj: &Map<String, Value>) -> Result<u16, ResolutionError> {
    match obj.get("port") {
        None | Some(Value::Null) => Ok(DEFAULT_POSTGRES_PORT),
        Some(Value::Number(n)) => n
            .as_u64()
            .and_then(|p| u16::try_from(p).ok())
            .ok_or(ResolutionError::InvalidField("port")),
        Some(Value::String(s)) => s
            .trim()
            .parse::<u16>()
            .map_err(|_| ResolutionError::InvalidField("port")),
        Some(_) => Err(ResolutionError::InvalidField("port")),
    }
}

impl fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("host", &self.host)
            .field("dbname", &self.dbname)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("port", &self.port)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full() -> Value {
        json!({
            "host": "db.internal",
            "dbname": "app",
            "username": "svc",
            "password": "s3cret",
            "engine": "postgres"
        })
    }

    #[test]
    fn parses_full_record_with_default_port() {
        let rec = CredentialRecord::from_payload(&full()).expect("valid record");
        assert_eq!(rec.host, "db.internal");
        assert_eq!(rec.dbname, "app");
        assert_eq!(rec.username, "svc");
        assert_eq!(rec.password, "s3cret");
        assert_eq!(rec.port, 5432);
    }

    #[test]
    fn accepts_numeric_and_string_ports() {
        let mut v = full();
        v["port"] = json!(6543);
        assert_eq!(CredentialRecord::from_payload(&v).unwrap().port, 6543);
        v["port"] = json!("6544");
        assert_eq!(CredentialRecord::from_payload(&v).unwrap().port, 6544);
        v["port"] = json!(70000);
        assert!(matches!(
            CredentialRecord::from_payload(&v),
            Err(ResolutionError::InvalidField("port"))
        ));
    }

    #[test]
    fn every_required_key_is_enforced() {
        for key in ["host", "dbname", "username", "password"] {
            let mut v = full();
            v.as_object_mut().unwrap().remove(key);
            match CredentialRecord::from_payload(&v) {
                Err(ResolutionError::MissingField(missing)) => assert_eq!(missing, key),
                other => panic!("expected missing `{key}`, got {other:?}"),
            }
        }
    }

    #[test]
    fn malformed_json_is_a_parse_failure() {
        for raw in ["", "{", "not json", "{\"host\": }"] {
            assert!(matches!(
                CredentialRecord::from_json_str(raw),
                Err(ResolutionError::ParseFailure(_))
            ));
        }
    }

    #[test]
    fn non_object_json_is_a_parse_failure() {
        assert!(matches!(
            CredentialRecord::from_json_str("[1, 2]"),
            Err(ResolutionError::ParseFailure(_))
        ));
    }

    #[test]
    fn debug_output_redacts_password() {
        let rec = CredentialRecord::from_payload(&full()).unwrap();
        let dbg = format!("{rec:?}");
        assert!(!dbg.contains("s3cret"));
        assert!(dbg.contains("<redacted>"));
    }
}
