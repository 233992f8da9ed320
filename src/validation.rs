//! Field validation predicates and declarative request schemas.
//!
//! Every predicate is total over an arbitrary JSON value and answers
//! whether the value *fails* its constraint. Request bodies declare a
//! schema (field -> rule) that is checked before deserialization.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::config::{MSG_INVALID_FIELDS, MSG_INVALID_PASSWORD};
use crate::errors::{AppError, AppResult};

static UUID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:[0-9a-f]{8}-[0-9a-f]{4}-[1-8][0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}|00000000-0000-0000-0000-000000000000|ffffffff-ffff-ffff-ffff-ffffffffffff)$",
    )
    .expect("valid uuid pattern")
});

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email pattern")
});

static USER_NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9]{2,10}$").expect("valid user name pattern"));

static IMAGE_URL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.(jpg|png)$").expect("valid image url pattern"));

/// Not a string, or blank after trimming.
pub fn is_invalid_string(value: &Value) -> bool {
    match value {
        Value::String(s) => s.trim().is_empty(),
        _ => true,
    }
}

/// Not a native number, negative, or with a fractional part.
pub fn is_invalid_integer(value: &Value) -> bool {
    match value {
        Value::Number(n) => {
            if n.is_u64() {
                false
            } else if n.is_i64() {
                true
            } else {
                n.as_f64().map_or(true, |f| f < 0.0 || f.fract() != 0.0)
            }
        }
        _ => true,
    }
}

/// Not a hyphenated RFC 4122 UUID string.
pub fn is_invalid_uuid(value: &Value) -> bool {
    value.as_str().map_or(true, is_invalid_uuid_str)
}

pub fn is_invalid_uuid_str(value: &str) -> bool {
    !UUID_PATTERN.is_match(value)
}

pub fn is_invalid_email(value: &Value) -> bool {
    value.as_str().map_or(true, |s| !EMAIL_PATTERN.is_match(s))
}

/// User names are 2-10 ASCII alphanumerics.
pub fn is_invalid_user_name(value: &Value) -> bool {
    value.as_str().map_or(true, |s| !USER_NAME_PATTERN.is_match(s))
}

/// Passwords are 8-16 characters with a digit, a lowercase and an uppercase letter.
pub fn is_invalid_password(value: &Value) -> bool {
    let Some(s) = value.as_str() else {
        return true;
    };
    let len = s.chars().count();
    !((8..=16).contains(&len)
        && s.chars().any(|c| c.is_ascii_digit())
        && s.chars().any(|c| c.is_ascii_lowercase())
        && s.chars().any(|c| c.is_ascii_uppercase()))
}

pub fn is_invalid_image_url(value: &Value) -> bool {
    value.as_str().map_or(true, |s| !IMAGE_URL_PATTERN.is_match(s))
}

pub fn is_invalid_https_url(value: &Value) -> bool {
    value.as_str().map_or(true, |s| !s.starts_with("https://"))
}

/// A single field constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    String,
    Integer,
    Uuid,
    Email,
    UserName,
    Password,
    ImageUrl,
    HttpsUrl,
    /// Non-empty array whose every element is a UUID
    UuidList,
    /// Absent/null is fine, otherwise the inner rule applies
    Optional(&'static Rule),
}

impl Rule {
    /// True if `value` (None when the field is missing) violates the rule.
    pub fn fails(&self, value: Option<&Value>) -> bool {
        match self {
            Rule::Optional(inner) => match value {
                None | Some(Value::Null) => false,
                Some(v) => inner.fails(Some(v)),
            },
            _ => {
                let Some(v) = value else {
                    return true;
                };
                match self {
                    Rule::String => is_invalid_string(v),
                    Rule::Integer => is_invalid_integer(v),
                    Rule::Uuid => is_invalid_string(v) || is_invalid_uuid(v),
                    Rule::Email => is_invalid_email(v),
                    Rule::UserName => is_invalid_user_name(v),
                    Rule::Password => is_invalid_password(v),
                    Rule::ImageUrl => is_invalid_string(v) || is_invalid_image_url(v),
                    Rule::HttpsUrl => is_invalid_https_url(v),
                    Rule::UuidList => match v.as_array() {
                        Some(items) => items.is_empty() || items.iter().any(is_invalid_uuid),
                        None => true,
                    },
                    Rule::Optional(_) => unreachable!(),
                }
            }
        }
    }

    fn message(&self) -> &'static str {
        match self {
            Rule::Password => MSG_INVALID_PASSWORD,
            Rule::Optional(inner) => inner.message(),
            _ => MSG_INVALID_FIELDS,
        }
    }
}

/// Field -> rule table for one request body.
pub type Schema = &'static [(&'static str, Rule)];

/// Request bodies that declare their field rules.
pub trait RequestSchema {
    const SCHEMA: Schema;
}

/// Check `body` against `schema`, failing on the first violated rule.
pub fn check(body: &Value, schema: Schema) -> AppResult<()> {
    for (field, rule) in schema {
        if rule.fails(body.get(field)) {
            tracing::warn!(field = *field, rule = ?rule, "request field rejected");
            return Err(AppError::validation(rule.message()));
        }
    }
    Ok(())
}

/// Validate a path identifier.
pub fn check_id(id: &str, msg: &str) -> AppResult<uuid::Uuid> {
    if is_invalid_uuid_str(id) {
        return Err(AppError::validation(msg));
    }
    uuid::Uuid::parse_str(id).map_err(|_| AppError::validation(msg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_rule() {
        assert!(is_invalid_string(&json!("")));
        assert!(is_invalid_string(&json!("   ")));
        assert!(is_invalid_string(&json!(42)));
        assert!(is_invalid_string(&Value::Null));
        assert!(!is_invalid_string(&json!("yoga")));
    }

    #[test]
    fn test_integer_rule() {
        assert!(!is_invalid_integer(&json!(0)));
        assert!(!is_invalid_integer(&json!(12)));
        assert!(!is_invalid_integer(&json!(3.0)));
        assert!(is_invalid_integer(&json!(-1)));
        assert!(is_invalid_integer(&json!(1.5)));
        assert!(is_invalid_integer(&json!("5")));
        assert!(is_invalid_integer(&Value::Null));
    }

    #[test]
    fn test_uuid_rule() {
        assert!(!is_invalid_uuid(&json!(uuid::Uuid::new_v4().to_string())));
        assert!(!is_invalid_uuid(&json!("00000000-0000-0000-0000-000000000000")));
        assert!(!is_invalid_uuid(&json!("A8098C1A-F86E-11DA-BD1A-00112444BE1E")));
        assert!(is_invalid_uuid(&json!("a8098c1af86e11dabd1a00112444be1e")));
        assert!(is_invalid_uuid(&json!("not-a-uuid")));
        assert!(is_invalid_uuid(&json!("")));
        assert!(is_invalid_uuid(&json!(7)));
    }

    #[test]
    fn test_email_rule() {
        assert!(!is_invalid_email(&json!("coach.lee@example.com")));
        assert!(is_invalid_email(&json!("coach@example")));
        assert!(is_invalid_email(&json!("@example.com")));
        assert!(is_invalid_email(&json!(null)));
    }

    #[test]
    fn test_user_name_rule() {
        assert!(!is_invalid_user_name(&json!("ab")));
        assert!(!is_invalid_user_name(&json!("Runner2024")));
        assert!(is_invalid_user_name(&json!("a")));
        assert!(is_invalid_user_name(&json!("elevenchars")));
        assert!(is_invalid_user_name(&json!("bad name")));
    }

    #[test]
    fn test_password_rule() {
        assert!(!is_invalid_password(&json!("Passw0rd")));
        assert!(!is_invalid_password(&json!("Abcdefgh12345678")));
        assert!(is_invalid_password(&json!("Pass0rd")));
        assert!(is_invalid_password(&json!("Abcdefgh123456789")));
        assert!(is_invalid_password(&json!("password1")));
        assert!(is_invalid_password(&json!("PASSWORD1")));
        assert!(is_invalid_password(&json!("Password")));
        assert!(is_invalid_password(&json!(12345678)));
    }

    #[test]
    fn test_image_url_rule() {
        assert!(!is_invalid_image_url(&json!("https://cdn.example.com/me.jpg")));
        assert!(!is_invalid_image_url(&json!("https://cdn.example.com/me.PNG")));
        assert!(is_invalid_image_url(&json!("https://cdn.example.com/me.gif")));
    }

    #[test]
    fn test_schema_check() {
        const SCHEMA: Schema = &[
            ("name", Rule::String),
            ("credit_amount", Rule::Integer),
            ("image", Rule::Optional(&Rule::ImageUrl)),
        ];

        assert!(check(&json!({"name": "7 lessons", "credit_amount": 7}), SCHEMA).is_ok());
        assert!(check(
            &json!({"name": "7 lessons", "credit_amount": 7, "image": "https://x/a.png"}),
            SCHEMA
        )
        .is_ok());
        assert!(check(&json!({"name": "7 lessons"}), SCHEMA).is_err());
        assert!(check(&json!({"name": "", "credit_amount": 7}), SCHEMA).is_err());
        assert!(check(
            &json!({"name": "7 lessons", "credit_amount": 7, "image": "https://x/a.bmp"}),
            SCHEMA
        )
        .is_err());
    }

    #[test]
    fn test_uuid_list_rule() {
        let id = uuid::Uuid::new_v4().to_string();
        assert!(!Rule::UuidList.fails(Some(&json!([id]))));
        assert!(Rule::UuidList.fails(Some(&json!([]))));
        assert!(Rule::UuidList.fails(Some(&json!([id, "nope"]))));
        assert!(Rule::UuidList.fails(Some(&json!("x"))));
    }

    #[test]
    fn test_password_rule_message() {
        let err = check(&json!({"password": "weak"}), &[("password", Rule::Password)]).unwrap_err();
        assert!(matches!(err, AppError::Validation(m) if m == MSG_INVALID_PASSWORD));
    }
}
