//! Contact submission schema.
//!
//! The schema is data: an ordered list of fields, each with an ordered list
//! of rules. Every field is checked; within a field the first failing check
//! (required, then text type, then rules) produces that field's message.
//! Messages come back in declaration order.

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;
use thiserror::Error;

/// A submission that passed every rule, ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Rejected submission: one message per violated rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .0.join("; "))]
pub struct ValidationErrors(pub Vec<String>);

impl ValidationErrors {
    #[cfg(test)]
    pub fn messages(&self) -> &[String] {
        &self.0
    }
}

/// A constraint applied to a text value that passed the required/type checks.
pub enum Rule {
    MinLength {
        min: usize,
        message: &'static str,
    },
    Matches {
        pattern: fn() -> &'static Regex,
        message: &'static str,
    },
}

impl Rule {
    fn check(&self, value: &str) -> Result<(), &'static str> {
        match self {
            Self::MinLength { min, message } => {
                if value.chars().count() < *min {
                    return Err(*message);
                }
            }
            Self::Matches { pattern, message } => {
                if !pattern().is_match(value) {
                    return Err(*message);
                }
            }
        }
        Ok(())
    }
}

/// Schema for one submitted field.
pub struct FieldSchema {
    /// Key in the submitted payload.
    pub key: &'static str,
    /// Message for a missing or empty value. `None` falls back to the
    /// default wording.
    pub required_message: Option<&'static str>,
    pub rules: &'static [Rule],
}

impl FieldSchema {
    fn check<'v>(&self, input: &'v Map<String, Value>) -> Result<&'v str, String> {
        let value = match input.get(self.key) {
            None | Some(Value::Null) => {
                return Err(self
                    .required_message
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("\"{}\" is required", self.key)));
            }
            Some(Value::String(s)) => s.as_str(),
            Some(_) => return Err(format!("\"{}\" must be a string", self.key)),
        };

        if value.is_empty() {
            return Err(self
                .required_message
                .map(str::to_string)
                .unwrap_or_else(|| format!("\"{}\" is not allowed to be empty", self.key)));
        }

        for rule in self.rules {
            rule.check(value).map_err(str::to_string)?;
        }

        Ok(value)
    }
}

pub const NAME_KEY: &str = "nome";
pub const EMAIL_KEY: &str = "email";
pub const PHONE_KEY: &str = "telefone";

/// Contact submission schema: name, email, phone, in message order.
pub const CONTACT_SCHEMA: [FieldSchema; 3] = [
    FieldSchema {
        key: NAME_KEY,
        required_message: Some("O nome é obrigatório"),
        rules: &[Rule::MinLength {
            min: 3,
            message: "O nome deve ter pelo menos 3 caracteres",
        }],
    },
    FieldSchema {
        key: EMAIL_KEY,
        required_message: Some("O e-mail é obrigatório"),
        rules: &[Rule::Matches {
            pattern: email_pattern,
            message: "Informe um e-mail válido",
        }],
    },
    FieldSchema {
        key: PHONE_KEY,
        required_message: None,
        rules: &[Rule::Matches {
            pattern: phone_pattern,
            message: "O telefone deve estar no formato (XX) XXXXX-XXXX",
        }],
    },
];

/// Local part, `@`, then at least two dot-separated domain labels.
fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$",
        )
        .expect("email pattern is a valid regex")
    })
}

/// `(DD) DDDDD-DDDD`
fn phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\([0-9]{2}\) [0-9]{5}-[0-9]{4}$").expect("phone pattern is a valid regex")
    })
}

/// Check a submitted payload against [`CONTACT_SCHEMA`].
pub fn validate_contact(input: &Map<String, Value>) -> Result<NewContact, ValidationErrors> {
    let [name, email, phone] = CONTACT_SCHEMA.each_ref().map(|field| field.check(input));

    match (name, email, phone) {
        (Ok(name), Ok(email), Ok(phone)) => Ok(NewContact {
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
        }),
        (name, email, phone) => Err(ValidationErrors(
            [name.err(), email.err(), phone.err()]
                .into_iter()
                .flatten()
                .collect(),
        )),
    }
}
