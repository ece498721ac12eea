use crate::api::schemas::users::{UserDto, parse_date_of_birth};
use serde::Serialize;
use validator::{ValidateEmail, ValidateLength};

/// A single field-rule failure reported to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    #[serde(rename = "Field")]
    pub field: String,
    #[serde(rename = "Tag")]
    pub tag: String,
    #[serde(rename = "Value")]
    pub value: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, tag: impl Into<String>, value: impl Into<String>) -> Self {
        Self { field: field.into(), tag: tag.into(), value: value.into() }
    }
}

#[derive(Debug, Clone, Copy)]
enum Rule {
    Required,
    Min(u64),
    Email,
    Uuid,
}

impl Rule {
    fn check(self, value: &str) -> bool {
        match self {
            Self::Required => !value.is_empty(),
            Self::Min(min) => value.validate_length(Some(min), None, None),
            Self::Email => value.validate_email() && has_dotted_domain(value),
            Self::Uuid => is_lowercase_uuid(value),
        }
    }

    const fn tag(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Min(_) => "min",
            Self::Email => "email",
            Self::Uuid => "uuid",
        }
    }

    fn param(self) -> String {
        match self {
            Self::Min(min) => min.to_string(),
            Self::Required | Self::Email | Self::Uuid => String::new(),
        }
    }
}

/// The domain must have at least two non-empty labels, so `user@localhost` is rejected.
fn has_dotted_domain(email: &str) -> bool {
    email.rsplit_once('@').is_some_and(|(_, domain)| {
        domain.contains('.') && domain.split('.').all(|label| !label.is_empty())
    })
}

/// Hyphenated 8-4-4-4-12 form with lowercase hex digits only.
fn is_lowercase_uuid(value: &str) -> bool {
    value.len() == 36
        && value.char_indices().all(|(i, c)| match i {
            8 | 13 | 18 | 23 => c == '-',
            _ => matches!(c, '0'..='9' | 'a'..='f'),
        })
}

const NAME_RULES: &[Rule] = &[Rule::Required, Rule::Min(2)];
const EMAIL_RULES: &[Rule] = &[Rule::Email, Rule::Required, Rule::Min(2)];
const EXTERNAL_ID_RULES: &[Rule] = &[Rule::Uuid, Rule::Required];
const DATE_OF_BIRTH_RULES: &[Rule] = &[Rule::Required];

/// Checks an incoming user payload and returns every violation, in check order.
///
/// The date-format check runs first. The structural rules follow in field order
/// (`Name`, `Email`, `ExternalId`, `DateOfBirth`), reporting at most the first failing
/// rule of each field. An empty date therefore yields two `DateOfBirth` entries.
#[must_use]
pub fn validate_user(user: &UserDto) -> Vec<Violation> {
    let mut violations = Vec::new();

    if parse_date_of_birth(&user.date_of_birth).is_err() {
        violations.push(Violation::new("DateOfBirth", "required", "invalid date format"));
    }

    let fields: [(&str, &str, &[Rule]); 4] = [
        ("Name", user.name.as_str(), NAME_RULES),
        ("Email", user.email.as_str(), EMAIL_RULES),
        ("ExternalId", user.id.as_str(), EXTERNAL_ID_RULES),
        ("DateOfBirth", user.date_of_birth.as_str(), DATE_OF_BIRTH_RULES),
    ];

    for (field, value, rules) in fields {
        if let Some(rule) = rules.iter().copied().find(|rule| !rule.check(value)) {
            violations.push(Violation::new(field, rule.tag(), rule.param()));
        }
    }

    violations
}
