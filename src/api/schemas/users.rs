use crate::domain::user::{NewUser, User};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use uuid::Uuid;

/// Wire shape of a user. Every field is carried as the raw string the client sent;
/// absent and `null` fields deserialize as empty strings so validation can report them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserDto {
    #[serde(deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub email: String,
    /// External id (UUID) chosen by the client.
    #[serde(deserialize_with = "null_as_empty")]
    pub id: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub date_of_birth: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("invalid external id: {0}")]
    ExternalId(#[from] uuid::Error),
    #[error("invalid date of birth: {0}")]
    DateOfBirth(#[from] time::error::Parse),
    #[error("unable to render date of birth: {0}")]
    Render(#[from] time::error::Format),
}

pub(crate) fn parse_date_of_birth(value: &str) -> Result<OffsetDateTime, time::error::Parse> {
    OffsetDateTime::parse(value, &Rfc3339)
}

impl TryFrom<&UserDto> for NewUser {
    type Error = ConversionError;

    fn try_from(dto: &UserDto) -> Result<Self, Self::Error> {
        Ok(Self {
            name: dto.name.clone(),
            email: dto.email.clone(),
            external_id: Uuid::parse_str(&dto.id)?,
            date_of_birth: parse_date_of_birth(&dto.date_of_birth)?,
        })
    }
}

impl TryFrom<&User> for UserDto {
    type Error = ConversionError;

    fn try_from(user: &User) -> Result<Self, Self::Error> {
        Ok(Self {
            name: user.name.clone(),
            email: user.email.clone(),
            id: user.external_id.to_string(),
            date_of_birth: user.date_of_birth.format(&Rfc3339)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Body of a successful lookup: `{"user": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEnvelope {
    pub user: UserDto,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn dto() -> UserDto {
        UserDto {
            name: "test user".into(),
            email: "test@example.com".into(),
            id: "54022f9e-2301-428f-80de-ba73273341fb".into(),
            date_of_birth: "1990-01-01T00:00:00Z".into(),
        }
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let parsed: UserDto = serde_json::from_str(r#"{"name":"ab"}"#).unwrap();
        assert_eq!(parsed.name, "ab");
        assert!(parsed.email.is_empty());
        assert!(parsed.id.is_empty());
        assert!(parsed.date_of_birth.is_empty());
    }

    #[test]
    fn test_null_fields_read_as_empty() {
        let parsed: UserDto =
            serde_json::from_str(r#"{"name":null,"email":"a@example.com","id":null,"date_of_birth":null}"#).unwrap();
        assert_eq!(parsed, UserDto { email: "a@example.com".into(), ..UserDto::default() });
    }

    #[test]
    fn test_non_string_field_is_rejected() {
        assert!(serde_json::from_str::<UserDto>(r#"{"name":42}"#).is_err());
    }

    #[test]
    fn test_convert_to_new_user() {
        let user = NewUser::try_from(&dto()).unwrap();

        assert_eq!(user.external_id, Uuid::parse_str("54022f9e-2301-428f-80de-ba73273341fb").unwrap());
        assert_eq!(user.date_of_birth, datetime!(1990-01-01 00:00:00 UTC));
    }

    #[test]
    fn test_convert_keeps_offset() {
        let mut input = dto();
        input.date_of_birth = "1990-01-01T10:30:00+02:00".into();

        let user = NewUser::try_from(&input).unwrap();
        assert_eq!(user.date_of_birth, datetime!(1990-01-01 10:30:00 +2));
    }

    #[test]
    fn test_convert_rejects_date_without_time() {
        let mut input = dto();
        input.date_of_birth = "1990-01-01".into();

        assert!(matches!(NewUser::try_from(&input), Err(ConversionError::DateOfBirth(_))));
    }

    #[test]
    fn test_convert_rejects_bad_external_id() {
        let mut input = dto();
        input.id = "111111111111".into();

        assert!(matches!(NewUser::try_from(&input), Err(ConversionError::ExternalId(_))));
    }

    #[test]
    fn test_render_user() {
        let user = NewUser::try_from(&dto()).unwrap().into_user(7);
        let rendered = UserDto::try_from(&user).unwrap();

        assert_eq!(rendered, dto());
        assert_eq!(
            serde_json::to_value(UserEnvelope { user: rendered }).unwrap(),
            serde_json::json!({
                "user": {
                    "name": "test user",
                    "email": "test@example.com",
                    "id": "54022f9e-2301-428f-80de-ba73273341fb",
                    "date_of_birth": "1990-01-01T00:00:00Z"
                }
            })
        );
    }
}
