use crate::domain::user::User;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(sqlx::FromRow)]
pub(crate) struct UserRecord {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub external_id: Uuid,
    pub date_of_birth: OffsetDateTime,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            email: record.email,
            external_id: record.external_id,
            date_of_birth: record.date_of_birth,
        }
    }
}
