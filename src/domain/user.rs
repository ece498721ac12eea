use time::OffsetDateTime;
use uuid::Uuid;

/// A persisted user. `id` is assigned by the store and never supplied by clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub external_id: Uuid,
    pub date_of_birth: OffsetDateTime,
}

/// A user that has passed validation and conversion but has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub external_id: Uuid,
    pub date_of_birth: OffsetDateTime,
}

impl NewUser {
    pub(crate) fn into_user(self, id: i32) -> User {
        User { id, name: self.name, email: self.email, external_id: self.external_id, date_of_birth: self.date_of_birth }
    }
}
