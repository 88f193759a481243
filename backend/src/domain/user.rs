//! User data model as seen by the login flow.
//!
//! Users are owned by the directory adapter; the domain only reads them and
//! derives updated copies during enrichment.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Validation errors returned by [`User::try_new`] and [`UserId::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyId,
    InvalidId,
    EmptyRole,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "user id must not contain surrounding whitespace"),
            Self::EmptyRole => write!(f, "user role must not be empty"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Opaque, stable user identifier assigned by the directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    fn from_owned(id: String) -> Result<Self, UserValidationError> {
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::InvalidId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Raw components used to build a [`User`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDraft {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub role: String,
}

/// Directory user record.
///
/// ## Invariants
/// - `id` is non-empty with no surrounding whitespace.
/// - `role` is non-empty once trimmed.
///
/// Names and phone number are carried as supplied by the directory; the
/// enricher is responsible for canonicalising them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(try_from = "UserDto", into = "UserDto")]
pub struct User {
    #[schema(value_type = String, example = "1024")]
    id: UserId,
    first_name: String,
    last_name: String,
    phone_number: Option<String>,
    role: String,
}

impl User {
    /// Fallible constructor enforcing identifier and role invariants.
    pub fn try_new(draft: UserDraft) -> Result<Self, UserValidationError> {
        let UserDraft {
            id,
            first_name,
            last_name,
            phone_number,
            role,
        } = draft;
        let id = UserId::from_owned(id)?;
        if role.trim().is_empty() {
            return Err(UserValidationError::EmptyRole);
        }
        Ok(Self {
            id,
            first_name,
            last_name,
            phone_number,
            role,
        })
    }

    /// Stable user identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn first_name(&self) -> &str {
        self.first_name.as_str()
    }

    pub fn last_name(&self) -> &str {
        self.last_name.as_str()
    }

    pub fn phone_number(&self) -> Option<&str> {
        self.phone_number.as_deref()
    }

    /// Role recorded by the directory, independent of the role selected at
    /// login.
    pub fn role(&self) -> &str {
        self.role.as_str()
    }

    /// First and last name joined by a single space, skipping blanks.
    pub fn full_name(&self) -> String {
        [self.first_name.trim(), self.last_name.trim()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Copy of this user with names and role stripped of surrounding
    /// whitespace. A role that was non-blank stays non-blank, so the copy
    /// keeps the invariants.
    #[must_use]
    pub fn trimmed(&self) -> Self {
        Self {
            id: self.id.clone(),
            first_name: self.first_name.trim().to_owned(),
            last_name: self.last_name.trim().to_owned(),
            phone_number: self.phone_number.clone(),
            role: self.role.trim().to_owned(),
        }
    }

    /// Copy of this user with a replacement phone number.
    #[must_use]
    pub fn with_phone_number(&self, phone_number: Option<String>) -> Self {
        Self {
            phone_number,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct UserDto {
    id: String,
    #[serde(default, alias = "first_name")]
    first_name: String,
    #[serde(default, alias = "last_name")]
    last_name: String,
    #[serde(default, alias = "phone_number", skip_serializing_if = "Option::is_none")]
    phone_number: Option<String>,
    role: String,
}

impl From<User> for UserDto {
    fn from(value: User) -> Self {
        let User {
            id,
            first_name,
            last_name,
            phone_number,
            role,
        } = value;
        Self {
            id: id.into(),
            first_name,
            last_name,
            phone_number,
            role,
        }
    }
}

impl TryFrom<UserDto> for User {
    type Error = UserValidationError;

    fn try_from(value: UserDto) -> Result<Self, Self::Error> {
        User::try_new(UserDraft {
            id: value.id,
            first_name: value.first_name,
            last_name: value.last_name,
            phone_number: value.phone_number,
            role: value.role,
        })
    }
}

#[cfg(test)]
mod tests;
