use serde::{Deserialize, Serialize};
use std::fmt;

use super::Entity;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

impl User {
    pub fn new(id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            email: String::new(),
            avatar_url: None,
            bio: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }
}

impl Entity for User {
    fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} <{}>", self.username, self.email)?;
        writeln!(f, "ID: {}", self.id)?;
        if let Some(bio) = self.bio.as_deref().filter(|b| !b.is_empty()) {
            writeln!(f, "Bio: {}", bio)?;
        }
        if let Some(avatar) = &self.avatar_url {
            writeln!(f, "Avatar: {}", avatar)?;
        }
        Ok(())
    }
}

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPayload {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

impl RegisterPayload {
    /// Builds the payload, hashing `password` before it leaves the process.
    pub fn new(username: &str, email: &str, password: &str) -> Self {
        Self {
            username: username.trim().to_string(),
            email: email.trim().to_string(),
            password_hash: crate::password::hash_password(password),
        }
    }
}

/// Body of `POST /auth/login`. `name` carries the email address.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoginPayload {
    pub name: String,
    pub password_hash: String,
}

impl LoginPayload {
    pub fn new(name: &str, password: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            password_hash: crate::password::hash_password(password),
        }
    }
}

/// An avatar image sent as a multipart file part.
#[derive(Debug, Clone, PartialEq)]
pub struct Avatar {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Fields of a `PATCH /user/{id}` multipart form. Unset fields are omitted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub avatar: Option<Avatar>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none() && self.bio.is_none() && self.avatar.is_none()
    }

    /// Text parts of the form, in a stable order.
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        [
            ("username", &self.username),
            ("email", &self.email),
            ("bio", &self.bio),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.clone().map(|v| (name, v)))
        .collect()
    }
}
