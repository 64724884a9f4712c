//! Locally persisted profile. Lives only on this machine and is never sent to
//! the server.

use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::kv::{KvError, KvStore};

const PROFILE_KEY: &str = "userProfile";
const AVATAR_KEY: &str = "userAvatar";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalProfile {
    pub username: String,
    pub email: String,
    pub bio: String,
}

impl fmt::Display for LocalProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Username: {}", self.username)?;
        writeln!(f, "Email: {}", self.email)?;
        if !self.bio.is_empty() {
            writeln!(f, "Bio: {}", self.bio)?;
        }
        Ok(())
    }
}

pub struct ProfileStore {
    kv: KvStore,
}

impl ProfileStore {
    pub fn open(data_dir: &Path) -> Self {
        Self {
            kv: KvStore::open(data_dir),
        }
    }

    /// File backing the store.
    pub fn location(&self) -> &Path {
        self.kv.path()
    }

    pub fn load(&self) -> Result<Option<LocalProfile>, KvError> {
        self.kv.get(PROFILE_KEY)
    }

    pub fn save(&self, profile: &LocalProfile) -> Result<(), KvError> {
        self.kv.set(PROFILE_KEY, profile)
    }

    /// The stored avatar as a `data:` URL.
    pub fn avatar(&self) -> Result<Option<String>, KvError> {
        self.kv.get(AVATAR_KEY)
    }

    pub fn set_avatar(&self, data_url: &str) -> Result<(), KvError> {
        self.kv.set(AVATAR_KEY, &data_url)
    }

    /// Drops profile and avatar. Returns whether anything was stored.
    pub fn clear(&self) -> Result<bool, KvError> {
        let profile = self.kv.remove(PROFILE_KEY)?;
        let avatar = self.kv.remove(AVATAR_KEY)?;
        Ok(profile || avatar)
    }
}

/// Generated placeholder shown when no avatar has been stored.
pub fn placeholder_avatar_url(username: &str) -> String {
    let name = if username.is_empty() { "User" } else { username };
    format!(
        "https://ui-avatars.com/api/?name={}&background=random",
        urlencoding::encode(name)
    )
}

/// Guesses an image MIME type from the file extension.
pub fn image_mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

pub fn data_url(mime_type: &str, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        mime_type,
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_profile_round_trip() {
        let dir = tempdir().unwrap();
        let store = ProfileStore::open(dir.path());
        assert_eq!(store.load().unwrap(), None);

        let profile = LocalProfile {
            username: "ada".into(),
            email: "ada@example.com".into(),
            bio: String::new(),
        };
        store.save(&profile).unwrap();
        assert_eq!(store.load().unwrap(), Some(profile));
    }

    #[test]
    fn test_partial_profile_defaults() {
        let dir = tempdir().unwrap();
        let kv = KvStore::open(dir.path());
        kv.set(PROFILE_KEY, &serde_json::json!({ "username": "ada" }))
            .unwrap();

        let profile = ProfileStore::open(dir.path()).load().unwrap().unwrap();
        assert_eq!(profile.username, "ada");
        assert_eq!(profile.email, "");
    }

    #[test]
    fn test_clear_removes_both_keys() {
        let dir = tempdir().unwrap();
        let store = ProfileStore::open(dir.path());
        assert!(!store.clear().unwrap());

        store.save(&LocalProfile::default()).unwrap();
        store.set_avatar("data:image/png;base64,AA==").unwrap();
        assert!(store.clear().unwrap());
        assert_eq!(store.load().unwrap(), None);
        assert_eq!(store.avatar().unwrap(), None);
    }

    #[test]
    fn test_data_url() {
        assert_eq!(data_url("image/png", b"hi"), "data:image/png;base64,aGk=");
    }

    #[test]
    fn test_image_mime_type() {
        assert_eq!(image_mime_type(Path::new("me.PNG")), "image/png");
        assert_eq!(image_mime_type(Path::new("me.jpeg")), "image/jpeg");
        assert_eq!(image_mime_type(Path::new("me")), "application/octet-stream");
    }

    #[test]
    fn test_placeholder_avatar_url() {
        assert_eq!(
            placeholder_avatar_url("Ada Lovelace"),
            "https://ui-avatars.com/api/?name=Ada%20Lovelace&background=random"
        );
        assert!(placeholder_avatar_url("").contains("name=User"));
    }
}
