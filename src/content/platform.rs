//! Target platform of a generation request.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The social network a post is written for.
///
/// Requests carry the platform as free text.  Exactly `"Instagram"` and `"X"`
/// select the structured content shapes; any other value is treated as a
/// generic text post and keeps its original spelling for prompts.
///
/// ```rust
/// use postcraft::content::Platform;
///
/// assert_eq!(Platform::from("X"), Platform::X);
/// assert_eq!(Platform::from("LinkedIn"), Platform::Other("LinkedIn".into()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Platform {
    /// Caption + short video script.
    Instagram,
    /// Thread of tweets.
    X,
    /// Any other platform: a single plain-text post.
    Other(String),
}

impl Platform {
    /// The platform name as it appeared in the request.
    pub fn as_str(&self) -> &str {
        match self {
            Platform::Instagram => "Instagram",
            Platform::X => "X",
            Platform::Other(name) => name,
        }
    }

    /// `true` when content for this platform is a single plain string.
    pub fn expects_plain_text(&self) -> bool {
        matches!(self, Platform::Other(_))
    }
}

impl From<String> for Platform {
    fn from(name: String) -> Self {
        match name.as_str() {
            "Instagram" => Platform::Instagram,
            "X" => Platform::X,
            _ => Platform::Other(name),
        }
    }
}

impl From<&str> for Platform {
    fn from(name: &str) -> Self {
        Platform::from(name.to_string())
    }
}

impl From<Platform> for String {
    fn from(platform: Platform) -> Self {
        match platform {
            Platform::Other(name) => name,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
