//! Request bodies and their validation.
//!
//! Text fields are trimmed before their length is checked and the trimmed value is what
//! gets stored. Passwords are taken verbatim.

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RegisterInput {
    pub username: String,
    pub anonymous_name: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PostInput {
    pub content: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ReplyInput {
    pub reply_text: String,
}

impl RegisterInput {
    pub fn validated(self) -> Result<Self> {
        Ok(Self {
            username: trimmed("username", &self.username, 4, 20)?,
            anonymous_name: trimmed("anonymous_name", &self.anonymous_name, 2, 20)?,
            password: verbatim("password", self.password, 6, 20)?,
        })
    }
}

impl LoginInput {
    pub fn validated(self) -> Result<Self> {
        Ok(Self {
            username: trimmed("username", &self.username, 4, 20)?,
            password: verbatim("password", self.password, 6, 20)?,
        })
    }
}

impl PostInput {
    pub fn validated(self) -> Result<Self> {
        Ok(Self {
            content: trimmed("content", &self.content, 10, 1000)?,
        })
    }
}

impl ReplyInput {
    pub fn validated(self) -> Result<Self> {
        Ok(Self {
            reply_text: trimmed("reply_text", &self.reply_text, 5, 500)?,
        })
    }
}

fn trimmed(field: &str, value: &str, min: usize, max: usize) -> Result<String> {
    verbatim(field, value.trim().to_owned(), min, max)
}

fn verbatim(field: &str, value: String, min: usize, max: usize) -> Result<String> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(Error::bad_request(anyhow!(
            "{field} must be between {min} and {max} characters"
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_length_bounds() {
        assert!(PostInput { content: "too short".to_owned() }.validated().is_err());
        assert!(PostInput { content: "x".repeat(1001) }.validated().is_err());
        assert!(PostInput { content: "x".repeat(1000) }.validated().is_ok());
        // Padding does not count toward the minimum.
        assert!(PostInput { content: format!("   {}   ", "abc") }.validated().is_err());
    }

    #[test]
    fn reply_is_trimmed() {
        let r = ReplyInput { reply_text: "  hang in there \n".to_owned() }
            .validated()
            .unwrap();
        assert_eq!(r.reply_text, "hang in there");
        assert!(ReplyInput { reply_text: "    ".to_owned() }.validated().is_err());
    }

    #[test]
    fn lengths_count_characters() {
        // Five characters, fifteen bytes.
        assert!(ReplyInput { reply_text: "ありがとう".to_owned() }.validated().is_ok());
    }

    #[test]
    fn register_bounds() {
        let input = |u: &str, a: &str, p: &str| RegisterInput {
            username: u.to_owned(),
            anonymous_name: a.to_owned(),
            password: p.to_owned(),
        };
        assert!(input("abcd", "ab", "secret").validated().is_ok());
        assert!(input("abc", "ab", "secret").validated().is_err());
        assert!(input("abcd", "a", "secret").validated().is_err());
        assert!(input("abcd", "ab", "short").validated().is_err());
        assert!(input("abcd", "ab", &"p".repeat(21)).validated().is_err());
    }
}
