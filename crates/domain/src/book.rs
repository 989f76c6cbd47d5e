use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::DomainError;

pub const UNKNOWN_AUTHOR: &str = "Unknown author";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BookId(String);

impl BookId {
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(DomainError::EmptyBookId);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for BookId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for BookId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BookId> for String {
    fn from(value: BookId) -> Self {
        value.0
    }
}

impl FromStr for BookId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookStatus {
    Reading,
    Completed,
    Wish,
}

impl BookStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Reading => "reading",
            Self::Completed => "completed",
            Self::Wish => "wish",
        }
    }

    /// Forward path is wish -> reading -> completed; completed -> reading is the undo.
    pub fn can_transition_to(self, next: BookStatus) -> bool {
        matches!(
            (self, next),
            (Self::Wish, Self::Reading)
                | (Self::Reading, Self::Completed)
                | (Self::Completed, Self::Reading)
        ) || self == next
    }
}

impl Display for BookStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reading" => Ok(Self::Reading),
            "completed" | "done" => Ok(Self::Completed),
            "wish" | "wishlist" => Ok(Self::Wish),
            other => Err(DomainError::UnknownStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverColor {
    Slate,
    Red,
    Orange,
    Amber,
    Green,
    Teal,
    Sky,
    Blue,
    #[default]
    Indigo,
    Purple,
    Pink,
    Rose,
}

impl CoverColor {
    pub const ALL: [CoverColor; 12] = [
        Self::Slate,
        Self::Red,
        Self::Orange,
        Self::Amber,
        Self::Green,
        Self::Teal,
        Self::Sky,
        Self::Blue,
        Self::Indigo,
        Self::Purple,
        Self::Pink,
        Self::Rose,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Slate => "slate",
            Self::Red => "red",
            Self::Orange => "orange",
            Self::Amber => "amber",
            Self::Green => "green",
            Self::Teal => "teal",
            Self::Sky => "sky",
            Self::Blue => "blue",
            Self::Indigo => "indigo",
            Self::Purple => "purple",
            Self::Pink => "pink",
            Self::Rose => "rose",
        }
    }

    /// 0xRRGGBB, the 500 shade of the palette.
    pub fn rgb(self) -> u32 {
        match self {
            Self::Slate => 0x64748B,
            Self::Red => 0xEF4444,
            Self::Orange => 0xF97316,
            Self::Amber => 0xF59E0B,
            Self::Green => 0x22C55E,
            Self::Teal => 0x14B8A6,
            Self::Sky => 0x0EA5E9,
            Self::Blue => 0x3B82F6,
            Self::Indigo => 0x6366F1,
            Self::Purple => 0xA855F7,
            Self::Pink => 0xEC4899,
            Self::Rose => 0xF43F5E,
        }
    }
}

impl FromStr for CoverColor {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|color| color.name() == wanted)
            .ok_or(DomainError::UnknownCoverColor(wanted))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Cover {
    Color(CoverColor),
    Url(String),
}

impl Default for Cover {
    fn default() -> Self {
        Self::Color(CoverColor::default())
    }
}

impl Cover {
    /// A blank URL falls back to the default color so the book still renders.
    pub fn from_url(url: &str) -> Self {
        let trimmed = url.trim();
        if trimmed.is_empty() {
            return Self::default();
        }
        Self::Url(trimmed.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub authors: Vec<String>,
    pub status: BookStatus,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub cover: Cover,
    pub added_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub authors: Vec<String>,
    pub status: Option<BookStatus>,
    pub category: Option<String>,
    pub cover: Cover,
}

impl Book {
    pub fn create(id: BookId, draft: NewBook, now: DateTime<Utc>) -> Result<Self, DomainError> {
        let title = normalize_title(&draft.title)?;
        let status = draft.status.unwrap_or(BookStatus::Reading);
        Ok(Self {
            id,
            title,
            authors: normalize_authors(draft.authors),
            status,
            category: normalize_category(draft.category),
            cover: draft.cover,
            added_at: now,
            completed_at: (status == BookStatus::Completed).then_some(now),
        })
    }

    pub fn rename(&mut self, title: &str) -> Result<(), DomainError> {
        self.title = normalize_title(title)?;
        Ok(())
    }

    pub fn set_authors(&mut self, authors: Vec<String>) {
        self.authors = normalize_authors(authors);
    }

    pub fn set_category(&mut self, category: Option<String>) {
        self.category = normalize_category(category);
    }

    pub fn primary_author(&self) -> &str {
        self.authors
            .first()
            .map(String::as_str)
            .unwrap_or(UNKNOWN_AUTHOR)
    }

    pub fn transition_to(
        &mut self,
        next: BookStatus,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        if self.status == next {
            return Ok(());
        }
        if !self.status.can_transition_to(next) {
            return Err(DomainError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.completed_at = match next {
            BookStatus::Completed => Some(now),
            BookStatus::Reading | BookStatus::Wish => None,
        };
        self.status = next;
        Ok(())
    }

    pub fn complete(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        self.transition_to(BookStatus::Completed, now)
    }

    /// Undo of [`Book::complete`].
    pub fn reopen(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        if self.status != BookStatus::Completed {
            return Err(DomainError::InvalidTransition {
                from: self.status,
                to: BookStatus::Reading,
            });
        }
        self.transition_to(BookStatus::Reading, now)
    }

    pub fn start(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        if self.status != BookStatus::Wish {
            return Err(DomainError::InvalidTransition {
                from: self.status,
                to: BookStatus::Reading,
            });
        }
        self.transition_to(BookStatus::Reading, now)
    }
}

fn normalize_title(title: &str) -> Result<String, DomainError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(DomainError::EmptyTitle);
    }
    Ok(trimmed.to_string())
}

fn normalize_authors(authors: Vec<String>) -> Vec<String> {
    let cleaned: Vec<String> = authors
        .into_iter()
        .map(|author| author.trim().to_string())
        .filter(|author| !author.is_empty())
        .collect();
    if cleaned.is_empty() {
        return vec![UNKNOWN_AUTHOR.to_string()];
    }
    cleaned
}

fn normalize_category(category: Option<String>) -> Option<String> {
    category
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
