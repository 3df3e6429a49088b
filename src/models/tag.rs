use std::fmt;
use std::str::FromStr;

/// The closed vocabulary of blog tags.
///
/// Parsing is exact and case-sensitive: `"sports"` is a tag, `"Sports"` is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    National,
    State,
    Crime,
    Politics,
    Sports,
    Business,
    Employment,
    Entertainment,
    Health,
    Spiritual,
    Media,
    Author,
    Viral,
    Podcast,
}

impl Tag {
    /// Every tag, in the order the vocabulary was published.
    pub const ALL: [Tag; 14] = [
        Tag::National,
        Tag::State,
        Tag::Crime,
        Tag::Politics,
        Tag::Sports,
        Tag::Business,
        Tag::Employment,
        Tag::Entertainment,
        Tag::Health,
        Tag::Spiritual,
        Tag::Media,
        Tag::Author,
        Tag::Viral,
        Tag::Podcast,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::National => "national",
            Tag::State => "state",
            Tag::Crime => "crime",
            Tag::Politics => "politics",
            Tag::Sports => "sports",
            Tag::Business => "business",
            Tag::Employment => "employment",
            Tag::Entertainment => "entertainment",
            Tag::Health => "health",
            Tag::Spiritual => "spiritual",
            Tag::Media => "media",
            Tag::Author => "author",
            Tag::Viral => "viral",
            Tag::Podcast => "podcast",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not part of the tag vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tag '{0}'")]
pub struct UnknownTag(pub String);

impl FromStr for Tag {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tag::ALL
            .iter()
            .copied()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| UnknownTag(s.to_string()))
    }
}
