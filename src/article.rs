//! Article value type

/// One extracted encyclopedia article
///
/// Immutable after construction; `text` holds raw markup when no cleaner
/// is configured, cleaned flowing text otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Article {
    /// Page id as recorded in the dump
    pub id: String,
    /// Page title
    pub title: String,
    /// Article body text
    pub text: String,
}

impl Article {
    /// Create a new article record
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            text: text.into(),
        }
    }
}
