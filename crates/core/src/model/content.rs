use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

//
// ─── CONTENT TYPES ─────────────────────────────────────────────────────────────
//

/// Discriminant of a `ContentItem`, for callers that only need the shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Text,
    Image,
    Html,
    ConclusionPrompt,
}

/// One unit of authored instructional material.
///
/// Items are immutable once authored and owned by their `Module`. The serde
/// representation matches the authored JSON shape, e.g.
/// `{"type": "text", "content": "..."}`; bare strings and unknown tags are
/// rejected at this boundary instead of being branched on downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ContentItem {
    /// Markdown text rendered as reading material.
    Text { content: String },
    /// URL of an authored image.
    Image { content: String },
    /// Raw HTML embedded in a sandboxed frame by the UI.
    Html { content: String },
    /// Template for the learner's conclusion, with optional author guidance.
    ConclusionPrompt {
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        instructions: Option<String>,
    },
}

//
// ─── CONTENT VALIDATION ERRORS ─────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ContentError {
    #[error("text content cannot be empty")]
    EmptyText,

    #[error("image payload is not a valid URL: {0}")]
    InvalidImageUrl(#[from] url::ParseError),
}

//
// ─── CONTENT ITEM IMPL ─────────────────────────────────────────────────────────
//

impl ContentItem {
    /// Creates a text item.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::EmptyText` if the markdown is blank.
    pub fn text(content: impl Into<String>) -> Result<Self, ContentError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(ContentError::EmptyText);
        }
        Ok(Self::Text { content })
    }

    /// Creates an image item after validating the payload as a URL.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::InvalidImageUrl` if the payload does not parse.
    pub fn image(content: impl Into<String>) -> Result<Self, ContentError> {
        let content = content.into();
        Url::parse(&content)?;
        Ok(Self::Image { content })
    }

    /// Creates a raw HTML item.
    #[must_use]
    pub fn html(content: impl Into<String>) -> Self {
        Self::Html {
            content: content.into(),
        }
    }

    /// Creates a conclusion-prompt item.
    #[must_use]
    pub fn conclusion_prompt(
        content: impl Into<String>,
        instructions: Option<String>,
    ) -> Self {
        Self::ConclusionPrompt {
            content: content.into(),
            instructions,
        }
    }

    #[must_use]
    pub fn kind(&self) -> ContentKind {
        match self {
            Self::Text { .. } => ContentKind::Text,
            Self::Image { .. } => ContentKind::Image,
            Self::Html { .. } => ContentKind::Html,
            Self::ConclusionPrompt { .. } => ContentKind::ConclusionPrompt,
        }
    }

    /// Raw authored payload: markdown, image URL, HTML, or template.
    #[must_use]
    pub fn payload(&self) -> &str {
        match self {
            Self::Text { content }
            | Self::Image { content }
            | Self::Html { content }
            | Self::ConclusionPrompt { content, .. } => content,
        }
    }

    /// Author guidance; only present on conclusion prompts.
    #[must_use]
    pub fn instructions(&self) -> Option<&str> {
        match self {
            Self::ConclusionPrompt { instructions, .. } => instructions.as_deref(),
            _ => None,
        }
    }

    /// Textual stand-in used when flattening a module for a chat prompt.
    ///
    /// Non-text items are replaced by bracketed placeholders so the chat
    /// collaborator sees the reading order without raw HTML or URLs.
    #[must_use]
    pub fn prompt_text(&self) -> &str {
        match self {
            Self::Text { content } => content,
            Self::Image { .. } => "[Image content]",
            Self::Html { .. } => "[Interactive HTML content]",
            Self::ConclusionPrompt { .. } => "[Conclusion prompt]",
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_fails() {
        let err = ContentItem::text("   ").unwrap_err();
        assert_eq!(err, ContentError::EmptyText);
    }

    #[test]
    fn text_passes_and_reports_kind() {
        let item = ContentItem::text("# Heading").unwrap();
        assert_eq!(item.kind(), ContentKind::Text);
        assert_eq!(item.payload(), "# Heading");
        assert_eq!(item.instructions(), None);
    }

    #[test]
    fn image_requires_valid_url() {
        assert!(ContentItem::image("not a url").is_err());
        let item = ContentItem::image("https://example.com/a.png").unwrap();
        assert_eq!(item.kind(), ContentKind::Image);
    }

    #[test]
    fn conclusion_prompt_keeps_instructions() {
        let item = ContentItem::conclusion_prompt("template", Some("explain why".into()));
        assert_eq!(item.instructions(), Some("explain why"));
    }

    #[test]
    fn prompt_text_replaces_non_text_items() {
        let img = ContentItem::image("https://example.com/a.png").unwrap();
        assert_eq!(img.prompt_text(), "[Image content]");
        assert_eq!(ContentItem::html("<b>x</b>").prompt_text(), "[Interactive HTML content]");
    }

    #[test]
    fn serde_uses_tagged_shape() {
        let item = ContentItem::text("hello").unwrap();
        let json = serde_json::to_string(&item).unwrap();
        assert_eq!(json, r#"{"type":"text","content":"hello"}"#);

        let back: ContentItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn serde_rejects_untagged_strings_and_unknown_tags() {
        assert!(serde_json::from_str::<ContentItem>(r#""just a string""#).is_err());
        assert!(
            serde_json::from_str::<ContentItem>(r#"{"type":"video","content":"x"}"#).is_err()
        );
    }

    #[test]
    fn serde_parses_conclusion_prompt_with_instructions() {
        let json = r#"{"type":"conclusion-prompt","content":"tmpl","instructions":"guidance"}"#;
        let item: ContentItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.kind(), ContentKind::ConclusionPrompt);
        assert_eq!(item.instructions(), Some("guidance"));
    }
}
