//! Input rules shared by the category and post services.
//!
//! Drafts are lenient: a title is enough. Publishing requires a body of at
//! least [`MIN_PUBLISHED_CONTENT_CHARS`] characters once markup is stripped.

use url::Url;

use crate::error::DomainError;
use crate::metrics;
use crate::slug::slugify;

pub const MIN_PUBLISHED_CONTENT_CHARS: usize = 50;

pub fn require_non_empty(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} is required")));
    }
    Ok(())
}

/// Slug for `text`, rejecting input that has no letters or digits to keep.
pub fn derive_slug(field: &str, text: &str) -> Result<String, DomainError> {
    let slug = slugify(text);
    if slug.is_empty() {
        return Err(DomainError::validation(format!(
            "{field} must contain at least one letter or digit"
        )));
    }
    Ok(slug)
}

pub fn validate_image_url(url: &str) -> Result<(), DomainError> {
    Url::parse(url)
        .map(|_| ())
        .map_err(|e| DomainError::validation(format!("imageUrl must be a valid URL ({e})")))
}

/// Checks the state a post would be saved in.
pub fn validate_post(title: &str, content: &str, published: bool) -> Result<(), DomainError> {
    require_non_empty("title", title)?;
    if !published {
        return Ok(());
    }

    let chars = metrics::character_count(content);
    if chars == 0 {
        return Err(DomainError::validation("content is required to publish"));
    }
    if chars < MIN_PUBLISHED_CONTENT_CHARS {
        return Err(DomainError::validation(format!(
            "content must be at least {MIN_PUBLISHED_CONTENT_CHARS} characters to publish (has {chars})"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONG_BODY: &str =
        "<p>This body is comfortably longer than fifty characters of visible text.</p>";

    #[test]
    fn test_draft_needs_only_title() {
        assert!(validate_post("Hello World", "", false).is_ok());
        assert!(validate_post("Hello World", "<p>short</p>", false).is_ok());
    }

    #[test]
    fn test_draft_without_title_fails() {
        assert!(matches!(
            validate_post("   ", LONG_BODY, false),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_publish_requires_long_stripped_content() {
        assert!(validate_post("Hello World", "<p>short</p>", true).is_err());
        assert!(validate_post("Hello World", "<p></p>", true).is_err());
        assert!(validate_post("Hello World", LONG_BODY, true).is_ok());
    }

    #[test]
    fn test_markup_does_not_count_towards_length() {
        let padded = format!("<div class=\"{}\">tiny</div>", "x".repeat(80));
        assert!(validate_post("Title", &padded, true).is_err());
    }

    #[test]
    fn test_image_url() {
        assert!(validate_image_url("https://cdn.example.com/a.png").is_ok());
        assert!(validate_image_url("not a url").is_err());
        assert!(validate_image_url("").is_err());
    }

    #[test]
    fn test_derive_slug_rejects_symbol_only() {
        assert_eq!(derive_slug("name", "Tech!").unwrap(), "tech");
        assert!(matches!(
            derive_slug("name", "!!!"),
            Err(DomainError::Validation(_))
        ));
    }
}
