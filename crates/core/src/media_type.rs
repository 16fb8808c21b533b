//! Content-Type parsing and the fixed set of media types a fragment may hold.

use std::fmt;

use crate::error::FragmentError;

/// The exhaustive set of base media types a fragment can be created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SupportedType {
    TextPlain,
    TextMarkdown,
    TextHtml,
    TextCsv,
    ApplicationJson,
    ApplicationYaml,
    ImagePng,
    ImageJpeg,
    ImageWebp,
    ImageAvif,
    ImageGif,
}

impl SupportedType {
    /// Every supported type, in declaration order.
    pub const ALL: [Self; 11] = [
        Self::TextPlain,
        Self::TextMarkdown,
        Self::TextHtml,
        Self::TextCsv,
        Self::ApplicationJson,
        Self::ApplicationYaml,
        Self::ImagePng,
        Self::ImageJpeg,
        Self::ImageWebp,
        Self::ImageAvif,
        Self::ImageGif,
    ];

    /// The `type/subtype` string for this media type.
    #[must_use]
    pub fn essence(self) -> &'static str {
        match self {
            Self::TextPlain => "text/plain",
            Self::TextMarkdown => "text/markdown",
            Self::TextHtml => "text/html",
            Self::TextCsv => "text/csv",
            Self::ApplicationJson => "application/json",
            Self::ApplicationYaml => "application/yaml",
            Self::ImagePng => "image/png",
            Self::ImageJpeg => "image/jpeg",
            Self::ImageWebp => "image/webp",
            Self::ImageAvif => "image/avif",
            Self::ImageGif => "image/gif",
        }
    }

    /// Look up a supported type by its (lowercase) `type/subtype` string.
    #[must_use]
    pub fn from_essence(essence: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.essence() == essence)
    }

    /// Returns `true` for the `image/*` members of the set.
    #[must_use]
    pub fn is_image(self) -> bool {
        matches!(
            self,
            Self::ImagePng | Self::ImageJpeg | Self::ImageWebp | Self::ImageAvif | Self::ImageGif
        )
    }
}

impl fmt::Display for SupportedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.essence())
    }
}

/// A parsed Content-Type value.
///
/// Keeps the raw value untouched (parameters included) next to the
/// normalized `type/subtype` essence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaType {
    raw: String,
    essence: String,
}

impl MediaType {
    /// Parse a Content-Type header value such as `text/plain; charset=utf-8`.
    pub fn parse(value: &str) -> Result<Self, FragmentError> {
        let parsed: mime::Mime = value.trim().parse().map_err(|e| {
            FragmentError::Validation(format!("invalid content type {value:?}: {e}"))
        })?;
        Ok(Self {
            raw: value.to_owned(),
            essence: parsed.essence_str().to_ascii_lowercase(),
        })
    }

    /// The raw value as it was supplied.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The base media type without parameters, e.g. `text/html`.
    #[must_use]
    pub fn essence(&self) -> &str {
        &self.essence
    }

    /// The matching member of the supported set, if any.
    #[must_use]
    pub fn supported(&self) -> Option<SupportedType> {
        SupportedType::from_essence(&self.essence)
    }

    /// Returns `true` if the base type is `text/*`.
    #[must_use]
    pub fn is_text(&self) -> bool {
        self.essence.starts_with("text/")
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Returns `true` if `value` parses and its base type is supported.
///
/// Parameters such as `charset` are ignored.
#[must_use]
pub fn is_supported_type(value: &str) -> bool {
    MediaType::parse(value).is_ok_and(|t| t.supported().is_some())
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn parse_strips_parameters() {
        let t = MediaType::parse("text/plain; charset=utf-8").unwrap();
        assert_eq!(t.essence(), "text/plain");
        assert_eq!(t.as_str(), "text/plain; charset=utf-8");
        assert_eq!(t.supported(), Some(SupportedType::TextPlain));
    }

    #[test]
    fn parse_normalizes_case() {
        let t = MediaType::parse("Text/Markdown").unwrap();
        assert_eq!(t.essence(), "text/markdown");
        assert_eq!(t.as_str(), "Text/Markdown");
    }

    #[test]
    fn parse_rejects_garbage() {
        for bad in ["", "text", "not a type"] {
            let err = MediaType::parse(bad).unwrap_err();
            assert!(matches!(err, FragmentError::Validation(_)), "{bad:?}");
        }
    }

    #[test]
    fn supported_set_is_exhaustive() {
        for t in SupportedType::ALL {
            assert!(is_supported_type(t.essence()), "{t}");
            assert_eq!(SupportedType::from_essence(t.essence()), Some(t));
        }
        assert!(is_supported_type("application/json; charset=utf-8"));
        assert!(!is_supported_type("application/xml"));
        assert!(!is_supported_type("image/bmp"));
        assert!(!is_supported_type("plain"));
    }

    #[test]
    fn text_family() {
        assert!(MediaType::parse("text/csv").unwrap().is_text());
        assert!(!MediaType::parse("application/json").unwrap().is_text());
        assert!(SupportedType::ImageAvif.is_image());
        assert!(!SupportedType::TextHtml.is_image());
    }

    proptest! {
        #[test]
        fn parameters_never_change_support(idx in 0usize..11, charset in "[a-z0-9-]{1,12}") {
            let t = SupportedType::ALL[idx];
            let value = format!("{}; charset={charset}", t.essence());
            prop_assert!(is_supported_type(&value));
            prop_assert_eq!(MediaType::parse(&value).unwrap().supported(), Some(t));
        }
    }
}
