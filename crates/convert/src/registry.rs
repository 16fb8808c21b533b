//! The conversion matrix.
//!
//! Every legal `(stored type, extension)` pair appears exactly once below;
//! anything not listed is an unsupported conversion.

use fragments_core::SupportedType;
use fragments_core::SupportedType as T;

use self::Transform::{MarkdownToHtml, Passthrough, Reencode};

/// How the stored bytes become the emitted representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// Bytes are returned unchanged.
    Passthrough,
    /// Markdown source rendered to HTML.
    MarkdownToHtml,
    /// Image decoded and encoded again in the emitted container.
    Reencode,
}

/// One legal rendering of a stored type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    /// Normalized extension, without the dot.
    pub extension: &'static str,
    /// Media type of the produced bytes.
    pub emits: SupportedType,
    pub transform: Transform,
}

const fn target(extension: &'static str, emits: SupportedType, transform: Transform) -> Target {
    Target {
        extension,
        emits,
        transform,
    }
}

const MARKDOWN: &[Target] = &[
    target("md", T::TextHtml, MarkdownToHtml),
    target("txt", T::TextPlain, Passthrough),
];

const PLAIN: &[Target] = &[target("txt", T::TextPlain, Passthrough)];

const HTML: &[Target] = &[
    target("html", T::TextHtml, Passthrough),
    target("txt", T::TextPlain, Passthrough),
];

const CSV: &[Target] = &[
    target("csv", T::TextCsv, Passthrough),
    target("txt", T::TextPlain, Passthrough),
];

const JSON: &[Target] = &[
    target("json", T::ApplicationJson, Passthrough),
    target("txt", T::TextPlain, Passthrough),
];

const YAML: &[Target] = &[
    target("yaml", T::ApplicationYaml, Passthrough),
    target("yml", T::ApplicationYaml, Passthrough),
    target("txt", T::TextPlain, Passthrough),
];

const IMAGE: &[Target] = &[
    target("png", T::ImagePng, Reencode),
    target("jpg", T::ImageJpeg, Reencode),
    target("jpeg", T::ImageJpeg, Reencode),
    target("webp", T::ImageWebp, Reencode),
    target("gif", T::ImageGif, Reencode),
    target("avif", T::ImageAvif, Reencode),
];

/// Every extension that appears anywhere in the matrix.
pub const KNOWN_EXTENSIONS: &[&str] = &[
    "md", "txt", "html", "csv", "json", "yaml", "yml", "png", "jpg", "jpeg", "webp", "gif", "avif",
];

/// All legal renderings of `from`.
#[must_use]
pub fn targets(from: SupportedType) -> &'static [Target] {
    match from {
        T::TextMarkdown => MARKDOWN,
        T::TextPlain => PLAIN,
        T::TextHtml => HTML,
        T::TextCsv => CSV,
        T::ApplicationJson => JSON,
        T::ApplicationYaml => YAML,
        T::ImagePng | T::ImageJpeg | T::ImageWebp | T::ImageAvif | T::ImageGif => IMAGE,
    }
}

/// Find the rendering of `from` for an already normalized extension.
#[must_use]
pub fn lookup(from: SupportedType, extension: &str) -> Option<&'static Target> {
    targets(from).iter().find(|t| t.extension == extension)
}

/// Lowercase an extension and strip one leading dot. Empty means none.
#[must_use]
pub fn normalize_extension(extension: &str) -> Option<String> {
    let trimmed = extension.strip_prefix('.').unwrap_or(extension);
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_ascii_lowercase())
    }
}
