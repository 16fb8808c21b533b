use bytes::Bytes;
use tracing::debug;

use fragments_core::{FragmentError, MediaType};

use crate::registry::{self, Transform};
use crate::{markdown, raster};

/// A payload in its requested representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Converted {
    pub data: Bytes,
    /// Value for the response `Content-Type`.
    pub content_type: String,
}

/// Render `data`, stored as `stored`, in the representation named by
/// `extension`.
///
/// Without an extension the bytes come back untouched under the stored type
/// string (parameters included). Otherwise the pair must appear in the
/// conversion matrix.
///
/// # Errors
///
/// - [`FragmentError::UnsupportedConversion`] if the pair is not in the
///   matrix.
/// - [`FragmentError::Conversion`] if a legal transform fails on the bytes.
pub fn convert(
    data: Bytes,
    stored: &MediaType,
    extension: Option<&str>,
) -> Result<Converted, FragmentError> {
    let Some(extension) = extension.and_then(registry::normalize_extension) else {
        return Ok(Converted {
            data,
            content_type: stored.as_str().to_owned(),
        });
    };

    let unsupported = || FragmentError::UnsupportedConversion {
        from: stored.essence().to_owned(),
        extension: extension.clone(),
    };
    let from = stored.supported().ok_or_else(unsupported)?;
    let target = registry::lookup(from, &extension).ok_or_else(unsupported)?;

    debug!(
        from = %from,
        to = %target.emits,
        transform = ?target.transform,
        "converting fragment data"
    );

    let data = match target.transform {
        Transform::Passthrough => data,
        Transform::MarkdownToHtml => Bytes::from(markdown::render_html(&data)),
        Transform::Reencode => Bytes::from(raster::reencode(&data, target.emits)?),
    };

    Ok(Converted {
        data,
        content_type: target.emits.essence().to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use fragments_core::SupportedType;

    use super::*;
    use crate::registry::KNOWN_EXTENSIONS;

    fn media(value: &str) -> MediaType {
        MediaType::parse(value).unwrap()
    }

    #[test]
    fn no_extension_returns_stored_bytes_and_type() {
        let stored = media("text/plain; charset=utf-8");
        let data = Bytes::from_static(b"hello");
        for ext in [None, Some(""), Some(".")] {
            let out = convert(data.clone(), &stored, ext).unwrap();
            assert_eq!(out.data, data);
            assert_eq!(out.content_type, "text/plain; charset=utf-8");
        }
    }

    #[test]
    fn markdown_renders_to_html() {
        let out = convert(Bytes::from_static(b"# Hi"), &media("text/markdown"), Some("md")).unwrap();
        assert_eq!(out.data, Bytes::from_static(b"<h1>Hi</h1>\n"));
        assert_eq!(out.content_type, "text/html");
    }

    #[test]
    fn extension_is_case_insensitive_and_dot_tolerant() {
        let out = convert(Bytes::from_static(b"# Hi"), &media("text/markdown"), Some(".MD")).unwrap();
        assert_eq!(out.content_type, "text/html");
    }

    #[test]
    fn text_passthrough_keeps_bytes() {
        let data = Bytes::from_static(b"a,b\n1,2\n");
        let out = convert(data.clone(), &media("text/csv"), Some("txt")).unwrap();
        assert_eq!(out.data, data);
        assert_eq!(out.content_type, "text/plain");

        let yaml = Bytes::from_static(b"a: 1\n");
        let out = convert(yaml.clone(), &media("application/yaml"), Some("yml")).unwrap();
        assert_eq!(out.data, yaml);
        assert_eq!(out.content_type, "application/yaml");
    }

    #[test]
    fn plain_text_to_png_is_unsupported() {
        let err = convert(Bytes::from_static(b"hi"), &media("text/plain"), Some("png")).unwrap_err();
        match err {
            FragmentError::UnsupportedConversion { from, extension } => {
                assert_eq!(from, "text/plain");
                assert_eq!(extension, "png");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        let err = convert(Bytes::from_static(b"{}"), &media("application/json"), Some("xml"))
            .unwrap_err();
        assert!(matches!(err, FragmentError::UnsupportedConversion { .. }));
    }

    #[test]
    fn unsupported_stored_type_cannot_convert() {
        let err = convert(Bytes::new(), &media("application/xml"), Some("txt")).unwrap_err();
        assert!(matches!(err, FragmentError::UnsupportedConversion { .. }));
    }

    #[test]
    fn image_reencode_sets_emitted_type() {
        let png = crate::raster::tests::sample_png();
        let out = convert(Bytes::from(png), &media("image/png"), Some("jpg")).unwrap();
        assert_eq!(out.content_type, "image/jpeg");
        assert_eq!(&out.data[..3], &[0xFF, 0xD8, 0xFF]);
    }

    #[test]
    fn corrupt_image_is_a_conversion_error() {
        let err = convert(Bytes::from_static(b"nope"), &media("image/webp"), Some("png")).unwrap_err();
        assert!(matches!(err, FragmentError::Conversion(_)));
    }

    /// Every non-image pair either converts or is rejected as unsupported,
    /// never anything else.
    #[test]
    fn text_matrix_outcomes() {
        let payload = Bytes::from_static(b"plain words");
        for from in SupportedType::ALL.into_iter().filter(|t| !t.is_image()) {
            let stored = media(from.essence());
            for &ext in KNOWN_EXTENSIONS {
                let result = convert(payload.clone(), &stored, Some(ext));
                match registry::lookup(from, ext) {
                    Some(target) => {
                        let out = result.unwrap();
                        assert_eq!(out.content_type, target.emits.essence(), "{from} .{ext}");
                    }
                    None => assert!(
                        matches!(result, Err(FragmentError::UnsupportedConversion { .. })),
                        "{from} .{ext}"
                    ),
                }
            }
        }
    }

    /// Stored bytes in the given image format, derived from one sample.
    fn sample_in(format: SupportedType) -> Bytes {
        let png = crate::raster::tests::sample_png();
        match format {
            SupportedType::ImagePng => Bytes::from(png),
            other => Bytes::from(crate::raster::reencode(&png, other).unwrap()),
        }
    }

    fn has_signature(data: &[u8], format: SupportedType) -> bool {
        match format {
            SupportedType::ImagePng => data.starts_with(b"\x89PNG"),
            SupportedType::ImageJpeg => data.starts_with(&[0xFF, 0xD8, 0xFF]),
            SupportedType::ImageWebp => data.starts_with(b"RIFF") && &data[8..12] == b"WEBP",
            SupportedType::ImageGif => data.starts_with(b"GIF8"),
            SupportedType::ImageAvif => &data[4..12] == b"ftypavif",
            _ => false,
        }
    }

    /// Every image source against every extension: listed pairs re-encode to
    /// the documented type, everything else is unsupported.
    #[test]
    fn image_matrix_outcomes() {
        for from in SupportedType::ALL.into_iter().filter(|t| t.is_image()) {
            let stored = media(from.essence());
            let payload = sample_in(from);
            let decodable = cfg!(feature = "avif-decode") || from != SupportedType::ImageAvif;
            for &ext in KNOWN_EXTENSIONS {
                let result = convert(payload.clone(), &stored, Some(ext));
                match registry::lookup(from, ext) {
                    Some(target) if decodable => {
                        let out = result.unwrap_or_else(|e| panic!("{from} .{ext}: {e}"));
                        assert_eq!(out.content_type, target.emits.essence(), "{from} .{ext}");
                        assert!(has_signature(&out.data, target.emits), "{from} .{ext}");
                    }
                    Some(_) => assert!(
                        matches!(result, Err(FragmentError::Conversion(_))),
                        "{from} .{ext}"
                    ),
                    None => assert!(
                        matches!(result, Err(FragmentError::UnsupportedConversion { .. })),
                        "{from} .{ext}"
                    ),
                }
            }
        }
    }
}
