//! Object key derivation and content handling for the R2 provider.

use crate::error::R2Error;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::Utc;
use potli_common::services::FileContent;
use reqwest::Url;

/// Characters `encodeURIComponent` leaves alone besides ASCII alphanumerics.
const URI_COMPONENT_SAFE: &[u8] = b"-_.!~*'()";

/// Percent-encodes everything except unreserved URI component characters.
pub fn encode_uri_component(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        if byte.is_ascii_alphanumeric() || URI_COMPONENT_SAFE.contains(&byte) {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{:02X}", byte));
        }
    }
    out
}

/// Decodes `%XX` escapes. `None` on a malformed escape or invalid UTF-8.
pub fn percent_decode(input: &str) -> Option<String> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = input.get(i + 1..i + 3)?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}

/// Text after the last `.`, or empty when the name has no dot.
pub fn extension(filename: &str) -> &str {
    filename.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("")
}

/// Drops a trailing `.ext` when the extension is non-empty and holds no `/`.
pub fn stem(filename: &str) -> &str {
    match filename.rsplit_once('.') {
        Some((stem, ext)) if !ext.is_empty() && !ext.contains('/') => stem,
        _ => filename,
    }
}

/// Keeps `[A-Za-z0-9.-]`, everything else becomes `_`.
pub fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
        .collect()
}

fn with_extension(base: &str, ext: &str) -> String {
    if ext.is_empty() {
        base.to_string()
    } else {
        format!("{base}.{ext}")
    }
}

fn key_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    percent_decode(parsed.path().trim_start_matches('/'))
}

/// Derives the object key for a file.
///
/// Order: the decoded path of an existing public `url`, then `{id}.{ext}`,
/// then a fresh `{stem}-{millis}-{random}.{ext}`.
pub fn file_key(url: Option<&str>, id: Option<&str>, filename: Option<&str>) -> String {
    let random = uuid::Uuid::new_v4().simple().to_string();
    file_key_at(url, id, filename, Utc::now().timestamp_millis(), &random[..12])
}

pub fn file_key_at(
    url: Option<&str>,
    id: Option<&str>,
    filename: Option<&str>,
    now_ms: i64,
    random: &str,
) -> String {
    if let Some(key) = url.filter(|u| !u.is_empty()).and_then(key_from_url) {
        return key;
    }

    if let Some(id) = id.filter(|id| !id.is_empty()) {
        return with_extension(id, filename.map(extension).unwrap_or(""));
    }

    let fallback = format!("file-{now_ms}");
    let filename = filename.filter(|f| !f.is_empty()).unwrap_or(&fallback);
    let base = format!("{}-{}-{}", sanitize(stem(filename)), now_ms, random);
    with_extension(&base, extension(filename))
}

/// Raw bytes of an upload; base64 strings are decoded.
pub fn decode_content(content: FileContent) -> Result<Vec<u8>, R2Error> {
    let bytes = match content {
        FileContent::Bytes(bytes) => bytes,
        FileContent::Base64(encoded) => STANDARD.decode(encoded.trim()).map_err(|e| {
            R2Error::InvalidData(format!("Failed to process file content: {}", e))
        })?,
    };

    if bytes.is_empty() {
        return Err(R2Error::InvalidData("File buffer is empty".to_string()));
    }
    Ok(bytes)
}

/// `{public_url}/{encoded key}`.
pub fn public_url_for(public_url: &str, key: &str) -> String {
    format!("{}/{}", public_url.trim_end_matches('/'), encode_uri_component(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_from_public_url() {
        let key = file_key_at(
            Some("https://pub-123.r2.dev/hero%20banner-1-abc.jpg"),
            Some("ignored"),
            None,
            0,
            "r",
        );
        assert_eq!(key, "hero banner-1-abc.jpg");
    }

    #[test]
    fn test_malformed_url_falls_through_to_id() {
        let key = file_key_at(Some("not a url"), Some("file_01"), Some("photo.PNG"), 0, "r");
        assert_eq!(key, "file_01.PNG");
    }

    #[test]
    fn test_id_without_extension() {
        assert_eq!(file_key_at(None, Some("file_01"), Some("README"), 0, "r"), "file_01");
        assert_eq!(file_key_at(None, Some("file_01"), None, 0, "r"), "file_01");
    }

    #[test]
    fn test_generated_key() {
        let key = file_key_at(None, None, Some("My Photo (1).jpeg"), 1700000000000, "k3y");
        assert_eq!(key, "My_Photo__1_-1700000000000-k3y.jpeg");
    }

    #[test]
    fn test_generated_key_keeps_inner_dots_and_handles_missing_name() {
        assert_eq!(
            file_key_at(None, None, Some("archive.tar.gz"), 5, "x"),
            "archive.tar-5-x.gz"
        );
        assert_eq!(file_key_at(None, None, None, 5, "x"), "file-5-5-x");
    }

    #[test]
    fn test_random_suffix_varies() {
        let a = file_key(None, None, Some("a.png"));
        let b = file_key(None, None, Some("a.png"));
        assert_ne!(a, b);
        assert!(a.starts_with("a-") && a.ends_with(".png"));
    }

    #[test]
    fn test_encode_and_decode() {
        assert_eq!(encode_uri_component("a b/c(1)~é"), "a%20b%2Fc(1)~%C3%A9");
        assert_eq!(percent_decode("a%20b%2Fc").as_deref(), Some("a b/c"));
        assert_eq!(percent_decode("bad%2"), None);
        assert_eq!(percent_decode("bad%zz"), None);
    }

    #[test]
    fn test_public_url() {
        assert_eq!(
            public_url_for("https://cdn.example.com/", "dir/a b.png"),
            "https://cdn.example.com/dir%2Fa%20b.png"
        );
    }

    #[test]
    fn test_decode_content() {
        assert_eq!(decode_content(FileContent::Base64("aGk=".into())).unwrap(), b"hi");
        let err = decode_content(FileContent::Bytes(Vec::new())).unwrap_err();
        assert_eq!(err.to_string(), "File buffer is empty");
        assert!(decode_content(FileContent::Base64("***".into())).is_err());
    }
}
