#[cfg(test)]
mod tests {
    use crate::logic::{
        encode_uri_component, extension, file_key_at, percent_decode, public_url_for, sanitize,
    };
    use proptest::prelude::*;

    proptest! {
        // Encoded components survive decoding unchanged
        #[test]
        fn test_encoded_component_decodes_back(input in "\\PC{0,40}") {
            let encoded = encode_uri_component(&input);
            prop_assert_eq!(percent_decode(&encoded), Some(input));
        }

        #[test]
        fn test_encoded_component_is_url_safe(input in "\\PC{0,40}") {
            let encoded = encode_uri_component(&input);
            prop_assert!(encoded
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b"-_.!~*'()%".contains(&b)));
        }

        // One output character per input character, all from the safe set
        #[test]
        fn test_sanitize_keeps_length_and_charset(name in "\\PC{0,40}") {
            let clean = sanitize(&name);
            prop_assert_eq!(clean.chars().count(), name.chars().count());
            prop_assert!(clean
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_'));
        }

        #[test]
        fn test_id_key_keeps_extension(
            id in "[a-z0-9_]{1,20}",
            stem in "[a-z]{1,10}",
            ext in "[a-z]{1,4}",
        ) {
            let key = file_key_at(None, Some(&id), Some(&format!("{stem}.{ext}")), 0, "r");
            prop_assert_eq!(key, format!("{id}.{ext}"));
        }

        #[test]
        fn test_generated_key_has_timestamp_and_extension(
            filename in "[A-Za-z0-9 ._-]{1,30}",
            now_ms in 0i64..4_000_000_000_000,
        ) {
            let key = file_key_at(None, None, Some(&filename), now_ms, "abc123");
            let ext = extension(&filename);
            let needle = format!("-{now_ms}-abc123");
            prop_assert!(key.contains(&needle));
            if !ext.is_empty() {
                let suffix = format!(".{ext}");
                prop_assert!(key.ends_with(&suffix));
            }
        }

        #[test]
        fn test_public_url_has_single_separator(key in "[a-z0-9/ ._-]{1,30}") {
            let url = public_url_for("https://cdn.example.com/", &key);
            prop_assert!(url.starts_with("https://cdn.example.com/"));
            prop_assert!(!url["https://".len()..].contains("//"));
            prop_assert!(!url.contains(' '));
        }
    }
}
