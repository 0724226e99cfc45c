//! Olares application id derivation.
//!
//! The platform identifies an app by the first 8 hex characters of the MD5
//! digest of its name. The id is only derived when a configuration has none;
//! saved configurations keep the id they were issued.

use md5::{Digest, Md5};

/// Length of an appid in hex characters.
pub const APP_ID_LEN: usize = 8;

/// Derive the 8-character lowercase hex appid for an app name.
///
/// # Examples
///
/// ```
/// use appbuilder_core::derive_app_id;
///
/// let id = derive_app_id("my-app");
/// assert_eq!(id.len(), 8);
/// assert_eq!(id, derive_app_id("my-app"));
/// ```
pub fn derive_app_id(name: &str) -> String {
    let digest = Md5::digest(name.as_bytes());
    let mut hex = String::with_capacity(APP_ID_LEN);
    for byte in digest.iter().take(APP_ID_LEN / 2) {
        hex.push_str(&format!("{byte:02x}"));
    }
    hex
}

/// Whether `id` has the shape of an appid (8 lowercase hex characters).
pub fn is_app_id(id: &str) -> bool {
    id.len() == APP_ID_LEN && id.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_md5_prefix() {
        // md5("") = d41d8cd98f00b204e9800998ecf8427e
        assert_eq!(derive_app_id(""), "d41d8cd9");
        // md5("hello") = 5d41402abc4b2a76b9719d911017c592
        assert_eq!(derive_app_id("hello"), "5d41402a");
    }

    #[test]
    fn stable_across_calls() {
        assert_eq!(derive_app_id("sample-app"), derive_app_id("sample-app"));
        assert_ne!(derive_app_id("sample-app"), derive_app_id("sample-app2"));
    }

    #[test]
    fn is_app_id_shape() {
        assert!(is_app_id("5d41402a"));
        assert!(!is_app_id("5D41402A"));
        assert!(!is_app_id("5d41402"));
        assert!(!is_app_id("5d41402g"));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn always_eight_lowercase_hex(name in ".{0,80}") {
                let id = derive_app_id(&name);
                prop_assert!(is_app_id(&id), "bad id {id}");
            }
        }
    }
}
