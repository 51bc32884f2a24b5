// SPDX-FileCopyrightText: 2026 Pulso Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User identity validation.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::PulsoError;

static USER_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[1-5][0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$",
    )
    .expect("user id pattern is valid")
});

/// Checks that `user_id` is an RFC 4122 UUID (versions 1-5), case-insensitive.
pub fn validate_user_id(user_id: &str) -> Result<(), PulsoError> {
    if USER_ID_PATTERN.is_match(user_id) {
        Ok(())
    } else {
        Err(PulsoError::InvalidUserId(user_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn accepts_v4_uuid_any_case() {
        assert!(validate_user_id("3f2b8c1e-9d4a-4b6e-8f1a-2c3d4e5f6a7b").is_ok());
        assert!(validate_user_id("3F2B8C1E-9D4A-4B6E-8F1A-2C3D4E5F6A7B").is_ok());
    }

    #[test]
    fn rejects_malformed_ids() {
        for bad in [
            "",
            "not-a-uuid",
            "3f2b8c1e9d4a4b6e8f1a2c3d4e5f6a7b",
            // version nibble 0
            "3f2b8c1e-9d4a-0b6e-8f1a-2c3d4e5f6a7b",
            // variant nibble c
            "3f2b8c1e-9d4a-4b6e-cf1a-2c3d4e5f6a7b",
            " 3f2b8c1e-9d4a-4b6e-8f1a-2c3d4e5f6a7b",
        ] {
            let err = validate_user_id(bad).unwrap_err();
            assert!(matches!(err, PulsoError::InvalidUserId(_)), "accepted {bad:?}");
        }
    }

    proptest! {
        #[test]
        fn generated_uuids_validate(
            id in "[0-9a-f]{8}-[0-9a-f]{4}-[1-5][0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}"
        ) {
            prop_assert!(validate_user_id(&id).is_ok());
        }

        #[test]
        fn arbitrary_text_never_panics(s in ".*") {
            let _ = validate_user_id(&s);
        }
    }
}
