//! Test-signed builds.
//!
//! Release builds are signed with release keys; `test-keys` in the build
//! tags means a third-party key signed the image.

use rootcheck_core::known::TEST_KEYS_TAG;
use rootcheck_core::SignalResult;

/// Positive iff the build tags contain `test-keys`. Unknown tags are negative.
pub fn detect_test_keys(build_tags: Option<&str>) -> SignalResult {
    match build_tags {
        Some(tags) if tags.contains(TEST_KEYS_TAG) => {
            SignalResult::from_evidence(vec![format!("build tags `{tags}` contain {TEST_KEYS_TAG}")])
        }
        _ => SignalResult::negative(),
    }
}
