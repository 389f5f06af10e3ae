//! Access code generation.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

/// Generate a cryptographically random access code
/// (9 bytes → 12 base64url characters, no padding).
pub fn generate_code() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 9] = rand::Rng::random(&mut rng);
    URL_SAFE_NO_PAD.encode(bytes)
}
