//! Room code generation and validation.

use rand::Rng;

/// Safe character set for room codes (excludes 0/O and 1/I to avoid
/// confusion when read aloud or typed from a QR overlay).
const CODE_CHARS: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
const CODE_LENGTH: usize = 6;

/// Generate a random 6-character room code, uniform with replacement.
pub fn generate() -> String {
    let mut rng = rand::rng();
    (0..CODE_LENGTH)
        .map(|_| CODE_CHARS[rng.random_range(0..CODE_CHARS.len())] as char)
        .collect()
}

/// Check length and alphabet membership only. Whether the room exists is a
/// store concern, not a format concern.
pub fn is_valid(code: &str) -> bool {
    code.len() == CODE_LENGTH && code.bytes().all(|b| CODE_CHARS.contains(&b))
}

/// Canonical form used at every entry point: trimmed and uppercased, so
/// codes pasted from links or typed lowercase still match.
pub fn normalize(code: &str) -> String {
    code.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_codes_are_valid() {
        for _ in 0..1000 {
            let code = generate();
            assert_eq!(code.len(), CODE_LENGTH);
            assert!(is_valid(&code), "generated invalid code {code}");
        }
    }

    #[test]
    fn test_ambiguous_characters_excluded() {
        for c in ["0", "O", "1", "I"] {
            assert!(!CODE_CHARS.contains(&c.as_bytes()[0]));
        }
    }

    #[test]
    fn test_is_valid_rejects_bad_shapes() {
        assert!(is_valid("ABC234"));
        assert!(!is_valid(""));
        assert!(!is_valid("ABC23"));
        assert!(!is_valid("ABC2345"));
        assert!(!is_valid("abc234")); // lowercase is normalized first
        assert!(!is_valid("ABC23O")); // ambiguous letter
        assert!(!is_valid("ABC23!"));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  abc234 "), "ABC234");
        assert!(is_valid(&normalize("abc234")));
    }
}
