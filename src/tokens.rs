// src/tokens.rs
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;

pub const REPORT_ID_BYTES: usize = 12;

/// Random id for a new report, also used as its directory name.
pub fn generate_report_id() -> String {
    let mut rng = OsRng;
    generate_token(&mut rng, REPORT_ID_BYTES)
}

/// URL-safe base64 (no padding) of `nbytes` random bytes.
pub fn generate_token<R: RngCore>(rng: &mut R, nbytes: usize) -> String {
    let mut buf = vec![0u8; nbytes];
    rng.fill_bytes(&mut buf);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(&buf)
}

/// Ids arrive in download paths, so only the token alphabet is accepted.
pub fn is_valid_report_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= 64
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn token_is_url_safe_no_pad() {
        let mut rng = StdRng::seed_from_u64(123);
        let t = generate_token(&mut rng, 12);

        assert!(!t.contains('='));
        assert_eq!(t.len(), 16);
        assert!(is_valid_report_id(&t));
    }

    #[test]
    fn generated_ids_differ() {
        assert_ne!(generate_report_id(), generate_report_id());
    }

    #[test]
    fn path_tricks_are_rejected() {
        assert!(!is_valid_report_id("../etc"));
        assert!(!is_valid_report_id("a/b"));
        assert!(!is_valid_report_id(""));
        assert!(is_valid_report_id("Zx-9_q"));
    }
}
