use sha2::{Digest, Sha256};
use uuid::Uuid;

pub const LINK_PREFIX: &str = "link";
pub const CATEGORY_PREFIX: &str = "cat";

const SHORT_LEN: usize = 6;
const WIDE_LEN: usize = 12;
const SHORT_ATTEMPTS: usize = 64;

pub fn generate_id<F>(prefix: &str, mut exists: F) -> String
where
    F: FnMut(&str) -> bool,
{
    for _ in 0..SHORT_ATTEMPTS {
        let candidate = format!("{}-{}", prefix, &seed_digest()[..SHORT_LEN]);
        if !exists(&candidate) {
            return candidate;
        }
    }

    loop {
        let candidate = format!("{}-{}", prefix, &seed_digest()[..WIDE_LEN]);
        if !exists(&candidate) {
            return candidate;
        }
    }
}

fn seed_digest() -> String {
    let seed = Uuid::now_v7().to_string();
    let mut hasher = Sha256::new();
    hasher.update(seed.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{generate_id, CATEGORY_PREFIX, LINK_PREFIX};

    #[test]
    fn generated_ids_follow_prefix_short_hash_shape() {
        let seen: HashSet<String> = HashSet::new();
        let id = generate_id(LINK_PREFIX, |candidate| seen.contains(candidate));
        assert!(id.starts_with("link-"));
        let suffix = id.split('-').next_back().expect("short hash should exist");
        assert_eq!(suffix.len(), 6);
        assert!(suffix.chars().all(|ch| ch.is_ascii_hexdigit()));
    }

    #[test]
    fn generated_ids_do_not_repeat() {
        let mut seen: HashSet<String> = HashSet::new();
        for _ in 0..200 {
            let id = generate_id(CATEGORY_PREFIX, |candidate| seen.contains(candidate));
            assert!(seen.insert(id), "generated id should be fresh");
        }
    }

    #[test]
    fn widens_when_short_ids_keep_colliding() {
        let id = generate_id(LINK_PREFIX, |candidate| candidate.len() < "link-".len() + 12);
        assert_eq!(id.len(), "link-".len() + 12);
    }
}
