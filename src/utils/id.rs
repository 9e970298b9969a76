use chrono::Utc;
use rand::{distributions::Alphanumeric, thread_rng, Rng};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

const RANDOM_SUFFIX_LEN: usize = 8;

/// Hands out identifiers of the form `<kind>_<millis><seq>_<random>`.
///
/// Clones share the same counter, so every handle in a session draws from one
/// monotonic sequence.
#[derive(Clone, Debug, Default)]
pub struct IdGenerator {
    counter: Arc<AtomicU64>,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generate(&self, kind: &str) -> String {
        let seq = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        let millis = Utc::now().timestamp_millis();
        format!(
            "{}_{:x}{:04x}_{}",
            kind,
            millis,
            seq,
            random_suffix(RANDOM_SUFFIX_LEN)
        )
    }
}

fn random_suffix(length: usize) -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_are_prefixed_by_kind() {
        let ids = IdGenerator::new();
        assert!(ids.generate("module").starts_with("module_"));
        assert!(ids.generate("answer").starts_with("answer_"));
    }

    #[test]
    fn ids_never_repeat_within_a_session() {
        let ids = IdGenerator::new();
        let shared = ids.clone();
        let mut seen = HashSet::new();
        for i in 0..5_000 {
            let id = if i % 2 == 0 {
                ids.generate("item")
            } else {
                shared.generate("item")
            };
            assert!(seen.insert(id), "duplicate identifier generated");
        }
    }
}
