//! Persisted top score
//!
//! A single integer in LocalStorage. A missing or unparsable stored value
//! reads as zero; write failures are logged and ignored.

/// The best score across sessions
#[derive(Debug, Clone, Default)]
pub struct TopScore {
    best: u64,
}

impl TopScore {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "rift_runner_top_score";

    pub fn best(&self) -> u64 {
        self.best
    }

    /// Record a session score. Persists and returns true when it beats the
    /// stored best.
    pub fn submit(&mut self, score: u64) -> bool {
        if score <= self.best {
            return false;
        }
        self.best = score;
        self.save();
        true
    }

    /// Load the stored best (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(raw)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(best) = raw.parse::<u64>() {
                    log::info!("Loaded top score: {best}");
                    return Self { best };
                }
            }
        }

        log::info!("No stored top score, starting at 0");
        Self::default()
    }

    #[cfg(target_arch = "wasm32")]
    fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if storage
                .set_item(Self::STORAGE_KEY, &self.best.to_string())
                .is_err()
            {
                log::warn!("Failed to persist top score");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_only_records_improvements() {
        let mut top = TopScore::default();
        assert_eq!(top.best(), 0);

        assert!(top.submit(5));
        assert_eq!(top.best(), 5);

        assert!(!top.submit(3));
        assert!(!top.submit(5));
        assert_eq!(top.best(), 5);

        assert!(top.submit(12));
        assert_eq!(top.best(), 12);
    }

    #[test]
    fn test_zero_score_never_persists() {
        let mut top = TopScore::default();
        assert!(!top.submit(0));
    }
}
