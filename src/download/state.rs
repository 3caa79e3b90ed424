//! Download state tracking.

/// Per-run download statistics.
#[derive(Debug, Default)]
pub struct DownloadState {
    /// The profile name or post target this run downloads into.
    pub target: String,

    pub pic_count: u64,
    pub vid_count: u64,
    pub skipped_count: u64,
    pub failed_count: u64,
}

impl DownloadState {
    pub fn new(target: String) -> Self {
        Self {
            target,
            ..Default::default()
        }
    }

    pub fn increment_pic(&mut self) {
        self.pic_count += 1;
    }

    pub fn increment_vid(&mut self) {
        self.vid_count += 1;
    }

    pub fn increment_skipped(&mut self) {
        self.skipped_count += 1;
    }

    pub fn increment_failed(&mut self) {
        self.failed_count += 1;
    }

    /// Total files written this run.
    pub fn total_downloaded(&self) -> u64 {
        self.pic_count + self.vid_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let mut state = DownloadState::new("someuser".to_string());
        state.increment_pic();
        state.increment_pic();
        state.increment_vid();
        state.increment_skipped();

        assert_eq!(state.total_downloaded(), 3);
        assert_eq!(state.skipped_count, 1);
    }
}
