//! Timing knobs of an extraction run.
//!
//! Defaults match what the host page needs in practice: a short settle
//! before the first read, a generous hydration window, and one shorter
//! retry window when the first pass looks incomplete.

use std::time::Duration;

const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(800);
const DEFAULT_STABILITY_TIMEOUT: Duration = Duration::from_millis(5000);
const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(600);
const DEFAULT_RETRY_STABILITY_TIMEOUT: Duration = Duration::from_millis(3000);
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(200);
const DEFAULT_FOCUS_DELAY: Duration = Duration::from_millis(50);
const DEFAULT_EXEC_SELECT_DELAY: Duration = Duration::from_millis(100);
const DEFAULT_CHORD_DELAY: Duration = Duration::from_millis(150);
const DEFAULT_MAX_RESTARTS: u32 = 5;
const DEFAULT_MIN_CODE_LEN: usize = 10;

/// Delays used while emulating select-all on the editor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectAllDelays {
    /// Wait after focusing the editor input.
    pub after_focus: Duration,
    /// Wait after the native select-all command.
    pub after_exec: Duration,
    /// Wait after the synthetic key chord.
    pub after_chord: Duration,
}

impl Default for SelectAllDelays {
    fn default() -> Self {
        Self {
            after_focus: DEFAULT_FOCUS_DELAY,
            after_exec: DEFAULT_EXEC_SELECT_DELAY,
            after_chord: DEFAULT_CHORD_DELAY,
        }
    }
}

/// Configuration for one [`Extractor`](crate::Extractor).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractorConfig {
    /// Fixed pause before the first stability check.
    pub settle_delay: Duration,
    /// How long the first pass waits for hydration.
    pub stability_timeout: Duration,
    /// Pause before re-checking an incomplete record.
    pub retry_delay: Duration,
    /// How long the retry pass waits for hydration.
    pub retry_stability_timeout: Duration,
    /// Polling interval of readiness waits.
    pub poll_interval: Duration,
    pub select_all: SelectAllDelays,
    /// Restarts allowed after navigation before the run gives up.
    pub max_restarts: u32,
    /// Recovered code must be strictly longer than this to count.
    pub min_code_len: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            settle_delay: DEFAULT_SETTLE_DELAY,
            stability_timeout: DEFAULT_STABILITY_TIMEOUT,
            retry_delay: DEFAULT_RETRY_DELAY,
            retry_stability_timeout: DEFAULT_RETRY_STABILITY_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            select_all: SelectAllDelays::default(),
            max_restarts: DEFAULT_MAX_RESTARTS,
            min_code_len: DEFAULT_MIN_CODE_LEN,
        }
    }
}

impl ExtractorConfig {
    /// Create a new builder.
    #[must_use]
    pub fn builder() -> ExtractorConfigBuilder {
        ExtractorConfigBuilder::default()
    }

    /// Whether `code` is long enough to be trusted as a recovered source.
    #[must_use]
    pub fn usable_code(&self, code: &str) -> bool {
        code.chars().count() > self.min_code_len
    }
}

/* ----------------------- Builder ----------------------- */

#[derive(Default, Debug)]
pub struct ExtractorConfigBuilder {
    settle_delay: Option<Duration>,
    stability_timeout: Option<Duration>,
    retry_delay: Option<Duration>,
    retry_stability_timeout: Option<Duration>,
    poll_interval: Option<Duration>,
    select_all: Option<SelectAllDelays>,
    max_restarts: Option<u32>,
    min_code_len: Option<usize>,
}

impl ExtractorConfigBuilder {
    /// Pause before the first stability check. Default: 800ms.
    #[must_use]
    pub fn settle_delay(mut self, dur: Duration) -> Self {
        self.settle_delay = Some(dur);
        self
    }

    /// First-pass hydration window. Default: 5s.
    #[must_use]
    pub fn stability_timeout(mut self, dur: Duration) -> Self {
        self.stability_timeout = Some(dur);
        self
    }

    /// Pause before the retry pass. Default: 600ms.
    #[must_use]
    pub fn retry_delay(mut self, dur: Duration) -> Self {
        self.retry_delay = Some(dur);
        self
    }

    /// Retry-pass hydration window. Default: 3s.
    #[must_use]
    pub fn retry_stability_timeout(mut self, dur: Duration) -> Self {
        self.retry_stability_timeout = Some(dur);
        self
    }

    /// Readiness polling interval. Default: 200ms.
    #[must_use]
    pub fn poll_interval(mut self, dur: Duration) -> Self {
        self.poll_interval = Some(dur);
        self
    }

    #[must_use]
    pub fn select_all_delays(mut self, delays: SelectAllDelays) -> Self {
        self.select_all = Some(delays);
        self
    }

    /// Restarts allowed on navigation. Default: 5.
    #[must_use]
    pub fn max_restarts(mut self, n: u32) -> Self {
        self.max_restarts = Some(n);
        self
    }

    #[must_use]
    pub fn min_code_len(mut self, n: usize) -> Self {
        self.min_code_len = Some(n);
        self
    }

    /// Zero every delay. Useful when driving a page that is already settled.
    #[must_use]
    pub fn no_delays(self) -> Self {
        self.settle_delay(Duration::ZERO)
            .retry_delay(Duration::ZERO)
            .stability_timeout(Duration::ZERO)
            .retry_stability_timeout(Duration::ZERO)
            .select_all_delays(SelectAllDelays {
                after_focus: Duration::ZERO,
                after_exec: Duration::ZERO,
                after_chord: Duration::ZERO,
            })
    }

    #[must_use]
    pub fn build(self) -> ExtractorConfig {
        let d = ExtractorConfig::default();
        ExtractorConfig {
            settle_delay: self.settle_delay.unwrap_or(d.settle_delay),
            stability_timeout: self.stability_timeout.unwrap_or(d.stability_timeout),
            retry_delay: self.retry_delay.unwrap_or(d.retry_delay),
            retry_stability_timeout: self
                .retry_stability_timeout
                .unwrap_or(d.retry_stability_timeout),
            poll_interval: self.poll_interval.unwrap_or(d.poll_interval),
            select_all: self.select_all.unwrap_or(d.select_all),
            max_restarts: self.max_restarts.unwrap_or(d.max_restarts),
            min_code_len: self.min_code_len.unwrap_or(d.min_code_len),
        }
    }
}
