/// How the tab strip positions the tab it follows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TabAlign {
    /// The tab's leading edge lands at the strip's leading edge.
    #[default]
    Start,
    /// The tab is centered in the strip (falls back to `Start` when the strip width is unknown).
    Center,
}

/// Configuration for [`crate::SyncController`].
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`; missing fields take
/// their default values, so hosts can keep it in their own config files.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SyncOptions {
    /// Assumed width of every tab in the strip. Tabs are never measured.
    pub tab_width: u32,
    pub tab_align: TabAlign,

    /// How many times a scroll to an unmeasured section is attempted (the first try included)
    /// before giving up.
    pub max_attempts: u32,
    /// Delay between two retries.
    pub retry_delay_ms: u64,

    /// How long scroll resolution stays suppressed after a programmatic scroll was issued, if
    /// the UI layer never reports that the scroll ended.
    pub settle_timeout_ms: u64,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            tab_width: 100,
            tab_align: TabAlign::Start,
            max_attempts: 10,
            retry_delay_ms: 100,
            settle_timeout_ms: 600,
        }
    }
}

impl SyncOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tab_width(mut self, tab_width: u32) -> Self {
        self.tab_width = tab_width;
        self
    }

    pub fn with_tab_align(mut self, tab_align: TabAlign) -> Self {
        self.tab_align = tab_align;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_retry_delay_ms(mut self, retry_delay_ms: u64) -> Self {
        self.retry_delay_ms = retry_delay_ms;
        self
    }

    pub fn with_settle_timeout_ms(mut self, settle_timeout_ms: u64) -> Self {
        self.settle_timeout_ms = settle_timeout_ms;
        self
    }
}
