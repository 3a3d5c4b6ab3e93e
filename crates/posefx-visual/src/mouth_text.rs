//! Mouth-keyed text reveal
//!
//! While the mouth is open the quote is revealed word by word on a clock:
//! `index = (elapsed / per_word) mod word_count`, so a long open mouth
//! replays the quote from the start instead of stopping at the last word.
//! Closing the mouth resets to word 0; the next opening starts a new cycle
//! anchored at that moment.

use std::time::Duration;

use posefx_core::Timestamp;
use tracing::debug;

/// Default time each word stays on screen before the next one appears
pub const DEFAULT_WORD_DISPLAY: Duration = Duration::from_millis(500);

/// Progression phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MouthTextPhase {
    #[default]
    Idle,
    Revealing,
}

/// Text revealed on this tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reveal {
    /// Index of the newest visible word (0-based)
    pub word_index: usize,
    /// Words `0..=word_index` joined by single spaces
    pub text: String,
}

/// Quote progression driven by the mouth-open signal
#[derive(Debug)]
pub struct MouthTextProgression {
    words: Vec<String>,
    word_display: Duration,
    last_mouth_open: bool,
    current_word_index: usize,
    word_display_start: Timestamp,
    phase: MouthTextPhase,
}

impl MouthTextProgression {
    pub fn new(word_display: Duration) -> Self {
        Self {
            words: Vec::new(),
            word_display,
            last_mouth_open: false,
            current_word_index: 0,
            word_display_start: Timestamp::ZERO,
            phase: MouthTextPhase::Idle,
        }
    }

    /// Trigger enabled: tokenize the quote and restart
    pub fn enable(&mut self, quote: &str, now: Timestamp) {
        self.words = quote.split_whitespace().map(str::to_owned).collect();
        self.last_mouth_open = false;
        self.current_word_index = 0;
        self.word_display_start = now;
        self.phase = MouthTextPhase::Idle;
        debug!(words = self.words.len(), "mouth text enabled");
    }

    pub fn set_word_display(&mut self, word_display: Duration) {
        self.word_display = word_display;
    }

    /// Feed this tick's mouth signal
    pub fn update(&mut self, mouth_open: bool, now: Timestamp) -> Option<Reveal> {
        let was_open = self.last_mouth_open;
        self.last_mouth_open = mouth_open;

        if !mouth_open {
            if was_open {
                debug!(index = self.current_word_index, "mouth closed, reveal reset");
            }
            self.current_word_index = 0;
            self.phase = MouthTextPhase::Idle;
            return None;
        }

        if !was_open {
            self.word_display_start = now;
        }
        self.phase = MouthTextPhase::Revealing;

        if self.words.is_empty() {
            return None;
        }

        let per_word = i64::try_from(self.word_display.as_millis())
            .unwrap_or(i64::MAX)
            .max(1);
        let elapsed = now.millis_since(self.word_display_start);
        self.current_word_index = ((elapsed / per_word) as usize) % self.words.len();
        Some(self.reveal())
    }

    fn reveal(&self) -> Reveal {
        Reveal {
            word_index: self.current_word_index,
            text: self.words[..=self.current_word_index].join(" "),
        }
    }

    pub fn phase(&self) -> MouthTextPhase {
        self.phase
    }

    pub fn current_word_index(&self) -> usize {
        self.current_word_index
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Length of one full replay cycle, `Duration::MAX` if it overflows
    pub fn cycle(&self) -> Duration {
        u32::try_from(self.words.len())
            .ok()
            .and_then(|words| self.word_display.checked_mul(words))
            .unwrap_or(Duration::MAX)
    }
}

impl Default for MouthTextProgression {
    fn default() -> Self {
        Self::new(DEFAULT_WORD_DISPLAY)
    }
}
