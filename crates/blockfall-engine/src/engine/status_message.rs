use std::time::Duration;

use crate::Color;

const SHORT: Duration = Duration::from_secs(1);
const LONG: Duration = Duration::from_secs(10);

/// Transient feedback for the host to display ("Tetris!", "Game Over!", ...).
///
/// A message is issued at the controller's current time and stays visible for
/// `duration`; `None` means it never expires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    text: &'static str,
    color: Color,
    issued_at: Duration,
    duration: Option<Duration>,
}

impl StatusMessage {
    #[must_use]
    pub const fn new(
        text: &'static str,
        color: Color,
        issued_at: Duration,
        duration: Option<Duration>,
    ) -> Self {
        Self {
            text,
            color,
            issued_at,
            duration,
        }
    }

    pub(crate) const fn t_spin(now: Duration) -> Self {
        Self::new("T-Spin!", Color::CYAN, now, Some(LONG))
    }

    pub(crate) const fn tetris(now: Duration) -> Self {
        Self::new("Tetris!", Color::CYAN, now, Some(LONG))
    }

    pub(crate) const fn game_over(now: Duration) -> Self {
        Self::new("Game Over!", Color::RED, now, None)
    }

    pub(crate) const fn reset(now: Duration) -> Self {
        Self::new("Game Reset", Color::WHITE, now, Some(SHORT))
    }

    pub(crate) const fn cell_edited(now: Duration) -> Self {
        Self::new("Cheater! >_<", Color::PINK, now, Some(LONG))
    }

    #[must_use]
    pub const fn text(&self) -> &'static str {
        self.text
    }

    #[must_use]
    pub const fn color(&self) -> Color {
        self.color
    }

    #[must_use]
    pub const fn issued_at(&self) -> Duration {
        self.issued_at
    }

    #[must_use]
    pub const fn duration(&self) -> Option<Duration> {
        self.duration
    }

    /// Returns `true` once more than `duration` has passed since the message
    /// was issued.
    #[must_use]
    pub fn is_expired(&self, now: Duration) -> bool {
        self.duration
            .is_some_and(|duration| now.saturating_sub(self.issued_at) > duration)
    }
}
