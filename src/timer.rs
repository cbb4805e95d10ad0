use std::time::Duration;

const ONE_SECOND: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Idle { remaining: Duration },
    Running { remaining: Duration },
    Expired,
}

impl TimerState {
    pub fn remaining(&self) -> Duration {
        match self {
            Self::Idle { remaining } | Self::Running { remaining } => *remaining,
            Self::Expired => Duration::ZERO,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Started,
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Tick arrived while not running (e.g. a stale `WM_TIMER`).
    Ignored,
    Counted { remaining: Duration },
    Expired,
}

/// Countdown with toggle (start / stop-and-reset) semantics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    default_duration: Duration,
    state: TimerState,
}

impl Countdown {
    pub fn new(default_duration: Duration) -> Self {
        let default_duration = whole_seconds(default_duration);
        Self {
            default_duration,
            state: TimerState::Idle {
                remaining: default_duration,
            },
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn default_duration(&self) -> Duration {
        self.default_duration
    }

    pub fn remaining(&self) -> Duration {
        self.state.remaining()
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn toggle(&mut self) -> ToggleOutcome {
        let remaining = self.default_duration;
        if self.state.is_running() {
            self.state = TimerState::Idle { remaining };
            ToggleOutcome::Stopped
        } else {
            self.state = TimerState::Running { remaining };
            ToggleOutcome::Started
        }
    }

    pub fn tick(&mut self) -> TickOutcome {
        let TimerState::Running { remaining } = self.state else {
            return TickOutcome::Ignored;
        };

        if remaining.is_zero() {
            self.state = TimerState::Expired;
            return TickOutcome::Expired;
        }

        let remaining = remaining.saturating_sub(ONE_SECOND);
        self.state = TimerState::Running { remaining };
        TickOutcome::Counted { remaining }
    }

    /// Replace the default and go back to idle, cancelling any run.
    pub fn set_default_duration(&mut self, duration: Duration) {
        self.default_duration = whole_seconds(duration);
        self.state = TimerState::Idle {
            remaining: self.default_duration,
        };
    }
}

fn whole_seconds(duration: Duration) -> Duration {
    Duration::from_secs(duration.as_secs())
}

/// Render as `MM:SS`; minutes keep growing past 99.
pub fn format_remaining(remaining: Duration) -> String {
    let total = remaining.as_secs();
    format!("{:02}:{:02}", total / 60, total % 60)
}
