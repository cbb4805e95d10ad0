use crate::signals::Signal;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Started,
    Stopped,
    Expired,
    Confirm,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency: f32,
    pub duration: Duration,
}

const fn tone(frequency: f32, millis: u64) -> Tone {
    Tone {
        frequency,
        duration: Duration::from_millis(millis),
    }
}

impl Cue {
    pub fn tones(self) -> &'static [Tone] {
        const STARTED: &[Tone] = &[tone(660.0, 90), tone(880.0, 120)];
        const STOPPED: &[Tone] = &[tone(880.0, 90), tone(660.0, 120)];
        const EXPIRED: &[Tone] = &[
            tone(988.0, 180),
            tone(0.0, 80),
            tone(988.0, 180),
            tone(0.0, 80),
            tone(988.0, 300),
        ];
        const CONFIRM: &[Tone] = &[tone(1320.0, 70)];

        match self {
            Cue::Started => STARTED,
            Cue::Stopped => STOPPED,
            Cue::Expired => EXPIRED,
            Cue::Confirm => CONFIRM,
        }
    }
}

pub fn cue_for(signal: Signal) -> Option<Cue> {
    match signal {
        Signal::TimerStarted => Some(Cue::Started),
        Signal::TimerStopped => Some(Cue::Stopped),
        Signal::TimerExpired => Some(Cue::Expired),
        Signal::DurationChanged(_) | Signal::HotkeyRebound(_) => Some(Cue::Confirm),
        Signal::Activated | Signal::HotkeyListeningStateChanged(_) => None,
    }
}

/// Must not block the caller.
pub trait CuePlayer {
    fn play(&self, cue: Cue);
}

#[cfg(target_os = "windows")]
pub use tone_player::ToneCuePlayer;

#[cfg(target_os = "windows")]
mod tone_player {
    use super::{Cue, CuePlayer};
    use rodio::source::{SineWave, Source, Zero};
    use rodio::{OutputStream, Sink};

    const VOLUME: f32 = 0.2;

    /// Synthesises cue tones with rodio. Each cue gets its own output stream
    /// on a short-lived thread.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct ToneCuePlayer;

    impl CuePlayer for ToneCuePlayer {
        fn play(&self, cue: Cue) {
            let spawned = std::thread::Builder::new()
                .name("cue-player".into())
                .spawn(move || {
                    let Ok((_stream, handle)) = OutputStream::try_default() else {
                        tracing::warn!("no audio output device");
                        return;
                    };
                    let sink = match Sink::try_new(&handle) {
                        Ok(sink) => sink,
                        Err(err) => {
                            tracing::warn!(?err, "failed to open audio sink");
                            return;
                        }
                    };
                    for tone in cue.tones() {
                        if tone.frequency > 0.0 {
                            sink.append(
                                SineWave::new(tone.frequency)
                                    .take_duration(tone.duration)
                                    .amplify(VOLUME),
                            );
                        } else {
                            sink.append(Zero::<f32>::new(1, 48_000).take_duration(tone.duration));
                        }
                    }
                    sink.sleep_until_end();
                });
            if let Err(err) = spawned {
                tracing::warn!(?err, "failed to spawn cue thread");
            }
        }
    }
}
