//! Self-rescheduling sequencer driver (wasm)
//!
//! The soundtrack runs on its own setTimeout chain, decoupled from the
//! render tick. Exactly one pending timer exists at a time: the handle is
//! owned here, cancelled-and-cleared on every stop and reassigned on every
//! schedule, so a stale firing can never outlive a stop. A trigger fault
//! silences the output and restarts from the top after a cooldown instead of
//! propagating.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;

use super::output::{AudioFault, PercussionKind, Timbre, ToneSink, ToneSpec, WebAudioSink};
use super::sequencer::{Firing, Sequencer, bass_seconds};

/// Cooldown before the sequencer restarts after a fault
const RESTART_COOLDOWN_MS: i32 = 2000;
/// Melody voice level relative to the master gain
const MELODY_LEVEL: f32 = 0.8;
/// Bass layer levels (sub-octave + fundamental)
const SUB_BASS_LEVEL: f32 = 0.4;
const BASS_LEVEL: f32 = 0.3;

/// An armed one-shot timeout. Owns both the JS timer and its closure;
/// dropping the handle cancels the firing.
struct PendingTimer {
    id: i32,
    _closure: Closure<dyn FnMut()>,
}

impl PendingTimer {
    fn schedule(delay_ms: i32, f: impl FnOnce() + 'static) -> Option<Self> {
        let closure = Closure::once(f);
        let id = web_sys::window()?
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                delay_ms,
            )
            .ok()?;
        Some(Self {
            id,
            _closure: closure,
        })
    }
}

impl Drop for PendingTimer {
    fn drop(&mut self) {
        if let Some(window) = web_sys::window() {
            window.clear_timeout_with_handle(self.id);
        }
    }
}

struct Inner {
    sink: WebAudioSink,
    sequencer: Sequencer,
    pending: Option<PendingTimer>,
}

impl Inner {
    fn trigger(&self, firing: &Firing) -> Result<(), AudioFault> {
        for &freq in firing.notes {
            self.sink.tone(ToneSpec {
                freq,
                secs: firing.tone_secs,
                timbre: Timbre::Sine,
                volume: MELODY_LEVEL,
            })?;
        }
        if let Some(bass) = firing.bass {
            // Layer a sub-octave under the fundamental for weight
            self.sink.tone(ToneSpec {
                freq: bass.freq / 2.0,
                secs: bass_seconds(),
                timbre: Timbre::Sine,
                volume: SUB_BASS_LEVEL,
            })?;
            self.sink.tone(ToneSpec {
                freq: bass.freq,
                secs: bass_seconds(),
                timbre: bass.timbre,
                volume: BASS_LEVEL,
            })?;
        }
        Ok(())
    }
}

/// Owns the soundtrack. Start/stop are the only signals the game loop sends.
pub struct MusicPlayer {
    inner: Rc<RefCell<Inner>>,
}

impl MusicPlayer {
    pub fn new(volume: f32) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                sink: WebAudioSink::new(volume),
                sequencer: Sequencer::new(),
                pending: None,
            })),
        }
    }

    /// (Re)start playback from phrase 0. Safe to call while already playing.
    pub fn start(&self) {
        {
            let mut inner = self.inner.borrow_mut();
            inner.pending = None;
            inner.sink.resume();
            inner.sequencer.start();
        }
        Self::fire(Rc::clone(&self.inner));
    }

    /// Stop playback: cancel the pending timer and cut all active voices
    /// synchronously.
    pub fn stop(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.pending = None;
        inner.sequencer.stop();
        inner.sink.silence();
    }

    pub fn is_playing(&self) -> bool {
        self.inner.borrow().sequencer.is_playing()
    }

    pub fn set_volume(&self, volume: f32) {
        self.inner.borrow().sink.set_volume(volume);
    }

    pub fn set_muted(&self, muted: bool) {
        self.inner.borrow().sink.set_muted(muted);
    }

    /// Route a one-shot gameplay hit through the same output.
    pub fn percussion(&self, kind: PercussionKind) {
        let inner = self.inner.borrow();
        inner.sink.resume();
        if let Err(fault) = inner.sink.percussion(kind) {
            log::warn!("percussion dropped: {fault}");
        }
    }

    /// One scheduled firing: trigger the due voices, then arm the next
    /// timeout from the step's own duration.
    fn fire(rc: Rc<RefCell<Inner>>) {
        let mut inner = rc.borrow_mut();
        let Some(firing) = inner.sequencer.fire() else {
            // Stopped since this timer was armed; the chain ends here
            inner.pending = None;
            return;
        };

        match inner.trigger(&firing) {
            Ok(()) => {
                let delay_ms = (firing.next_delay_secs * 1000.0) as i32;
                let next = Rc::clone(&rc);
                inner.pending = PendingTimer::schedule(delay_ms, move || Self::fire(next));
            }
            Err(fault) => {
                log::warn!("sequencer {fault}; restarting after cooldown");
                inner.sink.silence();
                inner.sequencer.start();
                let next = Rc::clone(&rc);
                inner.pending =
                    PendingTimer::schedule(RESTART_COOLDOWN_MS, move || Self::fire(next));
            }
        }
    }
}
