//! Audio output capability
//!
//! The sequencer and the shell speak to an abstract tone/percussion sink;
//! only the wasm implementation below knows the device is Web Audio. Every
//! voice is an oscillator+gain pair with its own fixed-shape envelope that
//! self-terminates - nothing holds a reference back into sequencer state.

use std::fmt;

/// Linear attack ramp at the head of every voice
pub const ATTACK_SECS: f64 = 0.05;
/// Linear release ramp at the tail
pub const RELEASE_SECS: f64 = 0.1;

/// Oscillator waveform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timbre {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// One fire-and-forget voice
#[derive(Debug, Clone, Copy)]
pub struct ToneSpec {
    pub freq: f32,
    pub secs: f32,
    pub timbre: Timbre,
    /// Level relative to the sink's master gain, 0.0 - 1.0
    pub volume: f32,
}

/// One-shot percussive hits, used for gameplay feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PercussionKind {
    Kick,
    Snare,
    Hat,
}

/// A failed trigger. The sequencer driver treats this as its one recoverable
/// fault and restarts after a cooldown.
#[derive(Debug)]
pub struct AudioFault(pub String);

impl fmt::Display for AudioFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "audio fault: {}", self.0)
    }
}

impl std::error::Error for AudioFault {}

/// Abstract audio-output capability
pub trait ToneSink {
    fn tone(&self, spec: ToneSpec) -> Result<(), AudioFault>;
    fn percussion(&self, kind: PercussionKind) -> Result<(), AudioFault>;
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudioSink;

#[cfg(target_arch = "wasm32")]
mod web {
    use super::*;
    use std::cell::{Cell, RefCell};
    use wasm_bindgen::JsValue;
    use web_sys::{AudioContext, AudioContextState, GainNode, OscillatorNode, OscillatorType};

    fn js_fault(e: JsValue) -> AudioFault {
        AudioFault(format!("{e:?}"))
    }

    impl From<Timbre> for OscillatorType {
        fn from(t: Timbre) -> Self {
            match t {
                Timbre::Sine => OscillatorType::Sine,
                Timbre::Square => OscillatorType::Square,
                Timbre::Sawtooth => OscillatorType::Sawtooth,
                Timbre::Triangle => OscillatorType::Triangle,
            }
        }
    }

    /// Web Audio sink. All voices route through one master gain node so a
    /// `silence` call can cut everything at once.
    pub struct WebAudioSink {
        ctx: Option<AudioContext>,
        master: RefCell<Option<GainNode>>,
        volume: Cell<f32>,
        muted: Cell<bool>,
    }

    impl WebAudioSink {
        pub fn new(volume: f32) -> Self {
            // May fail outside a secure context; audio is then disabled
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                master: RefCell::new(None),
                volume: Cell::new(volume.clamp(0.0, 1.0)),
                muted: Cell::new(false),
            }
        }

        /// Resume the context (browsers suspend it until a user gesture).
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                if ctx.state() == AudioContextState::Suspended {
                    let _ = ctx.resume();
                }
            }
        }

        pub fn set_volume(&self, volume: f32) {
            self.volume.set(volume.clamp(0.0, 1.0));
            if let Some(master) = self.master.borrow().as_ref() {
                master.gain().set_value(self.effective_volume());
            }
        }

        pub fn set_muted(&self, muted: bool) {
            self.muted.set(muted);
            if let Some(master) = self.master.borrow().as_ref() {
                master.gain().set_value(self.effective_volume());
            }
        }

        fn effective_volume(&self) -> f32 {
            if self.muted.get() { 0.0 } else { self.volume.get() }
        }

        /// Tear down the master gain node, cutting every active voice.
        /// The next trigger rebuilds it.
        pub fn silence(&self) {
            if let Some(master) = self.master.borrow_mut().take() {
                master.disconnect().ok();
            }
        }

        /// Shared master gain, created on first use.
        fn master(&self) -> Result<GainNode, AudioFault> {
            if let Some(master) = self.master.borrow().as_ref() {
                return Ok(master.clone());
            }
            let ctx = self
                .ctx
                .as_ref()
                .ok_or_else(|| AudioFault("no audio context".into()))?;
            let master = ctx.create_gain().map_err(js_fault)?;
            master.gain().set_value(self.effective_volume());
            master
                .connect_with_audio_node(&ctx.destination())
                .map_err(js_fault)?;
            *self.master.borrow_mut() = Some(master.clone());
            Ok(master)
        }
    }

    impl ToneSink for WebAudioSink {
        fn tone(&self, spec: ToneSpec) -> Result<(), AudioFault> {
            // No context means audio is unavailable, not faulty
            let Some(ctx) = &self.ctx else {
                return Ok(());
            };
            let master = self.master()?;

            let osc = ctx.create_oscillator().map_err(js_fault)?;
            let gain = ctx.create_gain().map_err(js_fault)?;
            osc.set_type(spec.timbre.into());
            osc.frequency().set_value(spec.freq);
            // Subtle detune for warmth
            osc.detune()
                .set_value((js_sys::Math::random() * 10.0 - 5.0) as f32);
            osc.connect_with_audio_node(&gain).map_err(js_fault)?;
            gain.connect_with_audio_node(&master).map_err(js_fault)?;

            let now = ctx.current_time();
            let secs = spec.secs as f64;
            let sustain_until = now + (secs - RELEASE_SECS).max(ATTACK_SECS);
            let env = gain.gain();
            env.set_value_at_time(0.0, now).map_err(js_fault)?;
            env.linear_ramp_to_value_at_time(spec.volume, now + ATTACK_SECS)
                .map_err(js_fault)?;
            env.set_value_at_time(spec.volume, sustain_until)
                .map_err(js_fault)?;
            env.linear_ramp_to_value_at_time(0.0, now + secs)
                .map_err(js_fault)?;

            osc.start().map_err(js_fault)?;
            osc.stop_with_when(now + secs).map_err(js_fault)?;
            Ok(())
        }

        fn percussion(&self, kind: PercussionKind) -> Result<(), AudioFault> {
            let Some(ctx) = &self.ctx else {
                return Ok(());
            };
            let master = self.master()?;
            let now = ctx.current_time();

            let hit = |freq: f32,
                       timbre: Timbre,
                       volume: f32,
                       secs: f64|
             -> Result<OscillatorNode, AudioFault> {
                let osc = ctx.create_oscillator().map_err(js_fault)?;
                let gain = ctx.create_gain().map_err(js_fault)?;
                osc.set_type(timbre.into());
                osc.frequency().set_value(freq);
                osc.connect_with_audio_node(&gain).map_err(js_fault)?;
                gain.connect_with_audio_node(&master).map_err(js_fault)?;
                gain.gain().set_value_at_time(volume, now).map_err(js_fault)?;
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, now + secs)
                    .map_err(js_fault)?;
                osc.start().map_err(js_fault)?;
                osc.stop_with_when(now + secs + 0.05).map_err(js_fault)?;
                Ok(osc)
            };

            match kind {
                PercussionKind::Kick => {
                    let osc = hit(120.0, Timbre::Sine, 0.5, 0.15)?;
                    osc.frequency().set_value_at_time(120.0, now).map_err(js_fault)?;
                    osc.frequency()
                        .exponential_ramp_to_value_at_time(50.0, now + 0.12)
                        .map_err(js_fault)?;
                }
                PercussionKind::Snare => {
                    hit(180.0, Timbre::Square, 0.3, 0.12)?;
                    hit(2400.0, Timbre::Sawtooth, 0.12, 0.08)?;
                }
                PercussionKind::Hat => {
                    hit(6000.0, Timbre::Square, 0.15, 0.05)?;
                }
            }
            Ok(())
        }
    }
}
