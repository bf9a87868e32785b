//! Self-clocked audio
//!
//! The music sequencer is a timed state machine independent of the
//! render/physics tick: a pure cursor core (`sequencer`), an abstract output
//! capability (`output`), and a wasm driver (`player`) that reschedules
//! itself on a cancellable timeout chain.

pub mod output;
#[cfg(target_arch = "wasm32")]
pub mod player;
pub mod sequencer;

pub use output::{AudioFault, PercussionKind, Timbre, ToneSink, ToneSpec};
#[cfg(target_arch = "wasm32")]
pub use output::WebAudioSink;
#[cfg(target_arch = "wasm32")]
pub use player::MusicPlayer;
pub use sequencer::{BASS_LINE, BPM, BassVoice, Firing, MELODY, Sequencer, Step};
