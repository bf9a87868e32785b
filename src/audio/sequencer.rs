//! Phrase/step sequencer core
//!
//! A pure cursor machine over preauthored song data. The wasm driver in
//! `audio::player` asks it what to play and when; nothing here touches a
//! timer or an audio device, so the wrap/reset behavior is fully testable.

use super::output::Timbre;

/// Tempo of the soundtrack
pub const BPM: f32 = 120.0;

/// One melodic step: pitches to trigger together, held for a fraction of a
/// beat.
#[derive(Debug, Clone, Copy)]
pub struct Step {
    pub notes: &'static [f32],
    pub beats: f32,
}

pub type Phrase = &'static [Step];

const fn step(notes: &'static [f32], beats: f32) -> Step {
    Step { notes, beats }
}

/// Four-phrase dance loop
pub const MELODY: &[Phrase] = &[
    // Funky intro
    &[
        step(&[293.66], 0.25), // D4
        step(&[349.23], 0.25), // F4
        step(&[392.00], 0.25), // G4
        step(&[440.00], 0.25), // A4
        step(&[493.88], 0.5),  // B4, accent
        step(&[440.00], 0.25), // A4
        step(&[392.00], 0.25), // G4
        step(&[349.23], 0.5),  // F4, accent
    ],
    // Build
    &[
        step(&[392.00], 0.125), // G4
        step(&[440.00], 0.125), // A4
        step(&[493.88], 0.25),  // B4
        step(&[523.25], 0.5),   // C5, hold
        step(&[493.88], 0.25),  // B4
        step(&[440.00], 0.25),  // A4
        step(&[392.00], 0.5),   // G4, accent
    ],
    // Peak
    &[
        step(&[523.25], 0.125), // C5
        step(&[587.33], 0.125), // D5
        step(&[659.25], 0.25),  // E5
        step(&[587.33], 0.5),   // D5, hold
        step(&[523.25], 0.25),  // C5
        step(&[493.88], 0.25),  // B4
        step(&[440.00], 0.5),   // A4, accent
    ],
    // Bridge
    &[
        step(&[392.00], 0.25), // G4
        step(&[440.00], 0.25), // A4
        step(&[493.88], 0.25), // B4
        step(&[523.25], 0.25), // C5
        step(&[587.33], 0.5),  // D5, hold
        step(&[523.25], 0.25), // C5
        step(&[493.88], 0.25), // B4
    ],
];

/// One bass voice per phrase
#[derive(Debug, Clone, Copy)]
pub struct BassVoice {
    pub freq: f32,
    pub timbre: Timbre,
}

pub const BASS_LINE: &[BassVoice] = &[
    BassVoice {
        freq: 196.00, // G3
        timbre: Timbre::Sine,
    },
    BassVoice {
        freq: 220.00, // A3
        timbre: Timbre::Sine,
    },
    BassVoice {
        freq: 246.94, // B3
        timbre: Timbre::Sine,
    },
    BassVoice {
        freq: 261.63, // C4
        timbre: Timbre::Sine,
    },
];

/// Seconds a step occupies at the song tempo
pub fn step_seconds(step: &Step) -> f32 {
    60.0 / BPM * step.beats
}

/// Bass notes span eight beats, sustained for half of that
pub fn bass_seconds() -> f32 {
    60.0 / BPM * 8.0 * 0.5
}

/// What one scheduled firing should play, and when the next one is due.
#[derive(Debug, Clone, Copy)]
pub struct Firing {
    pub notes: &'static [f32],
    pub tone_secs: f32,
    /// Present on even steps, keyed to the phrase the step belongs to
    pub bass: Option<&'static BassVoice>,
    /// Delay until the next firing: the duration of *this* step
    pub next_delay_secs: f32,
}

/// Cursor state machine over a phrase table.
///
/// Invariant: `step_index` is always a valid index into the current phrase.
#[derive(Debug, Clone)]
pub struct Sequencer {
    phrases: &'static [Phrase],
    phrase_index: usize,
    step_index: usize,
    playing: bool,
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl Sequencer {
    pub fn new() -> Self {
        Self::with_phrases(MELODY)
    }

    pub fn with_phrases(phrases: &'static [Phrase]) -> Self {
        assert!(!phrases.is_empty() && phrases.iter().all(|p| !p.is_empty()));
        Self {
            phrases,
            phrase_index: 0,
            step_index: 0,
            playing: false,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn cursor(&self) -> (usize, usize) {
        (self.phrase_index, self.step_index)
    }

    /// Begin playback from the top.
    pub fn start(&mut self) {
        self.phrase_index = 0;
        self.step_index = 0;
        self.playing = true;
    }

    /// Halt playback and rewind. A timer that still fires afterwards gets
    /// `None` from `fire` and the chain dies out.
    pub fn stop(&mut self) {
        self.playing = false;
        self.phrase_index = 0;
        self.step_index = 0;
    }

    /// Plan the current firing and advance the cursor. `None` when stopped.
    pub fn fire(&mut self) -> Option<Firing> {
        if !self.playing {
            return None;
        }
        let phrase = self.phrases[self.phrase_index];
        let current = &phrase[self.step_index];
        let secs = step_seconds(current);
        let bass = (self.step_index % 2 == 0)
            .then(|| &BASS_LINE[self.phrase_index % BASS_LINE.len()]);

        self.step_index += 1;
        if self.step_index >= phrase.len() {
            self.step_index = 0;
            self.phrase_index = (self.phrase_index + 1) % self.phrases.len();
        }

        Some(Firing {
            notes: current.notes,
            tone_secs: secs,
            bass,
            next_delay_secs: secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two phrases of lengths 4 and 3
    static SHORT_TABLE: &[Phrase] = &[
        &[
            step(&[100.0], 0.25),
            step(&[200.0], 0.25),
            step(&[300.0], 0.25),
            step(&[400.0], 0.5),
        ],
        &[
            step(&[500.0], 0.25),
            step(&[600.0], 0.25),
            step(&[700.0], 0.5),
        ],
    ];

    #[test]
    fn test_wraps_phrase_then_table() {
        let mut seq = Sequencer::with_phrases(SHORT_TABLE);
        seq.start();
        assert_eq!(seq.cursor(), (0, 0));

        for _ in 0..4 {
            seq.fire().unwrap();
        }
        assert_eq!(seq.cursor(), (1, 0));

        for _ in 0..3 {
            seq.fire().unwrap();
        }
        assert_eq!(seq.cursor(), (0, 0));
    }

    #[test]
    fn test_cursor_always_in_bounds() {
        let mut seq = Sequencer::new();
        seq.start();
        for _ in 0..100 {
            let (phrase, step) = seq.cursor();
            assert!(phrase < MELODY.len());
            assert!(step < MELODY[phrase].len());
            seq.fire().unwrap();
        }
    }

    #[test]
    fn test_stop_then_start_rewinds() {
        let mut seq = Sequencer::with_phrases(SHORT_TABLE);
        seq.start();
        for _ in 0..5 {
            seq.fire().unwrap();
        }
        assert_ne!(seq.cursor(), (0, 0));

        seq.stop();
        assert!(!seq.is_playing());
        assert!(seq.fire().is_none());

        seq.start();
        assert_eq!(seq.cursor(), (0, 0));
        let first = seq.fire().unwrap();
        assert_eq!(first.notes, &[100.0]);
    }

    #[test]
    fn test_bass_on_even_steps_keyed_by_phrase() {
        let mut seq = Sequencer::with_phrases(SHORT_TABLE);
        seq.start();

        // Phrase 0: steps 0 and 2 carry bass voice 0
        let firings: Vec<_> = (0..4).map(|_| seq.fire().unwrap()).collect();
        assert!(firings[0].bass.is_some());
        assert!(firings[1].bass.is_none());
        assert!(firings[2].bass.is_some());
        assert_eq!(firings[0].bass.unwrap().freq, BASS_LINE[0].freq);

        // Phrase 1 keys the next bass voice
        let f = seq.fire().unwrap();
        assert_eq!(f.bass.unwrap().freq, BASS_LINE[1].freq);
    }

    #[test]
    fn test_delay_matches_current_step_duration() {
        let mut seq = Sequencer::with_phrases(SHORT_TABLE);
        seq.start();
        let firing = seq.fire().unwrap();
        // 0.25 beats at 120 BPM
        assert!((firing.next_delay_secs - 0.125).abs() < 1e-6);
        assert_eq!(firing.next_delay_secs, firing.tone_secs);
    }
}
