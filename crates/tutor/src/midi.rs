use anyhow::{anyhow, Result};
use midir::{MidiInput, MidiInputConnection};
use pianotes_domain::Pitch;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{debug, info};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MidiDevice {
    pub name: String,
}

pub struct MidiManager;

impl MidiManager {
    pub fn list_inputs() -> Result<Vec<MidiDevice>> {
        let input = MidiInput::new("pianotes")?;
        Ok(input
            .ports()
            .iter()
            .map(|port| MidiDevice {
                name: input.port_name(port).unwrap_or_else(|_| "Unknown".into()),
            })
            .collect())
    }

    /// Connects to the named input and forwards every note-on as a [`Pitch`].
    /// The connection must be kept alive for as long as keys should arrive.
    pub fn open_keys(name: &str) -> Result<(MidiInputConnection<()>, UnboundedReceiver<Pitch>)> {
        let input = MidiInput::new("pianotes-keys")?;
        let ports = input.ports();
        let port = ports
            .iter()
            .find(|port| input.port_name(port).map(|n| n == name).unwrap_or(false))
            .cloned()
            .ok_or_else(|| anyhow!("midi port not found: {name}"))?;
        let (tx, rx) = mpsc::unbounded_channel();
        let conn = input
            .connect(
                &port,
                "pianotes-keys",
                move |_stamp, msg, _| {
                    if let Some(pitch) = note_on_pitch(msg) {
                        debug!(%pitch, "midi key");
                        let _ = tx.send(pitch);
                    }
                },
                (),
            )
            .map_err(|e| anyhow!("midi connect error: {e:?}"))?;
        info!(port = name, "listening for midi keys");
        Ok((conn, rx))
    }
}

/// Folds a MIDI note number onto the chromatic octave.
pub fn pitch_from_midi_note(note: u8) -> Pitch {
    Pitch::ALL[(note % 12) as usize]
}

fn note_on_pitch(msg: &[u8]) -> Option<Pitch> {
    match msg {
        [status, note, velocity, ..] if status & 0xF0 == 0x90 && *velocity > 0 => {
            Some(pitch_from_midi_note(*note))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_inputs_does_not_panic() {
        // MIDI input availability varies by environment; just ensure no panic.
        let _ = MidiManager::list_inputs();
    }

    #[test]
    fn note_numbers_fold_to_octave() {
        assert_eq!(pitch_from_midi_note(60), Pitch::C);
        assert_eq!(pitch_from_midi_note(69), Pitch::A);
        assert_eq!(pitch_from_midi_note(73), Pitch::CSharp);
    }

    #[test]
    fn only_sounding_note_ons_map() {
        assert_eq!(note_on_pitch(&[0x90, 64, 100]), Some(Pitch::E));
        assert_eq!(note_on_pitch(&[0x93, 67, 20]), Some(Pitch::G));
        assert_eq!(note_on_pitch(&[0x90, 64, 0]), None);
        assert_eq!(note_on_pitch(&[0x80, 64, 64]), None);
        assert_eq!(note_on_pitch(&[0xF8]), None);
    }
}
