use std::{fs::File, io::BufReader, io::Cursor, io::Read, sync::Arc};

use rodio::Source;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use tracing::{debug, warn};

use crate::core::doors::{DoorEvent, DoorState};

const DOOR_SOUNDS: &[&str] = &[
    "assets/sounds/door.wav",
    "assets/sounds/door_slide.wav",
    "assets/sounds/door.ogg",
];

fn load_bytes(path: &str) -> Option<Vec<u8>> {
    let mut f = File::open(path).ok()?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf).ok()?;
    Some(buf)
}

fn load_bytes_any(paths: &[&str]) -> Option<Vec<u8>> {
    paths.iter().find_map(|p| load_bytes(p))
}

/// Whether a door transition should make a sound: only when it starts moving.
pub fn is_audible(event: &DoorEvent) -> bool {
    matches!(event.to, DoorState::Opening | DoorState::Closing)
}

/// Door sound effects. Construction fails quietly without an output device,
/// and a missing sound file just means silence.
pub struct AudioManager {
    _stream: OutputStream,
    handle: OutputStreamHandle,
    door: Option<Arc<Vec<u8>>>,
    volume: f32,
}

impl AudioManager {
    pub fn new() -> Option<Self> {
        let (_stream, handle) = match OutputStream::try_default() {
            Ok(pair) => pair,
            Err(e) => {
                warn!(error = %e, "no audio output, running silent");
                return None;
            }
        };
        let door = load_bytes_any(DOOR_SOUNDS).map(Arc::new);
        if door.is_none() {
            debug!("no door sound found");
        }
        Some(Self { _stream, handle, door, volume: 0.6 })
    }

    pub fn play_door(&self) {
        // own sink per play so overlapping doors all sound
        let Some(d) = self.door.clone() else { return };
        if let Ok(dec) = Decoder::new(BufReader::new(Cursor::new(d.as_ref().clone()))) {
            if let Ok(sink) = Sink::try_new(&self.handle) {
                sink.append(dec.amplify(self.volume.clamp(0.0, 2.0)));
                sink.detach();
            }
        }
    }

    pub fn on_door_events(&self, events: &[DoorEvent]) {
        for ev in events.iter().filter(|e| is_audible(e)) {
            debug!(door = ev.index, "door sound");
            self.play_door();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ev(from: DoorState, to: DoorState) -> DoorEvent {
        DoorEvent { index: 0, cell: (1, 1), from, to }
    }

    #[test]
    fn only_motion_starts_are_audible() {
        assert!(is_audible(&ev(DoorState::Closed, DoorState::Opening)));
        assert!(is_audible(&ev(DoorState::Open, DoorState::Closing)));
        assert!(is_audible(&ev(DoorState::Opening, DoorState::Closing)));
        assert!(!is_audible(&ev(DoorState::Opening, DoorState::Open)));
        assert!(!is_audible(&ev(DoorState::Closing, DoorState::Closed)));
    }

    #[test]
    fn missing_files_load_nothing() {
        assert!(load_bytes_any(&["does/not/exist.wav"]).is_none());
    }
}
