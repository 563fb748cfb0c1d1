use pianotes_audio::ToneSink;
use tracing::debug;

use crate::clock::Clock;
use crate::recorder::MelodyRecorder;

/// Sleeps until each playback deadline and polls the recorder until the
/// current playback completes. Returns the number of notes sounded.
///
/// The recorder's clock should follow tokio time ([`crate::TokioClock`]) so
/// deadlines line up with the timer.
pub async fn drive_playback<C: Clock, S: ToneSink>(recorder: &mut MelodyRecorder<C, S>) -> usize {
    let mut fired = 0;
    while let Some(wait) = recorder.time_until_next() {
        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }
        fired += recorder.poll();
    }
    debug!(fired, "playback driver done");
    fired
}
