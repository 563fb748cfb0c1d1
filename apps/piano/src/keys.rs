use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use pianotes_audio::ToneSink;
use pianotes_domain::io::{import_json, JsonExporter, TextExporter};
use pianotes_domain::{ExportFormat, Melody, MelodyExporter, Pitch};
use pianotes_tutor::{drive_playback, Clock, MelodyRecorder, MidiManager};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info};

const HELP: &str = "\
Type note names (C D# sol la#) to press keys. Commands:
  rec          start recording (replaces the melody)
  stop         stop recording
  play         replay the melody
  clear        forget the melody
  show         list recorded notes
  save FILE    write the melody as JSON
  load FILE    read a JSON melody
  help         show this text
  quit         leave";

enum Flow {
    Continue,
    Quit,
}

pub fn announce(pitch: Pitch) {
    println!("  {} ({})", pitch, pitch.solfege());
}

pub fn read_melody(path: &Path) -> Result<Melody> {
    let bytes = std::fs::read(path).with_context(|| format!("read melody {:?}", path))?;
    import_json(&bytes).with_context(|| format!("parse melody {:?}", path))
}

pub async fn run<C: Clock, S: ToneSink>(
    recorder: MelodyRecorder<C, S>,
    midi: Option<&str>,
) -> Result<()> {
    let mut recorder = recorder.with_listener(Box::new(announce));
    let (_connection, midi_keys) = match midi {
        Some(name) => {
            let (connection, keys) = MidiManager::open_keys(name)?;
            (Some(connection), Some(keys))
        }
        None => (None, None),
    };
    println!("{HELP}");
    let lines = BufReader::new(tokio::io::stdin()).lines();
    session(&mut recorder, lines, midi_keys).await?;
    info!(notes = recorder.melody().len(), "keyboard closed");
    Ok(())
}

/// Feeds input lines and MIDI keys to the recorder until the input ends or the
/// user quits. A playback still running at that point is played out.
async fn session<C, S, R>(
    recorder: &mut MelodyRecorder<C, S>,
    mut lines: Lines<R>,
    mut midi_keys: Option<UnboundedReceiver<Pitch>>,
) -> Result<()>
where
    C: Clock,
    S: ToneSink,
    R: AsyncBufRead + Unpin,
{
    loop {
        let wait = recorder.time_until_next();
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match handle_line(recorder, line.trim()) {
                    Ok(Flow::Quit) => break,
                    Ok(Flow::Continue) => {}
                    Err(err) => println!("error: {err:#}"),
                }
            }
            Some(pitch) = next_midi_key(&mut midi_keys) => recorder.press_key(pitch),
            _ = sleep_for(wait) => {
                recorder.poll();
                if !recorder.is_playing() {
                    println!("playback finished");
                }
            }
        }
    }
    if recorder.is_playing() {
        debug!("input closed, finishing playback");
        drive_playback(recorder).await;
        println!("playback finished");
    }
    Ok(())
}

async fn next_midi_key(keys: &mut Option<UnboundedReceiver<Pitch>>) -> Option<Pitch> {
    match keys {
        Some(keys) => keys.recv().await,
        None => std::future::pending().await,
    }
}

async fn sleep_for(wait: Option<Duration>) {
    match wait {
        Some(wait) => tokio::time::sleep(wait).await,
        None => std::future::pending().await,
    }
}

fn handle_line<C: Clock, S: ToneSink>(
    recorder: &mut MelodyRecorder<C, S>,
    line: &str,
) -> Result<Flow> {
    let (command, arg) = match line.split_once(char::is_whitespace) {
        Some((command, arg)) => (command, arg.trim()),
        None => (line, ""),
    };
    match command.to_lowercase().as_str() {
        "" => {}
        "quit" | "exit" => return Ok(Flow::Quit),
        "help" => println!("{HELP}"),
        "rec" => {
            recorder.start_recording()?;
            println!("recording...");
        }
        "stop" => {
            if recorder.stop_recording() {
                println!("recorded {} notes", recorder.melody().len());
            }
        }
        "play" => {
            if !recorder.play_melody()? {
                if recorder.is_playing() {
                    println!("already playing");
                } else {
                    println!("nothing recorded yet");
                }
            }
        }
        "clear" => {
            recorder.clear_melody();
            println!("melody cleared");
        }
        "show" => {
            let text = TextExporter.export(recorder.melody(), ExportFormat::Text)?;
            print!("{}", String::from_utf8_lossy(&text));
        }
        "save" => {
            anyhow::ensure!(!arg.is_empty(), "usage: save FILE");
            let bytes = JsonExporter.export(recorder.melody(), ExportFormat::Json)?;
            std::fs::write(arg, bytes).with_context(|| format!("write melody {arg:?}"))?;
            println!("saved {} notes to {arg}", recorder.melody().len());
        }
        "load" => {
            anyhow::ensure!(!arg.is_empty(), "usage: load FILE");
            let melody = read_melody(Path::new(arg))?;
            let notes = melody.len();
            recorder.load_melody(melody)?;
            println!("loaded {notes} notes");
        }
        _ => {
            for token in line.split_whitespace() {
                match token.parse::<Pitch>() {
                    Ok(pitch) => recorder.press_key(pitch),
                    Err(err) => println!("{err}"),
                }
            }
        }
    }
    Ok(Flow::Continue)
}
