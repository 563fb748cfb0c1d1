use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use pianotes_audio::{CpalSink, NullSink, ToneSink};
use pianotes_tutor::{drive_playback, MelodyRecorder, MidiManager, PlaybackConfig, TokioClock};
use tracing::{instrument, warn};
use tracing_subscriber::EnvFilter;

mod keys;
mod lessons;

#[derive(Parser, Debug)]
#[command(author, version, about = "Learn the piano from the terminal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play the virtual keyboard, record and replay melodies
    Keys {
        #[command(flatten)]
        output: OutputArgs,
        /// MIDI input port to take key presses from
        #[arg(long)]
        midi: Option<String>,
    },
    /// Replay a melody saved as JSON
    Play {
        /// Path to the melody file
        file: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Show the theory lesson, levels and profile
    Lesson,
    /// Answer the practice questions
    Quiz,
    /// Find the named keys on the keyboard
    KeyQuiz {
        #[command(flatten)]
        output: OutputArgs,
    },
    /// List MIDI inputs
    Devices,
}

#[derive(Args, Debug, Clone)]
struct OutputArgs {
    /// Playback config file (JSON or YAML)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Audio output device name
    #[arg(long)]
    device: Option<String>,
    /// Do not open an audio device
    #[arg(long)]
    mute: bool,
}

impl OutputArgs {
    fn playback_config(&self) -> Result<PlaybackConfig> {
        match &self.config {
            Some(path) => PlaybackConfig::load(path)
                .with_context(|| format!("load playback config {:?}", path)),
            None => Ok(PlaybackConfig::default()),
        }
    }

    fn open_sink(&self) -> Box<dyn ToneSink> {
        if self.mute {
            return Box::new(NullSink);
        }
        match CpalSink::open(self.device.as_deref()) {
            Ok(sink) => Box::new(sink),
            Err(err) => {
                warn!(error = %err, "audio output unavailable, continuing muted");
                Box::new(NullSink)
            }
        }
    }

    fn recorder(&self) -> Result<MelodyRecorder<TokioClock, Box<dyn ToneSink>>> {
        Ok(MelodyRecorder::new(
            TokioClock::new(),
            self.open_sink(),
            self.playback_config()?,
        ))
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Keys { output, midi } => keys::run(output.recorder()?, midi.as_deref()).await,
        Command::Play { file, output } => play_file(&file, &output).await,
        Command::Lesson => {
            lessons::show_lesson();
            Ok(())
        }
        Command::Quiz => lessons::run_quiz().await,
        Command::KeyQuiz { output } => lessons::run_key_quiz(output.recorder()?).await,
        Command::Devices => {
            for device in MidiManager::list_inputs()? {
                println!("{}", device.name);
            }
            Ok(())
        }
    }
}

#[instrument(skip(output))]
async fn play_file(file: &Path, output: &OutputArgs) -> Result<()> {
    let melody = keys::read_melody(file)?;
    let mut recorder = output
        .recorder()?
        .with_listener(Box::new(keys::announce));
    recorder.load_melody(melody)?;
    if !recorder.play_melody()? {
        println!("{} holds no notes", file.display());
        return Ok(());
    }
    drive_playback(&mut recorder).await;
    println!("done ({} notes)", recorder.melody().len());
    Ok(())
}

