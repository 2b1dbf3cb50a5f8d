use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use synthbox::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "synthbox")]
#[command(about = "Play SoundFont notes through a handle-managed synthesizer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a SoundFont and play one note
    Play {
        /// SoundFont (.sf2) file
        soundfont: PathBuf,

        /// MIDI note number
        #[arg(short, long, default_value = "60")]
        note: i32,

        #[arg(short, long, default_value = "100")]
        velocity: i32,

        /// General MIDI program
        #[arg(short, long, default_value = "0")]
        program: i32,

        /// How long the note is held, in milliseconds
        #[arg(short, long, default_value = "1000")]
        duration: u64,

        #[arg(short, long, default_value = "0.8")]
        gain: f32,

        #[arg(short, long, default_value = "44100")]
        sample_rate: u32,

        /// Audio host name (e.g. ALSA, JACK, CoreAudio), or "null" for no output
        #[arg(long)]
        backend: Option<String>,
    },

    /// List the audio hosts compiled into this build
    Hosts,

    /// Print the engine version
    Version,
}

fn main() -> synthbox::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play {
            soundfont,
            note,
            velocity,
            program,
            duration,
            gain,
            sample_rate,
            backend,
        } => {
            let audio_backend = match backend.as_deref() {
                None => AudioBackend::Default,
                Some(name) if name.eq_ignore_ascii_case("null") => AudioBackend::Null,
                Some(name) => AudioBackend::Host(name.to_string()),
            };
            let config = SynthConfig::builder()
                .audio_backend(audio_backend)
                .gain(gain)
                .sample_rate(sample_rate)
                .build();

            let system = SynthSystem::new(RustySynthBackend::new());
            let handle = system.create_instance(config)?;

            let played = play(&system, handle, &soundfont, program, note, velocity, duration);
            system.destroy_instance(handle);
            played?;
        }
        Commands::Hosts => {
            #[cfg(feature = "cpal")]
            for host in synthbox::core::output::list_hosts() {
                println!("{host}");
            }
            println!("null");
        }
        Commands::Version => {
            println!("{}", synthbox::synth::version());
        }
    }

    Ok(())
}

fn play(
    system: &SynthSystem,
    handle: InstanceHandle,
    soundfont: &std::path::Path,
    program: i32,
    note: i32,
    velocity: i32,
    duration: u64,
) -> synthbox::Result<()> {
    let id = system.load_soundfont(handle, soundfont)?;
    tracing::info!("Playing note {note} (program {program}, SoundFont {id})");

    system.program_change(handle, 0, program)?;
    system.note_on(handle, 0, note, velocity)?;
    thread::sleep(Duration::from_millis(duration));
    system.note_off(handle, 0, note)?;

    // Let the release tail ring out
    thread::sleep(Duration::from_millis(500));
    Ok(())
}
