use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use voice_notes::{
    AudioBackendConfig, ChatApp, ClipRecorder, Config, MicrophoneBackend, RecorderConfig,
    SessionController, UploadClient,
};

#[derive(Debug, Parser)]
#[command(name = "voice-notes", about = "Record voice notes and analyze them as conversations")]
struct Args {
    /// Configuration file (without extension, `config` crate conventions)
    #[arg(long, default_value = "config/voice-notes")]
    config: String,

    /// List available input devices and exit
    #[arg(long)]
    list_devices: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they don't fight the TUI for stdout
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let args = Args::parse();

    if args.list_devices {
        return MicrophoneBackend::list_devices();
    }

    let cfg = Config::load(&args.config)?;

    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));
    info!("Upload endpoint: {}", cfg.backend.upload_url);

    let backend = MicrophoneBackend::new(AudioBackendConfig {
        sample_rate: cfg.audio.sample_rate,
        channels: cfg.audio.channels,
    });

    let recorder = ClipRecorder::new(
        RecorderConfig {
            output_dir: PathBuf::from(&cfg.audio.recordings_path),
            sample_rate: cfg.audio.sample_rate,
            channels: cfg.audio.channels,
        },
        Box::new(backend),
    );

    let client = Arc::new(UploadClient::new(cfg.backend.upload_url));
    let controller = Arc::new(SessionController::new(recorder, client));

    ChatApp::new(controller).run().await
}
