// Microphone capture backend built on cpal.
//
// The cpal::Stream is !Send, so the stream lives on a dedicated capture
// thread. Frames cross into async land through a tokio mpsc channel; the
// thread reports startup success or failure back synchronously so start()
// can surface permission/device errors to the caller.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Sample, SizedSample};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use super::backend::{AudioBackend, AudioBackendConfig, AudioFrame, CaptureError};

/// Microphone capture via the default cpal input device
pub struct MicrophoneBackend {
    config: AudioBackendConfig,
    stop_flag: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
    capturing: bool,
}

impl MicrophoneBackend {
    pub fn new(config: AudioBackendConfig) -> Self {
        Self {
            config,
            stop_flag: Arc::new(AtomicBool::new(false)),
            worker: None,
            capturing: false,
        }
    }

    /// Print the available input devices to stdout
    pub fn list_devices() -> anyhow::Result<()> {
        let host = cpal::default_host();
        println!("Available input devices:");

        for (idx, device) in host.input_devices()?.enumerate() {
            let name = device.name()?;
            println!("  [{}] {}", idx, name);

            for range in device.supported_input_configs()? {
                println!(
                    "      {:?}, {}-{}Hz, {}ch",
                    range.sample_format(),
                    range.min_sample_rate().0,
                    range.max_sample_rate().0,
                    range.channels()
                );
            }
        }

        Ok(())
    }

    fn run_capture(
        config: AudioBackendConfig,
        stop_flag: Arc<AtomicBool>,
        frame_tx: mpsc::Sender<AudioFrame>,
        ready_tx: std::sync::mpsc::Sender<Result<(), CaptureError>>,
    ) {
        let stream = match Self::build_stream(&config, frame_tx) {
            Ok(stream) => stream,
            Err(e) => {
                let _ = ready_tx.send(Err(e));
                return;
            }
        };

        if let Err(e) = stream.play() {
            error!("Failed to start input stream: {}", e);
            let _ = ready_tx.send(Err(CaptureError::DeviceUnavailable));
            return;
        }

        let _ = ready_tx.send(Ok(()));

        while !stop_flag.load(Ordering::SeqCst) {
            std::thread::sleep(Duration::from_millis(50));
        }

        // Dropping the stream releases the device and closes the frame
        // channel (the callback holds the only sender).
        drop(stream);
    }

    fn build_stream(
        config: &AudioBackendConfig,
        frame_tx: mpsc::Sender<AudioFrame>,
    ) -> Result<cpal::Stream, CaptureError> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or(CaptureError::DeviceUnavailable)?;

        info!("Input device: {:?}", device.name().ok());

        let default_config = device
            .default_input_config()
            .map_err(|_| CaptureError::DeviceUnavailable)?;

        let stream_config = cpal::StreamConfig {
            channels: config.channels,
            sample_rate: cpal::SampleRate(config.sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        match default_config.sample_format() {
            cpal::SampleFormat::F32 => {
                Self::build_typed_stream::<f32>(&device, &stream_config, frame_tx)
            }
            cpal::SampleFormat::I16 => {
                Self::build_typed_stream::<i16>(&device, &stream_config, frame_tx)
            }
            cpal::SampleFormat::U16 => {
                Self::build_typed_stream::<u16>(&device, &stream_config, frame_tx)
            }
            cpal::SampleFormat::I32 => {
                Self::build_typed_stream::<i32>(&device, &stream_config, frame_tx)
            }
            _ => Err(CaptureError::DeviceUnavailable),
        }
    }

    fn build_typed_stream<T>(
        device: &cpal::Device,
        stream_config: &cpal::StreamConfig,
        frame_tx: mpsc::Sender<AudioFrame>,
    ) -> Result<cpal::Stream, CaptureError>
    where
        T: SizedSample + Sample + Send + 'static,
        <T as Sample>::Float: Into<f32>,
    {
        let sample_rate = stream_config.sample_rate.0;
        let channels = stream_config.channels;
        let started = std::time::Instant::now();

        let data_callback = move |data: &[T], _info: &cpal::InputCallbackInfo| {
            let samples: Vec<i16> = data
                .iter()
                .map(|s| {
                    let f: f32 = s.to_float_sample().into();
                    (f.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
                })
                .collect();

            let frame = AudioFrame {
                samples,
                sample_rate,
                channels,
                timestamp_ms: started.elapsed().as_millis() as u64,
            };

            // try_send: never block the audio callback
            if let Err(mpsc::error::TrySendError::Full(_)) = frame_tx.try_send(frame) {
                warn!("Frame channel full, dropping audio frame");
            }
        };

        let error_callback = move |err| {
            error!("Input stream error: {}", err);
        };

        device
            .build_input_stream(stream_config, data_callback, error_callback, None)
            .map_err(|e| match e {
                cpal::BuildStreamError::DeviceNotAvailable => CaptureError::DeviceUnavailable,
                cpal::BuildStreamError::BackendSpecific { .. } => CaptureError::PermissionDenied,
                _ => CaptureError::DeviceUnavailable,
            })
    }
}

#[async_trait::async_trait]
impl AudioBackend for MicrophoneBackend {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>, CaptureError> {
        if self.capturing {
            return Err(CaptureError::AlreadyRecording);
        }

        info!(
            "Starting microphone capture ({}Hz, {} channels)",
            self.config.sample_rate, self.config.channels
        );

        self.stop_flag.store(false, Ordering::SeqCst);

        let (frame_tx, frame_rx) = mpsc::channel(1024);
        let (ready_tx, ready_rx) = std::sync::mpsc::channel();

        let config = self.config.clone();
        let stop_flag = Arc::clone(&self.stop_flag);

        let worker = std::thread::spawn(move || {
            Self::run_capture(config, stop_flag, frame_tx, ready_tx);
        });

        match ready_rx.recv_timeout(Duration::from_secs(5)) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                let _ = worker.join();
                return Err(e);
            }
            Err(_) => {
                self.stop_flag.store(true, Ordering::SeqCst);
                let _ = worker.join();
                return Err(CaptureError::DeviceUnavailable);
            }
        }

        self.worker = Some(worker);
        self.capturing = true;

        info!("Microphone capture started");

        Ok(frame_rx)
    }

    async fn stop(&mut self) -> Result<(), CaptureError> {
        if !self.capturing {
            return Ok(());
        }

        info!("Stopping microphone capture");

        self.stop_flag.store(true, Ordering::SeqCst);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("Capture thread panicked during shutdown");
            }
        }

        self.capturing = false;

        info!("Microphone capture stopped");

        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.capturing
    }

    fn name(&self) -> &str {
        "cpal microphone"
    }
}
