use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use rodio::source::Stoppable;
use rodio::{OutputStream, Sink, Source};

use super::{PlayError, Player, StreamFormat};
use crate::stream::StreamSource;

mod source;

#[derive(Debug, Default)]
struct Controls {
    stop: AtomicBool,
}

/// `Player` on top of a rodio sink fed by a symphonia decode chain.
pub struct RodioPlayer {
    sink: Sink,
    controls: Arc<Controls>,

    // Keeps the output device open for the lifetime of the player.
    _output: OutputStream,
}

impl RodioPlayer {
    const ACCESS_PERIOD: Duration = Duration::from_millis(15);

    /// Attaches to the default output device.
    pub fn new() -> anyhow::Result<Self> {
        let (output, handle) = OutputStream::try_default().context("open default output device")?;
        let sink = Sink::try_new(&handle).context("create sink")?;

        Ok(Self {
            sink,
            controls: Arc::default(),
            _output: output,
        })
    }

    /// Stops and waits out whatever the sink is currently rendering.
    fn drain(&self) {
        while self.sink.len() > 0 {
            self.controls.stop.store(true, Ordering::SeqCst);
            self.sink.sleep_until_end();
        }

        self.controls.stop.store(false, Ordering::SeqCst);
    }
}

impl Player for RodioPlayer {
    fn start(&self, source: StreamSource) -> Result<StreamFormat, PlayError> {
        log::debug!("starting stream {}", source.url());

        let decoded = source::Symphonia::new(source).map_err(PlayError::DecodeUnsupported)?;
        let format = decoded.format();

        let controls = self.controls.clone();

        let access = move |src: &mut Stoppable<_>| {
            if controls.stop.load(Ordering::SeqCst) {
                src.stop();
                controls.stop.store(false, Ordering::SeqCst);
            }
        };

        let decoded = decoded
            .stoppable()
            .periodic_access(Self::ACCESS_PERIOD, access);

        // The old chain must be gone before the new one is appended, so
        // two sessions never render at once.
        self.drain();

        self.sink.append(decoded);

        Ok(format)
    }

    fn stop(&self) {
        self.drain();
    }
}
