use std::fmt;
use std::fmt::Formatter;
use std::time::Duration;

use anyhow::Context;
use rodio::Source;
use symphonia::core::audio::{SampleBuffer, SignalSpec};
use symphonia::core::codecs::{Decoder, DecoderOptions};
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::{MediaSourceStream, MediaSourceStreamOptions, ReadOnlySource};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::default::{get_codecs, get_probe};

use crate::catalog::SUPPORTED_MEDIA_TYPE;
use crate::player::StreamFormat;
use crate::stream::StreamSource;

/// Pull-based sample source decoding a live stream with symphonia.
///
/// Dropping it releases the decoder and the underlying connection.
pub struct Symphonia {
    reader: Box<dyn FormatReader>,
    decoder: Box<dyn Decoder>,

    offset: usize,
    buffer: SampleBuffer<i16>,
    spec: SignalSpec,
}

impl Symphonia {
    /// Probes the stream and decodes its first packet to learn the
    /// signal parameters before any sample is rendered.
    pub fn new(source: StreamSource) -> anyhow::Result<Self> {
        let rs = ReadOnlySource::new(source);
        let mss = MediaSourceStream::new(Box::new(rs), MediaSourceStreamOptions::default());

        let mut hint = Hint::new();
        hint.mime_type(SUPPORTED_MEDIA_TYPE);

        let probe = get_probe().format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )?;

        let mut reader = probe.format;
        let track = reader.default_track().context("stream has no track")?;
        let mut decoder = get_codecs().make(&track.codec_params, &DecoderOptions::default())?;

        let packet = reader.next_packet().context("read first packet")?;
        let decoded = decoder.decode(&packet).context("decode first packet")?;
        let spec = *decoded.spec();

        let mut buffer = SampleBuffer::new(decoded.capacity() as u64, spec);
        buffer.copy_interleaved_ref(decoded);

        Ok(Self {
            reader,
            decoder,
            offset: 0,
            buffer,
            spec,
        })
    }

    pub fn format(&self) -> StreamFormat {
        StreamFormat {
            sample_rate: self.spec.rate,
            channels: self
                .spec
                .channels
                .count()
                .try_into()
                .expect("unexpected u16 overflow"),
        }
    }
}

impl Source for Symphonia {
    fn current_frame_len(&self) -> Option<usize> {
        Some(self.buffer.samples().len())
    }

    fn channels(&self) -> u16 {
        self.format().channels
    }

    fn sample_rate(&self) -> u32 {
        self.spec.rate
    }

    fn total_duration(&self) -> Option<Duration> {
        None
    }
}

impl Iterator for Symphonia {
    type Item = i16;

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset == self.buffer.len() {
            // A live stream ends only when the connection does; any
            // decode error past the probe ends the session.
            let packet = match self.reader.next_packet() {
                Ok(packet) => packet,
                Err(_) => return None,
            };

            let decoded = match self.decoder.decode(&packet) {
                Ok(buffer) => buffer,
                Err(_) => return None,
            };

            let mut buffer = SampleBuffer::new(decoded.capacity() as u64, *decoded.spec());
            buffer.copy_interleaved_ref(decoded);

            self.buffer = buffer;
            self.offset = 0;
        }

        let sample = self.buffer.samples()[self.offset];
        self.offset += 1;

        Some(sample)
    }
}

impl fmt::Debug for Symphonia {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Symphonia")
            .field("offset", &self.offset)
            .field("buffer", &self.buffer.len())
            .field("spec", &self.spec)
            .finish()
    }
}
