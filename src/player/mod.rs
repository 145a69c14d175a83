pub use self::rodio::RodioPlayer;

use crate::stream::StreamSource;

mod rodio;

/// Decoded stream parameters, learned by probing the first packet.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct StreamFormat {
    pub sample_rate: u32,
    pub channels: u16,
}

#[derive(Debug, thiserror::Error)]
pub enum PlayError {
    #[error("stream is not decodable: {0}")]
    DecodeUnsupported(anyhow::Error),
}

pub trait Player {
    /// Starts rendering the given stream and reports its decoded format.
    ///
    /// Any prior render session is drained before the new chain is
    /// appended; on error the prior session keeps playing untouched.
    fn start(&self, source: StreamSource) -> Result<StreamFormat, PlayError>;

    /// Halts rendering and releases the decode chain, its stream
    /// connection included. No effect if nothing is playing.
    fn stop(&self);
}
