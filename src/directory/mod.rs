use futures::future::BoxFuture;

pub use icecast::IcecastDirectory;

use crate::catalog::Station;

mod icecast;

pub trait Directory {
    /// Fetches the directory page and extracts all advertised stations,
    /// in page order.
    fn fetch(&self) -> BoxFuture<anyhow::Result<Vec<Station>>>;
}
