//! Background byte fetching.
//!
//! Reading from the store can block on disk, so requested assets are fetched
//! on a worker thread. Only bytes cross the channel; GPU objects are always
//! constructed on the main thread when the results are polled.

use std::any::TypeId;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

use crate::error::{ContentError, StoreError};
use crate::store::AssetStore;

/// A fetch request for one normalized asset name.
pub(crate) struct FetchRequest {
    pub name: String,
    pub type_id: TypeId,
    pub type_name: &'static str,
}

/// Bytes fetched for a request, or the store error.
pub(crate) struct Fetched {
    pub name: String,
    pub type_id: TypeId,
    pub type_name: &'static str,
    pub bytes: Result<Vec<u8>, StoreError>,
}

/// Worker thread reading assets from the store.
pub(crate) struct FetchQueue {
    requests: Option<Sender<FetchRequest>>,
    results: Receiver<Fetched>,
    worker: Option<JoinHandle<()>>,
}

impl FetchQueue {
    pub fn spawn(store: Arc<AssetStore>) -> Result<Self, ContentError> {
        let (request_tx, request_rx) = crossbeam_channel::unbounded::<FetchRequest>();
        let (result_tx, result_rx) = crossbeam_channel::unbounded();

        let worker = std::thread::Builder::new()
            .name("hearth-content-fetch".into())
            .spawn(move || {
                for request in request_rx.iter() {
                    let bytes = store.read(&request.name);
                    log::trace!(
                        "FetchQueue: fetched '{}' ({})",
                        request.name,
                        if bytes.is_ok() { "ok" } else { "error" }
                    );
                    let fetched = Fetched {
                        name: request.name,
                        type_id: request.type_id,
                        type_name: request.type_name,
                        bytes,
                    };
                    if result_tx.send(fetched).is_err() {
                        break;
                    }
                }
                log::trace!("FetchQueue: worker exiting");
            })
            .map_err(|e| ContentError::Store(StoreError::Io(e)))?;

        Ok(Self {
            requests: Some(request_tx),
            results: result_rx,
            worker: Some(worker),
        })
    }

    /// Queue a fetch. Returns `false` if the worker has gone away.
    pub fn submit(&self, request: FetchRequest) -> bool {
        self.requests
            .as_ref()
            .is_some_and(|tx| tx.send(request).is_ok())
    }

    /// Results that are ready now, without blocking.
    pub fn drain(&self) -> Vec<Fetched> {
        self.results.try_iter().collect()
    }

    /// Block for the next result, up to `timeout`.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<Fetched> {
        match self.results.recv_timeout(timeout) {
            Ok(fetched) => Some(fetched),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }
}

impl Drop for FetchQueue {
    fn drop(&mut self) {
        // Closing the request channel ends the worker loop.
        self.requests.take();
        if let Some(worker) = self.worker.take()
            && worker.join().is_err()
        {
            log::error!("FetchQueue: worker thread panicked");
        }
    }
}
