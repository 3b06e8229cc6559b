//! Read-path orchestration.

use chrono::Utc;
use tracing::{error, warn};

use m2x_types::{datetime, StreamWindow};

use crate::api::StreamApi;
use crate::config::ConnectorConfig;
use crate::emit::{OutputRecord, RecordEmitter};
use crate::error::ConnectorError;
use crate::state::{CursorStore, StateStore};

/// Outcome of one read invocation.
#[derive(Debug)]
pub enum Poll {
    /// Records for the pipeline; the cursor has advanced.
    Emitted(Vec<OutputRecord>),
    /// Nothing was delivered; back off until the next scheduled run.
    Yield,
}

/// Incremental reader for one device stream.
///
/// Each [`poll`](StreamReader::poll) is one unit of work: load the cursor,
/// fetch once, emit every reading, advance the cursor. The scheduler must
/// not run two polls for the same stream concurrently; the reader takes no
/// lock around the cursor itself.
pub struct StreamReader<A, S> {
    api: A,
    cursor: CursorStore<S>,
    emitter: RecordEmitter,
    device_id: String,
    stream_name: String,
    start_time_ago: std::time::Duration,
}

impl<A: StreamApi, S: StateStore> StreamReader<A, S> {
    pub fn new(config: &ConnectorConfig, api: A, store: S) -> Self {
        let scope = format!("{}/{}", config.device_id, config.stream_name);
        Self {
            api,
            cursor: CursorStore::new(store, scope),
            emitter: RecordEmitter::new(config.device_id.clone(), config.stream_name.clone()),
            device_id: config.device_id.clone(),
            stream_name: config.stream_name.clone(),
            start_time_ago: config.start_time_ago,
        }
    }

    /// Run one read invocation.
    ///
    /// Fetch, parse and cursor-read failures all resolve to [`Poll::Yield`]
    /// with the cursor untouched; the next scheduled run is the retry. A
    /// cursor write failure is returned as an error, so the caller never
    /// advances silently past unpersisted progress.
    pub async fn poll(&self) -> Result<Poll, ConnectorError> {
        let start = self.lower_bound();

        let body = match self
            .api
            .fetch_values(&self.device_id, &self.stream_name, start.as_deref())
            .await
        {
            Ok(body) => body,
            Err(err) => {
                error!(
                    "fetch for {}/{} failed: {}",
                    self.device_id, self.stream_name, err
                );
                return Ok(Poll::Yield);
            }
        };

        let window = match StreamWindow::from_json_slice(&body) {
            Ok(window) => window,
            Err(err) => {
                let err = ConnectorError::MalformedPayload(err);
                error!(
                    "response for {}/{} unusable: {}",
                    self.device_id, self.stream_name, err
                );
                return Ok(Poll::Yield);
            }
        };

        // Without an end time there is nothing safe to advance the cursor to.
        let Some(end) = window.end else {
            warn!(
                "window for {}/{} carries no end time, retrying later",
                self.device_id, self.stream_name
            );
            return Ok(Poll::Yield);
        };

        let records = self.emitter.emit(&window);

        // The new cursor is the window's end, not the last reading's own
        // timestamp: the remote range filter is inclusive, so a reading's
        // timestamp as the next lower bound would deliver it twice.
        self.cursor.set_cursor(&datetime::format(&end))?;

        Ok(Poll::Emitted(records))
    }

    /// Lower bound for the next fetch: the stored cursor, else the
    /// configured lookback, else nothing.
    fn lower_bound(&self) -> Option<String> {
        let stored = match self.cursor.get_cursor() {
            Ok(stored) => stored,
            Err(err) => {
                warn!(
                    "failed to read the last start time for {}/{}, fetching without one: {}",
                    self.device_id, self.stream_name, err
                );
                None
            }
        };
        if stored.is_some() {
            return stored;
        }

        if self.start_time_ago.is_zero() {
            return None;
        }
        let ago = chrono::Duration::from_std(self.start_time_ago).ok()?;
        Some(datetime::format(&(Utc::now() - ago)))
    }
}
