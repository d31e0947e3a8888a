//! Async driving of the widget.
//!
//! `run_ticket` and `locate` await inline. `request_fetch` spawns the fetch
//! on the tokio runtime and reports back over a channel, which lets several
//! requests overlap; the widget's sequence numbers decide which one counts.

use std::sync::Arc;

use folio_weather::{Geolocator, LocationError, PositionOptions, WeatherReading};
use tokio::sync::mpsc::UnboundedSender;

use crate::client::WeatherSource;
use crate::error::WidgetError;
use crate::preferences::PreferenceStore;
use crate::view::WidgetView;
use crate::widget::{FetchTicket, WeatherWidget};

/// Messages sent from spawned fetches back to the widget's owner
#[derive(Debug)]
pub enum WidgetMessage {
    FetchDone {
        seq: u64,
        result: Result<WeatherReading, WidgetError>,
    },
}

impl<S: PreferenceStore, V: WidgetView> WeatherWidget<S, V> {
    /// Apply a message from `request_fetch`. Returns true if it was applied.
    pub fn handle_message(&mut self, message: WidgetMessage) -> bool {
        match message {
            WidgetMessage::FetchDone { seq, result } => self.complete(seq, result),
        }
    }
}

/// Spawn a fetch; sends `FetchDone` on the channel when complete.
/// Must be called from within a tokio runtime.
pub fn request_fetch<W>(tx: &UnboundedSender<WidgetMessage>, source: Arc<W>, ticket: FetchTicket)
where
    W: WeatherSource + 'static,
{
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = source.fetch(ticket.query()).await;
        if tx
            .send(WidgetMessage::FetchDone {
                seq: ticket.seq(),
                result,
            })
            .is_err()
        {
            tracing::debug!("Widget gone before request #{} finished", ticket.seq());
        }
    });
}

/// Fetch a ticket and apply the outcome. Returns true if it was applied.
pub async fn run_ticket<S, V, W>(
    widget: &mut WeatherWidget<S, V>,
    source: &W,
    ticket: FetchTicket,
) -> bool
where
    S: PreferenceStore,
    V: WidgetView,
    W: WeatherSource,
{
    let result = source.fetch(ticket.query()).await;
    widget.complete(ticket.seq(), result)
}

/// Run `start` and its initial fetch.
pub async fn start<S, V, W>(widget: &mut WeatherWidget<S, V>, source: &W) -> bool
where
    S: PreferenceStore,
    V: WidgetView,
    W: WeatherSource,
{
    match widget.start() {
        Some(ticket) => run_ticket(widget, source, ticket).await,
        None => false,
    }
}

/// Ask the locator for a position, bounded by the widget's timeout.
pub async fn current_position<L: Geolocator>(
    locator: &L,
    options: PositionOptions,
) -> Result<folio_weather::Coordinates, LocationError> {
    tokio::time::timeout(options.timeout, locator.current_position(options))
        .await
        .unwrap_or(Err(LocationError::Timeout))
}

/// Full "use my location" flow: locate, then fetch weather for the position.
pub async fn locate<S, V, W, L>(widget: &mut WeatherWidget<S, V>, locator: &L, source: &W) -> bool
where
    S: PreferenceStore,
    V: WidgetView,
    W: WeatherSource,
    L: Geolocator,
{
    if !locator.is_supported() {
        widget.location_unsupported();
        return false;
    }

    let options = widget.request_location();
    let position = current_position(locator, options).await;
    match widget.location_resolved(position) {
        Some(ticket) => run_ticket(widget, source, ticket).await,
        None => false,
    }
}
