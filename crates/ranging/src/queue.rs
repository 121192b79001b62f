//! Hand-off between backend callbacks and the consumer loop.
//!
//! Backends deliver sightings from threads the caller does not control. They
//! only ever hold an [`ObservationSink`]; the single [`ObservationDrain`] is
//! owned by whoever runs the consumer loop.

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender, error::TryRecvError};

use crate::models::{clock::Clock, types::BeaconSighting};

pub fn observation_queue(clock: Arc<dyn Clock>) -> (ObservationSink, ObservationDrain) {
    let (sender, receiver) = mpsc::unbounded_channel();

    (
        ObservationSink { sender, clock },
        ObservationDrain { receiver },
    )
}

/// Producer end. Cheap to clone; never blocks.
#[derive(Clone)]
pub struct ObservationSink {
    sender: UnboundedSender<BeaconSighting>,
    clock: Arc<dyn Clock>,
}

impl ObservationSink {
    /// Entry point for `onBeaconDetected`. Safe to call from any thread.
    ///
    /// Returns `false` once the consumer side has been dropped.
    pub fn on_beacon_detected(
        &self,
        uuid: &str,
        major: i32,
        minor: i32,
        distance: f64,
        rssi: f64,
    ) -> bool {
        self.push(BeaconSighting {
            uuid: uuid.to_owned(),
            major,
            minor,
            distance,
            rssi,
            observed_at: self.clock.now(),
        })
    }

    pub fn push(&self, sighting: BeaconSighting) -> bool {
        match self.sender.send(sighting) {
            Ok(()) => true,
            Err(_) => {
                tracing::trace!("observation queue closed; dropping sighting");
                false
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Consumer end. Only the consumer loop drains it.
pub struct ObservationDrain {
    receiver: UnboundedReceiver<BeaconSighting>,
}

impl ObservationDrain {
    /// Take everything queued so far, oldest first.
    pub fn drain(&mut self) -> Vec<BeaconSighting> {
        let mut out = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(sighting) => out.push(sighting),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}
