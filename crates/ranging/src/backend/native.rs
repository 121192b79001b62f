use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::backend::traits::{NativeRangingBridge, RangingBackend};
use crate::identifiers::{PlayerId, SessionId};
use crate::models::types::{Advertisement, BackendKind, RangingError, Result};

/// Backend that forwards to the platform plugin.
///
/// The platform pushes detections into the sink it was given when the
/// session was built; this type only tracks start/stop state so that the
/// bridge never sees a duplicate or unmatched call.
pub struct NativeBackend {
    bridge: Arc<dyn NativeRangingBridge>,
    advertising: AtomicBool,
    scanning: AtomicBool,
}

impl NativeBackend {
    pub fn new(bridge: Arc<dyn NativeRangingBridge>) -> Self {
        Self {
            bridge,
            advertising: AtomicBool::new(false),
            scanning: AtomicBool::new(false),
        }
    }

    fn ensure_available(&self) -> Result<()> {
        if self.bridge.is_available() {
            Ok(())
        } else {
            Err(RangingError::Unavailable(
                "native bridge reports no ranging hardware".into(),
            ))
        }
    }
}

impl RangingBackend for NativeBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Native
    }

    fn start_advertising(&self, advertisement: &Advertisement) -> Result<()> {
        if self.advertising.load(Ordering::Acquire) {
            return Ok(());
        }
        self.ensure_available()?;

        self.bridge.start_advertising(
            &advertisement.uuid,
            advertisement.session.get(),
            advertisement.player.get(),
        )?;
        self.advertising.store(true, Ordering::Release);

        tracing::info!(
            session = %advertisement.session,
            player = %advertisement.player,
            "native advertising started"
        );
        Ok(())
    }

    fn stop_advertising(&self) {
        if self.advertising.swap(false, Ordering::AcqRel) {
            self.bridge.stop_advertising();
            tracing::info!("native advertising stopped");
        }
    }

    fn start_scanning(&self, uuid: &str) -> Result<()> {
        if self.scanning.load(Ordering::Acquire) {
            return Ok(());
        }
        self.ensure_available()?;

        self.bridge.start_scanning(uuid)?;
        self.scanning.store(true, Ordering::Release);

        tracing::info!(uuid, "native scanning started");
        Ok(())
    }

    fn stop_scanning(&self) {
        if self.scanning.swap(false, Ordering::AcqRel) {
            self.bridge.stop_scanning();
            tracing::info!("native scanning stopped");
        }
    }

    fn is_advertising(&self) -> bool {
        self.advertising.load(Ordering::Acquire)
    }

    fn is_scanning(&self) -> bool {
        self.scanning.load(Ordering::Acquire)
    }

    fn distance_to_beacon(&self, session: SessionId, target: PlayerId) -> Option<f64> {
        let distance = self
            .bridge
            .get_distance_to_beacon(session.get(), target.get());

        (distance.is_finite() && distance >= 0.0).then_some(distance)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records every call made across the bridge.
    #[derive(Default)]
    pub(crate) struct RecordingBridge {
        pub(crate) unavailable: bool,
        pub(crate) calls: Mutex<Vec<String>>,
    }

    impl RecordingBridge {
        pub(crate) fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl NativeRangingBridge for RecordingBridge {
        fn is_available(&self) -> bool {
            !self.unavailable
        }

        fn start_advertising(&self, uuid: &str, session_id: i32, player_id: i32) -> Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("start_advertising {uuid} {session_id} {player_id}"));
            Ok(())
        }

        fn stop_advertising(&self) {
            self.calls.lock().unwrap().push("stop_advertising".into());
        }

        fn start_scanning(&self, uuid: &str) -> Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("start_scanning {uuid}"));
            Ok(())
        }

        fn stop_scanning(&self) {
            self.calls.lock().unwrap().push("stop_scanning".into());
        }

        fn get_distance_to_beacon(&self, _session_id: i32, target_id: i32) -> f64 {
            if target_id == 1000 { 7.5 } else { -1.0 }
        }
    }

    fn advertisement() -> Advertisement {
        Advertisement {
            uuid: "550e8400-e29b-41d4-a716-446655440000".into(),
            session: SessionId::new(1),
            player: PlayerId::new(1001),
        }
    }

    #[test]
    fn test_start_is_idempotent() {
        let bridge = Arc::new(RecordingBridge::default());
        let backend = NativeBackend::new(bridge.clone());

        backend.start_advertising(&advertisement()).unwrap();
        backend.start_advertising(&advertisement()).unwrap();
        backend.start_scanning("u").unwrap();
        backend.start_scanning("u").unwrap();

        assert_eq!(bridge.calls().len(), 2);
        assert!(backend.is_advertising());
        assert!(backend.is_scanning());
    }

    #[test]
    fn test_stop_without_start_is_noop() {
        let bridge = Arc::new(RecordingBridge::default());
        let backend = NativeBackend::new(bridge.clone());

        backend.stop_scanning();
        backend.stop_advertising();

        assert!(bridge.calls().is_empty());
    }

    #[test]
    fn test_stop_after_start_reaches_bridge_once() {
        let bridge = Arc::new(RecordingBridge::default());
        let backend = NativeBackend::new(bridge.clone());

        backend.start_scanning("u").unwrap();
        backend.stop_scanning();
        backend.stop_scanning();

        assert_eq!(bridge.calls(), vec!["start_scanning u", "stop_scanning"]);
    }

    #[test]
    fn test_unavailable_bridge() {
        let bridge = Arc::new(RecordingBridge {
            unavailable: true,
            ..Default::default()
        });
        let backend = NativeBackend::new(bridge.clone());

        let err = backend.start_scanning("u").unwrap_err();
        assert!(err.is_unavailable());
        assert!(!backend.is_scanning());
        assert!(bridge.calls().is_empty());
    }

    #[test]
    fn test_distance_query_maps_unknown() {
        let backend = NativeBackend::new(Arc::new(RecordingBridge::default()));

        assert_eq!(
            backend.distance_to_beacon(SessionId::new(1), PlayerId::new(1000)),
            Some(7.5)
        );
        assert_eq!(
            backend.distance_to_beacon(SessionId::new(1), PlayerId::new(1002)),
            None
        );
    }
}
