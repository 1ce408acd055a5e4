use crate::events::{ConnectionStatus, StatusEvent, StatusEventType};
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{mpsc, Mutex};
use tracing::info;

use super::detector::PhoneDetector;

/// Единственный владелец состояния, которое разделяют консоль и задача опроса.
///
/// - `monitoring` выставляется при старте и снимается при завершении.
/// - `installed` вычисляется один раз и больше не сбрасывается.
/// - `connection` отражает только последний опрос.
/// - события в канале идут в том же порядке, что и записи в `connection`.
pub struct StatusTracker {
    monitoring: AtomicBool,
    installed: OnceCell<bool>,
    connection: RwLock<ConnectionStatus>,
    publishing: Mutex<()>,
}

impl Default for StatusTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusTracker {
    pub fn new() -> Self {
        Self {
            monitoring: AtomicBool::new(false),
            installed: OnceCell::new(),
            connection: RwLock::new(ConnectionStatus::Disconnected),
            publishing: Mutex::new(()),
        }
    }

    /// Первичная проверка установки; повторные вызовы отдают закэшированный результат
    pub async fn initial_installation_check(&self, detector: &PhoneDetector) -> bool {
        if let Some(installed) = self.installed.get() {
            return *installed;
        }

        let installed = detector.check_installation().await;
        *self.installed.get_or_init(|| installed)
    }

    #[allow(dead_code)]
    pub fn installed(&self) -> Option<bool> {
        self.installed.get().copied()
    }

    pub fn start_monitoring(&self) {
        info!("Мониторинг подключения включён");
        self.monitoring.store(true, Ordering::SeqCst);
    }

    pub fn stop_monitoring(&self) {
        if self.monitoring.swap(false, Ordering::SeqCst) {
            info!("Мониторинг подключения остановлен");
        }
    }

    pub fn is_monitoring(&self) -> bool {
        self.monitoring.load(Ordering::SeqCst)
    }

    #[allow(dead_code)]
    pub fn connection(&self) -> ConnectionStatus {
        *self.connection.read()
    }

    /// Сохраняет свежий статус и сообщает, отличается ли он от предыдущего
    pub fn record(&self, status: ConnectionStatus) -> bool {
        let mut current = self.connection.write();
        let changed = *current != status;
        *current = status;
        changed
    }

    /// Опрос, запись и отправка под одной блокировкой.
    ///
    /// `ConnectionChanged` уходит только при изменении, `Refreshed` всегда.
    /// Возвращает свежий статус и признак изменения.
    pub async fn poll_and_publish(
        &self,
        detector: &PhoneDetector,
        event_type: StatusEventType,
        events: &mpsc::Sender<StatusEvent>,
    ) -> Result<(ConnectionStatus, bool), mpsc::error::SendError<StatusEvent>> {
        let _guard = self.publishing.lock().await;

        let status = detector.detect_connection().await;
        let changed = self.record(status);

        if changed || event_type == StatusEventType::Refreshed {
            events.send(StatusEvent::new(status, event_type)).await?;
        }

        Ok((status, changed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ConnectionType;
    use crate::services::probe::{DryRunProbe, FixedProbe, ProbeChain};
    use std::sync::atomic::Ordering as AtomicOrdering;
    use std::sync::Arc;

    #[tokio::test]
    async fn installation_is_checked_once() {
        let probe = FixedProbe::present("appx");
        let calls = probe.counter();
        let detector = PhoneDetector::new(
            ProbeChain::new("usb"),
            ProbeChain::new("bluetooth"),
            ProbeChain::new("installation").with_probe(probe),
        );
        let tracker = StatusTracker::new();

        assert_eq!(tracker.installed(), None);
        assert!(tracker.initial_installation_check(&detector).await);
        assert!(tracker.initial_installation_check(&detector).await);
        assert_eq!(tracker.installed(), Some(true));
        assert_eq!(calls.load(AtomicOrdering::SeqCst), 1);
    }

    #[test]
    fn record_reports_changes_only() {
        let tracker = StatusTracker::new();
        let usb = ConnectionStatus::Connected(ConnectionType::Usb);

        assert!(!tracker.record(ConnectionStatus::Disconnected));
        assert!(tracker.record(usb));
        assert!(!tracker.record(usb));
        assert_eq!(tracker.connection(), usb);
        assert!(tracker.record(ConnectionStatus::Connected(ConnectionType::Bluetooth)));
    }

    #[tokio::test]
    async fn changed_is_sent_only_on_change_refreshed_always() {
        let detector = PhoneDetector::new(
            ProbeChain::new("usb").with_probe(DryRunProbe::new("usb", vec![false])),
            ProbeChain::new("bluetooth"),
            ProbeChain::new("installation"),
        );
        let tracker = StatusTracker::new();
        let (tx, mut rx) = mpsc::channel(4);

        let (status, changed) = tracker
            .poll_and_publish(&detector, StatusEventType::ConnectionChanged, &tx)
            .await
            .unwrap();
        assert_eq!(status, ConnectionStatus::Disconnected);
        assert!(!changed);
        assert!(rx.try_recv().is_err());

        tracker
            .poll_and_publish(&detector, StatusEventType::Refreshed, &tx)
            .await
            .unwrap();
        assert_eq!(rx.try_recv().unwrap().event_type, StatusEventType::Refreshed);
    }

    // Периодический опрос и ручное обновление наперегонки: последнее событие
    // в канале обязано совпадать с записанным статусом
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn last_event_matches_recorded_status() {
        for _ in 0..50 {
            let detector = Arc::new(PhoneDetector::new(
                ProbeChain::new("usb").with_probe(DryRunProbe::new("usb", vec![true, false])),
                ProbeChain::new("bluetooth"),
                ProbeChain::new("installation"),
            ));
            let tracker = Arc::new(StatusTracker::new());
            let (tx, mut rx) = mpsc::channel(4);

            let tasks: Vec<_> = [StatusEventType::ConnectionChanged, StatusEventType::Refreshed]
                .into_iter()
                .map(|event_type| {
                    let detector = detector.clone();
                    let tracker = tracker.clone();
                    let tx = tx.clone();
                    tokio::spawn(async move {
                        tracker.poll_and_publish(&detector, event_type, &tx).await
                    })
                })
                .collect();
            for task in tasks {
                task.await.unwrap().unwrap();
            }
            drop(tx);

            let mut last = None;
            while let Some(event) = rx.recv().await {
                last = Some(event.status);
            }
            assert_eq!(last, Some(tracker.connection()));
        }
    }

    #[test]
    fn monitoring_flag_toggles() {
        let tracker = StatusTracker::new();
        assert!(!tracker.is_monitoring());
        tracker.start_monitoring();
        assert!(tracker.is_monitoring());
        tracker.stop_monitoring();
        assert!(!tracker.is_monitoring());
    }
}
