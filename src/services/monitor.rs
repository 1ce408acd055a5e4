use crate::events::{StatusEvent, StatusEventType};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};
use tracing::{debug, info};

use super::detector::PhoneDetector;
use super::status_tracker::StatusTracker;

/// Фоновая задача-производитель: периодически опрашивает подключение и
/// отправляет в консоль только изменения статуса
pub struct ConnectionMonitor {
    detector: Arc<PhoneDetector>,
    tracker: Arc<StatusTracker>,
    interval: Duration,
    events: mpsc::Sender<StatusEvent>,
}

impl ConnectionMonitor {
    pub fn new(
        detector: Arc<PhoneDetector>,
        tracker: Arc<StatusTracker>,
        interval: Duration,
        events: mpsc::Sender<StatusEvent>,
    ) -> Self {
        Self {
            detector,
            tracker,
            interval,
            events,
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    pub async fn run(self) {
        info!("ConnectionMonitor запущен, интервал опроса {}мс", self.interval.as_millis());

        loop {
            sleep(self.interval).await;

            if !self.tracker.is_monitoring() {
                break;
            }

            match self
                .tracker
                .poll_and_publish(&self.detector, StatusEventType::ConnectionChanged, &self.events)
                .await
            {
                Ok((status, true)) => info!("Статус подключения изменился: {}", status),
                Ok((status, false)) => debug!("Статус не изменился: {}", status),
                Err(_) => {
                    debug!("Получатель событий закрыт");
                    break;
                }
            }
        }

        info!("ConnectionMonitor завершил работу");
    }

    /// Внеочередной опрос по запросу пользователя; событие отправляется всегда
    pub fn refresh_now(
        detector: Arc<PhoneDetector>,
        tracker: Arc<StatusTracker>,
        events: mpsc::Sender<StatusEvent>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            if tracker
                .poll_and_publish(&detector, StatusEventType::Refreshed, &events)
                .await
                .is_err()
            {
                debug!("Получатель событий закрыт, результат обновления потерян");
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{ConnectionStatus, ConnectionType};
    use crate::services::probe::{DryRunProbe, ProbeChain};

    fn detector(usb: Vec<bool>) -> Arc<PhoneDetector> {
        Arc::new(PhoneDetector::new(
            ProbeChain::new("usb").with_probe(DryRunProbe::new("usb", usb)),
            ProbeChain::new("bluetooth").with_probe(DryRunProbe::new("bt", vec![false])),
            ProbeChain::new("installation"),
        ))
    }

    #[tokio::test(start_paused = true)]
    async fn emits_only_changes() {
        let tracker = Arc::new(StatusTracker::new());
        tracker.start_monitoring();
        let (tx, mut rx) = mpsc::channel(8);

        let handle = ConnectionMonitor::new(
            detector(vec![false, true, true, false]),
            tracker.clone(),
            Duration::from_secs(5),
            tx,
        )
        .spawn();

        let first = rx.recv().await.unwrap();
        assert_eq!(first.status, ConnectionStatus::Connected(ConnectionType::Usb));
        assert_eq!(first.event_type, StatusEventType::ConnectionChanged);

        let second = rx.recv().await.unwrap();
        assert_eq!(second.status, ConnectionStatus::Disconnected);

        tracker.stop_monitoring();
        handle.await.unwrap();
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn stops_when_receiver_dropped() {
        let tracker = Arc::new(StatusTracker::new());
        tracker.start_monitoring();
        let (tx, rx) = mpsc::channel(1);
        drop(rx);

        let handle = ConnectionMonitor::new(detector(vec![true]), tracker, Duration::from_secs(5), tx).spawn();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn does_not_probe_when_monitoring_disabled() {
        let tracker = Arc::new(StatusTracker::new());
        let (tx, mut rx) = mpsc::channel(1);

        ConnectionMonitor::new(detector(vec![true]), tracker.clone(), Duration::from_secs(5), tx)
            .run()
            .await;

        assert!(rx.recv().await.is_none());
        assert_eq!(tracker.connection(), ConnectionStatus::Disconnected);
    }

    #[tokio::test]
    async fn refresh_sends_unchanged_status() {
        let tracker = Arc::new(StatusTracker::new());
        let (tx, mut rx) = mpsc::channel(1);

        ConnectionMonitor::refresh_now(detector(vec![false]), tracker, tx)
            .await
            .unwrap();

        let event = rx.recv().await.unwrap();
        assert_eq!(event.status, ConnectionStatus::Disconnected);
        assert_eq!(event.event_type, StatusEventType::Refreshed);
    }
}
