use crate::geocoder::{GeocodeReply, GeocoderProvider, GeocoderRequest, GeocoderStatus};
use crate::panel::{GeocodePanel, ListenerHandle};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::error;

const POLL_PERIOD: Duration = Duration::from_secs(1);

/// Watches the place-name input and keeps the coordinate outputs in sync with
/// it, one geocode request per edit burst at most once per poll period.
pub struct LoiWatcher<T>
where
    T: GeocoderProvider + Clone + Send + Sync + 'static,
{
    panel: GeocodePanel,
    service: T,
    poll_period: Duration,
    dirty: Arc<AtomicBool>,
    keyup_listener: Option<ListenerHandle>,
    poll_task: Option<JoinHandle<()>>,
}

impl<T> LoiWatcher<T>
where
    T: GeocoderProvider + Clone + Send + Sync + 'static,
{
    pub fn new(panel: GeocodePanel, service: T) -> Self {
        Self {
            panel,
            service,
            poll_period: POLL_PERIOD,
            dirty: Arc::new(AtomicBool::new(false)),
            keyup_listener: None,
            poll_task: None,
        }
    }

    pub fn with_poll_period(mut self, period: Duration) -> Self {
        self.poll_period = period;
        self
    }

    /// Attaches the key-up listener and spawns the poll task. A second call
    /// on a running watcher is a no-op.
    pub fn start(&mut self) {
        if self.poll_task.is_some() {
            return;
        }

        self.dirty.store(false, Ordering::SeqCst);

        let dirty = self.dirty.clone();
        self.keyup_listener = Some(self.panel.loi.listen({
            let dirty = dirty.clone();
            move || dirty.store(true, Ordering::SeqCst)
        }));

        let panel = self.panel.clone();
        let service = self.service.clone();
        let period = self.poll_period;

        self.poll_task = Some(tokio::spawn(async move {
            // First tick one full period after start, like the page timer
            let mut ticks = time::interval_at(Instant::now() + period, period);
            loop {
                ticks.tick().await;
                poll_step(&dirty, &panel, &service).await;
            }
        }));
    }

    /// Cancels the poll task and detaches the key-up listener; nothing can
    /// touch the panel afterwards.
    pub fn stop(&mut self) {
        if let Some(task) = self.poll_task.take() {
            task.abort();
        }
        if let Some(listener) = self.keyup_listener.take() {
            self.panel.loi.unlisten(&listener);
        }
    }
}

async fn poll_step<T>(dirty: &AtomicBool, panel: &GeocodePanel, service: &T)
where
    T: GeocoderProvider + Clone + Send + Sync,
{
    // The flag is cleared before the request goes out; only another key-up
    // can re-arm the next tick
    if !dirty.swap(false, Ordering::SeqCst) {
        return;
    }

    let input = panel.loi.value();
    if input.is_empty() {
        return;
    }

    let request = GeocoderRequest {
        input,
        service: service.clone(),
    };

    render_reply(panel, request.geocode().await);
}

fn render_reply(panel: &GeocodePanel, reply: GeocodeReply) {
    if let GeocoderStatus::Unrecognised(raw) = &reply.status {
        error!("Strange geocoder status: {raw}");
        panel.output.clear_text();
        return;
    }

    if let Some(message) = reply.status.user_message() {
        panel.output.show_error(message);
        return;
    }

    match reply.results.first() {
        Some(position) => {
            panel.lng.set_number(position.longitude);
            panel.lat.set_number(position.latitude);
            panel.output.show(&position.to_string());
        }
        None => {
            error!("Geocoder reported OK without any results");
            panel.output.clear_text();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocoder::mock::MockGeocoderProvider;
    use crate::utils::maptypes::GeoPosition;

    fn started_watcher(service: MockGeocoderProvider) -> (GeocodePanel, LoiWatcher<MockGeocoderProvider>) {
        let panel = GeocodePanel::new();
        let mut watcher = LoiWatcher::new(panel.clone(), service);
        watcher.start();
        (panel, watcher)
    }

    #[tokio::test(start_paused = true)]
    async fn test_typed_place_is_geocoded_after_one_period() {
        let service = MockGeocoderProvider::new();
        let (panel, _watcher) = started_watcher(service.clone());

        panel.loi.enter_text("Paris");
        time::sleep(Duration::from_millis(1100)).await;

        assert_eq!(service.requests(), vec!["Paris"]);
        assert_eq!(panel.lng.value(), "2.35");
        assert_eq!(panel.lat.value(), "48.85");
        assert_eq!(panel.output.text(), "(2.35, 48.85)");
        assert!(!panel.output.has_error());
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_burst_coalesces_into_one_request() {
        let service = MockGeocoderProvider::new();
        let (panel, _watcher) = started_watcher(service.clone());

        panel.loi.enter_text("P");
        panel.loi.enter_text("Par");
        panel.loi.enter_text("Paris");
        time::sleep(Duration::from_millis(3500)).await;

        // One request, carrying the value current at the tick
        assert_eq!(service.requests(), vec!["Paris"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_watcher_issues_no_requests() {
        let service = MockGeocoderProvider::new();
        let (panel, _watcher) = started_watcher(service.clone());

        time::sleep(Duration::from_millis(5500)).await;

        assert!(service.requests().is_empty());
        assert_eq!(panel.output.text(), "");
    }

    #[tokio::test(start_paused = true)]
    async fn test_emptied_field_issues_no_request() {
        let panel = GeocodePanel::new();
        let service = MockGeocoderProvider::new();
        let mut watcher = LoiWatcher::new(panel.clone(), service.clone())
            .with_poll_period(Duration::from_millis(100));
        watcher.start();

        panel.loi.enter_text("");
        time::sleep(Duration::from_millis(350)).await;

        assert!(service.requests().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_results_keeps_previous_coordinates() {
        let service = MockGeocoderProvider::new();
        let (panel, _watcher) = started_watcher(service.clone());

        panel.loi.enter_text("Paris");
        time::sleep(Duration::from_millis(1100)).await;

        panel.loi.enter_text("asdkjhasd");
        time::sleep(Duration::from_millis(1100)).await;

        assert_eq!(service.requests(), vec!["Paris", "asdkjhasd"]);
        assert_eq!(panel.output.text(), "That doesn't look like an actual place…");
        assert!(panel.output.has_error());
        assert_eq!(panel.lng.value(), "2.35");
        assert_eq!(panel.lat.value(), "48.85");
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_detaches_timer_and_listener() {
        let service = MockGeocoderProvider::new();
        let (panel, mut watcher) = started_watcher(service.clone());

        watcher.stop();

        panel.loi.enter_text("Paris");
        time::sleep(Duration::from_millis(3500)).await;

        assert!(service.requests().is_empty());
        assert_eq!(panel.output.text(), "");
        assert_eq!(panel.lng.value(), "");
        assert_eq!(panel.lat.value(), "");
    }

    #[test]
    fn test_each_failure_status_renders_its_message() {
        let cases = [
            (
                GeocoderStatus::Error,
                "Can't reach the mapping service. Check your internet connection.",
            ),
            (GeocoderStatus::InvalidRequest, "Can't convert to a location."),
            (
                GeocoderStatus::OverQueryLimit,
                "I've made too many geocoding requests.",
            ),
            (
                GeocoderStatus::RequestDenied,
                "I'm not allowed to ask the mapping service to convert places into coordinates.",
            ),
            (
                GeocoderStatus::UnknownError,
                "Something went wrong. Please try again.",
            ),
            (
                GeocoderStatus::ZeroResults,
                "That doesn't look like an actual place…",
            ),
        ];

        for (status, message) in cases {
            let panel = GeocodePanel::new();
            render_reply(&panel, GeocodeReply::failed(status));

            assert_eq!(panel.output.text(), message);
            assert!(panel.output.has_error());
            assert_eq!(panel.lng.value(), "");
            assert_eq!(panel.lat.value(), "");
        }
    }

    #[test]
    fn test_ok_reply_writes_coordinates_and_clears_marker() {
        let panel = GeocodePanel::new();
        panel.output.show_error("Something went wrong. Please try again.");

        render_reply(
            &panel,
            GeocodeReply::ok(vec![
                GeoPosition {
                    latitude: 56.78,
                    longitude: 12.34,
                },
                GeoPosition {
                    latitude: 1.0,
                    longitude: 1.0,
                },
            ]),
        );

        assert_eq!(panel.lng.value(), "12.34");
        assert_eq!(panel.lat.value(), "56.78");
        assert_eq!(panel.output.text(), "(12.34, 56.78)");
        assert!(!panel.output.has_error());
    }

    #[test]
    fn test_unrecognised_status_clears_text_only() {
        let panel = GeocodePanel::new();
        panel.output.show_error("Something went wrong. Please try again.");

        render_reply(
            &panel,
            GeocodeReply::failed(GeocoderStatus::Unrecognised("HUH".to_string())),
        );

        assert_eq!(panel.output.text(), "");
        assert!(panel.output.has_error());
    }

    #[test]
    fn test_ok_without_results_clears_text_only() {
        let panel = GeocodePanel::new();

        render_reply(&panel, GeocodeReply::ok(Vec::new()));

        assert_eq!(panel.output.text(), "");
        assert_eq!(panel.lng.value(), "");
        assert_eq!(panel.lat.value(), "");
    }
}
