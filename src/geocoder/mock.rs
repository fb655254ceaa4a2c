use crate::geocoder::core::{GeocodeReply, GeocoderStatus};
use crate::geocoder::GeocoderProvider;
use crate::utils::maptypes::GeoPosition;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct MockGeocoderProvider {
    replies: HashMap<String, GeocodeReply>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockGeocoderProvider {
    pub fn new() -> Self {
        let mut replies = HashMap::new();

        replies.insert(
            "Paris".to_string(),
            GeocodeReply::ok(vec![GeoPosition {
                latitude: 48.85,
                longitude: 2.35,
            }]),
        );
        replies.insert(
            "London".to_string(),
            GeocodeReply::ok(vec![GeoPosition {
                latitude: 51.5074,
                longitude: -0.1278,
            }]),
        );
        replies.insert(
            "Tokyo".to_string(),
            GeocodeReply::ok(vec![GeoPosition {
                latitude: 35.6762,
                longitude: 139.6503,
            }]),
        );

        Self {
            replies,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    // Helper method to add custom replies for testing
    pub fn with_reply(mut self, input: &str, reply: GeocodeReply) -> Self {
        self.replies.insert(input.to_string(), reply);
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl GeocoderProvider for MockGeocoderProvider {
    async fn geocode(&self, input: &str) -> GeocodeReply {
        self.requests.lock().unwrap().push(input.to_string());

        self.replies
            .get(input)
            .cloned()
            .unwrap_or_else(|| GeocodeReply::failed(GeocoderStatus::ZeroResults))
    }
}
