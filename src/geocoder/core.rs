use crate::utils::maptypes::GeoPosition;

#[derive(Clone, Debug, PartialEq)]
pub enum GeocoderStatus {
    Ok,
    ZeroResults,
    OverQueryLimit,
    RequestDenied,
    InvalidRequest,
    UnknownError,
    Error,
    Unrecognised(String),
}

impl From<&str> for GeocoderStatus {
    fn from(value: &str) -> Self {
        match value {
            "OK" => Self::Ok,
            "ZERO_RESULTS" => Self::ZeroResults,
            "OVER_QUERY_LIMIT" => Self::OverQueryLimit,
            "REQUEST_DENIED" => Self::RequestDenied,
            "INVALID_REQUEST" => Self::InvalidRequest,
            "UNKNOWN_ERROR" => Self::UnknownError,
            "ERROR" => Self::Error,
            other => Self::Unrecognised(other.to_string()),
        }
    }
}

impl GeocoderStatus {
    /// The fixed dashboard message for this status. `None` for `Ok` and for
    /// unrecognised statuses, which render no message at all.
    pub fn user_message(&self) -> Option<&'static str> {
        match self {
            Self::Ok | Self::Unrecognised(_) => None,
            Self::Error => {
                Some("Can't reach the mapping service. Check your internet connection.")
            }
            Self::InvalidRequest => Some("Can't convert to a location."),
            Self::OverQueryLimit => Some("I've made too many geocoding requests."),
            Self::RequestDenied => {
                Some("I'm not allowed to ask the mapping service to convert places into coordinates.")
            }
            Self::UnknownError => Some("Something went wrong. Please try again."),
            Self::ZeroResults => Some("That doesn't look like an actual place…"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GeocodeReply {
    pub status: GeocoderStatus,
    pub results: Vec<GeoPosition>,
}

impl GeocodeReply {
    pub fn ok(results: Vec<GeoPosition>) -> Self {
        Self {
            status: GeocoderStatus::Ok,
            results,
        }
    }

    pub fn failed(status: GeocoderStatus) -> Self {
        Self {
            status,
            results: Vec::new(),
        }
    }
}

#[async_trait::async_trait]
pub trait GeocoderProvider {
    async fn geocode(&self, input: &str) -> GeocodeReply;
}

#[derive(Clone, Debug)]
pub struct GeocoderRequest<T>
where
    T: GeocoderProvider,
{
    pub input: String,
    pub service: T,
}

impl<T> GeocoderRequest<T>
where
    T: GeocoderProvider,
{
    pub async fn geocode(&self) -> GeocodeReply {
        self.service.geocode(&self.input).await
    }
}
