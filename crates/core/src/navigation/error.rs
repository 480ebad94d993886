use trainlcd_transit::StationIdentifier;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NavigationError {
    #[error("no stations available on the active line")]
    TopologyUnavailable,

    #[error("station {0} is not part of the active line")]
    AmbiguousCurrentStation(StationIdentifier),

    #[error("invalid engine configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, NavigationError>;
