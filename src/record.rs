use serde::Deserialize;

/// One reported ping measurement for a target host, as delivered by the
/// backend's `/pings` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PingRecord {
    /// Address of the pinged host. Rendered verbatim, never validated.
    pub ip: String,
    /// Round-trip time of the last ping attempt, in microseconds.
    pub duration: u64,
    /// Wall-clock time of the last successful attempt, ISO-8601.
    /// Absent or unparsable values degrade to a placeholder when rendered.
    #[serde(default)]
    pub time_attempt: Option<String>,
}
