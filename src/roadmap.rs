//! Learning-roadmap request built from the achievement ledger.
//!
//! The roadmap itself is generated by an external HTTP service; this module
//! only shapes the request and decodes the reply.

use crate::achievements::{AchievementCategory, AchievementLedger};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum RoadmapError {
    #[error("roadmap request failed: {0}")]
    Transport(#[from] Box<ureq::Error>),
    #[error("roadmap response unreadable: {0}")]
    Decode(#[from] std::io::Error),
    /// The service answered with `success: false`.
    #[error("roadmap service refused: {0}")]
    Service(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapRequest {
    pub completed_mudras: usize,
    pub completed_dances: usize,
    pub completed_poses: usize,
    pub total_score: u32,
}

impl RoadmapRequest {
    pub fn from_ledger(ledger: &AchievementLedger) -> Self {
        Self {
            completed_mudras: ledger.count_in(AchievementCategory::Mudras),
            completed_dances: ledger.count_in(AchievementCategory::Performances),
            completed_poses: ledger.count_in(AchievementCategory::Poses),
            total_score: ledger.total_points(),
        }
    }
}

/// Skills a milestone is expected to add.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectedStats {
    pub mudras: u32,
    pub dances: u32,
    pub poses: u32,
    pub score: u32,
}

/// One milestone of the generated roadmap.
///
/// Nodes are written by a language model, so everything past the title
/// falls back to a default when missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapNode {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub practice_link: Option<String>,
    /// Days, usually sent as a string (`"30"`) but sometimes as a number.
    #[serde(default)]
    pub time_required: Option<serde_json::Value>,
    /// Percent of the milestone already covered.
    #[serde(default)]
    pub current_progress: f64,
    #[serde(default)]
    pub projected_stats: ProjectedStats,
}

impl RoadmapNode {
    pub fn time_required_days(&self) -> Option<u32> {
        match self.time_required.as_ref()? {
            serde_json::Value::String(s) => s.trim().parse().ok(),
            serde_json::Value::Number(n) => n.as_u64().and_then(|d| u32::try_from(d).ok()),
            _ => None,
        }
    }
}

/// Edge between two milestones in the 3D roadmap view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapPath {
    pub start: [f64; 3],
    pub end: [f64; 3],
    #[serde(default)]
    pub is_completed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Roadmap {
    #[serde(default)]
    pub nodes: Vec<RoadmapNode>,
    #[serde(default)]
    pub paths: Vec<RoadmapPath>,
}

/// Envelope every reply comes in, success or not.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoadmapResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub roadmap: Option<Roadmap>,
    #[serde(default)]
    pub error: Option<String>,
}

impl RoadmapResponse {
    pub fn into_roadmap(self) -> Result<Roadmap, RoadmapError> {
        match (self.success, self.roadmap) {
            (true, Some(roadmap)) => Ok(roadmap),
            _ => Err(RoadmapError::Service(
                self.error
                    .unwrap_or_else(|| "reply carried no roadmap".to_string()),
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RoadmapClient {
    endpoint: String,
}

impl RoadmapClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST the request and decode the reply. Error statuses still carry
    /// the JSON envelope, so their message is surfaced as `Service`.
    pub fn fetch(&self, request: &RoadmapRequest) -> Result<Roadmap, RoadmapError> {
        log::debug!("requesting roadmap from {}", self.endpoint);
        let response = match ureq::post(&self.endpoint)
            .timeout(REQUEST_TIMEOUT)
            .set("User-Agent", "natya")
            .send_json(request)
        {
            Ok(response) => response,
            Err(ureq::Error::Status(code, response)) => {
                log::warn!("roadmap service answered {}", code);
                response
            }
            Err(e) => return Err(Box::new(e).into()),
        };
        let reply: RoadmapResponse = response.into_json()?;
        reply.into_roadmap()
    }
}
