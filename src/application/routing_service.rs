use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::common::{ApplicationResult, DomainError, DomainResult};
use crate::domains::logger::DynLogger;
use crate::domains::routing::{
    BlockingPolicy, GridCell, SearchOutcome, VenueContext, VenueDataSource,
};

/// Routing request as it arrives on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRequest {
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(rename = "from", alias = "from_")]
    pub start: (i32, i32),
    #[serde(rename = "to")]
    pub destination: String,
}

impl RouteRequest {
    pub fn new(start: (i32, i32), destination: impl Into<String>) -> Self {
        Self {
            request_id: None,
            start,
            destination: destination.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteStatus {
    Ok,
    NoPath,
    NotFound,
    Unreachable,
    InvalidRequest,
}

/// Either a non-empty path or the reason there is none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResponse {
    pub request_id: String,
    pub status: RouteStatus,
    pub path: Vec<(i32, i32)>,
    pub goal: Option<(i32, i32)>,
    pub repaired: bool,
    pub error: Option<String>,
}

impl RouteResponse {
    fn failed(request_id: String, error: &DomainError) -> Self {
        let status = match error {
            DomainError::NotFound { .. } => RouteStatus::NotFound,
            DomainError::Unreachable { .. } => RouteStatus::Unreachable,
            _ => RouteStatus::InvalidRequest,
        };
        Self {
            request_id,
            status,
            path: Vec::new(),
            goal: None,
            repaired: false,
            error: Some(error.to_string()),
        }
    }
}

/// A planned route to a named area.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub destination: String,
    pub goal: GridCell,
    pub repaired: bool,
    pub outcome: SearchOutcome,
}

pub struct RoutingService {
    context: Arc<VenueContext>,
    logger: DynLogger,
}

impl RoutingService {
    pub fn new(context: Arc<VenueContext>, logger: DynLogger) -> Self {
        Self { context, logger }
    }

    /// Load areas from `source`, build the venue grid and wrap it in a service.
    /// Any failure here is a startup failure.
    pub fn load(
        source: &dyn VenueDataSource,
        name: &str,
        cell_size: i32,
        policy: BlockingPolicy,
        logger: DynLogger,
    ) -> ApplicationResult<Self> {
        let areas = source.load_areas(name)?;
        logger.info(&format!("Loaded {} venue areas from {}", areas.len(), name));
        let context = VenueContext::initialize(areas, cell_size, policy)?;
        Ok(Self::new(Arc::new(context), logger))
    }

    pub fn context(&self) -> &VenueContext {
        &self.context
    }

    pub fn plan_route(&self, start: GridCell, destination: &str) -> DomainResult<Route> {
        let goal = match self.context.resolve_goal(destination) {
            Ok(goal) => goal,
            Err(e) => {
                self.logger.warn(&format!("Cannot route to {:?}: {}", destination.trim(), e));
                return Err(e);
            }
        };
        self.logger.info(&format!(
            "Routing from {} to {} at grid cell {}",
            start, goal.area.name, goal.nominal
        ));
        if goal.repaired() {
            self.logger
                .warn(&format!("Goal {} is blocked, redirected to {}", goal.nominal, goal.cell));
        }

        let outcome = self.context.find_path(start, goal.cell).inspect_err(|e| {
            self.logger.warn(&format!("Rejected route from {}: {}", start, e));
        })?;
        match outcome.path.last() {
            Some(last) => self.logger.info(&format!(
                "Found path of {} steps, last cell {}, target {}",
                outcome.edge_count(),
                last,
                goal.cell
            )),
            None => self.logger.info(&format!(
                "No path from {} to {} after expanding {} cells",
                start, goal.cell, outcome.nodes_expanded
            )),
        }

        Ok(Route {
            destination: goal.area.name.clone(),
            goal: goal.cell,
            repaired: goal.repaired(),
            outcome,
        })
    }

    pub fn handle(&self, request: &RouteRequest) -> RouteResponse {
        let request_id = request
            .request_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        match self.plan_route(request.start.into(), &request.destination) {
            Ok(route) => RouteResponse {
                request_id,
                status: if route.outcome.found() {
                    RouteStatus::Ok
                } else {
                    RouteStatus::NoPath
                },
                path: route.outcome.path.into_iter().map(Into::into).collect(),
                goal: Some(route.goal.into()),
                repaired: route.repaired,
                error: None,
            },
            Err(e) => RouteResponse::failed(request_id, &e),
        }
    }
}
