use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::application::{RouteRequest, RouteResponse, RouteStatus, RoutingService};
use crate::domains::routing::{AreaBounds, AreaKind, Position2D, VenueArea};

/// One request per line, selected by `op`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum WireRequest {
    Path(RouteRequest),
    Areas,
    Area { id: usize },
}

/// Area as listed to clients, including the computed center.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaView {
    pub id: usize,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: AreaKind,
    pub area: AreaBounds,
    pub center: Position2D,
}

impl AreaView {
    fn new(id: usize, area: &VenueArea) -> Self {
        Self {
            id,
            name: area.name.clone(),
            description: area.description.clone(),
            kind: area.kind,
            area: area.area,
            center: area.center(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WireResponse {
    Route(RouteResponse),
    Areas { areas: Vec<AreaView> },
    Area { area: AreaView },
    Error { status: RouteStatus, error: String },
}

pub fn handle_line(service: &RoutingService, line: &str) -> WireResponse {
    let request: WireRequest = match serde_json::from_str(line) {
        Ok(r) => r,
        Err(e) => {
            return WireResponse::Error {
                status: RouteStatus::InvalidRequest,
                error: format!("malformed request: {}", e),
            }
        }
    };

    match request {
        WireRequest::Path(route) => WireResponse::Route(service.handle(&route)),
        WireRequest::Areas => WireResponse::Areas {
            areas: service
                .context()
                .areas()
                .iter()
                .enumerate()
                .map(|(id, area)| AreaView::new(id, area))
                .collect(),
        },
        WireRequest::Area { id } => match service.context().area(id) {
            Some(area) => WireResponse::Area {
                area: AreaView::new(id, area),
            },
            None => WireResponse::Error {
                status: RouteStatus::NotFound,
                error: format!("no area with id {}", id),
            },
        },
    }
}

/// Answer newline-delimited JSON requests from `reader` until EOF.
/// Returns the number of requests handled; blank lines are skipped.
pub async fn serve_json_lines<R, W>(
    service: &RoutingService,
    reader: R,
    mut writer: W,
) -> anyhow::Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    let mut handled = 0;
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let response = handle_line(service, &line);
        let mut out = serde_json::to_string(&response)?;
        out.push('\n');
        writer.write_all(out.as_bytes()).await?;
        writer.flush().await?;
        handled += 1;
    }
    Ok(handled)
}
