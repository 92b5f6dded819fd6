use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::common::{DomainError, DomainResult};
use crate::domains::routing::ports::VenueDataSource;
use crate::domains::routing::types::VenueArea;

/// Resolve the venue data directory.
/// Precedence: VENUE_DATA_DIR env var -> ./resources/venue -> /usr/share/inmaps-router/venue
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(v) = env::var("VENUE_DATA_DIR") {
        return PathBuf::from(v);
    }
    let cwd_default = Path::new("resources/venue");
    if cwd_default.exists() {
        return cwd_default.to_path_buf();
    }
    PathBuf::from("/usr/share/inmaps-router/venue")
}

/// Reads venue areas from JSON files under a base directory.
///
/// A file holds an array of records shaped like
/// `{"name": .., "type": "booth", "area": {"start": {"x": .., "y": ..}, "end": {..}}}`
/// with an optional `description`.
pub struct FilesystemVenueSource {
    base: PathBuf,
}

impl FilesystemVenueSource {
    pub fn new(base: Option<PathBuf>) -> Self {
        Self {
            base: base.unwrap_or_else(resolve_data_dir),
        }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Write areas to `name`, creating the base directory as needed.
    pub fn save_areas(&self, name: &str, areas: &[VenueArea]) -> DomainResult<()> {
        if !self.base.exists() {
            fs::create_dir_all(&self.base)
                .map_err(|e| DomainError::InfrastructureError(format!("{}", e)))?;
        }
        let json = serde_json::to_string_pretty(areas)?;
        fs::write(self.base.join(name), json)
            .map_err(|e| DomainError::InfrastructureError(format!("{}", e)))?;
        Ok(())
    }
}

impl VenueDataSource for FilesystemVenueSource {
    fn load_areas(&self, name: &str) -> DomainResult<Vec<VenueArea>> {
        let path = self.base.join(name);
        let content = fs::read_to_string(&path)
            .map_err(|e| DomainError::InfrastructureError(format!("{}: {}", path.display(), e)))?;
        let areas: Vec<VenueArea> = serde_json::from_str(&content)?;
        Ok(areas)
    }
}
