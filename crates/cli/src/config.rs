use anyhow::{Context, Result};
use facetkit::NumericCfg;
use std::fs;
use std::path::Path;

/// Load tolerances from a JSON file, or the defaults when no path is given.
///
/// Missing fields fall back to their defaults; invalid values are rejected.
pub fn load(path: Option<&Path>) -> Result<NumericCfg> {
    let Some(path) = path else {
        return Ok(NumericCfg::default());
    };
    let bytes =
        fs::read(path).with_context(|| format!("reading tolerances {}", path.display()))?;
    let cfg: NumericCfg = serde_json::from_slice(&bytes)
        .with_context(|| format!("parsing tolerances {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("validating tolerances {}", path.display()))?;
    tracing::debug!(
        distance_eps = cfg.distance_eps,
        angle_eps = cfg.angle_eps,
        "tolerances"
    );
    Ok(cfg)
}
