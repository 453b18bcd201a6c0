pub mod frames;
pub mod portfolio;

use anyhow::bail;
use anyhow::Result;

use crate::domain::models::BackendBox;

pub struct BackendManager {}

impl BackendManager {
    pub fn get(name: &str) -> Result<BackendBox> {
        if name == "portfolio" {
            return Ok(Box::<portfolio::Portfolio>::default());
        }

        bail!(format!("No backend implemented for {name}"))
    }
}
