// Bundled ontology dataset.
//
// The JSON under data/ is compiled into the binary; there is no runtime I/O.
// Structural validation (unique ids) happens in the store, not here.

use serde::{Deserialize, Serialize};

use super::error::DatasetResult;
use super::{Category, CompoundRule, Phase};

const BUNDLED_ONTOLOGY: &str = include_str!("../../data/ontology.json");

/// The full, immutable ontology: phases in display order, plus the compound
/// rules judged over their categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub phases: Vec<Phase>,
    #[serde(default)]
    pub compound_rules: Vec<CompoundRule>,
}

impl Dataset {
    /// The dataset shipped with the crate.
    pub fn bundled() -> DatasetResult<Self> {
        Self::from_json(BUNDLED_ONTOLOGY)
    }

    pub fn from_json(json: &str) -> DatasetResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Flatten categories, phase order first, then category order.
    pub fn categories(&self) -> impl Iterator<Item = &Category> + '_ {
        self.phases.iter().flat_map(|p| p.categories.iter())
    }
}
