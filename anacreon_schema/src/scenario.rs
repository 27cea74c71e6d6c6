//! Static scenario data: one element per trait, resource, unit type and so on.
//!
//! Loaded once through `getGameInfo` and read-only for the rest of a session.

use std::collections::{HashMap, HashSet};

use ahash::RandomState;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::resolve::parse_sovereign;
use crate::sovereign::SovereignObject;
use crate::Location;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    BureauOfTrade,
    Commodity,
    Culture,
    Designation,
    Doctrine,
    Feature,
    FixedUnit,
    GroundUnit,
    Improvement,
    Industry,
    LamUnit,
    ManeuveringUnit,
    OrbitalUnit,
    Rebellion,
    WorldClass,
    Other(String),
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        match value.as_str() {
            "bureauOfTrade" => Category::BureauOfTrade,
            "commodity" => Category::Commodity,
            "culture" => Category::Culture,
            "designation" => Category::Designation,
            "doctrine" => Category::Doctrine,
            "feature" => Category::Feature,
            "fixedUnit" => Category::FixedUnit,
            "groundUnit" => Category::GroundUnit,
            "improvement" => Category::Improvement,
            "industry" => Category::Industry,
            "LAMUnit" => Category::LamUnit,
            "maneuveringUnit" => Category::ManeuveringUnit,
            "orbitalUnit" => Category::OrbitalUnit,
            "rebellion" => Category::Rebellion,
            "worldClass" => Category::WorldClass,
            _ => Category::Other(value),
        }
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        let name = match value {
            Category::BureauOfTrade => "bureauOfTrade",
            Category::Commodity => "commodity",
            Category::Culture => "culture",
            Category::Designation => "designation",
            Category::Doctrine => "doctrine",
            Category::Feature => "feature",
            Category::FixedUnit => "fixedUnit",
            Category::GroundUnit => "groundUnit",
            Category::Improvement => "improvement",
            Category::Industry => "industry",
            Category::LamUnit => "LAMUnit",
            Category::ManeuveringUnit => "maneuveringUnit",
            Category::OrbitalUnit => "orbitalUnit",
            Category::Rebellion => "rebellion",
            Category::WorldClass => "worldClass",
            Category::Other(other) => return other,
        };
        name.to_string()
    }
}

pub const ROLE_TECH_ADVANCE: &str = "techAdvance";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioInfoElement {
    pub is_cargo: Option<bool>,
    pub player_alloc: Option<bool>,
    pub player_product_alloc: Option<bool>,
    pub image_label: Option<i64>,
    pub hidden: Option<bool>,
    pub designation_only: Option<bool>,
    pub npe_only: Option<bool>,
    pub is_jump_beacon: Option<bool>,
    pub can_land: Option<bool>,
    pub category: Option<Category>,
    #[serde(rename = "class")]
    pub scenario_info_class: Option<String>,
    pub id: Option<i64>,
    pub image_large: Option<Vec<i64>>,
    pub image_small: Option<Vec<i64>>,
    pub mass: Option<f64>,
    pub name_desc: Option<String>,
    pub unid: Option<String>,
    pub attack_value: Option<f64>,
    pub short_name: Option<String>,
    pub stats: Option<Vec<Value>>,
    pub build_time: Option<i64>,
    pub description: Option<String>,
    pub image_medium: Option<Vec<i64>>,
    pub min_tech_level: Option<i64>,
    pub role: Option<String>,
    /// Structures this one can be upgraded from.
    pub build_upgrade: Option<Vec<i64>>,
    /// Traits this trait supersedes.
    pub inherit_from: Option<Vec<i64>>,
    pub exports: Option<Vec<i64>>,
    pub max_tech_level: Option<i64>,
    pub primary_industry: Option<i64>,
    pub requirements: Option<Vec<i64>>,
    pub build_exclusions: Option<Vec<i64>>,
    pub tech_level_advance: Option<i64>,
    pub background_color: Option<Vec<i64>>,
    pub background_image: Option<Vec<i64>>,
    pub background_image_low_detail: Option<Vec<i64>>,
    pub background_image_tactical: Option<Vec<i64>>,
    pub exclusions: Option<Vec<i64>>,
    pub ftl: Option<i64>,
    pub capital_industry: Option<i64>,
    pub capital_type: Option<i64>,
    pub build_requirements: Option<Vec<i64>>,
    pub cargo_space: Option<f64>,
    pub map_feature_size: Option<i64>,
    pub map_size: Option<Vec<i64>>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    #[serde(rename = "capitalObjID")]
    pub capital_obj_id: i64,
    #[serde(rename = "gameID")]
    pub game_id: String,
    pub map_bookmarks: Vec<Location>,
    #[serde(rename = "sovereignID")]
    pub sovereign_id: i64,
    pub ui_options: Option<Value>,
    pub username: String,
}

/// Response of `getGameInfo`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameInfo {
    pub scenario_info: Vec<ScenarioInfoElement>,
    #[serde(deserialize_with = "deserialize_sovereigns")]
    pub sovereigns: Vec<SovereignObject>,
    pub user_info: UserInfo,
}

fn deserialize_sovereigns<'de, D>(deserializer: D) -> Result<Vec<SovereignObject>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as _;

    Vec::<Value>::deserialize(deserializer)?
        .iter()
        .map(|value| parse_sovereign(value).map_err(D::Error::custom))
        .collect()
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RulesetError {
    #[error("trait {0} is not in the scenario info")]
    UnknownTrait(i64),
    #[error("no scenario info element has unid `{0}`")]
    UnknownUnid(String),
}

/// Scenario info indexed by id and unid.
#[derive(Debug, Clone, Default)]
pub struct Ruleset {
    elements: Vec<ScenarioInfoElement>,
    by_id: HashMap<i64, usize, RandomState>,
    by_unid: HashMap<String, usize, RandomState>,
}

impl Ruleset {
    pub fn new(elements: Vec<ScenarioInfoElement>) -> Self {
        let mut by_id = HashMap::with_capacity_and_hasher(elements.len(), RandomState::new());
        let mut by_unid = HashMap::with_capacity_and_hasher(elements.len(), RandomState::new());
        for (index, element) in elements.iter().enumerate() {
            if let Some(id) = element.id {
                by_id.insert(id, index);
            }
            if let Some(unid) = &element.unid {
                by_unid.insert(unid.clone(), index);
            }
        }
        Self {
            elements,
            by_id,
            by_unid,
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScenarioInfoElement> {
        self.elements.iter()
    }

    pub fn get(&self, id: i64) -> Option<&ScenarioInfoElement> {
        self.by_id.get(&id).map(|&index| &self.elements[index])
    }

    pub fn require(&self, id: i64) -> Result<&ScenarioInfoElement, RulesetError> {
        self.get(id).ok_or(RulesetError::UnknownTrait(id))
    }

    pub fn find_by_unid(&self, unid: &str) -> Result<&ScenarioInfoElement, RulesetError> {
        self.by_unid
            .get(unid)
            .map(|&index| &self.elements[index])
            .ok_or_else(|| RulesetError::UnknownUnid(unid.to_string()))
    }

    /// Whether `child` supersedes `parent` anywhere up its inheritance chain.
    /// A world with abundant deposits of a resource also has plain deposits.
    pub fn trait_inherits_from(&self, child: i64, parent: i64) -> Result<bool, RulesetError> {
        self.reaches(child, parent, |element| element.inherit_from.as_deref())
    }

    /// Whether `advanced` needs `base` somewhere in its upgrade chain, e.g. a
    /// sealed arcology needs a domed city.
    pub fn trait_depends_on(&self, advanced: i64, base: i64) -> Result<bool, RulesetError> {
        self.reaches(advanced, base, |element| element.build_upgrade.as_deref())
    }

    fn reaches<F>(&self, start: i64, target: i64, edges: F) -> Result<bool, RulesetError>
    where
        F: Fn(&ScenarioInfoElement) -> Option<&[i64]>,
    {
        let mut visited = HashSet::with_hasher(RandomState::new());
        let mut pending = vec![start];
        while let Some(id) = pending.pop() {
            if !visited.insert(id) {
                continue;
            }
            let Some(next) = edges(self.require(id)?) else {
                continue;
            };
            if next.contains(&target) {
                return Ok(true);
            }
            pending.extend_from_slice(next);
        }
        Ok(false)
    }
}

impl From<Vec<ScenarioInfoElement>> for Ruleset {
    fn from(elements: Vec<ScenarioInfoElement>) -> Self {
        Ruleset::new(elements)
    }
}
