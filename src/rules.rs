//! Actor, player and resource catalog consumed by the generator.
//!
//! Only the parts of a game ruleset the generator needs are modelled: which
//! actor marks a spawn point, which actors seed resources (and what they
//! seed), and the base player records every map starts with.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{read_catalog_file, CatalogError};

pub const BUILTIN_RULESET: &str = include_str!("data/ruleset.json");

/// An actor type. Names starting with `^` are abstract parents.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ActorInfo {
    /// Resource type this actor grows around itself, if any.
    #[serde(default)]
    pub seeds_resource: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResourceTypeInfo {
    pub name: String,
    /// Non-zero id written into the resource layer.
    pub id: u8,
    pub max_density: u8,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerReference {
    pub name: String,
    #[serde(default)]
    pub playable: bool,
    #[serde(default)]
    pub owns_world: bool,
    #[serde(default)]
    pub non_combatant: bool,
    #[serde(default = "default_faction")]
    pub faction: String,
    #[serde(default)]
    pub enemies: Vec<String>,
}

fn default_faction() -> String {
    "Random".to_string()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ruleset {
    pub spawn_actor: String,
    pub neutral_player: String,
    pub creep_player: String,
    /// Tallest terrain the map grid supports; also the extra rows the map is padded with.
    pub max_terrain_height: u8,
    pub actors: BTreeMap<String, ActorInfo>,
    pub resource_types: Vec<ResourceTypeInfo>,
    pub players: Vec<PlayerReference>,
}

/// Ruleset precondition a generation run could not satisfy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MissingPrerequisite {
    #[error("ruleset has no spawn actor `{0}`")]
    SpawnActor(String),
    #[error("ruleset has no `{0}` player")]
    Player(String),
    #[error("ruleset has no concrete resource-seeding actor")]
    ResourceActor,
    #[error("actor `{actor}` seeds unknown resource type `{resource}`")]
    ResourceType { actor: String, resource: String },
}

/// What a generation run resolved from the ruleset before placing anything.
#[derive(Clone, Debug, PartialEq)]
pub struct Prerequisites {
    pub spawn_actor: String,
    pub mine_actor: String,
    pub resource: ResourceTypeInfo,
}

impl Ruleset {
    pub fn builtin() -> Self {
        Self::from_json(BUILTIN_RULESET).expect("embedded ruleset is valid")
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &str) -> Result<Self, CatalogError> {
        Self::from_json(&read_catalog_file(path)?)
    }

    pub fn player(&self, name: &str) -> Option<&PlayerReference> {
        self.players.iter().find(|p| p.name == name)
    }

    /// Concrete actors that seed resources, in name order.
    pub fn mine_actors(&self) -> impl Iterator<Item = (&String, &String)> {
        self.actors
            .iter()
            .filter(|(name, _)| !name.starts_with('^'))
            .filter_map(|(name, info)| info.seeds_resource.as_ref().map(|r| (name, r)))
    }

    pub fn resource_type(&self, name: &str) -> Option<&ResourceTypeInfo> {
        self.resource_types.iter().find(|t| t.name == name)
    }

    /// Check everything a run needs. The first resource-seeding actor becomes the mine.
    pub fn resolve_prerequisites(&self) -> Result<Prerequisites, MissingPrerequisite> {
        if !self.actors.contains_key(&self.spawn_actor) {
            return Err(MissingPrerequisite::SpawnActor(self.spawn_actor.clone()));
        }
        for name in [&self.neutral_player, &self.creep_player] {
            if self.player(name).is_none() {
                return Err(MissingPrerequisite::Player(name.clone()));
            }
        }

        let (mine_actor, resource_name) = self.mine_actors().next().ok_or(MissingPrerequisite::ResourceActor)?;
        let resource = self
            .resource_type(resource_name)
            .ok_or_else(|| MissingPrerequisite::ResourceType {
                actor: mine_actor.clone(),
                resource: resource_name.clone(),
            })?
            .clone();

        Ok(Prerequisites {
            spawn_actor: self.spawn_actor.clone(),
            mine_actor: mine_actor.clone(),
            resource,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_ruleset_resolves() {
        let rules = Ruleset::builtin();
        let pre = rules.resolve_prerequisites().unwrap();
        assert_eq!(pre.spawn_actor, "mpspawn");
        assert_eq!(pre.mine_actor, "mine");
        assert_eq!(pre.resource.name, "Ore");
        assert!(pre.resource.id > 0);
    }

    #[test]
    fn test_abstract_actors_are_never_mines() {
        let rules = Ruleset::builtin();
        assert!(rules.mine_actors().all(|(name, _)| !name.starts_with('^')));
    }

    #[test]
    fn test_missing_prerequisites_are_named() {
        let mut rules = Ruleset::builtin();
        rules.actors.remove("mpspawn");
        assert_eq!(
            rules.resolve_prerequisites(),
            Err(MissingPrerequisite::SpawnActor("mpspawn".into()))
        );

        let mut rules = Ruleset::builtin();
        rules.players.retain(|p| p.name != "Creeps");
        assert_eq!(
            rules.resolve_prerequisites(),
            Err(MissingPrerequisite::Player("Creeps".into()))
        );

        let mut rules = Ruleset::builtin();
        rules.actors.retain(|_, info| info.seeds_resource.is_none());
        assert_eq!(rules.resolve_prerequisites(), Err(MissingPrerequisite::ResourceActor));

        let mut rules = Ruleset::builtin();
        rules.resource_types.clear();
        assert!(matches!(
            rules.resolve_prerequisites(),
            Err(MissingPrerequisite::ResourceType { .. })
        ));
    }
}
