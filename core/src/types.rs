//! Raw upstream payloads.
//!
//! # Design
//! These mirror the catalog's JSON but only the fields the transformer reads.
//! Fields that the upstream is known to null out or omit carry
//! `#[serde(default)]` so a sparse entity still decodes. The mock-server
//! crate defines its own fixtures independently; integration tests catch
//! schema drift between the two.

use serde::{Deserialize, Serialize};

/// `{ name, url }` reference used throughout the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NamedResource {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// `GET /pokemon?limit=&offset=`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PokemonListResponse {
    pub count: usize,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<NamedResource>,
}

/// `GET /pokemon/{idOrName}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Pokemon {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub base_experience: Option<u32>,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub weight: u32,
    #[serde(default)]
    pub sprites: Sprites,
    #[serde(default)]
    pub types: Vec<TypeSlot>,
    #[serde(default)]
    pub stats: Vec<Stat>,
    #[serde(default)]
    pub abilities: Vec<AbilitySlot>,
    #[serde(default)]
    pub moves: Vec<MoveSlot>,
}

impl Pokemon {
    /// Base value of the first stat named `name`.
    pub fn base_stat(&self, name: &str) -> Option<u32> {
        self.stats
            .iter()
            .find(|s| s.stat.name == name)
            .map(|s| s.base_stat)
    }

    /// Type names in slot order as delivered.
    pub fn type_names(&self) -> Vec<String> {
        self.types.iter().map(|t| t.kind.name.clone()).collect()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Sprites {
    #[serde(default)]
    pub front_default: Option<String>,
    #[serde(default)]
    pub other: OtherSprites,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OtherSprites {
    #[serde(rename = "official-artwork", default)]
    pub official_artwork: Artwork,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Artwork {
    #[serde(default)]
    pub front_default: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TypeSlot {
    pub slot: u8,
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Stat {
    pub base_stat: u32,
    #[serde(default)]
    pub effort: u32,
    pub stat: NamedResource,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AbilitySlot {
    pub ability: NamedResource,
    #[serde(default)]
    pub is_hidden: bool,
    #[serde(default)]
    pub slot: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MoveSlot {
    #[serde(rename = "move")]
    pub move_ref: NamedResource,
    #[serde(default)]
    pub version_group_details: Vec<VersionGroupDetail>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VersionGroupDetail {
    pub level_learned_at: u32,
    pub move_learn_method: NamedResource,
}

/// `GET /move/{name}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MoveDetail {
    pub id: u32,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NamedResource,
    #[serde(default)]
    pub power: Option<u32>,
    #[serde(default)]
    pub pp: Option<u32>,
    #[serde(default)]
    pub accuracy: Option<u32>,
}

/// `GET /evolution-chain/{id}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvolutionChainResponse {
    pub id: u32,
    pub chain: EvolutionChainLink,
}

/// One node of the evolution tree; `evolves_to` may branch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvolutionChainLink {
    pub species: NamedResource,
    #[serde(default)]
    pub evolves_to: Vec<EvolutionChainLink>,
}

/// `GET /pokemon-species/{idOrName}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PokemonSpecies {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub evolution_chain: Option<ResourceLink>,
}

/// `{ url }` reference without a name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResourceLink {
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_full_pokemon_payload() {
        let raw = r#"{
            "id": 25,
            "name": "pikachu",
            "base_experience": 112,
            "height": 4,
            "weight": 60,
            "sprites": {
                "front_default": "https://img/25.png",
                "other": {"official-artwork": {"front_default": "https://art/25.png"}}
            },
            "types": [{"slot": 1, "type": {"name": "electric", "url": "u"}}],
            "stats": [
                {"base_stat": 35, "effort": 0, "stat": {"name": "hp", "url": "u"}},
                {"base_stat": 90, "effort": 2, "stat": {"name": "speed", "url": "u"}}
            ],
            "abilities": [{"ability": {"name": "static", "url": "u"}, "is_hidden": false, "slot": 1}],
            "moves": [{"move": {"name": "thunder-shock", "url": "u"}, "version_group_details": [
                {"level_learned_at": 1, "move_learn_method": {"name": "level-up", "url": "u"}}
            ]}]
        }"#;
        let pokemon: Pokemon = serde_json::from_str(raw).unwrap();
        assert_eq!(pokemon.id, 25);
        assert_eq!(pokemon.base_experience, Some(112));
        assert_eq!(
            pokemon.sprites.other.official_artwork.front_default.as_deref(),
            Some("https://art/25.png")
        );
        assert_eq!(pokemon.type_names(), vec!["electric".to_string()]);
        assert_eq!(pokemon.base_stat("speed"), Some(90));
        assert_eq!(pokemon.base_stat("attack"), None);
        assert_eq!(pokemon.moves[0].move_ref.name, "thunder-shock");
    }

    #[test]
    fn sparse_pokemon_still_decodes() {
        let pokemon: Pokemon =
            serde_json::from_str(r#"{"id": 0, "name": "missingno", "base_experience": null}"#)
                .unwrap();
        assert_eq!(pokemon.base_experience, None);
        assert!(pokemon.sprites.front_default.is_none());
        assert!(pokemon.sprites.other.official_artwork.front_default.is_none());
        assert!(pokemon.abilities.is_empty());
    }

    #[test]
    fn species_without_chain_decodes() {
        let species: PokemonSpecies =
            serde_json::from_str(r#"{"id": 1, "name": "x", "evolution_chain": null}"#).unwrap();
        assert!(species.evolution_chain.is_none());
    }
}
