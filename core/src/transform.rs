//! Raw entity → view model.
//!
//! # Design
//! `to_table_row` is pure. `to_detail_record` performs two independent
//! enrichments concurrently (moves, evolution line) and joins them. Inside
//! each enrichment, per-item lookups also run concurrently and a failed item
//! degrades to a fallback value instead of failing the record:
//!
//! - move lookup fails → `{ name, type: "normal" }`
//! - stage lookup fails → `{ name, id: 0, sprite: None }`
//! - species or chain lookup fails → empty evolution line
//!
//! Evolution trees are flattened along the first branch only.

use futures::future::join_all;
use tracing::warn;

use crate::client::ResourceClient;
use crate::error::EnrichmentFailure;
use crate::model::{
    Ability, BaseStats, DetailRecord, LineageStage, MoveSummary, TableRow, FALLBACK_MOVE_TYPE,
    UNKNOWN_ABILITY,
};
use crate::types::{EvolutionChainLink, Pokemon};

pub fn to_table_row(pokemon: &Pokemon) -> TableRow {
    let primary_ability = pokemon
        .abilities
        .iter()
        .find(|a| !a.is_hidden)
        .map(|a| a.ability.name.clone())
        .unwrap_or_else(|| UNKNOWN_ABILITY.to_string());

    TableRow {
        id: pokemon.id,
        name: pokemon.name.clone(),
        sprite: pokemon.sprites.front_default.clone(),
        base_experience: pokemon.base_experience.unwrap_or(0),
        types: pokemon.type_names(),
        hp: pokemon.base_stat("hp").unwrap_or(0),
        speed: pokemon.base_stat("speed").unwrap_or(0),
        primary_ability,
    }
}

pub fn batch_to_table_rows(pokemon: &[Pokemon]) -> Vec<TableRow> {
    pokemon.iter().map(to_table_row).collect()
}

/// Build the detail record, fetching at most `max_moves` move details and
/// the evolution line. Never fails; see the module docs for fallbacks.
pub async fn to_detail_record(
    client: &ResourceClient,
    pokemon: &Pokemon,
    max_moves: usize,
) -> DetailRecord {
    let (moves, evolution_chain) = futures::join!(
        resolve_moves(client, pokemon, max_moves),
        resolve_lineage(client, pokemon.id),
    );

    DetailRecord {
        id: pokemon.id,
        name: pokemon.name.clone(),
        artwork: pokemon.sprites.other.official_artwork.front_default.clone(),
        sprite: pokemon.sprites.front_default.clone(),
        types: pokemon.type_names(),
        stats: base_stats(pokemon),
        height: pokemon.height,
        weight: pokemon.weight,
        base_experience: pokemon.base_experience.unwrap_or(0),
        abilities: pokemon
            .abilities
            .iter()
            .map(|a| Ability {
                name: a.ability.name.clone(),
                is_hidden: a.is_hidden,
            })
            .collect(),
        moves,
        evolution_chain,
    }
}

fn base_stats(pokemon: &Pokemon) -> BaseStats {
    let stat = |name| pokemon.base_stat(name).unwrap_or(0);
    BaseStats {
        hp: stat("hp"),
        attack: stat("attack"),
        defense: stat("defense"),
        special_attack: stat("special-attack"),
        special_defense: stat("special-defense"),
        speed: stat("speed"),
    }
}

async fn resolve_moves(
    client: &ResourceClient,
    pokemon: &Pokemon,
    max_moves: usize,
) -> Vec<MoveSummary> {
    let lookups = pokemon.moves.iter().take(max_moves).map(|slot| async move {
        let name = slot.move_ref.name.clone();
        match client.move_detail(&name).await {
            Ok(detail) => MoveSummary {
                name,
                kind: detail.kind.name,
            },
            Err(source) => {
                let failure = EnrichmentFailure::Move {
                    name: name.clone(),
                    source,
                };
                warn!(pokemon = %pokemon.name, "{failure}");
                MoveSummary {
                    name,
                    kind: FALLBACK_MOVE_TYPE.to_string(),
                }
            }
        }
    });
    join_all(lookups).await
}

async fn resolve_lineage(client: &ResourceClient, pokemon_id: u32) -> Vec<LineageStage> {
    match lineage_names(client, pokemon_id).await {
        Ok(names) => join_all(names.into_iter().map(|name| resolve_stage(client, name))).await,
        Err(failure) => {
            warn!("{failure}");
            Vec::new()
        }
    }
}

async fn lineage_names(
    client: &ResourceClient,
    pokemon_id: u32,
) -> Result<Vec<String>, EnrichmentFailure> {
    let absent = |reason: String| EnrichmentFailure::LineageAbsent { pokemon_id, reason };

    let species = client
        .species(pokemon_id)
        .await
        .map_err(|e| absent(e.to_string()))?;
    let chain_url = species
        .evolution_chain
        .map(|link| link.url)
        .ok_or_else(|| absent("species has no evolution chain".to_string()))?;
    let chain_id = chain_id_from_url(&chain_url)
        .ok_or_else(|| absent(format!("no chain id in {chain_url}")))?;
    let chain = client
        .evolution_chain(chain_id)
        .await
        .map_err(|e| absent(e.to_string()))?;

    Ok(flatten_chain(&chain.chain))
}

async fn resolve_stage(client: &ResourceClient, name: String) -> LineageStage {
    match client.pokemon(&name).await {
        Ok(stage) => LineageStage {
            name,
            id: stage.id,
            sprite: stage.sprites.front_default,
        },
        Err(source) => {
            let failure = EnrichmentFailure::LineageStage {
                name: name.clone(),
                source,
            };
            warn!("{failure}");
            LineageStage {
                name,
                id: 0,
                sprite: None,
            }
        }
    }
}

/// Last non-empty `/` segment of a chain url, parsed as an id.
pub fn chain_id_from_url(url: &str) -> Option<u32> {
    url.split('/')
        .filter(|segment| !segment.is_empty())
        .next_back()
        .and_then(|segment| segment.parse().ok())
}

/// Species names from the root down, following only the first branch at
/// every node.
pub fn flatten_chain(link: &EvolutionChainLink) -> Vec<String> {
    let mut names = vec![link.species.name.clone()];
    let mut current = link;
    while let Some(next) = current.evolves_to.first() {
        names.push(next.species.name.clone());
        current = next;
    }
    names
}
