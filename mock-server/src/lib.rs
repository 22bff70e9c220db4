//! Fixture catalog server.
//!
//! Serves the five read-only catalog routes under `/api/v2` from in-memory
//! fixtures. Paths registered with `Catalog::fail` answer 500, and every
//! request is counted so tests can assert how often the client went to the
//! network.

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
};

use axum::{
    extract::{Path, Query, State},
    http::{StatusCode, Uri},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;

const REFERENCE_BASE: &str = "https://pokeapi.co/api/v2";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PokemonFixture {
    pub id: u32,
    pub name: String,
    pub base_experience: Option<u32>,
    pub height: u32,
    pub weight: u32,
    pub types: Vec<String>,
    pub stats: Vec<(String, u32)>,
    pub abilities: Vec<(String, bool)>,
    pub moves: Vec<String>,
}

impl PokemonFixture {
    pub fn new(id: u32, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            base_experience: None,
            height: 10,
            weight: 100,
            types: Vec::new(),
            stats: Vec::new(),
            abilities: Vec::new(),
            moves: Vec::new(),
        }
    }

    pub fn types(mut self, types: &[&str]) -> Self {
        self.types = types.iter().map(|t| t.to_string()).collect();
        self
    }

    /// hp, attack, defense, special-attack, special-defense, speed.
    pub fn stats(mut self, values: [u32; 6]) -> Self {
        let keys = ["hp", "attack", "defense", "special-attack", "special-defense", "speed"];
        self.stats = keys
            .iter()
            .zip(values)
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        self
    }

    pub fn experience(mut self, base_experience: u32) -> Self {
        self.base_experience = Some(base_experience);
        self
    }

    pub fn ability(mut self, name: &str, hidden: bool) -> Self {
        self.abilities.push((name.to_string(), hidden));
        self
    }

    pub fn moves(mut self, moves: &[&str]) -> Self {
        self.moves = moves.iter().map(|m| m.to_string()).collect();
        self
    }

    fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "name": self.name,
            "base_experience": self.base_experience,
            "height": self.height,
            "weight": self.weight,
            "sprites": {
                "front_default": format!("https://sprites.test/pokemon/{}.png", self.id),
                "other": {
                    "official-artwork": {
                        "front_default": format!("https://sprites.test/artwork/{}.png", self.id)
                    }
                }
            },
            "types": self.types.iter().enumerate().map(|(i, t)| json!({
                "slot": i + 1,
                "type": {"name": t, "url": format!("{REFERENCE_BASE}/type/{t}/")}
            })).collect::<Vec<_>>(),
            "stats": self.stats.iter().map(|(name, value)| json!({
                "base_stat": value,
                "effort": 0,
                "stat": {"name": name, "url": format!("{REFERENCE_BASE}/stat/{name}/")}
            })).collect::<Vec<_>>(),
            "abilities": self.abilities.iter().enumerate().map(|(i, (name, hidden))| json!({
                "ability": {"name": name, "url": format!("{REFERENCE_BASE}/ability/{name}/")},
                "is_hidden": hidden,
                "slot": i + 1
            })).collect::<Vec<_>>(),
            "moves": self.moves.iter().map(|name| json!({
                "move": {"name": name, "url": format!("{REFERENCE_BASE}/move/{name}/")},
                "version_group_details": [{
                    "level_learned_at": 1,
                    "move_learn_method": {"name": "level-up", "url": format!("{REFERENCE_BASE}/move-learn-method/1/")}
                }]
            })).collect::<Vec<_>>()
        })
    }
}

/// Evolution tree node: species name plus branches.
#[derive(Clone, Debug)]
pub struct ChainFixture {
    pub species: String,
    pub evolves_to: Vec<ChainFixture>,
}

impl ChainFixture {
    pub fn new(species: &str, evolves_to: Vec<ChainFixture>) -> Self {
        Self {
            species: species.to_string(),
            evolves_to,
        }
    }

    /// `a → b → c` with no branching.
    pub fn line(names: &[&str]) -> Self {
        let mut iter = names.iter().rev();
        let last = iter.next().copied().unwrap_or_default();
        iter.fold(Self::new(last, Vec::new()), |next, name| {
            Self::new(name, vec![next])
        })
    }

    fn to_json(&self) -> Value {
        json!({
            "species": {
                "name": self.species,
                "url": format!("{REFERENCE_BASE}/pokemon-species/{}/", self.species)
            },
            "evolves_to": self.evolves_to.iter().map(ChainFixture::to_json).collect::<Vec<_>>()
        })
    }

    fn species_names(&self) -> Vec<String> {
        let mut names = vec![self.species.clone()];
        for branch in &self.evolves_to {
            names.extend(branch.species_names());
        }
        names
    }
}

pub type Hits = Arc<Mutex<HashMap<String, usize>>>;

#[derive(Clone, Debug, Default)]
pub struct Catalog {
    pokemon: Vec<PokemonFixture>,
    chains: HashMap<u32, ChainFixture>,
    /// species name → chain id
    species_chain: HashMap<String, u32>,
    moves: HashMap<String, String>,
    failing: HashSet<String>,
    hits: Hits,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Listed in insertion order.
    pub fn pokemon(mut self, fixture: PokemonFixture) -> Self {
        self.pokemon.push(fixture);
        self
    }

    /// Register a chain; every species in it resolves to `id`.
    pub fn chain(mut self, id: u32, chain: ChainFixture) -> Self {
        for name in chain.species_names() {
            self.species_chain.insert(name, id);
        }
        self.chains.insert(id, chain);
        self
    }

    pub fn move_type(mut self, name: &str, kind: &str) -> Self {
        self.moves.insert(name.to_string(), kind.to_string());
        self
    }

    /// Answer 500 for `path`, e.g. `/move/thunderbolt`.
    pub fn fail(mut self, path: &str) -> Self {
        self.failing.insert(path.to_string());
        self
    }

    /// Requests seen for `path` (relative to `/api/v2`, query included).
    pub fn hits(&self, path: &str) -> usize {
        let hits = self.hits.lock().unwrap_or_else(|e| e.into_inner());
        hits.get(path).copied().unwrap_or(0)
    }

    pub fn total_hits(&self) -> usize {
        let hits = self.hits.lock().unwrap_or_else(|e| e.into_inner());
        hits.values().sum()
    }

    /// A small catalog covering a linear line, a branching line, an entity
    /// with no evolution data and a move whose lookup fails.
    pub fn sample() -> Self {
        Catalog::new()
            .pokemon(
                PokemonFixture::new(1, "bulbasaur")
                    .types(&["grass", "poison"])
                    .stats([45, 49, 49, 65, 65, 45])
                    .experience(64)
                    .ability("overgrow", false)
                    .ability("chlorophyll", true)
                    .moves(&["tackle", "vine-whip"]),
            )
            .pokemon(
                PokemonFixture::new(2, "ivysaur")
                    .types(&["grass", "poison"])
                    .stats([60, 62, 63, 80, 80, 60])
                    .experience(142)
                    .ability("overgrow", false),
            )
            .pokemon(
                PokemonFixture::new(3, "venusaur")
                    .types(&["grass", "poison"])
                    .stats([80, 82, 83, 100, 100, 80])
                    .experience(263)
                    .ability("overgrow", false),
            )
            .pokemon(
                PokemonFixture::new(25, "pikachu")
                    .types(&["electric"])
                    .stats([35, 55, 40, 50, 50, 90])
                    .experience(112)
                    .ability("lightning-rod", true)
                    .ability("static", false)
                    .moves(&["thunder-shock", "quick-attack", "thunderbolt"]),
            )
            .pokemon(
                PokemonFixture::new(26, "raichu")
                    .types(&["electric"])
                    .stats([60, 90, 55, 90, 80, 110])
                    .experience(243)
                    .ability("static", false),
            )
            .pokemon(
                PokemonFixture::new(133, "eevee")
                    .types(&["normal"])
                    .stats([55, 55, 50, 45, 65, 55])
                    .experience(65)
                    .ability("run-away", false)
                    .moves(&["tackle"]),
            )
            .pokemon(
                PokemonFixture::new(134, "vaporeon")
                    .types(&["water"])
                    .stats([130, 65, 60, 110, 95, 65])
                    .experience(184)
                    .ability("water-absorb", false),
            )
            .pokemon(
                PokemonFixture::new(135, "jolteon")
                    .types(&["electric"])
                    .stats([65, 65, 60, 110, 95, 130])
                    .experience(184)
                    .ability("volt-absorb", false),
            )
            .pokemon(PokemonFixture::new(0, "missingno").types(&["bird", "normal"]))
            .chain(1, ChainFixture::line(&["bulbasaur", "ivysaur", "venusaur"]))
            .chain(10, ChainFixture::line(&["pichu", "pikachu", "raichu"]))
            .chain(
                67,
                ChainFixture::new(
                    "eevee",
                    vec![
                        ChainFixture::new("vaporeon", Vec::new()),
                        ChainFixture::new("jolteon", Vec::new()),
                    ],
                ),
            )
            .move_type("tackle", "normal")
            .move_type("vine-whip", "grass")
            .move_type("thunder-shock", "electric")
            .move_type("quick-attack", "normal")
            .move_type("thunderbolt", "electric")
            .fail("/move/thunderbolt")
    }

    fn record(&self, uri: &Uri) -> String {
        let path = uri.path().strip_prefix("/api/v2").unwrap_or(uri.path());
        let key = match uri.query() {
            Some(query) => format!("{path}?{query}"),
            None => path.to_string(),
        };
        let mut hits = self.hits.lock().unwrap_or_else(|e| e.into_inner());
        *hits.entry(key).or_insert(0) += 1;
        path.to_string()
    }

    fn find_pokemon(&self, id_or_name: &str) -> Option<&PokemonFixture> {
        match id_or_name.parse::<u32>() {
            Ok(id) => self.pokemon.iter().find(|p| p.id == id),
            Err(_) => self.pokemon.iter().find(|p| p.name == id_or_name),
        }
    }
}

type Reply = Result<Json<Value>, StatusCode>;

pub fn app(catalog: Catalog) -> Router {
    let routes = Router::new()
        .route("/pokemon", get(list_pokemon))
        .route("/pokemon/{id_or_name}", get(get_pokemon))
        .route("/pokemon-species/{id_or_name}", get(get_species))
        .route("/evolution-chain/{id}", get(get_chain))
        .route("/move/{name}", get(get_move));
    Router::new()
        .nest("/api/v2", routes)
        .with_state(Arc::new(catalog))
}

pub async fn run(listener: TcpListener, catalog: Catalog) -> Result<(), std::io::Error> {
    axum::serve(listener, app(catalog)).await
}

/// Checks the failure list and counts the request.
fn guard(catalog: &Catalog, uri: &Uri) -> Result<(), StatusCode> {
    let path = catalog.record(uri);
    if catalog.failing.contains(&path) {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    Ok(())
}

#[derive(Deserialize)]
pub struct ListParams {
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    20
}

async fn list_pokemon(
    State(catalog): State<Arc<Catalog>>,
    uri: Uri,
    Query(params): Query<ListParams>,
) -> Reply {
    guard(&catalog, &uri)?;
    let count = catalog.pokemon.len();
    let results: Vec<Value> = catalog
        .pokemon
        .iter()
        .skip(params.offset)
        .take(params.limit)
        .map(|p| json!({"name": p.name, "url": format!("{REFERENCE_BASE}/pokemon/{}/", p.id)}))
        .collect();

    let next_offset = params.offset + params.limit;
    let next = (next_offset < count).then(|| {
        format!("{REFERENCE_BASE}/pokemon?offset={next_offset}&limit={}", params.limit)
    });
    let previous = (params.offset > 0).then(|| {
        let prev_offset = params.offset.saturating_sub(params.limit);
        format!("{REFERENCE_BASE}/pokemon?offset={prev_offset}&limit={}", params.limit)
    });

    Ok(Json(json!({
        "count": count,
        "next": next,
        "previous": previous,
        "results": results
    })))
}

async fn get_pokemon(
    State(catalog): State<Arc<Catalog>>,
    uri: Uri,
    Path(id_or_name): Path<String>,
) -> Reply {
    guard(&catalog, &uri)?;
    catalog
        .find_pokemon(&id_or_name)
        .map(|p| Json(p.to_json()))
        .ok_or(StatusCode::NOT_FOUND)
}

async fn get_species(
    State(catalog): State<Arc<Catalog>>,
    uri: Uri,
    Path(id_or_name): Path<String>,
) -> Reply {
    guard(&catalog, &uri)?;
    let pokemon = catalog
        .find_pokemon(&id_or_name)
        .ok_or(StatusCode::NOT_FOUND)?;
    let chain_id = catalog
        .species_chain
        .get(&pokemon.name)
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(json!({
        "id": pokemon.id,
        "name": pokemon.name,
        "evolution_chain": {"url": format!("{REFERENCE_BASE}/evolution-chain/{chain_id}/")}
    })))
}

async fn get_chain(
    State(catalog): State<Arc<Catalog>>,
    uri: Uri,
    Path(id): Path<u32>,
) -> Reply {
    guard(&catalog, &uri)?;
    let chain = catalog.chains.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(json!({"id": id, "chain": chain.to_json()})))
}

async fn get_move(
    State(catalog): State<Arc<Catalog>>,
    uri: Uri,
    Path(name): Path<String>,
) -> Reply {
    guard(&catalog, &uri)?;
    let kind = catalog.moves.get(&name).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(json!({
        "id": 1,
        "name": name,
        "type": {"name": kind, "url": format!("{REFERENCE_BASE}/type/{kind}/")},
        "power": 40,
        "pp": 35,
        "accuracy": 100
    })))
}
