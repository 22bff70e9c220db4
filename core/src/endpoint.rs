//! Request identity construction.
//!
//! The string produced here is both the URL that gets fetched and the cache
//! key, so it must be a pure function of its inputs.

pub const POKEMON: &str = "/pokemon";
pub const POKEMON_SPECIES: &str = "/pokemon-species";
pub const EVOLUTION_CHAIN: &str = "/evolution-chain";
pub const MOVE: &str = "/move";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointBuilder {
    base_url: String,
}

impl EndpointBuilder {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `base + path`, followed by `params` as a query string in the order
    /// supplied. Keys and values are percent-encoded; a repeated key keeps
    /// its first position and takes the last value.
    pub fn build<K, V>(&self, path: &str, params: impl IntoIterator<Item = (K, V)>) -> String
    where
        K: AsRef<str>,
        V: ToString,
    {
        let mut pairs: Vec<(String, String)> = Vec::new();
        for (key, value) in params {
            let key = key.as_ref();
            let value = value.to_string();
            match pairs.iter_mut().find(|(k, _)| k == key) {
                Some(existing) => existing.1 = value,
                None => pairs.push((key.to_string(), value)),
            }
        }

        let mut url = format!("{}{path}", self.base_url);
        if !pairs.is_empty() {
            let query: Vec<String> = pairs
                .iter()
                .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
                .collect();
            url.push('?');
            url.push_str(&query.join("&"));
        }
        url
    }

    /// `base + path` with no query string.
    pub fn path(&self, path: &str) -> String {
        self.build(path, std::iter::empty::<(&str, &str)>())
    }
}
