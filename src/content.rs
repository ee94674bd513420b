use rand::Rng;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

use crate::error::FetchError;

pub const DEFAULT_API_BASE: &str = "https://pokeapi.co/api/v2";
pub const DEFAULT_CATALOG_LIMIT: usize = 1500;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
/// Dex ids used when the list endpoint cannot be reached
const FALLBACK_DEX_SIZE: usize = 151;

/// Identifier shared by the two cards of a pair (the creature's dex number)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentId(pub u32);

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:03}", self.0)
    }
}

/// One entry of the creature list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatureRef {
    pub id: ContentId,
    pub name: String,
    pub detail_url: String,
}

impl CreatureRef {
    pub fn placeholder(id: u32, api_base: &str) -> Self {
        Self {
            id: ContentId(id),
            name: format!("#{id}"),
            detail_url: format!("{}/pokemon/{}/", api_base.trim_end_matches('/'), id),
        }
    }
}

/// Resolved face content of a card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artwork {
    pub name: String,
    pub image_url: String,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    results: Vec<NamedResource>,
}

#[derive(Debug, Deserialize)]
struct NamedResource {
    name: String,
    url: String,
}

#[derive(Debug, Deserialize)]
struct DetailResponse {
    name: String,
    sprites: Sprites,
}

#[derive(Debug, Deserialize)]
struct Sprites {
    other: Option<OtherSprites>,
}

#[derive(Debug, Deserialize)]
struct OtherSprites {
    #[serde(rename = "official-artwork")]
    official_artwork: Option<OfficialArtwork>,
}

#[derive(Debug, Deserialize)]
struct OfficialArtwork {
    front_default: Option<String>,
}

/// Trailing path segment of a resource url, e.g. `.../pokemon/25/` -> 25
pub fn dex_id_from_url(url: &str) -> Option<u32> {
    url.trim_end_matches('/').rsplit('/').next()?.parse().ok()
}

fn into_roster(list: ListResponse) -> Vec<CreatureRef> {
    list.results
        .into_iter()
        .enumerate()
        .map(|(pos, entry)| CreatureRef {
            id: ContentId(dex_id_from_url(&entry.url).unwrap_or(pos as u32 + 1)),
            name: entry.name,
            detail_url: entry.url,
        })
        .collect()
}

fn into_artwork(detail: DetailResponse, url: &str) -> Result<Artwork, FetchError> {
    let image_url = detail
        .sprites
        .other
        .and_then(|o| o.official_artwork)
        .and_then(|a| a.front_default)
        .ok_or_else(|| FetchError::MissingArtwork {
            url: url.to_string(),
        })?;

    Ok(Artwork {
        name: detail.name,
        image_url,
    })
}

/// Read-only client for the creature API
#[derive(Debug, Clone)]
pub struct PokeApi {
    client: reqwest::Client,
    base: String,
    catalog_limit: usize,
}

impl PokeApi {
    pub fn new(base: &str, catalog_limit: usize) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base: base.trim_end_matches('/').to_string(),
            catalog_limit,
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn list_url(&self) -> String {
        format!("{}/pokemon?limit={}", self.base, self.catalog_limit)
    }

    pub async fn roster(&self) -> Result<Vec<CreatureRef>, FetchError> {
        let list: ListResponse = self
            .client
            .get(self.list_url())
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(into_roster(list))
    }

    pub async fn artwork(&self, detail_url: &str) -> Result<Artwork, FetchError> {
        let detail: DetailResponse = self
            .client
            .get(detail_url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        into_artwork(detail, detail_url)
    }

    /// Random distinct placeholders used when the list endpoint fails
    pub fn fallback_roster<R: Rng>(&self, count: usize, rng: &mut R) -> Vec<CreatureRef> {
        rand::seq::index::sample(rng, FALLBACK_DEX_SIZE, count.min(FALLBACK_DEX_SIZE))
            .into_iter()
            .map(|i| CreatureRef::placeholder(i as u32 + 1, &self.base))
            .collect()
    }
}
