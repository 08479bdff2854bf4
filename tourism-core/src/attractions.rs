//! Tourist attraction search around a resolved place.
//!
//! Four tag-filtered radius searches feed one candidate pool. Every search
//! shares the same de-duplication set, so a name is credited to the first
//! search that records it. The pooled names are then re-ranked by keywords.

use std::{cmp::Reverse, collections::HashSet};

use tracing::{debug, warn};

use crate::{
    Attraction, PoiElement,
    country::countries_match,
    geocoding::GeocodingResolver,
    provider::{PoiProvider, PoiQuery, TagFilter},
};

pub const DEFAULT_LIMIT: usize = 5;

/// Radius of every search; keeps results on the same side of nearby borders.
pub const SEARCH_RADIUS_M: u32 = 25_000;

/// Names containing any of these are lodging, dining or retail.
const EXCLUDED_NAME_KEYWORDS: &[&str] = &[
    "hotel",
    "restaurant",
    "mall",
    "shopping",
    "resort",
    "inn",
    "lodge",
    "apartment",
    "residential",
];

const ACCOMMODATION_TOURISM: &[&str] = &["hotel", "hostel", "apartment", "guest_house"];

const MAJOR_TOURISM: &[&str] = &["attraction", "museum", "zoo", "theme_park", "gallery"];
const SCENIC_TOURISM: &[&str] = &["monument", "viewpoint"];

const HIGH_TIER_KEYWORDS: &[&str] = &["national park", "palace", "planetarium"];
const MEDIUM_TIER_KEYWORDS: &[&str] = &["museum", "zoo", "garden", "park"];

/// One of the four radius searches, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Search {
    ParksAndGardens,
    Tourism,
    Historic,
    Amenities,
}

impl Search {
    pub const ALL: [Search; 4] =
        [Search::ParksAndGardens, Search::Tourism, Search::Historic, Search::Amenities];

    pub fn filter(&self) -> TagFilter {
        match self {
            Search::ParksAndGardens => TagFilter::OneOf("leisure", &["park", "garden"]),
            Search::Tourism => TagFilter::Exists("tourism"),
            Search::Historic => TagFilter::Exists("historic"),
            Search::Amenities => {
                TagFilter::OneOf("amenity", &["theatre", "cinema", "stadium", "planetarium"])
            }
        }
    }
}

/// State owned by a single `get_tourist_places` call.
#[derive(Debug, Default)]
pub struct SearchContext {
    /// Lowercased country of the queried place.
    pub target_country: Option<String>,
    /// Names already recorded by any search of this call.
    pub seen: HashSet<String>,
}

impl SearchContext {
    pub fn new(target_country: Option<&str>) -> Self {
        Self {
            target_country: target_country.map(str::to_lowercase),
            seen: HashSet::new(),
        }
    }
}

fn has_excluded_keyword(name_lower: &str) -> bool {
    EXCLUDED_NAME_KEYWORDS.iter().any(|k| name_lower.contains(k))
}

fn is_multi_word(name: &str) -> bool {
    name.split_whitespace().count() > 1
}

/// Relevance of an element while scanning a single search's results.
///
/// The keyword tiers are exclusive here, unlike in [`rank_priority`].
pub fn scan_score(name: &str, tourism: Option<&str>) -> i32 {
    let name_lower = name.to_lowercase();
    let mut score = 0;

    if let Some(tourism) = tourism {
        score += if MAJOR_TOURISM.contains(&tourism) {
            20
        } else if SCENIC_TOURISM.contains(&tourism) {
            15
        } else {
            5
        };
    }

    if HIGH_TIER_KEYWORDS.iter().any(|k| name_lower.contains(k)) {
        score += 15;
    } else if MEDIUM_TIER_KEYWORDS.iter().any(|k| name_lower.contains(k)) {
        score += 10;
    }

    if is_multi_word(name) {
        score += 3;
    }

    score
}

/// Final ordering priority of a pooled name; every matching keyword counts.
pub fn rank_priority(name: &str) -> i32 {
    let name_lower = name.to_lowercase();

    if has_excluded_keyword(&name_lower) {
        return -100;
    }

    let hits = |keywords: &[&str]| {
        keywords.iter().filter(|k| name_lower.contains(*k)).count() as i32
    };

    let mut priority = 20 * hits(HIGH_TIER_KEYWORDS) + 10 * hits(MEDIUM_TIER_KEYWORDS);
    if is_multi_word(name) {
        priority += 5;
    }
    priority
}

/// Turn an element into an attraction, or `None` when a filter rejects it.
///
/// Marks nothing as seen; the caller records accepted names.
pub fn screen_element(element: &PoiElement, ctx: &SearchContext) -> Option<Attraction> {
    let name = element.tag("name").filter(|n| !n.is_empty())?;

    if ctx.seen.contains(name) {
        return None;
    }

    if has_excluded_keyword(&name.to_lowercase()) {
        return None;
    }

    let tourism = element.tag("tourism");
    if tourism.is_some_and(|t| ACCOMMODATION_TOURISM.contains(&t)) {
        return None;
    }

    let country = element.country();
    if let (Some(target), Some(country)) = (ctx.target_country.as_deref(), country) {
        if !countries_match(target, country) {
            debug!("Skipping '{name}': located in '{country}', expected '{target}'");
            return None;
        }
    }

    Some(Attraction {
        name: name.to_string(),
        tag_count: element.tag_count(),
        tourism: tourism.map(str::to_string),
    })
}

/// Scan one search's raw elements and return its best `limit` names.
pub fn collect_names(
    elements: Vec<PoiElement>,
    limit: usize,
    ctx: &mut SearchContext,
) -> Vec<String> {
    let mut screened: Vec<Attraction> =
        elements.iter().filter_map(|e| screen_element(e, ctx)).collect();

    // Elements carrying more tags tend to be better documented places.
    screened.sort_by_key(|a| Reverse(a.tag_count));

    let cap = limit.saturating_mul(3);
    let mut recorded: Vec<Attraction> = Vec::new();

    for attraction in screened {
        // Repeats within this search.
        if !ctx.seen.insert(attraction.name.clone()) {
            continue;
        }
        recorded.push(attraction);

        if recorded.len() >= cap {
            break;
        }
    }

    recorded.sort_by_key(|a| Reverse(scan_score(&a.name, a.tourism.as_deref())));
    recorded.into_iter().take(limit).map(|a| a.name).collect()
}

/// De-duplicate pooled names keeping first occurrences, rank them, truncate.
pub fn rank_places(pooled: Vec<String>, limit: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut unique: Vec<String> =
        pooled.into_iter().filter(|name| seen.insert(name.clone())).collect();

    unique.sort_by_key(|name| Reverse(rank_priority(name)));
    unique.truncate(limit);
    unique
}

#[derive(Debug, Clone, Copy)]
pub struct AttractionFinder<'a> {
    resolver: GeocodingResolver<'a>,
    provider: &'a dyn PoiProvider,
}

impl<'a> AttractionFinder<'a> {
    pub fn new(resolver: GeocodingResolver<'a>, provider: &'a dyn PoiProvider) -> Self {
        Self { resolver, provider }
    }

    /// Ranked attraction names near `place_name`, at most `limit` of them.
    pub async fn get_tourist_places(&self, place_name: &str, limit: usize) -> Option<Vec<String>> {
        let geo = self.resolver.resolve_with_country(place_name).await?;
        let mut ctx = SearchContext::new(geo.country.as_deref());

        let per_search = limit.saturating_mul(2);
        let mut pooled = Vec::new();

        for search in Search::ALL {
            let names = self
                .run_search(search, geo.latitude, geo.longitude, per_search, &mut ctx)
                .await;
            debug!("{search:?} search near '{place_name}' kept {} names", names.len());
            pooled.extend(names);
        }

        let ranked = rank_places(pooled, limit);
        (!ranked.is_empty()).then_some(ranked)
    }

    async fn run_search(
        &self,
        search: Search,
        latitude: f64,
        longitude: f64,
        limit: usize,
        ctx: &mut SearchContext,
    ) -> Vec<String> {
        let query = PoiQuery {
            filter: search.filter(),
            latitude,
            longitude,
            radius_m: SEARCH_RADIUS_M,
        };

        match self.provider.around(&query).await {
            Ok(elements) => collect_names(elements, limit, ctx),
            Err(err) => {
                warn!("{search:?} search failed: {err:#}");
                Vec::new()
            }
        }
    }
}

pub fn format_places_response(place_name: &str, places: Option<&[String]>) -> String {
    match places {
        Some(places) if !places.is_empty() => {
            let mut lines = vec![format!("In {place_name} these are the places you can go,")];
            lines.extend(places.iter().cloned());
            lines.join("\n").trim().to_string()
        }
        _ => format!("Sorry, I couldn't find tourist attractions for {place_name}."),
    }
}
