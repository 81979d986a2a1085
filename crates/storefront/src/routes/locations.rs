//! Where-to-buy page: locations grouped by city.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use serde_json::Value;
use tower_sessions::Session;
use tracing::instrument;

use super::resolve_lang;
use crate::api::types::Location;
use crate::error::Result;
use crate::middleware::OptionalAuth;
use crate::services::translations::lookup_keyed;
use crate::state::AppState;

/// One displayed location.
#[derive(Debug, Clone)]
pub struct LocationView {
    pub name: String,
    pub address: String,
    pub kind: String,
    pub phone: String,
    pub map_link: Option<String>,
}

/// Locations of one city.
#[derive(Debug, Clone)]
pub struct CityGroup {
    pub city: String,
    pub locations: Vec<LocationView>,
}

/// Where-to-buy template.
#[derive(Template, WebTemplate)]
#[template(path = "locations.html")]
pub struct LocationsTemplate {
    pub cities: Vec<CityGroup>,
    pub logged_in: bool,
}

/// Group locations by city, translated, cities sorted.
fn group_by_city(locations: &[Location], translations: &Value) -> Vec<CityGroup> {
    let mut cities: Vec<String> = locations
        .iter()
        .filter_map(|l| l.city.clone())
        .filter(|c| !c.is_empty())
        .collect();
    cities.sort();
    cities.dedup();

    cities
        .into_iter()
        .map(|city| CityGroup {
            locations: locations
                .iter()
                .filter(|l| l.city.as_deref() == Some(city.as_str()))
                .map(|l| location_view(l, translations))
                .collect(),
            city: lookup_keyed(translations, "cities", &city),
        })
        .collect()
}

fn location_view(location: &Location, translations: &Value) -> LocationView {
    LocationView {
        name: location.name_key.as_deref().map_or_else(String::new, |key| {
            lookup_keyed(translations, "locations", key)
        }),
        address: location.address_key.as_deref().map_or_else(String::new, |key| {
            lookup_keyed(translations, "addresses", key)
        }),
        kind: location
            .location_type
            .as_deref()
            .map_or_else(String::new, |key| {
                lookup_keyed(translations, "locationTypes", key)
            }),
        phone: location.phone.clone().unwrap_or_default(),
        map_link: location.map_link(),
    }
}

/// `GET /where-to-buy`.
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(current): OptionalAuth,
) -> Result<LocationsTemplate> {
    let lang = resolve_lang(&session).await;

    let locations = state.api().get_locations().await?;
    let translations = state
        .api()
        .get_translations(lang)
        .await
        .unwrap_or(Value::Null);

    Ok(LocationsTemplate {
        cities: group_by_city(&locations, &translations),
        logged_in: current.is_some(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_group_by_city_sorted_and_translated() {
        let locations: Vec<Location> = serde_json::from_value(json!([
            {"_id": "l1", "city": "lviv", "type": "shop", "nameKey": "lviv_main"},
            {"_id": "l2", "city": "kyiv", "type": "office"},
            {"_id": "l3", "city": "kyiv", "type": "shop", "lat": 50.4, "lng": 30.5},
            {"_id": "l4"}
        ]))
        .expect("fixture");

        let translations = json!({
            "cities": {"kyiv": "Київ", "lviv": "Львів"},
            "locations": {"lviv_main": "ТЦ Форум"},
        });

        let groups = group_by_city(&locations, &translations);
        assert_eq!(groups.len(), 2);

        let kyiv = groups.first().expect("kyiv");
        assert_eq!(kyiv.city, "Київ");
        assert_eq!(kyiv.locations.len(), 2);
        assert!(kyiv.locations.iter().any(|l| l.map_link.is_some()));

        let lviv = groups.get(1).expect("lviv");
        assert_eq!(lviv.locations.first().map(|l| l.name.as_str()), Some("ТЦ Форум"));
    }
}
