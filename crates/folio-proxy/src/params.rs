//! Query parameters accepted by the proxy.

use std::collections::HashMap;

use crate::error::ProxyError;

const DEFAULT_UNITS: &str = "metric";

/// Lookup target. Coordinates are relayed as given; the provider validates them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyTarget {
    Place(String),
    Coordinates { lat: String, lon: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyParams {
    pub target: ProxyTarget,
    pub units: String,
}

impl ProxyParams {
    /// Extract the lookup from decoded query parameters.
    ///
    /// Empty values count as absent. `q` wins over coordinates when both are
    /// present.
    pub fn from_query(query: &HashMap<String, String>) -> Result<Self, ProxyError> {
        let get = |key: &str| query.get(key).map(String::as_str).filter(|v| !v.is_empty());

        let target = match (get("q"), get("lat"), get("lon")) {
            (Some(q), _, _) => ProxyTarget::Place(q.to_string()),
            (None, Some(lat), Some(lon)) => ProxyTarget::Coordinates {
                lat: lat.to_string(),
                lon: lon.to_string(),
            },
            _ => return Err(ProxyError::MissingQuery),
        };

        let units = get("units").unwrap_or(DEFAULT_UNITS).to_string();

        Ok(Self { target, units })
    }
}

/// Decode a raw query string, keeping the first value of repeated keys.
pub fn parse_query(raw: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
        map.entry(key.into_owned()).or_insert_with(|| value.into_owned());
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_query_defaults_to_metric() {
        let params = ProxyParams::from_query(&parse_query("q=Paris")).unwrap();
        assert_eq!(params.target, ProxyTarget::Place("Paris".to_string()));
        assert_eq!(params.units, "metric");
    }

    #[test]
    fn test_coordinate_query() {
        let params =
            ProxyParams::from_query(&parse_query("lat=41.7&lon=44.8&units=imperial")).unwrap();
        assert_eq!(
            params.target,
            ProxyTarget::Coordinates {
                lat: "41.7".to_string(),
                lon: "44.8".to_string()
            }
        );
        assert_eq!(params.units, "imperial");
    }

    #[test]
    fn test_place_wins_over_coordinates() {
        let params = ProxyParams::from_query(&parse_query("lat=1&lon=2&q=Rome")).unwrap();
        assert_eq!(params.target, ProxyTarget::Place("Rome".to_string()));
    }

    #[test]
    fn test_incomplete_coordinates_rejected() {
        assert!(matches!(
            ProxyParams::from_query(&parse_query("lat=41.7")),
            Err(ProxyError::MissingQuery)
        ));
        assert!(matches!(
            ProxyParams::from_query(&parse_query("lat=41.7&lon=")),
            Err(ProxyError::MissingQuery)
        ));
    }

    #[test]
    fn test_empty_query_rejected() {
        assert!(ProxyParams::from_query(&parse_query("")).is_err());
        assert!(ProxyParams::from_query(&parse_query("q=&units=metric")).is_err());
    }

    #[test]
    fn test_parse_query_decodes_and_keeps_first() {
        let map = parse_query("q=New%20York&q=Boston&units=imperial");
        assert_eq!(map.get("q").map(String::as_str), Some("New York"));
        let plus = parse_query("q=New+York");
        assert_eq!(plus.get("q").map(String::as_str), Some("New York"));
    }
}
