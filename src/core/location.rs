use crate::domain::model::{LocationRequest, LocationSource, Notice, Resolution, ResolvedLocation};
use crate::domain::ports::{Geocoder, Geolocator};
use serde::{Deserialize, Serialize};

pub const AUTO_LOCATION_FAILED: &str = "Auto-location failed. Using default.";
pub const CITY_NOT_FOUND: &str = "City not found. Using fallback.";
pub const CITY_EMPTY: &str = "No city entered. Using default.";

/// Static location used whenever lookup fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultLocation {
    pub city: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Default for DefaultLocation {
    fn default() -> Self {
        Self {
            city: "Solapur".to_string(),
            country: "India".to_string(),
            latitude: 17.6599,
            longitude: 75.9064,
        }
    }
}

impl DefaultLocation {
    pub fn resolved(&self) -> ResolvedLocation {
        ResolvedLocation {
            latitude: self.latitude,
            longitude: self.longitude,
            city: self.city.clone(),
            country: self.country.clone(),
            source: LocationSource::Default,
        }
    }
}

/// Picks the coordinates to fetch weather for. Every path ends in a usable
/// location; failures surface only as a notice on the resolution.
pub struct LocationResolver<G: Geolocator, C: Geocoder> {
    geolocator: G,
    geocoder: C,
    default: DefaultLocation,
}

impl<G: Geolocator, C: Geocoder> LocationResolver<G, C> {
    pub fn new(geolocator: G, geocoder: C, default: DefaultLocation) -> Self {
        Self {
            geolocator,
            geocoder,
            default,
        }
    }

    pub async fn resolve(&self, request: &LocationRequest) -> Resolution {
        match request {
            LocationRequest::Automatic => self.resolve_automatic().await,
            LocationRequest::Manual(city) => self.resolve_manual(city).await,
        }
    }

    async fn resolve_automatic(&self) -> Resolution {
        match self.geolocator.locate().await {
            Ok(found) => {
                tracing::info!(
                    "📍 Auto-located at ({}, {})",
                    found.latitude,
                    found.longitude
                );
                Resolution {
                    location: ResolvedLocation {
                        latitude: found.latitude,
                        longitude: found.longitude,
                        city: found.city.unwrap_or_else(|| self.default.city.clone()),
                        country: found.country.unwrap_or_else(|| self.default.country.clone()),
                        source: LocationSource::Auto,
                    },
                    notice: None,
                }
            }
            Err(e) => {
                tracing::warn!("Auto-location failed: {}", e);
                self.fallback(Notice::warning(AUTO_LOCATION_FAILED))
            }
        }
    }

    async fn resolve_manual(&self, city: &str) -> Resolution {
        let city = city.trim();
        if city.is_empty() {
            tracing::warn!("Manual location requested with an empty city name");
            return self.fallback(Notice::warning(CITY_EMPTY));
        }

        match self.geocoder.search(city).await {
            Ok(Some(first)) => {
                let (name, country) = split_display_name(&first.display_name);
                tracing::info!("📍 Geocoded '{}' to {}", city, first.display_name);
                Resolution {
                    location: ResolvedLocation {
                        latitude: first.latitude,
                        longitude: first.longitude,
                        city: name.unwrap_or_else(|| city.to_string()),
                        country: country.unwrap_or_else(|| self.default.country.clone()),
                        source: LocationSource::Manual,
                    },
                    notice: None,
                }
            }
            Ok(None) => {
                tracing::warn!("No geocoding match for '{}'", city);
                self.fallback(Notice::warning(CITY_NOT_FOUND))
            }
            Err(e) => {
                tracing::warn!("Geocoding '{}' failed: {}", city, e);
                self.fallback(Notice::error(format!("Error fetching location: {}", e)))
            }
        }
    }

    fn fallback(&self, notice: Notice) -> Resolution {
        Resolution {
            location: self.default.resolved(),
            notice: Some(notice),
        }
    }
}

/// First comma segment is the place name, last is the country.
pub fn split_display_name(display_name: &str) -> (Option<String>, Option<String>) {
    let segment = |s: Option<&str>| {
        s.map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };
    let mut parts = display_name.split(',');
    let first = segment(parts.next());
    let last = segment(display_name.rsplit(',').next());
    (first, last)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::NoticeLevel;
    use crate::domain::ports::{GeocodeMatch, IpLocation};
    use crate::utils::error::{ForecastError, Result};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct FixedGeolocator(Option<IpLocation>);

    #[async_trait]
    impl Geolocator for FixedGeolocator {
        async fn locate(&self) -> Result<IpLocation> {
            self.0
                .clone()
                .ok_or_else(|| ForecastError::location("connection refused"))
        }
    }

    #[derive(Clone)]
    struct FixedGeocoder {
        result: std::result::Result<Vec<GeocodeMatch>, String>,
        calls: Arc<AtomicUsize>,
    }

    impl FixedGeocoder {
        fn new(result: std::result::Result<Vec<GeocodeMatch>, String>) -> Self {
            Self {
                result,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    #[async_trait]
    impl Geocoder for FixedGeocoder {
        async fn search(&self, _city: &str) -> Result<Option<GeocodeMatch>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result
                .clone()
                .map(|matches| matches.into_iter().next())
                .map_err(ForecastError::location)
        }
    }

    fn resolver(
        geolocator: FixedGeolocator,
        geocoder: FixedGeocoder,
    ) -> LocationResolver<FixedGeolocator, FixedGeocoder> {
        LocationResolver::new(geolocator, geocoder, DefaultLocation::default())
    }

    #[tokio::test]
    async fn test_automatic_success() {
        let r = resolver(
            FixedGeolocator(Some(IpLocation {
                latitude: 18.52,
                longitude: 73.85,
                city: Some("Pune".to_string()),
                country: None,
            })),
            FixedGeocoder::new(Ok(vec![])),
        );

        let resolution = r.resolve(&LocationRequest::Automatic).await;
        assert_eq!(resolution.location.source, LocationSource::Auto);
        assert_eq!(resolution.location.city, "Pune");
        assert_eq!(resolution.location.country, "India");
        assert!(resolution.notice.is_none());
    }

    #[tokio::test]
    async fn test_automatic_failure_falls_back() {
        let r = resolver(FixedGeolocator(None), FixedGeocoder::new(Ok(vec![])));

        let resolution = r.resolve(&LocationRequest::Automatic).await;
        assert_eq!(resolution.location, DefaultLocation::default().resolved());
        let notice = resolution.notice.unwrap();
        assert_eq!(notice.level, NoticeLevel::Warning);
        assert_eq!(notice.message, AUTO_LOCATION_FAILED);
    }

    #[tokio::test]
    async fn test_manual_uses_first_match() {
        let r = resolver(
            FixedGeolocator(None),
            FixedGeocoder::new(Ok(vec![
                GeocodeMatch {
                    latitude: 48.85,
                    longitude: 2.35,
                    display_name: "Paris, Île-de-France, France métropolitaine, France".to_string(),
                },
                GeocodeMatch {
                    latitude: 33.66,
                    longitude: -95.55,
                    display_name: "Paris, Lamar County, Texas, United States".to_string(),
                },
            ])),
        );

        let resolution = r.resolve(&LocationRequest::Manual("Paris".to_string())).await;
        assert_eq!(resolution.location.source, LocationSource::Manual);
        assert_eq!(resolution.location.latitude, 48.85);
        assert_eq!(resolution.location.city, "Paris");
        assert_eq!(resolution.location.country, "France");
    }

    #[tokio::test]
    async fn test_manual_no_match_falls_back() {
        let r = resolver(FixedGeolocator(None), FixedGeocoder::new(Ok(vec![])));

        let resolution = r
            .resolve(&LocationRequest::Manual("Nowhereville".to_string()))
            .await;
        assert_eq!(resolution.location.source, LocationSource::Default);
        assert_eq!(resolution.notice.unwrap().message, CITY_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_manual_transport_error_carries_message() {
        let r = resolver(
            FixedGeolocator(None),
            FixedGeocoder::new(Err("timed out".to_string())),
        );

        let resolution = r.resolve(&LocationRequest::Manual("Pune".to_string())).await;
        assert_eq!(resolution.location.source, LocationSource::Default);
        let notice = resolution.notice.unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert!(notice.message.contains("timed out"));
    }

    #[tokio::test]
    async fn test_blank_city_skips_network() {
        let geocoder = FixedGeocoder::new(Ok(vec![]));
        let calls = geocoder.calls.clone();
        let r = resolver(FixedGeolocator(None), geocoder);

        let resolution = r.resolve(&LocationRequest::Manual("   ".to_string())).await;
        assert_eq!(resolution.location.source, LocationSource::Default);
        assert_eq!(resolution.notice.unwrap().message, CITY_EMPTY);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_split_display_name() {
        assert_eq!(
            split_display_name("Solapur, Maharashtra, India"),
            (Some("Solapur".to_string()), Some("India".to_string()))
        );
        assert_eq!(
            split_display_name("Monaco"),
            (Some("Monaco".to_string()), Some("Monaco".to_string()))
        );
        assert_eq!(split_display_name(""), (None, None));
    }
}
