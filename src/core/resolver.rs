use crate::domain::model::{Coordinate, ObserverConfig};
use crate::domain::ports::Geocoder;
use crate::utils::error::{Result, TrackerError};

/// 把觀測者設定轉成座標；只有郵遞區號需要呼叫外部服務
pub struct LocationResolver<G: Geocoder> {
    geocoder: G,
}

impl<G: Geocoder> LocationResolver<G> {
    pub fn new(geocoder: G) -> Self {
        Self { geocoder }
    }

    #[cfg(test)]
    pub(crate) fn geocoder(&self) -> &G {
        &self.geocoder
    }

    pub async fn resolve(&self, config: &ObserverConfig) -> Result<Coordinate> {
        match config {
            ObserverConfig::Coordinates {
                latitude,
                longitude,
            } => {
                tracing::debug!("Using configured coordinates ({}, {})", latitude, longitude);
                Coordinate::new(*latitude, *longitude)
            }
            ObserverConfig::PostalCode(postal_code) => {
                tracing::info!("📮 Resolving postal code {}", postal_code);
                let candidates = self.geocoder.lookup(postal_code).await?;
                tracing::debug!("Geocoder returned {} candidates", candidates.len());

                let first = candidates
                    .into_iter()
                    .next()
                    .ok_or_else(|| TrackerError::NotFoundError {
                        postal_code: postal_code.clone(),
                    })?;

                let coordinate = Coordinate::new(first.latitude, first.longitude)?;
                tracing::info!(
                    "📍 Postal code {} resolved to {}{}",
                    postal_code,
                    coordinate,
                    first.name.map(|n| format!(" ({})", n)).unwrap_or_default()
                );
                Ok(coordinate)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::GeoCandidate;
    use crate::utils::error::Service;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StaticGeocoder {
        candidates: Vec<GeoCandidate>,
        fail: bool,
        calls: AtomicUsize,
    }

    impl StaticGeocoder {
        fn with(candidates: Vec<GeoCandidate>) -> Self {
            Self {
                candidates,
                fail: false,
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                candidates: vec![],
                fail: true,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Geocoder for StaticGeocoder {
        async fn lookup(&self, _postal_code: &str) -> Result<Vec<GeoCandidate>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(TrackerError::upstream(Service::Geocoding, "HTTP 500"));
            }
            Ok(self.candidates.clone())
        }
    }

    fn candidate(latitude: f64, longitude: f64) -> GeoCandidate {
        GeoCandidate {
            latitude,
            longitude,
            name: None,
        }
    }

    #[tokio::test]
    async fn test_explicit_coordinates_skip_geocoder() {
        let resolver = LocationResolver::new(StaticGeocoder::with(vec![]));
        let config = ObserverConfig::Coordinates {
            latitude: 30.2672,
            longitude: -97.7431,
        };

        let coordinate = resolver.resolve(&config).await.unwrap();

        assert_eq!(coordinate.latitude(), 30.2672);
        assert_eq!(coordinate.longitude(), -97.7431);
        assert_eq!(resolver.geocoder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_explicit_coordinates_out_of_range() {
        let resolver = LocationResolver::new(StaticGeocoder::with(vec![]));
        let config = ObserverConfig::Coordinates {
            latitude: 999.0,
            longitude: 20.0,
        };

        let result = resolver.resolve(&config).await;
        assert!(matches!(
            result,
            Err(TrackerError::InvalidCoordinateError { .. })
        ));
    }

    #[tokio::test]
    async fn test_postal_code_uses_first_candidate() {
        let resolver = LocationResolver::new(StaticGeocoder::with(vec![
            candidate(30.2666, -97.7333),
            candidate(40.0, -100.0),
        ]));

        let coordinate = resolver
            .resolve(&ObserverConfig::PostalCode("78701".to_string()))
            .await
            .unwrap();

        assert_eq!(coordinate.latitude(), 30.2666);
        assert_eq!(coordinate.longitude(), -97.7333);
        assert_eq!(resolver.geocoder.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_postal_code_without_candidates() {
        let resolver = LocationResolver::new(StaticGeocoder::with(vec![]));

        let err = resolver
            .resolve(&ObserverConfig::PostalCode("78701".to_string()))
            .await
            .unwrap_err();

        assert!(matches!(err, TrackerError::NotFoundError { .. }));
        assert_eq!(err.to_string(), "Postal code not found: \"78701\".");
    }

    #[tokio::test]
    async fn test_postal_code_with_invalid_candidate() {
        let resolver = LocationResolver::new(StaticGeocoder::with(vec![candidate(999.0, 999.0)]));

        let result = resolver
            .resolve(&ObserverConfig::PostalCode("78701".to_string()))
            .await;

        assert!(matches!(
            result,
            Err(TrackerError::InvalidCoordinateError { .. })
        ));
    }

    #[tokio::test]
    async fn test_geocoder_failure_is_upstream() {
        let resolver = LocationResolver::new(StaticGeocoder::failing());

        let result = resolver
            .resolve(&ObserverConfig::PostalCode("78701".to_string()))
            .await;

        assert!(matches!(
            result,
            Err(TrackerError::UpstreamError {
                service: Service::Geocoding,
                ..
            })
        ));
    }
}
