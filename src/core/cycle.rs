use crate::core::classifier::classify;
use crate::core::resolver::LocationResolver;
use crate::domain::model::{
    Coordinate, CycleOutcome, ErrorSignal, IssPosition, ObserverSettings, SignalDescriptor,
};
use crate::domain::ports::{Cycle, Geocoder, PositionSource};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    Idle,
    ResolvingLocation,
    FetchingIss,
    Classifying,
    Done,
    Errored,
}

impl fmt::Display for CycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CycleState::Idle => "Idle",
            CycleState::ResolvingLocation => "ResolvingLocation",
            CycleState::FetchingIss => "FetchingISS",
            CycleState::Classifying => "Classifying",
            CycleState::Done => "Done",
            CycleState::Errored => "Errored",
        };
        f.write_str(name)
    }
}

/// 單次輪詢的完整紀錄
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub state: CycleState,
    pub outcome: CycleOutcome,
    pub observer: Option<Coordinate>,
    pub iss: Option<IssPosition>,
    pub distance_km: Option<f64>,
}

struct Tracked {
    observer: Coordinate,
    iss: IssPosition,
    distance_km: f64,
    signal: SignalDescriptor,
}

/// Observer settings plus the coordinate they resolved to. Replaced as a whole,
/// never mutated.
#[derive(Debug)]
struct ObserverState {
    settings: ObserverSettings,
    resolved: Option<Coordinate>,
}

pub struct TrackerCycle<P: PositionSource, G: Geocoder> {
    locator: P,
    resolver: LocationResolver<G>,
    observer: RwLock<Arc<ObserverState>>,
    in_flight: Mutex<()>,
}

impl<P: PositionSource, G: Geocoder> TrackerCycle<P, G> {
    pub fn new(locator: P, geocoder: G, settings: ObserverSettings) -> Self {
        Self {
            locator,
            resolver: LocationResolver::new(geocoder),
            observer: RwLock::new(Arc::new(ObserverState {
                settings,
                resolved: None,
            })),
            in_flight: Mutex::new(()),
        }
    }

    /// 換掉觀測者設定，同時丟棄快取的座標
    pub async fn reconfigure(&self, settings: ObserverSettings) {
        tracing::info!("🔧 Observer configuration replaced, cached location dropped");
        *self.observer.write().await = Arc::new(ObserverState {
            settings,
            resolved: None,
        });
    }

    pub async fn cached_observer(&self) -> Option<Coordinate> {
        self.observer.read().await.resolved
    }

    /// 執行一次完整的輪詢；錯誤一律轉成 ErrorSignal，不會往外拋
    pub async fn execute(&self) -> CycleReport {
        let _guard = self.in_flight.lock().await;
        let mut state = CycleState::Idle;

        match self.drive(&mut state).await {
            Ok(tracked) => {
                transition(&mut state, CycleState::Done);
                tracing::info!(
                    "🛰️ ISS at {} is {:.0}km from {}: {}",
                    tracked.iss.coordinate,
                    tracked.distance_km,
                    tracked.observer,
                    tracked.signal.message
                );
                CycleReport {
                    state,
                    outcome: CycleOutcome::Signal(tracked.signal),
                    observer: Some(tracked.observer),
                    iss: Some(tracked.iss),
                    distance_km: Some(tracked.distance_km),
                }
            }
            Err(e) => {
                let failed_in = state;
                transition(&mut state, CycleState::Errored);
                tracing::error!("❌ Tracking cycle failed during {}: {}", failed_in, e);
                tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
                CycleReport {
                    state,
                    outcome: CycleOutcome::Error(ErrorSignal::from(&e)),
                    observer: None,
                    iss: None,
                    distance_km: None,
                }
            }
        }
    }

    async fn drive(&self, state: &mut CycleState) -> Result<Tracked> {
        transition(state, CycleState::ResolvingLocation);
        let observer = self.observer_location().await?;

        transition(state, CycleState::FetchingIss);
        let iss = self.locator.current_position().await?;

        transition(state, CycleState::Classifying);
        let distance_km = observer.distance_to(&iss.coordinate);
        let signal = classify(distance_km);

        Ok(Tracked {
            observer,
            iss,
            distance_km,
            signal,
        })
    }

    async fn observer_location(&self) -> Result<Coordinate> {
        let snapshot = Arc::clone(&*self.observer.read().await);
        if let Some(coordinate) = snapshot.resolved {
            tracing::debug!("Using cached observer location {}", coordinate);
            return Ok(coordinate);
        }

        let config = snapshot.settings.observer_config()?;
        let coordinate = self.resolver.resolve(&config).await?;

        let mut current = self.observer.write().await;
        // a reconfiguration that landed while we were resolving wins
        if Arc::ptr_eq(&*current, &snapshot) {
            *current = Arc::new(ObserverState {
                settings: snapshot.settings.clone(),
                resolved: Some(coordinate),
            });
        }

        Ok(coordinate)
    }
}

fn transition(state: &mut CycleState, next: CycleState) {
    tracing::debug!("Cycle state {} -> {}", state, next);
    *state = next;
}

#[async_trait]
impl<P: PositionSource, G: Geocoder> Cycle for TrackerCycle<P, G> {
    async fn run_cycle(&self) -> CycleOutcome {
        self.execute().await.outcome
    }
}
