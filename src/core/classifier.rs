use crate::domain::model::{Effect, SignalDescriptor};

pub const SIGNAL_NAME: &str = "ISS Tracker";

/// Distance bands, nearest first. Upper bounds are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Proximity {
    Overhead,
    VeryClose,
    Nearby,
    InOrbit,
}

impl Proximity {
    pub const ALL: [Proximity; 4] = [
        Proximity::Overhead,
        Proximity::VeryClose,
        Proximity::Nearby,
        Proximity::InOrbit,
    ];

    pub fn upper_bound_km(self) -> Option<f64> {
        match self {
            Proximity::Overhead => Some(500.0),
            Proximity::VeryClose => Some(1000.0),
            Proximity::Nearby => Some(2000.0),
            Proximity::InOrbit => None,
        }
    }

    /// 第一個符合的區間勝出；NaN 落到最後一個區間
    pub fn from_distance(distance_km: f64) -> Proximity {
        Self::ALL
            .into_iter()
            .find(|band| band.upper_bound_km().is_some_and(|upper| distance_km < upper))
            .unwrap_or(Proximity::InOrbit)
    }

    pub fn color(self) -> &'static str {
        match self {
            Proximity::Overhead => "#00FF00",
            Proximity::VeryClose => "#FFDD00",
            Proximity::Nearby => "#FF6600",
            Proximity::InOrbit => "#FF0000",
        }
    }

    pub fn effect(self) -> Effect {
        match self {
            Proximity::Overhead | Proximity::VeryClose | Proximity::Nearby => Effect::Blink,
            Proximity::InOrbit => Effect::SetColor,
        }
    }

    pub fn message(self, distance_km: f64) -> String {
        // f64::round rounds half away from zero
        let km = distance_km.round();
        match self {
            Proximity::Overhead => format!("ISS is directly overhead – only {}km away!", km),
            Proximity::VeryClose => format!("ISS is very close – {}km away!", km),
            Proximity::Nearby => format!("ISS is nearby – {}km away.", km),
            Proximity::InOrbit => format!("ISS is in orbit – {}km from your location.", km),
        }
    }
}

pub fn classify(distance_km: f64) -> SignalDescriptor {
    let band = Proximity::from_distance(distance_km);
    SignalDescriptor {
        name: SIGNAL_NAME.to_string(),
        color: band.color().to_string(),
        effect: band.effect(),
        message: band.message(distance_km),
    }
}
