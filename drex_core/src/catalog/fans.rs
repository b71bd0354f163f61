//! DEF Inline Dryer Exhaust Fan Catalog
//!
//! Published performance data for the DEF fan series. Each model carries its
//! rated maximum airflow, maximum static pressure and the measured fan curve
//! (CFM delivered at each static-pressure step).
//!
//! The catalog is ordered by increasing capacity. Selection relies on that
//! ordering: the first model that covers both the airflow and the static
//! pressure is the smallest sufficient one.

use serde::{Deserialize, Serialize};

/// One measured point on a fan curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    /// Static pressure (in. WC)
    pub static_inwc: f64,
    /// Airflow delivered at that pressure (CFM)
    pub cfm: f64,
}

const fn pt(static_inwc: f64, cfm: f64) -> CurvePoint {
    CurvePoint { static_inwc, cfm }
}

/// Static catalog entry for a fan model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FanModel {
    /// Model designation (e.g., "DEF035")
    pub name: &'static str,
    /// Free-delivery airflow (CFM at 0 in. WC)
    pub max_cfm: f64,
    /// Highest static pressure on the published curve (in. WC)
    pub max_static_inwc: f64,
    /// Fan curve, ascending in static pressure
    pub curve: &'static [CurvePoint],
}

impl FanModel {
    /// Can this fan cover the given duty on its rated envelope?
    pub fn covers(&self, cfm: f64, static_inwc: f64) -> bool {
        self.max_cfm >= cfm && self.max_static_inwc >= static_inwc
    }

    /// Airflow the fan delivers at `static_inwc`, by linear interpolation of
    /// the published curve.
    ///
    /// Pressures below the first point clamp to free delivery; pressures past
    /// the last point return `None` (off the curve).
    pub fn cfm_at_static(&self, static_inwc: f64) -> Option<f64> {
        let first = self.curve.first()?;
        if static_inwc <= first.static_inwc {
            return Some(first.cfm);
        }
        for pair in self.curve.windows(2) {
            let (lo, hi) = (pair[0], pair[1]);
            if static_inwc <= hi.static_inwc {
                let t = (static_inwc - lo.static_inwc) / (hi.static_inwc - lo.static_inwc);
                return Some(lo.cfm + t * (hi.cfm - lo.cfm));
            }
        }
        None
    }

    /// Static pressure the fan develops while moving `cfm`, the inverse of
    /// [`cfm_at_static`](Self::cfm_at_static).
    ///
    /// `None` above free delivery or below the last published point.
    pub fn static_at_cfm(&self, cfm: f64) -> Option<f64> {
        let first = self.curve.first()?;
        if cfm > first.cfm {
            return None;
        }
        for pair in self.curve.windows(2) {
            let (lo, hi) = (pair[0], pair[1]);
            if cfm >= hi.cfm {
                let t = (lo.cfm - cfm) / (lo.cfm - hi.cfm);
                return Some(lo.static_inwc + t * (hi.static_inwc - lo.static_inwc));
            }
        }
        None
    }
}

static DEF04_CURVE: [CurvePoint; 5] = [
    pt(0.0, 540.0),
    pt(0.25, 490.0),
    pt(0.5, 430.0),
    pt(0.75, 350.0),
    pt(1.0, 240.0),
];

static DEF08_CURVE: [CurvePoint; 8] = [
    pt(0.0, 970.0),
    pt(0.25, 890.0),
    pt(0.5, 840.0),
    pt(0.75, 780.0),
    pt(1.0, 680.0),
    pt(1.25, 540.0),
    pt(1.5, 440.0),
    pt(1.75, 270.0),
];

static DEF015_CURVE: [CurvePoint; 9] = [
    pt(0.0, 1860.0),
    pt(0.25, 1780.0),
    pt(0.5, 1700.0),
    pt(0.75, 1610.0),
    pt(1.0, 1520.0),
    pt(1.25, 1410.0),
    pt(1.5, 1280.0),
    pt(1.75, 1140.0),
    pt(2.0, 990.0),
];

static DEF025_CURVE: [CurvePoint; 9] = [
    pt(0.0, 2480.0),
    pt(0.25, 2400.0),
    pt(0.5, 2320.0),
    pt(0.75, 2230.0),
    pt(1.0, 2140.0),
    pt(1.25, 2040.0),
    pt(1.5, 1930.0),
    pt(1.75, 1790.0),
    pt(2.0, 1630.0),
];

static DEF035_CURVE: [CurvePoint; 9] = [
    pt(0.0, 4100.0),
    pt(0.25, 3940.0),
    pt(0.5, 3770.0),
    pt(0.75, 3610.0),
    pt(1.0, 3460.0),
    pt(1.25, 3300.0),
    pt(1.5, 3120.0),
    pt(1.75, 2900.0),
    pt(2.0, 2630.0),
];

static DEF050_CURVE: [CurvePoint; 9] = [
    pt(0.0, 5850.0),
    pt(0.25, 5660.0),
    pt(0.5, 5450.0),
    pt(0.75, 5300.0),
    pt(1.0, 5090.0),
    pt(1.25, 4890.0),
    pt(1.5, 4680.0),
    pt(1.75, 4460.0),
    pt(2.0, 4230.0),
];

/// The DEF series, ascending by capacity.
pub static DEF_FANS: [FanModel; 6] = [
    FanModel { name: "DEF04", max_cfm: 540.0, max_static_inwc: 1.0, curve: &DEF04_CURVE },
    FanModel { name: "DEF08", max_cfm: 970.0, max_static_inwc: 1.75, curve: &DEF08_CURVE },
    FanModel { name: "DEF015", max_cfm: 1860.0, max_static_inwc: 2.0, curve: &DEF015_CURVE },
    FanModel { name: "DEF025", max_cfm: 2480.0, max_static_inwc: 2.0, curve: &DEF025_CURVE },
    FanModel { name: "DEF035", max_cfm: 4100.0, max_static_inwc: 2.0, curve: &DEF035_CURVE },
    FanModel { name: "DEF050", max_cfm: 5850.0, max_static_inwc: 2.0, curve: &DEF050_CURVE },
];

/// Look up a catalog model by name (case-insensitive)
pub fn find_fan(name: &str) -> Option<&'static FanModel> {
    DEF_FANS.iter().find(|f| f.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_ascending() {
        for pair in DEF_FANS.windows(2) {
            assert!(pair[0].max_cfm < pair[1].max_cfm, "{} !< {}", pair[0].name, pair[1].name);
            assert!(pair[0].max_static_inwc <= pair[1].max_static_inwc);
        }
    }

    #[test]
    fn test_ratings_match_curves() {
        for fan in &DEF_FANS {
            let first = fan.curve.first().unwrap();
            let last = fan.curve.last().unwrap();
            assert_eq!(first.static_inwc, 0.0);
            assert_eq!(first.cfm, fan.max_cfm, "{}", fan.name);
            assert_eq!(last.static_inwc, fan.max_static_inwc, "{}", fan.name);
        }
    }

    #[test]
    fn test_interpolation() {
        let fan = find_fan("DEF035").unwrap();
        assert_eq!(fan.cfm_at_static(0.0), Some(4100.0));
        assert_eq!(fan.cfm_at_static(1.0), Some(3460.0));
        // halfway between 1.0 (3460) and 1.25 (3300)
        let mid = fan.cfm_at_static(1.125).unwrap();
        assert!((mid - 3380.0).abs() < 1e-9);
        assert_eq!(fan.cfm_at_static(2.5), None);
    }

    #[test]
    fn test_inverse_interpolation() {
        let fan = find_fan("DEF035").unwrap();
        assert_eq!(fan.static_at_cfm(4100.0), Some(0.0));
        assert_eq!(fan.static_at_cfm(3460.0), Some(1.0));
        let mid = fan.static_at_cfm(3380.0).unwrap();
        assert!((mid - 1.125).abs() < 1e-9);
        assert_eq!(fan.static_at_cfm(4200.0), None);
        assert_eq!(fan.static_at_cfm(2000.0), None);
    }

    #[test]
    fn test_covers() {
        let fan = find_fan("def08").unwrap();
        assert!(fan.covers(970.0, 1.75));
        assert!(!fan.covers(971.0, 0.5));
        assert!(!fan.covers(500.0, 1.8));
    }
}
