//! Mass-weighted sub-factor aggregation

use crate::catalog::ReagentCatalog;
use crate::models::{MajorFactorScores, MassRecord, SubFactor, SubFactorScores};
use crate::scoring::schemes::{EnvironmentScheme, HealthScheme, MajorFactorRule, SafetyScheme};

/// Turns a stage's mass record into sub-factor scores on the 0-100 scale
pub struct SubFactorAggregator<'a> {
    catalog: &'a ReagentCatalog,
}

impl<'a> SubFactorAggregator<'a> {
    pub fn new(catalog: &'a ReagentCatalog) -> Self {
        Self { catalog }
    }

    /// score(sf) = Σ (m_r / M) × value_r(sf) × 100; all zero when M = 0
    pub fn aggregate(&self, masses: &MassRecord) -> SubFactorScores {
        let total = masses.total();
        if total <= 0.0 || !total.is_finite() {
            return SubFactorScores::zeros();
        }

        SubFactor::ALL
            .iter()
            .map(|factor| {
                let score: f64 = masses
                    .iter()
                    .map(|(name, mass)| {
                        (mass / total) * self.catalog.lookup(name).sub_factor(*factor) * 100.0
                    })
                    .sum();
                (*factor, score)
            })
            .collect()
    }
}

/// Roll sub-factor scores up into the three major factors
pub fn combine_major_factors(
    scores: &SubFactorScores,
    safety: SafetyScheme,
    health: HealthScheme,
    environment: EnvironmentScheme,
) -> MajorFactorScores {
    MajorFactorScores {
        safety: safety.combine(scores),
        health: health.combine(scores),
        environment: environment.combine(scores),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Reagent;

    fn catalog() -> ReagentCatalog {
        let mut catalog = ReagentCatalog::new();
        let mut water = Reagent::neutral("Water");
        water.sub_factors = SubFactor::ALL.iter().map(|f| (*f, 0.0)).collect();
        catalog.insert(water).expect("water");
        let mut methanol = Reagent::neutral("Methanol");
        methanol.sub_factors = SubFactor::ALL.iter().map(|f| (*f, 0.0)).collect();
        methanol.sub_factors.insert(SubFactor::S1, 0.6);
        catalog.insert(methanol).expect("methanol");
        catalog
    }

    #[test]
    fn test_even_split_halves_the_value() {
        let catalog = catalog();
        let masses: MassRecord = [("Water".to_string(), 5.0), ("Methanol".to_string(), 5.0)]
            .into_iter()
            .collect();
        let scores = SubFactorAggregator::new(&catalog).aggregate(&masses);
        assert!((scores.get(SubFactor::S1) - 30.0).abs() < 1e-9);
        assert_eq!(scores.get(SubFactor::H1), 0.0);
    }

    #[test]
    fn test_zero_mass_gives_zero_scores() {
        let catalog = catalog();
        let masses: MassRecord = [("Methanol".to_string(), 0.0)].into_iter().collect();
        let scores = SubFactorAggregator::new(&catalog).aggregate(&masses);
        assert!(SubFactor::ALL.iter().all(|f| scores.get(*f) == 0.0));
    }

    #[test]
    fn test_unknown_reagent_uses_fallback() {
        let catalog = catalog();
        let masses: MassRecord = [("Mystery".to_string(), 2.0)].into_iter().collect();
        let scores = SubFactorAggregator::new(&catalog).aggregate(&masses);
        assert!((scores.get(SubFactor::E2) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_major_factor_rollup() {
        let scores: SubFactorScores = [(SubFactor::H1, 40.0), (SubFactor::H2, 20.0)]
            .into_iter()
            .collect();
        let majors = combine_major_factors(
            &scores,
            SafetyScheme::PbtBalanced,
            HealthScheme::StrictCompliance,
            EnvironmentScheme::AbsoluteBalance,
        );
        assert!((majors.health - 38.0).abs() < 1e-9);
        assert_eq!(majors.safety, 0.0);
    }
}
