// src/matrix/mod.rs

//! Test matrix generation
//!
//! Turns the compatible versions of every dependency into a list of CI test
//! cases:
//! - a baseline case pinning every dependency to its first compatible version
//! - one case per other compatible version of each dependency, with every
//!   other dependency held at baseline
//!
//! Reduced ("first-last") mode only keeps the newest candidate per
//! dependency. A size cap randomly samples the candidates but never drops the
//! baseline, and sampled cases keep their generation order.

mod case;

pub use case::{Pin, TestCase};

use crate::resolver::{CompatibleVersions, VersionSlot};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

/// Candidate selection mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Every compatible version beyond the baseline
    #[default]
    Full,
    /// Only the newest version, plus omission for optional dependencies
    FirstLast,
}

impl Mode {
    /// Interpret a mode input; anything but `first-last` selects full mode
    pub fn from_input(input: &str) -> Self {
        if input.trim().eq_ignore_ascii_case("first-last") {
            Mode::FirstLast
        } else {
            Mode::Full
        }
    }
}

/// Matrix generation settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatrixConfig {
    /// Upper bound on emitted cases, baseline included; `None` or 0 is unbounded
    pub max_cases: Option<usize>,
    pub mode: Mode,
    /// Seed for reproducible sampling
    pub seed: Option<u64>,
}

/// A generated test matrix
#[derive(Debug, Clone)]
pub struct Matrix<'a> {
    baseline: TestCase<'a>,
    candidates: Vec<TestCase<'a>>,
    natural_total: usize,
}

impl<'a> Matrix<'a> {
    pub fn baseline(&self) -> &TestCase<'a> {
        &self.baseline
    }

    /// Non-baseline cases that survived sampling, in generation order
    pub fn candidates(&self) -> &[TestCase<'a>] {
        &self.candidates
    }

    /// Case count before any sampling
    pub fn natural_total(&self) -> usize {
        self.natural_total
    }

    pub fn len(&self) -> usize {
        1 + self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn is_truncated(&self) -> bool {
        self.len() < self.natural_total
    }

    /// Baseline first, then candidates
    pub fn cases(&self) -> impl Iterator<Item = &TestCase<'a>> {
        std::iter::once(&self.baseline).chain(self.candidates.iter())
    }

    pub fn render(&self) -> Vec<String> {
        self.cases().map(TestCase::render).collect()
    }
}

/// Versions of one dependency that get their own case
///
/// In first-last mode a list ending in `Omitted` contributes its newest
/// release and the omission; otherwise only the last entry is used, so a
/// required dependency never gets more than one candidate.
pub fn candidate_versions(versions: &[VersionSlot], mode: Mode) -> Vec<&VersionSlot> {
    match mode {
        Mode::Full => versions.iter().skip(1).collect(),
        Mode::FirstLast => match versions {
            [] | [_] => Vec::new(),
            [.., newest, last] if last.is_omitted() && versions.len() > 2 => {
                vec![newest, last]
            }
            [.., last] => vec![last],
        },
    }
}

/// The baseline case: every dependency at its first compatible version
pub fn baseline_case(versions: &CompatibleVersions) -> TestCase<'_> {
    TestCase::new(
        versions
            .iter()
            .map(|dep| Pin {
                name: &dep.name,
                slot: dep.baseline(),
            })
            .collect(),
    )
}

/// Every non-baseline case, dependency by dependency
pub fn candidate_pool(versions: &CompatibleVersions, mode: Mode) -> Vec<TestCase<'_>> {
    let baseline = baseline_case(versions);
    let mut pool = Vec::new();

    for (position, dep) in versions.iter().enumerate() {
        for slot in candidate_versions(&dep.versions, mode) {
            let mut pins = baseline.pins().to_vec();
            pins[position].slot = slot;
            pool.push(TestCase::new(pins));
        }
    }

    pool
}

/// Generate the matrix, sampling with `rng` when the cap applies
pub fn generate_with_rng<'a, R: Rng + ?Sized>(
    versions: &'a CompatibleVersions,
    config: &MatrixConfig,
    rng: &mut R,
) -> Matrix<'a> {
    let baseline = baseline_case(versions);
    let pool = candidate_pool(versions, config.mode);
    let natural_total = pool.len() + 1;

    let candidates = match config.max_cases.filter(|&max| max > 0) {
        Some(max) if natural_total > max => {
            info!("{} cases generated, truncating to {}", natural_total, max);
            let mut keep = vec![false; pool.len()];
            for index in rand::seq::index::sample(rng, pool.len(), max - 1).iter() {
                keep[index] = true;
            }
            pool.into_iter()
                .zip(keep)
                .filter_map(|(case, keep)| keep.then_some(case))
                .collect()
        }
        _ => {
            info!("{} cases generated", natural_total);
            pool
        }
    };

    Matrix {
        baseline,
        candidates,
        natural_total,
    }
}

/// Generate the matrix using the configured seed, or the thread RNG
pub fn generate<'a>(versions: &'a CompatibleVersions, config: &MatrixConfig) -> Matrix<'a> {
    match config.seed {
        Some(seed) => generate_with_rng(versions, config, &mut StdRng::seed_from_u64(seed)),
        None => generate_with_rng(versions, config, &mut rand::thread_rng()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slots(list: &[&str]) -> Vec<VersionSlot> {
        list.iter().map(|v| VersionSlot::from(*v)).collect()
    }

    fn optional(list: &[&str]) -> Vec<VersionSlot> {
        let mut versions = slots(list);
        versions.push(VersionSlot::Omitted);
        versions
    }

    /// A: [1.0, 1.1, 2.0], B (optional): [0.5, 0.6, omit]
    fn scenario() -> CompatibleVersions {
        let mut versions = CompatibleVersions::new();
        versions.insert("A", slots(&["1.0", "1.1", "2.0"])).unwrap();
        versions.insert("B", optional(&["0.5", "0.6"])).unwrap();
        versions
    }

    fn config(mode: Mode, max_cases: Option<usize>) -> MatrixConfig {
        MatrixConfig {
            max_cases,
            mode,
            seed: Some(7),
        }
    }

    #[test]
    fn test_mode_from_input() {
        assert_eq!(Mode::from_input("first-last"), Mode::FirstLast);
        assert_eq!(Mode::from_input("  First-Last \n"), Mode::FirstLast);
        assert_eq!(Mode::from_input(""), Mode::Full);
        assert_eq!(Mode::from_input("all"), Mode::Full);
    }

    #[test]
    fn test_full_mode_scenario() {
        let versions = scenario();
        let matrix = generate(&versions, &config(Mode::Full, None));
        assert_eq!(
            matrix.render(),
            vec![
                "A==1.0 B==0.5",
                "A==1.1 B==0.5",
                "A==2.0 B==0.5",
                "A==1.0 B==0.6",
                "A==1.0",
            ]
        );
        assert_eq!(matrix.natural_total(), 5);
        assert!(!matrix.is_truncated());
    }

    #[test]
    fn test_first_last_mode_scenario() {
        let versions = scenario();
        let matrix = generate(&versions, &config(Mode::FirstLast, None));
        assert_eq!(
            matrix.render(),
            vec!["A==1.0 B==0.5", "A==2.0 B==0.5", "A==1.0 B==0.6", "A==1.0"]
        );
    }

    #[test]
    fn test_first_last_tail_selection() {
        let omit = VersionSlot::Omitted;

        let list = optional(&["a", "b"]);
        assert_eq!(
            candidate_versions(&list, Mode::FirstLast),
            vec![&VersionSlot::from("b"), &omit]
        );

        let list = optional(&["a"]);
        assert_eq!(candidate_versions(&list, Mode::FirstLast), vec![&omit]);

        let list = slots(&["a"]);
        assert!(candidate_versions(&list, Mode::FirstLast).is_empty());
    }

    #[test]
    fn test_first_last_required_gets_one_candidate() {
        let list = slots(&["a", "b"]);
        assert_eq!(
            candidate_versions(&list, Mode::FirstLast),
            vec![&VersionSlot::from("b")]
        );

        let list = slots(&["a", "b", "c", "d"]);
        assert_eq!(
            candidate_versions(&list, Mode::FirstLast),
            vec![&VersionSlot::from("d")]
        );
    }

    #[test]
    fn test_full_mode_includes_omission() {
        let list = optional(&["a", "b"]);
        assert_eq!(
            candidate_versions(&list, Mode::Full),
            vec![&VersionSlot::from("b"), &VersionSlot::Omitted]
        );
    }

    #[test]
    fn test_full_mode_coverage() {
        let mut versions = CompatibleVersions::new();
        versions.insert("a", slots(&["1", "2", "3", "4"])).unwrap();
        versions.insert("b", optional(&["1"])).unwrap();
        versions.insert("c", slots(&["9"])).unwrap();
        versions.insert("d", optional(&["5", "6", "7"])).unwrap();

        let matrix = generate(&versions, &MatrixConfig::default());
        let baseline = matrix.baseline();

        for dep in &versions {
            for slot in &dep.versions[1..] {
                let matching: Vec<_> = matrix
                    .candidates()
                    .iter()
                    .filter(|case| {
                        case.pins().iter().all(|pin| {
                            if pin.name == dep.name {
                                pin.slot == slot
                            } else {
                                Some(pin.slot) == baseline.slot(pin.name)
                            }
                        })
                    })
                    .collect();
                assert_eq!(matching.len(), 1, "{} {}", dep.name, slot);
            }
        }
        assert_eq!(matrix.len(), 1 + 3 + 1 + 0 + 3);
    }

    #[test]
    fn test_single_version_dependencies_yield_baseline_only() {
        let mut versions = CompatibleVersions::new();
        versions.insert("a", slots(&["1"])).unwrap();
        versions.insert("b", slots(&["2"])).unwrap();

        let matrix = generate(&versions, &MatrixConfig::default());
        assert_eq!(matrix.render(), vec!["a==1 b==2"]);
    }

    #[test]
    fn test_cap_keeps_baseline_and_exact_count() {
        let versions = scenario();
        let pool: Vec<String> = candidate_pool(&versions, Mode::Full)
            .iter()
            .map(TestCase::render)
            .collect();

        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let matrix = generate_with_rng(&versions, &config(Mode::Full, Some(2)), &mut rng);
            let rendered = matrix.render();
            assert_eq!(rendered.len(), 2);
            assert_eq!(rendered[0], "A==1.0 B==0.5");
            assert!(pool.contains(&rendered[1]));
            assert!(matrix.is_truncated());
        }
    }

    #[test]
    fn test_cap_preserves_generation_order() {
        let mut versions = CompatibleVersions::new();
        versions
            .insert("a", slots(&["0", "1", "2", "3", "4", "5", "6", "7", "8"]))
            .unwrap();
        versions.insert("b", optional(&["0", "1", "2", "3", "4"])).unwrap();
        let pool: Vec<String> = candidate_pool(&versions, Mode::Full)
            .iter()
            .map(TestCase::render)
            .collect();

        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let matrix = generate_with_rng(&versions, &config(Mode::Full, Some(6)), &mut rng);
            let rendered = matrix.render();
            assert_eq!(rendered.len(), 6);

            let positions: Vec<usize> = rendered[1..]
                .iter()
                .map(|case| pool.iter().position(|p| p == case).unwrap())
                .collect();
            assert!(positions.windows(2).all(|w| w[0] < w[1]), "{:?}", positions);
        }
    }

    #[test]
    fn test_cap_samples_uniformly() {
        let versions = scenario();
        let pool: Vec<String> = candidate_pool(&versions, Mode::Full)
            .iter()
            .map(TestCase::render)
            .collect();
        let mut counts = vec![0usize; pool.len()];

        let mut rng = StdRng::seed_from_u64(2024);
        for _ in 0..2000 {
            let matrix = generate_with_rng(&versions, &config(Mode::Full, Some(2)), &mut rng);
            let picked = matrix.candidates()[0].render();
            counts[pool.iter().position(|p| *p == picked).unwrap()] += 1;
        }

        // Expected 500 each
        assert!(counts.iter().all(|&c| c > 400 && c < 600), "{:?}", counts);
    }

    #[test]
    fn test_cap_of_one_is_baseline_only() {
        let versions = scenario();
        let matrix = generate(&versions, &config(Mode::Full, Some(1)));
        assert_eq!(matrix.render(), vec!["A==1.0 B==0.5"]);
    }

    #[test]
    fn test_cap_not_reached_is_deterministic() {
        let versions = scenario();
        let unbounded = generate(&versions, &config(Mode::Full, None)).render();
        let cfg = MatrixConfig {
            max_cases: Some(5),
            mode: Mode::Full,
            seed: None,
        };
        for _ in 0..10 {
            assert_eq!(generate(&versions, &cfg).render(), unbounded);
        }
        let zero = MatrixConfig {
            max_cases: Some(0),
            ..cfg
        };
        assert_eq!(generate(&versions, &zero).render(), unbounded);
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let mut versions = CompatibleVersions::new();
        versions
            .insert("a", slots(&["1", "2", "3", "4", "5", "6", "7"]))
            .unwrap();
        versions.insert("b", optional(&["1", "2", "3"])).unwrap();
        let cfg = MatrixConfig {
            max_cases: Some(4),
            mode: Mode::Full,
            seed: Some(99),
        };

        let first = generate(&versions, &cfg).render();
        for _ in 0..5 {
            assert_eq!(generate(&versions, &cfg).render(), first);
        }
    }
}
