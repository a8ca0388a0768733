use crate::errors::InvalidMetricError;
use crate::representational::RepresentationalMeasure::{Complementary, Raw, Reciprocal};
use crate::representational::{RepresentationalMeasure, SupLimit, DEFAULT_SUP_LIMIT};
use serde::{Deserialize, Serialize};
use std::hash::Hash;
use RepresentationalMetric as R;

/// Accepted as a metric symbol or attribute name by the registry and report functions, so
/// callers can pass `&str` and `String` slices alike. Owned copies are only made for error
/// messages.
pub trait StringLike: AsRef<str> + Eq + Hash + ToString {}
impl<T> StringLike for T where T: AsRef<str> + Eq + Hash + ToString {}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Hash)]
pub enum RepresentationalMetric {
    Richness,
    Ens,
    Simpsons,
    SimpsonsReciprocal,
    SimpsonsDiversity,
    ShannonDiversity,
    ShannonEvenness,
    NormalizedStandardDeviation,
    ImbalanceRatio,
    BergerParker,
}

impl RepresentationalMetric {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Richness => "R",
            Self::Ens => "ENS",
            Self::Simpsons => "D",
            Self::SimpsonsReciprocal => "1/D",
            Self::SimpsonsDiversity => "1-D",
            Self::ShannonDiversity => "H",
            Self::ShannonEvenness => "SEI",
            Self::NormalizedStandardDeviation => "NSD",
            Self::ImbalanceRatio => "IR",
            Self::BergerParker => "BP",
        }
    }
}

impl std::fmt::Display for RepresentationalMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

pub const FULL_REPRESENTATIONAL_METRICS: [RepresentationalMetric; 10] = [
    RepresentationalMetric::Richness,
    RepresentationalMetric::Ens,
    RepresentationalMetric::Simpsons,
    RepresentationalMetric::SimpsonsReciprocal,
    RepresentationalMetric::SimpsonsDiversity,
    RepresentationalMetric::ShannonDiversity,
    RepresentationalMetric::ShannonEvenness,
    RepresentationalMetric::NormalizedStandardDeviation,
    RepresentationalMetric::ImbalanceRatio,
    RepresentationalMetric::BergerParker,
];

impl TryFrom<&str> for RepresentationalMetric {
    type Error = ();
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        FULL_REPRESENTATIONAL_METRICS
            .into_iter()
            .find(|m| m.symbol() == value)
            .ok_or(())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Hash)]
pub enum StereotypicalMetric {
    CramersV,
    TschuprowsT,
    PearsonsC,
    TheilsU,
    TheilsUReverse,
    NormalizedMutualInformation,
    ChiSquaredPValue,
}

impl StereotypicalMetric {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::CramersV => "ϕ_C",
            Self::TschuprowsT => "T",
            Self::PearsonsC => "C",
            Self::TheilsU => "U→",
            Self::TheilsUReverse => "U←",
            Self::NormalizedMutualInformation => "NMI",
            Self::ChiSquaredPValue => "χ²",
        }
    }
}

impl std::fmt::Display for StereotypicalMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

pub const FULL_STEREOTYPICAL_METRICS: [StereotypicalMetric; 7] = [
    StereotypicalMetric::CramersV,
    StereotypicalMetric::TschuprowsT,
    StereotypicalMetric::PearsonsC,
    StereotypicalMetric::TheilsU,
    StereotypicalMetric::TheilsUReverse,
    StereotypicalMetric::NormalizedMutualInformation,
    StereotypicalMetric::ChiSquaredPValue,
];

impl TryFrom<&str> for StereotypicalMetric {
    type Error = ();
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        FULL_STEREOTYPICAL_METRICS
            .into_iter()
            .find(|m| m.symbol() == value)
            .ok_or(())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Hash)]
pub enum LocalStereotypicalMetric {
    Npmi,
    DuchersZ,
    LewontinsD,
}

impl LocalStereotypicalMetric {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Npmi => "NPMI",
            Self::DuchersZ => "Ducher's Z",
            Self::LewontinsD => "Lewontin's D",
        }
    }
}

impl std::fmt::Display for LocalStereotypicalMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

pub const FULL_LOCAL_STEREOTYPICAL_METRICS: [LocalStereotypicalMetric; 3] = [
    LocalStereotypicalMetric::Npmi,
    LocalStereotypicalMetric::DuchersZ,
    LocalStereotypicalMetric::LewontinsD,
];

impl TryFrom<&str> for LocalStereotypicalMetric {
    type Error = ();
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        FULL_LOCAL_STEREOTYPICAL_METRICS
            .into_iter()
            .find(|m| m.symbol() == value)
            .ok_or(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricFamily {
    Representational,
    Stereotypical,
    LocalStereotypical,
}

/// Fixed, ordered mapping from display symbol to metric. Registries are built at compile time and
/// never change, so they can be shared freely across threads.
#[derive(Debug)]
pub struct MetricRegistry<M: 'static> {
    family: MetricFamily,
    entries: &'static [(&'static str, M)],
}

impl<M: 'static> MetricRegistry<M> {
    pub const fn new(family: MetricFamily, entries: &'static [(&'static str, M)]) -> Self {
        MetricRegistry { family, entries }
    }

    pub fn family(&self) -> MetricFamily {
        self.family
    }

    pub fn get(&self, symbol: &str) -> Option<&'static M> {
        self.entries
            .iter()
            .find(|(s, _)| *s == symbol)
            .map(|(_, m)| m)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'static M)> {
        let entries: &'static [(&'static str, M)] = self.entries;
        entries.iter().map(|(s, m)| (*s, m))
    }

    pub fn symbols(&self) -> Vec<&'static str> {
        self.entries.iter().map(|(s, _)| *s).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Subset of the registry in the order requested. Every unknown symbol is reported at once.
    pub fn select<S>(
        &self,
        symbols: &[S],
    ) -> Result<Vec<(&'static str, &'static M)>, InvalidMetricError>
    where
        S: StringLike,
    {
        let mut selected: Vec<(&'static str, &'static M)> = Vec::with_capacity(symbols.len());
        let mut error_metrics: Vec<String> = Vec::with_capacity(symbols.len());
        for s in symbols.iter() {
            match self.entries.iter().find(|(symbol, _)| *symbol == s.as_ref()) {
                Some((symbol, m)) => selected.push((*symbol, m)),
                None => error_metrics.push(s.to_string()),
            }
        }

        if !error_metrics.is_empty() {
            return Err(match self.family {
                MetricFamily::Representational => {
                    InvalidMetricError::Representational(error_metrics)
                }
                MetricFamily::Stereotypical => InvalidMetricError::Stereotypical(error_metrics),
                MetricFamily::LocalStereotypical => {
                    InvalidMetricError::LocalStereotypical(error_metrics)
                }
            });
        }

        Ok(selected)
    }
}

/// Every representational metric in its natural orientation.
pub static REPRESENTATIONAL_METRICS: MetricRegistry<RepresentationalMeasure> = MetricRegistry::new(
    MetricFamily::Representational,
    &[
        ("R", Raw(R::Richness)),
        ("ENS", Raw(R::Ens)),
        ("D", Raw(R::Simpsons)),
        ("1/D", Raw(R::SimpsonsReciprocal)),
        ("1-D", Raw(R::SimpsonsDiversity)),
        ("H", Raw(R::ShannonDiversity)),
        ("SEI", Raw(R::ShannonEvenness)),
        ("NSD", Raw(R::NormalizedStandardDeviation)),
        ("IR", Raw(R::ImbalanceRatio)),
        ("BP", Raw(R::BergerParker)),
    ],
);

/// Representational metrics oriented so that higher means more diverse.
pub static REPRESENTATIONAL_AS_DIVERSITY: MetricRegistry<RepresentationalMeasure> =
    MetricRegistry::new(
        MetricFamily::Representational,
        &[
            ("R", Raw(R::Richness)),
            ("ENS", Raw(R::Ens)),
            ("1/D", Raw(R::SimpsonsReciprocal)),
            ("1-D", Raw(R::SimpsonsDiversity)),
            ("H", Raw(R::ShannonDiversity)),
            ("SEI", Raw(R::ShannonEvenness)),
            (
                "1-NSD",
                Complementary {
                    metric: R::NormalizedStandardDeviation,
                    sup_limit: SupLimit::Constant(DEFAULT_SUP_LIMIT),
                },
            ),
            ("1/IR", Reciprocal(R::ImbalanceRatio)),
            (
                "1-BP",
                Complementary {
                    metric: R::BergerParker,
                    sup_limit: SupLimit::Constant(DEFAULT_SUP_LIMIT),
                },
            ),
        ],
    );

/// Representational metrics oriented so that higher means more imbalanced.
pub static REPRESENTATIONAL_AS_BIAS: MetricRegistry<RepresentationalMeasure> = MetricRegistry::new(
    MetricFamily::Representational,
    &[
        (
            "R-ENS",
            Complementary {
                metric: R::Ens,
                sup_limit: SupLimit::Metric(R::Richness),
            },
        ),
        ("D", Raw(R::Simpsons)),
        (
            "R-1/D",
            Complementary {
                metric: R::SimpsonsReciprocal,
                sup_limit: SupLimit::Metric(R::Richness),
            },
        ),
        (
            "1-SEI",
            Complementary {
                metric: R::ShannonEvenness,
                sup_limit: SupLimit::Constant(DEFAULT_SUP_LIMIT),
            },
        ),
        ("NSD", Raw(R::NormalizedStandardDeviation)),
        ("IR", Raw(R::ImbalanceRatio)),
        ("BP", Raw(R::BergerParker)),
    ],
);

/// Scalar association measures. The chi-squared p-value is a significance level rather than an
/// association strength and is left out.
pub static STEREOTYPICAL_METRICS: MetricRegistry<StereotypicalMetric> = MetricRegistry::new(
    MetricFamily::Stereotypical,
    &[
        ("ϕ_C", StereotypicalMetric::CramersV),
        ("T", StereotypicalMetric::TschuprowsT),
        ("C", StereotypicalMetric::PearsonsC),
        ("U→", StereotypicalMetric::TheilsU),
        ("U←", StereotypicalMetric::TheilsUReverse),
        ("NMI", StereotypicalMetric::NormalizedMutualInformation),
    ],
);

pub static LOCAL_STEREOTYPICAL_METRICS: MetricRegistry<LocalStereotypicalMetric> =
    MetricRegistry::new(
        MetricFamily::LocalStereotypical,
        &[
            ("NPMI", LocalStereotypicalMetric::Npmi),
            ("Ducher's Z", LocalStereotypicalMetric::DuchersZ),
            ("Lewontin's D", LocalStereotypicalMetric::LewontinsD),
        ],
    );
