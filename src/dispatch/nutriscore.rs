//! Nutri-Score distribution over a batch of products

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::catalog::{NutriScore, Product};

/// Count of products per grade, always covering A-E and `?`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NutriScoreDistribution {
    counts: [u64; 6],
}

impl NutriScoreDistribution {
    pub fn from_products(products: &[Product]) -> Self {
        products.iter().map(Product::nutriscore).collect()
    }

    pub fn record(&mut self, grade: NutriScore) {
        self.counts[grade.index()] += 1;
    }

    pub fn count(&self, grade: NutriScore) -> u64 {
        self.counts[grade.index()]
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// `(grade, count)` pairs in A-E, `?` order
    pub fn iter(&self) -> impl Iterator<Item = (NutriScore, u64)> + '_ {
        NutriScore::ALL
            .iter()
            .map(move |grade| (*grade, self.count(*grade)))
    }
}

impl FromIterator<NutriScore> for NutriScoreDistribution {
    fn from_iter<I: IntoIterator<Item = NutriScore>>(iter: I) -> Self {
        let mut distribution = NutriScoreDistribution::default();
        for grade in iter {
            distribution.record(grade);
        }
        distribution
    }
}

impl Serialize for NutriScoreDistribution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(NutriScore::ALL.len()))?;
        for (grade, count) in self.iter() {
            map.serialize_entry(grade.as_str(), &count)?;
        }
        map.end()
    }
}
