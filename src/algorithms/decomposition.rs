// src/algorithms/decomposition.rs
//! Breakdown of the poor population by demographic subgroup.

use crate::algorithms::CensoredDeprivation;
use crate::core::{AfError, Result};
use crate::utils::ratio_or_zero;
use log::debug;
use serde::Serialize;

/// One demographic attribute, e.g. "Gender", with a label per person.
#[derive(Debug, Clone, PartialEq)]
pub struct Demographic {
    pub name: String,
    pub labels: Vec<String>,
}

impl Demographic {
    pub fn new(name: impl Into<String>, labels: Vec<String>) -> Self {
        Demographic {
            name: name.into(),
            labels,
        }
    }
}

/// Share of the poor population falling into each label of one attribute.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubgroupShares {
    pub name: String,
    /// (label, share) in first-seen order.
    pub shares: Vec<(String, f64)>,
}

impl SubgroupShares {
    pub fn share(&self, label: &str) -> Option<f64> {
        self.shares.iter().find(|(l, _)| l == label).map(|(_, s)| *s)
    }
}

/// Products of shares across two different attributes, e.g. "Gender-Region".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossProducts {
    pub name: String,
    /// ("labelA-labelB", product)
    pub products: Vec<(String, f64)>,
}

/// For every attribute and label, the fraction of poor persons carrying it.
///
/// A person is counted as poor here when their censored score is positive.
/// With no poor persons every share is 0.
pub fn subgroup_shares(
    demographics: &[Demographic],
    censored: &CensoredDeprivation,
) -> Result<Vec<SubgroupShares>> {
    let n = censored.n_persons();
    let poor: Vec<bool> = censored.censored_scores().iter().map(|&c| c > 0.0).collect();
    let total_poor = poor.iter().filter(|&&p| p).count();

    demographics
        .iter()
        .map(|demographic| {
            if demographic.labels.len() != n {
                return Err(AfError::ShapeMismatch(format!(
                    "Demographic '{}' has {} labels, but there are {} persons.",
                    demographic.name,
                    demographic.labels.len(),
                    n
                )));
            }

            let mut counts: Vec<(String, usize)> = Vec::new();
            for (label, &is_poor) in demographic.labels.iter().zip(&poor) {
                let slot = match counts.iter().position(|(l, _)| l == label) {
                    Some(idx) => idx,
                    None => {
                        counts.push((label.clone(), 0));
                        counts.len() - 1
                    }
                };
                if is_poor {
                    counts[slot].1 += 1;
                }
            }

            debug!(
                "Subgroup '{}': {} labels over {} poor persons",
                demographic.name,
                counts.len(),
                total_poor
            );

            Ok(SubgroupShares {
                name: demographic.name.clone(),
                shares: counts
                    .into_iter()
                    .map(|(label, count)| (label, ratio_or_zero(count as f64, total_poor as f64)))
                    .collect(),
            })
        })
        .collect()
}

/// Multiplies every pair of shares drawn from two different attributes.
///
/// Entries are flattened in attribute order then label order; each pair
/// (i, j) with i < j and different attributes contributes one product,
/// grouped under "AttrI-AttrJ".
pub fn pairwise_products(shares: &[SubgroupShares]) -> Vec<CrossProducts> {
    let flat: Vec<(&str, &str, f64)> = shares
        .iter()
        .flat_map(|group| {
            group
                .shares
                .iter()
                .map(move |(label, share)| (group.name.as_str(), label.as_str(), *share))
        })
        .collect();

    let mut groups: Vec<CrossProducts> = Vec::new();
    for (i, &(name_a, label_a, share_a)) in flat.iter().enumerate() {
        for &(name_b, label_b, share_b) in &flat[i + 1..] {
            if name_a == name_b {
                continue;
            }
            let group_name = format!("{}-{}", name_a, name_b);
            let entry = (format!("{}-{}", label_a, label_b), share_a * share_b);
            match groups.iter_mut().find(|g| g.name == group_name) {
                Some(group) => group.products.push(entry),
                None => groups.push(CrossProducts {
                    name: group_name,
                    products: vec![entry],
                }),
            }
        }
    }
    groups
}
