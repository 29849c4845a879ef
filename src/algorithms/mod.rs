pub mod aggregates;
pub mod censoring;
pub mod decomposition;
pub mod engine;
pub mod weighted;

pub use aggregates::Aggregates;
pub use censoring::{CensoredDeprivation, PovertyStatus, CUTOFF_TOLERANCE};
pub use decomposition::{pairwise_products, subgroup_shares, CrossProducts, Demographic, SubgroupShares};
pub use engine::{aggregate, AlkireFoster, PovertyProfile};
pub use weighted::WeightedDeprivation;
