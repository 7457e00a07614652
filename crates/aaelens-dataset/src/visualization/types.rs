use std::collections::BTreeMap;

/// Equal-width histogram over `[min_value, max_value]`
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub min_value: f64,
    pub max_value: f64,
    pub bin_width: f64,
    pub bin_counts: Vec<usize>,
}

/// Number of samples assigned to each predicted label
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelDistribution {
    pub counts: BTreeMap<usize, usize>,
}
