//! Effects - side effects declared by the reducer

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Look up every city in a full fetch cycle
    FetchCycle { cycle: u64, cities: Vec<String> },
    /// Look up one newly added city; `cycle` is the full cycle current at add time
    FetchCity { city: String, cycle: u64 },
}
