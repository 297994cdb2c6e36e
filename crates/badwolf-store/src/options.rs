use badwolf_model::TimeAnchor;

/// Reserved for store-side predicate/temporal filtering hints. Every filter
/// function and bound check named in §4.4.3d is applied by the planner after
/// a fetch returns, so no current store implementation inspects this; it
/// exists so a future backend capable of pushing those checks down has
/// somewhere to receive them without changing the trait signature.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterOptions;

/// Bounds one streaming lookup (§6.2): how many elements to return at most,
/// and the temporal window (inclusive on both ends, §3.2) a predicate's
/// anchor must fall within.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LookupOptions {
    pub max_elements: Option<usize>,
    pub lower_anchor: Option<TimeAnchor>,
    pub upper_anchor: Option<TimeAnchor>,
    pub filter: FilterOptions,
}

impl LookupOptions {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn with_max_elements(mut self, max_elements: usize) -> Self {
        self.max_elements = Some(max_elements);
        self
    }

    pub fn with_window(mut self, lower: Option<TimeAnchor>, upper: Option<TimeAnchor>) -> Self {
        self.lower_anchor = lower;
        self.upper_anchor = upper;
        self
    }
}
