use smol_str::SmolStr;

/// What to compute for one output column of a `GROUP BY` (§4.4.3f). The
/// parser's semantic model also uses this to describe a projected
/// aggregation before a `GroupBy` statement exists — grouping by nothing at
/// all still runs one implicit group over the whole table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AggregationKind {
    Count,
    CountDistinct,
    Sum,
}

/// One aggregation target: compute `kind` over `binding`, emit it under
/// `alias`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregation {
    pub binding: SmolStr,
    pub kind: AggregationKind,
    pub alias: SmolStr,
}

impl Aggregation {
    pub fn new(binding: impl Into<SmolStr>, kind: AggregationKind, alias: impl Into<SmolStr>) -> Self {
        Self {
            binding: binding.into(),
            kind,
            alias: alias.into(),
        }
    }
}

/// `ORDER BY` direction for one binding (§3.3); a binding with no explicit
/// direction defaults to `Asc` (open question (c), §9).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}
