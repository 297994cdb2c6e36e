use std::fmt;

/// Case-insensitive BQL keywords (§4.1, §6.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(clippy::upper_case_acronyms)]
pub enum Keyword {
    Select,
    Insert,
    Delete,
    Create,
    Construct,
    Deconstruct,
    Drop,
    Graph,
    Graphs,
    Data,
    Into,
    From,
    Where,
    As,
    Type,
    Id,
    At,
    In,
    Before,
    After,
    Between,
    Count,
    Distinct,
    Sum,
    Group,
    By,
    Order,
    Asc,
    Desc,
    Having,
    Limit,
    Not,
    And,
    Or,
    Show,
    Optional,
    Filter,
}

impl Keyword {
    /// Returns the keyword matching `text` case-insensitively, if any.
    pub fn lookup(text: &str) -> Option<Keyword> {
        use Keyword::*;
        Some(match_ignore_ascii_case(
            text,
            &[
                ("select", Select),
                ("insert", Insert),
                ("delete", Delete),
                ("create", Create),
                ("construct", Construct),
                ("deconstruct", Deconstruct),
                ("drop", Drop),
                ("graph", Graph),
                ("graphs", Graphs),
                ("data", Data),
                ("into", Into),
                ("from", From),
                ("where", Where),
                ("as", As),
                ("type", Type),
                ("id", Id),
                ("at", At),
                ("in", In),
                ("before", Before),
                ("after", After),
                ("between", Between),
                ("count", Count),
                ("distinct", Distinct),
                ("sum", Sum),
                ("group", Group),
                ("by", By),
                ("order", Order),
                ("asc", Asc),
                ("desc", Desc),
                ("having", Having),
                ("limit", Limit),
                ("not", Not),
                ("and", And),
                ("or", Or),
                ("show", Show),
                ("optional", Optional),
                ("filter", Filter),
            ],
        )?)
    }

    pub fn text(&self) -> &'static str {
        use Keyword::*;
        match self {
            Select => "select",
            Insert => "insert",
            Delete => "delete",
            Create => "create",
            Construct => "construct",
            Deconstruct => "deconstruct",
            Drop => "drop",
            Graph => "graph",
            Graphs => "graphs",
            Data => "data",
            Into => "into",
            From => "from",
            Where => "where",
            As => "as",
            Type => "type",
            Id => "id",
            At => "at",
            In => "in",
            Before => "before",
            After => "after",
            Between => "between",
            Count => "count",
            Distinct => "distinct",
            Sum => "sum",
            Group => "group",
            By => "by",
            Order => "order",
            Asc => "asc",
            Desc => "desc",
            Having => "having",
            Limit => "limit",
            Not => "not",
            And => "and",
            Or => "or",
            Show => "show",
            Optional => "optional",
            Filter => "filter",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

fn match_ignore_ascii_case<T: Copy>(text: &str, table: &[(&str, T)]) -> Option<T> {
    table
        .iter()
        .find(|(candidate, _)| candidate.eq_ignore_ascii_case(text))
        .map(|(_, value)| *value)
}
