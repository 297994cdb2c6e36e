use badwolf_model::{Node, Predicate, Triple, TimeAnchor};
use badwolf_table::{AggregationKind, Direction};
use smol_str::SmolStr;

use crate::having::{HavingExpr, Operand};
use crate::term::{ExtractionSet, FilterCall, Term};

/// The eight statement shapes (§3.3, §6.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Query,
    Insert,
    Delete,
    Create,
    Drop,
    Construct,
    Deconstruct,
    Show,
}

/// One `WHERE` pattern row: `Subject Predicate Object` with per-position
/// extraction aliases (§3.3).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphClause {
    pub subject: Option<Term>,
    pub subject_extraction: ExtractionSet,
    pub predicate: Option<Term>,
    pub predicate_extraction: ExtractionSet,
    pub object: Option<Term>,
    pub object_extraction: ExtractionSet,
    pub optional: bool,
    pub filters: Vec<FilterCall>,
}

/// One projected output column: `binding`, optional `AS alias`, optional
/// aggregation (`COUNT`/`COUNT DISTINCT`/`SUM`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionItem {
    pub binding: SmolStr,
    pub alias: Option<SmolStr>,
    pub aggregation: Option<AggregationKind>,
}

impl ProjectionItem {
    /// The column name this item surfaces downstream: the alias if given,
    /// else the bare binding.
    pub fn output_name(&self) -> SmolStr {
        self.alias.clone().unwrap_or_else(|| self.binding.clone())
    }
}

/// One `CONSTRUCT`/`DECONSTRUCT` reification template: a subject term plus
/// the predicate-object pairs attached to it (§3.3, §4.4.5).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstructTemplate {
    pub subject: Option<Term>,
    pub pairs: Vec<(Term, Term)>,
}

/// The parsed BQL statement (§3.3): the mutable target the grammar's hooks
/// populate. Scratch/working fields exist purely for hook bookkeeping during
/// a parse and are meaningless once `Parser::parse` returns (§5: "hooks are
/// not invoked after Parse returns").
#[derive(Debug, Clone)]
pub struct Statement {
    pub kind: Kind,
    pub input_graphs: Vec<SmolStr>,
    pub output_graphs: Vec<SmolStr>,
    pub graph_bindings: Vec<SmolStr>,
    pub data_triples: Vec<Triple>,
    pub clauses: Vec<GraphClause>,
    pub projection: Vec<ProjectionItem>,
    pub group_by: Vec<SmolStr>,
    pub order_by: Vec<(SmolStr, Direction)>,
    pub having: Option<HavingExpr>,
    pub lower_bound: Option<TimeAnchor>,
    pub upper_bound: Option<TimeAnchor>,
    pub limit: Option<usize>,
    pub construct_templates: Vec<ConstructTemplate>,

    pub(crate) scratch: Scratch,
}

/// All hook-only bookkeeping state, kept in one place so `Statement`'s public
/// fields read as plain query data (§9: "Statement owns data only").
#[derive(Debug, Clone, Default)]
pub(crate) struct Scratch {
    pub role: Role,
    pub graph_target: GraphTarget,
    pub pending_alias: Option<AliasKeyword>,
    pub working_clause: GraphClause,
    pub working_filter_fn: Option<SmolStr>,
    pub working_construct: ConstructTemplate,
    pub pending_pair_predicate: Option<Term>,

    // HAVING expression assembly (see grammar.rs for the NEGATABLE/HAVING_ATOM split).
    pub having_first_operand: Option<Operand>,
    pub having_second_operand: Option<Operand>,
    pub having_pending_cmp: Option<CmpOp>,
    pub having_negatable_result: Option<HavingExpr>,
    pub having_chain: Vec<HavingExpr>,
    pub having_ops: Vec<BoolOp>,

    // INSERT/DELETE DATA triple assembly.
    pub triple_subject: Option<Node>,
    pub triple_predicate: Option<Predicate>,

    // Shared by every comma-separated list production (graph lists, GROUP BY,
    // ORDER BY bindings).
    pub list_buffer: Vec<SmolStr>,
    pub order_direction_buffer: Vec<Direction>,

    // Projection item assembly.
    pub pending_aggregation: Option<AggregationKind>,
    pub pending_binding: Option<SmolStr>,
    pub pending_projection_alias: Option<SmolStr>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum Role {
    #[default]
    None,
    Subject,
    Predicate,
    Object,
}

/// Which `Statement` field the next `GRAPH_LIST` production should drain
/// into; flipped by the `INTO`/`FROM`/`IN` keywords of whichever top-level
/// clause is in progress (§6.1: `CONSTRUCT`/`DECONSTRUCT` reference two
/// separate graph lists in one statement).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum GraphTarget {
    #[default]
    Input,
    Output,
    Binding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AliasKeyword {
    As,
    Type,
    Id,
    At,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CmpOp {
    Eq,
    Lt,
    Gt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BoolOp {
    And,
    Or,
}

impl Statement {
    pub fn new(kind: Kind) -> Self {
        Self {
            kind,
            input_graphs: Vec::new(),
            output_graphs: Vec::new(),
            graph_bindings: Vec::new(),
            data_triples: Vec::new(),
            clauses: Vec::new(),
            projection: Vec::new(),
            group_by: Vec::new(),
            order_by: Vec::new(),
            having: None,
            lower_bound: None,
            upper_bound: None,
            limit: None,
            construct_templates: Vec::new(),
            scratch: Scratch::default(),
        }
    }
}
