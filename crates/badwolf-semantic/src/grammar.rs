//! BQL's concrete grammar (§6.1): a `Grammar<TokenKind, Statement, SemanticError>`
//! wiring keyword productions onto hooks that build a `Statement`.
//!
//! Left-factoring forces a few symbols that look unusual next to a textbook
//! EBNF reading of §6.1:
//! - List productions come in `X`/`X_TAIL` pairs (`GRAPH_LIST`/`GRAPH_LIST_TAIL`,
//!   `ORDER_LIST`/`ORDER_LIST_TAIL`, ...): `X` parses one item, `X_TAIL` is
//!   either `, X` or ε. This is the only shape that keeps every non-ε clause's
//!   first element a terminal while still letting a list be empty-tailed.
//! - `HAVING` splits into `NEGATABLE` (one comparison, or a `NOT` of one) and
//!   `HAVING_ATOM` (the same five leading forms, each additionally carrying a
//!   trailing `HAVING_TAIL`). Folding `NOT` through a symbol that already
//!   carries its own `AND`/`OR` tail would let the tail bind *inside* the
//!   negation (`NOT a AND b` parsing as `NOT (a AND b)`); splitting the
//!   unary prefix out of the chaining symbol keeps `NOT` binding to exactly
//!   one operand.
//! - `AND`/`OR` fold left-to-right despite the right-recursive shape: each
//!   `HAVING_ATOM`/`HAVING_TAIL` pushes its piece onto a flat
//!   `(atoms, connecting ops)` pair on `Scratch`, and `HAVING_OPT` does the
//!   single final fold once the whole chain has been collected.

use badwolf_grammar::{Clause, ConsumedElement, Element, Grammar, Hooks, ParseError};
use badwolf_helpers::IndexSet;
use badwolf_lexer::{Keyword, Symbol as Punct, TokenKind};
use badwolf_model::{Literal, Node, Predicate, PredicateBound, TimeAnchor};
use badwolf_table::{AggregationKind, Direction};
use smol_str::SmolStr;

use crate::having::{HavingExpr, Operand};
use crate::statement::{
    AliasKeyword, BoolOp, CmpOp, ConstructTemplate, GraphClause, GraphTarget, Kind,
    ProjectionItem, Role, Statement,
};
use crate::term::{binding_name, BoundTerm, FilterCall, FilterFn, Term};
use crate::SemanticError;

type Cl = Clause<TokenKind, Statement, SemanticError>;
type Hk = Hooks<TokenKind, Statement, SemanticError>;

// ---------------------------------------------------------------------------
// Token -> typed value conversions
// ---------------------------------------------------------------------------

fn term_from_terminal(kind: &TokenKind, text: &SmolStr) -> Result<Term, SemanticError> {
    match kind {
        TokenKind::Variable => Ok(Term::Var(binding_name(text))),
        TokenKind::Node => Node::parse(text)
            .map(BoundTerm::Node)
            .map(Term::Bound)
            .map_err(|e| SemanticError::InvalidNode {
                text: text.clone(),
                reason: e.to_string(),
            }),
        TokenKind::Predicate => parse_predicate_term(text).map(Term::Bound),
        TokenKind::Literal => parse_literal_value(text)
            .map(BoundTerm::Literal)
            .map(Term::Bound),
        TokenKind::BlankNode => Ok(Term::Bound(BoundTerm::BlankNode(
            text.trim_start_matches("_:").into(),
        ))),
        _ => Err(SemanticError::Internal("unexpected token kind for a clause term")),
    }
}

/// A predicate-position token is `"id"@[]`/`"id"@[t]` (exact) or `"id"@[lo,hi]`
/// (a query-only bound range); try the exact form first.
fn parse_predicate_term(text: &str) -> Result<BoundTerm, SemanticError> {
    if let Ok(p) = Predicate::parse(text) {
        return Ok(BoundTerm::Predicate(p));
    }
    PredicateBound::parse(text)
        .map(BoundTerm::PredicateBound)
        .map_err(|e| SemanticError::InvalidPredicate {
            text: text.into(),
            reason: e.to_string(),
        })
}

fn parse_predicate_constant(text: &str) -> Result<Predicate, SemanticError> {
    Predicate::parse(text).map_err(|e| SemanticError::InvalidPredicate {
        text: text.into(),
        reason: e.to_string(),
    })
}

fn parse_literal_value(text: &str) -> Result<Literal, SemanticError> {
    let invalid = |reason: String| SemanticError::InvalidLiteral {
        text: text.into(),
        reason,
    };
    let rest = text
        .strip_prefix('"')
        .ok_or_else(|| invalid("expected \"value\"^^type:kind".into()))?;
    let close = rest
        .rfind("\"^^type:")
        .ok_or_else(|| invalid("expected \"value\"^^type:kind".into()))?;
    let value = &rest[..close];
    let kind = &rest[close + "\"^^type:".len()..];
    Literal::parse(value, kind).map_err(|e| invalid(e.to_string()))
}

/// `BEFORE`/`AFTER`/`BETWEEN` bounds have no dedicated token kind; they're
/// lexed as a text literal holding an RFC3339 timestamp.
fn parse_time_literal(text: &str) -> Result<TimeAnchor, SemanticError> {
    let literal = parse_literal_value(text)?;
    let Literal::Text(value) = literal else {
        return Err(SemanticError::InvalidLiteral {
            text: text.into(),
            reason: "time window bound must be a text literal holding an RFC3339 timestamp"
                .into(),
        });
    };
    TimeAnchor::parse(&value).map_err(|e| SemanticError::InvalidLiteral {
        text: text.into(),
        reason: e.to_string(),
    })
}

fn parse_limit_literal(text: &str) -> Result<usize, SemanticError> {
    match parse_literal_value(text)? {
        Literal::Int64(n) if n >= 0 => Ok(n as usize),
        _ => Err(SemanticError::InvalidLiteral {
            text: text.into(),
            reason: "LIMIT must be a non-negative int64 literal".into(),
        }),
    }
}

fn operand_from_token(kind: &TokenKind, text: &SmolStr) -> Result<Operand, SemanticError> {
    match kind {
        TokenKind::Variable => Ok(Operand::Binding(binding_name(text))),
        TokenKind::Node => Node::parse(text).map(Operand::Node).map_err(|e| {
            SemanticError::InvalidNode {
                text: text.clone(),
                reason: e.to_string(),
            }
        }),
        TokenKind::Predicate => parse_predicate_constant(text).map(Operand::Predicate),
        TokenKind::Literal => parse_literal_value(text).map(Operand::Literal),
        _ => Err(SemanticError::Internal("unexpected token kind for a HAVING operand")),
    }
}

fn is_nonterminal(consumed: &ConsumedElement<TokenKind>, symbol: &str) -> bool {
    matches!(consumed, ConsumedElement::NonTerminal(sym) if *sym == symbol)
}

// ---------------------------------------------------------------------------
// Graph lists (FROM / INTO / IN / CREATE GRAPH / DROP GRAPH)
// ---------------------------------------------------------------------------

fn finalize_graph_list(stmt: &mut Statement) -> Result<(), SemanticError> {
    let names = std::mem::take(&mut stmt.scratch.list_buffer);
    let mut seen: IndexSet<SmolStr> = IndexSet::default();
    for name in &names {
        if !seen.insert(name.clone()) {
            return Err(SemanticError::DuplicateGraph(name.clone()));
        }
    }
    match stmt.scratch.graph_target {
        GraphTarget::Input => stmt.input_graphs.extend(names),
        GraphTarget::Output => stmt.output_graphs.extend(names),
        GraphTarget::Binding => stmt.graph_bindings.extend(names),
    }
    Ok(())
}

fn graph_list_finish_element(
    stmt: &mut Statement,
    consumed: &ConsumedElement<TokenKind>,
) -> Result<(), SemanticError> {
    if is_nonterminal(consumed, "GRAPH_LIST") {
        finalize_graph_list(stmt)?;
    }
    Ok(())
}

/// Shared by `GRAPH_LIST`, `GROUP_LIST`, and `ORDER_LIST`: their leading
/// element is always a bare `Variable` binding.
fn push_variable_to_list_buffer(
    stmt: &mut Statement,
    consumed: &ConsumedElement<TokenKind>,
) -> Result<(), SemanticError> {
    if let ConsumedElement::Terminal(TokenKind::Variable, text) = consumed {
        stmt.scratch.list_buffer.push(binding_name(text));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Projection (VARS)
// ---------------------------------------------------------------------------

fn finalize_projection_item(stmt: &mut Statement) -> Result<(), SemanticError> {
    let binding = stmt
        .scratch
        .pending_binding
        .take()
        .ok_or(SemanticError::Internal("projection item missing a binding"))?;
    let alias = stmt.scratch.pending_projection_alias.take();
    let aggregation = stmt.scratch.pending_aggregation.take();
    stmt.projection.push(ProjectionItem {
        binding,
        alias,
        aggregation,
    });
    Ok(())
}

fn vars_plain_on_start(stmt: &mut Statement, _: &'static str) -> Result<(), SemanticError> {
    stmt.scratch.pending_binding = None;
    stmt.scratch.pending_aggregation = None;
    stmt.scratch.pending_projection_alias = None;
    Ok(())
}

fn vars_count_on_start(stmt: &mut Statement, _: &'static str) -> Result<(), SemanticError> {
    stmt.scratch.pending_binding = None;
    stmt.scratch.pending_aggregation = Some(AggregationKind::Count);
    stmt.scratch.pending_projection_alias = None;
    Ok(())
}

fn vars_sum_on_start(stmt: &mut Statement, _: &'static str) -> Result<(), SemanticError> {
    stmt.scratch.pending_binding = None;
    stmt.scratch.pending_aggregation = Some(AggregationKind::Sum);
    stmt.scratch.pending_projection_alias = None;
    Ok(())
}

/// Shared by the `VARS` plain-variable and `SUM(...)` clauses: both carry
/// their binding `Variable` directly as one of their own elements.
fn vars_binding_and_finalize_element(
    stmt: &mut Statement,
    consumed: &ConsumedElement<TokenKind>,
) -> Result<(), SemanticError> {
    match consumed {
        ConsumedElement::Terminal(TokenKind::Variable, text) => {
            stmt.scratch.pending_binding = Some(binding_name(text));
        }
        other if is_nonterminal(other, "PROJ_ALIAS_OPT") => finalize_projection_item(stmt)?,
        _ => {}
    }
    Ok(())
}

fn vars_agg_element(
    stmt: &mut Statement,
    consumed: &ConsumedElement<TokenKind>,
) -> Result<(), SemanticError> {
    if is_nonterminal(consumed, "PROJ_ALIAS_OPT") {
        finalize_projection_item(stmt)?;
    }
    Ok(())
}

fn count_arg_distinct_on_start(
    stmt: &mut Statement,
    _: &'static str,
) -> Result<(), SemanticError> {
    stmt.scratch.pending_aggregation = Some(AggregationKind::CountDistinct);
    Ok(())
}

fn count_arg_element(
    stmt: &mut Statement,
    consumed: &ConsumedElement<TokenKind>,
) -> Result<(), SemanticError> {
    if let ConsumedElement::Terminal(TokenKind::Variable, text) = consumed {
        stmt.scratch.pending_binding = Some(binding_name(text));
    }
    Ok(())
}

fn proj_alias_element(
    stmt: &mut Statement,
    consumed: &ConsumedElement<TokenKind>,
) -> Result<(), SemanticError> {
    if let ConsumedElement::Terminal(TokenKind::Variable, text) = consumed {
        stmt.scratch.pending_projection_alias = Some(binding_name(text));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// GROUP BY / ORDER BY
// ---------------------------------------------------------------------------

fn group_opt_on_start(stmt: &mut Statement, _: &'static str) -> Result<(), SemanticError> {
    stmt.scratch.list_buffer.clear();
    Ok(())
}

fn group_opt_on_element(
    stmt: &mut Statement,
    consumed: &ConsumedElement<TokenKind>,
) -> Result<(), SemanticError> {
    if is_nonterminal(consumed, "GROUP_LIST") {
        stmt.group_by = std::mem::take(&mut stmt.scratch.list_buffer);
    }
    Ok(())
}

fn order_opt_on_start(stmt: &mut Statement, _: &'static str) -> Result<(), SemanticError> {
    stmt.scratch.list_buffer.clear();
    stmt.scratch.order_direction_buffer.clear();
    Ok(())
}

fn order_opt_on_element(
    stmt: &mut Statement,
    consumed: &ConsumedElement<TokenKind>,
) -> Result<(), SemanticError> {
    if is_nonterminal(consumed, "ORDER_LIST") {
        let names = std::mem::take(&mut stmt.scratch.list_buffer);
        let dirs = std::mem::take(&mut stmt.scratch.order_direction_buffer);
        if names.len() != dirs.len() {
            return Err(SemanticError::Internal(
                "ORDER BY binding/direction count mismatch",
            ));
        }
        stmt.order_by = names.into_iter().zip(dirs).collect();
    }
    Ok(())
}

fn order_dir_asc_on_start(stmt: &mut Statement, _: &'static str) -> Result<(), SemanticError> {
    stmt.scratch.order_direction_buffer.push(Direction::Asc);
    Ok(())
}

fn order_dir_desc_on_start(stmt: &mut Statement, _: &'static str) -> Result<(), SemanticError> {
    stmt.scratch.order_direction_buffer.push(Direction::Desc);
    Ok(())
}

fn order_dir_default_on_start(stmt: &mut Statement, _: &'static str) -> Result<(), SemanticError> {
    stmt.scratch.order_direction_buffer.push(Direction::Asc);
    Ok(())
}

// ---------------------------------------------------------------------------
// HAVING
// ---------------------------------------------------------------------------

fn build_comparison(stmt: &mut Statement) -> Result<HavingExpr, SemanticError> {
    let first = stmt
        .scratch
        .having_first_operand
        .take()
        .ok_or(SemanticError::Internal("comparison missing its first operand"))?;
    let cmp = stmt
        .scratch
        .having_pending_cmp
        .take()
        .ok_or(SemanticError::Internal("comparison missing its operator"))?;
    let second = stmt
        .scratch
        .having_second_operand
        .take()
        .ok_or(SemanticError::Internal("comparison missing its second operand"))?;
    Ok(match cmp {
        CmpOp::Eq => HavingExpr::Eq(first, second),
        CmpOp::Lt => HavingExpr::Lt(first, second),
        CmpOp::Gt => HavingExpr::Gt(first, second),
    })
}

fn negatable_cmp_element(
    stmt: &mut Statement,
    consumed: &ConsumedElement<TokenKind>,
) -> Result<(), SemanticError> {
    match consumed {
        ConsumedElement::Terminal(kind, text) => {
            stmt.scratch.having_first_operand = Some(operand_from_token(kind, text)?);
        }
        other if is_nonterminal(other, "HAVING_OPERAND") => {
            let expr = build_comparison(stmt)?;
            stmt.scratch.having_negatable_result = Some(expr);
        }
        _ => {}
    }
    Ok(())
}

fn negatable_not_on_end(stmt: &mut Statement, _: &'static str) -> Result<(), SemanticError> {
    let inner = stmt
        .scratch
        .having_negatable_result
        .take()
        .ok_or(SemanticError::Internal("NOT missing its operand"))?;
    stmt.scratch.having_negatable_result = Some(HavingExpr::Not(Box::new(inner)));
    Ok(())
}

fn having_atom_cmp_element(
    stmt: &mut Statement,
    consumed: &ConsumedElement<TokenKind>,
) -> Result<(), SemanticError> {
    match consumed {
        ConsumedElement::Terminal(kind, text) => {
            stmt.scratch.having_first_operand = Some(operand_from_token(kind, text)?);
        }
        other if is_nonterminal(other, "HAVING_OPERAND") => {
            let expr = build_comparison(stmt)?;
            stmt.scratch.having_chain.push(expr);
        }
        _ => {}
    }
    Ok(())
}

fn having_atom_not_element(
    stmt: &mut Statement,
    consumed: &ConsumedElement<TokenKind>,
) -> Result<(), SemanticError> {
    if is_nonterminal(consumed, "NEGATABLE") {
        let inner = stmt
            .scratch
            .having_negatable_result
            .take()
            .ok_or(SemanticError::Internal("NOT missing its operand"))?;
        stmt.scratch.having_chain.push(HavingExpr::Not(Box::new(inner)));
    }
    Ok(())
}

fn having_operand_element(
    stmt: &mut Statement,
    consumed: &ConsumedElement<TokenKind>,
) -> Result<(), SemanticError> {
    if let ConsumedElement::Terminal(kind, text) = consumed {
        stmt.scratch.having_second_operand = Some(operand_from_token(kind, text)?);
    }
    Ok(())
}

fn cmp_eq_on_start(stmt: &mut Statement, _: &'static str) -> Result<(), SemanticError> {
    stmt.scratch.having_pending_cmp = Some(CmpOp::Eq);
    Ok(())
}
fn cmp_lt_on_start(stmt: &mut Statement, _: &'static str) -> Result<(), SemanticError> {
    stmt.scratch.having_pending_cmp = Some(CmpOp::Lt);
    Ok(())
}
fn cmp_gt_on_start(stmt: &mut Statement, _: &'static str) -> Result<(), SemanticError> {
    stmt.scratch.having_pending_cmp = Some(CmpOp::Gt);
    Ok(())
}

fn having_tail_and_on_start(stmt: &mut Statement, _: &'static str) -> Result<(), SemanticError> {
    stmt.scratch.having_ops.push(BoolOp::And);
    Ok(())
}
fn having_tail_or_on_start(stmt: &mut Statement, _: &'static str) -> Result<(), SemanticError> {
    stmt.scratch.having_ops.push(BoolOp::Or);
    Ok(())
}

fn having_opt_on_start(stmt: &mut Statement, _: &'static str) -> Result<(), SemanticError> {
    stmt.scratch.having_chain.clear();
    stmt.scratch.having_ops.clear();
    Ok(())
}

fn having_opt_on_end(stmt: &mut Statement, _: &'static str) -> Result<(), SemanticError> {
    let mut chain = std::mem::take(&mut stmt.scratch.having_chain).into_iter();
    let ops = std::mem::take(&mut stmt.scratch.having_ops);
    let mut acc = chain
        .next()
        .ok_or(SemanticError::Internal("HAVING produced no atoms"))?;
    for op in ops {
        let next = chain
            .next()
            .ok_or(SemanticError::Internal("HAVING chain shorter than its operator list"))?;
        acc = match op {
            BoolOp::And => HavingExpr::And(Box::new(acc), Box::new(next)),
            BoolOp::Or => HavingExpr::Or(Box::new(acc), Box::new(next)),
        };
    }
    stmt.having = Some(acc);
    Ok(())
}

// ---------------------------------------------------------------------------
// WHERE clauses: subject / predicate / object dispatch, aliases, filters
// ---------------------------------------------------------------------------

fn flush_working_clause(stmt: &mut Statement) {
    if stmt.scratch.working_clause.subject.is_some() {
        let built = std::mem::take(&mut stmt.scratch.working_clause);
        stmt.clauses.push(built);
    }
}

fn clauses_node_on_start(stmt: &mut Statement, _: &'static str) -> Result<(), SemanticError> {
    flush_working_clause(stmt);
    stmt.scratch.role = Role::Subject;
    Ok(())
}

fn clauses_optional_on_start(stmt: &mut Statement, _: &'static str) -> Result<(), SemanticError> {
    flush_working_clause(stmt);
    stmt.scratch.working_clause.optional = true;
    Ok(())
}

fn subject_dispatch_on_start(stmt: &mut Statement, _: &'static str) -> Result<(), SemanticError> {
    stmt.scratch.role = Role::Subject;
    Ok(())
}

fn subject_term_element(
    stmt: &mut Statement,
    consumed: &ConsumedElement<TokenKind>,
) -> Result<(), SemanticError> {
    if let ConsumedElement::Terminal(kind, text) = consumed {
        stmt.scratch.working_clause.subject = Some(term_from_terminal(kind, text)?);
    }
    Ok(())
}

fn clauses_filter_on_start(stmt: &mut Statement, _: &'static str) -> Result<(), SemanticError> {
    flush_working_clause(stmt);
    stmt.scratch.working_filter_fn = None;
    Ok(())
}

fn clauses_filter_element(
    stmt: &mut Statement,
    consumed: &ConsumedElement<TokenKind>,
) -> Result<(), SemanticError> {
    match consumed {
        ConsumedElement::Terminal(TokenKind::Word, text) => {
            stmt.scratch.working_filter_fn = Some(text.clone());
        }
        ConsumedElement::Terminal(TokenKind::Variable, text) => {
            let fn_name = stmt
                .scratch
                .working_filter_fn
                .take()
                .ok_or(SemanticError::Internal("FILTER missing its function name"))?;
            let function = FilterFn::lookup(&fn_name).ok_or_else(|| {
                log::debug!("unknown FILTER function {fn_name:?}");
                SemanticError::UnknownFilterFunction(fn_name.clone())
            })?;
            let call = FilterCall {
                function,
                binding: binding_name(text),
            };
            stmt.clauses
                .last_mut()
                .ok_or(SemanticError::Internal("FILTER with no preceding clause"))?
                .filters
                .push(call);
        }
        _ => {}
    }
    Ok(())
}

fn clauses_tail_eps_on_end(stmt: &mut Statement, _: &'static str) -> Result<(), SemanticError> {
    flush_working_clause(stmt);
    Ok(())
}

fn predicate_dispatch_on_start(
    stmt: &mut Statement,
    _: &'static str,
) -> Result<(), SemanticError> {
    stmt.scratch.role = Role::Predicate;
    Ok(())
}

fn predicate_term_element(
    stmt: &mut Statement,
    consumed: &ConsumedElement<TokenKind>,
) -> Result<(), SemanticError> {
    if let ConsumedElement::Terminal(kind, text) = consumed {
        stmt.scratch.working_clause.predicate = Some(term_from_terminal(kind, text)?);
    }
    Ok(())
}

fn object_dispatch_on_start(stmt: &mut Statement, _: &'static str) -> Result<(), SemanticError> {
    stmt.scratch.role = Role::Object;
    Ok(())
}

fn object_term_element(
    stmt: &mut Statement,
    consumed: &ConsumedElement<TokenKind>,
) -> Result<(), SemanticError> {
    if let ConsumedElement::Terminal(kind, text) = consumed {
        stmt.scratch.working_clause.object = Some(term_from_terminal(kind, text)?);
    }
    Ok(())
}

fn apply_alias(stmt: &mut Statement, alias_name: SmolStr) -> Result<(), SemanticError> {
    let kw = stmt
        .scratch
        .pending_alias
        .take()
        .ok_or(SemanticError::Internal("alias keyword missing"))?;
    let set = match stmt.scratch.role {
        Role::Subject => &mut stmt.scratch.working_clause.subject_extraction,
        Role::Predicate => &mut stmt.scratch.working_clause.predicate_extraction,
        Role::Object => &mut stmt.scratch.working_clause.object_extraction,
        Role::None => return Err(SemanticError::Internal("alias outside a clause position")),
    };
    match kw {
        AliasKeyword::As => set.value_binding = Some(alias_name),
        AliasKeyword::Type => set.type_alias = Some(alias_name),
        AliasKeyword::Id => set.id_alias = Some(alias_name),
        AliasKeyword::At => set.at_alias = Some(alias_name),
    }
    Ok(())
}

fn alias_as_on_start(stmt: &mut Statement, _: &'static str) -> Result<(), SemanticError> {
    stmt.scratch.pending_alias = Some(AliasKeyword::As);
    Ok(())
}
fn alias_type_on_start(stmt: &mut Statement, _: &'static str) -> Result<(), SemanticError> {
    stmt.scratch.pending_alias = Some(AliasKeyword::Type);
    Ok(())
}
fn alias_id_on_start(stmt: &mut Statement, _: &'static str) -> Result<(), SemanticError> {
    stmt.scratch.pending_alias = Some(AliasKeyword::Id);
    Ok(())
}
fn alias_at_on_start(stmt: &mut Statement, _: &'static str) -> Result<(), SemanticError> {
    stmt.scratch.pending_alias = Some(AliasKeyword::At);
    Ok(())
}

fn alias_element(
    stmt: &mut Statement,
    consumed: &ConsumedElement<TokenKind>,
) -> Result<(), SemanticError> {
    if let ConsumedElement::Terminal(TokenKind::Variable, text) = consumed {
        apply_alias(stmt, binding_name(text))?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Global time window / LIMIT
// ---------------------------------------------------------------------------

fn time_before_element(
    stmt: &mut Statement,
    consumed: &ConsumedElement<TokenKind>,
) -> Result<(), SemanticError> {
    if let ConsumedElement::Terminal(TokenKind::Literal, text) = consumed {
        stmt.upper_bound = Some(parse_time_literal(text)?);
    }
    Ok(())
}

fn time_after_element(
    stmt: &mut Statement,
    consumed: &ConsumedElement<TokenKind>,
) -> Result<(), SemanticError> {
    if let ConsumedElement::Terminal(TokenKind::Literal, text) = consumed {
        stmt.lower_bound = Some(parse_time_literal(text)?);
    }
    Ok(())
}

/// `BETWEEN` carries two `Literal` terminals; the first fills the lower
/// bound, the second the upper (relies on `Statement` being fresh per parse).
fn time_between_element(
    stmt: &mut Statement,
    consumed: &ConsumedElement<TokenKind>,
) -> Result<(), SemanticError> {
    if let ConsumedElement::Terminal(TokenKind::Literal, text) = consumed {
        let anchor = parse_time_literal(text)?;
        if stmt.lower_bound.is_none() {
            stmt.lower_bound = Some(anchor);
        } else {
            stmt.upper_bound = Some(anchor);
        }
    }
    Ok(())
}

fn limit_element(
    stmt: &mut Statement,
    consumed: &ConsumedElement<TokenKind>,
) -> Result<(), SemanticError> {
    if let ConsumedElement::Terminal(TokenKind::Literal, text) = consumed {
        stmt.limit = Some(parse_limit_literal(text)?);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// INSERT/DELETE DATA triples
// ---------------------------------------------------------------------------

fn triples_element(
    stmt: &mut Statement,
    consumed: &ConsumedElement<TokenKind>,
) -> Result<(), SemanticError> {
    match consumed {
        ConsumedElement::Terminal(TokenKind::Node, text) => {
            stmt.scratch.triple_subject =
                Some(Node::parse(text).map_err(|e| SemanticError::InvalidNode {
                    text: text.clone(),
                    reason: e.to_string(),
                })?);
        }
        ConsumedElement::Terminal(TokenKind::Predicate, text) => {
            stmt.scratch.triple_predicate = Some(parse_predicate_constant(text)?);
        }
        _ => {}
    }
    Ok(())
}

fn triple_object_element(
    stmt: &mut Statement,
    consumed: &ConsumedElement<TokenKind>,
) -> Result<(), SemanticError> {
    use badwolf_model::Object;

    if let ConsumedElement::Terminal(kind, text) = consumed {
        let object = match kind {
            TokenKind::Node => {
                Node::parse(text)
                    .map(Object::Node)
                    .map_err(|e| SemanticError::InvalidNode {
                        text: text.clone(),
                        reason: e.to_string(),
                    })?
            }
            TokenKind::Predicate => {
                parse_predicate_constant(text).map(Object::Predicate)?
            }
            TokenKind::Literal => parse_literal_value(text).map(Object::Literal)?,
            _ => return Err(SemanticError::Internal("unexpected token kind for a DATA triple object")),
        };
        let subject = stmt
            .scratch
            .triple_subject
            .take()
            .ok_or(SemanticError::Internal("DATA triple missing its subject"))?;
        let predicate = stmt
            .scratch
            .triple_predicate
            .take()
            .ok_or(SemanticError::Internal("DATA triple missing its predicate"))?;
        stmt.data_triples
            .push(badwolf_model::Triple::new(subject, predicate, object));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// CONSTRUCT/DECONSTRUCT templates
// ---------------------------------------------------------------------------

fn flush_working_construct(stmt: &mut Statement) {
    if stmt.scratch.working_construct.subject.is_some() {
        let built = std::mem::take(&mut stmt.scratch.working_construct);
        stmt.construct_templates.push(built);
    }
}

fn templates_on_start(stmt: &mut Statement, _: &'static str) -> Result<(), SemanticError> {
    flush_working_construct(stmt);
    Ok(())
}

fn template_subject_element(
    stmt: &mut Statement,
    consumed: &ConsumedElement<TokenKind>,
) -> Result<(), SemanticError> {
    if let ConsumedElement::Terminal(kind, text) = consumed {
        stmt.scratch.working_construct.subject = Some(term_from_terminal(kind, text)?);
    }
    Ok(())
}

fn template_pair_predicate_element(
    stmt: &mut Statement,
    consumed: &ConsumedElement<TokenKind>,
) -> Result<(), SemanticError> {
    if let ConsumedElement::Terminal(kind, text) = consumed {
        stmt.scratch.pending_pair_predicate = Some(term_from_terminal(kind, text)?);
    }
    Ok(())
}

fn template_object_element(
    stmt: &mut Statement,
    consumed: &ConsumedElement<TokenKind>,
) -> Result<(), SemanticError> {
    if let ConsumedElement::Terminal(kind, text) = consumed {
        let predicate = stmt
            .scratch
            .pending_pair_predicate
            .take()
            .ok_or(SemanticError::Internal("template pair missing its predicate"))?;
        let object = term_from_terminal(kind, text)?;
        stmt.scratch.working_construct.pairs.push((predicate, object));
    }
    Ok(())
}

fn templates_tail_eps_on_end(stmt: &mut Statement, _: &'static str) -> Result<(), SemanticError> {
    flush_working_construct(stmt);
    Ok(())
}

// ---------------------------------------------------------------------------
// Top-level statement kinds
// ---------------------------------------------------------------------------

fn start_query_on_start(stmt: &mut Statement, _: &'static str) -> Result<(), SemanticError> {
    stmt.kind = Kind::Query;
    stmt.scratch.list_buffer.clear();
    stmt.scratch.graph_target = GraphTarget::Input;
    Ok(())
}

fn start_insert_on_start(stmt: &mut Statement, _: &'static str) -> Result<(), SemanticError> {
    stmt.kind = Kind::Insert;
    stmt.scratch.list_buffer.clear();
    stmt.scratch.graph_target = GraphTarget::Output;
    Ok(())
}

fn start_delete_on_start(stmt: &mut Statement, _: &'static str) -> Result<(), SemanticError> {
    stmt.kind = Kind::Delete;
    stmt.scratch.list_buffer.clear();
    stmt.scratch.graph_target = GraphTarget::Output;
    Ok(())
}

fn start_create_on_start(stmt: &mut Statement, _: &'static str) -> Result<(), SemanticError> {
    stmt.kind = Kind::Create;
    stmt.scratch.list_buffer.clear();
    stmt.scratch.graph_target = GraphTarget::Binding;
    Ok(())
}

fn start_drop_on_start(stmt: &mut Statement, _: &'static str) -> Result<(), SemanticError> {
    stmt.kind = Kind::Drop;
    stmt.scratch.list_buffer.clear();
    stmt.scratch.graph_target = GraphTarget::Binding;
    Ok(())
}

fn start_construct_on_start(stmt: &mut Statement, _: &'static str) -> Result<(), SemanticError> {
    stmt.kind = Kind::Construct;
    stmt.scratch.list_buffer.clear();
    Ok(())
}

fn start_deconstruct_on_start(stmt: &mut Statement, _: &'static str) -> Result<(), SemanticError> {
    stmt.kind = Kind::Deconstruct;
    stmt.scratch.list_buffer.clear();
    Ok(())
}

fn start_show_on_start(stmt: &mut Statement, _: &'static str) -> Result<(), SemanticError> {
    stmt.kind = Kind::Show;
    Ok(())
}

fn construct_on_element(
    stmt: &mut Statement,
    consumed: &ConsumedElement<TokenKind>,
) -> Result<(), SemanticError> {
    match consumed {
        ConsumedElement::Terminal(TokenKind::Keyword(Keyword::Into), _) => {
            stmt.scratch.graph_target = GraphTarget::Output;
            stmt.scratch.list_buffer.clear();
        }
        ConsumedElement::Terminal(TokenKind::Keyword(Keyword::From), _) => {
            stmt.scratch.graph_target = GraphTarget::Input;
            stmt.scratch.list_buffer.clear();
        }
        other if is_nonterminal(other, "GRAPH_LIST") => finalize_graph_list(stmt)?,
        _ => {}
    }
    Ok(())
}

fn deconstruct_on_element(
    stmt: &mut Statement,
    consumed: &ConsumedElement<TokenKind>,
) -> Result<(), SemanticError> {
    match consumed {
        ConsumedElement::Terminal(TokenKind::Keyword(Keyword::In), _) => {
            stmt.scratch.graph_target = GraphTarget::Output;
            stmt.scratch.list_buffer.clear();
        }
        ConsumedElement::Terminal(TokenKind::Keyword(Keyword::From), _) => {
            stmt.scratch.graph_target = GraphTarget::Input;
            stmt.scratch.list_buffer.clear();
        }
        other if is_nonterminal(other, "GRAPH_LIST") => finalize_graph_list(stmt)?,
        _ => {}
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Grammar assembly
// ---------------------------------------------------------------------------

macro_rules! term {
    ($k:expr) => {
        Element::Terminal($k)
    };
}
macro_rules! sym {
    ($s:expr) => {
        Element::NonTerminal($s)
    };
}

/// Builds BQL's grammar table (§4.2, §6.1). The only fallible part is
/// `Grammar::new`'s left-factoring validation; every clause here is written
/// by hand to satisfy it, so a failure would mean this function itself has a
/// bug, not a user-facing condition.
pub fn bql_grammar() -> Result<Grammar<TokenKind, Statement, SemanticError>, ParseError> {
    use Keyword::*;
    use TokenKind::{BlankNode, Literal as Lit, Node as Nd, Predicate as Pred, Variable as Var, Word};

    let productions: Vec<(&'static str, Vec<Cl>)> = vec![
        (
            "START",
            vec![
                Cl::new(vec![
                    term!(TokenKind::Keyword(Select)),
                    sym!("VARS"),
                    term!(TokenKind::Keyword(From)),
                    sym!("GRAPH_LIST"),
                    sym!("WHERE_OPT"),
                    sym!("GROUP_OPT"),
                    sym!("ORDER_OPT"),
                    sym!("HAVING_OPT"),
                    sym!("TIME_WINDOW_OPT"),
                    sym!("LIMIT_OPT"),
                    term!(TokenKind::Symbol(Punct::Semicolon)),
                ])
                .with_hooks(Hk {
                    on_start: Some(start_query_on_start),
                    on_element: Some(graph_list_finish_element),
                    on_end: None,
                }),
                Cl::new(vec![
                    term!(TokenKind::Keyword(Insert)),
                    term!(TokenKind::Keyword(Data)),
                    term!(TokenKind::Keyword(Into)),
                    sym!("GRAPH_LIST"),
                    term!(TokenKind::Symbol(Punct::LBrace)),
                    sym!("TRIPLES"),
                    term!(TokenKind::Symbol(Punct::RBrace)),
                    term!(TokenKind::Symbol(Punct::Semicolon)),
                ])
                .with_hooks(Hk {
                    on_start: Some(start_insert_on_start),
                    on_element: Some(graph_list_finish_element),
                    on_end: None,
                }),
                Cl::new(vec![
                    term!(TokenKind::Keyword(Delete)),
                    term!(TokenKind::Keyword(Data)),
                    term!(TokenKind::Keyword(From)),
                    sym!("GRAPH_LIST"),
                    term!(TokenKind::Symbol(Punct::LBrace)),
                    sym!("TRIPLES"),
                    term!(TokenKind::Symbol(Punct::RBrace)),
                    term!(TokenKind::Symbol(Punct::Semicolon)),
                ])
                .with_hooks(Hk {
                    on_start: Some(start_delete_on_start),
                    on_element: Some(graph_list_finish_element),
                    on_end: None,
                }),
                Cl::new(vec![
                    term!(TokenKind::Keyword(Create)),
                    term!(TokenKind::Keyword(Graph)),
                    sym!("GRAPH_LIST"),
                    term!(TokenKind::Symbol(Punct::Semicolon)),
                ])
                .with_hooks(Hk {
                    on_start: Some(start_create_on_start),
                    on_element: Some(graph_list_finish_element),
                    on_end: None,
                }),
                Cl::new(vec![
                    term!(TokenKind::Keyword(Drop)),
                    term!(TokenKind::Keyword(Graph)),
                    sym!("GRAPH_LIST"),
                    term!(TokenKind::Symbol(Punct::Semicolon)),
                ])
                .with_hooks(Hk {
                    on_start: Some(start_drop_on_start),
                    on_element: Some(graph_list_finish_element),
                    on_end: None,
                }),
                Cl::new(vec![
                    term!(TokenKind::Keyword(Construct)),
                    term!(TokenKind::Symbol(Punct::LBrace)),
                    sym!("TEMPLATES"),
                    term!(TokenKind::Symbol(Punct::RBrace)),
                    term!(TokenKind::Keyword(Into)),
                    sym!("GRAPH_LIST"),
                    term!(TokenKind::Keyword(From)),
                    sym!("GRAPH_LIST"),
                    sym!("WHERE_OPT"),
                    sym!("HAVING_OPT"),
                    term!(TokenKind::Symbol(Punct::Semicolon)),
                ])
                .with_hooks(Hk {
                    on_start: Some(start_construct_on_start),
                    on_element: Some(construct_on_element),
                    on_end: None,
                }),
                Cl::new(vec![
                    term!(TokenKind::Keyword(Deconstruct)),
                    term!(TokenKind::Symbol(Punct::LBrace)),
                    sym!("TEMPLATES"),
                    term!(TokenKind::Symbol(Punct::RBrace)),
                    term!(TokenKind::Keyword(In)),
                    sym!("GRAPH_LIST"),
                    term!(TokenKind::Keyword(From)),
                    sym!("GRAPH_LIST"),
                    sym!("WHERE_OPT"),
                    sym!("HAVING_OPT"),
                    term!(TokenKind::Symbol(Punct::Semicolon)),
                ])
                .with_hooks(Hk {
                    on_start: Some(start_deconstruct_on_start),
                    on_element: Some(deconstruct_on_element),
                    on_end: None,
                }),
                Cl::new(vec![
                    term!(TokenKind::Keyword(Show)),
                    term!(TokenKind::Keyword(Graphs)),
                    term!(TokenKind::Symbol(Punct::Semicolon)),
                ])
                .with_hooks(Hk {
                    on_start: Some(start_show_on_start),
                    on_element: None,
                    on_end: None,
                }),
            ],
        ),
        // --- Projection ------------------------------------------------
        (
            "VARS",
            vec![
                Cl::new(vec![term!(Var), sym!("PROJ_ALIAS_OPT"), sym!("VARS_TAIL")]).with_hooks(Hk {
                    on_start: Some(vars_plain_on_start),
                    on_element: Some(vars_binding_and_finalize_element),
                    on_end: None,
                }),
                Cl::new(vec![
                    term!(TokenKind::Keyword(Count)),
                    term!(TokenKind::Symbol(Punct::LParen)),
                    sym!("COUNT_ARG"),
                    term!(TokenKind::Symbol(Punct::RParen)),
                    sym!("PROJ_ALIAS_OPT"),
                    sym!("VARS_TAIL"),
                ])
                .with_hooks(Hk {
                    on_start: Some(vars_count_on_start),
                    on_element: Some(vars_agg_element),
                    on_end: None,
                }),
                Cl::new(vec![
                    term!(TokenKind::Keyword(Sum)),
                    term!(TokenKind::Symbol(Punct::LParen)),
                    term!(Var),
                    term!(TokenKind::Symbol(Punct::RParen)),
                    sym!("PROJ_ALIAS_OPT"),
                    sym!("VARS_TAIL"),
                ])
                .with_hooks(Hk {
                    on_start: Some(vars_sum_on_start),
                    on_element: Some(vars_binding_and_finalize_element),
                    on_end: None,
                }),
            ],
        ),
        (
            "COUNT_ARG",
            vec![
                Cl::new(vec![term!(TokenKind::Keyword(Distinct)), term!(Var)]).with_hooks(Hk {
                    on_start: Some(count_arg_distinct_on_start),
                    on_element: Some(count_arg_element),
                    on_end: None,
                }),
                Cl::new(vec![term!(Var)]).with_hooks(Hk {
                    on_start: None,
                    on_element: Some(count_arg_element),
                    on_end: None,
                }),
            ],
        ),
        (
            "PROJ_ALIAS_OPT",
            vec![
                Cl::new(vec![term!(TokenKind::Keyword(As)), term!(Var)]).with_hooks(Hk {
                    on_start: None,
                    on_element: Some(proj_alias_element),
                    on_end: None,
                }),
                Cl::new(vec![]),
            ],
        ),
        (
            "VARS_TAIL",
            vec![
                Cl::new(vec![term!(TokenKind::Symbol(Punct::Comma)), sym!("VARS")]),
                Cl::new(vec![]),
            ],
        ),
        // --- Graph name lists --------------------------------------------
        (
            "GRAPH_LIST",
            vec![Cl::new(vec![term!(Var), sym!("GRAPH_LIST_TAIL")]).with_hooks(Hk {
                on_start: None,
                on_element: Some(push_variable_to_list_buffer),
                on_end: None,
            })],
        ),
        (
            "GRAPH_LIST_TAIL",
            vec![
                Cl::new(vec![term!(TokenKind::Symbol(Punct::Comma)), sym!("GRAPH_LIST")]),
                Cl::new(vec![]),
            ],
        ),
        // --- WHERE ---------------------------------------------------------
        (
            "WHERE_OPT",
            vec![
                Cl::new(vec![
                    term!(TokenKind::Keyword(Where)),
                    term!(TokenKind::Symbol(Punct::LBrace)),
                    sym!("CLAUSES"),
                    term!(TokenKind::Symbol(Punct::RBrace)),
                ]),
                Cl::new(vec![]),
            ],
        ),
        (
            "CLAUSES",
            vec![
                Cl::new(vec![term!(Nd), sym!("ALIASES"), sym!("PREDICATE_DISPATCH"), sym!("CLAUSES_TAIL")])
                    .with_hooks(Hk {
                        on_start: Some(clauses_node_on_start),
                        on_element: Some(subject_term_element),
                        on_end: None,
                    }),
                Cl::new(vec![term!(Var), sym!("ALIASES"), sym!("PREDICATE_DISPATCH"), sym!("CLAUSES_TAIL")])
                    .with_hooks(Hk {
                        on_start: Some(clauses_node_on_start),
                        on_element: Some(subject_term_element),
                        on_end: None,
                    }),
                Cl::new(vec![
                    term!(TokenKind::Keyword(Optional)),
                    term!(TokenKind::Symbol(Punct::LBrace)),
                    sym!("SUBJECT_DISPATCH"),
                    term!(TokenKind::Symbol(Punct::RBrace)),
                    sym!("CLAUSES_TAIL"),
                ])
                .with_hooks(Hk {
                    on_start: Some(clauses_optional_on_start),
                    on_element: None,
                    on_end: None,
                }),
                Cl::new(vec![
                    term!(TokenKind::Keyword(Filter)),
                    term!(Word),
                    term!(TokenKind::Symbol(Punct::LParen)),
                    term!(Var),
                    term!(TokenKind::Symbol(Punct::RParen)),
                    sym!("CLAUSES_TAIL"),
                ])
                .with_hooks(Hk {
                    on_start: Some(clauses_filter_on_start),
                    on_element: Some(clauses_filter_element),
                    on_end: None,
                }),
            ],
        ),
        (
            "CLAUSES_TAIL",
            vec![
                Cl::new(vec![term!(TokenKind::Symbol(Punct::Dot)), sym!("CLAUSES")]),
                Cl::new(vec![]).with_hooks(Hk {
                    on_start: None,
                    on_element: None,
                    on_end: Some(clauses_tail_eps_on_end),
                }),
            ],
        ),
        (
            "SUBJECT_DISPATCH",
            vec![
                Cl::new(vec![term!(Nd), sym!("ALIASES"), sym!("PREDICATE_DISPATCH")]).with_hooks(Hk {
                    on_start: Some(subject_dispatch_on_start),
                    on_element: Some(subject_term_element),
                    on_end: None,
                }),
                Cl::new(vec![term!(Var), sym!("ALIASES"), sym!("PREDICATE_DISPATCH")]).with_hooks(Hk {
                    on_start: Some(subject_dispatch_on_start),
                    on_element: Some(subject_term_element),
                    on_end: None,
                }),
            ],
        ),
        (
            "PREDICATE_DISPATCH",
            vec![
                Cl::new(vec![term!(Pred), sym!("ALIASES"), sym!("OBJECT_DISPATCH")]).with_hooks(Hk {
                    on_start: Some(predicate_dispatch_on_start),
                    on_element: Some(predicate_term_element),
                    on_end: None,
                }),
                Cl::new(vec![term!(Var), sym!("ALIASES"), sym!("OBJECT_DISPATCH")]).with_hooks(Hk {
                    on_start: Some(predicate_dispatch_on_start),
                    on_element: Some(predicate_term_element),
                    on_end: None,
                }),
            ],
        ),
        (
            "OBJECT_DISPATCH",
            vec![
                Cl::new(vec![term!(Nd), sym!("ALIASES")]).with_hooks(Hk {
                    on_start: Some(object_dispatch_on_start),
                    on_element: Some(object_term_element),
                    on_end: None,
                }),
                Cl::new(vec![term!(Pred), sym!("ALIASES")]).with_hooks(Hk {
                    on_start: Some(object_dispatch_on_start),
                    on_element: Some(object_term_element),
                    on_end: None,
                }),
                Cl::new(vec![term!(Lit), sym!("ALIASES")]).with_hooks(Hk {
                    on_start: Some(object_dispatch_on_start),
                    on_element: Some(object_term_element),
                    on_end: None,
                }),
                Cl::new(vec![term!(BlankNode), sym!("ALIASES")]).with_hooks(Hk {
                    on_start: Some(object_dispatch_on_start),
                    on_element: Some(object_term_element),
                    on_end: None,
                }),
                Cl::new(vec![term!(Var), sym!("ALIASES")]).with_hooks(Hk {
                    on_start: Some(object_dispatch_on_start),
                    on_element: Some(object_term_element),
                    on_end: None,
                }),
            ],
        ),
        (
            "ALIASES",
            vec![
                Cl::new(vec![term!(TokenKind::Keyword(As)), term!(Var), sym!("ALIASES")]).with_hooks(Hk {
                    on_start: Some(alias_as_on_start),
                    on_element: Some(alias_element),
                    on_end: None,
                }),
                Cl::new(vec![term!(TokenKind::Keyword(Type)), term!(Var), sym!("ALIASES")]).with_hooks(Hk {
                    on_start: Some(alias_type_on_start),
                    on_element: Some(alias_element),
                    on_end: None,
                }),
                Cl::new(vec![term!(TokenKind::Keyword(Id)), term!(Var), sym!("ALIASES")]).with_hooks(Hk {
                    on_start: Some(alias_id_on_start),
                    on_element: Some(alias_element),
                    on_end: None,
                }),
                Cl::new(vec![term!(TokenKind::Keyword(At)), term!(Var), sym!("ALIASES")]).with_hooks(Hk {
                    on_start: Some(alias_at_on_start),
                    on_element: Some(alias_element),
                    on_end: None,
                }),
                Cl::new(vec![]),
            ],
        ),
        // --- GROUP BY / ORDER BY --------------------------------------------
        (
            "GROUP_OPT",
            vec![
                Cl::new(vec![
                    term!(TokenKind::Keyword(Group)),
                    term!(TokenKind::Keyword(By)),
                    sym!("GROUP_LIST"),
                ])
                .with_hooks(Hk {
                    on_start: Some(group_opt_on_start),
                    on_element: Some(group_opt_on_element),
                    on_end: None,
                }),
                Cl::new(vec![]),
            ],
        ),
        (
            "GROUP_LIST",
            vec![Cl::new(vec![term!(Var), sym!("GROUP_LIST_TAIL")]).with_hooks(Hk {
                on_start: None,
                on_element: Some(push_variable_to_list_buffer),
                on_end: None,
            })],
        ),
        (
            "GROUP_LIST_TAIL",
            vec![
                Cl::new(vec![term!(TokenKind::Symbol(Punct::Comma)), sym!("GROUP_LIST")]),
                Cl::new(vec![]),
            ],
        ),
        (
            "ORDER_OPT",
            vec![
                Cl::new(vec![
                    term!(TokenKind::Keyword(Order)),
                    term!(TokenKind::Keyword(By)),
                    sym!("ORDER_LIST"),
                ])
                .with_hooks(Hk {
                    on_start: Some(order_opt_on_start),
                    on_element: Some(order_opt_on_element),
                    on_end: None,
                }),
                Cl::new(vec![]),
            ],
        ),
        (
            "ORDER_LIST",
            vec![
                Cl::new(vec![term!(Var), sym!("ORDER_DIR_OPT"), sym!("ORDER_LIST_TAIL")]).with_hooks(Hk {
                    on_start: None,
                    on_element: Some(push_variable_to_list_buffer),
                    on_end: None,
                }),
            ],
        ),
        (
            "ORDER_DIR_OPT",
            vec![
                Cl::new(vec![term!(TokenKind::Keyword(Asc))]).with_hooks(Hk {
                    on_start: Some(order_dir_asc_on_start),
                    on_element: None,
                    on_end: None,
                }),
                Cl::new(vec![term!(TokenKind::Keyword(Desc))]).with_hooks(Hk {
                    on_start: Some(order_dir_desc_on_start),
                    on_element: None,
                    on_end: None,
                }),
                Cl::new(vec![]).with_hooks(Hk {
                    on_start: Some(order_dir_default_on_start),
                    on_element: None,
                    on_end: None,
                }),
            ],
        ),
        (
            "ORDER_LIST_TAIL",
            vec![
                Cl::new(vec![term!(TokenKind::Symbol(Punct::Comma)), sym!("ORDER_LIST")]),
                Cl::new(vec![]),
            ],
        ),
        // --- HAVING ----------------------------------------------------
        (
            "HAVING_OPT",
            vec![
                Cl::new(vec![term!(TokenKind::Keyword(Having)), sym!("HAVING_ATOM")]).with_hooks(Hk {
                    on_start: Some(having_opt_on_start),
                    on_element: None,
                    on_end: Some(having_opt_on_end),
                }),
                Cl::new(vec![]),
            ],
        ),
        (
            "NEGATABLE",
            vec![
                Cl::new(vec![term!(TokenKind::Keyword(Not)), sym!("NEGATABLE")]).with_hooks(Hk {
                    on_start: None,
                    on_element: None,
                    on_end: Some(negatable_not_on_end),
                }),
                Cl::new(vec![term!(Var), sym!("CMP_OP"), sym!("HAVING_OPERAND")]).with_hooks(Hk {
                    on_start: None,
                    on_element: Some(negatable_cmp_element),
                    on_end: None,
                }),
                Cl::new(vec![term!(Nd), sym!("CMP_OP"), sym!("HAVING_OPERAND")]).with_hooks(Hk {
                    on_start: None,
                    on_element: Some(negatable_cmp_element),
                    on_end: None,
                }),
                Cl::new(vec![term!(Pred), sym!("CMP_OP"), sym!("HAVING_OPERAND")]).with_hooks(Hk {
                    on_start: None,
                    on_element: Some(negatable_cmp_element),
                    on_end: None,
                }),
                Cl::new(vec![term!(Lit), sym!("CMP_OP"), sym!("HAVING_OPERAND")]).with_hooks(Hk {
                    on_start: None,
                    on_element: Some(negatable_cmp_element),
                    on_end: None,
                }),
            ],
        ),
        (
            "HAVING_ATOM",
            vec![
                Cl::new(vec![term!(TokenKind::Keyword(Not)), sym!("NEGATABLE"), sym!("HAVING_TAIL")])
                    .with_hooks(Hk {
                        on_start: None,
                        on_element: Some(having_atom_not_element),
                        on_end: None,
                    }),
                Cl::new(vec![term!(Var), sym!("CMP_OP"), sym!("HAVING_OPERAND"), sym!("HAVING_TAIL")])
                    .with_hooks(Hk {
                        on_start: None,
                        on_element: Some(having_atom_cmp_element),
                        on_end: None,
                    }),
                Cl::new(vec![term!(Nd), sym!("CMP_OP"), sym!("HAVING_OPERAND"), sym!("HAVING_TAIL")])
                    .with_hooks(Hk {
                        on_start: None,
                        on_element: Some(having_atom_cmp_element),
                        on_end: None,
                    }),
                Cl::new(vec![term!(Pred), sym!("CMP_OP"), sym!("HAVING_OPERAND"), sym!("HAVING_TAIL")])
                    .with_hooks(Hk {
                        on_start: None,
                        on_element: Some(having_atom_cmp_element),
                        on_end: None,
                    }),
                Cl::new(vec![term!(Lit), sym!("CMP_OP"), sym!("HAVING_OPERAND"), sym!("HAVING_TAIL")])
                    .with_hooks(Hk {
                        on_start: None,
                        on_element: Some(having_atom_cmp_element),
                        on_end: None,
                    }),
            ],
        ),
        (
            "HAVING_TAIL",
            vec![
                Cl::new(vec![term!(TokenKind::Keyword(And)), sym!("HAVING_ATOM")]).with_hooks(Hk {
                    on_start: Some(having_tail_and_on_start),
                    on_element: None,
                    on_end: None,
                }),
                Cl::new(vec![term!(TokenKind::Keyword(Or)), sym!("HAVING_ATOM")]).with_hooks(Hk {
                    on_start: Some(having_tail_or_on_start),
                    on_element: None,
                    on_end: None,
                }),
                Cl::new(vec![]),
            ],
        ),
        (
            "CMP_OP",
            vec![
                Cl::new(vec![term!(TokenKind::Symbol(Punct::Eq))]).with_hooks(Hk {
                    on_start: Some(cmp_eq_on_start),
                    on_element: None,
                    on_end: None,
                }),
                Cl::new(vec![term!(TokenKind::Symbol(Punct::Lt))]).with_hooks(Hk {
                    on_start: Some(cmp_lt_on_start),
                    on_element: None,
                    on_end: None,
                }),
                Cl::new(vec![term!(TokenKind::Symbol(Punct::Gt))]).with_hooks(Hk {
                    on_start: Some(cmp_gt_on_start),
                    on_element: None,
                    on_end: None,
                }),
            ],
        ),
        (
            "HAVING_OPERAND",
            vec![
                Cl::new(vec![term!(Var)]).with_hooks(Hk {
                    on_start: None,
                    on_element: Some(having_operand_element),
                    on_end: None,
                }),
                Cl::new(vec![term!(Nd)]).with_hooks(Hk {
                    on_start: None,
                    on_element: Some(having_operand_element),
                    on_end: None,
                }),
                Cl::new(vec![term!(Pred)]).with_hooks(Hk {
                    on_start: None,
                    on_element: Some(having_operand_element),
                    on_end: None,
                }),
                Cl::new(vec![term!(Lit)]).with_hooks(Hk {
                    on_start: None,
                    on_element: Some(having_operand_element),
                    on_end: None,
                }),
            ],
        ),
        // --- Global time window / LIMIT ------------------------------------
        (
            "TIME_WINDOW_OPT",
            vec![
                Cl::new(vec![term!(TokenKind::Keyword(Before)), term!(Lit)]).with_hooks(Hk {
                    on_start: None,
                    on_element: Some(time_before_element),
                    on_end: None,
                }),
                Cl::new(vec![term!(TokenKind::Keyword(After)), term!(Lit)]).with_hooks(Hk {
                    on_start: None,
                    on_element: Some(time_after_element),
                    on_end: None,
                }),
                Cl::new(vec![
                    term!(TokenKind::Keyword(Between)),
                    term!(Lit),
                    term!(TokenKind::Symbol(Punct::Comma)),
                    term!(Lit),
                ])
                .with_hooks(Hk {
                    on_start: None,
                    on_element: Some(time_between_element),
                    on_end: None,
                }),
                Cl::new(vec![]),
            ],
        ),
        (
            "LIMIT_OPT",
            vec![
                Cl::new(vec![term!(TokenKind::Keyword(Limit)), term!(Lit)]).with_hooks(Hk {
                    on_start: None,
                    on_element: Some(limit_element),
                    on_end: None,
                }),
                Cl::new(vec![]),
            ],
        ),
        // --- INSERT/DELETE DATA triples --------------------------------
        (
            "TRIPLES",
            vec![Cl::new(vec![term!(Nd), term!(Pred), sym!("TRIPLE_OBJECT"), sym!("TRIPLES_TAIL")])
                .with_hooks(Hk {
                    on_start: None,
                    on_element: Some(triples_element),
                    on_end: None,
                })],
        ),
        (
            "TRIPLE_OBJECT",
            vec![
                Cl::new(vec![term!(Nd)]).with_hooks(Hk {
                    on_start: None,
                    on_element: Some(triple_object_element),
                    on_end: None,
                }),
                Cl::new(vec![term!(Pred)]).with_hooks(Hk {
                    on_start: None,
                    on_element: Some(triple_object_element),
                    on_end: None,
                }),
                Cl::new(vec![term!(Lit)]).with_hooks(Hk {
                    on_start: None,
                    on_element: Some(triple_object_element),
                    on_end: None,
                }),
            ],
        ),
        (
            "TRIPLES_TAIL",
            vec![
                Cl::new(vec![term!(TokenKind::Symbol(Punct::Dot)), sym!("TRIPLES")]),
                Cl::new(vec![]),
            ],
        ),
        // --- CONSTRUCT/DECONSTRUCT templates --------------------------
        (
            "TEMPLATES",
            vec![
                Cl::new(vec![term!(Nd), sym!("TEMPLATE_PAIR_LIST"), sym!("TEMPLATES_TAIL")]).with_hooks(Hk {
                    on_start: Some(templates_on_start),
                    on_element: Some(template_subject_element),
                    on_end: None,
                }),
                Cl::new(vec![term!(BlankNode), sym!("TEMPLATE_PAIR_LIST"), sym!("TEMPLATES_TAIL")])
                    .with_hooks(Hk {
                        on_start: Some(templates_on_start),
                        on_element: Some(template_subject_element),
                        on_end: None,
                    }),
                Cl::new(vec![term!(Var), sym!("TEMPLATE_PAIR_LIST"), sym!("TEMPLATES_TAIL")]).with_hooks(Hk {
                    on_start: Some(templates_on_start),
                    on_element: Some(template_subject_element),
                    on_end: None,
                }),
            ],
        ),
        (
            "TEMPLATE_PAIR_LIST",
            vec![
                Cl::new(vec![term!(Pred), sym!("TEMPLATE_OBJECT"), sym!("TEMPLATE_PAIR_TAIL")]).with_hooks(Hk {
                    on_start: None,
                    on_element: Some(template_pair_predicate_element),
                    on_end: None,
                }),
                Cl::new(vec![term!(Var), sym!("TEMPLATE_OBJECT"), sym!("TEMPLATE_PAIR_TAIL")]).with_hooks(Hk {
                    on_start: None,
                    on_element: Some(template_pair_predicate_element),
                    on_end: None,
                }),
            ],
        ),
        (
            "TEMPLATE_OBJECT",
            vec![
                Cl::new(vec![term!(Nd)]).with_hooks(Hk {
                    on_start: None,
                    on_element: Some(template_object_element),
                    on_end: None,
                }),
                Cl::new(vec![term!(Pred)]).with_hooks(Hk {
                    on_start: None,
                    on_element: Some(template_object_element),
                    on_end: None,
                }),
                Cl::new(vec![term!(Lit)]).with_hooks(Hk {
                    on_start: None,
                    on_element: Some(template_object_element),
                    on_end: None,
                }),
                Cl::new(vec![term!(BlankNode)]).with_hooks(Hk {
                    on_start: None,
                    on_element: Some(template_object_element),
                    on_end: None,
                }),
                Cl::new(vec![term!(Var)]).with_hooks(Hk {
                    on_start: None,
                    on_element: Some(template_object_element),
                    on_end: None,
                }),
            ],
        ),
        (
            "TEMPLATE_PAIR_TAIL",
            vec![
                Cl::new(vec![term!(TokenKind::Symbol(Punct::Semicolon)), sym!("TEMPLATE_PAIR_LIST")]),
                Cl::new(vec![]),
            ],
        ),
        (
            "TEMPLATES_TAIL",
            vec![
                Cl::new(vec![term!(TokenKind::Symbol(Punct::Dot)), sym!("TEMPLATES")]),
                Cl::new(vec![]).with_hooks(Hk {
                    on_start: None,
                    on_element: None,
                    on_end: Some(templates_tail_eps_on_end),
                }),
            ],
        ),
    ];

    log::debug!("building BQL grammar table, {} productions", productions.len());
    Grammar::new("START", productions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grammar_builds_and_is_left_factored() {
        bql_grammar().expect("BQL grammar must validate");
    }
}
