//! BQL's semantic layer (spec §3.3, §4.2): the `Statement` the parser's hooks
//! build, the grammar table that wires BQL's keywords onto
//! `badwolf_parser::Parser`, and `parse_statement`, the one entry point that
//! turns BQL source text into a `Statement` ready for the planner.

mod error;
mod grammar;
mod having;
mod statement;
mod term;
mod validate;

pub use error::SemanticError;
pub use grammar::bql_grammar;
pub use having::{HavingExpr, Operand};
pub use statement::{ConstructTemplate, GraphClause, Kind, ProjectionItem, Statement};
pub use term::{BoundTerm, ExtractionSet, FilterCall, FilterFn, Term};

use badwolf_lexer::{spawn_lexer, LexerConfig};
use badwolf_parser::{DriverError, Parser};

/// The look-ahead width `Parser` runs with (§4.2): BQL's grammar is
/// left-factored down to a single token everywhere.
const LOOKAHEAD: usize = 1;

/// Lexes and parses one BQL statement, producing the `Statement` a planner
/// consumes (§4.2's `Parse(token_stream, builder)` applied end to end). The
/// `kind` on the returned `Statement` reflects whichever clause `START`
/// matched; the placeholder passed to `Statement::new` is overwritten before
/// anything else runs.
pub async fn parse_statement(source: impl Into<String>) -> Result<Statement, DriverError<SemanticError>> {
    let grammar = bql_grammar().map_err(DriverError::from)?;
    let rx = spawn_lexer(source, LexerConfig::default());
    let mut statement = Statement::new(Kind::Query);
    Parser::parse(&grammar, rx, &mut statement, LOOKAHEAD).await?;
    validate::validate(&statement).map_err(DriverError::Hook)?;
    Ok(statement)
}

#[cfg(test)]
mod tests {
    use badwolf_table::{AggregationKind, Direction};

    use super::*;

    async fn parse(src: &str) -> Statement {
        parse_statement(src).await.expect("statement must parse")
    }

    #[tokio::test]
    async fn parses_a_plain_select() {
        let stmt = parse(
            r#"SELECT ?p FROM ?test WHERE { ?p "type"@[] /Person<> } LIMIT 10;"#,
        )
        .await;
        assert_eq!(stmt.kind, Kind::Query);
        assert_eq!(stmt.input_graphs, vec!["?test"]);
        assert_eq!(stmt.projection.len(), 1);
        assert_eq!(stmt.projection[0].binding, "?p");
        assert_eq!(stmt.clauses.len(), 1);
        assert_eq!(stmt.limit, Some(10));
    }

    #[tokio::test]
    async fn parses_aggregation_and_group_by() {
        let stmt = parse(
            r#"SELECT ?dept, COUNT DISTINCT ?p AS ?n FROM ?test WHERE { ?p "dept"@[] ?dept } GROUP BY ?dept ORDER BY ?n DESC;"#,
        )
        .await;
        assert_eq!(stmt.projection.len(), 2);
        assert_eq!(stmt.projection[1].aggregation, Some(AggregationKind::CountDistinct));
        assert_eq!(stmt.projection[1].alias.as_deref(), Some("?n"));
        assert_eq!(stmt.group_by, vec!["?dept"]);
        assert_eq!(stmt.order_by, vec![("?n".into(), Direction::Desc)]);
    }

    #[tokio::test]
    async fn parses_insert_data() {
        let stmt = parse(
            r#"INSERT DATA INTO ?test { /Person<joe> "knows"@[] /Person<amy> . /Person<joe> "age"@[] "30"^^type:int64 };"#,
        )
        .await;
        assert_eq!(stmt.kind, Kind::Insert);
        assert_eq!(stmt.output_graphs, vec!["?test"]);
        assert_eq!(stmt.data_triples.len(), 2);
    }

    #[tokio::test]
    async fn parses_create_and_drop_graph() {
        let stmt = parse("CREATE GRAPH ?test;").await;
        assert_eq!(stmt.kind, Kind::Create);
        assert_eq!(stmt.graph_bindings, vec!["?test"]);

        let stmt = parse("DROP GRAPH ?test;").await;
        assert_eq!(stmt.kind, Kind::Drop);
        assert_eq!(stmt.graph_bindings, vec!["?test"]);
    }

    #[tokio::test]
    async fn parses_show_graphs() {
        let stmt = parse("SHOW GRAPHS;").await;
        assert_eq!(stmt.kind, Kind::Show);
    }

    #[tokio::test]
    async fn parses_construct_with_two_graph_lists() {
        let stmt = parse(
            r#"CONSTRUCT { ?p "grandparent_of"@[] ?g } INTO ?derived FROM ?test WHERE { ?p "parent_of"@[] ?m . ?m "parent_of"@[] ?g };"#,
        )
        .await;
        assert_eq!(stmt.kind, Kind::Construct);
        assert_eq!(stmt.output_graphs, vec!["?derived"]);
        assert_eq!(stmt.input_graphs, vec!["?test"]);
        assert_eq!(stmt.construct_templates.len(), 1);
        assert_eq!(stmt.construct_templates[0].pairs.len(), 1);
        assert_eq!(stmt.clauses.len(), 2);
    }

    #[tokio::test]
    async fn having_not_binds_tighter_than_the_following_and() {
        let stmt = parse(
            r#"SELECT ?p FROM ?test WHERE { ?p "age"@[] ?a } HAVING NOT ?a = "30"^^type:int64 AND ?a = "31"^^type:int64;"#,
        )
        .await;
        match stmt.having.expect("HAVING must be present") {
            HavingExpr::And(lhs, rhs) => {
                assert!(matches!(*lhs, HavingExpr::Not(_)));
                assert!(matches!(*rhs, HavingExpr::Eq(_, _)));
            }
            other => panic!("expected a top-level AND, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn optional_clause_and_filter_attach_to_the_graph_clause() {
        let stmt = parse(
            r#"SELECT ?p FROM ?test WHERE { ?p "parent_of"@[] ?m . FILTER latest(?m) };"#,
        )
        .await;
        assert_eq!(stmt.clauses.len(), 1);
        assert_eq!(stmt.clauses[0].filters.len(), 1);
        assert_eq!(stmt.clauses[0].filters[0].function, FilterFn::Latest);
    }
}
