//! The BadWolf triple data model: hierarchical types, opaque ids, nodes,
//! immutable/temporal predicates, typed literals, nanosecond time anchors,
//! and triples built from them. This is the contract the parser's semantic
//! model and the planner both consume (spec §3).

mod error;
mod id;
mod literal;
mod node;
mod object;
mod predicate;
mod time;
mod triple;
mod type_;

pub use error::ModelError;
pub use id::Id;
pub use literal::{BoundedBuilder, Literal};
pub use node::{BlankNodeGenerator, Node};
pub use object::Object;
pub use predicate::{Predicate, PredicateBound};
pub use time::{in_bounds, merge_bounds, TimeAnchor};
pub use triple::Triple;
pub use type_::{Type, BLANK_TYPE};
