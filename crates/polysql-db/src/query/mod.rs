//! The query and condition AST.
//!
//! - [`condition`] - structured predicates and their composition operators
//! - [`operand`] - right-hand sides of predicates
//! - [`select`] - the `SELECT` statement and its clauses
//!
//! Nothing in this module knows about dialects. Rendering lives in
//! [`builder`](crate::builder).

pub mod condition;
pub mod operand;
pub mod select;

pub use condition::{ComparisonOp, Condition, Connective, InColumns, InValues, LikeEscape};
pub use operand::{LikePattern, Operand};
pub use select::{
    ColumnRef, Join, JoinType, MatchExpr, OptionValue, OrderBy, Query, SelectColumn,
    SortDirection, TableRef, Union,
};
