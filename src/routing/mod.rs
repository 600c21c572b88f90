//! Route declaration, grouping and URL generation.
//!
//! Groups are flattened once when the application is built; matching itself
//! is left to axum.

mod action;
mod group;
mod pattern;
mod table;

pub use action::{Action, ActionFuture};
pub use group::{Route, RouteEntry, RouteGroup};
pub use pattern::RoutePattern;
pub use table::{RouteParams, RouteTable, UrlGenerator};
