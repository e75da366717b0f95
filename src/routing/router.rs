//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store `(method, template, handler)` entries registered at startup
//! - Look up the route for a method + path
//! - Return the matched route or an explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) template scan (route table is small and fixed)
//! - Templates must not be ambiguous for the same method; the first
//!   registered match wins if they are

use axum::http::Method;

use crate::routing::matcher::{PathParams, PathTemplate};

/// A registered route.
#[derive(Debug, Clone)]
pub struct Route<H> {
    /// Route identifier for logging/metrics.
    pub name: &'static str,
    pub method: Method,
    pub template: PathTemplate,
    pub handler: H,
    /// Whether the handler consumes the request body.
    pub reads_body: bool,
}

impl<H> Route<H> {
    pub fn new(name: &'static str, method: Method, template: &str, handler: H) -> Self {
        Self {
            name,
            method,
            template: PathTemplate::parse(template),
            handler,
            reads_body: false,
        }
    }

    /// Mark the route as decoding a request body.
    pub fn with_body(mut self) -> Self {
        self.reads_body = true;
        self
    }
}

/// A successful lookup.
#[derive(Debug)]
pub struct RouteMatch<'a, H> {
    pub route: &'a Route<H>,
    pub params: PathParams,
}

/// Immutable route table.
#[derive(Debug, Clone)]
pub struct Router<H> {
    routes: Vec<Route<H>>,
}

impl<H> Router<H> {
    pub fn new(routes: Vec<Route<H>>) -> Self {
        Self { routes }
    }

    /// Find the route for `method` and `path`.
    ///
    /// Returns `None` when no template matches, which callers must keep
    /// distinct from an application-level not-found.
    pub fn match_route(&self, method: &Method, path: &str) -> Option<RouteMatch<'_, H>> {
        self.routes
            .iter()
            .filter(|route| route.method == *method)
            .find_map(|route| {
                route
                    .template
                    .matches(path)
                    .map(|params| RouteMatch { route, params })
            })
    }

    pub fn routes(&self) -> &[Route<H>] {
        &self.routes
    }
}
