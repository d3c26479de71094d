use super::pattern::{RouteParams, RoutePattern};
use crate::page::Page;
use std::cmp::Ordering;
use std::sync::Arc;
use story_core::error::{Result, StoryError};

/// One registered pattern and the page it activates.
#[derive(Clone)]
pub struct Route {
    pattern: RoutePattern,
    page: Arc<dyn Page>,
}

impl Route {
    pub fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }

    pub fn page(&self) -> &Arc<dyn Page> {
        &self.page
    }
}

/// Outcome of resolving a location against the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub index: usize,
    pub path: String,
    pub params: RouteParams,
}

/// A validated route table with exactly one wildcard entry.
pub struct RouteTable {
    routes: Vec<Route>,
    wildcard: usize,
}

impl RouteTable {
    pub fn builder() -> RouteTableBuilder {
        RouteTableBuilder::default()
    }

    /// Resolves a location fragment to a route.
    ///
    /// The most specific matching pattern wins; among equally specific
    /// patterns the one registered first wins. The wildcard is used only
    /// when nothing else matches.
    pub fn resolve(&self, fragment: &str) -> Resolved {
        let path = super::pattern::normalize_fragment(fragment);
        let mut best: Option<(usize, RouteParams)> = None;

        for (index, route) in self.routes.iter().enumerate() {
            if route.pattern.is_wildcard() {
                continue;
            }
            let Some(params) = route.pattern.matches(&path) else {
                continue;
            };
            let better = match &best {
                None => true,
                Some((current, _)) => {
                    route
                        .pattern
                        .specificity_cmp(&self.routes[*current].pattern)
                        == Ordering::Greater
                }
            };
            if better {
                best = Some((index, params));
            }
        }

        let (index, params) = best.unwrap_or((self.wildcard, RouteParams::new()));
        Resolved {
            index,
            path,
            params,
        }
    }

    pub fn route(&self, index: usize) -> Option<&Route> {
        self.routes.get(index)
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Index of the route registered under `pattern`.
    pub fn position(&self, pattern: &str) -> Option<usize> {
        let pattern = RoutePattern::parse(pattern).ok()?;
        self.routes.iter().position(|r| r.pattern == pattern)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[derive(Default)]
pub struct RouteTableBuilder {
    entries: Vec<(String, Arc<dyn Page>)>,
}

impl RouteTableBuilder {
    pub fn route(mut self, pattern: impl Into<String>, page: Arc<dyn Page>) -> Self {
        self.entries.push((pattern.into(), page));
        self
    }

    /// Validates the table.
    ///
    /// # Errors
    ///
    /// `StoryError::Config` when a pattern is malformed, registered
    /// twice, or when no wildcard route exists.
    pub fn build(self) -> Result<RouteTable> {
        let mut routes: Vec<Route> = Vec::with_capacity(self.entries.len());
        for (raw, page) in self.entries {
            let pattern = RoutePattern::parse(&raw)?;
            if routes.iter().any(|r| r.pattern == pattern) {
                return Err(StoryError::config(format!(
                    "Route '{}' is registered more than once",
                    pattern
                )));
            }
            routes.push(Route { pattern, page });
        }

        let wildcard = routes
            .iter()
            .position(|r| r.pattern.is_wildcard())
            .ok_or_else(|| StoryError::config("Route table needs a '*' fallback route"))?;

        Ok(RouteTable { routes, wildcard })
    }
}
