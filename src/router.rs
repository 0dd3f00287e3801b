//! Client-side routing.
//!
//! The application's pages are declared once in [`ROUTES`], an ordered table
//! of path patterns. A [`Router`] matches browser locations against it and
//! hands out the view registered for the first matching entry. Views of
//! [`LoadStrategy::Lazy`] entries are only built the first time a location
//! resolves to them.

use std::cell::OnceCell;
use std::collections::BTreeMap;
use std::fmt;

use log::info;

/// Logical pages of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewId {
    Lobby,
    Game,
    NotFound,
}

/// When the view of a route is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStrategy {
    /// Together with the router.
    Eager,
    /// On the first navigation to the route.
    Lazy,
}

/// One row of the route table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteSpec {
    pub name: &'static str,
    pub path: &'static str,
    pub view: ViewId,
    pub load: LoadStrategy,
}

pub const ROUTES: [RouteSpec; 3] = [
    RouteSpec {
        name: "lobby",
        path: "/",
        view: ViewId::Lobby,
        load: LoadStrategy::Eager,
    },
    RouteSpec {
        name: "game",
        path: "/game/:id",
        view: ViewId::Game,
        load: LoadStrategy::Lazy,
    },
    RouteSpec {
        name: "notFound",
        path: "/:pathMatch(.*)*",
        view: ViewId::NotFound,
        load: LoadStrategy::Eager,
    },
];

/// Named segments captured while matching a location.
pub type Params = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// Matched case-insensitively.
    Static(String),
    /// `:name`, exactly one segment.
    Param(String),
    /// `:name(.*)*`, whatever is left, possibly nothing.
    CatchAll(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Pattern {
    segments: Vec<Segment>,
}

impl Pattern {
    fn parse(path: &str) -> Self {
        let segments = split_path(path)
            .map(|segment| match segment.strip_prefix(':') {
                Some(param) => match param.strip_suffix("(.*)*") {
                    Some(name) => Segment::CatchAll(name.to_string()),
                    None => Segment::Param(param.to_string()),
                },
                None => Segment::Static(segment.to_string()),
            })
            .collect();
        Self { segments }
    }

    fn matches(&self, path: &[&str]) -> Option<Params> {
        let mut params = Params::new();
        let mut rest = path;
        for segment in &self.segments {
            match segment {
                Segment::CatchAll(name) => {
                    params.insert(name.clone(), rest.join("/"));
                    return Some(params);
                }
                Segment::Static(expected) => {
                    let (head, tail) = rest.split_first()?;
                    if !head.eq_ignore_ascii_case(expected) {
                        return None;
                    }
                    rest = tail;
                }
                Segment::Param(name) => {
                    let (head, tail) = rest.split_first()?;
                    params.insert(name.clone(), head.to_string());
                    rest = tail;
                }
            }
        }
        rest.is_empty().then_some(params)
    }
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

struct Entry<V> {
    spec: RouteSpec,
    pattern: Pattern,
    view: OnceCell<V>,
}

/// Result of resolving a location.
#[derive(Debug)]
pub struct RouteMatch<'r, V> {
    pub name: &'static str,
    pub view_id: ViewId,
    pub view: &'r V,
    pub params: Params,
}

impl<V> RouteMatch<'_, V> {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

/// Matches locations against a route table, building views through
/// `factory`.
pub struct Router<V> {
    base: String,
    entries: Vec<Entry<V>>,
    factory: Box<dyn Fn(ViewId) -> V>,
}

impl<V> Router<V> {
    /// Router over the application's [`ROUTES`].
    pub fn app(base: &str, factory: impl Fn(ViewId) -> V + 'static) -> Self {
        Self::new(base, &ROUTES, factory)
    }

    /// `base` is the path the application is served under (`/` at the
    /// root). It is stripped from locations before matching.
    pub fn new(base: &str, routes: &[RouteSpec], factory: impl Fn(ViewId) -> V + 'static) -> Self {
        let entries = routes
            .iter()
            .map(|spec| {
                let view = OnceCell::new();
                if spec.load == LoadStrategy::Eager {
                    let _ = view.set(factory(spec.view));
                }
                Entry {
                    spec: *spec,
                    pattern: Pattern::parse(spec.path),
                    view,
                }
            })
            .collect();
        Self {
            base: base.trim_end_matches('/').to_string(),
            entries,
            factory: Box::new(factory),
        }
    }

    /// Finds the first route matching `location`. Query string and
    /// fragment are ignored.
    pub fn resolve(&self, location: &str) -> Option<RouteMatch<'_, V>> {
        let path = location.split(['?', '#']).next().unwrap_or_default();
        let path = self.strip_base(path);
        let segments: Vec<&str> = split_path(path).collect();

        self.entries.iter().find_map(|entry| {
            let params = entry.pattern.matches(&segments)?;
            let view = entry.view.get_or_init(|| {
                info!("loading {} view", entry.spec.name);
                (self.factory)(entry.spec.view)
            });
            Some(RouteMatch {
                name: entry.spec.name,
                view_id: entry.spec.view,
                view,
                params,
            })
        })
    }

    /// Whether the view of route `name` has been built.
    pub fn is_loaded(&self, name: &str) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.spec.name == name && entry.view.get().is_some())
    }

    /// Location to push into the browser history for an application path.
    pub fn href(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    fn strip_base<'a>(&self, path: &'a str) -> &'a str {
        match path.strip_prefix(self.base.as_str()) {
            Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
            _ => path,
        }
    }
}

impl<V> fmt::Debug for Router<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("base", &self.base)
            .field("routes", &self.entries.iter().map(|e| e.spec.name).collect::<Vec<_>>())
            .finish()
    }
}
