//! Per-version effective route tables
//!
//! [`RouteTables::compile`] turns the flat declaration list into one table per
//! declared version plus the global table. Every numbered table is complete:
//! a route declared at `v1` appears in the `v3` table unless `v2` or `v3`
//! overrides or removes it, so serving a request is a single lookup in the
//! table picked by the requested version.
//!
//! # Overlay rule
//!
//! Versions are swept in ascending order with a running overlay. At each
//! version the explicit entries of that version replace the carried ones,
//! and the result is frozen as that version's table. A removal places a
//! tombstone that is carried forward like any route, so it hides older
//! declarations of the same key until a later version declares it again.
//!
//! The result depends only on each declaration's version and on the
//! relative order of declarations sharing a version and key, never on the
//! order in which version blocks were written.

use crate::declaration::{RouteDeclaration, RouteKey};
use crate::error::{BuildError, ResolveError, Result};
use crate::predicate::RequestedVersion;
use crate::shape::{matcher_param, ShapeKey};
use crate::version::ApiVersion;
use http::Method;
use matchit::Router as MatchitRouter;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use tracing::{debug, trace};

/// Content of one cell of an effective table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// The declaration at this index serves the key
    Route(usize),
    /// The removal at this index hides the key
    Tombstone(usize),
}

impl Slot {
    /// Index of the declaration that produced the slot
    pub fn index(&self) -> usize {
        match self {
            Self::Route(index) | Self::Tombstone(index) => *index,
        }
    }

    pub fn is_tombstone(&self) -> bool {
        matches!(self, Self::Tombstone(_))
    }
}

/// The frozen route table of one version
///
/// Paths are matched in a separate radix tree per method, so a static shape
/// declared for one method never hides a variable shape declared for another.
pub struct EffectiveRouteTable {
    version: ApiVersion,
    slots: HashMap<RouteKey, Slot>,
    matchers: HashMap<Method, MatchitRouter<Slot>>,
}

impl EffectiveRouteTable {
    fn build(version: ApiVersion, slots: HashMap<RouteKey, Slot>) -> Result<Self> {
        let mut by_method: HashMap<Method, BTreeMap<&ShapeKey, Slot>> = HashMap::new();
        for (key, slot) in &slots {
            by_method
                .entry(key.method.clone())
                .or_default()
                .insert(&key.shape, *slot);
        }

        let mut matchers = HashMap::with_capacity(by_method.len());
        for (method, shapes) in by_method {
            let mut matcher = MatchitRouter::new();
            for (shape, slot) in shapes {
                matcher
                    .insert(shape.matcher_path(), slot)
                    .map_err(|e| BuildError::Conflict {
                        version,
                        path: shape.to_string(),
                        details: e.to_string(),
                    })?;
            }
            matchers.insert(method, matcher);
        }

        Ok(Self {
            version,
            slots,
            matchers,
        })
    }

    /// The version this table serves
    pub fn version(&self) -> ApiVersion {
        self.version
    }

    /// The slot for a key, tombstones included
    pub fn get(&self, key: &RouteKey) -> Option<Slot> {
        self.slots.get(key).copied()
    }

    /// Number of slots, tombstones included
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterate over every key and slot
    pub fn iter(&self) -> impl Iterator<Item = (&RouteKey, Slot)> {
        self.slots.iter().map(|(key, slot)| (key, *slot))
    }

    /// Match a concrete request path
    ///
    /// Returns the slot for `method` together with the captured segments,
    /// keyed by matcher placeholder name.
    fn match_path(&self, method: &Method, path: &str) -> Option<(Slot, HashMap<String, String>)> {
        let matched = self.matchers.get(method)?.at(path).ok()?;
        let slot = *matched.value;
        let captures = matched
            .params
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        Some((slot, captures))
    }
}

impl fmt::Debug for EffectiveRouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectiveRouteTable")
            .field("version", &self.version)
            .field("slots", &self.slots)
            .finish()
    }
}

/// Compiled route tables for every declared version
///
/// Built once and read-only afterwards; share it behind an `Arc`.
pub struct RouteTables<H> {
    declarations: Vec<RouteDeclaration<H>>,
    tables: BTreeMap<ApiVersion, EffectiveRouteTable>,
    global: EffectiveRouteTable,
}

impl<H> RouteTables<H> {
    /// Compile declarations into per-version tables
    ///
    /// Declarations are numbered in the order given. Two declarations with
    /// the same version and key resolve to the later one.
    pub fn compile(declarations: Vec<RouteDeclaration<H>>) -> Result<Self> {
        let declarations: Vec<RouteDeclaration<H>> = declarations
            .into_iter()
            .enumerate()
            .map(|(order, declaration)| declaration.with_order(order))
            .collect();

        let mut explicit: BTreeMap<ApiVersion, HashMap<RouteKey, Slot>> = BTreeMap::new();
        let mut global: HashMap<RouteKey, Slot> = HashMap::new();

        for (index, declaration) in declarations.iter().enumerate() {
            let key = declaration.key();

            if declaration.version().is_global() {
                if declaration.is_removed() {
                    return Err(BuildError::GlobalRemoval {
                        method: declaration.method().clone(),
                        path: declaration.path().to_string(),
                    });
                }
                if let Some(previous) = global.insert(key, Slot::Route(index)) {
                    debug!(
                        route = %declaration,
                        replaced = previous.index(),
                        "global route declared twice, keeping the later one"
                    );
                }
                continue;
            }

            let slot = if declaration.is_removed() {
                Slot::Tombstone(index)
            } else {
                Slot::Route(index)
            };

            if let Some(previous) = explicit
                .entry(declaration.version())
                .or_default()
                .insert(key, slot)
            {
                debug!(
                    route = %declaration,
                    replaced = previous.index(),
                    "route declared twice in the same version, keeping the later one"
                );
            }
        }

        let mut tables = BTreeMap::new();
        let mut carried: HashMap<RouteKey, Slot> = HashMap::new();
        for (version, entries) in explicit {
            for (key, slot) in entries {
                if let Some(previous) = carried.insert(key, slot) {
                    trace!(
                        %version,
                        route = %declarations[slot.index()],
                        shadows = %declarations[previous.index()],
                        "route overrides an older version"
                    );
                }
            }
            tables.insert(version, EffectiveRouteTable::build(version, carried.clone())?);
        }

        let global = EffectiveRouteTable::build(ApiVersion::GLOBAL, global)?;

        debug!(
            declarations = declarations.len(),
            versions = tables.len(),
            global_routes = global.len(),
            "compiled versioned route tables"
        );

        Ok(Self {
            declarations,
            tables,
            global,
        })
    }

    /// Every declaration, in compile order
    pub fn declarations(&self) -> &[RouteDeclaration<H>] {
        &self.declarations
    }

    /// Declared version numbers (excluding 0), ascending
    pub fn versions(&self) -> impl Iterator<Item = ApiVersion> + '_ {
        self.tables.keys().copied()
    }

    /// The highest declared version
    pub fn latest_version(&self) -> Option<ApiVersion> {
        self.tables.keys().next_back().copied()
    }

    /// The table of a version; version 0 is the global table
    pub fn table(&self, version: ApiVersion) -> Option<&EffectiveRouteTable> {
        if version.is_global() {
            Some(&self.global)
        } else {
            self.tables.get(&version)
        }
    }

    /// The declaration a slot points at
    pub fn declaration(&self, slot: Slot) -> &RouteDeclaration<H> {
        &self.declarations[slot.index()]
    }

    /// Effective routes per version, in declaration order
    ///
    /// Tombstones are left out. Version 0 is present when global routes
    /// exist.
    pub fn group_by_version(&self) -> BTreeMap<ApiVersion, Vec<&RouteDeclaration<H>>> {
        let mut grouped = BTreeMap::new();

        if !self.global.is_empty() {
            grouped.insert(ApiVersion::GLOBAL, self.routes_of(&self.global));
        }
        for (version, table) in &self.tables {
            grouped.insert(*version, self.routes_of(table));
        }

        grouped
    }

    fn routes_of(&self, table: &EffectiveRouteTable) -> Vec<&RouteDeclaration<H>> {
        let mut indices: Vec<usize> = table
            .iter()
            .filter_map(|(_, slot)| match slot {
                Slot::Route(index) => Some(index),
                Slot::Tombstone(_) => None,
            })
            .collect();
        indices.sort_unstable();
        indices.into_iter().map(|i| &self.declarations[i]).collect()
    }

    /// Key-level lookup for a requested version
    ///
    /// The global table is consulted only when the selected table has no
    /// slot for the key.
    pub fn lookup(&self, requested: RequestedVersion, key: &RouteKey) -> Option<&RouteDeclaration<H>> {
        if let Some((_, table)) = requested.select(&self.tables) {
            match table.get(key) {
                Some(Slot::Route(index)) => return Some(&self.declarations[index]),
                Some(Slot::Tombstone(_)) => return None,
                None => {}
            }
        }

        match self.global.get(key) {
            Some(Slot::Route(index)) => Some(&self.declarations[index]),
            _ => None,
        }
    }

    /// Resolve a concrete request
    ///
    /// The numbered table picked by `requested` is tried first. A tombstone
    /// there ends the search; otherwise the global table is tried.
    pub fn resolve(
        &self,
        requested: RequestedVersion,
        method: &Method,
        path: &str,
    ) -> std::result::Result<ResolvedRoute<'_, H>, ResolveError> {
        if let Some((version, table)) = requested.select(&self.tables) {
            match table.match_path(method, path) {
                Some((Slot::Route(index), captures)) => {
                    return Ok(self.resolved(index, version, requested, captures));
                }
                Some((Slot::Tombstone(index), _)) => {
                    let removed_at = self.declarations[index].version();
                    trace!(%method, path, %requested, %removed_at, "route removed");
                    return Err(ResolveError::NotFound {
                        method: method.clone(),
                        path: path.to_string(),
                        requested,
                        removed_at: Some(removed_at),
                    });
                }
                None => {}
            }
        }

        if let Some((Slot::Route(index), captures)) = self.global.match_path(method, path) {
            return Ok(self.resolved(index, ApiVersion::GLOBAL, requested, captures));
        }

        trace!(%method, path, %requested, "no route matched");
        Err(ResolveError::NotFound {
            method: method.clone(),
            path: path.to_string(),
            requested,
            removed_at: None,
        })
    }

    fn resolved(
        &self,
        index: usize,
        served: ApiVersion,
        requested: RequestedVersion,
        captures: HashMap<String, String>,
    ) -> ResolvedRoute<'_, H> {
        let declaration = &self.declarations[index];
        let params = declaration
            .path()
            .variables()
            .filter_map(|(position, name)| {
                captures
                    .get(&matcher_param(position))
                    .map(|value| (name.to_string(), value.clone()))
            })
            .collect();

        ResolvedRoute {
            declaration,
            served,
            requested,
            params,
        }
    }
}

impl<H> fmt::Debug for RouteTables<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteTables")
            .field("declarations", &self.declarations.len())
            .field("versions", &self.tables.keys().collect::<Vec<_>>())
            .field("global_routes", &self.global.len())
            .finish()
    }
}

/// A successful resolution
#[derive(Debug)]
pub struct ResolvedRoute<'a, H> {
    declaration: &'a RouteDeclaration<H>,
    served: ApiVersion,
    requested: RequestedVersion,
    params: HashMap<String, String>,
}

impl<'a, H> ResolvedRoute<'a, H> {
    pub fn declaration(&self) -> &'a RouteDeclaration<H> {
        self.declaration
    }

    pub fn handler(&self) -> &'a H {
        self.declaration.handler()
    }

    /// The table that served the request; 0 for global routes
    pub fn served_version(&self) -> ApiVersion {
        self.served
    }

    pub fn requested_version(&self) -> RequestedVersion {
        self.requested
    }

    /// Whether the resolved declaration is deprecated
    pub fn is_deprecated(&self) -> bool {
        self.declaration.is_deprecated()
    }

    /// Path parameters, keyed by the declaration's variable names
    pub fn params(&self) -> &HashMap<String, String> {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn into_params(self) -> HashMap<String, String> {
        self.params
    }
}
