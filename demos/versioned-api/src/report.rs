//! Per-version route report

use console::style;
use serde::Serialize;
use std::fmt;
use verroute::{ApiVersion, RouteSummary, RouteTables};

/// Routes served by one version's table
#[derive(Debug, Serialize)]
pub struct VersionReport {
    pub version: ApiVersion,
    pub routes: Vec<RouteLine>,
}

/// A served declaration and the handler behind it
///
/// `route.version` is the version whose declaration serves the route, which
/// is lower than the report's version for inherited routes.
#[derive(Debug, Serialize)]
pub struct RouteLine {
    #[serde(flatten)]
    pub route: RouteSummary,
    pub handler: &'static str,
}

pub fn build(tables: &RouteTables<&'static str>) -> Vec<VersionReport> {
    tables
        .group_by_version()
        .into_iter()
        .map(|(version, declarations)| VersionReport {
            version,
            routes: declarations
                .into_iter()
                .map(|d| RouteLine {
                    route: d.summary(),
                    handler: d.handler(),
                })
                .collect(),
        })
        .collect()
}

pub fn render_text(report: &[VersionReport], out: &mut impl fmt::Write) -> fmt::Result {
    for entry in report {
        if entry.version.is_global() {
            writeln!(out, "{}", style("global").bold())?;
        } else {
            writeln!(out, "{}", style(entry.version).bold())?;
        }

        for line in &entry.routes {
            let route = &line.route;
            write!(
                out,
                "  {:<7} {:<42} {} ({})",
                route.method, route.path, line.handler, route.version
            )?;
            if route.deprecated {
                write!(out, " {}", style("deprecated").yellow())?;
            }
            writeln!(out)?;
        }
    }

    Ok(())
}
