//! Named route table and symbolic reversal.
//!
//! # Responsibilities
//! - Store compiled route patterns under their symbolic names
//! - Reverse a symbolic name plus parameters into an internal path
//! - Answer the report-name and takes-parameters predicates
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Patterns use the router's `{param}` placeholder syntax so one
//!   declaration drives both dispatch and reversal
//! - Reversal substitutes parameter values verbatim; encoding is the
//!   caller's concern
//! - Explicit errors rather than silent fallback paths

use std::collections::HashMap;
use thiserror::Error;

/// Default symbolic-name prefix that marks report routes.
pub const DEFAULT_REPORT_PREFIX: &str = "core:reporte_";

/// Errors produced by symbolic reversal.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReverseError {
    /// No route is registered under the symbolic name.
    #[error("unknown route: {0}")]
    UnknownRoute(String),

    /// The route exists but required parameters were not supplied.
    #[error("route '{name}' is missing parameters: {missing:?}")]
    MissingParameters { name: String, missing: Vec<String> },
}

/// One piece of a compiled route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A compiled route pattern.
#[derive(Debug, Clone)]
struct RoutePattern {
    segments: Vec<Segment>,
    trailing_slash: bool,
    params: Vec<String>,
}

impl RoutePattern {
    /// Compile a router path like `/pacientes/{pk}/` into segments.
    fn compile(pattern: &str) -> Self {
        let trimmed = pattern.trim_matches('/');
        let trailing_slash = pattern.len() > 1 && pattern.ends_with('/');
        let mut segments = Vec::new();
        let mut params = Vec::new();
        if !trimmed.is_empty() {
            for part in trimmed.split('/') {
                match part.strip_prefix('{').and_then(|p| p.strip_suffix('}')) {
                    Some(name) => {
                        params.push(name.to_string());
                        segments.push(Segment::Param(name.to_string()));
                    }
                    None => segments.push(Segment::Literal(part.to_string())),
                }
            }
        }
        Self {
            segments,
            trailing_slash,
            params,
        }
    }
}

/// Immutable map from symbolic names to route patterns.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: HashMap<String, RoutePattern>,
    report_prefix: String,
}

impl RouteTable {
    /// Compile a table from `(name, pattern)` pairs.
    pub fn from_entries<'a>(
        entries: impl IntoIterator<Item = (&'a str, &'a str)>,
        report_prefix: impl Into<String>,
    ) -> Self {
        let routes = entries
            .into_iter()
            .map(|(name, pattern)| (name.to_string(), RoutePattern::compile(pattern)))
            .collect();
        Self {
            routes,
            report_prefix: report_prefix.into(),
        }
    }

    /// Reverse a symbolic name into its internal path.
    ///
    /// Positional values fill parameters in declaration order; keyword
    /// values fill by name and win over positional ones. Surplus values
    /// are ignored.
    pub fn reverse(
        &self,
        name: &str,
        args: &[&str],
        kwargs: &[(&str, &str)],
    ) -> Result<String, ReverseError> {
        let route = self
            .routes
            .get(name)
            .ok_or_else(|| ReverseError::UnknownRoute(name.to_string()))?;

        let mut values: HashMap<&str, &str> = HashMap::new();
        for (param, value) in route.params.iter().zip(args.iter()) {
            values.insert(param.as_str(), value);
        }
        for (key, value) in kwargs {
            values.insert(key, value);
        }

        let missing: Vec<String> = route
            .params
            .iter()
            .filter(|p| !values.contains_key(p.as_str()))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(ReverseError::MissingParameters {
                name: name.to_string(),
                missing,
            });
        }

        let mut path = String::from("/");
        for (i, segment) in route.segments.iter().enumerate() {
            if i > 0 {
                path.push('/');
            }
            match segment {
                Segment::Literal(text) => path.push_str(text),
                Segment::Param(param) => path.push_str(values[param.as_str()]),
            }
        }
        if route.trailing_slash && !route.segments.is_empty() {
            path.push('/');
        }
        Ok(path)
    }

    /// True when the route exists and takes at least one parameter.
    /// Unknown names are conservatively reported as parameterized.
    pub fn requires_parameters(&self, name: &str) -> bool {
        match self.routes.get(name) {
            Some(route) => !route.params.is_empty(),
            None => true,
        }
    }

    /// True when the symbolic name begins with the report prefix.
    pub fn is_report(&self, name: &str) -> bool {
        name.starts_with(&self.report_prefix)
    }

    /// Symbolic names in the table, for diagnostics.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RouteTable {
        RouteTable::from_entries(
            [
                ("core:index", "/"),
                ("core:paciente_list", "/pacientes/"),
                ("core:paciente_detail", "/pacientes/{pk}/"),
                ("core:cita_move", "/citas/{pk}/mover/{fecha}/"),
                ("core:reporte_ingresos", "/reportes/ingresos/"),
            ],
            DEFAULT_REPORT_PREFIX,
        )
    }

    #[test]
    fn test_reverse_static_routes() {
        let table = table();
        assert_eq!(table.reverse("core:index", &[], &[]), Ok("/".to_string()));
        assert_eq!(
            table.reverse("core:paciente_list", &[], &[]),
            Ok("/pacientes/".to_string())
        );
    }

    #[test]
    fn test_reverse_with_positional_args() {
        let table = table();
        assert_eq!(
            table.reverse("core:paciente_detail", &["42"], &[]),
            Ok("/pacientes/42/".to_string())
        );
        assert_eq!(
            table.reverse("core:cita_move", &["7", "2024-06-01"], &[]),
            Ok("/citas/7/mover/2024-06-01/".to_string())
        );
    }

    #[test]
    fn test_reverse_with_kwargs() {
        let table = table();
        assert_eq!(
            table.reverse("core:paciente_detail", &[], &[("pk", "42")]),
            Ok("/pacientes/42/".to_string())
        );
        // Keyword wins over positional for the same parameter.
        assert_eq!(
            table.reverse("core:paciente_detail", &["1"], &[("pk", "2")]),
            Ok("/pacientes/2/".to_string())
        );
    }

    #[test]
    fn test_reverse_unknown_route() {
        let table = table();
        assert_eq!(
            table.reverse("core:nada", &[], &[]),
            Err(ReverseError::UnknownRoute("core:nada".to_string()))
        );
    }

    #[test]
    fn test_reverse_missing_parameters() {
        let table = table();
        assert_eq!(
            table.reverse("core:paciente_detail", &[], &[]),
            Err(ReverseError::MissingParameters {
                name: "core:paciente_detail".to_string(),
                missing: vec!["pk".to_string()],
            })
        );
        // A partial fill reports only what is still missing.
        assert_eq!(
            table.reverse("core:cita_move", &["7"], &[]),
            Err(ReverseError::MissingParameters {
                name: "core:cita_move".to_string(),
                missing: vec!["fecha".to_string()],
            })
        );
    }

    #[test]
    fn test_requires_parameters() {
        let table = table();
        assert!(table.requires_parameters("core:paciente_detail"));
        assert!(!table.requires_parameters("core:paciente_list"));
        // Unknown names answer true rather than guessing.
        assert!(table.requires_parameters("core:nada"));
    }

    #[test]
    fn test_requires_parameters_agrees_with_a_bare_reverse_probe() {
        let table = table();
        for name in table.names() {
            let probe = matches!(
                table.reverse(name, &[], &[]),
                Err(ReverseError::MissingParameters { .. })
            );
            assert_eq!(table.requires_parameters(name), probe, "disagreement on {name}");
        }
    }

    #[test]
    fn test_is_report() {
        let table = table();
        assert!(table.is_report("core:reporte_ingresos"));
        assert!(!table.is_report("core:paciente_list"));

        let custom = RouteTable::from_entries([("informes:ventas", "/ventas/")], "informes:");
        assert!(custom.is_report("informes:ventas"));
    }
}
