//! Tenant-aware URL construction.
//!
//! # Responsibilities
//! - Compose reversed internal paths with the request's tenant prefix
//! - Offer the view-side `tenant_reverse` entry point for handler code
//!
//! # Design Decisions
//! - One builder instance per config generation, shared via Arc
//! - All prefixing rules live on `TenantPrefix::apply`; the builder only
//!   sequences reversal and composition, so the template helper and the
//!   view-side call agree by construction
//! - Reversal errors surface unchanged; composition adds no error kinds

use std::sync::Arc;

use crate::tenancy::context::TenantContext;
use crate::tenancy::prefix::TenantPrefix;
use crate::urls::table::{ReverseError, RouteTable};

/// Builds final paths from symbolic names and the current tenant prefix.
#[derive(Debug, Clone)]
pub struct UrlBuilder {
    table: Arc<RouteTable>,
}

impl UrlBuilder {
    pub fn new(table: Arc<RouteTable>) -> Self {
        Self { table }
    }

    /// The underlying route table, for the predicates.
    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Tenant-agnostic reversal, a pass-through to the route table.
    pub fn reverse(
        &self,
        name: &str,
        args: &[&str],
        kwargs: &[(&str, &str)],
    ) -> Result<String, ReverseError> {
        self.table.reverse(name, args, kwargs)
    }

    /// Reverse a symbolic name and qualify it with the given prefix.
    pub fn tenant_reverse(
        &self,
        prefix: &TenantPrefix,
        name: &str,
        args: &[&str],
        kwargs: &[(&str, &str)],
    ) -> Result<String, ReverseError> {
        let internal = self.table.reverse(name, args, kwargs)?;
        Ok(prefix.apply(&internal))
    }

    /// `tenant_reverse` against a request's annotation, for handler code.
    pub fn for_request(
        &self,
        context: &TenantContext,
        name: &str,
        args: &[&str],
        kwargs: &[(&str, &str)],
    ) -> Result<String, ReverseError> {
        self.tenant_reverse(context.prefix(), name, args, kwargs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tenancy::registry::TenantDescriptor;
    use crate::urls::table::DEFAULT_REPORT_PREFIX;

    fn builder() -> UrlBuilder {
        UrlBuilder::new(Arc::new(RouteTable::from_entries(
            [
                ("core:paciente_list", "/pacientes/"),
                ("core:paciente_detail", "/pacientes/{pk}/"),
                ("core:legacy_acme_detail", "/acme/pacientes/{pk}/"),
            ],
            DEFAULT_REPORT_PREFIX,
        )))
    }

    fn acme_prefix() -> TenantPrefix {
        TenantPrefix::for_slug("acme").unwrap()
    }

    #[test]
    fn test_prefix_applied_to_internal_path() {
        let builder = builder();
        let path = builder
            .tenant_reverse(&acme_prefix(), "core:paciente_list", &[], &[])
            .unwrap();
        assert_eq!(path, "/acme/pacientes/");
    }

    #[test]
    fn test_empty_prefix_is_identity() {
        let builder = builder();
        let plain = builder.reverse("core:paciente_list", &[], &[]).unwrap();
        let built = builder
            .tenant_reverse(&TenantPrefix::empty(), "core:paciente_list", &[], &[])
            .unwrap();
        assert_eq!(built, plain);
        assert_eq!(built, "/pacientes/");
    }

    #[test]
    fn test_already_prefixed_path_is_unchanged() {
        let builder = builder();
        let path = builder
            .tenant_reverse(&acme_prefix(), "core:legacy_acme_detail", &["42"], &[])
            .unwrap();
        assert_eq!(path, "/acme/pacientes/42/");
    }

    #[test]
    fn test_double_application_is_idempotent() {
        let builder = builder();
        let prefix = acme_prefix();
        let once = builder
            .tenant_reverse(&prefix, "core:paciente_detail", &["7"], &[])
            .unwrap();
        assert_eq!(prefix.apply(&once), once);
    }

    #[test]
    fn test_result_never_contains_double_slashes() {
        let builder = builder();
        for (name, args) in [
            ("core:paciente_list", &[][..]),
            ("core:paciente_detail", &["42"][..]),
            ("core:legacy_acme_detail", &["42"][..]),
        ] {
            let path = builder
                .tenant_reverse(&acme_prefix(), name, args, &[])
                .unwrap();
            assert!(!path.contains("//"), "double slash in {path}");
        }
    }

    #[test]
    fn test_reversal_errors_surface_unchanged() {
        let builder = builder();
        assert_eq!(
            builder.tenant_reverse(&acme_prefix(), "core:nada", &[], &[]),
            Err(ReverseError::UnknownRoute("core:nada".to_string()))
        );
        assert!(matches!(
            builder.tenant_reverse(&acme_prefix(), "core:paciente_detail", &[], &[]),
            Err(ReverseError::MissingParameters { .. })
        ));
    }

    #[test]
    fn test_for_request_matches_tenant_reverse() {
        let builder = builder();
        let prefix = acme_prefix();
        let context = TenantContext::bound(
            TenantDescriptor {
                slug: "acme".into(),
                nombre: "Acme Dental".into(),
                host: None,
            },
            prefix.clone(),
            "/acme/pacientes/",
        );
        let via_context = builder
            .for_request(&context, "core:paciente_detail", &["9"], &[])
            .unwrap();
        let via_prefix = builder
            .tenant_reverse(&prefix, "core:paciente_detail", &["9"], &[])
            .unwrap();
        assert_eq!(via_context, via_prefix);
        assert_eq!(via_context, "/acme/pacientes/9/");
    }
}
