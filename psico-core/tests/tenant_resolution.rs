use psico_core::tenant::{Resolution, TenantId, TenantResolver};
use psico_core::TenantCatalog;

fn tenant(s: &str) -> Option<TenantId> {
    Some(TenantId::from(s))
}

#[test]
fn every_root_host_is_global_context() {
    let resolver = TenantResolver::default();
    for host in ["psicoadmin.xyz", "www.psicoadmin.xyz", "localhost", "127.0.0.1"] {
        assert_eq!(resolver.resolve(host), None, "{host} should have no tenant");
        assert_eq!(resolver.explain(host).1, Some("root-host"));
    }
}

#[test]
fn app_hosts_resolve_to_their_clinic() {
    let resolver = TenantResolver::default();
    for clinic in resolver.clinics().to_vec() {
        let host = format!("{clinic}-app.psicoadmin.xyz");
        assert_eq!(resolver.resolve(&host), Some(clinic.clone()));
        assert_eq!(resolver.explain(&host).1, Some("app-subdomain"));
    }
}

#[test]
fn unrecognized_hosts_never_fail() {
    let resolver = TenantResolver::default();
    for host in ["example.com", "", "...", "[::1]:8080", "a.b.c.d.e", "xn--bcher-kva.example"] {
        assert_eq!(resolver.resolve(host), None, "{host}");
    }
}

#[test]
fn resolution_is_a_pure_function_of_the_host() {
    let resolver = TenantResolver::default();
    for host in [
        "bienestar-app.psicoadmin.xyz",
        "mindcare.localhost",
        "preview.vercel.app",
        "example.org",
    ] {
        assert_eq!(resolver.resolve(host), resolver.resolve(host));
    }
}

#[test]
fn custom_domains_use_the_same_rule_shape() {
    let resolver = TenantResolver::for_domain("clinics.example", ["norte", "sur"], "preview.dev", "norte");
    assert_eq!(resolver.resolve("clinics.example"), None);
    assert_eq!(resolver.resolve("sur-app.clinics.example"), tenant("sur"));
    assert_eq!(resolver.resolve("norte.clinics.example"), tenant("norte"));
    assert_eq!(resolver.resolve("branch-x.preview.dev"), tenant("norte"));
    assert!(resolver.is_root_host("www.clinics.example"));
    assert!(!resolver.is_root_host("localhost"));
}

#[test]
fn catalog_and_resolver_agree_on_clinics() {
    let resolver = TenantResolver::default();
    let catalog = TenantCatalog::default();
    let mut from_resolver = resolver.clinics().to_vec();
    from_resolver.sort();
    assert_eq!(from_resolver, catalog.clinic_slugs());

    let resolved = resolver.resolve("mindcare-app.psicoadmin.xyz");
    let profile = catalog.current_profile(resolved.as_ref()).unwrap();
    assert_eq!(profile.name, "MindCare Psicología");
    assert_eq!(resolver.explain("psicoadmin.xyz").0, Resolution::Root);
}
