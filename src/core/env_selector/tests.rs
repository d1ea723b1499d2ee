use super::*;
use crate::core::catalog::StaticProbe;
use crate::error::MatrixError;

fn catalog(usable: &[Backend]) -> BackendCatalog {
    BackendCatalog::new(Box::new(StaticProbe::new(usable.iter().copied())))
}

fn set(backends: &[Backend]) -> BTreeSet<Backend> {
    backends.iter().copied().collect()
}

#[test]
fn absent_value_is_unrestricted() {
    let catalog = catalog(&[Backend::X64, Backend::Cuda]);
    let selection = EnvSelection::parse(None, &catalog).unwrap();
    assert!(selection.is_unrestricted());
    assert_eq!(selection.resolve(catalog.usable()), *catalog.usable());
}

#[test]
fn empty_value_never_yields_an_empty_name() {
    let catalog = catalog(&[Backend::X64]);
    for raw in ["", ",", ",,", "^"] {
        let selection = EnvSelection::parse(Some(raw), &catalog).unwrap();
        assert!(selection.is_unrestricted(), "value {:?}", raw);
        assert_eq!(selection.resolve(catalog.usable()), set(&[Backend::X64]));
    }
}

#[test]
fn include_mode_returns_requested_as_is() {
    let catalog = catalog(&[Backend::X64]);
    let selection = EnvSelection::parse(Some("cuda,metal"), &catalog).unwrap();
    assert!(!selection.is_exclude());
    assert_eq!(
        selection.resolve(catalog.usable()),
        set(&[Backend::Cuda, Backend::Metal])
    );
}

#[test]
fn exclude_mode_subtracts_from_usable() {
    let catalog = catalog(&[Backend::X64, Backend::Cuda, Backend::Vulkan]);
    let selection = EnvSelection::parse(Some("^cuda"), &catalog).unwrap();
    assert!(selection.is_exclude());
    assert_eq!(
        selection.resolve(catalog.usable()),
        set(&[Backend::X64, Backend::Vulkan])
    );
}

#[test]
fn excluding_an_unusable_backend_is_a_noop() {
    let catalog = catalog(&[Backend::X64]);
    let selection = EnvSelection::parse(Some("^metal"), &catalog).unwrap();
    assert_eq!(selection.resolve(catalog.usable()), set(&[Backend::X64]));
}

#[test]
fn groups_expand() {
    let catalog = catalog(&[Backend::host_cpu(), Backend::Cuda, Backend::Opengl]);
    let selection = EnvSelection::parse(Some("^gpu"), &catalog).unwrap();
    assert_eq!(selection.resolve(catalog.usable()), set(&[Backend::host_cpu()]));

    let selection = EnvSelection::parse(Some("cpu"), &catalog).unwrap();
    assert_eq!(selection.requested(), &set(&[Backend::host_cpu()]));
}

#[test]
fn caret_is_only_special_at_the_start() {
    let catalog = catalog(&[Backend::X64]);
    let err = EnvSelection::parse(Some("x64,^cuda"), &catalog).unwrap_err();
    assert!(matches!(err, MatrixError::UnknownBackend(ref name) if name == "^cuda"));
}

#[test]
fn unknown_token_is_fatal() {
    let catalog = catalog(&[Backend::X64]);
    assert!(matches!(
        EnvSelection::parse(Some("x64,tpu"), &catalog),
        Err(MatrixError::UnknownBackend(_))
    ));
    assert!(EnvSelection::parse(Some("^CUDA"), &catalog).is_err());
}
