use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        VanishError::source_not_ready("x")
            .to_string()
            .contains("source not ready:")
    );
    assert!(
        VanishError::invalid_configuration("x")
            .to_string()
            .contains("invalid configuration:")
    );
    assert!(
        VanishError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        VanishError::animation("x")
            .to_string()
            .contains("animation error:")
    );
    assert!(VanishError::render("x").to_string().contains("render error:"));
    assert!(
        VanishError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = VanishError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
