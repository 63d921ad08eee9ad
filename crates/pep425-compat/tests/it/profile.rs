use indoc::indoc;

use pep425_compat::{GenericRules, RulesRegistry, SupportedTagGenerator};
use pep425_platform::{InterpreterFamily, PlatformProfile};

#[test]
fn from_toml() {
    let profile = PlatformProfile::from_toml(indoc! {r#"
        interpreter = "cpython"
        version = "3.10"
        os = { name = "manylinux", major = 2, minor = 17 }
        arch = "x86_64"
    "#})
    .unwrap();
    let ranked = SupportedTagGenerator::default().generate(&profile).unwrap();
    assert_eq!(
        ranked.best().map(ToString::to_string).as_deref(),
        Some("cp310-cp310-manylinux_2_17_x86_64")
    );
    insta::assert_snapshot!(profile, @"cp 3.10 on manylinux_2_17_x86_64");
}

#[test]
fn unsupported_interpreter() {
    let profile = PlatformProfile::from_toml(indoc! {r#"
        interpreter = "graalpy"
        version = [3, 11]
        platforms = ["linux_x86_64"]
    "#})
    .unwrap();
    let generator = SupportedTagGenerator::default();
    let err = generator.generate(&profile).unwrap_err();
    assert_eq!(err.family(), "graalpy");

    // Falling back to the generic rules.
    let mut registry = RulesRegistry::default();
    registry.register(InterpreterFamily::new("graalpy").unwrap(), GenericRules);
    let ranked = SupportedTagGenerator::new(registry)
        .generate(&profile)
        .unwrap();
    let tags: Vec<String> = ranked.iter().map(ToString::to_string).collect();
    assert_eq!(
        &tags[..3],
        [
            "graalpy311-none-linux_x86_64",
            "py311-none-linux_x86_64",
            "py310-none-linux_x86_64"
        ]
    );
    assert_eq!(&tags[tags.len() - 2..], ["py30-none-any", "py3-none-any"]);
    assert_eq!(tags.len(), 2 * 14);
}
