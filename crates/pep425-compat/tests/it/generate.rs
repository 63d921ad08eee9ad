use pep425_compat::{PriorityGroup, RankedTagList, SupportedTagGenerator};
use pep425_platform::{Arch, Os, PlatformProfile};
use pep425_tags::Tag;

fn generate(profile: &PlatformProfile) -> RankedTagList {
    SupportedTagGenerator::default().generate(profile).unwrap()
}

#[test]
fn manylinux_cpython() {
    let profile = PlatformProfile::new(
        "cp",
        (3, 9),
        Some("cp39"),
        ["manylinux_2_17_x86_64", "manylinux1_x86_64", "linux_x86_64"],
    )
    .unwrap();
    let ranked = generate(&profile);

    assert_eq!(
        ranked.best().map(ToString::to_string).as_deref(),
        Some("cp39-cp39-manylinux_2_17_x86_64")
    );
    assert_eq!(
        ranked.iter().last().map(ToString::to_string).as_deref(),
        Some("py3-none-any")
    );

    let tag: Tag = "cp38-abi3-manylinux1_x86_64".parse().unwrap();
    assert_eq!(ranked.rank_of(&tag), Some(7));
    assert_eq!(ranked.group_of(7), Some(PriorityGroup::StableAbi));
}

/// Every rank is unique, and the priority groups only ever get worse.
#[test]
fn unique_and_monotonic() {
    let profile = PlatformProfile::for_platform(
        "cpython",
        (3, 12),
        None,
        &Os::Manylinux {
            major: 2,
            minor: 28,
        },
        Arch::Aarch64,
    )
    .unwrap();
    let ranked = generate(&profile);

    let mut seen = std::collections::HashSet::new();
    for (rank, tag) in ranked.iter().enumerate() {
        assert!(seen.insert(tag.clone()), "duplicate tag `{tag}`");
        assert_eq!(ranked.rank_of(tag), Some(rank));
    }
    for ((_, a), (_, b)) in ranked.iter_groups().zip(ranked.iter_groups().skip(1)) {
        assert!(a <= b);
    }
}

#[test]
fn macos_universal2() {
    let profile = PlatformProfile::for_platform(
        "cp",
        (3, 11),
        None,
        &Os::Macos {
            major: 14,
            minor: 0,
        },
        Arch::Aarch64,
    )
    .unwrap();
    let ranked = generate(&profile);

    let arm64: Tag = "cp311-cp311-macosx_14_0_arm64".parse().unwrap();
    let universal2: Tag = "cp311-cp311-macosx_10_9_universal2".parse().unwrap();
    let x86_64: Tag = "cp311-cp311-macosx_10_9_x86_64".parse().unwrap();
    assert_eq!(ranked.rank_of(&arm64), Some(0));
    assert!(ranked.rank_of(&universal2).is_some());
    assert_eq!(ranked.rank_of(&x86_64), None);
}

#[test]
fn pure_python_profile() {
    let profile = PlatformProfile::new("python", (2, 7), None, ["linux_i686"]).unwrap();
    let ranked = generate(&profile);
    let tags: Vec<String> = ranked.iter().map(ToString::to_string).collect();
    assert_eq!(
        &tags[..3],
        [
            "py27-none-linux_i686",
            "py26-none-linux_i686",
            "py25-none-linux_i686"
        ]
    );
    assert_eq!(&tags[tags.len() - 2..], ["py20-none-any", "py2-none-any"]);
    // `py27` to `py20` and `py2`, on `linux_i686` and then on `any`.
    assert_eq!(tags.len(), 2 * 9);
}

/// A pure wheel built for a specific minor version installs on that interpreter.
#[test]
fn versioned_pure_wheel() {
    let profile = PlatformProfile::new("cp", (3, 12), None, ["win_amd64"]).unwrap();
    let ranked = generate(&profile);
    for raw in ["py312-none-any", "py38-none-any", "py3-none-win_amd64"] {
        let tag: Tag = raw.parse().unwrap();
        assert!(ranked.rank_of(&tag).is_some(), "{raw}");
    }
    let tag: Tag = "py313-none-any".parse().unwrap();
    assert_eq!(ranked.rank_of(&tag), None);
}
