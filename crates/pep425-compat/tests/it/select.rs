use pep425_compat::{
    CompatibilityMatcher, IncompatibleTag, MatchResult, PriorityGroup, RankedTagList,
    SupportedTagGenerator,
};
use pep425_platform::PlatformProfile;
use pep425_tags::{TagSet, TagSetError, wheel_tag};

fn ranked() -> RankedTagList {
    let profile = PlatformProfile::new(
        "cp",
        (3, 9),
        Some("cp39"),
        ["manylinux_2_17_x86_64", "manylinux1_x86_64", "linux_x86_64"],
    )
    .unwrap();
    SupportedTagGenerator::default().generate(&profile).unwrap()
}

#[test]
fn compressed_stable_abi() {
    let ranked = ranked();
    let matcher = CompatibilityMatcher::new(&ranked);
    let tags = TagSet::parse("cp36.cp37.cp38-abi3-manylinux1_x86_64.manylinux2010_x86_64").unwrap();
    let result = matcher.matches(&tags);
    assert_eq!(result.rank(), Some(7));
    assert_eq!(
        result.tag().map(ToString::to_string).as_deref(),
        Some("cp38-abi3-manylinux1_x86_64")
    );
    assert_eq!(ranked.group_of(7), Some(PriorityGroup::StableAbi));
}

#[test]
fn universal_only() {
    let ranked = ranked();
    let result = ranked.matcher().matches(&TagSet::parse("py2.py3-none-any").unwrap());
    let rank = result.rank().unwrap();
    assert_eq!(rank, ranked.len() - 1);
    assert_eq!(ranked.group_of(rank), Some(PriorityGroup::Universal));
}

#[test]
fn malformed() {
    let err = TagSet::parse("cp38-manylinux1_x86_64").unwrap_err();
    assert!(matches!(err, TagSetError::Malformed(_)));
    insta::assert_snapshot!(
        err,
        @"Malformed tag string `cp38-manylinux1_x86_64`: expected three dash-separated fields, found 2"
    );
}

#[test]
fn no_candidate_is_not_an_error() {
    let ranked = ranked();
    let windows = TagSet::parse("cp39-cp39-win_amd64").unwrap();
    assert_eq!(
        ranked.matcher().matches(&windows),
        MatchResult::Incompatible(IncompatibleTag::Platform)
    );
    assert_eq!(ranked.matcher().select_best([("win", windows)]), None);
}

/// Select a wheel from the files of a release, as an installer would.
#[test]
fn select_wheel() {
    let ranked = ranked();
    let files = [
        "numpy-1.26.0-pp39-pypy39_pp73-manylinux_2_17_x86_64.manylinux2014_x86_64.whl",
        "numpy-1.26.0-cp39-cp39-win_amd64.whl",
        "numpy-1.26.0-cp39-abi3-manylinux1_x86_64.whl",
        "numpy-1.26.0-cp39-cp39-manylinux_2_17_x86_64.manylinux2014_x86_64.whl",
        "numpy-1.26.0-py3-none-any.whl",
    ];
    let candidates: Vec<(&str, TagSet)> = files
        .iter()
        .map(|file| (*file, wheel_tag(file).unwrap()))
        .collect();

    let best = ranked
        .matcher()
        .select_best(candidates.iter().map(|(file, tags)| (*file, tags)))
        .unwrap();
    assert_eq!(
        best.identity,
        "numpy-1.26.0-cp39-cp39-manylinux_2_17_x86_64.manylinux2014_x86_64.whl"
    );
    assert_eq!(best.rank, 0);

    let results: Vec<MatchResult> = ranked.matcher().match_all(
        &candidates
            .into_iter()
            .map(|(_, tags)| tags)
            .collect::<Vec<_>>(),
    );
    let ranks: Vec<Option<usize>> = results.iter().map(MatchResult::rank).collect();
    assert_eq!(ranks, [None, None, Some(4), Some(0), Some(101)]);
}

/// Identical ranks resolve to the candidate the caller listed first.
#[test]
fn tie_break_by_input_order() {
    let ranked = ranked();
    let candidates = [
        ("2.0", TagSet::parse("py3-none-any").unwrap()),
        ("1.9", TagSet::parse("py2.py3-none-any").unwrap()),
    ];
    let best = ranked.matcher().select_best(candidates).unwrap();
    assert_eq!(best.identity, "2.0");
}
