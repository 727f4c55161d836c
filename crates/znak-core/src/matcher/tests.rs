use std::collections::BTreeSet;
use std::path::Path;

use super::*;
use crate::catalogue::{MemoryCatalogue, Translation};
use crate::geometry::{encode_run_length, Ellipse};
use crate::sign::{Placement, ReferenceSign, SignType};
use crate::taxonomy::HandshapeId;

fn shapes(ids: &[u8]) -> BTreeSet<HandshapeId> {
    ids.iter().map(|&i| HandshapeId::new(i).unwrap()).collect()
}

fn circle(cx: f64, cy: f64, r: f64) -> Ellipse {
    Ellipse::new(cx, cy, r, r, 0.0)
}

fn reference(
    video_id: &str,
    ids: &[u8],
    sign_type: SignType,
    placement: Option<Placement>,
) -> ReferenceSign {
    ReferenceSign {
        video_id: video_id.to_string(),
        active_shapes: shapes(ids),
        sign_type,
        passive_shape: None,
        placement,
    }
}

fn translation(word: &str, video_id: &str) -> Translation {
    Translation {
        word: word.to_string(),
        video_id: video_id.to_string(),
    }
}

fn query(ids: &[u8], sign_type: SignType, placement: Option<Ellipse>) -> UserSign {
    UserSign {
        active_shapes: shapes(ids),
        sign_type,
        passive_shape: None,
        placement,
    }
}

fn matcher_with(
    signs: Vec<ReferenceSign>,
    translations: Vec<Translation>,
    options: MatchOptions,
) -> SignMatcher {
    let catalogue = MemoryCatalogue::new(signs, translations, vec![]);
    SignMatcher::new(Arc::new(catalogue), VideoDirectory::empty(), options)
}

fn two_sign_matcher(options: MatchOptions) -> SignMatcher {
    matcher_with(
        vec![
            reference(
                "a",
                &[1, 2],
                SignType::SingleHand,
                Some(Placement::Ellipse(circle(100.0, 100.0, 20.0))),
            ),
            reference(
                "b",
                &[3, 4],
                SignType::BothSameShape,
                Some(Placement::Ellipse(circle(150.0, 150.0, 20.0))),
            ),
        ],
        vec![translation("dům", "a"), translation("škola", "b")],
        options,
    )
}

#[test]
fn identical_sign_ranks_first() {
    let matcher = two_sign_matcher(MatchOptions::default());
    let user = query(&[1, 2], SignType::SingleHand, Some(circle(100.0, 100.0, 20.0)));

    let results = matcher.search(&user);
    assert_eq!(results.len(), 2);

    assert_eq!(results[0].video_id, "a");
    assert_eq!(results[0].text, "dům");
    assert_eq!(results[0].distance.total(), 0.0);

    assert_eq!(results[1].video_id, "b");
    assert_eq!(results[1].text, "škola");
    // no shared group, other type, no overlap
    assert_eq!(results[1].distance.active, 1.0);
    assert_eq!(results[1].distance.sign_type, 1.0);
    assert_eq!(results[1].distance.placement, 1.0);
    assert!(results[1].distance.total() >= 2.0);
}

#[test]
fn sequential_and_parallel_agree() {
    let user = query(&[1, 2], SignType::SingleHand, Some(circle(110.0, 105.0, 25.0)));
    let parallel = two_sign_matcher(MatchOptions::default()).search(&user);
    let sequential = two_sign_matcher(MatchOptions {
        parallel: false,
        ..MatchOptions::default()
    })
    .search(&user);
    assert_eq!(parallel, sequential);
}

#[test]
fn unrelated_groups_score_one() {
    let matcher = matcher_with(
        vec![reference("c", &[12, 15], SignType::SingleHand, None)],
        vec![translation("kočka", "c")],
        MatchOptions::default(),
    );
    let results = matcher.search(&query(&[1, 2], SignType::SingleHand, None));
    assert_eq!(results[0].distance.active, 1.0);
    assert_eq!(results[0].distance.total(), 2.0);
}

#[test]
fn missing_placement_scores_worst_case() {
    let matcher = two_sign_matcher(MatchOptions::default());
    // neither side has a placement for the query below
    let results = matcher.search(&query(&[1, 2], SignType::SingleHand, None));
    assert!(results.iter().all(|r| r.distance.placement == 1.0));

    let matcher = matcher_with(
        vec![reference("a", &[1, 2], SignType::SingleHand, None)],
        vec![translation("dům", "a")],
        MatchOptions::default(),
    );
    let user = query(&[1, 2], SignType::SingleHand, Some(circle(100.0, 100.0, 20.0)));
    assert_eq!(matcher.search(&user)[0].distance.placement, 1.0);
}

#[test]
fn run_length_placement_matches_its_ellipse() {
    let ellipse = circle(60.0, 70.0, 15.0);
    let encoded = encode_run_length(&rasterize(&ellipse, 240, 250)).unwrap();
    let matcher = matcher_with(
        vec![reference(
            "a",
            &[5],
            SignType::SingleHand,
            Some(Placement::RunLength(encoded)),
        )],
        vec![translation("ahoj", "a")],
        MatchOptions::default(),
    );
    let results = matcher.search(&query(&[5], SignType::SingleHand, Some(ellipse)));
    assert_eq!(results[0].distance.placement, 0.0);
}

#[test]
fn malformed_encoding_only_affects_its_sign() {
    let ellipse = circle(100.0, 100.0, 20.0);
    let matcher = matcher_with(
        vec![
            reference(
                "broken",
                &[1],
                SignType::SingleHand,
                Some(Placement::RunLength("0,1,2".to_string())),
            ),
            reference(
                "ok",
                &[1],
                SignType::SingleHand,
                Some(Placement::Ellipse(ellipse)),
            ),
        ],
        vec![translation("x", "broken"), translation("y", "ok")],
        MatchOptions::default(),
    );
    assert_eq!(matcher.len(), 2);

    let results = matcher.search(&query(&[1], SignType::SingleHand, Some(ellipse)));
    assert_eq!(results[0].video_id, "ok");
    assert_eq!(results[0].distance.total(), 0.0);
    assert_eq!(results[1].video_id, "broken");
    assert_eq!(results[1].distance.placement, 1.0);
}

#[test]
fn equal_totals_keep_catalogue_order() {
    let signs = ["c", "a", "d", "b"]
        .iter()
        .map(|id| reference(id, &[7], SignType::PassiveHand, None))
        .collect();
    let matcher = matcher_with(signs, vec![], MatchOptions::default());
    let results = matcher.search(&query(&[7], SignType::PassiveHand, None));
    let order: Vec<&str> = results.iter().map(|r| r.video_id.as_str()).collect();
    assert_eq!(order, vec!["c", "a", "d", "b"]);
}

#[test]
fn repeated_video_keeps_best_rank() {
    let matcher = matcher_with(
        vec![
            reference("skola", &[20], SignType::BothSameShape, None),
            reference("dum", &[1, 2], SignType::SingleHand, None),
            reference("dum", &[1, 2], SignType::BothSameShape, None),
        ],
        vec![translation("dům", "dum"), translation("škola", "skola")],
        MatchOptions::default(),
    );
    let results = matcher.search(&query(&[1, 2], SignType::SingleHand, None));
    let order: Vec<&str> = results.iter().map(|r| r.video_id.as_str()).collect();
    assert_eq!(order, vec!["dum", "skola"]);
    assert_eq!(results[0].distance.sign_type, 0.0);
}

#[test]
fn repeated_video_ranks_at_its_later_better_row() {
    let matcher = matcher_with(
        vec![
            reference("dum", &[20], SignType::BothSameShape, None),
            reference("skola", &[1, 2], SignType::BothSameShape, None),
            reference("dum", &[1, 2], SignType::SingleHand, None),
        ],
        vec![translation("dům", "dum"), translation("škola", "skola")],
        MatchOptions::default(),
    );
    let results = matcher.search(&query(&[1, 2], SignType::SingleHand, None));
    let order: Vec<&str> = results.iter().map(|r| r.video_id.as_str()).collect();
    assert_eq!(order, vec!["dum", "skola"]);
    // scored from the third row, ahead of skola
    assert_eq!(results[0].distance.total(), 1.0);
    assert_eq!(results[0].distance.active, 0.0);
    assert_eq!(results[1].distance.total(), 2.0);
}

#[test]
fn truncation_happens_before_dedup() {
    let options = MatchOptions {
        signs_max: 2,
        ..MatchOptions::default()
    };
    let matcher = matcher_with(
        vec![
            reference("dum", &[1, 2], SignType::SingleHand, None),
            reference("dum", &[1, 3], SignType::SingleHand, None),
            reference("kocka", &[1, 4], SignType::BothSameShape, None),
        ],
        vec![translation("dům", "dum"), translation("kočka", "kocka")],
        options,
    );
    let results = matcher.search(&query(&[1, 2], SignType::SingleHand, None));
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].video_id, "dum");
}

#[test]
fn results_are_capped() {
    let signs = (0..30)
        .map(|i| reference(&format!("v{i}"), &[1], SignType::SingleHand, None))
        .collect();
    let options = MatchOptions {
        signs_max: 10,
        ..MatchOptions::default()
    };
    let matcher = matcher_with(signs, vec![], options);
    assert_eq!(matcher.search(&UserSign::default()).len(), 10);
}

#[test]
fn missing_translation_gives_empty_text() {
    let matcher = matcher_with(
        vec![reference("orphan", &[1], SignType::SingleHand, None)],
        vec![],
        MatchOptions::default(),
    );
    let results = matcher.search(&query(&[1], SignType::SingleHand, None));
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].text, "");
}

#[test]
fn display_text_is_joined_and_trimmed() {
    let options = MatchOptions {
        display_max_len: 12,
        ..MatchOptions::default()
    };
    let matcher = matcher_with(
        vec![reference("dum", &[1], SignType::SingleHand, None)],
        vec![
            translation("dům", "dum"),
            translation("domov", "dum"),
            translation("domácnost", "dum"),
        ],
        options,
    );
    let results = matcher.search(&query(&[1], SignType::SingleHand, None));
    assert_eq!(results[0].text, "dům, domov");
}

#[test]
fn resolves_video_files() {
    let catalogue = MemoryCatalogue::new(
        vec![
            reference("box", &[1], SignType::SingleHand, None),
            reference("aljaska", &[1], SignType::SingleHand, None),
        ],
        vec![translation("krabice", "box")],
        vec![],
    );
    let videos = VideoDirectory::from_files(
        Path::new("vfdirectory"),
        vec!["box.mp4".to_string(), "aljaska_1.mkv".to_string()],
    );
    let matcher = SignMatcher::new(Arc::new(catalogue), videos, MatchOptions::default());
    let results = matcher.search(&query(&[1], SignType::SingleHand, None));
    assert_eq!(results[0].video, Some(PathBuf::from("vfdirectory/box.mp4")));
    assert_eq!(results[1].video, None);
}

#[test]
fn empty_query_still_ranks() {
    let matcher = two_sign_matcher(MatchOptions::default());
    let results = matcher.search(&UserSign::default());
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].video_id, "a");
    assert_eq!(results[0].distance.total(), 2.0);
    assert_eq!(results[1].distance.total(), 3.0);
}

#[test]
fn empty_catalogue_gives_no_results() {
    let matcher = matcher_with(vec![], vec![], MatchOptions::default());
    assert!(matcher.is_empty());
    assert!(matcher
        .search(&query(&[1], SignType::SingleHand, Some(circle(10.0, 10.0, 5.0))))
        .is_empty());
}

struct FailingCatalogue;

impl Catalogue for FailingCatalogue {
    fn load_all_signs(&self) -> Result<Vec<ReferenceSign>, CatalogueError> {
        Err(CatalogueError::Parse("database is gone".to_string()))
    }

    fn load_translation_words(&self, _video_id: &str) -> Result<Vec<String>, CatalogueError> {
        Err(CatalogueError::Parse("database is gone".to_string()))
    }

    fn load_all_translations(&self) -> Result<Vec<Translation>, CatalogueError> {
        Err(CatalogueError::Parse("database is gone".to_string()))
    }

    fn load_all_words(&self) -> Result<Vec<String>, CatalogueError> {
        Err(CatalogueError::Parse("database is gone".to_string()))
    }

    fn find_translations(&self, _word: &str) -> Result<Vec<Translation>, CatalogueError> {
        Err(CatalogueError::Parse("database is gone".to_string()))
    }
}

#[test]
fn load_failure_gives_empty_matcher() {
    let catalogue: Arc<dyn Catalogue> = Arc::new(FailingCatalogue);
    assert!(SignMatcher::try_new(
        Arc::clone(&catalogue),
        VideoDirectory::empty(),
        MatchOptions::default()
    )
    .is_err());

    let matcher = SignMatcher::new(catalogue, VideoDirectory::empty(), MatchOptions::default());
    assert!(matcher.is_empty());
    assert!(matcher.search(&UserSign::default()).is_empty());
}

#[test]
fn options_from_default_settings() {
    let settings = crate::settings::parse_settings_toml(crate::settings::default_toml()).unwrap();
    assert_eq!(MatchOptions::from_settings(&settings), MatchOptions::default());
}
