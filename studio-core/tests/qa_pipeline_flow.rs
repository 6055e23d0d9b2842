//! QA tests for the chapter pipeline using the mock backend.
//!
//! These tests verify the full premise -> outline -> draft -> critique flow
//! without API calls: stage gating, card editing, staleness, and reset.

use studio_core::testing::{
    assert_stage, assert_summary_mentions, MockNovelist, TestHarness,
};
use studio_core::{Genre, SceneCard, SessionError, Stage, StudioConfig, Tone};

#[tokio::test]
async fn test_full_pipeline_reaches_critique() {
    let mut harness = TestHarness::new();

    harness
        .run_pipeline("Jinx hacks the corporate mainframe")
        .await
        .expect("Pipeline should succeed");

    assert_stage(&harness, Stage::Critique);
    assert!(harness.session.report().starts_with("# Editorial Report"));
    assert_summary_mentions(&harness, "Jinx hacks the corporate mainframe");
}

#[tokio::test]
async fn test_outline_produces_editable_scene_card() {
    let mut harness = TestHarness::new();

    harness
        .session
        .generate_outline("A courier carries a dangerous package")
        .await
        .expect("Outline should succeed");

    let card = SceneCard::parse(harness.session.scene_card()).expect("Card should parse");
    assert!(!card.title.is_empty());
    assert!(card.beats.len() >= 4);
    assert!(card.beats[0].contains("dangerous package"));
}

#[tokio::test]
async fn test_stage_gating_is_enforced_in_order() {
    let mut harness = TestHarness::new();

    // No card yet, drafting is refused
    let err = harness.session.write_draft().await.unwrap_err();
    assert!(matches!(err, SessionError::MissingInput { .. }));

    // No draft yet, critique is refused
    let err = harness.session.run_critique().await.unwrap_err();
    assert!(matches!(err, SessionError::MissingInput { .. }));

    assert_stage(&harness, Stage::Premise);
}

#[tokio::test]
async fn test_human_card_edit_flows_into_draft() {
    let mut harness = TestHarness::new();
    harness
        .session
        .generate_outline("A smuggler is cornered")
        .await
        .expect("Outline should succeed");

    // Rewrite a beat by hand, like the card editor would
    let card = SceneCard {
        title: "Cornered".to_string(),
        beats: vec![
            "1. The smuggler ducks into a noodle bar.".to_string(),
            "2. The pursuers pass her by.".to_string(),
        ],
    };
    harness.session.set_scene_card(card.to_text());

    harness.session.write_draft().await.expect("Draft should succeed");
    assert!(harness
        .session
        .draft()
        .contains("The smuggler ducks into a noodle bar"));
}

#[tokio::test]
async fn test_edited_card_marks_draft_stale() {
    let mut harness = TestHarness::new();
    harness
        .session
        .generate_outline("A double-cross at the docks")
        .await
        .expect("Outline should succeed");
    harness.session.write_draft().await.expect("Draft should succeed");

    assert!(!harness.session.draft_is_stale());

    let edited = harness.session.scene_card().replace("betrayal", "rescue");
    harness.session.set_scene_card(edited);
    assert!(harness.session.draft_is_stale());

    // Regenerating clears the flag
    harness.session.write_draft().await.expect("Redraft should succeed");
    assert!(!harness.session.draft_is_stale());
}

#[tokio::test]
async fn test_new_outline_overwrites_card_but_not_draft() {
    let mut harness = TestHarness::new();
    harness
        .session
        .generate_outline("First chapter premise")
        .await
        .expect("Outline should succeed");
    harness.session.write_draft().await.expect("Draft should succeed");
    let draft = harness.session.draft().to_string();

    harness
        .session
        .generate_outline("Second chapter premise")
        .await
        .expect("Second outline should succeed");

    // Old draft survives, but is now stale against the new card
    assert_eq!(harness.session.draft(), draft);
    assert!(harness.session.draft_is_stale());
}

#[tokio::test]
async fn test_reset_clears_all_slots_together() {
    let mut harness = TestHarness::new();
    harness
        .run_pipeline("A chapter to throw away")
        .await
        .expect("Pipeline should succeed");

    harness.session.reset();

    assert_stage(&harness, Stage::Premise);
    assert!(harness.session.premise().is_empty());
    assert!(harness.session.scene_card().is_empty());
    assert!(harness.session.draft().is_empty());
    assert!(harness.session.report().is_empty());
    assert_eq!(harness.session.bible().summary(), "Start of the story.");
}

#[tokio::test]
async fn test_bible_accumulates_across_chapters() {
    let mut harness = TestHarness::new();

    harness
        .run_pipeline("Chapter one: the heist")
        .await
        .expect("First chapter should succeed");
    harness
        .run_pipeline("Chapter two: the getaway")
        .await
        .expect("Second chapter should succeed");

    let summary = harness.session.bible().summary();
    assert!(summary.starts_with("Start of the story."));
    assert!(summary.contains("Chapter one: the heist"));
    assert!(summary.contains("Chapter two: the getaway"));
}

#[tokio::test]
async fn test_scripted_mock_drives_scenarios() {
    let mut mock = MockNovelist::instant();
    mock.queue_outline(
        SceneCard {
            title: "The Duel".to_string(),
            beats: vec!["1. Blades are drawn.".to_string()],
        }
        .to_text(),
    );
    mock.queue_draft("Steel rang against steel.".to_string());

    let mut harness = TestHarness::with_mock(mock);
    harness
        .session
        .generate_outline("Two rivals finally meet")
        .await
        .expect("Outline should succeed");
    harness.session.write_draft().await.expect("Draft should succeed");

    assert!(harness.session.scene_card().contains("The Duel"));
    assert_eq!(harness.session.draft(), "Steel rang against steel.");
}

#[tokio::test]
async fn test_config_shapes_mock_output() {
    let config = StudioConfig::new("Genre Test")
        .with_genre(Genre::HighFantasy)
        .with_tone(Tone::Dark)
        .with_style("lush, ornate prose");
    let mut harness = TestHarness::with_config(config);

    harness
        .run_pipeline("The queen's seer lies")
        .await
        .expect("Pipeline should succeed");

    assert!(harness.session.scene_card().contains("High Fantasy"));
    assert!(harness.session.draft().contains("lush, ornate prose"));
    assert!(harness.session.report().contains("High Fantasy conventions"));
}

#[tokio::test]
async fn test_streaming_draft_matches_final_draft() {
    let mut harness = TestHarness::new();
    harness
        .session
        .generate_outline("A chase across the rooftops")
        .await
        .expect("Outline should succeed");

    let mut streamed = String::new();
    harness
        .session
        .write_draft_stream(&mut |chunk: &str| streamed.push_str(chunk))
        .await
        .expect("Streamed draft should succeed");

    assert_eq!(streamed, harness.session.draft());
    assert!(!streamed.is_empty());
}
