use super::*;

const SAMPLE: &str = r#"{
    "title": "Morning routines",
    "description": "three habits",
    "scenes": [
        {"scene_number": 1, "dialogue": "Wake up early.", "image_prompt": "sunrise", "duration": 3, "subtitle": "Wake up"},
        {"scene_number": "2", "dialogue": "Drink water.", "dialogue_for_tts": "drink wa-ter", "image_prompt": "glass", "duration": "2.5", "subtitle": "Hydrate"}
    ],
    "total_duration": 99
}"#;

#[test]
fn parses_numbers_given_as_strings() {
    let script = Script::parse_json(SAMPLE).unwrap();
    assert_eq!(script.scenes.len(), 2);
    assert_eq!(script.scenes[1].scene_number, 2);
    assert_eq!(script.scenes[1].duration, 2.5);
    assert_eq!(script.scenes[1].dialogue_for_tts.as_deref(), Some("drink wa-ter"));
    assert_eq!(script.scenes[0].dialogue_for_tts, None);
}

#[test]
fn normalize_recomputes_total_duration() {
    let script = Script::load_validated(SAMPLE).unwrap();
    assert_eq!(script.total_duration, 5.5);
}

#[test]
fn subtitle_source_selects_field() {
    let script = Script::parse_json(SAMPLE).unwrap();
    let scene = &script.scenes[0];
    assert_eq!(scene.subtitle_text(SubtitleSource::Headline), "Wake up");
    assert_eq!(scene.subtitle_text(SubtitleSource::Dialogue), "Wake up early.");
}

#[test]
fn missing_subtitle_field_is_a_parse_error() {
    let json = r#"{"title":"t","scenes":[{"scene_number":1,"dialogue":"d","image_prompt":"p","duration":1}]}"#;
    let err = Script::parse_json(json).unwrap_err();
    assert!(matches!(err, ReelError::Serde(_)));
    assert!(err.to_string().contains("subtitle"));
}

fn scene(n: u32) -> Scene {
    Scene {
        scene_number: n,
        dialogue: "d".into(),
        dialogue_for_tts: None,
        image_prompt: "p".into(),
        duration: 1.0,
        subtitle: String::new(),
    }
}

fn script(scenes: Vec<Scene>) -> Script {
    Script {
        title: "t".into(),
        description: String::new(),
        scenes,
        total_duration: 0.0,
    }
}

#[test]
fn validation_rules() {
    assert!(script(vec![scene(1), scene(3)]).validate().is_ok());
    assert!(script(vec![]).validate().is_err());

    let dup = script(vec![scene(1), scene(1)]).validate().unwrap_err();
    assert!(dup.to_string().contains("scene 2"));

    let mut empty_dialogue = scene(1);
    empty_dialogue.dialogue.clear();
    assert!(script(vec![empty_dialogue]).validate().is_err());

    let mut empty_prompt = scene(1);
    empty_prompt.image_prompt.clear();
    assert!(script(vec![empty_prompt]).validate().is_err());

    let mut bad_duration = scene(1);
    bad_duration.duration = 0.0;
    assert!(script(vec![bad_duration]).validate().is_err());

    assert!(script(vec![scene(0)]).validate().is_err());
}

#[test]
fn empty_subtitle_is_allowed() {
    let s = script(vec![scene(1)]);
    assert!(s.scenes[0].subtitle.is_empty());
    assert!(s.validate().is_ok());
}
