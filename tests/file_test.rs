//! Integration tests for rendering marker trees stored on disk.

use std::fs;

use tempfile::tempdir;
use usx::{
    load_file, render_batch, render_file, Document, Error, Marker, MarkerKind, RenderStats,
    SchemaVersion, UsxConfig,
};

const RUTH_JSON: &str = r#"{
    "contents": [
        {"marker": "id", "text_identifier": "RUT Ruth"},
        {"marker": "ide", "encoding": "UTF-8"},
        {"marker": "c", "number": 1, "contents": [
            {"marker": "p", "contents": [
                {"marker": "v", "verse_number": "1", "contents": [
                    {"marker": "text", "text": "In the days when the judges judged,"}
                ]},
                {"marker": "v", "verse_number": "2", "contents": [
                    {"marker": "text", "text": "The name of the man was Elimelech,"},
                    {"marker": "w", "term": "Elimelech", "attributes": {"strong": "H458"}},
                    {"marker": "w*"}
                ]}
            ]}
        ]},
        {"marker": "rem", "comment": "proofread"}
    ]
}"#;

#[test]
fn test_load_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ruth.json");
    fs::write(&path, RUTH_JSON).unwrap();

    let doc = load_file(&path).unwrap();
    assert_eq!(doc.book_identifier(), Some("RUT Ruth"));
    assert_eq!(doc.encoding(), Some("UTF-8"));
    assert_eq!(
        doc.count_markers(|kind| matches!(kind, MarkerKind::V { .. })),
        2
    );
}

#[test]
fn test_render_file_usx30() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ruth.json");
    fs::write(&path, RUTH_JSON).unwrap();

    let result = render_file(&path, &UsxConfig::default()).unwrap();
    let out = &result.content;

    assert!(out.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<usx version=\"3.0\">\n"));
    assert!(out.contains("<book style=\"id\" code=\"RUT\">Ruth</book>\n"));
    assert!(out.contains("<verse eid=\"RUT 1:1\" /><verse style=\"v\" number=\"2\" sid=\"RUT 1:2\" />"));
    assert!(out.contains("<char style=\"w\" strong=\"H458\">Elimelech</char>"));
    assert!(out.contains("</para>\n<verse eid=\"RUT 1:2\" /><chapter eid=\"RUT 1\" />\n</usx>\n"));
    assert_eq!(result.unrenderable_tags, vec!["rem"]);
}

#[test]
fn test_render_file_usx25() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ruth.json");
    fs::write(&path, RUTH_JSON).unwrap();

    let config = UsxConfig::new().with_schema_version(SchemaVersion::V2_5);
    let out = render_file(&path, &config).unwrap().content;

    assert!(out.contains("<usx version=\"2.5\">"));
    assert!(out.contains("<char style=\"w\">Elimelech</char>"));
    assert!(!out.contains("strong="));
    assert!(!out.contains("eid="));
}

#[test]
fn test_render_file_invalid_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{\"contents\": [").unwrap();

    let result = render_file(&path, &UsxConfig::default());
    assert!(matches!(result, Err(Error::Json(_))));
}

#[test]
fn test_render_file_unknown_marker() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("unknown.json");
    fs::write(
        &path,
        r#"{"contents":[{"marker":"unknown","identifier":"zpa","contents":[
            {"marker":"text","text":"private use"}
        ]}]}"#,
    )
    .unwrap();

    let result = render_file(&path, &UsxConfig::new().with_partial_output(true)).unwrap();
    assert_eq!(result.content, "");
    assert_eq!(result.unrenderable_tags, vec!["zpa"]);
}

#[test]
fn test_document_json_roundtrip_through_file() {
    let doc = Document::with_contents(vec![
        Marker::new(MarkerKind::Id {
            text_identifier: "JON Jonah".into(),
        }),
        Marker::new(MarkerKind::C { number: 1 }).child(
            Marker::new(MarkerKind::Q { depth: 2 }).child(Marker::text("I called to Yahweh")),
        ),
    ]);

    let dir = tempdir().unwrap();
    let path = dir.path().join("jonah.json");
    fs::write(&path, doc.to_json().unwrap()).unwrap();

    let loaded = load_file(&path).unwrap();
    assert_eq!(loaded, doc);
}

#[test]
fn test_batch_from_files() {
    let dir = tempdir().unwrap();
    let mut docs = Vec::new();
    for (name, id) in [("a.json", "OBA Obadiah"), ("b.json", "HAG Haggai")] {
        let path = dir.path().join(name);
        let json = format!(
            r#"{{"contents":[{{"marker":"id","text_identifier":"{}"}}]}}"#,
            id
        );
        fs::write(&path, json).unwrap();
        docs.push(load_file(&path).unwrap());
    }

    let results = render_batch(&docs, &UsxConfig::new().with_partial_output(true));
    let outputs: Vec<String> = results.into_iter().map(|r| r.unwrap().content).collect();
    assert_eq!(
        outputs,
        vec![
            "<book style=\"id\" code=\"OBA\">Obadiah</book>\n",
            "<book style=\"id\" code=\"HAG\">Haggai</book>\n",
        ]
    );
}

#[test]
fn test_render_file_with_unmodeled_tags() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("psalms.json");
    fs::write(
        &path,
        r#"{"contents":[
            {"marker":"id","text_identifier":"PSA Psalms"},
            {"marker":"c","number":1,"contents":[
                {"marker":"pm","contents":[{"marker":"text","text":"embedded"}]},
                {"marker":"q","depth":1,"contents":[
                    {"marker":"v","verse_number":"1","contents":[
                        {"marker":"text","text":"Blessed is the man"}
                    ]}
                ]},
                {"marker":"lit","contents":[{"marker":"text","text":"Amen"}]}
            ]}
        ]}"#,
    )
    .unwrap();

    let result = render_file(&path, &UsxConfig::default()).unwrap();
    assert_eq!(result.unrenderable_tags, vec!["pm", "lit"]);
    assert!(result.content.contains("Blessed is the man"));
    assert!(!result.content.contains("embedded"));
    assert!(!result.content.contains("Amen"));
    assert!(result.content.ends_with("</usx>\n"));
}

#[test]
fn test_batch_stats_merge_into_total() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ruth.json");
    fs::write(&path, RUTH_JSON).unwrap();
    let doc = load_file(&path).unwrap();

    let config = UsxConfig::new().with_stats(true);
    let results = render_batch(&[doc.clone(), doc], &config);

    let mut total = RenderStats::new();
    let mut bytes = 0;
    for result in &results {
        let result = result.as_ref().unwrap();
        total.merge(result.stats.as_ref().unwrap());
        bytes += result.content_len();
    }

    assert_eq!(total.book_count, 2);
    assert_eq!(total.verse_count, 4);
    assert_eq!(total.unrenderable_count, 2);
    assert_eq!(bytes, 2 * results[0].as_ref().unwrap().content.len());
}
