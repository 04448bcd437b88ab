use md2gdoc::{
    translate, translate_from_path, translate_from_reader, CheckboxSlicing, EditOperation,
    StyleSpec, TranslateOptions,
};
use pretty_assertions::assert_eq;
use std::io::BufReader;
use std::path::PathBuf;

fn fixture() -> PathBuf {
    PathBuf::from(r"tests/markdown/product_team_sync.md")
}

fn inserts(operations: &[EditOperation]) -> Vec<(usize, &str)> {
    operations
        .iter()
        .filter_map(|op| match op {
            EditOperation::InsertText { at, text } => Some((*at, text.as_str())),
            EditOperation::StyleRange { .. } => None,
        })
        .collect()
}

fn heading_style(size: u32) -> StyleSpec {
    StyleSpec {
        bold: true,
        font_size: Some(size),
    }
}

#[test]
fn should_translate_single_heading() {
    // When
    let translation = translate("# Title", TranslateOptions::default());

    // Then
    assert_eq!(
        translation.operations,
        vec![
            EditOperation::InsertText {
                at: 1,
                text: "Title".into()
            },
            EditOperation::StyleRange {
                start: 1,
                end: 6,
                style: heading_style(18)
            },
        ]
    );
    assert_eq!(translation.cursor.position(), 7);
}

#[test]
fn should_classify_each_heading_level_separately() {
    // When
    let translation = translate("# A\n## B\n### C", TranslateOptions::default());

    // Then
    let styles: Vec<_> = translation
        .operations
        .iter()
        .filter_map(|op| match op {
            EditOperation::StyleRange { start, style, .. } => Some((*start, style.font_size)),
            EditOperation::InsertText { .. } => None,
        })
        .collect();
    assert_eq!(styles, vec![(1, Some(18)), (3, Some(16)), (5, Some(14))]);
}

#[test]
fn should_skip_blank_line_between_headings() {
    // Given
    let without_blank = translate("# One\n## Two", TranslateOptions::default());
    let with_blank = translate("# One\n   \n## Two", TranslateOptions::default());

    // Then
    assert_eq!(with_blank, without_blank);
    assert_eq!(inserts(&with_blank.operations)[1], (5, "Two"));
}

#[test]
fn should_slice_checkbox_under_preserve_policy() {
    // Given
    let options = TranslateOptions {
        checkbox_slicing: CheckboxSlicing::Preserve,
    };

    // When
    let translation = translate("- [ ] @sarah: Finalize Q3 roadmap by Friday", options);

    // Then
    assert_eq!(
        inserts(&translation.operations),
        vec![(1, "\u{2610} @sarah: Finalize Q3 roadmap by Friday")]
    );
}

#[test]
fn should_slice_checkbox_under_exact_policy() {
    // Given
    let options = TranslateOptions {
        checkbox_slicing: CheckboxSlicing::Exact,
    };

    // When
    let translation = translate("- [ ] @sarah: Finalize Q3 roadmap by Friday", options);

    // Then
    assert_eq!(
        inserts(&translation.operations),
        vec![(1, "\u{2610} @sarah: Finalize Q3 roadmap by Friday")]
    );
}

#[test]
fn should_emit_one_insert_per_non_blank_line() {
    // Given
    let content = std::fs::read_to_string(fixture()).unwrap();
    let non_blank = content.lines().filter(|l| !l.trim().is_empty()).count();

    // When
    let translation = translate_from_path(&fixture(), TranslateOptions::default()).unwrap();

    // Then
    let insert_count = translation.operations.iter().filter(|op| op.is_insert()).count();
    let style_count = translation.operations.len() - insert_count;
    assert_eq!(insert_count, non_blank);
    assert_eq!(insert_count, 47);
    assert_eq!(style_count, 9);
}

#[test]
fn should_keep_insert_offsets_contiguous() {
    // When
    let translation = translate_from_path(&fixture(), TranslateOptions::default()).unwrap();

    // Then
    let inserts = inserts(&translation.operations);
    for pair in inserts.windows(2) {
        let (prev_at, prev_text) = pair[0];
        let (at, _) = pair[1];
        assert_eq!(at, prev_at + prev_text.encode_utf16().count() + 1);
    }
    assert_eq!(translation.cursor.position(), 1248);
}

#[test]
fn should_place_style_directly_after_its_insert() {
    // When
    let translation = translate_from_path(&fixture(), TranslateOptions::default()).unwrap();

    // Then
    for (idx, op) in translation.operations.iter().enumerate() {
        if let EditOperation::StyleRange { start, end, .. } = op {
            let EditOperation::InsertText { at, text } = &translation.operations[idx - 1] else {
                panic!("style range at {idx} does not follow an insert");
            };
            assert_eq!(start, at);
            assert_eq!(*end, at + text.encode_utf16().count());
        }
    }
}

#[test]
fn should_match_known_offsets_in_sample() {
    // When
    let translation = translate_from_path(&fixture(), TranslateOptions::default()).unwrap();

    // Then
    let inserts = inserts(&translation.operations);
    assert_eq!(inserts[0], (1, "Product Team Sync - May 15, 2023"));
    assert_eq!(inserts[1], (34, "Attendees"));
    assert_eq!(inserts[2], (44, "\u{2022} Sarah Chen (Product Lead)"));
    assert!(inserts.contains(&(759, "\u{2610} @sarah: Finalize Q3 roadmap by Friday")));
    assert!(inserts.contains(&(1227, "Duration: 45 minutes")));
}

#[test]
fn should_be_deterministic() {
    // Given
    let content = std::fs::read_to_string(fixture()).unwrap();

    // When
    let first = translate(&content, TranslateOptions::default());
    let second = translate(&content, TranslateOptions::default());

    // Then
    assert_eq!(first, second);
}

#[test]
fn should_agree_between_string_and_reader_input() {
    // Given
    let content = std::fs::read_to_string(fixture()).unwrap();

    // When
    let from_str = translate(&content, TranslateOptions::default());
    let from_path = translate_from_path(&fixture(), TranslateOptions::default()).unwrap();

    // Then
    assert_eq!(from_str, from_path);
}

#[test]
fn should_agree_between_string_and_reader_on_crlf_without_final_newline() {
    // Given
    let content = "# Title\r";

    // When
    let from_str = translate(content, TranslateOptions::default());
    let mut reader = BufReader::new(content.as_bytes());
    let from_reader = translate_from_reader(&mut reader, TranslateOptions::default()).unwrap();

    // Then
    assert_eq!(from_reader, from_str);
    assert_eq!(
        from_reader.operations[0],
        EditOperation::InsertText {
            at: 1,
            text: "Title".to_string(),
        }
    );
    assert_eq!(from_reader.cursor.position(), 7);
}

#[test]
fn should_render_batch_update_with_paragraph_breaks() {
    // When
    let translation = translate("## Notes\n- one", TranslateOptions::default());
    let body = serde_json::to_value(translation.batch_update()).unwrap();

    // Then
    let requests = body["requests"].as_array().unwrap();
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[0]["insertText"]["text"], "Notes\n");
    assert_eq!(requests[1]["updateTextStyle"]["textStyle"]["fontSize"]["magnitude"], 16);
    assert_eq!(requests[2]["insertText"]["location"]["index"], 7);
}
