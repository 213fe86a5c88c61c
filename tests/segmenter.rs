use scrollstage::{
    Breakpoint, Node, Page, Prop, Role, SegmenterConfig, Viewport, segment,
};

fn page_with_text(text: &str) -> Page {
    let mut page = Page::new(Viewport::new(1440.0, 900.0).unwrap());
    page.insert(
        Node::new("title")
            .with_role(Role::SplitText)
            .with_text(text),
    );
    page
}

#[test]
fn manual_break_produces_two_lines() {
    let mut page = page_with_text("Fature Alto<br>Todos os Dias");
    let seg = segment(
        &mut page,
        &"title".into(),
        Breakpoint::Desktop,
        &SegmenterConfig::default(),
    )
    .unwrap();

    assert_eq!(seg.lines.len(), 2);
    assert_eq!(seg.lines[0].words.len(), 2);
    assert_eq!(seg.lines[1].words.len(), 3);
    assert_eq!(seg.original_text(), "Fature Alto\nTodos os Dias");
}

#[test]
fn layout_wrap_is_not_a_line_boundary() {
    // The renderer wrapped this between "Faturamento" and "Alto"; the
    // wrap must not survive as a hard break.
    let mut page = page_with_text("Faturamento \nAlto");
    let seg = segment(
        &mut page,
        &"title".into(),
        Breakpoint::Desktop,
        &SegmenterConfig::default(),
    )
    .unwrap();

    assert_eq!(seg.lines.len(), 1);
    let words: Vec<&str> = seg.lines[0].words.iter().map(|w| w.text.as_str()).collect();
    assert_eq!(words, vec!["Faturamento", "Alto"]);
}

#[test]
fn mid_word_layout_wrap_does_not_split_the_word() {
    // The renderer wrapped inside "Fature"; the halves must rejoin.
    let mut page = page_with_text("Fatur\ne Alto");
    let seg = segment(
        &mut page,
        &"title".into(),
        Breakpoint::Desktop,
        &SegmenterConfig::default(),
    )
    .unwrap();

    assert_eq!(seg.lines.len(), 1);
    let words: Vec<&str> = seg.lines[0].words.iter().map(|w| w.text.as_str()).collect();
    assert_eq!(words, vec!["Fature", "Alto"]);
}

#[test]
fn heading_rule_breaks_after_the_first_word_on_mobile() {
    let cfg = SegmenterConfig {
        force_first_word_break: true,
        ..SegmenterConfig::default()
    };

    let mut page = page_with_text("Fature Muito Alto");
    let seg = segment(&mut page, &"title".into(), Breakpoint::Mobile, &cfg).unwrap();
    assert_eq!(seg.original_text(), "Fature\nMuito Alto");

    // Two words: one per line.
    let mut page = page_with_text("Fature Alto");
    let seg = segment(&mut page, &"title".into(), Breakpoint::Mobile, &cfg).unwrap();
    assert_eq!(seg.original_text(), "Fature\nAlto");

    // A manual break wins over the forced one.
    let mut page = page_with_text("Fature<br>Muito Alto");
    let seg = segment(&mut page, &"title".into(), Breakpoint::Mobile, &cfg).unwrap();
    assert_eq!(seg.original_text(), "Fature\nMuito Alto");
}

#[test]
fn heading_rule_is_inert_on_desktop() {
    let cfg = SegmenterConfig {
        force_first_word_break: true,
        ..SegmenterConfig::default()
    };
    let mut page = page_with_text("Fature Muito Alto");
    let seg = segment(&mut page, &"title".into(), Breakpoint::Desktop, &cfg).unwrap();
    assert_eq!(seg.lines.len(), 1);
}

#[test]
fn accent_words_are_tagged_case_insensitively() {
    let cfg = SegmenterConfig {
        accent_words: vec!["alto".to_owned()],
        ..SegmenterConfig::default()
    };
    let mut page = page_with_text("Fature ALTO agora");
    let seg = segment(&mut page, &"title".into(), Breakpoint::Desktop, &cfg).unwrap();

    let flags: Vec<bool> = seg.lines[0].words.iter().map(|w| w.accent).collect();
    assert_eq!(flags, vec![false, true, false]);
}

#[test]
fn characters_materialize_hidden_and_in_reveal_order() {
    let mut page = page_with_text("Na Hora");
    let seg = segment(
        &mut page,
        &"title".into(),
        Breakpoint::Desktop,
        &SegmenterConfig::default(),
    )
    .unwrap();

    let ids = seg.char_ids();
    assert_eq!(ids.len(), 6);
    assert_eq!(ids[0].as_str(), "title::l0w0c0");
    assert_eq!(ids[2].as_str(), "title::l0w1c0");
    for id in &ids {
        assert_eq!(page.prop(id, Prop::YPercent), Some(100.0));
    }
}

#[test]
fn grapheme_clusters_stay_whole() {
    let mut page = page_with_text("Consistência");
    let seg = segment(
        &mut page,
        &"title".into(),
        Breakpoint::Desktop,
        &SegmenterConfig::default(),
    )
    .unwrap();

    let glyphs: Vec<&str> = seg.lines[0].words[0]
        .chars
        .iter()
        .map(|c| c.glyph.as_str())
        .collect();
    assert_eq!(glyphs.len(), 12);
    assert!(glyphs.contains(&"ê"));
}

#[test]
fn second_pass_is_a_guarded_noop() {
    let mut page = page_with_text("Fature Alto");
    let cfg = SegmenterConfig::default();
    assert!(segment(&mut page, &"title".into(), Breakpoint::Desktop, &cfg).is_some());
    let count = page.nodes().count();

    assert!(segment(&mut page, &"title".into(), Breakpoint::Desktop, &cfg).is_none());
    assert_eq!(page.nodes().count(), count);
}

#[test]
fn missing_source_is_skipped() {
    let mut page = Page::new(Viewport::new(1440.0, 900.0).unwrap());
    assert!(
        segment(
            &mut page,
            &"ghost".into(),
            Breakpoint::Desktop,
            &SegmenterConfig::default()
        )
        .is_none()
    );
}
