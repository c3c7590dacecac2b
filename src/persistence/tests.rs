use super::{ConfigNode, PersistenceFormatError};

#[test]
fn test_text_round_trip() {
    let mut root = ConfigNode::default();
    root.add_value("version", 2_u32);
    let bodies = root.add_node("BodyData");
    let body = bodies.add_node("GlobalBodyData");
    body.add_value("inner_visible", true);
    body.add_value("index", 3_i32);
    bodies.add_node("GlobalBodyData").add_value("index", 7_i32);

    let text = root.to_text();
    let parsed = ConfigNode::parse(&text).unwrap();
    assert_eq!(parsed, root);
    assert_eq!(parsed.node("BodyData").unwrap().nodes_named("GlobalBodyData").count(), 2);
}

#[test]
fn test_parse_accepts_inline_braces_and_comments() {
    let text = "\
// saved by hand
SETTINGS {
    min_sun_observation_angle = 0.35 // radians
    sun_observation_equipment = sunObservation
}
";
    let root = ConfigNode::parse(text).unwrap();
    let settings = root.node("SETTINGS").unwrap();
    assert_eq!(settings.read_value::<f64>("min_sun_observation_angle").unwrap(), Some(0.35));
    assert_eq!(settings.value("sun_observation_equipment"), Some("sunObservation"));
}

#[test]
fn test_bool_values_are_case_insensitive() {
    let root = ConfigNode::parse("a = True\nb = false\nc = maybe\n").unwrap();
    assert_eq!(root.read_value::<bool>("a").unwrap(), Some(true));
    assert_eq!(root.read_value::<bool>("b").unwrap(), Some(false));
    assert_eq!(
        root.read_value::<bool>("c"),
        Err(PersistenceFormatError::MalformedValue("c".to_string()))
    );
    assert!(!root.value_or("c", false));
    assert_eq!(root.read_value::<bool>("missing").unwrap(), None);
}

#[test]
fn test_structural_errors_report_line() {
    assert_eq!(
        ConfigNode::parse("A\n{\nx = 1\n"),
        Err(PersistenceFormatError::UnbalancedBrace(3))
    );
    assert_eq!(ConfigNode::parse("x = 1\n}\n"), Err(PersistenceFormatError::UnbalancedBrace(2)));
    assert_eq!(ConfigNode::parse("{\n}\n"), Err(PersistenceFormatError::MissingNodeName(1)));
    assert_eq!(ConfigNode::parse("A\nx = 1\n"), Err(PersistenceFormatError::UnexpectedLine(1)));
    assert_eq!(ConfigNode::parse("###\n"), Err(PersistenceFormatError::UnexpectedLine(1)));
}

#[test]
fn test_values_may_contain_slashes() {
    let mut root = ConfigNode::default();
    root.add_value("equipment", "probe//sun".to_string());
    root.add_value("source", "https://example.org/ephemeris".to_string());
    let parsed = ConfigNode::parse(&root.to_text()).unwrap();
    assert_eq!(parsed.value("equipment"), Some("probe//sun"));
    assert_eq!(parsed.value("source"), Some("https://example.org/ephemeris"));

    let commented = ConfigNode::parse("a = x//y // trailing note\n\t// whole line\n").unwrap();
    assert_eq!(commented.value("a"), Some("x//y"));
    assert_eq!(commented.values().count(), 1);
}

#[test]
fn test_error_display_carries_detail() {
    assert_eq!(PersistenceFormatError::UnbalancedBrace(4).to_string(), "unbalanced brace on line 4");
    assert_eq!(
        PersistenceFormatError::MalformedValue("index".to_string()).to_string(),
        "malformed value for key index"
    );
}
