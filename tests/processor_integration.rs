//! Integration tests for locating and replacing constructs through the
//! language registry.

use std::path::PathBuf;

use partscope::{Error, PartArgs, PartType, Registry};

fn testdata_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

fn config_source() -> String {
    std::fs::read_to_string(testdata_path().join("project/config/config.go"))
        .expect("should read config.go fixture")
}

fn args(part_type: PartType, name: &str) -> PartArgs {
    PartArgs::new("go", config_source(), part_type, name).with_file_path("config/config.go")
}

#[test]
fn test_registry_lookup_is_case_insensitive() {
    let registry = Registry::with_defaults();
    assert_eq!(registry.lookup("GO").unwrap().language(), "go");
    assert_eq!(registry.list_languages(), vec!["go"]);
}

#[test]
fn test_unknown_language_lists_supported() {
    let registry = Registry::with_defaults();
    let err = registry.lookup("cobol").err().unwrap();
    match err {
        Error::UnsupportedLanguage { supported, .. } => assert_eq!(supported, vec!["go"]),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_empty_registry_is_not_initialized() {
    let registry = Registry::new();
    assert!(matches!(
        registry.lookup("go"),
        Err(Error::NotInitialized(_))
    ));
}

#[test]
fn test_round_trip_every_construct() {
    let registry = Registry::with_defaults();
    let go = registry.lookup("go").unwrap();
    let source = config_source();

    let targets = [
        (PartType::Package, "config"),
        (PartType::Const, "Version"),
        (PartType::Var, "Verbose"),
        (PartType::Type, "Options"),
        (PartType::Func, "*Options.Validate"),
        (PartType::Func, "Options.Reset"),
        (PartType::Const, "MinSize"),
        (PartType::Const, "Minor"),
    ];
    for (part_type, name) in targets {
        let info = go.find_part(&args(part_type, name)).unwrap();
        assert!(info.found, "{part_type} {name} should be found");
        assert_eq!(&source[info.start_offset..info.end_offset], info.content);

        let replaced = go
            .replace_part(&args(part_type, name).with_new_content(info.content.clone()))
            .unwrap();
        assert_eq!(replaced, source, "{part_type} {name} round trip");
    }
}

#[test]
fn test_receiver_kinds_are_distinct() {
    let registry = Registry::with_defaults();
    let go = registry.lookup("go").unwrap();

    let pointer = go.find_part(&args(PartType::Func, "*Options.Validate")).unwrap();
    assert!(pointer.found);
    assert_eq!(pointer.start_line, 18);

    let value = go.find_part(&args(PartType::Func, "Options.Validate")).unwrap();
    assert!(!value.found);

    let reset = go.find_part(&args(PartType::Func, "Options.Reset")).unwrap();
    assert_eq!(reset.start_line, 21);
}

#[test]
fn test_replace_grouped_const_keeps_rest_of_file() {
    let registry = Registry::with_defaults();
    let go = registry.lookup("go").unwrap();

    let new_block = "const (\n\tName    = \"demo\" // service name\n\tVersion = \"2.0\" // release\n)";
    let part = args(PartType::Const, "Name").with_new_content(new_block);
    go.validate_content(&part).unwrap();
    let result = go.replace_part(&part).unwrap();

    assert!(result.contains("Version = \"2.0\" // release"));
    assert!(result.starts_with("// Package config holds settings.\npackage config\n"));
    assert!(result.ends_with("const Major, Minor = 1, 0\n"));
    go.validate_syntax(&result).unwrap();
}

#[test]
fn test_multi_name_const_matches_names_only() {
    let registry = Registry::with_defaults();
    let go = registry.lookup("go").unwrap();

    let block = go.find_part(&args(PartType::Const, "MinSize")).unwrap();
    assert_eq!((block.start_line, block.end_line), (24, 27));

    let single = go.find_part(&args(PartType::Const, "Minor")).unwrap();
    assert_eq!(single.content, "const Major, Minor = 1, 0");

    assert!(!go.find_part(&args(PartType::Const, ",")).unwrap().found);
}

#[test]
fn test_broken_replacement_is_rejected() {
    let registry = Registry::with_defaults();
    let go = registry.lookup("go").unwrap();

    let part = args(PartType::Type, "Options").with_new_content("type Options struct {");
    let err = go.replace_part(&part).unwrap_err();
    assert!(err.is_invalid_replacement(), "unexpected error: {err}");
    assert!(err.to_string().contains("Options"));
}

#[test]
fn test_shape_check_rejects_wrong_kind() {
    let registry = Registry::with_defaults();
    let go = registry.lookup("go").unwrap();

    let part = args(PartType::Import, "fmt").with_new_content("func x() {}");
    let err = go.validate_content(&part).unwrap_err();
    assert!(matches!(err, Error::ContentShape { .. }));
}

#[test]
fn test_not_found_and_syntax_error_are_different() {
    let registry = Registry::with_defaults();
    let go = registry.lookup("go").unwrap();

    let info = go.find_part(&args(PartType::Func, "Bar")).unwrap();
    assert!(!info.found);
    assert_eq!(info.start_line, 0);
    assert!(info.content.is_empty());

    let broken = PartArgs::new("go", "package x\n\nfunc Bar( {\n", PartType::Func, "Bar");
    assert!(go.find_part(&broken).unwrap_err().is_syntax());
}
