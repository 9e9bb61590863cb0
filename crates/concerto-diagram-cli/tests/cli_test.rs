use std::{fs, path::Path};

use serde_json::Value;
use tempfile::tempdir;

use concerto_diagram::layout::Direction;
use concerto_diagram_cli::{Args, CliError, run};

const MODELS: &str = r#"{
    "$class": "concerto.metamodel@1.0.0.Models",
    "models": [
        {
            "$class": "concerto.metamodel@1.0.0.Model",
            "namespace": "org.acme.shop@1.0.0",
            "declarations": [
                {
                    "$class": "concerto.metamodel@1.0.0.AssetDeclaration",
                    "name": "Order",
                    "isAbstract": false,
                    "superType": {
                        "$class": "concerto.metamodel@1.0.0.TypeIdentifier",
                        "name": "Record",
                        "namespace": "org.acme.base@1.0.0"
                    },
                    "properties": [
                        {
                            "$class": "concerto.metamodel@1.0.0.ObjectProperty",
                            "name": "lines",
                            "isArray": true,
                            "isOptional": false,
                            "type": { "$class": "concerto.metamodel@1.0.0.TypeIdentifier", "name": "Line" }
                        }
                    ]
                },
                {
                    "$class": "concerto.metamodel@1.0.0.ConceptDeclaration",
                    "name": "Line",
                    "isAbstract": false,
                    "properties": [
                        {
                            "$class": "concerto.metamodel@1.0.0.IntegerProperty",
                            "name": "quantity",
                            "isArray": false,
                            "isOptional": false
                        }
                    ]
                }
            ]
        },
        {
            "$class": "concerto.metamodel@1.0.0.Model",
            "namespace": "org.acme.base@1.0.0",
            "declarations": [
                {
                    "$class": "concerto.metamodel@1.0.0.ConceptDeclaration",
                    "name": "Record",
                    "isAbstract": true,
                    "properties": []
                }
            ]
        }
    ]
}"#;

fn args(input: &Path, output: &Path) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        output: output.to_string_lossy().to_string(),
        config: None,
        direction: None,
        auto_layout: false,
        hide: Vec::new(),
        log_level: "off".to_string(),
    }
}

fn read_json(path: &Path) -> Value {
    let content = fs::read_to_string(path).expect("Failed to read output");
    serde_json::from_str(&content).expect("Output is not valid JSON")
}

#[test]
fn test_projects_without_layout() {
    let dir = tempdir().expect("Failed to create temp directory");
    let input = dir.path().join("models.json");
    let output = dir.path().join("out.json");
    fs::write(&input, MODELS).unwrap();

    run(&args(&input, &output)).expect("Run failed");

    let json = read_json(&output);
    let nodes = json["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 3);
    assert_eq!(nodes[0]["id"], "org.acme.shop@1.0.0.Order");
    assert_eq!(nodes[0]["class_description"], "Asset");
    assert_eq!(nodes[1]["position"]["x"], 200.0);
    assert!(nodes[0].get("source_side").is_none());

    let edges = json["edges"].as_array().unwrap();
    assert_eq!(edges.len(), 2);
    assert_eq!(edges[0]["label"], "has many lines");
    assert_eq!(edges[1]["label"], "is a Record");
}

#[test]
fn test_auto_layout_with_direction() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("models.json");
    let output = dir.path().join("out.json");
    fs::write(&input, MODELS).unwrap();

    let mut args = args(&input, &output);
    args.auto_layout = true;
    args.direction = Some(Direction::BottomToTop);
    run(&args).expect("Run failed");

    let json = read_json(&output);
    for node in json["nodes"].as_array().unwrap() {
        assert_eq!(node["source_side"], "top");
        assert_eq!(node["target_side"], "bottom");
    }
}

#[test]
fn test_config_file_direction() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("models.json");
    let output = dir.path().join("out.json");
    let config = dir.path().join("config.toml");
    fs::write(&input, MODELS).unwrap();
    fs::write(&config, "[layout]\ndirection = \"LR\"\n").unwrap();

    let mut args = args(&input, &output);
    args.auto_layout = true;
    args.config = Some(config.to_string_lossy().to_string());
    run(&args).expect("Run failed");

    let json = read_json(&output);
    assert_eq!(json["nodes"][0]["source_side"], "right");
}

#[test]
fn test_hide_namespace() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("models.json");
    let output = dir.path().join("out.json");
    fs::write(&input, MODELS).unwrap();

    let mut args = args(&input, &output);
    args.hide = vec!["org.acme.base@1.0.0".to_string()];
    run(&args).expect("Run failed");

    let json = read_json(&output);
    assert_eq!(json["nodes"].as_array().unwrap().len(), 2);
    assert_eq!(json["edges"].as_array().unwrap().len(), 1);
}

#[test]
fn test_hide_unknown_namespace_fails() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("models.json");
    let output = dir.path().join("out.json");
    fs::write(&input, MODELS).unwrap();

    let mut args = args(&input, &output);
    args.hide = vec!["org.unknown".to_string()];
    let err = run(&args).unwrap_err();
    assert!(matches!(err, CliError::Diagram(_)));
    assert!(!output.exists());
}

#[test]
fn test_invalid_input_reports_parse_error() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("models.json");
    let output = dir.path().join("out.json");
    fs::write(&input, "{ \"models\": [ }").unwrap();

    let err = run(&args(&input, &output)).unwrap_err();
    assert!(matches!(err, CliError::Parse { .. }));
}

#[test]
fn test_missing_input_file() {
    let dir = tempdir().unwrap();
    let err = run(&args(
        &dir.path().join("absent.json"),
        &dir.path().join("out.json"),
    ))
    .unwrap_err();
    assert!(matches!(err, CliError::Diagram(_)));
}

#[test]
fn test_missing_config_file() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("models.json");
    fs::write(&input, MODELS).unwrap();

    let mut args = args(&input, &dir.path().join("out.json"));
    args.config = Some(dir.path().join("absent.toml").to_string_lossy().to_string());
    let err = run(&args).unwrap_err();
    assert!(matches!(err, CliError::Config(_)));
}
