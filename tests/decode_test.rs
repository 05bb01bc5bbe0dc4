//! Integration tests for the problem-collecting decoder.

use std::collections::BTreeMap;

use salvage::{
    decode_collecting_issues, Decoder, JsonPath, Nullable, Problem, ProblemKind, PropertyIssue,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Counter {
    #[serde(default, deserialize_with = "salvage::nullable")]
    count: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
enum Color {
    Red,
    Green,
    Blue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Animal {
    #[serde(default, deserialize_with = "salvage::nullable")]
    name: Option<String>,
    #[serde(default, deserialize_with = "salvage::nullable")]
    color_enum: Option<Color>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Zoo {
    #[serde(default, deserialize_with = "salvage::nullable")]
    zoo: Option<Vec<Animal>>,
    #[serde(default, deserialize_with = "salvage::nullable")]
    scores: Option<BTreeMap<u32, u8>>,
}

fn issue_pairs(issues: &salvage::PropertyIssues) -> Vec<(String, String)> {
    issues
        .iter()
        .map(|i| (i.property_name.clone(), i.issue.clone()))
        .collect()
}

#[test]
fn test_weird_string_value_end_to_end() {
    let (counter, issues) = decode_collecting_issues::<Counter>(&json!({"count": "abc"}));

    assert_eq!(counter.unwrap().count, None);
    assert_eq!(
        serde_json::to_value(&issues).unwrap(),
        json!([{"propertyName": "count", "issue": "Weird String Value, abc, not a valid i32 value"}])
    );
    assert_eq!(issues.first().unwrap().code.as_deref(), Some("weird_string_value"));
}

#[test]
fn test_nested_array_path() {
    let input = json!({
        "zoo": [
            {"name": "Ada", "colorEnum": "RED"},
            {"name": "Bo", "colorEnum": "PURPLE"}
        ]
    });

    let decoded = Decoder::new().decode::<Zoo>(&input);
    let zoo = decoded.value.unwrap().zoo.unwrap();

    assert_eq!(zoo[0].color_enum, Some(Color::Red));
    assert_eq!(zoo[1].name.as_deref(), Some("Bo"));
    assert_eq!(zoo[1].color_enum, None);
    assert_eq!(
        issue_pairs(&decoded.issues),
        vec![(
            "zoo.1.colorEnum".to_string(),
            "Weird String Value, PURPLE, not one of the values accepted: [RED, GREEN, BLUE]"
                .to_string()
        )]
    );
}

#[test]
fn test_weird_key() {
    let decoded = Decoder::new().decode::<Zoo>(&json!({"scores": {"1": 10, "x": 20}}));

    assert_eq!(decoded.value.unwrap().scores, None);
    assert_eq!(
        issue_pairs(&decoded.issues),
        vec![(
            "scores.x".to_string(),
            "Weird Key, x, not a valid u32 key".to_string()
        )]
    );
}

#[test]
fn test_weird_number_value() {
    let decoded = Decoder::new().decode::<Zoo>(&json!({"scores": {"1": 300}}));

    assert_eq!(
        issue_pairs(&decoded.issues),
        vec![(
            "scores.1".to_string(),
            "Weird Number Value, 300, not a valid u8 value".to_string()
        )]
    );
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct Owner {
    name: String,
}

#[derive(Debug, Deserialize)]
struct Kennel {
    #[serde(default, deserialize_with = "salvage::nullable")]
    owner: Option<Owner>,
    #[serde(default, deserialize_with = "salvage::nullable")]
    dogs: Option<Vec<String>>,
    #[serde(default, deserialize_with = "salvage::or_default")]
    capacity: u16,
    #[serde(default, deserialize_with = "salvage::or_default")]
    open: bool,
}

#[test]
fn test_missing_instantiator_and_unexpected_token() {
    let decoded = Decoder::new().decode::<Kennel>(&json!({
        "owner": "bob",
        "dogs": {"first": "Rex"}
    }));

    let kennel = decoded.value.unwrap();
    assert!(kennel.owner.is_none());
    assert!(kennel.dogs.is_none());
    assert_eq!(
        issue_pairs(&decoded.issues),
        vec![
            (
                "owner".to_string(),
                "Missing Instantiator, bob, no way to construct `Owner` from a string value"
                    .to_string()
            ),
            (
                "dogs".to_string(),
                "Unexpected Token, object, expected array".to_string()
            ),
        ]
    );
}

#[test]
fn test_no_early_abort() {
    let decoded = Decoder::new().decode::<Kennel>(&json!({
        "owner": {"name": "Ann"},
        "dogs": ["Rex", "Fido"],
        "capacity": -4,
        "open": "sometimes"
    }));

    let kennel = decoded.value.unwrap();
    assert_eq!(decoded.issues.len(), 2);
    assert_eq!(kennel.owner.unwrap().name, "Ann");
    assert_eq!(kennel.dogs.unwrap(), vec!["Rex", "Fido"]);
    assert_eq!(kennel.capacity, 0);
    assert!(!kennel.open);

    let names: Vec<_> = decoded
        .issues
        .iter()
        .map(|i| i.property_name.as_str())
        .collect();
    assert_eq!(names, vec!["capacity", "open"]);
}

#[derive(Debug, Deserialize)]
#[serde(try_from = "String")]
struct Email(#[allow(dead_code)] String);

impl TryFrom<String> for Email {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.contains('@') {
            Ok(Email(value))
        } else {
            Err("missing @\n  while constructing Email\n".to_string())
        }
    }
}

#[derive(Debug, Deserialize)]
struct Contact {
    #[serde(default, deserialize_with = "salvage::nullable")]
    email: Option<Email>,
}

#[test]
fn test_instantiation_problem_is_single_line() {
    let (contact, issues) =
        decode_collecting_issues::<Contact>(&json!({"email": "nobody.example.com"}));

    assert!(contact.unwrap().email.is_none());
    assert_eq!(
        issues.first(),
        Some(
            &PropertyIssue::new(
                "email",
                "Instantiation Problem, nobody.example.com, missing @ while constructing Email"
            )
            .with_code("instantiation_problem")
        )
    );
}

#[test]
fn test_null_substitution_for_every_type() {
    let (zoo, issues) = decode_collecting_issues::<Zoo>(&json!({
        "zoo": "not a list",
        "scores": [1, 2]
    }));

    let zoo = zoo.unwrap();
    assert!(zoo.zoo.is_none());
    assert!(zoo.scores.is_none());
    assert_eq!(issues.len(), 2);
}

#[test]
fn test_unadapted_field_aborts_its_record() {
    #[derive(Debug, Deserialize)]
    struct Inner {
        #[allow(dead_code)]
        level: u8,
    }

    #[derive(Debug, Deserialize)]
    struct Outer {
        #[serde(default, deserialize_with = "salvage::nullable")]
        inner: Option<Inner>,
        #[serde(default, deserialize_with = "salvage::nullable")]
        label: Option<String>,
    }

    let decoded = Decoder::new().decode::<Outer>(&json!({
        "inner": {"level": "high"},
        "label": "kept"
    }));

    let outer = decoded.value.unwrap();
    assert!(outer.inner.is_none());
    assert_eq!(outer.label.as_deref(), Some("kept"));
    assert_eq!(decoded.issues.first().unwrap().property_name, "inner.level");
}

#[test]
fn test_root_failure_has_empty_property_name() {
    let decoded = Decoder::new().decode::<Counter>(&json!(true));

    assert!(decoded.value.is_none());
    assert!(!decoded.is_clean());
    assert_eq!(
        decoded.issues.first(),
        Some(
            &PropertyIssue::new(
                "",
                "Missing Instantiator, true, no way to construct `Counter` from a boolean value"
            )
            .with_code("missing_instantiator")
        )
    );
}

#[test]
fn test_round_trip() {
    let input = json!({
        "zoo": [
            {"name": "Ada", "colorEnum": "RED"},
            {"name": null, "colorEnum": "BLUE"}
        ],
        "scores": {"1": 10, "2": 20}
    });

    let first = Decoder::new().decode::<Zoo>(&input);
    assert!(first.is_clean());

    let value = first.value.unwrap();
    let encoded = serde_json::to_value(&value).unwrap();
    let second = Decoder::new().decode::<Zoo>(&encoded);

    assert!(second.is_clean());
    assert_eq!(second.value.unwrap(), value);
}

#[test]
fn test_round_trip_flat_record() {
    for input in [json!({"count": 5}), json!({"count": null})] {
        let first = Decoder::new().decode::<Counter>(&input);
        assert!(first.is_clean());

        let value = first.value.unwrap();
        let second = Decoder::new().decode::<Counter>(&serde_json::to_value(&value).unwrap());

        assert!(second.is_clean());
        assert_eq!(second.value.unwrap(), value);
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Tags {
    #[serde(default, deserialize_with = "salvage::nullable")]
    tags: Option<Vec<Nullable<i32>>>,
    #[serde(default, deserialize_with = "salvage::nullable")]
    scores: Option<BTreeMap<u32, Nullable<u8>>>,
}

#[test]
fn test_bad_elements_leave_their_siblings_decoded() {
    let decoded = Decoder::new().decode::<Tags>(&json!({
        "tags": [1, "x", 3],
        "scores": {"1": 5, "2": 900, "3": 7}
    }));

    let tags = decoded.value.unwrap();
    assert_eq!(
        serde_json::to_value(&tags).unwrap(),
        json!({"tags": [1, null, 3], "scores": {"1": 5, "2": null, "3": 7}})
    );
    assert_eq!(
        issue_pairs(&decoded.issues),
        vec![
            (
                "tags.1".to_string(),
                "Weird String Value, x, not a valid i32 value".to_string()
            ),
            (
                "scores.2".to_string(),
                "Weird Number Value, 900, not a valid u8 value".to_string()
            ),
        ]
    );
}

#[test]
fn test_round_trip_scalar_collections() {
    let input = json!({"tags": [1, null, 3], "scores": {"1": 5, "2": null}});

    let first = Decoder::new().decode::<Tags>(&input);
    assert!(first.is_clean());

    let value = first.value.unwrap();
    let encoded = serde_json::to_value(&value).unwrap();
    assert_eq!(encoded, input);

    let second = Decoder::new().decode::<Tags>(&encoded);
    assert!(second.is_clean());
    assert_eq!(second.value.unwrap(), value);
}

#[test]
fn test_problems_in_element_records_are_all_reported() {
    #[derive(Debug, Deserialize)]
    struct Point {
        a: Nullable<i32>,
        b: Nullable<i32>,
    }

    #[derive(Debug, Deserialize)]
    struct Shape {
        #[serde(default, deserialize_with = "salvage::nullable")]
        points: Option<Vec<Point>>,
    }

    let decoded = Decoder::new().decode::<Shape>(&json!({
        "points": [{"a": "x", "b": "y"}, {"a": 1, "b": 2}]
    }));

    let points = decoded.value.unwrap().points.unwrap();
    assert_eq!(points.len(), 2);
    assert!(points[0].a.is_none() && points[0].b.is_none());
    assert_eq!(*points[1].a, Some(1));

    let names: Vec<_> = decoded
        .issues
        .iter()
        .map(|i| i.property_name.as_str())
        .collect();
    assert_eq!(names, vec!["points.0.a", "points.0.b"]);
}

#[test]
fn test_failed_element_record_becomes_absent() {
    #[derive(Debug, Deserialize)]
    struct Level {
        level: u8,
    }

    #[derive(Debug, Deserialize)]
    struct Floors {
        #[serde(default, deserialize_with = "salvage::nullable")]
        floors: Option<Vec<Nullable<Level>>>,
    }

    let decoded = Decoder::new().decode::<Floors>(&json!({
        "floors": [{"level": 1}, {"level": "high"}, {"level": 3}]
    }));

    let levels: Vec<_> = decoded
        .value
        .unwrap()
        .floors
        .unwrap()
        .into_iter()
        .map(|floor| floor.into_inner().map(|f| f.level))
        .collect();
    assert_eq!(levels, vec![Some(1), None, Some(3)]);
    assert_eq!(
        decoded.issues.first().unwrap().property_name,
        "floors.1.level"
    );
}

#[test]
fn test_scalar_coercion() {
    let decoder = Decoder::new();
    let kennel = decoder
        .decode::<Kennel>(&json!({"capacity": "12", "open": "true"}))
        .value
        .unwrap();
    assert_eq!(kennel.capacity, 12);
    assert!(kennel.open);

    let strict = Decoder::new().coerce_scalars(false);
    let decoded = strict.decode::<Kennel>(&json!({"capacity": "12", "open": "true"}));
    let kinds: Vec<_> = decoded
        .issues
        .iter()
        .map(|i| i.code.clone().unwrap())
        .collect();
    assert_eq!(kinds, vec!["unexpected_token", "unexpected_token"]);
}

#[test]
fn test_decode_strict_reports_first_problem() {
    let error = Decoder::new()
        .decode_strict::<Zoo>(&json!({"zoo": [{"colorEnum": "RED"}, {"colorEnum": 7}]}))
        .unwrap_err();

    assert_eq!(error.path(), Some(&JsonPath::from_pointer("/zoo/1/colorEnum")));
    assert_eq!(error.problem().kind, ProblemKind::UnexpectedToken);
    assert!(error.to_string().starts_with("zoo.1.colorEnum: Unexpected Token, number"));
}

#[test]
fn test_decode_strict_accepts_clean_input() {
    let counter = Decoder::new()
        .decode_strict::<Counter>(&json!({"count": 3}))
        .unwrap();
    assert_eq!(counter.count, Some(3));
}

#[test]
fn test_custom_handler_substitutes_values() {
    #[derive(Default)]
    struct Clamp {
        seen: Vec<String>,
    }

    impl salvage::ProblemHandler for Clamp {
        fn handle(&mut self, path: &JsonPath, problem: &Problem) -> Value {
            self.seen.push(format!("{} ({})", path, problem.kind.code()));
            match problem.kind {
                ProblemKind::WeirdNumberValue => Value::from(u16::MAX),
                _ => Value::Null,
            }
        }
    }

    let (kennel, clamp) = Decoder::new()
        .decode_with::<Kennel, _>(&json!({"capacity": 70000, "open": 1}), Clamp::default());

    let kennel = kennel.unwrap();
    assert_eq!(kennel.capacity, u16::MAX);
    assert!(!kennel.open);
    assert_eq!(
        clamp.seen,
        vec!["capacity (weird_number_value)", "open (unexpected_token)"]
    );
}

#[test]
fn test_unknown_fields() {
    #[derive(Debug, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct Tight {
        #[serde(default)]
        #[allow(dead_code)]
        id: u32,
    }

    let decoded = Decoder::new().decode::<Tight>(&json!({"id": 1, "extra": true}));
    assert!(decoded.value.is_none());
    assert_eq!(
        issue_pairs(&decoded.issues),
        vec![(
            "extra".to_string(),
            "Weird Key, extra, not one of the known properties: [id]".to_string()
        )]
    );

    let lenient = Decoder::new().decode::<Counter>(&json!({"count": 1, "extra": true}));
    assert!(lenient.is_clean());
}
