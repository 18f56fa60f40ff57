use casekeys::{
    Casing, Converter, Exclusions, Opaque, Value, convert_value, keys_to_camel_case,
    keys_to_snake_case,
};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;

fn instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 11, 2, 8, 0, 0).unwrap()
}

fn snake_payload() -> Value {
    Value::record([
        ("lorem_ipsum", Value::from(1)),
        (
            "dolor_sit",
            Value::sequence([
                Value::record([("amet_consec", Value::from("tetur"))]),
                Value::record([("amet_consec", Value::from("adipiscing"))]),
            ]),
        ),
        ("created_at", Value::from(instant())),
    ])
}

fn keys(value: &Value) -> Vec<&str> {
    value
        .as_record()
        .map(|record| record.keys().map(String::as_str).collect())
        .unwrap_or_default()
}

#[test]
fn test_camel_case_payload() {
    let cameled = keys_to_camel_case(snake_payload());

    assert_eq!(keys(&cameled), ["loremIpsum", "dolorSit", "createdAt"]);
    assert_eq!(cameled["loremIpsum"], Value::from(1));
    assert_eq!(cameled["dolorSit"][0]["ametConsec"], Value::from("tetur"));
    assert_eq!(cameled["dolorSit"][1]["ametConsec"], Value::from("adipiscing"));
    assert_eq!(cameled["createdAt"].as_instant(), Some(&instant()));
}

#[test]
fn test_snake_case_payload() {
    let cameled = keys_to_camel_case(snake_payload());
    let snaked = keys_to_snake_case(cameled);

    assert_eq!(snaked, snake_payload());
}

#[test]
fn test_input_is_unchanged() {
    let input = snake_payload();
    let _ = convert_value(&input, Casing::Camel);

    assert_eq!(input, snake_payload());
}

#[test]
fn test_conversion_is_idempotent() {
    for casing in [Casing::Camel, Casing::Snake] {
        let once = convert_value(&snake_payload(), casing);
        let twice = convert_value(&once, casing);
        assert_eq!(once, twice, "{casing}");
    }
}

#[test]
fn test_opaque_handles_are_shared() {
    struct Connection {
        pool_size: usize,
    }

    let handle = Opaque::new(Connection { pool_size: 4 });
    let input = Value::record([("db_conn", Value::Opaque(handle.clone()))]);

    let cameled = keys_to_camel_case(input);
    let kept = cameled["dbConn"].as_opaque().unwrap();

    assert!(kept.ptr_eq(&handle));
    assert_eq!(kept.downcast_ref::<Connection>().unwrap().pool_size, 4);
}

#[test]
fn test_sets_merge_converted_members() {
    let input = Value::set([
        Value::record([("user_id", Value::from(1))]),
        Value::record([("userId", Value::from(1))]),
        Value::record([("user_id", Value::from(2))]),
    ]);

    let cameled = keys_to_camel_case(input);
    let members = cameled.as_set().unwrap();

    assert_eq!(members.len(), 2);
    assert!(members.contains(&Value::record([("userId", Value::from(1))])));
    assert!(members.contains(&Value::record([("userId", Value::from(2))])));
}

#[test]
fn test_large_sets_convert() {
    const MEMBERS: i64 = 50_000;

    let input = Value::set((0..MEMBERS).map(|id| Value::record([("user_id", Value::from(id))])));
    assert_eq!(input.as_set().map(|members| members.len()), Some(MEMBERS as usize));

    let cameled = keys_to_camel_case(input);
    let members = cameled.as_set().unwrap();

    assert_eq!(members.len(), MEMBERS as usize);
    assert!(members.contains(&Value::record([("userId", Value::from(MEMBERS - 1))])));
    assert!(!members.contains(&Value::record([("user_id", Value::from(0))])));
}

#[test]
fn test_sequences_of_scalars() {
    let input = Value::sequence([Value::from("snake_case"), Value::from(3), Value::Null]);

    assert_eq!(keys_to_camel_case(input.clone()), input);
}

#[test]
fn test_converter_exclusions() {
    let exclusions = Exclusions::new().with_record_key("$oid");
    let converter = Converter::snake()
        .with_exclusions(exclusions)
        .with_exclusion(|value| value.get("keepAsIs").is_some());

    let input = Value::record([
        ("objectId", Value::record([("$oid", Value::from("abc")), ("sortKey", Value::from(1))])),
        ("rawBlob", Value::record([("keepAsIs", Value::from(true)), ("innerKey", Value::Null)])),
        ("plainRecord", Value::record([("innerKey", Value::Null)])),
    ]);

    let output = converter.convert(&input);

    assert_eq!(keys(&output), ["object_id", "raw_blob", "plain_record"]);
    assert_eq!(output["object_id"], input["objectId"]);
    assert_eq!(output["raw_blob"], input["rawBlob"]);
    assert_eq!(keys(&output["plain_record"]), ["inner_key"]);
    assert_eq!(converter.casing(), Casing::Snake);
    assert_eq!(converter.exclusions().len(), 2);
}

#[test]
fn test_json_documents() {
    let input = json!({
        "user_profile": {
            "display_name": "ferris",
            "recent_posts": [{ "post_id": 1, "tag_list": ["rust_lang"] }],
        },
        "page_size": 20,
    });

    let cameled = keys_to_camel_case(input);

    assert_eq!(
        cameled,
        json!({
            "userProfile": {
                "displayName": "ferris",
                "recentPosts": [{ "postId": 1, "tagList": ["rust_lang"] }],
            },
            "pageSize": 20,
        })
    );
}
