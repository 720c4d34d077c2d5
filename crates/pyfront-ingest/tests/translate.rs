/*
 * translate.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Translating JSON-encoded native trees.
 */

use pyfront_ingest::{TranslationError, translate_json};

fn messages(err: &TranslationError) -> Vec<String> {
    err.messages.iter().map(|m| m.to_string()).collect()
}

#[test]
fn test_translate_module() {
    let module = translate_json(
        r#"{"_type": "Module", "body": [
            {"_type": "ImportFrom", "lineno": 1, "col_offset": 0, "module": "__future__",
             "names": [{"_type": "alias", "name": "division", "asname": null}], "level": 0},
            {"_type": "Assign", "lineno": 2, "col_offset": 0,
             "targets": [{"_type": "Name", "lineno": 2, "id": "x", "ctx": {"_type": "Store"}}],
             "value": {"_type": "Num", "lineno": 2, "n": 1},
             "type_comment": null},
            {"_type": "Expr", "lineno": 3, "col_offset": 0,
             "value": {"_type": "Subscript", "lineno": 3,
                       "value": {"_type": "Name", "id": "xs", "ctx": {"_type": "Load"}},
                       "slice": {"_type": "Index",
                                 "value": {"_type": "Name", "id": "None", "ctx": {"_type": "Load"}}},
                       "ctx": {"_type": "Load"}}}
        ], "type_ignores": []}"#,
    )
    .unwrap();

    insta::assert_snapshot!(module.to_string(), @"Module(body=[FutureImport(features=['division']), Assign(targets=[Name(id='x', ctx=Store())], value=IntLiteral(n=1), type_comment=None), Expr(value=Subscript(value=Name(id='xs', ctx=Load()), slice=NameConstant(value=None), ctx=Load()))], type_ignores=[])");
}

#[test]
fn test_errors_are_reported_together_in_order() {
    let err = translate_json(
        r#"{"_type": "Module", "body": [
            {"_type": "ImportFrom", "lineno": 1, "module": "__future__",
             "names": [{"_type": "alias", "name": "braces", "asname": null}], "level": 0},
            {"_type": "Expr", "lineno": 2,
             "value": {"_type": "Num", "lineno": 2, "n": "12"}},
            {"_type": "Expr", "lineno": 3,
             "value": {"_type": "Frobnicate", "lineno": 3}},
            {"_type": "Expr", "lineno": 4,
             "value": {"_type": "Num", "lineno": 4, "n": "12"}}
        ], "type_ignores": []}"#,
    )
    .unwrap_err();

    assert_eq!(
        messages(&err),
        vec![
            "line 1: future feature braces is not defined",
            "line 2: unrecognized numeric literal of type str",
            "line 3: unsupported syntax: Frobnicate",
            "line 4: unrecognized numeric literal of type str",
        ]
    );
    assert_eq!(
        err.summary.as_deref(),
        Some("found 4 errors while translating the syntax tree")
    );
}

#[test]
fn test_construction_errors_carry_the_node_line() {
    let err = translate_json(
        r#"{"_type": "Global", "lineno": 9, "names": ["ok", "not ok"]}"#,
    )
    .unwrap_err();
    assert_eq!(
        messages(&err),
        vec!["line 9: invalid value 'not ok' for Global.names: not a valid identifier"]
    );
}

#[test]
fn test_empty_fields_outside_the_grammar_are_ignored() {
    let call = translate_json(
        r#"{"_type": "Call",
            "func": {"_type": "Name", "id": "f", "ctx": {"_type": "Load"}},
            "args": [], "keywords": [], "starargs": null, "kwargs": null}"#,
    )
    .unwrap();
    assert_eq!(
        call.to_string(),
        "Call(func=Name(id='f', ctx=Load()), args=[], keywords=[])"
    );

    let err = translate_json(
        r#"{"_type": "Call",
            "func": {"_type": "Name", "id": "f", "ctx": {"_type": "Load"}},
            "starargs": {"_type": "Name", "id": "rest", "ctx": {"_type": "Load"}}}"#,
    )
    .unwrap_err();
    assert_eq!(messages(&err), vec!["Call has no field 'starargs'"]);
}

#[test]
fn test_unreadable_input() {
    let err = translate_json(r#"{"body": []}"#).unwrap_err();
    assert_eq!(
        messages(&err),
        vec!["source could not be parsed into a syntax tree"]
    );
}

#[test]
fn test_integer_literals_are_never_rounded_to_floats() {
    for text in [
        "9223372036854775808",
        "18446744073709551616",
        "100000000000000000000",
    ] {
        let err = translate_json(&format!(r#"{{"_type": "Num", "lineno": 1, "n": {text}}}"#))
            .unwrap_err();
        assert_eq!(
            messages(&err),
            vec![format!("line 1: integer literal {text} does not fit in 64 bits")]
        );
    }

    let float = translate_json(r#"{"_type": "Num", "lineno": 1, "n": 1e20}"#).unwrap();
    assert_eq!(float.to_string(), "FloatLiteral(n=1e20)");
}
