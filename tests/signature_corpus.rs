//! Round-trips a small corpus of hand-written generic signatures through the parser and back
//! through `Display`, the way real `Signature` attribute values look in practice.

use jvmscan::signature::{parse_class_signature, parse_field_signature, parse_method_signature};

const CLASS_SIGNATURES: &[&str] = &[
    "Ljava/lang/Object;",
    "<T:Ljava/lang/Object;>Ljava/lang/Object;Ljava/util/List<TT;>;",
    "<K:Ljava/lang/Object;V:Ljava/lang/Object;>Ljava/lang/Object;Ljava/util/Map<TK;TV;>;",
    "Ljava/util/AbstractList<Ljava/lang/String;>;Ljava/util/RandomAccess;",
];

const FIELD_SIGNATURES: &[&str] = &[
    "Ljava/util/List<Ljava/lang/String;>;",
    "Ljava/util/Map<Ljava/lang/String;+Ljava/lang/Number;>;",
    "Ljava/util/Map<Ljava/lang/String;-Ljava/lang/Integer;>;",
    "Ljava/util/List<*>;",
    "[Ljava/util/List<Ljava/lang/String;>;",
    "TT;",
    "Ljava/util/Map<Ljava/lang/String;Ljava/lang/String;>.Entry;",
];

const METHOD_SIGNATURES: &[&str] = &[
    "()V",
    "(I[Ljava/lang/String;)V",
    "<T:Ljava/lang/Object;>(TT;)TT;",
    "<E:Ljava/lang/Exception;>()V^TE;",
    "(Ljava/util/List<+Ljava/lang/Number;>;)Ljava/util/List<Ljava/lang/Double;>;",
];

#[test]
fn class_signatures_round_trip() {
    for signature in CLASS_SIGNATURES {
        let parsed = parse_class_signature(signature).unwrap_or_else(|e| panic!("{signature}: {e}"));
        assert_eq!(&parsed.to_string(), signature);
    }
}

#[test]
fn field_signatures_round_trip() {
    for signature in FIELD_SIGNATURES {
        let parsed = parse_field_signature(signature).unwrap_or_else(|e| panic!("{signature}: {e}"));
        assert_eq!(&parsed.to_string(), signature);
    }
}

#[test]
fn method_signatures_round_trip() {
    for signature in METHOD_SIGNATURES {
        let parsed = parse_method_signature(signature).unwrap_or_else(|e| panic!("{signature}: {e}"));
        assert_eq!(&parsed.to_string(), signature);
    }
}

#[test]
fn malformed_signatures_are_rejected() {
    assert!(parse_field_signature("").is_err());
    assert!(parse_field_signature("Lcom/example/Widget").is_err());
    assert!(parse_method_signature("(I)").is_err());
    assert!(parse_class_signature("Ljava/lang/Object").is_err());
}
