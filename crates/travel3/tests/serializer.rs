use candid::types::value::IDLValue;
use candid::types::Label;
use travel3::{builtin_places, token_argument, PlaceRecord};

/// Count `{` and `}` outside of string literals.
fn brace_balance(text: &str) -> (usize, usize) {
    let (mut open, mut close) = (0, 0);
    let mut in_string = false;
    let mut escaped = false;
    for c in text.chars() {
        if in_string {
            match (escaped, c) {
                (true, _) => escaped = false,
                (false, '\\') => escaped = true,
                (false, '"') => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => open += 1,
            '}' => close += 1,
            _ => {}
        }
    }
    (open, close)
}

fn tricky_places() -> Vec<PlaceRecord> {
    vec![
        PlaceRecord::new(
            "The \"Eternal\" City",
            "Rome\\Lazio",
            "753 BC",
            "Braces { and } inside; semicolons; and = signs",
            "https://travel3.io/images/rome.jpg?q=\"1\"",
            "https://travel3.io/docs/rome.pdf",
        ),
        PlaceRecord::new(
            "Line\nBreak",
            "Tab\there",
            "'quoted' year",
            "backslash at end \\",
            "https://travel3.io/a.jpg",
            "https://travel3.io/a.pdf",
        ),
    ]
}

/// Parse an emitted argument with the reference Candid parser.
fn metadata_of(arg: &str) -> IDLValue {
    match candid_parser::parse_idl_value(arg).unwrap() {
        IDLValue::Opt(inner) => *inner,
        other => panic!("metadata is not an opt record: {other:?}"),
    }
}

fn field<'a>(value: &'a IDLValue, name: &str) -> Option<&'a IDLValue> {
    match value {
        IDLValue::Record(fields) => fields
            .iter()
            .find(|f| matches!(&f.id, Label::Named(n) if n == name))
            .map(|f| &f.val),
        _ => None,
    }
}

fn text<'a>(value: &'a IDLValue, name: &str) -> Option<&'a str> {
    match field(value, name) {
        Some(IDLValue::Text(s)) => Some(s),
        _ => None,
    }
}

#[test]
fn braces_balance_and_identifier_is_unique() {
    let places: Vec<_> = builtin_places().into_iter().chain(tricky_places()).collect();
    for (i, place) in places.iter().enumerate() {
        let arg = token_argument(place, i).unwrap();
        let (open, close) = brace_balance(&arg);
        assert_eq!(open, close, "unbalanced braces in {arg}");
        assert_eq!(arg.matches("tokenIdentifier = ").count(), 1);

        let meta = metadata_of(&arg);
        assert_eq!(
            text(&meta, "tokenIdentifier"),
            Some(format!("place_{i}").as_str())
        );
    }
}

#[test]
fn quotes_and_backslashes_round_trip() {
    for (i, place) in tricky_places().iter().enumerate() {
        let arg = token_argument(place, i).unwrap();
        let meta = metadata_of(&arg);
        let attrs = field(&meta, "attributes").unwrap();
        assert_eq!(text(attrs, "name"), Some(place.name.as_str()));
        assert_eq!(text(attrs, "location"), Some(place.location.as_str()));
        assert_eq!(text(attrs, "year"), Some(place.year.as_str()));
        let image = field(&meta, "mainImageLocation").unwrap();
        assert_eq!(text(image, "icp"), Some(place.image_url.as_str()));
    }
}

#[test]
fn colosseum_fields() {
    let places = builtin_places();
    let arg = token_argument(&places[0], 0).unwrap();
    assert!(arg.contains("tokenIdentifier = \"place_0\""));
    assert!(arg.contains("name = \"Colosseum\""));
    assert!(arg.contains("year = \"70-80 AD\""));
    let image = "record { icp = \"https://travel3.io/images/colosseum.jpg\"; ipfs = \"\" }";
    assert!(arg.contains(&format!("mainImageLocation = {image}")));
    assert!(arg.contains(&format!("thumbnailLocation = {image}")));
}

#[test]
fn constant_fields_are_shared() {
    let constants = ["collection", "category", "historicalPeriod", "culturalSignificance"];
    let outputs: Vec<IDLValue> = builtin_places()
        .iter()
        .enumerate()
        .map(|(i, p)| metadata_of(&token_argument(p, i).unwrap()))
        .collect();
    let attributes: Vec<&IDLValue> = outputs
        .iter()
        .map(|meta| field(meta, "attributes").unwrap())
        .collect();
    for name in constants {
        let first = text(attributes[0], name);
        assert!(first.is_some(), "missing {name}");
        for attrs in &attributes[1..] {
            assert_eq!(text(attrs, name), first);
        }
    }
    assert_eq!(
        field(attributes[2], "architecturalStyle"),
        Some(&IDLValue::Null)
    );
}

#[test]
fn serialization_is_deterministic() {
    for (i, place) in builtin_places().iter().enumerate() {
        assert_eq!(
            token_argument(place, i).unwrap(),
            token_argument(place, i).unwrap()
        );
    }
}
