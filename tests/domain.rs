use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone};
use jsonbind::{decode, encode, enumeration, parse, record, Encoder, JsonNumberTrait, Value};
use rust_decimal::Decimal;
use uuid::Uuid;

record! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Product {
        pub id: Option<Uuid>,
        pub name: String,
        pub price: f64,
        pub stock: HashMap<Uuid, Decimal>,
    }
}

record! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Order {
        pub id: Option<Uuid>,
        pub products: Vec<Product>,
        pub create_date: DateTime<FixedOffset>,
        pub status: Status,
    }
}

record! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Customer {
        pub id: Option<Uuid>,
        pub first_name: String,
        pub last_name: String,
        pub date_birth: NaiveDate,
        pub orders: Vec<Order>,
        pub session: String => transient,
    }
}

record! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Bin {
        pub n: u32,
    }
}

record! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Shelf {
        pub main: Bin,
        pub spare: Option<Bin>,
        pub tags: Option<Vec<String>>,
        pub counts: Option<HashMap<String, u32>>,
    }
}

enumeration! {
    #[derive(Debug, Clone, Copy, Default, PartialEq)]
    pub enum Status {
        #[default]
        New,
        Paid,
        Shipped,
    }
}

fn timestamp(offset_secs: i32, nanos: i64) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(offset_secs)
        .unwrap()
        .with_ymd_and_hms(2024, 3, 15, 18, 45, 7)
        .unwrap()
        + Duration::nanoseconds(nanos)
}

fn sample_customer() -> Customer {
    let apple = Product {
        id: Some(Uuid::from_u128(1)),
        name: "Apple".to_string(),
        price: 5.5,
        stock: HashMap::from([(Uuid::from_u128(11), Decimal::from(6))]),
    };
    let orange = Product {
        id: Some(Uuid::from_u128(2)),
        name: "Orange".to_string(),
        price: 10.1,
        stock: HashMap::from([
            (Uuid::from_u128(21), Decimal::from(i64::MAX)),
            (Uuid::from_u128(22), Decimal::from(i64::MIN)),
        ]),
    };
    Customer {
        id: Some(Uuid::new_v4()),
        first_name: "Ivan".to_string(),
        last_name: "Ivanovich".to_string(),
        date_birth: NaiveDate::from_ymd_opt(1990, 1, 31).unwrap(),
        orders: vec![
            Order {
                id: Some(Uuid::new_v4()),
                products: vec![apple, orange.clone()],
                create_date: timestamp(3 * 3600, 123_456_789),
                status: Status::Paid,
            },
            Order {
                id: Some(Uuid::new_v4()),
                products: vec![orange],
                create_date: timestamp(-(4 * 3600 + 1800), 0),
                status: Status::Shipped,
            },
        ],
        session: String::new(),
    }
}

#[test]
fn test_product_scenario() {
    let product = Product {
        id: None,
        name: "Apple".to_string(),
        price: 5.5,
        stock: HashMap::new(),
    };
    assert_eq!(
        encode(&product).unwrap(),
        r#"{"id":null,"name":"Apple","price":5.5,"stock":{}}"#
    );
}

#[test]
fn test_customer_round_trip() {
    let customer = sample_customer();
    let json = encode(&customer).unwrap();
    let back: Customer = decode(&json).unwrap();
    assert_eq!(back, customer);

    let pretty = jsonbind::encode_pretty(&customer).unwrap();
    assert_eq!(decode::<Customer>(&pretty).unwrap(), customer);
}

#[test]
fn test_transient_field_is_skipped() {
    let mut customer = sample_customer();
    customer.session = "secret".to_string();
    let json = encode(&customer).unwrap();
    assert!(!json.contains("session"));
    assert!(!json.contains("secret"));

    let value = parse(&json).unwrap();
    let keys: Vec<_> = value.as_object().unwrap().keys().collect();
    assert_eq!(
        keys,
        ["id", "first_name", "last_name", "date_birth", "orders"]
    );

    let back: Customer = decode(&json).unwrap();
    assert_eq!(back.session, "");
}

#[test]
fn test_decimal_precision() {
    let max = Decimal::from(i64::MAX);
    let json = encode(&max).unwrap();
    assert_eq!(json, "9223372036854775807");
    assert_eq!(decode::<Decimal>(&json).unwrap(), max);

    let value = parse(r#"{"n": 9223372036854775807.000000000000000001}"#).unwrap();
    assert_eq!(
        value["n"].as_number().unwrap().as_str(),
        "9223372036854775807.000000000000000001"
    );
    assert_eq!(
        value.to_string(),
        r#"{"n":9223372036854775807.000000000000000001}"#
    );
    assert_eq!(parse("9223372036854775807").unwrap().as_number().unwrap().as_i64(), Some(i64::MAX));
}

#[test]
fn test_unknown_fields_are_ignored() {
    let json = r#"{"name": "Pear", "color": "green", "price": 1.25, "nested": {"a": [1, {"b": 2}]}}"#;
    let product: Product = decode(json).unwrap();
    assert_eq!(product.name, "Pear");
    assert_eq!(product.price, 1.25);
    assert_eq!(product.id, None);
    assert!(product.stock.is_empty());
}

#[test]
fn test_null_handling() {
    let order = Order::default();
    let json = encode(&order).unwrap();
    assert!(json.starts_with(r#"{"id":null,"products":[],"create_date":"#));

    let order: Order = decode(r#"{"id": null, "products": null, "status": null}"#).unwrap();
    assert_eq!(order, Order::default());

    assert_eq!(encode(&None::<Customer>).unwrap(), "null");
    assert_eq!(decode::<Option<Customer>>(" null ").unwrap(), None);
}

#[test]
fn test_null_fields_inside_record() {
    assert_eq!(
        encode(&Shelf::default()).unwrap(),
        r#"{"main":{"n":0},"spare":null,"tags":null,"counts":null}"#
    );

    let shelf: Shelf =
        decode(r#"{"main":null,"spare":null,"tags":null,"counts":null}"#).unwrap();
    assert_eq!(shelf, Shelf::default());

    let shelf: Shelf = decode(r#"{"main":{"n":1},"spare":{"n":2},"tags":[]}"#).unwrap();
    assert_eq!(shelf.main, Bin { n: 1 });
    assert_eq!(shelf.spare, Some(Bin { n: 2 }));
    assert_eq!(shelf.tags, Some(vec![]));
    assert_eq!(shelf.counts, None);
}

#[test]
fn test_encode_error_names_field_path() {
    let broken = Product {
        price: f64::NAN,
        ..Product::default()
    };
    let err = encode(&broken).unwrap_err();
    assert!(err.is_encode());
    assert!(err.to_string().starts_with("Product.price: "), "{err}");

    let order = Order {
        products: vec![broken],
        ..Order::default()
    };
    let err = encode(&order).unwrap_err();
    assert!(err.is_encode());
    assert_eq!(
        err.to_string(),
        "Order.products: Product.price: NaN or Infinity is not a valid JSON value"
    );
}

#[test]
fn test_empty_containers() {
    assert_eq!(encode(&Vec::<Product>::new()).unwrap(), "[]");
    assert_eq!(encode(&BTreeMap::<String, u8>::new()).unwrap(), "{}");
    assert_eq!(parse("[]").unwrap(), Value::Array(vec![]));
    assert!(parse("{}").unwrap().as_object().unwrap().is_empty());
    assert!(decode::<Vec<Product>>("[]").unwrap().is_empty());
}

#[test]
fn test_nested_structural_split() {
    let value = parse(r#"[{"a":[1,2]},{"b":3}]"#).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 2);
    assert_eq!(value[0]["a"].len(), 2);
    assert_eq!(value[1]["b"].as_number().unwrap().as_u64(), Some(3));

    let value = parse(r#"{"x": "a, [b", "y": [{"z": "}"}, [[]]]}"#).unwrap();
    assert_eq!(value["x"].as_str(), Some("a, [b"));
    assert_eq!(value["y"].len(), 2);
    assert_eq!(value["y"][0]["z"].as_str(), Some("}"));
}

#[test]
fn test_scalars_match_serde_json() {
    assert_eq!(encode(&i64::MAX).unwrap(), serde_json::to_string(&i64::MAX).unwrap());
    assert_eq!(encode(&u64::MAX).unwrap(), serde_json::to_string(&u64::MAX).unwrap());
    assert_eq!(encode(&-17i8).unwrap(), serde_json::to_string(&-17i8).unwrap());
    for f in [5.5f64, 10.1, 0.1, 1e-7, 1e300, -0.0, 123456.789] {
        assert_eq!(encode(&f).unwrap(), serde_json::to_string(&f).unwrap());
    }
    assert_eq!(encode(&0.3f32).unwrap(), serde_json::to_string(&0.3f32).unwrap());
    assert_eq!(encode(&false).unwrap(), serde_json::to_string(&false).unwrap());
    let text = "plain text".to_string();
    assert_eq!(encode(&text).unwrap(), serde_json::to_string(&text).unwrap());
}

#[test]
fn test_time_and_ids_match_serde_json() {
    let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
    assert_eq!(encode(&date).unwrap(), serde_json::to_string(&date).unwrap());

    for ts in [
        timestamp(3 * 3600, 123_456_789),
        timestamp(-(9 * 3600 + 1800), 987_654_321),
        timestamp(0, 100_000_001),
    ] {
        assert_eq!(encode(&ts).unwrap(), serde_json::to_string(&ts).unwrap());
    }

    let id = Uuid::new_v4();
    assert_eq!(encode(&id).unwrap(), serde_json::to_string(&id).unwrap());
}

#[test]
fn test_timestamp_format_is_fixed() {
    let ts = timestamp(0, 0);
    assert_eq!(encode(&ts).unwrap(), r#""2024-03-15T18:45:07.000000000+00:00""#);
    assert_eq!(decode::<DateTime<FixedOffset>>(&encode(&ts).unwrap()).unwrap(), ts);
}

#[test]
fn test_map_key_modes() {
    let map = BTreeMap::from([(1u32, Status::New), (2, Status::Shipped)]);
    let quoted = encode(&map).unwrap();
    assert_eq!(quoted, r#"{"1":"New","2":"Shipped"}"#);
    assert_eq!(quoted, serde_json::to_string(&BTreeMap::from([(1u32, "New"), (2, "Shipped")])).unwrap());

    let mut enc = Encoder::new(Vec::new()).raw_map_keys();
    enc.encode(&map).unwrap();
    let raw = String::from_utf8(enc.into_inner()).unwrap();
    assert_eq!(raw, r#"{1:"New",2:"Shipped"}"#);

    assert_eq!(decode::<BTreeMap<u32, Status>>(&quoted).unwrap(), map);
    assert_eq!(decode::<BTreeMap<u32, Status>>(&raw).unwrap(), map);
}

#[test]
fn test_malformed_input() {
    for bad in ["", "{", r#"{"a":1,}"#, "[1 2]", r#"{"a" 1}"#, "[tru]", r#"{"a": "x}"#] {
        let err = decode::<Product>(bad).unwrap_err();
        assert!(err.is_syntax(), "{bad:?}: {err}");
    }
    let err = decode::<Product>(r#"{"price": "cheap"}"#).unwrap_err();
    assert!(err.is_data());
    assert_eq!(err.to_string(), "Product.price: invalid float value `cheap`");
}
