//! Integration tests for ludwieg
//!
//! These tests verify end-to-end functionality and compatibility.

use std::sync::Arc;

use bytes::Bytes;
use ludwieg::*;

#[derive(Debug, Clone, PartialEq)]
struct Inner {
    label: Option<String>,
}

impl Structured for Inner {
    fn describe() -> Schema {
        Schema::new(vec![FieldSchema::of(LogicalType::String)])
    }

    fn to_values(&self) -> Vec<Value> {
        vec![Value::String(self.label.as_deref().map(|s| Bytes::copy_from_slice(s.as_bytes())))]
    }

    fn from_values(values: Vec<Value>) -> Result<Self> {
        let mut fields = Fields::new(values);
        Ok(Self {
            label: fields.string()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Middle {
    name: Option<String>,
    inner: Option<Inner>,
}

impl Structured for Middle {
    fn describe() -> Schema {
        Schema::new(vec![
            FieldSchema::of(LogicalType::String),
            FieldSchema::structure(Inner::describe()),
        ])
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            Value::String(self.name.as_deref().map(|s| Bytes::copy_from_slice(s.as_bytes()))),
            Value::Struct(self.inner.as_ref().map(Inner::to_values)),
        ]
    }

    fn from_values(values: Vec<Value>) -> Result<Self> {
        let mut fields = Fields::new(values);
        Ok(Self {
            name: fields.string()?,
            inner: fields.structure()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Everything {
    a: Option<u8>,
    b: Option<u32>,
    c: Option<u64>,
    d: Option<f64>,
    e: Option<String>,
    f: Option<Bytes>,
    g: Option<bool>,
    h: Option<String>,
    any: Option<Value>,
    names: Vec<String>,
    middle: Option<Middle>,
    children: Vec<Inner>,
    counter: Option<DynInt>,
}

impl Structured for Everything {
    fn describe() -> Schema {
        Schema::new(vec![
            FieldSchema::of(LogicalType::U8),
            FieldSchema::of(LogicalType::U32),
            FieldSchema::of(LogicalType::U64),
            FieldSchema::of(LogicalType::Double),
            FieldSchema::of(LogicalType::String),
            FieldSchema::of(LogicalType::Blob),
            FieldSchema::of(LogicalType::Bool),
            FieldSchema::of(LogicalType::Uuid),
            FieldSchema::of(LogicalType::Any),
            FieldSchema::array(LogicalType::String, Cardinality::Unbounded),
            FieldSchema::structure(Middle::describe()),
            FieldSchema::array_of_structs(Inner::describe(), Cardinality::Unbounded),
            FieldSchema::of(LogicalType::DynInt),
        ])
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            Value::U8(self.a),
            Value::U32(self.b),
            Value::U64(self.c),
            Value::Double(self.d),
            Value::String(self.e.as_deref().map(|s| Bytes::copy_from_slice(s.as_bytes()))),
            Value::Blob(self.f.clone()),
            Value::Bool(self.g),
            Value::Uuid(self.h.clone()),
            Value::Any(self.any.clone().map(Box::new)),
            Value::array(self.names.iter().map(Value::string)),
            Value::Struct(self.middle.as_ref().map(Middle::to_values)),
            Value::array(self.children.iter().map(|c| Value::Struct(Some(c.to_values())))),
            Value::DynInt(self.counter),
        ]
    }

    fn from_values(values: Vec<Value>) -> Result<Self> {
        let mut fields = Fields::new(values);
        Ok(Self {
            a: fields.u8()?,
            b: fields.u32()?,
            c: fields.u64()?,
            d: fields.double()?,
            e: fields.string()?,
            f: fields.blob()?,
            g: fields.bool()?,
            h: fields.uuid()?,
            any: fields.any()?,
            names: fields.strings()?,
            middle: fields.structure()?,
            children: fields.array_of()?,
            counter: fields.dyn_int()?,
        })
    }
}

impl Package for Everything {
    const PACKAGE_ID: u8 = 0x01;
}

#[derive(Debug, Clone, PartialEq)]
struct Ping;

impl Structured for Ping {
    fn describe() -> Schema {
        Schema::empty()
    }

    fn to_values(&self) -> Vec<Value> {
        Vec::new()
    }

    fn from_values(_values: Vec<Value>) -> Result<Self> {
        Ok(Ping)
    }
}

impl Package for Ping {
    const PACKAGE_ID: u8 = 0x02;
}

fn sample() -> Everything {
    Everything {
        a: Some(27),
        b: Some(28),
        c: Some(29),
        d: Some(30.2),
        e: Some("String".into()),
        f: Some(Bytes::from_static(&[0x27, 0x24, 0x50])),
        g: Some(true),
        h: Some("3232ee42c2f24baf841318335b4d5640".into()),
        any: Some(Value::string("Any field retaining a string")),
        names: vec!["Robin".into(), "Tom".into()],
        middle: Some(Middle {
            name: Some("Structure".into()),
            inner: Some(Inner {
                label: Some("Other Structure".into()),
            }),
        }),
        children: vec![
            Inner {
                label: Some("first".into()),
            },
            Inner { label: None },
        ],
        counter: Some(DynInt::from(-70_000)),
    }
}

fn registry() -> Registry {
    let mut registry = Registry::new();
    registry.register_package::<Everything>().unwrap();
    registry.register_package::<Ping>().unwrap();
    registry
}

#[test]
fn test_full_package_roundtrip() {
    let registry = registry();
    let original = sample();
    let bytes = serialize_package(&original, 0x2A).unwrap();

    let mut de = Deserializer::new();
    let mut decoded = None;
    for &b in bytes.iter() {
        if let Some(candidate) = de.feed(b) {
            assert_eq!(candidate.meta().message_id, 0x2A);
            assert!(candidate.can_decode(&registry));
            decoded = Some(candidate.decode_into::<Everything>(&registry).unwrap());
        }
    }

    let decoded = decoded.expect("no message framed");
    assert_eq!(decoded, original);
    assert_eq!(decoded.counter.unwrap().kind(), DynIntKind::I32);
    assert_eq!(decoded.counter.unwrap().as_i64(), -70_000);
}

#[test]
fn test_absent_values_roundtrip() {
    let registry = registry();
    let empty = Everything {
        a: None,
        b: None,
        c: None,
        d: None,
        e: None,
        f: None,
        g: None,
        h: None,
        any: None,
        names: Vec::new(),
        middle: None,
        children: Vec::new(),
        counter: None,
    };

    let bytes = serialize_package(&empty, 1).unwrap();
    let candidates = Deserializer::new().feed_slice(&bytes);
    assert_eq!(candidates.len(), 1);

    let values = candidates[0].decode(&registry).unwrap();
    assert_eq!(values.len(), 13);
    assert!(!values[0].is_present());
    assert_eq!(values[9], Value::Array(Some(Vec::new())));

    assert_eq!(candidates[0].decode_into::<Everything>(&registry).unwrap(), empty);
}

#[test]
fn test_documented_wire_vector() {
    let schema = Schema::new(vec![
        FieldSchema::of(LogicalType::U8),
        FieldSchema::of(LogicalType::String),
        FieldSchema::array(LogicalType::String, Cardinality::Unbounded),
    ]);
    let values = vec![
        Value::u8(27),
        Value::string("hi"),
        Value::array([Value::string("a"), Value::string("b")]),
    ];

    let expected: &[u8] = &[
        0x27, 0x24, 0x50, 0x01, 0x01, 0x01, 0x01, 0x13, 0x04, 0x1B, 0x15, 0x01, 0x02, 0x68, 0x69,
        0x21, 0x01, 0x06, 0x15, 0x01, 0x02, 0x01, 0x01, 0x61, 0x01, 0x01, 0x62,
    ];
    let bytes = serialize(&values, &schema, 1, 1).unwrap();
    assert_eq!(bytes.as_ref(), expected);

    let mut registry = Registry::new();
    registry.register(1, schema).unwrap();
    let candidates = Deserializer::new().feed_slice(expected);
    assert_eq!(candidates[0].decode(&registry).unwrap(), values);
}

#[test]
fn test_fieldless_package() {
    let registry = registry();
    let bytes = serialize_package(&Ping, 9).unwrap();
    assert_eq!(bytes.as_ref(), &[0x27, 0x24, 0x50, 0x01, 0x09, 0x02, 0x01, 0x00]);

    let candidates = Deserializer::new().feed_slice(&bytes);
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].decode_into::<Ping>(&registry).unwrap(), Ping);
    assert_eq!(
        candidates[0].decode_into::<Everything>(&registry),
        Err(Error::UnknownPackageType(0x02))
    );
}

#[test]
fn test_interleaved_garbage_stream() {
    let registry = registry();
    let mut stream = Vec::new();
    for i in 0..50u8 {
        stream.extend_from_slice(&[0x00, 0x27, 0x24, i, 0xFF]);
        let mut message = sample();
        message.a = Some(i);
        stream.extend_from_slice(&serialize_package(&message, i).unwrap());
    }

    let mut de = Deserializer::new();
    let candidates = de.feed_slice(&stream);
    assert_eq!(candidates.len(), 50);
    for (i, candidate) in candidates.iter().enumerate() {
        let decoded = candidate.decode_into::<Everything>(&registry).unwrap();
        assert_eq!(decoded.a, Some(i as u8));
        assert_eq!(candidate.meta().message_id, i as u8);
    }
    assert!(de.is_idle());
}

#[test]
fn test_many_messages_split_reads() {
    let registry = registry();
    let mut stream = Vec::new();
    for i in 0..1_000u32 {
        let mut message = sample();
        message.b = Some(i);
        message.counter = Some(DynInt::from(i));
        stream.extend_from_slice(&serialize_package(&message, (i % 256) as u8).unwrap());
    }

    // Feed in uneven chunks to exercise partial frames
    let mut de = Deserializer::new();
    let mut decoded = Vec::new();
    for chunk in stream.chunks(37) {
        for candidate in de.feed_slice(chunk) {
            decoded.push(candidate.decode_into::<Everything>(&registry).unwrap());
        }
    }

    assert_eq!(decoded.len(), 1_000);
    for (i, message) in decoded.iter().enumerate() {
        assert_eq!(message.b, Some(i as u32));
        assert_eq!(message.counter.map(|c| c.as_u32()), Some(i as u32));
    }
}

#[test]
fn test_unregistered_package() {
    let bytes = serialize_package(&Ping, 1).unwrap();
    let candidates = Deserializer::new().feed_slice(&bytes);

    let registry = Registry::new();
    assert!(!candidates[0].can_decode(&registry));
    assert_eq!(
        candidates[0].decode(&registry),
        Err(Error::UnknownPackageType(Ping::PACKAGE_ID))
    );
}

#[test]
fn test_standalone_structured() {
    let middle = Middle {
        name: Some("Structure".into()),
        inner: None,
    };
    let bytes = serialize_structured(&middle).unwrap();
    assert_eq!(bytes[0], 0x2D);

    let decoded: Middle = decode_structured(bytes).unwrap();
    assert_eq!(decoded, middle);
}

#[test]
fn test_unknown_field_is_skipped() {
    // A newer peer appends a length-prefixed field of a type this build lacks
    let mut payload = vec![0x04, 0x05];
    payload.extend_from_slice(&[0x3D, 0x01, 0x03, 0xAA, 0xBB, 0xCC]);
    let bytes = frame::write_message(&MessageMeta::new(3, 1), &payload).unwrap();

    let mut registry = Registry::new();
    registry
        .register(3, Schema::new(vec![FieldSchema::of(LogicalType::U8)]))
        .unwrap();

    let candidates = Deserializer::new().feed_slice(&bytes);
    let values = candidates[0].decode(&registry).unwrap();
    assert_eq!(values[0], Value::u8(5));
    assert!(matches!(values[1], Value::Unknown { type_id: 0x3D, body: Some(ref b) } if b.len() == 3));
}

#[test]
fn test_registry_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Registry>();
    assert_send_sync::<Candidate>();

    let registry = Arc::new(registry());
    let bytes = serialize_package(&sample(), 3).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let registry = Arc::clone(&registry);
            let bytes = bytes.clone();
            std::thread::spawn(move || {
                let candidates = Deserializer::new().feed_slice(&bytes);
                candidates[0].decode_into::<Everything>(&registry).unwrap()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), sample());
    }
}

#[test]
fn test_any_holding_array() {
    let schema = Schema::new(vec![FieldSchema::of(LogicalType::Any)]);
    let values = vec![Value::any(Value::array([Value::u32(1), Value::u32(2)]))];
    let bytes = serialize(&values, &schema, 5, 1).unwrap();

    let mut registry = Registry::new();
    registry.register(5, schema).unwrap();
    let candidates = Deserializer::new().feed_slice(&bytes);
    assert_eq!(candidates[0].decode(&registry).unwrap(), values);
}
