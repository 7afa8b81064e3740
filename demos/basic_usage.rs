//! Basic usage example for ludwieg
//!
//! Run with: cargo run --example basic_usage

use bytes::Bytes;
use ludwieg::*;

#[derive(Debug, Clone, PartialEq)]
struct Trade {
    seq: Option<u32>,
    price: Option<DynInt>,
    symbol: Option<String>,
    tags: Vec<String>,
}

impl Structured for Trade {
    fn describe() -> Schema {
        Schema::new(vec![
            FieldSchema::of(LogicalType::U32),
            FieldSchema::of(LogicalType::DynInt),
            FieldSchema::of(LogicalType::String),
            FieldSchema::array(LogicalType::String, Cardinality::Unbounded),
        ])
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            Value::U32(self.seq),
            Value::DynInt(self.price),
            Value::String(self.symbol.as_deref().map(|s| Bytes::copy_from_slice(s.as_bytes()))),
            Value::array(self.tags.iter().map(Value::string)),
        ]
    }

    fn from_values(values: Vec<Value>) -> Result<Self> {
        let mut fields = Fields::new(values);
        Ok(Self {
            seq: fields.u32()?,
            price: fields.dyn_int()?,
            symbol: fields.string()?,
            tags: fields.strings()?,
        })
    }
}

impl Package for Trade {
    const PACKAGE_ID: u8 = 0x10;
}

fn main() -> Result<()> {
    println!("Ludwieg Basic Usage Example");
    println!("===========================");

    let mut registry = Registry::new();
    registry.register_package::<Trade>()?;

    // Example 1: generic values against an explicit schema
    println!("\n1. Generic Values:");
    {
        let schema = Schema::new(vec![
            FieldSchema::of(LogicalType::U8),
            FieldSchema::of(LogicalType::String),
            FieldSchema::array(LogicalType::String, Cardinality::Unbounded),
        ]);
        let values = [
            Value::u8(27),
            Value::string("hi"),
            Value::array([Value::string("a"), Value::string("b")]),
        ];

        let bytes = serialize(&values, &schema, 0x01, 0x01)?;
        println!("  Encoded {} bytes: {}", bytes.len(), hex::encode(&bytes));
    }

    // Example 2: typed package with absent fields
    println!("\n2. Typed Package:");
    {
        let trade = Trade {
            seq: Some(12345),
            price: Some(DynInt::from(-25_500_000)),
            symbol: None,
            tags: vec!["stop-loss".into()],
        };

        let bytes = serialize_package(&trade, 7)?;
        println!("  Encoded {} bytes", bytes.len());

        let mut de = Deserializer::new();
        for candidate in de.feed_slice(&bytes) {
            let decoded: Trade = candidate.decode_into(&registry)?;
            println!("  Decoded (message {}): {:?}", candidate.meta().message_id, decoded);
        }
    }

    // Example 3: resynchronising on a noisy stream
    println!("\n3. Noisy Stream:");
    {
        let mut stream = vec![0xFF, 0x27, 0x24, 0x00];
        for seq in 0..3 {
            let trade = Trade {
                seq: Some(seq),
                price: Some(DynInt::from(100 + seq)),
                symbol: Some("AAPL".into()),
                tags: Vec::new(),
            };
            stream.extend_from_slice(&serialize_package(&trade, seq as u8)?);
            stream.push(0x00);
        }

        let mut de = Deserializer::new();
        let candidates = de.feed_slice(&stream);
        println!("  Framed {} messages from {} bytes", candidates.len(), stream.len());
        for candidate in &candidates {
            let trade: Trade = candidate.decode_into(&registry)?;
            println!("  seq={:?} price={:?}", trade.seq, trade.price.map(|p| p.as_i64()));
        }
    }

    // Example 4: dynamic values
    println!("\n4. Any and DynInt:");
    {
        let schema = Schema::new(vec![FieldSchema::of(LogicalType::Any)]);
        for held in [Value::u32(42), Value::string("text"), Value::dyn_int(-1)] {
            let bytes = serialize_standalone(&[Value::any(held)], &schema)?;
            let decoded = decode_standalone(bytes.clone(), &schema)?;
            println!("  {} -> {:?}", hex::encode(&bytes), decoded[0].as_any());
        }

        let rejected = serialize_standalone(&[Value::any(Value::Struct(Some(Vec::new())))], &schema);
        println!("  Struct inside any: {:?}", rejected.map(|_| ()));
    }

    println!("\nAll examples completed successfully!");
    Ok(())
}
