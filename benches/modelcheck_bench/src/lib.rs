//! Shared fixtures for the modelcheck benchmarks.

use modelcheck::prelude::*;
use serde_json::json;

/// An order with a nested customer and `lines` order lines.
pub fn order_instance(lines: usize, valid: bool) -> Value {
    let sku = if valid { "SKU-001" } else { "" };
    let items: Vec<_> = (0..lines)
        .map(|i| json!({"sku": sku, "quantity": i + 1, "price": 9.5}))
        .collect();
    Value::from_json(json!({
        "reference": "ORD-2024-0001",
        "maxQuantity": 1000,
        "customer": {"name": "Ada", "email": if valid { "ada@example.com" } else { "ada" }},
        "lines": items,
    }))
}

/// Schema matching [`order_instance`].
pub fn order_schema() -> ModelSchema {
    let customer = ModelSchema::new("Customer")
        .field(FieldSchema::new("name").rule("required"))
        .field(FieldSchema::new("email").rule("required").rule("email"));
    let line = ModelSchema::new("Line")
        .field(
            FieldSchema::new("sku")
                .rule("required")
                .rule_with("maxLength", ValidatorOptions::with("maxLength", 32)),
        )
        .field(
            FieldSchema::new("quantity")
                .rule_with("min", ValidatorOptions::with("min", 1))
                .rule_with("lessOrEqual", ValidatorOptions::compare_to("../maxQuantity")),
        )
        .field(FieldSchema::new("price").rule_with("min", ValidatorOptions::with("min", 0)));

    ModelSchema::new("Order")
        .field(
            FieldSchema::new("reference")
                .rule("required")
                .rule_with("pattern", ValidatorOptions::with("pattern", "^ORD-[0-9]{4}-[0-9]{4}$")),
        )
        .field(FieldSchema::new("maxQuantity"))
        .field(FieldSchema::new("customer").model(customer))
        .field(FieldSchema::new("lines").list_of(line))
}
