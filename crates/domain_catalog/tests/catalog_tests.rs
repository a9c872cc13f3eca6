//! Tests for plan records as served by the catalog backend

use rust_decimal_macros::dec;

use domain_catalog::HealthPlan;

fn catalog_response() -> serde_json::Value {
    serde_json::json!([
        {
            "_id": "a1",
            "name": "Plan A",
            "empresa": "Avalian",
            "price": 52000,
            "rating": 4.1,
            "linea": "Classic",
            "attributes": [
                {
                    "name": "Internacion",
                    "value_name": "100%",
                    "attribute_group_name": "Coberturas",
                    "attribute_name_order": 1,
                    "attribute_group_order": 1
                },
                {
                    "name": "Copagos",
                    "value_name": "No",
                    "attribute_group_name": "Costos",
                    "attribute_name_order": null,
                    "attribute_group_order": null
                }
            ],
            "images": [
                { "id": "i1", "descripcion": "logo", "empresa": "Avalian", "url": "https://cdn.example.com/a.png" }
            ]
        },
        {
            "_id": "g1",
            "name": "Plan G",
            "empresa": "Galeno",
            "price": "38000.50",
            "rating": 3.9,
            "linea": "Azul"
        }
    ])
}

#[test]
fn test_catalog_response_deserializes() {
    let plans: Vec<HealthPlan> = serde_json::from_value(catalog_response()).unwrap();

    assert_eq!(plans.len(), 2);
    assert_eq!(plans[0].id, "a1");
    assert_eq!(plans[0].primary_image().map(|i| i.description.as_str()), Some("logo"));
    assert_eq!(plans[1].price, dec!(38000.50));
    assert!(plans[1].clinics.is_empty());
    assert!(plans[1].brochures.is_empty());
}

#[test]
fn test_null_orders_sort_last() {
    let plans: Vec<HealthPlan> = serde_json::from_value(catalog_response()).unwrap();
    let groups = plans[0].grouped_attributes();

    assert_eq!(groups[0].name, "Coberturas");
    assert_eq!(groups[1].name, "Costos");
    assert_eq!(groups[1].order, None);
}

#[test]
fn test_attribute_lookup_and_price_output() {
    let plans: Vec<HealthPlan> = serde_json::from_value(catalog_response()).unwrap();

    assert_eq!(plans[0].attribute("Internacion"), Some("100%"));
    assert_eq!(plans[0].attribute("Odontologia"), None);

    let json = serde_json::to_value(&plans[1]).unwrap();
    assert_eq!(json["price"], 38000.5);
    assert_eq!(json["empresa"], "Galeno");
}
