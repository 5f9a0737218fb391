use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, Local, NaiveDate};
use jsonbind::record;
use rust_decimal::Decimal;
use uuid::Uuid;

record! {
    #[derive(Debug, Clone, Default, PartialEq)]
    struct Product {
        id: Option<Uuid>,
        name: String,
        price: f64,
        stock: HashMap<Uuid, Decimal>,
    }
}

record! {
    #[derive(Debug, Clone, Default, PartialEq)]
    struct Order {
        id: Option<Uuid>,
        products: Vec<Product>,
        create_date: DateTime<FixedOffset>,
    }
}

record! {
    #[derive(Debug, Clone, Default, PartialEq)]
    struct Customer {
        id: Option<Uuid>,
        first_name: String,
        last_name: String,
        date_birth: NaiveDate,
        orders: Vec<Order>,
    }
}

fn main() {
    let apple = Product {
        id: Some(Uuid::new_v4()),
        name: "Apple".to_string(),
        price: 5.5,
        stock: HashMap::from([(Uuid::new_v4(), Decimal::from(6))]),
    };
    let orange = Product {
        id: Some(Uuid::new_v4()),
        name: "Orange".to_string(),
        price: 10.1,
        stock: HashMap::from([
            (Uuid::new_v4(), Decimal::from(i64::MAX)),
            (Uuid::new_v4(), Decimal::from(i64::MIN)),
        ]),
    };

    let now = Local::now();
    let customer = Customer {
        id: Some(Uuid::new_v4()),
        first_name: "Ivan".to_string(),
        last_name: "Ivanovich".to_string(),
        date_birth: now.date_naive(),
        orders: vec![
            Order {
                id: Some(Uuid::new_v4()),
                products: vec![apple, orange.clone()],
                create_date: now.fixed_offset(),
            },
            Order {
                id: Some(Uuid::new_v4()),
                products: vec![orange],
                create_date: Local::now().fixed_offset(),
            },
        ],
    };

    let json = jsonbind::encode(&customer).unwrap();
    let back: Customer = jsonbind::decode(&json).unwrap();

    println!("{json}");
    println!("{}", back == customer);
}
