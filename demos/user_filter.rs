//! Example evaluating WHERE clauses against a typed record

use once_cell::sync::Lazy;
use sqleval::access::{FieldAccessor, FieldDef, RecordSchema, Value, ValueKind};
use sqleval::expression::Predicate;

static USER_SCHEMA: Lazy<RecordSchema> = Lazy::new(|| {
    RecordSchema::new(vec![
        FieldDef::new("ID", ValueKind::Integer).tag("id"),
        FieldDef::new("Name", ValueKind::Text).tag("name"),
        FieldDef::new("Age", ValueKind::Integer).tag("age"),
        FieldDef::new("Salary", ValueKind::Float).tag("salary"),
        FieldDef::new("IsActive", ValueKind::Boolean).tag("is_active"),
    ])
});

struct User {
    id: Option<i64>,
    name: Option<String>,
    age: Option<i64>,
    salary: Option<f64>,
    is_active: Option<bool>,
}

impl FieldAccessor for User {
    fn schema(&self) -> &RecordSchema {
        &USER_SCHEMA
    }

    fn get(&self, name: &str) -> Option<Value> {
        match name {
            "ID" => Some(self.id.into()),
            "Name" => Some(self.name.clone().into()),
            "Age" => Some(self.age.into()),
            "Salary" => Some(self.salary.into()),
            "IsActive" => Some(self.is_active.into()),
            _ => None,
        }
    }
}

fn main() -> anyhow::Result<()> {
    println!("WHERE Clause Evaluation Demo");
    println!("============================");

    let users = vec![
        User {
            id: Some(1),
            name: Some("张三".to_string()),
            age: Some(25),
            salary: Some(5000.50),
            is_active: Some(true),
        },
        User {
            id: Some(2),
            name: Some("李四".to_string()),
            age: Some(35),
            salary: Some(8000.75),
            is_active: Some(false),
        },
        User {
            id: Some(3),
            name: None,
            age: None,
            salary: None,
            is_active: None,
        },
    ];

    // Example 1: one record, one clause
    println!("\n1. Single Record");
    println!("----------------");
    let clause = "name = '张三' AND age > 20";
    println!("{}: {}", clause, sqleval::evaluate(&users[0], clause)?);

    // Example 2: a compiled predicate reused across records
    println!("\n2. Filtering");
    println!("------------");
    for clause in [
        "name LIKE '张%' OR salary > 7000",
        "age BETWEEN 20 AND 30",
        "age NOT IN (25, 30)",
        "name IS NULL",
        "",
    ] {
        let predicate = Predicate::parse(clause)?;
        let mut ids = Vec::new();
        for user in &users {
            if predicate.matches(user)? {
                ids.push(user.id);
            }
        }
        println!("{:<36} -> {:?}", format!("{:?}", clause), ids);
    }

    // Example 3: errors are reported, never turned into false
    println!("\n3. Errors");
    println!("---------");
    for clause in ["name > 100", "name CONTAINS '张'", "NOT age = 25", "nickname = 'x'"] {
        match sqleval::evaluate(&users[0], clause) {
            Ok(matched) => println!("{}: {}", clause, matched),
            Err(e) => println!("{}: {}", clause, e),
        }
    }

    Ok(())
}
