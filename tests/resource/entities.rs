use rowkit::Entity;
use rust_decimal::Decimal;
use time::PrimitiveDateTime;
use uuid::Uuid;

#[derive(Entity, Default, Debug, Clone, PartialEq)]
#[table(name = "People")]
pub struct Person {
    #[id(name = "Id")]
    pub id: i32,
    #[column(name = "Name")]
    pub name: Option<String>,
    #[column(name = "Age")]
    pub age: i16,
    #[column(name = "Active")]
    pub active: bool,
    #[column(entity_ref)]
    pub orders: Vec<Order>,
    pub selected: bool,
}

#[derive(Entity, Default, Debug, Clone, PartialEq)]
#[table(name = "Orders")]
pub struct Order {
    #[id(name = "OrderId")]
    pub id: Uuid,
    #[column(name = "Customer")]
    pub customer: i32,
    #[column(name = "Total")]
    pub total: Decimal,
    #[column(name = "PlacedAt")]
    pub placed_at: Option<PrimitiveDateTime>,
}

/// Declared table without identifier.
#[derive(Entity, Default, Debug)]
#[table]
pub struct Note {
    #[column]
    pub title: String,
    #[column]
    pub body: Option<String>,
}

#[derive(Entity, Default, Debug)]
pub struct Undeclared {
    #[id]
    pub id: i32,
}

#[derive(Entity, Default, Debug)]
#[table(name = "")]
pub struct Unnamed {
    #[id]
    pub id: i32,
}

#[derive(Entity, Default, Debug)]
#[table(name = "Pairs")]
pub struct Pair {
    #[id(name = "Left")]
    pub left: i32,
    #[id(name = "Right")]
    pub right: i32,
}
