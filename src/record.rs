use std::collections::HashSet;

/// View quality category; only its ordinal matters, as a scoring multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewKind {
    #[default]
    None,
    View,
    Panorama,
    RockView,
}

impl ViewKind {
    pub fn rank(self) -> i64 {
        match self {
            ViewKind::None => 0,
            ViewKind::View => 1,
            ViewKind::Panorama => 2,
            ViewKind::RockView => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ViewKind::None => "-",
            ViewKind::View => "View",
            ViewKind::Panorama => "Panorama",
            ViewKind::RockView => "Rock View",
        }
    }
}

/// One listing under analysis: identity, extracted attributes, images, score.
///
/// Created at identity assignment, mutated during a single extraction pass
/// over one document, finalized by normalization, then read-only except for
/// the score.
#[derive(Debug, Clone, Default)]
pub struct Record {
    pub id: usize,
    pub url: String,
    pub score: f64,

    pub district: String,
    pub country: String,
    pub city: String,
    pub street: String,
    pub street_full: String,

    pub subway: i64,
    pub price: f64,
    pub price_wo_vat: i64,
    pub rooms: i64,
    pub bedrooms: i64,
    pub sqm: i64,
    pub location: i64,
    pub mall: i64,
    pub supermarket: i64,
    pub transport: i64,
    pub leisure: i64,
    pub pool: i64,
    pub calm: i64,
    pub fireplace: i64,
    pub unique: i64,
    pub luxury: i64,
    pub prestigious: i64,
    pub renovated: i64,
    pub gym: i64,
    pub restaurants: i64,
    pub floor: i64,
    pub floor_max: i64,
    pub elevator: i64,
    pub internet: i64,
    pub luxe: i64,
    pub view: ViewKind,
    pub balcony: i64,
    pub park: i64,
    pub garden: i64,
    pub garage: i64,
    pub parkslot: i64,
    pub furniture: i64,
    pub cozy: i64,
    pub distance: f64,

    pub images: Vec<String>,
    pub seen_images: HashSet<String>,
}

impl Record {
    pub fn new(id: usize, url: impl Into<String>) -> Self {
        Self {
            id,
            url: url.into(),
            country: "България".to_string(),
            city: "Sofia".to_string(),
            ..Self::default()
        }
    }
}

/// Every field the rule table or the scorer can address, with typed
/// accessors instead of lookup-by-string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Sqm,
    Rooms,
    Bedrooms,
    Elevator,
    Internet,
    Luxe,
    Garage,
    Parkslot,
    Park,
    Garden,
    District,
    Street,
    StreetFull,
    Subway,
    City,
    Price,
    PriceWoVat,
    Floor,
    FloorMax,
    Furniture,
    Cozy,
    Pool,
    Calm,
    Fireplace,
    Unique,
    Luxury,
    Prestigious,
    Renovated,
    Gym,
    Restaurants,
    Supermarket,
    Location,
    Mall,
    Transport,
    Leisure,
    Balcony,
    View,
    Distance,
}

/// Constant a rule assigns instead of its capture.
#[derive(Debug, Clone, Copy)]
pub enum Fixed {
    Int(i64),
    View(ViewKind),
}

/// Read-only snapshot of one field's current value.
pub enum Value<'a> {
    Int(i64),
    Float(f64),
    Text(&'a str),
    View(ViewKind),
}

enum Slot<'a> {
    Int(&'a mut i64),
    Float(&'a mut f64),
    Text(&'a mut String),
    View(&'a mut ViewKind),
}

impl Field {
    pub fn name(self) -> &'static str {
        match self {
            Field::Sqm => "sqm",
            Field::Rooms => "rooms",
            Field::Bedrooms => "bedrooms",
            Field::Elevator => "elevator",
            Field::Internet => "internet",
            Field::Luxe => "luxe",
            Field::Garage => "garage",
            Field::Parkslot => "parkslot",
            Field::Park => "park",
            Field::Garden => "garden",
            Field::District => "district",
            Field::Street => "street",
            Field::StreetFull => "street_full",
            Field::Subway => "subway",
            Field::City => "city",
            Field::Price => "price",
            Field::PriceWoVat => "price_wo_vat",
            Field::Floor => "floor",
            Field::FloorMax => "floor_max",
            Field::Furniture => "furniture",
            Field::Cozy => "cozy",
            Field::Pool => "pool",
            Field::Calm => "calm",
            Field::Fireplace => "fireplace",
            Field::Unique => "unique",
            Field::Luxury => "luxury",
            Field::Prestigious => "prestigious",
            Field::Renovated => "renovated",
            Field::Gym => "gym",
            Field::Restaurants => "restaurants",
            Field::Supermarket => "supermarket",
            Field::Location => "location",
            Field::Mall => "mall",
            Field::Transport => "transport",
            Field::Leisure => "leisure",
            Field::Balcony => "balcony",
            Field::View => "view",
            Field::Distance => "distance",
        }
    }

    pub fn peek(self, rec: &Record) -> Value<'_> {
        match self {
            Field::Sqm => Value::Int(rec.sqm),
            Field::Rooms => Value::Int(rec.rooms),
            Field::Bedrooms => Value::Int(rec.bedrooms),
            Field::Elevator => Value::Int(rec.elevator),
            Field::Internet => Value::Int(rec.internet),
            Field::Luxe => Value::Int(rec.luxe),
            Field::Garage => Value::Int(rec.garage),
            Field::Parkslot => Value::Int(rec.parkslot),
            Field::Park => Value::Int(rec.park),
            Field::Garden => Value::Int(rec.garden),
            Field::District => Value::Text(&rec.district),
            Field::Street => Value::Text(&rec.street),
            Field::StreetFull => Value::Text(&rec.street_full),
            Field::Subway => Value::Int(rec.subway),
            Field::City => Value::Text(&rec.city),
            Field::Price => Value::Float(rec.price),
            Field::PriceWoVat => Value::Int(rec.price_wo_vat),
            Field::Floor => Value::Int(rec.floor),
            Field::FloorMax => Value::Int(rec.floor_max),
            Field::Furniture => Value::Int(rec.furniture),
            Field::Cozy => Value::Int(rec.cozy),
            Field::Pool => Value::Int(rec.pool),
            Field::Calm => Value::Int(rec.calm),
            Field::Fireplace => Value::Int(rec.fireplace),
            Field::Unique => Value::Int(rec.unique),
            Field::Luxury => Value::Int(rec.luxury),
            Field::Prestigious => Value::Int(rec.prestigious),
            Field::Renovated => Value::Int(rec.renovated),
            Field::Gym => Value::Int(rec.gym),
            Field::Restaurants => Value::Int(rec.restaurants),
            Field::Supermarket => Value::Int(rec.supermarket),
            Field::Location => Value::Int(rec.location),
            Field::Mall => Value::Int(rec.mall),
            Field::Transport => Value::Int(rec.transport),
            Field::Leisure => Value::Int(rec.leisure),
            Field::Balcony => Value::Int(rec.balcony),
            Field::View => Value::View(rec.view),
            Field::Distance => Value::Float(rec.distance),
        }
    }

    fn slot(self, rec: &mut Record) -> Slot<'_> {
        match self {
            Field::Sqm => Slot::Int(&mut rec.sqm),
            Field::Rooms => Slot::Int(&mut rec.rooms),
            Field::Bedrooms => Slot::Int(&mut rec.bedrooms),
            Field::Elevator => Slot::Int(&mut rec.elevator),
            Field::Internet => Slot::Int(&mut rec.internet),
            Field::Luxe => Slot::Int(&mut rec.luxe),
            Field::Garage => Slot::Int(&mut rec.garage),
            Field::Parkslot => Slot::Int(&mut rec.parkslot),
            Field::Park => Slot::Int(&mut rec.park),
            Field::Garden => Slot::Int(&mut rec.garden),
            Field::District => Slot::Text(&mut rec.district),
            Field::Street => Slot::Text(&mut rec.street),
            Field::StreetFull => Slot::Text(&mut rec.street_full),
            Field::Subway => Slot::Int(&mut rec.subway),
            Field::City => Slot::Text(&mut rec.city),
            Field::Price => Slot::Float(&mut rec.price),
            Field::PriceWoVat => Slot::Int(&mut rec.price_wo_vat),
            Field::Floor => Slot::Int(&mut rec.floor),
            Field::FloorMax => Slot::Int(&mut rec.floor_max),
            Field::Furniture => Slot::Int(&mut rec.furniture),
            Field::Cozy => Slot::Int(&mut rec.cozy),
            Field::Pool => Slot::Int(&mut rec.pool),
            Field::Calm => Slot::Int(&mut rec.calm),
            Field::Fireplace => Slot::Int(&mut rec.fireplace),
            Field::Unique => Slot::Int(&mut rec.unique),
            Field::Luxury => Slot::Int(&mut rec.luxury),
            Field::Prestigious => Slot::Int(&mut rec.prestigious),
            Field::Renovated => Slot::Int(&mut rec.renovated),
            Field::Gym => Slot::Int(&mut rec.gym),
            Field::Restaurants => Slot::Int(&mut rec.restaurants),
            Field::Supermarket => Slot::Int(&mut rec.supermarket),
            Field::Location => Slot::Int(&mut rec.location),
            Field::Mall => Slot::Int(&mut rec.mall),
            Field::Transport => Slot::Int(&mut rec.transport),
            Field::Leisure => Slot::Int(&mut rec.leisure),
            Field::Balcony => Slot::Int(&mut rec.balcony),
            Field::View => Slot::View(&mut rec.view),
            Field::Distance => Slot::Float(&mut rec.distance),
        }
    }

    /// Truthy test: zero, empty, and the `-` placeholder all count as unset.
    pub fn is_set(self, rec: &Record) -> bool {
        match self.peek(rec) {
            Value::Int(n) => n != 0,
            Value::Float(x) => x != 0.0,
            Value::Text(s) => !s.is_empty() && s != "-",
            Value::View(v) => v != ViewKind::None,
        }
    }

    pub fn numeric(self, rec: &Record) -> f64 {
        match self.peek(rec) {
            Value::Int(n) => n as f64,
            Value::Float(x) => x,
            Value::Text(_) => 0.0,
            Value::View(v) => v.rank() as f64,
        }
    }

    /// Assign a captured substring. Numeric fields tolerate embedded
    /// thousands spaces; a capture that still fails to parse is dropped and
    /// the field stays as it was.
    pub fn capture(self, rec: &mut Record, text: &str) {
        match self.slot(rec) {
            Slot::Int(slot) => {
                if let Ok(n) = text.trim().replace(' ', "").parse::<i64>() {
                    *slot = n;
                }
            }
            Slot::Float(slot) => {
                if let Ok(x) = text.trim().replace(' ', "").parse::<f64>() {
                    *slot = x;
                }
            }
            Slot::Text(slot) => *slot = text.to_string(),
            Slot::View(_) => {}
        }
    }

    pub fn assign(self, rec: &mut Record, fixed: Fixed) {
        match (self.slot(rec), fixed) {
            (Slot::Int(slot), Fixed::Int(n)) => *slot = n,
            (Slot::Float(slot), Fixed::Int(n)) => *slot = n as f64,
            (Slot::View(slot), Fixed::View(v)) => *slot = v,
            _ => {}
        }
    }

    /// Current value as display text, for debug logging.
    pub fn display(self, rec: &Record) -> String {
        match self.peek(rec) {
            Value::Int(n) => n.to_string(),
            Value::Float(x) => x.to_string(),
            Value::Text(s) => s.to_string(),
            Value::View(v) => v.label().to_string(),
        }
    }
}
