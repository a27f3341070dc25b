use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::record::{Field, Fixed, Record, ViewKind};

/// How a rule detects its field on a line.
pub enum Matcher {
    /// Case-insensitive substring test; stored pre-lowercased.
    Literal(String),
    /// Ordered pattern list; the first pattern that matches wins and its
    /// group 1 is the captured value.
    Patterns(Vec<Regex>),
}

/// One entry of the field rule table.
///
/// A rule without a target is a stop-sentinel: its match carries no
/// assignment but ends the document scan.
pub struct Rule {
    pub target: Option<Field>,
    pub matcher: Matcher,
    pub fixed: Option<Fixed>,
    pub overwrite: bool,
}

impl Rule {
    fn literal(target: Field, needle: &str) -> Self {
        Self {
            target: Some(target),
            matcher: Matcher::Literal(needle.to_lowercase()),
            fixed: None,
            overwrite: false,
        }
    }

    fn patterns(target: Field, patterns: &[&str]) -> Self {
        Self {
            target: Some(target),
            matcher: compile(patterns),
            fixed: None,
            overwrite: false,
        }
    }

    fn sentinel(patterns: &[&str]) -> Self {
        Self {
            target: None,
            matcher: compile(patterns),
            fixed: None,
            overwrite: false,
        }
    }

    fn set(mut self, value: i64) -> Self {
        self.fixed = Some(Fixed::Int(value));
        self
    }

    fn set_view(mut self, view: ViewKind) -> Self {
        self.fixed = Some(Fixed::View(view));
        self
    }

    fn overwriting(mut self) -> Self {
        self.overwrite = true;
        self
    }

    /// Apply this rule to one line. Returns true when the matcher fired,
    /// whether or not a field changed. `lower` is the pre-lowercased line.
    pub fn apply(&self, rec: &mut Record, line: &str, lower: &str) -> bool {
        if let Some(field) = self.target {
            if !self.overwrite && field.is_set(rec) {
                return false;
            }
        }

        let capture = match &self.matcher {
            Matcher::Literal(needle) => {
                if !lower.contains(needle.as_str()) {
                    return false;
                }
                None
            }
            Matcher::Patterns(patterns) => {
                let Some(caps) = patterns.iter().find_map(|re| re.captures(line)) else {
                    return false;
                };
                Some(caps.get(1).map(|g| g.as_str().to_string()).unwrap_or_default())
            }
        };

        if let Some(field) = self.target {
            match (self.fixed, capture) {
                (Some(fixed), _) => field.assign(rec, fixed),
                (None, Some(text)) => field.capture(rec, &text),
                (None, None) => field.assign(rec, Fixed::Int(1)),
            }
            debug!("  found: {} = {} ({})", field.name(), field.display(rec), line);
        }
        true
    }
}

fn compile(patterns: &[&str]) -> Matcher {
    Matcher::Patterns(
        patterns
            .iter()
            .map(|p| Regex::new(p).expect("invalid rule pattern"))
            .collect(),
    )
}

static RULES: LazyLock<Vec<Rule>> = LazyLock::new(build_rules);

/// The field rule table, consulted strictly in declaration order.
pub fn rules() -> &'static [Rule] {
    &RULES
}

fn build_rules() -> Vec<Rule> {
    vec![
        Rule::patterns(Field::Sqm, &[r"Квадратура: (\d+) кв\.м", r"(\d+) sq\.m"]),
        Rule::patterns(Field::Rooms, &[r"(\d+)-СТАЕН"]),
        Rule::patterns(Field::Rooms, &[r"(?i)МНОГОСТАЕН"]).set(5),
        Rule::patterns(Field::Bedrooms, &[r"(?i)(\d+) Bedrooms", r"(?i)(\d+)-bedroom"]),
        Rule::patterns(
            Field::Elevator,
            &[
                r"(?i)[ >,.](Асансьор)[ <,.]",
                r"(?i)[ >,](lift)[ <,.]",
                r"(?i)[ >,](elevator)[ <,.]",
            ],
        )
        .set(1),
        Rule::literal(Field::Internet, "Интернет връзка"),
        Rule::literal(Field::Internet, "internet"),
        Rule::literal(Field::Luxe, "Лукс</div>"),
        Rule::literal(Field::Garage, "гараж</div>"),
        Rule::literal(Field::Garage, "гараж в цената"),
        Rule::literal(Field::Garage, "garage"),
        Rule::literal(Field::Parkslot, "паркомясто</div>"),
        Rule::literal(Field::Parkslot, "parking"),
        Rule::literal(Field::Parkslot, "no parking").set(0).overwriting(),
        Rule::literal(Field::Parkslot, "underground parking").set(1).overwriting(),
        Rule::literal(Field::Park, "park environment").set(1),
        Rule::patterns(Field::Park, &[r"(?i)[ ,>](park)[ ,.<]", r"(?i)[ ,>](парк)[ ,.<]"]).set(1),
        Rule::patterns(Field::Garden, &[r"(?i)[ ,>](garden)[ ,.<]"]).set(1),
        Rule::patterns(
            Field::District,
            &[
                r"град София, (\S+)",
                r"Bulgaria, Sofia, ([\S ]+?), ",
                r"(?i)/ DISTRICT (.*?)[</]",
                r"(?i)Location: (\S+\s+)district",
            ],
        ),
        Rule::patterns(Field::Street, &[r"[ >]?б*ул\.\s+(.*?)[<,]"]),
        Rule::patterns(Field::StreetFull, &[r"[ >]?(б*ул\..*?)[<,]"]),
        Rule::patterns(
            Field::Subway,
            &[
                r"(?i)(метростанция)",
                r"(?i)(metrostantsiya)",
                r"(?i)[ >,.](metro)[ <,.]",
                r"(?i)(subway)",
                r"(?i)(Metrostatio)",
            ],
        )
        .set(1),
        Rule::patterns(Field::City, &[r#""град (\S*)""#]).overwriting(),
        Rule::patterns(
            Field::Price,
            &[
                r"([\d ]*\d+) EUR<",
                r"&euro; ([\d ]*\d+)",
                r"curr_conv\S*\s*([\d ]*\d+)",
            ],
        )
        .overwriting(),
        Rule::patterns(Field::PriceWoVat, &[r"([\d ]*\d+) without VAT"]),
        Rule::patterns(
            Field::Floor,
            &[
                r"Етаж: (\d+)-\Sи от \d+",
                r"Floor: (\d+)",
                r"Floors: (\d+)",
                r"(?i)(\d+)\S*\s+floor",
                r"(?i)(\d+)/\d+ floor",
            ],
        ),
        Rule::patterns(
            Field::FloorMax,
            &[
                r"Етаж: \d+-\Sи от (\d+)",
                r"Floor: \d+ / (\d+)",
                r"(?i)\d+/(\d+) floor",
                r"(\d+)-storey",
            ],
        ),
        Rule::literal(Field::Furniture, " Обзаведен</div>"),
        Rule::literal(Field::Furniture, " with furniture"),
        Rule::literal(Field::Furniture, "partly furnished").set(0).overwriting(),
        Rule::literal(Field::Furniture, "fully furnished").set(1).overwriting(),
        Rule::literal(Field::Cozy, "cozy"),
        Rule::literal(Field::Cozy, "coziness"),
        Rule::patterns(Field::Pool, &[r"(?i)[ ,>](pool)[ ,.<]", r"(?i)[ ,>](swimming)[ ,.<]"]).set(1),
        Rule::patterns(Field::Calm, &[r"(?i)[ ,>](calm)", r"(?i)[ ,>](quiet)"]).set(1),
        Rule::patterns(Field::Fireplace, &[r"(?i)[ ,>](fireplace)"]).set(1),
        Rule::patterns(Field::Unique, &[r"(?i)[ ,>](unique)"]).set(1),
        Rule::patterns(Field::Luxury, &[r"(?i)[ ,>](luxury)"]).set(1),
        Rule::patterns(Field::Prestigious, &[r"(?i)[ ,>](prestigious)"]).set(1),
        Rule::patterns(Field::Renovated, &[r"(?i)[ ,>](renovated)"]).set(1),
        Rule::patterns(Field::Gym, &[r"(?i)[ ,>](gym)[ ,.<]"]).set(1),
        Rule::patterns(Field::Restaurants, &[r"(?i)[ ,>](restaurant)"]).set(1),
        Rule::patterns(
            Field::Location,
            &[
                r"(?i)good\s+(location)",
                r"(?i)wonderful\s+(location)",
                r"(?i)great\s+(location)",
                r"(?i)top\s+(location)",
                r"(?i)excellent\s+(location)",
                r"(?i)strategic\s+(location)",
                r"(?i)prestigious\s+(location)",
                r"(?i)communicative\s+(location)",
                r"(?i)(the location of the property)",
                r"(?i)(the location is)",
                r"(?i)(is its location)",
                r"(?i)(central location)",
                r"(?i)(the location has)",
                r"(?i)(топ локацция)",
                r"(?i)unique\s+(location)",
            ],
        )
        .set(1),
        Rule::literal(Field::Location, "Search by basic location").set(0).overwriting(),
        Rule::patterns(Field::Mall, &[r"(?i)[ ,.>](mall)[ ,.<]"]).set(1),
        Rule::patterns(Field::Supermarket, &[r"(?i)[ ,.>](supermarket)[ ,.<]"]).set(1),
        Rule::patterns(Field::Transport, &[r"(?i)[ ,>](transport)[ ,.<]"]).set(1),
        Rule::patterns(Field::Leisure, &[r"(?i)[ ,>](leisure)[ ,.<]"]).set(1),
        Rule::literal(Field::Balcony, " тераса"),
        Rule::literal(Field::Balcony, " терасите"),
        Rule::literal(Field::Balcony, " балкон"),
        Rule::literal(Field::Balcony, "terrace"),
        Rule::literal(Field::Balcony, "balcony"),
        Rule::literal(Field::View, " гледка").set_view(ViewKind::View),
        Rule::literal(Field::View, " гледки").set_view(ViewKind::View),
        Rule::literal(Field::View, "гледка към Витоша").set_view(ViewKind::RockView).overwriting(),
        Rule::literal(Field::View, " планината").set_view(ViewKind::RockView).overwriting(),
        Rule::literal(Field::View, " околностите").set_view(ViewKind::Panorama).overwriting(),
        Rule::literal(Field::View, " панорама").set_view(ViewKind::Panorama).overwriting(),
        Rule::literal(Field::View, " панорамни").set_view(ViewKind::Panorama).overwriting(),
        Rule::literal(Field::View, "great view").set_view(ViewKind::View),
        Rule::literal(Field::View, "amazing view").set_view(ViewKind::View),
        Rule::literal(Field::View, "nice view").set_view(ViewKind::View),
        Rule::literal(Field::View, "beautiful views").set_view(ViewKind::View),
        Rule::literal(Field::View, "panoramic").set_view(ViewKind::Panorama).overwriting(),
        Rule::literal(Field::View, "panoramik").set_view(ViewKind::Panorama).overwriting(),
        Rule::patterns(Field::View, &[r"(?i)(view.*?mountain)", r"(?i)(mountain.*?view)"])
            .set_view(ViewKind::RockView)
            .overwriting(),
        Rule::sentinel(&[r"Contact us", r"За контакти:<"]),
    ]
}

// ── Tests ──
