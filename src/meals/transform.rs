use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use time::{Date, Month};

use super::normalize::RawMealRecord;
use super::repo_types::NewMeal;

/// `casOdhlaseni` value meaning the order has no cutoff.
pub const NO_CUTOFF_SENTINEL: &str = "9999-12-31T00:00:00";
pub const DEFAULT_DATABASE_SOURCE: &str = "S4";
const MIN_NAME_CHARS: usize = 2;

/// Map a vendor record onto the stored meal shape.
///
/// Name, slot code and date form the natural key and are checked strictly:
/// a record missing any of them is dropped. Price and source fall back to
/// defaults instead.
pub fn transform(raw: &RawMealRecord) -> Option<NewMeal> {
    let name = raw
        .nazev
        .as_deref()
        .filter(|n| n.chars().count() >= MIN_NAME_CHARS)?;
    let meal_type = raw.druh.as_deref().filter(|t| !t.is_empty())?;
    let date = parse_vendor_date(raw.datum.as_deref()?)?;

    Some(NewMeal {
        date,
        meal_type: meal_type.to_string(),
        name: name.to_string(),
        price: parse_price(raw.cena.as_deref()),
        database_source: raw
            .databaze
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_DATABASE_SOURCE)
            .to_string(),
        order_end_time: raw
            .cas_odhlaseni
            .as_deref()
            .filter(|t| !t.is_empty() && *t != NO_CUTOFF_SENTINEL)
            .map(str::to_string),
        is_ordered: raw
            .pocet
            .as_deref()
            .and_then(|p| p.trim().parse::<f64>().ok())
            .is_some_and(|p| p > 0.0),
    })
}

/// `DD.MM.YYYY` only; anything else, including impossible days, is rejected.
pub(crate) fn parse_vendor_date(s: &str) -> Option<Date> {
    lazy_static! {
        static ref VENDOR_DATE_RE: Regex = Regex::new(r"^([0-9]{2})\.([0-9]{2})\.([0-9]{4})$").unwrap();
    }
    let caps = VENDOR_DATE_RE.captures(s)?;
    let day: u8 = caps[1].parse().ok()?;
    let month: u8 = caps[2].parse().ok()?;
    let year: i32 = caps[3].parse().ok()?;
    Date::from_calendar_date(year, Month::try_from(month).ok()?, day).ok()
}

fn parse_price(raw: Option<&str>) -> Decimal {
    let mut price = raw
        .map(|s| s.trim().replace(',', "."))
        .and_then(|s| Decimal::from_str(&s).ok())
        .filter(|p| !p.is_sign_negative())
        .unwrap_or(Decimal::ZERO);
    price.rescale(2);
    price
}
