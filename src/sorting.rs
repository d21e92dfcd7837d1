//! Default orderings for routes and locations.

use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::model::{Location, Route};
use crate::power::power_status;

/// Case-insensitive, numeric-aware comparison of two names.
///
/// Digit runs compare by value, so "Route 2" sorts before "Route 10". Names
/// that are equal under that collation fall back to a lowercase comparison
/// and finally a byte comparison, which keeps the ordering total.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let a_lower = a.to_lowercase();
    let b_lower = b.to_lowercase();

    collate(&a_lower, &b_lower)
        .then_with(|| a_lower.cmp(&b_lower))
        .then_with(|| a.cmp(b))
}

fn collate(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) if l.is_ascii_digit() && r.is_ascii_digit() => {
                let l_run = take_digits(&mut left);
                let r_run = take_digits(&mut right);
                let ordering = cmp_digit_runs(&l_run, &r_run);
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            (Some(l), Some(r)) => {
                if l != r {
                    return l.cmp(&r);
                }
                left.next();
                right.next();
            }
        }
    }
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.peek().copied() {
        if !c.is_ascii_digit() {
            break;
        }
        run.push(c);
        chars.next();
    }
    run
}

/// Compares two digit runs by numeric value without parsing, so arbitrarily
/// long runs cannot overflow. "007" and "7" compare equal here.
fn cmp_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Routes sorted by display name using [`natural_cmp`].
pub fn sort_routes(routes: &[Route]) -> Vec<Route> {
    let mut sorted = routes.to_vec();
    sorted.sort_by(|a, b| natural_cmp(&a.route, &b.route));
    sorted
}

/// Default location order for `date`: stops that take deliveries first, then
/// ascending numeric code. Equal keys keep their input order.
pub fn sort_by_power(locations: &[Location], date: NaiveDate) -> Vec<Location> {
    let mut keyed: Vec<_> = locations
        .iter()
        .map(|location| {
            let status = power_status(&location.power_mode, date);
            ((status, location.numeric_code()), location)
        })
        .collect();
    keyed.sort_by_key(|(key, _)| *key);
    keyed.into_iter().map(|(_, location)| location.clone()).collect()
}

/// Locations sorted by numeric code only. Stable.
pub fn sort_by_code(locations: &[Location]) -> Vec<Location> {
    let mut sorted = locations.to_vec();
    sorted.sort_by_key(Location::numeric_code);
    sorted
}
