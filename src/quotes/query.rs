//! Query functions over the quote collection
//!
//! Everything here is a pure function over an already-loaded list. Matching
//! is case-insensitive and uses Unicode lowercasing, so `"эйнштейн"` finds
//! `"Эйнштейн"`.

use rand::Rng;

use super::{Quote, QuoteId};

/// Keep quotes whose author contains `needle`
pub fn filter_by_author(quotes: Vec<Quote>, needle: &str) -> Vec<Quote> {
    let needle = needle.to_lowercase();
    quotes
        .into_iter()
        .filter(|q| q.author.to_lowercase().contains(&needle))
        .collect()
}

/// Keep quotes whose text or author contains `term`
pub fn search(quotes: Vec<Quote>, term: &str) -> Vec<Quote> {
    let term = term.to_lowercase();
    quotes
        .into_iter()
        .filter(|q| q.text.to_lowercase().contains(&term) || q.author.to_lowercase().contains(&term))
        .collect()
}

/// Apply a raw `limit` query value
///
/// Same rules as `slice(0, parseInt(limit))` behind an `isNaN` guard in
/// JavaScript: values that are not numbers at all leave the list untouched,
/// numeric values that have no integer prefix (`Infinity`, `0b11`) keep
/// nothing, and a negative `-k` drops the last `k` entries.
pub fn limit(mut quotes: Vec<Quote>, raw: &str) -> Vec<Quote> {
    if raw.is_empty() || !is_numeric(raw) {
        return quotes;
    }

    let keep = match parse_int(raw) {
        None => 0,
        Some(n) if n >= 0.0 => to_len(n),
        Some(n) => quotes.len().saturating_sub(to_len(-n)),
    };
    quotes.truncate(keep);
    quotes
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_len(n: f64) -> usize {
    // Float to int casts saturate
    n as usize
}

/// Whether JavaScript's `Number(raw)` yields a number rather than `NaN`
fn is_numeric(raw: &str) -> bool {
    let s = raw.trim();
    if s.is_empty() {
        return true;
    }

    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = s.strip_prefix(prefix) {
            return !digits.is_empty() && digits.chars().all(|c| c.is_digit(radix));
        }
    }

    let unsigned = s.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(s);
    unsigned == "Infinity" || is_decimal_literal(unsigned)
}

/// `123`, `1.5`, `.5`, `1.`, `2e3`, `1.5E-2`
fn is_decimal_literal(s: &str) -> bool {
    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());

    let (mantissa, exponent) = match s.find(|c: char| c == 'e' || c == 'E') {
        Some(i) => (&s[..i], Some(&s[i + 1..])),
        None => (s, None),
    };
    let (int, frac) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if (int.is_empty() && frac.is_empty()) || !all_digits(int) || !all_digits(frac) {
        return false;
    }

    exponent.map_or(true, |e| {
        let e = e.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(e);
        !e.is_empty() && all_digits(e)
    })
}

/// JavaScript `parseInt(raw)` without a radix; `None` stands for `NaN`
///
/// Reads the leading integer after optional whitespace and sign, so `"3abc"`
/// and `"3.0"` both give 3. A `0x` prefix switches to hexadecimal.
pub fn parse_int(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let (negative, s) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let (radix, digits) = match s.get(..2) {
        Some("0x" | "0X") => (16, &s[2..]),
        _ => (10, s),
    };

    let mut value: Option<f64> = None;
    for digit in digits.chars().map_while(|c| c.to_digit(radix)) {
        value = Some(value.unwrap_or(0.0).mul_add(f64::from(radix), f64::from(digit)));
    }
    value.map(|v| if negative { -v } else { v })
}

/// Pick one quote uniformly at random
pub fn pick_random(quotes: &[Quote]) -> Option<&Quote> {
    pick_random_with(&mut rand::thread_rng(), quotes)
}

pub fn pick_random_with<'a, R>(rng: &mut R, quotes: &'a [Quote]) -> Option<&'a Quote>
where
    R: Rng + ?Sized,
{
    if quotes.is_empty() {
        return None;
    }
    quotes.get(rng.gen_range(0..quotes.len()))
}

/// Id for a newly created quote: one above the largest existing id, or 1
///
/// Fractional ids count by their floor. `None` when an id lies outside the
/// `i64` range or the next id would overflow it.
pub fn next_id(quotes: &[Quote]) -> Option<QuoteId> {
    let mut max: Option<i64> = None;
    for quote in quotes {
        let id = quote.id.floor()?;
        max = Some(max.map_or(id, |m| m.max(id)));
    }
    max.map_or(Some(1), |m| m.checked_add(1)).map(QuoteId::from)
}

pub fn find_by_id<'a>(quotes: &'a [Quote], raw_id: &str) -> Option<&'a Quote> {
    let id = parse_int(raw_id)?;
    quotes.iter().find(|q| q.id.matches(id))
}

pub fn position_by_id(quotes: &[Quote], raw_id: &str) -> Option<usize> {
    let id = parse_int(raw_id)?;
    quotes.iter().position(|q| q.id.matches(id))
}
