//! Style values and the blending of one style string into another.
//!
//! A style value is whatever a style property accepts: a bare number (`opacity: 0.5`) or a string
//! such as `"4px"`, `"#777"`, `"scale(1.1, 1.1)"` or `"0px 2px 6px 0px rgba(0,0,0,0.2)"`. To blend
//! two strings, both are split into [`Token`]s of literal text, numbers (with units) and colors.
//! If both sides have the same shape, every number and color is interpolated independently and the
//! string is reassembled; otherwise the value steps from one side to the other at the midpoint.

use crate::interpolation::Lerp;
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A value assigned to a style property, either numeric or textual.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(untagged))]
pub enum StyleValue {
    Number(f64),
    Text(String),
}

impl StyleValue {
    /// Serializes the value the way it is written to a style property. Whole numbers are written
    /// without a fractional part.
    pub fn to_css(&self) -> String {
        match self {
            Self::Number(value) => format_number(*value),
            Self::Text(text) => text.clone(),
        }
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for StyleValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<f32> for StyleValue {
    fn from(value: f32) -> Self {
        Self::Number(value as f64)
    }
}

impl From<i32> for StyleValue {
    fn from(value: i32) -> Self {
        Self::Number(value as f64)
    }
}

/// Formats a number with at most three decimals and no trailing zeros.
pub(crate) fn format_number(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == rounded.trunc() && rounded.abs() < 1e15 {
        format!("{}", rounded as i64)
    } else {
        format!("{rounded}")
    }
}

/// An RGBA color with 8-bit channels and a normalized alpha.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parses a hex (`#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`), functional (`rgb()`, `rgba()`) or
    /// named color. Returns `None` if the whole input is not a single color.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if let Some(hex) = input.strip_prefix('#') {
            return parse_hex(hex);
        }
        if let Some(open) = input.find('(') {
            let name = input[..open].trim().to_ascii_lowercase();
            let args = input[open + 1..].strip_suffix(')')?;
            return match name.as_str() {
                "rgb" | "rgba" => parse_rgb_args(args),
                _ => None,
            };
        }
        named_color(input)
    }

    pub fn to_css(&self) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            self.r,
            self.g,
            self.b,
            format_number(self.a as f64)
        )
    }
}

impl Lerp for Rgba {
    fn lerp(&self, y1: &Self, x: f32) -> Self {
        Self {
            r: self.r.lerp(&y1.r, x),
            g: self.g.lerp(&y1.g, x),
            b: self.b.lerp(&y1.b, x),
            a: self.a.lerp(&y1.a, x).clamp(0.0, 1.0),
        }
    }
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|d| d * 17);
    let pair = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        3 => Some(Rgba::new(digit(0)?, digit(1)?, digit(2)?, 1.0)),
        4 => Some(Rgba::new(
            digit(0)?,
            digit(1)?,
            digit(2)?,
            digit(3)? as f32 / 255.0,
        )),
        6 => Some(Rgba::new(pair(0)?, pair(2)?, pair(4)?, 1.0)),
        8 => Some(Rgba::new(pair(0)?, pair(2)?, pair(4)?, pair(6)? as f32 / 255.0)),
        _ => None,
    }
}

fn parse_rgb_args(args: &str) -> Option<Rgba> {
    let parts = args
        .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>();
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }
    let channel = |part: &str| -> Option<u8> {
        let value = match part.strip_suffix('%') {
            Some(percent) => percent.parse::<f32>().ok()? * 2.55,
            None => part.parse::<f32>().ok()?,
        };
        Some(value.round().clamp(0.0, 255.0) as u8)
    };
    let alpha = match parts.get(3) {
        Some(part) => match part.strip_suffix('%') {
            Some(percent) => percent.parse::<f32>().ok()? / 100.0,
            None => part.parse::<f32>().ok()?,
        },
        None => 1.0,
    };
    Some(Rgba::new(
        channel(parts[0])?,
        channel(parts[1])?,
        channel(parts[2])?,
        alpha.clamp(0.0, 1.0),
    ))
}

lazy_static! {
    static ref NAMED_COLORS: HashMap<&'static str, Rgba> = HashMap::from([
        ("transparent", Rgba::new(0, 0, 0, 0.0)),
        ("black", Rgba::new(0, 0, 0, 1.0)),
        ("white", Rgba::new(255, 255, 255, 1.0)),
        ("red", Rgba::new(255, 0, 0, 1.0)),
        ("green", Rgba::new(0, 128, 0, 1.0)),
        ("blue", Rgba::new(0, 0, 255, 1.0)),
        ("yellow", Rgba::new(255, 255, 0, 1.0)),
        ("cyan", Rgba::new(0, 255, 255, 1.0)),
        ("aqua", Rgba::new(0, 255, 255, 1.0)),
        ("magenta", Rgba::new(255, 0, 255, 1.0)),
        ("fuchsia", Rgba::new(255, 0, 255, 1.0)),
        ("gray", Rgba::new(128, 128, 128, 1.0)),
        ("grey", Rgba::new(128, 128, 128, 1.0)),
        ("silver", Rgba::new(192, 192, 192, 1.0)),
        ("maroon", Rgba::new(128, 0, 0, 1.0)),
        ("olive", Rgba::new(128, 128, 0, 1.0)),
        ("lime", Rgba::new(0, 255, 0, 1.0)),
        ("teal", Rgba::new(0, 128, 128, 1.0)),
        ("navy", Rgba::new(0, 0, 128, 1.0)),
        ("purple", Rgba::new(128, 0, 128, 1.0)),
        ("orange", Rgba::new(255, 165, 0, 1.0)),
        ("pink", Rgba::new(255, 192, 203, 1.0)),
        ("brown", Rgba::new(165, 42, 42, 1.0)),
        ("gold", Rgba::new(255, 215, 0, 1.0)),
        ("indigo", Rgba::new(75, 0, 130, 1.0)),
        ("violet", Rgba::new(238, 130, 238, 1.0)),
    ]);
}

fn named_color(name: &str) -> Option<Rgba> {
    NAMED_COLORS.get(name.to_ascii_lowercase().as_str()).copied()
}

/// One lexical piece of a style value.
#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    Text(String),
    Number { value: f32, unit: String },
    Color(Rgba),
}

impl Token {
    fn can_blend(&self, other: &Token) -> bool {
        match (self, other) {
            (Token::Text(a), Token::Text(b)) => without_whitespace(a) == without_whitespace(b),
            (Token::Number { unit: a, .. }, Token::Number { unit: b, .. }) => {
                a == b || a.is_empty() || b.is_empty()
            }
            (Token::Color(_), Token::Color(_)) => true,
            _ => false,
        }
    }

    fn blend(&self, other: &Token, x: f32) -> Token {
        match (self, other) {
            (Token::Number { value: a, unit: ua }, Token::Number { value: b, unit: ub }) => {
                Token::Number {
                    value: a.lerp(b, x),
                    unit: if ub.is_empty() { ua.clone() } else { ub.clone() },
                }
            }
            (Token::Color(a), Token::Color(b)) => Token::Color(a.lerp(b, x)),
            _ => other.clone(),
        }
    }

    fn write_to(&self, out: &mut String) {
        match self {
            Token::Text(text) => out.push_str(text),
            Token::Number { value, unit } => {
                out.push_str(&format_number(*value as f64));
                out.push_str(unit);
            }
            Token::Color(color) => out.push_str(&color.to_css()),
        }
    }
}

fn without_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Splits a style string into text, number and color tokens.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut text = String::new();
    let mut rest = source;

    while let Some(ch) = rest.chars().next() {
        let (token, consumed) = if ch == '#' {
            scan_hex_color(rest)
        } else if ch.is_ascii_alphabetic() || ch == '_' {
            scan_word(rest)
        } else if starts_number(rest) {
            scan_number(rest)
        } else {
            (None, ch.len_utf8())
        };
        match token {
            Some(token) => {
                if !text.is_empty() {
                    tokens.push(Token::Text(std::mem::take(&mut text)));
                }
                tokens.push(token);
            }
            None => text.push_str(&rest[..consumed]),
        }
        rest = &rest[consumed..];
    }
    if !text.is_empty() {
        tokens.push(Token::Text(text));
    }
    tokens
}

fn scan_hex_color(input: &str) -> (Option<Token>, usize) {
    let len = 1 + input[1..]
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .count();
    (parse_hex(&input[1..len]).map(Token::Color), len)
}

fn scan_word(input: &str) -> (Option<Token>, usize) {
    let len = input
        .char_indices()
        .find(|(_, c)| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
        .map(|(i, _)| i)
        .unwrap_or(input.len());
    let word = &input[..len];
    let after = &input[len..];
    if after.starts_with('(') {
        let lower = word.to_ascii_lowercase();
        if lower == "rgb" || lower == "rgba" {
            if let Some(close) = after.find(')') {
                let end = len + close + 1;
                if let Some(color) = Rgba::parse(&input[..end]) {
                    return (Some(Token::Color(color)), end);
                }
            }
        }
        return (None, len);
    }
    (named_color(word).map(Token::Color), len)
}

fn starts_number(input: &str) -> bool {
    let mut chars = input.chars();
    match chars.next() {
        Some(c) if c.is_ascii_digit() => true,
        Some('.') => chars.next().is_some_and(|c| c.is_ascii_digit()),
        Some('-') | Some('+') => match chars.next() {
            Some(c) if c.is_ascii_digit() => true,
            Some('.') => chars.next().is_some_and(|c| c.is_ascii_digit()),
            _ => false,
        },
        _ => false,
    }
}

fn scan_number(input: &str) -> (Option<Token>, usize) {
    let bytes = input.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'-') | Some(b'+')) {
        end += 1;
    }
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
    }
    let number_end = end;
    while end < bytes.len() && (bytes[end].is_ascii_alphabetic() || bytes[end] == b'%') {
        end += 1;
    }
    match input[..number_end].parse::<f32>() {
        Ok(value) => (
            Some(Token::Number {
                value,
                unit: input[number_end..end].to_string(),
            }),
            end,
        ),
        Err(_) => (None, end),
    }
}

/// A style string prepared for blending.
///
/// Lerping two values at exactly `0.0` or `1.0` returns the original strings untouched, so the
/// first and last frames of a tween write exactly what the caller supplied.
#[derive(Clone, Debug)]
pub struct MixValue {
    source: String,
    tokens: Vec<Token>,
}

impl MixValue {
    pub fn parse(source: impl Into<String>) -> Self {
        let source = source.into();
        let tokens = tokenize(&source);
        Self { source, tokens }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Whether the two values have matching shapes and can be interpolated token by token.
    pub fn can_blend(&self, other: &MixValue) -> bool {
        self.tokens.len() == other.tokens.len()
            && self
                .tokens
                .iter()
                .zip(&other.tokens)
                .all(|(a, b)| a.can_blend(b))
    }
}

impl PartialEq for MixValue {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Lerp for MixValue {
    fn lerp(&self, y1: &Self, x: f32) -> Self {
        if x == 0.0 || self == y1 {
            return self.clone();
        }
        if x == 1.0 {
            return y1.clone();
        }
        if !self.can_blend(y1) {
            return if x < 0.5 { self.clone() } else { y1.clone() };
        }
        let tokens = self
            .tokens
            .iter()
            .zip(&y1.tokens)
            .map(|(a, b)| a.blend(b, x))
            .collect::<Vec<_>>();
        let mut source = String::with_capacity(y1.source.len());
        for token in &tokens {
            token.write_to(&mut source);
        }
        Self { source, tokens }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blend(from: &str, to: &str, x: f32) -> String {
        MixValue::parse(from)
            .lerp(&MixValue::parse(to), x)
            .as_str()
            .to_string()
    }

    #[test]
    fn numbers_format_without_trailing_zeros() {
        assert_eq!(StyleValue::from(1.0).to_css(), "1");
        assert_eq!(StyleValue::from(0.25).to_css(), "0.25");
        assert_eq!(StyleValue::from(-3).to_css(), "-3");
        assert_eq!(StyleValue::from("1.0").to_css(), "1.0");
    }

    #[test]
    fn parses_colors() {
        assert_eq!(Rgba::parse("#fff"), Some(Rgba::new(255, 255, 255, 1.0)));
        assert_eq!(Rgba::parse("#777"), Some(Rgba::new(119, 119, 119, 1.0)));
        assert_eq!(Rgba::parse("#ff000080").map(|c| c.r), Some(255));
        assert_eq!(Rgba::parse("rgba(0,0,0,0.2)"), Some(Rgba::new(0, 0, 0, 0.2)));
        assert_eq!(Rgba::parse("rgb(10 20 30)"), Some(Rgba::new(10, 20, 30, 1.0)));
        assert_eq!(Rgba::parse("Red"), Some(Rgba::new(255, 0, 0, 1.0)));
        assert_eq!(Rgba::parse("#ggg"), None);
        assert_eq!(Rgba::parse("hsl(0, 0%, 0%)"), None);
    }

    #[test]
    fn tokenizes_compound_values() {
        let tokens = tokenize("0px 2px 6px 0px rgba(0,0,0,0.1)");

        assert_eq!(tokens.len(), 9);
        assert_eq!(
            tokens[2],
            Token::Number {
                value: 2.0,
                unit: "px".into()
            }
        );
        assert_eq!(tokens[3], Token::Text(" ".into()));
        assert_eq!(tokens[8], Token::Color(Rgba::new(0, 0, 0, 0.1)));
    }

    #[test]
    fn words_containing_digits_stay_text() {
        assert_eq!(
            tokenize("translate3d(-1px, 0, 0)")[0],
            Token::Text("translate3d(".into())
        );
        assert_eq!(
            tokenize("translate3d(-1px, 0, 0)")[1],
            Token::Number {
                value: -1.0,
                unit: "px".into()
            }
        );
    }

    #[test]
    fn blends_lengths() {
        assert_eq!(blend("0px", "10px", 0.5), "5px");
        assert_eq!(blend("0", "10px", 0.25), "2.5px");
        assert_eq!(blend("1", "0", 0.3), "0.7");
    }

    #[test]
    fn blends_functions() {
        assert_eq!(blend("scale(1.0, 1.0)", "scale(1.1, 1.1)", 0.5), "scale(1.05, 1.05)");
    }

    #[test]
    fn blends_colors_across_notations() {
        assert_eq!(blend("black", "#ffffff", 0.5), "rgba(128, 128, 128, 1)");
        assert_eq!(blend("rgba(0,0,0,0)", "red", 0.5), "rgba(128, 0, 0, 0.5)");
    }

    #[test]
    fn endpoints_are_verbatim() {
        assert_eq!(blend("rgb(0, 0, 0)", "red", 0.0), "rgb(0, 0, 0)");
        assert_eq!(blend("rgb(0, 0, 0)", "red", 1.0), "red");
        assert_eq!(blend("1.0", "1.0", 0.4), "1.0");
    }

    #[test]
    fn mismatched_shapes_step_at_midpoint() {
        assert!(!MixValue::parse("auto").can_blend(&MixValue::parse("10px")));
        assert_eq!(blend("auto", "10px", 0.49), "auto");
        assert_eq!(blend("auto", "10px", 0.5), "10px");
        assert_eq!(blend("10px", "50%", 0.2), "10px");
    }

    #[test]
    fn overshoot_extrapolates_numbers_and_saturates_colors() {
        assert_eq!(blend("0px", "10px", 1.1), "11px");
        assert_eq!(blend("black", "white", 1.2), "rgba(255, 255, 255, 1)");
    }
}
