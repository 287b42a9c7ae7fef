//! Classification of style properties ("tracks") into blendable and stepped ones.

use lazy_static::lazy_static;
use std::collections::HashSet;

/// How a tween drives its track.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TrackKind {
    /// Values are blended every frame.
    Continuous,
    /// The property has exactly two states and jumps from `from` to `to` once the curve crosses
    /// the start of the transition window. It is never written an intermediate value.
    Discrete,
}

impl TrackKind {
    pub fn of(track: &str) -> Self {
        if is_interpolatable(track) {
            Self::Continuous
        } else {
            Self::Discrete
        }
    }
}

/// Returns `true` if the style property supports numeric or multi-value interpolation.
///
/// Both the kebab-case (`border-top-width`) and camelCase (`borderTopWidth`) spellings are
/// recognized. Anything else, including unknown and custom properties, is discrete.
pub fn is_interpolatable(track: &str) -> bool {
    INTERPOLATABLE.contains(track)
}

const INTERPOLATABLE_PROPERTIES: &[&str] = &[
    "backdrop-filter",
    "background",
    "background-color",
    "background-position",
    "background-position-x",
    "background-position-y",
    "background-size",
    "block-size",
    "border",
    "border-block-end",
    "border-block-end-color",
    "border-block-end-width",
    "border-block-start",
    "border-block-start-color",
    "border-block-start-width",
    "border-bottom",
    "border-bottom-color",
    "border-bottom-left-radius",
    "border-bottom-right-radius",
    "border-bottom-width",
    "border-color",
    "border-end-end-radius",
    "border-end-start-radius",
    "border-image-outset",
    "border-image-slice",
    "border-image-width",
    "border-inline-end",
    "border-inline-end-color",
    "border-inline-end-width",
    "border-inline-start",
    "border-inline-start-color",
    "border-inline-start-width",
    "border-left",
    "border-left-color",
    "border-left-width",
    "border-radius",
    "border-right",
    "border-right-color",
    "border-right-width",
    "border-spacing",
    "border-start-end-radius",
    "border-start-start-radius",
    "border-top",
    "border-top-color",
    "border-top-left-radius",
    "border-top-right-radius",
    "border-top-width",
    "border-width",
    "bottom",
    "box-shadow",
    "caret-color",
    "clip",
    "clip-path",
    "color",
    "column-count",
    "column-gap",
    "column-rule",
    "column-rule-color",
    "column-rule-width",
    "column-width",
    "columns",
    "filter",
    "flex",
    "flex-basis",
    "flex-grow",
    "flex-shrink",
    "font",
    "font-size",
    "font-size-adjust",
    "font-stretch",
    "font-variation-settings",
    "font-weight",
    "gap",
    "grid-area",
    "grid-auto-columns",
    "grid-auto-rows",
    "grid-column-gap",
    "grid-gap",
    "grid-row-gap",
    "grid-template-columns",
    "grid-template-rows",
    "height",
    "inline-size",
    "inset",
    "inset-block",
    "inset-block-end",
    "inset-block-start",
    "inset-inline",
    "inset-inline-end",
    "inset-inline-start",
    "left",
    "letter-spacing",
    "line-clamp",
    "line-height",
    "margin",
    "margin-block-end",
    "margin-block-start",
    "margin-bottom",
    "margin-inline-end",
    "margin-inline-start",
    "margin-left",
    "margin-right",
    "margin-top",
    "mask",
    "mask-border",
    "mask-position",
    "mask-size",
    "max-block-size",
    "max-height",
    "max-inline-size",
    "max-lines",
    "max-width",
    "min-block-size",
    "min-height",
    "min-inline-size",
    "min-width",
    "object-position",
    "offset",
    "offset-anchor",
    "offset-distance",
    "offset-path",
    "offset-position",
    "offset-rotate",
    "opacity",
    "order",
    "outline",
    "outline-color",
    "outline-offset",
    "outline-width",
    "padding",
    "padding-block-end",
    "padding-block-start",
    "padding-bottom",
    "padding-inline-end",
    "padding-inline-start",
    "padding-left",
    "padding-right",
    "padding-top",
    "perspective",
    "perspective-origin",
    "right",
    "rotate",
    "row-gap",
    "scale",
    "scroll-margin",
    "scroll-padding",
    "scroll-snap-coordinate",
    "shape-image-threshold",
    "shape-margin",
    "shape-outside",
    "tab-size",
    "text-decoration",
    "text-decoration-color",
    "text-decoration-thickness",
    "text-emphasis",
    "text-emphasis-color",
    "text-indent",
    "text-shadow",
    "text-underline-offset",
    "top",
    "transform",
    "transform-origin",
    "translate",
    "vertical-align",
    "visibility",
    "width",
    "word-spacing",
    "z-index",
    "zoom",
];

lazy_static! {
    static ref INTERPOLATABLE: HashSet<String> = INTERPOLATABLE_PROPERTIES
        .iter()
        .flat_map(|name| [name.to_string(), camel_case(name)])
        .collect();
}

fn camel_case(kebab: &str) -> String {
    let mut out = String::with_capacity(kebab.len());
    let mut upper_next = false;
    for ch in kebab.chars() {
        if ch == '-' {
            upper_next = true;
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_both_spellings() {
        assert!(is_interpolatable("box-shadow"));
        assert!(is_interpolatable("boxShadow"));
        assert!(is_interpolatable("gridTemplateColumns"));
        assert!(is_interpolatable("grid-template-columns"));
        assert!(is_interpolatable("borderTopLeftRadius"));
    }

    #[test]
    fn unknown_and_enumerated_properties_are_discrete() {
        assert_eq!(TrackKind::of("display"), TrackKind::Discrete);
        assert_eq!(TrackKind::of("cursor"), TrackKind::Discrete);
        assert_eq!(TrackKind::of("pointerEvents"), TrackKind::Discrete);
        assert_eq!(TrackKind::of("--custom"), TrackKind::Discrete);
        assert_eq!(TrackKind::of("opacity"), TrackKind::Continuous);
    }

    #[test]
    fn camel_case_conversion() {
        assert_eq!(camel_case("border-top-width"), "borderTopWidth");
        assert_eq!(camel_case("opacity"), "opacity");
    }
}
