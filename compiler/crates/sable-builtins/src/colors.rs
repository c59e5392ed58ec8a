// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Color helpers.

use sable_ast::expr::BasicLit;
use sable_ast::token::TokenKind;
use sable_parser::builtin::{self, BuiltinError, CallSite};

pub fn register() {
    builtin::register("rgb($red, $green, $blue)", rgb);
    builtin::register("rgba($red, $green, $blue, $alpha: 1)", rgba);
    builtin::register("mix($color1, $color2, $weight: 50%)", mix);
    builtin::register("invert($color)", invert);
}

fn lit(value: String, call: &CallSite) -> BasicLit {
    BasicLit::new(TokenKind::Str, value, call.span)
}

fn arity(call: &CallSite, expected: usize, got: usize) -> BuiltinError {
    BuiltinError::Arity { func: call.name.clone(), expected, got }
}

fn rgb(call: &CallSite, args: &[BasicLit]) -> Result<BasicLit, BuiltinError> {
    let [r, g, b] = args else {
        return Err(arity(call, 3, args.len()));
    };
    Ok(lit(format!("rgb({},{},{})", r.value, g.value, b.value), call))
}

fn rgba(call: &CallSite, args: &[BasicLit]) -> Result<BasicLit, BuiltinError> {
    let [r, g, b, a] = args else {
        return Err(arity(call, 4, args.len()));
    };
    Ok(lit(
        format!("rgba({},{},{},{})", r.value, g.value, b.value, a.value),
        call,
    ))
}

fn mix(call: &CallSite, args: &[BasicLit]) -> Result<BasicLit, BuiltinError> {
    let [c1, c2, weight] = args else {
        return Err(arity(call, 3, args.len()));
    };
    let (r1, g1, b1) = parse_hex(call, &c1.value)?;
    let (r2, g2, b2) = parse_hex(call, &c2.value)?;
    let w = parse_weight(call, &weight.value)?;
    let blend = |x: u8, y: u8| -> u8 {
        (f64::from(x) * w + f64::from(y) * (1.0 - w)).round() as u8
    };
    Ok(lit(
        format!("#{:02x}{:02x}{:02x}", blend(r1, r2), blend(g1, g2), blend(b1, b2)),
        call,
    ))
}

fn invert(call: &CallSite, args: &[BasicLit]) -> Result<BasicLit, BuiltinError> {
    let [color] = args else {
        return Err(arity(call, 1, args.len()));
    };
    let (r, g, b) = parse_hex(call, &color.value)?;
    Ok(lit(format!("#{:02x}{:02x}{:02x}", 255 - r, 255 - g, 255 - b), call))
}

/// `#rgb` or `#rrggbb` → channels.
fn parse_hex(call: &CallSite, value: &str) -> Result<(u8, u8, u8), BuiltinError> {
    let not_a_color = || BuiltinError::NotAColor {
        func: call.name.clone(),
        value: value.to_string(),
    };
    let digits = value.strip_prefix('#').ok_or_else(not_a_color)?;
    let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| not_a_color());
    match digits.len() {
        3 => {
            let mut out = [0u8; 3];
            for (i, ch) in digits.chars().enumerate() {
                let v = channel(&ch.to_string())?;
                out[i] = v * 16 + v;
            }
            Ok((out[0], out[1], out[2]))
        }
        6 => Ok((
            channel(&digits[0..2])?,
            channel(&digits[2..4])?,
            channel(&digits[4..6])?,
        )),
        _ => Err(not_a_color()),
    }
}

/// `50%` or a 0..1 fraction → the first color's share.
fn parse_weight(call: &CallSite, value: &str) -> Result<f64, BuiltinError> {
    let not_a_number = || BuiltinError::NotANumber {
        func: call.name.clone(),
        value: value.to_string(),
    };
    if let Some(pct) = value.strip_suffix('%') {
        let n: f64 = pct.parse().map_err(|_| not_a_number())?;
        Ok(n / 100.0)
    } else {
        value.parse().map_err(|_| not_a_number())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sable_ast::Span;

    fn call(name: &str) -> CallSite {
        CallSite { name: name.to_string(), span: Span::default() }
    }

    fn arg(value: &str) -> BasicLit {
        BasicLit::new(TokenKind::Str, value, Span::default())
    }

    #[test]
    fn rgb_echoes_its_arguments() {
        let out = rgb(&call("rgb"), &[arg("1"), arg("2"), arg("3")]).unwrap();
        assert_eq!(out.value, "rgb(1,2,3)");
    }

    #[test]
    fn rgba_includes_alpha() {
        let out = rgba(&call("rgba"), &[arg("0"), arg("0"), arg("0"), arg("0.5")]).unwrap();
        assert_eq!(out.value, "rgba(0,0,0,0.5)");
    }

    #[test]
    fn mix_blends_evenly_by_default() {
        let out = mix(&call("mix"), &[arg("#ff0000"), arg("#0000ff"), arg("50%")]).unwrap();
        assert_eq!(out.value, "#800080");
    }

    #[test]
    fn mix_respects_weight() {
        let out = mix(&call("mix"), &[arg("#ffffff"), arg("#000000"), arg("100%")]).unwrap();
        assert_eq!(out.value, "#ffffff");
        let out = mix(&call("mix"), &[arg("#ffffff"), arg("#000000"), arg("0%")]).unwrap();
        assert_eq!(out.value, "#000000");
    }

    #[test]
    fn invert_complements_channels() {
        let out = invert(&call("invert"), &[arg("#ff0000")]).unwrap();
        assert_eq!(out.value, "#00ffff");
        let out = invert(&call("invert"), &[arg("#fff")]).unwrap();
        assert_eq!(out.value, "#000000");
    }

    #[test]
    fn bad_colors_are_rejected() {
        assert!(invert(&call("invert"), &[arg("red")]).is_err());
        assert!(invert(&call("invert"), &[arg("#12345")]).is_err());
    }
}
