//! Closed expression trees for `y = f(x)` graph equations.
//!
//! Equations arrive as text (typed, or from a voice command) and are parsed
//! into [`Expr`] once, then sampled into a polyline by the curve module.

use nom::{
    Finish, IResult,
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, char, multispace0},
    combinator::{all_consuming, map, opt},
    error::{Error, ErrorKind},
    multi::many0,
    number::complete::double,
    sequence::{delimited, pair, preceded},
};
use std::f64::consts;

use crate::error::{HapticsError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Const(f64),
    X,
    Neg(Box<Expr>),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Pow(Box<Expr>, Box<Expr>),
    Sin(Box<Expr>),
    Cos(Box<Expr>),
    Tan(Box<Expr>),
    Exp(Box<Expr>),
    Ln(Box<Expr>),
    Sqrt(Box<Expr>),
    Abs(Box<Expr>),
}

impl Expr {
    pub fn parse(text: &str) -> Result<Expr> {
        let normalized = normalize(text);
        all_consuming(ws(parse_sum))(normalized.as_str())
            .finish()
            .map(|(_, expr)| expr)
            .map_err(|e| {
                HapticsError::Expression(format!("{:?} near {:?} in {:?}", e.code, e.input, text))
            })
    }

    pub fn eval(&self, x: f64) -> f64 {
        match self {
            Expr::Const(c) => *c,
            Expr::X => x,
            Expr::Neg(a) => -a.eval(x),
            Expr::Add(a, b) => a.eval(x) + b.eval(x),
            Expr::Sub(a, b) => a.eval(x) - b.eval(x),
            Expr::Mul(a, b) => a.eval(x) * b.eval(x),
            Expr::Div(a, b) => a.eval(x) / b.eval(x),
            Expr::Pow(a, b) => a.eval(x).powf(b.eval(x)),
            Expr::Sin(a) => a.eval(x).sin(),
            Expr::Cos(a) => a.eval(x).cos(),
            Expr::Tan(a) => a.eval(x).tan(),
            Expr::Exp(a) => a.eval(x).exp(),
            Expr::Ln(a) => a.eval(x).ln(),
            Expr::Sqrt(a) => a.eval(x).sqrt(),
            Expr::Abs(a) => a.eval(x).abs(),
        }
    }
}

/// Strips the decorations equations tend to arrive with: `y =`, `lambda x:`,
/// `np.`/`math.` prefixes and superscript powers.
fn normalize(text: &str) -> String {
    let mut s = text.trim();
    if let Some(rest) = s.strip_prefix("lambda x:") {
        s = rest;
    }
    for prefix in ["f(x)=", "f(x) =", "y=", "y ="] {
        if let Some(rest) = s.strip_prefix(prefix) {
            s = rest;
            break;
        }
    }
    s.replace("np.", "")
        .replace("math.", "")
        .replace('²', "^2")
        .replace('³', "^3")
}

fn ws<'a, O, F>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

fn parse_sum(s: &str) -> IResult<&str, Expr> {
    let (s, first) = parse_product(s)?;
    let (s, rest) = many0(pair(ws(alt((char('+'), char('-')))), parse_product))(s)?;
    let expr = rest.into_iter().fold(first, |acc, (op, rhs)| match op {
        '+' => Expr::Add(Box::new(acc), Box::new(rhs)),
        _ => Expr::Sub(Box::new(acc), Box::new(rhs)),
    });
    Ok((s, expr))
}

fn parse_product(s: &str) -> IResult<&str, Expr> {
    let (s, first) = parse_unary(s)?;
    let (s, rest) = many0(pair(ws(alt((char('*'), char('/')))), parse_unary))(s)?;
    let expr = rest.into_iter().fold(first, |acc, (op, rhs)| match op {
        '*' => Expr::Mul(Box::new(acc), Box::new(rhs)),
        _ => Expr::Div(Box::new(acc), Box::new(rhs)),
    });
    Ok((s, expr))
}

fn parse_unary(s: &str) -> IResult<&str, Expr> {
    alt((
        map(preceded(ws(char('-')), parse_unary), |e| Expr::Neg(Box::new(e))),
        parse_power,
    ))(s)
}

// right associative: 2^3^2 == 2^(3^2)
fn parse_power(s: &str) -> IResult<&str, Expr> {
    let (s, base) = parse_atom(s)?;
    let (s, exponent) = opt(preceded(ws(alt((tag("**"), tag("^")))), parse_unary))(s)?;
    let expr = match exponent {
        Some(e) => Expr::Pow(Box::new(base), Box::new(e)),
        None => base,
    };
    Ok((s, expr))
}

fn parse_atom(s: &str) -> IResult<&str, Expr> {
    ws(alt((
        map(double, Expr::Const),
        parse_identifier,
        delimited(char('('), parse_sum, char(')')),
        map(delimited(char('|'), parse_sum, char('|')), |e| {
            Expr::Abs(Box::new(e))
        }),
    )))(s)
}

fn parse_identifier(s: &str) -> IResult<&str, Expr> {
    let (rest, name) = alpha1(s)?;
    match name {
        "x" => Ok((rest, Expr::X)),
        "pi" => Ok((rest, Expr::Const(consts::PI))),
        "e" => Ok((rest, Expr::Const(consts::E))),
        _ => {
            let func: fn(Box<Expr>) -> Expr = match name {
                "sin" => Expr::Sin,
                "cos" => Expr::Cos,
                "tan" => Expr::Tan,
                "exp" => Expr::Exp,
                "ln" | "log" => Expr::Ln,
                "sqrt" => Expr::Sqrt,
                "abs" => Expr::Abs,
                _ => return Err(nom::Err::Error(Error::new(s, ErrorKind::Tag))),
            };
            let (rest, arg) = delimited(ws(char('(')), parse_sum, ws(char(')')))(rest)?;
            Ok((rest, func(Box::new(arg))))
        }
    }
}

/// A named equation recognised from free text by keyword.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preset {
    pub name: &'static str,
    pub equation: &'static str,
    keywords: &'static [&'static str],
}

// Order matters: "cosine" contains "sin" and "세제곱" contains "제곱".
pub const PRESETS: [Preset; 6] = [
    Preset {
        name: "cubic",
        equation: "x^3 / 10000",
        keywords: &["세제곱", "삼차", "cubic"],
    },
    Preset {
        name: "parabola",
        equation: "x^2 / 100",
        keywords: &["제곱", "이차", "포물선", "parabola", "square"],
    },
    Preset {
        name: "cosine",
        equation: "cos(x/30) * 80",
        keywords: &["코사인", "cos"],
    },
    Preset {
        name: "sine",
        equation: "sin(x/50) * 100",
        keywords: &["사인", "sin"],
    },
    Preset {
        name: "line",
        equation: "2*x",
        keywords: &["직선", "일차", "선형", "line"],
    },
    Preset {
        name: "v-shape",
        equation: "abs(x) / 2",
        keywords: &["절댓값", "절대값", "absolute"],
    },
];

pub fn preset_for_text(text: &str) -> Option<&'static Preset> {
    let lower = text.to_lowercase();
    PRESETS
        .iter()
        .find(|p| p.keywords.iter().any(|k| lower.contains(k)))
}
