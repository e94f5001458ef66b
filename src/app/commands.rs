/// parse one script line into a typed command: a variable assignment
/// `name = expression`, a plot declaration `line("id", [..], "x", "y")` or a
/// slider directive `sliderupdate("id", "param", min, max, default, step)`.
/// Argument strings are split on top-level commas only (a depth counter over
/// `[`/`]` keeps literal lists intact), then classified per field.
use crate::symbolic::utils::find_matching_bracket;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1},
    combinator::{map, recognize},
    multi::many0,
    sequence::pair,
};
use std::fmt::Display;

pub const LINE_KEYWORD: &str = "line";
pub const SLIDER_KEYWORD: &str = "sliderupdate";

/// enum to represent the argument value types a command can carry:
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Str(String),
    Number(f64),
    List(Vec<ArgValue>),
}

#[allow(dead_code)]
impl ArgValue {
    pub fn as_str(&self) -> Option<&str> {
        if let ArgValue::Str(s) = self { Some(s) } else { None }
    }

    pub fn as_list(&self) -> Option<&[ArgValue]> {
        if let ArgValue::List(items) = self {
            Some(items)
        } else {
            None
        }
    }

    /// numeric conversion happens per-field, not globally: slider bounds and
    /// steps go through here while ids and labels stay strings
    pub fn as_number(&self) -> Result<f64, String> {
        match self {
            ArgValue::Number(v) => Ok(*v),
            ArgValue::Str(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| format!("expected a number, got '{}'", s)),
            ArgValue::List(_) => Err("expected a number, got a list".to_string()),
        }
    }

    pub fn as_number_pair(&self) -> Result<(f64, f64), String> {
        match self {
            ArgValue::List(items) if items.len() == 2 => {
                Ok((items[0].as_number()?, items[1].as_number()?))
            }
            ArgValue::List(items) => Err(format!(
                "expected a two-element list, got {} elements",
                items.len()
            )),
            other => Err(format!("expected a two-element list, got '{}'", other)),
        }
    }

    pub fn to_string_value(&self) -> String {
        match self {
            ArgValue::Str(s) => s.clone(),
            ArgValue::Number(v) => v.to_string(),
            ArgValue::List(items) => {
                let inner: Vec<String> = items.iter().map(|v| v.to_string_value()).collect();
                format!("[{}]", inner.join(", "))
            }
        }
    }
}

impl Display for ArgValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_string_value())
    }
}

/// One named equation `label = expression`, the unit every plot list is made
/// of. The label must be a valid identifier and the right-hand side non-empty.
#[derive(Debug, Clone, PartialEq)]
pub struct EquationEntry {
    pub label: String,
    pub expression: String,
}

impl EquationEntry {
    pub fn parse(s: &str) -> Result<EquationEntry, String> {
        let (label, rhs) = s
            .split_once('=')
            .ok_or_else(|| format!("expected 'label = expression', got '{}'", s))?;
        let label = label.trim();
        let rhs = rhs.trim();
        if !is_identifier(label) {
            return Err(format!("equation label '{}' is not a valid identifier", label));
        }
        if rhs.is_empty() {
            return Err(format!("equation '{}' has an empty right-hand side", s));
        }
        Ok(EquationEntry {
            label: label.to_string(),
            expression: rhs.to_string(),
        })
    }

    pub fn source(&self) -> String {
        format!("{} = {}", self.label, self.expression)
    }
}

/// default value carried by a slider directive: a scalar for ordinary
/// parameter sliders, a pair for range controls
#[derive(Debug, Clone, PartialEq)]
pub enum SliderDefault {
    Scalar(f64),
    Range(f64, f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineCommand {
    pub id: String,
    pub lists: Vec<Vec<EquationEntry>>,
    pub x_label: String,
    pub y_label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SliderCommand {
    pub plot_id: String,
    pub param_name: String,
    pub min: f64,
    pub max: f64,
    pub default: SliderDefault,
    pub step: f64,
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Assign { name: String, expression: String },
    Line(LineCommand),
    SliderUpdate(SliderCommand),
}

fn identifier(input: &str) -> IResult<&str, String> {
    let parser = recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ));

    let mut parser = map(parser, String::from);
    parser.parse(input)
}

pub fn is_identifier(s: &str) -> bool {
    matches!(identifier(s), Ok((rest, _)) if rest.is_empty())
}

/// A line counts as an assignment when it contains '=' and does not begin
/// with the reserved `line(` token. Anything else falls through to command
/// parsing.
fn parse_assignment(line: &str) -> Option<(String, String)> {
    if !line.contains('=') || line.starts_with("line(") {
        return None;
    }
    let (rest, name) = identifier(line).ok()?;
    let rest = rest.trim_start().strip_prefix('=')?;
    let expression = rest.trim();
    if expression.is_empty() {
        return None;
    }
    Some((name, expression.to_string()))
}

/// split an argument string on commas at bracket depth zero, so a literal
/// list like `[-250, 250]` stays one argument
fn split_top_level_args(args_str: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_list = 0;
    for c in args_str.chars() {
        match c {
            '[' => {
                in_list += 1;
                current.push(c);
            }
            ']' => {
                in_list -= 1;
                current.push(c);
            }
            ',' if in_list == 0 => {
                args.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    if !current.trim().is_empty() {
        args.push(current.trim().to_string());
    }
    args
}

fn strip_quotes(raw: &str) -> String {
    let t = raw.trim();
    let t = if (t.starts_with('"') && t.ends_with('"') && t.len() >= 2)
        || (t.starts_with('\'') && t.ends_with('\'') && t.len() >= 2)
    {
        &t[1..t.len() - 1]
    } else {
        t
    };
    t.trim().to_string()
}

fn classify_list_item(item: &str) -> Result<ArgValue, String> {
    let item = item.trim();
    if (item.starts_with('"') && item.ends_with('"') && item.len() >= 2)
        || (item.starts_with('\'') && item.ends_with('\'') && item.len() >= 2)
    {
        return Ok(ArgValue::Str(item[1..item.len() - 1].trim().to_string()));
    }
    item.parse::<f64>()
        .map(ArgValue::Number)
        .map_err(|_| format!("unparseable list element '{}'", item))
}

fn classify_argument(raw: &str) -> Result<ArgValue, String> {
    let raw = raw.trim();
    if raw.starts_with('[') && raw.ends_with(']') {
        let inner = &raw[1..raw.len() - 1];
        let mut values = Vec::new();
        for item in split_top_level_args(inner) {
            values.push(classify_list_item(&item)?);
        }
        return Ok(ArgValue::List(values));
    }
    Ok(ArgValue::Str(strip_quotes(raw)))
}

fn expect_str(arg: &ArgValue, what: &str) -> Result<String, String> {
    arg.as_str()
        .map(String::from)
        .ok_or_else(|| format!("expected a string for {}, got '{}'", what, arg))
}

fn expect_entries(arg: &ArgValue) -> Result<Vec<EquationEntry>, String> {
    let items = arg
        .as_list()
        .ok_or_else(|| format!("expected a list of \"label = expression\" strings, got '{}'", arg))?;
    items
        .iter()
        .map(|item| match item {
            ArgValue::Str(s) => EquationEntry::parse(s),
            other => Err(format!("expected an equation string, got '{}'", other)),
        })
        .collect()
}

fn build_line_command(args: &[ArgValue], line: &str) -> Result<LineCommand, String> {
    // 4 positional arguments for the single-list variant, 5 for the dual-list one
    let (lists, x_pos) = match args.len() {
        4 => (vec![expect_entries(&args[1])?], 2),
        5 => (
            vec![expect_entries(&args[1])?, expect_entries(&args[2])?],
            3,
        ),
        n => {
            return Err(format!(
                "expected 4 or 5 arguments in line command, got {}: {}",
                n, line
            ));
        }
    };
    Ok(LineCommand {
        id: expect_str(&args[0], "plot id")?,
        lists,
        x_label: expect_str(&args[x_pos], "x label")?,
        y_label: expect_str(&args[x_pos + 1], "y label")?,
    })
}

fn build_slider_command(args: &[ArgValue], line: &str) -> Result<SliderCommand, String> {
    if args.len() != 6 && args.len() != 7 {
        return Err(format!(
            "expected 6 or 7 arguments in sliderupdate command, got {}: {}",
            args.len(),
            line
        ));
    }
    let plot_id = expect_str(&args[0], "plot id")?;
    let param_name = expect_str(&args[1], "parameter name")?;
    let min = args[2].as_number()?;
    let max = args[3].as_number()?;
    let default = match &args[4] {
        ArgValue::List(_) => {
            let (lo, hi) = args[4].as_number_pair()?;
            SliderDefault::Range(lo, hi)
        }
        other => SliderDefault::Scalar(other.as_number()?),
    };
    let step = args[5].as_number()?;
    let label = if args.len() == 7 {
        Some(expect_str(&args[6], "slider label")?)
    } else {
        None
    };
    if min > max {
        return Err(format!(
            "slider '{}': min {} exceeds max {}: {}",
            param_name, min, max, line
        ));
    }
    if step < 0.0 {
        return Err(format!(
            "slider '{}': step must not be negative: {}",
            param_name, line
        ));
    }
    Ok(SliderCommand {
        plot_id,
        param_name,
        min,
        max,
        default,
        step,
        label,
    })
}

/// Parses a single non-blank, non-comment script line into a [`Command`].
pub fn parse_command(line: &str) -> Result<Command, String> {
    let trimmed = line.trim();
    if let Some((name, expression)) = parse_assignment(trimmed) {
        return Ok(Command::Assign { name, expression });
    }

    let open = trimmed
        .find('(')
        .ok_or_else(|| format!("invalid command format: '{}'", trimmed))?;
    let keyword = trimmed[..open].trim();
    let close = find_matching_bracket(trimmed, open)
        .ok_or_else(|| format!("unbalanced parentheses in '{}'", trimmed))?;
    if !trimmed[close + 1..].trim().is_empty() {
        return Err(format!(
            "unexpected trailing text after ')' in '{}'",
            trimmed
        ));
    }

    let args: Vec<ArgValue> = split_top_level_args(&trimmed[open + 1..close])
        .iter()
        .map(|raw| classify_argument(raw))
        .collect::<Result<_, String>>()?;

    match keyword {
        LINE_KEYWORD => build_line_command(&args, trimmed).map(Command::Line),
        SLIDER_KEYWORD => build_slider_command(&args, trimmed).map(Command::SliderUpdate),
        other => Err(format!("unknown command '{}' in '{}'", other, trimmed)),
    }
}
