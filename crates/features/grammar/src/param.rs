use crate::error::GrammarError;
use crate::literal::coerce;
use crate::scan::{split_outside_quotes, strip_quotes};
use joinery_domain::{Literal, ParamType, ParameterSpec};
use tracing::{debug, warn};

/// One `,`-separated option after the type in a parameter spec.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamOption {
    Required,
    Default(Literal),
    Description(String),
    /// Anything else; ignored so the spec stays usable.
    Unrecognized(String),
}

impl ParamOption {
    /// Reads a single option fragment such as `required` or `default=0.15`.
    #[must_use]
    pub fn parse(fragment: &str) -> Self {
        let fragment = fragment.trim();
        if fragment == "required" {
            return Self::Required;
        }

        match fragment.split_once('=').map(|(k, v)| (k.trim(), v.trim())) {
            Some(("default", value)) => Self::Default(coerce(value)),
            Some(("description", text)) => Self::Description(strip_quotes(text).to_owned()),
            _ => Self::Unrecognized(fragment.to_owned()),
        }
    }

    fn apply(self, spec: &mut ParameterSpec) {
        match self {
            Self::Required => spec.required = true,
            Self::Default(value) => spec.default = Some(conform_default(&spec.name, value, spec.ty)),
            Self::Description(text) => spec.description = Some(text),
            Self::Unrecognized(fragment) => {
                if !fragment.is_empty() {
                    debug!(parameter = %spec.name, option = %fragment, "Ignoring unrecognized option");
                }
            },
        }
    }
}

/// Parses `name:type[,option]...` into a parameter declaration.
///
/// The name ends at the first `:`. Unknown type tokens fall back to
/// [`ParamType::String`] and unknown options are ignored; the only hard failures are a
/// missing `:` and an empty name. Option fragments may quote `,` inside `'...'` or `"..."`.
///
/// ```
/// use joinery_domain::{Literal, ParamType};
/// use joinery_grammar::parse_parameter_spec;
///
/// let spec = parse_parameter_spec("discount:float,default=0.15").unwrap();
/// assert_eq!(spec.ty, ParamType::Float);
/// assert_eq!(spec.default, Some(Literal::Float(0.15)));
/// ```
pub fn parse_parameter_spec(spec: &str) -> Result<ParameterSpec, GrammarError> {
    let Some((name, rest)) = spec.split_once(':') else {
        return Err(GrammarError::MissingType { input: spec.to_owned(), context: None });
    };
    let name = name.trim();
    if name.is_empty() {
        return Err(GrammarError::EmptyName { input: spec.to_owned(), context: None });
    }

    let split = split_outside_quotes(rest, ',', &['\'', '"']);
    // An unclosed quote degrades to a single option fragment rather than an error.
    let fragments: Vec<&str> = if split.unterminated.is_some() {
        rest.split_once(',').map_or_else(|| vec![rest], |(ty, opts)| vec![ty, opts])
    } else {
        split.parts
    };

    let token = fragments.first().map_or("", |t| t.trim());
    let ty = ParamType::recognize(token).unwrap_or_else(|| {
        warn!(parameter = name, token, "Unrecognized type token, falling back to string");
        ParamType::String
    });

    let mut parsed = ParameterSpec::new(name, ty);
    for fragment in fragments.iter().skip(1) {
        ParamOption::parse(fragment).apply(&mut parsed);
    }
    Ok(parsed)
}

/// Conforms a default to the declared type; a mismatch is kept as-is for the builder to reject.
fn conform_default(name: &str, value: Literal, ty: ParamType) -> Literal {
    value.conform(ty).unwrap_or_else(|original| {
        debug!(parameter = name, %original, expected = %ty, "Default does not match declared type");
        original
    })
}
