use joinery_domain::{JoinDefinition, Literal, ParamType};
use std::fmt;

/// A type as declared: either already resolved or still the raw token read from disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeToken<'a> {
    Known(ParamType),
    Raw(&'a str),
}

impl TypeToken<'_> {
    /// The recognized type, or `None` for an unknown raw token.
    #[must_use]
    pub fn resolve(&self) -> Option<ParamType> {
        match self {
            Self::Known(ty) => Some(*ty),
            Self::Raw(token) => ParamType::recognize(token),
        }
    }
}

impl fmt::Display for TypeToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(ty) => write!(f, "{ty}"),
            Self::Raw(token) => f.write_str(token),
        }
    }
}

/// Borrowed view of one declared parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterView<'a> {
    pub name: &'a str,
    pub ty: TypeToken<'a>,
    pub required: bool,
    pub default: Option<&'a Literal>,
}

/// Anything the validator can check: built joins and joins read back from a domain file.
pub trait JoinSource {
    fn key(&self) -> &str;
    fn parameters(&self) -> Vec<ParameterView<'_>>;
    fn fields(&self) -> Vec<(&str, TypeToken<'_>)>;
    fn condition(&self) -> Option<&str>;

    /// Number of positional values a parameterized reference must supply.
    fn arity(&self) -> usize {
        self.parameters().len()
    }

    fn required_count(&self) -> usize {
        self.parameters().iter().filter(|p| p.required).count()
    }
}

impl JoinSource for JoinDefinition {
    fn key(&self) -> &str {
        &self.key
    }

    fn parameters(&self) -> Vec<ParameterView<'_>> {
        self.parameters
            .iter()
            .map(|p| ParameterView {
                name: &p.name,
                ty: TypeToken::Known(p.ty),
                required: p.required,
                default: p.default.as_ref(),
            })
            .collect()
    }

    fn fields(&self) -> Vec<(&str, TypeToken<'_>)> {
        self.fields.iter().map(|(name, f)| (name.as_str(), TypeToken::Known(f.ty))).collect()
    }

    fn condition(&self) -> Option<&str> {
        self.join_condition.as_deref()
    }
}
