use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, IntoStaticStr};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];

/// Value types a parameter or an exposed field can carry.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ParamType {
    #[default]
    String,
    Integer,
    Float,
    Boolean,
    Date,
    #[serde(rename = "datetime")]
    #[strum(serialize = "datetime")]
    DateTime,
}

impl ParamType {
    /// Recognizes a type token, canonical names and common schema synonyms alike.
    ///
    /// Matching is case-insensitive. Returns `None` for unknown tokens so callers can
    /// decide whether to fall back or to report.
    #[must_use]
    pub fn recognize(token: &str) -> Option<Self> {
        let token = token.trim().to_ascii_lowercase();
        if let Some(canonical) = Self::iter().find(|t| <&'static str>::from(*t) == token) {
            return Some(canonical);
        }

        let ty = match token.as_str() {
            "str" | "text" | "varchar" | "char" | "citext" | "uuid" | "binary_id" | "enum" => {
                Self::String
            },
            "int" | "bigint" | "smallint" | "int2" | "int4" | "int8" | "serial"
            | "bigserial" | "id" => Self::Integer,
            "decimal" | "numeric" | "double" | "real" | "number" | "float4" | "float8" => {
                Self::Float
            },
            "bool" => Self::Boolean,
            "timestamp" | "timestamptz" | "utc_datetime" | "naive_datetime" | "date_time" => {
                Self::DateTime
            },
            _ => return None,
        };
        Some(ty)
    }

    /// Like [`ParamType::recognize`], falling back to [`ParamType::String`] for unknown tokens.
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        Self::recognize(token).unwrap_or_default()
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// A typed constant, produced by literal coercion and used for parameter defaults.
///
/// Deserializing never yields `Date` or `DateTime`: calendar values arrive as strings and
/// become typed through [`Literal::conform`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl Literal {
    /// The runtime type of this literal; `None` for [`Literal::Null`].
    #[must_use]
    pub const fn param_type(&self) -> Option<ParamType> {
        match self {
            Self::Null => None,
            Self::Boolean(_) => Some(ParamType::Boolean),
            Self::Integer(_) => Some(ParamType::Integer),
            Self::Float(_) => Some(ParamType::Float),
            Self::String(_) => Some(ParamType::String),
            Self::Date(_) => Some(ParamType::Date),
            Self::DateTime(_) => Some(ParamType::DateTime),
        }
    }

    /// Whether this literal may stand as a value of `ty`. `Null` matches every type.
    #[must_use]
    pub fn matches(&self, ty: ParamType) -> bool {
        self.param_type().is_none_or(|own| own == ty)
    }

    /// Converts the literal into the declared type where a lossless reading exists.
    ///
    /// Integers widen to floats, ISO strings become dates and datetimes, and scalars
    /// become strings for string-typed parameters. On failure the literal is handed
    /// back unchanged.
    pub fn conform(self, ty: ParamType) -> Result<Self, Self> {
        if self.matches(ty) {
            return Ok(self);
        }

        match (self, ty) {
            #[allow(clippy::cast_precision_loss)]
            (Self::Integer(i), ParamType::Float) => Ok(Self::Float(i as f64)),
            (Self::String(s), ParamType::Date) => {
                NaiveDate::parse_from_str(&s, DATE_FORMAT).map(Self::Date).map_err(|_| Self::String(s))
            },
            (Self::String(s), ParamType::DateTime) => {
                let parsed = DATETIME_FORMATS
                    .iter()
                    .find_map(|fmt| NaiveDateTime::parse_from_str(&s, fmt).ok())
                    .or_else(|| {
                        chrono::DateTime::parse_from_rfc3339(&s).ok().map(|dt| dt.naive_utc())
                    });
                parsed.map(Self::DateTime).ok_or(Self::String(s))
            },
            (Self::Date(d), ParamType::DateTime) => {
                d.and_hms_opt(0, 0, 0).map(Self::DateTime).ok_or(Self::Date(d))
            },
            (scalar @ (Self::Boolean(_) | Self::Integer(_) | Self::Float(_)), ParamType::String) => {
                Ok(Self::String(scalar.to_string()))
            },
            (other, _) => Err(other),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x:?}"),
            Self::String(s) => f.write_str(s),
            Self::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
            Self::DateTime(dt) => write!(f, "{}", dt.format(DATETIME_FORMATS[0])),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_synonyms_case_insensitively() {
        assert_eq!(ParamType::recognize("INT"), Some(ParamType::Integer));
        assert_eq!(ParamType::recognize("Bool"), Some(ParamType::Boolean));
        assert_eq!(ParamType::recognize("decimal"), Some(ParamType::Float));
        assert_eq!(ParamType::recognize("datetime"), Some(ParamType::DateTime));
        assert_eq!(ParamType::recognize("timestamp"), Some(ParamType::DateTime));
        assert_eq!(ParamType::recognize("sting"), None);
        assert_eq!(ParamType::from_token("sting"), ParamType::String);
    }

    #[test]
    fn canonical_names_round_trip_through_display() {
        for ty in ParamType::iter() {
            assert_eq!(ParamType::recognize(&ty.to_string()), Some(ty));
        }
    }

    #[test]
    fn conform_widens_and_parses_calendar_values() {
        assert_eq!(Literal::Integer(3).conform(ParamType::Float), Ok(Literal::Float(3.0)));

        let date = Literal::String("2024-02-29".into()).conform(ParamType::Date);
        assert_eq!(date, Ok(Literal::Date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap())));

        let dt = Literal::String("2024-01-01T10:30:00Z".into()).conform(ParamType::DateTime);
        assert!(matches!(dt, Ok(Literal::DateTime(_))));

        assert_eq!(Literal::Boolean(true).conform(ParamType::String), Ok(Literal::String("true".into())));
    }

    #[test]
    fn conform_hands_back_mismatches() {
        assert_eq!(
            Literal::String("soon".into()).conform(ParamType::Date),
            Err(Literal::String("soon".into()))
        );
        assert_eq!(Literal::Float(0.5).conform(ParamType::Integer), Err(Literal::Float(0.5)));
        assert_eq!(Literal::Null.conform(ParamType::Boolean), Ok(Literal::Null));
    }

    #[test]
    fn float_display_keeps_decimal_point() {
        assert_eq!(Literal::Float(1.0).to_string(), "1.0");
        assert_eq!(Literal::Float(0.15).to_string(), "0.15");
    }
}
