//! SQL type vocabulary and quoting rules.
//!
//! Types are written in the sheet the way SQL Server spells them, with an
//! optional parameter suffix: `varchar(50)`, `decimal(10, 2)`, `nvarchar[max]`.
//! The suffix is stripped to obtain the base type before classification.

use std::fmt;

/// String data types.
pub const STRING_TYPES: &[&str] = &[
    "char",
    "varchar",
    "text",
    "nchar",
    "nvarchar",
    "ntext",
    "binary",
    "varbinary",
    "image",
];

/// Numeric data types.
pub const NUMERIC_TYPES: &[&str] = &[
    "bit",
    "tinyint",
    "smallint",
    "int",
    "bigint",
    "decimal",
    "numeric",
    "smallmoney",
    "money",
    "float",
    "real",
];

/// Date/time data types.
pub const DATETIME_TYPES: &[&str] = &[
    "datetime",
    "datetime2",
    "smalldatetime",
    "date",
    "time",
    "datetimeoffset",
    "timestamp",
];

/// Everything else the template accepts. Values of these types are quoted.
pub const OTHER_TYPES: &[&str] = &["sql_variant", "uniqueidentifier", "xml", "cursor", "table"];

/// The vocabulary a base type belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeFamily {
    String,
    Numeric,
    DateTime,
    Other,
}

impl TypeFamily {
    pub const ALL: [TypeFamily; 4] = [
        TypeFamily::String,
        TypeFamily::Numeric,
        TypeFamily::DateTime,
        TypeFamily::Other,
    ];

    /// The base type names in this family.
    pub fn vocabulary(self) -> &'static [&'static str] {
        match self {
            TypeFamily::String => STRING_TYPES,
            TypeFamily::Numeric => NUMERIC_TYPES,
            TypeFamily::DateTime => DATETIME_TYPES,
            TypeFamily::Other => OTHER_TYPES,
        }
    }
}

impl fmt::Display for TypeFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeFamily::String => write!(f, "string"),
            TypeFamily::Numeric => write!(f, "numeric"),
            TypeFamily::DateTime => write!(f, "date/time"),
            TypeFamily::Other => write!(f, "other"),
        }
    }
}

/// Strip every parenthesized or bracketed parameter group from a raw type.
///
/// A group opens with `(` or `[` and closes at the first following `)` or
/// `]`. An unterminated group is left in place.
///
/// ```
/// use sheetsql_template::base_type;
/// assert_eq!(base_type("varchar(50)"), "varchar");
/// assert_eq!(base_type("decimal(10, 2)"), "decimal");
/// assert_eq!(base_type("nvarchar[max]"), "nvarchar");
/// assert_eq!(base_type(" int "), "int");
/// ```
pub fn base_type(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(open) = rest.find(|c: char| c == '(' || c == '[') {
        let after = &rest[open + 1..];
        let Some(close) = after.find(|c: char| c == ')' || c == ']') else {
            break;
        };
        out.push_str(&rest[..open]);
        rest = &after[close + 1..];
    }
    out.push_str(rest);

    out.trim().to_string()
}

/// Classify a raw type into its family, or `None` if the base type is not
/// part of any vocabulary.
pub fn classify(raw: &str) -> Option<TypeFamily> {
    let base = base_type(raw);
    TypeFamily::ALL
        .into_iter()
        .find(|family| family.vocabulary().contains(&base.as_str()))
}

/// Whether values of this type are wrapped in single quotes.
///
/// String, date/time and "other" types are quoted. `bit` is quoted as well,
/// so bit columns take `'True'`/`'False'` style values rather than `1`/`0`.
/// Every other numeric type, and any unrecognized type, is written verbatim.
pub fn requires_quoting(raw: &str) -> bool {
    match classify(raw) {
        Some(TypeFamily::String | TypeFamily::DateTime | TypeFamily::Other) => true,
        Some(TypeFamily::Numeric) => base_type(raw) == "bit",
        None => false,
    }
}
