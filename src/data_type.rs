use allocative::Allocative;

/// Represents the supported data types in the database schema.
/// These types define the structure of columns and the expected format of values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Allocative)]
pub enum DataType {
    /// A signed integer. Held as 64 bits in memory, written as 32 bits on disk.
    Integer,
    /// A variable-length UTF-8 character string.
    Text,
    /// A 64-bit floating-point number.
    Real,
    /// A boolean value (true or false).
    Boolean,
}

impl DataType {
    pub const INTEGER_TAG: u32 = 0;
    pub const TEXT_TAG: u32 = 1;
    pub const REAL_TAG: u32 = 2;
    pub const BOOLEAN_TAG: u32 = 3;

    /// Returns the tag written in front of columns and fields in a table file.
    pub fn tag(self) -> u32 {
        match self {
            Self::Integer => Self::INTEGER_TAG,
            Self::Text => Self::TEXT_TAG,
            Self::Real => Self::REAL_TAG,
            Self::Boolean => Self::BOOLEAN_TAG,
        }
    }

    /// Maps an on-disk tag back to its type. Returns `None` for unknown tags.
    pub fn from_tag(tag: u32) -> Option<Self> {
        match tag {
            Self::INTEGER_TAG => Some(Self::Integer),
            Self::TEXT_TAG => Some(Self::Text),
            Self::REAL_TAG => Some(Self::Real),
            Self::BOOLEAN_TAG => Some(Self::Boolean),
            _ => None,
        }
    }

    /// Resolves a SQL type name, ignoring case.
    ///
    /// ```
    /// # use tabula::DataType;
    /// assert_eq!(DataType::from_name("int"), Some(DataType::Integer));
    /// assert_eq!(DataType::from_name("VARCHAR"), Some(DataType::Text));
    /// assert_eq!(DataType::from_name("blob"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_uppercase().as_str() {
            "INTEGER" | "INT" => Some(Self::Integer),
            "TEXT" | "VARCHAR" => Some(Self::Text),
            "REAL" | "DOUBLE" | "FLOAT" => Some(Self::Real),
            "BOOLEAN" | "BOOL" => Some(Self::Boolean),
            _ => None,
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Integer => "INTEGER",
            Self::Text => "TEXT",
            Self::Real => "REAL",
            Self::Boolean => "BOOLEAN",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_are_frozen() {
        assert_eq!(DataType::Integer.tag(), 0);
        assert_eq!(DataType::Text.tag(), 1);
        assert_eq!(DataType::Real.tag(), 2);
        assert_eq!(DataType::Boolean.tag(), 3);

        for data_type in [
            DataType::Integer,
            DataType::Text,
            DataType::Real,
            DataType::Boolean,
        ] {
            assert_eq!(DataType::from_tag(data_type.tag()), Some(data_type));
        }
        assert_eq!(DataType::from_tag(4), None);
    }

    #[test]
    fn test_from_name_aliases() {
        assert_eq!(DataType::from_name("Integer"), Some(DataType::Integer));
        assert_eq!(DataType::from_name("text"), Some(DataType::Text));
        assert_eq!(DataType::from_name("double"), Some(DataType::Real));
        assert_eq!(DataType::from_name("Float"), Some(DataType::Real));
        assert_eq!(DataType::from_name("bool"), Some(DataType::Boolean));
        assert_eq!(DataType::from_name("DATE"), None);
    }
}
