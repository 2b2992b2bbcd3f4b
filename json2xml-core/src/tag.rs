//! Type tags - the element name given to each wrapped JSON value.
//!
//! Every JSON value becomes exactly one XML element, named after the
//! value's runtime type. The same tags make up the converter's nesting
//! stack, so they also decide which closing delimiter is legal next.

use std::fmt;

/// Runtime type of a JSON value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TypeTag {
    Object = 0,
    Array,
    Boolean,
    Number,
    String,
    Null,
}

impl TypeTag {
    /// Every tag, in declaration order.
    pub const ALL: [TypeTag; 6] = [
        TypeTag::Object,
        TypeTag::Array,
        TypeTag::Boolean,
        TypeTag::Number,
        TypeTag::String,
        TypeTag::Null,
    ];

    /// XML element name for this tag.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::Array => "array",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Null => "null",
        }
    }

    /// Containers may hold child elements; scalars never do.
    #[inline]
    pub const fn is_container(self) -> bool {
        matches!(self, Self::Object | Self::Array)
    }

    /// Scalar frames are closed on the call after their char data.
    #[inline]
    pub const fn is_scalar(self) -> bool {
        !self.is_container()
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
