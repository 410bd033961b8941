//! Field descriptors.
//!
//! A transaction layout is a `&'static [FieldDescriptor]`: plain data,
//! declared once per transaction type. Nested tables point at their own
//! field lists, which must be separate `const` items so they can be shared
//! between layouts.

/// Byte width of a scalar, or of one element of an array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarWidth {
    Byte,
    Short,
    Int,
}

impl ScalarWidth {
    pub const fn bytes(self) -> usize {
        match self {
            Self::Byte => 1,
            Self::Short => 2,
            Self::Int => 4,
        }
    }
}

/// What a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Scalar(ScalarWidth),
    /// A vector of scalars. `len` is the element count for fixed-size
    /// arrays and `None` for variable ones.
    Array {
        element: ScalarWidth,
        len: Option<usize>,
    },
    Table(&'static [FieldDescriptor]),
    TableArray(&'static [FieldDescriptor]),
}

/// What happens when the buffer has no entry for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Absence is an encoding defect.
    Required,
    /// Absence is written as zeros of the declared width. Variable arrays
    /// and table arrays contribute nothing.
    Defaulted,
    /// Absence writes nothing at all.
    Optional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub kind: FieldKind,
    pub presence: Presence,
}

impl FieldDescriptor {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            presence: Presence::Required,
        }
    }

    pub const fn defaulted(self) -> Self {
        Self {
            presence: Presence::Defaulted,
            ..self
        }
    }

    pub const fn optional(self) -> Self {
        Self {
            presence: Presence::Optional,
            ..self
        }
    }

    /// Bytes a defaulted field contributes when absent.
    pub fn default_width(&self) -> usize {
        match self.kind {
            FieldKind::Scalar(width) => width.bytes(),
            FieldKind::Array {
                element,
                len: Some(len),
            } => element.bytes() * len,
            FieldKind::Array { len: None, .. } | FieldKind::TableArray(_) => 0,
            FieldKind::Table(fields) => fields
                .iter()
                .filter(|f| f.presence != Presence::Optional)
                .map(FieldDescriptor::default_width)
                .sum(),
        }
    }
}

// ---------------------------------------------------------------------------
// Constructors used by the layout tables
// ---------------------------------------------------------------------------

pub const fn ubyte(name: &'static str) -> FieldDescriptor {
    FieldDescriptor::new(name, FieldKind::Scalar(ScalarWidth::Byte))
}

pub const fn ushort(name: &'static str) -> FieldDescriptor {
    FieldDescriptor::new(name, FieldKind::Scalar(ScalarWidth::Short))
}

pub const fn uint(name: &'static str) -> FieldDescriptor {
    FieldDescriptor::new(name, FieldKind::Scalar(ScalarWidth::Int))
}

/// Fixed-length byte array.
pub const fn bytes(name: &'static str, len: usize) -> FieldDescriptor {
    FieldDescriptor::new(
        name,
        FieldKind::Array {
            element: ScalarWidth::Byte,
            len: Some(len),
        },
    )
}

/// Variable-length byte array.
pub const fn var_bytes(name: &'static str) -> FieldDescriptor {
    FieldDescriptor::new(
        name,
        FieldKind::Array {
            element: ScalarWidth::Byte,
            len: None,
        },
    )
}

/// Fixed-length array of 32-bit words. A 64-bit value is `words(name, 2)`.
pub const fn words(name: &'static str, len: usize) -> FieldDescriptor {
    FieldDescriptor::new(
        name,
        FieldKind::Array {
            element: ScalarWidth::Int,
            len: Some(len),
        },
    )
}

pub const fn table(name: &'static str, fields: &'static [FieldDescriptor]) -> FieldDescriptor {
    FieldDescriptor::new(name, FieldKind::Table(fields))
}

pub const fn table_array(
    name: &'static str,
    fields: &'static [FieldDescriptor],
) -> FieldDescriptor {
    FieldDescriptor::new(name, FieldKind::TableArray(fields))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAIR: &[FieldDescriptor] = &[ubyte("kind"), words("value", 2)];

    #[test]
    fn default_widths() {
        assert_eq!(ubyte("a").default_width(), 1);
        assert_eq!(ushort("a").default_width(), 2);
        assert_eq!(uint("a").default_width(), 4);
        assert_eq!(bytes("a", 32).default_width(), 32);
        assert_eq!(words("a", 2).default_width(), 8);
        assert_eq!(var_bytes("a").default_width(), 0);
        assert_eq!(table("t", PAIR).default_width(), 9);
        assert_eq!(table_array("t", PAIR).default_width(), 0);
    }

    #[test]
    fn presence_modifiers() {
        assert_eq!(ubyte("a").presence, Presence::Required);
        assert_eq!(ubyte("a").defaulted().presence, Presence::Defaulted);
        assert_eq!(ubyte("a").optional().presence, Presence::Optional);
    }
}
