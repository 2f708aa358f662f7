//! Target record types and their compile-time column mapping.

use dbinspect_core::Cell;

use crate::convert::ConvertError;

/// Stores one converted cell into one field.
pub type Setter<R> = fn(&mut R, Cell) -> Result<(), ConvertError>;

/// One field of a record as seen by the projector.
pub struct FieldBinding<R> {
    /// Rust field name. Matched case-insensitively when `hint` is absent.
    pub name: &'static str,
    /// Exact column this field receives. When set, the field name is ignored.
    pub hint: Option<&'static str>,
    /// `None` marks a field that columns may match but never write.
    pub setter: Option<Setter<R>>,
}

impl<R> FieldBinding<R> {
    /// Whether this field accepts a column, given the column name in upper case.
    pub fn matches(&self, upper_column: &str) -> bool {
        match self.hint {
            Some(hint) => hint.to_uppercase() == upper_column,
            None => self.name.to_uppercase() == upper_column,
        }
    }
}

impl<R> Clone for FieldBinding<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for FieldBinding<R> {}

/// A flat record a query row can be projected onto.
///
/// Usually implemented through [`record!`](crate::record!).
pub trait Record: Default + Sized {
    /// Field bindings in declaration order. Declaration order breaks ties.
    fn bindings() -> Vec<FieldBinding<Self>>;
}

/// Declare a record struct and its [`Record`] implementation.
///
/// Each field may carry a column hint (`=> "COLUMN"`) and may be marked
/// `as readonly`, in which case a matching column is discarded.
///
/// ```
/// use dbinspect_query::record;
///
/// record! {
///     #[derive(Debug, Default)]
///     pub struct Parameter {
///         pub name: String,
///         pub value: Option<String> => "DISPLAY_VALUE",
///     }
/// }
/// ```
#[macro_export]
macro_rules! record {
    (@hint) => {
        ::core::option::Option::None
    };
    (@hint $hint:literal) => {
        ::core::option::Option::Some($hint)
    };
    (@setter $name:ident, $field:ident, $fty:ty, readonly) => {
        ::core::option::Option::None
    };
    (@setter $name:ident, $field:ident, $fty:ty) => {
        ::core::option::Option::Some(
            (|record: &mut $name,
              cell: $crate::Cell|
             -> ::core::result::Result<(), $crate::convert::ConvertError> {
                record.$field = <$fty as $crate::convert::FromCell>::from_cell(cell)?;
                ::core::result::Result::Ok(())
            }) as $crate::record::Setter<$name>,
        )
    };
    (
        $(#[$smeta:meta])*
        $svis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident : $fty:ty $( => $hint:literal )? $( as $mode:ident )?
            ),* $(,)?
        }
    ) => {
        $(#[$smeta])*
        $svis struct $name {
            $(
                $(#[$fmeta])*
                $fvis $field: $fty,
            )*
        }

        impl $crate::record::Record for $name {
            fn bindings() -> ::std::vec::Vec<$crate::record::FieldBinding<Self>> {
                ::std::vec![
                    $(
                        $crate::record::FieldBinding {
                            name: ::core::stringify!($field),
                            hint: $crate::record!(@hint $($hint)?),
                            setter: $crate::record!(@setter $name, $field, $fty $(, $mode)?),
                        },
                    )*
                ]
            }
        }
    };
}
