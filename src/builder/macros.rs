//! Macros for ergonomic status declarations.

/// Generate a status enum and its `State` implementation.
///
/// Variant names double as status names unless a variant is given an
/// explicit `=> "name"`, which also becomes its serialized form.
///
/// # Example
///
/// ```
/// use statusflow::state_enum;
/// use statusflow::core::State;
///
/// state_enum! {
///     pub enum ShipmentStatus {
///         Pending => "pending",
///         InTransit => "in_transit",
///         Delivered,
///     }
/// }
///
/// assert_eq!(ShipmentStatus::InTransit.name(), "in_transit");
/// assert_eq!(ShipmentStatus::Delivered.name(), "Delivered");
/// ```
#[macro_export]
macro_rules! state_enum {
    (@name $variant:ident $label:literal) => {
        $label
    };
    (@name $variant:ident) => {
        stringify!($variant)
    };
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $(=> $label:literal)?
            ),* $(,)?
        }
    ) => {
        #[derive(Clone, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        $(#[$meta])*
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $(#[serde(rename = $label)])?
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => $crate::state_enum!(@name $variant $($label)?)),*
                }
            }
        }
    };
}
