//! Declarative field mapping between view-models and entities.
//!
//! `bidirectional_map!` generates a `From` impl in each direction that copies
//! the listed same-named fields. Fields not listed take their `Default` value
//! on the target side. No conversion or validation happens here.

use crate::{models::Person, view_models::PersonViewModel};

macro_rules! bidirectional_map {
    ($a:ident <=> $b:ident { $($field:ident),+ $(,)? }) => {
        impl From<$a> for $b {
            fn from(source: $a) -> Self {
                Self {
                    $($field: source.$field,)+
                    ..Default::default()
                }
            }
        }

        impl From<$b> for $a {
            fn from(source: $b) -> Self {
                Self {
                    $($field: source.$field,)+
                    ..Default::default()
                }
            }
        }
    };
}

bidirectional_map!(PersonViewModel <=> Person {
    id,
    tax_id,
    name,
    email,
    street,
    postal_code,
    number,
    complement,
    city,
    neighborhood,
    state,
});
