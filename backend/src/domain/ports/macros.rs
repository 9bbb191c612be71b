//! `define_port_error!` declares the error enum of a driven port.
//!
//! Every variant carries named fields and a `thiserror` message. Each one also
//! gets a snake_case constructor taking `impl Into<_>` per field, so adapters
//! write `UserRecordRepositoryError::query("relation missing")`.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident { $($field:ident : $ty:ty),+ $(,)? } => $message:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant { $($field: $ty),+ },
            )+
        }

        impl $name {
            $(
                ::paste::paste! {
                    #[doc = concat!("Build [`", stringify!($name), "::", stringify!($variant), "`].")]
                    #[must_use]
                    pub fn [<$variant:snake>]($($field: impl Into<$ty>),+) -> Self {
                        Self::$variant { $($field: $field.into()),+ }
                    }
                }
            )+
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    use crate::domain::ValidationErrors;
    use rstest::rstest;

    define_port_error! {
        /// Errors of an imaginary quota store.
        pub enum QuotaStoreError {
            /// Store unreachable.
            Unreachable { message: String } => "quota store unreachable: {message}",
            /// Gave up retrying.
            Exhausted { attempts: u32 } => "gave up after {attempts} attempts",
            /// Record refused.
            Refused { user: String, errors: ValidationErrors } => "refused {user}: {errors}",
        }
    }

    #[rstest]
    fn constructor_name_is_snake_case_of_the_variant() {
        assert_eq!(
            QuotaStoreError::unreachable("timeout"),
            QuotaStoreError::Unreachable {
                message: "timeout".to_owned()
            }
        );
    }

    #[rstest]
    fn messages_interpolate_fields() {
        assert_eq!(
            QuotaStoreError::exhausted(3_u32).to_string(),
            "gave up after 3 attempts"
        );
    }

    #[rstest]
    fn several_fields_convert_in_declaration_order() {
        let mut errors = ValidationErrors::new();
        errors.add("quota_in_bytes", "must be greater than or equal to 0");

        let err = QuotaStoreError::refused("ada", errors);

        assert_eq!(
            err.to_string(),
            "refused ada: quota_in_bytes must be greater than or equal to 0"
        );
    }
}
